//! Convenient imports for common functionality.

pub use crate::config::DataSource;
pub use crate::error::SqlFacadeError;
pub use crate::executor::{ReaderOutput, execute_non_query, execute_reader, execute_scalar};
pub use crate::facade::SqlFacade;
pub use crate::params::{BoundParameter, ParamInput, bind_parameter, normalize_parameters};
pub use crate::request::ExecutionRequest;
pub use crate::results::{CustomDbRow, DATA_KEY, ExecutionResult, ResultSet};
pub use crate::shaper::shape_reader_output;
pub use crate::types::{
    CommandKind, DatabaseType, ExecutionMode, ParameterDirection, RowValues,
};

#[cfg(feature = "mssql")]
pub use crate::mssql::{MssqlClient, MssqlOptions, create_mssql_client};
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;
