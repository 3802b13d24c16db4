//! Generic execution facade for relational databases.
//!
//! Give it a connection string, command text, a command kind and a loosely
//! typed set of named parameters; it runs the command on a fresh connection and
//! hands back one normalized [`ExecutionResult`]:
//!
//! - `query` returns the result sets, unwrapped when there is exactly one, or a
//!   `{ <outputs>..., "Data": [...] }` mapping when output parameters were bound;
//! - `scalar` returns the first column of the first row;
//! - `non_query` returns the affected-row count.
//!
//! Backends are chosen from the connection string: `sqlite:` selects `SQLite`
//! (feature `sqlite`), anything else is an ADO.NET SQL Server string (feature
//! `mssql`).

pub mod config;
pub mod error;
pub mod executor;
pub mod facade;
pub mod params;
pub mod prelude;
pub mod request;
pub mod results;
pub mod shaper;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::SqlFacadeError;
pub use facade::SqlFacade;
pub use request::ExecutionRequest;
pub use results::ExecutionResult;
pub use types::{CommandKind, ExecutionMode, ParameterDirection, RowValues};
