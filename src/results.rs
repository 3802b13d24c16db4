mod execution;
mod result_set;
mod row;

pub use execution::{ExecutionResult, DATA_KEY};
pub use result_set::ResultSet;
pub use row::CustomDbRow;
