//! Per-call command execution.
//!
//! Every call resolves its backend from the connection string, opens a fresh
//! connection, runs the command in one of three modes and drops the connection
//! before returning, on success and on failure alike.

mod dispatch;

pub use dispatch::{execute_non_query, execute_reader, execute_scalar};

use crate::results::ResultSet;
use crate::types::RowValues;

/// Raw output of a reader-mode execution, before shaping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReaderOutput {
    /// Every result set the driver yielded, in order.
    pub result_sets: Vec<ResultSet>,
    /// Final values of output-capturing parameters, keyed by parameter name.
    pub outputs: Vec<(String, RowValues)>,
}
