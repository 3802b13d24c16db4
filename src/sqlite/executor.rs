use crate::error::SqlFacadeError;
use crate::executor::ReaderOutput;
use crate::params::BoundParameter;
use crate::request::ExecutionRequest;
use crate::types::{CommandKind, RowValues};

use super::config::SqliteOptions;
use super::params::captured_outputs;
use super::query::{ReadMode, run_statements, total_changes};

/// Execute a command in reader mode.
///
/// # Errors
///
/// Returns `SqlFacadeError` if opening, binding or stepping fails.
pub async fn execute_reader(
    opts: &SqliteOptions,
    request: &ExecutionRequest,
) -> Result<ReaderOutput, SqlFacadeError> {
    let sql = statement_text(request)?;
    run_blocking(opts, request, move |conn, params| {
        let result_sets = run_statements(conn, &sql, params, ReadMode::Materialize)?;
        Ok(ReaderOutput {
            result_sets,
            outputs: captured_outputs(params),
        })
    })
    .await
}

/// Execute a command and return the first column of the first row.
///
/// # Errors
///
/// Returns `SqlFacadeError` if opening, binding or stepping fails.
pub async fn execute_scalar(
    opts: &SqliteOptions,
    request: &ExecutionRequest,
) -> Result<RowValues, SqlFacadeError> {
    let sql = statement_text(request)?;
    run_blocking(opts, request, move |conn, params| {
        let result_sets = run_statements(conn, &sql, params, ReadMode::FirstRow)?;
        Ok(result_sets
            .first()
            .and_then(|set| set.first_value())
            .cloned()
            .unwrap_or(RowValues::Null))
    })
    .await
}

/// Execute a command and return the number of rows it changed.
///
/// # Errors
///
/// Returns `SqlFacadeError` if opening, binding or stepping fails.
pub async fn execute_non_query(
    opts: &SqliteOptions,
    request: &ExecutionRequest,
) -> Result<i64, SqlFacadeError> {
    let sql = statement_text(request)?;
    run_blocking(opts, request, move |conn, params| {
        let before = total_changes(conn)?;
        run_statements(conn, &sql, params, ReadMode::Discard)?;
        Ok(total_changes(conn)? - before)
    })
    .await
}

fn statement_text(request: &ExecutionRequest) -> Result<String, SqlFacadeError> {
    match request.command_kind() {
        CommandKind::Text => Ok(request.command_text().to_string()),
        CommandKind::TableDirect => Ok(format!("SELECT * FROM {}", request.command_text())),
        CommandKind::StoredProcedure => Err(SqlFacadeError::Unimplemented(
            "SQLite has no stored procedures".to_string(),
        )),
    }
}

/// Open a connection on a blocking worker, run `work`, and close it.
///
/// The connection lives only inside the worker closure, so it is closed on
/// every exit path before the result crosses back to the caller.
async fn run_blocking<T, F>(
    opts: &SqliteOptions,
    request: &ExecutionRequest,
    work: F,
) -> Result<T, SqlFacadeError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection, &[BoundParameter]) -> Result<T, SqlFacadeError>
        + Send
        + 'static,
{
    let opts = opts.clone();
    let params = request.parameters().to_vec();
    tokio::task::spawn_blocking(move || {
        let conn = opts.open()?;
        work(&conn, &params)
    })
    .await?
}
