use std::time::Instant;

use crate::config::DataSource;
use crate::error::SqlFacadeError;
use crate::request::ExecutionRequest;
use crate::results::DATA_KEY;
use crate::types::{ExecutionMode, RowValues};

#[cfg(feature = "mssql")]
use crate::mssql;
#[cfg(feature = "sqlite")]
use crate::sqlite;

use super::ReaderOutput;

/// Run a command in reader mode and collect every result set plus the final
/// values of output parameters.
///
/// # Errors
///
/// Returns the driver's error unchanged if connecting, binding, executing or
/// reading fails; the connection is already closed when the error surfaces.
pub async fn execute_reader(request: &ExecutionRequest) -> Result<ReaderOutput, SqlFacadeError> {
    ensure_command_text(request)?;
    if request.output_parameters().any(|p| p.name == DATA_KEY) {
        return Err(SqlFacadeError::ParameterError(format!(
            "output parameter name `{DATA_KEY}` is reserved for result sets"
        )));
    }
    let source = resolve(request, ExecutionMode::Query)?;
    let started = Instant::now();

    let output = match &source {
        #[cfg(feature = "sqlite")]
        DataSource::Sqlite(opts) => sqlite::execute_reader(opts, request).await?,
        #[cfg(feature = "mssql")]
        DataSource::Mssql(opts) => mssql::execute_reader(opts, request).await?,
    };

    tracing::debug!(
        result_sets = output.result_sets.len(),
        outputs = output.outputs.len(),
        elapsed_ms = elapsed_ms(started),
        "reader completed"
    );
    Ok(output)
}

/// Run a command and return the first column of the first row, or null.
///
/// # Errors
///
/// Returns the driver's error unchanged on any failure.
pub async fn execute_scalar(request: &ExecutionRequest) -> Result<RowValues, SqlFacadeError> {
    ensure_command_text(request)?;
    let source = resolve(request, ExecutionMode::Scalar)?;
    let started = Instant::now();

    let value = match &source {
        #[cfg(feature = "sqlite")]
        DataSource::Sqlite(opts) => sqlite::execute_scalar(opts, request).await?,
        #[cfg(feature = "mssql")]
        DataSource::Mssql(opts) => mssql::execute_scalar(opts, request).await?,
    };

    tracing::debug!(elapsed_ms = elapsed_ms(started), "scalar completed");
    Ok(value)
}

/// Run a command and return the number of rows it affected.
///
/// Output parameters are not read back in this mode.
///
/// # Errors
///
/// Returns the driver's error unchanged on any failure.
pub async fn execute_non_query(request: &ExecutionRequest) -> Result<i64, SqlFacadeError> {
    ensure_command_text(request)?;
    let source = resolve(request, ExecutionMode::NonQuery)?;
    let started = Instant::now();

    let rows_affected = match &source {
        #[cfg(feature = "sqlite")]
        DataSource::Sqlite(opts) => sqlite::execute_non_query(opts, request).await?,
        #[cfg(feature = "mssql")]
        DataSource::Mssql(opts) => mssql::execute_non_query(opts, request).await?,
    };

    tracing::debug!(
        rows_affected,
        elapsed_ms = elapsed_ms(started),
        "non-query completed"
    );
    Ok(rows_affected)
}

fn ensure_command_text(request: &ExecutionRequest) -> Result<(), SqlFacadeError> {
    if request.command_text().is_empty() {
        return Err(SqlFacadeError::ExecutionError(
            "command text has not been initialized".to_string(),
        ));
    }
    Ok(())
}

fn resolve(request: &ExecutionRequest, mode: ExecutionMode) -> Result<DataSource, SqlFacadeError> {
    let source = DataSource::parse(request.connection_string())?;
    tracing::debug!(
        backend = ?source.database_type(),
        ?mode,
        kind = ?request.command_kind(),
        parameters = request.parameters().len(),
        "executing command"
    );
    Ok(source)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
