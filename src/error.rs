use thiserror::Error;

/// Every failure a facade call can surface.
///
/// Driver errors pass through unchanged so callers see exactly what the
/// database reported; the string variants cover failures raised before or
/// around the driver call.
#[derive(Debug, Error)]
pub enum SqlFacadeError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl From<tokio::task::JoinError> for SqlFacadeError {
    fn from(err: tokio::task::JoinError) -> Self {
        SqlFacadeError::ExecutionError(format!("database worker failed: {err}"))
    }
}
