use serde_json::Value as JsonValue;

use crate::error::SqlFacadeError;
use crate::executor::{execute_non_query, execute_reader, execute_scalar};
use crate::request::ExecutionRequest;
use crate::results::ExecutionResult;
use crate::shaper::shape_reader_output;
use crate::types::ExecutionMode;

/// Entry point exposing `query`, `scalar` and `non_query`.
///
/// The facade only remembers an optional connection string; every call builds
/// its own request and opens its own connection, so one facade can be shared
/// freely between concurrent tasks.
///
/// ```rust,no_run
/// use serde_json::json;
/// use sql_facade::prelude::*;
///
/// # async fn run() -> Result<(), SqlFacadeError> {
/// let sql = SqlFacade::new(Some("sqlite::memory:".to_string()));
/// let rows = sql.query(&json!({ "commandText": "select 1 as X" })).await?;
/// assert_eq!(rows.to_json(), json!([{ "X": 1 }]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlFacade {
    connection_string: Option<String>,
}

impl SqlFacade {
    #[must_use]
    pub fn new(connection_string: Option<String>) -> Self {
        Self { connection_string }
    }

    /// Construct from a `{ "connectionString": ... }` mapping.
    ///
    /// Anything else, including a missing or non-string value, yields a facade
    /// with no bound connection string.
    #[must_use]
    pub fn from_args(args: &JsonValue) -> Self {
        let connection_string = args
            .get("connectionString")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        Self::new(connection_string)
    }

    #[must_use]
    pub fn connection_string(&self) -> Option<&str> {
        self.connection_string.as_deref()
    }

    /// Run a command and return its shaped result sets.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError` if the request is invalid or execution fails.
    pub async fn query(&self, input: &JsonValue) -> Result<ExecutionResult, SqlFacadeError> {
        let request = self.request(input)?;
        let output = execute_reader(&request).await?;
        Ok(shape_reader_output(output))
    }

    /// Run a command and return its single scalar value.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError` if the request is invalid or execution fails.
    pub async fn scalar(&self, input: &JsonValue) -> Result<ExecutionResult, SqlFacadeError> {
        let request = self.request(input)?;
        Ok(ExecutionResult::Scalar(execute_scalar(&request).await?))
    }

    /// Run a command and return the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError` if the request is invalid or execution fails.
    pub async fn non_query(&self, input: &JsonValue) -> Result<ExecutionResult, SqlFacadeError> {
        let request = self.request(input)?;
        Ok(ExecutionResult::AffectedCount(
            execute_non_query(&request).await?,
        ))
    }

    /// Dispatch to one of the three operations.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError` if the request is invalid or execution fails.
    pub async fn execute(
        &self,
        mode: ExecutionMode,
        input: &JsonValue,
    ) -> Result<ExecutionResult, SqlFacadeError> {
        match mode {
            ExecutionMode::Query => self.query(input).await,
            ExecutionMode::Scalar => self.scalar(input).await,
            ExecutionMode::NonQuery => self.non_query(input).await,
        }
    }

    fn request(&self, input: &JsonValue) -> Result<ExecutionRequest, SqlFacadeError> {
        ExecutionRequest::from_input(input, self.connection_string.as_deref())
    }
}
