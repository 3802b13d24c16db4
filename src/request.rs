use serde_json::Value as JsonValue;

use crate::error::SqlFacadeError;
use crate::params::{
    BoundParameter, ParameterMap, bind_parameters, get_ignore_case, normalize_parameters,
};
use crate::types::CommandKind;

/// Everything needed to run one command.
///
/// Built per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    connection_string: String,
    command_text: String,
    command_kind: CommandKind,
    parameters: Vec<BoundParameter>,
}

impl ExecutionRequest {
    #[must_use]
    pub fn new(connection_string: impl Into<String>, command_text: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            command_text: command_text.into(),
            command_kind: CommandKind::Text,
            parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, command_kind: CommandKind) -> Self {
        self.command_kind = command_kind;
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<BoundParameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Build a request from a per-call input mapping.
    ///
    /// `commandText`, `commandType` and `connectionString` are matched exactly;
    /// `commandParameters` case-insensitively. A non-empty `bound_connection`
    /// wins over the per-call `connectionString`. An input that is not a
    /// mapping is read as an empty one.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ConfigError` when no connection string is
    /// available, or `SqlFacadeError::ParameterError` for an ambiguous
    /// parameter descriptor.
    pub fn from_input(
        input: &JsonValue,
        bound_connection: Option<&str>,
    ) -> Result<Self, SqlFacadeError> {
        let empty = ParameterMap::new();
        let args = input.as_object().unwrap_or(&empty);

        let connection_string = match bound_connection {
            Some(bound) if !bound.is_empty() => bound.to_string(),
            _ => string_arg(args, "connectionString").unwrap_or_default(),
        };
        if connection_string.is_empty() {
            return Err(SqlFacadeError::ConfigError(
                "connection string has not been initialized".to_string(),
            ));
        }

        let command_kind = CommandKind::parse_or_default(
            args.get("commandType").and_then(JsonValue::as_str),
        );
        let batch = normalize_parameters(get_ignore_case(args, "commandParameters")?);
        let parameters = bind_parameters(&batch)?;

        Ok(Self {
            connection_string,
            command_text: string_arg(args, "commandText").unwrap_or_default(),
            command_kind,
            parameters,
        })
    }

    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    #[must_use]
    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    #[must_use]
    pub fn command_kind(&self) -> CommandKind {
        self.command_kind
    }

    #[must_use]
    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    /// Parameters whose final value is read back after a query.
    pub fn output_parameters(&self) -> impl Iterator<Item = &BoundParameter> {
        self.parameters
            .iter()
            .filter(|p| p.direction.captures_output())
    }
}

fn string_arg(args: &ParameterMap, key: &str) -> Option<String> {
    args.get(key).and_then(JsonValue::as_str).map(str::to_string)
}
