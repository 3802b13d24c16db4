use std::str::FromStr;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or used as command parameters.
///
/// Caller input arrives as loosely-typed JSON; it is narrowed to this enum once,
/// before any backend sees it:
/// ```rust
/// use serde_json::json;
/// use sql_facade::prelude::*;
///
/// assert_eq!(RowValues::from_json(&json!(7)), RowValues::Int(7));
/// assert_eq!(RowValues::from_json(&json!("alice")), RowValues::Text("alice".into()));
/// assert!(RowValues::from_json(&json!(null)).is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Narrow a caller-supplied JSON scalar.
    ///
    /// Integral numbers become `Int`, every other number `Float`. Arrays and
    /// objects are kept as `JSON`.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => RowValues::Null,
            JsonValue::Bool(b) => RowValues::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => RowValues::Int(i),
                None => n.as_f64().map_or(RowValues::Null, RowValues::Float),
            },
            JsonValue::String(s) => RowValues::Text(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => RowValues::JSON(value.clone()),
        }
    }

    /// Render the value in the shape handed back to callers.
    ///
    /// Timestamps become ISO-8601 strings and blobs become arrays of byte
    /// values. Non-finite floats have no JSON form and render as null.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => {
                JsonValue::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
            }
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(jsval) => jsval.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
        }
    }
}

impl From<&JsonValue> for RowValues {
    fn from(value: &JsonValue) -> Self {
        RowValues::from_json(value)
    }
}

/// The database type behind a connection string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseType {
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
    /// SQL Server database
    #[cfg(feature = "mssql")]
    Mssql,
}

/// How the command text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    /// Plain SQL text.
    #[default]
    Text,
    /// The text names a stored procedure.
    StoredProcedure,
    /// The text names a table whose rows are all returned.
    TableDirect,
}

impl CommandKind {
    /// Parse caller input, falling back to [`CommandKind::Text`].
    ///
    /// Unparseable or missing input is not an error; this leniency is part of
    /// the caller contract.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::parse::<CommandKind>) {
            Some(Ok(kind)) => kind,
            Some(Err(())) => {
                tracing::debug!(command_type = ?raw, "unrecognised command type, using Text");
                CommandKind::Text
            }
            None => CommandKind::Text,
        }
    }
}

impl FromStr for CommandKind {
    type Err = ();

    /// Names match case-insensitively; the numeric codes `1`, `4` and `512`
    /// are accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("text") || s == "1" {
            Ok(CommandKind::Text)
        } else if s.eq_ignore_ascii_case("storedprocedure") || s == "4" {
            Ok(CommandKind::StoredProcedure)
        } else if s.eq_ignore_ascii_case("tabledirect") || s == "512" {
            Ok(CommandKind::TableDirect)
        } else {
            Err(())
        }
    }
}

/// Which way a bound parameter carries its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    /// Receives a stored procedure's return status.
    ReturnValue,
}

impl ParameterDirection {
    /// Parse caller input, falling back to [`ParameterDirection::Input`].
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::parse::<ParameterDirection>) {
            Some(Ok(direction)) => direction,
            Some(Err(())) => {
                tracing::debug!(direction = ?raw, "unrecognised parameter direction, using Input");
                ParameterDirection::Input
            }
            None => ParameterDirection::Input,
        }
    }

    /// Whether the parameter's final value is read back after execution.
    #[must_use]
    pub fn captures_output(self) -> bool {
        !matches!(self, ParameterDirection::Input)
    }

    /// Whether the caller's value is sent to the database.
    #[must_use]
    pub fn sends_value(self) -> bool {
        matches!(
            self,
            ParameterDirection::Input | ParameterDirection::InputOutput
        )
    }
}

impl FromStr for ParameterDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("input") || s == "1" {
            Ok(ParameterDirection::Input)
        } else if s.eq_ignore_ascii_case("output") || s == "2" {
            Ok(ParameterDirection::Output)
        } else if s.eq_ignore_ascii_case("inputoutput") || s == "3" {
            Ok(ParameterDirection::InputOutput)
        } else if s.eq_ignore_ascii_case("returnvalue") || s == "6" {
            Ok(ParameterDirection::ReturnValue)
        } else {
            Err(())
        }
    }
}

/// The three ways a command can be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Read every result set, plus output parameters.
    Query,
    /// Return the first column of the first row.
    Scalar,
    /// Return the number of affected rows.
    NonQuery,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_kind_parses_case_insensitively() {
        assert_eq!(
            CommandKind::parse_or_default(Some("storedprocedure")),
            CommandKind::StoredProcedure
        );
        assert_eq!(
            CommandKind::parse_or_default(Some(" TableDirect ")),
            CommandKind::TableDirect
        );
        assert_eq!(CommandKind::parse_or_default(Some("4")), CommandKind::StoredProcedure);
    }

    #[test]
    fn command_kind_falls_back_to_text() {
        assert_eq!(CommandKind::parse_or_default(None), CommandKind::Text);
        assert_eq!(CommandKind::parse_or_default(Some("")), CommandKind::Text);
        assert_eq!(CommandKind::parse_or_default(Some("proc")), CommandKind::Text);
        assert_eq!(CommandKind::parse_or_default(Some("7")), CommandKind::Text);
    }

    #[test]
    fn direction_parses_and_falls_back() {
        assert_eq!(
            ParameterDirection::parse_or_default(Some("OUTPUT")),
            ParameterDirection::Output
        );
        assert_eq!(
            ParameterDirection::parse_or_default(Some("inputOutput")),
            ParameterDirection::InputOutput
        );
        assert_eq!(
            ParameterDirection::parse_or_default(Some("6")),
            ParameterDirection::ReturnValue
        );
        assert_eq!(
            ParameterDirection::parse_or_default(Some("sideways")),
            ParameterDirection::Input
        );
        assert_eq!(ParameterDirection::parse_or_default(None), ParameterDirection::Input);
    }

    #[test]
    fn direction_capture_rules() {
        assert!(!ParameterDirection::Input.captures_output());
        assert!(ParameterDirection::Output.captures_output());
        assert!(ParameterDirection::InputOutput.captures_output());
        assert!(ParameterDirection::ReturnValue.captures_output());
        assert!(ParameterDirection::InputOutput.sends_value());
        assert!(!ParameterDirection::Output.sends_value());
    }

    #[test]
    fn json_values_narrow_to_row_values() {
        assert_eq!(RowValues::from_json(&json!(1.5)), RowValues::Float(1.5));
        assert_eq!(RowValues::from_json(&json!(true)), RowValues::Bool(true));
        assert_eq!(
            RowValues::from_json(&json!([1, 2])),
            RowValues::JSON(json!([1, 2]))
        );
    }

    #[test]
    fn row_values_render_as_json() {
        let dt = NaiveDateTime::parse_from_str("2024-03-01 10:20:30", "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
        assert_eq!(RowValues::Timestamp(dt).to_json(), json!("2024-03-01T10:20:30"));
        assert_eq!(RowValues::Blob(vec![1, 255]).to_json(), json!([1, 255]));
        assert_eq!(RowValues::Null.to_json(), json!(null));
        assert_eq!(RowValues::Float(f64::NAN).to_json(), json!(null));
    }
}
