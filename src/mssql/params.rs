//! SQL Server command composition.
//!
//! tiberius only binds positional `@P1..@Pn` parameters and has no notion of
//! parameter direction. Named caller parameters are therefore declared as
//! T-SQL variables ahead of the command and initialised from the positional
//! values; output-capturing variables are read back by one trailing select
//! whose first column is [`CAPTURE_SENTINEL`].
//!
//! ```text
//! DECLARE @Id bigint = @P1;
//! DECLARE @Total bigint = @P2;
//! EXEC dbo.AlbumTotals @Id = @Id, @Total = @Total OUTPUT
//! SELECT 1 AS [__sql_facade_outputs], @Total AS [Total];
//! ```

use tiberius::Query;

use crate::error::SqlFacadeError;
use crate::params::BoundParameter;
use crate::request::ExecutionRequest;
use crate::types::{CommandKind, ParameterDirection, RowValues};

/// Alias of the leading column of the output capture select.
pub const CAPTURE_SENTINEL: &str = "__sql_facade_outputs";

/// A composed SQL Server batch with its positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct MssqlBatch {
    /// Batch text, ready for `sp_executesql`.
    pub sql: String,
    /// Values for `@P1..@Pn`, in order.
    pub values: Vec<RowValues>,
    /// Caller names of the parameters read back by the trailing select, in
    /// column order. Empty when nothing is captured.
    pub captures: Vec<String>,
}

impl MssqlBatch {
    /// Build a tiberius query with every positional value bound.
    #[must_use]
    pub fn to_query(&self) -> Query<'_> {
        bind_query_params(&self.sql, &self.values)
    }
}

/// Compose the batch for a request.
///
/// With `capture_outputs` set and at least one output-capturing parameter, a
/// final `SELECT` of those variables is appended; the caller must strip that
/// last result set (see `split_captures`).
///
/// # Errors
///
/// Returns `SqlFacadeError::ParameterError` for a parameter name that is not a
/// valid T-SQL variable name.
pub fn compose_batch(
    request: &ExecutionRequest,
    capture_outputs: bool,
) -> Result<MssqlBatch, SqlFacadeError> {
    let mut declarations = String::new();
    let mut values = Vec::new();
    let mut arguments = Vec::new();
    let mut return_variable = None;
    let mut captured = Vec::new();

    for param in request.parameters() {
        let variable = variable_name(param)?;
        let sql_type = declared_type(param);

        if param.direction.sends_value() {
            values.push(param.value.clone());
            declarations.push_str(&format!(
                "DECLARE {variable} {sql_type} = @P{};\n",
                values.len()
            ));
        } else {
            declarations.push_str(&format!("DECLARE {variable} {sql_type};\n"));
        }

        match param.direction {
            ParameterDirection::Input => arguments.push(format!("{variable} = {variable}")),
            ParameterDirection::Output | ParameterDirection::InputOutput => {
                arguments.push(format!("{variable} = {variable} OUTPUT"));
            }
            ParameterDirection::ReturnValue => return_variable = Some(variable.clone()),
        }

        if param.direction.captures_output() {
            captured.push((param.name.clone(), variable));
        }
    }

    let text = request.command_text();
    let body = match request.command_kind() {
        CommandKind::Text => text.to_string(),
        CommandKind::TableDirect => format!("SELECT * FROM {text}"),
        CommandKind::StoredProcedure => {
            let target = match &return_variable {
                Some(variable) => format!("{variable} = {text}"),
                None => text.to_string(),
            };
            if arguments.is_empty() {
                format!("EXEC {target}")
            } else {
                format!("EXEC {target} {}", arguments.join(", "))
            }
        }
    };

    let mut sql = declarations;
    sql.push_str(&body);

    let captures = if capture_outputs && !captured.is_empty() {
        let mut columns = vec![format!("1 AS {}", quote_alias(CAPTURE_SENTINEL))];
        columns.extend(
            captured
                .iter()
                .map(|(_, variable)| format!("{variable} AS {}", quote_alias(&variable[1..]))),
        );
        sql.push_str(&format!("\nSELECT {};", columns.join(", ")));
        captured.into_iter().map(|(name, _)| name).collect()
    } else {
        Vec::new()
    };

    Ok(MssqlBatch {
        sql,
        values,
        captures,
    })
}

/// Bind parameters directly to the query for SQL Server
/// Return a query builder with parameters already bound
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => query_builder.bind(*dt),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query_builder.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}

/// The variable name for a parameter, `@` prefixed.
fn variable_name(param: &BoundParameter) -> Result<String, SqlFacadeError> {
    let bare = param.name.strip_prefix('@').unwrap_or(&param.name);
    let valid = !bare.is_empty()
        && bare
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '$'));
    if !valid {
        return Err(SqlFacadeError::ParameterError(format!(
            "`{}` is not a valid SQL Server parameter name",
            param.name
        )));
    }
    Ok(format!("@{bare}"))
}

/// SQL type of the declared variable, taken from the caller's value the same
/// way ADO.NET infers a parameter type.
fn declared_type(param: &BoundParameter) -> &'static str {
    if param.direction == ParameterDirection::ReturnValue {
        return "int";
    }
    match param.value {
        RowValues::Int(_) => "bigint",
        RowValues::Float(_) => "float",
        RowValues::Text(_) | RowValues::JSON(_) => "nvarchar(max)",
        RowValues::Bool(_) => "bit",
        RowValues::Timestamp(_) => "datetime2",
        RowValues::Blob(_) => "varbinary(max)",
        RowValues::Null => "nvarchar(4000)",
    }
}

fn quote_alias(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}
