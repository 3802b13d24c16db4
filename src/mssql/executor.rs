use crate::error::SqlFacadeError;
use crate::executor::ReaderOutput;
use crate::request::ExecutionRequest;
use crate::results::ResultSet;
use crate::types::RowValues;

use super::client::create_mssql_client;
use super::config::MssqlOptions;
use super::params::{CAPTURE_SENTINEL, compose_batch};
use super::query::build_result_sets;

/// Execute a command in reader mode, reading back output parameters.
///
/// # Errors
///
/// Returns `SqlFacadeError` if connecting, executing or reading fails.
pub async fn execute_reader(
    opts: &MssqlOptions,
    request: &ExecutionRequest,
) -> Result<ReaderOutput, SqlFacadeError> {
    let batch = compose_batch(request, true)?;
    let mut client = create_mssql_client(opts).await?;

    let stream = batch.to_query().query(&mut client).await?;
    let result_sets = build_result_sets(stream).await?;
    let (result_sets, outputs) = split_captures(result_sets, &batch.captures)?;

    Ok(ReaderOutput {
        result_sets,
        outputs,
    })
}

/// Separate the trailing output capture select from the caller's result sets.
///
/// The last result set must be the capture select: a leading
/// [`CAPTURE_SENTINEL`] column followed by one column per captured name. A
/// capture set without rows yields nulls.
///
/// # Errors
///
/// Returns `SqlFacadeError::ExecutionError` when the capture select did not
/// run, e.g. because the command returned early.
pub fn split_captures(
    mut result_sets: Vec<ResultSet>,
    captures: &[String],
) -> Result<(Vec<ResultSet>, Vec<(String, RowValues)>), SqlFacadeError> {
    if captures.is_empty() {
        return Ok((result_sets, Vec::new()));
    }

    let is_capture_set = result_sets
        .last()
        .is_some_and(|set| is_capture_columns(set.get_column_names(), captures));
    if !is_capture_set {
        return Err(SqlFacadeError::ExecutionError(
            "command ended before output parameters were returned".to_string(),
        ));
    }

    let values = result_sets
        .pop()
        .and_then(|capture| capture.results.into_iter().next())
        .map(|row| row.rows)
        .unwrap_or_default();
    let outputs = captures
        .iter()
        .cloned()
        .zip(
            values
                .into_iter()
                .skip(1)
                .chain(std::iter::repeat(RowValues::Null)),
        )
        .collect();

    Ok((result_sets, outputs))
}

fn is_capture_columns(columns: &[String], captures: &[String]) -> bool {
    let Some((sentinel, rest)) = columns.split_first() else {
        return false;
    };
    sentinel == CAPTURE_SENTINEL
        && rest.len() == captures.len()
        && rest
            .iter()
            .zip(captures)
            .all(|(column, name)| column == name.strip_prefix('@').unwrap_or(name))
}

/// Execute a command and return the first column of the first row.
///
/// # Errors
///
/// Returns `SqlFacadeError` if connecting, executing or reading fails.
pub async fn execute_scalar(
    opts: &MssqlOptions,
    request: &ExecutionRequest,
) -> Result<RowValues, SqlFacadeError> {
    let batch = compose_batch(request, false)?;
    let mut client = create_mssql_client(opts).await?;

    let stream = batch.to_query().query(&mut client).await?;
    let result_sets = build_result_sets(stream).await?;

    Ok(result_sets
        .first()
        .and_then(|set| set.first_value())
        .cloned()
        .unwrap_or(RowValues::Null))
}

/// Execute a command and return the rows affected, summed over every statement.
///
/// # Errors
///
/// Returns `SqlFacadeError` if connecting or executing fails, or the count
/// does not fit in an `i64`.
pub async fn execute_non_query(
    opts: &MssqlOptions,
    request: &ExecutionRequest,
) -> Result<i64, SqlFacadeError> {
    let batch = compose_batch(request, false)?;
    let mut client = create_mssql_client(opts).await?;

    let exec_result = batch.to_query().execute(&mut client).await?;
    let rows_affected: u64 = exec_result.rows_affected().iter().sum();

    i64::try_from(rows_affected).map_err(|e| {
        SqlFacadeError::ExecutionError(format!("Invalid rows affected count: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn result_set(columns: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
        let names = columns.iter().map(|c| (*c).to_string()).collect();
        let mut set = ResultSet::new(Arc::new(names));
        for row in rows {
            set.add_row_values(row);
        }
        set
    }

    fn captures(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn capture_set_is_split_from_user_sets() {
        let sets = vec![
            result_set(&["X"], vec![vec![RowValues::Int(1)]]),
            result_set(
                &[CAPTURE_SENTINEL, "Total"],
                vec![vec![RowValues::Int(1), RowValues::Int(42)]],
            ),
        ];
        let (data, outputs) = split_captures(sets, &captures(&["Total"])).unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].to_json(), json!([{ "X": 1 }]));
        assert_eq!(outputs, vec![("Total".to_string(), RowValues::Int(42))]);
    }

    #[test]
    fn capture_set_alone_leaves_no_data() {
        let sets = vec![result_set(
            &[CAPTURE_SENTINEL, "Total", "rc"],
            vec![vec![RowValues::Int(1), RowValues::Null, RowValues::Int(7)]],
        )];
        let (data, outputs) = split_captures(sets, &captures(&["@Total", "rc"])).unwrap();

        assert!(data.is_empty());
        assert_eq!(
            outputs,
            vec![
                ("@Total".to_string(), RowValues::Null),
                ("rc".to_string(), RowValues::Int(7)),
            ]
        );
    }

    #[test]
    fn capture_set_without_rows_yields_nulls() {
        let sets = vec![result_set(&[CAPTURE_SENTINEL, "Total"], vec![])];
        let (_, outputs) = split_captures(sets, &captures(&["Total"])).unwrap();
        assert_eq!(outputs, vec![("Total".to_string(), RowValues::Null)]);
    }

    #[test]
    fn capture_set_with_fewer_columns_is_rejected() {
        let sets = vec![result_set(
            &[CAPTURE_SENTINEL, "Total"],
            vec![vec![RowValues::Int(1), RowValues::Int(42)]],
        )];
        let err = split_captures(sets, &captures(&["Total", "Note"])).unwrap_err();
        assert!(matches!(err, SqlFacadeError::ExecutionError(_)));
    }

    #[test]
    fn missing_capture_set_is_not_mistaken_for_user_rows() {
        // The command returned before the capture select ran.
        let sets = vec![result_set(&["Total"], vec![vec![RowValues::Int(1)]])];
        let err = split_captures(sets, &captures(&["Total"])).unwrap_err();
        assert!(matches!(err, SqlFacadeError::ExecutionError(_)));

        let err = split_captures(Vec::new(), &captures(&["Total"])).unwrap_err();
        assert!(matches!(err, SqlFacadeError::ExecutionError(_)));
    }

    #[test]
    fn nothing_to_capture_keeps_every_set() {
        let sets = vec![result_set(&["X"], vec![vec![RowValues::Int(1)]])];
        let (data, outputs) = split_captures(sets, &[]).unwrap();
        assert_eq!(data.len(), 1);
        assert!(outputs.is_empty());
    }
}
