use std::sync::Arc;

use rusqlite::fallible_iterator::FallibleIterator;
use rusqlite::types::Value;
use rusqlite::{Batch, Connection};

use super::params::bind_named;
use crate::error::SqlFacadeError;
use crate::params::BoundParameter;
use crate::results::ResultSet;
use crate::types::RowValues;

/// How much of each result set to keep while stepping through a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Materialize every row of every result set.
    Materialize,
    /// Keep only the first row of the first result set.
    FirstRow,
    /// Step through rows without keeping any.
    Discard,
}

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlFacadeError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlFacadeError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Run every statement of `sql` in order and collect one result set per
/// statement that yields columns.
///
/// Statements without columns (DDL, DML) run for their side effects only.
/// Rows are read forward-only; with [`ReadMode::Discard`] the returned result
/// sets carry columns but no rows.
///
/// # Errors
///
/// Returns the first `SQLite` error met while preparing, binding or stepping.
pub fn run_statements(
    conn: &Connection,
    sql: &str,
    params: &[BoundParameter],
    mode: ReadMode,
) -> Result<Vec<ResultSet>, SqlFacadeError> {
    let mut result_sets = Vec::new();
    let mut batch = Batch::new(conn, sql);

    while let Some(mut stmt) = batch.next()? {
        bind_named(&mut stmt, params)?;

        if stmt.column_count() == 0 {
            stmt.raw_execute()?;
            continue;
        }

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect();
        let col_count = column_names.len();
        let mut result_set = ResultSet::new(Arc::new(column_names));
        let row_limit = match mode {
            ReadMode::Materialize => usize::MAX,
            ReadMode::FirstRow if result_sets.is_empty() => 1,
            ReadMode::FirstRow | ReadMode::Discard => 0,
        };

        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            if result_set.len() >= row_limit {
                continue;
            }
            let mut row_values = Vec::with_capacity(col_count);
            for i in 0..col_count {
                row_values.push(sqlite_extract_value_sync(row, i)?);
            }
            result_set.add_row_values(row_values);
        }

        result_sets.push(result_set);
    }

    Ok(result_sets)
}

/// Rows changed by INSERT, UPDATE and DELETE statements on this connection so far.
///
/// # Errors
///
/// Returns `SqlFacadeError::SqliteError` if the counter cannot be read.
pub fn total_changes(conn: &Connection) -> Result<i64, SqlFacadeError> {
    Ok(conn.query_row("SELECT total_changes()", [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_result_set_per_row_returning_statement() {
        let conn = Connection::open_in_memory().unwrap();
        let sets = run_statements(
            &conn,
            "create table t(a int); insert into t values (1),(2); select a from t order by a; select 'x' as b where 0;",
            &[],
            ReadMode::Materialize,
        )
        .unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].len(), 2);
        assert_eq!(sets[0].results[1].get("a"), Some(&RowValues::Int(2)));
        assert!(sets[1].is_empty());
        assert_eq!(sets[1].get_column_names().as_slice(), ["b".to_string()]);
    }

    #[test]
    fn first_row_mode_keeps_one_row() {
        let conn = Connection::open_in_memory().unwrap();
        let sets = run_statements(
            &conn,
            "select 1 as n union all select 2; select 3 as m;",
            &[],
            ReadMode::FirstRow,
        )
        .unwrap();

        assert_eq!(sets[0].len(), 1);
        assert_eq!(sets[0].first_value(), Some(&RowValues::Int(1)));
        assert!(sets[1].is_empty());
    }

    #[test]
    fn parameters_bind_in_every_statement() {
        let conn = Connection::open_in_memory().unwrap();
        let params = vec![BoundParameter::input("v", RowValues::Int(7))];
        let sets = run_statements(
            &conn,
            "select @v as first; select @v + 1 as second;",
            &params,
            ReadMode::Materialize,
        )
        .unwrap();

        assert_eq!(sets[0].first_value(), Some(&RowValues::Int(7)));
        assert_eq!(sets[1].first_value(), Some(&RowValues::Int(8)));
    }

    #[test]
    fn changes_are_counted_for_dml_only() {
        let conn = Connection::open_in_memory().unwrap();
        let before = total_changes(&conn).unwrap();
        run_statements(
            &conn,
            "create table t(a int); insert into t values (1),(2),(3); update t set a = a + 1 where a > 1;",
            &[],
            ReadMode::Discard,
        )
        .unwrap();
        assert_eq!(total_changes(&conn).unwrap() - before, 5);
    }
}
