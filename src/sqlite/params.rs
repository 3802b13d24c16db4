use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlFacadeError;
use crate::params::BoundParameter;
use crate::types::RowValues;

/// Prefixes `SQLite` accepts for named parameters.
const NAME_PREFIXES: [char; 3] = ['@', ':', '$'];

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bind every parameter the statement references.
///
/// Names match case-insensitively and regardless of the `@`, `:` or `$`
/// prefix, so `id` and `@ID` both bind `@Id`. Parameters the statement does
/// not mention are skipped, and so are statement slots no parameter names,
/// which `SQLite` leaves NULL. Output-only parameters bind as NULL.
///
/// # Errors
///
/// Returns `SqlFacadeError::SqliteError` if rusqlite rejects a binding.
pub fn bind_named(stmt: &mut Statement<'_>, params: &[BoundParameter]) -> Result<(), SqlFacadeError> {
    for param in params {
        let value = if param.direction.sends_value() {
            row_value_to_sqlite_value(&param.value)
        } else {
            Value::Null
        };
        for slot in parameter_slots(stmt, &param.name) {
            stmt.raw_bind_parameter(slot, &value)?;
        }
    }
    Ok(())
}

/// One-based indexes of every named slot matching `name`.
fn parameter_slots(stmt: &Statement<'_>, name: &str) -> Vec<usize> {
    let bare = name.strip_prefix(NAME_PREFIXES).unwrap_or(name);
    (1..=stmt.parameter_count())
        .filter(|&idx| {
            stmt.parameter_name(idx)
                .and_then(|slot| slot.strip_prefix(NAME_PREFIXES))
                .is_some_and(|slot| slot.eq_ignore_ascii_case(bare))
        })
        .collect()
}

/// Final values of output-capturing parameters.
///
/// `SQLite` statements cannot assign to parameters, so `InputOutput` values
/// come back unchanged and `Output` / `ReturnValue` come back NULL.
#[must_use]
pub fn captured_outputs(params: &[BoundParameter]) -> Vec<(String, RowValues)> {
    params
        .iter()
        .filter(|p| p.direction.captures_output())
        .map(|p| {
            let value = if p.direction.sends_value() {
                p.value.clone()
            } else {
                RowValues::Null
            };
            (p.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterDirection;
    use rusqlite::Connection;

    #[test]
    fn binds_bare_and_prefixed_names() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("select @a, :b, $c, @unused").unwrap();
        let params = vec![
            BoundParameter::input("a", RowValues::Int(1)),
            BoundParameter::input(":b", RowValues::Text("two".into())),
            BoundParameter::input("c", RowValues::Bool(true)),
            BoundParameter::input("not_in_statement", RowValues::Int(9)),
        ];
        bind_named(&mut stmt, &params).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, i64>(0).unwrap(), 1);
        assert_eq!(row.get::<_, String>(1).unwrap(), "two");
        assert_eq!(row.get::<_, i64>(2).unwrap(), 1);
        assert_eq!(row.get::<_, Option<i64>>(3).unwrap(), None);
    }

    #[test]
    fn names_match_without_regard_to_case_or_prefix() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("select @Id, :id, $OTHER").unwrap();
        let params = vec![
            BoundParameter::input("id", RowValues::Int(5)),
            BoundParameter::input("@Other", RowValues::Int(6)),
        ];
        bind_named(&mut stmt, &params).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, i64>(0).unwrap(), 5);
        assert_eq!(row.get::<_, i64>(1).unwrap(), 5);
        assert_eq!(row.get::<_, i64>(2).unwrap(), 6);
    }

    #[test]
    fn output_only_parameters_bind_null() {
        let conn = Connection::open_in_memory().unwrap();
        let mut stmt = conn.prepare("select @Total").unwrap();
        let params = vec![BoundParameter::new(
            "Total",
            ParameterDirection::Output,
            RowValues::Int(5),
        )];
        bind_named(&mut stmt, &params).unwrap();

        let mut rows = stmt.raw_query();
        let row = rows.next().unwrap().unwrap();
        assert_eq!(row.get::<_, Option<i64>>(0).unwrap(), None);
    }

    #[test]
    fn captured_outputs_follow_direction() {
        let params = vec![
            BoundParameter::input("In", RowValues::Int(1)),
            BoundParameter::new("Out", ParameterDirection::Output, RowValues::Int(2)),
            BoundParameter::new("Both", ParameterDirection::InputOutput, RowValues::Int(3)),
        ];
        assert_eq!(
            captured_outputs(&params),
            vec![
                ("Out".to_string(), RowValues::Null),
                ("Both".to_string(), RowValues::Int(3)),
            ]
        );
    }
}
