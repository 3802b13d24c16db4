//! Turns raw reader output into the single public result shape.

use crate::executor::ReaderOutput;
use crate::results::ExecutionResult;

/// Shape the output of a reader-mode execution.
///
/// Captured output parameters always produce [`ExecutionResult::Shaped`] with
/// every result set under `Data`. Without them, several result sets are
/// returned as they are, one result set is unwrapped, and none yields
/// [`ExecutionResult::NoResult`].
#[must_use]
pub fn shape_reader_output(output: ReaderOutput) -> ExecutionResult {
    let ReaderOutput {
        mut result_sets,
        outputs,
    } = output;

    if !outputs.is_empty() {
        return ExecutionResult::Shaped {
            outputs,
            data: result_sets,
        };
    }
    if result_sets.len() > 1 {
        return ExecutionResult::ResultSets(result_sets);
    }
    result_sets
        .pop()
        .map_or(ExecutionResult::NoResult, ExecutionResult::RowSet)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::results::ResultSet;
    use crate::types::RowValues;

    fn one_row(column: &str, value: i64) -> ResultSet {
        let mut set = ResultSet::new(Arc::new(vec![column.to_string()]));
        set.add_row_values(vec![RowValues::Int(value)]);
        set
    }

    #[test]
    fn no_result_sets_is_no_result() {
        let shaped = shape_reader_output(ReaderOutput::default());
        assert_eq!(shaped, ExecutionResult::NoResult);
        assert_eq!(shaped.to_json(), json!(null));
    }

    #[test]
    fn single_result_set_is_unwrapped() {
        let shaped = shape_reader_output(ReaderOutput {
            result_sets: vec![one_row("X", 1)],
            outputs: vec![],
        });
        assert_eq!(shaped.to_json(), json!([{ "X": 1 }]));
        assert!(matches!(shaped, ExecutionResult::RowSet(_)));
    }

    #[test]
    fn several_result_sets_are_returned_whole() {
        let shaped = shape_reader_output(ReaderOutput {
            result_sets: vec![one_row("A", 1), one_row("B", 2)],
            outputs: vec![],
        });
        assert_eq!(shaped.to_json(), json!([[{ "A": 1 }], [{ "B": 2 }]]));
    }

    #[test]
    fn outputs_disable_unwrapping() {
        let outputs = vec![("Total".to_string(), RowValues::Int(42))];

        let one = shape_reader_output(ReaderOutput {
            result_sets: vec![one_row("X", 1)],
            outputs: outputs.clone(),
        });
        assert_eq!(one.to_json(), json!({ "Total": 42, "Data": [[{ "X": 1 }]] }));
        assert_eq!(one.output("Total"), Some(&RowValues::Int(42)));

        let none = shape_reader_output(ReaderOutput {
            result_sets: vec![],
            outputs,
        });
        assert_eq!(none.to_json(), json!({ "Total": 42, "Data": [] }));
    }
}
