use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::result_set::ResultSet;
use crate::types::RowValues;

/// Key holding the result sets of a query that captured output parameters.
pub const DATA_KEY: &str = "Data";

/// The normalized outcome of one facade call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    /// A query produced no result set.
    NoResult,
    /// Exactly one result set, returned unwrapped.
    RowSet(ResultSet),
    /// Two or more result sets, in driver order.
    ResultSets(Vec<ResultSet>),
    /// Captured output parameters plus every result set, never unwrapped.
    Shaped {
        outputs: Vec<(String, RowValues)>,
        data: Vec<ResultSet>,
    },
    /// The single value of a scalar call.
    Scalar(RowValues),
    /// Rows affected by a non-query call.
    AffectedCount(i64),
}

impl ExecutionResult {
    /// Encode into the language-agnostic shape returned across the interop
    /// boundary.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use sql_facade::prelude::*;
    ///
    /// let shaped = ExecutionResult::Shaped {
    ///     outputs: vec![("Total".to_string(), RowValues::Int(42))],
    ///     data: vec![],
    /// };
    /// assert_eq!(shaped.to_json(), json!({ "Total": 42, "Data": [] }));
    /// ```
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            ExecutionResult::NoResult => JsonValue::Null,
            ExecutionResult::RowSet(set) => set.to_json(),
            ExecutionResult::ResultSets(sets) => result_sets_to_json(sets),
            ExecutionResult::Shaped { outputs, data } => {
                let mut map = JsonMap::with_capacity(outputs.len() + 1);
                for (name, value) in outputs {
                    map.insert(name.clone(), value.to_json());
                }
                map.insert(DATA_KEY.to_string(), result_sets_to_json(data));
                JsonValue::Object(map)
            }
            ExecutionResult::Scalar(value) => value.to_json(),
            ExecutionResult::AffectedCount(count) => JsonValue::from(*count),
        }
    }

    /// The captured value of an output parameter, when this is a shaped result.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&RowValues> {
        match self {
            ExecutionResult::Shaped { outputs, .. } => outputs
                .iter()
                .rev()
                .find(|(param, _)| param == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn result_sets_to_json(sets: &[ResultSet]) -> JsonValue {
    JsonValue::Array(sets.iter().map(ResultSet::to_json).collect())
}
