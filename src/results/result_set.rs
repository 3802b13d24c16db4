use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::row::CustomDbRow;
use crate::types::RowValues;

/// One materialized result set.
///
/// Rows keep driver-reported order; the column list is captured once from the
/// result set's metadata and shared by every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// The rows returned by the statement
    pub results: Vec<CustomDbRow>,
    column_names: Arc<Vec<String>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>) -> ResultSet {
        ResultSet {
            results: Vec::new(),
            column_names,
        }
    }

    /// Get the column names for this result set
    #[must_use]
    pub fn get_column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results
            .push(CustomDbRow::new(Arc::clone(&self.column_names), row_values));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First column of the first row, if any.
    #[must_use]
    pub fn first_value(&self) -> Option<&RowValues> {
        self.results.first().and_then(|row| row.get_by_index(0))
    }

    /// The result set as an array of row mappings.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.results.iter().map(CustomDbRow::to_json).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Arc<Vec<String>> {
        Arc::new(names.iter().map(|n| (*n).to_string()).collect())
    }

    #[test]
    fn rows_render_in_column_order() {
        let mut set = ResultSet::new(columns(&["b", "a"]));
        set.add_row_values(vec![RowValues::Int(2), RowValues::Text("x".into())]);

        let rendered = serde_json::to_string(&set.to_json()).unwrap();
        assert_eq!(rendered, r#"[{"b":2,"a":"x"}]"#);
    }

    #[test]
    fn duplicate_column_names_keep_last_value() {
        let mut set = ResultSet::new(columns(&["X", "X"]));
        set.add_row_values(vec![RowValues::Int(1), RowValues::Int(2)]);

        assert_eq!(set.to_json(), json!([{ "X": 2 }]));
        assert_eq!(set.results[0].get("X"), Some(&RowValues::Int(2)));
    }

    #[test]
    fn first_value_of_empty_set_is_none() {
        let set = ResultSet::new(columns(&["X"]));
        assert!(set.is_empty());
        assert_eq!(set.first_value(), None);
    }
}
