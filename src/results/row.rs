use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::types::RowValues;

/// A row from a database query result
///
/// Column names are shared with every other row of the same result set.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomDbRow {
    /// The column names for this row, in driver-reported order
    pub column_names: Arc<Vec<String>>,
    /// The values for this row, aligned with `column_names`
    pub rows: Vec<RowValues>,
}

impl CustomDbRow {
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        Self { column_names, rows }
    }

    /// Get a value from the row by column name
    ///
    /// When a result set repeats a column name, the last column with that
    /// name wins, matching the mapping produced by [`CustomDbRow::to_json`].
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        let idx = self.column_names.iter().rposition(|col| col == column_name)?;
        self.rows.get(idx)
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Column-name to value mapping, keys in column order.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = JsonMap::with_capacity(self.column_names.len());
        for (name, value) in self.column_names.iter().zip(&self.rows) {
            map.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(map)
    }
}
