//! JSON-shaped result rows and typed access.
//!
//! ClickHouse result sets arrive as JSON objects (one per row), so a [`Row`]
//! wraps a `serde_json` map and exposes typed access via serde.

use crate::error::{ChError, ChResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A single result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl Row {
    /// Create a row from a JSON object map.
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Get the raw JSON value of a column, if present.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Get a column value deserialized into `T`.
    ///
    /// Returns [`ChError::Decode`] when the column is missing or its value
    /// does not deserialize into `T`.
    pub fn try_get<T: DeserializeOwned>(&self, column: &str) -> ChResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| ChError::decode(column, "column not found"))?;
        serde_json::from_value(value.clone()).map_err(|e| ChError::decode(column, e.to_string()))
    }

    /// Deserialize the whole row into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> ChResult<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ChError::decode("<row>", e.to_string()))
    }

    /// Iterate over column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Row {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

/// Map a slice of rows into typed values.
pub fn rows_as<T: DeserializeOwned>(rows: &[Row]) -> ChResult<Vec<T>> {
    rows.iter().map(Row::deserialize).collect()
}
