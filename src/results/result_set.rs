use std::collections::HashMap;
use std::sync::Arc;

use super::row::Row;
use crate::types::RowValues;

/// Rows produced by a statement, in the order the database returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create an empty result set for the given columns.
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, capacity: usize) -> Self {
        // First occurrence wins when a query returns duplicate column names.
        let mut index = HashMap::with_capacity(column_names.len());
        for (i, name) in column_names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            column_names: Arc::new(column_names),
            column_index: Arc::new(index),
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push_row(&mut self, values: Vec<RowValues>) {
        self.rows.push(Row::new(
            Arc::clone(&self.column_names),
            Arc::clone(&self.column_index),
            values,
        ));
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column across all rows; `None` if the column does not exist.
    #[must_use]
    pub fn column(&self, column_name: &str) -> Option<Vec<&RowValues>> {
        let idx = *self.column_index.get(column_name)?;
        Some(self.rows.iter().filter_map(|row| row.get_by_index(idx)).collect())
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
