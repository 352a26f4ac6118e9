use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Value;

use super::row::{Row, build_index};

/// An ordered sequence of rows returned by a read statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query.
    pub rows: Vec<Row>,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names shared by all rows of this set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(build_index(&column_names)));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append one row of values. Column names must be set first.
    pub fn push_values(&mut self, values: Vec<Value>) {
        if let (Some(names), Some(index)) = (&self.column_names, &self.column_index) {
            self.rows
                .push(Row::with_index(names.clone(), index.clone(), values));
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_names() {
        let mut set = ResultSet::with_capacity(2);
        set.set_column_names(Arc::new(vec!["a".to_string()]));
        set.push_values(vec![Value::Int(1)]);
        set.push_values(vec![Value::Int(2)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.rows[1].get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn push_without_columns_is_dropped() {
        let mut set = ResultSet::default();
        set.push_values(vec![Value::Int(1)]);
        assert!(set.is_empty());
    }
}
