//! In-memory observation table and the dataset cache.
//!
//! `DataTable` is a small column store: each column is either numeric or
//! text, and all columns share one length. It is immutable after loading;
//! every helper returns a new table.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell rendered as a string (numbers use their shortest round-trip form).
    pub fn cell(&self, row: usize) -> Option<String> {
        match self {
            ColumnValues::Numeric(v) => v.get(row).map(|x| format_number(*x)),
            ColumnValues::Text(v) => v.get(row).cloned(),
        }
    }

    fn take(&self, rows: &[usize]) -> ColumnValues {
        match self {
            ColumnValues::Numeric(v) => ColumnValues::Numeric(rows.iter().map(|&i| v[i]).collect()),
            ColumnValues::Text(v) => ColumnValues::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

impl Column {
    pub fn numeric(name: &str, values: Vec<f64>) -> Self {
        Column {
            name: name.to_string(),
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: &str, values: Vec<String>) -> Self {
        Column {
            name: name.to_string(),
            values: ColumnValues::Text(values),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }
}

/// Observation table: one row per (country, year).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<Column>,
    nrows: usize,
}

impl DataTable {
    /// Build a table from columns, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let nrows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.values.len() != nrows) {
            return Err(PipelineError::ShapeMismatch {
                expected: nrows,
                found: bad.values.len(),
            });
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(PipelineError::InvalidConfig(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }
        Ok(DataTable { columns, nrows })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match &self.column(name)?.values {
            ColumnValues::Numeric(v) => Ok(v),
            ColumnValues::Text(_) => Err(PipelineError::InvalidConfig(format!(
                "column '{}' is not numeric",
                name
            ))),
        }
    }

    /// Column values as strings, whatever their type. Used for grouping keys.
    pub fn labels(&self, name: &str) -> Result<Vec<String>> {
        let column = self.column(name)?;
        Ok(match &column.values {
            ColumnValues::Text(v) => v.clone(),
            ColumnValues::Numeric(v) => v.iter().map(|x| format_number(*x)).collect(),
        })
    }

    /// Keep the rows whose `column` value is one of `values`.
    pub fn filter_by(&self, column: &str, values: &[String]) -> Result<DataTable> {
        let keep: HashSet<&str> = values.iter().map(String::as_str).collect();
        let labels = self.labels(column)?;
        let rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| keep.contains(label.as_str()))
            .map(|(i, _)| i)
            .collect();
        Ok(self.take_rows(&rows))
    }

    /// First `n` rows (or fewer when the table is shorter).
    pub fn head(&self, n: usize) -> DataTable {
        let rows: Vec<usize> = (0..self.nrows.min(n)).collect();
        self.take_rows(&rows)
    }

    fn take_rows(&self, rows: &[usize]) -> DataTable {
        DataTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values.take(rows),
                })
                .collect(),
            nrows: rows.len(),
        }
    }
}

fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

/// Memoises loaded datasets by a constant load key (the dataset path).
///
/// Entries are never invalidated: the dataset is static for the lifetime of
/// the process. `clear` exists so tests can force a reload.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<String, Arc<DataTable>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F>(&mut self, key: &str, loader: F) -> anyhow::Result<Arc<DataTable>>
    where
        F: FnOnce() -> anyhow::Result<DataTable>,
    {
        if let Some(table) = self.entries.get(key) {
            log::debug!("Dataset cache hit for '{}'", key);
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(loader()?);
        log::info!(
            "Loaded dataset '{}' with {} rows and {} columns",
            key,
            table.nrows(),
            table.ncols()
        );
        self.entries.insert(key.to_string(), Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::new(vec![
            Column::text("country", vec!["A".into(), "B".into(), "A".into()]),
            Column::numeric("year", vec![1952.0, 1952.0, 1957.0]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = DataTable::new(vec![
            Column::numeric("a", vec![1.0, 2.0]),
            Column::numeric("b", vec![1.0]),
        ])
        .unwrap_err();
        assert_eq!(err, PipelineError::ShapeMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn filter_keeps_matching_rows_in_order() {
        let filtered = table().filter_by("country", &["A".to_string()]).unwrap();
        assert_eq!(filtered.nrows(), 2);
        assert_eq!(filtered.numeric("year").unwrap(), &[1952.0, 1957.0]);
    }

    #[test]
    fn numeric_labels_are_formatted_without_fraction() {
        assert_eq!(table().labels("year").unwrap()[0], "1952");
    }

    #[test]
    fn cache_loads_once_per_key() {
        let mut cache = DatasetCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache
                .get_or_load("gapminder", || {
                    calls += 1;
                    Ok(table())
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}
