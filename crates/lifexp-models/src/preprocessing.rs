//! Aggregation and log-transform stage of the data pipeline.
//!
//! `prepare` reduces the observation table to one row per key (mean across
//! rows), drops the excluded columns and keeps only numeric ones, then
//! applies log2 element-wise. The output keeps the key labels aligned
//! row-for-row so they can be re-attached to plots.
use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use statrs::statistics::Statistics;

use crate::config::PrepareConfig;
use crate::data_handling::{ColumnValues, DataTable};
use crate::error::{PipelineError, Result};

/// Aggregated, log2-transformed table.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTable {
    pub columns: Vec<String>,
    /// Rows follow `labels`; columns follow `columns`.
    pub values: Array2<f64>,
    pub labels: Vec<String>,
}

impl PreparedTable {
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.index_of(name)?;
        Ok(self.values.column(idx))
    }

    /// Copy the named columns, in order, into a new matrix.
    pub fn select(&self, names: &[&str]) -> Result<Array2<f64>> {
        let indices = names
            .iter()
            .map(|n| self.index_of(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.values.select(Axis(1), &indices))
    }
}

/// Base-2 log, rejecting values outside its domain.
pub fn log2_transform(value: f64) -> Option<f64> {
    if value > 0.0 && value.is_finite() {
        Some(value.log2())
    } else {
        None
    }
}

/// Exact inverse of `log2_transform`.
pub fn inverse_transform(value: f64) -> f64 {
    value.exp2()
}

/// Run the data pipeline on `table`.
pub fn prepare(table: &DataTable, config: &PrepareConfig) -> Result<PreparedTable> {
    let keys = table.labels(&config.key_column)?;
    for excluded in &config.excluded_columns {
        table.column(excluded)?;
    }
    if table.nrows() == 0 {
        return Err(PipelineError::EmptyTable);
    }

    let retained: Vec<(&str, &[f64])> = table
        .columns()
        .iter()
        .filter(|c| c.name != config.key_column)
        .filter(|c| !config.excluded_columns.contains(&c.name))
        .filter_map(|c| match &c.values {
            ColumnValues::Numeric(v) => Some((c.name.as_str(), v.as_slice())),
            ColumnValues::Text(_) => None,
        })
        .collect();
    if retained.is_empty() {
        return Err(PipelineError::NoNumericColumns);
    }

    // BTreeMap gives ascending key order.
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.iter().enumerate() {
        groups.entry(key.as_str()).or_default().push(row);
    }

    let mut values = Array2::<f64>::zeros((groups.len(), retained.len()));
    let mut labels = Vec::with_capacity(groups.len());
    for (g, (key, rows)) in groups.iter().enumerate() {
        for (c, (name, column)) in retained.iter().enumerate() {
            let mean = rows
                .iter()
                .map(|&r| column[r])
                .filter(|v| !v.is_nan())
                .mean();
            values[(g, c)] = log2_transform(mean).ok_or_else(|| PipelineError::DomainViolation {
                column: name.to_string(),
                label: key.to_string(),
                value: mean,
            })?;
        }
        labels.push(key.to_string());
    }

    log::info!(
        "Aggregated {} rows into {} groups by '{}' ({} numeric columns)",
        table.nrows(),
        labels.len(),
        config.key_column,
        retained.len()
    );

    Ok(PreparedTable {
        columns: retained.iter().map(|(name, _)| name.to_string()).collect(),
        values,
        labels,
    })
}
