//! Delimited-text reader for observation tables.
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::data_handling::{Column, DataTable};

/// Configuration for reading CSV/TSV observation tables.
#[derive(Debug, Clone)]
pub struct TableReaderConfig {
    pub delimiter: u8,
}

impl Default for TableReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
        }
    }
}

impl TableReaderConfig {
    /// Default configuration, switching to tab-delimited for `.tsv` paths.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let is_tsv = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        Self {
            delimiter: if is_tsv { b'\t' } else { b',' },
            ..Self::default()
        }
    }
}

/// Read a CSV or TSV observation table, inferring the delimiter from the extension.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<DataTable> {
    let config = TableReaderConfig::for_path(&path);
    read_table_with_config(path, &config)
}

/// Read an observation table using a custom configuration.
///
/// A column is numeric when every non-empty cell parses as `f64`; empty
/// cells in a numeric column become `NaN`.
pub fn read_table_with_config<P: AsRef<Path>>(
    path: P,
    config: &TableReaderConfig,
) -> Result<DataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(&path)
        .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
        for (idx, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing value for column {} at row {}", idx, row_idx + 1))?;
            column.push(value.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    let table = DataTable::new(columns).context("Failed to build observation table")?;
    log::debug!(
        "Read {} rows x {} columns from {}",
        table.nrows(),
        table.ncols(),
        path.as_ref().display()
    );
    Ok(table)
}

fn infer_column(name: &str, values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|v| {
            if v.is_empty() {
                Some(f64::NAN)
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();
    match parsed {
        Some(numbers) if values.iter().any(|v| !v.is_empty()) => Column::numeric(name, numbers),
        _ => Column::text(name, values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn infers_numeric_and_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gapminder.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "country,continent,year,pop,gdpPercap,lifeExp").unwrap();
        writeln!(file, "Norway,Europe,1952,3327728,10095.42,72.67").unwrap();
        writeln!(file, "Norway,Europe,1957,3491938,,73.44").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.nrows(), 2);
        assert!(!table.column("country").unwrap().is_numeric());
        assert!(table.column("year").unwrap().is_numeric());
        assert!(table.numeric("gdpPercap").unwrap()[1].is_nan());
    }

    #[test]
    fn reads_tab_delimited_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gapminder.tsv");
        std::fs::write(&path, "country\tpop\nChad\t2682462\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.numeric("pop").unwrap(), &[2682462.0]);
    }

    #[test]
    fn loads_every_header_column_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gapminder.txt");
        std::fs::write(&path, "country;iso_alpha;pop\nChad;TCD;1\n").unwrap();
        let config = TableReaderConfig { delimiter: b';' };
        let table = read_table_with_config(&path, &config).unwrap();
        assert_eq!(table.column_names(), vec!["country", "iso_alpha", "pop"]);
    }
}
