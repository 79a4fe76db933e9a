//! `lifexp dataset`: headline metrics and a preview of the raw table.
use anyhow::{Context, Result};

use lifexp_models::data_handling::{DataTable, DatasetCache};
use lifexp_models::stats::{headline_metrics, yearly_means};

use crate::util::load_dataset;

pub fn run(cache: &mut DatasetCache, data: &str, rows: usize) -> Result<()> {
    let table = load_dataset(cache, data)?;
    let means = yearly_means(&table, "year").context("Failed to summarise dataset by year")?;
    let metrics = headline_metrics(&means)?;

    for metric in &metrics {
        println!(
            "{:<16} {:>18} ({})",
            metric.label,
            metric.display_value(),
            metric.display_delta()
        );
    }
    println!();
    print!("{}", format_preview(&table.head(rows)));
    Ok(())
}

/// Tab-separated header plus rows.
pub fn format_preview(table: &DataTable) -> String {
    let mut out = table.column_names().join("\t");
    out.push('\n');
    for row in 0..table.nrows() {
        let line = table
            .columns()
            .iter()
            .map(|c| c.values.cell(row).unwrap_or_default())
            .collect::<Vec<String>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
