//! `lifexp report`: the full single-page dashboard.
use anyhow::{Context, Result};

use lifexp_models::data_handling::DatasetCache;
use lifexp_models::report::dashboard::build_dashboard;

use crate::config::DashboardConfig;
use crate::util::load_dataset;

pub fn run(cache: &mut DatasetCache, config: &DashboardConfig) -> Result<()> {
    if config.data.is_empty() {
        anyhow::bail!("No dataset given: pass a CSV path or set 'data' in the config file");
    }
    let options = config.to_options()?;
    let table = load_dataset(cache, &config.data)?;
    let report = build_dashboard(&table, &options).context("Failed to build dashboard")?;
    report.save_to_file(&config.output_file)?;
    println!("Dashboard written to {}", config.output_file);
    Ok(())
}
