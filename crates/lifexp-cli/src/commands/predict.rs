//! `lifexp predict`: one life-expectancy prediction for raw inputs.
use anyhow::{Context, Result};

use lifexp_models::config::{ModelKind, PipelineConfig};
use lifexp_models::data_handling::DatasetCache;
use lifexp_models::pipeline;

use crate::util::load_dataset;

pub fn run(
    cache: &mut DatasetCache,
    data: &str,
    model: ModelKind,
    gdp: f64,
    pop: f64,
    config: &PipelineConfig,
) -> Result<f64> {
    let table = load_dataset(cache, data)?;
    let predicted = pipeline::predict(&table, model.name(), gdp, pop, config)
        .with_context(|| format!("{} prediction failed", model))?;
    println!("{:.3}", predicted);
    Ok(predicted)
}
