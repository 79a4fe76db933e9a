//! `lifexp train`: fit a model and write its prediction surface.
use anyhow::{Context, Result};

use lifexp_models::config::{ModelKind, PipelineConfig};
use lifexp_models::data_handling::DatasetCache;
use lifexp_models::session::DashboardSession;

use crate::util::{load_dataset, write_html};

pub fn run(
    cache: &mut DatasetCache,
    data: &str,
    model: ModelKind,
    output_file: &str,
    config: &PipelineConfig,
) -> Result<()> {
    let table = load_dataset(cache, data)?;
    let (session, figure) = DashboardSession::new()
        .train(&table, model, config)
        .with_context(|| format!("Failed to train {}", model))?;
    log::debug!("Session after training: {:?}", session);

    println!(
        "Trained {} on {} countries ({} x {} mesh)",
        figure.model,
        figure.labels.len(),
        figure.mesh.x_axis.len(),
        figure.mesh.y_axis.len()
    );
    write_html(output_file, &figure.to_plot().to_html())
}
