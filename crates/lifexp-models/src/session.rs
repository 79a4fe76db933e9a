//! Explicit dashboard state: whether a model has been trained yet.
//!
//! The session is a plain value. Operations that change it take `self`
//! and hand back the new session, so callers thread it through explicitly.
use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, PipelineConfig};
use crate::data_handling::DataTable;
use crate::error::{PipelineError, Result};
use crate::pipeline::{self, SurfaceFigure};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSession {
    pub model_trained: bool,
    pub model: Option<ModelKind>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit `model` and render its surface, returning the session marked as trained.
    pub fn train(
        self,
        table: &DataTable,
        model: ModelKind,
        config: &PipelineConfig,
    ) -> Result<(DashboardSession, SurfaceFigure)> {
        let figure = pipeline::visualize(table, model.name(), config)?;
        let session = DashboardSession {
            model_trained: true,
            model: Some(model),
        };
        Ok((session, figure))
    }

    /// Predict with the session's model. The estimator is refitted from scratch.
    pub fn predict(
        &self,
        table: &DataTable,
        raw_gdp: f64,
        raw_pop: f64,
        config: &PipelineConfig,
    ) -> Result<f64> {
        match (self.model_trained, self.model) {
            (true, Some(model)) => pipeline::predict(table, model.name(), raw_gdp, raw_pop, config),
            _ => Err(PipelineError::ModelNotTrained),
        }
    }
}
