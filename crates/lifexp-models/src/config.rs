use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// The three estimators a user can pick from the dashboard.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    #[serde(rename = "Linear Regression")]
    LinearRegression,
    #[serde(rename = "Support Vector Regression")]
    SupportVectorRegression,
    #[serde(rename = "Light Gradient Boosting Machine")]
    LightGradientBoostingMachine,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::LinearRegression,
        ModelKind::SupportVectorRegression,
        ModelKind::LightGradientBoostingMachine,
    ];

    /// Display name, which is also the only accepted identifier.
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "Linear Regression",
            ModelKind::SupportVectorRegression => "Support Vector Regression",
            ModelKind::LightGradientBoostingMachine => "Light Gradient Boosting Machine",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| PipelineError::UnknownModel(s.to_string()))
    }
}

/// Kernel coefficient for the RBF support vector regressor.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SvrGamma {
    /// `1 / (n_features * var(X))`, falling back to 1.0 for constant inputs.
    Scale,
    Value(f64),
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    Linear {
        fit_intercept: bool,
    },
    SVR {
        c: f64,
        epsilon: f64,
        gamma: SvrGamma,
        tol: f64,
    },
    GBDT {
        learning_rate: f32,
        n_estimators: usize,
        max_depth: u32,
        min_leaf_size: usize,
        debug: bool,
        training_optimization_level: u8,
    },
}

impl ModelType {
    /// Library-default hyper-parameters for `kind`.
    pub fn default_for(kind: ModelKind) -> Self {
        match kind {
            ModelKind::LinearRegression => ModelType::Linear {
                fit_intercept: true,
            },
            ModelKind::SupportVectorRegression => ModelType::SVR {
                c: 1.0,
                epsilon: 0.1,
                gamma: SvrGamma::Scale,
                tol: 1e-3,
            },
            ModelKind::LightGradientBoostingMachine => ModelType::GBDT {
                learning_rate: 0.1,
                n_estimators: 100,
                max_depth: 5,
                min_leaf_size: 20,
                debug: false,
                training_optimization_level: 2,
            },
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelType::Linear { .. } => ModelKind::LinearRegression,
            ModelType::SVR { .. } => ModelKind::SupportVectorRegression,
            ModelType::GBDT { .. } => ModelKind::LightGradientBoostingMachine,
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::default_for(ModelKind::LinearRegression)
    }
}

impl FromStr for ModelType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind: ModelKind = s.parse()?;
        Ok(ModelType::default_for(kind))
    }
}

/// Aggregation settings for the data pipeline.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PrepareConfig {
    /// Rows sharing this key are averaged into one row.
    pub key_column: String,
    /// Columns dropped after aggregation. Each must be present.
    pub excluded_columns: Vec<String>,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            key_column: "country".to_string(),
            excluded_columns: vec!["year".to_string()],
        }
    }
}

/// Settings shared by `visualize` and `predict`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub prepare: PrepareConfig,
    /// Population and income columns, in the order fed to the estimator.
    pub predictors: [String; 2],
    pub target: String,
    /// Spacing of the prediction mesh, in log2 units.
    pub mesh_step: f64,
    pub mesh_margin: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prepare: PrepareConfig::default(),
            predictors: ["pop".to_string(), "gdpPercap".to_string()],
            target: "lifeExp".to_string(),
            mesh_step: 0.02,
            mesh_margin: 0.0,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.mesh_step > 0.0) || !self.mesh_step.is_finite() {
            return Err(PipelineError::InvalidConfig(format!(
                "mesh_step must be a positive number, got {}",
                self.mesh_step
            )));
        }
        if !(self.mesh_margin >= 0.0) || !self.mesh_margin.is_finite() {
            return Err(PipelineError::InvalidConfig(format!(
                "mesh_margin must be non-negative, got {}",
                self.mesh_margin
            )));
        }
        if self.predictors[0] == self.predictors[1] {
            return Err(PipelineError::InvalidConfig(
                "the two predictor columns must differ".to_string(),
            ));
        }
        if self.predictors.contains(&self.target) {
            return Err(PipelineError::InvalidConfig(format!(
                "target '{}' cannot also be a predictor",
                self.target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_exact_display_names() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.name().parse::<ModelKind>().unwrap(), kind);
        }
        assert!("linear regression".parse::<ModelKind>().is_err());
        assert!("Random Forest".parse::<ModelKind>().is_err());
    }

    #[test]
    fn default_for_round_trips_kind() {
        for kind in ModelKind::ALL {
            assert_eq!(ModelType::default_for(kind).kind(), kind);
        }
    }

    #[test]
    fn rejects_non_positive_mesh_step() {
        let cfg = PipelineConfig {
            mesh_step: 0.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))));
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
