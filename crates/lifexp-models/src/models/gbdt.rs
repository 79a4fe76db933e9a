use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::{Array1, Array2};

use crate::config::ModelType;
use crate::error::{PipelineError, Result};
use crate::models::regressor_trait::{check_feature_count, check_training_data, RegressorModel};

/// Loss for every fit. Life expectancy is a continuous target.
const REGRESSION_LOSS: &str = "SquaredError";

/// Gradient Boosting Decision Tree (GBDT) regressor, standing in for LightGBM.
pub struct GBDTRegressor {
    model: Option<GBDT>,
    n_features: usize,
    params: ModelType,
}

impl GBDTRegressor {
    pub fn new(params: ModelType) -> Self {
        GBDTRegressor {
            model: None,
            n_features: 0,
            params,
        }
    }
}

fn to_data_vec(x: &Array2<f64>, y: Option<&Array1<f64>>) -> DataVec {
    let mut data = DataVec::with_capacity(x.nrows());
    for (i, row) in x.outer_iter().enumerate() {
        let features = row.iter().map(|&v| v as f32).collect();
        match y {
            Some(y) => data.push(Data::new_training_data(features, 1.0, y[i] as f32, None)),
            None => data.push(Data::new_test_data(features, None)),
        }
    }
    data
}

impl RegressorModel for GBDTRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_data(self.name(), x, y)?;

        match &self.params {
            ModelType::GBDT {
                learning_rate,
                n_estimators,
                max_depth,
                min_leaf_size,
                debug,
                training_optimization_level,
            } => {
                if *n_estimators == 0 {
                    return Err(PipelineError::InvalidConfig(
                        "n_estimators must be at least 1".to_string(),
                    ));
                }
                let mut config = Config::new();

                config.set_feature_size(x.ncols());
                config.set_shrinkage(*learning_rate);
                config.set_max_depth(*max_depth);
                config.set_iterations(*n_estimators);
                config.set_min_leaf_size(*min_leaf_size);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(REGRESSION_LOSS);

                log::debug!(
                    "Fitting GBDT with {} trees, max_depth {}, min_leaf_size {}, shrinkage {}",
                    n_estimators,
                    max_depth,
                    min_leaf_size,
                    learning_rate
                );

                let mut gbdt = GBDT::new(&config);
                let mut train_x = to_data_vec(x, Some(y));
                gbdt.fit(&mut train_x);

                self.n_features = x.ncols();
                self.model = Some(gbdt);
                Ok(())
            }
            other => Err(PipelineError::InvalidConfig(format!(
                "Expected ModelType::GBDT params, got {:?}",
                other
            ))),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(PipelineError::NotFitted(self.name()))?;
        check_feature_count(self.n_features, x)?;
        if x.nrows() == 0 {
            return Ok(Array1::zeros(0));
        }
        let test_x = to_data_vec(x, None);
        let predictions = model.predict(&test_x);
        Ok(predictions.into_iter().map(|v| v as f64).collect())
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &'static str {
        "Light Gradient Boosting Machine"
    }
}
