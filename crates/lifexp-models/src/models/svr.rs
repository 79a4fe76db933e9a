use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmError, SvmParams};
use ndarray::{Array1, Array2};
use statrs::statistics::Statistics;

use crate::config::{ModelType, SvrGamma};
use crate::error::{PipelineError, Result};
use crate::models::regressor_trait::{check_feature_count, check_training_data, RegressorModel};

/// Epsilon support vector regression with an RBF kernel.
pub struct SVRRegressor {
    model: Option<Svm<f64, f64>>,
    n_features: usize,
    params: ModelType,
}

impl SVRRegressor {
    pub fn new(params: ModelType) -> Self {
        SVRRegressor {
            model: None,
            n_features: 0,
            params,
        }
    }
}

/// Resolve the RBF coefficient. `Scale` uses `1 / (n_features * var(X))`
/// over every element of `x`, and 1.0 when that variance is zero.
pub fn resolve_gamma(gamma: SvrGamma, x: &Array2<f64>) -> f64 {
    match gamma {
        SvrGamma::Value(g) => g,
        SvrGamma::Scale => {
            let var = x.iter().population_variance();
            if var > 0.0 {
                1.0 / (x.ncols() as f64 * var)
            } else {
                1.0
            }
        }
    }
}

impl RegressorModel for SVRRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_data(self.name(), x, y)?;

        let ModelType::SVR {
            c,
            epsilon,
            gamma,
            tol,
        } = &self.params
        else {
            return Err(PipelineError::InvalidConfig(format!(
                "Expected ModelType::SVR params, got {:?}",
                self.params
            )));
        };

        let gamma = resolve_gamma(*gamma, x);
        if !(gamma > 0.0) || !gamma.is_finite() {
            return Err(PipelineError::InvalidConfig(format!(
                "SVR gamma must be positive, got {}",
                gamma
            )));
        }
        log::debug!(
            "Fitting SVR with C = {}, epsilon = {}, gamma = {}, tol = {}",
            c,
            epsilon,
            gamma,
            tol
        );

        let dataset = Dataset::new(x.to_owned(), y.to_owned());

        // linfa's Gaussian kernel is exp(-|x - y|^2 / eps), so eps = 1 / gamma.
        let params: SvmParams<f64, f64> = Svm::<f64, f64>::params()
            .eps(*tol)
            .c_svr(*c, Some(*epsilon))
            .gaussian_kernel(1.0 / gamma);

        let fitted: std::result::Result<Svm<f64, f64>, SvmError> = params.fit(&dataset);
        let model = fitted.map_err(|e| PipelineError::Fit {
            model: "Support Vector Regression",
            reason: e.to_string(),
        })?;

        self.n_features = x.ncols();
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(PipelineError::NotFitted(self.name()))?;
        check_feature_count(self.n_features, x)?;
        let predictions: Array1<f64> = model.predict(x);
        Ok(predictions)
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &'static str {
        "Support Vector Regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelKind;
    use ndarray::array;

    #[test]
    fn scale_gamma_uses_overall_variance() {
        let x = array![[0.0, 2.0], [2.0, 0.0]];
        // var over all four elements = 1.0
        assert!((resolve_gamma(SvrGamma::Scale, &x) - 0.5).abs() < 1e-12);
        let constant = array![[3.0, 3.0], [3.0, 3.0]];
        assert_eq!(resolve_gamma(SvrGamma::Scale, &constant), 1.0);
        assert_eq!(resolve_gamma(SvrGamma::Value(0.25), &x), 0.25);
    }

    #[test]
    fn fits_and_predicts_finite_values() {
        let x = Array2::from_shape_fn((20, 2), |(i, j)| i as f64 * 0.3 + j as f64 * 0.1);
        let y = x.column(0).mapv(|v| (v * 0.5).sin() + 5.0);

        let mut model = SVRRegressor::new(ModelType::default_for(ModelKind::SupportVectorRegression));
        assert!(!model.is_fitted());
        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted());

        let pred = model.predict(&x).unwrap();
        assert_eq!(pred.len(), 20);
        assert!(pred.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn rejects_mismatched_params() {
        let mut model = SVRRegressor::new(ModelType::default_for(ModelKind::LinearRegression));
        let x = array![[1.0, 2.0], [2.0, 3.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(model.fit(&x, &y), Err(PipelineError::InvalidConfig(_))));
    }
}
