use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};
use crate::math::pinv_solve_symmetric;
use crate::models::regressor_trait::{check_feature_count, check_training_data, RegressorModel};

/// Ordinary least squares with an optional intercept.
///
/// Coefficients are the minimum-norm least-squares solution, so designs with
/// fewer samples than predictors still fit deterministically.
pub struct LinearRegressor {
    fit_intercept: bool,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(fit_intercept: bool) -> Self {
        LinearRegressor {
            fit_intercept,
            coefficients: None,
            intercept: 0.0,
        }
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl RegressorModel for LinearRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_training_data(self.name(), x, y)?;

        let (x_offset, y_offset) = if self.fit_intercept {
            // mean_axis only fails on an empty axis, which was rejected above
            let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(x.ncols()));
            (x_mean, y.mean().unwrap_or(0.0))
        } else {
            (Array1::zeros(x.ncols()), 0.0)
        };

        let x_centered = x - &x_offset;
        let y_centered = y - y_offset;

        let gram = x_centered.t().dot(&x_centered);
        let rhs = x_centered.t().dot(&y_centered);
        let coefficients = pinv_solve_symmetric(&gram, &rhs);

        self.intercept = y_offset - x_offset.dot(&coefficients);
        log::debug!(
            "Fitted linear regression: coefficients {:?}, intercept {}",
            coefficients.to_vec(),
            self.intercept
        );
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(PipelineError::NotFitted(self.name()))?;
        check_feature_count(coefficients.len(), x)?;
        Ok(x.dot(coefficients) + self.intercept)
    }

    fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    fn name(&self) -> &'static str {
        "Linear Regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn recovers_exact_coefficients() {
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0], [0.5, 0.0]];
        let y = x.column(0).mapv(|v| 2.0 * v) - x.column(1).mapv(|v| 0.5 * v) + 7.0;

        let mut model = LinearRegressor::new(true);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] + 0.5).abs() < 1e-9);
        assert!((model.intercept() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn two_samples_two_features_matches_minimum_norm() {
        let x = array![[1.0, 3.0], [3.0, 4.0]];
        let y = array![10.0, 14.0];
        let mut model = LinearRegressor::new(true);
        model.fit(&x, &y).unwrap();

        // Training points are interpolated exactly.
        let pred = model.predict(&x).unwrap();
        assert!((pred[0] - 10.0).abs() < 1e-9);
        assert!((pred[1] - 14.0).abs() < 1e-9);

        // Coefficients lie along the difference vector d = (2, 1): w = d * dy / |d|^2.
        let coef = model.coefficients().unwrap();
        assert!((coef[0] - 1.6).abs() < 1e-9);
        assert!((coef[1] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn predict_before_fit_errors() {
        let model = LinearRegressor::new(true);
        let err = model.predict(&array![[1.0, 2.0]]).unwrap_err();
        assert_eq!(err, PipelineError::NotFitted("Linear Regression"));
    }

    #[test]
    fn wrong_feature_count_errors() {
        let mut model = LinearRegressor::new(false);
        model.fit(&array![[1.0], [2.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0, 2.0]]),
            Err(PipelineError::ShapeMismatch { expected: 1, found: 2 })
        ));
    }
}
