use ndarray::{Array1, Array2};

use crate::error::{PipelineError, Result};

/// Contract shared by the dashboard's regression estimators.
///
/// Rows of `x` are samples; columns are the (already transformed) predictors.
pub trait RegressorModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`. Fails with `NotFitted` before `fit`.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    fn is_fitted(&self) -> bool;

    /// Human readable name for the model
    fn name(&self) -> &'static str;
}

/// Shape checks every estimator runs before fitting.
pub(crate) fn check_training_data(
    model: &'static str,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(PipelineError::Fit {
            model,
            reason: "training data is empty".to_string(),
        });
    }
    if x.nrows() != y.len() {
        return Err(PipelineError::Fit {
            model,
            reason: format!("{} feature rows but {} targets", x.nrows(), y.len()),
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(PipelineError::Fit {
            model,
            reason: "training data contains non-finite values".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_feature_count(expected: usize, x: &Array2<f64>) -> Result<()> {
    if x.ncols() != expected {
        return Err(PipelineError::ShapeMismatch {
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}
