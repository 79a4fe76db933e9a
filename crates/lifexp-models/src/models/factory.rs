use crate::config::{ModelKind, ModelType};
use crate::error::Result;
use crate::models::gbdt::GBDTRegressor;
use crate::models::linear::LinearRegressor;
use crate::models::regressor_trait::RegressorModel;
use crate::models::svr::SVRRegressor;

/// Build a boxed, unfitted regressor from a `ModelType`.
pub fn build_model(params: ModelType) -> Box<dyn RegressorModel> {
    match params {
        ModelType::Linear { fit_intercept } => Box::new(LinearRegressor::new(fit_intercept)),
        ModelType::SVR { .. } => Box::new(SVRRegressor::new(params)),
        ModelType::GBDT { .. } => Box::new(GBDTRegressor::new(params)),
    }
}

/// Look up a model by its display name and build it with default hyper-parameters.
///
/// Every call returns a new instance; nothing is shared between calls.
pub fn resolve_model(name: &str) -> Result<Box<dyn RegressorModel>> {
    let kind: ModelKind = name.parse()?;
    Ok(build_model(ModelType::default_for(kind)))
}
