pub mod gbdt;
pub mod linear;
pub mod svr;

pub mod factory;
pub mod regressor_trait;

pub use factory::{build_model, resolve_model};
pub use regressor_trait::RegressorModel;
