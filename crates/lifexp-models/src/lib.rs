//! lifexp-models: aggregation, regression and plotting for a
//! life-expectancy dashboard over the gapminder dataset.
//!
//! The data pipeline (`preprocessing`) averages observations per country and
//! log2-transforms them; the model pipeline (`pipeline`) fits one of three
//! regressors on population and income to predict life expectancy, then
//! samples it over a mesh for plotting or evaluates it at a single point.
//! `report` renders plotly figures and a maud HTML dashboard.
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod session;
pub mod stats;

pub use config::{ModelKind, ModelType, PipelineConfig, PrepareConfig};
pub use error::PipelineError;
pub use pipeline::{predict, visualize};
pub use preprocessing::prepare;
