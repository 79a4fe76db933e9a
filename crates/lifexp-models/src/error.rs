use std::error::Error;
use std::fmt;

/// Failures raised by the data and model pipelines.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A column required by the pipeline is absent from the table.
    MissingColumn(String),
    /// Nothing numeric is left after dropping the key and excluded columns.
    NoNumericColumns,
    EmptyTable,
    /// A value reaching the log2 transform was not strictly positive.
    DomainViolation {
        column: String,
        label: String,
        value: f64,
    },
    UnknownModel(String),
    Fit {
        model: &'static str,
        reason: String,
    },
    NotFitted(&'static str),
    InvalidConfig(String),
    /// A prediction was requested before any model was trained in the session.
    ModelNotTrained,
    ShapeMismatch {
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::MissingColumn(name) => write!(f, "Missing column '{}'", name),
            PipelineError::NoNumericColumns => {
                write!(f, "No numeric columns remain after preprocessing")
            }
            PipelineError::EmptyTable => write!(f, "Input table has no rows"),
            PipelineError::DomainViolation {
                column,
                label,
                value,
            } => write!(
                f,
                "log2 is undefined for {} = {} ({}); values must be strictly positive",
                column, value, label
            ),
            PipelineError::UnknownModel(name) => write!(
                f,
                "Unknown model: {}. Valid options are: Linear Regression, Support Vector Regression, Light Gradient Boosting Machine",
                name
            ),
            PipelineError::Fit { model, reason } => {
                write!(f, "Failed to fit {}: {}", model, reason)
            }
            PipelineError::NotFitted(model) => {
                write!(f, "{} must be fitted before calling predict", model)
            }
            PipelineError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            PipelineError::ModelNotTrained => {
                write!(f, "Train a model before requesting a prediction")
            }
            PipelineError::ShapeMismatch { expected, found } => write!(
                f,
                "Expected {} feature columns, got {}",
                expected, found
            ),
        }
    }
}

impl Error for PipelineError {}

pub type Result<T> = std::result::Result<T, PipelineError>;
