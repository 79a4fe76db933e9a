//! Model pipeline: fit an estimator on the prepared table, then either
//! sample it over a mesh for plotting or evaluate it at a single point.
//!
//! Every call re-runs the data pipeline and fits a new estimator. Nothing
//! fitted outlives the call.
use itertools_num::linspace;
use ndarray::{arr2, Array1, Array2};
use plotly::Plot;

use crate::config::{ModelKind, ModelType, PipelineConfig};
use crate::data_handling::DataTable;
use crate::error::{PipelineError, Result};
use crate::models::{build_model, RegressorModel};
use crate::preprocessing::{inverse_transform, log2_transform, prepare, PreparedTable};
use crate::report::plots::plot_surface;

/// Regular lattice over the observed predictor ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub step: f64,
    /// `arange(x_min, x_max, step)`; `x_max` itself is excluded.
    pub x_axis: Vec<f64>,
    pub y_axis: Vec<f64>,
}

/// Upper bound on the number of points along one mesh axis.
pub const MAX_AXIS_POINTS: usize = 1_000_000;

/// `start, start + step, ...` up to but excluding `stop`.
///
/// Fails with `InvalidConfig` when the axis would hold more than
/// `MAX_AXIS_POINTS` values.
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(stop > start) {
        return Ok(Vec::new());
    }
    let n = ((stop - start) / step).ceil();
    if !n.is_finite() || n > MAX_AXIS_POINTS as f64 {
        return Err(PipelineError::InvalidConfig(format!(
            "mesh step {} gives {} points over [{}, {}), above the limit of {}",
            step, n, start, stop, MAX_AXIS_POINTS
        )));
    }
    let n = n as usize;
    if n == 0 {
        return Ok(Vec::new());
    }
    let last = start + (n - 1) as f64 * step;
    Ok(linspace(start, last, n).collect())
}

impl MeshGrid {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64), step: f64, margin: f64) -> Result<Self> {
        let (x_min, x_max) = (x_range.0 - margin, x_range.1 + margin);
        let (y_min, y_max) = (y_range.0 - margin, y_range.1 + margin);
        Ok(MeshGrid {
            x_min,
            x_max,
            y_min,
            y_max,
            step,
            x_axis: arange(x_min, x_max, step)?,
            y_axis: arange(y_min, y_max, step)?,
        })
    }

    pub fn len(&self) -> usize {
        self.x_axis.len() * self.y_axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten the lattice row-major over `y`, one `[x, y]` row per point.
    pub fn points(&self) -> Array2<f64> {
        let mut points = Array2::<f64>::zeros((self.len(), 2));
        let nx = self.x_axis.len();
        for (j, &y) in self.y_axis.iter().enumerate() {
            for (i, &x) in self.x_axis.iter().enumerate() {
                points[(j * nx + i, 0)] = x;
                points[(j * nx + i, 1)] = y;
            }
        }
        points
    }
}

/// Actual observations plus the fitted prediction surface, in log2 units.
#[derive(Debug, Clone)]
pub struct SurfaceFigure {
    pub model: &'static str,
    pub x_label: String,
    pub y_label: String,
    pub z_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Country for each scatter point.
    pub labels: Vec<String>,
    pub mesh: MeshGrid,
    /// `surface[j][i]` is the prediction at `(mesh.x_axis[i], mesh.y_axis[j])`.
    pub surface: Vec<Vec<f64>>,
}

impl SurfaceFigure {
    pub fn to_plot(&self) -> Plot {
        plot_surface(self)
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

type Training = (Box<dyn RegressorModel>, Array2<f64>, Array1<f64>);

/// Prepare `table`, then fit a new estimator built from `params` on
/// `predictors -> target`.
fn fit_on_prepared(
    prepared: &PreparedTable,
    params: ModelType,
    config: &PipelineConfig,
) -> Result<Training> {
    let predictors = [config.predictors[0].as_str(), config.predictors[1].as_str()];
    let x = prepared.select(&predictors)?;
    let y = prepared.column(&config.target)?.to_owned();

    let mut model = build_model(params);
    model.fit(&x, &y)?;
    log::info!(
        "Fitted {} on {} samples ({} + {} -> {})",
        model.name(),
        x.nrows(),
        predictors[0],
        predictors[1],
        config.target
    );
    Ok((model, x, y))
}

/// Fit the named model and sample it over the predictors' observed ranges.
pub fn visualize(table: &DataTable, model_name: &str, config: &PipelineConfig) -> Result<SurfaceFigure> {
    let kind: ModelKind = model_name.parse()?;
    visualize_with(table, ModelType::default_for(kind), config)
}

/// `visualize` with explicit hyper-parameters.
pub fn visualize_with(
    table: &DataTable,
    params: ModelType,
    config: &PipelineConfig,
) -> Result<SurfaceFigure> {
    config.validate()?;
    let prepared = prepare(table, &config.prepare)?;
    let (model, x, y) = fit_on_prepared(&prepared, params, config)?;

    let xs = x.column(0).to_vec();
    let ys = x.column(1).to_vec();
    let mesh = MeshGrid::new(min_max(&xs), min_max(&ys), config.mesh_step, config.mesh_margin)?;
    log::debug!(
        "Prediction mesh: {} x {} points (step {})",
        mesh.x_axis.len(),
        mesh.y_axis.len(),
        mesh.step
    );

    let surface = if mesh.is_empty() {
        Vec::new()
    } else {
        let predictions = model.predict(&mesh.points())?;
        predictions
            .to_vec()
            .chunks(mesh.x_axis.len())
            .map(|row| row.to_vec())
            .collect()
    };

    Ok(SurfaceFigure {
        model: model.name(),
        x_label: config.predictors[0].clone(),
        y_label: config.predictors[1].clone(),
        z_label: config.target.clone(),
        x: xs,
        y: ys,
        z: y.to_vec(),
        labels: prepared.labels,
        mesh,
        surface,
    })
}

/// Predict life expectancy, in raw units, for raw GDP per capita and population.
pub fn predict(
    table: &DataTable,
    model_name: &str,
    raw_gdp: f64,
    raw_pop: f64,
    config: &PipelineConfig,
) -> Result<f64> {
    let kind: ModelKind = model_name.parse()?;
    predict_with(table, ModelType::default_for(kind), raw_gdp, raw_pop, config)
}

/// `predict` with explicit hyper-parameters.
pub fn predict_with(
    table: &DataTable,
    params: ModelType,
    raw_gdp: f64,
    raw_pop: f64,
    config: &PipelineConfig,
) -> Result<f64> {
    config.validate()?;
    let input = |column: &str, value: f64| {
        log2_transform(value).ok_or_else(|| PipelineError::DomainViolation {
            column: column.to_string(),
            label: "prediction input".to_string(),
            value,
        })
    };
    let pop = input(&config.predictors[0], raw_pop)?;
    let gdp = input(&config.predictors[1], raw_gdp)?;

    let prepared = prepare(table, &config.prepare)?;
    let (model, _, _) = fit_on_prepared(&prepared, params, config)?;

    let point = arr2(&[[pop, gdp]]);
    let prediction = model.predict(&point)?;
    let value = prediction.get(0).copied().ok_or(PipelineError::ShapeMismatch {
        expected: 1,
        found: 0,
    })?;
    let result = inverse_transform(value);
    log::info!(
        "{} predicts {} = {:.3} for gdp {} and pop {}",
        model.name(),
        config.target,
        result,
        raw_gdp,
        raw_pop
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arange_excludes_stop() {
        let axis = arange(0.0, 1.0, 0.25).unwrap();
        assert_eq!(axis, vec![0.0, 0.25, 0.5, 0.75]);
        let axis = arange(0.0, 1.1, 0.25).unwrap();
        assert_eq!(axis.len(), 5);
        assert_eq!(axis[4], 1.0);
    }

    #[test]
    fn arange_is_empty_for_degenerate_range() {
        assert!(arange(1.0, 1.0, 0.02).unwrap().is_empty());
        assert!(arange(2.0, 1.0, 0.02).unwrap().is_empty());
    }

    #[test]
    fn arange_rejects_oversized_axes() {
        assert!(matches!(
            arange(10.0, 20.0, 1e-300),
            Err(PipelineError::InvalidConfig(_))
        ));
        assert!(arange(0.0, 10.0, 1e-6).is_err());
        assert!(arange(f64::MIN, f64::MAX, 1.0).is_err());
    }

    #[test]
    fn mesh_points_are_row_major_over_y() {
        let mesh = MeshGrid::new((0.0, 0.75), (10.0, 10.5), 0.25, 0.0).unwrap();
        assert_eq!(mesh.x_axis.len(), 3);
        assert_eq!(mesh.y_axis.len(), 2);
        let points = mesh.points();
        assert_eq!(points.nrows(), 6);
        assert_eq!(points[(1, 0)], mesh.x_axis[1]);
        assert_eq!(points[(1, 1)], 10.0);
        assert_eq!(points[(3, 0)], 0.0);
        assert_eq!(points[(3, 1)], mesh.y_axis[1]);
    }
}
