//! Integration tests for dashboard config parsing and util helpers.

use lifexp_cli::config::{parse_model_name, DashboardConfig};
use lifexp_cli::util::{load_dataset, validate_tsv_or_csv_file, write_html};
use lifexp_models::config::ModelKind;
use lifexp_models::data_handling::DatasetCache;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/gapminder_sample.csv");

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file / load_dataset
// ---------------------------------------------------------------------------

#[test]
fn validate_csv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.csv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/data.csv").is_err());
}

#[test]
fn load_dataset_reads_once_per_path() {
    let mut cache = DatasetCache::new();
    let first = load_dataset(&mut cache, SAMPLE).unwrap();
    let second = load_dataset(&mut cache, SAMPLE).unwrap();
    assert_eq!(cache.len(), 1);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.nrows(), 24);
}

#[test]
fn write_html_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out.html");
    write_html(path.to_str().unwrap(), "<p>ok</p>").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>ok</p>");
}

// ---------------------------------------------------------------------------
// parse_model_name
// ---------------------------------------------------------------------------

#[test]
fn short_and_full_model_names() {
    assert_eq!(parse_model_name("linear").unwrap(), ModelKind::LinearRegression);
    assert_eq!(parse_model_name("SVR").unwrap(), ModelKind::SupportVectorRegression);
    assert_eq!(
        parse_model_name("lgbm").unwrap(),
        ModelKind::LightGradientBoostingMachine
    );
    assert_eq!(
        parse_model_name("Support Vector Regression").unwrap(),
        ModelKind::SupportVectorRegression
    );
    assert!(parse_model_name("random forest").is_err());
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

#[test]
fn config_defaults() {
    let cfg = DashboardConfig::default();
    assert_eq!(cfg.model, "linear");
    assert_eq!(cfg.countries, vec!["Turkey".to_string(), "Germany".to_string()]);
    assert!(cfg.mean_line);
    assert!(cfg.gdp.is_none() && cfg.pop.is_none());
}

#[test]
fn partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.json");
    std::fs::write(
        &path,
        r#"{"data": "gapminder.csv", "model": "svr", "preview_rows": "many", "gdp": 1000.0}"#,
    )
    .unwrap();

    let cfg = DashboardConfig::load(&path).unwrap();
    assert_eq!(cfg.data, "gapminder.csv");
    assert_eq!(cfg.model, "svr");
    assert_eq!(cfg.gdp, Some(1000.0));
    // invalid value falls back
    assert_eq!(cfg.preview_rows, DashboardConfig::default().preview_rows);
    assert_eq!(cfg.pipeline.mesh_step, 0.02);
}

#[test]
fn unreadable_config_errors() {
    assert!(DashboardConfig::load("/nonexistent/dashboard.json").is_err());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(DashboardConfig::load(&path).is_err());
}

#[test]
fn to_options_maps_fields() {
    let cfg = DashboardConfig {
        model: "lgbm".to_string(),
        variable: Some("pop".to_string()),
        gdp: Some(2000.0),
        pop: Some(5e6),
        mean_line: false,
        ..DashboardConfig::default()
    };
    let options = cfg.to_options().unwrap();
    assert_eq!(options.model, Some(ModelKind::LightGradientBoostingMachine));
    assert_eq!(options.variables, vec!["pop".to_string()]);
    assert_eq!(options.prediction, Some((2000.0, 5e6)));
    assert!(!options.mean_line);
}

#[test]
fn to_options_requires_both_prediction_inputs() {
    let cfg = DashboardConfig {
        pop: Some(5e6),
        ..DashboardConfig::default()
    };
    assert!(cfg.to_options().is_err());
}

#[test]
fn config_serializes_to_json() {
    let json = serde_json::to_string_pretty(&DashboardConfig::default()).unwrap();
    assert!(json.contains("\"countries\""));
    assert!(json.contains("\"pipeline\""));
}
