//! Dashboard assembly on the bundled sample dataset.

use lifexp_models::config::ModelKind;
use lifexp_models::io::read_table;
use lifexp_models::report::dashboard::{build_dashboard, DashboardOptions};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/gapminder_sample.csv");

#[test]
fn sample_dataset_loads() {
    let table = read_table(SAMPLE).unwrap();
    assert_eq!(table.nrows(), 24);
    assert!(table.column("continent").is_ok());
    assert_eq!(table.numeric("year").unwrap()[0], 1952.0);
}

#[test]
fn dashboard_has_four_sections() {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = read_table(SAMPLE).unwrap();
    let options = DashboardOptions {
        prediction: Some((5000.0, 1.0e7)),
        ..DashboardOptions::default()
    };
    let report = build_dashboard(&table, &options).unwrap();
    let ids: Vec<&str> = report.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["gapminder", "dataset", "charts", "modelling"]);

    let html = report.render().into_string();
    assert!(html.contains("Life Expectancy"));
    assert!(html.contains("Trained Linear Regression on 8 countries"));
    assert!(html.contains("Predicted life expectancy"));
    assert!(html.contains("pred_surface"));
}

#[test]
fn dashboard_without_model_skips_prediction() {
    let table = read_table(SAMPLE).unwrap();
    let options = DashboardOptions {
        model: None,
        prediction: Some((5000.0, 1.0e7)),
        ..DashboardOptions::default()
    };
    // a prediction needs a trained session
    assert!(build_dashboard(&table, &options).is_err());

    let options = DashboardOptions {
        model: None,
        ..DashboardOptions::default()
    };
    let html = build_dashboard(&table, &options).unwrap().render().into_string();
    assert!(html.contains("No model selected."));
}

#[test]
fn dashboard_trains_each_model() {
    let table = read_table(SAMPLE).unwrap();
    for kind in ModelKind::ALL {
        let options = DashboardOptions {
            model: Some(kind),
            variables: vec!["lifeExp".to_string()],
            ..DashboardOptions::default()
        };
        let html = build_dashboard(&table, &options).unwrap().render().into_string();
        assert!(html.contains(kind.name()));
    }
}

#[test]
fn dashboard_saves_to_file() {
    let table = read_table(SAMPLE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.html");
    build_dashboard(&table, &DashboardOptions::default())
        .unwrap()
        .save_to_file(&path)
        .unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
}
