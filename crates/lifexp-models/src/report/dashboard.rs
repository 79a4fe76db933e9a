use anyhow::{Context, Result};
use maud::html;
use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, PipelineConfig};
use crate::data_handling::DataTable;
use crate::report::html::{metrics_markup, table_markup, DashboardReport, ReportSection};
use crate::report::plots::{plot_income_life_scatter, plot_indicator_trend, validate_variables};
use crate::session::DashboardSession;
use crate::stats::{headline_metrics, yearly_means};

/// What to put on the dashboard beyond the dataset overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    pub countries: Vec<String>,
    pub variables: Vec<String>,
    pub mean_line: bool,
    /// Year for the income/life-expectancy bubble chart; the latest year when unset.
    pub scatter_year: Option<i64>,
    pub model: Option<ModelKind>,
    /// Raw `(gdpPercap, pop)` to predict for once the model is trained.
    pub prediction: Option<(f64, f64)>,
    pub preview_rows: usize,
    pub pipeline: PipelineConfig,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            countries: vec!["Turkey".to_string(), "Germany".to_string()],
            variables: vec![
                "lifeExp".to_string(),
                "gdpPercap".to_string(),
                "pop".to_string(),
            ],
            mean_line: true,
            scatter_year: None,
            model: Some(ModelKind::LinearRegression),
            prediction: None,
            preview_rows: 20,
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Build the overview, dataset, charts and modelling sections for `table`.
pub fn build_dashboard(table: &DataTable, options: &DashboardOptions) -> Result<DashboardReport> {
    let mut report = DashboardReport::new("Life Expectancy Prediction with the Gapminder Dataset");

    let mut overview = ReportSection::new("gapminder", "Gapminder");
    overview.add_content(html! {
        h3 { "What is Gapminder?" }
        p {
            "Gapminder identifies systematic misconceptions about important global trends and "
            "proportions, and uses reliable data to develop easy-to-understand teaching materials "
            "that free people from those misconceptions."
        }
        p { "Gapminder is an independent Swedish foundation with " strong { "no political, religious or economic affiliations" } "." }
    });
    report.add_section(overview);

    let means = yearly_means(table, "year").context("Failed to summarise dataset by year")?;
    let metrics = headline_metrics(&means).context("Failed to compute headline metrics")?;
    let mut dataset = ReportSection::new("dataset", "Dataset Overview");
    dataset.add_content(metrics_markup(&metrics));
    dataset.add_content(html! {
        p { (table.nrows()) " rows, showing the first " (options.preview_rows.min(table.nrows())) "." }
    });
    dataset.add_content(table_markup(&table.head(options.preview_rows)));
    report.add_section(dataset);

    let mut charts = ReportSection::new("charts", "Visualisations");
    if options.countries.is_empty() {
        charts.add_content(html! { p { "No countries selected." } });
    } else {
        validate_variables(table, &options.variables)?;
        for variable in &options.variables {
            let plot = plot_indicator_trend(table, &options.countries, variable, options.mean_line)
                .with_context(|| format!("Failed to plot '{}'", variable))?;
            charts.add_plot(&plot);
        }
    }
    let scatter_year = options.scatter_year.or_else(|| means.years.last().copied());
    if let Some(year) = scatter_year {
        let plot = plot_income_life_scatter(table, year)
            .with_context(|| format!("Failed to plot income against life expectancy for {}", year))?;
        charts.add_plot(&plot);
    }
    report.add_section(charts);

    let mut modelling = ReportSection::new("modelling", "Modelling");
    let session = DashboardSession::new();
    let session = match options.model {
        Some(kind) => {
            let (session, figure) = session
                .train(table, kind, &options.pipeline)
                .with_context(|| format!("Failed to train {}", kind))?;
            modelling.add_content(html! { p { "Trained " (kind.name()) " on " (figure.labels.len()) " countries." } });
            modelling.add_plot(&figure.to_plot());
            session
        }
        None => {
            modelling.add_content(html! { p { "No model selected." } });
            session
        }
    };
    if let Some((gdp, pop)) = options.prediction {
        let predicted = session
            .predict(table, gdp, pop, &options.pipeline)
            .context("Failed to predict life expectancy")?;
        modelling.add_content(html! {
            p {
                "Predicted life expectancy for GDP per capita " (gdp) " and population " (pop) ": "
                strong { (format!("{:.2}", predicted)) }
            }
        });
    }
    report.add_section(modelling);

    Ok(report)
}
