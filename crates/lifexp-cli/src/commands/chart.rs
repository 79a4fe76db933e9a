//! `lifexp chart`: indicator trends for selected countries.
use anyhow::{Context, Result};

use lifexp_models::data_handling::DatasetCache;
use lifexp_models::report::html::{DashboardReport, ReportSection};
use lifexp_models::report::plots::{plot_income_life_scatter, plot_indicator_trend, validate_variables};

use crate::util::{load_dataset, write_html};

#[derive(Debug, Clone)]
pub struct ChartArgs {
    pub data: String,
    pub countries: Vec<String>,
    pub variable: String,
    pub mean_line: bool,
    /// Also draw the income/life-expectancy bubble chart for this year.
    pub year: Option<i64>,
    pub output_file: String,
}

pub fn run(cache: &mut DatasetCache, args: &ChartArgs) -> Result<()> {
    let table = load_dataset(cache, &args.data)?;
    validate_variables(&table, std::slice::from_ref(&args.variable))?;

    let mut section = ReportSection::new("charts", &args.variable);
    let trend = plot_indicator_trend(&table, &args.countries, &args.variable, args.mean_line)
        .with_context(|| format!("Failed to plot '{}'", args.variable))?;
    section.add_plot(&trend);
    if let Some(year) = args.year {
        section.add_plot(&plot_income_life_scatter(&table, year)?);
    }

    let mut report = DashboardReport::new(&format!("{} by year", args.variable));
    report.add_section(section);
    write_html(&args.output_file, &report.render().into_string())
}
