use std::collections::BTreeMap;

use plotly::common::{DashType, Line, Marker, Mode};
use plotly::layout::{Axis, AxisType, LayoutScene, Legend};
use plotly::{Layout, Plot, Scatter, Scatter3D, Surface};
use statrs::statistics::Statistics;

use crate::data_handling::DataTable;
use crate::error::{PipelineError, Result};
use crate::pipeline::SurfaceFigure;

/// Line chart of `variable` over `year`, one trace per selected country.
///
/// With `mean_line`, a dashed black line marks the mean of `variable` over
/// the selected rows.
pub fn plot_indicator_trend(
    table: &DataTable,
    countries: &[String],
    variable: &str,
    mean_line: bool,
) -> Result<Plot> {
    let selected = table.filter_by("country", countries)?;
    let years = selected.numeric("year")?;
    let values = selected.numeric(variable)?;
    let labels = selected.labels("country")?;

    let mut plot = Plot::new();
    for country in countries {
        let (xs, ys): (Vec<f64>, Vec<f64>) = labels
            .iter()
            .zip(years.iter().zip(values.iter()))
            .filter(|(label, _)| *label == country)
            .map(|(_, (&year, &value))| (year, value))
            .unzip();
        if xs.is_empty() {
            log::warn!("No rows for country '{}'; skipping trace", country);
            continue;
        }
        plot.add_trace(Scatter::new(xs, ys).mode(Mode::Lines).name(country));
    }

    if mean_line && !values.is_empty() {
        let mean = values.iter().filter(|v| !v.is_nan()).mean();
        let (start, end) = years
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| (lo.min(y), hi.max(y)));
        plot.add_trace(
            Scatter::new(vec![start, end], vec![mean, mean])
                .mode(Mode::Lines)
                .name("Mean")
                .line(Line::new().color("black").dash(DashType::Dash)),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(format!("{} across selected countries", variable).as_str())
            .x_axis(Axis::new().title("Year"))
            .y_axis(Axis::new().title(variable))
            .legend(Legend::new().title("Countries")),
    );

    Ok(plot)
}

/// 3-D scatter of the observations overlaid with the model's prediction surface.
pub fn plot_surface(figure: &SurfaceFigure) -> Plot {
    let mut plot = Plot::new();

    let scatter = Scatter3D::new(figure.x.clone(), figure.y.clone(), figure.z.clone())
        .mode(Mode::Markers)
        .marker(Marker::new().size(5))
        .text_array(figure.labels.clone())
        .name("countries");
    plot.add_trace(scatter);

    if !figure.surface.is_empty() {
        let surface = Surface::new(figure.surface.clone())
            .x(figure.mesh.x_axis.clone())
            .y(figure.mesh.y_axis.clone())
            .name("pred_surface");
        plot.add_trace(surface);
    }

    plot.set_layout(
        Layout::new()
            .title(format!("{} prediction surface (log2 scale)", figure.model).as_str())
            .scene(
                LayoutScene::new()
                    .x_axis(Axis::new().title(figure.x_label.as_str()))
                    .y_axis(Axis::new().title(figure.y_label.as_str()))
                    .z_axis(Axis::new().title(figure.z_label.as_str())),
            ),
    );

    plot
}

/// Largest marker diameter in the income/life-expectancy bubble chart.
const BUBBLE_SIZE_MAX: f64 = 60.0;

/// Bubble chart of income against life expectancy for one year.
///
/// Markers are sized by population (area-proportional, largest = 60px)
/// and grouped into one trace per continent. The x axis is logarithmic
/// and a dashed reference line marks a life expectancy of 50.
pub fn plot_income_life_scatter(table: &DataTable, year: i64) -> Result<Plot> {
    let years = table.numeric("year")?;
    let gdp = table.numeric("gdpPercap")?;
    let life = table.numeric("lifeExp")?;
    let pop = table.numeric("pop")?;
    let countries = table.labels("country")?;
    let continents = match table.labels("continent") {
        Ok(labels) => labels,
        Err(_) => vec!["All".to_string(); table.nrows()],
    };

    let rows: Vec<usize> = (0..table.nrows())
        .filter(|&r| years[r].round() as i64 == year)
        .collect();
    if rows.is_empty() {
        return Err(PipelineError::InvalidConfig(format!("no rows for year {}", year)));
    }
    let max_pop = rows.iter().map(|&r| pop[r]).fold(0.0f64, f64::max);

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &r in &rows {
        groups.entry(continents[r].as_str()).or_default().push(r);
    }

    let mut plot = Plot::new();
    for (continent, members) in &groups {
        let sizes: Vec<usize> = members
            .iter()
            .map(|&r| {
                let relative = if max_pop > 0.0 { pop[r] / max_pop } else { 0.0 };
                (relative.max(0.0).sqrt() * BUBBLE_SIZE_MAX).round().max(1.0) as usize
            })
            .collect();
        let trace = Scatter::new(
            members.iter().map(|&r| gdp[r]).collect::<Vec<f64>>(),
            members.iter().map(|&r| life[r]).collect::<Vec<f64>>(),
        )
        .mode(Mode::Markers)
        .name(continent)
        .text_array(members.iter().map(|&r| countries[r].clone()).collect::<Vec<String>>())
        .marker(Marker::new().size_array(sizes));
        plot.add_trace(trace);
    }

    plot.add_trace(
        Scatter::new(vec![100.0, 100000.0], vec![50.0, 50.0])
            .mode(Mode::Lines)
            .name("lifeExp = 50")
            .line(Line::new().color("black").dash(DashType::Dash)),
    );

    plot.set_layout(
        Layout::new()
            .title(format!("Income and life expectancy in {}", year).as_str())
            .x_axis(
                Axis::new()
                    .title("gdpPercap")
                    .type_(AxisType::Log)
                    .range(vec![2.0, 5.0]),
            )
            .y_axis(Axis::new().title("lifeExp").range(vec![25.0, 90.0])),
    );

    Ok(plot)
}

/// Check that every requested variable exists and is numeric before plotting.
pub fn validate_variables(table: &DataTable, variables: &[String]) -> Result<()> {
    for variable in variables {
        if variable == "year" || variable == "country" {
            return Err(PipelineError::InvalidConfig(format!(
                "'{}' cannot be plotted against year",
                variable
            )));
        }
        table.numeric(variable)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Column;

    fn table() -> DataTable {
        DataTable::new(vec![
            Column::text(
                "country",
                vec!["Chad".into(), "Chad".into(), "Peru".into(), "Peru".into()],
            ),
            Column::numeric("year", vec![1952.0, 1957.0, 1952.0, 1957.0]),
            Column::numeric("lifeExp", vec![38.0, 39.0, 43.0, 46.0]),
        ])
        .unwrap()
    }

    #[test]
    fn trend_has_one_trace_per_country_plus_mean() {
        let countries = vec!["Chad".to_string(), "Peru".to_string()];
        let plot = plot_indicator_trend(&table(), &countries, "lifeExp", true).unwrap();
        let json = plot.to_json();
        assert_eq!(json.matches("\"type\":\"scatter\"").count(), 3);
        assert!(json.contains("\"Mean\""));
        assert!(json.contains("41.5"));
    }

    #[test]
    fn trend_rejects_unknown_variable() {
        let countries = vec!["Chad".to_string()];
        assert!(plot_indicator_trend(&table(), &countries, "gdpPercap", false).is_err());
    }

    #[test]
    fn income_scatter_requires_rows_for_year() {
        let table = DataTable::new(vec![
            Column::text("country", vec!["Chad".into(), "Peru".into()]),
            Column::text("continent", vec!["Africa".into(), "Americas".into()]),
            Column::numeric("year", vec![2007.0, 2007.0]),
            Column::numeric("pop", vec![100.0, 25.0]),
            Column::numeric("gdpPercap", vec![1704.0, 7408.0]),
            Column::numeric("lifeExp", vec![50.7, 71.4]),
        ])
        .unwrap();
        let plot = plot_income_life_scatter(&table, 2007).unwrap();
        let json = plot.to_json();
        assert!(json.contains("\"Africa\""));
        assert!(json.contains("\"Americas\""));
        assert!(json.contains("\"type\":\"log\""));
        assert!(json.contains("lifeExp = 50"));
        // Chad has 4x Peru's population, so twice the diameter
        assert!(json.contains("\"size\":[60]"));
        assert!(json.contains("\"size\":[30]"));
        assert!(plot_income_life_scatter(&table, 1952).is_err());
    }

    #[test]
    fn validate_variables_rejects_year() {
        assert!(validate_variables(&table(), &["year".to_string()]).is_err());
        assert!(validate_variables(&table(), &["lifeExp".to_string()]).is_ok());
    }
}
