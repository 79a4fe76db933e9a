//! Descriptive statistics for the dataset overview.
use std::collections::BTreeMap;

use statrs::statistics::Statistics;

use crate::data_handling::{ColumnValues, DataTable};
use crate::error::{PipelineError, Result};

/// Mean of every numeric column, per year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyMeans {
    pub years: Vec<i64>,
    /// `(column name, one mean per entry of years)`
    pub columns: Vec<(String, Vec<f64>)>,
}

impl YearlyMeans {
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }
}

/// One tile of the dataset overview: a value and its change over the period.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlineMetric {
    pub label: &'static str,
    pub value: f64,
    pub delta: f64,
}

impl HeadlineMetric {
    pub fn display_value(&self) -> String {
        format!("{:.2}", self.value)
    }

    pub fn display_delta(&self) -> String {
        format!("{:+.2}", self.delta)
    }
}

/// Group rows by `year_column` and average every other numeric column.
pub fn yearly_means(table: &DataTable, year_column: &str) -> Result<YearlyMeans> {
    let years = table.numeric(year_column)?;
    if years.is_empty() {
        return Err(PipelineError::EmptyTable);
    }

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (row, &year) in years.iter().enumerate() {
        if !year.is_nan() {
            groups.entry(year.round() as i64).or_default().push(row);
        }
    }

    let columns = table
        .columns()
        .iter()
        .filter(|c| c.name != year_column)
        .filter_map(|c| match &c.values {
            ColumnValues::Numeric(values) => {
                let means = groups
                    .values()
                    .map(|rows| rows.iter().map(|&r| values[r]).filter(|v| !v.is_nan()).mean())
                    .collect();
                Some((c.name.clone(), means))
            }
            ColumnValues::Text(_) => None,
        })
        .collect();

    Ok(YearlyMeans {
        years: groups.keys().copied().collect(),
        columns,
    })
}

fn first_last(values: &[f64]) -> Result<(f64, f64)> {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) => Ok((first, last)),
        _ => Err(PipelineError::EmptyTable),
    }
}

/// Life expectancy, income and population headline figures.
///
/// Life expectancy and income report the latest year's mean; population
/// reports the mean of the yearly means. Every delta is last year minus first.
pub fn headline_metrics(means: &YearlyMeans) -> Result<Vec<HeadlineMetric>> {
    let life = means.column("lifeExp")?;
    let income = means.column("gdpPercap")?;
    let pop = means.column("pop")?;

    let (life_first, life_last) = first_last(life)?;
    let (income_first, income_last) = first_last(income)?;
    let (pop_first, pop_last) = first_last(pop)?;

    Ok(vec![
        HeadlineMetric {
            label: "Life Expectancy",
            value: life_last,
            delta: life_last - life_first,
        },
        HeadlineMetric {
            label: "Income",
            value: income_last,
            delta: income_last - income_first,
        },
        HeadlineMetric {
            label: "Population",
            value: pop.iter().mean(),
            delta: pop_last - pop_first,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Column;

    fn table() -> DataTable {
        DataTable::new(vec![
            Column::text("country", vec!["A".into(), "B".into(), "A".into(), "B".into()]),
            Column::numeric("year", vec![1952.0, 1952.0, 2007.0, 2007.0]),
            Column::numeric("pop", vec![10.0, 30.0, 20.0, 60.0]),
            Column::numeric("gdpPercap", vec![100.0, 300.0, 200.0, 400.0]),
            Column::numeric("lifeExp", vec![40.0, 50.0, 60.0, 70.0]),
        ])
        .unwrap()
    }

    #[test]
    fn yearly_means_per_year() {
        let means = yearly_means(&table(), "year").unwrap();
        assert_eq!(means.years, vec![1952, 2007]);
        assert_eq!(means.column("pop").unwrap(), &[20.0, 40.0]);
        assert_eq!(means.column("lifeExp").unwrap(), &[45.0, 65.0]);
        assert!(means.column("country").is_err());
    }

    #[test]
    fn headline_metrics_match_hand_computation() {
        let means = yearly_means(&table(), "year").unwrap();
        let metrics = headline_metrics(&means).unwrap();
        assert_eq!(metrics[0].label, "Life Expectancy");
        assert_eq!(metrics[0].value, 65.0);
        assert_eq!(metrics[0].delta, 20.0);
        assert_eq!(metrics[1].value, 300.0);
        assert_eq!(metrics[1].delta, 100.0);
        assert_eq!(metrics[2].value, 30.0);
        assert_eq!(metrics[2].delta, 20.0);
        assert_eq!(metrics[0].display_delta(), "+20.00");
    }
}
