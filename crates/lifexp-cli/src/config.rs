use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use lifexp_models::config::{ModelKind, PipelineConfig};
use lifexp_models::report::dashboard::DashboardOptions;

/// Settings for `lifexp report`, loadable from JSON and overridable from flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub data: String,
    pub model: String,
    pub countries: Vec<String>,
    /// Single trend variable. All of lifeExp, gdpPercap and pop when unset.
    pub variable: Option<String>,
    pub mean_line: bool,
    pub gdp: Option<f64>,
    pub pop: Option<f64>,
    pub preview_rows: usize,
    pub output_file: String,
    pub pipeline: PipelineConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data: String::new(),
            model: String::from("linear"),
            countries: vec![String::from("Turkey"), String::from("Germany")],
            variable: None,
            mean_line: true,
            gdp: None,
            pop: None,
            preview_rows: 20,
            output_file: String::from("lifexp_dashboard.html"),
            pipeline: PipelineConfig::default(),
        }
    }
}

/// Map a CLI model name (short alias or full display name) to a model kind.
pub fn parse_model_name(name: &str) -> Result<ModelKind> {
    let kind = match name.to_ascii_lowercase().as_str() {
        "linear" | "lr" => ModelKind::LinearRegression,
        "svr" | "svm" => ModelKind::SupportVectorRegression,
        "lgbm" | "gbdt" => ModelKind::LightGradientBoostingMachine,
        _ => name.parse::<ModelKind>()?,
    };
    Ok(kind)
}

impl DashboardConfig {
    /// Read a JSON config. Missing or invalid fields warn and keep their defaults.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let partial: serde_json::Value = serde_json::from_str(&config_json)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        let mut config = DashboardConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    if let Ok(parsed) = serde_json::from_value(val.clone()) {
                        config.$field = parsed;
                    } else {
                        log::warn!(
                            "Config Invalid value for '{}', using default: {:?}",
                            stringify!($field),
                            config.$field
                        );
                    }
                } else {
                    log::warn!(
                        "Config Missing field '{}', using default: {:?}",
                        stringify!($field),
                        config.$field
                    );
                }
            };
        }

        load_or_default!(data);
        load_or_default!(model);
        load_or_default!(countries);
        load_or_default!(variable);
        load_or_default!(mean_line);
        load_or_default!(gdp);
        load_or_default!(pop);
        load_or_default!(preview_rows);
        load_or_default!(output_file);
        load_or_default!(pipeline);

        Ok(config)
    }

    /// Load from `--config` when given, otherwise start from defaults, then apply flags.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<String>("config") {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };

        // CLI overrides
        if let Some(data) = matches.get_one::<String>("data") {
            config.data = data.clone();
        }
        if let Some(model) = matches.get_one::<String>("model") {
            config.model = model.clone();
        }
        if let Some(countries) = matches.get_many::<String>("countries") {
            config.countries = countries.cloned().collect();
        }
        if let Some(variable) = matches.get_one::<String>("variable") {
            config.variable = Some(variable.clone());
        }
        if let Some(gdp) = matches.get_one::<f64>("gdp") {
            config.gdp = Some(*gdp);
        }
        if let Some(pop) = matches.get_one::<f64>("pop") {
            config.pop = Some(*pop);
        }
        if let Some(rows) = matches.get_one::<usize>("rows") {
            config.preview_rows = *rows;
        }
        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = output_file.clone();
        }
        if matches.get_flag("no_mean_line") {
            config.mean_line = false;
        }

        Ok(config)
    }

    pub fn to_options(&self) -> Result<DashboardOptions> {
        let prediction = match (self.gdp, self.pop) {
            (Some(gdp), Some(pop)) => Some((gdp, pop)),
            (None, None) => None,
            _ => anyhow::bail!("Both gdp and pop are required to make a prediction"),
        };
        let mut options = DashboardOptions {
            countries: self.countries.clone(),
            mean_line: self.mean_line,
            model: Some(parse_model_name(&self.model)?),
            prediction,
            preview_rows: self.preview_rows,
            pipeline: self.pipeline.clone(),
            ..DashboardOptions::default()
        };
        if let Some(variable) = &self.variable {
            options.variables = vec![variable.clone()];
        }
        Ok(options)
    }
}
