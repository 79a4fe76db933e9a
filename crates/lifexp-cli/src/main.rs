use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use lifexp_cli::commands::{chart, dataset, predict, report, train};
use lifexp_cli::config::{parse_model_name, DashboardConfig};
use lifexp_models::config::PipelineConfig;
use lifexp_models::data_handling::DatasetCache;

fn data_arg(required: bool) -> Arg {
    Arg::new("data")
        .help("Path to the gapminder dataset (*.csv or *.tsv)")
        .required(required)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::FilePath)
}

fn model_arg(required: bool) -> Arg {
    Arg::new("model")
        .short('m')
        .long("model")
        .help(
            "Model to fit: linear, svr or lgbm \
             (or 'Linear Regression', 'Support Vector Regression', 'Light Gradient Boosting Machine')",
        )
        .required(required)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::Other)
}

fn output_arg(default: &'static str) -> Arg {
    Arg::new("output_file")
        .short('o')
        .long("output")
        .help("Path of the HTML file to write")
        .default_value(default)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::FilePath)
}

fn countries_arg() -> Arg {
    Arg::new("countries")
        .short('c')
        .long("countries")
        .help("Comma-separated countries to plot")
        .value_delimiter(',')
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

fn number_arg(name: &'static str, help: &'static str, required: bool) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .required(required)
        .value_parser(clap::value_parser!(f64))
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("LIFEXP_LOG", "error,lifexp=info"))
        .init();

    let matches = Command::new("lifexp")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("Life expectancy prediction dashboard for the gapminder dataset")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("dataset")
                .about("Print headline metrics and a preview of the dataset")
                .arg(data_arg(true))
                .arg(
                    Arg::new("rows")
                        .short('n')
                        .long("rows")
                        .help("Number of preview rows")
                        .default_value("10")
                        .value_parser(clap::value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("chart")
                .about("Plot an indicator over time for selected countries")
                .arg(data_arg(true))
                .arg(countries_arg().required(true))
                .arg(
                    Arg::new("variable")
                        .long("variable")
                        .help("Indicator to plot: lifeExp, gdpPercap or pop")
                        .default_value("lifeExp")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("mean_line")
                        .long("mean-line")
                        .help("Draw the mean over the selected countries")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("year")
                        .long("year")
                        .help("Also draw income against life expectancy for this year")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(output_arg("lifexp_chart.html")),
        )
        .subcommand(
            Command::new("train")
                .about("Fit a model and write its prediction surface")
                .arg(data_arg(true))
                .arg(model_arg(true))
                .arg(output_arg("lifexp_surface.html")),
        )
        .subcommand(
            Command::new("predict")
                .about("Predict life expectancy for a GDP per capita and population")
                .arg(data_arg(true))
                .arg(model_arg(true))
                .arg(number_arg("gdp", "GDP per capita (raw units, > 0)", true))
                .arg(number_arg("pop", "Population (raw units, > 0)", true)),
        )
        .subcommand(
            Command::new("report")
                .about("Build the full HTML dashboard")
                .arg(data_arg(false))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to a dashboard JSON configuration file")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(model_arg(false))
                .arg(countries_arg())
                .arg(
                    Arg::new("variable")
                        .long("variable")
                        .help("Plot only this indicator")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("no_mean_line")
                        .long("no-mean-line")
                        .help("Hide the mean line on trend charts")
                        .action(ArgAction::SetTrue),
                )
                .arg(number_arg("gdp", "GDP per capita to predict for", false))
                .arg(number_arg("pop", "Population to predict for", false))
                .arg(
                    Arg::new("rows")
                        .short('n')
                        .long("rows")
                        .help("Number of preview rows")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of the HTML file to write")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let (name, sub_m) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => unreachable!("Subcommand is required by CLI configuration"),
    };
    match run_subcommand(name, sub_m) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("{} failed: {:#}", name, e);
            std::process::exit(1)
        }
    }
}

fn run_subcommand(name: &str, matches: &ArgMatches) -> Result<()> {
    let mut cache = DatasetCache::new();
    let pipeline = PipelineConfig::default();

    match name {
        "dataset" => {
            let data: &String = matches.get_one("data").unwrap();
            let rows: usize = *matches.get_one("rows").unwrap();
            dataset::run(&mut cache, data, rows)
        }
        "chart" => {
            let args = chart::ChartArgs {
                data: matches.get_one::<String>("data").unwrap().clone(),
                countries: matches
                    .get_many::<String>("countries")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
                variable: matches.get_one::<String>("variable").unwrap().clone(),
                mean_line: matches.get_flag("mean_line"),
                year: matches.get_one::<i64>("year").copied(),
                output_file: matches.get_one::<String>("output_file").unwrap().clone(),
            };
            chart::run(&mut cache, &args)
        }
        "train" => {
            let data: &String = matches.get_one("data").unwrap();
            let model = parse_model_name(matches.get_one::<String>("model").unwrap())?;
            let output: &String = matches.get_one("output_file").unwrap();
            log::info!("[lifexp::train] Fitting {} on {}", model, data);
            train::run(&mut cache, data, model, output, &pipeline)
        }
        "predict" => {
            let data: &String = matches.get_one("data").unwrap();
            let model = parse_model_name(matches.get_one::<String>("model").unwrap())?;
            let gdp: f64 = *matches.get_one("gdp").unwrap();
            let pop: f64 = *matches.get_one("pop").unwrap();
            predict::run(&mut cache, data, model, gdp, pop, &pipeline).map(|_| ())
        }
        "report" => {
            let config = DashboardConfig::from_arguments(matches)?;
            if matches.get_one::<String>("config").is_none() {
                log::info!("[lifexp::report] No config provided; using defaults.");
            }
            report::run(&mut cache, &config)
        }
        _ => unreachable!(),
    }
}
