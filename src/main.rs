//! Plant simulator entry point: CLI wiring, input loading, and reports.

mod cli;

use std::path::Path;
use std::process;

use tracing::{info, warn};

use plant_sim::config::PlantConfig;
use plant_sim::error::Result;
use plant_sim::finance::FinancialSummary;
use plant_sim::forecast::{forecast_arima, forecast_next_day_seasonal, forecast_next_hour};
use plant_sim::io::{export_csv, read_prices_csv};
use plant_sim::series::PriceSeries;
use plant_sim::sim::{OperationReport, simulate};
use plant_sim::telemetry::init_tracing;

use cli::CliOptions;

/// Trailing hours handed to the ARIMA order search.
const ARIMA_HISTORY_HOURS: usize = 14 * 24;

fn load_config(cli: &CliOptions) -> Result<PlantConfig> {
    let mut cfg = match cli.params {
        Some(ref path) => PlantConfig::from_toml_file(path)?,
        None => PlantConfig::example(),
    };
    if let Some(seed) = cli.seed {
        cfg.market.seed = seed;
    }
    Ok(cfg)
}

fn load_prices(cli: &CliOptions, cfg: &PlantConfig) -> Result<PriceSeries> {
    let series = match cli.prices {
        Some(ref path) => read_prices_csv(path)?,
        None => {
            let m = &cfg.market;
            info!(hours = m.hours, seed = m.seed, "generating synthetic prices");
            m.generator().generate(m.start, m.hours, m.seed)
        }
    };
    Ok(match cli.hours {
        Some(hours) => series.slice(0, hours),
        None => series,
    })
}

fn print_forecasts(series: &PriceSeries) -> Result<()> {
    let recent = series.slice(series.len().saturating_sub(ARIMA_HISTORY_HOURS), series.len());
    println!("\n--- Forecasts ---");
    println!("Next hour (24h mean):  {:.2}", forecast_next_hour(series)?);
    println!("Next hour (ARIMA):     {:.2}", forecast_arima(&recent)?);
    println!(
        "Next day (seasonal):   {:.2}",
        forecast_next_day_seasonal(&series.daily_means())?
    );
    Ok(())
}

fn run(cli: &CliOptions) -> Result<()> {
    let cfg = load_config(cli)?;

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let params = cfg.to_parameters()?;
    let prices = load_prices(cli, &cfg)?;
    let summary = simulate(&prices, &params)?;

    println!("{}", OperationReport::from_results(&summary.hourly_results));

    if params.discount_rate.is_some() && params.plant_lifetime_years.is_some() {
        let financials = FinancialSummary::evaluate(&summary, &params)?;
        println!("\n{financials}");
    } else {
        warn!("finance.discount_rate or finance.plant_lifetime_years unset, skipping financial summary");
    }

    if cli.forecast {
        print_forecasts(&prices)?;
    }

    if let Some(ref path) = cli.hourly_out {
        export_csv(&summary.hourly_results, Path::new(path))?;
        eprintln!("Hourly results written to {}", path.display());
    }

    Ok(())
}

fn main() {
    init_tracing();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_help();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_help();
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
