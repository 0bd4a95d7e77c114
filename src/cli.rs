//! Command-line argument parsing for the `plant-sim` binary.

use std::env;
use std::path::PathBuf;

/// Parsed CLI arguments.
#[derive(Debug, Default, PartialEq)]
pub struct CliOptions {
    /// Plant TOML file; the bundled example when absent.
    pub params: Option<PathBuf>,
    /// Price CSV; a synthetic market from `[market]` when absent.
    pub prices: Option<PathBuf>,
    /// Truncate the price series to the first `hours` points.
    pub hours: Option<usize>,
    /// Override `[market] seed`.
    pub seed: Option<u64>,
    pub hourly_out: Option<PathBuf>,
    /// Print next-hour and next-day forecasts after the reports.
    pub forecast: bool,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    parse_args_from(env::args().skip(1))
}

/// Parses arguments (without the program name).
///
/// `--help` short-circuits: anything after it is ignored.
pub fn parse_args_from<I>(args: I) -> Result<CliOptions, String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--params" => {
                i += 1;
                let path = args.next_or_err(i, "--params requires a path argument")?;
                if opts.params.replace(PathBuf::from(path)).is_some() {
                    return Err("--params provided more than once".to_string());
                }
            }
            "--prices" => {
                i += 1;
                let path = args.next_or_err(i, "--prices requires a path argument")?;
                if opts.prices.replace(PathBuf::from(path)).is_some() {
                    return Err("--prices provided more than once".to_string());
                }
            }
            "--hours" => {
                i += 1;
                let raw = args.next_or_err(i, "--hours requires a positive integer")?;
                match raw.parse::<usize>() {
                    Ok(h) if h > 0 => opts.hours = Some(h),
                    _ => return Err(format!("--hours value \"{raw}\" is not a positive integer")),
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "--seed requires a u64 argument")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                opts.seed = Some(seed);
            }
            "--hourly-out" => {
                i += 1;
                let path = args.next_or_err(i, "--hourly-out requires a path argument")?;
                if opts.hourly_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--hourly-out provided more than once".to_string());
                }
            }
            "--forecast" => opts.forecast = true,
            other => return Err(format!("unknown argument \"{other}\"")),
        }
        i += 1;
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_help() {
    eprintln!("plant-sim: merchant power plant operation and investment simulator");
    eprintln!();
    eprintln!("Usage: plant-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --params <path>       Load plant parameters from a TOML file");
    eprintln!("  --prices <path>       Hourly prices CSV (timestamp,price)");
    eprintln!("  --hours <n>           Simulate only the first n hours");
    eprintln!("  --seed <u64>          Override the synthetic market seed");
    eprintln!("  --hourly-out <path>   Export hourly results to CSV");
    eprintln!("  --forecast            Print naive, ARIMA and seasonal forecasts");
    eprintln!("  --help                Show this help message");
    eprintln!();
    eprintln!("Without --params the bundled example plant is used; without --prices");
    eprintln!("a synthetic year is generated from its [market] section.");
}
