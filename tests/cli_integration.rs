//! Runs the `plant-sim` binary end to end.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_plant-sim"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("plant-sim process should run")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "plant-sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}

fn metric(stdout: &str, label: &str) -> f64 {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(label))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("missing \"{label}\" in output:\n{stdout}"))
}

/// Scratch directory unique to one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("plant-sim-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

#[test]
fn bundled_example_prints_both_reports() {
    let stdout = stdout_of(&run(&[]));
    assert!(stdout.contains("--- Operation Report ---"));
    assert!(stdout.contains("--- Financial Summary ---"));
    assert!(metric(&stdout, "Total profit:").is_finite());
    assert!(metric(&stdout, "Net present value:").is_finite());
}

#[test]
fn same_seed_same_profit_different_seed_differs() {
    let a = metric(&stdout_of(&run(&["--seed", "1"])), "Total profit:");
    let b = metric(&stdout_of(&run(&["--seed", "1"])), "Total profit:");
    let c = metric(&stdout_of(&run(&["--seed", "2"])), "Total profit:");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn price_file_and_params_file_drive_the_run() {
    let dir = scratch("files");
    let params = dir.join("plant.toml");
    fs::write(
        &params,
        "[plant]\ncapacity_mw = 1000.0\ncapacity_factor = 1.0\n\n\
         [fuel]\ncost_per_mwh = 10.0\n\n\
         [maintenance]\ndays = 1.0\n\n\
         [finance]\n",
    )
    .unwrap();

    let prices = dir.join("prices.csv");
    let mut csv = String::from("timestamp,price\n");
    for h in 0..48 {
        csv.push_str(&format!("2024-01-{:02}T{:02}:00:00Z,50.0\n", 1 + h / 24, h % 24));
    }
    fs::write(&prices, csv).unwrap();

    let hourly_out = dir.join("hourly.csv");
    let output = run(&[
        "--params",
        params.to_str().unwrap(),
        "--prices",
        prices.to_str().unwrap(),
        "--hourly-out",
        hourly_out.to_str().unwrap(),
    ]);
    let stdout = stdout_of(&output);

    assert_eq!(metric(&stdout, "Total profit:"), 960_000.0);
    // No discount rate or lifetime: the financial summary is skipped.
    assert!(!stdout.contains("--- Financial Summary ---"));

    let written = fs::read_to_string(&hourly_out).unwrap();
    assert_eq!(written.lines().count(), 49);
    assert!(written.starts_with("timestamp,price,"));
}

#[test]
fn forecast_flag_prints_forecasts() {
    let stdout = stdout_of(&run(&["--hours", "1000", "--forecast"]));
    assert!(stdout.contains("--- Forecasts ---"));
    assert!(metric(&stdout, "Next hour (24h mean):").is_finite());
    assert!(metric(&stdout, "Next hour (ARIMA):").is_finite());
    assert!(metric(&stdout, "Next day (seasonal):").is_finite());
}

#[test]
fn maintenance_longer_than_prices_exits_with_error() {
    // The example plant needs 720 maintenance hours.
    let output = run(&["--hours", "48"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("maintenance_days"));
}

#[test]
fn invalid_params_file_exits_with_error() {
    let dir = scratch("invalid");
    let params = dir.join("bad.toml");
    fs::write(&params, "[plant]\ncapacity_factor = 1.5\n").unwrap();

    let output = run(&["--params", params.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("plant.capacity_factor"));
}

#[test]
fn unknown_argument_exits_with_error() {
    let output = run(&["--bogus"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_cleanly() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage: plant-sim"));
}
