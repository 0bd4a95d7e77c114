//! CSV export for hourly simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::sim::types::HourlyResult;

/// Column header of the hourly results CSV.
pub const HEADER: &str = "timestamp,price,dispatched_mwh,revenue,fuel_cost,profit,in_maintenance";

/// Exports hourly results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `results` - Hourly results in simulation order
/// * `path` - Destination file, created or truncated
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(results: &[HourlyResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes hourly results as CSV to any writer.
///
/// Timestamps are RFC 3339; the header is written even when `results` is
/// empty.
///
/// # Arguments
///
/// * `results` - Hourly results in simulation order
/// * `writer` - Sink for the CSV bytes, flushed before returning
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_csv(results: &[HourlyResult], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for r in results {
        wtr.serialize(r)?;
    }

    wtr.flush()?;
    Ok(())
}
