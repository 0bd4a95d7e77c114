//! Hourly market prices from `timestamp,price` CSV files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::series::{PricePoint, PriceSeries};

/// Reads a price series from a CSV file.
///
/// See [`read_prices`] for the format.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, a row does not parse, or
/// the timestamps are not strictly increasing.
pub fn read_prices_csv(path: &Path) -> Result<PriceSeries> {
    let file = File::open(path)?;
    let series = read_prices(file)?;
    info!(path = %path.display(), points = series.len(), "loaded prices");
    Ok(series)
}

/// Reads a price series from CSV with a `timestamp,price` header.
///
/// Timestamps are RFC 3339 (e.g. `2024-01-01T00:00:00Z`); surrounding
/// whitespace is ignored. Rows are kept in file order, so an unsorted file
/// is an error rather than being reordered.
///
/// # Errors
///
/// Returns an error if a row does not parse or the timestamps are not
/// strictly increasing.
pub fn read_prices(reader: impl Read) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let points = rdr
        .deserialize::<PricePoint>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(PriceSeries::new(points)?)
}
