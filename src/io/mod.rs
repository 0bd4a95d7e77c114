//! CSV input and output.

pub mod export;
pub mod prices;

pub use export::{export_csv, write_csv};
pub use prices::{read_prices, read_prices_csv};
