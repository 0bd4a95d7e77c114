pub mod engine;
pub mod kpi;
/// Maintenance outage placement.
pub mod maintenance;
pub mod types;

pub use engine::simulate;
pub use kpi::OperationReport;
pub use types::{HourlyResult, SimulationSummary};
