//! Hourly energy-balance simulation: battery model, engine, and summary
//! indicators.

/// Battery storage model.
pub mod battery;
pub mod engine;
/// Post-hoc summary indicators.
pub mod summary;
pub mod types;

pub use battery::Battery;
pub use engine::{SystemParams, run_energy_balance};
pub use summary::SummaryReport;
pub use types::{SimulationResult, StepRecord};
