//! Techno-economic simulator for village-scale solar microgrids.
//!
//! Builds hourly demand and solar profiles, sizes a PV/battery/inverter
//! system against a reliability target, simulates the hourly energy
//! balance, and evaluates lifetime economics with optional policy
//! adjustments. Every stage is a pure function of its inputs, so a fixed
//! config and seed reproduce results exactly.

pub mod config;
pub mod economics;
pub mod error;
pub mod io;
pub mod load;
pub mod pipeline;
pub mod policy;
pub mod profile;
/// Energy-balance engine, battery model, and summary KPIs.
pub mod sim;
pub mod sizing;
pub mod solar;

pub use config::ScenarioConfig;
pub use error::Error;
pub use pipeline::{ScenarioOutcome, run_scenario};
