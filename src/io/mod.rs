//! File output for simulation traces.

pub mod export;

pub use export::{export_csv, write_csv};
