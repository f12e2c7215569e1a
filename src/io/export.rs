//! CSV export for hourly energy-balance traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepRecord;

/// Column header for the hourly trace export.
const HEADER: &str = "hour,demand_kw,supply_kw,battery_soc_kwh,unmet_kw";

/// Exports an hourly trace to a CSV file at the given path.
///
/// Writes a header row followed by one data row per simulated hour.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(steps: &[StepRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(steps, buf)
}

/// Writes an hourly trace as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(steps: &[StepRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for s in steps {
        wtr.write_record(&[
            s.hour.to_string(),
            format!("{:.4}", s.demand_kw),
            format!("{:.4}", s.supply_kw),
            format!("{:.4}", s.soc_kwh),
            format!("{:.4}", s.unmet_kw),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
