// src/io/reporting.rs

use crate::simulation::error::SimulationError;
use crate::simulation::log::RunLog;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the run log as CSV, one row per (period, role), header first.
pub fn write_run_log<W: Write>(writer: W, log: &RunLog) -> Result<(), SimulationError> {
    let mut wtr = csv::Writer::from_writer(writer);

    for record in log.records() {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;
    Ok(())
}

/// Writes the run log to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `log` - The log returned by the simulation engine.
pub fn write_run_log_to_path(
    file_path: impl AsRef<Path>,
    log: &RunLog,
) -> Result<(), SimulationError> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_run_log(file, log)?;

    info!(rows = log.len(), path = %path.display(), "exported run log");
    Ok(())
}
