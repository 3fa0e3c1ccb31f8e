//! Comparison report over persisted run logs.
//!
//! Presentational only: a fixed-width summary table of final energies
//! against the exact reference, plus a TSV trajectory dump for external
//! plotting.

use std::io::Write;
use std::path::Path;

use crate::error::VmcError;
use crate::io::RunLog;

/// Reload the named run logs from `dir`, preserving order.
pub fn load_runs(dir: &Path, run_names: &[&str]) -> Result<Vec<RunLog>, VmcError> {
    run_names.iter().map(|name| RunLog::read(dir, name)).collect()
}

/// Final-energy comparison table against the exact reference.
pub fn summary_table(logs: &[RunLog], exact_energy: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Exact ground-state energy: {:.6}\n\n", exact_energy));
    out.push_str(&format!(
        "{:<12} {:>8} {:>14} {:>12} {:>10}\n",
        "run", "iters", "final E", "ΔE", "rel. err"
    ));
    for log in logs {
        match log.final_energy() {
            Some(final_energy) => {
                let delta = final_energy - exact_energy;
                let relative = delta.abs() / exact_energy.abs();
                out.push_str(&format!(
                    "{:<12} {:>8} {:>14.6} {:>12.6} {:>9.3}%\n",
                    log.run_name,
                    log.len(),
                    final_energy,
                    delta,
                    100.0 * relative
                ));
            }
            None => {
                out.push_str(&format!("{:<12} {:>8} (empty log)\n", log.run_name, 0));
            }
        }
    }
    out
}

/// Write all energy trajectories side by side: one iteration column, one
/// mean-energy column per run. Shorter runs leave trailing cells empty.
pub fn write_trajectories_tsv(path: &Path, logs: &[RunLog]) -> Result<(), VmcError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    write!(file, "iteration")?;
    for log in logs {
        write!(file, "\t{}", log.run_name)?;
    }
    writeln!(file)?;

    let rows = logs.iter().map(RunLog::len).max().unwrap_or(0);
    for row in 0..rows {
        write!(file, "{}", row)?;
        for log in logs {
            match log.energy().mean.get(row) {
                Some(e) => write!(file, "\t{:.8}", e)?,
                None => write!(file, "\t")?,
            }
        }
        writeln!(file)?;
    }
    Ok(())
}
