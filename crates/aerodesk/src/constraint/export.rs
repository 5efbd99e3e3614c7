//! CSV export of constraint-analysis results.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::paths::ensure_dir;

use super::AnalysisResults;

/// Write the curves, envelope and summary of a result set as CSV files
/// under `dir`. Returns the paths written.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_csv(results: &AnalysisResults, dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;

    let curves_path = dir.join("constraint_curves.csv");
    fs::write(&curves_path, curves_csv(results))?;

    let envelope_path = dir.join("constraint_envelope.csv");
    fs::write(&envelope_path, envelope_csv(results))?;

    let summary_path = dir.join("constraint_summary.csv");
    fs::write(&summary_path, summary_csv(results))?;

    info!("Exported constraint results to {}", dir.display());
    Ok(vec![curves_path, envelope_path, summary_path])
}

fn curves_csv(results: &AnalysisResults) -> String {
    let named = results.curves.named();
    let mut out = String::from("ws_n_per_m2");
    for (name, _) in named {
        let _ = write!(out, ",{name}_tw");
    }
    out.push('\n');

    let rows = named.iter().map(|(_, points)| points.len()).min().unwrap_or(0);
    for i in 0..rows {
        let _ = write!(out, "{}", named[0].1[i].ws);
        for (_, points) in named {
            let _ = write!(out, ",{}", points[i].tw);
        }
        out.push('\n');
    }
    out
}

fn envelope_csv(results: &AnalysisResults) -> String {
    let mut out = String::from("ws_n_per_m2,tw\n");
    for point in &results.envelope {
        let _ = writeln!(out, "{},{}", point.ws, point.tw);
    }
    out
}

fn summary_csv(results: &AnalysisResults) -> String {
    let rec = &results.recommendation;
    let mut out = String::from("key,value\n");
    let _ = writeln!(out, "ws_max_landing,{}", results.ws_max_landing);
    let _ = writeln!(out, "envelope_points,{}", results.envelope.len());
    let _ = writeln!(out, "recommended_ws,{}", rec.ws);
    let _ = writeln!(out, "recommended_tw,{}", rec.tw);
    let _ = writeln!(out, "feasible,{}", rec.feasible);
    out
}
