//! CSV export of statistics datasets and summaries.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::paths::ensure_dir;

use super::analysis::{DescribeRow, Dataset};

/// Write the dataset and its describe table as CSV files under `dir`.
/// Returns the paths written.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_csv(dataset: &Dataset, summary: &[DescribeRow], dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;

    let dataset_path = dir.join("dataset.csv");
    fs::write(&dataset_path, dataset_csv(dataset))?;

    let describe_path = dir.join("describe.csv");
    fs::write(&describe_path, describe_csv(summary))?;

    info!("Exported statistics to {}", dir.display());
    Ok(vec![dataset_path, describe_path])
}

fn dataset_csv(dataset: &Dataset) -> String {
    let mut out = String::from("aircraft");
    for feature in &dataset.features {
        let _ = write!(out, ",{}", csv_field(feature));
    }
    out.push('\n');
    for row in &dataset.rows {
        let _ = write!(out, "{}", csv_field(&row.aircraft_name));
        for value in &row.values {
            match value {
                Some(v) => {
                    let _ = write!(out, ",{v}");
                }
                None => out.push(','),
            }
        }
        out.push('\n');
    }
    out
}

fn describe_csv(summary: &[DescribeRow]) -> String {
    let mut out = String::from("feature,count,mean,std,min,q1,median,q3,max\n");
    for row in summary {
        let _ = write!(out, "{},{}", csv_field(&row.feature), row.count);
        for value in [
            row.mean, row.std, row.min, row.q1, row.median, row.q3, row.max,
        ] {
            match value {
                Some(v) => {
                    let _ = write!(out, ",{v}");
                }
                None => out.push(','),
            }
        }
        out.push('\n');
    }
    out
}

/// Quote a field when it contains a comma, quote or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
