//! Statistical analyses over catalog data.
//!
//! A [`Dataset`] is assembled from the catalog for one selection and a set
//! of characteristics; values that fail to parse as numbers are treated as
//! missing. Quantiles use linear interpolation between order statistics.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

use super::Selection;

/// One aircraft row of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Catalog id of the aircraft.
    pub aircraft_id: i64,
    /// Aircraft name.
    pub aircraft_name: String,
    /// One value per dataset feature; `None` when missing or non-numeric.
    pub values: Vec<Option<f64>>,
}

/// Numeric values of selected characteristics for selected aircraft.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Characteristic names, in column order.
    pub features: Vec<String>,
    /// One row per aircraft.
    pub rows: Vec<DataRow>,
}

impl Dataset {
    /// Present values of one feature column.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the feature is not part of the dataset.
    pub fn column(&self, feature: &str) -> Result<Vec<f64>> {
        let index = self.feature_index(feature)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| row.values[index])
            .collect())
    }

    /// Paired `(x, y)` values; rows missing either value are skipped.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either feature is not part of the dataset.
    pub fn pairs(&self, x: &str, y: &str) -> Result<Vec<(f64, f64)>> {
        let xi = self.feature_index(x)?;
        let yi = self.feature_index(y)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|row| match (row.values[xi], row.values[yi]) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }

    fn feature_index(&self, feature: &str) -> Result<usize> {
        self.features
            .iter()
            .position(|f| f == feature)
            .ok_or_else(|| Error::not_found("feature", feature))
    }
}

/// Assemble a dataset from the catalog for one selection.
///
/// Aircraft missing from the catalog are skipped with a warning. Values
/// that do not parse as numbers count as missing.
///
/// # Errors
///
/// Returns an error if a catalog query fails.
pub fn assemble(catalog: &Catalog, selection: &Selection, features: &[String]) -> Result<Dataset> {
    let mut rows = Vec::new();
    for &aircraft_id in &selection.aircraft_ids {
        let aircraft = match catalog.get_aircraft(aircraft_id) {
            Ok(aircraft) => aircraft,
            Err(err) if err.is_not_found() => {
                warn!("Aircraft {} no longer in catalog, skipping", aircraft_id);
                continue;
            }
            Err(err) => return Err(err),
        };
        let stored = catalog.values_for_aircraft(aircraft_id)?;
        let values = features
            .iter()
            .map(|feature| {
                stored
                    .iter()
                    .find(|v| v.name.eq_ignore_ascii_case(feature))
                    .and_then(|v| v.value.as_deref())
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
            })
            .collect();
        rows.push(DataRow {
            aircraft_id,
            aircraft_name: aircraft.name,
            values,
        });
    }
    Ok(Dataset {
        features: features.to_vec(),
        rows,
    })
}

/// Summary statistics for one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescribeRow {
    /// Feature name.
    pub feature: String,
    /// Number of present values.
    pub count: usize,
    /// Mean, when any value is present.
    pub mean: Option<f64>,
    /// Sample standard deviation, when at least two values are present.
    pub std: Option<f64>,
    /// Minimum.
    pub min: Option<f64>,
    /// First quartile.
    pub q1: Option<f64>,
    /// Median.
    pub median: Option<f64>,
    /// Third quartile.
    pub q3: Option<f64>,
    /// Maximum.
    pub max: Option<f64>,
}

/// Describe every feature of a dataset.
///
/// # Errors
///
/// Returns an error if a feature column cannot be extracted.
pub fn describe(dataset: &Dataset) -> Result<Vec<DescribeRow>> {
    dataset
        .features
        .iter()
        .map(|feature| {
            let mut values = dataset.column(feature)?;
            values.sort_by(f64::total_cmp);
            let count = values.len();
            let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
            let std = (count > 1).then(|| {
                let m = mean.unwrap_or(0.0);
                let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
                (ss / (count - 1) as f64).sqrt()
            });
            Ok(DescribeRow {
                feature: feature.clone(),
                count,
                mean,
                std,
                min: values.first().copied(),
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values.last().copied(),
            })
        })
        .collect()
}

/// Histogram of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Feature name.
    pub feature: String,
    /// Whether values were log10-transformed first.
    pub log10: bool,
    /// Bin edges; one more than the number of bins.
    pub edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
    /// Values dropped because they were non-positive under log10.
    pub dropped: usize,
}

/// Compute an equal-width histogram of one feature.
///
/// With `log10`, values are transformed first and non-positive values are
/// dropped.
///
/// # Errors
///
/// Returns an error if the feature is unknown, `bins` is zero, or no
/// values remain.
pub fn histogram(dataset: &Dataset, feature: &str, bins: usize, log10: bool) -> Result<Histogram> {
    if bins == 0 {
        return Err(Error::validation("bin count must be positive"));
    }
    let raw = dataset.column(feature)?;
    let total = raw.len();
    let values: Vec<f64> = if log10 {
        raw.into_iter().filter(|v| *v > 0.0).map(f64::log10).collect()
    } else {
        raw
    };
    if values.is_empty() {
        return Err(Error::validation(format!(
            "no values for feature '{feature}'"
        )));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Degenerate span still gets one usable bin.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for value in &values {
        let mut index = ((value - min) / width) as usize;
        if index >= bins {
            index = bins - 1;
        }
        counts[index] += 1;
    }

    Ok(Histogram {
        feature: feature.to_string(),
        log10,
        edges,
        counts,
        dropped: total - values.len(),
    })
}

/// Five-number summary with 1.5·IQR whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Feature name.
    pub feature: String,
    /// Minimum value.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Maximum value.
    pub max: f64,
    /// Lowest value within `q1 - 1.5·IQR`.
    pub whisker_low: f64,
    /// Highest value within `q3 + 1.5·IQR`.
    pub whisker_high: f64,
    /// Values outside the whiskers.
    pub outliers: Vec<f64>,
}

/// Compute boxplot statistics for one feature.
///
/// # Errors
///
/// Returns an error if the feature is unknown or has no values.
pub fn boxplot(dataset: &Dataset, feature: &str) -> Result<BoxStats> {
    let mut values = dataset.column(feature)?;
    if values.is_empty() {
        return Err(Error::validation(format!(
            "no values for feature '{feature}'"
        )));
    }
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25).unwrap_or(values[0]);
    let median = quantile(&values, 0.5).unwrap_or(values[0]);
    let q3 = quantile(&values, 0.75).unwrap_or(values[0]);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let whisker_low = values
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(values[0]);
    let whisker_high = values
        .iter()
        .copied()
        .rev()
        .find(|v| *v <= high_fence)
        .unwrap_or(values[values.len() - 1]);
    let outliers = values
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Ok(BoxStats {
        feature: feature.to_string(),
        min: values[0],
        q1,
        median,
        q3,
        max: values[values.len() - 1],
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// One scatter point, labelled with its aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Aircraft name.
    pub aircraft_name: String,
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

/// Paired points of two features, optionally log10 per axis.
///
/// Rows missing either value are skipped; under log10, non-positive
/// values on that axis are skipped too.
///
/// # Errors
///
/// Returns an error if either feature is not part of the dataset.
pub fn scatter(
    dataset: &Dataset,
    x: &str,
    y: &str,
    log_x: bool,
    log_y: bool,
) -> Result<Vec<ScatterPoint>> {
    let xi = dataset.feature_index(x)?;
    let yi = dataset.feature_index(y)?;
    let mut points = Vec::new();
    for row in &dataset.rows {
        let (Some(mut px), Some(mut py)) = (row.values[xi], row.values[yi]) else {
            continue;
        };
        if log_x {
            if px <= 0.0 {
                continue;
            }
            px = px.log10();
        }
        if log_y {
            if py <= 0.0 {
                continue;
            }
            py = py.log10();
        }
        points.push(ScatterPoint {
            aircraft_name: row.aircraft_name.clone(),
            x: px,
            y: py,
        });
    }
    Ok(points)
}

/// Linear-interpolated quantile of sorted values. `None` when empty.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
