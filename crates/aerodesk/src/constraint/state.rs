//! JSON persistence for constraint-analysis state.
//!
//! State lives at `<project>/constraint_analysis/state.json`. A missing
//! file yields defaults; saves are atomic and stamp the timestamps.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::paths::{ensure_dir, read_json, write_json_atomic};

use super::inputs::{AnalysisInputs, Sweep};
use super::AnalysisResults;

/// Document format version.
pub const STATE_VERSION: &str = "v1";

/// Subdirectory holding the state file.
const STATE_DIR: &str = "constraint_analysis";

/// State file name.
const STATE_FILE_NAME: &str = "state.json";

/// Created/updated timestamps, RFC 3339 UTC. Empty until first save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Timestamps {
    /// First save.
    pub created: String,
    /// Most recent save.
    pub updated: String,
}

/// Persisted constraint-analysis state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisState {
    /// Document format version.
    pub version: String,
    /// Analysis inputs.
    pub inputs: AnalysisInputs,
    /// Wing-loading sweep.
    pub sweep: Sweep,
    /// Results of the last computation, if any.
    pub results: AnalysisResults,
    /// Save timestamps.
    pub timestamps: Timestamps,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            inputs: AnalysisInputs::default(),
            sweep: Sweep::default(),
            results: AnalysisResults::default(),
            timestamps: Timestamps::default(),
        }
    }
}

fn state_path(project_root: &Path) -> PathBuf {
    project_root.join(STATE_DIR).join(STATE_FILE_NAME)
}

/// Load the analysis state for a project, defaulting when absent.
///
/// # Errors
///
/// Returns an error if an existing state file cannot be read or parsed.
pub fn load(project_root: &Path) -> Result<AnalysisState> {
    let path = state_path(project_root);
    if !path.is_file() {
        debug!("No analysis state at {}, using defaults", path.display());
        return Ok(AnalysisState::default());
    }
    read_json(&path)
}

/// Save the analysis state atomically, stamping `updated` (and `created`
/// on first save).
///
/// # Errors
///
/// Returns an error if the state directory or file cannot be written.
pub fn save(project_root: &Path, state: &mut AnalysisState) -> Result<()> {
    let path = state_path(project_root);
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let now = Utc::now().to_rfc3339();
    if state.timestamps.created.is_empty() {
        state.timestamps.created = now.clone();
    }
    state.timestamps.updated = now;

    write_json_atomic(&path, state)
}
