//! Per-project statistics over catalog aircraft.
//!
//! Named selections of aircraft are persisted alongside a record of the
//! last analysis in `<project>/stats/stats.json`. The analysis functions
//! themselves live in [`analysis`]; CSV export in [`export`].

pub mod analysis;
pub mod export;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::paths::{ensure_dir, read_json, write_json_atomic};

/// Subdirectory holding statistics state and exports.
pub const STATS_DIR: &str = "stats";

/// State file name.
const STATE_FILE_NAME: &str = "stats.json";

/// A named subset of catalog aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Catalog ids of the member aircraft.
    #[serde(default)]
    pub aircraft_ids: Vec<i64>,
}

/// Record of the most recent analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAnalysis {
    /// Analysis kind (`describe`, `histogram`, `boxplot`, `scatter`).
    pub analysis_type: String,
    /// Characteristics analysed.
    pub features: Vec<String>,
    /// Kind-specific parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Persistent statistics state for one project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsState {
    /// Selections keyed by id.
    pub selections: BTreeMap<String, Selection>,
    /// Id of the active selection, if any.
    pub last_active_selection: Option<String>,
    /// Record of the last analysis, if any.
    pub last_analysis: Option<LastAnalysis>,
}

impl StatsState {
    /// The active selection, if one is set and still exists.
    #[must_use]
    pub fn active(&self) -> Option<&Selection> {
        self.last_active_selection
            .as_ref()
            .and_then(|id| self.selections.get(id))
    }

    /// Create a selection and make it active. Returns its id.
    pub fn add(&mut self, name: &str, aircraft_ids: Vec<i64>) -> String {
        let id = Uuid::new_v4().to_string();
        self.selections.insert(
            id.clone(),
            Selection {
                id: id.clone(),
                name: name.to_string(),
                aircraft_ids,
            },
        );
        self.last_active_selection = Some(id.clone());
        id
    }

    /// Rename a selection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<()> {
        let selection = self
            .selections
            .get_mut(id)
            .ok_or_else(|| Error::not_found("selection", id))?;
        selection.name = new_name.to_string();
        Ok(())
    }

    /// Delete a selection. If it was active, any remaining selection
    /// becomes active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        if self.selections.remove(id).is_none() {
            return Err(Error::not_found("selection", id));
        }
        if self.last_active_selection.as_deref() == Some(id) {
            self.last_active_selection = self.selections.keys().next().cloned();
        }
        Ok(())
    }

    /// Duplicate a selection as "`<name>` Copy" and make the copy active.
    /// Returns the new id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn duplicate(&mut self, id: &str) -> Result<String> {
        let original = self
            .selections
            .get(id)
            .ok_or_else(|| Error::not_found("selection", id))?;
        let name = format!("{} Copy", original.name);
        let aircraft_ids = original.aircraft_ids.clone();
        Ok(self.add(&name, aircraft_ids))
    }

    /// Mark a selection as active.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        if !self.selections.contains_key(id) {
            return Err(Error::not_found("selection", id));
        }
        self.last_active_selection = Some(id.to_string());
        Ok(())
    }

    /// Replace the member aircraft of a selection.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn set_aircraft(&mut self, id: &str, aircraft_ids: Vec<i64>) -> Result<()> {
        let selection = self
            .selections
            .get_mut(id)
            .ok_or_else(|| Error::not_found("selection", id))?;
        selection.aircraft_ids = aircraft_ids;
        Ok(())
    }

    /// Record the last analysis run.
    pub fn record_analysis(&mut self, analysis: LastAnalysis) {
        self.last_analysis = Some(analysis);
    }

    /// Find a selection by name (exact match), falling back to id lookup.
    #[must_use]
    pub fn find(&self, ident: &str) -> Option<&Selection> {
        self.selections
            .get(ident)
            .or_else(|| self.selections.values().find(|s| s.name == ident))
    }
}

/// Directory holding statistics state and exports for a project.
#[must_use]
pub fn stats_dir(project_root: &Path) -> PathBuf {
    project_root.join(STATS_DIR)
}

fn state_path(project_root: &Path) -> PathBuf {
    stats_dir(project_root).join(STATE_FILE_NAME)
}

/// Load the statistics state for a project, defaulting when absent.
///
/// # Errors
///
/// Returns an error if an existing state file cannot be read or parsed.
pub fn load(project_root: &Path) -> Result<StatsState> {
    let path = state_path(project_root);
    if !path.is_file() {
        debug!("No stats state at {}, using defaults", path.display());
        return Ok(StatsState::default());
    }
    read_json(&path)
}

/// Save the statistics state atomically.
///
/// # Errors
///
/// Returns an error if the stats directory or file cannot be written.
pub fn save(project_root: &Path, state: &StatsState) -> Result<()> {
    let path = state_path(project_root);
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    write_json_atomic(&path, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_add_makes_active() {
        let mut state = StatsState::default();
        let id = state.add("Twins", vec![1, 2]);
        assert_eq!(state.active().unwrap().id, id);
        assert_eq!(state.active().unwrap().aircraft_ids, vec![1, 2]);
    }

    #[test]
    fn test_rename() {
        let mut state = StatsState::default();
        let id = state.add("Twins", vec![]);
        state.rename(&id, "Twin turboprops").unwrap();
        assert_eq!(state.selections[&id].name, "Twin turboprops");
        assert!(state.rename("bogus", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_falls_back_to_remaining() {
        let mut state = StatsState::default();
        let first = state.add("A", vec![]);
        let second = state.add("B", vec![]);
        assert_eq!(state.last_active_selection.as_deref(), Some(second.as_str()));

        state.delete(&second).unwrap();
        assert_eq!(state.last_active_selection.as_deref(), Some(first.as_str()));

        state.delete(&first).unwrap();
        assert!(state.last_active_selection.is_none());
        assert!(state.active().is_none());
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let mut state = StatsState::default();
        let first = state.add("A", vec![]);
        let second = state.add("B", vec![]);

        state.delete(&first).unwrap();
        assert_eq!(state.last_active_selection.as_deref(), Some(second.as_str()));
    }

    #[test]
    fn test_duplicate_appends_copy() {
        let mut state = StatsState::default();
        let id = state.add("Twins", vec![3, 4]);
        let copy = state.duplicate(&id).unwrap();

        assert_ne!(copy, id);
        assert_eq!(state.selections[&copy].name, "Twins Copy");
        assert_eq!(state.selections[&copy].aircraft_ids, vec![3, 4]);
        // The copy becomes active.
        assert_eq!(state.last_active_selection.as_deref(), Some(copy.as_str()));
    }

    #[test]
    fn test_set_active_unknown_is_error() {
        let mut state = StatsState::default();
        assert!(state.set_active("bogus").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_aircraft() {
        let mut state = StatsState::default();
        let id = state.add("Twins", vec![1]);
        state.set_aircraft(&id, vec![1, 2, 3]).unwrap();
        assert_eq!(state.selections[&id].aircraft_ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_find_by_id_or_name() {
        let mut state = StatsState::default();
        let id = state.add("Twins", vec![]);
        assert_eq!(state.find(&id).unwrap().name, "Twins");
        assert_eq!(state.find("Twins").unwrap().id, id);
        assert!(state.find("Ghosts").is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut state = StatsState::default();
        state.add("Twins", vec![1, 2]);
        state.record_analysis(LastAnalysis {
            analysis_type: "describe".to_string(),
            features: vec!["mtow".to_string()],
            params: serde_json::json!({}),
        });
        save(dir.path(), &state).unwrap();

        let back = load(dir.path()).unwrap();
        assert_eq!(back, state);
        assert!(dir.path().join("stats/stats.json").is_file());
    }

    #[test]
    fn test_load_missing_yields_default() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(dir.path()).unwrap(), StatsState::default());
    }
}
