//! Project lifecycle management.
//!
//! A project is a directory under the configured projects root holding a
//! `project.json` manifest plus the per-module documents (requirements,
//! technology pack, sketches, constraint analysis, statistics).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::paths::{ensure_dir, read_json, write_json_atomic};

/// Manifest file name inside every project directory.
const MANIFEST_FILE_NAME: &str = "project.json";

/// Per-project manifest stored as `project.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project name (matches the directory name).
    pub name: String,
    /// When the project was created.
    pub created_utc: DateTime<Utc>,
    /// Module names that have stored state in this project.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// An opened project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// The project manifest.
    pub manifest: ProjectManifest,
    /// Root directory of the project.
    root: PathBuf,
}

impl Project {
    /// Root directory of the project.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// Record that a module now has stored state in this project.
    ///
    /// No-op when the module is already listed. Persists the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn register_module(&mut self, module: &str) -> Result<()> {
        if !self.manifest.modules.iter().any(|m| m == module) {
            self.manifest.modules.push(module.to_string());
            self.save_manifest()?;
        }
        Ok(())
    }

    /// Persist the manifest atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    pub fn save_manifest(&self) -> Result<()> {
        write_json_atomic(&self.root.join(MANIFEST_FILE_NAME), &self.manifest)
    }
}

/// Handles creation, opening, listing and deletion of projects.
#[derive(Debug, Clone)]
pub struct ProjectManager {
    projects_dir: PathBuf,
}

impl ProjectManager {
    /// Create a manager rooted at `projects_dir`.
    #[must_use]
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    /// Root directory holding all projects.
    #[must_use]
    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Create a new project directory with a fresh manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid, a manifest already exists,
    /// or the directory cannot be created.
    pub fn create(&self, name: &str) -> Result<Project> {
        let name = validate_project_name(name)?;
        let root = self.projects_dir.join(&name);
        if root.join(MANIFEST_FILE_NAME).exists() {
            return Err(Error::ProjectExists { name });
        }
        ensure_dir(&root)?;

        let manifest = ProjectManifest {
            name: name.clone(),
            created_utc: Utc::now(),
            modules: Vec::new(),
        };
        let project = Project { manifest, root };
        project.save_manifest()?;
        info!("Created project '{}'", name);
        Ok(project)
    }

    /// Open an existing project by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the project or its manifest does not exist.
    pub fn open(&self, name: &str) -> Result<Project> {
        let name = validate_project_name(name)?;
        let root = self.projects_dir.join(&name);
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        if !manifest_path.is_file() {
            return Err(Error::ProjectNotFound { name });
        }
        let manifest: ProjectManifest = read_json(&manifest_path)?;
        debug!("Opened project '{}'", manifest.name);
        Ok(Project { manifest, root })
    }

    /// List the names of all projects, sorted.
    ///
    /// Only directories containing a manifest count as projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the projects root cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.projects_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.projects_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() && path.join(MANIFEST_FILE_NAME).is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Delete a project and everything stored under it.
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist or removal fails.
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = validate_project_name(name)?;
        let root = self.projects_dir.join(&name);
        if !root.join(MANIFEST_FILE_NAME).is_file() {
            return Err(Error::ProjectNotFound { name });
        }
        fs::remove_dir_all(&root)?;
        info!("Deleted project '{}'", name);
        Ok(())
    }
}

/// Validate a project name: non-empty after trimming, no path separators,
/// no leading dot.
fn validate_project_name(name: &str) -> Result<String> {
    let cleaned = name.trim();
    if cleaned.is_empty() {
        return Err(Error::validation("project name cannot be empty"));
    }
    if cleaned.contains(['/', '\\']) || cleaned.starts_with('.') {
        return Err(Error::validation(format!(
            "project name '{cleaned}' must not contain path separators or start with a dot"
        )));
    }
    Ok(cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (TempDir, ProjectManager) {
        let dir = TempDir::new().unwrap();
        let mgr = ProjectManager::new(dir.path());
        (dir, mgr)
    }

    #[test]
    fn test_create_and_open() {
        let (_dir, mgr) = manager();
        let created = mgr.create("demo").unwrap();
        assert_eq!(created.name(), "demo");
        assert!(created.root().join("project.json").is_file());

        let opened = mgr.open("demo").unwrap();
        assert_eq!(opened.manifest.name, "demo");
        assert!(opened.manifest.modules.is_empty());
    }

    #[test]
    fn test_create_twice_is_error() {
        let (_dir, mgr) = manager();
        mgr.create("demo").unwrap();
        let err = mgr.create("demo").unwrap_err();
        assert!(matches!(err, Error::ProjectExists { .. }));
    }

    #[test]
    fn test_open_missing_is_error() {
        let (_dir, mgr) = manager();
        let err = mgr.open("ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_sorted_and_manifest_gated() {
        let (dir, mgr) = manager();
        mgr.create("bravo").unwrap();
        mgr.create("alpha").unwrap();
        // A bare directory without a manifest is not a project.
        fs::create_dir(dir.path().join("stray")).unwrap();

        assert_eq!(mgr.list().unwrap(), vec!["alpha", "bravo"]);
    }

    #[test]
    fn test_list_empty_root() {
        let dir = TempDir::new().unwrap();
        let mgr = ProjectManager::new(dir.path().join("nowhere"));
        assert!(mgr.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let (_dir, mgr) = manager();
        let project = mgr.create("demo").unwrap();
        let root = project.root().to_path_buf();

        mgr.delete("demo").unwrap();
        assert!(!root.exists());
        assert!(mgr.open("demo").is_err());
    }

    #[test]
    fn test_delete_missing_is_error() {
        let (_dir, mgr) = manager();
        assert!(mgr.delete("ghost").is_err());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let (_dir, mgr) = manager();
        assert!(mgr.create("").is_err());
        assert!(mgr.create("   ").is_err());
        assert!(mgr.create("a/b").is_err());
        assert!(mgr.create(".hidden").is_err());
    }

    #[test]
    fn test_name_is_trimmed() {
        let (_dir, mgr) = manager();
        let project = mgr.create("  demo  ").unwrap();
        assert_eq!(project.name(), "demo");
        assert!(mgr.open("demo").is_ok());
    }

    #[test]
    fn test_register_module_persists_and_dedups() {
        let (_dir, mgr) = manager();
        let mut project = mgr.create("demo").unwrap();
        project.register_module("requirements").unwrap();
        project.register_module("requirements").unwrap();
        project.register_module("stats").unwrap();

        let reopened = mgr.open("demo").unwrap();
        assert_eq!(reopened.manifest.modules, vec!["requirements", "stats"]);
    }
}
