//! Per-project conceptual sketch index.
//!
//! Sketch images are copied into `<project>/sketches/` and tracked in
//! `sketches.json`. Entries are deduplicated by BLAKE3 content hash, so
//! re-adding the same image is rejected even under a different file name.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::paths::{ensure_dir, read_json_or_default, write_json_atomic};

/// File name of the index inside a project directory.
const INDEX_FILE_NAME: &str = "sketches.json";

/// Directory holding the copied image files.
const SKETCHES_DIR: &str = "sketches";

/// One registered sketch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sketch {
    /// Stable id.
    pub id: String,
    /// File name inside the sketches directory.
    pub file_name: String,
    /// Caption text.
    #[serde(default)]
    pub caption: String,
    /// BLAKE3 hash of the file contents, hex encoded.
    pub content_hash: String,
    /// When the sketch was added.
    pub added_utc: DateTime<Utc>,
}

/// The sketch index document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchIndex {
    /// All registered sketches, in insertion order.
    pub sketches: Vec<Sketch>,
}

/// Manages the sketch index and image files of one project.
#[derive(Debug, Clone)]
pub struct SketchStore {
    project_root: PathBuf,
}

impl SketchStore {
    /// Create a store for the given project root.
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Directory holding the image files.
    #[must_use]
    pub fn sketches_dir(&self) -> PathBuf {
        self.project_root.join(SKETCHES_DIR)
    }

    /// Load the index, defaulting to empty when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing index cannot be read or parsed.
    pub fn load(&self) -> Result<SketchIndex> {
        read_json_or_default(&self.project_root.join(INDEX_FILE_NAME))
    }

    /// Register an image: copy it into the sketches directory and add an
    /// index entry. Returns the new entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not a file, its content hash
    /// matches an already-registered sketch, or the copy fails.
    pub fn add(&self, source: &Path, caption: &str) -> Result<Sketch> {
        if !source.is_file() {
            return Err(Error::validation(format!(
                "'{}' is not a file",
                source.display()
            )));
        }

        let contents = fs::read(source)?;
        let content_hash = blake3::hash(&contents).to_hex().to_string();

        let mut index = self.load()?;
        if index.sketches.iter().any(|s| s.content_hash == content_hash) {
            return Err(Error::duplicate("sketch", content_hash));
        }

        let dir = self.sketches_dir();
        ensure_dir(&dir)?;
        let file_name = unique_file_name(&dir, source);
        fs::copy(source, dir.join(&file_name))?;
        debug!("Copied sketch to {}", dir.join(&file_name).display());

        let sketch = Sketch {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.clone(),
            caption: caption.trim().to_string(),
            content_hash,
            added_utc: Utc::now(),
        };
        index.sketches.push(sketch.clone());
        self.save(&index)?;

        info!("Added sketch '{}'", file_name);
        Ok(sketch)
    }

    /// Set the caption of a sketch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn set_caption(&self, id: &str, caption: &str) -> Result<()> {
        let mut index = self.load()?;
        let sketch = index
            .sketches
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found("sketch", id))?;
        sketch.caption = caption.trim().to_string();
        self.save(&index)
    }

    /// Remove a sketch: delete its file and index entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn remove(&self, id: &str) -> Result<()> {
        let mut index = self.load()?;
        let position = index
            .sketches
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::not_found("sketch", id))?;
        let sketch = index.sketches.remove(position);

        let path = self.sketches_dir().join(&sketch.file_name);
        if path.is_file() {
            fs::remove_file(&path)?;
        }
        self.save(&index)?;
        info!("Removed sketch '{}'", sketch.file_name);
        Ok(())
    }

    fn save(&self, index: &SketchIndex) -> Result<()> {
        write_json_atomic(&self.project_root.join(INDEX_FILE_NAME), index)
    }
}

/// Pick a file name in `dir` based on the source name, suffixing `_1`,
/// `_2`, ... on collision.
fn unique_file_name(dir: &Path, source: &Path) -> String {
    let stem = source
        .file_stem()
        .map_or_else(|| "sketch".to_string(), |s| s.to_string_lossy().into_owned());
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let candidate = format!("{stem}{extension}");
    if !dir.join(&candidate).exists() {
        return candidate;
    }
    let mut i = 1;
    loop {
        let candidate = format!("{stem}_{i}{extension}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SketchStore) {
        let dir = TempDir::new().unwrap();
        let store = SketchStore::new(dir.path().join("project"));
        fs::create_dir_all(dir.path().join("project")).unwrap();
        (dir, store)
    }

    fn write_image(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_empty_index() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().sketches.is_empty());
    }

    #[test]
    fn test_add_copies_file_and_indexes() {
        let (dir, store) = store();
        let src = write_image(&dir, "wing.png", b"png-bytes");

        let sketch = store.add(&src, "  front view ").unwrap();
        assert_eq!(sketch.file_name, "wing.png");
        assert_eq!(sketch.caption, "front view");
        assert_eq!(sketch.content_hash, blake3::hash(b"png-bytes").to_hex().to_string());
        assert!(store.sketches_dir().join("wing.png").is_file());

        let index = store.load().unwrap();
        assert_eq!(index.sketches.len(), 1);
        assert_eq!(index.sketches[0], sketch);
    }

    #[test]
    fn test_add_rejects_duplicate_content() {
        let (dir, store) = store();
        let src = write_image(&dir, "wing.png", b"png-bytes");
        store.add(&src, "").unwrap();

        // Same bytes under another name still collide.
        let copy = write_image(&dir, "wing-copy.png", b"png-bytes");
        let err = store.add(&copy, "").unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.load().unwrap().sketches.len(), 1);
    }

    #[test]
    fn test_add_renames_on_file_name_collision() {
        let (dir, store) = store();
        let a = write_image(&dir, "wing.png", b"first");
        store.add(&a, "").unwrap();

        let nested = dir.path().join("other");
        fs::create_dir(&nested).unwrap();
        let b = nested.join("wing.png");
        fs::write(&b, b"second").unwrap();

        let sketch = store.add(&b, "").unwrap();
        assert_eq!(sketch.file_name, "wing_1.png");
        assert!(store.sketches_dir().join("wing_1.png").is_file());
    }

    #[test]
    fn test_add_missing_source_is_error() {
        let (dir, store) = store();
        let err = store.add(&dir.path().join("ghost.png"), "").unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[test]
    fn test_set_caption() {
        let (dir, store) = store();
        let src = write_image(&dir, "wing.png", b"png-bytes");
        let sketch = store.add(&src, "old").unwrap();

        store.set_caption(&sketch.id, "new caption").unwrap();
        assert_eq!(store.load().unwrap().sketches[0].caption, "new caption");

        assert!(store.set_caption("bogus", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_deletes_file_and_entry() {
        let (dir, store) = store();
        let src = write_image(&dir, "wing.png", b"png-bytes");
        let sketch = store.add(&src, "").unwrap();
        let stored = store.sketches_dir().join("wing.png");
        assert!(stored.is_file());

        store.remove(&sketch.id).unwrap();
        assert!(!stored.exists());
        assert!(store.load().unwrap().sketches.is_empty());

        assert!(store.remove(&sketch.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_removed_hash_can_be_readded() {
        let (dir, store) = store();
        let src = write_image(&dir, "wing.png", b"png-bytes");
        let sketch = store.add(&src, "").unwrap();
        store.remove(&sketch.id).unwrap();

        assert!(store.add(&src, "").is_ok());
    }
}
