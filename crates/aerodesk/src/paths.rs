//! Filesystem helpers shared by the per-project document stores.
//!
//! All JSON documents are written atomically: serialize to a sibling
//! temporary file, then rename over the target so a crash never leaves a
//! half-written document behind.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Ensure that a directory exists, creating parents as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| Error::DirectoryCreate {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Atomically write `value` as pretty-printed JSON to `path`.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let data = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a JSON document from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Read a JSON document, falling back to its default when the file is absent.
///
/// # Errors
///
/// Returns an error if an existing file cannot be read or parsed.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.is_file() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn test_write_and_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");

        let doc = Doc {
            name: "demo".to_string(),
            count: 3,
        };
        write_json_atomic(&path, &doc).unwrap();

        let back: Doc = read_json(&path).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/doc.json");

        write_json_atomic(&path, &Doc::default()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");

        write_json_atomic(&path, &Doc::default()).unwrap();
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_read_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let doc: Doc = read_json_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(doc, Doc::default());
    }

    #[test]
    fn test_read_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, b"not json").unwrap();

        let result: Result<Doc> = read_json(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_dir_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b");
        ensure_dir(&path).unwrap();
        ensure_dir(&path).unwrap();
        assert!(path.is_dir());
    }
}
