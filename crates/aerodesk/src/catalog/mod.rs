//! Shared aircraft catalog.
//!
//! This module provides `SQLite`-based persistent storage for reference
//! aircraft, their characteristics, and per-aircraft values, shared across
//! all projects. Names are unique case-insensitively; values cascade on
//! delete. A JSON dump format supports export and merge-import.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::paths::{read_json, write_json_atomic};

/// A reference aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Row id (assigned by the catalog).
    pub id: i64,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A characteristic that aircraft can carry values for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    /// Row id (assigned by the catalog).
    pub id: i64,
    /// Display name, unique case-insensitively.
    pub name: String,
    /// Unit label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// A characteristic value attached to one aircraft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicValue {
    /// Id of the characteristic.
    pub characteristic_id: i64,
    /// Characteristic name.
    pub name: String,
    /// Unit label, if any.
    pub unit: Option<String>,
    /// Stored value (free text; numeric where it matters).
    pub value: Option<String>,
}

/// Serialized form of the full catalog for export/import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDump {
    /// All aircraft.
    #[serde(default)]
    pub aircraft: Vec<Aircraft>,
    /// All characteristics.
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    /// Values keyed by aircraft and characteristic name.
    #[serde(default)]
    pub values: Vec<DumpValue>,
}

/// One exported value, keyed by names so dumps merge across databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpValue {
    /// Aircraft name.
    pub aircraft: String,
    /// Characteristic name.
    pub characteristic: String,
    /// Stored value.
    pub value: Option<String>,
}

/// SQLite-backed repository for the aircraft catalog.
#[derive(Debug)]
pub struct Catalog {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Catalog {
    /// Open or create a catalog database at the given path.
    ///
    /// Creates parent directories and initializes the schema as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening catalog at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL for better concurrent read performance; cascades need FKs on.
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Catalog opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory catalog for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Aircraft ===

    /// Create an aircraft.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is already taken (case-insensitive)
    /// or `Validation` if it is empty.
    pub fn create_aircraft(&self, name: &str, notes: Option<&str>) -> Result<i64> {
        let name = validate_name(name)?;
        self.conn
            .execute(
                "INSERT INTO aircraft (name, notes) VALUES (?1, ?2)",
                params![name, notes],
            )
            .map_err(|e| map_constraint(e, "aircraft", &name))?;
        let id = self.conn.last_insert_rowid();
        info!("Created aircraft '{}' (id {})", name, id);
        Ok(id)
    }

    /// Rename an aircraft.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or `DuplicateName` if the new
    /// name is taken.
    pub fn rename_aircraft(&self, id: i64, new_name: &str) -> Result<()> {
        let new_name = validate_name(new_name)?;
        let affected = self
            .conn
            .execute(
                "UPDATE aircraft SET name = ?1 WHERE id = ?2",
                params![new_name, id],
            )
            .map_err(|e| map_constraint(e, "aircraft", &new_name))?;
        if affected == 0 {
            return Err(Error::not_found("aircraft", id));
        }
        info!("Renamed aircraft {} -> '{}'", id, new_name);
        Ok(())
    }

    /// Update the notes of an aircraft.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn update_aircraft_notes(&self, id: i64, notes: Option<&str>) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE aircraft SET notes = ?1 WHERE id = ?2",
            params![notes, id],
        )?;
        if affected == 0 {
            return Err(Error::not_found("aircraft", id));
        }
        debug!("Updated notes for aircraft {}", id);
        Ok(())
    }

    /// Delete an aircraft and its values.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_aircraft(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM aircraft WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted aircraft {}", id);
        }
        Ok(affected > 0)
    }

    /// List aircraft, optionally filtered by a case-insensitive name substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_aircraft(&self, filter: Option<&str>) -> Result<Vec<Aircraft>> {
        let mut sql = "SELECT id, name, notes FROM aircraft".to_string();
        if filter.is_some() {
            sql.push_str(" WHERE lower(name) LIKE ?1");
        }
        sql.push_str(" ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = if let Some(filter) = filter {
            let pattern = format!("%{}%", filter.to_lowercase());
            stmt.query_map([pattern], Self::row_to_aircraft)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], Self::row_to_aircraft)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    /// Get an aircraft by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn get_aircraft(&self, id: i64) -> Result<Aircraft> {
        self.conn
            .query_row(
                "SELECT id, name, notes FROM aircraft WHERE id = ?1",
                [id],
                Self::row_to_aircraft,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("aircraft", id))
    }

    /// Look up an aircraft by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_aircraft_by_name(&self, name: &str) -> Result<Option<Aircraft>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, name, notes FROM aircraft WHERE lower(name) = lower(?1)",
                [name],
                Self::row_to_aircraft,
            )
            .optional()?;
        Ok(found)
    }

    // === Characteristics ===

    /// Create a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is already taken (case-insensitive)
    /// or `Validation` if it is empty.
    pub fn create_characteristic(&self, name: &str, unit: Option<&str>) -> Result<i64> {
        let name = validate_name(name)?;
        self.conn
            .execute(
                "INSERT INTO characteristic (name, unit) VALUES (?1, ?2)",
                params![name, unit],
            )
            .map_err(|e| map_constraint(e, "characteristic", &name))?;
        let id = self.conn.last_insert_rowid();
        info!("Created characteristic '{}' (id {})", name, id);
        Ok(id)
    }

    /// Rename a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or `DuplicateName` if the new
    /// name is taken.
    pub fn rename_characteristic(&self, id: i64, new_name: &str) -> Result<()> {
        let new_name = validate_name(new_name)?;
        let affected = self
            .conn
            .execute(
                "UPDATE characteristic SET name = ?1 WHERE id = ?2",
                params![new_name, id],
            )
            .map_err(|e| map_constraint(e, "characteristic", &new_name))?;
        if affected == 0 {
            return Err(Error::not_found("characteristic", id));
        }
        info!("Renamed characteristic {} -> '{}'", id, new_name);
        Ok(())
    }

    /// Update the unit of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn update_characteristic_unit(&self, id: i64, unit: Option<&str>) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE characteristic SET unit = ?1 WHERE id = ?2",
            params![unit, id],
        )?;
        if affected == 0 {
            return Err(Error::not_found("characteristic", id));
        }
        debug!("Updated unit for characteristic {}", id);
        Ok(())
    }

    /// Delete a characteristic and its values.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_characteristic(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM characteristic WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted characteristic {}", id);
        }
        Ok(affected > 0)
    }

    /// List characteristics, optionally filtered by a case-insensitive name
    /// substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_characteristics(&self, filter: Option<&str>) -> Result<Vec<Characteristic>> {
        let mut sql = "SELECT id, name, unit FROM characteristic".to_string();
        if filter.is_some() {
            sql.push_str(" WHERE lower(name) LIKE ?1");
        }
        sql.push_str(" ORDER BY name");
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = if let Some(filter) = filter {
            let pattern = format!("%{}%", filter.to_lowercase());
            stmt.query_map([pattern], Self::row_to_characteristic)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], Self::row_to_characteristic)?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        Ok(rows)
    }

    /// Get a characteristic by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    pub fn get_characteristic(&self, id: i64) -> Result<Characteristic> {
        self.conn
            .query_row(
                "SELECT id, name, unit FROM characteristic WHERE id = ?1",
                [id],
                Self::row_to_characteristic,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("characteristic", id))
    }

    /// Look up a characteristic by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_characteristic_by_name(&self, name: &str) -> Result<Option<Characteristic>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, name, unit FROM characteristic WHERE lower(name) = lower(?1)",
                [name],
                Self::row_to_characteristic,
            )
            .optional()?;
        Ok(found)
    }

    // === Values ===

    /// Set (upsert) the value of a characteristic for an aircraft.
    ///
    /// # Errors
    ///
    /// Returns an error if either id does not exist or the operation fails.
    pub fn set_value(&self, aircraft_id: i64, characteristic_id: i64, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO aircraft_characteristic (aircraft_id, characteristic_id, value)
                VALUES (?1, ?2, ?3)
                ON CONFLICT (aircraft_id, characteristic_id)
                DO UPDATE SET value = excluded.value
                ",
                params![aircraft_id, characteristic_id, value],
            )?;
        debug!("Set value for {}/{}", aircraft_id, characteristic_id);
        Ok(())
    }

    /// Remove the value of a characteristic for an aircraft.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_value(&self, aircraft_id: i64, characteristic_id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM aircraft_characteristic WHERE aircraft_id = ?1 AND characteristic_id = ?2",
            params![aircraft_id, characteristic_id],
        )?;
        Ok(affected > 0)
    }

    /// Get all values stored for an aircraft, ordered by characteristic name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn values_for_aircraft(&self, aircraft_id: i64) -> Result<Vec<CharacteristicValue>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT ac.characteristic_id, c.name, c.unit, ac.value
            FROM aircraft_characteristic ac
            JOIN characteristic c ON c.id = ac.characteristic_id
            WHERE ac.aircraft_id = ?1
            ORDER BY c.name
            ",
        )?;
        let values = stmt
            .query_map([aircraft_id], |row| {
                Ok(CharacteristicValue {
                    characteristic_id: row.get(0)?,
                    name: row.get(1)?,
                    unit: row.get(2)?,
                    value: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(values)
    }

    // === Export / import ===

    /// Dump the entire catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn dump(&self) -> Result<CatalogDump> {
        let aircraft = self.list_aircraft(None)?;
        let characteristics = self.list_characteristics(None)?;
        let mut values = Vec::new();
        for a in &aircraft {
            for v in self.values_for_aircraft(a.id)? {
                values.push(DumpValue {
                    aircraft: a.name.clone(),
                    characteristic: v.name,
                    value: v.value,
                });
            }
        }
        Ok(CatalogDump {
            aircraft,
            characteristics,
            values,
        })
    }

    /// Export the catalog to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the dump or the write fails.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let dump = self.dump()?;
        write_json_atomic(path, &dump)?;
        info!("Exported catalog to {}", path.display());
        Ok(())
    }

    /// Import a JSON dump, merging by case-insensitive name.
    ///
    /// Existing aircraft and characteristics are kept; characteristics
    /// missing a unit pick one up from the dump; values are upserted.
    /// Returns the number of values applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the merge fails.
    pub fn import_json(&self, path: &Path) -> Result<usize> {
        let dump: CatalogDump = read_json(path)?;
        let mut applied = 0;

        for a in &dump.aircraft {
            if self.find_aircraft_by_name(&a.name)?.is_none() {
                self.create_aircraft(&a.name, a.notes.as_deref())?;
            }
        }
        for c in &dump.characteristics {
            match self.find_characteristic_by_name(&c.name)? {
                None => {
                    self.create_characteristic(&c.name, c.unit.as_deref())?;
                }
                Some(existing) if existing.unit.is_none() && c.unit.is_some() => {
                    self.update_characteristic_unit(existing.id, c.unit.as_deref())?;
                }
                Some(_) => {}
            }
        }
        for v in &dump.values {
            let aircraft = self.find_aircraft_by_name(&v.aircraft)?;
            let characteristic = self.find_characteristic_by_name(&v.characteristic)?;
            if let (Some(a), Some(c), Some(value)) = (aircraft, characteristic, v.value.as_deref())
            {
                self.set_value(a.id, c.id, value)?;
                applied += 1;
            }
        }

        info!("Imported catalog dump from {}", path.display());
        Ok(applied)
    }

    fn row_to_aircraft(row: &rusqlite::Row) -> rusqlite::Result<Aircraft> {
        Ok(Aircraft {
            id: row.get(0)?,
            name: row.get(1)?,
            notes: row.get(2)?,
        })
    }

    fn row_to_characteristic(row: &rusqlite::Row) -> rusqlite::Result<Characteristic> {
        Ok(Characteristic {
            id: row.get(0)?,
            name: row.get(1)?,
            unit: row.get(2)?,
        })
    }
}

/// Strip and validate a non-empty name.
fn validate_name(name: &str) -> Result<String> {
    let cleaned = name.trim();
    if cleaned.is_empty() {
        return Err(Error::validation("name cannot be empty"));
    }
    Ok(cleaned.to_string())
}

/// Map a unique-index violation to `DuplicateName`, everything else to
/// `DatabaseQuery`.
fn map_constraint(err: rusqlite::Error, kind: &'static str, name: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            return Error::duplicate(kind, name);
        }
    }
    Error::DatabaseQuery(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::open_in_memory().expect("failed to create test catalog")
    }

    #[test]
    fn test_create_and_get_aircraft() {
        let cat = catalog();
        let id = cat.create_aircraft("Falcon", Some("twin turboprop")).unwrap();

        let aircraft = cat.get_aircraft(id).unwrap();
        assert_eq!(aircraft.name, "Falcon");
        assert_eq!(aircraft.notes.as_deref(), Some("twin turboprop"));
    }

    #[test]
    fn test_duplicate_aircraft_name_case_insensitive() {
        let cat = catalog();
        cat.create_aircraft("Falcon", None).unwrap();

        let err = cat.create_aircraft("falcon", None).unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_empty_name_rejected() {
        let cat = catalog();
        assert!(cat.create_aircraft("  ", None).is_err());
        assert!(cat.create_characteristic("", None).is_err());
    }

    #[test]
    fn test_name_is_trimmed() {
        let cat = catalog();
        let id = cat.create_aircraft("  Eagle  ", None).unwrap();
        assert_eq!(cat.get_aircraft(id).unwrap().name, "Eagle");
    }

    #[test]
    fn test_rename_aircraft() {
        let cat = catalog();
        let id = cat.create_aircraft("Falcon", None).unwrap();
        cat.rename_aircraft(id, "Falcon II").unwrap();
        assert_eq!(cat.get_aircraft(id).unwrap().name, "Falcon II");
    }

    #[test]
    fn test_rename_to_taken_name_is_duplicate() {
        let cat = catalog();
        let id = cat.create_aircraft("Falcon", None).unwrap();
        cat.create_aircraft("Eagle", None).unwrap();

        let err = cat.rename_aircraft(id, "EAGLE").unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_rename_missing_aircraft() {
        let cat = catalog();
        let err = cat.rename_aircraft(999, "Ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_notes() {
        let cat = catalog();
        let id = cat.create_aircraft("Falcon", None).unwrap();
        cat.update_aircraft_notes(id, Some("updated")).unwrap();
        assert_eq!(
            cat.get_aircraft(id).unwrap().notes.as_deref(),
            Some("updated")
        );
    }

    #[test]
    fn test_delete_aircraft() {
        let cat = catalog();
        let id = cat.create_aircraft("Falcon", None).unwrap();
        assert!(cat.delete_aircraft(id).unwrap());
        assert!(!cat.delete_aircraft(id).unwrap());
        assert!(cat.get_aircraft(id).is_err());
    }

    #[test]
    fn test_list_aircraft_sorted_and_filtered() {
        let cat = catalog();
        cat.create_aircraft("Hawk", None).unwrap();
        cat.create_aircraft("Eagle", None).unwrap();
        cat.create_aircraft("Falcon", None).unwrap();

        let all = cat.list_aircraft(None).unwrap();
        let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Eagle", "Falcon", "Hawk"]);

        let filtered = cat.list_aircraft(Some("AL")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Falcon");
    }

    #[test]
    fn test_find_aircraft_by_name() {
        let cat = catalog();
        cat.create_aircraft("Falcon", None).unwrap();
        assert!(cat.find_aircraft_by_name("FALCON").unwrap().is_some());
        assert!(cat.find_aircraft_by_name("Ghost").unwrap().is_none());
    }

    #[test]
    fn test_characteristic_crud() {
        let cat = catalog();
        let id = cat.create_characteristic("wingspan", Some("m")).unwrap();

        let c = cat.get_characteristic(id).unwrap();
        assert_eq!(c.name, "wingspan");
        assert_eq!(c.unit.as_deref(), Some("m"));

        cat.rename_characteristic(id, "span").unwrap();
        cat.update_characteristic_unit(id, Some("ft")).unwrap();
        let c = cat.get_characteristic(id).unwrap();
        assert_eq!(c.name, "span");
        assert_eq!(c.unit.as_deref(), Some("ft"));

        assert!(cat.delete_characteristic(id).unwrap());
        assert!(cat.get_characteristic(id).is_err());
    }

    #[test]
    fn test_duplicate_characteristic_name() {
        let cat = catalog();
        cat.create_characteristic("mtow", Some("kg")).unwrap();
        assert!(cat.create_characteristic("MTOW", None).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_set_and_get_values() {
        let cat = catalog();
        let aircraft = cat.create_aircraft("Falcon", None).unwrap();
        let span = cat.create_characteristic("wingspan", Some("m")).unwrap();
        let mtow = cat.create_characteristic("mtow", Some("kg")).unwrap();

        cat.set_value(aircraft, span, "15.2").unwrap();
        cat.set_value(aircraft, mtow, "8000").unwrap();

        let values = cat.values_for_aircraft(aircraft).unwrap();
        assert_eq!(values.len(), 2);
        // Ordered by characteristic name: mtow before wingspan.
        assert_eq!(values[0].name, "mtow");
        assert_eq!(values[0].value.as_deref(), Some("8000"));
        assert_eq!(values[1].name, "wingspan");
    }

    #[test]
    fn test_set_value_upserts() {
        let cat = catalog();
        let aircraft = cat.create_aircraft("Falcon", None).unwrap();
        let span = cat.create_characteristic("wingspan", Some("m")).unwrap();

        cat.set_value(aircraft, span, "15.0").unwrap();
        cat.set_value(aircraft, span, "15.5").unwrap();

        let values = cat.values_for_aircraft(aircraft).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value.as_deref(), Some("15.5"));
    }

    #[test]
    fn test_remove_value() {
        let cat = catalog();
        let aircraft = cat.create_aircraft("Falcon", None).unwrap();
        let span = cat.create_characteristic("wingspan", None).unwrap();
        cat.set_value(aircraft, span, "15").unwrap();

        assert!(cat.remove_value(aircraft, span).unwrap());
        assert!(!cat.remove_value(aircraft, span).unwrap());
        assert!(cat.values_for_aircraft(aircraft).unwrap().is_empty());
    }

    #[test]
    fn test_delete_aircraft_cascades_values() {
        let cat = catalog();
        let aircraft = cat.create_aircraft("Falcon", None).unwrap();
        let span = cat.create_characteristic("wingspan", None).unwrap();
        cat.set_value(aircraft, span, "15").unwrap();

        cat.delete_aircraft(aircraft).unwrap();

        let count: i64 = cat
            .conn
            .query_row("SELECT COUNT(*) FROM aircraft_characteristic", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_dump_contents() {
        let cat = catalog();
        let aircraft = cat.create_aircraft("Falcon", None).unwrap();
        let span = cat.create_characteristic("wingspan", Some("m")).unwrap();
        cat.set_value(aircraft, span, "15.2").unwrap();

        let dump = cat.dump().unwrap();
        assert_eq!(dump.aircraft.len(), 1);
        assert_eq!(dump.characteristics.len(), 1);
        assert_eq!(dump.values.len(), 1);
        assert_eq!(dump.values[0].aircraft, "Falcon");
        assert_eq!(dump.values[0].characteristic, "wingspan");
        assert_eq!(dump.values[0].value.as_deref(), Some("15.2"));
    }

    #[test]
    fn test_export_import_merge() {
        let dir = TempDir::new().unwrap();
        let dump_path = dir.path().join("dump.json");

        let src = catalog();
        let aircraft = src.create_aircraft("Falcon", Some("notes")).unwrap();
        let span = src.create_characteristic("wingspan", Some("m")).unwrap();
        src.set_value(aircraft, span, "15.2").unwrap();
        src.export_json(&dump_path).unwrap();

        let dst = catalog();
        // Pre-existing entries survive the merge; units get filled in.
        dst.create_aircraft("falcon", None).unwrap();
        dst.create_characteristic("Wingspan", None).unwrap();

        let applied = dst.import_json(&dump_path).unwrap();
        assert_eq!(applied, 1);

        let aircraft = dst.list_aircraft(None).unwrap();
        assert_eq!(aircraft.len(), 1);
        let characteristic = dst.find_characteristic_by_name("wingspan").unwrap().unwrap();
        assert_eq!(characteristic.unit.as_deref(), Some("m"));

        let values = dst.values_for_aircraft(aircraft[0].id).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value.as_deref(), Some("15.2"));
    }

    #[test]
    fn test_import_missing_file_is_error() {
        let cat = catalog();
        assert!(cat.import_json(Path::new("/nonexistent/dump.json")).is_err());
    }

    #[test]
    fn test_open_file_based() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/catalog.sqlite");

        let cat = Catalog::open(&path).unwrap();
        cat.create_aircraft("Falcon", None).unwrap();
        assert_eq!(cat.path(), path);
        assert!(path.exists());
    }
}
