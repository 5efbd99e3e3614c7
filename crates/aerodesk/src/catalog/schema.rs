//! `SQLite` schema definitions for the aircraft catalog.
//!
//! This module contains the SQL statements for creating and managing
//! the catalog schema.

/// SQL statement to create the aircraft table.
pub const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    notes TEXT
)
";

/// SQL statement to create the characteristic table.
pub const CREATE_CHARACTERISTIC_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS characteristic (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    unit TEXT
)
";

/// SQL statement to create the per-aircraft value table.
pub const CREATE_VALUE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft_characteristic (
    aircraft_id INTEGER NOT NULL,
    characteristic_id INTEGER NOT NULL,
    value TEXT,
    PRIMARY KEY (aircraft_id, characteristic_id),
    FOREIGN KEY (aircraft_id) REFERENCES aircraft(id) ON DELETE CASCADE,
    FOREIGN KEY (characteristic_id) REFERENCES characteristic(id) ON DELETE CASCADE
)
";

/// Case-insensitive unique index on aircraft names.
pub const CREATE_AIRCRAFT_NAME_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_aircraft_name_ci ON aircraft(lower(name))
";

/// Case-insensitive unique index on characteristic names.
pub const CREATE_CHARACTERISTIC_NAME_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_characteristic_name_ci ON characteristic(lower(name))
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_AIRCRAFT_TABLE,
    CREATE_CHARACTERISTIC_TABLE,
    CREATE_VALUE_TABLE,
    CREATE_AIRCRAFT_NAME_INDEX,
    CREATE_CHARACTERISTIC_NAME_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_value_table_cascades() {
        assert!(CREATE_VALUE_TABLE.contains("ON DELETE CASCADE"));
        assert!(CREATE_VALUE_TABLE.contains("PRIMARY KEY (aircraft_id, characteristic_id)"));
    }

    #[test]
    fn test_name_indexes_case_insensitive() {
        assert!(CREATE_AIRCRAFT_NAME_INDEX.contains("lower(name)"));
        assert!(CREATE_CHARACTERISTIC_NAME_INDEX.contains("lower(name)"));
    }
}
