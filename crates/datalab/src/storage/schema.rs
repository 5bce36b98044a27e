//! `SQLite` schema definitions for datalab.
//!
//! This module contains the SQL statements for creating and managing
//! the employee database schema.

/// SQL statement to create the employees table.
pub const CREATE_EMPLOYEES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    position TEXT NOT NULL,
    start_date TEXT NOT NULL,
    salary INTEGER NOT NULL
)
";

/// SQL statement to create an index on position for grouping queries.
///
/// Added by schema version 2.
pub const CREATE_POSITION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_employees_position ON employees(position)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Base (version 1) schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_EMPLOYEES_TABLE, CREATE_METADATA_TABLE];

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
    fn test_employees_table_matches_insert_columns() {
        for column in [
            "name TEXT NOT NULL",
            "position TEXT NOT NULL",
            "start_date TEXT NOT NULL",
            "salary INTEGER NOT NULL",
        ] {
            assert!(CREATE_EMPLOYEES_TABLE.contains(column), "missing {column}");
        }
    }
}
