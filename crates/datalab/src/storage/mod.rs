//! Storage layer for datalab.
//!
//! This module provides the `SQLite` database that holds the `employees`
//! table read by the salary report and filled by the fake SQL generator.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::employees::Employee;
use crate::error::{Error, Result};

/// Date format of the `start_date` column.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Employee database.
#[derive(Debug)]
pub struct EmployeeStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl EmployeeStore {
    /// Open or create an employee database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

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

    /// Insert one employee, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, employee: &Employee) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO employees (name, position, start_date, salary) VALUES (?1, ?2, ?3, ?4)",
            params![
                employee.name,
                employee.position,
                employee.start_date.format(DATE_FORMAT).to_string(),
                employee.salary,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted employee with id {}", id);
        Ok(id)
    }

    /// Execute a script of SQL statements in a single transaction.
    ///
    /// Returns how many rows the script added to the `employees` table.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is committed then.
    pub fn apply_script(&self, sql: &str) -> Result<usize> {
        let before = self.count()?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.commit()?;
        let added = usize::try_from(self.count()? - before).unwrap_or(0);
        info!("Applied SQL script, {} employees added", added);
        Ok(added)
    }

    /// Read every row of the `employees` table, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row holds a malformed date.
    pub fn fetch_employees(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, name, position, start_date, salary
            FROM employees ORDER BY id
            ",
        )?;

        let employees = stmt
            .query_map([], Self::row_to_employee)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Fetched {} employees", employees.len());

        Ok(employees)
    }

    /// Count employees in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_employee(row: &rusqlite::Row) -> rusqlite::Result<Employee> {
        let start_date_str: String = row.get(3)?;
        let start_date = NaiveDate::parse_from_str(&start_date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Employee {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            position: row.get(2)?,
            start_date,
            salary: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employees::{generate_employees, insert_script};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_store() -> EmployeeStore {
        EmployeeStore::open_in_memory().expect("failed to create test storage")
    }

    fn employee(name: &str) -> Employee {
        Employee::new(
            name,
            "Cloud Architect",
            NaiveDate::from_ymd_opt(2018, 7, 1).unwrap(),
            150_000,
        )
    }

    #[test]
    fn test_insert_and_fetch() {
        let store = create_test_store();
        let id = store.insert(&employee("Priya Patel")).unwrap();

        let all = store.fetch_employees().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, Some(id));
        assert_eq!(all[0].name, "Priya Patel");
        assert_eq!(all[0].start_date, NaiveDate::from_ymd_opt(2018, 7, 1).unwrap());
        assert_eq!(all[0].salary, 150_000);
    }

    #[test]
    fn test_fetch_preserves_insert_order() {
        let store = create_test_store();
        for name in ["A One", "B Two", "C Three"] {
            store.insert(&employee(name)).unwrap();
        }
        let names: Vec<String> = store
            .fetch_employees()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["A One", "B Two", "C Three"]);
    }

    #[test]
    fn test_apply_generated_script() {
        let store = create_test_store();
        let mut rng = StdRng::seed_from_u64(3);
        let generated = generate_employees(50, &mut rng);

        let added = store.apply_script(&insert_script(&generated)).unwrap();
        assert_eq!(added, 50);

        let fetched = store.fetch_employees().unwrap();
        for (stored, original) in fetched.iter().zip(&generated) {
            assert_eq!(stored.name, original.name);
            assert_eq!(stored.position, original.position);
            assert_eq!(stored.start_date, original.start_date);
            assert_eq!(stored.salary, original.salary);
        }
    }

    #[test]
    fn test_apply_script_handles_quoted_names() {
        let store = create_test_store();
        let script = insert_script(&[employee("Liam O'Brien")]);
        assert_eq!(store.apply_script(&script).unwrap(), 1);
        assert_eq!(store.fetch_employees().unwrap()[0].name, "Liam O'Brien");
    }

    #[test]
    fn test_failed_script_is_rolled_back() {
        let store = create_test_store();
        let script = format!(
            "{}\nINSERT INTO nowhere VALUES (1);",
            insert_script(&[employee("Kept Out")])
        );
        assert!(store.apply_script(&script).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_date_is_an_error() {
        let store = create_test_store();
        store
            .apply_script(
                "INSERT INTO employees (name, position, start_date, salary) \
                 VALUES ('X Y', 'SysAdmin', 'yesterday', 1);",
            )
            .unwrap();
        assert!(store.fetch_employees().is_err());
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
        store.insert(&employee("One")).unwrap();
        store.insert(&employee("Two")).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_path() {
        let store = create_test_store();
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_file_based_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("datalab_store_test_{}", std::process::id()));
        let db_path = dir.join("nested").join("lab.db");
        let _ = std::fs::remove_dir_all(&dir);

        let store = EmployeeStore::open(&db_path).unwrap();
        store.insert(&employee("File Backed")).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.path(), db_path);

        drop(store);
        let reopened = EmployeeStore::open(&db_path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);

        drop(reopened);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
