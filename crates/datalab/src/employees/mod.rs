//! Fake IT-department employees: generation, SQL rendering and salary
//! reporting.

pub mod generator;
pub mod report;
pub mod sql;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use generator::generate_employees;
pub use report::{summarize_salaries, SalaryGroup, SalarySummary};
pub use sql::{insert_statement, insert_script};

/// IT positions an employee can hold.
pub const POSITIONS: [&str; 10] = [
    "Software Engineer",
    "Data Analyst",
    "DevOps Engineer",
    "ML Engineer",
    "QA Engineer",
    "Backend Developer",
    "Frontend Developer",
    "Cloud Architect",
    "SysAdmin",
    "Data Scientist",
];

/// A row of the `employees` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Row id (assigned by storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Full name.
    pub name: String,
    /// Job title.
    pub position: String,
    /// First day on the job.
    pub start_date: NaiveDate,
    /// Yearly salary in USD.
    pub salary: i64,
}

impl Employee {
    /// Create an employee that has not been stored yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        start_date: NaiveDate,
        salary: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            position: position.into(),
            start_date,
            salary,
        }
    }
}
