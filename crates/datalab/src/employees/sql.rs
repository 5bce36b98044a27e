//! Rendering employees as SQL `INSERT` statements.

use super::Employee;

/// Escape a value for use inside a single-quoted SQL literal.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render one `INSERT INTO employees` statement.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datalab::employees::{insert_statement, Employee};
///
/// let e = Employee::new("Liam O'Brien", "SysAdmin", NaiveDate::from_ymd_opt(2019, 5, 2).unwrap(), 75000);
/// assert_eq!(
///     insert_statement(&e),
///     "INSERT INTO employees (name, position, start_date, salary) VALUES('Liam O''Brien', 'SysAdmin', '2019-05-02', 75000);"
/// );
/// ```
#[must_use]
pub fn insert_statement(employee: &Employee) -> String {
    format!(
        "INSERT INTO employees (name, position, start_date, salary) VALUES('{}', '{}', '{}', {});",
        quote_literal(&employee.name),
        quote_literal(&employee.position),
        employee.start_date.format("%Y-%m-%d"),
        employee.salary
    )
}

/// Render a newline-separated script of insert statements.
#[must_use]
pub fn insert_script(employees: &[Employee]) -> String {
    employees
        .iter()
        .map(insert_statement)
        .collect::<Vec<_>>()
        .join("\n")
}
