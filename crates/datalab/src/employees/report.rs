//! Average salary per position and start year.

use chrono::Datelike;
use itertools::Itertools;
use serde::Serialize;

use super::Employee;
use crate::error::{Error, Result};
use crate::stats;

/// Average salary of the employees sharing a position and start year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryGroup {
    /// Job title.
    pub position: String,
    /// Calendar year of the start date.
    pub start_year: i32,
    /// Mean salary in USD.
    pub average_salary: f64,
    /// Number of employees in the group.
    pub headcount: usize,
}

/// Grouped salaries with the extreme groups picked out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalarySummary {
    /// Groups ordered by position, then start year.
    pub groups: Vec<SalaryGroup>,
    /// Group with the highest average (first one wins a tie).
    pub highest: SalaryGroup,
    /// Group with the lowest average (first one wins a tie).
    pub lowest: SalaryGroup,
}

/// Group employees by `(position, start year)` and average their salaries.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when there are no employees.
#[allow(clippy::cast_precision_loss)]
pub fn summarize_salaries(employees: &[Employee]) -> Result<SalarySummary> {
    let groups: Vec<SalaryGroup> = employees
        .iter()
        .into_group_map_by(|e| (e.position.clone(), e.start_date.year()))
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .filter_map(|((position, start_year), members)| {
            let salaries: Vec<f64> = members.iter().map(|e| e.salary as f64).collect();
            stats::mean(&salaries).map(|average_salary| SalaryGroup {
                position,
                start_year,
                average_salary,
                headcount: members.len(),
            })
        })
        .collect();

    let mut iter = groups.iter();
    let Some(first) = iter.next() else {
        return Err(Error::invalid_argument("no employees to summarize"));
    };
    let (highest, lowest) = iter.fold((first, first), |(hi, lo), g| {
        (
            if g.average_salary > hi.average_salary { g } else { hi },
            if g.average_salary < lo.average_salary { g } else { lo },
        )
    });
    let (highest, lowest) = (highest.clone(), lowest.clone());

    Ok(SalarySummary {
        groups,
        highest,
        lowest,
    })
}
