//! Random employee generation.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use super::{Employee, POSITIONS};

const FIRST_NAMES: [&str; 16] = [
    "James", "Maria", "Wei", "Aisha", "Liam", "Sofia", "Noah", "Priya", "Mateo", "Hannah",
    "Kenji", "Olivia", "Omar", "Chloe", "Dmitri", "Grace",
];

const LAST_NAMES: [&str; 16] = [
    "Smith", "Garcia", "O'Brien", "Chen", "Patel", "Johnson", "D'Angelo", "Nguyen", "Okafor",
    "Müller", "Rossi", "O'Connor", "Kowalski", "Tanaka", "Williams", "Haddad",
];

/// Earliest possible start date.
pub const EARLIEST_START: NaiveDate = match NaiveDate::from_ymd_opt(2015, 1, 1) {
    Some(date) => date,
    None => panic!("invalid earliest start date"),
};

/// Latest possible start date.
pub const LATEST_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 6, 1) {
    Some(date) => date,
    None => panic!("invalid latest start date"),
};

/// Lowest generated salary.
pub const MIN_SALARY: i64 = 60_000;

/// Highest generated salary.
pub const MAX_SALARY: i64 = 200_000;

/// Generate `count` employees.
pub fn generate_employees<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Employee> {
    (0..count).map(|_| random_employee(rng)).collect()
}

/// Draw one employee.
pub fn random_employee<R: Rng + ?Sized>(rng: &mut R) -> Employee {
    let name = fake_name(rng);
    let position = POSITIONS[rng.gen_range(0..POSITIONS.len())];
    let start_date = date_between(rng, EARLIEST_START, LATEST_START);
    let salary = rng.gen_range(MIN_SALARY..=MAX_SALARY);
    Employee::new(name, position, start_date, salary)
}

/// A plausible full name.
pub fn fake_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

/// A uniformly drawn date in `start..=end`.
pub fn date_between<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_employees_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let employees = generate_employees(200, &mut rng);
        assert_eq!(employees.len(), 200);
        for e in &employees {
            assert!(e.id.is_none());
            assert!(POSITIONS.contains(&e.position.as_str()));
            assert!(e.start_date >= EARLIEST_START && e.start_date <= LATEST_START);
            assert!((MIN_SALARY..=MAX_SALARY).contains(&e.salary));
            assert_eq!(e.name.split(' ').count(), 2);
        }
    }

    #[test]
    fn test_generate_employees_seeded() {
        let a = generate_employees(10, &mut StdRng::seed_from_u64(5));
        let b = generate_employees(10, &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_date_between_single_day() {
        let mut rng = StdRng::seed_from_u64(0);
        let day = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(date_between(&mut rng, day, day), day);
    }
}
