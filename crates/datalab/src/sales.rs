//! Synthetic sales records for data-cleaning exercises.
//!
//! The generated data is deliberately a little dirty: city names come in
//! inconsistent spellings and some coupon codes are invalid or blank.

use std::io;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Products on sale.
pub const PRODUCTS: [&str; 5] = ["Laptop", "Phone", "Tablet", "Headphones", "Charger"];

/// Coupon codes, including an invalid and a blank one.
pub const COUPONS: [&str; 5] = ["SAVE10", "SAVE20", "FREESHIP", "INVALID", ""];

/// Shipping cities, including duplicate spellings.
pub const CITIES: [&str; 7] = [
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "new york",
    "LA",
];

/// CSV header, in [`SaleRecord`] field order.
pub const SALE_COLUMNS: [&str; 7] = [
    "date",
    "customer_id",
    "product",
    "price",
    "quantity",
    "coupon_code",
    "shipping_city",
];

/// First day a sale can fall on.
pub const FIRST_SALE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid first sale date"),
};

/// Sales are spread over this many days after [`FIRST_SALE_DATE`] (inclusive).
const SALE_WINDOW_DAYS: i64 = 365;

/// One row of the synthetic sales file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Day of the sale, written as `MM/DD/YYYY`.
    #[serde(with = "us_date")]
    pub date: NaiveDate,
    /// Customer identifier such as `CUST4821`.
    pub customer_id: String,
    /// Product name.
    pub product: String,
    /// Unit price in dollars, two decimals.
    pub price: f64,
    /// Units sold.
    pub quantity: u32,
    /// Coupon applied at checkout; may be blank.
    pub coupon_code: String,
    /// Destination city as typed by the customer.
    pub shipping_city: String,
}

mod us_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%m/%d/%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Generate `count` sales records from a generator seeded with `seed`.
#[must_use]
pub fn generate_sales(count: usize, seed: u64) -> Vec<SaleRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let records: Vec<SaleRecord> = (0..count).map(|_| random_sale(&mut rng)).collect();
    debug!(count, seed, "Generated synthetic sales");
    records
}

/// Draw a single sale.
pub fn random_sale<R: Rng + ?Sized>(rng: &mut R) -> SaleRecord {
    let date = FIRST_SALE_DATE + Duration::days(rng.gen_range(0..=SALE_WINDOW_DAYS));
    let customer_id = format!("CUST{}", rng.gen_range(1000..=9999));
    let product = pick(rng, &PRODUCTS).to_string();
    let price = round_cents(rng.gen_range(10.0..=1000.0));
    let quantity = rng.gen_range(1..=10);
    let coupon_code = pick(rng, &COUPONS).to_string();
    let shipping_city = pick(rng, &CITIES).to_string();

    SaleRecord {
        date,
        customer_id,
        product,
        price,
        quantity,
        coupon_code,
        shipping_city,
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, choices: &[&'a str]) -> &'a str {
    choices[rng.gen_range(0..choices.len())]
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Write records as CSV to any writer.
///
/// The header row is always written, even for an empty slice.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_records<W: io::Write>(records: &[SaleRecord], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(SALE_COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records to a CSV file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_csv(records: &[SaleRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_records(records, io::BufWriter::new(file))?;
    info!("Wrote {} sales records to {}", records.len(), path.display());
    Ok(())
}
