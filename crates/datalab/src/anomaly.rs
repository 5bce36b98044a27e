//! Seeded sample-based anomaly flagging.
//!
//! A reading is flagged when its distance from the mean of a small random
//! sample exceeds a multiple of that sample's standard deviation. The sample
//! is drawn from a generator seeded by the last three digits of an
//! identifier, so every identifier gets its own reproducible result.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::stats;

/// Distance from the sample mean, in sample standard deviations, beyond
/// which a reading is flagged.
pub const DEFAULT_THRESHOLD_MULTIPLIER: f64 = 1.5;

/// The sample holds `len / DEFAULT_SAMPLE_DIVISOR` readings (at least one).
pub const DEFAULT_SAMPLE_DIVISOR: usize = 10;

/// Number of trailing identifier characters that form the seed.
const SEED_DIGITS: usize = 3;

/// A numeric data point that can be flagged.
pub trait Reading: Copy {
    /// The reading as a float for the statistics.
    fn to_f64(self) -> f64;
}

impl Reading for i32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Reading for u32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Reading for i64 {
    #[allow(clippy::cast_precision_loss)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Reading for f32 {
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Reading for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// Tuning knobs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlaggerParams {
    /// Multiple of the sample standard deviation used as the cutoff.
    pub threshold_multiplier: f64,
    /// Divisor applied to the input length to size the sample.
    pub sample_divisor: usize,
}

impl Default for FlaggerParams {
    fn default() -> Self {
        Self {
            threshold_multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
            sample_divisor: DEFAULT_SAMPLE_DIVISOR,
        }
    }
}

impl FlaggerParams {
    fn validate(&self) -> Result<()> {
        if !self.threshold_multiplier.is_finite() || self.threshold_multiplier < 0.0 {
            return Err(Error::invalid_argument(format!(
                "threshold multiplier must be a non-negative number, got {}",
                self.threshold_multiplier
            )));
        }
        if self.sample_divisor == 0 {
            return Err(Error::invalid_argument(
                "sample divisor must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Everything computed while flagging a sequence of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport<T> {
    /// Seed derived from the identifier.
    pub seed: u64,
    /// The sampled readings, in draw order.
    pub sample: Vec<T>,
    /// Mean of the sample.
    pub mean: f64,
    /// Sample standard deviation (0 for a single-element sample).
    pub std_dev: f64,
    /// Cutoff distance from the mean.
    pub threshold: f64,
    /// Readings of the full input beyond the cutoff, in input order.
    pub flagged: Vec<T>,
}

/// Flag readings far from the mean of an identifier-seeded sample.
///
/// Returns every reading `a` of the full input with
/// `|a - mean| > 1.5 * std_dev`, where the statistics come from a sample of
/// `max(1, len / 10)` readings. Order and repeats are preserved.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `readings` is empty or when the
/// last three characters of `identifier` are not digits.
///
/// # Examples
///
/// ```
/// let flagged = datalab::flag_anomalies(&[100, 100, 100, 100, 100], "id-123").unwrap();
/// assert!(flagged.is_empty());
/// ```
pub fn flag_anomalies<T: Reading>(readings: &[T], identifier: &str) -> Result<Vec<T>> {
    analyze(readings, identifier, FlaggerParams::default()).map(|report| report.flagged)
}

/// Run the flagger and keep the intermediate statistics.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty input, a malformed
/// identifier, or out-of-range parameters.
pub fn analyze<T: Reading>(
    readings: &[T],
    identifier: &str,
    params: FlaggerParams,
) -> Result<AnomalyReport<T>> {
    params.validate()?;
    let seed = seed_from_identifier(identifier)?;
    if readings.is_empty() {
        return Err(Error::invalid_argument("cannot flag an empty sequence"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let k = sample_size(readings.len(), params.sample_divisor);
    let sample = draw_sample(readings, k, &mut rng);
    debug!(seed, sample_size = k, "Drew anomaly sample");

    let values: Vec<f64> = sample.iter().map(|r| r.to_f64()).collect();
    let (Some(mean), Some(std_dev)) = (stats::mean(&values), stats::sample_std_dev(&values))
    else {
        return Err(Error::invalid_argument("sample is empty"));
    };
    let threshold = params.threshold_multiplier * std_dev;

    let flagged: Vec<T> = readings
        .iter()
        .copied()
        .filter(|r| (r.to_f64() - mean).abs() > threshold)
        .collect();
    debug!(mean, std_dev, threshold, flagged = flagged.len(), "Flagged readings");

    Ok(AnomalyReport {
        seed,
        sample,
        mean,
        std_dev,
        threshold,
        flagged,
    })
}

/// Derive the sampling seed from the identifier's last three characters.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the identifier is shorter than three
/// characters or its suffix is not all ASCII digits.
pub fn seed_from_identifier(identifier: &str) -> Result<u64> {
    let mut suffix: Vec<char> = identifier.chars().rev().take(SEED_DIGITS).collect();
    if suffix.len() < SEED_DIGITS {
        return Err(Error::invalid_argument(format!(
            "identifier {identifier:?} must have at least {SEED_DIGITS} characters"
        )));
    }
    suffix.reverse();
    let suffix: String = suffix.into_iter().collect();
    if !suffix.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_argument(format!(
            "identifier {identifier:?} must end in {SEED_DIGITS} digits"
        )));
    }
    suffix
        .parse()
        .map_err(|e| Error::invalid_argument(format!("bad identifier suffix {suffix:?}: {e}")))
}

/// Sample size for an input of `len` readings: `max(1, len / divisor)`.
#[must_use]
pub fn sample_size(len: usize, divisor: usize) -> usize {
    (len / divisor.max(1)).max(1)
}

/// Draw `k` readings without replacement.
///
/// Partial Fisher-Yates over the index vector: step `i` swaps index `i` with
/// one drawn uniformly from `i..len`. The first `k` indices, in draw order,
/// form the sample. `k` is clamped to the input length.
pub fn draw_sample<T: Copy, R: Rng + ?Sized>(readings: &[T], k: usize, rng: &mut R) -> Vec<T> {
    let k = k.min(readings.len());
    let mut indices: Vec<usize> = (0..readings.len()).collect();
    for i in 0..k {
        let j = rng.gen_range(i..indices.len());
        indices.swap(i, j);
    }
    indices[..k].iter().map(|&i| readings[i]).collect()
}
