//! # Sample Size for a Proportion
//!
//! Required sample size to estimate a population proportion within a margin
//! of error, with the finite population correction when the population size
//! is known.
//!
//! ```text
//! n0 = Z² · p(1 - p) / E²
//! n  = n0 / (1 + (n0 - 1) / N)
//! ```
//!
//! The reported sample size is the ceiling of `n`, never more than `N`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::statistics::sample_size::{calculate, ConfidenceSpec, SampleSizeInput};
//!
//! let input = SampleSizeInput {
//!     confidence: ConfidenceSpec::ZScore { z: 1.96 },
//!     proportion: 0.5,
//!     margin_of_error: 0.05,
//!     population_size: None,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.raw_sample_size - 384.16).abs() < 1e-9);
//! assert_eq!(result.sample_size, 385);
//! ```

use serde::{Deserialize, Serialize};

use super::normal::z_for_confidence;
use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::series::CurvePoint;
use crate::validation::Validator;

/// Conventional two-sided critical values, as printed in survey tables
const Z_TABLE: &[(f64, f64)] = &[
    (80.0, 1.282),
    (85.0, 1.440),
    (90.0, 1.645),
    (95.0, 1.96),
    (98.0, 2.326),
    (99.0, 2.576),
    (99.5, 2.807),
    (99.9, 3.291),
];

/// Absorbs floating-point noise before taking the ceiling
const CEILING_EPSILON: f64 = 1e-9;

/// How the critical value is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfidenceSpec {
    /// Confidence level in percent, e.g. 95
    Level { pct: f64 },
    /// Critical value given directly
    ZScore { z: f64 },
}

impl ConfidenceSpec {
    pub fn z(&self) -> f64 {
        match *self {
            ConfidenceSpec::ZScore { z } => z,
            ConfidenceSpec::Level { pct } => Z_TABLE
                .iter()
                .find(|(level, _)| (level - pct).abs() < 1e-9)
                .map_or_else(|| z_for_confidence(pct / 100.0), |&(_, z)| z),
        }
    }

    fn validate_into(&self, v: &mut Validator) {
        match *self {
            ConfidenceSpec::Level { pct } => {
                v.in_open_range("confidence.pct", pct, 0.0, 100.0);
            }
            ConfidenceSpec::ZScore { z } => {
                v.positive("confidence.z", z);
            }
        }
    }
}

impl Default for ConfidenceSpec {
    fn default() -> Self {
        ConfidenceSpec::Level { pct: 95.0 }
    }
}

fn default_proportion() -> f64 {
    0.5
}

/// Input parameters for a proportion sample-size calculation.
///
/// `proportion` and `margin_of_error` are fractions (0.05 = 5%).
///
/// ## JSON Example
///
/// ```json
/// {
///   "confidence": { "kind": "level", "pct": 95 },
///   "proportion": 0.5,
///   "margin_of_error": 0.03,
///   "population_size": 20000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeInput {
    #[serde(default)]
    pub confidence: ConfidenceSpec,
    /// Expected proportion; 0.5 is the conservative choice
    #[serde(default = "default_proportion")]
    pub proportion: f64,
    pub margin_of_error: f64,
    #[serde(default)]
    pub population_size: Option<u64>,
}

impl SampleSizeInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        self.confidence.validate_into(&mut v);
        v.probability("proportion", self.proportion);
        v.probability("margin_of_error", self.margin_of_error);
        if let Some(n) = self.population_size {
            v.check(n >= 1, "population_size", n, "Population must contain at least one member");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSizeResult {
    pub z_score: f64,
    /// n0, before any population correction
    pub initial_sample_size: f64,
    /// Unrounded final sample size
    pub raw_sample_size: f64,
    /// Ceiling of the raw size, capped at the population
    pub sample_size: u64,
    pub fpc_applied: bool,
    /// Sample size (y) against margin of error in percent (x)
    pub sensitivity: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Unrounded sample size for one margin of error
fn required(z: f64, p: f64, e: f64, population: Option<u64>) -> (f64, f64) {
    let n0 = z * z * p * (1.0 - p) / (e * e);
    let n = match population {
        Some(big_n) => n0 / (1.0 + (n0 - 1.0) / big_n as f64),
        None => n0,
    };
    (n0, n)
}

fn round_up(n: f64, population: Option<u64>) -> u64 {
    let size = (n - CEILING_EPSILON).ceil().max(1.0) as u64;
    population.map_or(size, |big_n| size.min(big_n))
}

/// Calculate the required sample size.
pub fn calculate(input: &SampleSizeInput) -> CalcResult<SampleSizeResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &SampleSizeInput) -> SampleSizeResult {
    let z = input.confidence.z();
    let p = input.proportion;
    let e = input.margin_of_error;
    let population = input.population_size;

    let mut d = Derivation::new(Formula::ProportionSampleSize);
    let (n0, n) = required(z, p, e, population);
    d.step(format!(
        "n0 = {}² × {} × {} / {}² = {}",
        fmt_num(z),
        fmt_num(p),
        fmt_num(1.0 - p),
        fmt_num(e),
        fmt_num(n0)
    ));
    if let Some(big_n) = population {
        d.apply(Formula::FinitePopulationCorrection);
        d.step(format!(
            "n = {} / (1 + ({} − 1) / {}) = {}",
            fmt_num(n0),
            fmt_num(n0),
            big_n,
            fmt_num(n)
        ));
    }
    let sample_size = round_up(n, population);
    d.step(format!("Sample size = ⌈{}⌉ = {}", fmt_num(n), sample_size));

    let sensitivity = (0..19)
        .map(|i| {
            let margin = 0.01 + 0.005 * i as f64;
            let (_, n) = required(z, p, margin, population);
            CurvePoint::new(margin * 100.0, round_up(n, population) as f64)
        })
        .collect();

    let (formula, steps) = d.into_parts();
    SampleSizeResult {
        z_score: z,
        initial_sample_size: n0,
        raw_sample_size: n,
        sample_size,
        fpc_applied: population.is_some(),
        sensitivity,
        formula,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(population_size: Option<u64>) -> SampleSizeInput {
        SampleSizeInput {
            confidence: ConfidenceSpec::Level { pct: 95.0 },
            proportion: 0.5,
            margin_of_error: 0.05,
            population_size,
        }
    }

    #[test]
    fn test_classic_384() {
        let r = calculate(&input(None)).unwrap();
        assert_eq!(r.z_score, 1.96);
        assert!((r.raw_sample_size - 384.16).abs() < 1e-9);
        assert_eq!(r.sample_size, 385);
        assert!(!r.fpc_applied);
    }

    #[test]
    fn test_finite_population_correction() {
        let r = calculate(&input(Some(1000))).unwrap();
        assert!(r.fpc_applied);
        assert!((r.raw_sample_size - 277.7408).abs() < 1e-3);
        assert_eq!(r.sample_size, 278);
    }

    #[test]
    fn test_capped_at_population() {
        let r = calculate(&input(Some(1))).unwrap();
        assert_eq!(r.sample_size, 1);
        let r = calculate(&input(Some(50))).unwrap();
        assert!(r.sample_size <= 50);
    }

    #[test]
    fn test_zero_population_rejected() {
        let err = calculate(&input(Some(0))).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "population_size");
    }

    #[test]
    fn test_nonstandard_level_uses_exact_inverse() {
        let spec = ConfidenceSpec::Level { pct: 93.0 };
        assert!((spec.z() - 1.8119).abs() < 1e-4);
    }

    #[test]
    fn test_sensitivity_curve() {
        let r = calculate(&input(None)).unwrap();
        assert_eq!(r.sensitivity.len(), 19);
        assert!((r.sensitivity[0].x - 1.0).abs() < 1e-12);
        assert!((r.sensitivity[18].x - 10.0).abs() < 1e-12);
        assert!(r.sensitivity.windows(2).all(|w| w[1].y <= w[0].y));
        assert_eq!(r.sensitivity[8].y, 385.0);
    }

    #[test]
    fn test_bounds() {
        let bad = SampleSizeInput {
            confidence: ConfidenceSpec::Level { pct: 100.0 },
            proportion: 1.0,
            margin_of_error: 0.0,
            population_size: None,
        };
        assert_eq!(calculate(&bad).unwrap_err().field_errors().len(), 3);
    }
}
