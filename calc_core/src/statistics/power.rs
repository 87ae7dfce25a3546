//! # Power Analysis
//!
//! Sample size needed to detect an effect with a given significance level
//! and power, for one-sample and two-sample mean tests (standardized effect
//! size) and for comparing two proportions. Uses the normal approximation.

use serde::{Deserialize, Serialize};

use super::normal::{inverse_normal_cdf, normal_cdf};
use crate::errors::{CalcError, CalcResult};
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::series::{sample_curve, CurvePoint};
use crate::validation::Validator;

const CURVE_POINTS: usize = 50;

/// Hypothesis test being planned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PowerTest {
    /// One-sample mean, Cohen's d
    OneSampleMean { effect_size: f64 },
    /// Two independent means, Cohen's d
    TwoSampleMeans { effect_size: f64 },
    TwoProportions { p1: f64, p2: f64 },
}

impl PowerTest {
    fn groups(&self) -> u64 {
        match self {
            PowerTest::OneSampleMean { .. } => 1,
            _ => 2,
        }
    }

    fn formula(&self) -> Formula {
        match self {
            PowerTest::OneSampleMean { .. } => Formula::PowerOneSampleMean,
            PowerTest::TwoSampleMeans { .. } => Formula::PowerTwoSampleMeans,
            PowerTest::TwoProportions { .. } => Formula::PowerTwoProportions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tails {
    One,
    #[default]
    Two,
}

fn default_alpha() -> f64 {
    0.05
}

fn default_power() -> f64 {
    0.8
}

/// Input parameters for a power analysis.
///
/// ## JSON Example
///
/// ```json
/// {
///   "test": { "kind": "two_proportions", "p1": 0.6, "p2": 0.4 },
///   "alpha": 0.05,
///   "power": 0.8,
///   "tails": "two"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerInput {
    pub test: PowerTest,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_power")]
    pub power: f64,
    #[serde(default)]
    pub tails: Tails,
}

impl PowerInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        match self.test {
            PowerTest::OneSampleMean { effect_size } | PowerTest::TwoSampleMeans { effect_size } => {
                v.positive("test.effect_size", effect_size);
            }
            PowerTest::TwoProportions { p1, p2 } => {
                v.probability("test.p1", p1);
                v.probability("test.p2", p2);
            }
        }
        v.probability("alpha", self.alpha);
        v.probability("power", self.power);
        v.finish()
    }

    fn z_alpha(&self) -> f64 {
        match self.tails {
            Tails::One => inverse_normal_cdf(1.0 - self.alpha),
            Tails::Two => inverse_normal_cdf(1.0 - self.alpha / 2.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerResult {
    pub z_alpha: f64,
    pub z_beta: f64,
    pub raw_n_per_group: f64,
    pub n_per_group: u64,
    pub groups: u64,
    pub total_n: u64,
    /// Achieved power (y) against per-group sample size (x)
    pub power_curve: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate the per-group sample size for the planned test.
///
/// # Returns
///
/// * `Ok(PowerResult)` - Required sample size and power curve
/// * `Err(CalcError::InvalidInput | Validation)` - Probabilities or effect size out of range
/// * `Err(CalcError::Undefined)` - Two equal proportions; no sample size can separate them
pub fn calculate(input: &PowerInput) -> CalcResult<PowerResult> {
    input.validate()?;
    if let PowerTest::TwoProportions { p1, p2 } = input.test {
        if p1 == p2 {
            return Err(CalcError::undefined(
                "power analysis",
                "Proportions are equal; there is no difference to detect",
            ));
        }
    }
    Ok(compute(input))
}

fn compute(input: &PowerInput) -> PowerResult {
    let z_alpha = input.z_alpha();
    let z_beta = inverse_normal_cdf(input.power);

    let mut d = Derivation::new(input.test.formula());
    d.step(format!(
        "z_α = {} ({:?}-tailed, α = {}), z_β = {} (power = {})",
        fmt_num(z_alpha),
        input.tails,
        fmt_num(input.alpha),
        fmt_num(z_beta),
        fmt_num(input.power)
    ));

    let raw = match input.test {
        PowerTest::OneSampleMean { effect_size } => {
            let n = ((z_alpha + z_beta) / effect_size).powi(2);
            d.step(format!(
                "n = (({} + {}) / {})² = {}",
                fmt_num(z_alpha),
                fmt_num(z_beta),
                fmt_num(effect_size),
                fmt_num(n)
            ));
            n
        }
        PowerTest::TwoSampleMeans { effect_size } => {
            let n = 2.0 * ((z_alpha + z_beta) / effect_size).powi(2);
            d.step(format!(
                "n = 2 × (({} + {}) / {})² = {}",
                fmt_num(z_alpha),
                fmt_num(z_beta),
                fmt_num(effect_size),
                fmt_num(n)
            ));
            n
        }
        PowerTest::TwoProportions { p1, p2 } => {
            let p_bar = (p1 + p2) / 2.0;
            let pooled = (2.0 * p_bar * (1.0 - p_bar)).sqrt();
            let separate = (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();
            let n = (z_alpha * pooled + z_beta * separate).powi(2) / (p1 - p2).powi(2);
            d.step(format!("p̄ = {}", fmt_num(p_bar)));
            d.step(format!(
                "n = ({} × {} + {} × {})² / ({} − {})² = {}",
                fmt_num(z_alpha),
                fmt_num(pooled),
                fmt_num(z_beta),
                fmt_num(separate),
                fmt_num(p1),
                fmt_num(p2),
                fmt_num(n)
            ));
            n
        }
    };

    let n_per_group = (raw - 1e-9).ceil().max(2.0) as u64;
    let groups = input.test.groups();
    let total_n = n_per_group * groups;
    d.step(format!("n per group = ⌈{}⌉ = {}, total = {}", fmt_num(raw), n_per_group, total_n));

    let upper = (3 * n_per_group).max(10) as f64;
    let power_curve = sample_curve(2.0, upper, CURVE_POINTS, |n| achieved_power(input.test, z_alpha, n));

    let (formula, steps) = d.into_parts();
    PowerResult {
        z_alpha,
        z_beta,
        raw_n_per_group: raw,
        n_per_group,
        groups,
        total_n,
        power_curve,
        formula,
        steps,
    }
}

/// Power reached with `n` per group, ignoring the far rejection tail
pub fn achieved_power(test: PowerTest, z_alpha: f64, n: f64) -> f64 {
    match test {
        PowerTest::OneSampleMean { effect_size } => normal_cdf(effect_size * n.sqrt() - z_alpha),
        PowerTest::TwoSampleMeans { effect_size } => normal_cdf(effect_size * (n / 2.0).sqrt() - z_alpha),
        PowerTest::TwoProportions { p1, p2 } => {
            let p_bar = (p1 + p2) / 2.0;
            let pooled = (2.0 * p_bar * (1.0 - p_bar)).sqrt();
            let separate = (p1 * (1.0 - p1) + p2 * (1.0 - p2)).sqrt();
            normal_cdf(((p1 - p2).abs() * n.sqrt() - z_alpha * pooled) / separate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(test: PowerTest) -> PowerInput {
        PowerInput {
            test,
            alpha: 0.05,
            power: 0.8,
            tails: Tails::Two,
        }
    }

    #[test]
    fn test_one_sample_medium_effect() {
        let r = calculate(&input(PowerTest::OneSampleMean { effect_size: 0.5 })).unwrap();
        assert!((r.raw_n_per_group - 31.3949).abs() < 1e-3);
        assert_eq!(r.n_per_group, 32);
        assert_eq!(r.total_n, 32);
    }

    #[test]
    fn test_two_sample_medium_effect() {
        let r = calculate(&input(PowerTest::TwoSampleMeans { effect_size: 0.5 })).unwrap();
        assert_eq!(r.n_per_group, 63);
        assert_eq!(r.groups, 2);
        assert_eq!(r.total_n, 126);
    }

    #[test]
    fn test_two_proportions() {
        let r = calculate(&input(PowerTest::TwoProportions { p1: 0.6, p2: 0.4 })).unwrap();
        assert!((r.raw_n_per_group - 96.92).abs() < 0.01);
        assert_eq!(r.n_per_group, 97);
    }

    #[test]
    fn test_equal_proportions_undefined() {
        let err = calculate(&input(PowerTest::TwoProportions { p1: 0.3, p2: 0.3 })).unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED");
    }

    #[test]
    fn test_one_tailed_needs_fewer() {
        let two = calculate(&input(PowerTest::TwoSampleMeans { effect_size: 0.3 })).unwrap();
        let mut one_tailed = input(PowerTest::TwoSampleMeans { effect_size: 0.3 });
        one_tailed.tails = Tails::One;
        let one = calculate(&one_tailed).unwrap();
        assert!(one.n_per_group < two.n_per_group);
    }

    #[test]
    fn test_power_curve_reaches_target_at_required_n() {
        let test = PowerTest::OneSampleMean { effect_size: 0.5 };
        let r = calculate(&input(test)).unwrap();
        let at_raw = achieved_power(test, r.z_alpha, r.raw_n_per_group);
        assert!((at_raw - 0.8).abs() < 1e-9);
        assert!(r.power_curve.windows(2).all(|w| w[1].y >= w[0].y));
        assert_eq!(r.power_curve.len(), CURVE_POINTS);
    }

    #[test]
    fn test_validation() {
        let bad = PowerInput {
            test: PowerTest::TwoSampleMeans { effect_size: 0.0 },
            alpha: 0.0,
            power: 1.0,
            tails: Tails::Two,
        };
        assert_eq!(calculate(&bad).unwrap_err().field_errors().len(), 3);
    }
}
