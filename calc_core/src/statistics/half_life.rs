//! # Half-Life and Exponential Decay
//!
//! The four-variable relation
//!
//! ```text
//! N_t = N_0 · 0.5^(t / t½)
//! ```
//!
//! solved for whichever quantity is missing, plus conversion between the
//! three equivalent decay constants (half-life t½, mean lifetime τ, decay
//! constant λ):
//!
//! ```text
//! t½ = τ · ln 2 = ln 2 / λ
//! ```
//!
//! Decay never increases the quantity, so `N_t > N_0` is rejected as
//! non-physical.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::statistics::half_life::{calculate, HalfLifeInput, HalfLifeProblem};
//! use calc_core::units::TimeUnit;
//!
//! let input = HalfLifeInput {
//!     problem: HalfLifeProblem::RemainingQuantity { initial: 100.0, elapsed: 5730.0, half_life: 5730.0 },
//!     time_unit: TimeUnit::Years,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.remaining - 50.0).abs() < 1e-12);
//! ```

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use super::isotopes::find_isotope;
use crate::errors::{CalcError, CalcResult};
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::series::{sample_curve, CurvePoint};
use crate::units::TimeUnit;
use crate::validation::Validator;

const CURVE_POINTS: usize = 100;

/// The relation with one unknown; each variant carries the three knowns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solve_for", rename_all = "snake_case")]
pub enum HalfLifeProblem {
    RemainingQuantity { initial: f64, elapsed: f64, half_life: f64 },
    InitialQuantity { remaining: f64, elapsed: f64, half_life: f64 },
    ElapsedTime { initial: f64, remaining: f64, half_life: f64 },
    HalfLife { initial: f64, remaining: f64, elapsed: f64 },
}

/// How quickly the quantity has decayed over the elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayRate {
    /// Three or more half-lives elapsed
    Fast,
    /// At least one half-life elapsed
    Medium,
    Slow,
}

impl DecayRate {
    pub fn from_half_lives(half_lives: f64) -> Self {
        if half_lives >= 3.0 {
            DecayRate::Fast
        } else if half_lives >= 1.0 {
            DecayRate::Medium
        } else {
            DecayRate::Slow
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfLifeInput {
    pub problem: HalfLifeProblem,
    /// Shared unit of elapsed time and half-life
    #[serde(default)]
    pub time_unit: TimeUnit,
}

const NON_PHYSICAL: &str = "Non-physical: remaining quantity cannot exceed the initial quantity";

impl HalfLifeInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        match self.problem {
            HalfLifeProblem::RemainingQuantity { initial, elapsed, half_life } => {
                v.positive("initial", initial);
                v.non_negative("elapsed", elapsed);
                v.positive("half_life", half_life);
            }
            HalfLifeProblem::InitialQuantity { remaining, elapsed, half_life } => {
                v.positive("remaining", remaining);
                v.non_negative("elapsed", elapsed);
                v.positive("half_life", half_life);
            }
            HalfLifeProblem::ElapsedTime { initial, remaining, half_life } => {
                let ok = v.positive("initial", initial) & v.positive("remaining", remaining);
                v.positive("half_life", half_life);
                if ok {
                    v.check(remaining <= initial, "remaining", remaining, NON_PHYSICAL);
                }
            }
            HalfLifeProblem::HalfLife { initial, remaining, elapsed } => {
                let ok = v.positive("initial", initial) & v.positive("remaining", remaining);
                let elapsed_ok = v.non_negative("elapsed", elapsed);
                if ok {
                    if remaining > initial {
                        v.reject("remaining", remaining, NON_PHYSICAL);
                    } else if remaining == initial {
                        v.reject(
                            "remaining",
                            remaining,
                            "Non-physical: no decay observed, so the half-life is unbounded",
                        );
                    } else if elapsed_ok && elapsed == 0.0 {
                        v.reject("elapsed", elapsed, "Non-physical: decay cannot happen in zero time");
                    }
                }
            }
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalfLifeResult {
    pub initial: f64,
    pub remaining: f64,
    pub elapsed: f64,
    pub half_life: f64,
    pub time_unit: TimeUnit,
    /// λ, per time unit
    pub decay_constant: f64,
    /// τ
    pub mean_lifetime: f64,
    pub fraction_remaining: f64,
    pub half_lives_elapsed: f64,
    pub decay_rate: DecayRate,
    /// Quantity (y) over time (x)
    pub curve: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Solve the decay relation for the missing quantity.
///
/// # Returns
///
/// * `Ok(HalfLifeResult)` - All four quantities plus the decay constants
/// * `Err(CalcError::InvalidInput | Validation)` - Invalid or non-physical knowns
/// * `Err(CalcError::Undefined)` - The solved quantity overflows an f64
pub fn calculate(input: &HalfLifeInput) -> CalcResult<HalfLifeResult> {
    input.validate()?;
    let result = compute(input);
    let solved = [
        result.initial,
        result.remaining,
        result.elapsed,
        result.half_life,
        result.decay_constant,
        result.mean_lifetime,
    ];
    if !solved.iter().all(|v| v.is_finite()) || result.half_life <= 0.0 {
        return Err(CalcError::undefined(
            "half-life",
            "Solved quantity is outside the representable range",
        ));
    }
    Ok(result)
}

fn compute(input: &HalfLifeInput) -> HalfLifeResult {
    let u = input.time_unit.label();
    let mut d = Derivation::new(Formula::ExponentialDecay);

    let (initial, remaining, elapsed, half_life) = match input.problem {
        HalfLifeProblem::RemainingQuantity { initial, elapsed, half_life } => {
            let remaining = initial * 0.5f64.powf(elapsed / half_life);
            d.step(format!(
                "N_t = {} × 0.5^({} / {}) = {}",
                fmt_num(initial),
                fmt_num(elapsed),
                fmt_num(half_life),
                fmt_num(remaining)
            ));
            (initial, remaining, elapsed, half_life)
        }
        HalfLifeProblem::InitialQuantity { remaining, elapsed, half_life } => {
            let initial = remaining / 0.5f64.powf(elapsed / half_life);
            d.step(format!(
                "N_0 = {} / 0.5^({} / {}) = {}",
                fmt_num(remaining),
                fmt_num(elapsed),
                fmt_num(half_life),
                fmt_num(initial)
            ));
            (initial, remaining, elapsed, half_life)
        }
        HalfLifeProblem::ElapsedTime { initial, remaining, half_life } => {
            let elapsed = half_life * (initial / remaining).log2();
            d.step(format!(
                "t = {} × log₂({} / {}) = {} {u}",
                fmt_num(half_life),
                fmt_num(initial),
                fmt_num(remaining),
                fmt_num(elapsed)
            ));
            (initial, remaining, elapsed, half_life)
        }
        HalfLifeProblem::HalfLife { initial, remaining, elapsed } => {
            let half_life = elapsed * LN_2 / (initial / remaining).ln();
            d.step(format!(
                "t½ = {} × ln2 / ln({} / {}) = {} {u}",
                fmt_num(elapsed),
                fmt_num(initial),
                fmt_num(remaining),
                fmt_num(half_life)
            ));
            (initial, remaining, elapsed, half_life)
        }
    };

    d.apply(Formula::DecayConstants);
    let decay_constant = LN_2 / half_life;
    let mean_lifetime = half_life / LN_2;
    d.step(format!("λ = ln2 / {} = {} per {u}", fmt_num(half_life), fmt_num(decay_constant)));
    d.step(format!("τ = {} / ln2 = {} {u}", fmt_num(half_life), fmt_num(mean_lifetime)));

    let half_lives_elapsed = elapsed / half_life;
    let decay_rate = DecayRate::from_half_lives(half_lives_elapsed);
    d.step(format!("{} half-lives elapsed ({:?})", fmt_num(half_lives_elapsed), decay_rate));

    let horizon = elapsed.max(5.0 * half_life);
    let curve = sample_curve(0.0, horizon, CURVE_POINTS, |t| initial * 0.5f64.powf(t / half_life));

    let (formula, steps) = d.into_parts();
    HalfLifeResult {
        initial,
        remaining,
        elapsed,
        half_life,
        time_unit: input.time_unit,
        decay_constant,
        mean_lifetime,
        fraction_remaining: remaining / initial,
        half_lives_elapsed,
        decay_rate,
        curve,
        formula,
        steps,
    }
}

// ============================================================================
// Decay Constant Conversion
// ============================================================================

/// The one known decay constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "known", rename_all = "snake_case")]
pub enum DecayConstant {
    HalfLife { value: f64 },
    MeanLifetime { value: f64 },
    DecayConstant { value: f64 },
    /// Half-life taken from the isotope table (its own time unit)
    Isotope { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConstantsInput {
    pub known: DecayConstant,
    /// Ignored for `Isotope`, which carries its own unit
    #[serde(default)]
    pub time_unit: TimeUnit,
}

impl DecayConstantsInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        match &self.known {
            DecayConstant::HalfLife { value } => {
                v.positive("known.value", *value);
            }
            DecayConstant::MeanLifetime { value } => {
                v.positive("known.value", *value);
            }
            DecayConstant::DecayConstant { value } => {
                v.positive("known.value", *value);
            }
            DecayConstant::Isotope { name } => {
                v.check(!name.trim().is_empty(), "known.name", name, "Isotope name is required");
            }
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConstantsResult {
    pub half_life: f64,
    pub mean_lifetime: f64,
    pub decay_constant: f64,
    pub time_unit: TimeUnit,
    pub isotope: Option<String>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Derive all three decay constants from the one given.
///
/// # Returns
///
/// * `Ok(DecayConstantsResult)` - t½, τ and λ
/// * `Err(CalcError::InvalidInput)` - Non-positive value
/// * `Err(CalcError::NotFound)` - Unknown isotope
pub fn convert_constants(input: &DecayConstantsInput) -> CalcResult<DecayConstantsResult> {
    input.validate()?;

    let mut d = Derivation::new(Formula::DecayConstants);
    let (half_life, time_unit, isotope) = match &input.known {
        DecayConstant::HalfLife { value } => (*value, input.time_unit, None),
        DecayConstant::MeanLifetime { value } => {
            let t = value * LN_2;
            d.step(format!("t½ = {} × ln2 = {}", fmt_num(*value), fmt_num(t)));
            (t, input.time_unit, None)
        }
        DecayConstant::DecayConstant { value } => {
            let t = LN_2 / value;
            d.step(format!("t½ = ln2 / {} = {}", fmt_num(*value), fmt_num(t)));
            (t, input.time_unit, None)
        }
        DecayConstant::Isotope { name } => {
            let iso = find_isotope(name)?;
            d.step(format!("{} ({}): t½ = {} {}", iso.name, iso.symbol, fmt_num(iso.half_life), iso.unit.label()));
            (iso.half_life, iso.unit, Some(iso.name.to_string()))
        }
    };

    let mean_lifetime = half_life / LN_2;
    let decay_constant = LN_2 / half_life;
    d.step(format!("τ = {} / ln2 = {}", fmt_num(half_life), fmt_num(mean_lifetime)));
    d.step(format!("λ = ln2 / {} = {} per {}", fmt_num(half_life), fmt_num(decay_constant), time_unit.label()));

    let (formula, steps) = d.into_parts();
    Ok(DecayConstantsResult {
        half_life,
        mean_lifetime,
        decay_constant,
        time_unit,
        isotope,
        formula,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(problem: HalfLifeProblem) -> CalcResult<HalfLifeResult> {
        calculate(&HalfLifeInput { problem, time_unit: TimeUnit::Years })
    }

    #[test]
    fn test_carbon_dating_roundtrip() {
        let forward = solve(HalfLifeProblem::RemainingQuantity {
            initial: 100.0,
            elapsed: 5730.0,
            half_life: 5730.0,
        })
        .unwrap();
        assert!((forward.remaining - 50.0).abs() < 1e-12);

        let back = solve(HalfLifeProblem::HalfLife {
            initial: 100.0,
            remaining: forward.remaining,
            elapsed: 5730.0,
        })
        .unwrap();
        assert!((back.half_life - 5730.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_unknown_roundtrips() {
        let (n0, nt, t, th) = (80.0, 80.0 * 0.5f64.powf(2.7), 2.7 * 3.5, 3.5);
        let r = solve(HalfLifeProblem::InitialQuantity { remaining: nt, elapsed: t, half_life: th }).unwrap();
        assert!((r.initial - n0).abs() < 1e-9);
        let r = solve(HalfLifeProblem::ElapsedTime { initial: n0, remaining: nt, half_life: th }).unwrap();
        assert!((r.elapsed - t).abs() < 1e-9);
        let r = solve(HalfLifeProblem::HalfLife { initial: n0, remaining: nt, elapsed: t }).unwrap();
        assert!((r.half_life - th).abs() < 1e-9);
    }

    #[test]
    fn test_non_physical_growth() {
        let err = solve(HalfLifeProblem::ElapsedTime { initial: 10.0, remaining: 20.0, half_life: 1.0 }).unwrap_err();
        assert!(err.to_string().contains("Non-physical"));
        let err = solve(HalfLifeProblem::HalfLife { initial: 10.0, remaining: 20.0, elapsed: 1.0 }).unwrap_err();
        assert!(err.to_string().contains("Non-physical"));
    }

    #[test]
    fn test_half_life_degenerate_cases() {
        assert!(solve(HalfLifeProblem::HalfLife { initial: 10.0, remaining: 10.0, elapsed: 3.0 }).is_err());
        assert!(solve(HalfLifeProblem::HalfLife { initial: 10.0, remaining: 5.0, elapsed: 0.0 }).is_err());
    }

    #[test]
    fn test_no_decay_in_zero_time() {
        let r = solve(HalfLifeProblem::ElapsedTime { initial: 10.0, remaining: 10.0, half_life: 2.0 }).unwrap();
        assert_eq!(r.elapsed, 0.0);
        assert_eq!(r.decay_rate, DecayRate::Slow);
    }

    #[test]
    fn test_decay_rate_classification() {
        assert_eq!(DecayRate::from_half_lives(0.5), DecayRate::Slow);
        assert_eq!(DecayRate::from_half_lives(1.0), DecayRate::Medium);
        assert_eq!(DecayRate::from_half_lives(3.0), DecayRate::Fast);
    }

    #[test]
    fn test_curve() {
        let r = solve(HalfLifeProblem::RemainingQuantity { initial: 1.0, elapsed: 2.0, half_life: 1.0 }).unwrap();
        assert_eq!(r.curve.len(), 100);
        assert_eq!(r.curve[0].y, 1.0);
        assert_eq!(r.curve[99].x, 5.0);
        assert!((r.curve[99].y - 1.0 / 32.0).abs() < 1e-12);

        let long = solve(HalfLifeProblem::RemainingQuantity { initial: 1.0, elapsed: 12.0, half_life: 1.0 }).unwrap();
        assert_eq!(long.curve[99].x, 12.0);
        assert_eq!(long.decay_rate, DecayRate::Fast);
    }

    #[test]
    fn test_constants_conversion() {
        let from_tau = convert_constants(&DecayConstantsInput {
            known: DecayConstant::MeanLifetime { value: 1.0 / LN_2 },
            time_unit: TimeUnit::Seconds,
        })
        .unwrap();
        assert!((from_tau.half_life - 1.0).abs() < 1e-12);
        assert!((from_tau.decay_constant - LN_2).abs() < 1e-12);

        let from_lambda = convert_constants(&DecayConstantsInput {
            known: DecayConstant::DecayConstant { value: 0.1 },
            time_unit: TimeUnit::Days,
        })
        .unwrap();
        assert!((from_lambda.mean_lifetime - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_constants_from_isotope() {
        let r = convert_constants(&DecayConstantsInput {
            known: DecayConstant::Isotope { name: "I-131".to_string() },
            time_unit: TimeUnit::Years,
        })
        .unwrap();
        assert_eq!(r.time_unit, TimeUnit::Days);
        assert_eq!(r.half_life, 8.02);
        assert_eq!(r.isotope.as_deref(), Some("Iodine-131"));
    }

    #[test]
    fn test_overflowing_initial_quantity_is_undefined() {
        let err = solve(HalfLifeProblem::InitialQuantity {
            remaining: 1.0,
            elapsed: 1e6,
            half_life: 1.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED");

        // a large but representable answer still solves
        let r = solve(HalfLifeProblem::InitialQuantity {
            remaining: 1.0,
            elapsed: 100.0,
            half_life: 1.0,
        })
        .unwrap();
        assert!((r.initial - 2f64.powi(100)).abs() / 2f64.powi(100) < 1e-12);
    }
}
