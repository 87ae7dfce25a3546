//! # Bond Pricing
//!
//! Prices a fixed-coupon bond from its yield and reports duration, convexity
//! and the full cash-flow schedule. [`yield_to_maturity`] goes the other way,
//! solving for the yield that reproduces a quoted clean price.
//!
//! ## Conventions
//!
//! - Rates are percentages (`5.0` = 5%)
//! - `accrued_fraction` is the elapsed fraction of the current coupon period;
//!   cash flow k arrives at `t_k = k - f` periods from settlement
//! - Dirty price discounts every cash flow; clean price subtracts accrued interest
//! - Duration is in years, convexity in years²
//!
//! ## Example
//!
//! ```rust
//! use calc_core::finance::bond::{calculate, BondInput, PaymentFrequency};
//!
//! let input = BondInput {
//!     face_value: 1000.0,
//!     coupon_rate_pct: 5.0,
//!     yield_pct: 6.0,
//!     years_to_maturity: 10.0,
//!     frequency: PaymentFrequency::SemiAnnual,
//!     accrued_fraction: 0.0,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.clean_price - 925.61).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::validation::Validator;

/// Relative tolerance for calling a price "par"
const PAR_TOLERANCE: f64 = 1e-9;

/// Yield shift used for the price sensitivity estimate (1%)
const SHIFT: f64 = 0.01;

/// Coupon payments per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Annual,
    #[default]
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentFrequency {
    pub fn per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentFrequency::Annual => "Annual",
            PaymentFrequency::SemiAnnual => "Semi-annual",
            PaymentFrequency::Quarterly => "Quarterly",
            PaymentFrequency::Monthly => "Monthly",
        }
    }
}

/// Clean price relative to face value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceClassification {
    Premium,
    Par,
    Discount,
}

/// Input parameters for pricing a bond.
///
/// ## JSON Example
///
/// ```json
/// {
///   "face_value": 1000.0,
///   "coupon_rate_pct": 5.0,
///   "yield_pct": 6.0,
///   "years_to_maturity": 10.0,
///   "frequency": "semi_annual",
///   "accrued_fraction": 0.25
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondInput {
    pub face_value: f64,

    /// Annual coupon rate in percent
    pub coupon_rate_pct: f64,

    /// Annual yield to maturity in percent
    pub yield_pct: f64,

    pub years_to_maturity: f64,

    #[serde(default)]
    pub frequency: PaymentFrequency,

    /// Elapsed fraction of the current coupon period, in [0, 1)
    #[serde(default)]
    pub accrued_fraction: f64,
}

/// Shared checks for the bond terms (everything except the yield / price).
fn validate_terms(
    v: &mut Validator,
    face_value: f64,
    coupon_rate_pct: f64,
    years_to_maturity: f64,
    frequency: PaymentFrequency,
) {
    v.positive("face_value", face_value);
    v.non_negative("coupon_rate_pct", coupon_rate_pct);
    if v.positive("years_to_maturity", years_to_maturity) {
        let count = (years_to_maturity * frequency.per_year() as f64).round();
        if count < 1.0 {
            v.reject("years_to_maturity", years_to_maturity, "Must cover at least one coupon period");
        } else if count > MAX_PERIODS as f64 {
            v.reject(
                "years_to_maturity",
                years_to_maturity,
                format!("Must not exceed {} coupon periods", MAX_PERIODS),
            );
        }
    }
}

/// 100 years of monthly coupons
pub const MAX_PERIODS: u32 = 1200;

fn periods(years: f64, frequency: PaymentFrequency) -> u32 {
    (years * frequency.per_year() as f64).round() as u32
}

impl BondInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        validate_terms(&mut v, self.face_value, self.coupon_rate_pct, self.years_to_maturity, self.frequency);
        if v.finite("yield_pct", self.yield_pct) {
            v.check(self.yield_pct > -100.0, "yield_pct", self.yield_pct, "Must be greater than -100%");
        }
        if v.finite("accrued_fraction", self.accrued_fraction) {
            v.check(
                (0.0..1.0).contains(&self.accrued_fraction),
                "accrued_fraction",
                self.accrued_fraction,
                "Must be at least 0 and less than 1",
            );
        }
        v.finish()
    }
}

/// One scheduled payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub period: u32,
    /// Time from settlement in years
    pub time_years: f64,
    pub amount: f64,
    pub present_value: f64,
}

/// Results from a bond pricing calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondResult {
    pub dirty_price: f64,
    pub clean_price: f64,
    pub accrued_interest: f64,
    pub periods: u32,
    pub coupon_payment: f64,
    pub annual_coupon: f64,
    pub current_yield_pct: f64,
    /// Years
    pub macaulay_duration: f64,
    /// Years
    pub modified_duration: f64,
    /// Years²
    pub convexity: f64,
    pub classification: PriceClassification,
    /// Estimated dirty-price change if yield rises by 1%
    pub price_change_up_1pct: f64,
    /// Estimated dirty-price change if yield falls by 1%
    pub price_change_down_1pct: f64,
    pub cash_flows: Vec<CashFlow>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Discounted cash-flow sums for one bond at one per-period yield
struct Discounted {
    price: f64,
    /// Σ t·PV
    weighted_time: f64,
    /// Σ CF·t(t+1)/(1+y)^(t+2)
    convexity_sum: f64,
    flows: Vec<CashFlow>,
}

fn discount(face: f64, coupon: f64, n: u32, y: f64, f: f64, per_year: f64) -> Discounted {
    let mut out = Discounted {
        price: 0.0,
        weighted_time: 0.0,
        convexity_sum: 0.0,
        flows: Vec::with_capacity(n as usize),
    };
    for k in 1..=n {
        let t = k as f64 - f;
        let amount = if k == n { coupon + face } else { coupon };
        let pv = amount / (1.0 + y).powf(t);
        out.price += pv;
        out.weighted_time += t * pv;
        out.convexity_sum += amount * t * (t + 1.0) / (1.0 + y).powf(t + 2.0);
        out.flows.push(CashFlow {
            period: k,
            time_years: t / per_year,
            amount,
            present_value: pv,
        });
    }
    out
}

/// Price a bond and compute its risk measures.
///
/// # Returns
///
/// * `Ok(BondResult)` - Price, accrued interest, duration, convexity, schedule
/// * `Err(CalcError::InvalidInput | Validation)` - Invalid terms
pub fn calculate(input: &BondInput) -> CalcResult<BondResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &BondInput) -> BondResult {
    let m = input.frequency.per_year() as f64;
    let n = periods(input.years_to_maturity, input.frequency);
    let y = input.yield_pct / 100.0 / m;
    let coupon = input.face_value * input.coupon_rate_pct / 100.0 / m;
    let f = input.accrued_fraction;

    let mut d = Derivation::new(Formula::BondPrice);
    d.step(format!(
        "n = {} × {} = {} periods, y = {}% / {} = {}",
        fmt_num(input.years_to_maturity),
        m,
        n,
        fmt_num(input.yield_pct),
        m,
        fmt_num(y)
    ));
    d.step(format!(
        "C = {} × {}% / {} = {}",
        fmt_num(input.face_value),
        fmt_num(input.coupon_rate_pct),
        m,
        fmt_num(coupon)
    ));

    let disc = discount(input.face_value, coupon, n, y, f, m);
    let dirty = disc.price;
    d.step(format!("Dirty price = {}", fmt_num(dirty)));

    d.apply(Formula::AccruedInterest);
    let accrued = coupon * f;
    let clean = dirty - accrued;
    d.step(format!("Accrued = {} × {} = {}", fmt_num(coupon), fmt_num(f), fmt_num(accrued)));
    d.step(format!("Clean price = {} − {} = {}", fmt_num(dirty), fmt_num(accrued), fmt_num(clean)));

    d.apply(Formula::MacaulayDuration);
    d.apply(Formula::ModifiedDuration);
    d.apply(Formula::Convexity);
    let macaulay = disc.weighted_time / dirty / m;
    let modified = macaulay / (1.0 + y);
    let convexity = disc.convexity_sum / dirty / (m * m);
    d.step(format!("Macaulay duration = {} years", fmt_num(macaulay)));
    d.step(format!("Modified duration = {} / (1 + {}) = {}", fmt_num(macaulay), fmt_num(y), fmt_num(modified)));
    d.step(format!("Convexity = {}", fmt_num(convexity)));

    d.apply(Formula::CurrentYield);
    let annual_coupon = coupon * m;
    let current_yield_pct = annual_coupon / clean * 100.0;
    d.step(format!(
        "Current yield = {} / {} = {}%",
        fmt_num(annual_coupon),
        fmt_num(clean),
        fmt_num(current_yield_pct)
    ));

    let classification = classify(clean, input.face_value);

    let sensitivity = |dy: f64| dirty * (-modified * dy + 0.5 * convexity * dy * dy);
    let price_change_up_1pct = sensitivity(SHIFT);
    let price_change_down_1pct = sensitivity(-SHIFT);
    d.step(format!(
        "ΔP(+1%) ≈ {}, ΔP(−1%) ≈ {}",
        fmt_num(price_change_up_1pct),
        fmt_num(price_change_down_1pct)
    ));

    let (formula, steps) = d.into_parts();
    BondResult {
        dirty_price: dirty,
        clean_price: clean,
        accrued_interest: accrued,
        periods: n,
        coupon_payment: coupon,
        annual_coupon,
        current_yield_pct,
        macaulay_duration: macaulay,
        modified_duration: modified,
        convexity,
        classification,
        price_change_up_1pct,
        price_change_down_1pct,
        cash_flows: disc.flows,
        formula,
        steps,
    }
}

fn classify(clean: f64, face: f64) -> PriceClassification {
    let rel = (clean - face) / face;
    if rel.abs() <= PAR_TOLERANCE {
        PriceClassification::Par
    } else if rel > 0.0 {
        PriceClassification::Premium
    } else {
        PriceClassification::Discount
    }
}

// ============================================================================
// Yield to Maturity
// ============================================================================

const MAX_NEWTON_ITERATIONS: u32 = 50;
const MAX_BISECTION_ITERATIONS: u32 = 200;
const PRICE_TOLERANCE: f64 = 1e-10;
/// Bisection bracket on the annual yield, as fractions
const YIELD_BRACKET: (f64, f64) = (-0.99, 10.0);

/// Input parameters for solving yield to maturity from a quoted price.
///
/// Settlement is assumed to fall on a coupon date, so clean = dirty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldInput {
    pub face_value: f64,
    pub coupon_rate_pct: f64,
    pub years_to_maturity: f64,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    pub clean_price: f64,
}

impl YieldInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        validate_terms(&mut v, self.face_value, self.coupon_rate_pct, self.years_to_maturity, self.frequency);
        v.positive("clean_price", self.clean_price);
        v.finish()
    }
}

/// Root-finding method that produced the yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    Newton,
    Bisection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldResult {
    /// Annual yield to maturity in percent
    pub yield_pct: f64,
    pub current_yield_pct: f64,
    pub classification: PriceClassification,
    pub method: SolverMethod,
    pub iterations: u32,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Solve for the yield that prices the bond at `clean_price`.
///
/// Newton's method from the coupon rate first; if it leaves the valid range
/// or stalls, bisection over annual yields of -99% to 1000%.
///
/// # Returns
///
/// * `Ok(YieldResult)` - Solved yield
/// * `Err(CalcError::InvalidInput | Validation)` - Invalid terms
/// * `Err(CalcError::Undefined)` - Price unreachable within the bracket
pub fn yield_to_maturity(input: &YieldInput) -> CalcResult<YieldResult> {
    input.validate()?;

    let m = input.frequency.per_year() as f64;
    let n = periods(input.years_to_maturity, input.frequency);
    let coupon = input.face_value * input.coupon_rate_pct / 100.0 / m;
    let target = input.clean_price;
    let price_at = |y: f64| discount(input.face_value, coupon, n, y, 0.0, m).price;

    let mut d = Derivation::new(Formula::BondPrice);
    d.step(format!("Solve P(y) = {} for y over {} periods", fmt_num(target), n));

    let (y, method, iterations) = match newton(&price_at, input, coupon, n, m, target) {
        Some((y, iterations)) => (y, SolverMethod::Newton, iterations),
        None => {
            tracing::warn!(clean_price = target, "Newton iteration did not converge, falling back to bisection");
            let (y, iterations) = bisect(&price_at, m, target)?;
            (y, SolverMethod::Bisection, iterations)
        }
    };

    let yield_pct = y * m * 100.0;
    d.step(format!(
        "{:?} converged after {} iterations: y = {} per period",
        method,
        iterations,
        fmt_num(y)
    ));
    d.step(format!("YTM = {} × {} = {}%", fmt_num(y), m, fmt_num(yield_pct)));

    d.apply(Formula::CurrentYield);
    let current_yield_pct = coupon * m / target * 100.0;
    d.step(format!("Current yield = {}%", fmt_num(current_yield_pct)));

    let (formula, steps) = d.into_parts();
    Ok(YieldResult {
        yield_pct,
        current_yield_pct,
        classification: classify(target, input.face_value),
        method,
        iterations,
        formula,
        steps,
    })
}

fn newton<F>(price_at: &F, input: &YieldInput, coupon: f64, n: u32, m: f64, target: f64) -> Option<(f64, u32)>
where
    F: Fn(f64) -> f64,
{
    let mut y = input.coupon_rate_pct.max(1.0) / 100.0 / m;
    for i in 1..=MAX_NEWTON_ITERATIONS {
        let diff = price_at(y) - target;
        if diff.abs() < PRICE_TOLERANCE * target.max(1.0) {
            return Some((y, i));
        }
        // dP/dy = -Σ t·CF / (1+y)^(t+1)
        let slope: f64 = (1..=n)
            .map(|k| {
                let t = k as f64;
                let amount = if k == n { coupon + input.face_value } else { coupon };
                -t * amount / (1.0 + y).powf(t + 1.0)
            })
            .sum();
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        y -= diff / slope;
        if !y.is_finite() || y <= -1.0 {
            return None;
        }
    }
    None
}

fn bisect<F>(price_at: &F, m: f64, target: f64) -> CalcResult<(f64, u32)>
where
    F: Fn(f64) -> f64,
{
    // price falls as yield rises
    let mut lo = YIELD_BRACKET.0 / m;
    let mut hi = YIELD_BRACKET.1 / m;
    if price_at(lo) < target || price_at(hi) > target {
        return Err(CalcError::undefined(
            "yield to maturity",
            format!("No yield between -99% and 1000% gives a price of {}", fmt_num(target)),
        ));
    }
    for i in 1..=MAX_BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let diff = price_at(mid) - target;
        if diff.abs() < PRICE_TOLERANCE * target.max(1.0) || (hi - lo) < 1e-15 {
            return Ok((mid, i));
        }
        if diff > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(CalcError::undefined("yield to maturity", "Bisection did not converge"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bond(coupon: f64, yld: f64, years: f64, frequency: PaymentFrequency) -> BondInput {
        BondInput {
            face_value: 1000.0,
            coupon_rate_pct: coupon,
            yield_pct: yld,
            years_to_maturity: years,
            frequency,
            accrued_fraction: 0.0,
        }
    }

    #[test]
    fn test_par_identity() {
        for freq in [
            PaymentFrequency::Annual,
            PaymentFrequency::SemiAnnual,
            PaymentFrequency::Quarterly,
            PaymentFrequency::Monthly,
        ] {
            let r = calculate(&bond(5.0, 5.0, 7.0, freq)).unwrap();
            assert!((r.clean_price - 1000.0).abs() < 1e-9, "{:?}: {}", freq, r.clean_price);
            assert_eq!(r.classification, PriceClassification::Par);
        }
    }

    #[test]
    fn test_discount_bond_price() {
        let r = calculate(&bond(5.0, 6.0, 10.0, PaymentFrequency::SemiAnnual)).unwrap();
        assert!((r.clean_price - 925.6126).abs() < 1e-3);
        assert_eq!(r.classification, PriceClassification::Discount);
        assert_eq!(r.periods, 20);
        assert_eq!(r.cash_flows.len(), 20);
    }

    #[test]
    fn test_premium_bond() {
        let r = calculate(&bond(8.0, 6.0, 5.0, PaymentFrequency::Annual)).unwrap();
        assert_eq!(r.classification, PriceClassification::Premium);
        assert!(r.current_yield_pct < 8.0);
    }

    #[test]
    fn test_durations() {
        let r = calculate(&bond(5.0, 5.0, 5.0, PaymentFrequency::Annual)).unwrap();
        assert!((r.macaulay_duration - 4.5460).abs() < 1e-4);
        assert!((r.modified_duration - 4.3295).abs() < 1e-4);
        assert!(r.convexity > 0.0);
    }

    #[test]
    fn test_zero_coupon_duration_equals_maturity() {
        let r = calculate(&bond(0.0, 4.0, 8.0, PaymentFrequency::Annual)).unwrap();
        assert!((r.macaulay_duration - 8.0).abs() < 1e-9);
        assert!((r.clean_price - 1000.0 / 1.04f64.powi(8)).abs() < 1e-9);
    }

    #[test]
    fn test_accrued_interest() {
        let mut input = bond(6.0, 6.0, 3.0, PaymentFrequency::SemiAnnual);
        input.accrued_fraction = 0.5;
        let r = calculate(&input).unwrap();
        assert!((r.accrued_interest - 15.0).abs() < 1e-12);
        assert!((r.dirty_price - r.clean_price - 15.0).abs() < 1e-9);
        assert!(r.dirty_price > 1000.0);
    }

    #[test]
    fn test_convexity_makes_price_change_asymmetric() {
        let r = calculate(&bond(5.0, 6.0, 20.0, PaymentFrequency::SemiAnnual)).unwrap();
        assert!(r.price_change_up_1pct < 0.0);
        assert!(r.price_change_down_1pct > 0.0);
        assert!(r.price_change_down_1pct > r.price_change_up_1pct.abs());
    }

    #[test]
    fn test_validation_collects_fields() {
        let input = BondInput {
            face_value: 0.0,
            coupon_rate_pct: -1.0,
            yield_pct: 5.0,
            years_to_maturity: 2.0,
            frequency: PaymentFrequency::Annual,
            accrued_fraction: 1.0,
        };
        let fields: Vec<_> = calculate(&input)
            .unwrap_err()
            .field_errors()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["face_value", "coupon_rate_pct", "accrued_fraction"]);
    }

    #[test]
    fn test_too_short_for_one_period() {
        let input = bond(5.0, 5.0, 0.1, PaymentFrequency::Annual);
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_period_count_is_bounded() {
        let longest = calculate(&bond(5.0, 5.0, 100.0, PaymentFrequency::Monthly)).unwrap();
        assert_eq!(longest.periods, MAX_PERIODS);
        assert_eq!(longest.cash_flows.len(), MAX_PERIODS as usize);

        for years in [100.1, 1e5, 1e9] {
            let err = calculate(&bond(5.0, 5.0, years, PaymentFrequency::Monthly)).unwrap_err();
            let fields = err.field_errors();
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "years_to_maturity");
            assert!(fields[0].reason.contains("1200"), "{}", fields[0].reason);
        }

        let err = yield_to_maturity(&YieldInput {
            face_value: 1000.0,
            coupon_rate_pct: 5.0,
            years_to_maturity: 1e9,
            frequency: PaymentFrequency::Annual,
            clean_price: 950.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_yield_to_maturity_roundtrip() {
        let priced = calculate(&bond(5.0, 6.0, 10.0, PaymentFrequency::SemiAnnual)).unwrap();
        let solved = yield_to_maturity(&YieldInput {
            face_value: 1000.0,
            coupon_rate_pct: 5.0,
            years_to_maturity: 10.0,
            frequency: PaymentFrequency::SemiAnnual,
            clean_price: priced.clean_price,
        })
        .unwrap();
        assert!((solved.yield_pct - 6.0).abs() < 1e-6);
        assert_eq!(solved.classification, PriceClassification::Discount);
    }

    #[test]
    fn test_yield_unreachable_price() {
        // price above the undiscounted sum of cash flows needs a yield below -99%
        let err = yield_to_maturity(&YieldInput {
            face_value: 100.0,
            coupon_rate_pct: 0.0,
            years_to_maturity: 1.0,
            frequency: PaymentFrequency::Annual,
            clean_price: 1_000_000.0,
        })
        .unwrap_err();
        assert_eq!(err.error_code(), "UNDEFINED");
    }
}
