//! # Return Analytics
//!
//! Compound annual growth rate between two values, and summary statistics
//! for a series of periodic returns: mean, volatility, Sharpe ratio and
//! maximum drawdown.
//!
//! All rates are percentages. The risk-free rate for the Sharpe ratio is per
//! period, in the same frequency as the returns.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::series::{yearly_curve, CurvePoint};
use crate::validation::Validator;

// ============================================================================
// CAGR
// ============================================================================

/// Input parameters for a CAGR calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CagrInput {
    pub start_value: f64,
    pub end_value: f64,
    pub years: f64,
}

impl CagrInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.positive("start_value", self.start_value);
        v.non_negative("end_value", self.end_value);
        v.non_negative("years", self.years);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CagrResult {
    /// `None` when the period is zero years
    pub cagr_pct: Option<f64>,
    pub total_return_pct: f64,
    pub growth_multiple: f64,
    pub note: Option<String>,
    /// Value at the end of each year, compounding at the CAGR (sampled for long horizons)
    pub projection: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate the compound annual growth rate between two values.
///
/// A zero-year period has no defined rate; the result carries `cagr_pct: None`
/// and an explanatory note instead of an error.
pub fn calculate_cagr(input: &CagrInput) -> CalcResult<CagrResult> {
    input.validate()?;

    let CagrInput { start_value, end_value, years } = *input;
    let multiple = end_value / start_value;
    let total_return_pct = (multiple - 1.0) * 100.0;

    let mut d = Derivation::new(Formula::Cagr);
    d.step(format!(
        "Growth multiple = {} / {} = {}",
        fmt_num(end_value),
        fmt_num(start_value),
        fmt_num(multiple)
    ));

    if years == 0.0 {
        d.step("Period is zero years: annual growth rate is undefined");
        let (formula, steps) = d.into_parts();
        return Ok(CagrResult {
            cagr_pct: None,
            total_return_pct,
            growth_multiple: multiple,
            note: Some("CAGR is undefined for a zero-year period".to_string()),
            projection: vec![CurvePoint::new(0.0, start_value)],
            formula,
            steps,
        });
    }

    let rate = multiple.powf(1.0 / years) - 1.0;
    d.step(format!(
        "CAGR = {}^(1/{}) − 1 = {}%",
        fmt_num(multiple),
        fmt_num(years),
        fmt_num(rate * 100.0)
    ));

    let projection = yearly_curve(years, |t| start_value * (1.0 + rate).powf(t));

    let (formula, steps) = d.into_parts();
    Ok(CagrResult {
        cagr_pct: Some(rate * 100.0),
        total_return_pct,
        growth_multiple: multiple,
        note: None,
        projection,
        formula,
        steps,
    })
}

// ============================================================================
// Return Series
// ============================================================================

/// Divisor for the standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    /// n - 1
    #[default]
    Sample,
    /// n
    Population,
}

/// Input parameters for return-series analytics.
///
/// ## JSON Example
///
/// ```json
/// {
///   "returns_pct": [2.0, -1.5, 3.2, 0.8],
///   "risk_free_rate_pct": 0.25,
///   "deviation": "sample",
///   "periods_per_year": 12
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsInput {
    pub returns_pct: Vec<f64>,

    /// Per-period risk-free rate in percent
    #[serde(default)]
    pub risk_free_rate_pct: f64,

    #[serde(default)]
    pub deviation: Deviation,

    /// Enables annualized figures
    #[serde(default)]
    pub periods_per_year: Option<u32>,
}

impl ReturnsInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        let minimum = match self.deviation {
            Deviation::Sample => 2,
            Deviation::Population => 1,
        };
        v.check(
            self.returns_pct.len() >= minimum,
            "returns_pct",
            self.returns_pct.len(),
            format!("At least {} returns are required", minimum),
        );
        for (i, &r) in self.returns_pct.iter().enumerate() {
            let field = format!("returns_pct[{}]", i);
            if v.finite(&field, r) {
                v.check(r > -100.0, &field, r, "A return must be greater than -100%");
            }
        }
        v.finite("risk_free_rate_pct", self.risk_free_rate_pct);
        if let Some(ppy) = self.periods_per_year {
            v.check(ppy >= 1, "periods_per_year", ppy, "Must be at least 1");
        }
        v.finish()
    }
}

/// Largest peak-to-trough decline of a value series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    pub max_drawdown_pct: f64,
    /// Index into the value series (0 = starting value)
    pub peak_index: usize,
    pub trough_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnsResult {
    pub count: usize,
    pub arithmetic_mean_pct: f64,
    pub geometric_mean_pct: f64,
    pub std_dev_pct: f64,
    /// `None` when volatility is zero
    pub sharpe_ratio: Option<f64>,
    pub annualized_sharpe: Option<f64>,
    pub total_return_pct: f64,
    /// CAGR over the series when `periods_per_year` is given
    pub annualized_return_pct: Option<f64>,
    pub drawdown: Drawdown,
    /// Growth of 1.0 invested before the first period
    pub growth_curve: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Compute the maximum drawdown of a value series.
pub fn max_drawdown(values: &[f64]) -> Drawdown {
    let mut worst = Drawdown {
        max_drawdown_pct: 0.0,
        peak_index: 0,
        trough_index: 0,
    };
    let mut peak_index = 0;
    for (i, &value) in values.iter().enumerate() {
        if value > values[peak_index] {
            peak_index = i;
        }
        let peak = values[peak_index];
        if peak > 0.0 {
            let dd = (peak - value) / peak * 100.0;
            if dd > worst.max_drawdown_pct {
                worst = Drawdown {
                    max_drawdown_pct: dd,
                    peak_index,
                    trough_index: i,
                };
            }
        }
    }
    worst
}

/// Analyze a series of periodic returns.
pub fn calculate(input: &ReturnsInput) -> CalcResult<ReturnsResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &ReturnsInput) -> ReturnsResult {
    let returns: Vec<f64> = input.returns_pct.iter().map(|r| r / 100.0).collect();
    let n = returns.len() as f64;

    let mut d = Derivation::new(Formula::SharpeRatio);

    d.apply(Formula::ArithmeticMean);
    let mean = returns.iter().sum::<f64>() / n;
    d.step(format!("Mean = {}%", fmt_num(mean * 100.0)));

    d.apply(Formula::StandardDeviation);
    let divisor = match input.deviation {
        Deviation::Sample => n - 1.0,
        Deviation::Population => n,
    };
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / divisor;
    let sigma = variance.sqrt();
    d.step(format!("σ ({:?}) = {}%", input.deviation, fmt_num(sigma * 100.0)));

    let rf = input.risk_free_rate_pct / 100.0;
    let sharpe = if sigma > 0.0 {
        let s = (mean - rf) / sigma;
        d.step(format!(
            "Sharpe = ({}% − {}%) / {}% = {}",
            fmt_num(mean * 100.0),
            fmt_num(rf * 100.0),
            fmt_num(sigma * 100.0),
            fmt_num(s)
        ));
        Some(s)
    } else {
        d.step("σ = 0: Sharpe ratio is undefined");
        None
    };
    let annualized_sharpe = match (sharpe, input.periods_per_year) {
        (Some(s), Some(ppy)) => Some(s * (ppy as f64).sqrt()),
        _ => None,
    };

    let mut values = Vec::with_capacity(returns.len() + 1);
    values.push(1.0);
    for r in &returns {
        let last = values[values.len() - 1];
        values.push(last * (1.0 + r));
    }
    let growth = values[values.len() - 1];
    let total_return_pct = (growth - 1.0) * 100.0;
    let geometric_mean_pct = (growth.powf(1.0 / n) - 1.0) * 100.0;
    d.step(format!("Total return = {}%", fmt_num(total_return_pct)));

    let annualized_return_pct = input.periods_per_year.map(|ppy| {
        d.apply(Formula::Cagr);
        let years = n / ppy as f64;
        let cagr = (growth.powf(1.0 / years) - 1.0) * 100.0;
        d.step(format!("Annualized over {} years = {}%", fmt_num(years), fmt_num(cagr)));
        cagr
    });

    d.apply(Formula::MaxDrawdown);
    let drawdown = max_drawdown(&values);
    d.step(format!(
        "Max drawdown = {}% (period {} to {})",
        fmt_num(drawdown.max_drawdown_pct),
        drawdown.peak_index,
        drawdown.trough_index
    ));

    let growth_curve = values
        .iter()
        .enumerate()
        .map(|(i, &v)| CurvePoint::new(i as f64, v))
        .collect();

    let (formula, steps) = d.into_parts();
    ReturnsResult {
        count: returns.len(),
        arithmetic_mean_pct: mean * 100.0,
        geometric_mean_pct,
        std_dev_pct: sigma * 100.0,
        sharpe_ratio: sharpe,
        annualized_sharpe,
        total_return_pct,
        annualized_return_pct,
        drawdown,
        growth_curve,
        formula,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cagr_doubling() {
        let r = calculate_cagr(&CagrInput { start_value: 1000.0, end_value: 2000.0, years: 5.0 }).unwrap();
        assert!((r.cagr_pct.unwrap() - 14.8698).abs() < 1e-4);
        assert_eq!(r.projection.len(), 6);
        assert!((r.projection[5].y - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_zero_years_is_not_an_error() {
        let r = calculate_cagr(&CagrInput { start_value: 100.0, end_value: 150.0, years: 0.0 }).unwrap();
        assert!(r.cagr_pct.is_none());
        assert!(r.note.is_some());
        assert_eq!(r.total_return_pct, 50.0);
    }

    #[test]
    fn test_cagr_fractional_years_projection() {
        let r = calculate_cagr(&CagrInput { start_value: 100.0, end_value: 121.0, years: 2.5 }).unwrap();
        let last = r.projection.last().unwrap();
        assert_eq!(last.x, 2.5);
        assert!((last.y - 121.0).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_long_horizon_projection_is_bounded() {
        let r = calculate_cagr(&CagrInput { start_value: 100.0, end_value: 200.0, years: 1e6 }).unwrap();
        assert_eq!(r.projection.len(), crate::series::MAX_YEARLY_POINTS + 1);
        let last = r.projection.last().unwrap();
        assert_eq!(last.x, 1e6);
        assert!((last.y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_cagr_rejects_zero_start() {
        assert!(calculate_cagr(&CagrInput { start_value: 0.0, end_value: 1.0, years: 1.0 }).is_err());
    }

    #[test]
    fn test_max_drawdown() {
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 110.0, 60.0, 130.0]);
        assert!((dd.max_drawdown_pct - 50.0).abs() < 1e-12);
        assert_eq!(dd.peak_index, 1);
        assert_eq!(dd.trough_index, 4);
    }

    #[test]
    fn test_max_drawdown_rising_series() {
        let dd = max_drawdown(&[1.0, 2.0, 3.0]);
        assert_eq!(dd.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_series_statistics() {
        let input = ReturnsInput {
            returns_pct: vec![10.0, -5.0, 15.0, 0.0],
            risk_free_rate_pct: 1.0,
            deviation: Deviation::Sample,
            periods_per_year: Some(4),
        };
        let r = calculate(&input).unwrap();
        assert!((r.arithmetic_mean_pct - 5.0).abs() < 1e-12);
        // deviations 5, -10, 10, -5 -> 250 / 3
        let sigma = (250.0f64 / 3.0).sqrt();
        assert!((r.std_dev_pct - sigma).abs() < 1e-9);
        assert!((r.sharpe_ratio.unwrap() - 4.0 / sigma).abs() < 1e-9);
        assert!((r.annualized_sharpe.unwrap() - 8.0 / sigma).abs() < 1e-9);
        let growth = 1.1 * 0.95 * 1.15;
        assert!((r.total_return_pct - (growth - 1.0) * 100.0).abs() < 1e-9);
        // four quarters = one year
        assert!((r.annualized_return_pct.unwrap() - r.total_return_pct).abs() < 1e-9);
        assert_eq!(r.growth_curve.len(), 5);
        assert_eq!(r.drawdown.peak_index, 1);
        assert_eq!(r.drawdown.trough_index, 2);
    }

    #[test]
    fn test_constant_returns_have_no_sharpe() {
        let input = ReturnsInput {
            returns_pct: vec![1.0, 1.0, 1.0],
            risk_free_rate_pct: 0.0,
            deviation: Deviation::Population,
            periods_per_year: None,
        };
        let r = calculate(&input).unwrap();
        assert!(r.sharpe_ratio.is_none());
        assert!(r.annualized_return_pct.is_none());
        assert!((r.geometric_mean_pct - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        let input = ReturnsInput {
            returns_pct: vec![-100.0],
            risk_free_rate_pct: 0.0,
            deviation: Deviation::Sample,
            periods_per_year: Some(0),
        };
        let fields: Vec<_> = calculate(&input).unwrap_err().field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["returns_pct", "returns_pct[0]", "periods_per_year"]);
    }
}
