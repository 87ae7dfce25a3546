//! # Inflation Adjustment
//!
//! Projects a price forward under constant inflation, or discounts a future
//! amount back to today's purchasing power. Also provides the Fisher
//! relation between nominal and real returns.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::series::{yearly_curve, CurvePoint};
use crate::validation::Validator;

/// Which way to adjust the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InflationDirection {
    /// Price in `years` of something costing `amount` today
    #[default]
    FutureCost,
    /// Today's value of `amount` received in `years`
    PurchasingPower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationInput {
    pub amount: f64,
    pub annual_rate_pct: f64,
    pub years: f64,
    #[serde(default)]
    pub direction: InflationDirection,
    /// Nominal annual return to convert to a real return
    #[serde(default)]
    pub nominal_return_pct: Option<f64>,
}

impl InflationInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.non_negative("amount", self.amount);
        if v.finite("annual_rate_pct", self.annual_rate_pct) {
            v.check(
                self.annual_rate_pct > -100.0,
                "annual_rate_pct",
                self.annual_rate_pct,
                "Must be greater than -100%",
            );
        }
        v.non_negative("years", self.years);
        if let Some(nominal) = self.nominal_return_pct {
            v.finite("nominal_return_pct", nominal);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationResult {
    pub adjusted_amount: f64,
    /// Total price increase over the period
    pub cumulative_inflation_pct: f64,
    /// Share of today's purchasing power left at the end of the period
    pub purchasing_power_remaining_pct: f64,
    /// Inflation-adjusted return when a nominal return was given
    pub real_return_pct: Option<f64>,
    /// Adjusted amount at the end of each year (sampled for long horizons)
    pub curve: Vec<CurvePoint>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Adjust an amount for inflation.
pub fn calculate(input: &InflationInput) -> CalcResult<InflationResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &InflationInput) -> InflationResult {
    let i = input.annual_rate_pct / 100.0;
    let growth = |t: f64| (1.0 + i).powf(t);
    let factor = growth(input.years);

    let amount = input.amount;
    let direction = input.direction;
    let adjust = move |g: f64| match direction {
        InflationDirection::FutureCost => amount * g,
        InflationDirection::PurchasingPower => amount / g,
    };
    let primary = match direction {
        InflationDirection::FutureCost => Formula::InflationFutureCost,
        InflationDirection::PurchasingPower => Formula::InflationPurchasingPower,
    };

    let mut d = Derivation::new(primary);
    d.step(format!(
        "(1 + {})^{} = {}",
        fmt_num(i),
        fmt_num(input.years),
        fmt_num(factor)
    ));
    let adjusted_amount = adjust(factor);
    let op = match direction {
        InflationDirection::FutureCost => "×",
        InflationDirection::PurchasingPower => "÷",
    };
    d.step(format!(
        "{} {} {} = {}",
        fmt_num(input.amount),
        op,
        fmt_num(factor),
        fmt_num(adjusted_amount)
    ));

    let cumulative_inflation_pct = (factor - 1.0) * 100.0;
    let purchasing_power_remaining_pct = 100.0 / factor;
    d.step(format!("Cumulative inflation = {}%", fmt_num(cumulative_inflation_pct)));

    let real_return = input.nominal_return_pct.and_then(|nominal| {
        d.apply(Formula::FisherRealReturn);
        let real = real_return_pct(nominal, input.annual_rate_pct)?;
        d.step(format!(
            "Real return = (1 + {}%) / (1 + {}%) − 1 = {}%",
            fmt_num(nominal),
            fmt_num(input.annual_rate_pct),
            fmt_num(real)
        ));
        Some(real)
    });

    let curve = yearly_curve(input.years, |t| adjust(growth(t)));

    let (formula, steps) = d.into_parts();
    InflationResult {
        adjusted_amount,
        cumulative_inflation_pct,
        purchasing_power_remaining_pct,
        real_return_pct: real_return,
        curve,
        formula,
        steps,
    }
}

/// Real return from nominal return and inflation, both in percent (Fisher).
///
/// Returns `None` when inflation is exactly -100%.
pub fn real_return_pct(nominal_pct: f64, inflation_pct: f64) -> Option<f64> {
    let denominator = 1.0 + inflation_pct / 100.0;
    if denominator == 0.0 {
        return None;
    }
    Some(((1.0 + nominal_pct / 100.0) / denominator - 1.0) * 100.0)
}
