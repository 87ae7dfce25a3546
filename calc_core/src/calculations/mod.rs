//! # Calculation Dispatch
//!
//! Every calculator follows the same pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! [`CalculationItem`] wraps every input type in one tagged enum so that a
//! front end can accept any calculation as JSON and route it with a single
//! `match`:
//!
//! ```rust
//! use calc_core::calculations::{CalculationItem, CalculationOutcome};
//!
//! let item: CalculationItem = serde_json::from_str(
//!     r#"{ "calculator": "sample_size", "margin_of_error": 0.05 }"#,
//! ).unwrap();
//!
//! match item.evaluate().unwrap() {
//!     CalculationOutcome::SampleSize(r) => assert_eq!(r.sample_size, 385),
//!     other => panic!("unexpected outcome {:?}", other.calc_type()),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::algebra::{inequality, quadratic};
use crate::biometrics::energy;
use crate::errors::CalcResult;
use crate::finance::{bond, inflation, returns, tax};
use crate::geometry::{area, distance, slope, solids};
use crate::mileage;
use crate::statistics::{half_life, power, sample_size};

/// Any calculation request, tagged by `"calculator"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationItem {
    Distance(distance::DistanceInput),
    Solid(solids::SolidInput),
    Area(area::AreaInput),
    Slope(slope::SlopeInput),
    Bond(bond::BondInput),
    Yield(bond::YieldInput),
    Cagr(returns::CagrInput),
    Returns(returns::ReturnsInput),
    Tax(tax::TaxInput),
    GrossUp(tax::GrossUpInput),
    Inflation(inflation::InflationInput),
    Energy(energy::EnergyInput),
    SampleSize(sample_size::SampleSizeInput),
    Power(power::PowerInput),
    HalfLife(half_life::HalfLifeInput),
    DecayConstants(half_life::DecayConstantsInput),
    Inequality(inequality::InequalityInput),
    Quadratic(quadratic::QuadraticInput),
    Mileage(mileage::MileageInput),
}

/// Result of evaluating a [`CalculationItem`], tagged the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationOutcome {
    Distance(distance::DistanceResult),
    Solid(solids::SolidResult),
    Area(area::AreaResult),
    Slope(slope::SlopeResult),
    Bond(bond::BondResult),
    Yield(bond::YieldResult),
    Cagr(returns::CagrResult),
    Returns(returns::ReturnsResult),
    Tax(tax::TaxResult),
    GrossUp(tax::GrossUpResult),
    Inflation(inflation::InflationResult),
    Energy(energy::EnergyResult),
    SampleSize(sample_size::SampleSizeResult),
    Power(power::PowerResult),
    HalfLife(half_life::HalfLifeResult),
    DecayConstants(half_life::DecayConstantsResult),
    Inequality(inequality::InequalityResult),
    Quadratic(quadratic::QuadraticResult),
    Mileage(mileage::MileageResult),
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Distance(_) => "distance",
            CalculationItem::Solid(_) => "solid",
            CalculationItem::Area(_) => "area",
            CalculationItem::Slope(_) => "slope",
            CalculationItem::Bond(_) => "bond",
            CalculationItem::Yield(_) => "yield",
            CalculationItem::Cagr(_) => "cagr",
            CalculationItem::Returns(_) => "returns",
            CalculationItem::Tax(_) => "tax",
            CalculationItem::GrossUp(_) => "gross_up",
            CalculationItem::Inflation(_) => "inflation",
            CalculationItem::Energy(_) => "energy",
            CalculationItem::SampleSize(_) => "sample_size",
            CalculationItem::Power(_) => "power",
            CalculationItem::HalfLife(_) => "half_life",
            CalculationItem::DecayConstants(_) => "decay_constants",
            CalculationItem::Inequality(_) => "inequality",
            CalculationItem::Quadratic(_) => "quadratic",
            CalculationItem::Mileage(_) => "mileage",
        }
    }

    /// Validate and run the wrapped calculation.
    pub fn evaluate(&self) -> CalcResult<CalculationOutcome> {
        tracing::debug!(calculator = self.calc_type(), "evaluating");
        let outcome = match self {
            CalculationItem::Distance(i) => CalculationOutcome::Distance(distance::calculate(i)?),
            CalculationItem::Solid(i) => CalculationOutcome::Solid(solids::calculate(i)?),
            CalculationItem::Area(i) => CalculationOutcome::Area(area::calculate(i)?),
            CalculationItem::Slope(i) => CalculationOutcome::Slope(slope::calculate(i)?),
            CalculationItem::Bond(i) => CalculationOutcome::Bond(bond::calculate(i)?),
            CalculationItem::Yield(i) => CalculationOutcome::Yield(bond::yield_to_maturity(i)?),
            CalculationItem::Cagr(i) => CalculationOutcome::Cagr(returns::calculate_cagr(i)?),
            CalculationItem::Returns(i) => CalculationOutcome::Returns(returns::calculate(i)?),
            CalculationItem::Tax(i) => CalculationOutcome::Tax(tax::calculate(i)?),
            CalculationItem::GrossUp(i) => CalculationOutcome::GrossUp(tax::gross_up(i)?),
            CalculationItem::Inflation(i) => CalculationOutcome::Inflation(inflation::calculate(i)?),
            CalculationItem::Energy(i) => CalculationOutcome::Energy(energy::calculate(i)?),
            CalculationItem::SampleSize(i) => CalculationOutcome::SampleSize(sample_size::calculate(i)?),
            CalculationItem::Power(i) => CalculationOutcome::Power(power::calculate(i)?),
            CalculationItem::HalfLife(i) => CalculationOutcome::HalfLife(half_life::calculate(i)?),
            CalculationItem::DecayConstants(i) => {
                CalculationOutcome::DecayConstants(half_life::convert_constants(i)?)
            }
            CalculationItem::Inequality(i) => CalculationOutcome::Inequality(inequality::solve(i)?),
            CalculationItem::Quadratic(i) => CalculationOutcome::Quadratic(quadratic::calculate(i)?),
            CalculationItem::Mileage(i) => CalculationOutcome::Mileage(mileage::calculate(i)?),
        };
        Ok(outcome)
    }
}

impl CalculationOutcome {
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationOutcome::Distance(_) => "distance",
            CalculationOutcome::Solid(_) => "solid",
            CalculationOutcome::Area(_) => "area",
            CalculationOutcome::Slope(_) => "slope",
            CalculationOutcome::Bond(_) => "bond",
            CalculationOutcome::Yield(_) => "yield",
            CalculationOutcome::Cagr(_) => "cagr",
            CalculationOutcome::Returns(_) => "returns",
            CalculationOutcome::Tax(_) => "tax",
            CalculationOutcome::GrossUp(_) => "gross_up",
            CalculationOutcome::Inflation(_) => "inflation",
            CalculationOutcome::Energy(_) => "energy",
            CalculationOutcome::SampleSize(_) => "sample_size",
            CalculationOutcome::Power(_) => "power",
            CalculationOutcome::HalfLife(_) => "half_life",
            CalculationOutcome::DecayConstants(_) => "decay_constants",
            CalculationOutcome::Inequality(_) => "inequality",
            CalculationOutcome::Quadratic(_) => "quadratic",
            CalculationOutcome::Mileage(_) => "mileage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate_json(json: &str) -> CalcResult<CalculationOutcome> {
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        item.evaluate()
    }

    #[test]
    fn test_dispatch_tags_match() {
        let outcome = evaluate_json(r#"{ "calculator": "quadratic", "a": 1, "b": -3, "c": 2 }"#).unwrap();
        assert_eq!(outcome.calc_type(), "quadratic");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["calculator"], "quadratic");
        assert_eq!(json["roots"]["kind"], "two_real");
    }

    #[test]
    fn test_nested_tags() {
        let outcome = evaluate_json(
            r#"{ "calculator": "distance", "kind": "planar", "a": { "x": 0, "y": 0 }, "b": { "x": 3, "y": 4 } }"#,
        )
        .unwrap();
        match outcome {
            CalculationOutcome::Distance(r) => assert_eq!(r.distance, 5.0),
            other => panic!("unexpected {}", other.calc_type()),
        }
    }

    #[test]
    fn test_validation_error_propagates() {
        let err = evaluate_json(r#"{ "calculator": "solid", "solid": { "shape": "sphere", "radius": -1 } }"#)
            .unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(err.field_errors()[0].field, "radius");
    }

    #[test]
    fn test_unknown_calculator_rejected() {
        assert!(serde_json::from_str::<CalculationItem>(r#"{ "calculator": "numerology" }"#).is_err());
    }
}
