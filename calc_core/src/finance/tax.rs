//! # Income Tax Estimate
//!
//! US federal income tax and payroll (FICA) tax for one filer:
//!
//! ```text
//! gross income
//!   - above-the-line deductions  = AGI
//!   - standard or itemized        = taxable income
//!   progressive brackets         = tax before credits
//!   - non-refundable credits     = income tax
//!   + Social Security + Medicare = total tax
//! ```
//!
//! Bracket thresholds, standard deductions and FICA parameters come from
//! static per-year tables. The top bracket is open-ended, so every taxable
//! income resolves to a bracket.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::finance::tax::{calculate, Deduction, FilingStatus, TaxInput, TaxYear};
//!
//! let input = TaxInput {
//!     tax_year: TaxYear::Y2024,
//!     filing_status: FilingStatus::Single,
//!     gross_income: 100_000.0,
//!     above_the_line_deductions: 0.0,
//!     deduction: Deduction::Standard,
//!     credits: 0.0,
//!     fica_wages: None,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.income_tax - 13_841.0).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::validation::Validator;

// ============================================================================
// Tables
// ============================================================================

/// Tax year with published tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum TaxYear {
    #[default]
    Y2024,
}

impl TaxYear {
    pub const ALL: &'static [TaxYear] = &[TaxYear::Y2024];

    pub fn year(&self) -> u16 {
        match self {
            TaxYear::Y2024 => 2024,
        }
    }

    fn table(&self) -> &'static YearTable {
        match self {
            TaxYear::Y2024 => &TABLE_2024,
        }
    }
}

impl TryFrom<u16> for TaxYear {
    type Error = CalcError;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        TaxYear::ALL
            .iter()
            .copied()
            .find(|y| y.year() == year)
            .ok_or_else(|| CalcError::not_found("tax tables", year.to_string()))
    }
}

impl From<TaxYear> for u16 {
    fn from(year: TaxYear) -> Self {
        year.year()
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.year())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married Filing Jointly",
            FilingStatus::MarriedSeparate => "Married Filing Separately",
            FilingStatus::HeadOfHousehold => "Head of Household",
        }
    }

    fn index(&self) -> usize {
        match self {
            FilingStatus::Single => 0,
            FilingStatus::MarriedJoint => 1,
            FilingStatus::MarriedSeparate => 2,
            FilingStatus::HeadOfHousehold => 3,
        }
    }
}

/// Published parameters for one tax year. Per-status arrays are indexed by
/// `FilingStatus::index`.
struct YearTable {
    rates_pct: [f64; 7],
    /// Upper bounds of the first six brackets; the seventh is open-ended
    thresholds: [[f64; 6]; 4],
    standard_deduction: [f64; 4],
    social_security_rate_pct: f64,
    social_security_wage_base: f64,
    medicare_rate_pct: f64,
    additional_medicare_rate_pct: f64,
    additional_medicare_threshold: [f64; 4],
}

static TABLE_2024: YearTable = YearTable {
    rates_pct: [10.0, 12.0, 22.0, 24.0, 32.0, 35.0, 37.0],
    thresholds: [
        [11_600.0, 47_150.0, 100_525.0, 191_950.0, 243_725.0, 609_350.0],
        [23_200.0, 94_300.0, 201_050.0, 383_900.0, 487_450.0, 731_200.0],
        [11_600.0, 47_150.0, 100_525.0, 191_950.0, 243_725.0, 365_600.0],
        [16_550.0, 63_100.0, 100_500.0, 191_950.0, 243_700.0, 609_350.0],
    ],
    standard_deduction: [14_600.0, 29_200.0, 14_600.0, 21_900.0],
    social_security_rate_pct: 6.2,
    social_security_wage_base: 168_600.0,
    medicare_rate_pct: 1.45,
    additional_medicare_rate_pct: 0.9,
    additional_medicare_threshold: [200_000.0, 250_000.0, 125_000.0, 200_000.0],
};

/// One bracket of the progressive schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate_pct: f64,
    pub lower: f64,
    /// `None` for the open-ended top bracket
    pub upper: Option<f64>,
}

/// Bracket schedule for a year and filing status, lowest first.
pub fn brackets(year: TaxYear, status: FilingStatus) -> Vec<TaxBracket> {
    let table = year.table();
    let thresholds = &table.thresholds[status.index()];
    let mut lower = 0.0;
    table
        .rates_pct
        .iter()
        .enumerate()
        .map(|(i, &rate_pct)| {
            let upper = thresholds.get(i).copied();
            let bracket = TaxBracket { rate_pct, lower, upper };
            lower = upper.unwrap_or(lower);
            bracket
        })
        .collect()
}

pub fn standard_deduction(year: TaxYear, status: FilingStatus) -> f64 {
    year.table().standard_deduction[status.index()]
}

/// Tax owed within one bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracketLine {
    pub rate_pct: f64,
    pub lower: f64,
    pub upper: Option<f64>,
    pub taxable_amount: f64,
    pub tax: f64,
}

/// Apply a progressive schedule. Returns total tax and the lines for every
/// bracket that taxable income reaches.
pub fn bracket_tax(taxable_income: f64, schedule: &[TaxBracket]) -> (f64, Vec<BracketLine>) {
    let lines: Vec<BracketLine> = schedule
        .iter()
        .filter(|b| taxable_income > b.lower)
        .map(|b| {
            let top = b.upper.map_or(taxable_income, |u| taxable_income.min(u));
            let taxable_amount = top - b.lower;
            BracketLine {
                rate_pct: b.rate_pct,
                lower: b.lower,
                upper: b.upper,
                taxable_amount,
                tax: taxable_amount * b.rate_pct / 100.0,
            }
        })
        .collect();
    let total = lines.iter().map(|l| l.tax).sum();
    (total, lines)
}

/// Rate applied to the next dollar of taxable income
fn marginal_rate(taxable_income: f64, schedule: &[TaxBracket]) -> f64 {
    schedule
        .iter()
        .find(|b| b.upper.map_or(true, |u| taxable_income < u))
        .map_or(0.0, |b| b.rate_pct)
}

// ============================================================================
// FICA
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FicaBreakdown {
    pub wages: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub additional_medicare: f64,
    pub total: f64,
}

/// Payroll taxes on `wages` for a filing status.
pub fn fica(wages: f64, year: TaxYear, status: FilingStatus) -> FicaBreakdown {
    let table = year.table();
    let social_security = wages.min(table.social_security_wage_base) * table.social_security_rate_pct / 100.0;
    let medicare = wages * table.medicare_rate_pct / 100.0;
    let threshold = table.additional_medicare_threshold[status.index()];
    let additional_medicare = (wages - threshold).max(0.0) * table.additional_medicare_rate_pct / 100.0;
    FicaBreakdown {
        wages,
        social_security,
        medicare,
        additional_medicare,
        total: social_security + medicare + additional_medicare,
    }
}

// ============================================================================
// Income Tax
// ============================================================================

/// Deduction taken from AGI
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deduction {
    #[default]
    Standard,
    Itemized { amount: f64 },
}

/// Input parameters for a tax estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "tax_year": 2024,
///   "filing_status": "married_joint",
///   "gross_income": 150000.0,
///   "above_the_line_deductions": 6000.0,
///   "deduction": { "kind": "itemized", "amount": 32000.0 },
///   "credits": 2000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxInput {
    #[serde(default)]
    pub tax_year: TaxYear,
    #[serde(default)]
    pub filing_status: FilingStatus,
    pub gross_income: f64,
    #[serde(default)]
    pub above_the_line_deductions: f64,
    #[serde(default)]
    pub deduction: Deduction,
    /// Non-refundable credits
    #[serde(default)]
    pub credits: f64,
    /// Wages subject to FICA; defaults to gross income
    #[serde(default)]
    pub fica_wages: Option<f64>,
}

impl TaxInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.non_negative("gross_income", self.gross_income);
        v.non_negative("above_the_line_deductions", self.above_the_line_deductions);
        if let Deduction::Itemized { amount } = self.deduction {
            v.non_negative("deduction.amount", amount);
        }
        v.non_negative("credits", self.credits);
        if let Some(wages) = self.fica_wages {
            v.non_negative("fica_wages", wages);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: TaxYear,
    pub filing_status: FilingStatus,
    pub gross_income: f64,
    pub adjusted_gross_income: f64,
    pub deduction_used: f64,
    pub standard_deduction: f64,
    /// Itemizing, but the standard deduction would have been larger
    pub standard_is_larger: bool,
    pub taxable_income: f64,
    pub brackets: Vec<BracketLine>,
    pub tax_before_credits: f64,
    pub credits_applied: f64,
    pub income_tax: f64,
    pub marginal_rate_pct: f64,
    /// Income tax over gross income; 0 when gross is 0
    pub effective_rate_pct: f64,
    pub fica: FicaBreakdown,
    pub total_tax: f64,
    pub after_tax_income: f64,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Estimate federal income tax and FICA.
pub fn calculate(input: &TaxInput) -> CalcResult<TaxResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &TaxInput) -> TaxResult {
    let year = input.tax_year;
    let status = input.filing_status;
    let mut d = Derivation::new(Formula::ProgressiveTax);

    let agi = (input.gross_income - input.above_the_line_deductions).max(0.0);
    d.step(format!(
        "AGI = max(0, {} − {}) = {}",
        fmt_num(input.gross_income),
        fmt_num(input.above_the_line_deductions),
        fmt_num(agi)
    ));

    let standard = standard_deduction(year, status);
    let (deduction_used, standard_is_larger) = match input.deduction {
        Deduction::Standard => (standard, false),
        Deduction::Itemized { amount } => (amount, standard > amount),
    };
    let taxable = (agi - deduction_used).max(0.0);
    d.step(format!(
        "Taxable = max(0, {} − {}) = {}",
        fmt_num(agi),
        fmt_num(deduction_used),
        fmt_num(taxable)
    ));
    if standard_is_larger {
        d.step(format!("Note: the {} standard deduction of {} is larger", year, fmt_num(standard)));
    }

    let schedule = brackets(year, status);
    let (tax_before_credits, lines) = bracket_tax(taxable, &schedule);
    for line in &lines {
        d.step(format!(
            "{}% × {} = {}",
            fmt_num(line.rate_pct),
            fmt_num(line.taxable_amount),
            fmt_num(line.tax)
        ));
    }
    d.step(format!("Tax before credits = {}", fmt_num(tax_before_credits)));

    let credits_applied = input.credits.min(tax_before_credits);
    let income_tax = tax_before_credits - credits_applied;
    d.step(format!(
        "Income tax = {} − {} = {}",
        fmt_num(tax_before_credits),
        fmt_num(credits_applied),
        fmt_num(income_tax)
    ));

    d.apply(Formula::SocialSecurityTax);
    d.apply(Formula::MedicareTax);
    let wages = input.fica_wages.unwrap_or(input.gross_income);
    let fica = fica(wages, year, status);
    d.step(format!(
        "FICA = {} + {} + {} = {}",
        fmt_num(fica.social_security),
        fmt_num(fica.medicare),
        fmt_num(fica.additional_medicare),
        fmt_num(fica.total)
    ));

    let total_tax = income_tax + fica.total;
    let effective_rate_pct = if input.gross_income > 0.0 {
        income_tax / input.gross_income * 100.0
    } else {
        0.0
    };

    let (formula, steps) = d.into_parts();
    TaxResult {
        tax_year: year,
        filing_status: status,
        gross_income: input.gross_income,
        adjusted_gross_income: agi,
        deduction_used,
        standard_deduction: standard,
        standard_is_larger,
        taxable_income: taxable,
        brackets: lines,
        tax_before_credits,
        credits_applied,
        income_tax,
        marginal_rate_pct: marginal_rate(taxable, &schedule),
        effective_rate_pct,
        fica,
        total_tax,
        after_tax_income: input.gross_income - total_tax,
        formula,
        steps,
    }
}

// ============================================================================
// Gross-up
// ============================================================================

/// Input parameters for grossing up a net amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrossUpInput {
    pub net_amount: f64,
    pub tax_rate_pct: f64,
}

impl GrossUpInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.non_negative("net_amount", self.net_amount);
        v.non_negative("tax_rate_pct", self.tax_rate_pct);
        v.finish()
    }
}

/// Gross-up outcome. A rate of 100% or more can never leave a positive net.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GrossUpResult {
    Achievable {
        gross_amount: f64,
        tax_amount: f64,
        formula: String,
        steps: Vec<String>,
    },
    Unachievable {
        reason: String,
    },
}

/// Gross amount needed to keep `net_amount` after tax at `tax_rate_pct`.
pub fn gross_up(input: &GrossUpInput) -> CalcResult<GrossUpResult> {
    input.validate()?;

    let rate = input.tax_rate_pct / 100.0;
    if rate >= 1.0 {
        return Ok(GrossUpResult::Unachievable {
            reason: format!(
                "A {}% tax rate leaves nothing after tax",
                fmt_num(input.tax_rate_pct)
            ),
        });
    }

    let gross_amount = input.net_amount / (1.0 - rate);
    let mut d = Derivation::new(Formula::GrossUp);
    d.step(format!(
        "gross = {} / (1 − {}) = {}",
        fmt_num(input.net_amount),
        fmt_num(rate),
        fmt_num(gross_amount)
    ));
    let (formula, steps) = d.into_parts();
    Ok(GrossUpResult::Achievable {
        gross_amount,
        tax_amount: gross_amount - input.net_amount,
        formula,
        steps,
    })
}
