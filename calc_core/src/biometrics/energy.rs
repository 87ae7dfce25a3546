//! # Energy Expenditure
//!
//! Basal metabolic rate, total daily energy expenditure, a calorie target for
//! a weight goal, and the macronutrient split of that target.
//!
//! ## Pipeline
//!
//! 1. Convert imperial measurements to kg / cm
//! 2. BMR from the selected equation
//! 3. TDEE = BMR × activity multiplier
//! 4. Target = TDEE + goal delta
//! 5. Macros: target split by percentage, converted at 4 / 4 / 9 kcal per gram
//!
//! ## Example
//!
//! ```rust
//! use calc_core::biometrics::energy::*;
//! use calc_core::units::UnitSystem;
//!
//! let input = EnergyInput {
//!     age_years: 30.0,
//!     sex: Sex::Male,
//!     weight: 80.0,
//!     height: 180.0,
//!     unit_system: UnitSystem::Metric,
//!     activity: ActivityLevel::Moderate,
//!     goal: Goal::Maintain,
//!     formula: BmrFormula::MifflinStJeor,
//!     macro_split: MacroSplit::Balanced,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.bmr - 1780.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::units::{Centimeters, Inches, Kilograms, Pounds, UnitSystem};
use crate::validation::Validator;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Deficit at or beyond which an aggressive-diet advisory is added
const LARGE_DEFICIT_KCAL: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Recommended minimum daily intake without medical supervision
    pub fn minimum_calories(&self) -> f64 {
        match self {
            Sex::Male => 1500.0,
            Sex::Female => 1200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmrFormula {
    #[default]
    MifflinStJeor,
    /// Revised Harris-Benedict (Roza & Shizgal, 1984)
    HarrisBenedict,
}

impl BmrFormula {
    fn formula(&self) -> Formula {
        match self {
            BmrFormula::MifflinStJeor => Formula::MifflinStJeor,
            BmrFormula::HarrisBenedict => Formula::HarrisBenedict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Exercise 1-3 days/week
    Light,
    /// Exercise 3-5 days/week
    Moderate,
    /// Exercise 6-7 days/week
    Active,
    /// Hard exercise and a physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    ExtremeLoss,
    Loss,
    MildLoss,
    #[default]
    Maintain,
    MildGain,
    Gain,
}

impl Goal {
    /// Daily calorie adjustment
    pub fn calorie_delta(&self) -> f64 {
        match self {
            Goal::ExtremeLoss => -1000.0,
            Goal::Loss => -500.0,
            Goal::MildLoss => -250.0,
            Goal::Maintain => 0.0,
            Goal::MildGain => 250.0,
            Goal::Gain => 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroSplit {
    #[default]
    Balanced,
    LowCarb,
    HighProtein,
    LowFat,
}

impl MacroSplit {
    /// (protein, carbs, fat) percentages of calories
    pub fn percentages(&self) -> (f64, f64, f64) {
        match self {
            MacroSplit::Balanced => (30.0, 40.0, 30.0),
            MacroSplit::LowCarb => (40.0, 20.0, 40.0),
            MacroSplit::HighProtein => (40.0, 35.0, 25.0),
            MacroSplit::LowFat => (25.0, 55.0, 20.0),
        }
    }
}

/// WHO adult BMI classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObeseClassI,
    ObeseClassII,
    ObeseClassIII,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ObeseClassI
        } else if bmi < 40.0 {
            BmiCategory::ObeseClassII
        } else {
            BmiCategory::ObeseClassIII
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::ObeseClassI => "Obese (Class I)",
            BmiCategory::ObeseClassII => "Obese (Class II)",
            BmiCategory::ObeseClassIII => "Obese (Class III)",
        }
    }
}

/// Input parameters for an energy expenditure calculation.
///
/// `weight` and `height` are kg / cm for metric and lb / in for imperial.
///
/// ## JSON Example
///
/// ```json
/// {
///   "age_years": 35,
///   "sex": "female",
///   "weight": 150,
///   "height": 65,
///   "unit_system": "imperial",
///   "activity": "light",
///   "goal": "loss",
///   "formula": "harris_benedict",
///   "macro_split": "high_protein"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyInput {
    pub age_years: f64,
    pub sex: Sex,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub unit_system: UnitSystem,
    #[serde(default)]
    pub activity: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub formula: BmrFormula,
    #[serde(default)]
    pub macro_split: MacroSplit,
}

impl EnergyInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.in_range("age_years", self.age_years, 15.0, 100.0);
        v.positive("weight", self.weight);
        v.positive("height", self.height);
        v.finish()
    }

    /// Weight in kg and height in cm
    pub fn metric_measurements(&self) -> (f64, f64) {
        match self.unit_system {
            UnitSystem::Metric => (self.weight, self.height),
            UnitSystem::Imperial => (
                Kilograms::from(Pounds(self.weight)).value(),
                Centimeters::from(Inches(self.height)).value(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroBreakdown {
    pub protein_pct: f64,
    pub carbs_pct: f64,
    pub fat_pct: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyResult {
    pub weight_kg: f64,
    pub height_cm: f64,
    /// kcal/day
    pub bmr: f64,
    pub activity_multiplier: f64,
    /// kcal/day
    pub tdee: f64,
    pub calorie_delta: f64,
    /// kcal/day
    pub target_calories: f64,
    pub macros: MacroBreakdown,
    pub bmi: BmiResult,
    pub advisories: Vec<String>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// BMR in kcal/day from weight (kg), height (cm) and age (years).
pub fn basal_metabolic_rate(formula: BmrFormula, sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
    match (formula, sex) {
        (BmrFormula::MifflinStJeor, Sex::Male) => 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + 5.0,
        (BmrFormula::MifflinStJeor, Sex::Female) => 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years - 161.0,
        (BmrFormula::HarrisBenedict, Sex::Male) => {
            88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years
        }
        (BmrFormula::HarrisBenedict, Sex::Female) => {
            447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years
        }
    }
}

/// Split a calorie budget into grams of each macronutrient.
pub fn macro_breakdown(calories: f64, split: MacroSplit) -> MacroBreakdown {
    let (protein_pct, carbs_pct, fat_pct) = split.percentages();
    let kcal = calories.max(0.0);
    MacroBreakdown {
        protein_pct,
        carbs_pct,
        fat_pct,
        protein_g: kcal * protein_pct / 100.0 / KCAL_PER_GRAM_PROTEIN,
        carbs_g: kcal * carbs_pct / 100.0 / KCAL_PER_GRAM_CARBS,
        fat_g: kcal * fat_pct / 100.0 / KCAL_PER_GRAM_FAT,
    }
}

/// Body mass index from weight (kg) and height (cm).
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> BmiResult {
    let meters = height_cm / 100.0;
    let bmi = weight_kg / (meters * meters);
    BmiResult {
        bmi,
        category: BmiCategory::from_bmi(bmi),
    }
}

/// Calculate BMR, TDEE, calorie target and macros.
pub fn calculate(input: &EnergyInput) -> CalcResult<EnergyResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &EnergyInput) -> EnergyResult {
    let (weight_kg, height_cm) = input.metric_measurements();
    let mut d = Derivation::new(input.formula.formula());

    if input.unit_system == UnitSystem::Imperial {
        d.step(format!(
            "{} lb = {} kg, {} in = {} cm",
            fmt_num(input.weight),
            fmt_num(weight_kg),
            fmt_num(input.height),
            fmt_num(height_cm)
        ));
    }

    let bmr = basal_metabolic_rate(input.formula, input.sex, weight_kg, height_cm, input.age_years);
    d.step(format!("BMR = {} kcal/day", fmt_num(bmr)));

    d.apply(Formula::TotalDailyEnergy);
    let multiplier = input.activity.multiplier();
    let tdee = bmr * multiplier;
    d.step(format!("TDEE = {} × {} = {} kcal/day", fmt_num(bmr), multiplier, fmt_num(tdee)));

    let delta = input.goal.calorie_delta();
    let target = tdee + delta;
    d.step(format!("Target = {} + ({}) = {} kcal/day", fmt_num(tdee), fmt_num(delta), fmt_num(target)));

    d.apply(Formula::MacroGrams);
    let macros = macro_breakdown(target, input.macro_split);
    d.step(format!(
        "Protein {} g, carbs {} g, fat {} g",
        fmt_num(macros.protein_g),
        fmt_num(macros.carbs_g),
        fmt_num(macros.fat_g)
    ));

    d.apply(Formula::BodyMassIndex);
    let bmi = body_mass_index(weight_kg, height_cm);
    d.step(format!("BMI = {} ({})", fmt_num(bmi.bmi), bmi.category.display_name()));

    let mut advisories = Vec::new();
    let minimum = input.sex.minimum_calories();
    if target < minimum {
        advisories.push(format!(
            "Target of {} kcal/day is below the recommended minimum of {} kcal/day",
            target.round(),
            minimum
        ));
    }
    if -delta >= LARGE_DEFICIT_KCAL {
        advisories.push("A deficit of 1000 kcal/day or more should be medically supervised".to_string());
    }
    match bmi.category {
        BmiCategory::Normal => {}
        BmiCategory::Underweight => {
            advisories.push(format!("BMI {:.1} is below the normal range (18.5 - 24.9)", bmi.bmi));
        }
        _ => advisories.push(format!("BMI {:.1} is above the normal range (18.5 - 24.9)", bmi.bmi)),
    }

    let (formula, steps) = d.into_parts();
    EnergyResult {
        weight_kg,
        height_cm,
        bmr,
        activity_multiplier: multiplier,
        tdee,
        calorie_delta: delta,
        target_calories: target,
        macros,
        bmi,
        advisories,
        formula,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(sex: Sex, age: f64, weight: f64, height: f64) -> EnergyInput {
        EnergyInput {
            age_years: age,
            sex,
            weight,
            height,
            unit_system: UnitSystem::Metric,
            activity: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
            formula: BmrFormula::MifflinStJeor,
            macro_split: MacroSplit::Balanced,
        }
    }

    #[test]
    fn test_mifflin() {
        assert!((basal_metabolic_rate(BmrFormula::MifflinStJeor, Sex::Male, 80.0, 180.0, 30.0) - 1780.0).abs() < 1e-9);
        assert!(
            (basal_metabolic_rate(BmrFormula::MifflinStJeor, Sex::Female, 60.0, 165.0, 25.0) - 1345.25).abs() < 1e-9
        );
    }

    #[test]
    fn test_harris_benedict() {
        let bmr = basal_metabolic_rate(BmrFormula::HarrisBenedict, Sex::Male, 80.0, 180.0, 30.0);
        assert!((bmr - 1853.632).abs() < 1e-9);
    }

    #[test]
    fn test_tdee_and_goal() {
        let mut input = metric(Sex::Male, 30.0, 80.0, 180.0);
        input.activity = ActivityLevel::Moderate;
        input.goal = Goal::Loss;
        let r = calculate(&input).unwrap();
        assert!((r.tdee - 2759.0).abs() < 1e-9);
        assert!((r.target_calories - 2259.0).abs() < 1e-9);
    }

    #[test]
    fn test_macros_sum_to_calories() {
        for split in [MacroSplit::Balanced, MacroSplit::LowCarb, MacroSplit::HighProtein, MacroSplit::LowFat] {
            let m = macro_breakdown(2000.0, split);
            let kcal = m.protein_g * 4.0 + m.carbs_g * 4.0 + m.fat_g * 9.0;
            assert!((kcal - 2000.0).abs() < 1e-9);
            assert_eq!(m.protein_pct + m.carbs_pct + m.fat_pct, 100.0);
        }
    }

    #[test]
    fn test_imperial_matches_metric() {
        let metric_result = calculate(&metric(Sex::Female, 40.0, 68.0, 170.0)).unwrap();
        let mut imperial = metric(Sex::Female, 40.0, 68.0 / 0.453_592_37, 170.0 / 2.54);
        imperial.unit_system = UnitSystem::Imperial;
        let imperial_result = calculate(&imperial).unwrap();
        assert!((metric_result.bmr - imperial_result.bmr).abs() < 1e-9);
    }

    #[test]
    fn test_low_target_advisory() {
        let mut input = metric(Sex::Female, 60.0, 50.0, 155.0);
        input.goal = Goal::ExtremeLoss;
        let r = calculate(&input).unwrap();
        assert!(r.target_calories < 1200.0);
        assert!(r.advisories.iter().any(|a| a.contains("minimum")));
        assert!(r.advisories.iter().any(|a| a.contains("supervised")));
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(body_mass_index(70.0, 175.0).category, BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(42.0), BmiCategory::ObeseClassIII);
    }

    #[test]
    fn test_age_range() {
        assert!(calculate(&metric(Sex::Male, 14.0, 60.0, 170.0)).is_err());
        assert!(calculate(&metric(Sex::Male, 101.0, 60.0, 170.0)).is_err());
        assert!(calculate(&metric(Sex::Male, 100.0, 60.0, 170.0)).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let err = calculate(&metric(Sex::Male, 10.0, 0.0, -5.0)).unwrap_err();
        assert_eq!(err.field_errors().len(), 3);
    }
}
