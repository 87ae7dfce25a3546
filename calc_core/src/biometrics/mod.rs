//! # Biometrics
//!
//! Calorie and body-composition calculators. See [`energy`].

pub mod energy;

pub use energy::{
    ActivityLevel, BmiCategory, BmrFormula, EnergyInput, EnergyResult, Goal, MacroBreakdown, MacroSplit, Sex,
};
