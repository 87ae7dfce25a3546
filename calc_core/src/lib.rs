//! # calc_core - Closed-Form Calculation Engine
//!
//! `calc_core` is the computational heart of Formulary: geometry, finance,
//! biometrics, statistics, algebra and mileage calculators with a clean,
//! LLM-friendly API. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Validate, then compute**: every input is checked up front and all bad
//!   fields are reported together; the computation itself cannot fail
//! - **Explained**: results carry the formula used and the substituted steps
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::geometry::solids::{calculate, Solid, SolidInput};
//!
//! let input = SolidInput {
//!     solid: Solid::Sphere { radius: 2.0 },
//!     unit: Default::default(),
//!     material: None,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.surface_area - 16.0 * std::f64::consts::PI).abs() < 1e-9);
//!
//! // Serialize to JSON for transmission
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Distance, solids, plane figures, slope
//! - [`finance`] - Bonds, returns, income tax, inflation
//! - [`biometrics`] - BMR, TDEE and macronutrients
//! - [`statistics`] - Sample size, power analysis, half-life decay
//! - [`algebra`] - Quadratic equations and inequalities
//! - [`mileage`] - Fuel economy and the trip log
//! - [`calculations`] - Tagged dispatch over every calculator
//! - [`formulas`] - Formula registry and derivation steps
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`settings`] - User preferences
//! - [`file_io`] - Atomic JSON persistence for the trip log and settings

pub mod algebra;
pub mod biometrics;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod finance;
pub mod formulas;
pub mod geometry;
pub mod mileage;
pub mod series;
pub mod settings;
pub mod statistics;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutcome};
pub use errors::{CalcError, CalcResult, FieldError};
pub use file_io::{load_settings, load_trip_log, save_settings, save_trip_log};
pub use formulas::{Formula, FormulaCategory};
pub use mileage::{TripLog, TripRecord};
pub use settings::CalculatorSettings;
