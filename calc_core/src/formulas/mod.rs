//! # Formula Registry
//!
//! Every closed-form relation evaluated by a calculator is listed here once,
//! with its plain-text form, variables and a reference. Keeping them in one
//! place lets results cite the formula they used and lets `gen-formulas`
//! produce a single audit document.
//!
//! ## Modules
//!
//! - [`registry`] - The `Formula` enum and its metadata
//! - [`derivation`] - Step recorder used by calculators to explain a result

pub mod derivation;
pub mod registry;

pub use derivation::{fmt_num, Derivation};
pub use registry::{
    generate_formulas_markdown, Formula, FormulaCategory, FormulaMetadata, Variable, ALL_FORMULAS,
};
