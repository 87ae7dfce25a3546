//! # Algebra
//!
//! - [`quadratic`] - Roots and vertex of `ax² + bx + c = 0`
//! - [`inequality`] - Linear, quadratic and absolute-value inequalities
//! - [`interval`] - Solution sets and their notation

pub mod inequality;
pub mod interval;
pub mod quadratic;

pub use inequality::{Comparison, InequalityInput, InequalityResult};
pub use interval::{Bound, Interval, Solution};
pub use quadratic::{solve_quadratic, QuadraticInput, QuadraticResult, QuadraticRoots};
