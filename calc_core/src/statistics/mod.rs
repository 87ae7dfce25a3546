//! # Statistics
//!
//! - [`normal`] - Standard normal CDF, inverse CDF and critical values
//! - [`sample_size`] - Sample size for estimating a proportion
//! - [`power`] - Sample size for a target statistical power
//! - [`half_life`] - Exponential decay and decay constant conversion
//! - [`isotopes`] - Isotope half-life table
//!
//! Probabilities and margins are fractions here (0.05 = 5%).

pub mod half_life;
pub mod isotopes;
pub mod normal;
pub mod power;
pub mod sample_size;

pub use half_life::{DecayConstant, DecayConstantsInput, DecayConstantsResult, DecayRate, HalfLifeInput, HalfLifeProblem, HalfLifeResult};
pub use isotopes::{find_isotope, Isotope, IsotopeCategory, ISOTOPES};
pub use normal::{inverse_normal_cdf, normal_cdf, z_for_confidence};
pub use power::{PowerInput, PowerResult, PowerTest, Tails};
pub use sample_size::{ConfidenceSpec, SampleSizeInput, SampleSizeResult};
