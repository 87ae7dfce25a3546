//! # Input Validation
//!
//! Every calculator splits its work into two stages: `validate()` checks the
//! whole input record and reports *every* bad field at once, then a total
//! `compute()` evaluates the formula. `Validator` is the collector used by
//! the first stage.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::validation::Validator;
//!
//! let mut v = Validator::new();
//! v.positive("radius", -2.0);
//! v.finite("height", f64::NAN);
//! let err = v.finish().unwrap_err();
//! assert_eq!(err.field_errors().len(), 2);
//! ```

use crate::errors::{CalcError, CalcResult, FieldError};

/// Collects field errors during a validation pass.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arbitrary failure
    pub fn reject(&mut self, field: &str, value: impl ToString, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, value.to_string(), reason));
    }

    /// Value must be a finite number. Returns whether the check passed.
    pub fn finite(&mut self, field: &str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            self.reject(field, value, "Must be a finite number");
            false
        }
    }

    /// Value must be finite and strictly greater than zero
    pub fn positive(&mut self, field: &str, value: f64) -> bool {
        if !self.finite(field, value) {
            return false;
        }
        if value <= 0.0 {
            self.reject(field, value, "Must be greater than zero");
            return false;
        }
        true
    }

    /// Value must be finite and at least zero
    pub fn non_negative(&mut self, field: &str, value: f64) -> bool {
        if !self.finite(field, value) {
            return false;
        }
        if value < 0.0 {
            self.reject(field, value, "Cannot be negative");
            return false;
        }
        true
    }

    /// Value must lie in the closed range [min, max]
    pub fn in_range(&mut self, field: &str, value: f64, min: f64, max: f64) -> bool {
        if !self.finite(field, value) {
            return false;
        }
        if value < min || value > max {
            self.reject(field, value, format!("Must be between {} and {}", min, max));
            return false;
        }
        true
    }

    /// Value must lie strictly between `min` and `max`
    pub fn in_open_range(&mut self, field: &str, value: f64, min: f64, max: f64) -> bool {
        if !self.finite(field, value) {
            return false;
        }
        if value <= min || value >= max {
            self.reject(field, value, format!("Must be strictly between {} and {}", min, max));
            return false;
        }
        true
    }

    /// Value must be a probability strictly inside (0, 1)
    pub fn probability(&mut self, field: &str, value: f64) -> bool {
        self.in_open_range(field, value, 0.0, 1.0)
    }

    /// Generic predicate check
    pub fn check(&mut self, ok: bool, field: &str, value: impl ToString, reason: impl Into<String>) -> bool {
        if !ok {
            self.reject(field, value, reason);
        }
        ok
    }

    /// Finish the pass: `Ok(())` if nothing was rejected.
    pub fn finish(self) -> CalcResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CalcError::from_field_errors(self.errors))
        }
    }
}
