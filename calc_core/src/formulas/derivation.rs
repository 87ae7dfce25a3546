//! Step-by-step derivation recorder.
//!
//! Calculators create a `Derivation` for their primary formula, push a
//! human-readable line for each substitution, and finally split it into the
//! `formula` / `steps` pair stored on the result record.

use serde::{Deserialize, Serialize};

use super::registry::Formula;

/// Ordered explanation of how a result was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derivation {
    primary: Formula,
    applied: Vec<Formula>,
    steps: Vec<String>,
}

impl Derivation {
    pub fn new(primary: Formula) -> Self {
        Self {
            primary,
            applied: vec![primary],
            steps: Vec::new(),
        }
    }

    /// Record that a secondary formula contributed to the result
    pub fn apply(&mut self, formula: Formula) {
        if !self.applied.contains(&formula) {
            self.applied.push(formula);
        }
    }

    /// Append an explanation line
    pub fn step(&mut self, line: impl Into<String>) {
        self.steps.push(line.into());
    }

    pub fn primary(&self) -> Formula {
        self.primary
    }

    /// All formulas used, primary first, without duplicates
    pub fn applied(&self) -> &[Formula] {
        &self.applied
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Split into the `(formula, steps)` pair carried by result records
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.primary.metadata().formula_plain.to_string(), self.steps)
    }
}

/// Format a number for explanation text: up to 4 decimals, trailing zeros trimmed.
pub fn fmt_num(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value != 0.0 && (value.abs() >= 1e9 || value.abs() < 1e-4) {
        return format!("{:.4e}", value);
    }
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(2.0), "2");
        assert_eq!(fmt_num(3.14159265), "3.1416");
        assert_eq!(fmt_num(-0.5), "-0.5");
        assert_eq!(fmt_num(-0.00001), "-1.0000e-5");
        assert_eq!(fmt_num(0.0), "0");
    }

    #[test]
    fn test_applied_is_deduplicated() {
        let mut d = Derivation::new(Formula::Slope);
        d.apply(Formula::SlopeAngle);
        d.apply(Formula::Slope);
        d.apply(Formula::PercentGrade);
        assert_eq!(d.applied(), &[Formula::Slope, Formula::SlopeAngle, Formula::PercentGrade]);
    }

    #[test]
    fn test_into_parts_uses_primary_formula() {
        let mut d = Derivation::new(Formula::EuclideanDistance);
        d.step("Δx = 3");
        let (formula, steps) = d.into_parts();
        assert!(formula.contains("sqrt"));
        assert_eq!(steps, vec!["Δx = 3".to_string()]);
    }
}
