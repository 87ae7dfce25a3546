//! # Quadratic Equations
//!
//! Roots of `ax² + bx + c = 0` with the discriminant case analysis, using
//! the cancellation-free form of the quadratic formula:
//!
//! ```text
//! q  = -(b + sign(b)·√D) / 2
//! x1 = q / a,  x2 = c / q
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::validation::Validator;

/// Discriminants this close to zero (relative to the coefficients) count as zero
const DISCRIMINANT_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuadraticRoots {
    /// Distinct real roots, `x1 < x2`
    TwoReal { x1: f64, x2: f64 },
    Repeated { x: f64 },
    /// Conjugate pair `real ± imaginary·i`, `imaginary > 0`
    Complex { real: f64, imaginary: f64 },
}

pub fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    let d = b * b - 4.0 * a * c;
    let scale = b * b + (4.0 * a * c).abs();
    // an overflowed scale would swallow every discriminant
    if scale.is_finite() && d.abs() <= DISCRIMINANT_TOLERANCE * scale {
        0.0
    } else {
        d
    }
}

/// Roots of `ax² + bx + c = 0`. `a` must be non-zero.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> QuadraticRoots {
    if !(b * b).is_finite() || !(4.0 * a * c).is_finite() {
        // same roots, coefficients brought down to at most 1 in magnitude
        let s = a.abs().max(b.abs()).max(c.abs());
        return solve_quadratic(a / s, b / s, c / s);
    }
    let d = discriminant(a, b, c);
    if d == 0.0 {
        return QuadraticRoots::Repeated { x: -b / (2.0 * a) };
    }
    if d < 0.0 {
        return QuadraticRoots::Complex {
            real: -b / (2.0 * a),
            imaginary: (-d).sqrt() / (2.0 * a.abs()),
        };
    }
    let sign = if b < 0.0 { -1.0 } else { 1.0 };
    let q = -0.5 * (b + sign * d.sqrt());
    let (r1, r2) = (q / a, c / q);
    QuadraticRoots::TwoReal {
        x1: r1.min(r2),
        x2: r1.max(r2),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadraticInput {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl QuadraticInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        if v.finite("a", self.a) {
            v.check(self.a != 0.0, "a", self.a, "Leading coefficient must be non-zero");
        }
        v.finite("b", self.b);
        v.finite("c", self.c);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadraticResult {
    pub discriminant: f64,
    pub roots: QuadraticRoots,
    pub vertex_x: f64,
    pub vertex_y: f64,
    pub opens_upward: bool,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Solve a quadratic equation and describe its parabola.
pub fn calculate(input: &QuadraticInput) -> CalcResult<QuadraticResult> {
    input.validate()?;

    let QuadraticInput { a, b, c } = *input;
    let mut d = Derivation::new(Formula::QuadraticFormula);
    let disc = discriminant(a, b, c);
    d.step(format!(
        "D = {}² − 4 × {} × {} = {}",
        fmt_num(b),
        fmt_num(a),
        fmt_num(c),
        fmt_num(disc)
    ));

    let roots = solve_quadratic(a, b, c);
    match roots {
        QuadraticRoots::TwoReal { x1, x2 } => {
            d.step(format!("D > 0: two real roots x = {} and x = {}", fmt_num(x1), fmt_num(x2)));
        }
        QuadraticRoots::Repeated { x } => {
            d.step(format!("D = 0: repeated root x = {}", fmt_num(x)));
        }
        QuadraticRoots::Complex { real, imaginary } => {
            d.step(format!(
                "D < 0: complex roots x = {} ± {}i",
                fmt_num(real),
                fmt_num(imaginary)
            ));
        }
    }

    let vertex_x = -b / (2.0 * a);
    let vertex_y = a * vertex_x * vertex_x + b * vertex_x + c;
    d.step(format!("Vertex = ({}, {})", fmt_num(vertex_x), fmt_num(vertex_y)));

    let (formula, steps) = d.into_parts();
    Ok(QuadraticResult {
        discriminant: disc,
        roots,
        vertex_x,
        vertex_y,
        opens_upward: a > 0.0,
        formula,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_real_roots_sorted() {
        assert_eq!(solve_quadratic(1.0, -5.0, 6.0), QuadraticRoots::TwoReal { x1: 2.0, x2: 3.0 });
        assert_eq!(solve_quadratic(-1.0, 5.0, -6.0), QuadraticRoots::TwoReal { x1: 2.0, x2: 3.0 });
    }

    #[test]
    fn test_repeated_root() {
        assert_eq!(solve_quadratic(1.0, -2.0, 1.0), QuadraticRoots::Repeated { x: 1.0 });
    }

    #[test]
    fn test_complex_roots() {
        match solve_quadratic(1.0, 2.0, 5.0) {
            QuadraticRoots::Complex { real, imaginary } => {
                assert_eq!(real, -1.0);
                assert_eq!(imaginary, 2.0);
            }
            other => panic!("expected complex roots, got {:?}", other),
        }
    }

    #[test]
    fn test_no_cancellation_for_small_root() {
        // roots 1e8 and 1e-8
        match solve_quadratic(1.0, -1e8, 1.0) {
            QuadraticRoots::TwoReal { x1, x2 } => {
                assert!((x1 - 1e-8).abs() / 1e-8 < 1e-12);
                assert!((x2 - 1e8).abs() / 1e8 < 1e-12);
            }
            other => panic!("expected real roots, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_coefficients_keep_distinct_roots() {
        // b² overflows f64; roots are about -1e200 and -1e-200
        match solve_quadratic(1.0, 1e200, 1.0) {
            QuadraticRoots::TwoReal { x1, x2 } => {
                assert!((x1 + 1e200).abs() / 1e200 < 1e-12);
                assert!((x2 + 1e-200).abs() / 1e-200 < 1e-12);
            }
            other => panic!("expected real roots, got {:?}", other),
        }
        assert!(discriminant(1.0, 1e200, 1.0) > 0.0);

        match solve_quadratic(1e300, 0.0, 1e300) {
            QuadraticRoots::Complex { real, imaginary } => {
                assert_eq!(real, 0.0);
                assert!((imaginary - 1.0).abs() < 1e-12);
            }
            other => panic!("expected complex roots, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_leading_coefficient_rejected() {
        let err = calculate(&QuadraticInput { a: 0.0, b: 1.0, c: 1.0 }).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "a");
    }

    #[test]
    fn test_vertex() {
        let r = calculate(&QuadraticInput { a: 2.0, b: -4.0, c: 1.0 }).unwrap();
        assert_eq!(r.vertex_x, 1.0);
        assert_eq!(r.vertex_y, -1.0);
        assert!(r.opens_upward);
    }
}
