//! # Slope Between Two Points
//!
//! Slope, inclination angle and percent grade of the line through two points,
//! with a grade classification and a short human-readable recommendation.
//!
//! Vertical lines, horizontal lines and coincident points are distinct
//! outcomes reported through [`SlopeKind`], not errors.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::geometry::distance::Point2;
//! use calc_core::geometry::slope::{calculate, GradeCategory, SlopeInput};
//!
//! let input = SlopeInput {
//!     a: Point2 { x: 0.0, y: 0.0 },
//!     b: Point2 { x: 100.0, y: 8.0 },
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.category, Some(GradeCategory::Moderate));
//! ```

use serde::{Deserialize, Serialize};

use super::distance::Point2;
use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::validation::Validator;

/// Shape of the line through the two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeKind {
    Sloped,
    Horizontal,
    Vertical,
    /// Both points coincide; no line is determined
    IdenticalPoints,
}

/// Percent-grade band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeCategory {
    Flat,
    Gentle,
    Moderate,
    Steep,
    VerySteep,
}

impl GradeCategory {
    /// Band for a non-zero grade. `Flat` is reserved for horizontal lines.
    pub fn from_grade(grade_pct: f64) -> Self {
        let g = grade_pct.abs();
        if g < 5.0 {
            GradeCategory::Gentle
        } else if g < 15.0 {
            GradeCategory::Moderate
        } else if g < 30.0 {
            GradeCategory::Steep
        } else {
            GradeCategory::VerySteep
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GradeCategory::Flat => "Flat",
            GradeCategory::Gentle => "Gentle",
            GradeCategory::Moderate => "Moderate",
            GradeCategory::Steep => "Steep",
            GradeCategory::VerySteep => "Very Steep",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            GradeCategory::Flat => "Level surface. Provide a slight cross-fall if drainage matters.",
            GradeCategory::Gentle => "Comfortable for walking, wheelchairs and most vehicles.",
            GradeCategory::Moderate => "Noticeable incline. Suitable for roads and paths; too steep for accessible ramps.",
            GradeCategory::Steep => "Difficult for vehicles and pedestrians. Consider switchbacks or steps.",
            GradeCategory::VerySteep => "Too steep for regular traffic. Requires stairs, retaining structures or climbing aids.",
        }
    }
}

/// Input parameters for a slope calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeInput {
    pub a: Point2,
    pub b: Point2,
}

impl SlopeInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.finite("a.x", self.a.x);
        v.finite("a.y", self.a.y);
        v.finite("b.x", self.b.x);
        v.finite("b.y", self.b.y);
        v.finish()
    }
}

/// Results from a slope calculation.
///
/// Numeric fields are `None` where the slope kind leaves them undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeResult {
    pub kind: SlopeKind,
    pub slope: Option<f64>,
    /// Inclination in degrees, -90..=90
    pub angle_deg: Option<f64>,
    pub grade_pct: Option<f64>,
    pub category: Option<GradeCategory>,
    pub y_intercept: Option<f64>,
    pub line_equation: Option<String>,
    pub distance: f64,
    pub midpoint: Point2,
    pub recommendation: String,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate slope, angle and grade between two points.
pub fn calculate(input: &SlopeInput) -> CalcResult<SlopeResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &SlopeInput) -> SlopeResult {
    let SlopeInput { a, b } = *input;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = dx.hypot(dy);
    let midpoint = Point2 { x: (a.x + b.x) / 2.0, y: (a.y + b.y) / 2.0 };

    let mut d = Derivation::new(Formula::Slope);
    d.step(format!("Δx = {} − {} = {}", fmt_num(b.x), fmt_num(a.x), fmt_num(dx)));
    d.step(format!("Δy = {} − {} = {}", fmt_num(b.y), fmt_num(a.y), fmt_num(dy)));

    let kind = match (dx == 0.0, dy == 0.0) {
        (true, true) => SlopeKind::IdenticalPoints,
        (true, false) => SlopeKind::Vertical,
        (false, true) => SlopeKind::Horizontal,
        (false, false) => SlopeKind::Sloped,
    };

    let (slope, angle_deg, grade_pct, category, y_intercept, line_equation) = match kind {
        SlopeKind::IdenticalPoints => {
            d.step("Both points coincide: slope is undefined");
            (None, None, None, None, None, None)
        }
        SlopeKind::Vertical => {
            d.step("Δx = 0: vertical line, slope is undefined");
            let equation = format!("x = {}", fmt_num(a.x));
            (None, Some(90.0), None, Some(GradeCategory::VerySteep), None, Some(equation))
        }
        SlopeKind::Horizontal | SlopeKind::Sloped => {
            let m = dy / dx;
            let angle = m.atan().to_degrees();
            let grade = m.abs() * 100.0;
            let intercept = a.y - m * a.x;
            d.apply(Formula::SlopeAngle);
            d.apply(Formula::PercentGrade);
            d.step(format!("m = {} / {} = {}", fmt_num(dy), fmt_num(dx), fmt_num(m)));
            d.step(format!("θ = atan({}) = {}°", fmt_num(m), fmt_num(angle)));
            d.step(format!("grade = |{}| × 100 = {}%", fmt_num(m), fmt_num(grade)));
            let category = if kind == SlopeKind::Horizontal {
                GradeCategory::Flat
            } else {
                GradeCategory::from_grade(grade)
            };
            (Some(m), Some(angle), Some(grade), Some(category), Some(intercept), Some(line_equation(m, intercept)))
        }
    };

    let recommendation = match category {
        Some(c) => c.recommendation().to_string(),
        None => "Two distinct points are needed to define a slope.".to_string(),
    };

    let (formula, steps) = d.into_parts();
    SlopeResult {
        kind,
        slope,
        angle_deg,
        grade_pct,
        category,
        y_intercept,
        line_equation,
        distance,
        midpoint,
        recommendation,
        formula,
        steps,
    }
}

fn line_equation(m: f64, b: f64) -> String {
    if m == 0.0 {
        return format!("y = {}", fmt_num(b));
    }
    if b == 0.0 {
        return format!("y = {}x", fmt_num(m));
    }
    let sign = if b < 0.0 { '-' } else { '+' };
    format!("y = {}x {} {}", fmt_num(m), sign, fmt_num(b.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope(ax: f64, ay: f64, bx: f64, by: f64) -> SlopeResult {
        calculate(&SlopeInput {
            a: Point2 { x: ax, y: ay },
            b: Point2 { x: bx, y: by },
        })
        .unwrap()
    }

    #[test]
    fn test_forty_five_degrees() {
        let r = slope(1.0, 1.0, 3.0, 3.0);
        assert_eq!(r.kind, SlopeKind::Sloped);
        assert_eq!(r.slope, Some(1.0));
        assert!((r.angle_deg.unwrap() - 45.0).abs() < 1e-12);
        assert_eq!(r.grade_pct, Some(100.0));
        assert_eq!(r.category, Some(GradeCategory::VerySteep));
        assert_eq!(r.line_equation.as_deref(), Some("y = 1x"));
    }

    #[test]
    fn test_vertical() {
        let r = slope(2.0, 0.0, 2.0, 5.0);
        assert_eq!(r.kind, SlopeKind::Vertical);
        assert!(r.slope.is_none());
        assert_eq!(r.angle_deg, Some(90.0));
        assert_eq!(r.line_equation.as_deref(), Some("x = 2"));
    }

    #[test]
    fn test_horizontal() {
        let r = slope(-1.0, 4.0, 7.0, 4.0);
        assert_eq!(r.kind, SlopeKind::Horizontal);
        assert_eq!(r.slope, Some(0.0));
        assert_eq!(r.grade_pct, Some(0.0));
        assert_eq!(r.category, Some(GradeCategory::Flat));
    }

    #[test]
    fn test_identical_points() {
        let r = slope(3.0, 3.0, 3.0, 3.0);
        assert_eq!(r.kind, SlopeKind::IdenticalPoints);
        assert!(r.slope.is_none() && r.angle_deg.is_none() && r.category.is_none());
        assert_eq!(r.distance, 0.0);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(GradeCategory::from_grade(4.99), GradeCategory::Gentle);
        assert_eq!(GradeCategory::from_grade(5.0), GradeCategory::Moderate);
        assert_eq!(GradeCategory::from_grade(15.0), GradeCategory::Steep);
        assert_eq!(GradeCategory::from_grade(30.0), GradeCategory::VerySteep);
        assert_eq!(GradeCategory::from_grade(-12.0), GradeCategory::Moderate);
    }

    #[test]
    fn test_negative_slope_intercept() {
        let r = slope(0.0, 3.0, 3.0, 0.0);
        assert_eq!(r.slope, Some(-1.0));
        assert_eq!(r.y_intercept, Some(3.0));
        assert_eq!(r.line_equation.as_deref(), Some("y = -1x + 3"));
        assert!((r.angle_deg.unwrap() + 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let input = SlopeInput {
            a: Point2 { x: f64::NAN, y: 0.0 },
            b: Point2 { x: 1.0, y: f64::INFINITY },
        };
        assert_eq!(calculate(&input).unwrap_err().field_errors().len(), 2);
    }
}
