//! # Plane Figure Area
//!
//! Area and perimeter of common plane figures. Perimeter is `None` where the
//! figure's dimensions do not determine it (a trapezoid given only its bases
//! and height).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::units::LengthUnit;
use crate::validation::Validator;

/// Supported plane figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "figure", rename_all = "snake_case")]
pub enum PlaneFigure {
    Square { side: f64 },
    Rectangle { length: f64, width: f64 },
    Triangle { base: f64, height: f64 },
    /// Triangle from three side lengths (Heron's formula)
    TriangleSides { a: f64, b: f64, c: f64 },
    Circle { radius: f64 },
    /// Ellipse from its semi-axes
    Ellipse { semi_major: f64, semi_minor: f64 },
    Trapezoid { base_a: f64, base_b: f64, height: f64 },
    Parallelogram { base: f64, side: f64, height: f64 },
    /// Circular sector with a central angle in degrees, 0 < angle ≤ 360
    Sector { radius: f64, angle_deg: f64 },
}

impl PlaneFigure {
    pub fn name(&self) -> &'static str {
        match self {
            PlaneFigure::Square { .. } => "Square",
            PlaneFigure::Rectangle { .. } => "Rectangle",
            PlaneFigure::Triangle { .. } | PlaneFigure::TriangleSides { .. } => "Triangle",
            PlaneFigure::Circle { .. } => "Circle",
            PlaneFigure::Ellipse { .. } => "Ellipse",
            PlaneFigure::Trapezoid { .. } => "Trapezoid",
            PlaneFigure::Parallelogram { .. } => "Parallelogram",
            PlaneFigure::Sector { .. } => "Sector",
        }
    }

    pub fn formula(&self) -> Formula {
        match self {
            PlaneFigure::Square { .. } | PlaneFigure::Rectangle { .. } => Formula::RectangleArea,
            PlaneFigure::Triangle { .. } => Formula::TriangleArea,
            PlaneFigure::TriangleSides { .. } => Formula::HeronArea,
            PlaneFigure::Circle { .. } => Formula::CircleArea,
            PlaneFigure::Ellipse { .. } => Formula::EllipseArea,
            PlaneFigure::Trapezoid { .. } => Formula::TrapezoidArea,
            PlaneFigure::Parallelogram { .. } => Formula::ParallelogramArea,
            PlaneFigure::Sector { .. } => Formula::SectorArea,
        }
    }

    fn validate_into(&self, v: &mut Validator) {
        match *self {
            PlaneFigure::Square { side } => {
                v.positive("side", side);
            }
            PlaneFigure::Rectangle { length, width } => {
                v.positive("length", length);
                v.positive("width", width);
            }
            PlaneFigure::Triangle { base, height } => {
                v.positive("base", base);
                v.positive("height", height);
            }
            PlaneFigure::TriangleSides { a, b, c } => {
                let ok = v.positive("a", a) & v.positive("b", b) & v.positive("c", c);
                if ok {
                    let longest = a.max(b).max(c);
                    v.check(
                        a + b + c - longest > longest,
                        "sides",
                        format!("{}, {}, {}", a, b, c),
                        "Sides violate the triangle inequality",
                    );
                }
            }
            PlaneFigure::Circle { radius } => {
                v.positive("radius", radius);
            }
            PlaneFigure::Ellipse { semi_major, semi_minor } => {
                v.positive("semi_major", semi_major);
                v.positive("semi_minor", semi_minor);
            }
            PlaneFigure::Trapezoid { base_a, base_b, height } => {
                v.positive("base_a", base_a);
                v.positive("base_b", base_b);
                v.positive("height", height);
            }
            PlaneFigure::Parallelogram { base, side, height } => {
                v.positive("base", base);
                let side_ok = v.positive("side", side);
                let height_ok = v.positive("height", height);
                if side_ok && height_ok {
                    v.check(height <= side, "height", height, "Height cannot exceed the slanted side");
                }
            }
            PlaneFigure::Sector { radius, angle_deg } => {
                v.positive("radius", radius);
                if v.finite("angle_deg", angle_deg) {
                    v.check(
                        angle_deg > 0.0 && angle_deg <= 360.0,
                        "angle_deg",
                        angle_deg,
                        "Angle must be greater than 0 and at most 360 degrees",
                    );
                }
            }
        }
    }

    /// Area and perimeter. Dimensions are assumed valid.
    pub fn measure(&self) -> (f64, Option<f64>) {
        match *self {
            PlaneFigure::Square { side } => (side * side, Some(4.0 * side)),
            PlaneFigure::Rectangle { length, width } => (length * width, Some(2.0 * (length + width))),
            PlaneFigure::Triangle { base, height } => (base * height / 2.0, None),
            PlaneFigure::TriangleSides { a, b, c } => {
                let s = (a + b + c) / 2.0;
                let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
                (area, Some(a + b + c))
            }
            PlaneFigure::Circle { radius } => (PI * radius * radius, Some(2.0 * PI * radius)),
            PlaneFigure::Ellipse { semi_major: a, semi_minor: b } => {
                let perimeter = PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt());
                (PI * a * b, Some(perimeter))
            }
            PlaneFigure::Trapezoid { base_a, base_b, height } => ((base_a + base_b) * height / 2.0, None),
            PlaneFigure::Parallelogram { base, side, height } => (base * height, Some(2.0 * (base + side))),
            PlaneFigure::Sector { radius, angle_deg } => {
                let fraction = angle_deg / 360.0;
                let area = fraction * PI * radius * radius;
                let arc = fraction * 2.0 * PI * radius;
                // a full circle has no radial edges
                let perimeter = if angle_deg >= 360.0 { arc } else { 2.0 * radius + arc };
                (area, Some(perimeter))
            }
        }
    }
}

/// Input parameters for an area calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaInput {
    pub figure: PlaneFigure,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl AreaInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        self.figure.validate_into(&mut v);
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaResult {
    pub figure: String,
    pub area: f64,
    pub perimeter: Option<f64>,
    pub unit: String,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate area and perimeter of a plane figure.
pub fn calculate(input: &AreaInput) -> CalcResult<AreaResult> {
    input.validate()?;

    let (area, perimeter) = input.figure.measure();
    let u = input.unit.label();

    let mut d = Derivation::new(input.figure.formula());
    if let PlaneFigure::TriangleSides { a, b, c } = input.figure {
        d.step(format!("s = ({} + {} + {}) / 2 = {}", fmt_num(a), fmt_num(b), fmt_num(c), fmt_num((a + b + c) / 2.0)));
    }
    d.step(format!("A = {} {u}²", fmt_num(area)));
    match perimeter {
        Some(p) => d.step(format!("P = {} {u}", fmt_num(p))),
        None => d.step("Perimeter is not determined by the given dimensions"),
    }

    let (formula, steps) = d.into_parts();
    Ok(AreaResult {
        figure: input.figure.name().to_string(),
        area,
        perimeter,
        unit: u.to_string(),
        formula,
        steps,
    })
}
