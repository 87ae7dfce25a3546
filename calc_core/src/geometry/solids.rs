//! # Surface Area and Volume
//!
//! Closed-form surface area and volume for the common solids. Each shape is
//! a variant carrying only the dimensions it needs; dispatch is a single
//! exhaustive match.
//!
//! Naming a material from the density table adds a mass estimate.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::geometry::solids::{calculate, Solid, SolidInput};
//! use calc_core::units::LengthUnit;
//!
//! let input = SolidInput {
//!     solid: Solid::Cube { side: 0.1 },
//!     unit: LengthUnit::Meters,
//!     material: Some("water".to_string()),
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.mass_kg.unwrap() - 1.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::densities::find_material;
use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::units::LengthUnit;
use crate::validation::Validator;

/// Supported solids.
///
/// ## JSON Example
///
/// ```json
/// { "shape": "cylinder", "radius": 0.5, "height": 2.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Solid {
    Cube { side: f64 },
    RectangularPrism { length: f64, width: f64, height: f64 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, height: f64 },
    Cone { radius: f64, height: f64 },
    /// Right pyramid with a rectangular base
    Pyramid { base_length: f64, base_width: f64, height: f64 },
    /// Hollow cylinder; `inner_radius` must be below `outer_radius`
    Tube { outer_radius: f64, inner_radius: f64, length: f64 },
}

/// Raw measurements of a solid, in input units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidMeasures {
    pub surface_area: f64,
    /// Curved / side area where the shape has a distinct one
    pub lateral_area: Option<f64>,
    pub volume: f64,
}

impl Solid {
    pub fn name(&self) -> &'static str {
        match self {
            Solid::Cube { .. } => "Cube",
            Solid::RectangularPrism { .. } => "Rectangular Prism",
            Solid::Sphere { .. } => "Sphere",
            Solid::Cylinder { .. } => "Cylinder",
            Solid::Cone { .. } => "Cone",
            Solid::Pyramid { .. } => "Pyramid",
            Solid::Tube { .. } => "Tube",
        }
    }

    pub fn formula(&self) -> Formula {
        match self {
            Solid::Cube { .. } => Formula::CubeMeasures,
            Solid::RectangularPrism { .. } => Formula::RectangularPrismMeasures,
            Solid::Sphere { .. } => Formula::SphereMeasures,
            Solid::Cylinder { .. } => Formula::CylinderMeasures,
            Solid::Cone { .. } => Formula::ConeMeasures,
            Solid::Pyramid { .. } => Formula::PyramidMeasures,
            Solid::Tube { .. } => Formula::TubeMeasures,
        }
    }

    fn validate_into(&self, v: &mut Validator) {
        match *self {
            Solid::Cube { side } => {
                v.positive("side", side);
            }
            Solid::RectangularPrism { length, width, height } => {
                v.positive("length", length);
                v.positive("width", width);
                v.positive("height", height);
            }
            Solid::Sphere { radius } => {
                v.positive("radius", radius);
            }
            Solid::Cylinder { radius, height } | Solid::Cone { radius, height } => {
                v.positive("radius", radius);
                v.positive("height", height);
            }
            Solid::Pyramid { base_length, base_width, height } => {
                v.positive("base_length", base_length);
                v.positive("base_width", base_width);
                v.positive("height", height);
            }
            Solid::Tube { outer_radius, inner_radius, length } => {
                let outer_ok = v.positive("outer_radius", outer_radius);
                let inner_ok = v.positive("inner_radius", inner_radius);
                v.positive("length", length);
                if outer_ok && inner_ok {
                    v.check(
                        inner_radius < outer_radius,
                        "inner_radius",
                        inner_radius,
                        "Inner radius must be smaller than outer radius",
                    );
                }
            }
        }
    }

    /// Evaluate the shape's formulas. Dimensions are assumed valid.
    pub fn measure(&self) -> SolidMeasures {
        match *self {
            Solid::Cube { side } => SolidMeasures {
                surface_area: 6.0 * side * side,
                lateral_area: Some(4.0 * side * side),
                volume: side.powi(3),
            },
            Solid::RectangularPrism { length, width, height } => SolidMeasures {
                surface_area: 2.0 * (length * width + length * height + width * height),
                lateral_area: Some(2.0 * height * (length + width)),
                volume: length * width * height,
            },
            Solid::Sphere { radius } => SolidMeasures {
                surface_area: 4.0 * PI * radius * radius,
                lateral_area: None,
                volume: 4.0 / 3.0 * PI * radius.powi(3),
            },
            Solid::Cylinder { radius, height } => SolidMeasures {
                surface_area: 2.0 * PI * radius * (radius + height),
                lateral_area: Some(2.0 * PI * radius * height),
                volume: PI * radius * radius * height,
            },
            Solid::Cone { radius, height } => {
                let slant = radius.hypot(height);
                SolidMeasures {
                    surface_area: PI * radius * (radius + slant),
                    lateral_area: Some(PI * radius * slant),
                    volume: PI * radius * radius * height / 3.0,
                }
            }
            Solid::Pyramid { base_length, base_width, height } => {
                let slant_on_length = height.hypot(base_width / 2.0);
                let slant_on_width = height.hypot(base_length / 2.0);
                let lateral = base_length * slant_on_length + base_width * slant_on_width;
                SolidMeasures {
                    surface_area: base_length * base_width + lateral,
                    lateral_area: Some(lateral),
                    volume: base_length * base_width * height / 3.0,
                }
            }
            Solid::Tube { outer_radius, inner_radius, length } => {
                let annulus = PI * (outer_radius.powi(2) - inner_radius.powi(2));
                let lateral = 2.0 * PI * length * (outer_radius + inner_radius);
                SolidMeasures {
                    surface_area: lateral + 2.0 * annulus,
                    lateral_area: Some(lateral),
                    volume: annulus * length,
                }
            }
        }
    }

    fn explain(&self, m: &SolidMeasures, u: &str, d: &mut Derivation) {
        match *self {
            Solid::Cube { side } => {
                d.step(format!("SA = 6 × {}² = {} {u}²", fmt_num(side), fmt_num(m.surface_area)));
                d.step(format!("V = {}³ = {} {u}³", fmt_num(side), fmt_num(m.volume)));
            }
            Solid::RectangularPrism { length, width, height } => {
                d.step(format!(
                    "SA = 2({l}×{w} + {l}×{h} + {w}×{h}) = {} {u}²",
                    fmt_num(m.surface_area),
                    l = fmt_num(length),
                    w = fmt_num(width),
                    h = fmt_num(height)
                ));
                d.step(format!(
                    "V = {} × {} × {} = {} {u}³",
                    fmt_num(length),
                    fmt_num(width),
                    fmt_num(height),
                    fmt_num(m.volume)
                ));
            }
            Solid::Sphere { radius } => {
                d.step(format!("SA = 4π × {}² = {} {u}²", fmt_num(radius), fmt_num(m.surface_area)));
                d.step(format!("V = (4/3)π × {}³ = {} {u}³", fmt_num(radius), fmt_num(m.volume)));
            }
            Solid::Cylinder { radius, height } => {
                d.step(format!(
                    "SA = 2π × {r} × ({r} + {h}) = {} {u}²",
                    fmt_num(m.surface_area),
                    r = fmt_num(radius),
                    h = fmt_num(height)
                ));
                d.step(format!(
                    "V = π × {}² × {} = {} {u}³",
                    fmt_num(radius),
                    fmt_num(height),
                    fmt_num(m.volume)
                ));
            }
            Solid::Cone { radius, height } => {
                let slant = radius.hypot(height);
                d.step(format!(
                    "s = √({}² + {}²) = {} {u}",
                    fmt_num(radius),
                    fmt_num(height),
                    fmt_num(slant)
                ));
                d.step(format!(
                    "SA = π × {r} × ({r} + {s}) = {} {u}²",
                    fmt_num(m.surface_area),
                    r = fmt_num(radius),
                    s = fmt_num(slant)
                ));
                d.step(format!(
                    "V = π × {}² × {} / 3 = {} {u}³",
                    fmt_num(radius),
                    fmt_num(height),
                    fmt_num(m.volume)
                ));
            }
            Solid::Pyramid { base_length, base_width, height } => {
                d.step(format!("Base area = {} {u}²", fmt_num(base_length * base_width)));
                d.step(format!("Lateral area = {} {u}²", fmt_num(m.lateral_area.unwrap_or_default())));
                d.step(format!("SA = {} {u}²", fmt_num(m.surface_area)));
                d.step(format!(
                    "V = {} × {} × {} / 3 = {} {u}³",
                    fmt_num(base_length),
                    fmt_num(base_width),
                    fmt_num(height),
                    fmt_num(m.volume)
                ));
            }
            Solid::Tube { outer_radius, inner_radius, length } => {
                d.step(format!(
                    "Annulus = π({}² − {}²) = {} {u}²",
                    fmt_num(outer_radius),
                    fmt_num(inner_radius),
                    fmt_num(m.volume / length)
                ));
                d.step(format!("SA = {} {u}²", fmt_num(m.surface_area)));
                d.step(format!("V = annulus × {} = {} {u}³", fmt_num(length), fmt_num(m.volume)));
            }
        }
    }
}

/// Input parameters for a surface area / volume calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolidInput {
    pub solid: Solid,

    /// Unit the dimensions are given in
    #[serde(default)]
    pub unit: LengthUnit,

    /// Optional material name from the density table
    #[serde(default)]
    pub material: Option<String>,
}

impl SolidInput {
    /// Validate dimensions.
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        self.solid.validate_into(&mut v);
        v.finish()
    }
}

/// Results from a surface area / volume calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolidResult {
    pub shape: String,
    pub surface_area: f64,
    pub lateral_area: Option<f64>,
    pub volume: f64,
    /// Length unit label; areas are unit², volumes unit³
    pub unit: String,
    pub material: Option<String>,
    pub density_kg_m3: Option<f64>,
    pub mass_kg: Option<f64>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate surface area, volume and (optionally) mass of a solid.
///
/// # Returns
///
/// * `Ok(SolidResult)` - Calculation results
/// * `Err(CalcError::InvalidInput | Validation)` - Non-positive dimension or bad tube radii
/// * `Err(CalcError::NotFound)` - Unknown material
pub fn calculate(input: &SolidInput) -> CalcResult<SolidResult> {
    input.validate()?;
    let material = input.material.as_deref().map(find_material).transpose()?;

    let measures = input.solid.measure();
    let unit = input.unit.label();

    let mut d = Derivation::new(input.solid.formula());
    input.solid.explain(&measures, unit, &mut d);

    let mass_kg = material.map(|m| {
        d.apply(Formula::MassFromDensity);
        let volume_m3 = measures.volume * input.unit.to_meters().powi(3);
        let mass = m.density_kg_m3 * volume_m3;
        d.step(format!(
            "m = {} kg/m³ × {} m³ = {} kg",
            fmt_num(m.density_kg_m3),
            fmt_num(volume_m3),
            fmt_num(mass)
        ));
        mass
    });

    let (formula, steps) = d.into_parts();
    Ok(SolidResult {
        shape: input.solid.name().to_string(),
        surface_area: measures.surface_area,
        lateral_area: measures.lateral_area,
        volume: measures.volume,
        unit: unit.to_string(),
        material: material.map(|m| m.name.to_string()),
        density_kg_m3: material.map(|m| m.density_kg_m3),
        mass_kg,
        formula,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn input(solid: Solid) -> SolidInput {
        SolidInput { solid, unit: LengthUnit::Meters, material: None }
    }

    #[test]
    fn test_sphere_surface_area() {
        let result = calculate(&input(Solid::Sphere { radius: 2.0 })).unwrap();
        assert!(approx(result.surface_area, 16.0 * PI, 1e-12));
        assert!(approx(result.volume, 32.0 / 3.0 * PI, 1e-12));
    }

    #[test]
    fn test_sphere_area_is_monotonic() {
        let mut previous = 0.0;
        for i in 1..50 {
            let area = Solid::Sphere { radius: i as f64 * 0.37 }.measure().surface_area;
            assert!(area > previous);
            previous = area;
        }
    }

    #[test]
    fn test_cube_and_prism_agree() {
        let cube = Solid::Cube { side: 3.0 }.measure();
        let prism = Solid::RectangularPrism { length: 3.0, width: 3.0, height: 3.0 }.measure();
        assert_eq!(cube.surface_area, prism.surface_area);
        assert_eq!(cube.volume, prism.volume);
    }

    #[test]
    fn test_cylinder() {
        let m = Solid::Cylinder { radius: 1.0, height: 2.0 }.measure();
        assert!(approx(m.surface_area, 6.0 * PI, 1e-12));
        assert!(approx(m.volume, 2.0 * PI, 1e-12));
    }

    #[test]
    fn test_cone_3_4_5() {
        let m = Solid::Cone { radius: 3.0, height: 4.0 }.measure();
        // slant = 5
        assert!(approx(m.lateral_area.unwrap(), 15.0 * PI, 1e-12));
        assert!(approx(m.surface_area, 24.0 * PI, 1e-12));
        assert!(approx(m.volume, 12.0 * PI, 1e-12));
    }

    #[test]
    fn test_square_pyramid() {
        // base 6x6, height 4 -> slant 5
        let m = Solid::Pyramid { base_length: 6.0, base_width: 6.0, height: 4.0 }.measure();
        assert!(approx(m.surface_area, 36.0 + 4.0 * 0.5 * 6.0 * 5.0, 1e-12));
        assert!(approx(m.volume, 48.0, 1e-12));
    }

    #[test]
    fn test_tube() {
        let m = Solid::Tube { outer_radius: 2.0, inner_radius: 1.0, length: 10.0 }.measure();
        assert!(approx(m.volume, 30.0 * PI, 1e-9));
        assert!(approx(m.surface_area, 60.0 * PI + 6.0 * PI, 1e-9));
    }

    #[test]
    fn test_tube_inner_must_be_smaller() {
        let err = calculate(&input(Solid::Tube { outer_radius: 1.0, inner_radius: 1.0, length: 3.0 })).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "inner_radius");
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let err = calculate(&input(Solid::RectangularPrism { length: -1.0, width: 0.0, height: 2.0 })).unwrap_err();
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_mass_uses_unit_conversion() {
        let input = SolidInput {
            solid: Solid::Cube { side: 10.0 },
            unit: LengthUnit::Centimeters,
            material: Some("Steel".to_string()),
        };
        let result = calculate(&input).unwrap();
        // 1000 cm³ = 0.001 m³
        assert!(approx(result.mass_kg.unwrap(), 7.85, 1e-9));
        assert_eq!(result.material.as_deref(), Some("Steel"));
    }

    #[test]
    fn test_unknown_material() {
        let input = SolidInput {
            solid: Solid::Sphere { radius: 1.0 },
            unit: LengthUnit::Meters,
            material: Some("mithril".to_string()),
        };
        assert_eq!(calculate(&input).unwrap_err().error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_json_input() {
        let json = r#"{ "solid": { "shape": "cone", "radius": 3, "height": 4 }, "unit": "centimeters" }"#;
        let input: SolidInput = serde_json::from_str(json).unwrap();
        let result = calculate(&input).unwrap();
        assert_eq!(result.shape, "Cone");
        assert_eq!(result.unit, "cm");
        assert!(result.formula.contains("sqrt"));
    }
}
