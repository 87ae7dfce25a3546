//! # Distance Calculation
//!
//! Distance between two points: Euclidean or Manhattan in the plane or in
//! space, and great-circle (haversine) distance between two latitude /
//! longitude pairs.
//!
//! Coincident points are not an error: the distance is 0, `degenerate` is
//! set, and the geographic bearing is reported as `None`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::geometry::distance::{calculate, DistanceInput, Metric, Point2};
//!
//! let input = DistanceInput::Planar {
//!     metric: Metric::Euclidean,
//!     a: Point2 { x: 0.0, y: 0.0 },
//!     b: Point2 { x: 3.0, y: 4.0 },
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.distance, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::units::DistanceUnit;
use crate::validation::Validator;

/// Point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Point in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Latitude / longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Cartesian distance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Euclidean,
    Manhattan,
}

/// Input for a distance calculation.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "geographic",
///   "a": { "latitude": 51.5007, "longitude": -0.1246 },
///   "b": { "latitude": 40.6892, "longitude": -74.0445 },
///   "unit": "miles" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceInput {
    Planar {
        #[serde(default)]
        metric: Metric,
        a: Point2,
        b: Point2,
    },
    Spatial {
        #[serde(default)]
        metric: Metric,
        a: Point3,
        b: Point3,
    },
    Geographic {
        a: GeoPoint,
        b: GeoPoint,
        #[serde(default)]
        unit: DistanceUnit,
    },
}

impl DistanceInput {
    /// Validate input parameters, reporting every bad coordinate.
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        match self {
            DistanceInput::Planar { a, b, .. } => {
                v.finite("a.x", a.x);
                v.finite("a.y", a.y);
                v.finite("b.x", b.x);
                v.finite("b.y", b.y);
            }
            DistanceInput::Spatial { a, b, .. } => {
                v.finite("a.x", a.x);
                v.finite("a.y", a.y);
                v.finite("a.z", a.z);
                v.finite("b.x", b.x);
                v.finite("b.y", b.y);
                v.finite("b.z", b.z);
            }
            DistanceInput::Geographic { a, b, .. } => {
                v.in_range("a.latitude", a.latitude, -90.0, 90.0);
                v.in_range("a.longitude", a.longitude, -180.0, 180.0);
                v.in_range("b.latitude", b.latitude, -90.0, 90.0);
                v.in_range("b.longitude", b.longitude, -180.0, 180.0);
            }
        }
        v.finish()
    }
}

/// Midpoint between the two inputs, in the input's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Midpoint {
    Spatial(Point3),
    Planar(Point2),
    Geographic(GeoPoint),
}

/// Results from a distance calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceResult {
    pub distance: f64,

    /// Unit label for geographic results; cartesian results share the input unit
    pub unit: Option<String>,

    /// Signed coordinate differences (b - a); degrees for geographic input
    pub deltas: Vec<f64>,

    pub midpoint: Midpoint,

    /// Initial great-circle bearing in degrees (geographic input only)
    pub bearing_deg: Option<f64>,

    /// The two points coincide
    pub degenerate: bool,

    pub formula: String,
    pub steps: Vec<String>,
}

/// Calculate the distance between two points.
///
/// # Returns
///
/// * `Ok(DistanceResult)` - Calculation results
/// * `Err(CalcError)` - If a coordinate is non-finite or out of range
pub fn calculate(input: &DistanceInput) -> CalcResult<DistanceResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &DistanceInput) -> DistanceResult {
    match *input {
        DistanceInput::Planar { metric, a, b } => {
            let midpoint = Midpoint::Planar(Point2 {
                x: (a.x + b.x) / 2.0,
                y: (a.y + b.y) / 2.0,
            });
            cartesian(metric, &[a.x, a.y], &[b.x, b.y], midpoint)
        }
        DistanceInput::Spatial { metric, a, b } => {
            let midpoint = Midpoint::Spatial(Point3 {
                x: (a.x + b.x) / 2.0,
                y: (a.y + b.y) / 2.0,
                z: (a.z + b.z) / 2.0,
            });
            cartesian(metric, &[a.x, a.y, a.z], &[b.x, b.y, b.z], midpoint)
        }
        DistanceInput::Geographic { a, b, unit } => geographic(a, b, unit),
    }
}

const AXES: [&str; 3] = ["x", "y", "z"];

fn cartesian(metric: Metric, a: &[f64], b: &[f64], midpoint: Midpoint) -> DistanceResult {
    let deltas: Vec<f64> = a.iter().zip(b).map(|(p, q)| q - p).collect();

    let mut d = match metric {
        Metric::Euclidean => Derivation::new(Formula::EuclideanDistance),
        Metric::Manhattan => Derivation::new(Formula::ManhattanDistance),
    };
    for (axis, delta) in AXES.iter().zip(&deltas) {
        d.step(format!("Δ{} = {}", axis, fmt_num(*delta)));
    }

    let distance = match metric {
        Metric::Euclidean => {
            let sum_sq: f64 = deltas.iter().map(|x| x * x).sum();
            let terms: Vec<String> = deltas.iter().map(|x| format!("{}²", fmt_num(*x))).collect();
            let distance = sum_sq.sqrt();
            d.step(format!(
                "d = √({}) = √{} = {}",
                terms.join(" + "),
                fmt_num(sum_sq),
                fmt_num(distance)
            ));
            distance
        }
        Metric::Manhattan => {
            let distance: f64 = deltas.iter().map(|x| x.abs()).sum();
            let terms: Vec<String> = deltas.iter().map(|x| format!("|{}|", fmt_num(*x))).collect();
            d.step(format!("d = {} = {}", terms.join(" + "), fmt_num(distance)));
            distance
        }
    };

    let degenerate = distance == 0.0;
    if degenerate {
        d.step("Points coincide; distance is 0");
    }

    let (formula, steps) = d.into_parts();
    DistanceResult {
        distance,
        unit: None,
        deltas,
        midpoint,
        bearing_deg: None,
        degenerate,
        formula,
        steps,
    }
}

fn geographic(a: GeoPoint, b: GeoPoint, unit: DistanceUnit) -> DistanceResult {
    let radius = unit.earth_radius();
    let distance = haversine(a, b, radius);
    let degenerate = distance.abs() < 1e-9;

    let mut d = Derivation::new(Formula::Haversine);
    d.step(format!(
        "φ1 = {}°, φ2 = {}°, Δφ = {}°, Δλ = {}°",
        fmt_num(a.latitude),
        fmt_num(b.latitude),
        fmt_num(b.latitude - a.latitude),
        fmt_num(b.longitude - a.longitude)
    ));
    let hav = haversine_term(a, b);
    d.step(format!("a = {}", fmt_num(hav)));
    d.step(format!(
        "d = 2 × {} {} × atan2(√a, √(1−a)) = {} {}",
        fmt_num(radius),
        unit.label(),
        fmt_num(distance),
        unit.label()
    ));

    let bearing_deg = if degenerate {
        d.step("Points coincide; bearing is undefined");
        None
    } else {
        d.apply(Formula::InitialBearing);
        let bearing = initial_bearing(a, b);
        d.step(format!("Initial bearing θ = {}°", fmt_num(bearing)));
        Some(bearing)
    };

    let (formula, steps) = d.into_parts();
    DistanceResult {
        distance,
        unit: Some(unit.label().to_string()),
        deltas: vec![b.latitude - a.latitude, b.longitude - a.longitude],
        midpoint: Midpoint::Geographic(geographic_midpoint(a, b)),
        bearing_deg,
        degenerate,
        formula,
        steps,
    }
}

fn haversine_term(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // rounding can push h a hair above 1 for antipodal points
    h.clamp(0.0, 1.0)
}

/// Great-circle distance on a sphere of the given radius.
pub fn haversine(a: GeoPoint, b: GeoPoint, radius: f64) -> f64 {
    let h = haversine_term(a, b);
    2.0 * radius * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b`, degrees clockwise from north in [0, 360).
pub fn initial_bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();
    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Point halfway along the great circle between `a` and `b`.
pub fn geographic_midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let lambda1 = a.longitude.to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let bx = phi2.cos() * dlambda.cos();
    let by = phi2.cos() * dlambda.sin();
    let phi_m = (phi1.sin() + phi2.sin()).atan2(((phi1.cos() + bx).powi(2) + by * by).sqrt());
    let lambda_m = lambda1 + by.atan2(phi1.cos() + bx);

    // normalise longitude to [-180, 180)
    let longitude = (lambda_m.to_degrees() + 540.0) % 360.0 - 180.0;
    GeoPoint {
        latitude: phi_m.to_degrees(),
        longitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_planar_euclidean() {
        let input = DistanceInput::Planar {
            metric: Metric::Euclidean,
            a: Point2 { x: 1.0, y: 2.0 },
            b: Point2 { x: 4.0, y: 6.0 },
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.distance, 5.0);
        assert_eq!(result.deltas, vec![3.0, 4.0]);
        assert_eq!(result.midpoint, Midpoint::Planar(Point2 { x: 2.5, y: 4.0 }));
        assert!(!result.degenerate);
        assert_eq!(result.steps.len(), 3);
    }

    #[test]
    fn test_spatial_manhattan() {
        let input = DistanceInput::Spatial {
            metric: Metric::Manhattan,
            a: Point3 { x: 0.0, y: 0.0, z: 0.0 },
            b: Point3 { x: -1.0, y: 2.0, z: -3.0 },
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.distance, 6.0);
    }

    #[test]
    fn test_spatial_euclidean() {
        let input = DistanceInput::Spatial {
            metric: Metric::Euclidean,
            a: Point3 { x: 1.0, y: 1.0, z: 1.0 },
            b: Point3 { x: 3.0, y: 3.0, z: 2.0 },
        };
        assert_eq!(calculate(&input).unwrap().distance, 3.0);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Point2 { x: 7.0, y: -2.0 };
        let input = DistanceInput::Planar { metric: Metric::Euclidean, a: p, b: p };
        let result = calculate(&input).unwrap();
        assert_eq!(result.distance, 0.0);
        assert!(result.degenerate);
    }

    #[test]
    fn test_haversine_london_paris() {
        let london = GeoPoint { latitude: 51.5074, longitude: -0.1278 };
        let paris = GeoPoint { latitude: 48.8566, longitude: 2.3522 };
        let input = DistanceInput::Geographic { a: london, b: paris, unit: DistanceUnit::Kilometers };
        let result = calculate(&input).unwrap();
        assert!(approx(result.distance, 343.5, 1.0), "got {}", result.distance);
        assert_eq!(result.unit.as_deref(), Some("km"));
        let bearing = result.bearing_deg.unwrap();
        assert!(approx(bearing, 148.1, 0.5), "got {}", bearing);
    }

    #[test]
    fn test_haversine_unit_selection() {
        let a = GeoPoint { latitude: 0.0, longitude: 0.0 };
        let b = GeoPoint { latitude: 0.0, longitude: 1.0 };
        let km = haversine(a, b, DistanceUnit::Kilometers.earth_radius());
        let mi = haversine(a, b, DistanceUnit::Miles.earth_radius());
        // one degree of arc on the equator
        assert!(approx(km, 111.195, 0.01));
        assert!(approx(mi, 69.093, 0.01));
    }

    #[test]
    fn test_geographic_coincident_has_no_bearing() {
        let p = GeoPoint { latitude: 10.0, longitude: 20.0 };
        let result = calculate(&DistanceInput::Geographic { a: p, b: p, unit: DistanceUnit::Miles }).unwrap();
        assert_eq!(result.distance, 0.0);
        assert!(result.degenerate);
        assert!(result.bearing_deg.is_none());
    }

    #[test]
    fn test_geographic_midpoint_on_equator() {
        let a = GeoPoint { latitude: 0.0, longitude: 0.0 };
        let b = GeoPoint { latitude: 0.0, longitude: 90.0 };
        let m = geographic_midpoint(a, b);
        assert!(approx(m.latitude, 0.0, 1e-9));
        assert!(approx(m.longitude, 45.0, 1e-9));
    }

    #[test]
    fn test_bearing_due_east_and_north() {
        let origin = GeoPoint { latitude: 0.0, longitude: 0.0 };
        assert!(approx(initial_bearing(origin, GeoPoint { latitude: 0.0, longitude: 10.0 }), 90.0, 1e-9));
        assert!(approx(initial_bearing(origin, GeoPoint { latitude: 10.0, longitude: 0.0 }), 0.0, 1e-9));
    }

    #[test]
    fn test_latitude_out_of_range() {
        let input = DistanceInput::Geographic {
            a: GeoPoint { latitude: 91.0, longitude: 0.0 },
            b: GeoPoint { latitude: 0.0, longitude: 181.0 },
            unit: DistanceUnit::Kilometers,
        };
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_non_finite_coordinate() {
        let input = DistanceInput::Planar {
            metric: Metric::Euclidean,
            a: Point2 { x: f64::NAN, y: 0.0 },
            b: Point2 { x: 0.0, y: 0.0 },
        };
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_json_input() {
        let json = r#"{ "kind": "planar", "a": { "x": 0, "y": 0 }, "b": { "x": 6, "y": 8 } }"#;
        let input: DistanceInput = serde_json::from_str(json).unwrap();
        assert_eq!(calculate(&input).unwrap().distance, 10.0);
    }
}
