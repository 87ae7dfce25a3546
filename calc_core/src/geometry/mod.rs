//! # Geometry
//!
//! Closed-form geometry calculators:
//!
//! - [`distance`] - Euclidean, Manhattan and great-circle distance
//! - [`solids`] - Surface area, volume and mass of common solids
//! - [`area`] - Area and perimeter of plane figures
//! - [`slope`] - Slope, angle and grade between two points
//! - [`densities`] - Material density lookup table

pub mod area;
pub mod densities;
pub mod distance;
pub mod slope;
pub mod solids;

pub use area::{AreaInput, AreaResult, PlaneFigure};
pub use densities::{find_material, MaterialCategory, MaterialDensity, MATERIAL_DENSITIES};
pub use distance::{DistanceInput, DistanceResult, GeoPoint, Metric, Point2, Point3};
pub use slope::{GradeCategory, SlopeInput, SlopeKind, SlopeResult};
pub use solids::{Solid, SolidInput, SolidResult};
