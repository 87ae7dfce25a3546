//! Material density table for mass estimates.
//!
//! Nominal densities at room temperature. Lookup is case-insensitive and
//! ignores spaces, hyphens and underscores.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::errors::{CalcError, CalcResult};

/// Broad grouping shown next to the material name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    Metal,
    Construction,
    Wood,
    Polymer,
    Liquid,
    Other,
}

/// One row of the density table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialDensity {
    pub name: &'static str,
    /// kg/m³
    pub density_kg_m3: f64,
    pub category: MaterialCategory,
}

const fn row(name: &'static str, density_kg_m3: f64, category: MaterialCategory) -> MaterialDensity {
    MaterialDensity { name, density_kg_m3, category }
}

/// All materials, in display order
pub static MATERIAL_DENSITIES: &[MaterialDensity] = &[
    row("Steel", 7850.0, MaterialCategory::Metal),
    row("Stainless Steel", 8000.0, MaterialCategory::Metal),
    row("Cast Iron", 7200.0, MaterialCategory::Metal),
    row("Aluminum", 2700.0, MaterialCategory::Metal),
    row("Copper", 8960.0, MaterialCategory::Metal),
    row("Brass", 8500.0, MaterialCategory::Metal),
    row("Bronze", 8800.0, MaterialCategory::Metal),
    row("Lead", 11340.0, MaterialCategory::Metal),
    row("Titanium", 4506.0, MaterialCategory::Metal),
    row("Gold", 19320.0, MaterialCategory::Metal),
    row("Silver", 10490.0, MaterialCategory::Metal),
    row("Concrete", 2400.0, MaterialCategory::Construction),
    row("Brick", 1920.0, MaterialCategory::Construction),
    row("Glass", 2500.0, MaterialCategory::Construction),
    row("Granite", 2700.0, MaterialCategory::Construction),
    row("Marble", 2600.0, MaterialCategory::Construction),
    row("Sand", 1600.0, MaterialCategory::Construction),
    row("Oak", 750.0, MaterialCategory::Wood),
    row("Pine", 500.0, MaterialCategory::Wood),
    row("Maple", 705.0, MaterialCategory::Wood),
    row("Balsa", 160.0, MaterialCategory::Wood),
    row("ABS", 1050.0, MaterialCategory::Polymer),
    row("PVC", 1380.0, MaterialCategory::Polymer),
    row("Polyethylene", 950.0, MaterialCategory::Polymer),
    row("Rubber", 1100.0, MaterialCategory::Polymer),
    row("Water", 1000.0, MaterialCategory::Liquid),
    row("Seawater", 1025.0, MaterialCategory::Liquid),
    row("Gasoline", 740.0, MaterialCategory::Liquid),
    row("Ice", 917.0, MaterialCategory::Other),
];

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

static INDEX: Lazy<HashMap<String, &'static MaterialDensity>> = Lazy::new(|| {
    MATERIAL_DENSITIES
        .iter()
        .map(|m| (normalize(m.name), m))
        .collect()
});

/// Look up a material by name.
pub fn find_material(name: &str) -> CalcResult<&'static MaterialDensity> {
    INDEX
        .get(&normalize(name))
        .copied()
        .ok_or_else(|| CalcError::not_found("material densities", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_forgiving() {
        assert_eq!(find_material("steel").unwrap().density_kg_m3, 7850.0);
        assert_eq!(find_material("Stainless-Steel").unwrap().name, "Stainless Steel");
        assert_eq!(find_material("cast_iron").unwrap().category, MaterialCategory::Metal);
    }

    #[test]
    fn test_unknown_material() {
        let err = find_material("unobtainium").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(INDEX.len(), MATERIAL_DENSITIES.len());
    }
}
