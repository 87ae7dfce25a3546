//! Half-lives of common radioactive isotopes.
//!
//! Lookup accepts the name or the symbol, ignoring case, spaces and hyphens:
//! `"Carbon-14"`, `"carbon 14"`, `"C-14"` and `"c14"` all resolve.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::units::TimeUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IsotopeCategory {
    Medical,
    Dating,
    Nuclear,
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Isotope {
    pub name: &'static str,
    pub symbol: &'static str,
    pub half_life: f64,
    pub unit: TimeUnit,
    pub category: IsotopeCategory,
}

const fn iso(
    name: &'static str,
    symbol: &'static str,
    half_life: f64,
    unit: TimeUnit,
    category: IsotopeCategory,
) -> Isotope {
    Isotope { name, symbol, half_life, unit, category }
}

pub static ISOTOPES: &[Isotope] = &[
    iso("Carbon-14", "C-14", 5730.0, TimeUnit::Years, IsotopeCategory::Dating),
    iso("Potassium-40", "K-40", 1.25e9, TimeUnit::Years, IsotopeCategory::Dating),
    iso("Uranium-238", "U-238", 4.468e9, TimeUnit::Years, IsotopeCategory::Natural),
    iso("Thorium-232", "Th-232", 1.405e10, TimeUnit::Years, IsotopeCategory::Natural),
    iso("Radium-226", "Ra-226", 1600.0, TimeUnit::Years, IsotopeCategory::Natural),
    iso("Radon-222", "Rn-222", 3.8235, TimeUnit::Days, IsotopeCategory::Natural),
    iso("Polonium-210", "Po-210", 138.376, TimeUnit::Days, IsotopeCategory::Natural),
    iso("Uranium-235", "U-235", 7.04e8, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Plutonium-239", "Pu-239", 24_110.0, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Americium-241", "Am-241", 432.2, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Cesium-137", "Cs-137", 30.17, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Strontium-90", "Sr-90", 28.79, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Tritium", "H-3", 12.32, TimeUnit::Years, IsotopeCategory::Nuclear),
    iso("Iodine-131", "I-131", 8.02, TimeUnit::Days, IsotopeCategory::Medical),
    iso("Technetium-99m", "Tc-99m", 6.01, TimeUnit::Hours, IsotopeCategory::Medical),
    iso("Cobalt-60", "Co-60", 5.27, TimeUnit::Years, IsotopeCategory::Medical),
    iso("Fluorine-18", "F-18", 109.77, TimeUnit::Minutes, IsotopeCategory::Medical),
    iso("Phosphorus-32", "P-32", 14.27, TimeUnit::Days, IsotopeCategory::Medical),
];

fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

static INDEX: Lazy<HashMap<String, &'static Isotope>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(ISOTOPES.len() * 2);
    for isotope in ISOTOPES {
        index.insert(normalize(isotope.name), isotope);
        index.insert(normalize(isotope.symbol), isotope);
    }
    index
});

/// Look up an isotope by name or symbol.
pub fn find_isotope(key: &str) -> CalcResult<&'static Isotope> {
    INDEX
        .get(&normalize(key))
        .copied()
        .ok_or_else(|| CalcError::not_found("isotopes", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_and_symbol() {
        assert_eq!(find_isotope("Carbon-14").unwrap().half_life, 5730.0);
        assert_eq!(find_isotope("c14").unwrap().name, "Carbon-14");
        assert_eq!(find_isotope("TC-99M").unwrap().unit, TimeUnit::Hours);
        assert_eq!(find_isotope("tritium").unwrap().symbol, "H-3");
    }

    #[test]
    fn test_unknown_isotope() {
        assert_eq!(find_isotope("Kryptonite").unwrap_err().error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_keys_do_not_collide() {
        assert_eq!(INDEX.len(), ISOTOPES.len() * 2);
    }
}
