//! # Settings
//!
//! User preferences shared by the front ends: display precision, the default
//! unit system, where the trip log lives and log levels.
//!
//! Settings are stored as JSON. Every field has a default, so a partial file
//! (or no file at all) is valid.
//!
//! ```json
//! {
//!   "decimal_places": 2,
//!   "unit_system": "imperial",
//!   "logging": { "default": "info", "modules": { "calc_core::finance": "debug" } }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::units::UnitSystem;

/// Default trip log file name, relative to the working directory
pub const DEFAULT_TRIP_LOG: &str = "trips.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Decimal places used when printing numbers
    pub decimal_places: u8,
    pub unit_system: UnitSystem,
    pub trip_log_path: PathBuf,
    pub logging: LoggingConfig,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            decimal_places: 2,
            unit_system: UnitSystem::default(),
            trip_log_path: PathBuf::from(DEFAULT_TRIP_LOG),
            logging: LoggingConfig::default(),
        }
    }
}

/// Log levels: a default plus per-target overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for everything not listed in `modules`
    pub default: String,
    /// Target path to level, e.g. `"calc_core::calculations" = "debug"`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            default: "warn".to_string(),
            modules: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string: `default,target=level,...`
    pub fn directives(&self) -> String {
        let mut filter = self.default.clone();
        for (module, level) in &self.modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}
