//! # File I/O Module
//!
//! JSON persistence for the two pieces of state that outlive a run: the
//! trip log and the settings file.
//!
//! - **Atomic saves**: write to `<path>.tmp`, sync, rename over the target
//! - **Missing files are empty**: a trip log or settings file that does not
//!   exist yet loads as an empty log or the default settings
//!
//! There is a single writer, so no locking is done.
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::file_io::{load_trip_log, save_trip_log};
//! use calc_core::mileage::{MileageInput, TripRecord};
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! let path = Path::new("trips.json");
//! let mut log = load_trip_log(path)?;
//! let trip = MileageInput { distance: 42.0, fuel_used: 3.1, unit_system: Default::default(), fuel_price: None };
//! let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//! log.add(TripRecord::new(date, "Commute", &trip)?);
//! save_trip_log(&log, path)?;
//! # Ok::<(), calc_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::mileage::TripLog;
use crate::settings::CalculatorSettings;

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// 1. Write to `<path>.tmp`
/// 2. Sync to disk (fsync)
/// 3. Rename over `path`
fn save_json<T: Serialize>(value: &T, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "saved");
    Ok(())
}

/// Read and parse `path`, or `None` if it does not exist.
fn load_json<T: DeserializeOwned>(path: &Path) -> CalcResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CalcError::file_error("read", path.display().to_string(), e.to_string()));
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })
}

/// `trips.json` -> `trips.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load the trip log. A missing file is an empty log.
///
/// Every record is re-validated; a file edited by hand into an invalid trip
/// is rejected rather than summarized.
pub fn load_trip_log(path: &Path) -> CalcResult<TripLog> {
    match load_json::<TripLog>(path)? {
        Some(log) => {
            log.validate()?;
            tracing::debug!(path = %path.display(), trips = log.len(), "loaded trip log");
            Ok(log)
        }
        None => {
            tracing::warn!(path = %path.display(), "trip log not found, starting empty");
            Ok(TripLog::new())
        }
    }
}

/// Rewrite the whole trip log.
pub fn save_trip_log(log: &TripLog, path: &Path) -> CalcResult<()> {
    save_json(log, path)
}

/// Load settings. A missing file gives the defaults.
pub fn load_settings(path: &Path) -> CalcResult<CalculatorSettings> {
    Ok(load_json(path)?.unwrap_or_default())
}

pub fn save_settings(settings: &CalculatorSettings, path: &Path) -> CalcResult<()> {
    save_json(settings, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mileage::{MileageInput, TripRecord};
    use crate::units::UnitSystem;
    use chrono::NaiveDate;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("formulary_test_{}_{}.json", name, std::process::id()))
    }

    fn sample_log() -> TripLog {
        let mut log = TripLog::new();
        let trip = MileageInput {
            distance: 120.0,
            fuel_used: 9.5,
            unit_system: UnitSystem::Metric,
            fuel_price: Some(1.75),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        log.add(TripRecord::new(date, "Coast", &trip).unwrap());
        log
    }

    #[test]
    fn test_tmp_path() {
        assert_eq!(tmp_path_for(Path::new("/data/trips.json")), Path::new("/data/trips.json.tmp"));
    }

    #[test]
    fn test_trip_log_roundtrip() {
        let path = temp_path("trip_roundtrip");
        let log = sample_log();

        save_trip_log(&log, &path).unwrap();
        let loaded = load_trip_log(&path).unwrap();
        assert_eq!(loaded, log);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_path("atomic");
        save_trip_log(&sample_log(), &path).unwrap();

        assert!(path.exists());
        assert!(!tmp_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_trip_log_is_empty() {
        let path = temp_path("does_not_exist");
        let _ = fs::remove_file(&path);
        assert!(load_trip_log(&path).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let path = temp_path("invalid");
        fs::write(&path, "{ not json").unwrap();

        let err = load_trip_log(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_hand_edited_invalid_trip_is_rejected() {
        let path = temp_path("invalid_trip");
        let mut value = serde_json::to_value(sample_log()).unwrap();
        value[0]["fuel_used"] = serde_json::json!(0.0);
        value[0]["distance"] = serde_json::json!(-5.0);
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

        let err = load_trip_log(&path).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        let fields: Vec<_> = err.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["trips[0].distance", "trips[0].fuel_used"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_settings_roundtrip_and_default() {
        let path = temp_path("settings");
        let _ = fs::remove_file(&path);
        assert_eq!(load_settings(&path).unwrap(), CalculatorSettings::default());

        let settings = CalculatorSettings {
            decimal_places: 4,
            unit_system: UnitSystem::Imperial,
            ..Default::default()
        };
        save_settings(&settings, &path).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);

        let _ = fs::remove_file(&path);
    }
}
