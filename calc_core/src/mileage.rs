//! # Mileage
//!
//! Fuel economy and trip cost for a single trip, plus the trip log that keeps
//! a history of trips between runs.
//!
//! Inputs are in the selected `UnitSystem`: kilometers and liters for metric,
//! miles and US gallons for imperial. Fuel price is per liter or per gallon
//! accordingly. Every result reports both km/L and mpg, and L/100 km.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::mileage::{calculate, MileageInput};
//! use calc_core::units::UnitSystem;
//!
//! let input = MileageInput {
//!     distance: 300.0,
//!     fuel_used: 10.0,
//!     unit_system: UnitSystem::Imperial,
//!     fuel_price: Some(3.5),
//! };
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.economy, 30.0);
//! assert_eq!(result.trip_cost, Some(35.0));
//! ```
//!
//! The log serializes as a flat JSON array of [`TripRecord`]s; see
//! [`crate::file_io`] for loading and saving it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::formulas::{fmt_num, Derivation, Formula};
use crate::units::{Gallons, Kilometers, Liters, Miles, UnitSystem};
use crate::validation::Validator;

/// Distance in kilometers
fn distance_km(distance: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => distance,
        UnitSystem::Imperial => Kilometers::from(Miles(distance)).value(),
    }
}

/// Fuel volume in liters
fn fuel_liters(fuel: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => fuel,
        UnitSystem::Imperial => Liters::from(Gallons(fuel)).value(),
    }
}

fn from_km(km: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => km,
        UnitSystem::Imperial => Miles::from(Kilometers(km)).value(),
    }
}

fn from_liters(liters: f64, system: UnitSystem) -> f64 {
    match system {
        UnitSystem::Metric => liters,
        UnitSystem::Imperial => Gallons::from(Liters(liters)).value(),
    }
}

fn economy_label(system: UnitSystem) -> &'static str {
    match system {
        UnitSystem::Metric => "km/L",
        UnitSystem::Imperial => "mpg",
    }
}

// ============================================================================
// Single trip
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MileageInput {
    /// Distance driven (km or mi)
    pub distance: f64,
    /// Fuel consumed (L or gal)
    pub fuel_used: f64,
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Price per liter or per gallon
    #[serde(default)]
    pub fuel_price: Option<f64>,
}

impl MileageInput {
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        v.positive("distance", self.distance);
        v.positive("fuel_used", self.fuel_used);
        if let Some(price) = self.fuel_price {
            v.non_negative("fuel_price", price);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileageResult {
    /// Economy in the input's units (km/L or mpg)
    pub economy: f64,
    pub economy_unit: String,
    pub km_per_liter: f64,
    pub miles_per_gallon: f64,
    pub liters_per_100km: f64,
    pub trip_cost: Option<f64>,
    /// Cost per km or per mile
    pub cost_per_distance: Option<f64>,
    pub formula: String,
    pub steps: Vec<String>,
}

/// Fuel economy and cost of one trip.
pub fn calculate(input: &MileageInput) -> CalcResult<MileageResult> {
    input.validate()?;
    Ok(compute(input))
}

fn compute(input: &MileageInput) -> MileageResult {
    let system = input.unit_system;
    let mut d = Derivation::new(Formula::FuelEconomy);

    let km = distance_km(input.distance, system);
    let liters = fuel_liters(input.fuel_used, system);
    let km_per_liter = km / liters;
    let miles_per_gallon = Miles::from(Kilometers(km)).value() / Gallons::from(Liters(liters)).value();
    let liters_per_100km = 100.0 * liters / km;
    let economy = input.distance / input.fuel_used;

    d.step(format!(
        "Economy = {} {} / {} {} = {} {}",
        fmt_num(input.distance),
        system.distance_label(),
        fmt_num(input.fuel_used),
        system.fuel_label(),
        fmt_num(economy),
        economy_label(system)
    ));
    d.step(format!(
        "L/100km = 100 × {} L / {} km = {}",
        fmt_num(liters),
        fmt_num(km),
        fmt_num(liters_per_100km)
    ));

    let (trip_cost, cost_per_distance) = match input.fuel_price {
        Some(price) => {
            d.apply(Formula::FuelCost);
            let cost = input.fuel_used * price;
            let per_distance = cost / input.distance;
            d.step(format!(
                "Cost = {} {} × {} = {}",
                fmt_num(input.fuel_used),
                system.fuel_label(),
                fmt_num(price),
                fmt_num(cost)
            ));
            d.step(format!(
                "Cost per {} = {} / {} = {}",
                system.distance_label(),
                fmt_num(cost),
                fmt_num(input.distance),
                fmt_num(per_distance)
            ));
            (Some(cost), Some(per_distance))
        }
        None => (None, None),
    };

    let (formula, steps) = d.into_parts();
    MileageResult {
        economy,
        economy_unit: economy_label(system).to_string(),
        km_per_liter,
        miles_per_gallon,
        liters_per_100km,
        trip_cost,
        cost_per_distance,
        formula,
        steps,
    }
}

// ============================================================================
// Trip log
// ============================================================================

/// One logged trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub label: String,
    pub distance: f64,
    pub fuel_used: f64,
    #[serde(default)]
    pub fuel_price: Option<f64>,
    #[serde(default)]
    pub unit_system: UnitSystem,
}

impl TripRecord {
    /// Build a record from a validated trip with a fresh id.
    pub fn new(date: NaiveDate, label: impl Into<String>, trip: &MileageInput) -> CalcResult<Self> {
        trip.validate()?;
        Ok(TripRecord {
            id: Uuid::new_v4(),
            date,
            label: label.into(),
            distance: trip.distance,
            fuel_used: trip.fuel_used,
            fuel_price: trip.fuel_price,
            unit_system: trip.unit_system,
        })
    }

    pub fn mileage_input(&self) -> MileageInput {
        MileageInput {
            distance: self.distance,
            fuel_used: self.fuel_used,
            unit_system: self.unit_system,
            fuel_price: self.fuel_price,
        }
    }

    pub fn cost(&self) -> Option<f64> {
        self.fuel_price.map(|price| price * self.fuel_used)
    }
}

/// Aggregate over a trip log, expressed in one unit system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub unit_system: UnitSystem,
    pub trips: usize,
    pub total_distance: f64,
    pub total_fuel: f64,
    /// Sum over trips that recorded a price
    pub total_cost: f64,
    pub priced_trips: usize,
    /// Total distance over total fuel; `None` for an empty log
    pub average_economy: Option<f64>,
    pub average_liters_per_100km: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Trip history, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripLog {
    trips: Vec<TripRecord>,
}

impl TripLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Returns its id.
    pub fn add(&mut self, record: TripRecord) -> Uuid {
        let id = record.id;
        self.trips.push(record);
        id
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: &Uuid) -> Option<TripRecord> {
        let index = self.trips.iter().position(|t| &t.id == id)?;
        Some(self.trips.remove(index))
    }

    pub fn get(&self, id: &Uuid) -> Option<&TripRecord> {
        self.trips.iter().find(|t| &t.id == id)
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn clear(&mut self) {
        self.trips.clear();
    }

    /// Check every record against the rules `TripRecord::new` enforces.
    ///
    /// Fields are reported as `trips[i].field` so a hand-edited file can be
    /// fixed in place.
    pub fn validate(&self) -> CalcResult<()> {
        let mut v = Validator::new();
        for (i, trip) in self.trips.iter().enumerate() {
            if let Err(e) = trip.mileage_input().validate() {
                for fe in e.field_errors() {
                    v.reject(&format!("trips[{}].{}", i, fe.field), fe.value, fe.reason);
                }
            }
        }
        v.finish()
    }

    /// Totals and averages with every trip converted to `unit_system`.
    ///
    /// Prices are not converted: a trip's cost is its fuel times its own price.
    pub fn summary(&self, unit_system: UnitSystem) -> TripSummary {
        let total_km: f64 = self.trips.iter().map(|t| distance_km(t.distance, t.unit_system)).sum();
        let total_liters: f64 = self.trips.iter().map(|t| fuel_liters(t.fuel_used, t.unit_system)).sum();
        let costs: Vec<f64> = self.trips.iter().filter_map(TripRecord::cost).collect();

        let total_distance = from_km(total_km, unit_system);
        let total_fuel = from_liters(total_liters, unit_system);
        let (average_economy, average_liters_per_100km) = if total_liters > 0.0 && total_km > 0.0 {
            (Some(total_distance / total_fuel), Some(100.0 * total_liters / total_km))
        } else {
            (None, None)
        };

        TripSummary {
            unit_system,
            trips: self.trips.len(),
            total_distance,
            total_fuel,
            total_cost: costs.iter().sum(),
            priced_trips: costs.len(),
            average_economy,
            average_liters_per_100km,
            first_date: self.trips.iter().map(|t| t.date).min(),
            last_date: self.trips.iter().map(|t| t.date).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(distance: f64, fuel_used: f64, unit_system: UnitSystem, fuel_price: Option<f64>) -> MileageInput {
        MileageInput { distance, fuel_used, unit_system, fuel_price }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn test_metric_economy() {
        let r = calculate(&trip(500.0, 40.0, UnitSystem::Metric, Some(1.8))).unwrap();
        assert_eq!(r.economy, 12.5);
        assert_eq!(r.economy_unit, "km/L");
        assert!((r.liters_per_100km - 8.0).abs() < 1e-12);
        // 12.5 km/L ≈ 29.40 mpg
        assert!((r.miles_per_gallon - 29.4018).abs() < 1e-3);
        assert!((r.trip_cost.unwrap() - 72.0).abs() < 1e-9);
        assert!((r.cost_per_distance.unwrap() - 0.144).abs() < 1e-12);
    }

    #[test]
    fn test_imperial_economy() {
        let r = calculate(&trip(300.0, 10.0, UnitSystem::Imperial, None)).unwrap();
        assert_eq!(r.economy, 30.0);
        assert_eq!(r.economy_unit, "mpg");
        assert!((r.miles_per_gallon - 30.0).abs() < 1e-9);
        // 30 mpg ≈ 7.84 L/100km
        assert!((r.liters_per_100km - 7.8405).abs() < 1e-3);
        assert!(r.trip_cost.is_none());
    }

    #[test]
    fn test_rejects_zero_fuel() {
        let err = calculate(&trip(100.0, 0.0, UnitSystem::Metric, None)).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "fuel_used");
    }

    #[test]
    fn test_log_add_remove_clear() {
        let mut log = TripLog::new();
        let a = log.add(TripRecord::new(date(1), "Commute", &trip(40.0, 3.0, UnitSystem::Metric, None)).unwrap());
        let b = log.add(TripRecord::new(date(2), "Errand", &trip(12.0, 1.0, UnitSystem::Metric, None)).unwrap());
        assert_eq!(log.len(), 2);

        let removed = log.remove(&a).unwrap();
        assert_eq!(removed.label, "Commute");
        assert!(log.remove(&a).is_none());
        assert!(log.get(&b).is_some());

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_record_rejects_invalid_trip() {
        assert!(TripRecord::new(date(1), "", &trip(-5.0, 1.0, UnitSystem::Metric, None)).is_err());
    }

    #[test]
    fn test_summary_normalizes_units() {
        let mut log = TripLog::new();
        log.add(TripRecord::new(date(3), "", &trip(100.0, 8.0, UnitSystem::Metric, Some(2.0))).unwrap());
        log.add(TripRecord::new(date(1), "", &trip(62.137_119, 2.0, UnitSystem::Imperial, None)).unwrap());

        let s = log.summary(UnitSystem::Metric);
        assert_eq!(s.trips, 2);
        assert!((s.total_distance - 200.0).abs() < 1e-4);
        assert!((s.total_fuel - (8.0 + 2.0 * crate::units::LITERS_PER_GALLON)).abs() < 1e-9);
        assert_eq!(s.total_cost, 16.0);
        assert_eq!(s.priced_trips, 1);
        assert_eq!(s.first_date, Some(date(1)));
        assert_eq!(s.last_date, Some(date(3)));

        let imperial = log.summary(UnitSystem::Imperial);
        assert!((imperial.total_distance - 124.274_238).abs() < 1e-4);
        let economy = imperial.average_economy.unwrap();
        assert!((economy - imperial.total_distance / imperial.total_fuel).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let s = TripLog::new().summary(UnitSystem::Metric);
        assert_eq!(s.trips, 0);
        assert!(s.average_economy.is_none());
        assert!(s.first_date.is_none());
    }

    #[test]
    fn test_log_serializes_as_array() {
        let mut log = TripLog::new();
        log.add(TripRecord::new(date(4), "Trip", &trip(10.0, 1.0, UnitSystem::Metric, None)).unwrap());
        let json = serde_json::to_value(&log).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["date"], "2024-05-04");
        let back: TripLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_log_validate_names_the_record() {
        let mut log = TripLog::new();
        log.add(TripRecord::new(date(1), "Good", &trip(100.0, 8.0, UnitSystem::Metric, None)).unwrap());
        let mut bad = TripRecord::new(date(2), "Bad", &trip(100.0, 8.0, UnitSystem::Metric, None)).unwrap();
        assert!(log.validate().is_ok());

        bad.fuel_used = 0.0;
        log.add(bad);
        let err = log.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.field_errors()[0].field, "trips[1].fuel_used");
    }
}
