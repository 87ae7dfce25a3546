//! # Formulary CLI
//!
//! Command-line front end for `calc_core`. Calculation requests are JSON in,
//! JSON out; the lookup tables, formula reference and trip log are printed
//! for humans.
//!
//! ```bash
//! formulary run request.json --pretty
//! formulary formulas --category finance
//! formulary trips add --distance 320 --fuel 24.5 --price 1.79
//! formulary trips summary --units imperial
//! ```

mod args;
mod logging;

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use serde_json::{json, Value};

use calc_core::errors::{CalcError, CalcResult};
use calc_core::file_io::{load_settings, load_trip_log, save_trip_log};
use calc_core::formulas::{generate_formulas_markdown, FormulaCategory};
use calc_core::geometry::MATERIAL_DENSITIES;
use calc_core::mileage::{MileageInput, TripRecord};
use calc_core::settings::CalculatorSettings;
use calc_core::statistics::ISOTOPES;
use calc_core::units::UnitSystem;
use calc_core::CalculationItem;

use crate::args::{Cli, Commands, TripCommand};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => match load_settings(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => CalculatorSettings::default(),
    };
    logging::init_with_config(&settings.logging, cli.verbose);

    match execute(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands, settings: &CalculatorSettings) -> CalcResult<ExitCode> {
    match command {
        Commands::Run { input, pretty } => run_requests(&input, pretty),
        Commands::Formulas { category } => {
            let only = parse_category(category.as_deref())?;
            print!("{}", generate_formulas_markdown(only));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Isotopes => {
            print_isotopes();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Materials => {
            print_materials();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Trips(trip) => {
            manage_trips(trip, settings)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_category(name: Option<&str>) -> CalcResult<Option<FormulaCategory>> {
    match name {
        Some(name) => FormulaCategory::from_str_flexible(name)
            .map(Some)
            .ok_or_else(|| CalcError::invalid_input("category", name, "Unknown formula category")),
        None => Ok(None),
    }
}

// ============================================================================
// run
// ============================================================================

fn read_input(path: &Path) -> CalcResult<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CalcError::file_error("read", "<stdin>", e.to_string()))?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
    }
}

fn error_json(error: &CalcError) -> Value {
    json!({ "code": error.error_code(), "error": error })
}

/// Evaluate one request, producing its result or error as JSON.
fn evaluate_value(request: Value) -> (bool, Value) {
    let item: CalculationItem = match serde_json::from_value(request) {
        Ok(item) => item,
        Err(e) => return (false, error_json(&CalcError::from(e))),
    };
    match item.evaluate() {
        Ok(outcome) => match serde_json::to_value(&outcome) {
            Ok(value) => (true, value),
            Err(e) => (false, error_json(&CalcError::from(e))),
        },
        Err(e) => {
            tracing::debug!(calculator = item.calc_type(), code = e.error_code(), "rejected");
            (false, error_json(&e))
        }
    }
}

/// Evaluate one request or a batch array. The flag is false if any failed.
fn evaluate_requests(request: Value) -> (bool, Value) {
    match request {
        Value::Array(requests) => {
            tracing::debug!(count = requests.len(), "evaluating batch");
            let mut all_ok = true;
            let results: Vec<Value> = requests
                .into_iter()
                .map(|r| {
                    let (ok, value) = evaluate_value(r);
                    all_ok &= ok;
                    value
                })
                .collect();
            (all_ok, Value::Array(results))
        }
        single => evaluate_value(single),
    }
}

fn run_requests(input: &Path, pretty: bool) -> CalcResult<ExitCode> {
    let text = read_input(input)?;
    let request: Value = serde_json::from_str(&text)?;
    let (all_ok, output) = evaluate_requests(request);

    let rendered = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// Tables
// ============================================================================

fn print_isotopes() {
    println!("{:<18} {:<8} {:>14} {:<5} {:<10}", "Isotope", "Symbol", "Half-life", "Unit", "Category");
    println!("{}", "─".repeat(59));
    for iso in ISOTOPES {
        println!(
            "{:<18} {:<8} {:>14} {:<5} {:<10}",
            iso.name,
            iso.symbol,
            iso.half_life,
            iso.unit.label(),
            format!("{:?}", iso.category)
        );
    }
}

fn print_materials() {
    println!("{:<22} {:>12} {:<12}", "Material", "kg/m³", "Category");
    println!("{}", "─".repeat(48));
    for m in MATERIAL_DENSITIES {
        println!("{:<22} {:>12} {:<12}", m.name, m.density_kg_m3, format!("{:?}", m.category));
    }
}

// ============================================================================
// trips
// ============================================================================

fn manage_trips(command: TripCommand, settings: &CalculatorSettings) -> CalcResult<()> {
    let path = settings.trip_log_path.as_path();
    let mut log = load_trip_log(path)?;
    let places = usize::from(settings.decimal_places);

    match command {
        TripCommand::Add { distance, fuel, price, date, label, units } => {
            let unit_system = units.map(UnitSystem::from).unwrap_or(settings.unit_system);
            let trip = MileageInput { distance, fuel_used: fuel, unit_system, fuel_price: price };
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let result = calc_core::mileage::calculate(&trip)?;
            let id = log.add(TripRecord::new(date, label, &trip)?);
            save_trip_log(&log, path)?;
            tracing::info!(%id, path = %path.display(), "trip added");

            println!("Added trip {}", id);
            println!("  Economy:  {:.*} {}", places, result.economy, result.economy_unit);
            println!("  L/100km:  {:.*}", places, result.liters_per_100km);
            if let Some(cost) = result.trip_cost {
                println!("  Cost:     {:.*}", places, cost);
            }
        }
        TripCommand::List => {
            if log.is_empty() {
                println!("No trips recorded in {}", path.display());
                return Ok(());
            }
            println!(
                "{:<36}  {:<10}  {:>10}  {:>8}  {:>8}  {}",
                "Id", "Date", "Distance", "Fuel", "Cost", "Label"
            );
            for trip in log.records() {
                let cost = trip
                    .cost()
                    .map(|c| format!("{:.*}", places, c))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<36}  {:<10}  {:>7.*} {:<2}  {:>5.*} {:<3}  {:>8}  {}",
                    trip.id,
                    trip.date,
                    places,
                    trip.distance,
                    trip.unit_system.distance_label(),
                    places,
                    trip.fuel_used,
                    trip.unit_system.fuel_label(),
                    cost,
                    trip.label
                );
            }
        }
        TripCommand::Summary { units } => {
            let unit_system = units.map(UnitSystem::from).unwrap_or(settings.unit_system);
            let s = log.summary(unit_system);
            let economy_unit = match unit_system {
                UnitSystem::Metric => "km/L",
                UnitSystem::Imperial => "mpg",
            };
            println!("Trips:          {}", s.trips);
            println!("Total distance: {:.*} {}", places, s.total_distance, unit_system.distance_label());
            println!("Total fuel:     {:.*} {}", places, s.total_fuel, unit_system.fuel_label());
            println!("Total cost:     {:.*} ({} priced)", places, s.total_cost, s.priced_trips);
            match (s.average_economy, s.average_liters_per_100km) {
                (Some(economy), Some(per_100)) => {
                    println!("Avg economy:    {:.*} {} ({:.*} L/100km)", places, economy, economy_unit, places, per_100);
                }
                _ => println!("Avg economy:    -"),
            }
            if let (Some(first), Some(last)) = (s.first_date, s.last_date) {
                println!("Period:         {} to {}", first, last);
            }
        }
        TripCommand::Remove { id } => match log.remove(&id) {
            Some(_) => {
                save_trip_log(&log, path)?;
                println!("Removed trip {}", id);
            }
            None => return Err(CalcError::not_found("trips", id.to_string())),
        },
        TripCommand::Clear => {
            let count = log.len();
            log.clear();
            save_trip_log(&log, path)?;
            println!("Cleared {} trips", count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use calc_core::mileage::TripLog;
    use chrono::NaiveDate;

    use crate::args::Units;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("formulary_cli_{}_{}.json", name, std::process::id()))
    }

    fn settings_with_log(path: &Path) -> CalculatorSettings {
        CalculatorSettings {
            trip_log_path: path.to_path_buf(),
            ..Default::default()
        }
    }

    fn add(distance: f64, fuel: f64, price: Option<f64>) -> TripCommand {
        TripCommand::Add {
            distance,
            fuel,
            price,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            label: "Commute".to_string(),
            units: Some(Units::Metric),
        }
    }

    #[test]
    fn test_single_request() {
        let (ok, value) = evaluate_requests(json!({ "calculator": "quadratic", "a": 1, "b": -3, "c": 2 }));
        assert!(ok);
        assert_eq!(value["calculator"], "quadratic");
        assert_eq!(value["roots"]["kind"], "two_real");
    }

    #[test]
    fn test_mixed_batch_reports_each_item() {
        let (ok, value) = evaluate_requests(json!([
            { "calculator": "mileage", "distance": 300, "fuel_used": 10, "unit_system": "imperial" },
            { "calculator": "mileage", "distance": 300, "fuel_used": 0 },
            { "calculator": "no_such_calculator" },
            { "calculator": "sample_size", "confidence": { "kind": "level", "pct": 95 }, "margin_of_error": 0.05 }
        ]));
        assert!(!ok);
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0]["economy"], 30.0);
        assert_eq!(items[1]["code"], "INVALID_INPUT");
        assert_eq!(items[1]["error"]["details"]["field"], "fuel_used");
        assert_eq!(items[2]["code"], "SERIALIZATION_ERROR");
        assert_eq!(items[3]["sample_size"], 385);
    }

    #[test]
    fn test_all_ok_batch() {
        let (ok, value) = evaluate_requests(json!([
            { "calculator": "gross_up", "net_amount": 1000, "tax_rate_pct": 25 },
            { "calculator": "area", "figure": { "figure": "circle", "radius": 1 } }
        ]));
        assert!(ok);
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_oversized_inputs_are_rejected_or_bounded() {
        let (ok, value) = evaluate_requests(json!({
            "calculator": "bond",
            "face_value": 1000,
            "coupon_rate_pct": 5,
            "yield_pct": 5,
            "years_to_maturity": 1e9,
            "frequency": "monthly"
        }));
        assert!(!ok);
        assert_eq!(value["code"], "INVALID_INPUT");
        assert_eq!(value["error"]["details"]["field"], "years_to_maturity");

        let (ok, value) = evaluate_requests(json!({ "calculator": "cagr", "start_value": 100, "end_value": 200, "years": 1e6 }));
        assert!(ok);
        assert!(value["projection"].as_array().unwrap().len() <= 201);

        let (ok, value) = evaluate_requests(json!({ "calculator": "inflation", "amount": 100, "annual_rate_pct": 0.001, "years": 1e6 }));
        assert!(ok);
        assert!(value["curve"].as_array().unwrap().len() <= 201);
    }

    #[test]
    fn test_run_requests_from_file() {
        let path = temp_path("run");
        fs::write(&path, r#"{ "calculator": "slope", "a": { "x": 0, "y": 0 }, "b": { "x": 4, "y": 1 } }"#).unwrap();
        assert!(run_requests(&path, true).is_ok());
        let _ = fs::remove_file(&path);

        let missing = temp_path("run_missing");
        let _ = fs::remove_file(&missing);
        assert_eq!(run_requests(&missing, false).unwrap_err().error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = parse_category(Some("astrology")).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.field_errors()[0].field, "category");

        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("finance")).unwrap(), Some(FormulaCategory::Finance));
    }

    #[test]
    fn test_trip_add_remove_clear() {
        let path = temp_path("trips");
        let _ = fs::remove_file(&path);
        let settings = settings_with_log(&path);

        manage_trips(add(500.0, 40.0, Some(1.8)), &settings).unwrap();
        manage_trips(add(120.0, 9.0, None), &settings).unwrap();
        let log = load_trip_log(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].cost(), Some(72.0));

        manage_trips(TripCommand::List, &settings).unwrap();
        manage_trips(TripCommand::Summary { units: Some(Units::Imperial) }, &settings).unwrap();

        let id = log.records()[0].id;
        manage_trips(TripCommand::Remove { id }, &settings).unwrap();
        let log = load_trip_log(&path).unwrap();
        assert_eq!(log.len(), 1);
        assert!(log.get(&id).is_none());

        let err = manage_trips(TripCommand::Remove { id }, &settings).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        manage_trips(TripCommand::Clear, &settings).unwrap();
        assert!(load_trip_log(&path).unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_trip_is_not_saved() {
        let path = temp_path("trips_invalid");
        let _ = fs::remove_file(&path);
        save_trip_log(&TripLog::new(), &path).unwrap();
        let settings = settings_with_log(&path);

        let err = manage_trips(add(100.0, 0.0, None), &settings).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(load_trip_log(&path).unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }
}
