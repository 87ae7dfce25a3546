//! CLI argument parsing using clap.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use calc_core::units::UnitSystem;

#[derive(Parser, Debug)]
#[command(name = "formulary", version, about = "Closed-form calculators: geometry, finance, biometrics, statistics, algebra")]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = "FORMULARY_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate calculation requests from a JSON file or stdin
    #[command(after_help = "Example:\n  echo '{\"calculator\": \"quadratic\", \"a\": 1, \"b\": -3, \"c\": 2}' | formulary run -")]
    Run {
        /// Path to a JSON request (one object or an array), or `-` for stdin
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the formula reference as markdown
    Formulas {
        /// Only this category (geometry, finance, biometrics, statistics, algebra, travel)
        #[arg(long)]
        category: Option<String>,
    },

    /// List the isotope half-life table
    Isotopes,

    /// List the material density table
    Materials,

    /// Manage the trip log
    #[command(subcommand)]
    Trips(TripCommand),
}

#[derive(Subcommand, Debug)]
pub enum TripCommand {
    /// Record a trip
    Add {
        /// Distance driven (km or mi)
        #[arg(long)]
        distance: f64,

        /// Fuel used (L or gal)
        #[arg(long)]
        fuel: f64,

        /// Price per liter or gallon
        #[arg(long)]
        price: Option<f64>,

        /// Trip date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        label: String,

        /// Units of distance and fuel; defaults to the settings
        #[arg(long, value_enum)]
        units: Option<Units>,
    },

    /// List recorded trips
    List,

    /// Totals and average economy
    Summary {
        #[arg(long, value_enum)]
        units: Option<Units>,
    },

    /// Remove one trip by id
    Remove { id: uuid::Uuid },

    /// Delete every trip
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => UnitSystem::Metric,
            Units::Imperial => UnitSystem::Imperial,
        }
    }
}
