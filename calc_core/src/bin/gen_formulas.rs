//! Generate FORMULAS.md from the formula registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-formulas              # all categories
//! cargo run --bin gen-formulas -- finance   # one category
//! ```
//!
//! The generated file is written to `calc_core/src/formulas/FORMULAS.md`.

use std::fs;
use std::path::Path;

use calc_core::formulas::{generate_formulas_markdown, FormulaCategory};

fn main() {
    let category = match std::env::args().nth(1) {
        Some(arg) => match FormulaCategory::from_str_flexible(&arg) {
            Some(category) => Some(category),
            None => {
                eprintln!("Unknown category '{}'", arg);
                std::process::exit(2);
            }
        },
        None => None,
    };

    println!("Generating FORMULAS.md...");
    let markdown = generate_formulas_markdown(category);
    let output_path = Path::new("calc_core/src/formulas/FORMULAS.md");

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            println!("Wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
