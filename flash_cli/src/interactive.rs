//! Prompt-driven session: ask for each parameter with the settings value as
//! the default, then print the table (and chart).

use std::io::{self, BufRead, Write};

use flash_core::calculations::{format_number, iso_table, power_table, TableMode};
use flash_core::presets::{format_iso_list, parse_iso_list, ISO_PRESETS};
use flash_core::render::{render_ascii_chart, to_text_table};
use flash_core::settings::CalculatorSettings;
use flash_core::{DistanceUnit, StopStep};

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(&format!("{prompt} [{}]: ", format_number(default)))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_parsed<T: std::str::FromStr>(prompt: &str, default: T, shown: &str) -> T {
    prompt_line(&format!("{prompt} [{shown}]: "))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

pub fn run(mut settings: CalculatorSettings) -> Result<(), Box<dyn std::error::Error>> {
    println!("Flash Guide - Flash Exposure Calculator");
    println!("=======================================");
    println!();

    let table = prompt_line(&format!("Table type (iso/power) [{}]: ", settings.table));
    settings.table = match table.as_deref() {
        Some("power") | Some("p") => TableMode::Power,
        Some("iso") | Some("i") => TableMode::Iso,
        _ => settings.table,
    };

    settings.guide_number = prompt_f64("Guide number at ISO 100", settings.guide_number);

    let units_shown = settings.units.to_string();
    settings.units = prompt_parsed::<DistanceUnit>("Units (meters/feet)", settings.units, &units_shown);

    match settings.table {
        TableMode::Iso => {
            println!(
                "  Presets: {}",
                format_iso_list(&ISO_PRESETS)
            );
            let shown = format_iso_list(&settings.iso_values);
            if let Some(text) = prompt_line(&format!("ISO values (comma-separated) [{shown}]: ")) {
                match parse_iso_list(&text) {
                    Ok(values) => settings.iso_values = values,
                    Err(e) => println!("  {e}; keeping {shown}"),
                }
            }
        }
        TableMode::Power => {
            settings.fixed_iso = prompt_f64("Fixed ISO", settings.fixed_iso);
        }
    }

    settings.min_f_stop = prompt_f64("Min f-stop", settings.min_f_stop);
    settings.max_f_stop = prompt_f64("Max f-stop", settings.max_f_stop);
    let step_shown = settings.step.to_string();
    settings.step = prompt_parsed::<StopStep>("Step (full/half/third)", settings.step, &step_shown);

    println!();

    let result = match settings.table {
        TableMode::Iso => iso_table::calculate(&settings.iso_input()),
        TableMode::Power => power_table::calculate(&settings.power_input()),
    };

    match result {
        Ok(result) => {
            print!("{}", to_text_table(&result));
            if settings.show_chart {
                println!();
                print!("{}", render_ascii_chart(&result, 12));
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }

    Ok(())
}
