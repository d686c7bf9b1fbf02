//! # Flash Guide CLI
//!
//! Terminal front end for flash distance tables. Builds the f-stop columns
//! from a range and step, runs one of the two calculators and prints the
//! result as a table, tab-separated text or JSON, with an optional chart and
//! PDF report.
//!
//! The `request` and `serve` subcommands expose the JSON request/response
//! boundary over stdin/stdout for scripts and other programs.

mod interactive;
mod output;

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use flash_core::api::{handle_request, handle_rpc_line, Endpoint};
use flash_core::calculations::{iso_table, power_table};
use flash_core::fstops::{generate, step_adjust, StepDirection};
use flash_core::presets::parse_iso_list;
use flash_core::settings::{load_settings, CalculatorSettings};
use flash_core::{DistanceUnit, StopStep};

use output::{OutputArgs, OutputFormat};

#[derive(Parser)]
#[command(name = "flash_cli")]
#[command(about = "Flash exposure distance tables for film photography")]
#[command(long_about = "\
Flash exposure distance tables for film photography

Distances use the guide number formula:

  distance = GN × √(ISO / 100) × √(1 / power) / f-stop

The guide number is rated in meters at ISO 100 and full power. F-stop
columns are taken from the standard full, half or third stop markings
between --min and --max.

Run 'flash_cli gen-config' to print a settings file with every default.")]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output units (meters or feet)
    #[arg(long, global = true)]
    units: Option<DistanceUnit>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// F-stop range flags shared by the table commands.
#[derive(Args, Clone, Debug, Default)]
struct RangeArgs {
    /// Widest aperture to include
    #[arg(long)]
    min: Option<f64>,

    /// Smallest aperture to include
    #[arg(long)]
    max: Option<f64>,

    /// Stop granularity: full, half or third
    #[arg(long)]
    step: Option<StopStep>,
}

#[derive(Subcommand)]
enum Command {
    /// Distance vs. ISO table (flash at full power)
    Iso {
        /// Guide number at ISO 100, meters
        #[arg(long)]
        gn: Option<f64>,

        /// Comma-separated ISO values, e.g. "100,200,400"
        #[arg(long)]
        iso: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Distance vs. power ratio table at a fixed ISO
    Power {
        /// Guide number at ISO 100, meters
        #[arg(long)]
        gn: Option<f64>,

        /// Film speed
        #[arg(long)]
        iso: Option<f64>,

        /// Comma-separated power ratios (1 = full, 2 = half, ...)
        #[arg(long, value_delimiter = ',')]
        ratios: Option<Vec<f64>>,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the f-stops in a range
    Fstops {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Move one marked stop up or down from an aperture
    Nudge {
        /// Starting aperture (snapped to the nearest mark)
        value: f64,

        /// Move toward wider apertures instead of smaller ones
        #[arg(long)]
        down: bool,

        /// Stop granularity: full, half or third
        #[arg(long)]
        step: Option<StopStep>,
    },
    /// Answer one JSON request and print the JSON response
    Request {
        /// Endpoint: iso or power
        endpoint: Endpoint,

        /// Request body file (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Line-delimited JSON requests on stdin, one response per line
    Serve,
    /// Prompt for parameters and print a table
    Interactive,
    /// Print a settings file with all defaults
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => CalculatorSettings::default(),
    };
    if let Some(units) = cli.units {
        settings.units = units;
    }

    match cli.command {
        Command::Iso {
            gn,
            iso,
            range,
            output,
        } => {
            apply_range(&mut settings, &range);
            if let Some(gn) = gn {
                settings.guide_number = gn;
            }
            if let Some(text) = iso {
                settings.iso_values = parse_iso_list(&text)?;
            }
            let result = iso_table::calculate(&settings.iso_input())?;
            output::emit(&result, &settings, &output)?;
        }
        Command::Power {
            gn,
            iso,
            ratios,
            range,
            output,
        } => {
            apply_range(&mut settings, &range);
            if let Some(gn) = gn {
                settings.guide_number = gn;
            }
            if let Some(iso) = iso {
                settings.fixed_iso = iso;
            }
            if let Some(ratios) = ratios {
                settings.power_ratios = ratios;
            }
            let result = power_table::calculate(&settings.power_input())?;
            output::emit(&result, &settings, &output)?;
        }
        Command::Fstops { range } => {
            apply_range(&mut settings, &range);
            let stops = generate(settings.min_f_stop, settings.max_f_stop, settings.step);
            if stops.is_empty() {
                println!("No {} stops between f/{} and f/{}", settings.step, settings.min_f_stop, settings.max_f_stop);
            }
            for stop in stops {
                println!("f/{stop}");
            }
        }
        Command::Nudge { value, down, step } => {
            let direction = if down { StepDirection::Down } else { StepDirection::Up };
            let step = step.unwrap_or(settings.step);
            println!("{}", step_adjust(step, value, direction));
        }
        Command::Request { endpoint, input } => {
            let body = match input {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let response = handle_request(endpoint.name(), &body);
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            if !response.is_success() {
                std::process::exit(1);
            }
        }
        Command::Serve => serve()?,
        Command::Interactive => interactive::run(settings)?,
        Command::GenConfig => print!("{}", settings.to_toml_string()?),
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn apply_range(settings: &mut CalculatorSettings, range: &RangeArgs) {
    if let Some(min) = range.min {
        settings.min_f_stop = min;
    }
    if let Some(max) = range.max {
        settings.max_f_stop = max;
    }
    if let Some(step) = range.step {
        settings.step = step;
    }
}

fn serve() -> io::Result<()> {
    log::info!("Serving line-delimited JSON requests on stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_rpc_line(&line);
        let text = serde_json::to_string(&response).map_err(io::Error::other)?;
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_iso_command() {
        let cli = Cli::try_parse_from([
            "flash_cli", "--units", "feet", "iso", "--gn", "45", "--iso", "100,400", "--step", "half",
            "--format", "tsv",
        ])
        .unwrap();
        assert_eq!(cli.units, Some(DistanceUnit::Feet));
        match cli.command {
            Command::Iso { gn, iso, range, output } => {
                assert_eq!(gn, Some(45.0));
                assert_eq!(iso.as_deref(), Some("100,400"));
                assert_eq!(range.step, Some(StopStep::Half));
                assert_eq!(output.format, OutputFormat::Tsv);
            }
            _ => panic!("expected iso command"),
        }
    }

    #[test]
    fn test_parse_power_ratios() {
        let cli = Cli::try_parse_from(["flash_cli", "power", "--iso", "200", "--ratios", "1,2,4"])
            .unwrap();
        match cli.command {
            Command::Power { iso, ratios, .. } => {
                assert_eq!(iso, Some(200.0));
                assert_eq!(ratios, Some(vec![1.0, 2.0, 4.0]));
            }
            _ => panic!("expected power command"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Cli::try_parse_from(["flash_cli", "--units", "yards", "iso"]).is_err());
        assert!(Cli::try_parse_from(["flash_cli", "fstops", "--step", "quarter"]).is_err());
        assert!(Cli::try_parse_from(["flash_cli", "request", "shutter"]).is_err());
    }

    #[test]
    fn test_parse_request_endpoint() {
        let cli = Cli::try_parse_from(["flash_cli", "request", "power"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Request { endpoint: Endpoint::Power, input: None }
        ));
    }

    #[test]
    fn test_apply_range() {
        let mut settings = CalculatorSettings::default();
        apply_range(
            &mut settings,
            &RangeArgs {
                min: Some(4.0),
                max: None,
                step: Some(StopStep::Third),
            },
        );
        assert_eq!(settings.min_f_stop, 4.0);
        assert_eq!(settings.max_f_stop, 16.0);
        assert_eq!(settings.step, StopStep::Third);
    }
}
