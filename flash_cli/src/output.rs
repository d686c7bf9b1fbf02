//! Printing a computed table: text, tab-separated, JSON, chart and PDF.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use flash_core::calculations::{format_number, CalculationResult, TableMode};
use flash_core::pdf::render_table_pdf;
use flash_core::presets::format_iso_list;
use flash_core::render::{render_ascii_chart, to_clipboard_text, to_text_table};
use flash_core::settings::CalculatorSettings;
use flash_core::FlashResult;

/// Height of the terminal chart in text rows
const CHART_HEIGHT: usize = 12;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Tab-separated text for pasting into a spreadsheet
    Tsv,
    /// The JSON result object
    Json,
}

/// Output flags shared by the table commands.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Draw the chart below the table
    #[arg(long, conflicts_with = "no_chart")]
    pub chart: bool,

    /// Never draw the chart
    #[arg(long)]
    pub no_chart: bool,

    /// Also write a printable PDF report to this path
    #[arg(long)]
    pub pdf: Option<PathBuf>,
}

impl OutputArgs {
    /// Whether the chart goes with the table. Only text tables get a chart.
    pub fn show_chart(&self, settings: &CalculatorSettings) -> bool {
        self.format == OutputFormat::Table && !self.no_chart && (self.chart || settings.show_chart)
    }
}

/// Print `result` according to `args`, and write the PDF if asked.
pub fn emit(
    result: &CalculationResult,
    settings: &CalculatorSettings,
    args: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.format {
        OutputFormat::Table => {
            print!("{}", to_text_table(result));
            if args.show_chart(settings) {
                println!();
                print!("{}", render_ascii_chart(result, CHART_HEIGHT));
            }
        }
        OutputFormat::Tsv => print!("{}", to_clipboard_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }

    if let Some(path) = &args.pdf {
        let pdf = write_report(result, settings)?;
        std::fs::write(path, pdf)?;
        log::info!("Wrote report to {}", path.display());
        eprintln!("PDF report written to {}", path.display());
    }
    Ok(())
}

/// Render the PDF report with the parameters that produced `result`.
fn write_report(result: &CalculationResult, settings: &CalculatorSettings) -> FlashResult<Vec<u8>> {
    let parameters = report_parameters(result, settings);
    render_table_pdf(result, &settings.report, &parameters)
}

fn report_parameters(
    result: &CalculationResult,
    settings: &CalculatorSettings,
) -> Vec<(&'static str, String)> {
    let mut parameters = vec![("Guide number", format_number(settings.guide_number))];
    match result.mode {
        TableMode::Iso => parameters.push(("ISO values", format_iso_list(&settings.iso_values))),
        TableMode::Power => parameters.push(("ISO", format_number(settings.fixed_iso))),
    }
    parameters.push(("Stops", settings.step.label().to_string()));
    parameters
}
