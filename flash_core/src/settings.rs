//! # Calculator Settings
//!
//! Defaults for the calculator form, loaded from an optional TOML file. Every
//! key is optional; anything left out falls back to the stock value.
//!
//! ```toml
//! guide_number = 32.0      # GN at ISO 100, meters
//! units = "meters"         # "meters" | "feet"
//! table = "iso"            # "iso" | "power"
//! iso_values = [100, 200, 400, 800]
//! fixed_iso = 100          # ISO used by the power table
//! power_ratios = [1, 2, 4, 8, 16, 32, 64, 128]
//! min_f_stop = 2.0
//! max_f_stop = 16.0
//! step = "full"            # "full" | "half" | "third"
//! show_chart = true
//!
//! [report]
//! title = "Flash Distance Table"
//! paper = "us-letter"      # any Typst paper name, e.g. "a4"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculations::{require_all_positive, require_positive, IsoTableInput, PowerTableInput, TableMode};
use crate::errors::{FlashError, FlashResult};
use crate::fstops::{generate, StopStep};
use crate::presets::POWER_RATIOS;
use crate::units::DistanceUnit;

/// Calculator defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorSettings {
    /// Guide number at ISO 100, in meters
    pub guide_number: f64,

    /// Output unit
    pub units: DistanceUnit,

    /// Which table to build by default
    pub table: TableMode,

    /// Rows of the ISO table
    pub iso_values: Vec<f64>,

    /// ISO used for the power table
    pub fixed_iso: f64,

    /// Rows of the power table
    pub power_ratios: Vec<f64>,

    /// Widest aperture in the f-stop range
    pub min_f_stop: f64,

    /// Smallest aperture in the f-stop range
    pub max_f_stop: f64,

    /// Progression granularity
    pub step: StopStep,

    /// Print the chart along with the table
    pub show_chart: bool,

    /// PDF report options
    pub report: ReportSettings,
}

impl Default for CalculatorSettings {
    fn default() -> Self {
        CalculatorSettings {
            guide_number: 32.0,
            units: DistanceUnit::Meters,
            table: TableMode::Iso,
            iso_values: vec![100.0, 200.0, 400.0, 800.0],
            fixed_iso: 100.0,
            power_ratios: POWER_RATIOS.to_vec(),
            min_f_stop: 2.0,
            max_f_stop: 16.0,
            step: StopStep::Full,
            show_chart: true,
            report: ReportSettings::default(),
        }
    }
}

impl CalculatorSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> FlashResult<Self> {
        let settings: CalculatorSettings =
            toml::from_str(text).map_err(|e| FlashError::SerializationError {
                reason: format!("Invalid settings TOML: {}", e.message()),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Render as TOML (used to print a stock settings file).
    pub fn to_toml_string(&self) -> FlashResult<String> {
        toml::to_string_pretty(self).map_err(|e| FlashError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Check that every numeric default is usable.
    pub fn validate(&self) -> FlashResult<()> {
        require_positive("guide_number", self.guide_number)?;
        require_positive("fixed_iso", self.fixed_iso)?;
        require_positive("min_f_stop", self.min_f_stop)?;
        require_positive("max_f_stop", self.max_f_stop)?;
        require_all_positive("iso_values", &self.iso_values)?;
        require_all_positive("power_ratios", &self.power_ratios)?;
        Ok(())
    }

    /// The f-stop columns implied by the configured range and step
    pub fn f_stops(&self) -> Vec<f64> {
        generate(self.min_f_stop, self.max_f_stop, self.step)
    }

    /// ISO table input built from these settings
    pub fn iso_input(&self) -> IsoTableInput {
        IsoTableInput {
            guide_number: self.guide_number,
            iso_values: self.iso_values.clone(),
            f_stops: self.f_stops(),
            units: self.units,
        }
    }

    /// Power table input built from these settings
    pub fn power_input(&self) -> PowerTableInput {
        PowerTableInput {
            guide_number: self.guide_number,
            iso: self.fixed_iso,
            power_ratios: self.power_ratios.clone(),
            f_stops: self.f_stops(),
            units: self.units,
        }
    }
}

/// Options for the printable report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Heading printed above the table
    pub title: String,

    /// Typst paper name
    pub paper: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            title: "Flash Distance Table".to_string(),
            paper: "us-letter".to_string(),
        }
    }
}

/// Load settings from a TOML file.
///
/// # Returns
///
/// * `Ok(CalculatorSettings)` - Parsed settings, missing keys defaulted
/// * `Err(FlashError::FileError)` - File could not be read
/// * `Err(FlashError::SerializationError)` - Invalid TOML
/// * `Err(FlashError::InvalidInput)` - A value is non-positive
pub fn load_settings(path: &Path) -> FlashResult<CalculatorSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| FlashError::file_error("read", path.display().to_string(), e.to_string()))?;
    let settings = CalculatorSettings::from_toml_str(&text)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalculatorSettings::default();
        assert_eq!(settings.guide_number, 32.0);
        assert_eq!(settings.units, DistanceUnit::Meters);
        assert_eq!(settings.f_stops(), vec![2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = CalculatorSettings::from_toml_str(
            r#"
            guide_number = 45
            units = "feet"
            step = "half"

            [report]
            paper = "a4"
            "#,
        )
        .unwrap();
        assert_eq!(settings.guide_number, 45.0);
        assert_eq!(settings.units, DistanceUnit::Feet);
        assert_eq!(settings.step, StopStep::Half);
        assert_eq!(settings.fixed_iso, 100.0);
        assert_eq!(settings.report.paper, "a4");
        assert_eq!(settings.report.title, "Flash Distance Table");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            CalculatorSettings::from_toml_str("").unwrap(),
            CalculatorSettings::default()
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = CalculatorSettings::from_toml_str("units = \"yards\"").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let err = CalculatorSettings::from_toml_str("guide_number = -3").unwrap_err();
        assert_eq!(err.field(), Some("guide_number"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = CalculatorSettings::default();
        let text = settings.to_toml_string().unwrap();
        assert!(text.contains("guide_number = 32.0"));
        assert_eq!(CalculatorSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_inputs_from_settings() {
        let settings = CalculatorSettings::default();
        let iso = settings.iso_input();
        assert_eq!(iso.iso_values, vec![100.0, 200.0, 400.0, 800.0]);
        let power = settings.power_input();
        assert_eq!(power.iso, 100.0);
        assert_eq!(power.power_ratios.len(), 8);
        assert_eq!(power.f_stops, iso.f_stops);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings(Path::new("/nonexistent/flash.toml")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
