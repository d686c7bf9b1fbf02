//! # Distance Calculations
//!
//! Guide-number distance tables. Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `calculate(input) -> FlashResult<CalculationResult>` - Pure calculation function
//! - `compute_*_table(...)` - The same calculation over borrowed slices
//!
//! ## The Guide Number Formula
//!
//! A guide number is rated in meters at ISO 100 and full power:
//!
//! ```text
//! distance = GN × √(ISO / 100) × √(1 / power_ratio) / f-stop
//! ```
//!
//! Distances are rounded to one decimal place after unit conversion.
//!
//! ## Available Calculations
//!
//! - [`iso_table`] - Distance vs. ISO at full power
//! - [`power_table`] - Distance vs. power ratio at a fixed ISO

pub mod iso_table;
pub mod power_table;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{FlashError, FlashResult};
use crate::units::{DistanceUnit, Meters};

// Re-export commonly used types
pub use iso_table::{compute_iso_table, IsoTableInput};
pub use power_table::{compute_power_table, PowerTableInput};

/// Reference sensitivity at which guide numbers are rated
pub const REFERENCE_ISO: f64 = 100.0;

/// Which quantity varies along the rows of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableMode {
    /// One row per ISO value, flash at full power
    #[default]
    Iso,
    /// One row per power ratio, ISO fixed
    Power,
}

impl TableMode {
    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            TableMode::Iso => "iso",
            TableMode::Power => "power",
        }
    }
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed distance table.
///
/// `data[row][col]` is the distance for `row_headers[row]` at f-stop
/// `column_headers[col]`.
///
/// ## JSON Example
///
/// ```json
/// {
///   "data": [[8.0, 5.7], [11.3, 8.0]],
///   "rowHeaders": ["100", "200"],
///   "columnHeaders": ["4", "5.6"],
///   "units": "meters",
///   "mode": "iso"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Distances, one row per ISO value or power ratio
    pub data: Vec<Vec<f64>>,

    /// Row headers (ISO values or power ratios as given)
    pub row_headers: Vec<String>,

    /// Column headers (f-stops as given)
    pub column_headers: Vec<String>,

    /// Unit the distances are reported in
    pub units: DistanceUnit,

    /// Which table this is
    pub mode: TableMode,
}

impl CalculationResult {
    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_headers.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.column_headers.len()
    }

    /// True when the table has no cells (zero rows or zero columns)
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Distance at `(row, col)`, if in bounds
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Check that `data` is rectangular and matches the headers.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.row_headers.len()
            && self.data.iter().all(|row| row.len() == self.column_headers.len())
    }
}

// ============================================================================
// Formula
// ============================================================================

/// Guide number multiplier for film speed: √(ISO / 100)
pub fn iso_factor(iso: f64) -> f64 {
    (iso / REFERENCE_ISO).sqrt()
}

/// Guide number multiplier for a power setting: √(1 / ratio)
///
/// A ratio of 1 is full power, 2 is half power, 4 quarter power, and so on.
pub fn power_factor(power_ratio: f64) -> f64 {
    (1.0 / power_ratio).sqrt()
}

/// Unrounded flash-to-subject distance for an adjusted guide number.
pub fn distance(adjusted_guide_number: f64, f_stop: f64, units: DistanceUnit) -> f64 {
    units.convert(Meters(adjusted_guide_number / f_stop))
}

/// Round to one decimal place, halves rounding up.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Header text for a number: the shortest decimal that round-trips
/// (`2.0` -> "2", `2.8` -> "2.8").
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// One table row: rounded distances across all f-stops.
///
/// `row_label` is only used for the error message if the arithmetic overflows.
pub(crate) fn distance_row(
    adjusted_guide_number: f64,
    f_stops: &[f64],
    units: DistanceUnit,
    row_label: &str,
) -> FlashResult<Vec<f64>> {
    f_stops
        .iter()
        .map(|&f_stop| {
            let rounded = round_to_tenth(distance(adjusted_guide_number, f_stop, units));
            if rounded.is_finite() {
                Ok(rounded)
            } else {
                Err(FlashError::internal(format!(
                    "Distance for {row_label} at f/{} is not finite",
                    format_number(f_stop)
                )))
            }
        })
        .collect()
}

// ============================================================================
// Validation
// ============================================================================

/// Require a single value to be positive and finite.
pub(crate) fn require_positive(field: &str, value: f64) -> FlashResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlashError::invalid_input(
            field,
            value.to_string(),
            "Value must be a positive, finite number",
        ))
    }
}

/// Require every value in a list to be positive and finite. Empty lists pass.
pub(crate) fn require_all_positive(field: &str, values: &[f64]) -> FlashResult<()> {
    for (i, &value) in values.iter().enumerate() {
        if !(value.is_finite() && value > 0.0) {
            return Err(FlashError::invalid_input(
                format!("{field}[{i}]"),
                value.to_string(),
                "Value must be a positive, finite number",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_factor() {
        assert_eq!(iso_factor(100.0), 1.0);
        assert_eq!(iso_factor(400.0), 2.0);
        assert!((iso_factor(200.0) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_power_factor() {
        assert_eq!(power_factor(1.0), 1.0);
        assert_eq!(power_factor(4.0), 0.5);
        assert!((power_factor(2.0) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(5.6568), 5.7);
        assert_eq!(round_to_tenth(8.0), 8.0);
        assert_eq!(round_to_tenth(2.25), 2.3);
        assert_eq!(round_to_tenth(0.04), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(2.8), "2.8");
        assert_eq!(format_number(1600.0), "1600");
    }

    #[test]
    fn test_distance_row_overflow_is_internal() {
        let err = distance_row(f64::MAX, &[0.5], DistanceUnit::Meters, "ISO 100").unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("guide_number", 32.0).is_ok());
        assert!(require_positive("guide_number", 0.0).is_err());
        assert!(require_positive("guide_number", -1.0).is_err());
        assert!(require_positive("guide_number", f64::NAN).is_err());
        assert!(require_positive("guide_number", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_all_positive_names_index() {
        let err = require_all_positive("f_stops", &[2.0, -4.0]).unwrap_err();
        assert_eq!(err.field(), Some("f_stops[1]"));
        assert!(require_all_positive("f_stops", &[]).is_ok());
    }

    #[test]
    fn test_result_serialization_keys() {
        let result = CalculationResult {
            data: vec![vec![8.0]],
            row_headers: vec!["100".into()],
            column_headers: vec!["4".into()],
            units: DistanceUnit::Meters,
            mode: TableMode::Iso,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rowHeaders"][0], "100");
        assert_eq!(json["columnHeaders"][0], "4");
        assert_eq!(json["units"], "meters");
        assert_eq!(json["mode"], "iso");
        assert!(result.is_well_formed());
        assert_eq!(result.value(0, 0), Some(8.0));
        assert_eq!(result.value(1, 0), None);
    }
}
