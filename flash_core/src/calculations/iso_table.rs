//! # Distance vs. ISO
//!
//! Flash-to-subject distance for each film speed and aperture, flash at full
//! power. Rows follow the ISO values in the order given, columns follow the
//! f-stops in the order given.
//!
//! ## Example
//!
//! ```rust
//! use flash_core::calculations::iso_table::compute_iso_table;
//! use flash_core::units::DistanceUnit;
//!
//! let table = compute_iso_table(32.0, &[100.0, 400.0], &[4.0], DistanceUnit::Meters).unwrap();
//! assert_eq!(table.data, vec![vec![8.0], vec![16.0]]);
//! assert_eq!(table.row_headers, vec!["100", "400"]);
//! ```

use serde::{Deserialize, Serialize};

use super::{
    distance_row, format_number, iso_factor, require_all_positive, require_positive,
    CalculationResult, TableMode,
};
use crate::errors::FlashResult;
use crate::units::DistanceUnit;

/// Input parameters for a distance-vs-ISO table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "guide_number": 32.0,
///   "iso_values": [100, 200, 400, 800],
///   "f_stops": [2, 2.8, 4, 5.6, 8, 11, 16],
///   "units": "meters"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsoTableInput {
    /// Guide number at ISO 100, in meters
    pub guide_number: f64,

    /// Film speeds, one table row each
    pub iso_values: Vec<f64>,

    /// Apertures, one table column each
    pub f_stops: Vec<f64>,

    /// Output unit
    #[serde(default)]
    pub units: DistanceUnit,
}

impl IsoTableInput {
    /// Validate input parameters.
    pub fn validate(&self) -> FlashResult<()> {
        require_positive("guide_number", self.guide_number)?;
        require_all_positive("iso_values", &self.iso_values)?;
        require_all_positive("f_stops", &self.f_stops)?;
        Ok(())
    }
}

/// Calculate a distance-vs-ISO table.
///
/// # Returns
///
/// * `Ok(CalculationResult)` - The table, `mode` = `iso`
/// * `Err(FlashError::InvalidInput)` - Non-positive or non-finite input
/// * `Err(FlashError::Internal)` - A distance overflowed
pub fn calculate(input: &IsoTableInput) -> FlashResult<CalculationResult> {
    compute_iso_table(input.guide_number, &input.iso_values, &input.f_stops, input.units)
}

/// Calculate a distance-vs-ISO table from borrowed slices.
///
/// Empty `iso_values` or `f_stops` produce a table with zero rows or zero
/// columns; that is not an error.
pub fn compute_iso_table(
    guide_number: f64,
    iso_values: &[f64],
    f_stops: &[f64],
    units: DistanceUnit,
) -> FlashResult<CalculationResult> {
    require_positive("guide_number", guide_number)?;
    require_all_positive("iso_values", iso_values)?;
    require_all_positive("f_stops", f_stops)?;

    let mut data = Vec::with_capacity(iso_values.len());
    let mut row_headers = Vec::with_capacity(iso_values.len());

    for &iso in iso_values {
        let header = format_number(iso);
        let adjusted_gn = guide_number * iso_factor(iso);
        data.push(distance_row(adjusted_gn, f_stops, units, &format!("ISO {header}"))?);
        row_headers.push(header);
    }

    let column_headers: Vec<String> = f_stops.iter().map(|&f| format_number(f)).collect();

    log::debug!(
        "ISO table: GN {} -> {} rows x {} columns in {}",
        guide_number,
        row_headers.len(),
        column_headers.len(),
        units
    );

    Ok(CalculationResult {
        data,
        row_headers,
        column_headers,
        units,
        mode: TableMode::Iso,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{distance, round_to_tenth};
    use crate::fstops::{generate, StopStep};
    use crate::units::FEET_PER_METER;

    fn test_input() -> IsoTableInput {
        IsoTableInput {
            guide_number: 32.0,
            iso_values: vec![100.0, 200.0, 400.0, 800.0],
            f_stops: generate(2.0, 16.0, StopStep::Full),
            units: DistanceUnit::Meters,
        }
    }

    #[test]
    fn test_iso_100_f4() {
        let table = compute_iso_table(32.0, &[100.0], &[4.0], DistanceUnit::Meters).unwrap();
        assert_eq!(table.data, vec![vec![8.0]]);
        assert_eq!(table.mode, TableMode::Iso);
    }

    #[test]
    fn test_iso_400_doubles_distance() {
        let table = compute_iso_table(32.0, &[400.0], &[4.0], DistanceUnit::Meters).unwrap();
        assert_eq!(table.data, vec![vec![16.0]]);
    }

    #[test]
    fn test_shape_and_headers() {
        let input = test_input();
        let table = calculate(&input).unwrap();
        assert!(table.is_well_formed());
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 7);
        assert_eq!(table.row_headers, vec!["100", "200", "400", "800"]);
        assert_eq!(
            table.column_headers,
            vec!["2", "2.8", "4", "5.6", "8", "11", "16"]
        );
    }

    #[test]
    fn test_row_order_as_given() {
        let table =
            compute_iso_table(32.0, &[800.0, 100.0], &[8.0, 4.0], DistanceUnit::Meters).unwrap();
        assert_eq!(table.row_headers, vec!["800", "100"]);
        assert_eq!(table.column_headers, vec!["8", "4"]);
        assert_eq!(table.data[1], vec![4.0, 8.0]);
    }

    #[test]
    fn test_feet_matches_converted_meters() {
        let input = test_input();
        let feet = compute_iso_table(
            input.guide_number,
            &input.iso_values,
            &input.f_stops,
            DistanceUnit::Feet,
        )
        .unwrap();

        for (r, &iso) in input.iso_values.iter().enumerate() {
            for (c, &f_stop) in input.f_stops.iter().enumerate() {
                let meters = distance(32.0 * (iso / 100.0).sqrt(), f_stop, DistanceUnit::Meters);
                assert_eq!(feet.data[r][c], round_to_tenth(meters * FEET_PER_METER));
            }
        }
        assert_eq!(feet.units, DistanceUnit::Feet);
    }

    #[test]
    fn test_monotonic_in_f_stop() {
        let table = calculate(&test_input()).unwrap();
        for row in &table.data {
            assert!(row.windows(2).all(|w| w[0] > w[1]), "row not decreasing: {row:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let input = test_input();
        assert_eq!(calculate(&input).unwrap(), calculate(&input).unwrap());
    }

    #[test]
    fn test_empty_f_stops_gives_zero_columns() {
        let stops = generate(100.0, 200.0, StopStep::Full);
        let table = compute_iso_table(32.0, &[100.0, 200.0], &stops, DistanceUnit::Meters).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 0);
        assert!(table.data.iter().all(|row| row.is_empty()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_iso_values_gives_zero_rows() {
        let table = compute_iso_table(32.0, &[], &[4.0], DistanceUnit::Meters).unwrap();
        assert!(table.data.is_empty());
        assert_eq!(table.column_headers, vec!["4"]);
    }

    #[test]
    fn test_zero_guide_number_rejected() {
        let err = compute_iso_table(0.0, &[100.0], &[4.0], DistanceUnit::Meters).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.field(), Some("guide_number"));
    }

    #[test]
    fn test_invalid_iso_and_f_stop_rejected() {
        assert!(compute_iso_table(32.0, &[-100.0], &[4.0], DistanceUnit::Meters).is_err());
        assert!(compute_iso_table(32.0, &[100.0], &[0.0], DistanceUnit::Meters).is_err());
        assert!(compute_iso_table(32.0, &[f64::NAN], &[4.0], DistanceUnit::Meters).is_err());
        assert!(compute_iso_table(f64::INFINITY, &[100.0], &[4.0], DistanceUnit::Meters).is_err());
    }

    #[test]
    fn test_overflow_is_internal() {
        let err = compute_iso_table(1e308, &[1e6], &[1.0], DistanceUnit::Meters).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_serialization() {
        let input = test_input();
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: IsoTableInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
