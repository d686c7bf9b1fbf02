//! # Distance vs. Power Ratio
//!
//! Flash-to-subject distance for each manual power setting at one film speed.
//! A power ratio of `N` means 1/N output; each halving of power divides the
//! guide number by √2.
//!
//! ## Example
//!
//! ```rust
//! use flash_core::calculations::power_table::compute_power_table;
//! use flash_core::units::DistanceUnit;
//!
//! let table = compute_power_table(32.0, 100.0, &[1.0, 2.0], &[4.0], DistanceUnit::Meters).unwrap();
//! assert_eq!(table.data, vec![vec![8.0], vec![5.7]]);
//! assert_eq!(table.row_headers, vec!["1", "2"]);
//! ```

use serde::{Deserialize, Serialize};

use super::{
    distance_row, format_number, iso_factor, power_factor, require_all_positive,
    require_positive, CalculationResult, TableMode,
};
use crate::errors::FlashResult;
use crate::units::DistanceUnit;

/// Input parameters for a distance-vs-power table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "guide_number": 32.0,
///   "iso": 100,
///   "power_ratios": [1, 2, 4, 8, 16, 32, 64, 128],
///   "f_stops": [2, 2.8, 4, 5.6, 8, 11, 16],
///   "units": "feet"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerTableInput {
    /// Guide number at ISO 100, in meters
    pub guide_number: f64,

    /// Film speed shared by every row
    pub iso: f64,

    /// Power ratios (1 = full, 2 = half, ...), one table row each
    pub power_ratios: Vec<f64>,

    /// Apertures, one table column each
    pub f_stops: Vec<f64>,

    /// Output unit
    #[serde(default)]
    pub units: DistanceUnit,
}

impl PowerTableInput {
    /// Validate input parameters.
    pub fn validate(&self) -> FlashResult<()> {
        require_positive("guide_number", self.guide_number)?;
        require_positive("iso", self.iso)?;
        require_all_positive("power_ratios", &self.power_ratios)?;
        require_all_positive("f_stops", &self.f_stops)?;
        Ok(())
    }
}

/// Calculate a distance-vs-power table.
///
/// # Returns
///
/// * `Ok(CalculationResult)` - The table, `mode` = `power`
/// * `Err(FlashError::InvalidInput)` - Non-positive or non-finite input
/// * `Err(FlashError::Internal)` - A distance overflowed
pub fn calculate(input: &PowerTableInput) -> FlashResult<CalculationResult> {
    compute_power_table(
        input.guide_number,
        input.iso,
        &input.power_ratios,
        &input.f_stops,
        input.units,
    )
}

/// Calculate a distance-vs-power table from borrowed slices.
pub fn compute_power_table(
    guide_number: f64,
    iso: f64,
    power_ratios: &[f64],
    f_stops: &[f64],
    units: DistanceUnit,
) -> FlashResult<CalculationResult> {
    require_positive("guide_number", guide_number)?;
    require_positive("iso", iso)?;
    require_all_positive("power_ratios", power_ratios)?;
    require_all_positive("f_stops", f_stops)?;

    let iso_gn = guide_number * iso_factor(iso);

    let mut data = Vec::with_capacity(power_ratios.len());
    let mut row_headers = Vec::with_capacity(power_ratios.len());

    for &ratio in power_ratios {
        let header = format_number(ratio);
        let adjusted_gn = iso_gn * power_factor(ratio);
        data.push(distance_row(adjusted_gn, f_stops, units, &format!("1/{header} power"))?);
        row_headers.push(header);
    }

    let column_headers: Vec<String> = f_stops.iter().map(|&f| format_number(f)).collect();

    log::debug!(
        "Power table: GN {} at ISO {} -> {} rows x {} columns in {}",
        guide_number,
        iso,
        row_headers.len(),
        column_headers.len(),
        units
    );

    Ok(CalculationResult {
        data,
        row_headers,
        column_headers,
        units,
        mode: TableMode::Power,
    })
}
