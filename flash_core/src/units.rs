//! # Unit Types
//!
//! Type-safe wrappers for flash-to-subject distances. Guide numbers are rated
//! in meters, so every distance is computed in meters first and converted to
//! feet only on request.
//!
//! ## Example
//!
//! ```rust
//! use flash_core::units::{DistanceUnit, Feet, Meters};
//!
//! let d = Meters(10.0);
//! let ft: Feet = d.into();
//! assert!((ft.0 - 32.8084).abs() < 1e-9);
//!
//! assert_eq!(DistanceUnit::Feet.convert(d), ft.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FlashError;

/// Feet per meter
pub const FEET_PER_METER: f64 = 3.28084;

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * FEET_PER_METER)
    }
}

// ============================================================================
// Output Unit Selection
// ============================================================================

/// Unit a distance table is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Meters,
    Feet,
}

impl DistanceUnit {
    /// Convert a distance in meters to this unit, returning the raw number
    pub fn convert(self, distance: Meters) -> f64 {
        match self {
            DistanceUnit::Meters => distance.0,
            DistanceUnit::Feet => Feet::from(distance).0,
        }
    }

    /// Lowercase name used on the wire and in table captions ("meters")
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "meters",
            DistanceUnit::Feet => "feet",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceUnit {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meters" | "metres" | "m" => Ok(DistanceUnit::Meters),
            "feet" | "ft" => Ok(DistanceUnit::Feet),
            other => Err(FlashError::invalid_input(
                "units",
                other,
                "Units must be 'meters' or 'feet'",
            )),
        }
    }
}
