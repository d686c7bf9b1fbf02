//! # flash_core - Flash Exposure Distance Engine
//!
//! `flash_core` computes flash-to-subject distance tables for film
//! photography from a guide number, film speed, aperture and flash power
//! setting. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: Requests and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use flash_core::calculations::compute_iso_table;
//! use flash_core::fstops::{generate, StopStep};
//! use flash_core::units::DistanceUnit;
//!
//! let f_stops = generate(2.0, 16.0, StopStep::Full);
//! let table = compute_iso_table(32.0, &[100.0, 400.0], &f_stops, DistanceUnit::Meters).unwrap();
//!
//! assert_eq!(table.data[0][2], 8.0); // ISO 100 at f/4
//! let json = serde_json::to_string_pretty(&table).unwrap();
//! assert!(json.contains("rowHeaders"));
//! ```
//!
//! ## Modules
//!
//! - [`fstops`] - Standard f-stop progressions and range selection
//! - [`calculations`] - Distance vs. ISO and distance vs. power tables
//! - [`presets`] - Standard ISO values and power ratios
//! - [`api`] - JSON request/response boundary
//! - [`render`] - Text table, clipboard text and chart output
//! - [`pdf`] - Printable PDF report
//! - [`settings`] - TOML calculator settings
//! - [`units`] - Distance units
//! - [`errors`] - Structured error types

pub mod api;
pub mod calculations;
pub mod errors;
pub mod fstops;
pub mod pdf;
pub mod presets;
pub mod render;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_iso_table, compute_power_table, CalculationResult, TableMode};
pub use errors::{FlashError, FlashResult};
pub use fstops::{generate, nearest_index, StopStep};
pub use settings::{load_settings, CalculatorSettings};
pub use units::DistanceUnit;
