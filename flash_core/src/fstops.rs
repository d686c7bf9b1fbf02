//! # F-Stop Progressions
//!
//! Standard marked aperture values at full, half and third stop granularity,
//! plus helpers to cut a `[min, max]` range out of a progression and to step
//! through it one mark at a time.
//!
//! The progressions are the engraved values found on lenses, not the exact
//! powers of √2, so they are stored as literal tables rather than generated.
//! The third-stop table stops at f/32 while the other two run to f/64.
//!
//! ## Example
//!
//! ```rust
//! use flash_core::fstops::{generate, StopStep};
//!
//! let stops = generate(2.0, 16.0, StopStep::Full);
//! assert_eq!(stops, vec![2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FlashError;

const FULL_STOPS: [f64; 13] = [
    1.0, 1.4, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0, 22.0, 32.0, 45.0, 64.0,
];

const HALF_STOPS: [f64; 25] = [
    1.0, 1.2, 1.4, 1.7, 2.0, 2.4, 2.8, 3.3, 4.0, 4.8, 5.6, 6.7, 8.0, 9.5, 11.0, 13.0, 16.0, 19.0,
    22.0, 27.0, 32.0, 38.0, 45.0, 54.0, 64.0,
];

const THIRD_STOPS: [f64; 31] = [
    1.0, 1.1, 1.2, 1.4, 1.6, 1.8, 2.0, 2.2, 2.5, 2.8, 3.2, 3.5, 4.0, 4.5, 5.0, 5.6, 6.3, 7.1, 8.0,
    9.0, 10.0, 11.0, 13.0, 14.0, 16.0, 18.0, 20.0, 22.0, 25.0, 29.0, 32.0,
];

/// Granularity of the aperture progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStep {
    /// Full stops (f/1, 1.4, 2, 2.8, ...)
    #[default]
    Full,
    /// Half stops (f/1, 1.2, 1.4, 1.7, ...)
    Half,
    /// Third stops (f/1, 1.1, 1.2, 1.4, ...)
    Third,
}

impl StopStep {
    /// All step sizes in selector order
    pub const ALL: [StopStep; 3] = [StopStep::Full, StopStep::Half, StopStep::Third];

    /// The complete reference progression for this step size
    pub fn progression(self) -> &'static [f64] {
        match self {
            StopStep::Full => &FULL_STOPS,
            StopStep::Half => &HALF_STOPS,
            StopStep::Third => &THIRD_STOPS,
        }
    }

    /// Selector label ("Full (1)", "Half (1/2)", "Third (1/3)")
    pub fn label(self) -> &'static str {
        match self {
            StopStep::Full => "Full (1)",
            StopStep::Half => "Half (1/2)",
            StopStep::Third => "Third (1/3)",
        }
    }

    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            StopStep::Full => "full",
            StopStep::Half => "half",
            StopStep::Third => "third",
        }
    }
}

impl fmt::Display for StopStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the names and the numeric tags the step selector has historically
/// used ("1", "0.5", "0.33"). Tags are matched as text, never as floats.
impl FromStr for StopStep {
    type Err = FlashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "1" => Ok(StopStep::Full),
            "half" | "0.5" | "1/2" => Ok(StopStep::Half),
            "third" | "0.33" | "1/3" => Ok(StopStep::Third),
            other => Err(FlashError::invalid_input(
                "step",
                other,
                "Step must be 'full', 'half' or 'third'",
            )),
        }
    }
}

/// Direction for [`step_adjust`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    /// Toward smaller apertures (larger f-numbers)
    Up,
    /// Toward wider apertures (smaller f-numbers)
    Down,
}

/// Values of the chosen progression that fall within `[min, max]`, in
/// progression order.
///
/// An inverted or out-of-range window yields an empty vector, which callers
/// treat as a table with zero columns.
pub fn generate(min: f64, max: f64, step: StopStep) -> Vec<f64> {
    step.progression()
        .iter()
        .copied()
        .filter(|&f| f >= min && f <= max)
        .collect()
}

/// Index of the entry closest to `value`. Ties go to the lowest index, and
/// a NaN `value` (nothing is ever closer) resolves to index 0.
///
/// Returns `None` for an empty sequence.
pub fn nearest_index(sequence: &[f64], value: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &candidate) in sequence.iter().enumerate() {
        let diff = (candidate - value).abs();
        match best {
            None => best = Some((i, diff)),
            Some((_, best_diff)) if diff < best_diff => best = Some((i, diff)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// Snap `current` to its nearest mark in the progression, then move one mark
/// in `direction`. Clamps at either end of the progression.
///
/// ```rust
/// use flash_core::fstops::{step_adjust, StepDirection, StopStep};
///
/// assert_eq!(step_adjust(StopStep::Full, 5.0, StepDirection::Up), 8.0);
/// assert_eq!(step_adjust(StopStep::Full, 64.0, StepDirection::Up), 64.0);
/// ```
pub fn step_adjust(step: StopStep, current: f64, direction: StepDirection) -> f64 {
    let sequence = step.progression();
    let index = nearest_index(sequence, current).unwrap_or(0);
    let new_index = match direction {
        StepDirection::Up => (index + 1).min(sequence.len() - 1),
        StepDirection::Down => index.saturating_sub(1),
    };
    sequence[new_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_full_range() {
        assert_eq!(
            generate(2.0, 16.0, StopStep::Full),
            vec![2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0]
        );
    }

    #[test]
    fn test_generate_half_range() {
        assert_eq!(
            generate(4.0, 8.0, StopStep::Half),
            vec![4.0, 4.8, 5.6, 6.7, 8.0]
        );
    }

    #[test]
    fn test_generate_third_range() {
        assert_eq!(
            generate(2.0, 2.8, StopStep::Third),
            vec![2.0, 2.2, 2.5, 2.8]
        );
    }

    #[test]
    fn test_generate_empty_range() {
        assert!(generate(100.0, 200.0, StopStep::Full).is_empty());
        assert!(generate(16.0, 2.0, StopStep::Half).is_empty());
    }

    #[test]
    fn test_progression_bounds() {
        assert_eq!(StopStep::Full.progression().last(), Some(&64.0));
        assert_eq!(StopStep::Half.progression().last(), Some(&64.0));
        assert_eq!(StopStep::Third.progression().last(), Some(&32.0));
        assert!(generate(45.0, 64.0, StopStep::Third).is_empty());
    }

    #[test]
    fn test_progressions_strictly_increasing() {
        for step in StopStep::ALL {
            let seq = step.progression();
            assert!(seq.windows(2).all(|w| w[0] < w[1]), "{step} not increasing");
            assert_eq!(seq.first(), Some(&1.0));
        }
    }

    #[test]
    fn test_nearest_index() {
        let seq = StopStep::Full.progression();
        assert_eq!(nearest_index(seq, 5.6), Some(5));
        assert_eq!(nearest_index(seq, 6.0), Some(5));
        assert_eq!(nearest_index(seq, 100.0), Some(12));
        assert_eq!(nearest_index(seq, 0.0), Some(0));
        assert_eq!(nearest_index(&[], 4.0), None);
    }

    #[test]
    fn test_nearest_index_tie_takes_lowest() {
        assert_eq!(nearest_index(&[2.0, 4.0], 3.0), Some(0));
        assert_eq!(nearest_index(&[1.0, 3.0, 3.0], 3.0), Some(1));
    }

    #[test]
    fn test_nearest_index_nan_keeps_first() {
        let seq = StopStep::Full.progression();
        assert_eq!(nearest_index(seq, f64::NAN), Some(0));
        assert_eq!(step_adjust(StopStep::Full, f64::NAN, StepDirection::Up), 1.4);
        assert_eq!(step_adjust(StopStep::Full, f64::NAN, StepDirection::Down), 1.0);
    }

    #[test]
    fn test_step_adjust() {
        assert_eq!(step_adjust(StopStep::Full, 2.0, StepDirection::Up), 2.8);
        assert_eq!(step_adjust(StopStep::Full, 2.0, StepDirection::Down), 1.4);
        assert_eq!(step_adjust(StopStep::Half, 5.6, StepDirection::Up), 6.7);
        assert_eq!(step_adjust(StopStep::Third, 1.0, StepDirection::Down), 1.0);
        assert_eq!(step_adjust(StopStep::Third, 32.0, StepDirection::Up), 32.0);
        // off-grid values snap first
        assert_eq!(step_adjust(StopStep::Full, 3.0, StepDirection::Up), 4.0);
    }

    #[test]
    fn test_step_from_str() {
        assert_eq!("full".parse::<StopStep>().unwrap(), StopStep::Full);
        assert_eq!("0.5".parse::<StopStep>().unwrap(), StopStep::Half);
        assert_eq!("0.33".parse::<StopStep>().unwrap(), StopStep::Third);
        assert_eq!("1/3".parse::<StopStep>().unwrap(), StopStep::Third);
        assert!("quarter".parse::<StopStep>().is_err());
    }

    #[test]
    fn test_step_serialization() {
        assert_eq!(serde_json::to_string(&StopStep::Half).unwrap(), "\"half\"");
        let step: StopStep = serde_json::from_str("\"third\"").unwrap();
        assert_eq!(step, StopStep::Third);
    }
}
