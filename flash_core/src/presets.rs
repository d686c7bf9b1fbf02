//! Standard film speeds and flash power settings, and parsing of the
//! comma-separated ISO list typed into the calculator form.

use crate::calculations::format_number;
use crate::errors::{FlashError, FlashResult};

/// Film speeds offered as one-click presets
pub const ISO_PRESETS: [f64; 6] = [50.0, 100.0, 200.0, 400.0, 800.0, 1600.0];

/// Manual power settings used as the rows of a power table (1/1 .. 1/128)
pub const POWER_RATIOS: [f64; 8] = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0];

/// Parse a comma-separated ISO list ("400, 100,200").
///
/// Each entry is read as its leading integer, so "200abc" is 200 and "100.5"
/// is 100. Entries with no leading digits are skipped. The result is sorted
/// ascending with duplicates removed. Fails only if nothing parses.
///
/// ```rust
/// use flash_core::presets::parse_iso_list;
///
/// assert_eq!(parse_iso_list("400, 100, abc, 100").unwrap(), vec![100.0, 400.0]);
/// ```
pub fn parse_iso_list(text: &str) -> FlashResult<Vec<f64>> {
    let values: Vec<f64> = text.split(',').filter_map(leading_integer).collect();

    if values.is_empty() {
        return Err(FlashError::invalid_input(
            "iso_values",
            text,
            "Expected a comma-separated list of ISO values",
        ));
    }

    Ok(sorted_unique(values))
}

/// Add an ISO value to a list if it is not already present. Returns the list
/// sorted ascending.
pub fn add_iso_preset(values: &[f64], iso: f64) -> Vec<f64> {
    let mut out = values.to_vec();
    if !out.contains(&iso) {
        out.push(iso);
    }
    sorted_unique(out)
}

/// Render an ISO list the way the form shows it ("100, 200, 400")
pub fn format_iso_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| format_number(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Integer prefix of a trimmed entry with an optional sign ("-25x" is -25)
fn leading_integer(part: &str) -> Option<f64> {
    let part = part.trim();
    let (sign, rest) = match part.as_bytes().first() {
        Some(b'-') => (-1.0, &part[1..]),
        Some(b'+') => (1.0, &part[1..]),
        _ => (1.0, part),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse::<f64>().ok().map(|v| sign * v)
}

fn sorted_unique(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_list() {
        assert_eq!(
            parse_iso_list("100,200,400,800").unwrap(),
            vec![100.0, 200.0, 400.0, 800.0]
        );
    }

    #[test]
    fn test_parse_sorts_and_dedups() {
        assert_eq!(
            parse_iso_list(" 800, 100 ,400,100,, ").unwrap(),
            vec![100.0, 400.0, 800.0]
        );
    }

    #[test]
    fn test_parse_skips_garbage() {
        assert_eq!(parse_iso_list("x, 200, ISO").unwrap(), vec![200.0]);
        assert!(parse_iso_list("").is_err());
        assert!(parse_iso_list("a, b").is_err());
    }

    #[test]
    fn test_parse_takes_leading_integer() {
        assert_eq!(parse_iso_list("200abc, 100.5").unwrap(), vec![100.0, 200.0]);
        assert_eq!(parse_iso_list("+400, 1e3").unwrap(), vec![1.0, 400.0]);
        assert_eq!(parse_iso_list("-50").unwrap(), vec![-50.0]);
        assert!(parse_iso_list(".5, -, ISO100").is_err());
    }

    #[test]
    fn test_add_iso_preset() {
        assert_eq!(add_iso_preset(&[100.0, 400.0], 200.0), vec![100.0, 200.0, 400.0]);
        assert_eq!(add_iso_preset(&[100.0, 400.0], 400.0), vec![100.0, 400.0]);
    }

    #[test]
    fn test_format_iso_list() {
        assert_eq!(format_iso_list(&[100.0, 200.0, 1600.0]), "100, 200, 1600");
        assert_eq!(format_iso_list(&[]), "");
    }

    #[test]
    fn test_power_ratios_are_halvings() {
        assert!(POWER_RATIOS.windows(2).all(|w| w[1] == w[0] * 2.0));
    }
}
