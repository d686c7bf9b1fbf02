//! # Table and Chart Rendering
//!
//! Presentation of a [`CalculationResult`]: labels, a plain-text table, the
//! tab-separated clipboard text, chart series and a terminal line chart.
//! Nothing here computes distances; everything indexes `data[row][col]`
//! against the headers.

use serde::{Deserialize, Serialize};

use crate::calculations::{CalculationResult, TableMode};

/// Line colours, cycled per series
pub const SERIES_COLORS: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#f97316", "#84cc16",
];

/// Plot glyphs for the terminal chart, cycled per series
const GLYPHS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

/// Character width of one f-stop column in the terminal chart
const CELL_WIDTH: usize = 8;

/// Column heading for the row labels ("ISO" or "Power")
pub fn mode_heading(mode: TableMode) -> &'static str {
    match mode {
        TableMode::Iso => "ISO",
        TableMode::Power => "Power",
    }
}

/// Row label: "ISO 100" or "1/2"
pub fn row_label(mode: TableMode, header: &str) -> String {
    match mode {
        TableMode::Iso => format!("ISO {header}"),
        TableMode::Power => format!("1/{header}"),
    }
}

/// Column label: "f/2.8"
pub fn column_label(header: &str) -> String {
    format!("f/{header}")
}

/// Table title: "Flash Distance Table (meters)"
pub fn table_title(result: &CalculationResult) -> String {
    format!("Flash Distance Table ({})", result.units)
}

/// Caption printed under the table
pub fn table_note(result: &CalculationResult) -> String {
    format!(
        "Distances shown in {}. Values calculated using guide number formula.",
        result.units
    )
}

/// Tab-separated text for pasting into a spreadsheet.
///
/// ```rust
/// use flash_core::calculations::compute_iso_table;
/// use flash_core::render::to_clipboard_text;
/// use flash_core::units::DistanceUnit;
///
/// let table = compute_iso_table(32.0, &[100.0], &[4.0], DistanceUnit::Meters).unwrap();
/// assert_eq!(
///     to_clipboard_text(&table),
///     "Flash Distance Table (meters)\n\n\tf/4\n100\t8.0\n"
/// );
/// ```
pub fn to_clipboard_text(result: &CalculationResult) -> String {
    let mut text = format!("{}\n\n", table_title(result));

    let columns: Vec<String> = result.column_headers.iter().map(|h| column_label(h)).collect();
    text.push('\t');
    text.push_str(&columns.join("\t"));
    text.push('\n');

    for (header, row) in result.row_headers.iter().zip(&result.data) {
        let cells: Vec<String> = row.iter().map(|d| format!("{d:.1}")).collect();
        text.push_str(header);
        text.push('\t');
        text.push_str(&cells.join("\t"));
        text.push('\n');
    }
    text
}

/// Aligned plain-text table with title and caption.
pub fn to_text_table(result: &CalculationResult) -> String {
    let mut header = vec![mode_heading(result.mode).to_string()];
    header.extend(result.column_headers.iter().map(|h| column_label(h)));

    let rows: Vec<Vec<String>> = result
        .row_headers
        .iter()
        .zip(&result.data)
        .map(|(h, row)| {
            let mut cells = vec![row_label(result.mode, h)];
            cells.extend(row.iter().map(|d| format!("{d:.1}")));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let format_line = |cells: &[String]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{cell:<w$}")
                } else {
                    format!("{cell:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

    let mut out = format!("{}\n\n", table_title(result));
    out.push_str(&format_line(&header));
    out.push('\n');
    out.push_str(&"-".repeat(rule_width));
    out.push('\n');
    for row in &rows {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&table_note(result));
    out.push('\n');
    out
}

/// One point on a chart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// F-stop label ("f/4")
    pub x: String,
    /// Distance
    pub y: f64,
}

/// One chart line: a table row plotted across the f-stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Legend label ("ISO 100", "1/2")
    pub label: String,
    /// Line colour
    pub color: String,
    /// One point per column
    pub points: Vec<ChartPoint>,
}

/// Chart data: one series per row, one point per column.
pub fn chart_series(result: &CalculationResult) -> Vec<ChartSeries> {
    result
        .row_headers
        .iter()
        .zip(&result.data)
        .enumerate()
        .map(|(i, (header, row))| ChartSeries {
            label: row_label(result.mode, header),
            color: SERIES_COLORS[i % SERIES_COLORS.len()].to_string(),
            points: result
                .column_headers
                .iter()
                .zip(row)
                .map(|(col, &y)| ChartPoint {
                    x: column_label(col),
                    y,
                })
                .collect(),
        })
        .collect()
}

/// Terminal line chart, `height` text rows tall (minimum 2).
///
/// Each series is drawn with its own glyph; the legend maps glyphs to rows.
pub fn render_ascii_chart(result: &CalculationResult, height: usize) -> String {
    let height = height.max(2);
    let mut out = format!("Flash Distance Chart ({})\n", result.units);

    let max = result.data.iter().flatten().copied().fold(0.0_f64, f64::max);
    if result.is_empty() || max <= 0.0 {
        out.push_str("(no data)\n");
        return out;
    }

    let columns = result.column_count();
    let mut grid = vec![vec![' '; columns * CELL_WIDTH]; height];
    for (s, row) in result.data.iter().enumerate() {
        let glyph = GLYPHS[s % GLYPHS.len()];
        for (c, &y) in row.iter().enumerate() {
            let level = ((y / max) * (height - 1) as f64).round() as usize;
            let r = height - 1 - level.min(height - 1);
            grid[r][c * CELL_WIDTH + CELL_WIDTH / 2] = glyph;
        }
    }

    out.push_str(&format!("Distance ({})\n", result.units));
    for (i, line) in grid.iter().enumerate() {
        let y = max * (height - 1 - i) as f64 / (height - 1) as f64;
        let text: String = line.iter().collect();
        out.push_str(&format!("{y:>7.1} |{}\n", text.trim_end()));
    }
    out.push_str(&format!("{:>7} +{}\n", "", "-".repeat(columns * CELL_WIDTH)));

    let labels: String = result
        .column_headers
        .iter()
        .map(|h| format!("{:^w$}", column_label(h), w = CELL_WIDTH))
        .collect();
    out.push_str(&format!("{:>7}  {}\n", "", labels.trim_end()));

    let legend: Vec<String> = result
        .row_headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{} {}", GLYPHS[i % GLYPHS.len()], row_label(result.mode, h)))
        .collect();
    out.push_str(&legend.join("  "));
    out.push('\n');
    out
}
