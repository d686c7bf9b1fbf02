//! # PDF Report
//!
//! Printable report of a distance table, compiled with Typst.
//!
//! - The Typst source is assembled from a template string
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use flash_core::calculations::compute_iso_table;
//! use flash_core::pdf::render_table_pdf;
//! use flash_core::settings::ReportSettings;
//! use flash_core::units::DistanceUnit;
//!
//! let table = compute_iso_table(32.0, &[100.0, 400.0], &[4.0, 5.6], DistanceUnit::Meters).unwrap();
//! let pdf = render_table_pdf(&table, &ReportSettings::default(), &[("Guide number", "32".to_string())]).unwrap();
//! std::fs::write("flash_table.pdf", pdf).unwrap();
//! ```

use chrono::Utc;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::CalculationResult;
use crate::errors::{FlashError, FlashResult};
use crate::render::{column_label, mode_heading, row_label, table_note, table_title};
use crate::settings::ReportSettings;

// ============================================================================
// Typst World Implementation
// ============================================================================

static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    let mut fonts = Vec::new();
    for font_bytes in typst_assets::fonts() {
        let buffer = Bytes::new(font_bytes.to_vec());
        for font in Font::iter(buffer) {
            fonts.push(font);
        }
    }
    log::debug!("Loaded {} bundled fonts for PDF output", fonts.len());
    fonts
});

static FONT_BOOK: Lazy<LazyHash<FontBook>> =
    Lazy::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

/// A minimal Typst world for compiling one in-memory document.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const TABLE_TEMPLATE: &str = r##"
#set page(
  paper: "{{PAPER}}",
  flipped: {{FLIPPED}},
  margin: (top: 0.75in, bottom: 0.75in, left: 0.75in, right: 0.75in),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[Flash Guide]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 11pt)[{{SUBTITLE}}]
  ]
]

#v(12pt)

{{PARAMETERS}}

#table(
  columns: {{COLUMN_COUNT}},
  inset: 6pt,
  stroke: 0.5pt,
  align: (x, y) => if x == 0 { left } else { right },
  table.header({{HEADER_CELLS}}),
{{BODY_ROWS}}
)

#v(8pt)
#text(size: 9pt, fill: gray)[{{NOTE}}]
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render a distance table to PDF.
///
/// `parameters` are printed as a label/value list above the table (guide
/// number, ISO, and so on). Tables wider than eight f-stops are laid out in
/// landscape.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(FlashError::Internal)` - If Typst compilation or PDF export fails
pub fn render_table_pdf(
    result: &CalculationResult,
    report: &ReportSettings,
    parameters: &[(&str, String)],
) -> FlashResult<Vec<u8>> {
    let header_cells = std::iter::once(mode_heading(result.mode).to_string())
        .chain(result.column_headers.iter().map(|h| column_label(h)))
        .map(|cell| format!("[*{}*]", escape_typst(&cell)))
        .collect::<Vec<_>>()
        .join(", ");

    let body_rows = result
        .row_headers
        .iter()
        .zip(&result.data)
        .map(|(header, row)| {
            let mut cells = vec![format!("[{}]", escape_typst(&row_label(result.mode, header)))];
            cells.extend(row.iter().map(|d| format!("[{d:.1}]")));
            format!("  {},", cells.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let source = TABLE_TEMPLATE
        .replace("{{PAPER}}", &sanitize_paper(&report.paper))
        .replace("{{FLIPPED}}", if result.column_count() > 8 { "true" } else { "false" })
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{TITLE}}", &escape_typst(&report.title))
        .replace("{{SUBTITLE}}", &escape_typst(&table_title(result)))
        .replace("{{PARAMETERS}}", &parameter_block(parameters))
        .replace("{{COLUMN_COUNT}}", &(result.column_count() + 1).to_string())
        .replace("{{HEADER_CELLS}}", &header_cells)
        .replace("{{BODY_ROWS}}", &body_rows)
        .replace("{{NOTE}}", &escape_typst(&table_note(result)));

    compile_pdf(source)
}

fn compile_pdf(source: String) -> FlashResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        FlashError::internal(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        FlashError::internal(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })
}

/// Label/value table for the calculation parameters; empty when there are none
fn parameter_block(parameters: &[(&str, String)]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let rows = parameters
        .iter()
        .map(|(label, value)| format!("  [{}:], [{}],", escape_typst(label), escape_typst(value)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("#table(\n  columns: (auto, 1fr),\n  stroke: none,\n  row-gutter: 2pt,\n{rows}\n)\n\n#v(8pt)")
}

/// Paper names are inserted into a string literal; keep only safe characters
fn sanitize_paper(paper: &str) -> String {
    paper
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{compute_iso_table, compute_power_table};
    use crate::units::DistanceUnit;

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("GN #1 [flash]"), "GN \\#1 \\[flash\\]");
        assert_eq!(escape_typst("ISO 100"), "ISO 100");
    }

    #[test]
    fn test_sanitize_paper() {
        assert_eq!(sanitize_paper("us-letter"), "us-letter");
        assert_eq!(sanitize_paper("a4\"); #panic()"), "a4panic");
    }

    #[test]
    fn test_parameter_block() {
        assert_eq!(parameter_block(&[]), "");
        let block = parameter_block(&[("Guide number", "32".to_string())]);
        assert!(block.contains("[Guide number:], [32],"));
    }

    #[test]
    fn test_pdf_generation() {
        let table = compute_iso_table(
            32.0,
            &[100.0, 200.0, 400.0],
            &[2.0, 2.8, 4.0, 5.6, 8.0],
            DistanceUnit::Meters,
        )
        .unwrap();
        let pdf = render_table_pdf(
            &table,
            &ReportSettings::default(),
            &[("Guide number", "32".to_string())],
        );

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_pdf_power_table_landscape() {
        let table = compute_power_table(
            32.0,
            100.0,
            &[1.0, 2.0],
            &[1.0, 1.4, 2.0, 2.8, 4.0, 5.6, 8.0, 11.0, 16.0],
            DistanceUnit::Feet,
        )
        .unwrap();
        let pdf = render_table_pdf(&table, &ReportSettings::default(), &[]).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_bad_paper_is_internal_error() {
        let table = compute_iso_table(32.0, &[100.0], &[4.0], DistanceUnit::Meters).unwrap();
        let report = ReportSettings {
            paper: "not-a-paper".to_string(),
            ..ReportSettings::default()
        };
        let err = render_table_pdf(&table, &report, &[]).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
