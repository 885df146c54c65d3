//! Excel export
//!
//! Writes cleaned quote series to a single-sheet `.xlsx` workbook.

mod exporter;

pub use exporter::{default_destination, default_filename, SpreadsheetWriter, XlsxWriter};
