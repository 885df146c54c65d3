//! Excel exporter implementation

use std::path::{Path, PathBuf};

use crate::core::dates::FILENAME_FORMAT;
use crate::error::DivisasResult;
use crate::types::{DateRange, ExportRequest, QuoteSeries};

/// Writes a cleaned series to a spreadsheet file.
pub trait SpreadsheetWriter: Send + Sync {
    fn write(&self, series: &QuoteSeries, request: &ExportRequest) -> DivisasResult<()>;
}

/// `historial_divisas_cop_<start>_a_<end>.xlsx`
pub fn default_filename(range: &DateRange) -> String {
    format!(
        "historial_divisas_cop_{}_a_{}.xlsx",
        range.start().format(FILENAME_FORMAT),
        range.end().format(FILENAME_FORMAT)
    )
}

/// Default filename placed under `dir`.
pub fn default_destination(dir: &Path, range: &DateRange) -> PathBuf {
    dir.join(default_filename(range))
}

/// `.xlsx` writer backed by rust_xlsxwriter.
///
/// Built without the `xlsx` feature it reports a missing export engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }

    /// Whether the Excel engine was compiled in.
    pub fn is_available() -> bool {
        cfg!(feature = "xlsx")
    }
}

#[cfg(feature = "xlsx")]
impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, series: &QuoteSeries, request: &ExportRequest) -> DivisasResult<()> {
        use crate::error::DivisasError;
        use crate::types::{Symbol, DATE_COLUMN};
        use chrono::Datelike;
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};

        let write_err = |e: XlsxError| DivisasError::Write {
            path: request.destination.clone(),
            message: e.to_string(),
        };

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let value_format = Format::new().set_num_format("0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&request.sheet_name).map_err(write_err)?;

        // Header row
        worksheet
            .write_string_with_format(0, 0, DATE_COLUMN, &header_format)
            .map_err(write_err)?;
        for (idx, symbol) in Symbol::ALL.iter().enumerate() {
            worksheet
                .write_string_with_format(0, idx as u16 + 1, symbol.column_label(), &header_format)
                .map_err(write_err)?;
        }
        worksheet.set_column_width(0, 12).map_err(write_err)?;
        worksheet.set_column_width(1, 22).map_err(write_err)?;
        worksheet.set_column_width(2, 22).map_err(write_err)?;

        // Data rows start at row 1
        for (row_idx, row) in series.rows().iter().enumerate() {
            let excel_row = row_idx as u32 + 1;
            let date = ExcelDateTime::from_ymd(
                row.date.year() as u16,
                row.date.month() as u8,
                row.date.day() as u8,
            )
            .map_err(write_err)?;
            worksheet
                .write_datetime_with_format(excel_row, 0, &date, &date_format)
                .map_err(write_err)?;

            for (idx, symbol) in Symbol::ALL.iter().enumerate() {
                worksheet
                    .write_number_with_format(
                        excel_row,
                        idx as u16 + 1,
                        row.value(*symbol),
                        &value_format,
                    )
                    .map_err(write_err)?;
            }
        }

        workbook.save(&request.destination).map_err(write_err)?;

        tracing::info!(
            path = %request.destination.display(),
            rows = series.len(),
            sheet = %request.sheet_name,
            "saved workbook"
        );
        Ok(())
    }
}

#[cfg(not(feature = "xlsx"))]
impl SpreadsheetWriter for XlsxWriter {
    fn write(&self, series: &QuoteSeries, request: &ExportRequest) -> DivisasResult<()> {
        let _ = series;
        tracing::error!(
            path = %request.destination.display(),
            "excel engine not compiled in"
        );
        Err(crate::error::DivisasError::MissingExportEngine)
    }
}
