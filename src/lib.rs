//! Divisas COP - USD/COP and EUR/COP closing price history to Excel
//!
//! This library downloads daily closing prices for the two Colombian peso
//! pairs over a date range, drops incomplete days, rounds to cents and
//! writes the result to a single-sheet `.xlsx` workbook.
//!
//! # Pipeline
//!
//! - [`core::dates`] parses `dd/mm/yyyy` input and orders the range
//! - [`provider`] fetches raw closes (end date included)
//! - [`core::cleaner`] drops incomplete rows and rounds
//! - [`excel`] writes the `HistorialTasasDeCambio` sheet
//! - [`worker`] runs the whole flow as one background task
//!
//! # Example
//!
//! ```no_run
//! use divisas_cop::core::{dates, Pipeline};
//! use divisas_cop::excel::XlsxWriter;
//! use divisas_cop::provider::{FetchConfig, YahooChartSource};
//! use std::path::PathBuf;
//!
//! # async fn demo() -> divisas_cop::DivisasResult<()> {
//! let resolution = dates::resolve("01/01/2024", "31/01/2024")?;
//! let source = YahooChartSource::new(&FetchConfig::default())?;
//! let pipeline = Pipeline::new(source, XlsxWriter::new());
//!
//! let outcome = pipeline
//!     .run(resolution.range, |name: &str| Some(PathBuf::from(name)), |_| {})
//!     .await?;
//! println!("{}", outcome.status_text());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod provider;
pub mod types;
pub mod worker;

// Re-export commonly used types
pub use error::{DivisasError, DivisasResult};
pub use types::{DateRange, QuoteRow, QuoteSeries, RawQuoteTable, Symbol};
