//! Series cleaner: raw provider closes to an export-ready series.

use tracing::{debug, info};

use crate::error::{DivisasError, DivisasResult};
use crate::types::{QuoteRow, QuoteSeries, RawQuoteTable, Symbol};

/// Round to 2 decimal places, half away from zero on the value scaled by 100.
///
/// `4321.005` becomes `4321.01`.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clean a raw provider table.
///
/// Keeps only dates where both symbols have a finite close, relabels
/// the columns and rounds every value to cents.
pub fn clean(raw: &RawQuoteTable) -> DivisasResult<QuoteSeries> {
    let mut rows = Vec::with_capacity(raw.len());
    let mut dropped = 0usize;

    for date in raw.dates() {
        let usd = raw.close(date, Symbol::UsdCop).filter(|v| v.is_finite());
        let eur = raw.close(date, Symbol::EurCop).filter(|v| v.is_finite());

        match (usd, eur) {
            (Some(usd_cop), Some(eur_cop)) => rows.push(QuoteRow {
                date,
                usd_cop: round_to_cents(usd_cop),
                eur_cop: round_to_cents(eur_cop),
            }),
            _ => {
                debug!(%date, "dropping incomplete row");
                dropped += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(DivisasError::EmptyAfterCleaning);
    }

    info!(kept = rows.len(), dropped, "cleaned closing prices");
    Ok(QuoteSeries::new(rows))
}
