use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Worksheet name used for every export.
pub const SHEET_NAME: &str = "HistorialTasasDeCambio";

/// Header of the date column in the exported sheet.
pub const DATE_COLUMN: &str = "Date";

//==============================================================================
// Date Ranges
//==============================================================================

/// Inclusive calendar range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from two dates in any order.
    ///
    /// Returns the normalized range and whether the inputs had to be swapped.
    pub fn normalized(a: NaiveDate, b: NaiveDate) -> (Self, bool) {
        if a > b {
            (Self { start: b, end: a }, true)
        } else {
            (Self { start: a, end: b }, false)
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Provider request window covering this range, end day included.
    pub fn fetch_window(&self) -> FetchWindow {
        FetchWindow {
            start: self.start,
            end_exclusive: self
                .end
                .checked_add_days(Days::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Output of the date resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub range: DateRange,
    /// The user entered the dates in reverse order.
    pub swapped: bool,
}

/// Request boundary sent to the provider. `end_exclusive` is one day past
/// the last day the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end_exclusive: NaiveDate,
}

//==============================================================================
// Symbols
//==============================================================================

/// Currency pairs exported by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    UsdCop,
    EurCop,
}

impl Symbol {
    /// Fixed symbol set, in output column order.
    pub const ALL: [Symbol; 2] = [Symbol::UsdCop, Symbol::EurCop];

    /// Provider ticker.
    pub fn ticker(&self) -> &'static str {
        match self {
            Symbol::UsdCop => "USDCOP=X",
            Symbol::EurCop => "EURCOP=X",
        }
    }

    /// Column header in the exported sheet.
    pub fn column_label(&self) -> &'static str {
        match self {
            Symbol::UsdCop => "Valor Cierre USD/COP",
            Symbol::EurCop => "Valor Cierre EUR/COP",
        }
    }

    pub fn pair(&self) -> &'static str {
        match self {
            Symbol::UsdCop => "USD/COP",
            Symbol::EurCop => "EUR/COP",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

//==============================================================================
// Quote Tables
//==============================================================================

/// Provider-native closing prices keyed by trading date.
///
/// A date reported for only one symbol leaves the other one missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuoteTable {
    rows: BTreeMap<NaiveDate, BTreeMap<Symbol, Option<f64>>>,
}

impl RawQuoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a close (or a known gap when `close` is `None`).
    pub fn insert(&mut self, date: NaiveDate, symbol: Symbol, close: Option<f64>) {
        self.rows.entry(date).or_default().insert(symbol, close);
    }

    pub fn close(&self, date: NaiveDate, symbol: Symbol) -> Option<f64> {
        self.rows
            .get(&date)
            .and_then(|row| row.get(&symbol))
            .copied()
            .flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Trading dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    /// Number of dates with a present close for `symbol`.
    pub fn available(&self, symbol: Symbol) -> usize {
        self.rows
            .values()
            .filter(|row| matches!(row.get(&symbol), Some(Some(_))))
            .count()
    }

    /// Merge another table in, later values win.
    pub fn merge(&mut self, other: RawQuoteTable) {
        for (date, row) in other.rows {
            let entry = self.rows.entry(date).or_default();
            for (symbol, close) in row {
                entry.insert(symbol, close);
            }
        }
    }

    /// Drop every date outside `range`.
    pub fn retain_range(&mut self, range: &DateRange) {
        self.rows.retain(|date, _| range.contains(*date));
    }
}

/// One cleaned trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRow {
    pub date: NaiveDate,
    pub usd_cop: f64,
    pub eur_cop: f64,
}

impl QuoteRow {
    pub fn value(&self, symbol: Symbol) -> f64 {
        match symbol {
            Symbol::UsdCop => self.usd_cop,
            Symbol::EurCop => self.eur_cop,
        }
    }
}

/// Cleaned closing prices ready for export, ordered by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSeries {
    rows: Vec<QuoteRow>,
}

impl QuoteSeries {
    /// Build a series, sorting rows by date.
    pub fn new(mut rows: Vec<QuoteRow>) -> Self {
        rows.sort_by_key(|row| row.date);
        Self { rows }
    }

    pub fn rows(&self) -> &[QuoteRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column headers in export order (date column excluded).
    pub fn column_labels(&self) -> [&'static str; 2] {
        [Symbol::UsdCop.column_label(), Symbol::EurCop.column_label()]
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> &[QuoteRow] {
        let skip = self.rows.len().saturating_sub(n);
        &self.rows[skip..]
    }
}

//==============================================================================
// Export
//==============================================================================

/// Where and how to write the cleaned series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub destination: PathBuf,
    pub sheet_name: String,
}

impl ExportRequest {
    /// Request with the fixed sheet name.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            sheet_name: SHEET_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalized_keeps_order() {
        let (range, swapped) = DateRange::normalized(d(2024, 1, 1), d(2024, 1, 31));
        assert!(!swapped);
        assert_eq!(range.start(), d(2024, 1, 1));
        assert_eq!(range.end(), d(2024, 1, 31));
    }

    #[test]
    fn test_normalized_swaps_reversed_dates() {
        let (range, swapped) = DateRange::normalized(d(2024, 1, 31), d(2024, 1, 1));
        assert!(swapped);
        assert_eq!(range.start(), d(2024, 1, 1));
        assert_eq!(range.end(), d(2024, 1, 31));
    }

    #[test]
    fn test_single_day_range_is_not_swapped() {
        let (range, swapped) = DateRange::normalized(d(2024, 2, 29), d(2024, 2, 29));
        assert!(!swapped);
        assert!(range.contains(d(2024, 2, 29)));
    }

    #[test]
    fn test_fetch_window_extends_end_by_one_day() {
        let (range, _) = DateRange::normalized(d(2024, 12, 1), d(2024, 12, 31));
        let window = range.fetch_window();
        assert_eq!(window.start, d(2024, 12, 1));
        assert_eq!(window.end_exclusive, d(2025, 1, 1));
    }

    #[test]
    fn test_raw_table_counts_available_values() {
        let mut raw = RawQuoteTable::new();
        raw.insert(d(2024, 1, 2), Symbol::UsdCop, Some(3900.0));
        raw.insert(d(2024, 1, 2), Symbol::EurCop, Some(4300.0));
        raw.insert(d(2024, 1, 3), Symbol::UsdCop, Some(3910.0));
        raw.insert(d(2024, 1, 3), Symbol::EurCop, None);

        assert_eq!(raw.len(), 2);
        assert_eq!(raw.available(Symbol::UsdCop), 2);
        assert_eq!(raw.available(Symbol::EurCop), 1);
        assert_eq!(raw.close(d(2024, 1, 3), Symbol::EurCop), None);
    }

    #[test]
    fn test_retain_range_drops_outside_dates() {
        let mut raw = RawQuoteTable::new();
        raw.insert(d(2024, 1, 1), Symbol::UsdCop, Some(1.0));
        raw.insert(d(2024, 1, 5), Symbol::UsdCop, Some(1.0));
        let (range, _) = DateRange::normalized(d(2024, 1, 1), d(2024, 1, 4));
        raw.retain_range(&range);
        assert_eq!(raw.dates().collect::<Vec<_>>(), vec![d(2024, 1, 1)]);
    }

    #[test]
    fn test_series_tail() {
        let rows = (1..=7)
            .map(|day| QuoteRow {
                date: d(2024, 1, day),
                usd_cop: day as f64,
                eur_cop: day as f64,
            })
            .collect();
        let series = QuoteSeries::new(rows);
        let tail = series.tail(5);
        assert_eq!(tail.len(), 5);
        assert_eq!(tail[0].date, d(2024, 1, 3));
        assert_eq!(series.tail(50).len(), 7);
    }

    #[test]
    fn test_export_request_uses_fixed_sheet_name() {
        let req = ExportRequest::new("out.xlsx");
        assert_eq!(req.sheet_name, "HistorialTasasDeCambio");
    }
}
