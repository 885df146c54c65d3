//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use divisas_cop::error::{DivisasError, DivisasResult};
use divisas_cop::excel::SpreadsheetWriter;
use divisas_cop::provider::MarketDataSource;
use divisas_cop::types::{ExportRequest, FetchWindow, QuoteSeries, RawQuoteTable, Symbol};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Provider that serves a fixed table and treats the window end as exclusive.
#[derive(Clone, Default)]
pub struct TableSource {
    pub table: RawQuoteTable,
    pub windows: Arc<Mutex<Vec<FetchWindow>>>,
    pub gate: Option<Arc<Notify>>,
}

impl TableSource {
    pub fn new(table: RawQuoteTable) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    /// Block every fetch until `gate` is notified.
    pub fn gated(table: RawQuoteTable, gate: Arc<Notify>) -> Self {
        Self {
            table,
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn windows(&self) -> Vec<FetchWindow> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketDataSource for TableSource {
    async fn fetch_closes(
        &self,
        symbols: &[Symbol],
        window: FetchWindow,
    ) -> DivisasResult<RawQuoteTable> {
        self.windows.lock().unwrap().push(window);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let mut out = RawQuoteTable::new();
        for date in self.table.dates() {
            if date >= window.start && date < window.end_exclusive {
                for &symbol in symbols {
                    out.insert(date, symbol, self.table.close(date, symbol));
                }
            }
        }
        Ok(out)
    }
}

/// Provider that always fails at the transport level.
pub struct FailingSource;

#[async_trait]
impl MarketDataSource for FailingSource {
    async fn fetch_closes(
        &self,
        _symbols: &[Symbol],
        _window: FetchWindow,
    ) -> DivisasResult<RawQuoteTable> {
        Err(DivisasError::Fetch("connection refused".to_string()))
    }
}

/// Writer that records what it was asked to write.
#[derive(Clone, Default)]
pub struct RecordingWriter {
    pub writes: Arc<Mutex<Vec<(QuoteSeries, ExportRequest)>>>,
}

impl RecordingWriter {
    pub fn writes(&self) -> Vec<(QuoteSeries, ExportRequest)> {
        self.writes.lock().unwrap().clone()
    }
}

impl SpreadsheetWriter for RecordingWriter {
    fn write(&self, series: &QuoteSeries, request: &ExportRequest) -> DivisasResult<()> {
        self.writes
            .lock()
            .unwrap()
            .push((series.clone(), request.clone()));
        Ok(())
    }
}

/// Writer standing in for a build without the Excel engine.
pub struct NoEngineWriter;

impl SpreadsheetWriter for NoEngineWriter {
    fn write(&self, _series: &QuoteSeries, _request: &ExportRequest) -> DivisasResult<()> {
        Err(DivisasError::MissingExportEngine)
    }
}

/// Writer that panics mid-save.
pub struct PanickingWriter;

impl SpreadsheetWriter for PanickingWriter {
    fn write(&self, _series: &QuoteSeries, _request: &ExportRequest) -> DivisasResult<()> {
        panic!("disk controller on fire");
    }
}

/// Weekday table for January 2024 with both pairs present.
pub fn january_2024() -> RawQuoteTable {
    let mut table = RawQuoteTable::new();
    for day in 1..=31 {
        let date = d(2024, 1, day);
        if date.weekday().number_from_monday() > 5 {
            continue;
        }
        table.insert(date, Symbol::UsdCop, Some(3900.0 + day as f64 + 0.004));
        table.insert(date, Symbol::EurCop, Some(4250.0 + day as f64 + 0.006));
    }
    table
}
