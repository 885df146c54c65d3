//! Yahoo Finance chart API source

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{FetchConfig, MarketDataSource};
use crate::error::{DivisasError, DivisasResult};
use crate::types::{FetchWindow, RawQuoteTable, Symbol};

/// Daily closes from the v8 chart endpoint, one request per symbol.
#[derive(Debug, Clone)]
pub struct YahooChartSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartSource {
    pub fn new(config: &FetchConfig) -> DivisasResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DivisasError::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Chart URL for one symbol.
    ///
    /// Bars are stamped in exchange local time, which can fall on the previous
    /// UTC day, so `period1` starts one day early; callers filter by date.
    pub fn chart_url(&self, symbol: Symbol, window: FetchWindow) -> String {
        let widened_start = window
            .start
            .checked_sub_days(Days::new(1))
            .unwrap_or(window.start);
        let period1 = unix_midnight(widened_start);
        let period2 = unix_midnight(window.end_exclusive);
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url,
            symbol.ticker(),
            period1,
            period2
        )
    }

    async fn fetch_symbol(
        &self,
        symbol: Symbol,
        window: FetchWindow,
    ) -> DivisasResult<RawQuoteTable> {
        let url = self.chart_url(symbol, window);
        debug!(%url, "requesting chart");

        let response = self
            .client
            .get(&url)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DivisasError::Fetch(format!("request timeout for {}: {}", symbol, e))
                } else if e.is_connect() {
                    DivisasError::Fetch(format!("connection failed for {}: {}", symbol, e))
                } else {
                    DivisasError::Fetch(format!("request failed for {}: {}", symbol, e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DivisasError::Fetch(format!("failed to read response body: {}", e)))?;

        if status == reqwest::StatusCode::NOT_FOUND {
            // Unknown range or symbol: treated as no data, not a transport failure
            warn!(%symbol, "provider returned 404");
            return Ok(RawQuoteTable::new());
        }
        if !status.is_success() {
            return Err(DivisasError::Fetch(format!(
                "provider returned status {} for {}",
                status.as_u16(),
                symbol
            )));
        }

        parse_chart(&body, symbol)
    }
}

#[async_trait]
impl MarketDataSource for YahooChartSource {
    async fn fetch_closes(
        &self,
        symbols: &[Symbol],
        window: FetchWindow,
    ) -> DivisasResult<RawQuoteTable> {
        let mut table = RawQuoteTable::new();
        for &symbol in symbols {
            let part = self.fetch_symbol(symbol, window).await?;
            info!(%symbol, rows = part.len(), "downloaded closes");
            table.merge(part);
        }

        // Every symbol gets an explicit entry on every date so gaps stay visible
        let dates: Vec<NaiveDate> = table
            .dates()
            .filter(|d| *d >= window.start && *d < window.end_exclusive)
            .collect();
        let mut joined = RawQuoteTable::new();
        for date in dates {
            for &symbol in symbols {
                joined.insert(date, symbol, table.close(date, symbol));
            }
        }
        Ok(joined)
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Parse a chart payload into closes for `symbol`.
///
/// A result without timestamps (no trading in the window) yields an empty table.
pub fn parse_chart(body: &str, symbol: Symbol) -> DivisasResult<RawQuoteTable> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DivisasError::Fetch(format!("failed to parse chart for {}: {}", symbol, e)))?;

    if let Some(error) = response.chart.error {
        return Err(DivisasError::Fetch(format!(
            "chart API error for {}: {} ({})",
            symbol, error.description, error.code
        )));
    }

    let mut table = RawQuoteTable::new();
    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(table);
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(table);
    };
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let offset = result.meta.map(|m| m.gmtoffset).unwrap_or(0);

    for (i, ts) in timestamps.into_iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| DivisasError::Fetch(format!("invalid timestamp {} for {}", ts, symbol)))?
            .date_naive();
        let close = closes.get(i).copied().flatten();
        table.insert(date, symbol, close);
    }

    Ok(table)
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
