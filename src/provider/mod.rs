//! Market data providers
//!
//! The pipeline only sees the [`MarketDataSource`] trait, so the cleaning and
//! export logic can run against an in-memory source in tests.

mod yahoo;

use async_trait::async_trait;

use crate::error::DivisasResult;
use crate::types::{FetchWindow, RawQuoteTable, Symbol};

pub use yahoo::YahooChartSource;

/// Default provider endpoint.
pub const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Quote-history provider.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily closes for `symbols` over `window` (`end_exclusive` not included).
    ///
    /// An empty table means the provider had nothing for the window.
    async fn fetch_closes(
        &self,
        symbols: &[Symbol],
        window: FetchWindow,
    ) -> DivisasResult<RawQuoteTable>;
}

/// Provider connection settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("divisas-cop/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
