//! Download → clean → export pipeline
//!
//! Both collaborators are injected: any [`MarketDataSource`] feeds the
//! cleaner and any [`SpreadsheetWriter`] receives the result, so the whole
//! flow runs offline in tests.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use super::cleaner;
use crate::error::{DivisasError, DivisasResult};
use crate::excel::{default_filename, SpreadsheetWriter};
use crate::provider::MarketDataSource;
use crate::types::{DateRange, ExportRequest, QuoteSeries, RawQuoteTable, Symbol};

/// Pipeline progress, reported before each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Downloading(DateRange),
    Processing,
    PreparingSave,
    Saving(PathBuf),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Downloading(range) => write!(f, "Downloading data for: {}...", range),
            Phase::Processing => f.write_str("Processing downloaded data..."),
            Phase::PreparingSave => f.write_str("Preparing to save file..."),
            Phase::Saving(path) => write!(f, "Saving file: {}...", file_label(path)),
        }
    }
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Saved { path: PathBuf, series: QuoteSeries },
    /// The destination chooser declined; nothing was written.
    Cancelled,
}

impl RunOutcome {
    /// Final status-line text.
    pub fn status_text(&self) -> String {
        match self {
            RunOutcome::Saved { path, .. } => format!("Success! Saved to {}", file_label(path)),
            RunOutcome::Cancelled => "Save cancelled.".to_string(),
        }
    }
}

/// File name portion of a path, for status lines.
pub fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Pipeline<S, W> {
    source: S,
    writer: W,
    symbols: Vec<Symbol>,
}

impl<S, W> Pipeline<S, W>
where
    S: MarketDataSource,
    W: SpreadsheetWriter,
{
    /// Pipeline over the fixed USD/COP and EUR/COP symbol set.
    pub fn new(source: S, writer: W) -> Self {
        Self {
            source,
            writer,
            symbols: Symbol::ALL.to_vec(),
        }
    }

    /// Fetch raw closes for `range`, end day included.
    ///
    /// Fails with `EmptyResult` when the provider has nothing for the range.
    #[instrument(skip_all, fields(range = %range))]
    pub async fn fetch(&self, range: &DateRange) -> DivisasResult<RawQuoteTable> {
        let window = range.fetch_window();
        let mut raw = self.source.fetch_closes(&self.symbols, window).await?;
        raw.retain_range(range);

        if raw.is_empty() {
            warn!("provider returned no rows");
            return Err(DivisasError::EmptyResult {
                start: range.start(),
                end: range.end(),
            });
        }
        info!(rows = raw.len(), "fetched raw closes");
        Ok(raw)
    }

    /// Run the whole flow.
    ///
    /// `choose_destination` receives the default filename once the data is
    /// clean and returns the target path, or `None` to cancel. It runs on
    /// the blocking pool, so it may wait on a user. `progress` is called
    /// before every step.
    pub async fn run<C, P>(
        &self,
        range: DateRange,
        choose_destination: C,
        progress: P,
    ) -> DivisasResult<RunOutcome>
    where
        C: FnOnce(&str) -> Option<PathBuf> + Send + 'static,
        P: Fn(Phase) + Send + Sync,
    {
        progress(Phase::Downloading(range));
        let raw = self.fetch(&range).await?;

        progress(Phase::Processing);
        let series = cleaner::clean(&raw)?;

        progress(Phase::PreparingSave);
        let default_name = default_filename(&range);
        let chosen = tokio::task::spawn_blocking(move || choose_destination(&default_name))
            .await
            .map_err(|e| DivisasError::Task(format!("destination chooser failed: {}", e)))?;
        let Some(destination) = chosen else {
            info!("save cancelled");
            return Ok(RunOutcome::Cancelled);
        };

        progress(Phase::Saving(destination.clone()));
        let request = ExportRequest::new(destination);
        self.writer.write(&series, &request)?;

        Ok(RunOutcome::Saved {
            path: request.destination,
            series,
        })
    }
}
