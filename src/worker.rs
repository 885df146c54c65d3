//! Single-shot background download
//!
//! Lets an interactive front end hand the pipeline to a tokio task and keep
//! its own thread free. Only one download runs at a time; the status board is
//! written by the task and read by the front end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::dates;
use crate::core::pipeline::{Phase, Pipeline, RunOutcome};
use crate::error::{DivisasError, DivisasResult};
use crate::excel::SpreadsheetWriter;
use crate::provider::MarketDataSource;
use crate::types::Resolution;

/// Status text shown before the first run.
pub const READY_TEXT: &str = "Ready to start.";

/// What the front end renders: status line plus whether the trigger is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub text: String,
    pub busy: bool,
}

/// Shared status line.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusSnapshot {
                text: READY_TEXT.to_string(),
                busy: false,
            })),
        }
    }
}

impl StatusBoard {
    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().clone()
    }

    fn set_text(&self, text: impl Into<String>) {
        self.lock().text = text.into();
    }

    fn finish(&self, text: impl Into<String>) {
        let mut status = self.lock();
        status.text = text.into();
        status.busy = false;
    }

    fn begin(&self, text: impl Into<String>) {
        let mut status = self.lock();
        status.text = text.into();
        status.busy = true;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatusSnapshot> {
        // A panicking writer leaves plain data behind; keep rendering it
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Runs at most one pipeline at a time on a tokio runtime.
pub struct DownloadWorker<S, W> {
    pipeline: Arc<Pipeline<S, W>>,
    runtime: Handle,
    status: StatusBoard,
    running: Arc<AtomicBool>,
}

impl<S, W> DownloadWorker<S, W>
where
    S: MarketDataSource + 'static,
    W: SpreadsheetWriter + 'static,
{
    pub fn new(pipeline: Pipeline<S, W>, runtime: Handle) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            runtime,
            status: StatusBoard::default(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle to the status line for the front end.
    pub fn status(&self) -> StatusBoard {
        self.status.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Validate the dates and start a download.
    ///
    /// Bad dates fail here without spawning anything. While a download is
    /// running further calls return `WorkerBusy`. A panic inside the pipeline
    /// ends the run as a failure. `on_complete` runs on the worker task after
    /// the status board has been released, so it may start the next download.
    /// There is no cancellation once started.
    pub fn start<C, F>(
        &self,
        start: &str,
        end: &str,
        choose_destination: C,
        on_complete: F,
    ) -> DivisasResult<(Resolution, JoinHandle<()>)>
    where
        C: FnOnce(&str) -> Option<PathBuf> + Send + 'static,
        F: FnOnce(DivisasResult<RunOutcome>) + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("download requested while another is running");
            return Err(DivisasError::WorkerBusy);
        }

        self.status.begin("Processing dates...");
        let resolution = match dates::resolve(start, end) {
            Ok(resolution) => resolution,
            Err(e) => {
                self.status.finish(e.status_text());
                self.running.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let pipeline = Arc::clone(&self.pipeline);
        let status = self.status.clone();
        let running = Arc::clone(&self.running);
        let range = resolution.range;

        let handle = self.runtime.spawn(async move {
            let progress_board = status.clone();
            // Nested so a panic inside the pipeline still releases the controls
            let run = tokio::spawn(async move {
                pipeline
                    .run(range, choose_destination, move |phase: Phase| {
                        progress_board.set_text(phase.to_string())
                    })
                    .await
            });
            let result = match run.await {
                Ok(result) => result,
                Err(e) => Err(DivisasError::Task(format!("download task failed: {}", e))),
            };

            match &result {
                Ok(outcome) => {
                    info!(status = %outcome.status_text(), "download finished");
                    status.finish(outcome.status_text());
                }
                Err(e) => {
                    error!(error = %e, "download failed");
                    status.finish(e.status_text());
                }
            }
            running.store(false, Ordering::SeqCst);
            on_complete(result);
        });

        Ok((resolution, handle))
    }
}
