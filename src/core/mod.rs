//! Date resolution, cleaning and the download pipeline

pub mod cleaner;
pub mod dates;
pub mod pipeline;

pub use cleaner::{clean, round_to_cents};
pub use pipeline::{Phase, Pipeline, RunOutcome};
