//! Download orchestration.
//!
//! Each started download is one job: the engine reports snapshots through a
//! bounded channel and a [`ProgressAggregator`] folds them into the stored
//! item, one at a time and in emission order. Jobs are independent; nothing
//! is shared between them except the state store.

mod aggregator;
mod runner;
mod types;

pub use aggregator::ProgressAggregator;
pub use runner::{DownloadOrchestrator, JobHandle};
pub use types::{ApplyOutcome, JobOutcome, OrchestratorError};
