//! # dbxsync-sync
//!
//! The reconciliation engine: walks a remote tree, decides per entry what to
//! create or download given the local manifest and the run options, and
//! materializes the result (or previews it under dry-run).
//!
//! Call [`pipeline::run`] for a full run, or drive a [`SyncContext`] with
//! [`walk`] when the manifest is built elsewhere.

pub mod decision;
pub mod error;
pub mod event;
pub mod materializer;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod pipeline;
pub mod report;
pub mod walker;

pub use decision::{decide_file, decide_folder, FileDecision, FolderDecision, SkipReason};
pub use error::SyncError;
pub use event::{Reporter, SyncEvent, SyncSummary};
pub use materializer::Materializer;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryRemote;
pub use pipeline::{run, run_at, SyncOutcome};
pub use report::{output_file_name, write_output_file_at, ActionLog};
pub use walker::{walk, walk_from, SyncContext};
