//! Progress events and the reporter seam.
//!
//! The engine never prints. Everything a user might want to see is handed to
//! a [`Reporter`] as a [`SyncEvent`]; the CLI decides what to show.

use std::path::PathBuf;

use dbxsync_core::RelPath;

use crate::decision::SkipReason;

/// Running totals for a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub folders_created: usize,
    pub files_downloaded: usize,
    pub already_present: usize,
    pub not_sampled: usize,
    pub excluded: usize,
    pub errors: usize,
}

impl SyncSummary {
    pub fn skipped(&self) -> usize {
        self.already_present + self.not_sampled + self.excluded
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::AlreadyPresent => self.already_present += 1,
            SkipReason::NotSampled => self.not_sampled += 1,
            SkipReason::Excluded => self.excluded += 1,
        }
    }
}

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Started {
        root: PathBuf,
        dry_run: bool,
        manifest_entries: usize,
    },
    FolderCreated {
        name: String,
        local: PathBuf,
    },
    FileDownloaded {
        name: String,
        local: PathBuf,
    },
    FileSkipped {
        path: RelPath,
        reason: SkipReason,
    },
    /// A folder listing failed; its subtree was abandoned.
    ListingFailed {
        path: String,
        message: String,
    },
    FolderFailed {
        name: String,
        message: String,
    },
    DownloadFailed {
        path: String,
        message: String,
    },
    Finished {
        summary: SyncSummary,
    },
}

impl SyncEvent {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SyncEvent::ListingFailed { .. }
                | SyncEvent::FolderFailed { .. }
                | SyncEvent::DownloadFailed { .. }
        )
    }
}

/// Receives every [`SyncEvent`] of a run, in order.
pub trait Reporter {
    fn report(&mut self, event: &SyncEvent);
}

/// Collects events; handy for tests and for post-run inspection.
impl Reporter for Vec<SyncEvent> {
    fn report(&mut self, event: &SyncEvent) {
        self.push(event.clone());
    }
}
