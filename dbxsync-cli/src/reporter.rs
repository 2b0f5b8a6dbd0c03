//! Terminal reporter: turns sync events into colored log lines.
//!
//! Folder creations are blue, downloads green, failures red. Unless `--log`
//! is given only failures are shown.

use std::path::Path;

use colored::Colorize;
use log::Level;

use dbxsync_sync::{Reporter, SyncEvent};

pub struct LogReporter {
    verbose: bool,
}

impl LogReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// The level and text to log for `event`, or `None` when it is hidden.
    fn render(&self, event: &SyncEvent) -> Option<(Level, String)> {
        let line = match event {
            SyncEvent::Started { root, dry_run, manifest_entries } => {
                let mode = if *dry_run { " (dry run)" } else { "" };
                (
                    Level::Info,
                    format!(
                        "Starting Dropbox sync into {}{mode}, {manifest_entries} local entries",
                        root.display()
                    ),
                )
            }
            SyncEvent::FolderCreated { name, local } => (
                Level::Info,
                format!("Created folder: {name} in {}", parent_of(local))
                    .blue()
                    .to_string(),
            ),
            SyncEvent::FileDownloaded { name, local } => (
                Level::Info,
                format!("Downloaded {name} to {}", local.display())
                    .green()
                    .to_string(),
            ),
            SyncEvent::FileSkipped { path, reason } => {
                (Level::Debug, format!("Skipped {path}: {reason:?}"))
            }
            SyncEvent::ListingFailed { path, message } => (
                Level::Error,
                format!("Error listing folder '{path}': {message}")
                    .red()
                    .to_string(),
            ),
            SyncEvent::FolderFailed { name, message } => (
                Level::Error,
                format!("Failed to create folder {name}: {message}")
                    .red()
                    .to_string(),
            ),
            SyncEvent::DownloadFailed { path, message } => (
                Level::Error,
                format!("Error downloading {path}: {message}")
                    .red()
                    .to_string(),
            ),
            SyncEvent::Finished { .. } => {
                (Level::Info, "Sync completed successfully.".to_string())
            }
        };

        if self.verbose || event.is_error() {
            Some(line)
        } else {
            None
        }
    }
}

impl Reporter for LogReporter {
    fn report(&mut self, event: &SyncEvent) {
        if let Some((level, line)) = self.render(event) {
            log::log!(level, "{line}");
        }
    }
}

fn parent_of(local: &Path) -> String {
    local
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
