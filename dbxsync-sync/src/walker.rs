//! Depth-first walk of the remote tree.
//!
//! The walk uses an explicit stack of folder frames. At each folder, child
//! folders are decided (and created) first, then child files, then the child
//! folders are pushed so they are visited in listing order. A failed listing
//! abandons that folder's subtree only.
//!
//! Each frame carries the remote path used for listing and downloading, and
//! a local path built from entry names alone.

use std::path::PathBuf;

use rand::rngs::StdRng;

use dbxsync_core::{LocalManifest, RelPath, RemoteEntry, RemoteTree, SyncOptions};

use crate::decision::{decide_file, decide_folder, FileDecision};
use crate::event::{Reporter, SyncEvent, SyncSummary};
use crate::materializer::Materializer;
use crate::report::ActionLog;

/// Run-scoped state: the only mutable state of a sync run.
pub struct SyncContext<'a> {
    pub remote: &'a dyn RemoteTree,
    pub options: &'a SyncOptions,
    pub manifest: LocalManifest,
    pub rng: StdRng,
    pub reporter: &'a mut dyn Reporter,
    pub summary: SyncSummary,
    materializer: Materializer,
}

impl<'a> SyncContext<'a> {
    pub fn new(
        remote: &'a dyn RemoteTree,
        options: &'a SyncOptions,
        root: impl Into<PathBuf>,
        manifest: LocalManifest,
        rng: StdRng,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            remote,
            options,
            manifest,
            rng,
            reporter,
            summary: SyncSummary::default(),
            materializer: Materializer::new(root, options.flat, options.dry_run),
        }
    }

    pub fn into_parts(self) -> (SyncSummary, ActionLog) {
        (self.summary, self.materializer.into_log())
    }

    fn report_error(&mut self, event: SyncEvent) {
        self.summary.errors += 1;
        self.reporter.report(&event);
    }
}

struct Frame {
    path: String,
    local: RelPath,
    depth: usize,
}

/// Walk the whole remote tree from its root.
pub fn walk(ctx: &mut SyncContext<'_>) {
    walk_from(ctx, "")
}

/// Walk the remote subtree below `start` (`""` for the remote root).
pub fn walk_from(ctx: &mut SyncContext<'_>, start: &str) {
    let mut stack = vec![Frame {
        path: start.to_string(),
        local: RelPath::from_remote(start),
        depth: 0,
    }];

    while let Some(frame) = stack.pop() {
        let children = match ctx.remote.list_children(&frame.path) {
            Ok(children) => children,
            Err(err) => {
                ctx.report_error(SyncEvent::ListingFailed {
                    path: frame.path.clone(),
                    message: err.to_string(),
                });
                continue;
            }
        };

        let (folders, files): (Vec<RemoteEntry>, Vec<RemoteEntry>) = children
            .into_iter()
            .partition(RemoteEntry::is_folder);

        for folder in &folders {
            visit_folder(ctx, &frame.local, folder, frame.depth);
        }
        for file in &files {
            visit_file(ctx, &frame.local, file, frame.depth);
        }

        stack.extend(folders.into_iter().rev().map(|folder| Frame {
            local: frame.local.join(&folder.name),
            path: folder.path_display,
            depth: frame.depth + 1,
        }));
    }
}

fn visit_folder(ctx: &mut SyncContext<'_>, parent: &RelPath, folder: &RemoteEntry, depth: usize) {
    if !decide_folder(parent, folder, &ctx.manifest, ctx.options).creates() {
        tracing::debug!("folder exists or layout is flat: {}", folder.path_display);
        return;
    }
    match ctx.materializer.create_folder(parent, &folder.name, depth) {
        Ok(local) => {
            ctx.summary.folders_created += 1;
            ctx.reporter.report(&SyncEvent::FolderCreated {
                name: folder.name.clone(),
                local,
            });
        }
        Err(err) => ctx.report_error(SyncEvent::FolderFailed {
            name: folder.name.clone(),
            message: err.to_string(),
        }),
    }
}

fn visit_file(ctx: &mut SyncContext<'_>, parent: &RelPath, file: &RemoteEntry, depth: usize) {
    match decide_file(parent, file, &ctx.manifest, ctx.options, &mut ctx.rng) {
        FileDecision::Skip(reason) => {
            tracing::debug!("skip {} ({reason:?})", file.path_display);
            ctx.summary.record_skip(reason);
            ctx.reporter.report(&SyncEvent::FileSkipped {
                path: parent.join(&file.name),
                reason,
            });
        }
        FileDecision::Download => {
            match ctx.materializer.download_file(ctx.remote, parent, file, depth) {
                Ok(local) => {
                    ctx.summary.files_downloaded += 1;
                    ctx.reporter.report(&SyncEvent::FileDownloaded {
                        name: file.name.clone(),
                        local,
                    });
                }
                Err(err) => ctx.report_error(SyncEvent::DownloadFailed {
                    path: file.path_display.clone(),
                    message: err.to_string(),
                }),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRemote;
    use dbxsync_core::{ManifestEntry, Probability};
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn scenario() -> MemoryRemote {
        MemoryRemote::new()
            .with_file("/a/x.txt", b"x")
            .with_file("/a/b/y.jpg", b"y")
    }

    fn run(
        remote: &MemoryRemote,
        root: &TempDir,
        options: &SyncOptions,
        manifest: LocalManifest,
    ) -> (SyncSummary, ActionLog, Vec<SyncEvent>) {
        let mut events: Vec<SyncEvent> = Vec::new();
        let mut ctx = SyncContext::new(
            remote,
            options,
            root.path(),
            manifest,
            StdRng::seed_from_u64(1),
            &mut events,
        );
        walk(&mut ctx);
        let (summary, log) = ctx.into_parts();
        (summary, log, events)
    }

    #[test]
    fn scenario_log_is_depth_first() {
        let root = TempDir::new().unwrap();
        let (summary, log, _) = run(
            &scenario(),
            &root,
            &SyncOptions::default(),
            LocalManifest::default(),
        );
        assert_eq!(log.lines(), ["+d:a", "+d:\tb", "+f:\tx.txt", "+f:\t\ty.jpg"]);
        assert_eq!(summary.folders_created, 2);
        assert_eq!(summary.files_downloaded, 2);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn present_folder_is_still_walked() {
        let root = TempDir::new().unwrap();
        let manifest: LocalManifest = [ManifestEntry::dir("a"), ManifestEntry::file("a/x.txt")]
            .into_iter()
            .collect();
        let remote = scenario();
        let (summary, log, _) = run(&remote, &root, &SyncOptions::default(), manifest);

        assert_eq!(log.lines(), ["+d:\tb", "+f:\t\ty.jpg"]);
        assert_eq!(summary.already_present, 1);
        assert_eq!(remote.listed(), vec!["", "/a", "/a/b"]);
    }

    #[test]
    fn listing_failure_prunes_only_that_subtree() {
        let root = TempDir::new().unwrap();
        let remote = MemoryRemote::new()
            .with_file("/bad/lost.txt", b"l")
            .with_file("/good/kept.txt", b"k")
            .with_file("/top.txt", b"t")
            .fail_listing("/bad");
        let (summary, _, events) = run(
            &remote,
            &root,
            &SyncOptions::default(),
            LocalManifest::default(),
        );

        assert!(root.path().join("good").join("kept.txt").is_file());
        assert!(root.path().join("top.txt").is_file());
        assert!(!root.path().join("bad").join("lost.txt").exists());
        // The folder itself was created from the parent's listing.
        assert!(root.path().join("bad").is_dir());
        assert_eq!(summary.errors, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, SyncEvent::ListingFailed { path, .. } if path == "/bad")));
    }

    #[test]
    fn download_failure_skips_only_that_file() {
        let root = TempDir::new().unwrap();
        let remote = scenario().fail_download("/a/x.txt");
        let (summary, log, events) = run(
            &remote,
            &root,
            &SyncOptions::default(),
            LocalManifest::default(),
        );

        assert_eq!(log.lines(), ["+d:a", "+d:\tb", "+f:\t\ty.jpg"]);
        assert_eq!(summary.errors, 1);
        assert_eq!(events.iter().filter(|e| e.is_error()).count(), 1);
    }

    #[test]
    fn local_paths_follow_entry_names_not_display_casing() {
        let root = TempDir::new().unwrap();
        let remote = MemoryRemote::new()
            .with_entry("", RemoteEntry::folder("Photos", "/Photos"))
            .with_entry("/Photos", RemoteEntry::folder("Trip", "/photos/Trip"))
            .with_entry("/photos/Trip", RemoteEntry::file("a.jpg", "/PHOTOS/trip/a.jpg"))
            .with_content("/PHOTOS/trip/a.jpg", b"a");
        let (summary, log, _) = run(
            &remote,
            &root,
            &SyncOptions::default(),
            LocalManifest::default(),
        );

        assert_eq!(log.lines(), ["+d:Photos", "+d:\tTrip", "+f:\t\ta.jpg"]);
        assert_eq!(summary.errors, 0);
        let file = root.path().join("Photos").join("Trip").join("a.jpg");
        assert_eq!(std::fs::read(file).unwrap(), b"a");
        assert_eq!(remote.listed(), vec!["", "/Photos", "/photos/Trip"]);
    }

    #[test]
    fn present_file_matched_through_parent_casing() {
        let root = TempDir::new().unwrap();
        let remote = MemoryRemote::new()
            .with_entry("", RemoteEntry::folder("Photos", "/Photos"))
            .with_entry("/Photos", RemoteEntry::file("a.jpg", "/photos/a.jpg"));
        let manifest: LocalManifest = [
            ManifestEntry::dir("Photos"),
            ManifestEntry::file("Photos/a.jpg"),
        ]
        .into_iter()
        .collect();
        let (summary, log, _) = run(&remote, &root, &SyncOptions::default(), manifest);

        assert!(log.is_empty());
        assert_eq!(summary.already_present, 1);
        assert!(remote.fetched().is_empty());
    }

    #[test]
    fn never_probability_downloads_nothing_but_creates_folders() {
        let root = TempDir::new().unwrap();
        let options = SyncOptions {
            probability: Probability::never(),
            ..SyncOptions::default()
        };
        let remote = scenario();
        let (summary, log, _) = run(&remote, &root, &options, LocalManifest::default());

        assert_eq!(log.lines(), ["+d:a", "+d:\tb"]);
        assert_eq!(summary.not_sampled, 2);
        assert!(remote.fetched().is_empty());
    }
}
