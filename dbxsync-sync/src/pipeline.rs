//! Sync orchestration: validate, scan, walk, report, write output.
//!
//! # API pattern
//!
//! - `run_at(…, today)` — explicit date for the output file name; used in tests
//! - `run(…)` — uses today's local date, delegates to `run_at`

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dbxsync_core::{build_manifest, validate_destination, RemoteTree, SyncOptions};

use crate::error::SyncError;
use crate::event::{Reporter, SyncEvent, SyncSummary};
use crate::report::{write_output_file_at, ActionLog};
use crate::walker::{walk, SyncContext};

/// Result of a completed run.
#[derive(Debug)]
pub struct SyncOutcome {
    pub summary: SyncSummary,
    pub action_log: ActionLog,
    /// Set when the action log was written into the destination root.
    pub output_file: Option<PathBuf>,
}

/// Sampling RNG for a run: seeded when `seed` is given, OS entropy otherwise.
pub fn sampling_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Mirror `remote` into `root` under `options`.
///
/// Fails only on configuration or manifest errors; remote and per-entry
/// filesystem failures are reported through `reporter` and counted in the
/// summary. Under dry-run the output file is never written; callers decide
/// where to show the log instead.
pub fn run_at(
    remote: &dyn RemoteTree,
    root: &Path,
    options: &SyncOptions,
    reporter: &mut dyn Reporter,
    today: NaiveDate,
) -> Result<SyncOutcome, SyncError> {
    validate_destination(root)?;
    let manifest = build_manifest(root, options.flat)?;
    tracing::info!(
        "starting sync into {} ({} local entries)",
        root.display(),
        manifest.len()
    );

    reporter.report(&SyncEvent::Started {
        root: root.to_path_buf(),
        dry_run: options.dry_run,
        manifest_entries: manifest.len(),
    });

    let mut ctx = SyncContext::new(
        remote,
        options,
        root,
        manifest,
        sampling_rng(options.seed),
        reporter,
    );
    walk(&mut ctx);
    let (summary, action_log) = ctx.into_parts();

    reporter.report(&SyncEvent::Finished { summary });
    tracing::info!("sync completed");

    let output_file = if options.emit_output_file && !options.dry_run {
        Some(write_output_file_at(root, &action_log, today)?)
    } else {
        None
    };

    Ok(SyncOutcome {
        summary,
        action_log,
        output_file,
    })
}

/// [`run_at`] with today's local date.
pub fn run(
    remote: &dyn RemoteTree,
    root: &Path,
    options: &SyncOptions,
    reporter: &mut dyn Reporter,
) -> Result<SyncOutcome, SyncError> {
    run_at(
        remote,
        root,
        options,
        reporter,
        chrono::Local::now().date_naive(),
    )
}
