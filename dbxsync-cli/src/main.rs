//! dbxsync — mirror a Dropbox account into a local folder.
//!
//! # Usage
//!
//! ```text
//! dbxsync -p <path> [-r <probability>] [-o] [-l] [-f] [-e <ext>...] [-d] [--seed <n>]
//! ```
//!
//! The access token is read from `DBX_TOKEN` (a `.env` file in the working
//! directory is loaded first).

mod reporter;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dbxsync_core::{validate_destination, ConfigError, Probability, SyncOptions};
use dbxsync_dropbox::{DropboxClient, TOKEN_ENV};
use dbxsync_sync::{pipeline, SyncOutcome};

use reporter::LogReporter;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "dbxsync",
    version,
    about = "Update a given folder to the current Dropbox data",
    long_about = None,
)]
struct Cli {
    /// Path to the output folder (must already exist).
    #[arg(short, long)]
    path: PathBuf,

    /// Probability of each missing file being downloaded, in (0.0, 1.0].
    #[arg(
        short,
        long,
        default_value_t = 1.0,
        value_name = "PROBABILITY",
        allow_negative_numbers = true
    )]
    random: f64,

    /// Write a dbx_<date>.out report of all new files into the output folder.
    #[arg(short, long)]
    out: bool,

    /// Log created folders and downloaded files to the terminal.
    #[arg(short, long)]
    log: bool,

    /// Download every file directly into the output folder, without subfolders.
    #[arg(short, long)]
    flat: bool,

    /// File extensions to exclude from download (e.g. `-e jpg png`).
    #[arg(short, long, num_args = 0.., value_name = "EXT")]
    exclude: Vec<String>,

    /// Simulate the sync without creating folders or downloading files.
    #[arg(short, long)]
    dry_run: bool,

    /// Seed for random sampling, for reproducible subsets.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Validated run options. Fails before any network or disk work.
    fn options(&self) -> Result<SyncOptions, ConfigError> {
        validate_destination(&self.path)?;
        Ok(SyncOptions {
            probability: Probability::new(self.random)?,
            flat: self.flat,
            dry_run: self.dry_run,
            emit_log: self.log,
            emit_output_file: self.out,
            seed: self.seed,
            ..SyncOptions::default()
        }
        .with_excludes(&self.exclude))
    }

    fn run(self) -> Result<()> {
        let options = self.options()?;
        let token = load_token()?;
        let client = DropboxClient::new(&token);
        let mut reporter = LogReporter::new(options.emit_log);

        let outcome = pipeline::run(&client, &self.path, &options, &mut reporter)
            .with_context(|| format!("sync into '{}' failed", self.path.display()))?;

        print_results(&outcome, &options);
        Ok(())
    }
}

/// Reads the access token, loading `.env` first. Variables already set in
/// the environment take precedence.
fn load_token() -> Result<String, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => log::warn!("ignoring unreadable .env file: {err}"),
    }
    std::env::var(TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ConfigError::MissingToken { var: TOKEN_ENV })
}

fn print_results(outcome: &SyncOutcome, options: &SyncOptions) {
    let prefix = if options.dry_run { "[dry-run] " } else { "" };
    let s = &outcome.summary;

    if let Some(path) = &outcome.output_file {
        let name = path.file_name().unwrap_or(path.as_os_str());
        println!("Output written to {}", name.to_string_lossy());
    } else if options.dry_run && options.emit_output_file {
        println!("{prefix}action log:");
        print!("{}", outcome.action_log.render());
    }

    println!(
        "{prefix}✓ synced ({} folders created, {} files downloaded, {} skipped, {} errors)",
        s.folders_created,
        s.files_downloaded,
        s.skipped(),
        s.errors
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();
    cli.run()
}
