//! Validated run options.
//!
//! Options are built once from user input, validated, and read-only for the
//! rest of the run.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Probability
// ---------------------------------------------------------------------------

/// Per-file download probability.
///
/// User input is validated against `(0.0, 1.0]`. [`Probability::never`]
/// is the only way to get `0.0`, which never samples a file.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Validates `value` against `(0.0, 1.0]`.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::ProbabilityOutOfRange { value })
        }
    }

    /// Every file passes the sampling check.
    pub fn always() -> Self {
        Self(1.0)
    }

    /// No file passes the sampling check.
    pub fn never() -> Self {
        Self(0.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `draw` is a uniform sample from `[0, 1)`; a draw at or below the
    /// probability is included.
    pub fn admits(self, draw: f64) -> bool {
        self.0 > 0.0 && draw <= self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// SyncOptions
// ---------------------------------------------------------------------------

/// Run parameters consumed by the sync engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOptions {
    pub probability: Probability,
    /// Place every file directly in the destination root.
    pub flat: bool,
    /// Decide and log everything, but write nothing.
    pub dry_run: bool,
    /// Extensions (without the leading dot) that are never downloaded.
    pub exclude_extensions: BTreeSet<String>,
    /// Show per-entry progress, not just errors.
    pub emit_log: bool,
    /// Write the action log to `dbx_<date>.out` in the destination root.
    pub emit_output_file: bool,
    /// Seed for the sampling RNG; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl SyncOptions {
    /// Replaces the exclusion list, stripping leading dots (`.jpg` → `jpg`)
    /// and dropping empty entries.
    pub fn with_excludes<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_owned())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn is_excluded(&self, extension: &str) -> bool {
        self.exclude_extensions.contains(extension)
    }
}

/// Checks that the sync destination exists and is a directory.
pub fn validate_destination(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::DestinationNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(ConfigError::DestinationNotDir {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
