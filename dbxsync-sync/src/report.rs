//! The action log: an indentation-encoded record of what a run created.
//!
//! ```text
//! +d:a
//! +d:	b
//! +f:	x.txt
//! +f:		y.jpg
//! ```
//!
//! `+d:` marks a folder, `+f:` a file; one tab per level of remote depth.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{io_err, SyncError};

/// Ordered log lines, one per created folder or downloaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionLog {
    lines: Vec<String>,
}

impl ActionLog {
    pub fn folder(&mut self, depth: usize, name: &str) {
        self.push("+d:", depth, name);
    }

    pub fn file(&mut self, depth: usize, name: &str) {
        self.push("+f:", depth, name);
    }

    fn push(&mut self, marker: &str, depth: usize, name: &str) {
        self.lines.push(format!("{marker}{}{name}", "\t".repeat(depth)));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The whole log, every line newline-terminated.
    pub fn render(&self) -> String {
        self.lines.iter().fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
    }
}

/// `dbx_<YYYY-MM-DD>.out`
pub fn output_file_name(date: NaiveDate) -> String {
    format!("dbx_{date}.out")
}

/// Writes the rendered log to `<root>/dbx_<date>.out`, replacing any file
/// from an earlier run on the same day.
pub fn write_output_file_at(
    root: &Path,
    log: &ActionLog,
    date: NaiveDate,
) -> Result<PathBuf, SyncError> {
    let path = root.join(output_file_name(date));
    std::fs::write(&path, log.render()).map_err(|e| io_err(&path, e))?;
    Ok(path)
}
