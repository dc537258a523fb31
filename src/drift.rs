//! Drift detection between a header and the version it replaced.
//!
//! Each job captures the previous bytes before writing and compares them
//! afterwards. Jobs return their own [`DriftReport`]; the run folds them into
//! a single [`RunOutcome`] instead of sharing a mutable flag.

use crate::config::Platform;
use crate::error::RegenError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const END_OF_FILE: &str = "<end of file>";

/// First pair of differing lines, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub line: usize,
    pub actual: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub path: PathBuf,
    pub changed: bool,
    pub first_difference: Option<LineDiff>,
}

/// Previous content of a header, held across its regeneration.
#[derive(Debug)]
pub struct ChangeDetector {
    path: PathBuf,
    platform: Platform,
    previous: Vec<u8>,
}

impl ChangeDetector {
    /// Capture the current content of `path`. A missing file counts as empty.
    ///
    /// On POSIX both sides are read with newlines normalized to `\n`; on
    /// Windows they are compared byte for byte.
    pub fn capture(path: &Path, platform: Platform) -> Result<Self, RegenError> {
        Ok(Self {
            path: path.to_path_buf(),
            platform,
            previous: read_text(path, platform)?,
        })
    }

    /// Compare the freshly written file against the captured content.
    /// `locate` also finds the first differing line.
    pub fn finish(self, locate: bool) -> Result<DriftReport, RegenError> {
        let current = read_text(&self.path, self.platform)?;
        let changed = current != self.previous;
        let first_difference = if changed && locate {
            first_difference(&self.previous, &current)
        } else {
            None
        };
        Ok(DriftReport {
            path: self.path,
            changed,
            first_difference,
        })
    }
}

fn read_or_empty(path: &Path) -> io::Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

fn read_text(path: &Path, platform: Platform) -> io::Result<Vec<u8>> {
    let bytes = read_or_empty(path)?;
    Ok(match platform {
        Platform::Posix => normalize_newlines(bytes),
        Platform::Windows => bytes,
    })
}

/// Rewrite `\r\n` and then any lone `\r` as `\n`.
pub fn normalize_newlines(bytes: Vec<u8>) -> Vec<u8> {
    if !bytes.contains(&b'\r') {
        return bytes;
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(b) = iter.next() {
        if b == b'\r' {
            iter.next_if_eq(&b'\n');
            out.push(b'\n');
        } else {
            out.push(b);
        }
    }
    out
}

/// Locate the first line where `current` departs from `previous`.
///
/// When one side is a line-prefix of the other, the first line past the
/// shorter side is reported with the missing side shown as `<end of file>`.
pub fn first_difference(previous: &[u8], current: &[u8]) -> Option<LineDiff> {
    let previous = String::from_utf8_lossy(previous);
    let current = String::from_utf8_lossy(current);
    let old_lines: Vec<&str> = previous.split('\n').collect();
    let new_lines: Vec<&str> = current.split('\n').collect();

    let shared = old_lines.len().min(new_lines.len());
    if let Some(i) = (0..shared).find(|&i| old_lines[i] != new_lines[i]) {
        return Some(LineDiff {
            line: i + 1,
            actual: new_lines[i].to_string(),
            expected: old_lines[i].to_string(),
        });
    }

    if old_lines.len() == new_lines.len() {
        return None;
    }
    Some(LineDiff {
        line: shared + 1,
        actual: new_lines.get(shared).unwrap_or(&END_OF_FILE).to_string(),
        expected: old_lines.get(shared).unwrap_or(&END_OF_FILE).to_string(),
    })
}

/// Render carriage returns visibly so CRLF drift is obvious in CI logs.
pub fn visible(line: &str) -> String {
    line.replace('\r', "\\r")
}

/// Drift across every job of a run, collected from the per-job reports.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub reports: Vec<DriftReport>,
}

impl RunOutcome {
    pub fn changed(&self) -> bool {
        self.reports.iter().any(|r| r.changed)
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &DriftReport> {
        self.reports.iter().filter(|r| r.changed)
    }
}

impl FromIterator<DriftReport> for RunOutcome {
    fn from_iter<I: IntoIterator<Item = DriftReport>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}
