//! JSON report of a finished scan.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "af1349b9...",
//!       "size": 1024,
//!       "files": ["/data/a.txt", "/data/b.txt"]
//!     }
//!   ],
//!   "summary": {
//!     "files_parsed": 3,
//!     "scanned_bytes": 3072,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 1,
//!     "duplicate_bytes": 1024,
//!     "exit_code": 0,
//!     "exit_code_name": "FD000"
//!   }
//! }
//! ```
//!
//! The first path of each `files` array is the group's original.

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, DuplicateIndex, GroupFilter, ScanStatistics};
use crate::error::ExitCode;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Digest as 64 lowercase hex characters
    pub hash: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Member paths, original first
    pub files: Vec<String>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.digest_hex(),
            size: group.size(),
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub files_parsed: usize,
    pub scanned_bytes: u64,
    pub duplicate_groups: usize,
    pub duplicate_files: usize,
    pub duplicate_bytes: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Build from scan statistics and the run's exit code.
    #[must_use]
    pub fn new(stats: &ScanStatistics, exit_code: ExitCode) -> Self {
        Self {
            files_parsed: stats.files_parsed,
            scanned_bytes: stats.scanned_bytes,
            duplicate_groups: stats.group_count,
            duplicate_files: stats.duplicate_count,
            duplicate_bytes: stats.duplicate_bytes,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Groups with two or more members, in discovery order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create the report for `index`.
    ///
    /// # Example
    ///
    /// ```
    /// use finddup::duplicates::DuplicateIndex;
    /// use finddup::error::ExitCode;
    /// use finddup::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&DuplicateIndex::new(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(index: &DuplicateIndex, exit_code: ExitCode) -> Self {
        Self {
            duplicates: index
                .groups(GroupFilter::DuplicatesOnly)
                .map(JsonDuplicateGroup::from)
                .collect(),
            summary: JsonSummary::new(&index.report(), exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
