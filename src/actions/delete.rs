//! Duplicate removal using the trash crate.
//!
//! # Overview
//!
//! [`delete`] removes every non-original member of every duplicate group,
//! leaving exactly one copy per group:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (with explicit flag)
//!
//! The first failure stops the run. Files removed before it stay removed.
//!
//! # Example
//!
//! ```no_run
//! use finddup::actions::delete::{delete_to_trash, DeleteMode};
//! use std::path::Path;
//!
//! match delete_to_trash(Path::new("/path/to/duplicate.txt")) {
//!     Ok(size) => println!("Moved {} bytes to trash", size),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::duplicates::{DuplicateIndex, GroupFilter};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// How duplicates are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Move to the system trash.
    #[default]
    Trash,
    /// Remove from disk. Cannot be undone.
    Permanent,
}

/// Outcome of a completed deletion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteSummary {
    /// Files removed.
    pub deleted: usize,
    /// Total bytes freed.
    pub bytes_freed: u64,
    /// Mode used.
    pub mode: DeleteMode,
}

impl DeleteSummary {
    fn new(mode: DeleteMode) -> Self {
        Self {
            deleted: 0,
            bytes_freed: 0,
            mode,
        }
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = match self.mode {
            DeleteMode::Trash => "Moved to trash",
            DeleteMode::Permanent => "Deleted",
        };
        format!(
            "{} {} file(s), freed {}",
            verb,
            self.deleted,
            bytesize::ByteSize::b(self.bytes_freed)
        )
    }
}

/// Move a single file to the system trash and return its size.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata can't be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<u64, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Permanently delete a single file and return its size.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `Io` for any other failure
pub fn permanent_delete(path: &Path) -> Result<u64, DeleteError> {
    let size = fs::metadata(path)
        .map_err(|e| DeleteError::from_io(path, e))?
        .len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::info!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(size)
}

/// Remove every duplicate in `index`, keeping each group's original.
///
/// # Errors
///
/// Returns the first [`DeleteError`] encountered.
pub fn delete(index: &DuplicateIndex, mode: DeleteMode) -> Result<DeleteSummary, DeleteError> {
    let mut summary = DeleteSummary::new(mode);

    for group in index.groups(GroupFilter::DuplicatesOnly) {
        for record in group.duplicates() {
            let freed = match mode {
                DeleteMode::Trash => delete_to_trash(&record.path)?,
                DeleteMode::Permanent => permanent_delete(&record.path)?,
            };
            summary.deleted += 1;
            summary.bytes_freed += freed;
        }
    }

    log::info!("{}", summary.summary());
    Ok(summary)
}
