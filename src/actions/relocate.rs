//! Moving duplicates into a target directory.
//!
//! # Overview
//!
//! [`relocate`] moves every non-original member of every duplicate group
//! into a single target directory with `rename`. Originals stay where they
//! are. When the target already holds an entry with the mover's name, a
//! random integer is spliced between the stem and the extension
//! (`b.txt` becomes e.g. `b1305112.txt`) and redrawn until the name is free.
//!
//! # Example
//!
//! ```no_run
//! use finddup::actions::relocate::relocate;
//! use finddup::duplicates::{DuplicateFinder, ScanOptions};
//! use std::path::Path;
//!
//! let index = DuplicateFinder::new(ScanOptions::default())
//!     .scan(Path::new("/data"))
//!     .unwrap();
//! let summary = relocate(&index, Path::new("/data/dup")).unwrap();
//! println!("{}", summary.summary());
//! ```

use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::duplicates::{DuplicateIndex, GroupFilter};

/// Range the collision suffix is drawn from.
pub const RENAME_SUFFIX_RANGE: RangeInclusive<u32> = 458_970..=2_000_000_000;

/// Error type for relocation.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// Something other than a directory occupies the target path.
    #[error("target exists and is not a directory: {0}")]
    TargetConflict(PathBuf),

    /// The target directory could not be created.
    #[error("failed to create target directory {path}: {source}")]
    CreateTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A colliding name cannot be split into stem and extension.
    #[error("cannot derive a new name for {0}: expected a UTF-8 name with an extension")]
    MalformedName(PathBuf),

    /// The move itself failed.
    #[error("failed to move {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RelocateError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::TargetConflict(p) | Self::MalformedName(p) => p,
            Self::CreateTarget { path, .. } => path,
            Self::Rename { from, .. } => from,
        }
    }
}

/// Outcome of a completed relocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    /// Files moved into the target.
    pub moved: usize,
    /// Of those, files that needed a new name.
    pub renamed: usize,
    /// Total size of moved files.
    pub bytes: u64,
}

impl RelocationSummary {
    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Moved {} file(s) ({} renamed), {}",
            self.moved,
            self.renamed,
            bytesize::ByteSize::b(self.bytes)
        )
    }
}

/// Move every duplicate into `target`, drawing rename suffixes from the
/// thread-local RNG.
///
/// # Errors
///
/// See [`relocate_with_rng`].
pub fn relocate(index: &DuplicateIndex, target: &Path) -> Result<RelocationSummary, RelocateError> {
    relocate_with_rng(index, target, &mut rand::thread_rng())
}

/// Move every duplicate into `target` using `rng` for rename suffixes.
///
/// # Errors
///
/// - `TargetConflict` if `target` exists but is not a directory
/// - `CreateTarget` if `target` cannot be created
/// - `MalformedName` if a colliding name has no extension or is not UTF-8
/// - `Rename` on the first failed move; files moved before it stay moved
pub fn relocate_with_rng<R: Rng>(
    index: &DuplicateIndex,
    target: &Path,
    rng: &mut R,
) -> Result<RelocationSummary, RelocateError> {
    ensure_target(target)?;

    let mut summary = RelocationSummary::default();
    for group in index.groups(GroupFilter::DuplicatesOnly) {
        for record in group.duplicates() {
            let Some(file_name) = record.path.file_name() else {
                return Err(RelocateError::MalformedName(record.path.clone()));
            };

            let mut destination = target.join(file_name);
            let collided = destination.symlink_metadata().is_ok();
            if collided {
                destination = free_name(target, &record.path, rng)?;
            }

            fs::rename(&record.path, &destination).map_err(|e| {
                log::error!("Failed to move {}: {}", record.path.display(), e);
                RelocateError::Rename {
                    from: record.path.clone(),
                    to: destination.clone(),
                    source: e,
                }
            })?;

            if collided {
                log::info!("File moved with new name {}", destination.display());
                summary.renamed += 1;
            } else {
                log::debug!(
                    "Moved {} -> {}",
                    record.path.display(),
                    destination.display()
                );
            }
            summary.moved += 1;
            summary.bytes += record.size;
        }
    }

    log::info!("{}", summary.summary());
    Ok(summary)
}

fn ensure_target(target: &Path) -> Result<(), RelocateError> {
    match fs::metadata(target) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => {
            log::error!("File with directory name exists: {}", target.display());
            Err(RelocateError::TargetConflict(target.to_path_buf()))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!(
                "Target directory doesn't exist, creating {}",
                target.display()
            );
            fs::create_dir_all(target).map_err(|e| RelocateError::CreateTarget {
                path: target.to_path_buf(),
                source: e,
            })
        }
        Err(e) => Err(RelocateError::CreateTarget {
            path: target.to_path_buf(),
            source: e,
        }),
    }
}

/// Split a file name at its last `.` into stem and extension.
///
/// Returns `None` for non UTF-8 names and names without a `.`.
#[must_use]
pub fn split_name(path: &Path) -> Option<(&str, &str)> {
    path.file_name()?.to_str()?.rsplit_once('.')
}

fn free_name<R: Rng>(
    target: &Path,
    source: &Path,
    rng: &mut R,
) -> Result<PathBuf, RelocateError> {
    let (stem, ext) =
        split_name(source).ok_or_else(|| RelocateError::MalformedName(source.to_path_buf()))?;

    loop {
        let candidate = target.join(format!(
            "{}{}.{}",
            stem,
            rng.gen_range(RENAME_SUFFIX_RANGE),
            ext
        ));
        if candidate.symlink_metadata().is_err() {
            return Ok(candidate);
        }
        log::debug!("Generated name also taken: {}", candidate.display());
    }
}
