//! Level-order directory walker.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating the regular
//! files under a root directory one depth level at a time. Every directory of
//! level N is listed before any directory of level N+1 is opened, and entries
//! inside a directory are sorted by file name, so the same tree always yields
//! the same sequence.
//!
//! # Depth
//!
//! The root's direct children form level 1. A non-recursive walk consumes
//! exactly one level; a recursive walk consumes `max_depth` levels. Directories
//! discovered on the last consumed level are never opened.
//!
//! # Errors
//!
//! Directories that cannot be read because of missing permissions are skipped
//! with a debug log. Every other enumeration failure ends the walk with a
//! [`WalkError`].
//!
//! # Example
//!
//! ```no_run
//! use finddup::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::new(true, 2));
//! for listing in walker.directories() {
//!     let listing = listing.unwrap();
//!     println!("{}: {} files", listing.dir.display(), listing.files.len());
//! }
//! ```

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, WalkError, WalkerConfig};

/// Directory walker for level-order file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

/// The regular files found directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    /// Directory that was read
    pub dir: PathBuf,
    /// Level of the listed files (root children are level 1)
    pub depth: usize,
    /// Regular files, sorted by file name
    pub files: Vec<FileRecord>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::NotFound`] or [`WalkError::NotADirectory`].
    pub fn validate_root(&self) -> Result<(), WalkError> {
        match std::fs::metadata(&self.root) {
            Ok(m) if m.is_dir() => Ok(()),
            Ok(_) => Err(WalkError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(WalkError::NotFound(self.root.clone()))
            }
            Err(e) => Err(WalkError::Io {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    /// Iterate over directory listings in level order.
    ///
    /// Each opened directory produces one [`DirectoryListing`], even when it
    /// holds no regular files. Iteration stops after the first error.
    #[must_use]
    pub fn directories(&self) -> Directories {
        let mut current = VecDeque::new();
        current.push_back(self.root.clone());

        Directories {
            state: TraversalState {
                current,
                next: VecDeque::new(),
                remaining: self.config.levels(),
            },
            depth: 1,
            finished: false,
        }
    }

    /// Iterate over individual files in level order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, WalkError>> {
        self.directories().flat_map(|listing| match listing {
            Ok(listing) => listing.files.into_iter().map(Ok).collect::<Vec<_>>(),
            Err(e) => vec![Err(e)],
        })
    }
}

/// Pending directories for the level being read and the level after it.
#[derive(Debug)]
struct TraversalState {
    current: VecDeque<PathBuf>,
    next: VecDeque<PathBuf>,
    /// Levels left to consume, including the current one
    remaining: usize,
}

/// Iterator returned by [`Walker::directories`].
#[derive(Debug)]
pub struct Directories {
    state: TraversalState,
    depth: usize,
    finished: bool,
}

impl Iterator for Directories {
    type Item = Result<DirectoryListing, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.state.current.is_empty() {
                self.state.remaining = self.state.remaining.saturating_sub(1);
                if self.state.remaining == 0 || self.state.next.is_empty() {
                    self.finished = true;
                    return None;
                }
                std::mem::swap(&mut self.state.current, &mut self.state.next);
                self.depth += 1;
                log::debug!(
                    "Walker: entering level {} ({} directories)",
                    self.depth,
                    self.state.current.len()
                );
            }

            let Some(dir) = self.state.current.pop_front() else {
                continue;
            };

            // Subdirectories found on the last level would never be opened.
            let descend = self.state.remaining > 1;

            match read_directory(&dir, self.depth, descend, &mut self.state.next) {
                Ok(Some(listing)) => return Some(Ok(listing)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read one directory, returning `Ok(None)` if permission was denied.
fn read_directory(
    dir: &Path,
    depth: usize,
    descend: bool,
    subdirs: &mut VecDeque<PathBuf>,
) -> Result<Option<DirectoryListing>, WalkError> {
    let mut files = Vec::new();
    let mut found_dirs = Vec::new();

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let denied = err
                    .io_error()
                    .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied);
                let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);

                if denied && path == dir {
                    log::debug!("Skipping unreadable directory: {}", dir.display());
                    return Ok(None);
                }
                if denied {
                    log::debug!("Skipping unreadable entry: {}", path.display());
                    continue;
                }
                return Err(walkdir_error(path, err));
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if descend {
                found_dirs.push(entry.into_path());
            }
        } else if file_type.is_file() {
            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(err) => {
                    let path = entry.path().to_path_buf();
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == io::ErrorKind::PermissionDenied)
                    {
                        log::debug!("Skipping file without metadata access: {}", path.display());
                        continue;
                    }
                    return Err(walkdir_error(path, err));
                }
            };
            files.push(FileRecord::new(entry.into_path(), size));
        } else {
            log::trace!("Skipping non-regular file: {}", entry.path().display());
        }
    }

    subdirs.extend(found_dirs);

    Ok(Some(DirectoryListing {
        dir: dir.to_path_buf(),
        depth,
        files,
    }))
}

/// Convert a walkdir error into a [`WalkError`].
fn walkdir_error(path: PathBuf, error: walkdir::Error) -> WalkError {
    log::warn!("Walker error for {}: {}", path.display(), error);
    let message = error.to_string();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::other(message));
    WalkError::Io { path, source }
}
