//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Level-order directory walking with a depth limit
//! - Streaming content hashing (BLAKE3 or SHA-256)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Chunked file hashing
//!
//! # Example
//!
//! ```no_run
//! use finddup::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     max_depth: 3,
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

pub use hasher::{digest_to_hex, hex_to_digest, Digest, HashAlgorithm, Hasher, DEFAULT_CHUNK_SIZE};
pub use walker::{DirectoryListing, Walker};

/// A regular file discovered during traversal.
///
/// The digest is attached exactly once, by the hash scheduler, before the
/// record is handed to the [`DuplicateIndex`](crate::duplicates::DuplicateIndex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes, captured at enumeration time
    pub size: u64,
    /// Content digest, present once hashed
    pub digest: Option<Digest>,
}

impl FileRecord {
    /// Create a new, not yet hashed, record.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            digest: None,
        }
    }

    /// Attach the content digest, consuming the record.
    #[must_use]
    pub fn with_digest(mut self, digest: Digest) -> Self {
        self.digest = Some(digest);
        self
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkerConfig {
    /// Descend into subdirectories.
    /// When false only the root's direct children are visited.
    pub recursive: bool,

    /// Number of directory levels to consume when recursive.
    /// The root's children form level 1.
    pub max_depth: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 20,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `recursive` - Whether to descend into subdirectories
    /// * `max_depth` - Levels to consume when recursive
    #[must_use]
    pub fn new(recursive: bool, max_depth: usize) -> Self {
        Self {
            recursive,
            max_depth,
        }
    }

    /// Number of levels the walker will actually consume.
    ///
    /// Non-recursive walks consume exactly one level. A recursive walk with
    /// a depth of zero is treated the same way.
    #[must_use]
    pub fn levels(&self) -> usize {
        if self.recursive {
            self.max_depth.max(1)
        } else {
            1
        }
    }
}

/// Errors that abort directory traversal.
///
/// Permission-denied directories are not errors; the walker skips them.
#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    /// The root path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while enumerating a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed to hash.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
