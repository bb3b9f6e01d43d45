//! Scan orchestration and batched concurrent hashing.
//!
//! # Overview
//!
//! This module drives a scan from root directory to finished
//! [`DuplicateIndex`]:
//! 1. **Walk** - the [`Walker`] lists one directory at a time, level by level
//! 2. **Hash** - the [`HashScheduler`] hashes that directory's files in
//!    batches of at most `thread_count` concurrent tasks
//! 3. **Group** - each joined batch is absorbed into the index in launch order
//!
//! Batches never overlap and never span directories: every task of a batch
//! is joined before the next batch is launched, and a directory's trailing
//! partial batch is flushed before the next directory is read. Only the
//! control thread touches the index.
//!
//! # Example
//!
//! ```no_run
//! use finddup::duplicates::{DuplicateFinder, ScanOptions};
//! use std::path::Path;
//!
//! let options = ScanOptions::default().with_recursive(true).with_threads(4);
//! let index = DuplicateFinder::new(options).scan(Path::new("/some/path")).unwrap();
//!
//! println!("Found {} duplicate groups", index.report().group_count);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::DuplicateIndex;
use crate::progress::ProgressCallback;
use crate::scanner::{
    Digest, FileRecord, HashAlgorithm, HashError, Hasher, WalkError, Walker, WalkerConfig,
    DEFAULT_CHUNK_SIZE,
};

/// Something that can digest a file on any thread.
pub trait FileHasher: Send + Sync {
    /// Compute the content digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read.
    fn hash_file(&self, path: &Path) -> Result<Digest, HashError>;
}

impl FileHasher for Hasher {
    fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        self.full_hash(path)
    }
}

/// Options for a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Levels to consume when recursive.
    pub max_depth: usize,
    /// Maximum concurrent hash computations (at least 1).
    pub thread_count: usize,
    /// Log a notice for every file dispatched for hashing.
    pub verbose: bool,
    /// Duplicate count above which a warning is logged. Never enforced as a cap.
    pub limit: Option<usize>,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Read chunk size for hashing.
    pub chunk_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 20,
            thread_count: 1,
            verbose: false,
            limit: None,
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ScanOptions {
    /// Enable or disable recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the recursion depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the number of concurrent hash computations.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.thread_count = threads.max(1);
        self
    }

    /// Enable per-file dispatch notices.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the advisory duplicate limit.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Select the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hashing chunk size.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Walker configuration derived from these options.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.recursive, self.max_depth)
    }

    /// Hasher derived from these options.
    #[must_use]
    pub fn hasher(&self) -> Hasher {
        Hasher::new()
            .with_algorithm(self.algorithm)
            .with_chunk_size(self.chunk_size)
    }
}

/// Errors that terminate a scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Directory enumeration failed.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A file could not be hashed.
    #[error("Hashing failed: {0}")]
    Hash(#[from] HashError),

    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The hashing thread pool could not be created.
    #[error("Failed to create hashing thread pool: {0}")]
    ThreadPool(String),
}

impl ScanError {
    /// Path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Walk(WalkError::NotFound(p) | WalkError::NotADirectory(p))
            | Self::Walk(WalkError::Io { path: p, .. }) => Some(p.as_path()),
            Self::Hash(e) => Some(e.path()),
            Self::Interrupted | Self::ThreadPool(_) => None,
        }
    }
}

/// Runs hash computations in joined batches on a bounded rayon pool.
pub struct HashScheduler<H: FileHasher = Hasher> {
    pool: rayon::ThreadPool,
    hasher: H,
    batch_size: usize,
    verbose: bool,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    hashed: AtomicUsize,
}

impl<H: FileHasher> std::fmt::Debug for HashScheduler<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashScheduler")
            .field("batch_size", &self.batch_size)
            .field("verbose", &self.verbose)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl<H: FileHasher> HashScheduler<H> {
    /// Create a scheduler running at most `thread_count` hashes at once.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ThreadPool`] if the pool cannot be built.
    pub fn new(thread_count: usize, hasher: H, verbose: bool) -> Result<Self, ScanError> {
        let batch_size = thread_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch_size)
            .thread_name(|i| format!("finddup-hash-{}", i))
            .build()
            .map_err(|e| ScanError::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            hasher,
            batch_size,
            verbose,
            shutdown_flag: None,
            progress_callback: None,
            hashed: AtomicUsize::new(0),
        })
    }

    /// Set the shutdown flag checked before each batch.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback notified for each hashed file.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Maximum number of tasks per batch.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of files hashed so far.
    #[must_use]
    pub fn hashed_count(&self) -> usize {
        self.hashed.load(Ordering::Relaxed)
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash one batch and join it.
    ///
    /// Every task of the batch is launched before any result is consumed, and
    /// all of them finish before this returns. Results keep launch order.
    ///
    /// # Errors
    ///
    /// Returns the first failure in launch order as [`ScanError::Hash`], or
    /// [`ScanError::Interrupted`] if shutdown was requested before launch.
    pub fn run_batch(&self, batch: Vec<FileRecord>) -> Result<Vec<FileRecord>, ScanError> {
        debug_assert!(batch.len() <= self.batch_size);

        if self.is_shutdown_requested() {
            log::debug!("Shutdown requested, not launching further batches");
            return Err(ScanError::Interrupted);
        }

        for record in &batch {
            if self.verbose {
                log::info!("Hashing {}", record.path.display());
            } else {
                log::trace!("Hashing {}", record.path.display());
            }
        }

        let hasher = &self.hasher;
        let results: Vec<(FileRecord, Result<Digest, HashError>)> = self.pool.install(|| {
            batch
                .into_par_iter()
                .map(|record| {
                    let digest = hasher.hash_file(&record.path);
                    (record, digest)
                })
                .collect()
        });

        let mut hashed = Vec::with_capacity(results.len());
        for (record, digest) in results {
            match digest {
                Ok(digest) => {
                    let current = self.hashed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback.on_progress(current, record.path.to_string_lossy().as_ref());
                        callback.on_item_completed(record.size);
                    }
                    hashed.push(record.with_digest(digest));
                }
                Err(e) => {
                    log::error!("Failed to hash {}: {}", record.path.display(), e);
                    return Err(ScanError::Hash(e));
                }
            }
        }

        Ok(hashed)
    }

    /// Hash a directory's files, handing each joined batch to `on_batch`.
    ///
    /// The final partial batch is flushed before returning.
    ///
    /// # Errors
    ///
    /// Stops at the first failing batch; see [`HashScheduler::run_batch`].
    pub fn hash_files(
        &self,
        files: Vec<FileRecord>,
        mut on_batch: impl FnMut(Vec<FileRecord>),
    ) -> Result<(), ScanError> {
        let mut remaining = files.into_iter();
        loop {
            let batch: Vec<FileRecord> = remaining.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                return Ok(());
            }
            on_batch(self.run_batch(batch)?);
        }
    }
}

/// Duplicate finder that runs a complete scan.
pub struct DuplicateFinder {
    options: ScanOptions,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for DuplicateFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateFinder")
            .field("options", &self.options)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given options.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            shutdown_flag: None,
            progress_callback: None,
        }
    }

    /// Create a new duplicate finder with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ScanOptions::default())
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Options this finder scans with.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan `root` and build the duplicate index.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the root is invalid, a non-permission
    /// enumeration error occurs, any file fails to hash, or shutdown is
    /// requested. No partial index is returned.
    pub fn scan(&self, root: &Path) -> Result<DuplicateIndex, ScanError> {
        Walker::new(root, self.options.walker_config()).validate_root()?;
        let root = absolute_root(root)?;

        let mut scheduler = HashScheduler::new(
            self.options.thread_count,
            self.options.hasher(),
            self.options.verbose,
        )?;
        if let Some(ref flag) = self.shutdown_flag {
            scheduler = scheduler.with_shutdown_flag(Arc::clone(flag));
        }
        if let Some(ref callback) = self.progress_callback {
            scheduler = scheduler.with_progress_callback(Arc::clone(callback));
        }

        log::info!(
            "Scanning {} (recursive: {}, depth: {}, threads: {}, algorithm: {})",
            root.display(),
            self.options.recursive,
            self.options.walker_config().levels(),
            scheduler.batch_size(),
            self.options.algorithm
        );

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("Hashing", 0);
        }
        let result = self.scan_with(&root, &scheduler);
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("Hashing");
        }
        let index = result?;

        let stats = index.report();
        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} duplicate files, {} reclaimable",
            stats.files_parsed,
            stats.group_count,
            stats.duplicate_count,
            bytesize::ByteSize::b(stats.duplicate_bytes)
        );

        if let Some(limit) = self.options.limit {
            if stats.duplicate_count > limit {
                log::warn!(
                    "Found {} duplicates, more than the configured limit of {}",
                    stats.duplicate_count,
                    limit
                );
            }
        }

        Ok(index)
    }

    fn scan_with<H: FileHasher>(
        &self,
        root: &Path,
        scheduler: &HashScheduler<H>,
    ) -> Result<DuplicateIndex, ScanError> {
        let walker = Walker::new(root, self.options.walker_config());
        let mut index = DuplicateIndex::new();

        for listing in walker.directories() {
            let listing = listing?;
            log::debug!(
                "Level {}: {} files in {}",
                listing.depth,
                listing.files.len(),
                listing.dir.display()
            );

            for file in &listing.files {
                index.record_enumerated(file.size);
            }
            scheduler.hash_files(listing.files, |batch| index.absorb_batch(batch))?;
        }

        Ok(index)
    }
}

/// Resolve the scan root to an absolute path.
fn absolute_root(root: &Path) -> Result<PathBuf, ScanError> {
    std::fs::canonicalize(root).map_err(|e| {
        ScanError::Walk(WalkError::Io {
            path: root.to_path_buf(),
            source: e,
        })
    })
}
