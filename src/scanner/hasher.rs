//! Streaming content hasher.
//!
//! # Overview
//!
//! [`Hasher`] computes a 256-bit digest of a file's full content by reading
//! it in fixed-size chunks and feeding each chunk to an incremental
//! accumulator. Memory use is bounded by the chunk size regardless of the
//! file size.
//!
//! Two algorithms are supported:
//! - **BLAKE3** (default): fast, cryptographically secure
//! - **SHA-256**: slower, but produces the same digests as common
//!   `sha256sum`-style tooling
//!
//! # Example
//!
//! ```no_run
//! use finddup::scanner::{digest_to_hex, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new().with_algorithm(HashAlgorithm::Sha256);
//! let digest = hasher.full_hash(Path::new("file.bin")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::HashError;

/// A 256-bit content digest.
pub type Digest = [u8; 32];

/// Default read chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Content hash algorithm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// BLAKE3
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Blake3 => write!(f, "blake3"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Incremental digest state for one file.
enum Accumulator {
    Blake3(Box<blake3::Hasher>),
    Sha256(sha2::Sha256),
}

impl Accumulator {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha256 => Self::Sha256(<sha2::Sha256 as sha2::Digest>::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(chunk);
            }
            Self::Sha256(h) => sha2::Digest::update(h, chunk),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Blake3(h) => *h.finalize().as_bytes(),
            Self::Sha256(h) => {
                let out = sha2::Digest::finalize(h);
                let mut digest = [0u8; 32];
                digest.copy_from_slice(&out);
                digest
            }
        }
    }
}

/// Chunked file hasher.
///
/// `Hasher` holds no per-file state, so a single instance can be shared by
/// reference across hash tasks running on different threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a BLAKE3 hasher with the default chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Select the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read chunk size (at least one byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured chunk size.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hash the full content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Hash everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than `Interrupted`, which is retried.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Digest> {
        let mut accumulator = Accumulator::new(self.algorithm);
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            accumulator.update(&buf[..n]);
        }

        Ok(accumulator.finalize())
    }
}

/// Render a digest as 64 lowercase hex characters.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

/// Parse a 64-character hex string back into a digest.
///
/// Returns `None` if the string has the wrong length or is not valid hex.
#[must_use]
pub fn hex_to_digest(hex: &str) -> Option<Digest> {
    if hex.len() != 64 || !hex.is_ascii() {
        return None;
    }
    let mut digest = [0u8; 32];
    for (i, byte) in digest.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(digest)
}
