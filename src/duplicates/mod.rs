//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Batched concurrent hashing of walked files
//! - Digest-keyed grouping in discovery order
//! - Scan statistics

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FileHasher, HashScheduler, ScanError, ScanOptions};
pub use groups::{DuplicateGroup, DuplicateIndex, GroupFilter, ScanStatistics};
