//! Digest-keyed duplicate grouping.
//!
//! # Overview
//!
//! [`DuplicateIndex`] absorbs hashed [`FileRecord`]s in the order the hash
//! scheduler hands them over and appends each one to the group keyed by its
//! digest. The first record to land in a group is that group's *original*;
//! every later arrival is a duplicate of it. Groups are kept in first-seen
//! order and are never re-sorted, so listing, relocation and deletion always
//! agree on which file survives.
//!
//! # Example
//!
//! ```
//! use finddup::duplicates::{DuplicateIndex, GroupFilter};
//! use finddup::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let mut index = DuplicateIndex::new();
//! for (name, digest) in [("a.txt", [1u8; 32]), ("b.txt", [1u8; 32]), ("c.txt", [2u8; 32])] {
//!     index.record_enumerated(1);
//!     index.absorb(FileRecord::new(PathBuf::from(name), 1).with_digest(digest));
//! }
//!
//! let stats = index.report();
//! assert_eq!(stats.files_parsed, 3);
//! assert_eq!(stats.group_count, 1);
//! assert_eq!(index.groups(GroupFilter::DuplicatesOnly).count(), 1);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::scanner::{digest_to_hex, Digest, FileRecord};

/// Files sharing one content digest, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every member
    pub digest: Digest,
    /// Members; index 0 is the original
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    fn new(digest: Digest) -> Self {
        Self {
            digest,
            files: Vec::new(),
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group holds at least one duplicate.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// The first file discovered with this content.
    #[must_use]
    pub fn original(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Every member except the original.
    #[must_use]
    pub fn duplicates(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or_default()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes held by the duplicates, excluding the original.
    #[must_use]
    pub fn duplicate_bytes(&self) -> u64 {
        self.duplicates().iter().map(|f| f.size).sum()
    }

    /// Size of the original file.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.original().map_or(0, |f| f.size)
    }

    /// Digest as hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Check whether `path` is already a member.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Paths of all members, original first.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Which groups [`DuplicateIndex::groups`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupFilter {
    /// Every group, including single-member (unique) ones
    All,
    /// Only groups with two or more members
    #[default]
    DuplicatesOnly,
}

/// Summary of a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStatistics {
    /// Files enumerated by the walker
    pub files_parsed: usize,
    /// Sum of sizes of every enumerated file
    pub scanned_bytes: u64,
    /// Groups with two or more members
    pub group_count: usize,
    /// Sum over those groups of (members - 1)
    pub duplicate_count: usize,
    /// Sum of sizes of every non-original member
    pub duplicate_bytes: u64,
}

/// Ordered map of digest to member list, plus enumeration counters.
///
/// Only the scan's control thread mutates the index, after each batch join.
#[derive(Debug, Clone, Default)]
pub struct DuplicateIndex {
    groups: Vec<DuplicateGroup>,
    lookup: HashMap<Digest, usize>,
    files_parsed: usize,
    scanned_bytes: u64,
}

impl DuplicateIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a file seen by the walker, whether or not it is hashed later.
    pub fn record_enumerated(&mut self, size: u64) {
        self.files_parsed += 1;
        self.scanned_bytes += size;
    }

    /// Append a hashed record to the group for its digest.
    ///
    /// Returns `false` (and leaves the index untouched) when the record has
    /// no digest or its path is already a member of that group.
    pub fn absorb(&mut self, record: FileRecord) -> bool {
        let Some(digest) = record.digest else {
            log::warn!("Ignoring unhashed record: {}", record.path.display());
            return false;
        };

        let slot = match self.lookup.get(&digest) {
            Some(&slot) => slot,
            None => {
                self.groups.push(DuplicateGroup::new(digest));
                let slot = self.groups.len() - 1;
                self.lookup.insert(digest, slot);
                slot
            }
        };

        let group = &mut self.groups[slot];
        if group.contains(&record.path) {
            log::debug!("Path already grouped: {}", record.path.display());
            return false;
        }

        if !group.files.is_empty() {
            log::trace!(
                "Duplicate of {}: {}",
                group.files[0].path.display(),
                record.path.display()
            );
        }
        group.files.push(record);
        true
    }

    /// Absorb a joined batch, preserving its order.
    pub fn absorb_batch(&mut self, records: impl IntoIterator<Item = FileRecord>) {
        for record in records {
            self.absorb(record);
        }
    }

    /// Iterate over groups in first-seen order.
    pub fn groups(&self, filter: GroupFilter) -> impl Iterator<Item = &DuplicateGroup> + '_ {
        self.groups
            .iter()
            .filter(move |g| filter == GroupFilter::All || g.has_duplicates())
    }

    /// Look up the group for a digest.
    #[must_use]
    pub fn group(&self, digest: &Digest) -> Option<&DuplicateGroup> {
        self.lookup.get(digest).map(|&slot| &self.groups[slot])
    }

    /// Total number of groups, unique files included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if nothing has been absorbed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Derive scan statistics in a single pass over the groups.
    #[must_use]
    pub fn report(&self) -> ScanStatistics {
        let mut stats = ScanStatistics {
            files_parsed: self.files_parsed,
            scanned_bytes: self.scanned_bytes,
            ..Default::default()
        };

        for group in self.groups(GroupFilter::DuplicatesOnly) {
            stats.group_count += 1;
            stats.duplicate_count += group.duplicate_count();
            stats.duplicate_bytes += group.duplicate_bytes();
        }

        stats
    }
}
