//! Plain-text listing of duplicate groups.
//!
//! Every group with at least two members is printed as its original's
//! quoted path followed by one tab-indented line per duplicate:
//!
//! ```text
//! Duplicate for file: "/data/a.txt":
//! 	/data/b.txt
//!
//! ```
//!
//! Listing only reads the index, so listing the same index twice produces
//! the same text.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateIndex, GroupFilter};

/// Line printed when the index holds no duplicate groups.
pub const NO_DUPLICATES: &str = "No duplicates found";

/// Write the listing (and optionally the statistics block) to `out`.
///
/// # Errors
///
/// Propagates any write error from `out`.
pub fn write_list<W: Write>(
    index: &DuplicateIndex,
    show_stats: bool,
    out: &mut W,
) -> io::Result<()> {
    let mut any = false;
    for group in index.groups(GroupFilter::DuplicatesOnly) {
        let Some(original) = group.original() else {
            continue;
        };
        any = true;
        writeln!(out, "Duplicate for file: {:?}:", original.path)?;
        for duplicate in group.duplicates() {
            writeln!(out, "\t{}", duplicate.path.display())?;
        }
        writeln!(out)?;
    }

    if !any {
        writeln!(out, "{}", NO_DUPLICATES)?;
    }

    if show_stats {
        write_stats(index, out)?;
    }

    Ok(())
}

/// Print the listing to stdout.
///
/// # Errors
///
/// Propagates any stdout write error.
pub fn list(index: &DuplicateIndex, show_stats: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_list(index, show_stats, &mut handle)?;
    handle.flush()
}

/// Write the statistics block alone.
///
/// # Errors
///
/// Propagates any write error from `out`.
pub fn write_stats<W: Write>(index: &DuplicateIndex, out: &mut W) -> io::Result<()> {
    let stats = index.report();
    writeln!(out, "Statistics:")?;
    writeln!(out, "  Files parsed:     {}", stats.files_parsed)?;
    writeln!(
        out,
        "  Bytes scanned:    {} ({} bytes)",
        ByteSize::b(stats.scanned_bytes),
        stats.scanned_bytes
    )?;
    writeln!(out, "  Duplicate groups: {}", stats.group_count)?;
    writeln!(out, "  Duplicate files:  {}", stats.duplicate_count)?;
    writeln!(
        out,
        "  Duplicate bytes:  {} ({} bytes)",
        ByteSize::b(stats.duplicate_bytes),
        stats.duplicate_bytes
    )
}
