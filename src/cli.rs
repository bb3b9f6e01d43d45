//! Command-line interface definitions for finddup.
//!
//! # Example
//!
//! ```bash
//! # List duplicates directly under ~/Downloads
//! finddup --dir ~/Downloads
//!
//! # Recurse two levels with 4 hashing threads and print statistics
//! finddup --dir ~/Downloads -r --depth 2 -t 4 --stats
//!
//! # Move every duplicate into ~/dups
//! finddup --dir ~/Downloads -r --mvdir ~/dups
//!
//! # JSON report for scripting
//! finddup --dir ~/Downloads --output json
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::scanner::HashAlgorithm;

/// Find byte-identical duplicate files.
///
/// finddup hashes every regular file under a directory, groups files with
/// identical content, and lists, moves or deletes all but the first copy
/// of each group.
#[derive(Debug, Parser)]
#[command(name = "finddup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to search for duplicate files
    #[arg(long, value_name = "PATH")]
    pub dir: PathBuf,

    /// Maximum number of duplicates to report (a warning is logged when exceeded)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Search subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Maximum depth for a recursive search [default: 20]
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub depth: Option<usize>,

    /// List found duplicates (the default when no other action is given)
    #[arg(short, long)]
    pub list: bool,

    /// Delete all but one copy of each duplicate
    #[arg(long = "del")]
    pub delete: bool,

    /// Delete permanently instead of moving to the trash
    ///
    /// Warning: Files cannot be recovered after permanent deletion.
    #[arg(long, requires = "delete")]
    pub permanent: bool,

    /// Directory to move duplicate files to
    #[arg(long = "mvdir", value_name = "PATH", conflicts_with = "delete")]
    pub move_dir: Option<PathBuf>,

    /// Number of files hashed concurrently [default: 1]
    #[arg(short, long, value_name = "N", value_parser = parse_positive)]
    pub threads: Option<usize>,

    /// Print scan statistics after the listing
    #[arg(long)]
    pub stats: bool,

    /// Content digest algorithm [default: blake3]
    #[arg(long, value_enum)]
    pub algorithm: Option<HashAlgorithm>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity (-v logs every file dispatched for hashing, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Whether the text listing should be printed.
    #[must_use]
    pub fn should_list(&self) -> bool {
        self.output == OutputFormat::Text
            && (self.list || (!self.delete && self.move_dir.is_none()))
    }

    /// Whether the progress spinner should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress && self.output == OutputFormat::Text
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse an integer that must be at least 1.
///
/// # Errors
///
/// Returns an error for non-numeric input and for zero.
pub fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{s}'"))?;
    if n == 0 {
        return Err("Value must be at least 1".to_string());
    }
    Ok(n)
}
