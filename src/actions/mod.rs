//! Resolution actions applied to a finished scan.
//!
//! This module provides functionality for:
//! - Listing duplicate groups as text
//! - Moving duplicates into a target directory
//! - Safe deletion via trash crate, or permanent deletion
//!
//! Every action leaves each group's original in place.
//!
//! ```no_run
//! use finddup::actions::{list, relocate};
//! use finddup::duplicates::{DuplicateFinder, ScanOptions};
//! use std::path::Path;
//!
//! let index = DuplicateFinder::new(ScanOptions::default())
//!     .scan(Path::new("/data"))
//!     .unwrap();
//! list(&index, true).unwrap();
//! relocate(&index, Path::new("/data/dup")).unwrap();
//! ```

pub mod delete;
pub mod list;
pub mod relocate;

// Re-export commonly used types
pub use delete::{delete, delete_to_trash, permanent_delete, DeleteError, DeleteMode, DeleteSummary};
pub use list::{list, write_list, write_stats};
pub use relocate::{relocate, relocate_with_rng, RelocateError, RelocationSummary};
