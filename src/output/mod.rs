//! Machine-readable output for scan results.
//!
//! # Example
//!
//! ```no_run
//! use finddup::duplicates::DuplicateFinder;
//! use finddup::error::ExitCode;
//! use finddup::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let index = DuplicateFinder::with_defaults().scan(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&index, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;

pub use json::JsonOutput;
