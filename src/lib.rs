//! finddup - byte-identical duplicate file finder
//!
//! Walks a directory tree level by level, hashes every regular file in
//! bounded concurrent batches, groups files by content digest, and lists,
//! relocates or deletes every copy but the first.
//!
//! ```no_run
//! use finddup::{scan, ScanOptions};
//! use std::path::Path;
//!
//! let options = ScanOptions::default().with_recursive(true).with_threads(4);
//! let index = scan(Path::new("/data"), &options).unwrap();
//! finddup::actions::list(&index, true).unwrap();
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::actions::DeleteMode;
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::JsonOutput;
use crate::progress::Progress;

pub use crate::duplicates::{DuplicateFinder, DuplicateIndex, ScanError, ScanOptions};

/// Scan `root` with `options` and return the finished index.
///
/// # Errors
///
/// Returns [`ScanError`] on any fatal walk or hash failure.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<DuplicateIndex, ScanError> {
    DuplicateFinder::new(options.clone()).scan(root)
}

/// Merge CLI flags over loaded configuration.
#[must_use]
pub fn scan_options(cli: &Cli, config: &Config) -> ScanOptions {
    let requested = cli.threads.unwrap_or(config.threads).max(1);
    let available = std::thread::available_parallelism().map_or(1, |n| n.get());
    let threads = requested.min(available);
    if threads < requested {
        log::warn!(
            "Requested {} threads, only {} available; using {}",
            requested,
            available,
            threads
        );
    }

    ScanOptions::default()
        .with_recursive(cli.recursive)
        .with_max_depth(cli.depth.unwrap_or(config.depth))
        .with_threads(threads)
        .with_verbose(cli.verbose >= 1)
        .with_limit(Some(cli.limit.unwrap_or(config.limit)))
        .with_algorithm(cli.algorithm.unwrap_or(config.algorithm))
        .with_chunk_size(config.chunk_size)
}

/// Run the binary's logic for parsed arguments.
///
/// # Errors
///
/// Returns any fatal scan or action error. The caller maps it to an exit
/// code with [`ExitCode::for_error`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let handler = signal::install_handler()?;
    let config = Config::load();
    let options = scan_options(&cli, &config);

    log::info!("Searching in directory: {}", cli.dir.display());

    let mut finder = DuplicateFinder::new(options).with_shutdown_flag(handler.get_flag());
    if cli.show_progress() {
        finder = finder.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let index = finder
        .scan(&cli.dir)
        .with_context(|| format!("Failed to scan {}", cli.dir.display()))?;

    let exit_code = if index.report().group_count > 0 {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };

    match cli.output {
        OutputFormat::Json => {
            let stdout = io::stdout();
            JsonOutput::new(&index, exit_code).write_to(&mut stdout.lock(), true)?;
        }
        OutputFormat::Text if cli.should_list() => {
            actions::list(&index, cli.stats)?;
        }
        OutputFormat::Text if cli.stats => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            actions::write_stats(&index, &mut handle)?;
            handle.flush()?;
        }
        OutputFormat::Text => {}
    }

    if let Some(ref target) = cli.move_dir {
        let summary = actions::relocate(&index, target)
            .with_context(|| format!("Failed to move duplicates to {}", target.display()))?;
        if cli.output == OutputFormat::Text && !cli.quiet {
            println!("{}", summary.summary());
        }
    }

    if cli.delete {
        let mode = if cli.permanent {
            DeleteMode::Permanent
        } else {
            DeleteMode::Trash
        };
        let summary = actions::delete(&index, mode).context("Failed to delete duplicates")?;
        if cli.output == OutputFormat::Text && !cli.quiet {
            println!("{}", summary.summary());
        }
    }

    Ok(exit_code)
}
