//! Semantic error types for suite scanning.
//!
//! Scanning distinguishes root-level failures, which abort the scan, from
//! per-file failures, which the scanners log and skip. Only the former
//! surface through these types from the `scan_*` entry points; the
//! per-file loaders return them directly.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning a suite from disk.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("scan root {} is not a directory", .0.display())]
    RootMissing(PathBuf),

    /// The scan root exists but holds no matching source files.
    #[error("no .{extension} files found under {}", root.display())]
    NoSources {
        /// The root that was walked.
        root: PathBuf,
        /// The file extension looked for.
        extension: &'static str,
    },

    /// Reading a source file or walking the tree failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feature file could not be parsed as Gherkin.
    #[error("failed to parse feature file: {0}")]
    FeatureParse(#[from] gherkin::ParseError),

    /// A Rust source file could not be parsed.
    #[error("failed to parse Rust source: {0}")]
    RustParse(#[from] syn::Error),
}
