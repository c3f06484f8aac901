//! Filesystem scanners that feed the `bdd-audit` model.
//!
//! Two scanners live here: [`feature::scan_features`] walks a directory
//! for Gherkin `.feature` files and converts them into model features,
//! and [`rust_steps::scan_step_defs`] walks a directory for Rust sources
//! and collects `#[given]`/`#[when]`/`#[then]` step definitions. Both are
//! tolerant of individual bad files, which are logged and skipped, but
//! strict about their roots: a missing directory or one without any
//! matching sources is an error.

pub mod error;
pub mod feature;
pub mod rust_steps;

mod discovery;

pub use error::ScanError;
pub use feature::{load_feature, scan_features};
pub use rust_steps::{load_step_defs, scan_step_defs};
