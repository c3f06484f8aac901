//! Command line reports over scanned BDD test suites.
//!
//! The `bdd-audit` binary scans a directory of Gherkin feature files and
//! a directory of Rust step definitions, links the two, and prints one
//! of several analysis reports: suite statistics, unimplemented steps,
//! unused definitions, duplicated scenarios, tag usage, step-definition
//! usage, repeated step sequences, or slimmable scenario outlines.

mod cli;
mod config;
mod logging;
mod output;

fn main() -> eyre::Result<()> {
    cli::run()
}
