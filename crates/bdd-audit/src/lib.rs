//! Model, linking, and analysis engine for BDD test suites.
//!
//! The crate builds an in-memory model of a suite's feature files and step
//! definitions, binds each step to the first definition whose pattern
//! matches it, and answers questions about the linked whole: coverage
//! statistics, unimplemented steps, unused definitions, duplicated
//! scenarios, repeated step sequences, and scenario outlines that carry
//! more Examples data than they need. It performs no I/O of its own;
//! scanners hand it a ready-made [`model`] tree and reports come back as
//! [`model::DataTable`]s for the caller to render.

pub mod analysis;
pub mod filter;
pub mod linker;
pub mod model;
pub mod project;

pub use filter::TagFilter;
pub use project::{Project, StepDefUsage, TagUsage};
