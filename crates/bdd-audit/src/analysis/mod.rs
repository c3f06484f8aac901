//! Cross-cutting analyses over a linked model.
//!
//! Each analysis is a pure function of the trees passed in: the duplicate
//! detector and sequence miner read scenarios without touching them, and
//! the outline optimizer works on its own deep copy. Nothing here performs
//! I/O.

mod duplicates;
mod optimizer;
mod sequences;

pub use duplicates::{DuplicateGroup, DuplicateKind, DuplicateMember, find_duplicated_scenarios};
pub use optimizer::optimize_outline;
pub use sequences::{RepeatedSequence, find_repeated_sequences};
