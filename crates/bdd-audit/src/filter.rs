//! Tag filter parsing and evaluation.
//!
//! A filter argument is a comma-separated list of terms. Each term is
//! either `@name` (satisfied when the tag is present) or `~@name`
//! (satisfied when the tag is absent). Within one filter the terms are
//! alternatives; a node accepts a set of filters only when every filter is
//! individually satisfied. A blank filter, or one whose terms all trim to
//! nothing, is vacuously satisfied.

use std::fmt;

use crate::model::{Tag, Tags};

/// One parsed filter term.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterTerm {
    Present(Tag),
    Absent(Tag),
}

/// A single tag filter argument, parsed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    terms: Vec<FilterTerm>,
}

impl TagFilter {
    /// Parse a filter string such as `"@smoke, ~@wip"`.
    ///
    /// Tag names are canonicalised exactly as [`Tag::new`] does, so
    /// `smoke` and `@smoke` are the same term.
    #[must_use]
    pub fn new(filter: impl AsRef<str>) -> Self {
        let terms = filter
            .as_ref()
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty() && *term != "~")
            .map(|term| {
                term.strip_prefix('~').map_or_else(
                    || FilterTerm::Present(Tag::new(term)),
                    |name| FilterTerm::Absent(Tag::new(name)),
                )
            })
            .collect();
        Self { terms }
    }

    /// Whether `tags` satisfies at least one term, or the filter is blank.
    #[must_use]
    pub fn is_satisfied_by(&self, tags: &Tags) -> bool {
        if self.terms.is_empty() {
            return true;
        }
        self.terms.iter().any(|term| match term {
            FilterTerm::Present(tag) => tags.contains(tag),
            FilterTerm::Absent(tag) => !tags.contains(tag),
        })
    }
}

impl From<&str> for TagFilter {
    fn from(filter: &str) -> Self {
        Self::new(filter)
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, term) in self.terms.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            match term {
                FilterTerm::Present(tag) => write!(f, "{tag}")?,
                FilterTerm::Absent(tag) => write!(f, "~{tag}")?,
            }
        }
        Ok(())
    }
}
