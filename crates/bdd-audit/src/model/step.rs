//! Steps and their inline arguments.

use std::fmt;
use std::sync::Arc;

use super::docstring::DocString;
use super::keyword::StepKeyword;
use super::location::Location;
use super::placeholder::{self, ParamUsage};
use super::step_def::StepDef;
use super::table::DataTable;

/// A step's inline argument: a data table or a doc string, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArg {
    /// Inline tabular argument.
    Table(DataTable),
    /// Inline multi-line text argument.
    DocString(DocString),
}

impl fmt::Display for StepArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(table) => table.fmt(f),
            Self::DocString(doc) => doc.fmt(f),
        }
    }
}

/// One line of a scenario or background.
///
/// `step_def` starts unset; the linker writes it at most once. Re-linking
/// requires a fresh deep copy of the owning tree, so a `Clone` shares the
/// bound definition rather than re-deriving it.
///
/// Derived equality compares every field; the analyses use the narrower
/// [`Step::is_fully_equal_to`] and [`Step::is_equal_to_ignore_parameters`]
/// relations instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Keyword introducing the step line.
    pub keyword: StepKeyword,
    /// Step text, with `<name>` placeholders when owned by an outline.
    pub text: String,
    /// The definition satisfying this step, once linked.
    pub step_def: Option<Arc<StepDef>>,
    /// Optional inline argument.
    pub argument: Option<StepArg>,
    /// Position within the feature source.
    pub location: Location,
}

impl Step {
    /// Create an unlinked, argument-free step.
    #[must_use]
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into().trim().to_owned(),
            step_def: None,
            argument: None,
            location: Location::default(),
        }
    }

    /// Whether a definition is bound and itself implemented.
    #[must_use]
    pub fn is_implemented(&self) -> bool {
        self.step_def.as_ref().is_some_and(|def| def.implemented)
    }

    /// Full equality: identical step text.
    #[must_use]
    pub fn is_fully_equal_to(&self, other: &Self) -> bool {
        self.text == other.text
    }

    /// Equality ignoring parameter values.
    ///
    /// Two linked steps compare by their bound patterns' text; two unlinked
    /// steps fall back to full text equality. A linked and an unlinked step
    /// are never equal under this relation.
    #[must_use]
    pub fn is_equal_to_ignore_parameters(&self, other: &Self) -> bool {
        match (&self.step_def, &other.step_def) {
            (Some(own), Some(theirs)) => own.text == theirs.text,
            (None, None) => self.is_fully_equal_to(other),
            _ => false,
        }
    }

    /// Placeholder usage across the step text and any data table argument.
    #[must_use]
    pub fn parameter_usage(&self) -> ParamUsage {
        let mut usage = ParamUsage::new();
        if !self.text.trim().is_empty() {
            usage.merge(&placeholder::parameter_usage(&self.text));
        }
        if let Some(StepArg::Table(table)) = &self.argument {
            usage.merge(&table.parameter_usage());
        }
        usage
    }

    /// Literally substitute `<name>` with `value` in the step text and any
    /// data table argument. Doc strings are left untouched.
    pub fn apply_parameter(&mut self, name: &str, value: &str) {
        self.text = placeholder::substitute(&self.text, name, value);
        if let Some(StepArg::Table(table)) = &mut self.argument {
            table.apply_parameter(name, value);
        }
    }

    /// Apply every `(name, value)` pair in order.
    pub fn apply_parameters(&mut self, values: &[(String, String)]) {
        for (name, value) in values {
            self.apply_parameter(name, value);
        }
    }

    /// The step text after substituting every `(name, value)` pair, without
    /// mutating the step. Used to compute an outline step's effective text.
    #[must_use]
    pub fn text_with_parameters(&self, values: &[(String, String)]) -> String {
        values.iter().fold(self.text.clone(), |text, (name, value)| {
            placeholder::substitute(&text, name, value)
        })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.text)?;
        if let Some(argument) = &self.argument {
            write!(f, "\n{}", super::indent(&argument.to_string()))?;
        }
        Ok(())
    }
}
