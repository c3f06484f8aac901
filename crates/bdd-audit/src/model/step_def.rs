//! Step definitions: implementation-side patterns that satisfy steps.

use std::fmt;

use super::location::StepDefLocation;
use super::table::TableRow;

/// An implementation-side step pattern extracted from source.
///
/// `text` is a regular-expression contract: the linker matches it against a
/// step's effective text in full. Equality and hashing are structural, so
/// two definitions with identical pattern, location, description, and
/// implementation state compare equal wherever definitions are counted or
/// mined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StepDef {
    /// The pattern text, matched in full against step text.
    pub text: String,
    /// Where the implementing function lives.
    pub location: StepDefLocation,
    /// Doc comment attached to the implementing function, if any.
    pub description: Option<String>,
    /// Whether the definition is backed by a real implementation.
    pub implemented: bool,
}

impl StepDef {
    /// Create an implemented definition from its pattern and location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdd_audit::model::{StepDef, StepDefLocation};
    ///
    /// let def = StepDef::new("^I log in$", StepDefLocation::default());
    /// assert!(def.implemented);
    /// assert_eq!(def.text, "^I log in$");
    /// ```
    #[must_use]
    pub fn new(text: impl Into<String>, location: StepDefLocation) -> Self {
        Self {
            text: text.into(),
            location,
            description: None,
            implemented: true,
        }
    }

    /// Report row for this definition: pattern text and short location.
    #[must_use]
    pub fn to_table_row(&self) -> TableRow {
        TableRow::from_values([self.text.clone(), self.location.short()])
    }
}

impl fmt::Display for StepDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
