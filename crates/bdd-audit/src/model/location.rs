//! Source locations for model entities.
//!
//! Locations are informational: they never take part in the equality
//! relations used by the duplicate detector, and only surface in reports.

use std::fmt;
use std::path::PathBuf;

/// Position of a Gherkin entity within its feature source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// Path to the source file.
    pub file: PathBuf,
    /// One-based line number.
    pub line: usize,
    /// One-based column number.
    pub column: usize,
}

impl Location {
    /// Create a location from its parts.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Compact display form using only the file name, for report cells.
    #[must_use]
    pub fn short(&self) -> String {
        let name = self.file.file_name().map_or_else(
            || self.file.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        format!("{name} {}:{}", self.line, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.file.display(), self.line, self.column)
    }
}

/// Position of a step definition within implementation source.
///
/// Unlike [`Location`], this also records the implementing function so
/// reports can point a reader at the code satisfying a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StepDefLocation {
    /// Path to the implementation source file.
    pub file: PathBuf,
    /// One-based line of the annotated function.
    pub line: usize,
    /// Name of the implementing function.
    pub function: String,
    /// Rendered declaration (signature) of the implementing function.
    pub declaration: String,
}

impl StepDefLocation {
    /// Compact display form using only the file name, for report cells.
    #[must_use]
    pub fn short(&self) -> String {
        let name = self.file.file_name().map_or_else(
            || self.file.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        format!("{name}:{} > {}", self.line, self.function)
    }
}

impl fmt::Display for StepDefLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : {} > {}",
            self.file.display(),
            self.line,
            self.function
        )
    }
}
