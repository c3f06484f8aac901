//! The Gherkin-shaped data model.
//!
//! Entities mirror the structure of a feature file: a [`Feature`] owns an
//! optional [`Background`] and an ordered list of scenarios and scenario
//! outlines, scenarios own [`Step`]s, and outline [`Examples`] blocks carry
//! the parameter tables. [`StepDef`] is the implementation-side half,
//! produced by a step-definition scanner and bound to steps by the linker.
//!
//! The model holds construction and containment behaviour only; the
//! cross-cutting analyses live in [`crate::analysis`], [`crate::linker`],
//! and [`crate::project`]. Every entity renders back to Gherkin-style text
//! through `Display`, which the optimizer output and the tests rely on.

mod docstring;
mod examples;
mod feature;
mod keyword;
mod location;
mod outline;
mod placeholder;
mod scenario;
mod step;
mod step_def;
pub(crate) mod table;
mod tag;

pub use docstring::DocString;
pub use examples::Examples;
pub use feature::{Feature, ScenarioDefinition};
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use location::{Location, StepDefLocation};
pub use outline::ScenarioOutline;
pub use placeholder::{ParamUsage, parameter_usage, substitute};
pub use scenario::{Background, Scenario};
pub use step::{Step, StepArg};
pub use step_def::StepDef;
pub use table::{DataTable, TableCell, TableRow};
pub use tag::{HasTags, Tag, Tags};

/// Collapse interior whitespace runs to single spaces and trim both ends.
///
/// Names are normalised this way on construction so equality comparisons
/// and report cells never depend on source-file formatting.
#[must_use]
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Prefix every non-empty line of `text` with two spaces.
pub(crate) fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_space_collapses_runs_and_trims() {
        assert_eq!(normalize_space("  a   b\t c "), "a b c");
        assert_eq!(normalize_space(""), "");
    }

    #[test]
    fn indent_skips_empty_lines() {
        assert_eq!(indent("a\n\nb"), "  a\n\n  b");
    }
}
