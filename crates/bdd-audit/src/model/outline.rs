//! Scenario outlines: parameterised scenarios expanded by Examples tables.

use std::fmt;

use super::examples::Examples;
use super::placeholder::{self, ParamUsage};
use super::scenario::Scenario;

/// A scenario template with `<name>` placeholders, expanded once per row of
/// its [`Examples`] tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioOutline {
    /// The underlying scenario: name, tags, steps, location.
    pub scenario: Scenario,
    /// Examples blocks in authored order.
    pub examples: Vec<Examples>,
}

impl ScenarioOutline {
    /// Create an empty outline with the `Scenario Outline` keyword.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut scenario = Scenario::new(name);
        scenario.keyword = "Scenario Outline".to_owned();
        Self {
            scenario,
            examples: Vec::new(),
        }
    }

    /// Whether the outline carries at least one Examples block.
    #[must_use]
    pub fn has_examples(&self) -> bool {
        !self.examples.is_empty()
    }

    /// Placeholder usage across the whole outline: every step's text and
    /// data-table cells, then the scenario name, summed into one ordered
    /// name-to-count map.
    #[must_use]
    pub fn parameter_usage(&self) -> ParamUsage {
        let mut usage = ParamUsage::new();
        for step in &self.scenario.steps {
            usage.merge(&step.parameter_usage());
        }
        usage.merge(&placeholder::parameter_usage(&self.scenario.name));
        usage
    }

}

impl fmt::Display for ScenarioOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.scenario)?;
        for block in &self.examples {
            write!(f, "\n\n{block}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Step, StepKeyword};

    fn outline(name: &str, steps: &[&str]) -> ScenarioOutline {
        let mut outline = ScenarioOutline::new(name);
        for text in steps {
            outline.scenario.steps.push(Step::new(StepKeyword::When, *text));
        }
        outline
    }

    #[test]
    fn new_sets_outline_keyword() {
        assert_eq!(ScenarioOutline::new("sample").scenario.keyword, "Scenario Outline");
    }

    #[test]
    fn parameter_usage_counts_steps_then_name() {
        let subject = outline("check <env> twice", &["I open <env>", "I see <page>"]);
        let usage = subject.parameter_usage();
        assert_eq!(usage.count("env"), Some(2));
        assert_eq!(usage.count("page"), Some(1));
        assert_eq!(usage.names().collect::<Vec<_>>(), ["env", "page"]);
    }

    #[test]
    fn renders_examples_after_blank_line() {
        let mut subject = outline("sample", &["I open <env>"]);
        let mut block = Examples::with_header(["env"]);
        block.add_row(["prod"]);
        subject.examples.push(block);
        assert_eq!(
            subject.to_string(),
            "Scenario Outline: sample\n  When I open <env>\n\nExamples: \n  |env |\n  |prod|"
        );
    }
}
