//! Scenarios and backgrounds.

use std::fmt;
use std::sync::Arc;

use super::location::Location;
use super::step::Step;
use super::step_def::StepDef;
use super::tag::{HasTags, Tags};

/// A named sequence of steps describing one test case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    /// Keyword as authored (`Scenario`, `Scenario Outline`, `Background`).
    pub keyword: String,
    /// Scenario name, whitespace-normalised.
    pub name: String,
    /// Free-text description, when present.
    pub description: Option<String>,
    /// Tags owned by this scenario.
    pub tags: Tags,
    /// Steps in authored order.
    pub steps: Vec<Step>,
    /// Position within the feature source.
    pub location: Location,
}

/// A scenario-shaped block run implicitly before every scenario in its
/// feature. Backgrounds carry no tags of their own until feature tags are
/// pulled down during filtering.
pub type Background = Scenario;

impl Scenario {
    /// Create an empty scenario with the `Scenario` keyword.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            keyword: "Scenario".to_owned(),
            name: super::normalize_space(&name.into()),
            ..Self::default()
        }
    }

    /// Whether every step has a bound, implemented definition.
    /// Vacuously true for a scenario with no steps.
    #[must_use]
    pub fn is_implemented(&self) -> bool {
        self.steps.iter().all(Step::is_implemented)
    }

    /// Full equality: same step count, pairwise identical step text.
    #[must_use]
    pub fn is_fully_equal_to(&self, other: &Self) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(own, theirs)| own.is_fully_equal_to(theirs))
    }

    /// Equality ignoring parameter values: same step count, pairwise equal
    /// bound definitions (see [`Step::is_equal_to_ignore_parameters`]).
    #[must_use]
    pub fn is_equal_to_ignore_parameters(&self, other: &Self) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(own, theirs)| own.is_equal_to_ignore_parameters(theirs))
    }

    /// The steps' bound definitions in order, `None` for unlinked steps.
    #[must_use]
    pub fn step_defs(&self) -> Vec<Option<Arc<StepDef>>> {
        self.steps.iter().map(|step| step.step_def.clone()).collect()
    }

    /// Whether any implemented step is bound to a definition equal to `def`.
    #[must_use]
    pub fn uses_step_def(&self, def: &StepDef) -> bool {
        self.steps
            .iter()
            .any(|step| step.is_implemented() && step.step_def.as_deref() == Some(def))
    }

    /// Whether the scenario holds at least one step.
    #[must_use]
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }
}

impl HasTags for Scenario {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            writeln!(f, "{}", self.tags)?;
        }
        write!(f, "{}: {}", self.keyword, self.name)?;
        if let Some(description) = self
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            write!(f, "\n{}", super::indent(description))?;
        }
        for step in &self.steps {
            write!(f, "\n{}", super::indent(&step.to_string()))?;
        }
        Ok(())
    }
}
