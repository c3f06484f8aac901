//! Features: the top-level unit of the model tree.

use std::fmt;

use crate::filter::TagFilter;

use super::location::Location;
use super::outline::ScenarioOutline;
use super::scenario::{Background, Scenario};
use super::tag::{HasTags, Tags};

/// One child of a feature: a plain scenario or a scenario outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioDefinition {
    /// A concrete scenario.
    Scenario(Scenario),
    /// A parameterised scenario outline.
    Outline(ScenarioOutline),
}

impl ScenarioDefinition {
    /// The scenario half of either variant.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        match self {
            Self::Scenario(scenario) => scenario,
            Self::Outline(outline) => &outline.scenario,
        }
    }

    /// Mutable access to the scenario half of either variant.
    pub fn scenario_mut(&mut self) -> &mut Scenario {
        match self {
            Self::Scenario(scenario) => scenario,
            Self::Outline(outline) => &mut outline.scenario,
        }
    }

    /// The outline, when this definition is one.
    #[must_use]
    pub fn as_outline(&self) -> Option<&ScenarioOutline> {
        match self {
            Self::Scenario(_) => None,
            Self::Outline(outline) => Some(outline),
        }
    }
}

impl HasTags for ScenarioDefinition {
    fn tags(&self) -> &Tags {
        &self.scenario().tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.scenario_mut().tags
    }
}

impl fmt::Display for ScenarioDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenario(scenario) => scenario.fmt(f),
            Self::Outline(outline) => outline.fmt(f),
        }
    }
}

/// A feature file's contents: shared setup plus its scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Keyword as authored, normally `Feature`.
    pub keyword: String,
    /// Feature name, whitespace-normalised.
    pub name: String,
    /// Free-text description, when present.
    pub description: Option<String>,
    /// Tags owned by the feature itself.
    pub tags: Tags,
    /// Shared setup run before every scenario, when present.
    pub background: Option<Background>,
    /// Scenarios and scenario outlines in authored order.
    pub scenarios: Vec<ScenarioDefinition>,
    /// Position within the feature source.
    pub location: Location,
}

impl Default for Feature {
    fn default() -> Self {
        Self {
            keyword: "Feature".to_owned(),
            name: String::new(),
            description: None,
            tags: Tags::new(),
            background: None,
            scenarios: Vec::new(),
            location: Location::default(),
        }
    }
}

impl Feature {
    /// Create an empty feature with the `Feature` keyword.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: super::normalize_space(&name.into()),
            ..Self::default()
        }
    }

    /// Whether the feature declares a background.
    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Whether the feature holds at least one scenario or outline.
    #[must_use]
    pub fn has_scenarios(&self) -> bool {
        !self.scenarios.is_empty()
    }

    /// The feature's scenario outlines, in authored order.
    pub fn outlines(&self) -> impl Iterator<Item = &ScenarioOutline> {
        self.scenarios.iter().filter_map(ScenarioDefinition::as_outline)
    }

    /// Copy the feature's tags onto the background and every scenario.
    /// The feature keeps its own tags.
    pub fn pull_tags(&mut self) {
        let tags = self.tags.clone();
        if let Some(background) = &mut self.background {
            background.add_tags(tags.iter().cloned());
        }
        for definition in &mut self.scenarios {
            definition.add_tags(tags.iter().cloned());
        }
    }

    /// Remove the feature's own tags from the background and every
    /// scenario, undoing [`Feature::pull_tags`].
    pub fn optimize_tags(&mut self) {
        let tags = self.tags.clone();
        if let Some(background) = &mut self.background {
            background.remove_tags(&tags);
        }
        for definition in &mut self.scenarios {
            definition.remove_tags(&tags);
        }
    }

    /// A filtered deep copy of this feature.
    ///
    /// Feature tags are pulled down so children inherit them for the check,
    /// the background and any scenario failing the filters are dropped, and
    /// the inherited tags are lifted back off the survivors. The returned
    /// feature may hold no scenarios; callers decide whether to keep it.
    #[must_use]
    pub fn apply_tag_filters(&self, filters: &[TagFilter]) -> Self {
        let mut filtered = self.clone();
        filtered.pull_tags();
        if filtered
            .background
            .as_ref()
            .is_some_and(|background| !background.accepts_tag_filters(filters))
        {
            filtered.background = None;
        }
        filtered
            .scenarios
            .retain(|definition| definition.accepts_tag_filters(filters));
        filtered.optimize_tags();
        filtered
    }
}

impl HasTags for Feature {
    fn tags(&self) -> &Tags {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }
}

impl fmt::Display for Feature {
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
        if let Some(background) = &self.background {
            write!(f, "\n\n{}", super::indent(&background.to_string()))?;
        }
        for definition in &self.scenarios {
            write!(f, "\n\n{}", super::indent(&definition.to_string()))?;
        }
        Ok(())
    }
}
