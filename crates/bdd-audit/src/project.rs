//! The project aggregate: every feature and step definition of one suite.
//!
//! A [`Project`] links its steps on construction and then serves the
//! cross-suite queries and report tables. All reports are returned as
//! [`DataTable`]s so callers choose the delimiter and output sink;
//! nothing here prints.

use std::sync::Arc;

use crate::analysis::{self, DuplicateGroup, RepeatedSequence};
use crate::filter::TagFilter;
use crate::linker;
use crate::model::{
    Background, DataTable, Feature, Scenario, ScenarioDefinition, ScenarioOutline, Step, StepDef,
    Tag, Tags,
};

/// How often one tag occurs on each kind of node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUsage {
    /// The counted tag.
    pub tag: Tag,
    /// Occurrences on features.
    pub features: usize,
    /// Occurrences on backgrounds.
    pub backgrounds: usize,
    /// Occurrences on scenarios and scenario outlines.
    pub scenarios: usize,
    /// Occurrences on Examples blocks.
    pub examples: usize,
}

impl TagUsage {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            features: 0,
            backgrounds: 0,
            scenarios: 0,
            examples: 0,
        }
    }

    /// Occurrences across all node kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.features + self.backgrounds + self.scenarios + self.examples
    }
}

/// How often one step definition satisfies a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefUsage {
    /// The counted definition.
    pub def: Arc<StepDef>,
    /// Number of implemented steps bound to it.
    pub count: usize,
}

/// An analysed suite: features plus the step definitions implementing
/// them, linked once at construction.
#[derive(Debug, Clone, Default)]
pub struct Project {
    features: Vec<Feature>,
    step_defs: Vec<Arc<StepDef>>,
}

impl Project {
    /// Build a project and bind every step to its first matching
    /// definition.
    #[must_use]
    pub fn new(mut features: Vec<Feature>, step_defs: Vec<Arc<StepDef>>) -> Self {
        linker::link_features(&mut features, &step_defs);
        Self {
            features,
            step_defs,
        }
    }

    /// The project's features in discovery order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The project's step definitions in discovery order.
    #[must_use]
    pub fn step_defs(&self) -> &[Arc<StepDef>] {
        &self.step_defs
    }

    /// Scenario definitions across all features, in feature order.
    pub fn scenario_definitions(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.features.iter().flat_map(|feature| feature.scenarios.iter())
    }

    /// Every scenario in the project, outlines included, flattened in
    /// feature order.
    #[must_use]
    pub fn scenarios(&self) -> Vec<&Scenario> {
        self.scenario_definitions()
            .map(ScenarioDefinition::scenario)
            .collect()
    }

    /// Every scenario outline in the project.
    #[must_use]
    pub fn outlines(&self) -> Vec<&ScenarioOutline> {
        self.features.iter().flat_map(Feature::outlines).collect()
    }

    /// Every background in the project, in feature order.
    pub fn backgrounds(&self) -> impl Iterator<Item = &Background> {
        self.features
            .iter()
            .filter_map(|feature| feature.background.as_ref())
    }

    /// Every step in the project: all background steps first, then all
    /// scenario steps. Usage counts key off this order.
    #[must_use]
    pub fn steps(&self) -> Vec<&Step> {
        let mut steps: Vec<&Step> = Vec::new();
        for background in self.backgrounds() {
            steps.extend(background.steps.iter());
        }
        for definition in self.scenario_definitions() {
            steps.extend(definition.scenario().steps.iter());
        }
        steps
    }

    /// Steps bound to an implemented definition.
    #[must_use]
    pub fn implemented_steps(&self) -> Vec<&Step> {
        self.steps()
            .into_iter()
            .filter(|step| step.is_implemented())
            .collect()
    }

    /// Steps without an implemented definition.
    #[must_use]
    pub fn not_implemented_steps(&self) -> Vec<&Step> {
        self.steps()
            .into_iter()
            .filter(|step| !step.is_implemented())
            .collect()
    }

    /// Union of every tag in the project: feature, background, scenario,
    /// and Examples tags, deduplicated in first-seen order.
    #[must_use]
    pub fn tags(&self) -> Tags {
        let mut tags = Tags::new();
        for feature in &self.features {
            tags.extend(feature.tags.iter().cloned());
        }
        for background in self.backgrounds() {
            tags.extend(background.tags.iter().cloned());
        }
        for definition in self.scenario_definitions() {
            tags.extend(definition.scenario().tags.iter().cloned());
            if let Some(outline) = definition.as_outline() {
                for block in &outline.examples {
                    tags.extend(block.tags.iter().cloned());
                }
            }
        }
        tags
    }

    /// Definitions bound to at least one implemented step, distinct, in
    /// first-use order.
    #[must_use]
    pub fn used_step_defs(&self) -> Vec<Arc<StepDef>> {
        let mut used: Vec<Arc<StepDef>> = Vec::new();
        for step in self.steps() {
            if !step.is_implemented() {
                continue;
            }
            let Some(def) = &step.step_def else {
                continue;
            };
            if !used.contains(def) {
                used.push(Arc::clone(def));
            }
        }
        used
    }

    /// Definitions never bound to any step.
    #[must_use]
    pub fn unused_step_defs(&self) -> Vec<Arc<StepDef>> {
        let used = self.used_step_defs();
        self.step_defs
            .iter()
            .filter(|&def| !used.contains(def))
            .map(Arc::clone)
            .collect()
    }

    /// Number of concrete test cases the suite expands into.
    ///
    /// A scenario counts once; an outline counts once per Examples body
    /// row across all its blocks, and still counts once when it carries
    /// no rows at all.
    #[must_use]
    pub fn count_tests(&self) -> usize {
        self.scenario_definitions()
            .map(|definition| match definition.as_outline() {
                Some(outline) => {
                    let rows: usize = outline.examples.iter().map(|block| block.body.len()).sum();
                    rows.max(1)
                }
                None => 1,
            })
            .sum()
    }

    /// Per-tag occurrence counts, in first-seen order: features first,
    /// then backgrounds, then scenarios with their Examples blocks.
    #[must_use]
    pub fn tag_usage(&self) -> Vec<TagUsage> {
        let mut usage: Vec<TagUsage> = Vec::new();
        for feature in &self.features {
            tally(&mut usage, &feature.tags, |entry| entry.features += 1);
        }
        for background in self.backgrounds() {
            tally(&mut usage, &background.tags, |entry| entry.backgrounds += 1);
        }
        for definition in self.scenario_definitions() {
            tally(&mut usage, &definition.scenario().tags, |entry| {
                entry.scenarios += 1;
            });
            if let Some(outline) = definition.as_outline() {
                for block in &outline.examples {
                    tally(&mut usage, &block.tags, |entry| entry.examples += 1);
                }
            }
        }
        usage
    }

    /// Per-definition bind counts over implemented steps, in first-use
    /// order.
    #[must_use]
    pub fn step_def_usage(&self) -> Vec<StepDefUsage> {
        let mut usage: Vec<StepDefUsage> = Vec::new();
        for step in self.steps() {
            if !step.is_implemented() {
                continue;
            }
            let Some(def) = &step.step_def else {
                continue;
            };
            if let Some(entry) = usage.iter_mut().find(|entry| entry.def == *def) {
                entry.count += 1;
                continue;
            }
            usage.push(StepDefUsage {
                def: Arc::clone(def),
                count: 1,
            });
        }
        usage
    }

    /// Duplicate-scenario buckets over the flattened scenario list.
    #[must_use]
    pub fn duplicated_scenarios(&self) -> Vec<DuplicateGroup<'_>> {
        analysis::find_duplicated_scenarios(&self.scenarios())
    }

    /// Step-definition sequences repeated across scenarios, in detection
    /// order.
    #[must_use]
    pub fn repeated_sequences(&self) -> Vec<RepeatedSequence> {
        analysis::find_repeated_sequences(&self.features)
    }

    /// Outlines whose optimised form differs from the original, paired
    /// with that form.
    #[must_use]
    pub fn optimizable_outlines(&self) -> Vec<(&ScenarioOutline, ScenarioOutline)> {
        self.outlines()
            .into_iter()
            .filter_map(|outline| {
                let optimized = analysis::optimize_outline(outline);
                (optimized != *outline).then_some((outline, optimized))
            })
            .collect()
    }

    /// A filtered copy of the project.
    ///
    /// Each feature is filtered as [`Feature::apply_tag_filters`] does;
    /// features left without scenarios are dropped. Step bindings survive
    /// the copy, so the filtered project needs no re-linking and shares
    /// the definition list.
    #[must_use]
    pub fn apply_tag_filters(&self, filters: &[TagFilter]) -> Self {
        let features = self
            .features
            .iter()
            .map(|feature| feature.apply_tag_filters(filters))
            .filter(Feature::has_scenarios)
            .collect();
        Self {
            features,
            step_defs: self.step_defs.clone(),
        }
    }

    /// Summary counts for the whole suite, one `label | value` row each.
    #[must_use]
    pub fn statistics(&self) -> DataTable {
        let mut table = DataTable::new();
        add_stat(&mut table, "Features", self.features.len());
        add_stat(&mut table, "Scenarios", self.scenarios().len());
        add_stat(&mut table, "Scenario Outlines", self.outlines().len());
        add_stat(&mut table, "Backgrounds", self.backgrounds().count());
        add_stat(&mut table, "Steps", self.steps().len());
        add_stat(&mut table, "Implemented steps", self.implemented_steps().len());
        add_stat(
            &mut table,
            "Not implemented steps",
            self.not_implemented_steps().len(),
        );
        add_stat(&mut table, "Step Definitions", self.step_defs.len());
        add_stat(
            &mut table,
            "Not used Step Definitions",
            self.unused_step_defs().len(),
        );
        add_stat(&mut table, "Tags", self.tags().len());
        add_stat(&mut table, "Tests", self.count_tests());
        table
    }

    /// Tag-usage report: header row, then one row per tag sorted by
    /// total occurrences, highest first. Ties keep first-seen order.
    #[must_use]
    pub fn tag_usage_table(&self) -> DataTable {
        let mut usage = self.tag_usage();
        usage.sort_by_key(|entry| std::cmp::Reverse(entry.total()));
        let mut table = DataTable::new();
        table.add_values(["Tag", "Features", "Backgrounds", "Scenarios", "Examples"]);
        for entry in usage {
            table.add_values([
                entry.tag.name().to_owned(),
                entry.features.to_string(),
                entry.backgrounds.to_string(),
                entry.scenarios.to_string(),
                entry.examples.to_string(),
            ]);
        }
        table
    }

    /// Step-definition usage report: three rows per definition (pattern
    /// and count, location, separator), least used first. Ties keep
    /// first-use order.
    #[must_use]
    pub fn step_def_usage_table(&self) -> DataTable {
        let mut usage = self.step_def_usage();
        usage.sort_by_key(|entry| entry.count);
        let mut table = DataTable::new();
        for entry in usage {
            table.add_values([entry.def.text.clone(), entry.count.to_string()]);
            table.add_values([entry.def.location.short(), String::new()]);
            table.add_values([String::new(), String::new()]);
        }
        table
    }

    /// Duplicate-scenario report: header row, a separator row, then each
    /// bucket's members followed by a separator row.
    #[must_use]
    pub fn duplicated_scenarios_table(&self) -> DataTable {
        let groups = self.duplicated_scenarios();
        let mut table = DataTable::new();
        table.add_values(["SCENARIO", "LOCATION", "EQUALITY"]);
        table.add_values(["", "", ""]);
        for group in &groups {
            for member in &group.members {
                table.add_values([
                    member.scenario.name.clone(),
                    member.scenario.location.short(),
                    member.kind.as_str().to_owned(),
                ]);
            }
            table.add_values(["", "", ""]);
        }
        table
    }

    /// Listing of steps without an implemented definition: step line and
    /// source location, one row each.
    #[must_use]
    pub fn not_implemented_table(&self) -> DataTable {
        let mut table = DataTable::new();
        for step in self.not_implemented_steps() {
            table.add_values([
                format!("{} {}", step.keyword, step.text),
                step.location.short(),
            ]);
        }
        table
    }

    /// Listing of definitions never bound to a step: pattern and
    /// location, one row each.
    #[must_use]
    pub fn unused_step_defs_table(&self) -> DataTable {
        let mut table = DataTable::new();
        for def in self.unused_step_defs() {
            table.add_row(def.to_table_row());
        }
        table
    }
}

fn add_stat(table: &mut DataTable, label: &str, value: usize) {
    table.add_values([label.to_owned(), value.to_string()]);
}

fn tally<'a, I>(usage: &mut Vec<TagUsage>, tags: I, bump: fn(&mut TagUsage))
where
    I: IntoIterator<Item = &'a Tag>,
{
    for tag in tags {
        if let Some(entry) = usage.iter_mut().find(|entry| entry.tag == *tag) {
            bump(entry);
            continue;
        }
        let mut entry = TagUsage::new(tag.clone());
        bump(&mut entry);
        usage.push(entry);
    }
}
