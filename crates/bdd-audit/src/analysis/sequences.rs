//! Repeated step-definition sequence mining.
//!
//! Scenario steps are flattened into one ordered list of bound
//! definitions, with a separator entry after each scenario so a run can
//! never straddle a scenario boundary. An upper-triangular self-match
//! matrix over that list turns every repetition into a diagonal run of
//! matches; runs longer than one step become candidate sequences, and
//! candidates with identical contents collapse into one.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::{Feature, Scenario, ScenarioDefinition, StepDef};

/// A step-definition subsequence occurring in more than one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedSequence {
    /// The repeated definitions, in step order.
    pub step_defs: Vec<Arc<StepDef>>,
    /// Contiguous occurrences of the sequence across all scenarios.
    pub usage: usize,
}

/// Mines `features` for step-definition sequences shared between
/// scenarios, in first-detection order.
///
/// Background steps do not take part; only scenario (and outline) steps
/// are scanned. Steps without a bound definition act as separators, so
/// repetition on either side of an unimplemented step is still found,
/// but never across it.
#[must_use]
pub fn find_repeated_sequences(features: &[Feature]) -> Vec<RepeatedSequence> {
    let mut entries: Vec<Option<Arc<StepDef>>> = Vec::new();
    for feature in features {
        for definition in &feature.scenarios {
            let scenario = definition.scenario();
            entries.extend(scenario.steps.iter().map(|step| step.step_def.clone()));
            entries.push(None);
        }
    }
    let scenarios: Vec<&Scenario> = features
        .iter()
        .flat_map(|feature| feature.scenarios.iter().map(ScenarioDefinition::scenario))
        .collect();
    detect_sequences(&entries)
        .into_iter()
        .map(|step_defs| {
            let usage = count_sequence_usage(&scenarios, &step_defs);
            RepeatedSequence { step_defs, usage }
        })
        .collect()
}

/// Upper-triangular boolean self-match matrix over the flattened entry
/// list. A cell `(row, col)` with `row <= col` is set when both entries
/// are bound and equal.
struct MatchMatrix {
    size: usize,
    cells: Vec<bool>,
}

impl MatchMatrix {
    fn build(entries: &[Option<Arc<StepDef>>]) -> Self {
        let size = entries.len();
        let mut cells = vec![false; size * size];
        for (row, entry) in entries.iter().enumerate() {
            let Some(own) = entry else {
                continue;
            };
            for col in row..size {
                let matched = entries
                    .get(col)
                    .and_then(Option::as_ref)
                    .is_some_and(|theirs| theirs == own);
                if !matched {
                    continue;
                }
                if let Some(cell) = cells.get_mut(row * size + col) {
                    *cell = true;
                }
            }
        }
        Self { size, cells }
    }

    fn at(&self, row: usize, col: usize) -> bool {
        self.cells.get(row * self.size + col).copied().unwrap_or(false)
    }
}

/// Scans every diagonal of the match matrix for runs longer than one
/// entry, de-duplicating candidates by content while keeping first-seen
/// order.
fn detect_sequences(entries: &[Option<Arc<StepDef>>]) -> Vec<Vec<Arc<StepDef>>> {
    let matrix = MatchMatrix::build(entries);
    let mut seen: HashSet<Vec<Arc<StepDef>>> = HashSet::new();
    let mut sequences: Vec<Vec<Arc<StepDef>>> = Vec::new();
    for offset in 1..entries.len() {
        let mut run: Vec<Arc<StepDef>> = Vec::new();
        for start in 0..entries.len() - offset {
            if matrix.at(start, start + offset) {
                if let Some(def) = entries.get(start).and_then(Option::as_ref) {
                    run.push(Arc::clone(def));
                }
            } else {
                flush_run(&mut run, &mut seen, &mut sequences);
            }
        }
        flush_run(&mut run, &mut seen, &mut sequences);
    }
    sequences
}

fn flush_run(
    run: &mut Vec<Arc<StepDef>>,
    seen: &mut HashSet<Vec<Arc<StepDef>>>,
    sequences: &mut Vec<Vec<Arc<StepDef>>>,
) {
    if run.len() > 1 {
        let sequence = std::mem::take(run);
        if seen.insert(sequence.clone()) {
            sequences.push(sequence);
        }
    } else {
        run.clear();
    }
}

/// Counts, over all scenarios, the contiguous windows of bound
/// definitions equal to `sequence`. Scenarios shorter than the sequence
/// contribute nothing; unbound steps never match.
fn count_sequence_usage(scenarios: &[&Scenario], sequence: &[Arc<StepDef>]) -> usize {
    if sequence.is_empty() {
        return 0;
    }
    let mut usage = 0;
    for scenario in scenarios {
        let defs = scenario.step_defs();
        if sequence.len() > defs.len() {
            continue;
        }
        usage += defs
            .windows(sequence.len())
            .filter(|window| {
                window
                    .iter()
                    .zip(sequence)
                    .all(|(entry, expected)| entry.as_deref() == Some(expected.as_ref()))
            })
            .count();
    }
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Step, StepDefLocation, StepKeyword};

    fn def(pattern: &str) -> Arc<StepDef> {
        Arc::new(StepDef::new(pattern, StepDefLocation::default()))
    }

    fn linked_scenario(name: &str, defs: &[&Arc<StepDef>]) -> ScenarioDefinition {
        let mut scenario = Scenario::new(name);
        for linked in defs {
            let mut step = Step::new(StepKeyword::Given, linked.text.clone());
            step.step_def = Some(Arc::clone(linked));
            scenario.steps.push(step);
        }
        ScenarioDefinition::Scenario(scenario)
    }

    fn feature_of(scenarios: Vec<ScenarioDefinition>) -> Feature {
        let mut feature = Feature::new("mining");
        feature.scenarios = scenarios;
        feature
    }

    fn texts(sequence: &RepeatedSequence) -> Vec<&str> {
        sequence
            .step_defs
            .iter()
            .map(|def| def.text.as_str())
            .collect()
    }

    #[test]
    fn shared_prefix_across_two_scenarios_is_detected() {
        let (a, b, c, d) = (def("A"), def("B"), def("C"), def("D"));
        let features = vec![feature_of(vec![
            linked_scenario("first", &[&a, &b, &c]),
            linked_scenario("second", &[&a, &b, &d]),
        ])];

        let sequences = find_repeated_sequences(&features);
        assert_eq!(sequences.len(), 1);
        let Some(sequence) = sequences.first() else {
            panic!("one sequence expected");
        };
        assert_eq!(texts(sequence), ["A", "B"]);
        assert_eq!(sequence.usage, 2);
    }

    #[test]
    fn identical_contents_collapse_to_one_candidate() {
        let (a, b) = (def("A"), def("B"));
        let features = vec![feature_of(vec![
            linked_scenario("one", &[&a, &b]),
            linked_scenario("two", &[&a, &b]),
            linked_scenario("three", &[&a, &b]),
        ])];

        let sequences = find_repeated_sequences(&features);
        assert_eq!(sequences.len(), 1);
        assert_eq!(sequences.first().map(|sequence| sequence.usage), Some(3));
    }

    #[test]
    fn unbound_steps_break_adjacency() {
        let (a, b) = (def("A"), def("B"));
        let mut broken = Scenario::new("broken");
        let mut first = Step::new(StepKeyword::Given, "A");
        first.step_def = Some(Arc::clone(&a));
        broken.steps.push(first);
        broken.steps.push(Step::new(StepKeyword::When, "missing"));
        let mut last = Step::new(StepKeyword::Then, "B");
        last.step_def = Some(Arc::clone(&b));
        broken.steps.push(last);

        let features = vec![feature_of(vec![
            ScenarioDefinition::Scenario(broken),
            linked_scenario("intact", &[&a, &b]),
        ])];

        assert!(find_repeated_sequences(&features).is_empty());
    }

    #[test]
    fn short_scenarios_are_skipped_when_counting_longer_sequences() {
        let (a, b, c) = (def("A"), def("B"), def("C"));
        let features = vec![feature_of(vec![
            linked_scenario("one", &[&a, &b, &c]),
            linked_scenario("two", &[&a, &b, &c]),
            linked_scenario("three", &[&a, &b]),
        ])];

        let sequences = find_repeated_sequences(&features);
        let by_text: Vec<(Vec<&str>, usize)> = sequences
            .iter()
            .map(|sequence| (texts(sequence), sequence.usage))
            .collect();
        assert!(by_text.contains(&(vec!["A", "B", "C"], 2)));
        assert!(by_text.contains(&(vec!["A", "B"], 3)));
    }

    #[test]
    fn no_features_yield_no_sequences() {
        assert!(find_repeated_sequences(&[]).is_empty());
    }
}
