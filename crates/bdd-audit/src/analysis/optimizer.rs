//! Scenario outline optimisation.
//!
//! Rewrites an outline's Examples tables into a minimal equivalent form:
//! empty blocks are dropped, blocks with the same tag scope are joined,
//! columns no placeholder refers to are pruned, and parameters used
//! exactly once with a constant value are inlined into the step text.
//! The pipeline always works on a deep copy of the source outline, so
//! repeated runs over the same source are independent and produce equal
//! results.

use crate::model::{Examples, ScenarioOutline};

/// Optimises `outline` into a fresh, minimal copy.
///
/// The source is never mutated. An outline without Examples blocks is
/// returned as an unchanged copy.
#[must_use]
pub fn optimize_outline(outline: &ScenarioOutline) -> ScenarioOutline {
    let mut optimized = outline.clone();
    if !optimized.has_examples() {
        return optimized;
    }
    remove_empty_examples(&mut optimized);
    join_examples_of_the_same_scope(&mut optimized);
    remove_not_used_columns(&mut optimized);
    replace_needless_parameters(&mut optimized);
    remove_empty_examples(&mut optimized);
    optimized
}

fn remove_empty_examples(outline: &mut ScenarioOutline) {
    outline.examples.retain(|block| !block.body.is_empty());
}

/// Greedily groups blocks by tag-set equality, in first-seen order, and
/// joins each group into a single block.
fn join_examples_of_the_same_scope(outline: &mut ScenarioOutline) {
    if outline.examples.len() < 2 {
        return;
    }
    let mut pool = std::mem::take(&mut outline.examples);
    let mut joined = Vec::new();
    while !pool.is_empty() {
        let origin = pool.remove(0);
        let mut group = vec![origin];
        pool.retain(|candidate| {
            let same_scope = group
                .first()
                .is_some_and(|origin| origin.has_same_scope_with(candidate));
            if same_scope {
                group.push(candidate.clone());
            }
            !same_scope
        });
        joined.push(Examples::join(&group));
    }
    outline.examples = joined;
}

/// Drops every column whose name never occurs as a placeholder in the
/// outline's steps or name, then de-duplicates rows in every block.
fn remove_not_used_columns(outline: &mut ScenarioOutline) {
    let Some((first, rest)) = outline.examples.split_first() else {
        return;
    };
    let merged = rest.iter().fold(first.header.clone(), |header, block| {
        header.merge_values(&block.header)
    });
    let usage = outline.parameter_usage();
    let dead: Vec<String> = merged
        .values()
        .filter(|name| !usage.contains(name))
        .map(str::to_owned)
        .collect();
    for block in &mut outline.examples {
        block.remove_columns_named(&dead);
        block.dedup_rows();
    }
}

/// Inlines parameters used exactly once whose column is constant across a
/// join of all blocks, substituting the row-0 value into the steps, then
/// prunes the now-dead columns.
fn replace_needless_parameters(outline: &mut ScenarioOutline) {
    let joined = Examples::join(&outline.examples);
    let usage = outline.parameter_usage();
    let once_used: Vec<String> = usage
        .iter()
        .filter(|&(_, count)| count == 1)
        .map(|(name, _)| name.to_owned())
        .collect();
    let constant_names = joined.param_names(&joined.find_constant_columns());
    let replaceable: Vec<String> = once_used
        .into_iter()
        .filter(|name| constant_names.contains(name))
        .collect();
    if !replaceable.is_empty() {
        let values = joined.to_map_of(0, &replaceable);
        for step in &mut outline.scenario.steps {
            step.apply_parameters(&values);
        }
    }
    remove_not_used_columns(outline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HasTags, Step, StepKeyword, Tag};

    fn outline(name: &str, steps: &[&str]) -> ScenarioOutline {
        let mut outline = ScenarioOutline::new(name);
        for text in steps {
            outline.scenario.steps.push(Step::new(StepKeyword::When, *text));
        }
        outline
    }

    fn block(header: &[&str], rows: &[&[&str]]) -> Examples {
        let mut block = Examples::with_header(header.iter().copied());
        for row in rows {
            block.add_row(row.iter().copied());
        }
        block
    }

    fn header_of(outline: &ScenarioOutline, index: usize) -> Vec<String> {
        outline
            .examples
            .get(index)
            .map(|block| block.header.values().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn rows_of(outline: &ScenarioOutline, index: usize) -> Vec<Vec<String>> {
        outline
            .examples
            .get(index)
            .map(|block| {
                block
                    .body
                    .iter()
                    .map(|row| row.values().map(str::to_owned).collect())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn source_outline_is_never_mutated() {
        let mut subject = outline("sample", &["I open <id>"]);
        subject.examples.push(block(&["id", "junk"], &[&["1", "x"]]));
        let snapshot = subject.clone();

        let optimized = optimize_outline(&subject);
        assert_eq!(subject, snapshot);
        assert_ne!(optimized, subject);
    }

    #[test]
    fn outline_without_examples_comes_back_unchanged() {
        let subject = outline("sample", &["I open <id>"]);
        assert_eq!(optimize_outline(&subject), subject);
    }

    #[test]
    fn empty_blocks_are_dropped() {
        let mut subject = outline("sample", &["I open <id>", "I close <id>"]);
        subject.examples.push(block(&["id"], &[]));
        subject.examples.push(block(&["id"], &[&["1"]]));

        let optimized = optimize_outline(&subject);
        assert_eq!(optimized.examples.len(), 1);
        assert_eq!(rows_of(&optimized, 0), [["1"]]);
    }

    #[test]
    fn unused_columns_are_pruned_from_header_and_rows() {
        let mut subject = outline("sample", &["I open <id>", "I close <id> as <name>"]);
        subject.examples.push(block(
            &["id", "name", "env"],
            &[&["1", "a", "x"], &["2", "b", "y"]],
        ));

        let optimized = optimize_outline(&subject);
        assert_eq!(header_of(&optimized, 0), ["id", "name"]);
        assert_eq!(rows_of(&optimized, 0), [["1", "a"], ["2", "b"]]);
    }

    #[test]
    fn same_scope_blocks_join_and_distinct_scopes_stay_apart() {
        let mut subject = outline("sample", &["I open <id>"]);
        subject.examples.push(block(&["id"], &[&["1"]]));
        let mut slow = block(&["id"], &[&["3"]]);
        slow.add_tag(Tag::new("slow"));
        subject.examples.push(slow);
        subject.examples.push(block(&["id"], &[&["2"]]));

        let optimized = optimize_outline(&subject);
        assert_eq!(optimized.examples.len(), 2);
        assert_eq!(rows_of(&optimized, 0), [["1"], ["2"]]);
        assert_eq!(rows_of(&optimized, 1), [["3"]]);
        let scoped = optimized
            .examples
            .get(1)
            .is_some_and(|block| block.tags.contains_name("slow"));
        assert!(scoped);
    }

    #[test]
    fn joining_drops_duplicate_rows() {
        let mut subject = outline("sample", &["I open <id>"]);
        subject.examples.push(block(&["id"], &[&["1"]]));
        subject.examples.push(block(&["id"], &[&["1"], &["2"]]));

        let optimized = optimize_outline(&subject);
        assert_eq!(rows_of(&optimized, 0), [["1"], ["2"]]);
    }

    #[test]
    fn single_use_constant_parameter_is_inlined() {
        let mut subject = outline("sample", &["I load user <id>", "I connect to <host>"]);
        subject.examples.push(block(
            &["id", "host"],
            &[&["1", "prod"], &["2", "prod"]],
        ));

        let optimized = optimize_outline(&subject);
        let texts: Vec<_> = optimized
            .scenario
            .steps
            .iter()
            .map(|step| step.text.as_str())
            .collect();
        assert_eq!(texts, ["I load user <id>", "I connect to prod"]);
        assert_eq!(header_of(&optimized, 0), ["id"]);
        assert_eq!(rows_of(&optimized, 0), [["1"], ["2"]]);
    }

    #[test]
    fn varying_or_multi_use_parameters_are_not_inlined() {
        let mut subject = outline(
            "sample",
            &["I connect to <host>", "I disconnect from <host>", "I load <id>"],
        );
        subject.examples.push(block(
            &["id", "host"],
            &[&["1", "prod"], &["2", "prod"]],
        ));

        let optimized = optimize_outline(&subject);
        assert_eq!(header_of(&optimized, 0), ["id", "host"]);
    }

    #[test]
    fn name_only_parameters_keep_their_column_and_name() {
        let mut subject = outline("check <env> health", &["I ping the gateway"]);
        subject
            .examples
            .push(block(&["env"], &[&["prod"], &["prod"]]));

        let optimized = optimize_outline(&subject);
        assert_eq!(optimized.scenario.name, "check <env> health");
        assert_eq!(header_of(&optimized, 0), ["env"]);
        assert_eq!(rows_of(&optimized, 0), [["prod"]]);
    }

    #[test]
    fn optimizing_twice_yields_the_same_result() {
        let mut subject = outline("sample", &["I open <id>", "I connect to <host>"]);
        subject.examples.push(block(&["id", "junk"], &[&["1", "x"]]));
        subject
            .examples
            .push(block(&["id", "host"], &[&["1", "prod"], &["2", "prod"]]));

        let once = optimize_outline(&subject);
        let twice = optimize_outline(&once);
        assert_eq!(once, twice);
    }
}
