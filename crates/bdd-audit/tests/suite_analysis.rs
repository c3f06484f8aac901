//! Behavioural tests for whole-suite analysis: linking, reports, tag
//! filtering, sequence mining, and outline optimisation working together.

use std::sync::Arc;

use bdd_audit::model::{
    Background, DataTable, Examples, Feature, HasTags, Location, Scenario, ScenarioDefinition,
    ScenarioOutline, Step, StepDef, StepDefLocation, StepKeyword, Tag,
};
use bdd_audit::{Project, TagFilter};

fn def(pattern: &str, file: &str, line: usize, function: &str) -> Arc<StepDef> {
    let location = StepDefLocation {
        file: file.into(),
        line,
        function: function.to_owned(),
        declaration: format!("fn {function}()"),
    };
    Arc::new(StepDef::new(pattern, location))
}

fn step(keyword: StepKeyword, text: &str) -> Step {
    Step::new(keyword, text)
}

/// A parcel-tracking suite: two features, one background, one outline,
/// one unimplemented step, and one definition nothing uses.
fn parcel_suite() -> Project {
    let mut tracking = Feature::new("parcel tracking");
    tracking.add_tag(Tag::new("tracking"));
    tracking.location = Location::new("features/tracking.feature", 1, 1);

    let mut background = Background::new("a courier session");
    background.keyword = "Background".to_owned();
    background.steps.push(step(StepKeyword::Given, "a signed-in courier"));
    tracking.background = Some(background);

    let mut delivered = Scenario::new("track a delivered parcel");
    delivered.add_tag(Tag::new("smoke"));
    delivered.location = Location::new("features/tracking.feature", 8, 3);
    delivered.steps.push(step(StepKeyword::When, "I look up parcel P1"));
    delivered
        .steps
        .push(step(StepKeyword::Then, "the status is delivered"));
    tracking
        .scenarios
        .push(ScenarioDefinition::Scenario(delivered));

    let mut by_id = ScenarioOutline::new("track by id");
    by_id.scenario.location = Location::new("features/tracking.feature", 14, 3);
    by_id
        .scenario
        .steps
        .push(step(StepKeyword::When, "I look up parcel <id>"));
    by_id
        .scenario
        .steps
        .push(step(StepKeyword::Then, "the status is <status>"));
    let mut rows = Examples::with_header(["id", "status"]);
    rows.add_row(["P1", "delivered"]);
    rows.add_row(["P2", "in transit"]);
    by_id.examples.push(rows);
    tracking.scenarios.push(ScenarioDefinition::Outline(by_id));

    let mut returns = Feature::new("parcel returns");
    returns.add_tag(Tag::new("returns"));
    returns.location = Location::new("features/returns.feature", 1, 1);

    let mut no_label = Scenario::new("return without label");
    no_label.add_tag(Tag::new("slow"));
    no_label.location = Location::new("features/returns.feature", 5, 3);
    no_label.steps.push(step(StepKeyword::When, "I look up parcel P9"));
    no_label
        .steps
        .push(step(StepKeyword::Then, "a return label is missing"));
    let mut refund = step(StepKeyword::Then, "the refund is queued");
    refund.location = Location::new("features/returns.feature", 9, 5);
    no_label.steps.push(refund);
    returns.scenarios.push(ScenarioDefinition::Scenario(no_label));

    Project::new(
        vec![tracking, returns],
        vec![
            def("a signed-in courier", "tests/steps/support.rs", 8, "sign_in"),
            def("I look up parcel (\\w+)", "tests/steps/lookup.rs", 21, "look_up"),
            def("the status is (.+)", "tests/steps/lookup.rs", 34, "assert_status"),
            def(
                "a return label is missing",
                "tests/steps/returns.rs",
                10,
                "label_missing",
            ),
            def("a parcel is archived", "tests/steps/archive.rs", 5, "archive"),
        ],
    )
}

fn stat(table: &DataTable, label: &str) -> Option<String> {
    table
        .rows
        .iter()
        .find(|row| row.value(0) == Some(label))
        .and_then(|row| row.value(1))
        .map(str::to_owned)
}

#[test]
fn statistics_summarise_the_linked_suite() {
    let table = parcel_suite().statistics();
    assert_eq!(stat(&table, "Features").as_deref(), Some("2"));
    assert_eq!(stat(&table, "Scenarios").as_deref(), Some("3"));
    assert_eq!(stat(&table, "Scenario Outlines").as_deref(), Some("1"));
    assert_eq!(stat(&table, "Backgrounds").as_deref(), Some("1"));
    assert_eq!(stat(&table, "Steps").as_deref(), Some("8"));
    assert_eq!(stat(&table, "Implemented steps").as_deref(), Some("7"));
    assert_eq!(stat(&table, "Not implemented steps").as_deref(), Some("1"));
    assert_eq!(stat(&table, "Step Definitions").as_deref(), Some("5"));
    assert_eq!(stat(&table, "Not used Step Definitions").as_deref(), Some("1"));
    assert_eq!(stat(&table, "Tags").as_deref(), Some("4"));
    assert_eq!(stat(&table, "Tests").as_deref(), Some("4"));
}

#[test]
fn unimplemented_steps_are_reported_with_their_location() {
    let table = parcel_suite().not_implemented_table();
    assert_eq!(
        table.render("|"),
        "|Then the refund is queued|returns.feature 9:5|"
    );
}

#[test]
fn unused_definitions_point_at_their_function() {
    let table = parcel_suite().unused_step_defs_table();
    assert_eq!(
        table.render("|"),
        "|a parcel is archived|archive.rs:5 > archive|"
    );
}

#[test]
fn tag_filters_and_across_filters_and_or_within_one() {
    let project = parcel_suite();

    let tracking_only = project.apply_tag_filters(&[TagFilter::new("@tracking")]);
    assert_eq!(tracking_only.features().len(), 1);
    assert_eq!(tracking_only.scenarios().len(), 2);

    let tracking_not_smoke =
        project.apply_tag_filters(&[TagFilter::new("@tracking"), TagFilter::new("~@smoke")]);
    assert_eq!(tracking_not_smoke.scenarios().len(), 1);
    assert_eq!(
        tracking_not_smoke
            .scenarios()
            .first()
            .map(|scenario| scenario.name.clone()),
        Some("track by id".to_owned())
    );

    let smoke_or_slow = project.apply_tag_filters(&[TagFilter::new("@smoke,@slow")]);
    assert_eq!(smoke_or_slow.features().len(), 2);
    assert_eq!(smoke_or_slow.scenarios().len(), 2);
}

#[test]
fn repeated_step_sequences_are_mined_across_scenarios() {
    let project = parcel_suite();
    let sequences = project.repeated_sequences();
    assert_eq!(sequences.len(), 1);

    let Some(sequence) = sequences.first() else {
        return;
    };
    let texts: Vec<_> = sequence
        .step_defs
        .iter()
        .map(|def| def.text.as_str())
        .collect();
    assert_eq!(texts, ["I look up parcel (\\w+)", "the status is (.+)"]);
    assert_eq!(sequence.usage, 2);
}

#[test]
fn bound_and_parameterised_lookups_bucket_as_parameter_duplicates() {
    let project = parcel_suite();
    let groups = project.duplicated_scenarios();
    assert_eq!(groups.len(), 1);
    let names: Vec<_> = groups
        .iter()
        .flat_map(|group| {
            group
                .members
                .iter()
                .map(|member| member.scenario.name.as_str())
        })
        .collect();
    assert_eq!(names, ["track a delivered parcel", "track by id"]);
}

#[test]
fn tidy_outlines_are_not_flagged_as_optimizable() {
    assert!(parcel_suite().optimizable_outlines().is_empty());
}

#[test]
fn wasteful_outlines_are_optimised_without_touching_the_source() {
    let mut audits = Feature::new("parcel audits");
    let mut outline = ScenarioOutline::new("audit a parcel");
    outline
        .scenario
        .steps
        .push(step(StepKeyword::When, "I look up parcel <id>"));
    let mut rows = Examples::with_header(["id", "notes"]);
    rows.add_row(["P1", "checked by rota"]);
    rows.add_row(["P2", "spot check"]);
    outline.examples.push(rows);
    audits.scenarios.push(ScenarioDefinition::Outline(outline));
    let project = Project::new(vec![audits], Vec::new());

    let optimised = project.optimizable_outlines();
    assert_eq!(optimised.len(), 1);
    let Some((original, slimmed)) = optimised.first() else {
        return;
    };
    assert_eq!(
        original.examples.first().map(|block| block.header.len()),
        Some(2)
    );
    let headers: Vec<Vec<&str>> = slimmed
        .examples
        .iter()
        .map(|block| block.header.values().collect())
        .collect();
    assert_eq!(headers, [["id"]]);
    assert_eq!(slimmed.examples.first().map(|block| block.body.len()), Some(2));
}
