//! Gherkin `.feature` file scanning.
//!
//! Parses feature files with the `gherkin` crate and converts them into
//! the analysis model. Scenario children of `Rule:` blocks are flattened
//! into the owning feature; rule-level backgrounds have no counterpart in
//! the model and are skipped with a warning.

use std::fs;
use std::path::Path;

use bdd_audit::model::{
    Background, DataTable, DocString, Examples, Feature, Location, Scenario, ScenarioDefinition,
    ScenarioOutline, Step, StepArg, StepKeyword, TableRow, Tag, Tags,
};
use gherkin::{GherkinEnv, LineCol, StepType};
use tracing::warn;

use crate::discovery;
use crate::error::ScanError;

/// Scan `root` recursively for `.feature` files and build the model for
/// each, in path order.
///
/// Files that fail to parse are logged and skipped, so a single bad
/// feature does not hide the rest of the suite.
///
/// # Errors
///
/// Returns an error when `root` is not a directory, holds no `.feature`
/// files, or cannot be traversed.
pub fn scan_features(root: &Path) -> Result<Vec<Feature>, ScanError> {
    let files = discovery::collect_sources(root, "feature")?;
    let mut features = Vec::new();
    for path in files {
        match load_feature(&path) {
            Ok(feature) => features.push(feature),
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping unparseable feature file");
            }
        }
    }
    Ok(features)
}

/// Parse a single `.feature` file into the model.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid Gherkin.
pub fn load_feature(path: &Path) -> Result<Feature, ScanError> {
    let mut source = fs::read_to_string(path)?;
    if !source.ends_with('\n') {
        source.push('\n');
    }
    let parsed = gherkin::Feature::parse(&source, GherkinEnv::default())?;
    Ok(convert_feature(path, &parsed))
}

fn convert_feature(path: &Path, feature: &gherkin::Feature) -> Feature {
    let mut out = Feature::new(&feature.name);
    out.keyword = feature.keyword.trim().to_owned();
    out.description = clean_description(feature.description.as_deref());
    out.tags = convert_tags(&feature.tags);
    out.location = location_at(path, feature.position);
    out.background = feature
        .background
        .as_ref()
        .map(|background| convert_background(path, background));
    for scenario in &feature.scenarios {
        out.scenarios.push(convert_definition(path, scenario));
    }
    for rule in &feature.rules {
        if rule.background.is_some() {
            warn!(
                file = %path.display(),
                "rule-level backgrounds are not modelled; their steps are skipped"
            );
        }
        for scenario in &rule.scenarios {
            out.scenarios.push(convert_definition(path, scenario));
        }
    }
    out
}

fn convert_background(path: &Path, background: &gherkin::Background) -> Background {
    let mut out = Background::new(&background.name);
    out.keyword = background.keyword.trim().to_owned();
    out.description = clean_description(background.description.as_deref());
    out.location = location_at(path, background.position);
    out.steps = background
        .steps
        .iter()
        .map(|step| convert_step(path, step))
        .collect();
    out
}

fn convert_definition(path: &Path, scenario: &gherkin::Scenario) -> ScenarioDefinition {
    let converted = convert_scenario(path, scenario);
    if is_outline(scenario) {
        let examples = scenario.examples.iter().map(convert_examples).collect();
        ScenarioDefinition::Outline(ScenarioOutline {
            scenario: converted,
            examples,
        })
    } else {
        ScenarioDefinition::Scenario(converted)
    }
}

/// An outline is any scenario carrying Examples, plus the explicitly
/// keyworded ones that do not (yet): those still expand to a single test
/// and can gain blocks later.
fn is_outline(scenario: &gherkin::Scenario) -> bool {
    if !scenario.examples.is_empty() {
        return true;
    }
    let keyword = scenario.keyword.trim();
    keyword.eq_ignore_ascii_case("Scenario Outline")
        || keyword.eq_ignore_ascii_case("Scenario Template")
}

fn convert_scenario(path: &Path, scenario: &gherkin::Scenario) -> Scenario {
    let mut out = Scenario::new(&scenario.name);
    out.keyword = scenario.keyword.trim().to_owned();
    out.description = clean_description(scenario.description.as_deref());
    out.tags = convert_tags(&scenario.tags);
    out.location = location_at(path, scenario.position);
    out.steps = scenario
        .steps
        .iter()
        .map(|step| convert_step(path, step))
        .collect();
    out
}

fn convert_step(path: &Path, step: &gherkin::Step) -> Step {
    let keyword = step
        .keyword
        .trim()
        .parse::<StepKeyword>()
        .unwrap_or_else(|_| resolved_keyword(step.ty));
    let mut out = Step::new(keyword, &step.value);
    out.location = location_at(path, step.position);
    out.argument = step_argument(step);
    out
}

/// Keyword fallback for localised or otherwise unrecognised keywords: the
/// parser has already resolved `And`/`But` chains, so its step type is a
/// safe substitute.
fn resolved_keyword(ty: StepType) -> StepKeyword {
    match ty {
        StepType::Given => StepKeyword::Given,
        StepType::When => StepKeyword::When,
        StepType::Then => StepKeyword::Then,
    }
}

fn step_argument(step: &gherkin::Step) -> Option<StepArg> {
    if let Some(table) = &step.table {
        let mut data = DataTable::new();
        for row in &table.rows {
            data.add_values(row.iter().cloned());
        }
        return Some(StepArg::Table(data));
    }
    step.docstring
        .as_ref()
        .map(|content| StepArg::DocString(DocString::new(content.clone())))
}

fn convert_examples(block: &gherkin::Examples) -> Examples {
    let mut out = Examples::default();
    out.keyword = block.keyword.trim().to_owned();
    out.tags = convert_tags(&block.tags);
    if let Some(table) = &block.table {
        let mut rows = table.rows.iter();
        if let Some(header) = rows.next() {
            out.header = TableRow::from_values(header.iter().cloned());
        }
        for row in rows {
            out.body.push(TableRow::from_values(row.iter().cloned()));
        }
    }
    out.adjust_table_size();
    out
}

fn convert_tags(tags: &[String]) -> Tags {
    tags.iter().map(Tag::new).collect()
}

fn location_at(path: &Path, position: LineCol) -> Location {
    Location::new(path, position.line, position.col)
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail loudly when the fixture cannot be built"
)]
mod tests {
    use std::fs;

    use super::*;

    const CHECKOUT: &str = "\
@billing
Feature: Checkout
  Collects payment at the end of a visit.

  Background:
    Given a signed-in customer

  @smoke
  Scenario: pay by card
    When I pay by card
    Then a receipt is printed

  Scenario Outline: pay in instalments
    When I split the bill into <parts> parts
    Then each part is <amount> euro

    @slow
    Examples:
      | parts | amount |
      | 2     | 30     |
      | 3     | 20     |
";

    fn write_feature(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write feature file");
    }

    fn checkout_feature() -> Feature {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_feature(dir.path(), "checkout.feature", CHECKOUT);
        load_feature(&dir.path().join("checkout.feature")).expect("parse feature")
    }

    #[test]
    fn converts_feature_header_and_tags() {
        let feature = checkout_feature();
        assert_eq!(feature.keyword, "Feature");
        assert_eq!(feature.name, "Checkout");
        assert_eq!(
            feature.description.as_deref(),
            Some("Collects payment at the end of a visit.")
        );
        assert!(feature.tags.contains_name("billing"));
        assert_eq!(feature.location.line, 2);
    }

    #[test]
    fn converts_background_and_scenarios() {
        let feature = checkout_feature();
        let background = feature.background.as_ref().expect("background present");
        assert_eq!(background.keyword, "Background");
        assert_eq!(
            background.steps.first().map(|step| step.text.clone()),
            Some("a signed-in customer".to_owned())
        );

        assert_eq!(feature.scenarios.len(), 2);
        let card = feature
            .scenarios
            .first()
            .expect("first scenario")
            .scenario();
        assert_eq!(card.name, "pay by card");
        assert!(card.tags.contains_name("smoke"));
        assert_eq!(card.location.line, 9);
        assert_eq!(card.steps.len(), 2);
        assert_eq!(
            card.steps.first().map(|step| step.keyword),
            Some(StepKeyword::When)
        );
    }

    #[test]
    fn converts_outline_examples_with_scoping_tags() {
        let feature = checkout_feature();
        let outline = feature
            .scenarios
            .get(1)
            .and_then(ScenarioDefinition::as_outline)
            .expect("outline present");
        assert_eq!(outline.scenario.keyword, "Scenario Outline");
        assert_eq!(outline.examples.len(), 1);

        let block = outline.examples.first().expect("examples block");
        assert!(block.tags.contains_name("slow"));
        let header: Vec<_> = block.header.values().collect();
        assert_eq!(header, ["parts", "amount"]);
        assert_eq!(block.body.len(), 2);
        assert_eq!(
            block.body.first().map(|row| row.values().collect::<Vec<_>>()),
            Some(vec!["2", "30"])
        );
    }

    #[test]
    fn and_keywords_survive_conversion() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_feature(
            dir.path(),
            "chained.feature",
            "Feature: Chained\n\n  Scenario: both\n    Given a basket\n    And a voucher\n",
        );
        let feature =
            load_feature(&dir.path().join("chained.feature")).expect("parse feature");
        let keywords: Vec<_> = feature
            .scenarios
            .iter()
            .flat_map(|definition| definition.scenario().steps.iter())
            .map(|step| step.keyword)
            .collect();
        assert_eq!(keywords, [StepKeyword::Given, StepKeyword::And]);
    }

    const ARGUMENTS: &str = r#"Feature: Arguments

  Scenario: both kinds
    Given the catalogue
      | sku | price |
      | A1  | 3     |
    When I submit a note
      """
      out of stock
      """
"#;

    #[test]
    fn docstrings_and_tables_become_step_arguments() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_feature(dir.path(), "args.feature", ARGUMENTS);
        let feature = load_feature(&dir.path().join("args.feature")).expect("parse feature");
        let steps: Vec<_> = feature
            .scenarios
            .iter()
            .flat_map(|definition| definition.scenario().steps.iter())
            .collect();

        let Some(StepArg::Table(table)) = steps.first().and_then(|step| step.argument.as_ref())
        else {
            panic!("expected a data table argument");
        };
        assert_eq!(table.rows.len(), 2);

        let Some(StepArg::DocString(doc)) = steps.get(1).and_then(|step| step.argument.as_ref())
        else {
            panic!("expected a doc string argument");
        };
        assert!(doc.content.contains("out of stock"));
    }

    #[test]
    fn unparseable_files_are_skipped_but_good_ones_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_feature(dir.path(), "checkout.feature", CHECKOUT);
        write_feature(dir.path(), "broken.feature", "Scenario: but no feature line\n");

        let features = scan_features(dir.path()).expect("scan succeeds");
        assert_eq!(features.len(), 1);
        assert_eq!(
            features.first().map(|feature| feature.name.clone()),
            Some("Checkout".to_owned())
        );
    }

    #[test]
    fn missing_root_fails_the_scan() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(matches!(
            scan_features(&dir.path().join("nowhere")),
            Err(ScanError::RootMissing(_))
        ));
    }
}
