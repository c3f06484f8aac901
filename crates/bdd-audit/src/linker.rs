//! Binds parsed steps to the step definitions that implement them.
//!
//! Every step definition pattern is treated as a regular expression that
//! must match the whole step text. Definitions are tried in discovery
//! order and the first match wins, so an earlier, broader pattern shadows
//! any later one. Steps belonging to a scenario outline are matched after
//! substituting the first data row of the outline's first examples block,
//! which is how a concrete run of the outline would read.

use std::sync::Arc;

use regex::Regex;
use tracing::warn;

use crate::model::{Feature, ScenarioDefinition, Step, StepDef};

/// A step definition paired with its compiled matcher.
///
/// `regex` is `None` when the pattern failed to compile; such a
/// definition can never match a step but still counts as discovered.
struct CompiledDef {
    def: Arc<StepDef>,
    regex: Option<Regex>,
}

/// Links every step in `features` to the first matching definition in
/// `step_defs`.
///
/// Steps that already carry a binding are left alone, so repeated calls
/// cannot rebind a step. Steps without any matching definition keep
/// [`Step::step_def`] as `None` and report as not implemented.
pub fn link_features(features: &mut [Feature], step_defs: &[Arc<StepDef>]) {
    if features.is_empty() || step_defs.is_empty() {
        return;
    }
    let compiled = compile(step_defs);
    for feature in &mut *features {
        if let Some(background) = &mut feature.background {
            for step in &mut background.steps {
                bind(&compiled, step, None);
            }
        }
        for definition in &mut feature.scenarios {
            match definition {
                ScenarioDefinition::Scenario(scenario) => {
                    for step in &mut scenario.steps {
                        bind(&compiled, step, None);
                    }
                }
                ScenarioDefinition::Outline(outline) => {
                    let values = outline.examples.first().map(|block| block.to_map(0));
                    for step in &mut outline.scenario.steps {
                        bind(&compiled, step, values.as_deref());
                    }
                }
            }
        }
    }
}

fn compile(step_defs: &[Arc<StepDef>]) -> Vec<CompiledDef> {
    step_defs
        .iter()
        .map(|def| {
            let anchored = format!("^(?:{})$", def.text);
            let regex = match Regex::new(&anchored) {
                Ok(regex) => Some(regex),
                Err(error) => {
                    warn!(
                        pattern = %def.text,
                        location = %def.location.short(),
                        %error,
                        "step definition pattern does not compile and will never match",
                    );
                    None
                }
            };
            CompiledDef {
                def: Arc::clone(def),
                regex,
            }
        })
        .collect()
}

fn bind(compiled: &[CompiledDef], step: &mut Step, values: Option<&[(String, String)]>) {
    if step.step_def.is_some() {
        return;
    }
    let text = values.map_or_else(
        || step.text.clone(),
        |values| step.text_with_parameters(values),
    );
    for candidate in compiled {
        let Some(regex) = &candidate.regex else {
            continue;
        };
        if regex.is_match(&text) {
            step.step_def = Some(Arc::clone(&candidate.def));
            return;
        }
    }
}
