//! Rust step-definition scanning.
//!
//! Parses Rust sources with `syn` and collects every function annotated
//! with `#[given("...")]`, `#[when("...")]`, or `#[then("...")]` whose
//! argument is a string literal. The literal becomes the definition's
//! pattern, verbatim; patterns are regular expressions, so a function
//! without a literal pattern has nothing to match against and is skipped.
//! Nested inline modules are searched.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bdd_audit::model::{StepDef, StepDefLocation};
use tracing::warn;

use crate::discovery;
use crate::error::ScanError;

/// Scan `root` recursively for `.rs` files and collect the step
/// definitions they declare, in path then source order.
///
/// Files that fail to parse are logged and skipped.
///
/// # Errors
///
/// Returns an error when `root` is not a directory, holds no `.rs`
/// files, or cannot be traversed.
pub fn scan_step_defs(root: &Path) -> Result<Vec<Arc<StepDef>>, ScanError> {
    let files = discovery::collect_sources(root, "rs")?;
    let mut defs = Vec::new();
    for path in files {
        match load_step_defs(&path) {
            Ok(found) => defs.extend(found),
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping unparseable Rust source");
            }
        }
    }
    Ok(defs)
}

/// Extract the step definitions declared in a single Rust source file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed as Rust.
pub fn load_step_defs(path: &Path) -> Result<Vec<Arc<StepDef>>, ScanError> {
    let source = fs::read_to_string(path)?;
    let file = syn::parse_file(&source)?;
    let mut defs = Vec::new();
    collect_from_items(path, &file.items, &mut defs);
    Ok(defs)
}

fn collect_from_items(path: &Path, items: &[syn::Item], out: &mut Vec<Arc<StepDef>>) {
    for item in items {
        match item {
            syn::Item::Fn(function) => {
                if let Some(def) = step_def_from_function(path, function) {
                    out.push(Arc::new(def));
                }
            }
            syn::Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    collect_from_items(path, items, out);
                }
            }
            _ => {}
        }
    }
}

fn step_def_from_function(path: &Path, function: &syn::ItemFn) -> Option<StepDef> {
    let pattern = function.attrs.iter().find_map(step_pattern)?;
    let location = StepDefLocation {
        file: path.to_path_buf(),
        line: function.sig.fn_token.span.start().line,
        function: function.sig.ident.to_string(),
        declaration: render_signature(&function.sig),
    };
    let mut def = StepDef::new(pattern, location);
    def.description = doc_comment(&function.attrs);
    Some(def)
}

fn step_pattern(attr: &syn::Attribute) -> Option<String> {
    let ident = attr.path().segments.last()?.ident.to_string();
    if !matches!(ident.as_str(), "given" | "when" | "then") {
        return None;
    }
    literal_pattern(attr)
}

fn literal_pattern(attr: &syn::Attribute) -> Option<String> {
    match &attr.meta {
        syn::Meta::Path(_) => None,
        syn::Meta::List(list) => {
            if list.tokens.is_empty() {
                return None;
            }
            attr.parse_args::<syn::LitStr>().ok().map(|lit| lit.value())
        }
        syn::Meta::NameValue(name_value) => match &name_value.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Some(lit.value()),
            _ => None,
        },
    }
}

fn doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        let syn::Meta::NameValue(name_value) = &attr.meta else {
            continue;
        };
        let syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) = &name_value.value
        else {
            continue;
        };
        lines.push(lit.value().trim().to_owned());
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn render_signature(sig: &syn::Signature) -> String {
    let params: Vec<String> = sig.inputs.iter().map(render_param).collect();
    let mut rendered = format!("fn {}({})", sig.ident, params.join(", "));
    if let syn::ReturnType::Type(_, ty) = &sig.output {
        rendered.push_str(" -> ");
        rendered.push_str(&render_type(ty));
    }
    rendered
}

fn render_param(input: &syn::FnArg) -> String {
    match input {
        syn::FnArg::Receiver(receiver) => {
            let mut rendered = String::new();
            if receiver.reference.is_some() {
                rendered.push('&');
            }
            if receiver.mutability.is_some() {
                rendered.push_str("mut ");
            }
            rendered.push_str("self");
            rendered
        }
        syn::FnArg::Typed(pat_type) => {
            let name = match &*pat_type.pat {
                syn::Pat::Ident(ident) => ident.ident.to_string(),
                _ => "_".to_owned(),
            };
            format!("{name}: {}", render_type(&pat_type.ty))
        }
    }
}

/// Render common `syn::Type` shapes without pulling in `quote`; rarely
/// used syntaxes fall back to their `Debug` form.
fn render_type(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(type_path) => render_path(&type_path.path),
        syn::Type::Reference(reference) => {
            let mut rendered = String::from("&");
            if let Some(lifetime) = &reference.lifetime {
                rendered.push('\'');
                rendered.push_str(&lifetime.ident.to_string());
                rendered.push(' ');
            }
            if reference.mutability.is_some() {
                rendered.push_str("mut ");
            }
            rendered.push_str(&render_type(&reference.elem));
            rendered
        }
        syn::Type::Slice(slice) => format!("[{}]", render_type(&slice.elem)),
        syn::Type::Tuple(tuple) => {
            let elems: Vec<String> = tuple.elems.iter().map(render_type).collect();
            if elems.len() == 1 {
                format!("({},)", elems.join(", "))
            } else {
                format!("({})", elems.join(", "))
            }
        }
        other => format!("{other:?}"),
    }
}

fn render_path(path: &syn::Path) -> String {
    let mut rendered = String::new();
    if path.leading_colon.is_some() {
        rendered.push_str("::");
    }
    for (index, segment) in path.segments.iter().enumerate() {
        if index > 0 {
            rendered.push_str("::");
        }
        rendered.push_str(&segment.ident.to_string());
        rendered.push_str(&render_path_arguments(&segment.arguments));
    }
    rendered
}

fn render_path_arguments(arguments: &syn::PathArguments) -> String {
    match arguments {
        syn::PathArguments::None => String::new(),
        syn::PathArguments::AngleBracketed(angle_bracketed) => {
            let args: Vec<String> = angle_bracketed
                .args
                .iter()
                .map(render_generic_argument)
                .collect();
            format!("<{}>", args.join(", "))
        }
        syn::PathArguments::Parenthesized(parenthesized) => {
            let inputs: Vec<String> = parenthesized.inputs.iter().map(render_type).collect();
            let output = match &parenthesized.output {
                syn::ReturnType::Default => String::new(),
                syn::ReturnType::Type(_, ty) => format!(" -> {}", render_type(ty)),
            };
            format!("({}){output}", inputs.join(", "))
        }
    }
}

fn render_generic_argument(argument: &syn::GenericArgument) -> String {
    match argument {
        syn::GenericArgument::Type(ty) => render_type(ty),
        syn::GenericArgument::Lifetime(lifetime) => format!("'{}", lifetime.ident),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail loudly when the fixture cannot be built"
)]
mod tests {
    use std::fs;

    use rstest::rstest;

    use super::*;

    const STEPS: &str = r#"//! Step definitions for checkout.

/// Creates the shopper used by checkout flows.
#[given("a signed-in customer")]
fn signed_in_customer() {}

#[when("I pay (\\d+) euro")]
fn pay_euro(amount: u32) {}

mod receipts {
    #[then(r"a receipt is printed")]
    fn receipt_printed(lines: &[String]) {}
}

#[when]
fn without_a_pattern() {}

fn helper() {}
"#;

    fn load_fixture() -> Vec<Arc<StepDef>> {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("checkout_steps.rs");
        fs::write(&path, STEPS).expect("write source file");
        load_step_defs(&path).expect("parse source")
    }

    #[test]
    fn collects_literal_patterns_in_source_order() {
        let defs = load_fixture();
        let patterns: Vec<_> = defs.iter().map(|def| def.text.clone()).collect();
        assert_eq!(
            patterns,
            [
                "a signed-in customer",
                "I pay (\\d+) euro",
                "a receipt is printed",
            ]
        );
    }

    #[test]
    fn records_function_line_and_declaration() {
        let defs = load_fixture();
        let first = defs.first().expect("a definition was collected");
        assert_eq!(first.location.line, 5);
        assert_eq!(first.location.function, "signed_in_customer");
        assert_eq!(first.location.declaration, "fn signed_in_customer()");
        assert!(first.implemented);

        assert_eq!(
            defs.get(1).map(|def| def.location.declaration.clone()),
            Some("fn pay_euro(amount: u32)".to_owned())
        );
        assert_eq!(
            defs.get(2).map(|def| def.location.declaration.clone()),
            Some("fn receipt_printed(lines: &[String])".to_owned())
        );
    }

    #[test]
    fn doc_comments_become_the_description() {
        let defs = load_fixture();
        assert_eq!(
            defs.first().and_then(|def| def.description.clone()),
            Some("Creates the shopper used by checkout flows.".to_owned())
        );
        assert_eq!(defs.get(1).and_then(|def| def.description.clone()), None);
    }

    #[test]
    fn attribute_without_literal_pattern_is_skipped() {
        let defs = load_fixture();
        assert!(defs.iter().all(|def| def.location.function != "without_a_pattern"));
    }

    #[rstest]
    #[case(r#"#[given("a basket")] fn step() {}"#, Some("a basket"))]
    #[case(r#"#[when = "I pay"] fn step() {}"#, Some("I pay"))]
    #[case(r#"#[then(r"a receipt is printed")] fn step() {}"#, Some("a receipt is printed"))]
    #[case("#[when] fn step() {}", None)]
    #[case("#[given(a_fixture)] fn step() {}", None)]
    #[case("#[test] fn step() {}", None)]
    fn pattern_extraction_per_attribute_shape(
        #[case] source: &str,
        #[case] expected: Option<&str>,
    ) {
        let function = syn::parse_str::<syn::ItemFn>(source).expect("parse function");
        let def = step_def_from_function(Path::new("steps.rs"), &function);
        assert_eq!(def.as_ref().map(|def| def.text.as_str()), expected);
    }

    #[test]
    fn unparseable_files_are_skipped_but_good_ones_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("steps.rs"), STEPS).expect("write source file");
        fs::write(dir.path().join("broken.rs"), "fn unclosed( {").expect("write source file");

        let defs = scan_step_defs(dir.path()).expect("scan succeeds");
        assert_eq!(defs.len(), 3);
    }

    #[test]
    fn empty_root_fails_the_scan() {
        let dir = tempfile::tempdir().expect("create temp dir");
        assert!(matches!(
            scan_step_defs(dir.path()),
            Err(ScanError::NoSources { .. })
        ));
    }
}
