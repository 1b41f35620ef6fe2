//! End-to-end template compilation scenarios
//!
//! Drives the full pipeline over small dag sources and verifies the payloads
//! and generated statements for each body-line shape.

use dag_parser::dag::declarations::{Declaration, Template};
use dag_parser::dag::document::{prune_empty_children, read_paragraph};
use dag_parser::dag::pipeline::compile;
use dag_parser::dag::resolving::resolve;
use dag_parser::dag::sectioning::{scan, ClassifierTable, ScanOptions};
use dag_parser::dag::tree::ParseTree;
use serde_json::{json, Value};

fn template_for(source: &str) -> Template {
    let table = ClassifierTable::default();
    let occurrences = scan(source, &table, &ScanOptions::default());
    let resolved = resolve(&table, occurrences).expect("scanned input always resolves");
    let tree = ParseTree::build(source, &resolved);
    let mut paragraph = read_paragraph(&tree);
    prune_empty_children(&mut paragraph);
    Template::new(&paragraph.lines[0])
}

#[test]
fn test_template_application_payload() {
    let template = template_for("template t (x = f a b)");
    assert!(template.errors().is_empty());
    assert_eq!(
        template.data(),
        &[json!({
            "type": "templateApplication",
            "variableName": "x",
            "functionName": "f",
            "arity": 2,
            "argument0": "a",
            "argument1": "b",
        })]
    );
}

#[test]
fn test_region_payload() {
    let template = template_for("template t (x = (a\nb))");
    assert_eq!(
        template.data(),
        &[json!({
            "type": "region",
            "regionName": "x",
            "regionValues": ["a", "b"],
        })]
    );
}

#[test]
fn test_input_declaration_payload() {
    let template = template_for("template t (x = <int>)");
    assert_eq!(
        template.data(),
        &[json!({
            "type": "inputDeclaration",
            "inputName": "x",
            "inputType": "int",
        })]
    );
}

#[test]
fn test_invalid_line_degrades_locally() {
    let template = template_for("template t (x y z\nq = <int>\nr = <bool>)");
    assert_eq!(template.errors(), &["invalid syntax at line 1".to_string()]);
    // Both later lines still translate.
    assert_eq!(template.data().len(), 2);
}

#[test]
fn test_generated_statements() {
    let template = template_for("template point (x = <int>\ny = <int>)");
    insta::assert_snapshot!(
        template.build_statement(),
        @r#"dagui.buildTemplate({"data":[{"inputName":"x","inputType":"int","type":"inputDeclaration"},{"inputName":"y","inputType":"int","type":"inputDeclaration"}],"templateName":"point"});"#
    );
    insta::assert_snapshot!(
        template.schema_statement(),
        @r#"dagui.registerSchema("point", {"x":"int","y":"int"});"#
    );
}

#[test]
fn test_nested_template_statements() {
    let template = template_for("template line (start = (x = <float>)\nv = id start)");
    insta::assert_snapshot!(
        template.schema_statement(),
        @r#"dagui.registerSchema("line", {"start":{"x":"float"}});"#
    );
}

#[test]
fn test_schema_references_stay_symbolic() {
    // `point` may name a previously registered schema; the parser leaves the
    // leaf as-is for the runtime to resolve.
    let template = template_for("template segment (a = <point>\nb = <point>)");
    assert_eq!(template.schema(), json!({"a": "point", "b": "point"}));
}

#[test]
fn test_pipeline_collects_everything() {
    let output = compile("template t (x = <int>\nbad line here)").unwrap();
    assert_eq!(
        output.diagnostics(),
        vec!["invalid syntax at line 2".to_string()]
    );
    let javascript = output.javascript();
    assert!(javascript.contains("dagui.buildTemplate("));
    assert!(javascript.contains("dagui.registerSchema("));
}

#[test]
fn test_quoted_brackets_reach_payload_verbatim() {
    let output = compile("template t (x = f \"(\" b)").unwrap();
    assert!(output.syntax_diagnostics.is_empty());
    let template = template_for("template t (x = f \"(\" b)");
    // The quoted segment arrives as a nested paragraph argument wrapping the
    // literal bracket character.
    assert_eq!(template.data()[0]["arity"], json!(2));
    assert_eq!(template.data()[0]["argument0"], json!(["("]));
}

#[test]
fn test_empty_body_compiles_to_empty_data() {
    let template = template_for("template t ()");
    assert!(template.errors().is_empty());
    assert_eq!(template.data(), &[] as &[Value]);
    assert_eq!(template.schema(), Value::Null);
}
