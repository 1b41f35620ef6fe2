//! Integration tests for bracket-matching diagnostics
//!
//! Exercises the scanner → resolver → validator chain on whole sources and
//! checks the exact rendered messages, which are part of the public surface.

use dag_parser::dag::resolving::resolve;
use dag_parser::dag::sectioning::{scan, ClassifierTable, ScanOptions};
use dag_parser::dag::validation::validate;
use rstest::rstest;

fn diagnostics_for(source: &str) -> Vec<String> {
    let table = ClassifierTable::default();
    let occurrences = scan(source, &table, &ScanOptions::default());
    let resolved = resolve(&table, occurrences).expect("scanned input always resolves");
    validate(&resolved).iter().map(|d| d.to_string()).collect()
}

#[rstest]
#[case::balanced("(a)", &[])]
#[case::balanced_mixed("(a [b] {c} \"d\")", &[])]
#[case::unclosed("(a", &["the ( at line 1, column 1 is never closed"])]
#[case::unexpected("a)", &["unexpected ) at line 1, column 2"])]
#[case::mismatched("(a]", &[
    "unexpected ] at line 1, column 3",
    "the ( at line 1, column 1 is never closed",
])]
#[case::second_line("ab\ncd)", &["unexpected ) at line 2, column 3"])]
#[case::nested_unclosed("((a)", &["the ( at line 1, column 1 is never closed"])]
#[case::unclosed_quote("\"a", &["the \" at line 1, column 1 is never closed"])]
#[case::escaped_brackets_ignored(r"\(a\)", &[])]
fn test_bracket_diagnostics(#[case] source: &str, #[case] expected: &[&str]) {
    assert_eq!(diagnostics_for(source), expected);
}

#[test]
fn test_quoted_bracket_produces_no_diagnostics() {
    // The bracket inside the quoted segment is not structural.
    assert!(diagnostics_for("(a \"(\" b)").is_empty());
}

#[test]
fn test_diagnostics_are_ordered_unexpected_before_unclosed() {
    let diagnostics = diagnostics_for(")(");
    assert_eq!(
        diagnostics,
        vec![
            "unexpected ) at line 1, column 1".to_string(),
            "the ( at line 1, column 2 is never closed".to_string(),
        ]
    );
}
