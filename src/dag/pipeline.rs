//! End-to-end compilation pipeline for dag sources
//!
//! Ties the stages together: scan, resolve, validate, build the parse tree,
//! read and prune the document model, then interpret each top-level line as
//! a declaration. Every stage is best-effort over possibly-malformed input:
//! syntax and semantic diagnostics are collected alongside whatever partial
//! output could still be produced, so one bad line degrades output locally
//! rather than aborting the source.
//!
//! For most uses the convenience function [`compile`] is the entry point:
//!
//! ```rust,ignore
//! let output = dag_parser::dag::pipeline::compile("template point (x = <int>)")?;
//! assert!(output.diagnostics().is_empty());
//! println!("{}", output.javascript());
//! ```

use std::fmt;

use crate::dag::declarations;
use crate::dag::document::{prune_empty_children, read_paragraph, Paragraph};
use crate::dag::resolving::{resolve, ResolveError};
use crate::dag::sectioning::{scan, ClassifierTable, ScanOptions};
use crate::dag::tree::ParseTree;
use crate::dag::validation::{validate, SyntaxDiagnostic};

/// The one fatal failure of the pipeline: an internal invariant breach
/// surfaced by the resolver. Malformed input never lands here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Resolve(ResolveError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Resolve(error) => write!(f, "resolution failed: {}", error),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ResolveError> for PipelineError {
    fn from(error: ResolveError) -> Self {
        PipelineError::Resolve(error)
    }
}

/// One compiled top-level declaration: the generated statements plus the
/// semantic diagnostics accumulated while interpreting it.
#[derive(Debug, Clone)]
pub struct CompiledDeclaration {
    pub javascript: String,
    pub errors: Vec<String>,
}

/// Everything a compilation run produces.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Structural diagnostics from bracket matching, in text order.
    pub syntax_diagnostics: Vec<SyntaxDiagnostic>,
    /// Top-level lines whose keyword names no known declaration kind.
    pub semantic_diagnostics: Vec<String>,
    /// The compiled declarations, in source order.
    pub declarations: Vec<CompiledDeclaration>,
    /// The pruned document model the declarations were read from.
    pub document: Paragraph,
}

impl CompileOutput {
    /// All diagnostics as rendered strings: syntax first, then top-level
    /// semantic diagnostics, then per-declaration errors in source order.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .syntax_diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect();
        messages.extend(self.semantic_diagnostics.iter().cloned());
        for declaration in &self.declarations {
            messages.extend(declaration.errors.iter().cloned());
        }
        messages
    }

    /// The generated statements of every declaration, newline-joined.
    pub fn javascript(&self) -> String {
        self.declarations
            .iter()
            .map(|d| d.javascript.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The compilation pipeline, configured with a classifier table and scan
/// options. [`Pipeline::default`] uses the standard dag alphabet.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    table: ClassifierTable,
    options: ScanOptions,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: ClassifierTable) -> Self {
        Self {
            table,
            options: ScanOptions::default(),
        }
    }

    /// Compile a dag source text.
    pub fn run(&self, source: &str) -> Result<CompileOutput, PipelineError> {
        let occurrences = scan(source, &self.table, &self.options);
        let resolved = resolve(&self.table, occurrences)?;
        let syntax_diagnostics = validate(&resolved);

        let tree = ParseTree::build(source, &resolved);
        let mut document = read_paragraph(&tree);
        prune_empty_children(&mut document);

        let mut semantic_diagnostics = Vec::new();
        let mut compiled = Vec::new();
        for (index, line) in document.lines.iter().enumerate() {
            match declarations::interpret(line) {
                Some(declaration) => compiled.push(CompiledDeclaration {
                    javascript: declaration.javascript(),
                    errors: declaration.errors().to_vec(),
                }),
                None => semantic_diagnostics
                    .push(format!("unknown declaration at line {}", index + 1)),
            }
        }

        Ok(CompileOutput {
            syntax_diagnostics,
            semantic_diagnostics,
            declarations: compiled,
            document,
        })
    }
}

/// Compile a dag source with the default alphabet and scan options.
pub fn compile(source: &str) -> Result<CompileOutput, PipelineError> {
    Pipeline::new().run(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_well_formed_template() {
        let output = compile("template point (x = <int>\ny = <int>)").unwrap();
        assert!(output.diagnostics().is_empty());
        assert_eq!(output.declarations.len(), 1);
        assert!(output.javascript().contains("dagui.buildTemplate("));
        assert!(output.javascript().contains("dagui.registerSchema("));
    }

    #[test]
    fn test_compile_multiple_declarations() {
        let output = compile("template a (x = <int>)\ntemplate b (y = <int>)").unwrap();
        assert_eq!(output.declarations.len(), 2);
        assert_eq!(output.javascript().lines().count(), 4);
    }

    #[test]
    fn test_syntax_diagnostics_do_not_block_compilation() {
        let output = compile("template t (x = <int>").unwrap();
        assert_eq!(
            output.syntax_diagnostics[0].to_string(),
            "the ( at line 1, column 12 is never closed"
        );
        // Best effort: the unclosed body still compiles with its content.
        assert_eq!(output.declarations.len(), 1);
        assert!(output.declarations[0].errors.is_empty());
        assert!(output.declarations[0]
            .javascript
            .contains("\"inputName\":\"x\""));
    }

    #[test]
    fn test_unknown_keyword_is_diagnosed() {
        let output = compile("import point").unwrap();
        assert_eq!(
            output.semantic_diagnostics,
            vec!["unknown declaration at line 1".to_string()]
        );
        assert!(output.declarations.is_empty());
    }

    #[test]
    fn test_semantic_errors_surface_in_diagnostics() {
        let output = compile("template t (x y z)").unwrap();
        assert_eq!(
            output.diagnostics(),
            vec!["invalid syntax at line 1".to_string()]
        );
    }

    #[test]
    fn test_empty_source_compiles_to_nothing() {
        let output = compile("").unwrap();
        assert!(output.diagnostics().is_empty());
        assert!(output.declarations.is_empty());
        assert_eq!(output.javascript(), "");
    }
}
