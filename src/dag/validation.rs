//! Stack matching of resolved occurrence streams
//!
//! Produces the structural (syntax) diagnostics of the pipeline: unmatched
//! closers and unclosed openers. Diagnostics are collected exhaustively and
//! never thrown; later stages run on a best-effort basis over
//! possibly-malformed input.

use std::fmt;

use crate::dag::sectioning::SectioningCharacter;

/// A structural diagnostic: a closer with nothing to close, or an opener
/// that is never closed. Rendered messages are part of the public surface
/// and must keep their exact wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxDiagnostic {
    Unexpected {
        character: char,
        line: usize,
        column: usize,
    },
    NeverClosed {
        character: char,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxDiagnostic::Unexpected {
                character,
                line,
                column,
            } => write!(f, "unexpected {} at line {}, column {}", character, line, column),
            SyntaxDiagnostic::NeverClosed {
                character,
                line,
                column,
            } => write!(
                f,
                "the {} at line {}, column {} is never closed",
                character, line, column
            ),
        }
    }
}

/// Stack-match a resolved, filtered occurrence stream.
///
/// Openers are pushed; a closer that complements the stack top pops it,
/// any other closer records a diagnostic and leaves the stack unchanged.
/// Whatever remains on the stack afterwards was never closed.
pub fn validate(occurrences: &[SectioningCharacter]) -> Vec<SyntaxDiagnostic> {
    let mut diagnostics = Vec::new();
    let mut stack: Vec<&SectioningCharacter> = Vec::new();

    for occurrence in occurrences {
        if occurrence.is_opening() {
            stack.push(occurrence);
        } else if matches!(stack.last(), Some(top) if occurrence.complements(top)) {
            stack.pop();
        } else {
            diagnostics.push(SyntaxDiagnostic::Unexpected {
                character: occurrence.character,
                line: occurrence.line,
                column: occurrence.column,
            });
        }
    }

    for unclosed in stack {
        diagnostics.push(SyntaxDiagnostic::NeverClosed {
            character: unclosed.character,
            line: unclosed.line,
            column: unclosed.column,
        });
    }

    diagnostics
}
