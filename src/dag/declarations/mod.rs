//! Declaration interpretation
//!
//! A declaration is a recognized top-level line: its first word is the
//! declaration keyword, the remaining words are ordered arguments. Every
//! declaration kind shares the same contract: take a line, expose the
//! semantic diagnostics accumulated while interpreting it, and expose the
//! JavaScript it compiles into. The [`Declaration`] trait captures that
//! contract, dispatched over a closed keyword set by [`interpret`].
//!
//! [`Template`] is currently the only kind; new kinds plug into the same
//! contract.

pub mod template;

pub use template::Template;

use crate::dag::document::{Line, Word};

/// Keyword of the template declaration.
pub const TEMPLATE_KEYWORD: &str = "template";

/// Common contract of all declaration kinds.
pub trait Declaration {
    /// The nth argument passed to the declaration (0-indexed, keyword
    /// excluded).
    fn argument(&self, n: usize) -> Option<&Word>;

    /// Number of arguments passed to the declaration.
    fn given_arity(&self) -> usize;

    /// Semantic diagnostics accumulated during interpretation. Never fatal;
    /// one malformed body line does not stop the others.
    fn errors(&self) -> &[String];

    /// The JavaScript statements this declaration compiles into. Only
    /// meaningful when [`Declaration::errors`] is empty; with errors present
    /// the output may be partial.
    fn javascript(&self) -> String;
}

/// Dispatch a line to the declaration kind named by its first word, or
/// `None` if the keyword is not recognized.
pub fn interpret(line: &Line) -> Option<Box<dyn Declaration>> {
    match line.word(0)?.text()? {
        TEMPLATE_KEYWORD => Some(Box::new(Template::new(line))),
        _ => None,
    }
}
