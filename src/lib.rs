//! # dag-parser
//!
//! A parser for the dag format.
//!
//! A dag source file is a sequence of bracket-delimited declarations. The
//! library disambiguates sectioning characters (brackets, braces, quotes),
//! builds a parse tree from them, projects that tree into a document model
//! (paragraphs of lines of words), and interprets declaration lines into
//! structured payloads plus the JavaScript statements that register them with
//! the consuming runtime.
//!
//! For the recommended entry point see [`dag::pipeline`].

pub mod dag;
