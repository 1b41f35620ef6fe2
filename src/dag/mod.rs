//! Main module for dag library functionality
//!
//! The submodules mirror the stages of the pipeline, leaves first:
//! sectioning (classify + scan), resolving, validation, tree building,
//! document extraction, and declaration interpretation. Each stage is a pure
//! function of its predecessor's output; re-running on the same source yields
//! identical results.

pub mod declarations;
pub mod document;
pub mod pipeline;
pub mod resolving;
pub mod sectioning;
pub mod tree;
pub mod validation;
