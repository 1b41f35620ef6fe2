//! Context resolution for scanned occurrence streams
//!
//! Occurrences of symmetric pairs leave the scanner as
//! [`Direction::Unresolved`]; this stage produces a new, fully-resolved list
//! in three passes:
//!
//! 1. **Parity**: the k-th occurrence (0-indexed) of a symmetric pair
//!    identity is opening iff k is even.
//! 2. **Symmetric-region stripping**: occurrences nested inside an active
//!    symmetric region are dropped, except the occurrence that closes the
//!    region. A bracket written inside a quoted string is not structural.
//! 3. **Nesting levels**: a running depth counter stamps each surviving
//!    occurrence; an opener takes the depth after incrementing, a closer the
//!    depth before decrementing, so a pair's opener and closer share a level
//!    and the outermost pair sits at level 1.
//!
//! Stripping runs before level assignment so that quoted brackets cannot
//! skew the depth counter. The input list is consumed and returned anew;
//! nothing is resolved through aliased references.

use std::fmt;

use crate::dag::sectioning::{ClassifierTable, Direction, SectioningCharacter};

/// The only failure mode of resolution: an occurrence whose direction is
/// still undetermined after the parity pass. This is an internal invariant
/// breach, not malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnresolvedDirection {
        character: char,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::UnresolvedDirection {
                character,
                line,
                column,
            } => write!(
                f,
                "direction of {} at line {}, column {} is still unresolved",
                character, line, column
            ),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolve an occurrence stream: parity for symmetric pairs, stripping of
/// occurrences inside symmetric regions, then nesting levels.
pub fn resolve(
    table: &ClassifierTable,
    occurrences: Vec<SectioningCharacter>,
) -> Result<Vec<SectioningCharacter>, ResolveError> {
    let resolved = resolve_directions(occurrences)?;
    let kept = strip_symmetric_regions(table, resolved);
    Ok(assign_levels(kept))
}

fn resolve_directions(
    occurrences: Vec<SectioningCharacter>,
) -> Result<Vec<SectioningCharacter>, ResolveError> {
    // Occurrence counts per pair identity, for the parity rule.
    let mut seen = std::collections::HashMap::new();
    occurrences
        .into_iter()
        .map(|mut occurrence| {
            if occurrence.direction == Direction::Unresolved {
                let count = seen.entry(occurrence.pair_id).or_insert(0usize);
                occurrence.direction = if *count % 2 == 0 {
                    Direction::Opening
                } else {
                    Direction::Closing
                };
                *count += 1;
            }
            if occurrence.direction == Direction::Unresolved {
                return Err(ResolveError::UnresolvedDirection {
                    character: occurrence.character,
                    line: occurrence.line,
                    column: occurrence.column,
                });
            }
            Ok(occurrence)
        })
        .collect()
}

fn strip_symmetric_regions(
    table: &ClassifierTable,
    occurrences: Vec<SectioningCharacter>,
) -> Vec<SectioningCharacter> {
    let mut kept = Vec::with_capacity(occurrences.len());
    // Pair identity of the symmetric region we are currently inside, if any.
    let mut active: Option<usize> = None;
    for occurrence in occurrences {
        match active {
            None => {
                if table.is_symmetric(occurrence.pair_id) {
                    active = Some(occurrence.pair_id);
                }
                kept.push(occurrence);
            }
            Some(pair_id) => {
                if occurrence.pair_id == pair_id && table.is_symmetric(occurrence.pair_id) {
                    active = None;
                    kept.push(occurrence);
                }
                // Everything else inside the region is not structural.
            }
        }
    }
    kept
}

fn assign_levels(occurrences: Vec<SectioningCharacter>) -> Vec<SectioningCharacter> {
    let mut depth = 0usize;
    occurrences
        .into_iter()
        .map(|mut occurrence| {
            match occurrence.direction {
                Direction::Opening => {
                    depth += 1;
                    occurrence.level = depth;
                }
                Direction::Closing => {
                    // A stray closer at depth 0 keeps level 0; the tree
                    // builder tolerates it.
                    occurrence.level = depth;
                    depth = depth.saturating_sub(1);
                }
                Direction::Unresolved => unreachable!("directions resolved before level pass"),
            }
            occurrence
        })
        .collect()
}
