//! Parse tree construction from resolved occurrence streams
//!
//! A [`ParseTree`] node corresponds to a bracketed region of the source: the
//! root spans the whole text, each child spans the content between a pair of
//! delimiters, and a node with no children is a literal leaf. Building is
//! purely structural: it performs no validation and tolerates stray
//! unmatched occurrences. An unclosed opener claims the rest of its slice as
//! content, so the text it governs survives into the tree; a stray closer
//! delimits nothing.
//!
//! Two queries matter downstream:
//!
//! - [`ParseTree::branches_and_leaves`]: the ordered alternation of literal
//!   text and child references between a node's children, with the delimiter
//!   characters excluded from the literals. This feeds the document model.
//! - [`ParseTree::reconstruct`]: the same walk with empty literals included
//!   and delimiters reinstated; equal to [`ParseTree::text`] for every node,
//!   which is the lossless round-trip guarantee.

use std::ops::Range;

use crate::dag::sectioning::SectioningCharacter;

/// One entry of a node's branch-and-leaf sequence: a literal text slice or a
/// reference to a child tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Branch<'t, 'a> {
    Leaf(&'a str),
    Tree(&'t ParseTree<'a>),
}

/// A node of the parse tree. Owns a reference to the full source text plus
/// the byte-offset span of its content (the inside of its bracket pair; the
/// whole text for the root).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree<'a> {
    source: &'a str,
    span: Range<usize>,
    /// The delimiting pair of this node; `None` for the root. A stray
    /// unmatched occurrence yields a degenerate pair whose opener and closer
    /// are the same occurrence.
    pair: Option<(SectioningCharacter, SectioningCharacter)>,
    children: Vec<ParseTree<'a>>,
    /// Resolved occurrences structurally at this node's own nesting level,
    /// i.e. the delimiters of its children, in text order.
    level_occurrences: Vec<SectioningCharacter>,
}

impl<'a> ParseTree<'a> {
    /// Build the tree for a full source text from its resolved, filtered
    /// occurrence stream.
    pub fn build(source: &'a str, occurrences: &[SectioningCharacter]) -> ParseTree<'a> {
        Self::node(source, 0..source.len(), None, occurrences)
    }

    fn node(
        source: &'a str,
        span: Range<usize>,
        pair: Option<(SectioningCharacter, SectioningCharacter)>,
        occurrences: &[SectioningCharacter],
    ) -> ParseTree<'a> {
        if occurrences.is_empty() {
            return ParseTree {
                source,
                span,
                pair,
                children: Vec::new(),
                level_occurrences: Vec::new(),
            };
        }

        // Sibling bracket groups are separated exactly where a closer at the
        // slice's base level is immediately followed by an opener at the
        // base level.
        let base = occurrences
            .iter()
            .map(|occurrence| occurrence.level)
            .min()
            .unwrap_or(0);
        let mut children = Vec::new();
        let mut level_occurrences = Vec::new();
        let mut start = 0;
        for boundary in 1..=occurrences.len() {
            let split = boundary == occurrences.len() || {
                let earlier = &occurrences[boundary - 1];
                let later = &occurrences[boundary];
                earlier.is_closing()
                    && later.is_opening()
                    && earlier.level == base
                    && later.level == base
            };
            if split {
                let run = &occurrences[start..boundary];
                start = boundary;

                let open = run[0];
                let close = run[run.len() - 1];
                level_occurrences.push(open);
                if run.len() > 1 {
                    level_occurrences.push(close);
                }
                let content_start = open.offset + open.character.len_utf8();
                if run.len() == 1 {
                    // A lone unmatched occurrence. An unclosed opener keeps
                    // the rest of the slice as its content; a stray closer
                    // delimits nothing.
                    let content_end = if open.is_opening() {
                        span.end.max(content_start)
                    } else {
                        content_start
                    };
                    children.push(Self::node(
                        source,
                        content_start..content_end,
                        Some((open, open)),
                        &[],
                    ));
                } else {
                    let content_end = close.offset.max(content_start);
                    children.push(Self::node(
                        source,
                        content_start..content_end,
                        Some((open, close)),
                        &run[1..run.len() - 1],
                    ));
                }
            }
        }

        ParseTree {
            source,
            span,
            pair,
            children,
            level_occurrences,
        }
    }

    /// The exact source substring this node spans (delimiters excluded).
    pub fn text(&self) -> &'a str {
        &self.source[self.span.clone()]
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn children(&self) -> &[ParseTree<'a>] {
        &self.children
    }

    pub fn level_occurrences(&self) -> &[SectioningCharacter] {
        &self.level_occurrences
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The ordered alternation of literal text and child references between
    /// this node's children. Delimiter characters belong to no literal, so
    /// the document extractor never sees them. Empty literal slices are
    /// omitted unless `include_empty` is set.
    pub fn branches_and_leaves(&self, include_empty: bool) -> Vec<Branch<'_, 'a>> {
        let mut branches = Vec::new();
        let mut cursor = self.span.start;
        for child in &self.children {
            if let Some((open, close)) = child.pair {
                let literal = &self.source[cursor..open.offset];
                if include_empty || !literal.is_empty() {
                    branches.push(Branch::Leaf(literal));
                }
                branches.push(Branch::Tree(child));
                // A degenerate child's span can extend past its own
                // occurrence, so the cursor follows whichever ends later.
                cursor = child.span.end.max(close.offset + close.character.len_utf8());
            }
        }
        let tail = &self.source[cursor..self.span.end];
        if include_empty || !tail.is_empty() {
            branches.push(Branch::Leaf(tail));
        }
        branches
    }

    /// Rebuild this node's exact span text from its branch-and-leaf
    /// sequence, delimiters reinstated. Always equal to [`ParseTree::text`].
    pub fn reconstruct(&self) -> String {
        let mut output = String::new();
        let mut cursor = self.span.start;
        for child in &self.children {
            if let Some((open, close)) = child.pair {
                output.push_str(&self.source[cursor..open.offset]);
                output.push(open.character);
                output.push_str(&child.reconstruct());
                if close.offset != open.offset {
                    output.push(close.character);
                }
                cursor = child.span.end.max(close.offset + close.character.len_utf8());
            }
        }
        output.push_str(&self.source[cursor..self.span.end]);
        output
    }
}
