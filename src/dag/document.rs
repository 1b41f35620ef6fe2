//! The document model: paragraphs of lines of words
//!
//! Projects a [`ParseTree`] into the three-level semantic model the
//! declaration interpreter works on. Literal text is split on structural
//! line breaks and spaces; bracketed content stays intact and appears inline
//! as a word wrapping a nested paragraph.
//!
//! The types are plain owning containers (the tree is strictly nested, so
//! no arena or shared references are needed) and serialize for snapshot
//! inspection.

use serde::Serialize;

use crate::dag::tree::{Branch, ParseTree};

const LINE_BREAK: char = '\n';
const WORD_BREAK: char = ' ';

/// An ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub lines: Vec<Line>,
}

impl Paragraph {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Number of lines.
    pub fn length(&self) -> usize {
        self.lines.len()
    }
}

/// An ordered sequence of words.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub words: Vec<Word>,
}

impl Line {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// Number of words.
    pub fn length(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, n: usize) -> Option<&Word> {
        self.words.get(n)
    }
}

/// Either literal text or a nested paragraph (a bracketed sub-block sitting
/// inline as a word). The enum makes the one-payload contract structural:
/// a word with both or neither payload cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Word {
    Text(String),
    Paragraph(Paragraph),
}

impl Word {
    /// Character length of the text, or the wrapped paragraph's line count.
    pub fn length(&self) -> usize {
        match self {
            Word::Text(text) => text.chars().count(),
            Word::Paragraph(paragraph) => paragraph.length(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Word::Text(text) => Some(text),
            Word::Paragraph(_) => None,
        }
    }

    pub fn paragraph(&self) -> Option<&Paragraph> {
        match self {
            Word::Text(_) => None,
            Word::Paragraph(paragraph) => Some(paragraph),
        }
    }
}

/// A raw line in progress: literal fragments and child trees, before word
/// splitting.
enum RawEntry<'t, 'a> {
    Text(&'a str),
    Tree(&'t ParseTree<'a>),
}

/// Read a tree's content as a paragraph.
///
/// Literal entries of the branch-and-leaf sequence are split on line breaks
/// into non-empty line seeds; a child tree is appended to the currently-open
/// line (opening one if the block starts with a child tree). Child trees
/// recurse into nested paragraphs.
pub fn read_paragraph(tree: &ParseTree<'_>) -> Paragraph {
    let mut raw_lines: Vec<Vec<RawEntry>> = Vec::new();
    let mut current: Vec<RawEntry> = Vec::new();

    for branch in tree.branches_and_leaves(false) {
        match branch {
            Branch::Leaf(text) => {
                for (index, fragment) in text.split(LINE_BREAK).enumerate() {
                    if index > 0 && !current.is_empty() {
                        raw_lines.push(std::mem::take(&mut current));
                    }
                    if !fragment.is_empty() {
                        current.push(RawEntry::Text(fragment));
                    }
                }
            }
            Branch::Tree(child) => current.push(RawEntry::Tree(child)),
        }
    }
    if !current.is_empty() {
        raw_lines.push(current);
    }

    Paragraph::new(raw_lines.into_iter().map(read_line).collect())
}

/// Convert a raw line: literal fragments are split on spaces into word
/// tokens, child trees pass through unsplit as nested paragraphs.
fn read_line(raw: Vec<RawEntry>) -> Line {
    let mut words = Vec::new();
    for entry in raw {
        match entry {
            RawEntry::Text(text) => {
                words.extend(
                    text.split(WORD_BREAK)
                        .map(|token| Word::Text(token.to_string())),
                );
            }
            RawEntry::Tree(child) => words.push(Word::Paragraph(read_paragraph(child))),
        }
    }
    Line::new(words)
}

/// Recursively remove zero-length words from lines and zero-length lines
/// from paragraphs. A word is zero-length if it is empty text or wraps a
/// paragraph that itself becomes empty after pruning. Idempotent.
pub fn prune_empty_children(paragraph: &mut Paragraph) {
    for line in &mut paragraph.lines {
        line.words.retain_mut(|word| match word {
            Word::Text(text) => !text.is_empty(),
            Word::Paragraph(child) => {
                prune_empty_children(child);
                child.length() > 0
            }
        });
    }
    paragraph.lines.retain(|line| line.length() > 0);
}
