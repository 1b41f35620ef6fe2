//! Sectioning-character classification and scanning
//!
//! The first stage of the pipeline. A *sectioning character* is a character
//! that delimits a structural region of a dag source: a bracket, a brace, or
//! the quote character. The [`ClassifierTable`] maps each such character to
//! its pair identity and a direction template; [`scan`] walks the source text
//! once, left to right, and emits an ordered stream of
//! [`SectioningCharacter`] occurrences annotated with line, column and byte
//! offset.
//!
//! ## Key design
//!
//! - **Explicit configuration**: the classifier table is a value passed into
//!   the scanner, never a process-wide default.
//! - **Symmetric pairs stay unresolved**: a quote character is neither
//!   definitively opening nor closing until its position in the occurrence
//!   stream is known, so the scanner emits it as [`Direction::Unresolved`]
//!   and leaves resolution to [`crate::dag::resolving`].
//! - **No errors**: scanning cannot fail; every character either produces an
//!   occurrence or is literal text.

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

/// Whether a sectioning character opens a region, closes one, or cannot be
/// known without context (symmetric pairs such as the quote character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Opening,
    Closing,
    Unresolved,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Opening => write!(f, "opening"),
            Direction::Closing => write!(f, "closing"),
            Direction::Unresolved => write!(f, "context unknown"),
        }
    }
}

/// An occurrence of a sectioning character within a source text.
///
/// Line and column counters are 1-based; byte offsets are 0-based. The
/// nesting level is 0 until assigned during resolution, after which the
/// outermost pair sits at level 1 and an opener shares its level with the
/// closer that matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectioningCharacter {
    pub character: char,
    pub pair_id: usize,
    pub direction: Direction,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub level: usize,
}

impl SectioningCharacter {
    /// True iff this occurrence can close a region opened by `other`.
    pub fn complements(&self, other: &SectioningCharacter) -> bool {
        self.direction == Direction::Closing
            && other.direction == Direction::Opening
            && self.pair_id == other.pair_id
    }

    pub fn is_opening(&self) -> bool {
        self.direction == Direction::Opening
    }

    pub fn is_closing(&self) -> bool {
        self.direction == Direction::Closing
    }
}

impl fmt::Display for SectioningCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pair {} character {} at line {}, column {}, {}",
            self.pair_id, self.character, self.line, self.column, self.direction
        )
    }
}

/// Classification template for a single character: its pair identity plus
/// the direction copied onto every occurrence the scanner emits for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CharacterTemplate {
    pair_id: usize,
    direction: Direction,
}

/// Maps each sectioning character to its pair identity and direction
/// template.
///
/// Built from an ordered list of `(opener, closer)` pairs; a pair whose
/// opener equals its closer is *symmetric* and registers a single
/// [`Direction::Unresolved`] entry. The default table covers `()`, `[]`,
/// `{}` and the symmetric `"` pair.
#[derive(Debug, Clone)]
pub struct ClassifierTable {
    entries: HashMap<char, CharacterTemplate>,
    symmetric: HashSet<usize>,
}

impl ClassifierTable {
    pub const DEFAULT_PAIRS: [(char, char); 4] =
        [('(', ')'), ('[', ']'), ('{', '}'), ('"', '"')];

    /// Build a table from an ordered list of character pairs. Pair
    /// identities are assigned by position in the list.
    pub fn from_pairs(pairs: &[(char, char)]) -> Self {
        let mut entries = HashMap::new();
        let mut symmetric = HashSet::new();
        for (pair_id, &(opener, closer)) in pairs.iter().enumerate() {
            if opener == closer {
                entries.insert(
                    opener,
                    CharacterTemplate {
                        pair_id,
                        direction: Direction::Unresolved,
                    },
                );
                symmetric.insert(pair_id);
            } else {
                entries.insert(
                    opener,
                    CharacterTemplate {
                        pair_id,
                        direction: Direction::Opening,
                    },
                );
                entries.insert(
                    closer,
                    CharacterTemplate {
                        pair_id,
                        direction: Direction::Closing,
                    },
                );
            }
        }
        Self { entries, symmetric }
    }

    /// True iff the pair's opener and closer are the same character.
    pub fn is_symmetric(&self, pair_id: usize) -> bool {
        self.symmetric.contains(&pair_id)
    }

    pub fn classifies(&self, character: char) -> bool {
        self.entries.contains_key(&character)
    }

    fn template(&self, character: char) -> Option<CharacterTemplate> {
        self.entries.get(&character).copied()
    }
}

impl Default for ClassifierTable {
    fn default() -> Self {
        Self::from_pairs(&Self::DEFAULT_PAIRS)
    }
}

/// Scanner configuration: the escape character (escapes itself and the
/// character following it; `None` disables escaping) and the character that
/// terminates a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub escape: Option<char>,
    pub newline: char,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            escape: Some('\\'),
            newline: '\n',
        }
    }
}

/// Compile the ordered list of sectioning-character occurrences in a source
/// text. Single pass, O(n) in the text length; cannot fail.
///
/// An escaped sectioning character is literal text and emits nothing. An
/// escaped newline is swallowed without advancing the line counter. The
/// column counter resets to 0 on a newline and is incremented after every
/// character, so the first character of each line reports column 1; this
/// convention is load-bearing for diagnostic messages and must not change.
pub fn scan(
    source: &str,
    table: &ClassifierTable,
    options: &ScanOptions,
) -> Vec<SectioningCharacter> {
    let mut occurrences = Vec::new();

    let mut escaped = false;
    let mut line = 1;
    let mut column = 1;
    for (offset, character) in source.char_indices() {
        if options.escape == Some(character) {
            // Two consecutive escapes cancel out.
            escaped = !escaped;
        } else if character == options.newline {
            if escaped {
                escaped = false;
            } else {
                line += 1;
                column = 0;
            }
        } else if let Some(template) = table.template(character) {
            if escaped {
                escaped = false;
            } else {
                occurrences.push(SectioningCharacter {
                    character,
                    pair_id: template.pair_id,
                    direction: template.direction,
                    line,
                    column,
                    offset,
                    level: 0,
                });
            }
        } else if escaped {
            // The escape applies to exactly the next character.
            escaped = false;
        }
        column += 1;
    }

    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_default(source: &str) -> Vec<SectioningCharacter> {
        scan(source, &ClassifierTable::default(), &ScanOptions::default())
    }

    #[test]
    fn test_default_table_classifies_brackets_and_quote() {
        let table = ClassifierTable::default();
        for c in ['(', ')', '[', ']', '{', '}', '"'] {
            assert!(table.classifies(c), "{c} should be classified");
        }
        assert!(!table.classifies('a'));
        assert!(!table.classifies('<'));
    }

    #[test]
    fn test_symmetric_pair_is_unresolved() {
        let occurrences = scan_default("\"");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].direction, Direction::Unresolved);
    }

    #[test]
    fn test_asymmetric_pair_directions_are_fixed() {
        let occurrences = scan_default("()");
        assert_eq!(occurrences[0].direction, Direction::Opening);
        assert_eq!(occurrences[1].direction, Direction::Closing);
        assert_eq!(occurrences[0].pair_id, occurrences[1].pair_id);
    }

    #[test]
    fn test_positions_are_one_based() {
        let occurrences = scan_default("a(b)");
        assert_eq!(occurrences[0].line, 1);
        assert_eq!(occurrences[0].column, 2);
        assert_eq!(occurrences[0].offset, 1);
        assert_eq!(occurrences[1].column, 4);
        assert_eq!(occurrences[1].offset, 3);
    }

    #[test]
    fn test_column_resets_after_newline() {
        let occurrences = scan_default("ab\n(x)");
        assert_eq!(occurrences[0].line, 2);
        // Column reset to 0 on the newline, then post-incremented.
        assert_eq!(occurrences[0].column, 1);
    }

    #[test]
    fn test_escaped_bracket_is_not_structural() {
        let occurrences = scan_default(r"a\(b)");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].character, ')');
    }

    #[test]
    fn test_double_escape_cancels() {
        let occurrences = scan_default(r"\\(");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].character, '(');
    }

    #[test]
    fn test_escaped_newline_is_swallowed() {
        let occurrences = scan_default("a\\\n(");
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].line, 1);
    }

    #[test]
    fn test_escape_disabled() {
        let options = ScanOptions {
            escape: None,
            newline: '\n',
        };
        let occurrences = scan(r"\(", &ClassifierTable::default(), &options);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].character, '(');
    }

    #[test]
    fn test_caller_supplied_table() {
        let table = ClassifierTable::from_pairs(&[('<', '>')]);
        let occurrences = scan("(a) <b>", &table, &ScanOptions::default());
        let characters: Vec<char> = occurrences.iter().map(|o| o.character).collect();
        assert_eq!(characters, vec!['<', '>']);
    }

    #[test]
    fn test_occurrences_are_in_text_order() {
        let occurrences = scan_default("([{\"");
        let offsets: Vec<usize> = occurrences.iter().map(|o| o.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_complements() {
        let occurrences = scan_default("()[");
        let mut open = occurrences[0];
        let mut close = occurrences[1];
        open.direction = Direction::Opening;
        close.direction = Direction::Closing;
        assert!(close.complements(&open));
        assert!(!open.complements(&close));
        assert!(!occurrences[2].complements(&open));
    }
}
