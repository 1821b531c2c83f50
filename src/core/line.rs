//! Display atoms and lines
//!
//! A display line is an ordered sequence of atoms, each a run of text
//! sharing a single face. Widths are always measured in display columns,
//! never bytes.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use super::face::Face;

/// Display width of a single character.
///
/// A line break counts as one column since it renders as a filler space.
pub fn char_width(c: char) -> i32 {
    if c == '\n' {
        return 1;
    }
    UnicodeWidthChar::width(c).unwrap_or(0) as i32
}

/// Display width of a string
pub fn column_length(s: &str) -> i32 {
    s.chars().map(char_width).sum()
}

/// Split `s` after at most `max` columns.
///
/// Returns the byte index of the split and the width of the prefix. A
/// wide character that would straddle `max` is left out of the prefix.
pub fn split_at_column(s: &str, max: i32) -> (usize, i32) {
    let mut width = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if width + w > max {
            return (idx, width);
        }
        width += w;
    }
    (s.len(), width)
}

/// A run of text drawn with one face
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAtom {
    pub content: String,
    pub face: Face,
}

impl DisplayAtom {
    pub fn new(content: impl Into<String>, face: Face) -> Self {
        Self {
            content: content.into(),
            face,
        }
    }

    /// An atom with the default face
    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, Face::default())
    }

    pub fn length(&self) -> i32 {
        column_length(&self.content)
    }
}

impl From<&str> for DisplayAtom {
    fn from(s: &str) -> Self {
        Self::plain(s)
    }
}

/// A line of styled text runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    atoms: Vec<DisplayAtom>,
}

impl DisplayLine {
    pub fn new(atoms: Vec<DisplayAtom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[DisplayAtom] {
        &self.atoms
    }

    pub fn atoms_mut(&mut self) -> &mut Vec<DisplayAtom> {
        &mut self.atoms
    }

    pub fn push(&mut self, atom: DisplayAtom) {
        self.atoms.push(atom);
    }

    pub fn insert(&mut self, index: usize, atom: DisplayAtom) {
        self.atoms.insert(index, atom);
    }

    /// Total display width
    pub fn length(&self) -> i32 {
        self.atoms.iter().map(DisplayAtom::length).sum()
    }

    /// Concatenated text of all atoms
    pub fn text(&self) -> String {
        self.atoms.iter().map(|a| a.content.as_str()).collect()
    }

    /// Keep only the columns in `first_col..first_col + col_count`.
    ///
    /// A wide character cut by either edge is replaced by spaces so the
    /// result is exactly `col_count` wide whenever the line was long enough.
    pub fn trim(&mut self, first_col: i32, col_count: i32) {
        let mut skip = first_col.max(0);
        let mut keep = col_count.max(0);
        let mut trimmed = Vec::with_capacity(self.atoms.len());

        for atom in self.atoms.drain(..) {
            if keep == 0 {
                break;
            }
            let mut content = atom.content.as_str();
            let mut lead = String::new();
            if skip > 0 {
                let width = column_length(content);
                if width <= skip {
                    skip -= width;
                    continue;
                }
                let (idx, skipped) = split_at_column(content, skip);
                content = &content[idx..];
                if skipped < skip {
                    // A wide character straddles the left edge
                    let straddler = content.chars().next().map_or(0, char_width);
                    let cut = skip - skipped;
                    lead = " ".repeat((straddler - cut).max(0) as usize);
                    content = &content[content.chars().next().map_or(0, char::len_utf8)..];
                }
                skip = 0;
            }

            let lead_width = (lead.len() as i32).min(keep);
            lead.truncate(lead_width as usize);
            keep -= lead_width;

            let (idx, width) = split_at_column(content, keep);
            let mut text = lead;
            text.push_str(&content[..idx]);
            keep -= width;
            if idx < content.len() && keep > 0 {
                text.push_str(&" ".repeat(keep as usize));
                keep = 0;
            }
            if !text.is_empty() {
                trimmed.push(DisplayAtom::new(text, atom.face));
            }
        }
        self.atoms = trimmed;
    }
}

impl From<Vec<DisplayAtom>> for DisplayLine {
    fn from(atoms: Vec<DisplayAtom>) -> Self {
        Self::new(atoms)
    }
}

impl From<&str> for DisplayLine {
    fn from(s: &str) -> Self {
        Self::new(vec![DisplayAtom::plain(s)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::face::Color;

    #[test]
    fn test_column_length() {
        assert_eq!(column_length("abc"), 3);
        assert_eq!(column_length("中文"), 4);
        assert_eq!(column_length("a\n"), 2);
        assert_eq!(column_length("\x07"), 0);
    }

    #[test]
    fn test_split_at_column_wide() {
        assert_eq!(split_at_column("中文", 3), (3, 2));
        assert_eq!(split_at_column("ab", 5), (2, 2));
    }

    #[test]
    fn test_line_length_and_text() {
        let line = DisplayLine::new(vec![
            DisplayAtom::plain("foo"),
            DisplayAtom::new("中", Face::new(Color::RED, Color::Default)),
        ]);
        assert_eq!(line.length(), 5);
        assert_eq!(line.text(), "foo中");
    }

    #[test]
    fn test_trim_across_atoms() {
        let mut line = DisplayLine::new(vec![
            DisplayAtom::plain("hello "),
            DisplayAtom::plain("world"),
        ]);
        line.trim(3, 5);
        assert_eq!(line.text(), "lo wo");
        assert_eq!(line.atoms().len(), 2);
    }

    #[test]
    fn test_trim_pads_straddling_wide_chars() {
        let mut line = DisplayLine::from("中文字");
        line.trim(1, 4);
        assert_eq!(line.length(), 4);
        assert_eq!(line.text(), " 文 ");
    }

    #[test]
    fn test_trim_short_line() {
        let mut line = DisplayLine::from("ab");
        line.trim(0, 10);
        assert_eq!(line.text(), "ab");
        line.trim(5, 10);
        assert!(line.atoms().is_empty());
    }
}
