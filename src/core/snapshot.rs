//! Deterministic window snapshots
//!
//! Snapshots capture what a window holds in a serializable format for
//! testing and debugging. Drawing the same atoms into the same window
//! always produces identical snapshots.

use serde::{Deserialize, Serialize};

use super::face::{Attributes, Color, Face};
use super::window::Window;

/// A complete snapshot of one window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen position of the top-left corner
    pub line: i32,
    pub column: i32,
    /// Window dimensions
    pub lines: i32,
    pub columns: i32,
    /// Runs of each line, top to bottom
    pub rows: Vec<Vec<AtomSnapshot>>,
}

/// Snapshot of a single run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomSnapshot {
    pub content: String,
    #[serde(default, skip_serializing_if = "Color::is_default")]
    pub fg: Color,
    #[serde(default, skip_serializing_if = "Color::is_default")]
    pub bg: Color,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl AtomSnapshot {
    pub fn face(&self) -> Face {
        Face::new(self.fg, self.bg).with_attributes(self.attributes)
    }
}

impl Snapshot {
    /// Create a snapshot from the current window state
    pub fn from_window(window: &Window) -> Self {
        let rows = window
            .lines()
            .iter()
            .map(|line| {
                line.atoms()
                    .iter()
                    .map(|atom| AtomSnapshot {
                        content: atom.content.clone(),
                        fg: atom.face.fg,
                        bg: atom.face.bg,
                        attributes: atom.face.attributes,
                    })
                    .collect()
            })
            .collect();

        Snapshot {
            line: window.pos().line,
            column: window.pos().column,
            lines: window.size().line,
            columns: window.size().column,
            rows,
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of every line, trailing spaces trimmed
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for row in &self.rows {
            let start = result.len();
            for atom in row {
                result.push_str(&atom.content);
            }
            let trimmed = result[start..].trim_end_matches(' ').len();
            result.truncate(start + trimmed);
            result.push('\n');
        }
        result
    }

    /// Compare text content only, ignoring faces
    pub fn text_equals(&self, other: &Snapshot) -> bool {
        self.lines == other.lines
            && self.columns == other.columns
            && self.to_text() == other.to_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coord::DisplayCoord;
    use crate::core::line::DisplayAtom;

    fn sample() -> Window {
        let mut window = Window::new();
        window.create(DisplayCoord::new(1, 2), DisplayCoord::new(2, 6));
        window.draw(
            &[
                DisplayAtom::plain("ab"),
                DisplayAtom::new("cd", Face::new(Color::RED, Color::Default)),
            ],
            Face::default(),
        );
        window.move_cursor(DisplayCoord::new(1, 0));
        window.draw(&[DisplayAtom::plain("中")], Face::default());
        window
    }

    #[test]
    fn test_snapshot_from_window() {
        let snapshot = sample().snapshot();
        assert_eq!((snapshot.line, snapshot.column), (1, 2));
        assert_eq!((snapshot.lines, snapshot.columns), (2, 6));
        assert_eq!(snapshot.rows[0][1].content, "cd");
        assert_eq!(snapshot.rows[0][1].face(), Face::new(Color::RED, Color::Default));
    }

    #[test]
    fn test_snapshot_to_text() {
        assert_eq!(sample().snapshot().to_text(), "abcd\n中\n");
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = sample().snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(!json.contains("attributes"));
        let restored = Snapshot::from_json(&json).unwrap();
        assert_eq!(snapshot, restored);
        assert!(snapshot.text_equals(&restored));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        assert_eq!(sample().snapshot(), sample().snapshot());
    }
}
