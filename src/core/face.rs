//! Faces
//!
//! A face is the styling of a run of text: foreground and background
//! colors plus an attribute set.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// The sixteen named terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// Palette index, 0-15
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        use NamedColor::*;
        const ALL: [NamedColor; 16] = [
            Black,
            Red,
            Green,
            Yellow,
            Blue,
            Magenta,
            Cyan,
            White,
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        ALL.get(index as usize).copied()
    }
}

/// Color of a face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Terminal default; also means "unset" when merging faces
    #[default]
    Default,
    /// One of the sixteen palette colors
    Named(NamedColor),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Named(NamedColor::Black);
    pub const RED: Color = Color::Named(NamedColor::Red);
    pub const GREEN: Color = Color::Named(NamedColor::Green);
    pub const YELLOW: Color = Color::Named(NamedColor::Yellow);
    pub const BLUE: Color = Color::Named(NamedColor::Blue);
    pub const MAGENTA: Color = Color::Named(NamedColor::Magenta);
    pub const CYAN: Color = Color::Named(NamedColor::Cyan);
    pub const WHITE: Color = Color::Named(NamedColor::White);

    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }
}

bitflags! {
    /// Text attributes
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Attributes: u8 {
        const UNDERLINE = 1 << 1;
        const REVERSE = 1 << 2;
        const BLINK = 1 << 3;
        const BOLD = 1 << 4;
        const DIM = 1 << 5;
        const ITALIC = 1 << 6;
    }
}

/// Styling of a run of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    pub fg: Color,
    pub bg: Color,
    pub attributes: Attributes,
}

impl Face {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attributes: Attributes::empty(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Merge `face` over `base`.
///
/// Each color independently takes the override unless the override is
/// [`Color::Default`]; attributes accumulate.
pub fn merge_faces(base: Face, face: Face) -> Face {
    Face {
        fg: if face.fg.is_default() { base.fg } else { face.fg },
        bg: if face.bg.is_default() { base.bg } else { face.bg },
        attributes: base.attributes | face.attributes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_color_index_roundtrip() {
        for i in 0..16 {
            assert_eq!(NamedColor::from_index(i).map(NamedColor::index), Some(i));
        }
        assert_eq!(NamedColor::from_index(16), None);
    }

    #[test]
    fn test_merge_prefers_override() {
        let base = Face::new(Color::WHITE, Color::BLUE);
        let over = Face::new(Color::RED, Color::Rgb(1, 2, 3));
        let merged = merge_faces(base, over);
        assert_eq!(merged.fg, Color::RED);
        assert_eq!(merged.bg, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_merge_keeps_base_for_default() {
        let base = Face::new(Color::WHITE, Color::BLUE).with_attributes(Attributes::BOLD);
        let over = Face::default().with_attributes(Attributes::UNDERLINE);
        let merged = merge_faces(base, over);
        assert_eq!(merged.fg, Color::WHITE);
        assert_eq!(merged.bg, Color::BLUE);
        assert_eq!(merged.attributes, Attributes::BOLD | Attributes::UNDERLINE);
    }
}
