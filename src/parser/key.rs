//! Key events
//!
//! Abstract key events produced by the input decoder. A key is a key code
//! plus a modifier set; mouse and resize notifications travel through the
//! same stream.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::DisplayCoord;

bitflags! {
    /// Keyboard modifiers, laid out as the xterm modifier mask
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const ALT = 2;
        const CONTROL = 4;
    }
}

impl Modifiers {
    /// Decode an xterm modifier mask (the CSI parameter minus one)
    pub fn from_mask(mask: i32) -> Self {
        Self::from_bits_truncate((mask & 0x7) as u8)
    }

    /// The CSI parameter encoding these modifiers: 1 + mask
    pub fn csi_param(self) -> u8 {
        1 + self.bits()
    }
}

/// Mouse buttons tracked by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Bit used for this button in the pressed-buttons state
    pub fn mask(self) -> u8 {
        match self {
            MouseButton::Left => 0x1,
            MouseButton::Middle => 0x4,
            MouseButton::Right => 0x2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

/// Key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Character input
    Char(char),

    // Control
    Return,
    Tab,
    Backspace,
    Escape,

    // Navigation
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,

    /// Function key, 1-based
    F(u8),

    // Focus reporting
    FocusIn,
    FocusOut,

    // Mouse, in content-relative coordinates
    MousePress(MouseButton, DisplayCoord),
    MouseRelease(MouseButton, DisplayCoord),
    MousePosition(DisplayCoord),
    /// Wheel motion; negative scrolls up
    Scroll(i32),

    /// Terminal resized, carrying the new content dimensions
    Resize(DisplayCoord),
}

/// A decoded key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub modifiers: Modifiers,
    pub code: KeyCode,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            modifiers: Modifiers::empty(),
            code,
        }
    }

    pub const fn with_modifiers(modifiers: Modifiers, code: KeyCode) -> Self {
        Self { modifiers, code }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::with_modifiers(Modifiers::CONTROL, KeyCode::Char(c))
    }

    pub const fn resize(dimensions: DisplayCoord) -> Self {
        Self::new(KeyCode::Resize(dimensions))
    }

    /// Add the Alt modifier
    pub fn alt(mut self) -> Self {
        self.modifiers |= Modifiers::ALT;
        self
    }

    /// Add the Shift modifier
    pub fn shift(mut self) -> Self {
        self.modifiers |= Modifiers::SHIFT;
        self
    }

    pub fn is_mouse(&self) -> bool {
        matches!(
            self.code,
            KeyCode::MousePress(..)
                | KeyCode::MouseRelease(..)
                | KeyCode::MousePosition(_)
                | KeyCode::Scroll(_)
        )
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for Key {
    /// Editor key notation, e.g. `a`, `<c-a>`, `<s-tab>`, `<a-ret>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char('>') => "gt".to_string(),
            KeyCode::Char('-') => "minus".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Return => "ret".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Escape => "esc".to_string(),
            KeyCode::Up => "up".to_string(),
            KeyCode::Down => "down".to_string(),
            KeyCode::Left => "left".to_string(),
            KeyCode::Right => "right".to_string(),
            KeyCode::Home => "home".to_string(),
            KeyCode::End => "end".to_string(),
            KeyCode::PageUp => "pageup".to_string(),
            KeyCode::PageDown => "pagedown".to_string(),
            KeyCode::Insert => "ins".to_string(),
            KeyCode::Delete => "del".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            KeyCode::FocusIn => "focus_in".to_string(),
            KeyCode::FocusOut => "focus_out".to_string(),
            KeyCode::MousePress(button, c) => {
                format!("mouse:press:{}:{}.{}", button.name(), c.line, c.column)
            },
            KeyCode::MouseRelease(button, c) => {
                format!("mouse:release:{}:{}.{}", button.name(), c.line, c.column)
            },
            KeyCode::MousePosition(c) => format!("mouse:move:{}.{}", c.line, c.column),
            KeyCode::Scroll(amount) => format!("scroll:{}", amount),
            KeyCode::Resize(c) => format!("resize:{}.{}", c.line, c.column),
        };

        let plain = self.modifiers.is_empty() && matches!(self.code, KeyCode::Char(_));
        let named_char = matches!(self.code, KeyCode::Char(' ' | '<' | '>' | '-'));
        if plain && !named_char {
            return f.write_str(&name);
        }

        f.write_str("<")?;
        if self.modifiers.contains(Modifiers::CONTROL) {
            f.write_str("c-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("a-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("s-")?;
        }
        write!(f, "{}>", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_mask() {
        assert_eq!(Modifiers::from_mask(0), Modifiers::empty());
        assert_eq!(Modifiers::from_mask(4), Modifiers::CONTROL);
        assert_eq!(
            Modifiers::from_mask(7),
            Modifiers::SHIFT | Modifiers::ALT | Modifiers::CONTROL
        );
        assert_eq!((Modifiers::SHIFT | Modifiers::CONTROL).csi_param(), 6);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::char('a').to_string(), "a");
        assert_eq!(Key::ctrl('a').to_string(), "<c-a>");
        assert_eq!(Key::new(KeyCode::Tab).shift().to_string(), "<s-tab>");
        assert_eq!(Key::new(KeyCode::Return).alt().to_string(), "<a-ret>");
        assert_eq!(Key::char(' ').to_string(), "<space>");
        assert_eq!(Key::new(KeyCode::F(5)).to_string(), "<F5>");
    }

    #[test]
    fn test_is_mouse() {
        let coord = DisplayCoord::new(1, 2);
        assert!(Key::new(KeyCode::MousePress(MouseButton::Left, coord)).is_mouse());
        assert!(Key::new(KeyCode::Scroll(3)).is_mouse());
        assert!(!Key::new(KeyCode::Resize(coord)).is_mouse());
    }
}
