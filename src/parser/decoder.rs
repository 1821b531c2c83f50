//! Terminal input decoder
//!
//! Turns raw terminal input into [`Key`] events. Each call to
//! [`InputDecoder::decode`] consumes just enough bytes for at most one
//! event:
//!
//! - C0 control bytes map to Return/Tab/Backspace or Control+letter
//! - other bytes start a UTF-8 codepoint, continuation bytes pulled lazily
//! - ESC starts a CSI (`ESC [`) or SS3 (`ESC O`) sequence, an Alt-modified
//!   key, or stands alone when nothing follows it in time
//!
//! Malformed sequences never surface as errors: the decoder falls back to
//! the literal interpretation (Alt+`[`, Alt+`O`).

use std::time::Duration;

use tracing::trace;

use super::key::{Key, KeyCode, Modifiers, MouseButton};
use super::source::ByteSource;
use super::utf8::decode_codepoint;
use crate::core::DisplayCoord;

const ESC: u8 = 0x1b;

/// Maximum number of CSI parameters
const MAX_PARAMS: usize = 16;

/// Returned in place of a byte that did not arrive; outside every valid range
const NO_BYTE: u8 = 0xff;

/// Outcome of one decode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A key event
    Key(Key),
    /// Ctrl+Z was typed; the caller should run its suspend sequence
    Suspend,
    /// Nothing to report: no input, or a well-formed but unmapped sequence
    None,
}

impl Decoded {
    pub fn key(self) -> Option<Key> {
        match self {
            Decoded::Key(key) => Some(key),
            _ => None,
        }
    }
}

/// Result of parsing the body of a CSI sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Csi {
    Key(Key),
    /// Well-formed but not mapped to any key
    Ignored,
    /// Malformed; the caller falls back to Alt+`[`
    Invalid,
}

/// Stateful input decoder.
///
/// The only state carried between calls is the set of mouse buttons
/// currently held, needed to tell drags from presses and to attribute
/// legacy release reports.
#[derive(Debug, Clone)]
pub struct InputDecoder {
    /// Bit set of held buttons, see [`MouseButton::mask`]
    mouse_state: u8,
    /// Rows reserved above the content area
    content_line_offset: i32,
    /// F-keys numbered above this are reported as Shift+F(n - offset)
    shift_function_key: i32,
    wheel_up_button: i32,
    wheel_down_button: i32,
    wheel_scroll_amount: i32,
    /// How long to wait for the bytes following the first one
    continuation_wait: Duration,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self {
            mouse_state: 0,
            content_line_offset: 0,
            shift_function_key: 12,
            wheel_up_button: 4,
            wheel_down_button: 5,
            wheel_scroll_amount: 3,
            continuation_wait: Duration::ZERO,
        }
    }
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content_line_offset(&mut self, offset: i32) {
        self.content_line_offset = offset;
    }

    pub fn set_shift_function_key(&mut self, offset: i32) {
        self.shift_function_key = offset;
    }

    /// Configure which X11 buttons scroll, and by how much
    pub fn set_wheel(&mut self, up_button: i32, down_button: i32, scroll_amount: i32) {
        self.wheel_up_button = up_button;
        self.wheel_down_button = down_button;
        self.wheel_scroll_amount = scroll_amount;
    }

    pub fn set_continuation_wait(&mut self, wait: Duration) {
        self.continuation_wait = wait;
    }

    /// Held mouse buttons, as a [`MouseButton::mask`] bit set
    pub fn mouse_state(&self) -> u8 {
        self.mouse_state
    }

    /// Forget held buttons, e.g. after mouse reporting was turned off
    pub fn reset_mouse_state(&mut self) {
        self.mouse_state = 0;
    }

    /// Decode at most one event from `src`
    pub fn decode(&mut self, src: &mut dyn ByteSource) -> Decoded {
        let Some(byte) = src.next_byte(Duration::ZERO) else {
            return Decoded::None;
        };

        let decoded = if byte != ESC {
            self.decode_byte(byte, src)
        } else {
            match src.next_byte(self.continuation_wait) {
                None => Decoded::Key(Key::new(KeyCode::Escape)),
                Some(b'[') => match self.parse_csi(src) {
                    Csi::Key(key) => Decoded::Key(key),
                    Csi::Ignored => Decoded::None,
                    Csi::Invalid => Decoded::Key(Key::char('[').alt()),
                },
                Some(b'O') => {
                    let key = self
                        .parse_ss3(src)
                        .unwrap_or_else(|| Key::char('O').alt());
                    Decoded::Key(key)
                },
                Some(next) => match self.decode_byte(next, src) {
                    Decoded::Key(key) => Decoded::Key(key.alt()),
                    other => other,
                },
            }
        };

        trace!(?decoded, "decoded input");
        decoded
    }

    /// Decode a key starting with a byte that does not introduce an
    /// escape sequence
    fn decode_byte(&self, byte: u8, src: &mut dyn ByteSource) -> Decoded {
        let key = match byte {
            b'\r' | b'\n' => Key::new(KeyCode::Return),
            b'\t' => Key::new(KeyCode::Tab),
            0x08 | 0x7f => Key::new(KeyCode::Backspace),
            0x1a => return Decoded::Suspend,
            ESC => Key::new(KeyCode::Escape),
            b if b < 27 => Key::ctrl(char::from(b'a' - 1 + b)),
            _ => {
                let wait = self.continuation_wait;
                let (c, _) = decode_codepoint(byte, || src.next_byte(wait));
                Key::char(c)
            },
        };
        Decoded::Key(key)
    }

    fn next_or_none(&self, src: &mut dyn ByteSource) -> u8 {
        src.next_byte(self.continuation_wait).unwrap_or(NO_BYTE)
    }

    fn parse_csi(&mut self, src: &mut dyn ByteSource) -> Csi {
        let mut params = [0i32; MAX_PARAMS];
        let mut c = self.next_or_none(src);

        let mut private_mode = None;
        if matches!(c, b'?' | b'<' | b'=' | b'>') {
            private_mode = Some(c);
            c = self.next_or_none(src);
        }

        let mut count = 0;
        while count < MAX_PARAMS && (0x30..=0x3f).contains(&c) {
            match c {
                b'0'..=b'9' => {
                    params[count] = params[count]
                        .saturating_mul(10)
                        .saturating_add(i32::from(c - b'0'));
                },
                b';' => count += 1,
                _ => return Csi::Invalid,
            }
            c = self.next_or_none(src);
        }
        if !(0x40..=0x7e).contains(&c) {
            return Csi::Invalid;
        }

        let masked = |code: KeyCode| {
            Csi::Key(Key::with_modifiers(
                Modifiers::from_mask((params[1] - 1).max(0)),
                code,
            ))
        };

        match c {
            b'A' => masked(KeyCode::Up),
            b'B' => masked(KeyCode::Down),
            b'C' => masked(KeyCode::Right),
            b'D' => masked(KeyCode::Left),
            b'F' => masked(KeyCode::End),
            b'H' => masked(KeyCode::Home),
            b'P' => self.function_key(1, params[1]),
            b'Q' => self.function_key(2, params[1]),
            b'R' => self.function_key(3, params[1]),
            b'S' => self.function_key(4, params[1]),
            b'~' => match params[0] {
                2 => masked(KeyCode::Insert),
                3 => masked(KeyCode::Delete),
                5 => masked(KeyCode::PageUp),
                6 => masked(KeyCode::PageDown),
                7 => masked(KeyCode::Home),
                8 => masked(KeyCode::End),
                n @ 11..=15 => self.function_key(n - 10, params[1]),
                n @ 17..=21 => self.function_key(n - 11, params[1]),
                n @ 23..=26 => self.function_key(n - 12, params[1]),
                n @ 28..=29 => self.function_key(n - 13, params[1]),
                n @ 31..=34 => self.function_key(n - 14, params[1]),
                _ => Csi::Ignored,
            },
            b'u' => match codepoint_key(params[0]) {
                Some(code) => masked(code),
                None => Csi::Ignored,
            },
            b'Z' => Csi::Key(Key::new(KeyCode::Tab).shift()),
            b'I' => Csi::Key(Key::new(KeyCode::FocusIn)),
            b'O' => Csi::Key(Key::new(KeyCode::FocusOut)),
            b'M' | b'm' => self.parse_mouse(src, private_mode == Some(b'<'), c, &params),
            _ => Csi::Ignored,
        }
    }

    /// F-key `n` with the modifier parameter `param`, applying the shift offset
    fn function_key(&self, n: i32, param: i32) -> Csi {
        let mut modifiers = Modifiers::from_mask((param - 1).max(0));
        let mut n = n;
        if self.shift_function_key > 0 && n > self.shift_function_key {
            n -= self.shift_function_key;
            modifiers |= Modifiers::SHIFT;
        }
        match u8::try_from(n) {
            Ok(n) => Csi::Key(Key::with_modifiers(modifiers, KeyCode::F(n))),
            Err(_) => Csi::Ignored,
        }
    }

    fn parse_mouse(
        &mut self,
        src: &mut dyn ByteSource,
        sgr: bool,
        final_byte: u8,
        params: &[i32; MAX_PARAMS],
    ) -> Csi {
        if !sgr && final_byte != b'M' {
            return Csi::Invalid;
        }

        let (b, x, y) = if sgr {
            (params[0], params[1] - 1, params[2] - 1)
        } else {
            let b = i32::from(self.next_or_none(src)) - 32;
            let x = i32::from(self.next_or_none(src)) - 32 - 1;
            let y = i32::from(self.next_or_none(src)) - 32 - 1;
            (b, x, y)
        };
        let coord = DisplayCoord::new(y - self.content_line_offset, x);
        let modifiers = Modifiers::from_mask(b >> 2);
        let release = final_byte == b'm';

        let key = match b & 0x43 {
            0 => self.mouse_button(modifiers, MouseButton::Left, coord, release),
            1 => self.mouse_button(modifiers, MouseButton::Middle, coord, release),
            2 => self.mouse_button(modifiers, MouseButton::Right, coord, release),
            // SGR reports name the released button, code 3 carries nothing
            3 if sgr => return Csi::Ignored,
            // Legacy release does not say which button; left wins a tie
            3 => {
                let held = [MouseButton::Left, MouseButton::Right, MouseButton::Middle]
                    .into_iter()
                    .find(|button| self.mouse_state & button.mask() != 0);
                match held {
                    Some(button) => self.mouse_button(modifiers, button, coord, true),
                    None => Key::new(KeyCode::MousePosition(coord)),
                }
            },
            code @ 64..=67 => {
                let button = code - 64 + 4;
                if button == self.wheel_up_button {
                    Key::with_modifiers(modifiers, KeyCode::Scroll(-self.wheel_scroll_amount))
                } else if button == self.wheel_down_button {
                    Key::with_modifiers(modifiers, KeyCode::Scroll(self.wheel_scroll_amount))
                } else {
                    Key::new(KeyCode::MousePosition(coord))
                }
            },
            _ => Key::new(KeyCode::MousePosition(coord)),
        };
        Csi::Key(key)
    }

    fn mouse_button(
        &mut self,
        modifiers: Modifiers,
        button: MouseButton,
        coord: DisplayCoord,
        release: bool,
    ) -> Key {
        let mask = button.mask();
        let code = if release {
            self.mouse_state &= !mask;
            KeyCode::MouseRelease(button, coord)
        } else if self.mouse_state & mask != 0 {
            KeyCode::MousePosition(coord)
        } else {
            self.mouse_state |= mask;
            KeyCode::MousePress(button, coord)
        };
        Key::with_modifiers(modifiers, code)
    }

    fn parse_ss3(&self, src: &mut dyn ByteSource) -> Option<Key> {
        let code = match self.next_or_none(src) {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'F' => KeyCode::End,
            b'H' => KeyCode::Home,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            _ => return None,
        };
        Some(Key::new(code))
    }
}

/// Key for an explicit codepoint report (`CSI n u`)
fn codepoint_key(codepoint: i32) -> Option<KeyCode> {
    match codepoint {
        13 => Some(KeyCode::Return),
        9 => Some(KeyCode::Tab),
        127 => Some(KeyCode::Backspace),
        27 => Some(KeyCode::Escape),
        n => u32::try_from(n).ok().and_then(char::from_u32).map(KeyCode::Char),
    }
}
