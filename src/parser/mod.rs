//! Input decoding
//!
//! Converts raw terminal input bytes into abstract key events:
//! - `key`: key codes, modifiers and mouse buttons
//! - `source`: the readiness-gated byte supply the decoder pulls from
//! - `utf8`: lazy UTF-8 decoding of multi-byte characters
//! - `decoder`: the CSI/SS3/mouse state machine
//!
//! The decoder is independent of any file descriptor, so it can be driven
//! from canned byte sequences.

mod decoder;
mod key;
mod source;
mod utf8;

pub use decoder::{Decoded, InputDecoder};
pub use key::{Key, KeyCode, Modifiers, MouseButton};
pub use source::{ByteSource, SliceSource};
pub use utf8::decode_codepoint;
