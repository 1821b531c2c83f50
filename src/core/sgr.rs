//! Escape sequence encoding
//!
//! Pure functions mapping faces and coordinates to the bytes an
//! ANSI/xterm terminal expects. Nothing here performs I/O; callers pass
//! the output buffer they will flush later.

use std::io::Write;

use super::coord::DisplayCoord;
use super::face::{Attributes, Color, Face};

/// SGR foreground codes: default, then the sixteen named colors
const FG_TABLE: [u8; 17] = [
    39, 30, 31, 32, 33, 34, 35, 36, 37, 90, 91, 92, 93, 94, 95, 96, 97,
];

/// SGR background codes: default, then the sixteen named colors
const BG_TABLE: [u8; 17] = [
    49, 40, 41, 42, 43, 44, 45, 46, 47, 100, 101, 102, 103, 104, 105, 106, 107,
];

const ATTRIBUTE_CODES: [(Attributes, u8); 6] = [
    (Attributes::UNDERLINE, 4),
    (Attributes::REVERSE, 7),
    (Attributes::BLINK, 5),
    (Attributes::BOLD, 1),
    (Attributes::DIM, 2),
    (Attributes::ITALIC, 3),
];

/// Parameters selecting `color`, without the leading separator
pub fn color_params(color: Color, foreground: bool) -> String {
    match color {
        Color::Rgb(r, g, b) => {
            format!("{};2;{};{};{}", if foreground { 38 } else { 48 }, r, g, b)
        },
        Color::Default => {
            let table = if foreground { &FG_TABLE } else { &BG_TABLE };
            table[0].to_string()
        },
        Color::Named(named) => {
            let table = if foreground { &FG_TABLE } else { &BG_TABLE };
            table[named.index() as usize + 1].to_string()
        },
    }
}

/// SGR codes for each attribute set in `attributes`, in emission order
pub fn attribute_codes(attributes: Attributes) -> impl Iterator<Item = u8> {
    ATTRIBUTE_CODES
        .iter()
        .filter(move |(flag, _)| attributes.contains(*flag))
        .map(|&(_, code)| code)
}

/// Append the SGR sequence fully describing `face`.
///
/// The first parameter is left empty, which terminals read as 0 (reset),
/// so no state leaks from the previous run.
pub fn write_sgr(out: &mut Vec<u8>, face: &Face) {
    out.extend_from_slice(b"\x1b[");
    for code in attribute_codes(face.attributes) {
        let _ = write!(out, ";{}", code);
    }
    let _ = write!(
        out,
        ";{};{}m",
        color_params(face.fg, true),
        color_params(face.bg, false)
    );
}

/// Append a CUP sequence moving the hardware cursor to `coord` (0-indexed)
pub fn write_cursor_pos(out: &mut Vec<u8>, coord: DisplayCoord) {
    let _ = write!(out, "\x1b[{};{}H", coord.line + 1, coord.column + 1);
}

/// Convenience for tests and logging
pub fn sgr(face: &Face) -> String {
    let mut out = Vec::new();
    write_sgr(&mut out, face);
    String::from_utf8_lossy(&out).into_owned()
}
