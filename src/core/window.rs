//! Off-screen windows
//!
//! A window is a rectangular screen region backed by one line of atoms per
//! row. Drawing only touches the line buffers; nothing reaches the terminal
//! until [`Window::refresh`] composes the escape sequences into the
//! caller's output buffer.

use tracing::trace;

use super::coord::{DisplayCoord, Rect};
use super::face::{merge_faces, Face};
use super::line::{column_length, split_at_column, DisplayAtom, DisplayLine};
use super::sgr::{write_cursor_pos, write_sgr};
use super::snapshot::Snapshot;

/// A screen region with its own line buffers and write cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    pos: DisplayCoord,
    size: DisplayCoord,
    lines: Vec<DisplayLine>,
    /// Position of the next draw, relative to the window
    cursor: DisplayCoord,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `size.line` empty lines at `pos`
    pub fn create(&mut self, pos: DisplayCoord, size: DisplayCoord) {
        self.pos = pos;
        self.size = size;
        self.cursor = DisplayCoord::default();
        self.lines.clear();
        self.lines.resize(size.line.max(0) as usize, DisplayLine::default());
    }

    /// Drop all content; calling it on an inactive window is a no-op
    pub fn destroy(&mut self) {
        self.pos = DisplayCoord::default();
        self.size = DisplayCoord::default();
        self.cursor = DisplayCoord::default();
        self.lines.clear();
    }

    /// A window with no lines is inactive and never drawn
    pub fn is_active(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn pos(&self) -> DisplayCoord {
        self.pos
    }

    pub fn size(&self) -> DisplayCoord {
        self.size
    }

    /// Screen area covered, zero-sized when inactive
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Set where the next draw writes. Bounds are not checked here.
    pub fn move_cursor(&mut self, coord: DisplayCoord) {
        self.cursor = coord;
    }

    pub fn cursor(&self) -> DisplayCoord {
        self.cursor
    }

    /// Truncate the cursor line so it ends exactly at the cursor column,
    /// or at the window edge when the cursor lies beyond it.
    ///
    /// A run straddling the cursor column is cut to its partial width; a
    /// wide character split by the cut is replaced with a space.
    pub fn clear_line(&mut self) {
        let target = self.cursor.column.clamp(0, self.size.column.max(0));
        let Some(line) = self.line_mut(self.cursor.line) else {
            return;
        };

        let atoms = line.atoms_mut();
        let mut column = 0;
        let mut kept = 0;
        while kept < atoms.len() && column < target {
            column += atoms[kept].length();
            kept += 1;
        }
        atoms.truncate(kept);

        if column > target {
            if let Some(last) = atoms.last_mut() {
                let new_length = last.length() - (column - target);
                let (idx, width) = split_at_column(&last.content, new_length);
                last.content.truncate(idx);
                last.content.push_str(&" ".repeat((new_length - width) as usize));
            }
        } else if column < target {
            atoms.push(DisplayAtom::new(
                " ".repeat((target - column) as usize),
                Face::default(),
            ));
        }
        atoms.retain(|atom| !atom.content.is_empty());
    }

    /// Replace the cursor line from the cursor column onwards with `atoms`.
    ///
    /// Each atom's face is merged over `default_face`. Line breaks render as
    /// filler spaces, so a buffer line ending in one still fills one row. Content is clipped at the
    /// window edge and the remainder padded with `default_face` spaces, so
    /// the line always ends up exactly as wide as the window. The cursor
    /// stops after the drawn content, so a following draw replaces the
    /// padding.
    pub fn draw(&mut self, atoms: &[DisplayAtom], default_face: Face) {
        if self.line_mut(self.cursor.line).is_none() {
            trace!(line = self.cursor.line, "draw outside window ignored");
            return;
        }
        self.clear_line();

        let width = self.size.column;
        let line_index = self.cursor.line as usize;
        let first_new = self.lines[line_index].atoms().len();
        let mut column = self.cursor.column.max(0);

        for atom in atoms {
            if atom.content.is_empty() {
                continue;
            }
            let available = width - column;
            if available <= 0 {
                break;
            }

            let face = merge_faces(default_face, atom.face);
            // A raw line feed would move the terminal cursor off this row
            let text = atom.content.replace('\n', " ");
            let (idx, mut used) = split_at_column(&text, available);
            let mut clipped = text[..idx].to_string();
            if idx < text.len() && used < available {
                clipped.push_str(&" ".repeat((available - used) as usize));
                used = available;
            }

            let line = &mut self.lines[line_index];
            push_run(line, first_new, clipped, face);
            column += used;
        }

        self.cursor.column = column;
        if column < width {
            let line = &mut self.lines[line_index];
            push_run(
                line,
                first_new,
                " ".repeat((width - column) as usize),
                default_face,
            );
        }
    }

    /// Append the escape sequences rendering every line of this window.
    ///
    /// Every run of every line is emitted; there is no dirty tracking below
    /// the window level.
    pub fn refresh(&self, out: &mut Vec<u8>) {
        if self.lines.is_empty() {
            return;
        }

        let mut cursor_pos = self.pos;
        for line in &self.lines {
            write_cursor_pos(out, cursor_pos);
            for atom in line.atoms() {
                write_sgr(out, &atom.face);
                out.extend_from_slice(atom.content.as_bytes());
            }
            cursor_pos.line += 1;
        }
    }

    /// Serializable view of the current content
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_window(self)
    }

    fn line_mut(&mut self, line: i32) -> Option<&mut DisplayLine> {
        if line < 0 {
            return None;
        }
        self.lines.get_mut(line as usize)
    }
}

/// Push a run, coalescing with the previous run of the same draw call when
/// the faces match.
fn push_run(line: &mut DisplayLine, first_new: usize, content: String, face: Face) {
    if content.is_empty() {
        return;
    }
    let atoms = line.atoms_mut();
    if atoms.len() > first_new {
        if let Some(last) = atoms.last_mut() {
            if last.face == face {
                last.content.push_str(&content);
                return;
            }
        }
    }
    atoms.push(DisplayAtom::new(content, face));
}

/// Width of the text currently stored on `line`
pub fn line_width(line: &DisplayLine) -> i32 {
    line.atoms().iter().map(|a| column_length(&a.content)).sum()
}
