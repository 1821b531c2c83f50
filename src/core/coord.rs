//! Screen coordinates
//!
//! Coordinates are signed so that layout arithmetic may go negative
//! before it is clamped back into the screen.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

/// A (line, column) position or size on the screen, 0-indexed
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DisplayCoord {
    pub line: i32,
    pub column: i32,
}

impl DisplayCoord {
    pub const fn new(line: i32, column: i32) -> Self {
        Self { line, column }
    }

    /// A coordinate on the given line, column 0
    pub const fn line(line: i32) -> Self {
        Self { line, column: 0 }
    }

    /// Component-wise halving, used to centre boxes
    pub fn half(self) -> Self {
        Self::new(self.line / 2, self.column / 2)
    }

    pub fn is_zero(self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl Add for DisplayCoord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.line + rhs.line, self.column + rhs.column)
    }
}

impl AddAssign for DisplayCoord {
    fn add_assign(&mut self, rhs: Self) {
        self.line += rhs.line;
        self.column += rhs.column;
    }
}

impl Sub for DisplayCoord {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.line - rhs.line, self.column - rhs.column)
    }
}

/// An axis-aligned rectangle on the screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: DisplayCoord,
    pub size: DisplayCoord,
}

impl Rect {
    pub const fn new(pos: DisplayCoord, size: DisplayCoord) -> Self {
        Self { pos, size }
    }

    /// One past the bottom-right corner
    pub fn end(&self) -> DisplayCoord {
        self.pos + self.size
    }

    /// True for the zero-sized rectangle (nothing to avoid)
    pub fn is_empty(&self) -> bool {
        self.size.is_zero()
    }

    /// Whether a box of `size` placed at `pos` lies fully inside this rectangle
    pub fn contains_box(&self, pos: DisplayCoord, size: DisplayCoord) -> bool {
        let end = self.end();
        pos.line >= self.pos.line
            && pos.column >= self.pos.column
            && pos.line + size.line <= end.line
            && pos.column + size.column <= end.column
    }
}
