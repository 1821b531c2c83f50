//! Overlay layout
//!
//! Menus and info boxes are placed relative to the screen layout: the
//! content area plus a one-line status bar on the top or bottom row.

mod assistant;
mod geometry;
mod info;
mod menu;

pub use assistant::Assistant;
pub use geometry::{compute_pos, overlaps};
pub use info::{make_info_box, make_simple_info_box, wrap_lines, Info, InfoBox, InfoStyle};
pub use menu::{
    div_round_up, grid_first_item, scrollbar, single_row_first_item, Menu, MenuStyle,
};

use crate::core::{DisplayCoord, Rect};

/// Screen split between content and the status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Size of the content area: terminal rows minus the status line
    pub dimensions: DisplayCoord,
    pub status_on_top: bool,
}

impl ScreenLayout {
    pub fn new(dimensions: DisplayCoord, status_on_top: bool) -> Self {
        Self {
            dimensions,
            status_on_top,
        }
    }

    /// Screen line of buffer line zero
    pub fn content_line_offset(&self) -> i32 {
        if self.status_on_top {
            1
        } else {
            0
        }
    }

    /// Screen line of the status bar
    pub fn status_line(&self) -> i32 {
        if self.status_on_top {
            0
        } else {
            self.dimensions.line
        }
    }

    pub fn content_rect(&self) -> Rect {
        Rect::new(
            DisplayCoord::line(self.content_line_offset()),
            self.dimensions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_at_bottom() {
        let layout = ScreenLayout::new(DisplayCoord::new(23, 80), false);
        assert_eq!(layout.content_line_offset(), 0);
        assert_eq!(layout.status_line(), 23);
        assert_eq!(layout.content_rect(), Rect::new(DisplayCoord::default(), DisplayCoord::new(23, 80)));
    }

    #[test]
    fn test_status_on_top() {
        let layout = ScreenLayout::new(DisplayCoord::new(23, 80), true);
        assert_eq!(layout.content_line_offset(), 1);
        assert_eq!(layout.status_line(), 0);
        assert_eq!(layout.content_rect().pos, DisplayCoord::new(1, 0));
    }
}
