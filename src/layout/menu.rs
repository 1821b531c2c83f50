//! Completion menu
//!
//! Two presentations: a single row that scrolls horizontally (search
//! menus), and a grid of columns filled top to bottom, paged sideways
//! with a scrollbar on the right edge.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ScreenLayout;
use crate::core::{DisplayAtom, DisplayCoord, DisplayLine, Face, Rect, Window};

/// Where a menu is anchored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuStyle {
    /// Single column next to the anchor in the buffer
    #[default]
    Inline,
    /// Multi-column grid hugging the status line
    Prompt,
    /// Single scrolling row on the status line
    Search,
}

impl MenuStyle {
    /// Maximum number of visible rows
    pub fn height_limit(self) -> i32 {
        match self {
            MenuStyle::Inline | MenuStyle::Prompt => 10,
            MenuStyle::Search => 3,
        }
    }
}

/// Ceiling division for positive divisors
pub fn div_round_up(a: i32, b: i32) -> i32 {
    if a <= 0 {
        return 0;
    }
    (a - 1) / b + 1
}

/// First visible item of a single-row menu so that `selected` fits in
/// `width` columns. Each item takes its width plus one separator column.
pub fn single_row_first_item(widths: &[i32], selected: usize, width: i32) -> usize {
    let mut first = 0;
    let mut item_col = 0;
    for (i, item_width) in widths.iter().take(selected + 1).enumerate() {
        let item_width = item_width + 1;
        if item_col + item_width > width {
            first = i;
            item_col = item_width;
        } else {
            item_col += item_width;
        }
    }
    first
}

/// First visible item of a grid menu after selecting `selected`.
///
/// Items fill columns of `lines` rows; `columns` of them are visible. The
/// page only moves when the selected item's column is off screen, and never
/// past the last full page.
pub fn grid_first_item(
    first_item: usize,
    selected: usize,
    item_count: usize,
    lines: usize,
    columns: usize,
) -> usize {
    if lines == 0 {
        return first_item;
    }
    let menu_cols = div_round_up(item_count as i32, lines as i32) as usize;
    let first_col = first_item / lines;
    let selected_col = selected / lines;
    if selected_col < first_col {
        selected_col * lines
    } else if selected_col >= first_col + columns {
        selected_col.min(menu_cols.saturating_sub(columns)) * lines
    } else {
        first_item
    }
}

/// Scrollbar thumb as (first line, height) for a window of `win_height`
/// rows showing page `first_col` of `menu_cols` item columns
pub fn scrollbar(
    win_height: i32,
    menu_lines: i32,
    first_col: i32,
    menu_cols: i32,
    columns: i32,
) -> (i32, i32) {
    let mark_height = div_round_up(win_height * win_height, menu_lines.max(1)).min(win_height);
    let mark_line = (win_height - mark_height) * first_col / (menu_cols - columns).max(1);
    (mark_line, mark_height)
}

/// The menu overlay
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<DisplayLine>,
    anchor: DisplayCoord,
    fg: Face,
    bg: Face,
    style: MenuStyle,
    selected: Option<usize>,
    first_item: usize,
    /// 0 for the single-row presentation
    columns: usize,
    window: Window,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.window.is_active()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Screen area, empty when hidden
    pub fn rect(&self) -> Rect {
        self.window.rect()
    }

    pub fn items(&self) -> &[DisplayLine] {
        &self.items
    }

    pub fn anchor(&self) -> DisplayCoord {
        self.anchor
    }

    pub fn faces(&self) -> (Face, Face) {
        (self.fg, self.bg)
    }

    pub fn style(&self) -> MenuStyle {
        self.style
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn first_item(&self) -> usize {
        self.first_item
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Lay out and draw `items`. Nothing is shown when there are no items
    /// or the screen is too narrow.
    pub fn show(
        &mut self,
        items: Vec<DisplayLine>,
        anchor: DisplayCoord,
        fg: Face,
        bg: Face,
        style: MenuStyle,
        layout: &ScreenLayout,
    ) {
        self.window.destroy();
        self.items.clear();
        self.fg = fg;
        self.bg = bg;
        self.style = style;
        self.anchor = anchor;
        self.selected = None;
        self.first_item = 0;

        let dimensions = layout.dimensions;
        if dimensions.column <= 2 || items.is_empty() {
            return;
        }

        let item_count = items.len() as i32;
        let longest = items.iter().map(DisplayLine::length).fold(1, i32::max);
        let max_width = dimensions.column - 1;

        let columns = match style {
            MenuStyle::Search => 0,
            MenuStyle::Inline => 1,
            MenuStyle::Prompt => (max_width / (longest + 1)).max(1),
        };
        let max_height = style
            .height_limit()
            .min(anchor.line.max(dimensions.line - anchor.line - 1));
        let height = match style {
            MenuStyle::Search => 1,
            _ => max_height.min(div_round_up(item_count, columns)),
        };
        let max_len = if columns > 1 && item_count > 1 {
            max_width / columns - 1
        } else {
            max_width
        };

        self.columns = columns as usize;
        self.items = items;
        for item in &mut self.items {
            item.trim(0, max_len);
        }

        let mut anchor = anchor;
        if style == MenuStyle::Inline {
            anchor.line += layout.content_line_offset();
        }

        let mut line = anchor.line + 1;
        let mut column = anchor.column.min(dimensions.column - longest - 1).max(0);
        match style {
            MenuStyle::Search => {
                line = layout.status_line();
                column = dimensions.column / 2;
            },
            MenuStyle::Prompt => {
                line = if layout.status_on_top {
                    1
                } else {
                    dimensions.line - height
                };
            },
            MenuStyle::Inline => {
                if line + height > dimensions.line {
                    line = anchor.line - height;
                }
            },
        }

        let width = match style {
            MenuStyle::Search => dimensions.column - dimensions.column / 2,
            MenuStyle::Inline => (longest + 1).min(dimensions.column),
            MenuStyle::Prompt => dimensions.column,
        };

        self.window
            .create(DisplayCoord::new(line, column), DisplayCoord::new(height, width));
        debug!(
            ?style,
            items = self.items.len(),
            pos = ?self.window.pos(),
            size = ?self.window.size(),
            "menu shown"
        );
        self.draw();
    }

    /// Lay the current items out again, e.g. after a resize. The
    /// selection is cleared.
    pub fn reshow(&mut self, layout: &ScreenLayout) {
        let items = std::mem::take(&mut self.items);
        self.show(items, self.anchor, self.fg, self.bg, self.style, layout);
    }

    /// Select an item, or clear the selection with `None` or an index out
    /// of range, scrolling as needed to keep it visible
    pub fn select(&mut self, selected: Option<usize>) {
        let item_count = self.items.len();
        match selected.filter(|&index| index < item_count) {
            None => {
                self.selected = None;
                self.first_item = 0;
            },
            Some(index) if self.columns == 0 => {
                self.selected = Some(index);
                let widths: Vec<i32> = self.items.iter().map(DisplayLine::length).collect();
                let width = self.window.size().column - 3;
                self.first_item = single_row_first_item(&widths, index, width);
            },
            Some(index) => {
                self.selected = Some(index);
                let lines = self.window.size().line.max(0) as usize;
                self.first_item =
                    grid_first_item(self.first_item, index, item_count, lines, self.columns);
            },
        }
        self.draw();
    }

    /// Forget the items and take the menu off screen
    pub fn hide(&mut self) {
        self.items.clear();
        self.window.destroy();
    }

    /// Drop the window but keep the items, so the menu can be shown again
    /// after a resize
    pub fn destroy(&mut self) {
        self.window.destroy();
    }

    fn face_for(&self, index: usize) -> Face {
        if self.selected == Some(index) {
            self.fg
        } else {
            self.bg
        }
    }

    /// Render the items into the window
    pub fn draw(&mut self) {
        if !self.window.is_active() {
            return;
        }
        if self.columns == 0 {
            self.draw_single_row();
        } else {
            self.draw_grid();
        }
    }

    fn draw_single_row(&mut self) {
        let item_count = self.items.len();
        let win_width = self.window.size().column - 4;
        let bg = self.bg;

        self.window.move_cursor(DisplayCoord::new(0, 0));
        let lead = if self.first_item > 0 { "< " } else { "  " };
        self.window.draw(&[DisplayAtom::plain(lead)], bg);

        let mut pos = 0;
        let mut i = self.first_item;
        while i < item_count && pos < win_width {
            let face = self.face_for(i);
            let item_width = self.items[i].length();
            self.window.draw(self.items[i].atoms(), face);
            if pos + item_width < win_width {
                self.window.draw(&[DisplayAtom::plain(" ")], bg);
            } else {
                self.window.move_cursor(DisplayCoord::new(0, win_width + 2));
                self.window.draw(&[DisplayAtom::plain("…")], bg);
            }
            pos += item_width + 1;
            i += 1;
        }

        self.window.move_cursor(DisplayCoord::new(0, win_width + 3));
        let tail = if i == item_count { " " } else { ">" };
        self.window.draw(&[DisplayAtom::plain(tail)], bg);
    }

    fn draw_grid(&mut self) {
        let item_count = self.items.len() as i32;
        let columns = self.columns as i32;
        let size = self.window.size();
        let win_height = size.line;
        let menu_lines = div_round_up(item_count, columns);
        let column_width = (size.column - 1) / columns;
        let menu_cols = div_round_up(item_count, win_height);
        let first_col = self.first_item as i32 / win_height;
        let (mark_line, mark_height) =
            scrollbar(win_height, menu_lines, first_col, menu_cols, columns);
        let bg = self.bg;

        for line in 0..win_height {
            for col in 0..columns {
                self.window
                    .move_cursor(DisplayCoord::new(line, col * column_width));
                let index = ((first_col + col) * win_height + line) as usize;
                let face = self.face_for(index);
                match self.items.get(index) {
                    Some(item) => {
                        let atoms = item.atoms().to_vec();
                        self.window.draw(&atoms, face);
                    },
                    None => self.window.draw(&[], face),
                }
            }
            let is_mark = line >= mark_line && line < mark_line + mark_height;
            self.window
                .move_cursor(DisplayCoord::new(line, size.column - 1));
            let mark = if is_mark { "█" } else { "░" };
            self.window.draw(&[DisplayAtom::plain(mark)], bg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    fn layout(lines: i32, columns: i32) -> ScreenLayout {
        ScreenLayout::new(DisplayCoord::new(lines, columns), false)
    }

    fn items(texts: &[&str]) -> Vec<DisplayLine> {
        texts.iter().map(|text| DisplayLine::from(*text)).collect()
    }

    fn numbered(count: usize) -> Vec<DisplayLine> {
        (0..count)
            .map(|i| DisplayLine::from(format!("item{:03}", i).as_str()))
            .collect()
    }

    fn faces() -> (Face, Face) {
        (
            Face::new(Color::BLACK, Color::CYAN),
            Face::new(Color::WHITE, Color::BLUE),
        )
    }

    #[test]
    fn test_div_round_up() {
        assert_eq!(div_round_up(23, 4), 6);
        assert_eq!(div_round_up(24, 4), 6);
        assert_eq!(div_round_up(1, 4), 1);
        assert_eq!(div_round_up(0, 4), 0);
    }

    #[test]
    fn test_grid_paging_keeps_selection_visible() {
        // 23 items in rows of 5: five item columns, four visible
        assert_eq!(grid_first_item(0, 22, 23, 5, 4), 5);
        assert_eq!(grid_first_item(5, 3, 23, 5, 4), 0);
        assert_eq!(grid_first_item(0, 12, 23, 5, 4), 0);
    }

    #[test]
    fn test_single_row_scrolls() {
        let widths = [5, 5, 5, 5];
        assert_eq!(single_row_first_item(&widths, 0, 12), 0);
        assert_eq!(single_row_first_item(&widths, 1, 12), 0);
        assert_eq!(single_row_first_item(&widths, 2, 12), 2);
        assert_eq!(single_row_first_item(&widths, 3, 12), 2);
    }

    #[test]
    fn test_scrollbar() {
        assert_eq!(scrollbar(5, 5, 0, 1, 1), (0, 5));
        assert_eq!(scrollbar(5, 20, 0, 4, 1), (0, 2));
        assert_eq!(scrollbar(5, 20, 3, 4, 1), (3, 2));
    }

    #[test]
    fn test_empty_menu_is_not_shown() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(Vec::new(), DisplayCoord::default(), fg, bg, MenuStyle::Inline, &layout(23, 80));
        assert!(!menu.is_active());
    }

    #[test]
    fn test_inline_below_anchor() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(
            items(&["foo", "barbaz"]),
            DisplayCoord::new(3, 10),
            fg,
            bg,
            MenuStyle::Inline,
            &layout(23, 80),
        );
        assert_eq!(menu.window().pos(), DisplayCoord::new(4, 10));
        assert_eq!(menu.window().size(), DisplayCoord::new(2, 7));
        assert_eq!(menu.columns(), 1);
        let snapshot = menu.window().snapshot();
        assert_eq!(snapshot.to_text(), "foo   █\nbarbaz█\n");
    }

    #[test]
    fn test_inline_flips_above_near_bottom() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(
            numbered(4),
            DisplayCoord::new(21, 0),
            fg,
            bg,
            MenuStyle::Inline,
            &layout(23, 80),
        );
        assert_eq!(menu.window().pos(), DisplayCoord::new(17, 0));
    }

    #[test]
    fn test_selection_face() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(
            items(&["a", "b"]),
            DisplayCoord::new(0, 0),
            fg,
            bg,
            MenuStyle::Inline,
            &layout(23, 80),
        );
        menu.select(Some(1));
        assert_eq!(menu.selected(), Some(1));
        let lines = menu.window().lines();
        assert_eq!(lines[1].atoms()[0].face, fg);
        assert_eq!(lines[0].atoms()[0].face, bg);

        menu.select(Some(7));
        assert_eq!(menu.selected(), None);
    }

    #[test]
    fn test_prompt_grid_pages() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        // Items are 7 wide: 79 / 8 gives 9 columns of width 8
        menu.show(
            numbered(150),
            DisplayCoord::new(22, 0),
            fg,
            bg,
            MenuStyle::Prompt,
            &layout(23, 80),
        );
        assert_eq!(menu.columns(), 9);
        assert_eq!(menu.window().size(), DisplayCoord::new(10, 80));
        assert_eq!(menu.window().pos(), DisplayCoord::new(13, 0));

        menu.select(Some(145));
        assert_eq!(menu.first_item(), 60);
        let text = menu.window().snapshot().to_text();
        assert!(text.contains("item145"));
        assert!(!text.contains("item005"));
        for line in menu.window().lines() {
            assert_eq!(line.length(), 80);
        }
    }

    #[test]
    fn test_search_row() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(
            items(&["alpha", "beta", "gamma", "delta"]),
            DisplayCoord::default(),
            fg,
            bg,
            MenuStyle::Search,
            &layout(23, 40),
        );
        assert_eq!(menu.window().pos(), DisplayCoord::new(23, 20));
        assert_eq!(menu.window().size(), DisplayCoord::new(1, 20));
        let text = menu.window().snapshot().to_text();
        assert!(text.starts_with("  alpha beta "));
        assert!(text.ends_with(">\n"));

        menu.select(Some(3));
        assert_eq!(menu.first_item(), 3);
        let text = menu.window().snapshot().to_text();
        assert!(text.starts_with("< delta"));
        assert_eq!(menu.window().lines()[0].length(), 20);
    }

    #[test]
    fn test_hide_forgets_items() {
        let (fg, bg) = faces();
        let mut menu = Menu::new();
        menu.show(items(&["a"]), DisplayCoord::default(), fg, bg, MenuStyle::Inline, &layout(23, 80));
        menu.destroy();
        assert!(!menu.is_active());
        assert_eq!(menu.items().len(), 1);
        menu.hide();
        assert!(menu.items().is_empty());
    }
}
