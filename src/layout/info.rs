//! Info boxes
//!
//! Shaping turns a title and message into lines of text (optionally framed
//! and accompanied by assistant art); placement picks where the box goes
//! for each [`InfoStyle`]. A box that does not fit is simply not shown.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::geometry::compute_pos;
use super::ScreenLayout;
use crate::core::{
    column_length, split_at_column, DisplayAtom, DisplayCoord, Face, Rect, Window,
};

/// How an info box is placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfoStyle {
    /// Framed bubble with assistant art, next to the status line
    #[default]
    Prompt,
    /// Framed box centred on the content area
    Modal,
    /// Plain box beside the menu
    MenuDoc,
    /// Plain box below the anchor, above when it does not fit
    Inline,
    /// Plain box above the anchor when there is room
    InlineAbove,
    /// Plain box below the anchor
    InlineBelow,
}

/// Shaped info box content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoBox {
    pub size: DisplayCoord,
    pub contents: Vec<String>,
}

/// Word-wrap `text` to lines at most `max_width` columns wide.
///
/// Line breaks in the text are kept. Words longer than a line are split.
/// Trailing blanks are dropped at wrap points, as are leading blanks of
/// continuation lines.
pub fn wrap_lines(text: &str, max_width: i32) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut width = 0;
        let mut wrapped = false;

        for token in tokens(paragraph) {
            let blank = token.starts_with(char::is_whitespace);
            let token_width = column_length(token);
            if blank && width == 0 && wrapped {
                continue;
            }
            if width + token_width <= max_width {
                line.push_str(token);
                width += token_width;
                continue;
            }

            if width > 0 {
                lines.push(line.trim_end().to_string());
                line.clear();
                width = 0;
            }
            wrapped = true;
            if blank {
                continue;
            }

            let mut rest = token;
            while column_length(rest) > max_width {
                let (mut idx, _) = split_at_column(rest, max_width);
                if idx == 0 {
                    idx = rest.chars().next().map_or(rest.len(), char::len_utf8);
                }
                lines.push(rest[..idx].to_string());
                rest = &rest[idx..];
            }
            line.push_str(rest);
            width = column_length(rest);
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Split into alternating runs of blank and non-blank characters
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let blank = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != blank)
            .map_or(rest.len(), |(idx, _)| idx);
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some(token)
    })
}

/// Frame `message` in a rounded border with `title` cut into the top edge,
/// with `assistant` art to the left, vertically centred.
///
/// Returns an empty box when `max_width` leaves less than four columns
/// for the bubble text.
pub fn make_info_box(
    title: &str,
    message: &str,
    max_width: i32,
    assistant: &[&str],
) -> InfoBox {
    let assistant_size = match assistant.first() {
        Some(first) => DisplayCoord::new(assistant.len() as i32, column_length(first)),
        None => DisplayCoord::default(),
    };

    let max_bubble_width = max_width - assistant_size.column - 6;
    if max_bubble_width < 4 {
        return InfoBox::default();
    }

    let lines = wrap_lines(message, max_bubble_width);
    let title_width = column_length(title);
    let bubble_width = lines
        .iter()
        .map(|line| column_length(line))
        .fold(title_width + 2, i32::max);

    let text_lines = lines.len() as i32;
    let line_count = (assistant_size.line - 1).max(text_lines + 2);
    let assistant_top_margin = (line_count - assistant_size.line + 1) / 2;
    let dashes = |count: i32| "─".repeat(count.max(0) as usize);

    let mut contents = Vec::with_capacity(line_count as usize);
    for i in 0..line_count {
        let mut line = String::new();
        if let Some(last) = assistant.last() {
            if i >= assistant_top_margin {
                let index = (i - assistant_top_margin).min(assistant_size.line - 1);
                line.push_str(assistant[index as usize]);
            } else {
                line.push_str(last);
            }
        }

        if i == 0 {
            if title.is_empty() {
                line.push_str(&format!("╭─{}─╮", dashes(bubble_width)));
            } else {
                let dash_count = bubble_width - title_width - 2;
                let left = dashes(dash_count / 2);
                let right = dashes(dash_count - dash_count / 2);
                line.push_str(&format!("╭─{}┤{}├{}─╮", left, title, right));
            }
        } else if i < text_lines + 1 {
            let text = &lines[(i - 1) as usize];
            let padding = bubble_width - column_length(text);
            line.push_str(&format!("│ {}{} │", text, " ".repeat(padding as usize)));
        } else if i == text_lines + 1 {
            line.push_str(&format!("╰─{}─╯", dashes(bubble_width)));
        }
        contents.push(line);
    }

    InfoBox {
        size: DisplayCoord::new(line_count, bubble_width + assistant_size.column + 4),
        contents,
    }
}

/// Unframed box: the wrapped text as is
pub fn make_simple_info_box(contents: &str, max_width: i32) -> InfoBox {
    let mut info_box = InfoBox::default();
    for line in wrap_lines(contents, max_width) {
        info_box.size.line += 1;
        info_box.size.column = info_box.size.column.max(column_length(&line));
        info_box.contents.push(line);
    }
    info_box
}

/// The info box overlay: its last request and the window showing it
#[derive(Debug, Clone, Default)]
pub struct Info {
    pub title: String,
    pub content: String,
    pub anchor: DisplayCoord,
    pub face: Face,
    pub style: InfoStyle,
    window: Window,
}

impl Info {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shown on screen
    pub fn is_active(&self) -> bool {
        self.window.is_active()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn hide(&mut self) {
        self.window.destroy();
    }

    /// Record the request and lay the box out.
    ///
    /// `menu` is the area of the visible menu (empty when hidden). Returns
    /// whether the box was placed; when it does not fit nothing is shown.
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        title: &str,
        content: &str,
        anchor: DisplayCoord,
        face: Face,
        style: InfoStyle,
        layout: &ScreenLayout,
        menu: Rect,
        assistant: &[&str],
    ) -> bool {
        self.window.destroy();
        self.title = title.to_string();
        self.content = content.to_string();
        self.anchor = anchor;
        self.face = face;
        self.style = style;
        self.layout(layout, menu, assistant)
    }

    /// Lay out the recorded request again, e.g. after a resize or when
    /// the menu appeared or went away
    pub fn reshow(&mut self, layout: &ScreenLayout, menu: Rect, assistant: &[&str]) -> bool {
        self.window.destroy();
        self.layout(layout, menu, assistant)
    }

    fn layout(&mut self, layout: &ScreenLayout, menu: Rect, assistant: &[&str]) -> bool {
        let dimensions = layout.dimensions;
        let offset = layout.content_line_offset();
        let rect = layout.content_rect();

        let (pos, info_box) = match self.style {
            InfoStyle::Prompt => {
                let info_box =
                    make_info_box(&self.title, &self.content, dimensions.column, assistant);
                let anchor = DisplayCoord::new(layout.status_line(), dimensions.column - 1);
                (compute_pos(anchor, info_box.size, rect, menu, false), info_box)
            },
            InfoStyle::Modal => {
                let info_box = make_info_box(&self.title, &self.content, dimensions.column, &[]);
                (rect.pos + rect.size.half() - info_box.size.half(), info_box)
            },
            InfoStyle::MenuDoc => {
                if menu.is_empty() {
                    return false;
                }
                let menu_end = menu.end();
                let right_max_width = dimensions.column - menu_end.column;
                let left_max_width = menu.pos.column;
                let max_width = right_max_width.max(left_max_width);
                if max_width < 4 {
                    return false;
                }

                let info_box = make_simple_info_box(&self.content, max_width);
                let column = if info_box.size.column <= right_max_width
                    || right_max_width >= left_max_width
                {
                    menu_end.column
                } else {
                    menu.pos.column - info_box.size.column
                };
                (DisplayCoord::new(menu.pos.line, column), info_box)
            },
            InfoStyle::Inline | InfoStyle::InlineAbove | InfoStyle::InlineBelow => {
                let max_width = dimensions.column - self.anchor.column;
                if max_width < 4 {
                    return false;
                }
                let info_box = make_simple_info_box(&self.content, max_width);
                // Placement happens in buffer coordinates
                let buffer = Rect::new(DisplayCoord::default(), dimensions);
                let avoid = if menu.is_empty() {
                    menu
                } else {
                    Rect::new(menu.pos - DisplayCoord::line(offset), menu.size)
                };
                let prefer_above = self.style == InfoStyle::InlineAbove;
                let pos = compute_pos(self.anchor, info_box.size, buffer, avoid, prefer_above);
                (pos + DisplayCoord::line(offset), info_box)
            },
        };

        if !rect.contains_box(pos, info_box.size) {
            debug!(?pos, size = ?info_box.size, style = ?self.style, "info box does not fit");
            return false;
        }

        self.window.create(pos, info_box.size);
        for (line, text) in info_box.contents.iter().enumerate() {
            self.window.move_cursor(DisplayCoord::line(line as i32));
            self.window.draw(&[DisplayAtom::plain(text.as_str())], self.face);
        }
        debug!(?pos, size = ?info_box.size, style = ?self.style, "info box placed");
        self.window.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Assistant;

    fn layout(lines: i32, columns: i32) -> ScreenLayout {
        ScreenLayout::new(DisplayCoord::new(lines, columns), false)
    }

    #[test]
    fn test_wrap_lines_words() {
        assert_eq!(wrap_lines("hello world foo", 11), vec!["hello world", "foo"]);
        assert_eq!(wrap_lines("hello world", 7), vec!["hello", "world"]);
    }

    #[test]
    fn test_wrap_lines_keeps_breaks() {
        assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_lines_splits_long_words() {
        assert_eq!(wrap_lines("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_lines("中文字", 3), vec!["中", "文", "字"]);
    }

    #[test]
    fn test_wrap_lines_respects_width() {
        let text = "the quick brown fox jumps over the lazy dog";
        for width in 1..20 {
            for line in wrap_lines(text, width) {
                assert!(column_length(&line) <= width);
            }
        }
    }

    #[test]
    fn test_info_box_frame() {
        let info_box = make_info_box("", "hi", 40, &[]);
        assert_eq!(info_box.size, DisplayCoord::new(3, 6));
        assert_eq!(info_box.contents, vec!["╭────╮", "│ hi │", "╰────╯"]);
    }

    #[test]
    fn test_info_box_title() {
        let info_box = make_info_box("t", "hello", 40, &[]);
        assert_eq!(info_box.contents[0], "╭──┤t├──╮");
        for line in &info_box.contents {
            assert_eq!(column_length(line), info_box.size.column);
        }
    }

    #[test]
    fn test_info_box_with_assistant() {
        let art = Assistant::Clippy.art();
        let info_box = make_info_box("", "hi", 80, art);
        assert_eq!(info_box.size, DisplayCoord::new(7, 6 + 8));
        assert!(info_box.contents[0].starts_with(art[0]));
        assert_eq!(info_box.contents[1], format!("{}│ hi │", art[1]));
        assert_eq!(info_box.contents[6], art[6]);
    }

    #[test]
    fn test_info_box_too_narrow() {
        assert_eq!(make_info_box("", "hi", 9, &[]), InfoBox::default());
    }

    #[test]
    fn test_simple_info_box() {
        let info_box = make_simple_info_box("one\nthree", 20);
        assert_eq!(info_box.size, DisplayCoord::new(2, 5));
    }

    #[test]
    fn test_modal_is_centred() {
        let mut info = Info::new();
        let placed = info.show(
            "",
            "hi",
            DisplayCoord::default(),
            Face::default(),
            InfoStyle::Modal,
            &layout(23, 80),
            Rect::default(),
            &[],
        );
        assert!(placed);
        assert_eq!(info.window().pos(), DisplayCoord::new(10, 37));
    }

    #[test]
    fn test_prompt_sits_above_status_line() {
        let mut info = Info::new();
        info.show(
            "",
            "hi",
            DisplayCoord::default(),
            Face::default(),
            InfoStyle::Prompt,
            &layout(23, 80),
            Rect::default(),
            Assistant::None.art(),
        );
        let window = info.window();
        assert_eq!(window.pos(), DisplayCoord::new(20, 74));
        assert_eq!(window.size(), DisplayCoord::new(3, 6));
    }

    #[test]
    fn test_inline_too_large_is_suppressed() {
        let mut info = Info::new();
        let text = "word ".repeat(200);
        let placed = info.show(
            "",
            &text,
            DisplayCoord::new(2, 70),
            Face::default(),
            InfoStyle::Inline,
            &layout(10, 80),
            Rect::default(),
            &[],
        );
        assert!(!placed);
        assert!(!info.is_active());
    }

    #[test]
    fn test_inline_offset_by_top_status() {
        let mut info = Info::new();
        let screen = ScreenLayout::new(DisplayCoord::new(23, 80), true);
        info.show(
            "",
            "doc",
            DisplayCoord::new(4, 10),
            Face::default(),
            InfoStyle::Inline,
            &screen,
            Rect::default(),
            &[],
        );
        assert_eq!(info.window().pos(), DisplayCoord::new(6, 10));
    }

    #[test]
    fn test_menu_doc_needs_menu() {
        let mut info = Info::new();
        let screen = layout(23, 80);
        let shown = info.show(
            "",
            "doc",
            DisplayCoord::default(),
            Face::default(),
            InfoStyle::MenuDoc,
            &screen,
            Rect::default(),
            &[],
        );
        assert!(!shown);

        let menu = Rect::new(DisplayCoord::new(5, 10), DisplayCoord::new(4, 20));
        assert!(info.reshow(&screen, menu, &[]));
        assert_eq!(info.window().pos(), DisplayCoord::new(5, 30));
    }
}
