//! Overlay placement

use crate::core::{DisplayCoord, Rect};

/// Whether two rectangles share at least one cell
pub fn overlaps(a: Rect, b: Rect) -> bool {
    let (a_end, b_end) = (a.end(), b.end());
    a.pos.line < b_end.line
        && b.pos.line < a_end.line
        && a.pos.column < b_end.column
        && b.pos.column < a_end.column
}

/// Position a box of `size` next to `anchor` inside `rect`.
///
/// The box goes on the line below the anchor, or above it when it would
/// overflow the bottom (or first, with `prefer_above`, when that fits).
/// It is then pulled left to stay inside the rectangle. If it overlaps
/// `to_avoid` (ignored when empty) it moves above both the anchor and
/// the avoided box, or below them when above would go negative.
///
/// The result is not guaranteed to fit: callers check it with
/// [`Rect::contains_box`] and skip drawing when it does not.
pub fn compute_pos(
    anchor: DisplayCoord,
    size: DisplayCoord,
    rect: Rect,
    to_avoid: Rect,
    prefer_above: bool,
) -> DisplayCoord {
    let rect_end = rect.end();
    let mut pos = DisplayCoord::default();

    let mut above = prefer_above;
    if above {
        pos = anchor - DisplayCoord::line(size.line);
        if pos.line < 0 {
            above = false;
        }
    }
    if !above {
        pos = anchor + DisplayCoord::line(1);
        if pos.line + size.line > rect_end.line {
            pos.line = rect.pos.line.max(anchor.line - size.line);
        }
    }
    if pos.column + size.column > rect_end.column {
        pos.column = rect.pos.column.max(rect_end.column - size.column);
    }

    if !to_avoid.is_empty() && overlaps(Rect::new(pos, size), to_avoid) {
        let avoid_end = to_avoid.end();
        pos.line = to_avoid.pos.line.min(anchor.line) - size.line;
        if pos.line < 0 {
            pos.line = avoid_end.line.max(anchor.line);
        }
    }

    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect(line: i32, column: i32, lines: i32, columns: i32) -> Rect {
        Rect::new(DisplayCoord::new(line, column), DisplayCoord::new(lines, columns))
    }

    #[test]
    fn test_below_anchor_by_default() {
        let pos = compute_pos(
            DisplayCoord::new(3, 5),
            DisplayCoord::new(4, 10),
            rect(0, 0, 24, 80),
            Rect::default(),
            false,
        );
        assert_eq!(pos, DisplayCoord::new(4, 5));
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let pos = compute_pos(
            DisplayCoord::new(20, 5),
            DisplayCoord::new(6, 10),
            rect(0, 0, 24, 80),
            Rect::default(),
            false,
        );
        assert_eq!(pos, DisplayCoord::new(14, 5));
    }

    #[test]
    fn test_clamped_when_neither_side_fits() {
        let area = rect(1, 0, 10, 80);
        let size = DisplayCoord::new(12, 10);
        let pos = compute_pos(DisplayCoord::new(5, 0), size, area, Rect::default(), false);
        assert_eq!(pos.line, 1);
        assert!(!area.contains_box(pos, size));
    }

    #[test]
    fn test_prefer_above() {
        let area = rect(0, 0, 24, 80);
        let size = DisplayCoord::new(3, 10);
        let pos = compute_pos(DisplayCoord::new(10, 5), size, area, Rect::default(), true);
        assert_eq!(pos, DisplayCoord::new(7, 5));
        // Not enough room above: falls back below
        let pos = compute_pos(DisplayCoord::new(1, 5), size, area, Rect::default(), true);
        assert_eq!(pos, DisplayCoord::new(2, 5));
    }

    #[test]
    fn test_pulled_left_at_right_edge() {
        let pos = compute_pos(
            DisplayCoord::new(0, 75),
            DisplayCoord::new(2, 10),
            rect(0, 0, 24, 80),
            Rect::default(),
            false,
        );
        assert_eq!(pos, DisplayCoord::new(1, 70));
    }

    #[test]
    fn test_avoids_menu() {
        let menu = rect(6, 0, 5, 20);
        let pos = compute_pos(
            DisplayCoord::new(5, 2),
            DisplayCoord::new(3, 10),
            rect(0, 0, 24, 80),
            menu,
            false,
        );
        assert_eq!(pos, DisplayCoord::new(2, 2));

        // No room above: goes below the menu
        let menu = rect(2, 0, 5, 20);
        let pos = compute_pos(
            DisplayCoord::new(1, 2),
            DisplayCoord::new(3, 10),
            rect(0, 0, 24, 80),
            menu,
            false,
        );
        assert_eq!(pos, DisplayCoord::new(7, 2));
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps(rect(0, 0, 2, 2), rect(1, 1, 2, 2)));
        assert!(!overlaps(rect(0, 0, 2, 2), rect(2, 0, 2, 2)));
        assert!(!overlaps(rect(0, 0, 2, 2), rect(0, 2, 2, 2)));
    }

    proptest! {
        #[test]
        fn prop_fitting_result_stays_in_rect(
            anchor_line in 0i32..30,
            anchor_column in 0i32..100,
            lines in 1i32..30,
            columns in 1i32..100,
        ) {
            let area = rect(0, 0, 24, 80);
            let size = DisplayCoord::new(lines, columns);
            let pos = compute_pos(
                DisplayCoord::new(anchor_line, anchor_column),
                size,
                area,
                Rect::default(),
                false,
            );
            prop_assert!(pos.line >= 0);
            if size.line <= 24 && size.column <= 80 && anchor_line < 24 {
                prop_assert!(area.contains_box(pos, size));
            }
        }
    }
}
