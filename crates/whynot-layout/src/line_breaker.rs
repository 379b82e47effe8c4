//! Greedy line breaking over measured inline units.
//!
//! Units are placed left to right on a shared baseline. Between two units
//! the pen moves by the wider of their two space widths (plus the owning
//! block's extra spacing). A line ends right before the first unit whose
//! ink would cross the width threshold. The first unit of a line is always
//! kept, so a unit wider than the threshold gets a line of its own instead
//! of stalling the loop.
//!
//! [`LineCursor`] holds the placement rules. The breaker and
//! [`LineBox`](crate::LineBox) both drive it, so a line measured during
//! breaking has exactly the bounds it has when drawn.

use crate::geometry::{Point, Rect};
use crate::inline::MeasuredInline;

/// Running placement state for one line.
#[derive(Debug, Clone)]
pub(crate) struct LineCursor {
    bounds: Rect,
    advance: i32,
    prev_space: i32,
    spacing: i32,
}

/// Where the next unit would land if it were added to the line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    /// Pen position of the unit relative to the line's start.
    pub pen_x: i32,
    /// Line bounds including the unit.
    pub bounds: Rect,
}

impl LineCursor {
    /// Start a line with `first`, returning the cursor and the first unit's
    /// pen position.
    ///
    /// Ink that overshoots left of the pen is pulled back to zero: the pen
    /// moves right by the overshoot and so does everything after it.
    pub(crate) fn start(first: &MeasuredInline, spacing: i32) -> (Self, i32) {
        let mut bounds = first.bounds;
        let mut advance = first.advance;
        let mut pen_x = 0;
        let left = bounds.min.x;
        if left < 0 {
            bounds = bounds.translate(Point::new(-left, 0));
            advance -= left;
            pen_x = -left;
        }
        let cursor = Self {
            bounds,
            advance,
            prev_space: first.space_width,
            spacing,
        };
        (cursor, pen_x)
    }

    /// Where `unit` would go, without committing it.
    pub(crate) fn place(&self, unit: &MeasuredInline) -> Placement {
        let gap = self.prev_space.max(unit.space_width) + self.spacing;
        let pen_x = self.advance + gap;
        Placement {
            pen_x,
            bounds: self
                .bounds
                .union(&unit.bounds.translate(Point::new(pen_x, 0))),
        }
    }

    /// Add `unit` to the line at a placement computed by [`Self::place`].
    pub(crate) fn commit(&mut self, unit: &MeasuredInline, placement: Placement) {
        self.bounds = placement.bounds;
        self.advance = placement.pen_x + unit.advance;
        self.prev_space = unit.space_width;
    }

    /// Bounds of the units committed so far, relative to the line's pen
    /// origin on the baseline.
    pub(crate) const fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Split off the first line of `units`.
///
/// Returns how many leading units fit within `max_width` and the bounds of
/// that line (relative to its baseline origin, so `min.y` is negative).
/// `spacing` is added to every inter-unit gap.
///
/// * Empty input yields `(0, Rect::EMPTY)`.
/// * Non-empty input always yields at least one unit, even when that unit
///   alone is wider than `max_width`.
/// * Overflow is only checked between units; words are never split.
#[must_use]
pub fn split_line(units: &[MeasuredInline], max_width: i32, spacing: i32) -> (usize, Rect) {
    let Some((first, rest)) = units.split_first() else {
        return (0, Rect::EMPTY);
    };
    let (mut cursor, _) = LineCursor::start(first, spacing);
    for (i, unit) in rest.iter().enumerate() {
        let placement = cursor.place(unit);
        if placement.bounds.max.x > max_width {
            #[cfg(feature = "layout-trace")]
            eprintln!(
                "[LINE BREAK] kept={} overflow_right={} max_width={max_width}",
                i + 1,
                placement.bounds.max.x
            );
            return (i + 1, cursor.bounds());
        }
        cursor.commit(unit, placement);
    }
    (units.len(), cursor.bounds())
}

/// Split all of `units` into consecutive lines.
///
/// Returns `(count, bounds)` per line, in order; the counts add up to
/// `units.len()`.
#[must_use]
pub fn break_lines(units: &[MeasuredInline], max_width: i32, spacing: i32) -> Vec<(usize, Rect)> {
    let mut lines = Vec::new();
    let mut rest = units;
    while !rest.is_empty() {
        let (count, bounds) = split_line(rest, max_width, spacing);
        lines.push((count, bounds));
        rest = &rest[count..];
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::MeasuredContent;
    use std::rc::Rc;
    use whynot_common::image::LoadedImage;

    fn word(width: i32, space: i32) -> MeasuredInline {
        MeasuredInline {
            bounds: Rect::new(0, -8, width, 2),
            advance: width,
            space_width: space,
            content: MeasuredContent::Image(Rc::new(LoadedImage::transparent(0, 0))),
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(split_line(&[], 100, 0), (0, Rect::EMPTY));
        assert!(break_lines(&[], 100, 0).is_empty());
    }

    #[test]
    fn test_three_words_wrap_after_two() {
        let units = [word(40, 10), word(40, 10), word(40, 10)];
        let (count, bounds) = split_line(&units, 100, 0);
        assert_eq!(count, 2);
        assert_eq!(bounds, Rect::new(0, -8, 90, 2));

        let lines = break_lines(&units, 100, 0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], (1, Rect::new(0, -8, 40, 2)));
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let units = [word(45, 10), word(45, 10)];
        assert_eq!(split_line(&units, 100, 0).0, 2);
        assert_eq!(split_line(&units, 99, 0).0, 1);
    }

    #[test]
    fn test_oversized_first_unit_gets_own_line() {
        let units = [word(250, 10), word(10, 10)];
        let (count, bounds) = split_line(&units, 100, 0);
        assert_eq!(count, 1);
        assert_eq!(bounds.max.x, 250);
    }

    #[test]
    fn test_gap_is_wider_space_plus_spacing() {
        let units = [word(10, 4), word(10, 12)];
        let (_, bounds) = split_line(&units, 1000, 0);
        assert_eq!(bounds.max.x, 10 + 12 + 10);
        let (_, bounds) = split_line(&units, 1000, 3);
        assert_eq!(bounds.max.x, 10 + 12 + 3 + 10);
    }

    #[test]
    fn test_left_overshoot_is_normalized() {
        let mut first = word(20, 5);
        first.bounds = Rect::new(-3, -8, 17, 2);
        let units = [first, word(10, 5)];
        let (cursor, pen_x) = LineCursor::start(&units[0], 0);
        assert_eq!(pen_x, 3);
        assert_eq!(cursor.bounds().min.x, 0);
        let (_, bounds) = split_line(&units, 1000, 0);
        // 20 advance + 3 overshoot + 5 gap + 10 wide
        assert_eq!(bounds, Rect::new(0, -8, 38, 2));
    }
}
