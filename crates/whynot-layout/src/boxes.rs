//! The box tree: positioned, drawable layout output.
//!
//! Every box is anchored at its own origin: `bounds()` starts at `(0, 0)`
//! and `draw(canvas, origin)` paints it with that corner at `origin`. Boxes
//! are immutable and rebuilt on every layout pass, so each one computes its
//! bounds once at construction.
//!
//! ```text
//! Stack ─┬─ Line     "Lorem ipsum dolor"
//!        ├─ Line     "sit amet"
//!        ├─ Empty    (collapsed margin)
//!        └─ Container (offset by left margin)
//!             └─ Stack ─ Line "- item"
//! ```

use crate::display_list::Canvas;
use crate::geometry::{Point, Rect};
use crate::inline::MeasuredInline;
use crate::line_breaker::LineCursor;
use std::fmt::Write as _;

/// A node of the box tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutBox {
    /// One line of inline units on a shared baseline.
    Line(LineBox),
    /// Children stacked vertically.
    Stack(StackBox),
    /// Blank space.
    Empty(EmptyBox),
    /// A child drawn at a fixed offset inside reserved bounds.
    Container(ContainerBox),
}

impl LayoutBox {
    /// Bounds of the box, anchored at the origin.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        match self {
            Self::Line(b) => b.bounds,
            Self::Stack(b) => b.bounds,
            Self::Empty(b) => b.bounds,
            Self::Container(b) => b.bounds,
        }
    }

    /// Paint the box with its top-left corner at `origin`.
    pub fn draw(&self, canvas: &mut dyn Canvas, origin: Point) {
        match self {
            Self::Line(b) => b.draw(canvas, origin),
            Self::Stack(b) => b.draw(canvas, origin),
            Self::Empty(_) => {}
            Self::Container(b) => b.draw(canvas, origin),
        }
    }

    /// Indented text dump of the tree, one box per line.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(&mut out, 0);
        out
    }

    fn describe_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let b = self.bounds();
        let size = format!("{}x{}", b.width(), b.height());
        match self {
            Self::Line(line) => {
                let words: Vec<&str> = line
                    .units
                    .iter()
                    .map(|unit| unit.text().unwrap_or("[image]"))
                    .collect();
                let _ = writeln!(out, "{indent}Line {size} {:?}", words.join(" "));
            }
            Self::Stack(stack) => {
                let _ = writeln!(out, "{indent}Stack {size}");
                for child in &stack.children {
                    child.describe_into(out, depth + 1);
                }
            }
            Self::Empty(_) => {
                let _ = writeln!(out, "{indent}Empty {size}");
            }
            Self::Container(container) => {
                let _ = writeln!(
                    out,
                    "{indent}Container {size} at ({}, {})",
                    container.offset.x, container.offset.y
                );
                container.inner.describe_into(out, depth + 1);
            }
        }
    }
}

/// A horizontal run of inline units sharing one baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    units: Vec<MeasuredInline>,
    /// Pen position of each unit, relative to the line's left edge.
    pens: Vec<i32>,
    /// Distance from the top of the line to its baseline.
    baseline: i32,
    bounds: Rect,
}

impl LineBox {
    /// Place `units` on one line, `spacing` extra pixels apart.
    ///
    /// No width limit applies here; callers hand in the units the line
    /// breaker kept together.
    #[must_use]
    pub fn new(units: Vec<MeasuredInline>, spacing: i32) -> Self {
        if units.is_empty() {
            return Self {
                units,
                pens: Vec::new(),
                baseline: 0,
                bounds: Rect::EMPTY,
            };
        }
        let (mut cursor, first_pen) = LineCursor::start(&units[0], spacing);
        let mut pens = Vec::with_capacity(units.len());
        pens.push(first_pen);
        for unit in &units[1..] {
            let placement = cursor.place(unit);
            pens.push(placement.pen_x);
            cursor.commit(unit, placement);
        }
        let raw = cursor.bounds();
        Self {
            pens,
            baseline: -raw.min.y,
            bounds: raw.normalized(),
            units,
        }
    }

    /// The units on this line.
    #[must_use]
    pub fn units(&self) -> &[MeasuredInline] {
        &self.units
    }

    /// Pen offset of each unit from the line's left edge.
    #[must_use]
    pub fn pens(&self) -> &[i32] {
        &self.pens
    }

    /// Distance from the top of the line to the baseline.
    #[must_use]
    pub const fn baseline(&self) -> i32 {
        self.baseline
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point) {
        let baseline_y = origin.y + self.baseline;
        for (unit, pen) in self.units.iter().zip(&self.pens) {
            unit.draw(canvas, Point::new(origin.x + pen, baseline_y));
        }
    }
}

/// Boxes stacked top to bottom without overlap.
///
/// A stack adds no space of its own; margins between children are explicit
/// [`EmptyBox`] spacers inserted by the block that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct StackBox {
    children: Vec<LayoutBox>,
    bounds: Rect,
}

impl StackBox {
    /// Stack `children` in order.
    #[must_use]
    pub fn new(children: Vec<LayoutBox>) -> Self {
        // Anchored at the origin: a zero-width child (a blank code line)
        // still takes up its height wherever it sits in the stack.
        let mut right = 0;
        let mut y = 0;
        for child in &children {
            let child_bounds = child.bounds();
            right = right.max(child_bounds.max.x);
            y += child_bounds.height();
        }
        Self {
            children,
            bounds: Rect::from_size(right, y),
        }
    }

    /// The stacked boxes.
    #[must_use]
    pub fn children(&self) -> &[LayoutBox] {
        &self.children
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point) {
        let mut y = origin.y;
        for child in &self.children {
            child.draw(canvas, Point::new(origin.x, y));
            y += child.bounds().height();
        }
    }
}

/// A spacer that reserves `width × height` and draws nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyBox {
    bounds: Rect,
}

impl EmptyBox {
    /// A spacer of the given size.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Rect::from_size(width, height),
        }
    }
}

/// Wraps a box, drawing it at a fixed offset inside bounds chosen by the
/// parent rather than derived from the inner box.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerBox {
    inner: Box<LayoutBox>,
    offset: Point,
    bounds: Rect,
}

impl ContainerBox {
    /// Reserve `width × height` and draw `inner` at `offset` within it.
    #[must_use]
    pub fn new(inner: LayoutBox, width: i32, height: i32, offset: Point) -> Self {
        Self {
            inner: Box::new(inner),
            offset,
            bounds: Rect::from_size(width, height),
        }
    }

    /// The wrapped box.
    #[must_use]
    pub fn inner(&self) -> &LayoutBox {
        &self.inner
    }

    /// Offset of the wrapped box.
    #[must_use]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    fn draw(&self, canvas: &mut dyn Canvas, origin: Point) {
        self.inner.draw(canvas, origin + self.offset);
    }
}

impl From<LineBox> for LayoutBox {
    fn from(b: LineBox) -> Self {
        Self::Line(b)
    }
}

impl From<StackBox> for LayoutBox {
    fn from(b: StackBox) -> Self {
        Self::Stack(b)
    }
}

impl From<EmptyBox> for LayoutBox {
    fn from(b: EmptyBox) -> Self {
        Self::Empty(b)
    }
}

impl From<ContainerBox> for LayoutBox {
    fn from(b: ContainerBox) -> Self {
        Self::Container(b)
    }
}
