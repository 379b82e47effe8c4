//! Block-level content and the algorithms that turn it into boxes.
//!
//! A [`Block`] is built once from the document and laid out again on every
//! width change. Each block offers two passes over the same rules:
//!
//! - [`Block::estimate_bounds`] measures without building boxes, for hosts
//!   that only need a size.
//! - [`Block::layout`] materializes the drawable [`LayoutBox`] tree.
//!
//! Both passes agree on height for the same inputs.

use crate::boxes::{ContainerBox, EmptyBox, LayoutBox, LineBox, StackBox};
use crate::context::RenderingContext;
use crate::error::LayoutError;
use crate::geometry::{Point, Rect};
use crate::inline::{Inline, MeasuredInline, measure_all};
use crate::line_breaker::{break_lines, split_line};
use crate::style::Margins;

/// A block of content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph or heading: inline units wrapped into lines.
    Text(TextBlock),
    /// A list entry: a marker followed by wrapped inline units.
    ListItem(ListItemBlock),
    /// Preformatted lines, never rewrapped.
    Code(CodeBlock),
    /// Child blocks stacked with collapsed margins.
    Stack(StackBlock),
}

/// Inline units wrapped into as many lines as the width requires.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    inlines: Vec<Inline>,
    margins: Margins,
    spacing: i32,
}

/// A list entry. The marker is laid out as the first unit of the first
/// line and wraps like any other word.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItemBlock {
    marker: Inline,
    inlines: Vec<Inline>,
    margins: Margins,
    spacing: i32,
}

/// Preformatted source lines, one unit and one line box each.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    lines: Vec<Inline>,
    margins: Margins,
}

/// Child blocks stacked vertically.
///
/// Never empty: a stack's margins are derived from its first and last
/// children.
#[derive(Debug, Clone, PartialEq)]
pub struct StackBlock {
    children: Vec<Block>,
    margins: Margins,
}

/// The character a source list uses to mark its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    /// `-`, `+` or `*`: the character itself is the bullet.
    Bullet(char),
    /// `1.`, `2.`, ...
    Period,
    /// `1)`, `2)`, ...
    Paren,
}

impl ListMarker {
    /// Classify a marker character. `None` for characters lists don't use.
    #[must_use]
    pub const fn from_char(marker: char) -> Option<Self> {
        match marker {
            '-' | '+' | '*' => Some(Self::Bullet(marker)),
            '.' => Some(Self::Period),
            ')' => Some(Self::Paren),
            _ => None,
        }
    }

    /// Marker text of the item at 1-based `index`.
    #[must_use]
    pub fn label(self, index: usize) -> String {
        match self {
            Self::Bullet(c) => c.to_string(),
            Self::Period => format!("{index}."),
            Self::Paren => format!("{index})"),
        }
    }
}

impl TextBlock {
    /// Create a text block.
    #[must_use]
    pub const fn new(inlines: Vec<Inline>, margins: Margins) -> Self {
        Self {
            inlines,
            margins,
            spacing: 0,
        }
    }

    /// Extra pixels added between every pair of units.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// The inline units.
    #[must_use]
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }
}

impl ListItemBlock {
    /// Create a list item block.
    #[must_use]
    pub const fn new(marker: Inline, inlines: Vec<Inline>, margins: Margins) -> Self {
        Self {
            marker,
            inlines,
            margins,
            spacing: 0,
        }
    }

    /// Extra pixels added between every pair of units.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// The marker unit.
    #[must_use]
    pub const fn marker(&self) -> &Inline {
        &self.marker
    }

    /// The content units, without the marker.
    #[must_use]
    pub fn inlines(&self) -> &[Inline] {
        &self.inlines
    }

    fn measure(&self, ctx: &mut RenderingContext<'_>) -> Result<Vec<MeasuredInline>, LayoutError> {
        let mut units = Vec::with_capacity(self.inlines.len() + 1);
        units.push(self.marker.measure(ctx.metrics())?);
        for inline in &self.inlines {
            units.push(inline.measure(ctx.metrics())?);
        }
        Ok(units)
    }
}

impl CodeBlock {
    /// Create a code block from one unit per source line.
    #[must_use]
    pub const fn new(lines: Vec<Inline>, margins: Margins) -> Self {
        Self { lines, margins }
    }

    /// The source lines.
    #[must_use]
    pub fn lines(&self) -> &[Inline] {
        &self.lines
    }
}

impl StackBlock {
    /// Create a stack block.
    ///
    /// # Errors
    ///
    /// [`LayoutError::EmptyStack`] if `children` is empty.
    pub fn new(children: Vec<Block>, margins: Margins) -> Result<Self, LayoutError> {
        if children.is_empty() {
            return Err(LayoutError::EmptyStack);
        }
        Ok(Self { children, margins })
    }

    /// The child blocks.
    #[must_use]
    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "The top margin of a box is adjoining to the top margin of its first
    /// in-flow child", so the stack's effective top margin is the larger of
    /// the two, and likewise at the bottom with the last child.
    fn collapsed_margins(&self) -> Margins {
        let first = self.children.first().map_or(Margins::ZERO, Block::margins);
        let last = self.children.last().map_or(Margins::ZERO, Block::margins);
        Margins {
            top: first.top.max(self.margins.top),
            bottom: last.bottom.max(self.margins.bottom),
            left: self.margins.left,
            right: self.margins.right,
        }
    }

    /// Walk the children in order, reporting each collapsed margin between
    /// siblings and each child with the width it is laid out at.
    ///
    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "When two or more margins collapse, the resulting margin width is the
    /// maximum of the collapsing margins' widths."
    fn for_each_child<'b>(
        &'b self,
        ctx: &mut RenderingContext<'_>,
        width: i32,
        mut visit: impl FnMut(&mut RenderingContext<'_>, StackItem<'b>) -> Result<(), LayoutError>,
    ) -> Result<(), LayoutError> {
        let mut bottom_margin = 0;
        for (i, block) in self.children.iter().enumerate() {
            let margins = ctx.scale_margins(block.margins());
            if i > 0 {
                let collapsed = bottom_margin.max(margins.top as i32);
                if collapsed > 0 {
                    visit(ctx, StackItem::Gap(collapsed))?;
                }
            }
            if margins.is_indented() {
                // Narrow the child by its side margins; the parent reserves
                // the full width and shifts the child right.
                let inner = (width - (margins.left + margins.right) as i32).max(0);
                visit(
                    ctx,
                    StackItem::Child {
                        block,
                        width: inner,
                        indent: Some(margins.left as i32),
                    },
                )?;
            } else {
                visit(
                    ctx,
                    StackItem::Child {
                        block,
                        width,
                        indent: None,
                    },
                )?;
            }
            bottom_margin = margins.bottom as i32;
        }
        Ok(())
    }
}

/// One step of walking a stack's children.
enum StackItem<'b> {
    /// Collapsed margin between two siblings, in device pixels.
    Gap(i32),
    /// A child and the width it gets. `indent` is its scaled left margin
    /// when the child has side margins.
    Child {
        block: &'b Block,
        width: i32,
        indent: Option<i32>,
    },
}

impl Block {
    /// Margins of the block in device-independent pixels. For stacks these
    /// are the margins left over after collapsing with the first and last
    /// children.
    #[must_use]
    pub fn margins(&self) -> Margins {
        match self {
            Self::Text(b) => b.margins,
            Self::ListItem(b) => b.margins,
            Self::Code(b) => b.margins,
            Self::Stack(b) => b.collapsed_margins(),
        }
    }

    /// Size of the block at `width` without materializing boxes.
    ///
    /// The rectangle is always `width` wide; its height matches the height
    /// of [`Block::layout`] for the same inputs.
    ///
    /// # Errors
    ///
    /// Measurement failures from the provider.
    pub fn estimate_bounds(
        &self,
        ctx: &mut RenderingContext<'_>,
        width: i32,
    ) -> Result<Rect, LayoutError> {
        let height = match self {
            Self::Text(b) => {
                let units = measure_all(&b.inlines, ctx.metrics())?;
                wrapped_height(&units, width, b.spacing)
            }
            Self::ListItem(b) => {
                let units = b.measure(ctx)?;
                wrapped_height(&units, width, b.spacing)
            }
            Self::Code(b) => {
                let mut height = 0;
                for line in &b.lines {
                    height += line.measure(ctx.metrics())?.bounds.height();
                }
                height
            }
            Self::Stack(b) => {
                let mut height = 0;
                b.for_each_child(ctx, width, |ctx, item| {
                    match item {
                        StackItem::Gap(gap) => height += gap,
                        StackItem::Child { block, width, .. } => {
                            height += block.estimate_bounds(ctx, width)?.height();
                        }
                    }
                    Ok(())
                })?;
                height
            }
        };
        Ok(Rect::from_size(width, height))
    }

    /// Lay the block out at `width` and build its box tree.
    ///
    /// # Errors
    ///
    /// Measurement failures from the provider.
    pub fn layout(
        &self,
        ctx: &mut RenderingContext<'_>,
        width: i32,
    ) -> Result<LayoutBox, LayoutError> {
        let laid_out = match self {
            Self::Text(b) => {
                let units = measure_all(&b.inlines, ctx.metrics())?;
                wrap_into_lines(units, width, b.spacing)
            }
            Self::ListItem(b) => {
                let units = b.measure(ctx)?;
                wrap_into_lines(units, width, b.spacing)
            }
            Self::Code(b) => {
                let lines = b
                    .lines
                    .iter()
                    .map(|line| -> Result<LayoutBox, LayoutError> {
                        let unit = line.measure(ctx.metrics())?;
                        Ok(LineBox::new(vec![unit], 0).into())
                    })
                    .collect::<Result<Vec<LayoutBox>, LayoutError>>()?;
                StackBox::new(lines).into()
            }
            Self::Stack(b) => {
                let mut boxes: Vec<LayoutBox> = Vec::with_capacity(b.children.len() * 2);
                b.for_each_child(ctx, width, |ctx, item| {
                    match item {
                        StackItem::Gap(gap) => boxes.push(EmptyBox::new(width, gap).into()),
                        StackItem::Child {
                            block,
                            width: child_width,
                            indent,
                        } => {
                            let inner = block.layout(ctx, child_width)?;
                            if let Some(indent) = indent {
                                let height = inner.bounds().height();
                                boxes.push(
                                    ContainerBox::new(inner, width, height, Point::new(indent, 0))
                                        .into(),
                                );
                            } else {
                                boxes.push(inner);
                            }
                        }
                    }
                    Ok(())
                })?;
                StackBox::new(boxes).into()
            }
        };
        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT BLOCK] kind={} width={width} height={}",
            self.kind(),
            laid_out.bounds().height()
        );
        Ok(laid_out)
    }

    /// Short name of the block kind, for traces and dumps.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::ListItem(_) => "list-item",
            Self::Code(_) => "code",
            Self::Stack(_) => "stack",
        }
    }
}

/// Lay out `root` at `width`: the entry point presentation hosts call on
/// every width change.
///
/// # Errors
///
/// Measurement failures from the provider.
pub fn layout(
    root: &Block,
    ctx: &mut RenderingContext<'_>,
    width: i32,
) -> Result<LayoutBox, LayoutError> {
    root.layout(ctx, width)
}

/// Sum of line heights when `units` wrap at `width`.
fn wrapped_height(units: &[MeasuredInline], width: i32, spacing: i32) -> i32 {
    break_lines(units, width, spacing)
        .iter()
        .map(|(_, bounds)| bounds.height())
        .sum()
}

/// Wrap `units` at `width`, one line box per line, stacked.
fn wrap_into_lines(units: Vec<MeasuredInline>, width: i32, spacing: i32) -> LayoutBox {
    let mut lines: Vec<LayoutBox> = Vec::new();
    let mut rest = units;
    while !rest.is_empty() {
        let (count, _) = split_line(&rest, width, spacing);
        let tail = rest.split_off(count);
        #[cfg(feature = "layout-trace")]
        eprintln!("[LAYOUT LINE] units={count} width={width}");
        lines.push(LineBox::new(rest, spacing).into());
        rest = tail;
    }
    StackBox::new(lines).into()
}
