//! Width-constrained layout for structured documents.
//!
//! # Pipeline
//!
//! ```text
//! Block ──layout(width)──▶ Inline::measure ──▶ split_line ──▶ LayoutBox
//!                               │                                 │
//!                          FontMetrics                     draw(Canvas)
//! ```
//!
//! - **Inline model** ([`inline`]) - words and images, measured against a
//!   [`FontMetrics`] provider into [`MeasuredInline`] units
//! - **Line breaker** ([`line_breaker`]) - greedy, word-granular wrapping
//! - **Box tree** ([`boxes`]) - line, stack, empty and container boxes with
//!   a uniform `bounds()` / `draw()` contract
//! - **Block model** ([`block`]) - text, list item, code and stack blocks,
//!   including margin collapsing between siblings
//!
//! Layout is synchronous and recomputed from scratch on every width
//! change. The only mutable state is the provider's face cache, reached
//! through the [`RenderingContext`].
//!
//! # Not Yet Implemented
//!
//! - Justified or hyphenated text
//! - Bidirectional text
//! - Floats and tables

pub mod block;
pub mod boxes;
pub mod context;
pub mod display_list;
pub mod error;
pub mod geometry;
pub mod inline;
pub mod line_breaker;
pub mod metrics;
pub mod style;

pub use block::{Block, CodeBlock, ListItemBlock, ListMarker, StackBlock, TextBlock, layout};
pub use boxes::{ContainerBox, EmptyBox, LayoutBox, LineBox, StackBox};
pub use context::RenderingContext;
pub use display_list::{Canvas, DisplayCommand, DisplayList};
pub use error::LayoutError;
pub use geometry::{Point, Rect};
pub use inline::{Inline, InlineImage, InlineText, MeasuredContent, MeasuredInline};
pub use line_breaker::{break_lines, split_line};
pub use metrics::{ApproximateFontMetrics, FaceCache, FaceId, FontMetrics};
pub use style::{Color, FaceVariant, FontFamily, FontSlant, FontWeight, Margins, TextStyle};
