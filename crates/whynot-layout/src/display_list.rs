//! Display List - the drawing surface boxes paint onto.
//!
//! [`LayoutBox::draw`](crate::LayoutBox::draw) talks to a [`Canvas`]. A
//! presentation host can implement it directly over its pixel buffer, or
//! record into a [`DisplayList`] and replay that later, which is what the
//! software renderer and the tests do.

use crate::geometry::Point;
use crate::metrics::FaceId;
use crate::style::Color;
use std::rc::Rc;
use whynot_common::image::LoadedImage;

/// Destination for box drawing.
pub trait Canvas {
    /// Draw `text` in `face` with its pen at `baseline` (a point on the
    /// text baseline).
    fn draw_text(&mut self, face: FaceId, text: &str, baseline: Point, color: Color);

    /// Draw `image` at its intrinsic size with its top-left corner at
    /// `top_left`.
    fn draw_image(&mut self, image: &Rc<LoadedImage>, top_left: Point);
}

/// A single drawing command.
///
/// Commands are added to the display list in drawing order (top to bottom,
/// left to right).
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    /// Draw text at a position.
    DrawText {
        /// X coordinate of the pen on the baseline.
        x: i32,
        /// Y coordinate of the baseline.
        y: i32,
        /// The text content to draw.
        text: String,
        /// Face the text was measured with.
        face: FaceId,
        /// Text color.
        color: Color,
    },

    /// Draw an image at its intrinsic size.
    DrawImage {
        /// X coordinate of the image's top-left corner.
        x: i32,
        /// Y coordinate of the image's top-left corner.
        y: i32,
        /// The decoded image.
        image: Rc<LoadedImage>,
    },
}

/// A list of drawing commands in drawing order.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command to the display list.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Get the commands in drawing order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Get the number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the display list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The text of every `DrawText` command, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DisplayCommand::DrawText { text, .. } => Some(text.as_str()),
                DisplayCommand::DrawImage { .. } => None,
            })
            .collect()
    }
}

impl Canvas for DisplayList {
    fn draw_text(&mut self, face: FaceId, text: &str, baseline: Point, color: Color) {
        self.push(DisplayCommand::DrawText {
            x: baseline.x,
            y: baseline.y,
            text: text.to_string(),
            face,
            color,
        });
    }

    fn draw_image(&mut self, image: &Rc<LoadedImage>, top_left: Point) {
        self.push(DisplayCommand::DrawImage {
            x: top_left.x,
            y: top_left.y,
            image: Rc::clone(image),
        });
    }
}
