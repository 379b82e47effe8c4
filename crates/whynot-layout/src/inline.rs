//! Inline content and its measured form.
//!
//! An [`Inline`] is what the document compiler produces: a word of styled
//! text or an embedded image. Layout resolves each one against the
//! [`FontMetrics`] provider into a [`MeasuredInline`], which is what the
//! line breaker and line boxes work with. Measured units are rebuilt on
//! every layout pass.

use crate::display_list::Canvas;
use crate::error::LayoutError;
use crate::geometry::{Point, Rect};
use crate::metrics::{FaceId, FontMetrics};
use crate::style::{Color, TextStyle};
use std::rc::Rc;
use whynot_common::image::LoadedImage;

/// A unit of inline content.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A single word of styled text.
    Text(InlineText),
    /// An embedded image.
    Image(InlineImage),
}

/// A run of text with one style. Never contains interior whitespace; the
/// compiler splits text into words.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineText {
    text: Rc<str>,
    style: TextStyle,
    color: Color,
}

/// An embedded image with its alternate text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    image: Rc<LoadedImage>,
    alt: String,
}

impl InlineText {
    /// Create a text run.
    pub fn new(text: impl Into<Rc<str>>, style: TextStyle, color: Color) -> Self {
        Self {
            text: text.into(),
            style,
            color,
        }
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The style the text is measured and drawn with.
    #[must_use]
    pub const fn style(&self) -> &TextStyle {
        &self.style
    }

    /// The fill color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }
}

impl InlineImage {
    /// Create an embedded image.
    pub fn new(image: Rc<LoadedImage>, alt: impl Into<String>) -> Self {
        Self {
            image,
            alt: alt.into(),
        }
    }

    /// The decoded image.
    #[must_use]
    pub fn image(&self) -> &LoadedImage {
        &self.image
    }

    /// Alternate text.
    #[must_use]
    pub fn alt(&self) -> &str {
        &self.alt
    }
}

impl Inline {
    /// Shorthand for a text unit.
    pub fn text(text: impl Into<Rc<str>>, style: TextStyle, color: Color) -> Self {
        Self::Text(InlineText::new(text, style, color))
    }

    /// Shorthand for an image unit.
    pub fn image(image: Rc<LoadedImage>, alt: impl Into<String>) -> Self {
        Self::Image(InlineImage::new(image, alt))
    }

    /// Resolve this unit into its measured form.
    ///
    /// Text is as tall as its face (`-ascent ..= descent`) regardless of the
    /// glyphs it contains, so every word of a style produces the same line
    /// height. Only the horizontal extent is the tight ink box.
    ///
    /// Images sit on the baseline at their intrinsic size and ask for no
    /// inter-word space of their own.
    ///
    /// # Errors
    ///
    /// Propagates provider failures; an unmapped style is a configuration
    /// defect and aborts the layout pass.
    pub fn measure(&self, metrics: &mut dyn FontMetrics) -> Result<MeasuredInline, LayoutError> {
        match self {
            Self::Text(run) => {
                let face = metrics.resolve(&run.style)?;
                let (ink, advance) = metrics.ink_bounds_and_advance(face, &run.text)?;
                let (ascent, descent) = metrics.vertical_metrics(face)?;
                let space_width = metrics.space_advance(face)?;
                Ok(MeasuredInline {
                    bounds: Rect::new(ink.min.x, -ascent, ink.max.x, descent),
                    advance: advance.max(0),
                    space_width,
                    content: MeasuredContent::Text {
                        text: Rc::clone(&run.text),
                        face,
                        color: run.color,
                    },
                })
            }
            Self::Image(img) => {
                let width = img.image.width() as i32;
                let height = img.image.height() as i32;
                Ok(MeasuredInline {
                    bounds: Rect::new(0, -height, width, 0),
                    advance: width,
                    space_width: 0,
                    content: MeasuredContent::Image(Rc::clone(&img.image)),
                })
            }
        }
    }
}

/// What a measured unit draws.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasuredContent {
    /// Text in a resolved face.
    Text {
        /// The word.
        text: Rc<str>,
        /// Face the word was measured with.
        face: FaceId,
        /// Fill color.
        color: Color,
    },
    /// An image drawn at its intrinsic size.
    Image(Rc<LoadedImage>),
}

/// An inline unit resolved against a measurement provider.
///
/// Coordinates are relative to the unit's pen position on the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredInline {
    /// Ink bounds relative to the pen. `min.x` may be negative (overshoot),
    /// `min.y` is negative (above the baseline).
    pub bounds: Rect,
    /// Horizontal distance the pen moves past this unit. Never negative.
    pub advance: i32,
    /// Gap this unit would like between itself and its neighbours.
    pub space_width: i32,
    /// Drawable content.
    pub content: MeasuredContent,
}

impl MeasuredInline {
    /// Draw the unit with its pen at `pen` (a point on the baseline).
    pub fn draw(&self, canvas: &mut dyn Canvas, pen: Point) {
        match &self.content {
            MeasuredContent::Text { text, face, color } => {
                canvas.draw_text(*face, text, pen, *color);
            }
            MeasuredContent::Image(image) => {
                canvas.draw_image(image, pen + Point::new(self.bounds.min.x, self.bounds.min.y));
            }
        }
    }

    /// The text of a text unit, `None` for images.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MeasuredContent::Text { text, .. } => Some(&**text),
            MeasuredContent::Image(_) => None,
        }
    }
}

/// Measure every unit of a sequence, in order.
///
/// # Errors
///
/// The first measurement failure.
pub fn measure_all(
    inlines: &[Inline],
    metrics: &mut dyn FontMetrics,
) -> Result<Vec<MeasuredInline>, LayoutError> {
    inlines.iter().map(|inline| inline.measure(metrics)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproximateFontMetrics;
    use crate::style::FontFamily;

    #[test]
    fn test_text_height_is_uniform_per_style() {
        let mut metrics = ApproximateFontMetrics::new().with_vertical(0.8, 0.2);
        let style = TextStyle::new(10.0);
        let a = Inline::text("ace", style, Color::WHITE).measure(&mut metrics).unwrap();
        let b = Inline::text("gjpqy", style, Color::WHITE).measure(&mut metrics).unwrap();
        assert_eq!(a.bounds.min.y, -8);
        assert_eq!(a.bounds.max.y, 2);
        assert_eq!(a.bounds.height(), b.bounds.height());
        assert!(a.advance >= a.bounds.width());
    }

    #[test]
    fn test_image_measures_to_intrinsic_size() {
        let mut metrics = ApproximateFontMetrics::new();
        let image = Rc::new(LoadedImage::transparent(30, 20));
        let unit = Inline::image(image, "logo").measure(&mut metrics).unwrap();
        assert_eq!(unit.bounds, Rect::new(0, -20, 30, 0));
        assert_eq!(unit.advance, 30);
        assert_eq!(unit.space_width, 0);
        assert_eq!(unit.text(), None);
    }

    #[test]
    fn test_unmapped_style_fails_measurement() {
        let mut metrics =
            ApproximateFontMetrics::new().with_families(&[FontFamily::Proportional]);
        let style = TextStyle::new(10.0).with_family(FontFamily::SmallCaps);
        let err = Inline::text("Title", style, Color::WHITE)
            .measure(&mut metrics)
            .unwrap_err();
        assert!(matches!(err, LayoutError::UnmappedStyle { .. }));
    }
}
