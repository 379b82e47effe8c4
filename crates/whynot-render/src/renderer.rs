//! Software renderer for headless viewport rendering.
//!
//! Executes a [`DisplayList`] to a pixel buffer using fontdue for text
//! rasterization.
//!
//! # Architecture
//!
//! The renderer is the final stage in the pipeline:
//!
//! ```text
//! Block → LayoutBox → DisplayList → Pixels
//!          (layout)     (draw)      (render)
//! ```
//!
//! The renderer knows nothing about blocks or boxes. It executes drawing
//! commands, clipping everything to the buffer.

use std::path::Path;

use anyhow::Result;
use image::{ImageBuffer, Rgba, RgbaImage};
use whynot_common::image::LoadedImage;
use whynot_layout::{Color, DisplayCommand, DisplayList, LayoutError};

use crate::font_metrics::{FontdueFace, FontdueFaceSelector};

/// Software renderer that executes a display list to a pixel buffer.
pub struct Renderer {
    buffer: RgbaImage,
}

impl Renderer {
    /// A renderer with a `width × height` buffer filled with `background`.
    #[must_use]
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let fill = Rgba([background.r, background.g, background.b, background.a]);
        Self {
            buffer: ImageBuffer::from_pixel(width, height, fill),
        }
    }

    /// The rendered pixels.
    #[must_use]
    pub const fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Execute a display list, drawing all commands to the pixel buffer.
    ///
    /// Commands are executed in order (back to front). Text faces are
    /// looked up in `faces`, the provider the display list was laid out
    /// with.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] if the provider's scale changed since
    /// layout.
    pub fn render(
        &mut self,
        display_list: &DisplayList,
        faces: &FontdueFaceSelector,
    ) -> Result<(), LayoutError> {
        for command in display_list.commands() {
            match command {
                DisplayCommand::DrawText {
                    x,
                    y,
                    text,
                    face,
                    color,
                } => {
                    let face = faces.face(*face)?;
                    self.draw_text(face, text, *x, *y, *color);
                }
                DisplayCommand::DrawImage { x, y, image } => {
                    self.draw_image(image, *x, *y);
                }
            }
        }
        Ok(())
    }

    /// Blend `color` onto the pixel at `(x, y)` with coverage `alpha`,
    /// ignoring positions outside the buffer.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>, alpha: u8) {
        if x < 0 || y < 0 || x as u32 >= self.buffer.width() || y as u32 >= self.buffer.height() {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if alpha == 255 {
            self.buffer.put_pixel(x, y, color);
        } else {
            let bg = *self.buffer.get_pixel(x, y);
            self.buffer.put_pixel(x, y, alpha_blend(color, bg, alpha));
        }
    }

    /// Draw an image at its intrinsic size with its top-left corner at
    /// `(x, y)`.
    fn draw_image(&mut self, image: &LoadedImage, x: i32, y: i32) {
        for sy in 0..image.height() {
            for sx in 0..image.width() {
                let Some([r, g, b, a]) = image.pixel(sx, sy) else {
                    continue;
                };
                if a == 0 {
                    continue;
                }
                self.blend_pixel(x + sx as i32, y + sy as i32, Rgba([r, g, b, 255]), a);
            }
        }
    }

    /// Draw `text` with its pen origin on the baseline at `(x, y)`.
    fn draw_text(&mut self, face: &FontdueFace, text: &str, x: i32, y: i32, color: Color) {
        let rgba = Rgba([color.r, color.g, color.b, 255]);
        let mut cursor_x = x as f32;

        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = face.font().rasterize(ch, face.px());

            // fontdue's ymin is the bitmap's bottom edge above the baseline.
            let glyph_x = cursor_x.round() as i32 + metrics.xmin;
            let glyph_y = y - metrics.ymin - metrics.height as i32;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage == 0 {
                        continue;
                    }
                    let alpha = (u16::from(coverage) * u16::from(color.a) / 255) as u8;
                    self.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, rgba, alpha);
                }
            }

            cursor_x += metrics.advance_width;
        }
    }

    /// Save the rendered image to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be saved to the given path.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.buffer.save(path).map_err(|e| {
            anyhow::anyhow!("failed to save viewport to '{}': {e}", path.display())
        })?;
        Ok(())
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("width", &self.buffer.width())
            .field("height", &self.buffer.height())
            .finish_non_exhaustive()
    }
}

/// Alpha blend a foreground color onto a background color.
fn alpha_blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    Rgba([
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn red_square(size: u32) -> Rc<LoadedImage> {
        let rgba = [255, 0, 0, 255].repeat((size * size) as usize);
        Rc::new(LoadedImage::new(size, size, rgba))
    }

    #[test]
    fn test_alpha_blend_extremes() {
        let fg = Rgba([200, 100, 50, 255]);
        let bg = Rgba([0, 0, 0, 255]);
        assert_eq!(alpha_blend(fg, bg, 255), Rgba([200, 100, 50, 255]));
        assert_eq!(alpha_blend(fg, bg, 0), bg);
    }

    #[test]
    fn test_background_fill() {
        let renderer = Renderer::new(4, 3, Color::rgb(1, 2, 3));
        assert!(renderer.buffer().pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn test_draw_image_is_clipped_to_buffer() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::DrawImage {
            x: -1,
            y: 2,
            image: red_square(2),
        });
        let mut renderer = Renderer::new(3, 3, Color::BLACK);
        renderer.render(&list, &FontdueFaceSelector::new()).unwrap();

        let red = Rgba([255, 0, 0, 255]);
        let black = Rgba([0, 0, 0, 255]);
        assert_eq!(*renderer.buffer().get_pixel(0, 2), red);
        assert_eq!(*renderer.buffer().get_pixel(1, 2), black);
        assert_eq!(*renderer.buffer().get_pixel(0, 1), black);
    }

    #[test]
    fn test_transparent_pixels_are_skipped() {
        let mut list = DisplayList::new();
        list.push(DisplayCommand::DrawImage {
            x: 0,
            y: 0,
            image: Rc::new(LoadedImage::transparent(2, 2)),
        });
        let mut renderer = Renderer::new(2, 2, Color::WHITE);
        renderer.render(&list, &FontdueFaceSelector::new()).unwrap();
        assert!(renderer.buffer().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }
}
