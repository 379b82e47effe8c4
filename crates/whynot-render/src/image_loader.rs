//! Image loading: read, decode and cache images for a document.
//!
//! Image sources in a document are paths relative to the document's own
//! directory. [`ImageLoader`] resolves them, decodes with the `image` crate
//! and hands out shared [`LoadedImage`]s, decoding each file once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use whynot_common::image::LoadedImage;
use whynot_common::warning::warn_once;
use whynot_document::ImageSource;

/// Decode raster bytes (PNG, JPEG, GIF, WebP, …) into RGBA.
///
/// # Errors
///
/// Returns an error string if the bytes are not a supported image.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage, String> {
    let dynamic_img =
        image::load_from_memory(bytes).map_err(|e| format!("could not decode image ({e})"))?;
    let rgba = dynamic_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(LoadedImage::new(w, h, rgba.into_raw()))
}

/// An [`ImageSource`] reading files relative to a base directory.
#[derive(Debug)]
pub struct ImageLoader {
    base: PathBuf,
    cache: HashMap<PathBuf, Rc<LoadedImage>>,
}

impl ImageLoader {
    /// A loader resolving relative sources against `base`.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            cache: HashMap::new(),
        }
    }

    /// Where `src` points on disk.
    #[must_use]
    pub fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }
}

impl ImageSource for ImageLoader {
    fn load(&mut self, src: &str) -> Result<Rc<LoadedImage>, String> {
        if src.contains("://") {
            warn_once("images", &format!("remote image '{src}' is not fetched"));
            return Err("only local image files are supported".to_string());
        }
        let path = self.resolve(src);
        if let Some(image) = self.cache.get(&path) {
            return Ok(Rc::clone(image));
        }
        let bytes =
            fs::read(&path).map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
        let image = Rc::new(decode_image(&bytes)?);
        let _ = self.cache.insert(path, Rc::clone(&image));
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes()).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"not an image").is_err());
    }

    #[test]
    fn test_relative_sources_resolve_against_base() {
        let loader = ImageLoader::new("/docs");
        assert_eq!(loader.resolve("img/a.png"), PathBuf::from("/docs/img/a.png"));
        assert_eq!(loader.resolve("/abs/b.png"), PathBuf::from("/abs/b.png"));
    }

    #[test]
    fn test_load_caches_decoded_files() {
        let dir = std::env::temp_dir().join(format!("whynot-images-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dot.png"), png_bytes()).unwrap();

        let mut loader = ImageLoader::new(&dir);
        let first = loader.load("dot.png").unwrap();
        let second = loader.load("dot.png").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert!(loader.load("missing.png").is_err());
        assert!(loader.load("https://example.com/x.png").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
