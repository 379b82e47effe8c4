//! Loading and rendering pipeline for whynot documents.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a JSON document tree and compile it with a
//!   style table, resolving images next to the document
//! - **Font Metrics** - [`FontdueFaceSelector`], measuring with system fonts
//! - **Software Rendering** - lay out at a width and rasterize one
//!   viewport of the result
//!
//! # Not Yet Implemented
//!
//! - Remote images
//! - Bundled fonts (system fonts only)

pub mod font_metrics;
pub mod image_loader;
pub mod renderer;

pub use font_metrics::{FontdueFace, FontdueFaceSelector};
pub use image_loader::{ImageLoader, decode_image};
pub use renderer::Renderer;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use whynot_document::{CompileError, DocumentCompiler, StyleTable};
use whynot_layout::{Block, Color, DisplayList, LayoutBox, Point, RenderingContext, layout};

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a file.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A file is not valid JSON of the expected shape.
    #[error("failed to parse '{}': {source}", path.display())]
    Json {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// The document tree could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a style table from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_styles(path: &Path) -> Result<StyleTable, LoadError> {
    let json = read_file(path)?;
    StyleTable::from_json(&json).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a document from a JSON file and compile it into blocks.
///
/// Image sources are resolved relative to the document's directory.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the tree
/// does not compile.
pub fn load_document(path: &Path, styles: StyleTable) -> Result<Block, LoadError> {
    let json = read_file(path)?;
    let node = whynot_document::from_json(&json).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let block = DocumentCompiler::new(styles)
        .with_images(ImageLoader::new(base))
        .compile(&node)?;
    Ok(block)
}

/// The part of a laid-out document a host shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in device pixels. Also the layout width.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Device pixels scrolled past the top of the document.
    pub scroll_y: i32,
    /// Device scale factor applied to fonts and margins.
    pub scale: f32,
    /// Color behind the document.
    pub background: Color,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            scroll_y: 0,
            scale: 1.0,
            background: Color::BLACK,
        }
    }
}

/// Lay out `block` at the viewport's width and record its drawing
/// commands, shifted up by the scroll offset.
///
/// # Errors
///
/// Measurement failures from `faces`.
pub fn layout_viewport(
    block: &Block,
    faces: &mut FontdueFaceSelector,
    viewport: &Viewport,
) -> anyhow::Result<(LayoutBox, DisplayList)> {
    let mut ctx = RenderingContext::new(faces, viewport.scale);
    let tree = layout(block, &mut ctx, viewport.width as i32)?;
    let mut list = DisplayList::new();
    tree.draw(&mut list, Point::new(0, -viewport.scroll_y));
    Ok((tree, list))
}

/// Lay out `block` and rasterize one viewport of it.
///
/// # Errors
///
/// Measurement failures from `faces`.
pub fn render_viewport(
    block: &Block,
    faces: &mut FontdueFaceSelector,
    viewport: &Viewport,
) -> anyhow::Result<Renderer> {
    let (_, list) = layout_viewport(block, faces, viewport)?;
    let mut renderer = Renderer::new(viewport.width, viewport.height, viewport.background);
    renderer.render(&list, faces)?;
    Ok(renderer)
}
