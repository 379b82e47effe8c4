//! Tests for the load → layout → render pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use whynot_document::{CompileError, StyleTable};
use whynot_layout::{Block, Color, DisplayCommand};
use whynot_render::{
    FontdueFaceSelector, LoadError, Viewport, layout_viewport, load_document, load_styles,
    render_viewport,
};

/// A scratch directory unique to one test.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("whynot-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const DOCUMENT: &str = r#"{"kind": "document", "children": [
    {"kind": "heading", "level": 2, "children": [{"kind": "text", "text": "Hello"}]},
    {"kind": "paragraph", "children": [
        {"kind": "text", "text": "A short paragraph with a picture"},
        {"kind": "image", "src": "dot.png", "alt": "dot"}
    ]}
]}"#;

fn write_document(dir: &Path) -> PathBuf {
    let path = dir.join("doc.json");
    fs::write(&path, DOCUMENT).unwrap();
    let dot = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
    dot.save_with_format(dir.join("dot.png"), ImageFormat::Png)
        .unwrap();
    path
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_document_resolves_images_next_to_it() {
    let dir = scratch("load");
    let path = write_document(&dir);

    let block = load_document(&path, StyleTable::default()).unwrap();
    let Block::Stack(stack) = &block else {
        panic!("expected a stack");
    };
    assert_eq!(stack.children().len(), 2);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_document_is_an_io_error() {
    let err = load_document(&PathBuf::from("/nonexistent/doc.json"), StyleTable::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/doc.json"));
}

#[test]
fn test_malformed_document_is_a_json_error() {
    let dir = scratch("malformed");
    let path = dir.join("doc.json");
    fs::write(&path, r#"{"kind": "document""#).unwrap();
    let err = load_document(&path, StyleTable::default()).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_image_is_a_compile_error() {
    let dir = scratch("noimage");
    let path = dir.join("doc.json");
    fs::write(&path, DOCUMENT).unwrap();
    let err = load_document(&path, StyleTable::default()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Compile(CompileError::Image { ref src, .. }) if src == "dot.png"
    ));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_styles_override() {
    let dir = scratch("styles");
    let path = dir.join("styles.json");
    fs::write(&path, r##"{"text_color": "#101010"}"##).unwrap();
    let styles = load_styles(&path).unwrap();
    assert_eq!(styles.text_color, Color::rgb(16, 16, 16));
    assert_eq!(styles.headings, StyleTable::default().headings);
    fs::remove_dir_all(&dir).unwrap();
}

// ---------------------------------------------------------------------------
// Rendering (needs an installed system font)
// ---------------------------------------------------------------------------

#[test]
fn test_render_viewport_paints_text_and_images() {
    let mut faces = FontdueFaceSelector::new();
    if !faces.has_fonts() {
        return;
    }
    let dir = scratch("render");
    let path = write_document(&dir);
    let block = load_document(&path, StyleTable::default()).unwrap();

    let viewport = Viewport {
        width: 320,
        height: 200,
        ..Viewport::default()
    };
    let renderer = render_viewport(&block, &mut faces, &viewport).unwrap();
    let buffer = renderer.buffer();
    assert_eq!(buffer.dimensions(), (320, 200));
    assert!(buffer.pixels().any(|p| *p == Rgba([0, 255, 0, 255])));
    assert!(buffer.pixels().any(|p| p[0] > 128));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_scroll_shifts_every_command_up() {
    let mut faces = FontdueFaceSelector::new();
    if !faces.has_fonts() {
        return;
    }
    let dir = scratch("scroll");
    let path = write_document(&dir);
    let block = load_document(&path, StyleTable::default()).unwrap();

    let top = Viewport::default();
    let scrolled = Viewport {
        scroll_y: 25,
        ..top
    };
    let (tree, at_top) = layout_viewport(&block, &mut faces, &top).unwrap();
    let (_, at_scroll) = layout_viewport(&block, &mut faces, &scrolled).unwrap();
    assert!(tree.bounds().height() > 0);

    let ys = |list: &whynot_layout::DisplayList| -> Vec<i32> {
        list.commands()
            .iter()
            .map(|c| match c {
                DisplayCommand::DrawText { y, .. } | DisplayCommand::DrawImage { y, .. } => *y,
            })
            .collect()
    };
    let shifted: Vec<i32> = ys(&at_top).iter().map(|y| y - 25).collect();
    assert_eq!(ys(&at_scroll), shifted);

    fs::remove_dir_all(&dir).unwrap();
}
