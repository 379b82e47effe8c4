//! Document tree → block tree.
//!
//! The compiler walks the tree depth first. Block nodes become blocks with
//! the margins of their part; inline nodes flatten into one word per
//! [`Inline`], styled by the emphasis level accumulated on the way down.
//!
//! ```text
//! document ─▶ Stack
//!   heading   ─▶ Text      (level offset 2: bold)
//!   paragraph ─▶ Text
//!   list      ─▶ Stack ─▶ ListItem ("1." marker first)
//!   code      ─▶ Code      (one unit per line)
//! ```

use std::rc::Rc;

use whynot_common::image::LoadedImage;
use whynot_layout::{
    Block, CodeBlock, Color, FontFamily, Inline, ListItemBlock, ListMarker, Margins, StackBlock,
    TextBlock, TextStyle,
};

use crate::ast::Node;
use crate::error::CompileError;
use crate::style_table::{PartStyle, StyleTable};

/// Provides decoded images for [`Node::Image`] sources.
///
/// The compiler never touches the file system; the host decides what a
/// source path means.
pub trait ImageSource {
    /// Load the image `src` refers to.
    ///
    /// # Errors
    ///
    /// A human-readable reason when the image is unavailable.
    fn load(&mut self, src: &str) -> Result<Rc<LoadedImage>, String>;
}

impl<F> ImageSource for F
where
    F: FnMut(&str) -> Result<Rc<LoadedImage>, String>,
{
    fn load(&mut self, src: &str) -> Result<Rc<LoadedImage>, String> {
        self(src)
    }
}

/// An image source that has no images: every image node fails to compile.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSource for NoImages {
    fn load(&mut self, _src: &str) -> Result<Rc<LoadedImage>, String> {
        Err("no image source configured".to_string())
    }
}

/// Compiles document trees with one style table and image source.
#[derive(Debug)]
pub struct DocumentCompiler<I = NoImages> {
    styles: StyleTable,
    images: I,
}

impl DocumentCompiler<NoImages> {
    /// A compiler without images.
    #[must_use]
    pub const fn new(styles: StyleTable) -> Self {
        Self {
            styles,
            images: NoImages,
        }
    }
}

impl<I: ImageSource> DocumentCompiler<I> {
    /// The same compiler resolving images through `images`.
    #[must_use]
    pub fn with_images<J: ImageSource>(self, images: J) -> DocumentCompiler<J> {
        DocumentCompiler {
            styles: self.styles,
            images,
        }
    }

    /// The style table in use.
    #[must_use]
    pub const fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Compile a document (or any single block node) into a block tree.
    ///
    /// # Errors
    ///
    /// The first unsupported node, bad marker or heading level, failing
    /// image, or empty stack found.
    pub fn compile(&mut self, node: &Node) -> Result<Block, CompileError> {
        self.compile_block(node)
    }

    fn compile_document(&mut self, children: &[Node]) -> Result<Block, CompileError> {
        let blocks = children
            .iter()
            .map(|child| self.compile_block(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block::Stack(StackBlock::new(blocks, Margins::ZERO)?))
    }

    fn compile_block(&mut self, node: &Node) -> Result<Block, CompileError> {
        match node {
            Node::Paragraph { children } | Node::TextBlock { children } => {
                let part = self.styles.paragraph;
                let inlines = self.compile_inlines(children, &part)?;
                Ok(Block::Text(TextBlock::new(inlines, part.margins)))
            }
            Node::Heading { level, children } => {
                let part = *self
                    .styles
                    .heading(*level)
                    .ok_or(CompileError::InvalidHeadingLevel(*level))?;
                let inlines = self.compile_inlines(children, &part)?;
                Ok(Block::Text(TextBlock::new(inlines, part.margins)))
            }
            Node::List {
                marker,
                start,
                items,
            } => self.compile_list(*marker, *start, items),
            Node::CodeBlock { lines, .. } => {
                let part = self.styles.code_block;
                let color = self.styles.code_color;
                let lines = lines
                    .iter()
                    .map(|line| Inline::text(line.trim_end(), part.text, color))
                    .collect();
                Ok(Block::Code(CodeBlock::new(lines, part.margins)))
            }
            Node::Document { children } => self.compile_document(children),
            other => Err(unsupported(other, "block")),
        }
    }

    fn compile_list(
        &mut self,
        marker: char,
        start: usize,
        items: &[Node],
    ) -> Result<Block, CompileError> {
        let marker = ListMarker::from_char(marker).ok_or(CompileError::UnsupportedMarker(marker))?;
        let blocks = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.compile_list_item(item, &marker.label(start + i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Block::Stack(StackBlock::new(blocks, self.styles.list.margins)?))
    }

    fn compile_list_item(&mut self, node: &Node, label: &str) -> Result<Block, CompileError> {
        let Node::ListItem { children } = node else {
            return Err(unsupported(node, "list"));
        };
        let part = self.styles.list_item;
        let marker = Inline::text(
            label,
            inline_style(&part, part.level_offset),
            self.styles.text_color,
        );

        // A tight item holds a text block, a loose one a paragraph. Nested
        // blocks after the text have no layout.
        let inlines = match children.as_slice() {
            [] => Vec::new(),
            [Node::TextBlock { children } | Node::Paragraph { children }] => {
                self.compile_inlines(children, &part)?
            }
            [Node::TextBlock { .. } | Node::Paragraph { .. }, extra, ..] => {
                return Err(unsupported(extra, "list"));
            }
            [first, ..] => return Err(unsupported(first, "list")),
        };
        Ok(Block::ListItem(ListItemBlock::new(
            marker,
            inlines,
            part.margins,
        )))
    }

    fn compile_inlines(
        &mut self,
        children: &[Node],
        part: &PartStyle,
    ) -> Result<Vec<Inline>, CompileError> {
        let mut inlines = Vec::new();
        for child in children {
            self.append_inline(&mut inlines, child, part, part.level_offset)?;
        }
        Ok(inlines)
    }

    fn append_inline(
        &mut self,
        out: &mut Vec<Inline>,
        node: &Node,
        part: &PartStyle,
        level: u32,
    ) -> Result<(), CompileError> {
        match node {
            Node::Text { text } => {
                let style = inline_style(part, level);
                append_words(out, text, style, self.styles.text_color);
            }
            Node::CodeSpan { text } => {
                let style = inline_style(part, level).with_family(FontFamily::Monospace);
                append_words(out, text, style, self.styles.code_color);
            }
            Node::Emphasis {
                level: extra,
                children,
            } => {
                let level = level.wrapping_add(*extra);
                for child in children {
                    self.append_inline(out, child, part, level)?;
                }
            }
            Node::Image { src, alt } => {
                let image = self
                    .images
                    .load(src)
                    .map_err(|reason| CompileError::Image {
                        src: src.clone(),
                        reason,
                    })?;
                out.push(Inline::image(image, alt.as_str()));
            }
            other => return Err(unsupported(other, "inline")),
        }
        Ok(())
    }
}

/// Compile `node` with `styles` and no images.
///
/// # Errors
///
/// See [`DocumentCompiler::compile`].
pub fn compile(node: &Node, styles: StyleTable) -> Result<Block, CompileError> {
    DocumentCompiler::new(styles).compile(node)
}

/// Slant and weight from the emphasis level; size and family from the part.
const fn inline_style(part: &PartStyle, level: u32) -> TextStyle {
    TextStyle::for_emphasis(level, part.text.size).with_family(part.text.family)
}

fn append_words(out: &mut Vec<Inline>, text: &str, style: TextStyle, color: Color) {
    out.extend(
        text.split_whitespace()
            .map(|word| Inline::text(word, style, color)),
    );
}

fn unsupported(node: &Node, position: &'static str) -> CompileError {
    CompileError::UnsupportedNode {
        kind: node.kind().to_string(),
        position,
    }
}
