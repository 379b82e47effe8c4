//! Document front end for the whynot layout engine.
//!
//! A markup parser hands over a [`Node`] tree (or its JSON form). The
//! [`DocumentCompiler`] turns it into a [`Block`](whynot_layout::Block)
//! tree, stamping on the margins and text styles of a [`StyleTable`].
//!
//! ```text
//! JSON ──serde──▶ Node ──DocumentCompiler + StyleTable──▶ Block
//! ```
//!
//! Markup parsing itself is out of scope: any parser that can emit the
//! tree works.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod style_table;

pub use ast::{Node, from_json};
pub use compiler::{DocumentCompiler, ImageSource, NoImages, compile};
pub use error::CompileError;
pub use style_table::{PartStyle, StyleTable};
