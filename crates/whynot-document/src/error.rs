//! Compile errors.

use thiserror::Error;
use whynot_layout::LayoutError;

/// Error raised while compiling a document tree into blocks.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A node of a kind the compiler has no block or inline for, or a known
    /// kind in a position that does not accept it.
    #[error("unsupported {position} node '{kind}'")]
    UnsupportedNode {
        /// Kind name of the node.
        kind: String,
        /// Where the node was found: `"block"`, `"inline"` or `"list"`.
        position: &'static str,
    },

    /// A list marker other than `-`, `+`, `*`, `.` or `)`.
    #[error("unsupported list marker '{0}'")]
    UnsupportedMarker(char),

    /// A heading level outside 1 to 6.
    #[error("heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(u8),

    /// Block construction failed, e.g. an empty document or list.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The image source could not provide an image.
    #[error("failed to load image '{src}': {reason}")]
    Image {
        /// The image's source path.
        src: String,
        /// Why loading failed.
        reason: String,
    },
}
