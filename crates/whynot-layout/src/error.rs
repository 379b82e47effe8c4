//! Layout errors.
//!
//! Every variant is a configuration defect or a deterministic measurement
//! failure: retrying the same layout with the same inputs fails the same
//! way, so callers abort the pass and surface the error.

use crate::metrics::FaceId;
use crate::style::TextStyle;
use thiserror::Error;

/// Error raised while measuring or laying out blocks.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The style table names a style the measurement provider has no face for.
    #[error("no face is mapped for style {style:?}")]
    UnmappedStyle {
        /// The style that failed to resolve.
        style: TextStyle,
    },

    /// A stack block was built without children, leaving its margins undefined.
    #[error("stack block has no children")]
    EmptyStack,

    /// A face handle from before the last scale change was used.
    #[error("face handle {0:?} is stale (the face cache was invalidated)")]
    StaleFace(FaceId),

    /// The provider failed to load or parse font data.
    #[error("measurement failed: {0}")]
    Measurement(String),
}
