//! The rendering context threaded through every layout call.

use crate::metrics::FontMetrics;
use crate::style::Margins;

/// Device scale plus the measurement provider, borrowed for one layout pass.
///
/// Blocks store margins in device-independent pixels; the context scales
/// them. The provider is reached through `&mut` because resolving a style
/// may populate its face cache.
pub struct RenderingContext<'a> {
    scale: f32,
    metrics: &'a mut dyn FontMetrics,
}

impl<'a> RenderingContext<'a> {
    /// Create a context, pushing `scale` into the provider so it can drop
    /// faces built for a previous scale.
    pub fn new(metrics: &'a mut dyn FontMetrics, scale: f32) -> Self {
        metrics.set_scale(scale);
        Self { scale, metrics }
    }

    /// Device scale factor.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Margins converted to device pixels.
    #[must_use]
    pub fn scale_margins(&self, margins: Margins) -> Margins {
        margins.scaled(self.scale)
    }

    /// The measurement provider.
    pub fn metrics(&mut self) -> &mut dyn FontMetrics {
        &mut *self.metrics
    }
}

impl std::fmt::Debug for RenderingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingContext")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}
