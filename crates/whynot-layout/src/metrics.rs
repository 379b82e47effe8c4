//! Font metrics interface for text measurement during layout.
//!
//! Layout never touches font files. It asks a [`FontMetrics`] provider to
//! resolve a [`TextStyle`] into a [`FaceId`] and then queries that face for
//! ink boxes, advances and vertical metrics. Providers keep resolved faces
//! in a [`FaceCache`] keyed by style, which is dropped wholesale whenever the
//! device scale changes since every cached size depends on it.

use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::style::{FontFamily, TextStyle};
use std::collections::HashMap;

/// Handle to a face resolved by a [`FontMetrics`] provider.
///
/// Handles carry the cache generation they were issued in, so a handle that
/// outlives a scale change is detected instead of silently measuring with
/// the wrong face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceId {
    generation: u32,
    index: u32,
}

/// Measurement provider consumed by the inline model.
///
/// All lengths are device pixels, already multiplied by the provider's scale.
pub trait FontMetrics {
    /// Resolve a style into a face, loading and caching it on first use.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnmappedStyle`] when no face exists for the style's
    /// variant, [`LayoutError::Measurement`] when font data fails to load.
    fn resolve(&mut self, style: &TextStyle) -> Result<FaceId, LayoutError>;

    /// Tight horizontal ink extent of `text` (which may start left of the
    /// pen, i.e. `min.x < 0`) and its advance.
    ///
    /// Only the horizontal edges of the returned rectangle are meaningful.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] for a handle from an invalidated cache.
    fn ink_bounds_and_advance(&self, face: FaceId, text: &str) -> Result<(Rect, i32), LayoutError>;

    /// Advance of a single space in this face.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] for a handle from an invalidated cache.
    fn space_advance(&self, face: FaceId) -> Result<i32, LayoutError>;

    /// `(ascent, descent)` of the face, both non-negative.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] for a handle from an invalidated cache.
    fn vertical_metrics(&self, face: FaceId) -> Result<(i32, i32), LayoutError>;

    /// Current device scale factor.
    fn scale(&self) -> f32;

    /// Change the device scale factor. Invalidates every resolved face if the
    /// factor differs from the current one.
    fn set_scale(&mut self, scale: f32);
}

/// Style → face cache owned by a [`FontMetrics`] provider.
#[derive(Debug)]
pub struct FaceCache<T> {
    generation: u32,
    scale: f32,
    faces: Vec<T>,
    by_style: HashMap<TextStyle, FaceId>,
    misses: usize,
}

impl<T> FaceCache<T> {
    /// An empty cache for the given scale.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self {
            generation: 0,
            scale,
            faces: Vec::new(),
            by_style: HashMap::new(),
            misses: 0,
        }
    }

    /// Scale the cached faces were built for.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Switch to a new scale, invalidating everything if it changed.
    pub fn set_scale(&mut self, scale: f32) {
        if scale.to_bits() != self.scale.to_bits() {
            self.scale = scale;
            self.invalidate();
        }
    }

    /// Drop every resolved face. Handles issued before this call become stale.
    pub fn invalidate(&mut self) {
        self.faces.clear();
        self.by_style.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Look up `style`, building its face with `build` on a miss.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns; nothing is cached in that case.
    pub fn get_or_insert_with(
        &mut self,
        style: &TextStyle,
        build: impl FnOnce(&TextStyle, f32) -> Result<T, LayoutError>,
    ) -> Result<FaceId, LayoutError> {
        if let Some(id) = self.by_style.get(style) {
            return Ok(*id);
        }
        let face = build(style, self.scale)?;
        self.misses += 1;
        let id = FaceId {
            generation: self.generation,
            index: self.faces.len() as u32,
        };
        self.faces.push(face);
        let _ = self.by_style.insert(*style, id);
        Ok(id)
    }

    /// The face behind a handle.
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] if the handle predates the last invalidation.
    pub fn get(&self, id: FaceId) -> Result<&T, LayoutError> {
        if id.generation != self.generation {
            return Err(LayoutError::StaleFace(id));
        }
        self.faces
            .get(id.index as usize)
            .ok_or(LayoutError::StaleFace(id))
    }

    /// Number of faces built since the cache was created.
    #[must_use]
    pub const fn misses(&self) -> usize {
        self.misses
    }

    /// Number of faces currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A face of [`ApproximateFontMetrics`]: its pixel size.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateFace {
    px: f32,
}

/// Approximate font metrics using fixed ratios.
///
/// Without access to actual font data, every glyph is assumed to be the
/// same width: the average advance of Latin glyphs in a proportional font is
/// approximately 0.6× the font size. The ascent and descent split a 1.2×
/// line height 80/20.
///
/// This is used as a fallback when no font is available, and in tests. All
/// ratios are configurable so tests can dial in exact pixel widths.
#[derive(Debug)]
pub struct ApproximateFontMetrics {
    char_width_ratio: f32,
    space_width_ratio: f32,
    ascent_ratio: f32,
    descent_ratio: f32,
    families: Vec<FontFamily>,
    cache: FaceCache<ApproximateFace>,
}

impl ApproximateFontMetrics {
    /// Default ratios at scale 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            char_width_ratio: 0.6,
            space_width_ratio: 0.3,
            ascent_ratio: 0.96,
            descent_ratio: 0.24,
            families: vec![
                FontFamily::Proportional,
                FontFamily::Monospace,
                FontFamily::SmallCaps,
            ],
            cache: FaceCache::new(1.0),
        }
    }

    /// Override the glyph and space advance ratios.
    #[must_use]
    pub const fn with_widths(mut self, char_width_ratio: f32, space_width_ratio: f32) -> Self {
        self.char_width_ratio = char_width_ratio;
        self.space_width_ratio = space_width_ratio;
        self
    }

    /// Override the ascent and descent ratios.
    #[must_use]
    pub const fn with_vertical(mut self, ascent_ratio: f32, descent_ratio: f32) -> Self {
        self.ascent_ratio = ascent_ratio;
        self.descent_ratio = descent_ratio;
        self
    }

    /// Restrict the families that resolve; any other family is unmapped.
    #[must_use]
    pub fn with_families(mut self, families: &[FontFamily]) -> Self {
        self.families = families.to_vec();
        self
    }

    /// Number of faces built so far (cache misses).
    #[must_use]
    pub const fn resolutions(&self) -> usize {
        self.cache.misses()
    }

    /// Number of faces currently cached.
    #[must_use]
    pub fn cached_faces(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached faces.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

impl Default for ApproximateFontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics for ApproximateFontMetrics {
    fn resolve(&mut self, style: &TextStyle) -> Result<FaceId, LayoutError> {
        if !self.families.contains(&style.family) {
            return Err(LayoutError::UnmappedStyle { style: *style });
        }
        self.cache.get_or_insert_with(style, |style, scale| {
            Ok(ApproximateFace {
                px: style.size * scale,
            })
        })
    }

    fn ink_bounds_and_advance(&self, face: FaceId, text: &str) -> Result<(Rect, i32), LayoutError> {
        let face = self.cache.get(face)?;
        let glyphs = text.chars().filter(|ch| !ch.is_control()).count() as f32;
        let advance = (glyphs * face.px * self.char_width_ratio).ceil() as i32;
        let (ascent, descent) = self.vertical_for(face);
        Ok((Rect::new(0, -ascent, advance, descent), advance))
    }

    fn space_advance(&self, face: FaceId) -> Result<i32, LayoutError> {
        let face = self.cache.get(face)?;
        Ok((face.px * self.space_width_ratio).ceil() as i32)
    }

    fn vertical_metrics(&self, face: FaceId) -> Result<(i32, i32), LayoutError> {
        let face = self.cache.get(face)?;
        Ok(self.vertical_for(face))
    }

    fn scale(&self) -> f32 {
        self.cache.scale()
    }

    fn set_scale(&mut self, scale: f32) {
        self.cache.set_scale(scale);
    }
}

impl ApproximateFontMetrics {
    fn vertical_for(&self, face: &ApproximateFace) -> (i32, i32) {
        (
            (face.px * self.ascent_ratio).ceil() as i32,
            (face.px * self.descent_ratio).ceil() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_cached_per_style() {
        let mut metrics = ApproximateFontMetrics::new();
        let a = metrics.resolve(&TextStyle::new(16.0)).unwrap();
        let b = metrics.resolve(&TextStyle::new(16.0)).unwrap();
        let c = metrics.resolve(&TextStyle::for_emphasis(2, 16.0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(metrics.resolutions(), 2);
    }

    #[test]
    fn test_scale_change_invalidates_eagerly() {
        let mut metrics = ApproximateFontMetrics::new().with_widths(1.0, 0.5);
        let face = metrics.resolve(&TextStyle::new(10.0)).unwrap();
        assert_eq!(metrics.space_advance(face).unwrap(), 5);

        metrics.set_scale(1.0);
        assert_eq!(metrics.cached_faces(), 1, "same scale keeps the cache");

        metrics.set_scale(2.0);
        assert_eq!(metrics.cached_faces(), 0);
        assert!(matches!(
            metrics.space_advance(face),
            Err(LayoutError::StaleFace(_))
        ));

        let face = metrics.resolve(&TextStyle::new(10.0)).unwrap();
        assert_eq!(metrics.space_advance(face).unwrap(), 10);
        assert_eq!(metrics.resolutions(), 2);
    }

    #[test]
    fn test_unmapped_family_is_an_error() {
        let mut metrics =
            ApproximateFontMetrics::new().with_families(&[FontFamily::Proportional]);
        let style = TextStyle::new(12.0).with_family(FontFamily::Monospace);
        assert!(matches!(
            metrics.resolve(&style),
            Err(LayoutError::UnmappedStyle { .. })
        ));
    }

    #[test]
    fn test_ink_box_spans_ascent_to_descent() {
        let mut metrics = ApproximateFontMetrics::new()
            .with_widths(1.0, 1.0)
            .with_vertical(0.8, 0.2);
        let face = metrics.resolve(&TextStyle::new(10.0)).unwrap();
        let (ink, advance) = metrics.ink_bounds_and_advance(face, "word").unwrap();
        assert_eq!(advance, 40);
        assert_eq!(ink, Rect::new(0, -8, 40, 2));
    }
}
