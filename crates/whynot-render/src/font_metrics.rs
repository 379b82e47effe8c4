//! Font metrics backed by fontdue system fonts.
//!
//! [`FontdueFaceSelector`] is the production [`FontMetrics`] provider. It
//! loads one system font per [`FaceVariant`] (family, slant and weight) on
//! first use and sizes it per style as `size × scale`. Faces are cached in
//! a [`FaceCache`], so a scale change drops every face at once.
//!
//! Variants without an installed font fall back, in order, to the regular
//! weight of the same family and slant, to the proportional family, and
//! finally to the proportional regular face. Each fallback is reported once
//! via [`warn_once`].

use std::collections::HashMap;
use std::rc::Rc;

use fontdue::{Font, FontSettings};
use whynot_common::warning::warn_once;
use whynot_layout::{
    FaceCache, FaceId, FaceVariant, FontFamily, FontMetrics, FontSlant, FontWeight, LayoutError,
    Rect, TextStyle,
};

const SANS_REGULAR: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
];

const SANS_BOLD: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
];

const SANS_ITALIC: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
];

const SANS_BOLD_ITALIC: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
];

const MONO_REGULAR: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
];

const MONO_BOLD: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Courier New Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMonoBold.ttf",
];

const MONO_ITALIC: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Courier New Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMonoOblique.ttf",
];

const MONO_BOLD_ITALIC: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Courier New Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMonoBoldOblique.ttf",
];

/// Filesystem paths searched for a variant, most preferred first.
///
/// Small caps and medium weights are rarely installed as separate files;
/// they have no paths and always take the fallback route.
fn search_paths(variant: FaceVariant) -> &'static [&'static str] {
    let bold = variant.weight == FontWeight::BOLD;
    let italic = variant.slant == FontSlant::Italic;
    if variant.weight == FontWeight::MEDIUM {
        return &[];
    }
    match (variant.family, bold, italic) {
        (FontFamily::Proportional, false, false) => SANS_REGULAR,
        (FontFamily::Proportional, true, false) => SANS_BOLD,
        (FontFamily::Proportional, false, true) => SANS_ITALIC,
        (FontFamily::Proportional, true, true) => SANS_BOLD_ITALIC,
        (FontFamily::Monospace, false, false) => MONO_REGULAR,
        (FontFamily::Monospace, true, false) => MONO_BOLD,
        (FontFamily::Monospace, false, true) => MONO_ITALIC,
        (FontFamily::Monospace, true, true) => MONO_BOLD_ITALIC,
        (FontFamily::SmallCaps, ..) => &[],
    }
}

/// Variants tried for `variant`, in order, without duplicates.
fn fallback_chain(variant: FaceVariant) -> Vec<FaceVariant> {
    let regular_weight = FaceVariant {
        weight: if variant.weight == FontWeight::MEDIUM {
            FontWeight::NORMAL
        } else {
            variant.weight
        },
        ..variant
    };
    let candidates = [
        variant,
        regular_weight,
        FaceVariant {
            family: FontFamily::Proportional,
            ..regular_weight
        },
        FaceVariant {
            family: FontFamily::Proportional,
            slant: FontSlant::Normal,
            weight: FontWeight::NORMAL,
        },
    ];
    let mut chain: Vec<FaceVariant> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !chain.contains(&candidate) {
            chain.push(candidate);
        }
    }
    chain
}

/// Loaded fonts by variant. A `None` entry records a variant that was
/// searched for and not found.
#[derive(Default)]
struct FontLibrary {
    fonts: HashMap<FaceVariant, Option<Rc<Font>>>,
}

impl FontLibrary {
    fn font_for(&mut self, variant: FaceVariant) -> Option<Rc<Font>> {
        let chain = fallback_chain(variant);
        for candidate in &chain {
            let font = self
                .fonts
                .entry(*candidate)
                .or_insert_with(|| load_font_from_paths(search_paths(*candidate)).map(Rc::new));
            if let Some(font) = font {
                if *candidate != variant {
                    warn_once(
                        "fonts",
                        &format!("no font installed for {variant:?}; using {candidate:?}"),
                    );
                }
                return Some(Rc::clone(font));
            }
        }
        None
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            return Some(font);
        }
    }
    None
}

/// A font sized for one style at one scale.
#[derive(Clone)]
pub struct FontdueFace {
    font: Rc<Font>,
    px: f32,
}

impl FontdueFace {
    /// The font.
    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Pixel size the font is rasterized at.
    #[must_use]
    pub const fn px(&self) -> f32 {
        self.px
    }
}

impl std::fmt::Debug for FontdueFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFace")
            .field("px", &self.px)
            .finish_non_exhaustive()
    }
}

/// [`FontMetrics`] provider backed by fontdue and the system's fonts.
pub struct FontdueFaceSelector {
    library: FontLibrary,
    cache: FaceCache<FontdueFace>,
}

impl FontdueFaceSelector {
    /// A selector at scale 1 that loads fonts from the system on demand.
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: FontLibrary::default(),
            cache: FaceCache::new(1.0),
        }
    }

    /// Use `font` for `variant` instead of searching the system.
    pub fn register(&mut self, variant: FaceVariant, font: Font) {
        let _ = self.library.fonts.insert(variant, Some(Rc::new(font)));
        self.cache.invalidate();
    }

    /// Whether any font at all is available, i.e. whether the proportional
    /// regular face resolves.
    #[must_use]
    pub fn has_fonts(&mut self) -> bool {
        self.library
            .font_for(TextStyle::default().variant())
            .is_some()
    }

    /// The sized face behind a handle returned by [`FontMetrics::resolve`].
    ///
    /// # Errors
    ///
    /// [`LayoutError::StaleFace`] if the handle predates a scale change.
    pub fn face(&self, id: FaceId) -> Result<&FontdueFace, LayoutError> {
        self.cache.get(id)
    }
}

impl Default for FontdueFaceSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontdueFaceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFaceSelector")
            .field("scale", &self.cache.scale())
            .field("faces", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl FontMetrics for FontdueFaceSelector {
    fn resolve(&mut self, style: &TextStyle) -> Result<FaceId, LayoutError> {
        let library = &mut self.library;
        self.cache.get_or_insert_with(style, |style, scale| {
            let font = library
                .font_for(style.variant())
                .ok_or(LayoutError::UnmappedStyle { style: *style })?;
            Ok(FontdueFace {
                font,
                px: style.size * scale,
            })
        })
    }

    fn ink_bounds_and_advance(&self, face: FaceId, text: &str) -> Result<(Rect, i32), LayoutError> {
        let face = self.cache.get(face)?;

        // Uses Font::metrics() instead of Font::rasterize() to avoid
        // generating bitmaps when only measurements are needed.
        let mut pen = 0.0_f32;
        let mut ink: Option<(f32, f32, i32, i32)> = None;
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let metrics = face.font.metrics(ch, face.px);
            if metrics.width > 0 && metrics.height > 0 {
                let left = pen + metrics.xmin as f32;
                let right = left + metrics.width as f32;
                // fontdue's y axis points up; the layout's points down.
                let top = -(metrics.ymin + metrics.height as i32);
                let bottom = -metrics.ymin;
                ink = Some(match ink {
                    None => (left, right, top, bottom),
                    Some((l, r, t, b)) => (l.min(left), r.max(right), t.min(top), b.max(bottom)),
                });
            }
            pen += metrics.advance_width;
        }

        let advance = pen.ceil() as i32;
        let bounds = ink.map_or(Rect::EMPTY, |(left, right, top, bottom)| {
            Rect::new(left.floor() as i32, top, right.ceil() as i32, bottom)
        });
        Ok((bounds, advance))
    }

    fn space_advance(&self, face: FaceId) -> Result<i32, LayoutError> {
        let face = self.cache.get(face)?;
        Ok(face.font.metrics(' ', face.px).advance_width.ceil() as i32)
    }

    fn vertical_metrics(&self, face: FaceId) -> Result<(i32, i32), LayoutError> {
        let face = self.cache.get(face)?;
        Ok(face.font.horizontal_line_metrics(face.px).map_or_else(
            // Fonts without a horizontal header: split a 1.2× line 80/20.
            || ((face.px * 0.96).ceil() as i32, (face.px * 0.24).ceil() as i32),
            // fontdue reports descent as a negative offset.
            |line| (line.ascent.ceil() as i32, (-line.descent).ceil() as i32),
        ))
    }

    fn scale(&self) -> f32 {
        self.cache.scale()
    }

    fn set_scale(&mut self, scale: f32) {
        self.cache.set_scale(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_chain_ends_at_regular_sans() {
        let chain = fallback_chain(FaceVariant {
            family: FontFamily::SmallCaps,
            slant: FontSlant::Italic,
            weight: FontWeight::MEDIUM,
        });
        assert_eq!(
            chain,
            [
                FaceVariant {
                    family: FontFamily::SmallCaps,
                    slant: FontSlant::Italic,
                    weight: FontWeight::MEDIUM,
                },
                FaceVariant {
                    family: FontFamily::SmallCaps,
                    slant: FontSlant::Italic,
                    weight: FontWeight::NORMAL,
                },
                FaceVariant {
                    family: FontFamily::Proportional,
                    slant: FontSlant::Italic,
                    weight: FontWeight::NORMAL,
                },
                FaceVariant {
                    family: FontFamily::Proportional,
                    slant: FontSlant::Normal,
                    weight: FontWeight::NORMAL,
                },
            ]
        );
    }

    #[test]
    fn test_regular_sans_has_no_fallbacks() {
        let regular = TextStyle::default().variant();
        assert_eq!(fallback_chain(regular), [regular]);
    }

    #[test]
    fn test_small_caps_and_medium_are_never_searched() {
        let mut variant = TextStyle::default().with_family(FontFamily::SmallCaps).variant();
        assert!(search_paths(variant).is_empty());
        variant = TextStyle::default().with_weight(FontWeight::MEDIUM).variant();
        assert!(search_paths(variant).is_empty());
    }

    /// Only meaningful where a system font is installed.
    #[test]
    fn test_system_font_measures_consistently() {
        let mut selector = FontdueFaceSelector::new();
        if !selector.has_fonts() {
            return;
        }
        let face = selector.resolve(&TextStyle::new(16.0)).unwrap();
        let (ascent, descent) = selector.vertical_metrics(face).unwrap();
        assert!(ascent > 0 && descent >= 0);

        let (ink, advance) = selector.ink_bounds_and_advance(face, "Hello").unwrap();
        assert!(advance > 0);
        assert!(ink.width() <= advance + 2);
        assert!(selector.space_advance(face).unwrap() > 0);

        selector.set_scale(2.0);
        assert!(matches!(
            selector.space_advance(face),
            Err(LayoutError::StaleFace(_))
        ));
        let doubled = selector.resolve(&TextStyle::new(16.0)).unwrap();
        let (_, doubled_advance) = selector.ink_bounds_and_advance(doubled, "Hello").unwrap();
        assert!((doubled_advance - 2 * advance).abs() <= 2);
    }
}
