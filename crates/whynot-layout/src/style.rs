//! Style values consumed by layout: text styles, margins and colors.
//!
//! These are static configuration. A [`TextStyle`] doubles as the cache key
//! of a [`FontMetrics`](crate::FontMetrics) implementation, so it must be
//! hashable even though its size is a float.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Typeface family selected by a [`TextStyle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// Proportional body font.
    #[default]
    Proportional,
    /// Fixed-advance font for code.
    Monospace,
    /// Small-caps display font.
    SmallCaps,
}

/// Slant of a [`TextStyle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSlant {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Obliqued glyphs. Resolved to the italic face.
    Oblique,
}

impl FontSlant {
    /// The slant a face is actually selected by.
    #[must_use]
    pub const fn normalized(self) -> Self {
        match self {
            Self::Oblique | Self::Italic => Self::Italic,
            Self::Normal => Self::Normal,
        }
    }
}

/// Numeric font weight (400 = normal, 700 = bold).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Regular weight.
    pub const NORMAL: Self = Self(400);
    /// Medium weight.
    pub const MEDIUM: Self = Self(500);
    /// Bold weight.
    pub const BOLD: Self = Self(700);

    /// Snap to one of the three weights faces exist for.
    ///
    /// Anything up to normal is normal, anything up to medium is medium,
    /// everything heavier is bold.
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.0 <= Self::NORMAL.0 {
            Self::NORMAL
        } else if self.0 <= Self::MEDIUM.0 {
            Self::MEDIUM
        } else {
            Self::BOLD
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// An immutable text style: size, slant, weight and family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in device-independent pixels (scaled at face resolution).
    pub size: f32,
    /// Slant.
    pub slant: FontSlant,
    /// Weight.
    pub weight: FontWeight,
    /// Family.
    pub family: FontFamily,
}

/// Face variant a style resolves to, ignoring size.
///
/// Font providers load one font per variant and size it per style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVariant {
    /// Family.
    pub family: FontFamily,
    /// Normalized slant (never [`FontSlant::Oblique`]).
    pub slant: FontSlant,
    /// Normalized weight (normal, medium or bold).
    pub weight: FontWeight,
}

/// Slant/weight pairs selected by emphasis level, indexed by `level % 4`.
const EMPHASIS_STYLES: [(FontSlant, FontWeight); 4] = [
    (FontSlant::Normal, FontWeight::NORMAL),
    (FontSlant::Italic, FontWeight::NORMAL),
    (FontSlant::Normal, FontWeight::BOLD),
    (FontSlant::Italic, FontWeight::BOLD),
];

impl TextStyle {
    /// A regular proportional style of the given size.
    #[must_use]
    pub const fn new(size: f32) -> Self {
        Self {
            size,
            slant: FontSlant::Normal,
            weight: FontWeight::NORMAL,
            family: FontFamily::Proportional,
        }
    }

    /// The style selected by an accumulated emphasis level.
    ///
    /// Levels add up along nested emphasis (1 = italic, 2 = bold) and wrap
    /// modulo 4, so level 3 is bold italic and level 4 is normal again.
    #[must_use]
    pub const fn for_emphasis(level: u32, size: f32) -> Self {
        let (slant, weight) = EMPHASIS_STYLES[(level % 4) as usize];
        Self {
            size,
            slant,
            weight,
            family: FontFamily::Proportional,
        }
    }

    /// The same style in another family.
    #[must_use]
    pub const fn with_family(mut self, family: FontFamily) -> Self {
        self.family = family;
        self
    }

    /// The same style at another size.
    #[must_use]
    pub const fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// The same style at another weight.
    #[must_use]
    pub const fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// The face variant this style is rendered with.
    #[must_use]
    pub const fn variant(&self) -> FaceVariant {
        FaceVariant {
            family: self.family,
            slant: self.slant.normalized(),
            weight: self.weight.normalized(),
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        self.size.to_bits() == other.size.to_bits()
            && self.slant == other.slant
            && self.weight == other.weight
            && self.family == other.family
    }
}

impl Eq for TextStyle {}

impl Hash for TextStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.to_bits().hash(state);
        self.slant.hash(state);
        self.weight.hash(state);
        self.family.hash(state);
    }
}

/// Block margins in device-independent pixels.
///
/// Margins stay block-local until a
/// [`RenderingContext`](crate::RenderingContext) scales them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Space above the block.
    pub top: f32,
    /// Space below the block.
    pub bottom: f32,
    /// Indentation from the left edge.
    pub left: f32,
    /// Indentation from the right edge.
    pub right: f32,
}

impl Margins {
    /// No margins at all.
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };

    /// Vertical-only margins.
    #[must_use]
    pub const fn vertical(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            left: 0.0,
            right: 0.0,
        }
    }

    /// The same margins with a left indentation.
    #[must_use]
    pub const fn with_left(mut self, left: f32) -> Self {
        self.left = left;
        self
    }

    /// The same margins with a right indentation.
    #[must_use]
    pub const fn with_right(mut self, right: f32) -> Self {
        self.right = right;
        self
    }

    /// All four edges multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            top: self.top * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
            right: self.right * factor,
        }
    }

    /// Whether the block is indented from either side.
    #[must_use]
    pub fn is_indented(&self) -> bool {
        self.left > 0.0 || self.right > 0.0
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = fully opaque).
    pub a: u8,
}

impl Color {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        if c.a == 255 {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
    }
}
