//! Per-part styles the compiler stamps onto blocks.
//!
//! The table is static configuration: built once, read by the compiler,
//! never consulted during layout. It deserializes from JSON with every
//! field optional, so an override file only names what it changes:
//!
//! ```json
//! { "paragraph": { "text": { "size": 18 } }, "text_color": "#202020" }
//! ```

use serde::{Deserialize, Serialize};
use whynot_layout::{Color, FontFamily, FontWeight, Margins, TextStyle};

/// Style of one document part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartStyle {
    /// Base text style. Emphasis picks slant and weight; size and family
    /// come from here.
    pub text: TextStyle,
    /// Block margins.
    pub margins: Margins,
    /// Emphasis level added to everything inside the part (2 = bold).
    pub level_offset: u32,
}

impl PartStyle {
    const fn heading(size: f32, top: f32) -> Self {
        Self {
            text: TextStyle::new(size).with_weight(FontWeight::BOLD),
            margins: Margins::vertical(top, 10.0),
            level_offset: 2,
        }
    }

    const fn with_family(mut self, family: FontFamily) -> Self {
        self.text = self.text.with_family(family);
        self
    }
}

/// Styles for every part the compiler produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    /// Paragraphs.
    pub paragraph: PartStyle,
    /// Items of a list, including the marker.
    pub list_item: PartStyle,
    /// The stack holding a list's items. Only its margins are used.
    pub list: PartStyle,
    /// Code blocks. Each line is one unit in this style.
    pub code_block: PartStyle,
    /// Headings, level 1 first.
    pub headings: [PartStyle; 6],
    /// Color of body text.
    pub text_color: Color,
    /// Color of code blocks and code spans.
    pub code_color: Color,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            paragraph: PartStyle {
                margins: Margins::vertical(10.0, 10.0),
                ..PartStyle::default()
            },
            list_item: PartStyle {
                margins: Margins::vertical(5.0, 5.0).with_left(20.0),
                ..PartStyle::default()
            },
            list: PartStyle {
                margins: Margins::vertical(10.0, 10.0),
                ..PartStyle::default()
            },
            code_block: PartStyle {
                text: TextStyle::new(14.0).with_family(FontFamily::Monospace),
                margins: Margins::vertical(10.0, 10.0).with_left(20.0),
                level_offset: 0,
            },
            headings: [
                PartStyle::heading(40.0, 30.0).with_family(FontFamily::SmallCaps),
                PartStyle::heading(36.0, 26.0),
                PartStyle::heading(32.0, 22.0),
                PartStyle::heading(28.0, 18.0),
                PartStyle::heading(24.0, 14.0),
                PartStyle::heading(20.0, 10.0),
            ],
            text_color: Color::WHITE,
            code_color: Color::WHITE,
        }
    }
}

impl StyleTable {
    /// Parse a table from JSON, filling unnamed fields with defaults.
    ///
    /// # Errors
    ///
    /// Malformed JSON or a field of the wrong type.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Style of a heading level, or `None` outside 1 to 6.
    #[must_use]
    pub fn heading(&self, level: u8) -> Option<&PartStyle> {
        let index = usize::from(level).checked_sub(1)?;
        self.headings.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_defaults() {
        let table = StyleTable::default();
        let sizes: Vec<u32> = table.headings.iter().map(|h| h.text.size as u32).collect();
        assert_eq!(sizes, [40, 36, 32, 28, 24, 20]);
        assert_eq!(table.heading(1).unwrap().text.family, FontFamily::SmallCaps);
        assert_eq!(table.heading(6).unwrap().margins, Margins::vertical(10.0, 10.0));
        assert!(table.heading(0).is_none());
        assert!(table.heading(7).is_none());
    }

    #[test]
    fn test_partial_override() {
        let table = StyleTable::from_json(
            r##"{"paragraph": {"text": {"size": 18}}, "code_color": "#ff8800"}"##,
        )
        .unwrap();
        assert_eq!(table.paragraph.text, TextStyle::new(18.0));
        // Fields missing from the override fall back to the part's own
        // defaults, not the table's.
        assert_eq!(table.paragraph.margins, Margins::ZERO);
        assert_eq!(table.list_item, StyleTable::default().list_item);
        assert_eq!(table.code_color, Color::rgb(0xff, 0x88, 0x00));
    }
}
