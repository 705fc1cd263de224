use crate::geometry::BBox;

/// A positioned piece of text (usually one word) on a page.
///
/// Coordinates are in document units with a top-left origin. Tokens are
/// immutable once a backend has produced them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// The text content.
    pub text: String,
    /// Bounding box of the token.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub bbox: BBox,
    /// 1-based page number the token belongs to.
    #[cfg_attr(feature = "serde", serde(default = "default_page"))]
    pub page: usize,
}

#[cfg(feature = "serde")]
fn default_page() -> usize {
    1
}

impl Token {
    pub fn new(text: impl Into<String>, bbox: BBox, page: usize) -> Self {
        Self {
            text: text.into(),
            bbox,
            page,
        }
    }

    /// Center point of the token's box.
    pub fn center(&self) -> (f64, f64) {
        self.bbox.center()
    }
}

/// A single character as reported by a text backend.
///
/// Glyphs are grouped into word [`Token`]s by
/// [`WordExtractor`](crate::words::WordExtractor).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    /// Text of the character (may be more than one code point for ligatures).
    pub text: String,
    /// Bounding box of the character.
    pub bbox: BBox,
}

impl Glyph {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }

    /// Whether the glyph is whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
