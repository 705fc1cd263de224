use crate::geometry::BBox;
use crate::token::{Glyph, Token};

/// Options for grouping glyphs into word tokens.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WordOptions {
    /// Maximum horizontal gap between glyphs of one word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between glyphs of one word.
    pub y_tolerance: f64,
    /// If true, blank glyphs are kept inside words instead of splitting them.
    pub keep_blank_chars: bool,
    /// If true, glyphs are taken in backend order instead of spatial order.
    pub use_text_flow: bool,
    /// If true, expand common Latin ligatures (U+FB00–U+FB06).
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            expand_ligatures: true,
        }
    }
}

/// Groups glyphs into word tokens based on spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Group `glyphs` of page `page` into word tokens.
    ///
    /// - Blank glyphs split words unless `keep_blank_chars` is set.
    /// - A horizontal gap wider than `x_tolerance` or a vertical offset
    ///   larger than `y_tolerance` starts a new word.
    /// - Glyphs are sorted top-to-bottom then left-to-right unless
    ///   `use_text_flow` is set.
    pub fn extract(glyphs: &[Glyph], page: usize, options: &WordOptions) -> Vec<Token> {
        let mut ordered: Vec<&Glyph> = glyphs.iter().collect();
        if !options.use_text_flow {
            ordered.sort_by(|a, b| {
                a.bbox
                    .top
                    .total_cmp(&b.bbox.top)
                    .then(a.bbox.x0.total_cmp(&b.bbox.x0))
            });
        }

        let mut words = Vec::new();
        let mut current: Vec<&Glyph> = Vec::new();

        for glyph in ordered {
            if glyph.is_blank() && !options.keep_blank_chars {
                if let Some(word) = Self::make_word(&current, page, options) {
                    words.push(word);
                }
                current.clear();
                continue;
            }

            if let Some(last) = current.last() {
                if Self::should_split(last, glyph, options) {
                    if let Some(word) = Self::make_word(&current, page, options) {
                        words.push(word);
                    }
                    current.clear();
                }
            }
            current.push(glyph);
        }

        if let Some(word) = Self::make_word(&current, page, options) {
            words.push(word);
        }
        words
    }

    /// Gap is the distance between x-intervals, zero when they overlap.
    fn should_split(last: &Glyph, current: &Glyph, options: &WordOptions) -> bool {
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        x_gap > options.x_tolerance || y_diff > options.y_tolerance
    }

    fn make_word(glyphs: &[&Glyph], page: usize, options: &WordOptions) -> Option<Token> {
        let bbox = glyphs
            .iter()
            .map(|g| g.bbox)
            .reduce(|a: BBox, b| a.union(&b))?;
        let raw: String = glyphs.iter().map(|g| g.text.as_str()).collect();
        let text = if options.expand_ligatures {
            expand_ligatures(&raw)
        } else {
            raw
        };
        Some(Token::new(text, bbox, page))
    }
}

fn expand_ligatures(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' => result.push_str("\u{017F}t"),
            '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}
