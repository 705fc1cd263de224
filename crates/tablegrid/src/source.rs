use image::DynamicImage;
use tablegrid_core::{Token, WordOptions};

use crate::error::SourceError;

/// Default rasterization resolution.
pub const DEFAULT_DPI: f32 = 300.0;

/// A paged document that can supply text tokens and page rasters.
///
/// Page indices are 0-based. Sizes and token coordinates are in document
/// units with a top-left origin; rendered images may use any resolution,
/// the pipeline derives the scale from the two sizes.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Page `(width, height)` in document units.
    fn page_size(&self, index: usize) -> Result<(f64, f64), SourceError>;

    /// Word tokens of a page, numbered with the 1-based page number.
    fn page_tokens(&self, index: usize, options: &WordOptions) -> Result<Vec<Token>, SourceError>;

    /// Rasterize a page at `dpi` dots per inch.
    fn render_page(&self, index: usize, dpi: f32) -> Result<DynamicImage, SourceError>;

    /// Fail with [`SourceError::PageOutOfRange`] unless `index` exists.
    fn check_index(&self, index: usize) -> Result<(), SourceError> {
        let count = self.page_count();
        if index >= count {
            return Err(SourceError::PageOutOfRange { index, count });
        }
        Ok(())
    }
}
