//! PDF page source backed by the pdfium library.
//!
//! [`PdfiumBackend`] owns the bound library; documents opened from it borrow
//! it, so a backend must outlive its [`PdfiumDocument`]s. Pages are loaded on
//! demand, one at a time.

use std::path::Path;

use image::DynamicImage;
use pdfium_render::prelude::*;
use tablegrid_core::{BBox, Glyph, Token, WordExtractor, WordOptions};

use crate::error::SourceError;
use crate::source::PageSource;

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// A bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind pdfium from the working directory, then from the system library path.
    pub fn bind() -> Result<Self, SourceError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| SourceError::Bind(e.to_string()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Bind pdfium from a specific library file or directory.
    pub fn bind_at(path: &Path) -> Result<Self, SourceError> {
        let library = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(path)
        } else {
            path.to_path_buf()
        };
        let bindings =
            Pdfium::bind_to_library(library).map_err(|e| SourceError::Bind(e.to_string()))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Open a PDF file, with an optional password.
    pub fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<PdfiumDocument<'a>, SourceError> {
        let doc = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(|e| SourceError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let count = usize::from(doc.pages().len());
        tracing::info!(path = %path.display(), pages = count, "opened PDF");
        Ok(PdfiumDocument { doc })
    }
}

/// An open PDF document.
pub struct PdfiumDocument<'a> {
    doc: PdfDocument<'a>,
}

impl PdfiumDocument<'_> {
    fn page(&self, index: usize) -> Result<PdfPage<'_>, SourceError> {
        self.check_index(index)?;
        let page_index = PdfPageIndex::try_from(index).map_err(|_| SourceError::PageOutOfRange {
            index,
            count: self.page_count(),
        })?;
        self.doc
            .pages()
            .get(page_index)
            .map_err(|e| SourceError::Open {
                path: format!("page {}", index + 1),
                message: e.to_string(),
            })
    }

    /// Per-character glyphs of a page, flipped to a top-left origin.
    fn glyphs(page: &PdfPage<'_>, page_number: usize) -> Result<Vec<Glyph>, SourceError> {
        let text_error = |e: PdfiumError| SourceError::Text {
            page: page_number,
            message: e.to_string(),
        };
        let page_height = f64::from(page.height().value);
        let text = page.text().map_err(text_error)?;

        let mut glyphs = Vec::new();
        for ch in text.chars().iter() {
            let Some(c) = ch.unicode_char() else {
                continue;
            };
            let bounds = ch.loose_bounds().map_err(text_error)?;
            let bbox = BBox::new(
                f64::from(bounds.left().value),
                page_height - f64::from(bounds.top().value),
                f64::from(bounds.right().value),
                page_height - f64::from(bounds.bottom().value),
            );
            glyphs.push(Glyph::new(c.to_string(), bbox));
        }
        Ok(glyphs)
    }
}

impl PageSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        usize::from(self.doc.pages().len())
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64), SourceError> {
        let page = self.page(index)?;
        Ok((f64::from(page.width().value), f64::from(page.height().value)))
    }

    fn page_tokens(&self, index: usize, options: &WordOptions) -> Result<Vec<Token>, SourceError> {
        let page = self.page(index)?;
        let page_number = index + 1;
        let glyphs = Self::glyphs(&page, page_number)?;
        let tokens = WordExtractor::extract(&glyphs, page_number, options);
        tracing::debug!(
            page = page_number,
            glyphs = glyphs.len(),
            tokens = tokens.len(),
            "extracted tokens"
        );
        Ok(tokens)
    }

    fn render_page(&self, index: usize, dpi: f32) -> Result<DynamicImage, SourceError> {
        let page = self.page(index)?;
        let scale = dpi / POINTS_PER_INCH;
        let width = (page.width().value * scale).round() as i32;
        let height = (page.height().value * scale).round() as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height),
            )
            .map_err(|e| SourceError::Render {
                page: index + 1,
                message: e.to_string(),
            })?;
        Ok(bitmap.as_image())
    }
}
