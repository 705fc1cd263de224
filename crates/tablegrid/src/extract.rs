//! Document-level driver: pulls pages out of a [`PageSource`] one at a time
//! and runs the core pipeline on each.
//!
//! Per-page failures never abort the run. A page whose text cannot be read is
//! processed without text, a page that cannot be rendered or has no usable
//! size is skipped; each case is recorded as an [`ExtractWarning`].

use tablegrid_core::{
    ExtractResult, ExtractWarning, ExtractWarningCode, GridError, PageInput, TableExtractor,
    TableRecord, WordOptions,
};

use crate::source::{DEFAULT_DPI, PageSource};

/// Options for pulling pages out of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Rasterization resolution in dots per inch.
    pub dpi: f32,
    /// Glyph-to-word grouping for backends that report characters.
    pub words: WordOptions,
    /// 0-based page indices to process, in order. `None` means all pages.
    pub pages: Option<Vec<usize>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            words: WordOptions::default(),
            pages: None,
        }
    }
}

/// Extract every table of `source`.
///
/// `progress` is called with `(done, total)` before each page is processed.
///
/// # Errors
///
/// Returns [`GridError`] for invalid settings, a requested page index outside
/// the source, or, in strict mode, the first warning raised.
pub fn extract_tables<S>(
    source: &S,
    extractor: &TableExtractor,
    options: &ExtractOptions,
    mut progress: impl FnMut(usize, usize),
) -> Result<ExtractResult<Vec<TableRecord>>, GridError>
where
    S: PageSource + ?Sized,
{
    extractor.settings().validate()?;
    let indices: Vec<usize> = match &options.pages {
        Some(pages) => pages.clone(),
        None => (0..source.page_count()).collect(),
    };
    for &index in &indices {
        source.check_index(index)?;
    }

    let strict = extractor.settings().strict;
    let mut result = ExtractResult::ok(Vec::new());
    for (done, &index) in indices.iter().enumerate() {
        progress(done + 1, indices.len());
        let page_number = index + 1;
        tracing::info!(page = page_number, "processing page");

        let page = match load_page(source, index, options) {
            Ok((page, warning)) => {
                if let Some(warning) = warning {
                    result.warnings.push(warning.escalate(strict)?);
                }
                page
            }
            Err(warning) => {
                result.warnings.push(warning.escalate(strict)?);
                continue;
            }
        };

        match extractor.extract_page(&page) {
            Ok(page_result) => {
                result.value.extend(page_result.value);
                result.warnings.extend(page_result.warnings);
            }
            Err(GridError::InvalidPageSize { width, height }) => {
                tracing::warn!(page = page_number, width, height, "invalid page size, skipping");
                let warning = ExtractWarning::with_code(
                    ExtractWarningCode::InvalidPage,
                    format!("invalid page size {width} x {height}"),
                )
                .on_page(page_number);
                result.warnings.push(warning.escalate(strict)?);
            }
            Err(err) => return Err(err),
        }
    }

    tracing::info!(
        pages = indices.len(),
        tables = result.value.len(),
        warnings = result.warnings.len(),
        "extraction finished"
    );
    Ok(result)
}

/// Fetch one page's size, raster and tokens.
///
/// A text failure yields the page with no tokens plus a warning; a size or
/// render failure yields only the warning.
fn load_page<S>(
    source: &S,
    index: usize,
    options: &ExtractOptions,
) -> Result<(PageInput, Option<ExtractWarning>), ExtractWarning>
where
    S: PageSource + ?Sized,
{
    let page_number = index + 1;
    let (page_width, page_height) = source.page_size(index).map_err(|e| {
        tracing::warn!(page = page_number, error = %e, "cannot read page size, skipping");
        ExtractWarning::with_code(ExtractWarningCode::InvalidPage, e.to_string()).on_page(page_number)
    })?;
    let image = source.render_page(index, options.dpi).map_err(|e| {
        tracing::warn!(page = page_number, error = %e, "render failed, skipping");
        ExtractWarning::with_code(ExtractWarningCode::RenderFailed, e.to_string()).on_page(page_number)
    })?;

    let (tokens, warning) = match source.page_tokens(index, &options.words) {
        Ok(tokens) => (tokens, None),
        Err(e) => {
            tracing::error!(page = page_number, error = %e, "text extraction failed");
            let warning =
                ExtractWarning::with_code(ExtractWarningCode::TextExtractionFailed, e.to_string())
                    .on_page(page_number);
            (Vec::new(), Some(warning))
        }
    };

    Ok((
        PageInput {
            page_number,
            image,
            page_width,
            page_height,
            tokens,
        },
        warning,
    ))
}
