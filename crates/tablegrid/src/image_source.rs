//! Single-page source built from a raster image and a JSON token sidecar.
//!
//! The sidecar is an array of tokens, each
//! `{"text", "x0", "top", "x1", "bottom"}` with an optional `"page"`.
//! Coordinates are in the page's document units; when no page size is
//! given the image size is used, so tokens are taken to be in pixels.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::DynamicImage;
use tablegrid_core::{Token, WordOptions};

use crate::error::SourceError;
use crate::source::PageSource;

/// One page made of an already rendered image and its tokens.
#[derive(Debug, Clone)]
pub struct ImagePageSource {
    image: DynamicImage,
    tokens: Vec<Token>,
    page_size: (f64, f64),
}

impl ImagePageSource {
    /// Build a source from parts. `page_size` defaults to the image size.
    pub fn new(image: DynamicImage, tokens: Vec<Token>, page_size: Option<(f64, f64)>) -> Self {
        let page_size =
            page_size.unwrap_or((f64::from(image.width()), f64::from(image.height())));
        let tokens = tokens
            .into_iter()
            .map(|t| Token { page: 1, ..t })
            .collect();
        Self {
            image,
            tokens,
            page_size,
        }
    }

    /// Load an image file and an optional token sidecar.
    pub fn open(
        image_path: &Path,
        tokens_path: Option<&Path>,
        page_size: Option<(f64, f64)>,
    ) -> Result<Self, SourceError> {
        let image = image::open(image_path).map_err(|e| SourceError::Open {
            path: image_path.display().to_string(),
            message: e.to_string(),
        })?;
        let tokens = match tokens_path {
            Some(path) => read_tokens(path)?,
            None => Vec::new(),
        };
        tracing::info!(
            path = %image_path.display(),
            width = image.width(),
            height = image.height(),
            tokens = tokens.len(),
            "opened page image"
        );
        Ok(Self::new(image, tokens, page_size))
    }
}

/// Read a JSON token array from `path`.
pub fn read_tokens(path: &Path) -> Result<Vec<Token>, SourceError> {
    let file = File::open(path).map_err(|e| SourceError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

impl PageSource for ImagePageSource {
    fn page_count(&self) -> usize {
        1
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64), SourceError> {
        self.check_index(index)?;
        Ok(self.page_size)
    }

    /// Sidecar tokens are already words; `options` is not applied.
    fn page_tokens(&self, index: usize, _options: &WordOptions) -> Result<Vec<Token>, SourceError> {
        self.check_index(index)?;
        Ok(self.tokens.clone())
    }

    /// The stored image is returned as is, whatever the `dpi`.
    fn render_page(&self, index: usize, _dpi: f32) -> Result<DynamicImage, SourceError> {
        self.check_index(index)?;
        Ok(self.image.clone())
    }
}
