//! Error types for page sources and export.
//!
//! Uses [`thiserror`] for backend failures. [`SourceError`] converts into the
//! core [`GridError`] so callers deal with a single fatal error type.

use tablegrid_core::GridError;
use thiserror::Error;

/// Error type for page sources (document loading, text, rendering) and export.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The pdfium shared library could not be bound.
    #[error("failed to bind pdfium library: {0}")]
    Bind(String),

    /// The document or image could not be opened.
    #[error("cannot open {path}: {message}")]
    Open { path: String, message: String },

    /// A page index outside the source.
    #[error("page index {index} out of range (source has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Text could not be extracted from a page.
    #[error("text extraction failed on page {page}: {message}")]
    Text { page: usize, message: String },

    /// A page could not be rasterized.
    #[error("failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    /// A token sidecar file is malformed.
    #[error("invalid token sidecar: {0}")]
    Sidecar(#[from] serde_json::Error),

    /// Writing CSV output failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the workbook failed.
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SourceError> for GridError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Io(e) => GridError::IoError(e.to_string()),
            SourceError::Csv(e) => GridError::IoError(e.to_string()),
            other => GridError::SourceError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_message() {
        let err = SourceError::Open {
            path: "missing.pdf".to_string(),
            message: "file not found".to_string(),
        };
        assert_eq!(err.to_string(), "cannot open missing.pdf: file not found");
    }

    #[test]
    fn page_out_of_range_message() {
        let err = SourceError::PageOutOfRange { index: 4, count: 2 };
        assert_eq!(
            err.to_string(),
            "page index 4 out of range (source has 2 pages)"
        );
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SourceError = io_err.into();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn converts_to_grid_error() {
        let grid: GridError = SourceError::Bind("no libpdfium".to_string()).into();
        assert_eq!(
            grid,
            GridError::SourceError("failed to bind pdfium library: no libpdfium".to_string())
        );

        let io: GridError = SourceError::Io(std::io::Error::other("disk full")).into();
        assert!(matches!(io, GridError::IoError(_)));
    }

    #[test]
    fn xlsx_error_is_source_error() {
        let mut sheet = rust_xlsxwriter::Worksheet::new();
        let Err(xlsx) = sheet.set_name("x".repeat(40)) else {
            panic!("sheet name over 31 characters accepted");
        };
        let err: SourceError = xlsx.into();
        assert!(err.to_string().starts_with("spreadsheet error"));
        assert!(matches!(GridError::from(err), GridError::SourceError(_)));
    }

    #[test]
    fn sidecar_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: SourceError = json_err.into();
        assert!(err.to_string().starts_with("invalid token sidecar"));
    }
}
