//! Error and warning types for tablegrid.
//!
//! Provides [`GridError`] for fatal errors that stop processing,
//! [`ExtractWarning`] for non-fatal issues that allow best-effort continuation
//! (a page without text, a table without cells), and [`ExtractResult`] for
//! pairing a value with collected warnings.

use std::fmt;

/// Fatal error types for table extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A page reported a non-positive or non-finite size.
    InvalidPageSize {
        /// Reported page width in document units.
        width: f64,
        /// Reported page height in document units.
        height: f64,
    },
    /// A setting is out of its valid range.
    InvalidSettings(String),
    /// The document or image source could not be opened or read.
    SourceError(String),
    /// I/O error reading input or writing output.
    IoError(String),
    /// A warning escalated to an error by strict mode.
    Strict(ExtractWarning),
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidPageSize { width, height } => {
                write!(f, "invalid page size: {width} x {height}")
            }
            GridError::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
            GridError::SourceError(msg) => write!(f, "source error: {msg}"),
            GridError::IoError(msg) => write!(f, "I/O error: {msg}"),
            GridError::Strict(warning) => write!(f, "strict mode: {warning}"),
            GridError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GridError {}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A detected table region produced no cells and was skipped.
    EmptyTable,
    /// Text tokens could not be extracted for a page; it was processed without text.
    TextExtractionFailed,
    /// A page could not be rasterized and was skipped.
    RenderFailed,
    /// A page reported an unusable size and was skipped.
    InvalidPage,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::EmptyTable => "EMPTY_TABLE",
            ExtractWarningCode::TextExtractionFailed => "TEXT_EXTRACTION_FAILED",
            ExtractWarningCode::RenderFailed => "RENDER_FAILED",
            ExtractWarningCode::InvalidPage => "INVALID_PAGE",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// 1-based page number where the warning occurred, if applicable.
    pub page: Option<usize>,
    /// 1-based table number on that page, if applicable.
    pub table: Option<usize>,
}

impl ExtractWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            table: None,
        }
    }

    /// Attach a page number (builder pattern).
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach a table number (builder pattern).
    pub fn on_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    /// Convert this warning into a [`GridError`].
    pub fn to_error(&self) -> GridError {
        GridError::Strict(self.clone())
    }

    /// Keep the warning, or fail with it when `strict` is set.
    pub fn escalate(self, strict: bool) -> Result<Self, GridError> {
        if strict {
            Err(GridError::Strict(self))
        } else {
            Ok(self)
        }
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(table) = self.table {
            write!(f, " [table {table}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when extraction can partially succeed with non-fatal issues.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Fail on the first collected warning when `strict` is set, otherwise
    /// return the result unchanged.
    pub fn into_strict(self, strict: bool) -> Result<Self, GridError> {
        match self.warnings.first() {
            Some(warning) if strict => Err(warning.to_error()),
            _ => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_display() {
        let err = GridError::InvalidPageSize {
            width: 0.0,
            height: 792.0,
        };
        assert_eq!(err.to_string(), "invalid page size: 0 x 792");
        assert_eq!(
            GridError::InvalidSettings("block_size must be odd".into()).to_string(),
            "invalid settings: block_size must be odd"
        );
        assert_eq!(
            GridError::SourceError("no such file".into()).to_string(),
            "source error: no such file"
        );
    }

    #[test]
    fn grid_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: GridError = io_err.into();
        assert!(matches!(err, GridError::IoError(_)));
        assert!(err.to_string().contains("missing.pdf"));
    }

    #[test]
    fn grid_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(GridError::Other("boom".into()));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn warning_code_tags() {
        assert_eq!(ExtractWarningCode::EmptyTable.as_str(), "EMPTY_TABLE");
        assert_eq!(
            ExtractWarningCode::TextExtractionFailed.as_str(),
            "TEXT_EXTRACTION_FAILED"
        );
        assert_eq!(ExtractWarningCode::RenderFailed.as_str(), "RENDER_FAILED");
        assert_eq!(ExtractWarningCode::InvalidPage.as_str(), "INVALID_PAGE");
        assert_eq!(ExtractWarningCode::Other("x".into()).as_str(), "OTHER");
    }

    #[test]
    fn warning_display_with_context() {
        let w = ExtractWarning::with_code(ExtractWarningCode::EmptyTable, "no cells found")
            .on_page(2)
            .on_table(1);
        assert_eq!(w.to_string(), "[EMPTY_TABLE] no cells found (page 2) [table 1]");
    }

    #[test]
    fn warning_display_without_context() {
        let w = ExtractWarning::with_code(ExtractWarningCode::RenderFailed, "bad raster");
        assert_eq!(w.to_string(), "[RENDER_FAILED] bad raster");
    }

    #[test]
    fn extract_result_ok_is_clean() {
        let result = ExtractResult::ok(42);
        assert!(result.is_clean());
        assert_eq!(result.value, 42);
    }

    #[test]
    fn strict_escalates_first_warning() {
        let w = ExtractWarning::with_code(ExtractWarningCode::TextExtractionFailed, "bad page")
            .on_page(3);
        let result = ExtractResult::with_warnings("v", vec![w.clone()]);
        match result.into_strict(true) {
            Err(GridError::Strict(inner)) => assert_eq!(inner, w),
            other => panic!("expected strict error, got {other:?}"),
        }
    }

    #[test]
    fn lenient_keeps_value_and_warnings() {
        let w = ExtractWarning::with_code(ExtractWarningCode::EmptyTable, "skipped");
        let result = ExtractResult::with_warnings("v", vec![w]).into_strict(false).unwrap();
        assert_eq!(result.value, "v");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(ExtractResult::ok(1).into_strict(true).unwrap().value, 1);
    }

    #[test]
    fn escalate_only_in_strict_mode() {
        let w = ExtractWarning::with_code(ExtractWarningCode::RenderFailed, "bad raster").on_page(1);
        assert_eq!(w.clone().escalate(false).unwrap(), w);
        assert!(matches!(w.escalate(true), Err(GridError::Strict(_))));
    }
}
