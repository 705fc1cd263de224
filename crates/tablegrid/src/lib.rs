//! tablegrid: Extract tables from PDF pages and page images as text grids.
//!
//! This is the public API facade crate. It re-exports the pipeline types of
//! tablegrid-core and supplies the pieces around them: page sources that
//! yield rendered pages and positioned text, a document driver, and export.
//!
//! # Architecture
//!
//! - **tablegrid-core**: Backend-independent data types and the per-page
//!   reconstruction pipeline
//! - **tablegrid** (this crate): [`PageSource`] backends (pdfium, image plus
//!   JSON sidecar), [`extract_tables`] and xlsx/CSV/JSON/text export
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tablegrid::{ExtractOptions, PdfiumBackend, TableExtractor, extract_tables};
//!
//! let backend = PdfiumBackend::bind()?;
//! let doc = backend.open(Path::new("report.pdf"), None)?;
//! let result = extract_tables(&doc, &TableExtractor::default(), &ExtractOptions::default(), |_, _| {})?;
//! for record in &result.value {
//!     println!("page {} table {}: {} rows", record.page_number, record.table_number, record.grid.row_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod export;
pub mod extract;
pub mod image_source;
pub mod pdfium;
pub mod source;

pub use tablegrid_core;
pub use tablegrid_core::{
    AssemblySettings, BBox, BorderlessSettings, Cell, CellSettings, CellStrategy, DiscoveryMode,
    ExtractResult, ExtractWarning, ExtractWarningCode, GridError, GridSettings, LineMaskSettings,
    PageInput, PixelBox, ScaleFactor, TableExtractor, TableGrid, TableRecord, Token, WordOptions,
};

pub use error::SourceError;
pub use export::{render_text, sheet_name, to_json, write_csv, write_csv_dir, write_xlsx};
pub use extract::{ExtractOptions, extract_tables};
pub use image_source::{ImagePageSource, read_tokens};
pub use pdfium::{PdfiumBackend, PdfiumDocument};
pub use source::{DEFAULT_DPI, PageSource};
