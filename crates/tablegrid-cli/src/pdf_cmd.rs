use std::path::Path;

use tablegrid::PdfiumBackend;

use crate::shared::resolve_pages;
use crate::tables_cmd::{self, RunSettings};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    password: Option<&str>,
    pdfium: Option<&Path>,
    settings: &RunSettings,
) -> Result<(), i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let backend = match pdfium {
        Some(path) => PdfiumBackend::bind_at(path),
        None => PdfiumBackend::bind(),
    }
    .map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let doc = backend.open(file, password).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })?;

    let page_indices = resolve_pages(pages, &doc)?;
    tables_cmd::run(&doc, page_indices, settings)
}
