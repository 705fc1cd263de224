use std::path::Path;

use tablegrid::ImagePageSource;

use crate::tables_cmd::{self, RunSettings};

pub fn run(
    file: &Path,
    tokens: Option<&Path>,
    page_size: Option<(f64, f64)>,
    settings: &RunSettings,
) -> Result<(), i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }
    if let Some(path) = tokens {
        if !path.exists() {
            eprintln!("Error: token file not found: {}", path.display());
            return Err(1);
        }
    }

    let source = ImagePageSource::open(file, tokens, page_size).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    tables_cmd::run(&source, None, settings)
}
