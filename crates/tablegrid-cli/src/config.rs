//! TOML configuration file.
//!
//! Every key is optional. Command-line flags override file values.
//!
//! ```toml
//! input = "statement.pdf"
//! output = "tables"
//! log_path = "tablegrid.log"
//! dpi = 300
//!
//! [text_extraction]
//! x_tolerance = 3.0
//! keep_blank_chars = false
//!
//! [grid]
//! mode = "auto"
//!
//! [grid.cells]
//! min_width = 20
//! wrapper_min_contained = 3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tablegrid::{GridSettings, WordOptions};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default input document or image.
    pub input: Option<PathBuf>,
    /// Default output directory (csv) or file (json).
    pub output: Option<PathBuf>,
    /// Log file; logs go to stderr when unset.
    pub log_path: Option<PathBuf>,
    /// Rendering resolution for PDF pages.
    pub dpi: Option<f32>,
    pub text_extraction: WordOptions,
    pub grid: GridSettings,
}

impl Config {
    /// Read `path`, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
        Self::parse(&text).map_err(|e| format!("invalid config {}: {e}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
