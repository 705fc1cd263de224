//! Named thresholds for every pipeline stage.
//!
//! All structs implement [`Default`] with the values the pipeline was tuned
//! for (300 DPI page renders) and, with the `serde` feature, deserialize with
//! missing fields falling back to those defaults.

use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Parameters of the line mask builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LineMaskSettings {
    /// Side of the square window used for the local mean (odd, at least 3).
    pub block_size: u32,
    /// Amount subtracted from the local mean before thresholding.
    pub offset: i32,
    /// Minimum length of a horizontal run kept as a ruling line.
    pub horizontal_kernel: u32,
    /// Minimum length of a vertical run kept as a ruling line.
    pub vertical_kernel: u32,
}

impl Default for LineMaskSettings {
    fn default() -> Self {
        Self {
            block_size: 15,
            offset: 5,
            horizontal_kernel: 40,
            vertical_kernel: 40,
        }
    }
}

impl LineMaskSettings {
    fn validate(&self, name: &str) -> Result<(), GridError> {
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(GridError::InvalidSettings(format!(
                "{name}.block_size must be odd and at least 3, got {}",
                self.block_size
            )));
        }
        if self.horizontal_kernel == 0 || self.vertical_kernel == 0 {
            return Err(GridError::InvalidSettings(format!(
                "{name} kernel lengths must be positive"
            )));
        }
        Ok(())
    }
}

/// Parameters of the cell decomposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CellSettings {
    /// Minimum cell width in pixels.
    pub min_width: u32,
    /// Minimum cell height in pixels.
    pub min_height: u32,
    /// Slack in pixels for the containment test of wrapper removal.
    pub wrapper_margin: u32,
    /// A box containing at least this many other boxes is a wrapper.
    pub wrapper_min_contained: usize,
}

impl Default for CellSettings {
    fn default() -> Self {
        Self {
            min_width: 20,
            min_height: 20,
            wrapper_margin: 5,
            wrapper_min_contained: 3,
        }
    }
}

/// Parameters of the borderless cell inferencer, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BorderlessSettings {
    /// Maximum vertical distance from the row anchor's center.
    pub row_threshold: f64,
    /// Maximum horizontal distance from the column anchor's center.
    pub col_threshold: f64,
}

impl Default for BorderlessSettings {
    fn default() -> Self {
        Self {
            row_threshold: 15.0,
            col_threshold: 30.0,
        }
    }
}

/// Parameters of the table assembler.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AssemblySettings {
    /// Vertical center distance, in pixels, within which cells share a row.
    ///
    /// `None` derives it from the cells: half the median cell height.
    pub row_tolerance: Option<f64>,
}

/// How cells are discovered inside a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DiscoveryMode {
    /// Ruling-line cells, falling back to text clustering for regions with none.
    #[default]
    Auto,
    /// Ruling-line cells only.
    Ruled,
    /// Skip line detection; cluster all page tokens into one table.
    Borderless,
}

impl DiscoveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMode::Auto => "auto",
            DiscoveryMode::Ruled => "ruled",
            DiscoveryMode::Borderless => "borderless",
        }
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscoveryMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(DiscoveryMode::Auto),
            "ruled" => Ok(DiscoveryMode::Ruled),
            "borderless" => Ok(DiscoveryMode::Borderless),
            other => Err(GridError::InvalidSettings(format!(
                "unknown discovery mode '{other}' (expected auto, ruled or borderless)"
            ))),
        }
    }
}

/// Configuration for the whole page pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GridSettings {
    /// Mask parameters for finding table regions on the full page.
    pub page_mask: LineMaskSettings,
    /// Mask parameters for finding cells inside a cropped region.
    pub region_mask: LineMaskSettings,
    pub cells: CellSettings,
    pub borderless: BorderlessSettings,
    pub assembly: AssemblySettings,
    pub mode: DiscoveryMode,
    /// When true, any warning is escalated to an error.
    pub strict: bool,
}

impl GridSettings {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSettings`] naming the first bad field.
    pub fn validate(&self) -> Result<(), GridError> {
        self.page_mask.validate("page_mask")?;
        self.region_mask.validate("region_mask")?;
        if self.cells.min_width == 0 || self.cells.min_height == 0 {
            return Err(GridError::InvalidSettings(
                "cells.min_width and cells.min_height must be positive".to_string(),
            ));
        }
        let positive = |v: f64| v.is_finite() && v >= 0.0;
        if !positive(self.borderless.row_threshold) || !positive(self.borderless.col_threshold) {
            return Err(GridError::InvalidSettings(
                "borderless thresholds must be non-negative".to_string(),
            ));
        }
        if let Some(tol) = self.assembly.row_tolerance {
            if !positive(tol) {
                return Err(GridError::InvalidSettings(format!(
                    "assembly.row_tolerance must be non-negative, got {tol}"
                )));
            }
        }
        Ok(())
    }
}
