//! Cell discovery strategies.
//!
//! A table region is turned into text-bearing cells either from its ruling
//! lines ([`RuledCells`]) or, for tables without borders, by clustering the
//! tokens inside it ([`BorderlessCells`]). [`DiscoveryMode`] selects which
//! strategies run and in what order; the first one to produce cells wins.

use std::fmt;

use image::GrayImage;
use image::imageops;

use crate::assign::{assign_text, token_in_cell};
use crate::borderless::infer_cells;
use crate::cell::{Cell, decompose_cells};
use crate::geometry::PixelBox;
use crate::mask::build_line_masks_gray;
use crate::settings::{DiscoveryMode, GridSettings};
use crate::token::Token;

/// Which strategy produced a table's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CellStrategy {
    Ruled,
    Borderless,
}

impl CellStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStrategy::Ruled => "ruled",
            CellStrategy::Borderless => "borderless",
        }
    }
}

impl fmt::Display for CellStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may look at for one table region.
pub struct RegionContext<'a> {
    /// Grayscale page image.
    pub page: &'a GrayImage,
    /// Region in page pixels.
    pub region: PixelBox,
    /// All page tokens, already mapped to page pixels.
    pub tokens: &'a [Token],
    pub settings: &'a GridSettings,
}

/// A way of finding the cells of one table region.
pub trait CellDiscovery {
    fn strategy(&self) -> CellStrategy;

    fn name(&self) -> &'static str {
        self.strategy().as_str()
    }

    /// Cells in page pixels, text attached. Empty when the strategy finds none.
    fn discover(&self, ctx: &RegionContext<'_>) -> Vec<Cell>;
}

/// Cells bounded by ruling lines inside the region.
pub struct RuledCells;

impl CellDiscovery for RuledCells {
    fn strategy(&self) -> CellStrategy {
        CellStrategy::Ruled
    }

    fn discover(&self, ctx: &RegionContext<'_>) -> Vec<Cell> {
        let region = ctx.region;
        let crop = imageops::crop_imm(ctx.page, region.x, region.y, region.w, region.h).to_image();
        let masks = build_line_masks_gray(&crop, &ctx.settings.region_mask);
        let boxes: Vec<PixelBox> = decompose_cells(&masks, &ctx.settings.cells)
            .iter()
            .map(|b| b.translate(&region))
            .collect();
        assign_text(&boxes, ctx.tokens)
    }
}

/// Cells clustered from the tokens lying inside the region.
pub struct BorderlessCells;

impl CellDiscovery for BorderlessCells {
    fn strategy(&self) -> CellStrategy {
        CellStrategy::Borderless
    }

    fn discover(&self, ctx: &RegionContext<'_>) -> Vec<Cell> {
        let inside: Vec<Token> = ctx
            .tokens
            .iter()
            .filter(|t| token_in_cell(t, &ctx.region))
            .cloned()
            .collect();
        infer_cells(&inside, &ctx.settings.borderless)
    }
}

/// Strategies tried for `mode`, in order.
pub fn strategies(mode: DiscoveryMode) -> Vec<&'static dyn CellDiscovery> {
    let ruled: &'static dyn CellDiscovery = &RuledCells;
    let borderless: &'static dyn CellDiscovery = &BorderlessCells;
    match mode {
        DiscoveryMode::Auto => vec![ruled, borderless],
        DiscoveryMode::Ruled => vec![ruled],
        DiscoveryMode::Borderless => vec![borderless],
    }
}

/// Run the strategies of `mode` until one yields cells.
///
/// Returns the winning strategy and its cells, or the last strategy tried
/// with an empty list.
pub fn discover_cells(mode: DiscoveryMode, ctx: &RegionContext<'_>) -> (CellStrategy, Vec<Cell>) {
    let mut last = CellStrategy::Ruled;
    for strategy in strategies(mode) {
        last = strategy.strategy();
        let cells = strategy.discover(ctx);
        tracing::debug!(strategy = strategy.name(), cells = cells.len(), "cell discovery");
        if !cells.is_empty() {
            return (last, cells);
        }
    }
    (last, Vec::new())
}
