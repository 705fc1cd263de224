//! Cell decomposition of a cropped table region.

use imageproc::contours::find_contours;

use crate::geometry::PixelBox;
use crate::mask::LineMasks;
use crate::region::{contour_bbox, sort_reading_order};
use crate::settings::CellSettings;

/// A table cell: its pixel box and the text assigned to it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub bbox: PixelBox,
    /// Joined token text, empty when no token falls inside the box.
    pub text: String,
    /// Row index fixed by the strategy that found the cell, when it groups
    /// rows itself. Assembly keeps these rows as they are.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub row: Option<usize>,
}

impl Cell {
    pub fn new(bbox: PixelBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            row: None,
        }
    }

    /// Pin the cell to row `row` (builder pattern).
    pub fn in_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Decompose a region's line masks into cell boxes, local to the region.
///
/// Every contour of the combined mask, outer borders and hole borders alike,
/// yields a candidate box. Candidates smaller than the configured minimum
/// are dropped, the rest are sorted by `(y, x)` and wrapper boxes (ones
/// enclosing several other candidates, like a table's outer frame) are
/// removed.
pub fn decompose_cells(masks: &LineMasks, settings: &CellSettings) -> Vec<PixelBox> {
    let combined = masks.combined();
    let mut boxes: Vec<PixelBox> = find_contours::<u32>(&combined)
        .iter()
        .filter_map(contour_bbox)
        .filter(|b| b.w >= settings.min_width && b.h >= settings.min_height)
        .collect();
    sort_reading_order(&mut boxes);
    let candidates = boxes.len();
    let cells = remove_wrapper_cells(boxes, settings);
    tracing::debug!(candidates, cells = cells.len(), "decomposed region");
    cells
}

/// Whether `outer` contains `inner` within `margin` pixels of slack.
///
/// Containment also requires `inner` to sit strictly inside `outer` on at
/// least one side by more than the margin, so near-duplicates do not
/// contain each other.
pub fn contains(outer: &PixelBox, inner: &PixelBox, margin: u32) -> bool {
    let m = i64::from(margin);
    let (ax, ay) = (i64::from(outer.x), i64::from(outer.y));
    let (ar, ab) = (i64::from(outer.right()), i64::from(outer.bottom()));
    let (bx, by) = (i64::from(inner.x), i64::from(inner.y));
    let (br, bb) = (i64::from(inner.right()), i64::from(inner.bottom()));

    let within = bx >= ax - m && by >= ay - m && br <= ar + m && bb <= ab + m;
    let strictly_inside = bx > ax + m || by > ay + m || br < ar - m || bb < ab - m;
    within && strictly_inside
}

/// Drop every box that contains at least `wrapper_min_contained` others.
///
/// Lists with at most one box are returned unchanged. Relative order of the
/// surviving boxes is preserved.
pub fn remove_wrapper_cells(boxes: Vec<PixelBox>, settings: &CellSettings) -> Vec<PixelBox> {
    if boxes.len() <= 1 {
        return boxes;
    }
    let margin = settings.wrapper_margin;
    let keep: Vec<bool> = boxes
        .iter()
        .enumerate()
        .map(|(i, outer)| {
            let enclosed = boxes
                .iter()
                .enumerate()
                .filter(|&(j, inner)| i != j && contains(outer, inner, margin))
                .count();
            enclosed < settings.wrapper_min_contained
        })
        .collect();
    boxes
        .into_iter()
        .zip(keep)
        .filter_map(|(b, k)| k.then_some(b))
        .collect()
}
