//! Table region detection on a full-page line mask.

use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};

use crate::geometry::PixelBox;

/// Bounding box of a contour's points, inclusive of both extreme pixels.
pub(crate) fn contour_bbox(contour: &Contour<u32>) -> Option<PixelBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    PixelBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

/// Sort boxes top-to-bottom, then left-to-right. The sort is stable.
pub(crate) fn sort_reading_order(boxes: &mut [PixelBox]) {
    boxes.sort_by_key(|b| (b.y, b.x));
}

/// Find table regions in a combined ruling-line mask.
///
/// Each outermost connected shape contributes the bounding box of its outer
/// border. Shapes nested inside another shape's hole (the cells of a table)
/// are not regions. There is no size filter and regions may overlap.
/// Regions are returned in `(y, x)` order.
pub fn detect_regions(combined: &GrayImage) -> Vec<PixelBox> {
    let mut regions: Vec<PixelBox> = find_contours::<u32>(combined)
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(contour_bbox)
        .collect();
    sort_reading_order(&mut regions);
    tracing::debug!(count = regions.len(), "detected table regions");
    regions
}
