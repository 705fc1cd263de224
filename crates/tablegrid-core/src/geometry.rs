//! Boxes and scale factors shared by every pipeline stage.
//!
//! Two coordinate spaces meet here: document units (where text tokens are
//! positioned) and rendered-image pixels (where ruling lines are found).
//! [`BBox`] is used for both, [`PixelBox`] only for raster regions and cells.

use crate::error::GridError;

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Integer pixel rectangle `(x, y, w, h)` in image space.
///
/// Width and height are always positive; [`PixelBox::new`] rejects
/// degenerate rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelBox {
    /// Create a box, returning `None` when `w` or `h` is zero.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Option<Self> {
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self { x, y, w, h })
    }

    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    /// Vertical center in pixels.
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.h as f64 / 2.0
    }

    /// Horizontal center in pixels.
    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.w as f64 / 2.0
    }

    /// Shift a region-local box into the frame whose origin is `origin`.
    pub fn translate(&self, origin: &PixelBox) -> PixelBox {
        PixelBox {
            x: self.x + origin.x,
            y: self.y + origin.y,
            w: self.w,
            h: self.h,
        }
    }

    /// The smallest pixel box covering `bbox`.
    ///
    /// Edges are rounded outward, negative coordinates clamp to zero, and a
    /// degenerate box still covers at least one pixel on each side.
    pub fn covering(bbox: &BBox) -> PixelBox {
        let x0 = bbox.x0.floor().max(0.0);
        let top = bbox.top.floor().max(0.0);
        let x1 = bbox.x1.ceil().max(x0 + 1.0);
        let bottom = bbox.bottom.ceil().max(top + 1.0);
        PixelBox {
            x: x0 as u32,
            y: top as u32,
            w: (x1 - x0) as u32,
            h: (bottom - top) as u32,
        }
    }
}

/// Ratio of rendered-image pixels to document units for one page.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleFactor {
    pub sx: f64,
    pub sy: f64,
}

impl ScaleFactor {
    pub fn new(sx: f64, sy: f64) -> Self {
        Self { sx, sy }
    }

    /// Identity scale, for sources whose tokens are already in pixels.
    pub fn identity() -> Self {
        Self { sx: 1.0, sy: 1.0 }
    }

    /// Scale factors from a page's native size and its raster size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidPageSize`] if either page dimension is
    /// not a positive finite number.
    pub fn from_dimensions(
        page_width: f64,
        page_height: f64,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, GridError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(page_width) || !valid(page_height) {
            return Err(GridError::InvalidPageSize {
                width: page_width,
                height: page_height,
            });
        }
        Ok(Self {
            sx: image_width as f64 / page_width,
            sy: image_height as f64 / page_height,
        })
    }
}
