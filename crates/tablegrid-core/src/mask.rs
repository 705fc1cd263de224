//! Ruling-line masks.
//!
//! A page or region image is binarized with an inverted adaptive mean
//! threshold (ink becomes foreground) and then opened separately with a
//! horizontal and a vertical line element. Text strokes are much shorter
//! than the element and vanish; table borders survive.

use image::{DynamicImage, GrayImage, Luma};

use crate::settings::LineMaskSettings;

const FOREGROUND: u8 = 255;

/// Horizontal and vertical ruling-line masks of one image.
///
/// Both rasters have the dimensions of the source image; pixels are either
/// 0 or 255.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMasks {
    pub horizontal: GrayImage,
    pub vertical: GrayImage,
}

impl LineMasks {
    /// Saturating pixel-wise sum of both masks.
    pub fn combined(&self) -> GrayImage {
        let mut out = self.horizontal.clone();
        for (dst, src) in out.pixels_mut().zip(self.vertical.pixels()) {
            dst.0[0] = dst.0[0].saturating_add(src.0[0]);
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.horizontal.width()
    }

    pub fn height(&self) -> u32 {
        self.horizontal.height()
    }
}

/// Build the line masks of a color or grayscale image.
pub fn build_line_masks(image: &DynamicImage, settings: &LineMaskSettings) -> LineMasks {
    build_line_masks_gray(&image.to_luma8(), settings)
}

/// Build the line masks of an already grayscale image.
pub fn build_line_masks_gray(gray: &GrayImage, settings: &LineMaskSettings) -> LineMasks {
    let binary = adaptive_threshold_inv(gray, settings.block_size, settings.offset);
    let masks = LineMasks {
        horizontal: open_horizontal(&binary, settings.horizontal_kernel),
        vertical: open_vertical(&binary, settings.vertical_kernel),
    };
    tracing::debug!(
        width = gray.width(),
        height = gray.height(),
        "built line masks"
    );
    masks
}

/// Inverted adaptive mean threshold.
///
/// A pixel becomes foreground iff its value is at most the mean of the
/// `block_size × block_size` window around it minus `offset`. The window is
/// clamped to the image, so border pixels average over fewer samples.
pub fn adaptive_threshold_inv(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (w, h) = gray.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let mut out = GrayImage::new(w, h);
    if wu == 0 || hu == 0 {
        return out;
    }

    // integral[(y + 1) * iw + (x + 1)] = sum of gray[0..=y][0..=x]
    let iw = wu + 1;
    let mut integral = vec![0u64; iw * (hu + 1)];
    for y in 0..hu {
        let mut row_sum = 0u64;
        for x in 0..wu {
            row_sum += u64::from(gray.get_pixel(x as u32, y as u32).0[0]);
            integral[(y + 1) * iw + (x + 1)] = row_sum + integral[y * iw + (x + 1)];
        }
    }

    let half = (block_size / 2) as usize;
    for y in 0..hu {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half).min(hu - 1) + 1;
        for x in 0..wu {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half).min(wu - 1) + 1;

            let area = ((y1 - y0) * (x1 - x0)) as f64;
            let sum = integral[y1 * iw + x1] + integral[y0 * iw + x0]
                - integral[y0 * iw + x1]
                - integral[y1 * iw + x0];
            let threshold = sum as f64 / area - f64::from(offset);

            let value = f64::from(gray.get_pixel(x as u32, y as u32).0[0]);
            if value <= threshold {
                out.put_pixel(x as u32, y as u32, Luma([FOREGROUND]));
            }
        }
    }
    out
}

/// Opening with a `kernel × 1` line element: keeps horizontal foreground
/// runs of at least `kernel` pixels.
pub fn open_horizontal(binary: &GrayImage, kernel: u32) -> GrayImage {
    let (w, h) = binary.dimensions();
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        keep_long_runs(w, kernel, |x| binary.get_pixel(x, y).0[0] > 0, |x| {
            out.put_pixel(x, y, Luma([FOREGROUND]));
        });
    }
    out
}

/// Opening with a `1 × kernel` line element: keeps vertical foreground
/// runs of at least `kernel` pixels.
pub fn open_vertical(binary: &GrayImage, kernel: u32) -> GrayImage {
    let (w, h) = binary.dimensions();
    let mut out = GrayImage::new(w, h);
    for x in 0..w {
        keep_long_runs(h, kernel, |y| binary.get_pixel(x, y).0[0] > 0, |y| {
            out.put_pixel(x, y, Luma([FOREGROUND]));
        });
    }
    out
}

/// Scan positions `0..len`, calling `keep` for every position belonging to a
/// run of set positions at least `min_run` long.
fn keep_long_runs(
    len: u32,
    min_run: u32,
    is_set: impl Fn(u32) -> bool,
    mut keep: impl FnMut(u32),
) {
    let mut start = None;
    for i in 0..=len {
        let set = i < len && is_set(i);
        match (set, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_run {
                    (s..i).for_each(&mut keep);
                }
                start = None;
            }
            _ => {}
        }
    }
}
