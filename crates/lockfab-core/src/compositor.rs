// Author: Dustin Pilgrim
// License: MIT
//
// Multi-monitor canvas compositor.
//
// The canvas spans the bounding box of every monitor. Each monitor gets its
// own "cover" tile of the source: scaled until both axes are at least the
// monitor size (aspect preserved), then center-cropped to exactly that size.
// Anything no monitor covers stays black.
//
// Overlapping monitors are not resolved: later tiles overwrite earlier ones.

use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};

use crate::error::{LockfabError, Result};
use crate::geometry::{MonitorGeometry, bounding_size};
use crate::store::{ImageKey, ImageStore};

/// The composited raster handed to the locker.
pub type Canvas = RgbImage;

/// Size of the placeholder written before any wallpaper was ever fetched.
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (1366, 768);

const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// How a source of one size is scaled and cropped to cover a target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub crop_x: u32,
    pub crop_y: u32,
}

/// Cover-fill arithmetic. Source and target dimensions must be non-zero.
///
/// The smaller scaled axis matches the target exactly; the overflowing axis
/// is cropped equally from both sides (odd remainders favour the right/bottom).
pub fn cover_fit(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CoverFit {
    let scale = f64::max(
        f64::from(dst_w) / f64::from(src_w),
        f64::from(dst_h) / f64::from(src_h),
    );

    // Rounding can land one pixel short of the target; never go below it.
    let scaled_width = ((f64::from(src_w) * scale).round() as u32).max(dst_w);
    let scaled_height = ((f64::from(src_h) * scale).round() as u32).max(dst_h);

    CoverFit {
        scaled_width,
        scaled_height,
        crop_x: (scaled_width - dst_w) / 2,
        crop_y: (scaled_height - dst_h) / 2,
    }
}

pub fn black_canvas(width: u32, height: u32) -> Canvas {
    RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
}

/// Scale `source` to cover `width x height` and center-crop to exactly that.
pub fn cover_tile(source: &RgbImage, width: u32, height: u32) -> RgbImage {
    let fit = cover_fit(source.width(), source.height(), width, height);
    let scaled = imageops::resize(source, fit.scaled_width, fit.scaled_height, RESIZE_FILTER);
    imageops::crop_imm(&scaled, fit.crop_x, fit.crop_y, width, height).to_image()
}

/// Composite `source` across `monitors` into one canvas.
///
/// An empty monitor set yields a 0x0 canvas.
pub fn compose(source: &DynamicImage, monitors: &[MonitorGeometry]) -> Result<Canvas> {
    let (width, height) = bounding_size(monitors);
    let mut canvas = black_canvas(width, height);

    if monitors.is_empty() {
        return Ok(canvas);
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(LockfabError::EmptySource);
    }

    let source = source.to_rgb8();

    // Same-sized monitors share one tile; the scale is the expensive part.
    let mut tiles: HashMap<(u32, u32), RgbImage> = HashMap::new();

    for m in monitors {
        let tile = &*tiles
            .entry((m.width(), m.height()))
            .or_insert_with(|| cover_tile(&source, m.width(), m.height()));
        imageops::replace(&mut canvas, tile, i64::from(m.x()), i64::from(m.y()));
    }

    Ok(canvas)
}

/// Composite an already decoded source and replace the stored output.
///
/// Nothing is written unless the whole composite succeeded.
pub fn compose_into(
    store: &ImageStore,
    source: &DynamicImage,
    monitors: &[MonitorGeometry],
) -> Result<(u32, u32)> {
    let canvas = compose(source, monitors)?;
    store.put_png(ImageKey::Output, &canvas)?;
    Ok(canvas.dimensions())
}
