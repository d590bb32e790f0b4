// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster helpers — region crop, region equality, aspect-preserving fit,
// resampling, and PNG encoding for in-memory page renderings.

use std::path::Path;

use diffpdf_core::PixelRect;
use diffpdf_core::error::{DiffPdfError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, instrument};

/// Copy `region` out of `image`. The region is clipped to the image bounds.
pub fn crop(image: &RgbaImage, region: PixelRect) -> RgbaImage {
    let clipped = clip(region, image.width(), image.height());
    imageops::crop_imm(image, clipped.x, clipped.y, clipped.width, clipped.height).to_image()
}

/// Clip `region` to a `width` x `height` image.
pub fn clip(region: PixelRect, width: u32, height: u32) -> PixelRect {
    let x = region.x.min(width);
    let y = region.y.min(height);
    PixelRect::new(
        x,
        y,
        region.width.min(width - x),
        region.height.min(height - y),
    )
}

/// Compare the pixels of `region` in two images without copying either.
///
/// Images of different dimensions never compare equal.
pub fn region_equal(a: &RgbaImage, b: &RgbaImage, region: PixelRect) -> bool {
    if a.dimensions() != b.dimensions() {
        return false;
    }
    let region = clip(region, a.width(), a.height());
    let stride = a.width() as usize * 4;
    let start = region.x as usize * 4;
    let end = region.right() as usize * 4;
    let (raw_a, raw_b) = (a.as_raw(), b.as_raw());

    (region.y..region.bottom()).all(|y| {
        let row = y as usize * stride;
        raw_a[row + start..row + end] == raw_b[row + start..row + end]
    })
}

/// Largest rectangle with the aspect ratio of `width` x `height` that fits in
/// `target`, anchored at the target's top-left corner.
pub fn fit_rect(target: PixelRect, width: u32, height: u32) -> PixelRect {
    if width == 0 || height == 0 || target.is_empty() {
        return PixelRect::new(target.x, target.y, 0, 0);
    }
    let scale_x = target.width as f64 / width as f64;
    let scale_y = target.height as f64 / height as f64;
    let scale = scale_x.min(scale_y);
    let fitted_w = ((width as f64 * scale).round() as u32).clamp(1, target.width);
    let fitted_h = ((height as f64 * scale).round() as u32).clamp(1, target.height);
    PixelRect::new(target.x, target.y, fitted_w, fitted_h)
}

/// Resample `image` to exactly `width` x `height`. Returns a copy when the
/// size already matches.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    debug!(
        from_w = image.width(),
        from_h = image.height(),
        width,
        height,
        "Resampling rendering"
    );
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| DiffPdfError::ImageError(format!("PNG encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write an image to `path` as PNG.
#[instrument(skip(image), fields(path = %path.display(), width = image.width(), height = image.height()))]
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|err| DiffPdfError::OutputWrite {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
}
