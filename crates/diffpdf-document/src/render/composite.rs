// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composition — blend the right rendering onto the left one with a pixel
// operator and flatten the result onto white.
//
// Blending runs on premultiplied channels in 0.0..=1.0. The logical
// operators work on the premultiplied 8-bit channels and force the result
// opaque.

use diffpdf_core::CompositionMode;
use image::{Rgba, RgbaImage};
use tracing::instrument;

/// Composite `right` over `left` with `mode`. The result has the size of
/// `left` and is fully opaque. Parts of `left` not covered by `right` are
/// kept unchanged.
#[instrument(skip(left, right), fields(width = left.width(), height = left.height()))]
pub fn composite(left: &RgbaImage, right: &RgbaImage, mode: CompositionMode) -> RgbaImage {
    let mut composed = RgbaImage::new(left.width(), left.height());
    for (x, y, out) in composed.enumerate_pixels_mut() {
        let destination = *left.get_pixel(x, y);
        let blended = if x < right.width() && y < right.height() {
            blend(*right.get_pixel(x, y), destination, mode)
        } else {
            destination
        };
        *out = over_white(blended);
    }
    composed
}

fn blend(source: Rgba<u8>, destination: Rgba<u8>, mode: CompositionMode) -> Rgba<u8> {
    match mode {
        CompositionMode::Difference => porter_duff(source, destination, |s, d, sa, da| {
            s + d - 2.0 * (s * da).min(d * sa)
        }),
        CompositionMode::Exclusion => porter_duff(source, destination, |s, d, sa, da| {
            (s * da + d * sa - 2.0 * s * d) + s * (1.0 - da) + d * (1.0 - sa)
        }),
        CompositionMode::SourceXorDestination => {
            raster_op(source, destination, |s, d| s ^ d)
        }
        CompositionMode::NotSourceXorDestination => {
            raster_op(source, destination, |s, d| !(s ^ d))
        }
    }
}

fn premultiplied(pixel: Rgba<u8>) -> [f32; 4] {
    let alpha = pixel[3] as f32 / 255.0;
    [
        pixel[0] as f32 / 255.0 * alpha,
        pixel[1] as f32 / 255.0 * alpha,
        pixel[2] as f32 / 255.0 * alpha,
        alpha,
    ]
}

fn straight(channels: [f32; 4]) -> Rgba<u8> {
    let alpha = channels[3].clamp(0.0, 1.0);
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    Rgba([
        to_u8(channels[0] / alpha),
        to_u8(channels[1] / alpha),
        to_u8(channels[2] / alpha),
        to_u8(alpha),
    ])
}

/// Separable blend with the union alpha `sa + da - sa * da`.
fn porter_duff(
    source: Rgba<u8>,
    destination: Rgba<u8>,
    channel: impl Fn(f32, f32, f32, f32) -> f32,
) -> Rgba<u8> {
    let s = premultiplied(source);
    let d = premultiplied(destination);
    let (sa, da) = (s[3], d[3]);
    straight([
        channel(s[0], d[0], sa, da),
        channel(s[1], d[1], sa, da),
        channel(s[2], d[2], sa, da),
        sa + da - sa * da,
    ])
}

fn raster_op(source: Rgba<u8>, destination: Rgba<u8>, op: impl Fn(u8, u8) -> u8) -> Rgba<u8> {
    let s = premultiplied(source).map(|v| (v * 255.0).round() as u8);
    let d = premultiplied(destination).map(|v| (v * 255.0).round() as u8);
    Rgba([op(s[0], d[0]), op(s[1], d[1]), op(s[2], d[2]), 255])
}

/// Fill whatever is not opaque with white behind the pixel.
fn over_white(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = premultiplied(pixel);
    let cover = 1.0 - a;
    straight([r + cover, g + cover, b + cover, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([r, g, b, 255]))
    }

    #[test]
    fn difference_of_identical_pages_is_black() {
        let page = solid(200, 120, 30);
        let out = composite(&page, &page, CompositionMode::Difference);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn difference_is_absolute_channel_difference() {
        let out = composite(&solid(200, 50, 0), &solid(50, 200, 0), CompositionMode::Difference);
        assert_eq!(out.get_pixel(1, 1), &Rgba([150, 150, 0, 255]));
    }

    #[test]
    fn exclusion_of_white_inverts() {
        let out = composite(&solid(255, 255, 255), &solid(0, 100, 255), CompositionMode::Exclusion);
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 155, 0, 255]));
    }

    #[test]
    fn xor_variants_are_bitwise() {
        let left = solid(0b1010_0000, 0, 255);
        let right = solid(0b0110_0000, 0, 255);
        let xor = composite(&left, &right, CompositionMode::SourceXorDestination);
        assert_eq!(xor.get_pixel(0, 0), &Rgba([0b1100_0000, 0, 0, 255]));
        let not_xor = composite(&left, &right, CompositionMode::NotSourceXorDestination);
        assert_eq!(not_xor.get_pixel(0, 0), &Rgba([0b0011_1111, 255, 255, 255]));
    }

    #[test]
    fn uncovered_area_keeps_left_pixels_and_is_opaque() {
        let left = solid(10, 20, 30);
        let right = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let out = composite(&left, &right, CompositionMode::Difference);
        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(3, 3), &Rgba([10, 20, 30, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([245, 235, 225, 255]));
    }

    #[test]
    fn transparent_result_becomes_white() {
        let clear = RgbaImage::new(2, 2);
        let out = composite(&clear, &clear, CompositionMode::Difference);
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }
}
