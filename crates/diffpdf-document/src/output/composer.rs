// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output composer — lay the highlighted renderings of a page pair out on a
// single output page.

use diffpdf_core::{Color, PixelRect, SavePages};
use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::raster::{fit_rect, resize_exact};

/// Inset of the border drawn around the right half, in pixels.
const BORDER_INSET: u32 = 2;

/// Compose one output page.
///
/// For [`SavePages::Both`] the canvas is two half-pages wide, each half as
/// wide as the wider rendering, with each rendering fitted into its half and a
/// thin border around the right half. A single side is returned as is.
pub fn compose_page(left: &RgbaImage, right: &RgbaImage, pages: SavePages) -> RgbaImage {
    match pages {
        SavePages::Left => left.clone(),
        SavePages::Right => right.clone(),
        SavePages::Both => side_by_side(left, right),
    }
}

fn side_by_side(left: &RgbaImage, right: &RgbaImage) -> RgbaImage {
    let half = left.width().max(right.width()).max(1);
    let height = left.height().max(right.height()).max(1);
    let mut canvas = RgbaImage::from_pixel(2 * half, height, Rgba(Color::WHITE.to_rgba()));

    let left_half = PixelRect::new(0, 0, half, height);
    let right_half = PixelRect::new(half, 0, half, height);
    place(&mut canvas, left, left_half);
    place(&mut canvas, right, right_half);

    if half > 2 * BORDER_INSET && height > 2 * BORDER_INSET {
        let border = Rect::at((half + BORDER_INSET) as i32, BORDER_INSET as i32)
            .of_size(half - 2 * BORDER_INSET, height - 2 * BORDER_INSET);
        draw_hollow_rect_mut(&mut canvas, border, Rgba(Color::BLACK.to_rgba()));
    }
    canvas
}

fn place(canvas: &mut RgbaImage, image: &RgbaImage, target: PixelRect) {
    let fitted = fit_rect(target, image.width(), image.height());
    if fitted.is_empty() {
        return;
    }
    let scaled = resize_exact(image, fitted.width, fitted.height);
    imageops::overlay(canvas, &scaled, fitted.x as i64, fitted.y as i64);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn both_sides_share_a_double_width_canvas() {
        let left = RgbaImage::from_pixel(30, 40, RED);
        let right = RgbaImage::from_pixel(30, 40, BLUE);
        let page = compose_page(&left, &right, SavePages::Both);
        assert_eq!(page.dimensions(), (60, 40));
        assert_eq!(page.get_pixel(10, 20), &RED);
        assert_eq!(page.get_pixel(45, 20), &BLUE);
        // Border on the right half.
        assert_eq!(page.get_pixel(32, 20), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn smaller_rendering_is_fitted_not_stretched() {
        let left = RgbaImage::from_pixel(40, 40, RED);
        let right = RgbaImage::from_pixel(20, 10, BLUE);
        let page = compose_page(&left, &right, SavePages::Both);
        assert_eq!(page.dimensions(), (80, 40));
        // 20x10 fitted into 40x40 becomes 40x20, leaving white below.
        assert_eq!(page.get_pixel(60, 10), &BLUE);
        assert_eq!(page.get_pixel(60, 30), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn single_side_is_the_rendering_itself() {
        let left = RgbaImage::from_pixel(5, 6, RED);
        let right = RgbaImage::from_pixel(7, 8, BLUE);
        assert_eq!(compose_page(&left, &right, SavePages::Left), left);
        assert_eq!(compose_page(&left, &right, SavePages::Right), right);
    }
}
