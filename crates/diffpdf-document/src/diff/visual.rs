// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Visual diff engine — tile-by-tile raster comparison of two renderings.
//
// Tiles are compared in parallel one tile row per task, and the differing
// tiles are then merged sequentially in row-major order, since the merge is
// order dependent. Smaller tiles mean more per-tile overhead for the same
// number of compared pixels, so tile sizes below 2 are slow in practice.

use std::borrow::Cow;

use diffpdf_core::{PixelRect, RectF};
use image::RgbaImage;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::merge::{MergePolicy, merge_rects};
use crate::raster::{clip, region_equal};

/// Tiles within this many pixels of each other merge into one region.
pub const TILE_ADJACENCY: f32 = 1.0;

/// Highlight regions where `left` and `right` differ, in pixels.
///
/// Both sides of a pair use the returned geometry. When `inclusion` is set,
/// only tiles lying entirely inside it are compared. Renderings of different
/// sizes are compared over their common bounding size, with the missing area
/// treated as transparent.
#[instrument(skip(left, right), fields(width = left.width(), height = left.height()))]
pub fn visual_highlights(
    left: &RgbaImage,
    right: &RgbaImage,
    square_size: u32,
    inclusion: Option<PixelRect>,
) -> Vec<RectF> {
    let square = square_size.max(1);
    let (left, right) = common_size(left, right);
    let (width, height) = left.dimensions();

    let rows: Vec<u32> = (0..height).step_by(square as usize).collect();
    let differing: Vec<Vec<PixelRect>> = rows
        .par_iter()
        .map(|&y| {
            (0..width)
                .step_by(square as usize)
                .map(|x| clip(PixelRect::new(x, y, square, square), width, height))
                .filter(|tile| inclusion.is_none_or(|area| area.contains(tile)))
                .filter(|tile| !region_equal(&left, &right, *tile))
                .collect()
        })
        .collect();

    let tiles: Vec<RectF> = differing
        .into_iter()
        .flatten()
        .map(PixelRect::to_rect_f)
        .collect();
    debug!(differing_tiles = tiles.len(), "Tile comparison complete");
    merge_rects(tiles, MergePolicy::Within(TILE_ADJACENCY))
}

/// Pad the smaller rendering(s) with transparent pixels so both share the
/// same dimensions. Equal-size inputs are borrowed unchanged.
fn common_size<'a>(left: &'a RgbaImage, right: &'a RgbaImage) -> (Cow<'a, RgbaImage>, Cow<'a, RgbaImage>) {
    if left.dimensions() == right.dimensions() {
        return (Cow::Borrowed(left), Cow::Borrowed(right));
    }
    let width = left.width().max(right.width());
    let height = left.height().max(right.height());
    debug!(width, height, "Padding renderings to a common size");
    (
        Cow::Owned(padded(left, width, height)),
        Cow::Owned(padded(right, width, height)),
    )
}

fn padded(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(width, height);
    image::imageops::replace(&mut canvas, image, 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, WHITE)
    }

    #[test]
    fn identical_images_have_no_regions() {
        let image = blank(40, 40);
        assert!(visual_highlights(&image, &image, 5, None).is_empty());
    }

    #[test]
    fn single_pixel_change_marks_its_tile() {
        let left = blank(40, 40);
        let mut right = left.clone();
        right.put_pixel(12, 7, BLACK);
        assert_eq!(
            visual_highlights(&left, &right, 5, None),
            vec![RectF::new(10.0, 5.0, 5.0, 5.0)]
        );
    }

    #[test]
    fn horizontally_adjacent_tiles_merge() {
        let left = blank(40, 40);
        let mut right = left.clone();
        right.put_pixel(2, 2, BLACK);
        right.put_pixel(7, 2, BLACK);
        assert_eq!(
            visual_highlights(&left, &right, 5, None),
            vec![RectF::new(0.0, 0.0, 10.0, 5.0)]
        );
    }

    #[test]
    fn distant_changes_stay_separate() {
        let left = blank(40, 40);
        let mut right = left.clone();
        right.put_pixel(1, 1, BLACK);
        right.put_pixel(35, 35, BLACK);
        assert_eq!(visual_highlights(&left, &right, 5, None).len(), 2);
    }

    #[test]
    fn edge_tiles_are_clipped_to_the_image() {
        let left = blank(12, 12);
        let mut right = left.clone();
        right.put_pixel(11, 11, BLACK);
        assert_eq!(
            visual_highlights(&left, &right, 5, None),
            vec![RectF::new(10.0, 10.0, 2.0, 2.0)]
        );
    }

    #[test]
    fn tiles_not_inside_the_inclusion_box_are_skipped() {
        let left = blank(40, 40);
        let mut right = left.clone();
        right.put_pixel(1, 1, BLACK); // outside
        right.put_pixel(12, 12, BLACK); // straddles the box edge at 12
        right.put_pixel(22, 22, BLACK); // inside
        let inclusion = PixelRect::new(12, 12, 20, 20);
        assert_eq!(
            visual_highlights(&left, &right, 5, Some(inclusion)),
            vec![RectF::new(20.0, 20.0, 5.0, 5.0)]
        );
    }

    #[test]
    fn size_mismatch_highlights_the_extra_area() {
        let left = blank(10, 10);
        let right = blank(10, 15);
        let regions = visual_highlights(&left, &right, 5, None);
        assert_eq!(regions, vec![RectF::new(0.0, 10.0, 10.0, 5.0)]);
    }
}
