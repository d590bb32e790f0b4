// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Difference classifier — decide whether a page pair differs textually,
// only visually, or not at all.

use diffpdf_core::error::Result;
use diffpdf_core::{ComparisonMode, Difference, Margins, POINTS_PER_INCH, TextBox};
use image::RgbaImage;
use tracing::{debug, instrument};

use crate::backend::SourcePage;
use crate::text::boxes_within;

/// Classify one page pair.
///
/// Text is compared first and always wins: a pair whose running text differs
/// is reported as `Textual` without rendering anything. Only in visual mode
/// are both pages then rendered at one pixel per point over the margin region
/// defined by the left page and compared byte for byte.
#[instrument(skip_all, fields(mode = %mode))]
pub fn classify(
    left: &dyn SourcePage,
    right: &dyn SourcePage,
    mode: ComparisonMode,
    margins: Option<&Margins>,
) -> Result<Difference> {
    let size = left.size();
    let region = margins.map(|m| m.point_rect(size));
    let boxes_left = boxes_within(left.text_boxes()?, region);
    let boxes_right = boxes_within(right.text_boxes()?, region);

    if text_differs(&boxes_left, &boxes_right) {
        debug!(
            left_boxes = boxes_left.len(),
            right_boxes = boxes_right.len(),
            "Textual difference"
        );
        return Ok(Difference::Textual);
    }
    if mode != ComparisonMode::Visual {
        return Ok(Difference::None);
    }

    let pixel_region = margins.map(|m| {
        m.pixel_rect(
            size.width.round() as u32,
            size.height.round() as u32,
            POINTS_PER_INCH,
        )
    });
    let image_left = left.render(POINTS_PER_INCH, pixel_region)?;
    let image_right = right.render(POINTS_PER_INCH, pixel_region)?;
    if rasters_differ(&image_left, &image_right) {
        debug!("Visual difference");
        Ok(Difference::Visual)
    } else {
        Ok(Difference::None)
    }
}

/// True when the box lists differ in length or in any box's text.
pub fn text_differs(left: &[TextBox], right: &[TextBox]) -> bool {
    left.len() != right.len() || left.iter().zip(right).any(|(a, b)| a.text != b.text)
}

/// True when the images differ in size or in any byte.
pub fn rasters_differ(left: &RgbaImage, right: &RgbaImage) -> bool {
    left.dimensions() != right.dimensions() || left.as_raw() != right.as_raw()
}
