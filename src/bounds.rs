// glyph-raster/src/bounds.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turns content bounds into a canvas size and the translation that crops to them.

use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::vector::{Vector2F, Vector2I};

use crate::bitmap::GlyphBitmap;

/// No canvas side is ever smaller than this.
pub const MINIMUM_SIDE: i32 = 1;

/// Where content lands on the canvas and how big the canvas is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBounds {
    /// Added to every point so the content's top left corner lands on the origin.
    pub translation: Vector2F,
    /// The canvas size in pixels. Both sides are at least `MINIMUM_SIDE`.
    pub size: Vector2I,
}

/// Normalizes the bounds of an outline.
///
/// The size is `ceil(width) × ceil(height)`; a side that is zero, negative, or not finite becomes
/// `MINIMUM_SIDE`.
pub fn normalize(bounds: RectF) -> NormalizedBounds {
    let translation = if bounds.origin_x().is_finite() && bounds.origin_y().is_finite() {
        -bounds.origin()
    } else {
        Vector2F::zero()
    };
    NormalizedBounds {
        translation,
        size: Vector2I::new(side(bounds.width()), side(bounds.height())),
    }
}

/// Normalizes a glyph bitmap, which already starts at the origin.
///
/// Only the visible width is used; row padding never widens the canvas.
pub fn normalize_bitmap(bitmap: &GlyphBitmap) -> NormalizedBounds {
    NormalizedBounds {
        translation: Vector2F::zero(),
        size: Vector2I::new(clamp_side(bitmap.width() as i64), clamp_side(bitmap.height() as i64)),
    }
}

fn side(extent: f32) -> i32 {
    if !extent.is_finite() || extent <= 0.0 {
        return MINIMUM_SIDE;
    }
    clamp_side(extent.ceil() as i64)
}

#[inline]
fn clamp_side(side: i64) -> i32 {
    side.max(MINIMUM_SIDE as i64).min(i32::MAX as i64) as i32
}
