// glyph-raster/src/shaper.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Simple left-to-right layout of a string into a single outline.
//!
//! This is not a real shaper: each character is mapped to the font's default glyph and placed
//! at the previous glyph's advance. A `'\n'` starts a new line one line height further down.
//! There is no kerning, ligature substitution, or bidi.

use log::debug;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::{vec2f, Vector2F};

use crate::loader::Loader;
use crate::outline::{Outline, OutlineBuilder};

/// The laid-out outline of a string, in device pixels with the y axis pointing down.
///
/// The pen starts at the origin, which is on the baseline; ink above the baseline has negative
/// y coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapedText {
    /// All glyph contours, already positioned.
    pub outline: Outline,
    /// The bounding rectangle of every point in `outline`, or the zero rectangle if the outline
    /// has no points.
    pub bounds: RectF,
    /// The pen position after the last glyph.
    pub advance: Vector2F,
}

/// Lays out `text` with `font` at `point_size` points and `dpi` dots per inch.
///
/// Characters the font cannot map, or whose glyph fails to load, are skipped without moving
/// the pen. A newline moves the pen back to the left edge and down by the font's line height
/// (`ascent - descent + line_gap`).
pub fn shape_text<F>(font: &F, text: &str, point_size: f32, dpi: f32) -> ShapedText
where
    F: Loader,
{
    let metrics = font.metrics();
    let scale = metrics.scale(point_size, dpi);
    let line_height = (metrics.ascent - metrics.descent + metrics.line_gap) * scale;
    let mut builder = OutlineBuilder::new();
    let mut pen = Vector2F::zero();

    for character in text.chars() {
        if character == '\n' {
            pen = vec2f(0.0, pen.y() + line_height);
            continue;
        }
        let glyph_id = match font.glyph_for_char(character) {
            Some(glyph_id) => glyph_id,
            None => {
                debug!("no glyph for {:?}, skipping", character);
                continue;
            }
        };
        let advance = match font.advance(glyph_id) {
            Ok(advance) => advance,
            Err(err) => {
                debug!("no advance for {:?}: {}", character, err);
                continue;
            }
        };

        builder.set_transform(Transform2F::from_translation(pen) *
                              Transform2F::from_scale(vec2f(scale, -scale)));
        if let Err(err) = font.outline(glyph_id, &mut builder) {
            debug!("no outline for {:?}: {}", character, err);
            continue;
        }
        pen += vec2f(advance.x() * scale, -advance.y() * scale);
    }

    let outline = builder.into_outline();
    let bounds = outline.bounds().unwrap_or_default();
    ShapedText {
        outline,
        bounds,
        advance: pen,
    }
}
