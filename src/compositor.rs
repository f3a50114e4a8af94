// glyph-raster/src/compositor.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Paints glyph coverage onto a background-filled RGBA canvas.

use pathfinder_geometry::vector::Vector2I;

use crate::bitmap::GlyphBitmap;
use crate::bounds::NormalizedBounds;
use crate::canvas::{Canvas, Format};
use crate::color::Color;
use crate::outline::Outline;
use crate::raster::CoverageRasterizer;

/// How samples of a native glyph bitmap become canvas alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapAlpha {
    /// Every sample is written with full alpha, replacing the background entirely.
    Opaque,
    /// Samples with zero coverage keep the background; all others are written with full alpha.
    ZeroCoverageTransparent,
}

impl Default for BitmapAlpha {
    #[inline]
    fn default() -> BitmapAlpha {
        BitmapAlpha::Opaque
    }
}

/// Rasterizes `outline`, moved by `bounds.translation`, onto a canvas of `bounds.size` filled
/// with `background`.
///
/// Coverage composites `foreground` over the background. Pixels with no coverage keep the
/// background exactly and fully covered pixels take an opaque foreground exactly.
pub fn compose_outline(outline: &Outline,
                       bounds: &NormalizedBounds,
                       background: Color,
                       foreground: Color)
                       -> Canvas {
    let mut canvas = new_canvas(bounds.size, background);

    let mut rasterizer = CoverageRasterizer::new(canvas.size);
    let mut outline = outline.clone();
    outline.translate(bounds.translation);
    outline.copy_to(&mut rasterizer);

    rasterizer.for_each_pixel(|x, y, coverage| {
        if coverage > 0 {
            canvas.set_pixel(x, y, foreground.over(background, coverage));
        }
    });
    canvas
}

/// Expands a single-channel glyph bitmap onto a canvas of `bounds.size` filled with
/// `background`.
///
/// Each sample `c` becomes `(c, c, c, 255)`; `alpha` decides whether zero samples are written
/// too. The bitmap is consumed, so its memory is released as soon as compositing is done.
pub fn compose_bitmap(bitmap: GlyphBitmap,
                      bounds: &NormalizedBounds,
                      background: Color,
                      alpha: BitmapAlpha)
                      -> Canvas {
    let mut canvas = new_canvas(bounds.size, background);

    match alpha {
        BitmapAlpha::Opaque => {
            canvas.blit_from(bitmap.samples(), bitmap.size(), bitmap.stride(), Format::A8);
        }
        BitmapAlpha::ZeroCoverageTransparent => {
            for y in 0..bitmap.height() {
                for (x, &sample) in bitmap.row(y).iter().enumerate() {
                    if sample != 0 {
                        canvas.set_pixel(x as u32, y, Color::gray(sample));
                    }
                }
            }
        }
    }
    canvas
}

fn new_canvas(size: Vector2I, background: Color) -> Canvas {
    let mut canvas = Canvas::new(size, Format::Rgba32);
    canvas.fill(background);
    canvas
}

#[cfg(test)]
mod test {
    use super::{compose_bitmap, compose_outline, BitmapAlpha};
    use crate::bitmap::GlyphBitmap;
    use crate::bounds::{normalize, normalize_bitmap, NormalizedBounds};
    use crate::color::Color;
    use crate::outline::{OutlineBuilder, OutlineSink};
    use pathfinder_geometry::vector::{vec2f, Vector2F, Vector2I};

    #[test]
    fn outline_paints_foreground_over_background() {
        let mut builder = OutlineBuilder::new();
        builder.move_to(vec2f(10.0, -4.0));
        builder.line_to(vec2f(12.0, -4.0));
        builder.line_to(vec2f(12.0, -2.0));
        builder.line_to(vec2f(10.0, -2.0));
        builder.close();
        let outline = builder.into_outline();

        let bounds = normalize(outline.bounds().unwrap());
        let background = Color::rgba(10, 200, 30, 40);
        let canvas = compose_outline(&outline, &bounds, background, Color::BLACK);
        assert_eq!((canvas.width(), canvas.height()), (2, 2));
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(canvas.pixel(x, y), Some(Color::BLACK));
            }
        }
    }

    #[test]
    fn empty_outline_is_background() {
        let outline = OutlineBuilder::new().into_outline();
        let bounds = normalize(Default::default());
        let background = Color::rgba(1, 2, 3, 4);
        let canvas = compose_outline(&outline, &bounds, background, Color::BLACK);
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
        assert_eq!(canvas.pixel(0, 0), Some(background));
    }

    #[test]
    fn opaque_bitmap_replaces_background() {
        let bitmap = GlyphBitmap::from_samples(2, 1, 4, vec![0, 200, 77, 77]).unwrap();
        let bounds = normalize_bitmap(&bitmap);
        let canvas = compose_bitmap(bitmap, &bounds, Color::WHITE, BitmapAlpha::Opaque);
        assert_eq!((canvas.width(), canvas.height()), (2, 1));
        assert_eq!(canvas.pixel(0, 0), Some(Color::gray(0)));
        assert_eq!(canvas.pixel(1, 0), Some(Color::gray(200)));
    }

    #[test]
    fn transparent_zero_samples_keep_background() {
        let background = Color::rgba(9, 8, 7, 6);
        let bitmap = GlyphBitmap::from_samples(2, 1, 2, vec![0, 200]).unwrap();
        let bounds = normalize_bitmap(&bitmap);
        let canvas = compose_bitmap(bitmap,
                                    &bounds,
                                    background,
                                    BitmapAlpha::ZeroCoverageTransparent);
        assert_eq!(canvas.pixel(0, 0), Some(background));
        assert_eq!(canvas.pixel(1, 0), Some(Color::gray(200)));
    }

    #[test]
    fn empty_bitmap_yields_background_pixel() {
        let bitmap = GlyphBitmap::new(0, 3, 4);
        let bounds = normalize_bitmap(&bitmap);
        let canvas = compose_bitmap(bitmap, &bounds, Color::WHITE, BitmapAlpha::Opaque);
        assert_eq!((canvas.width(), canvas.height()), (1, 3));
        assert_eq!(canvas.pixel(0, 2), Some(Color::WHITE));
    }

    #[test]
    fn bitmap_canvas_takes_normalized_size() {
        let bitmap = GlyphBitmap::from_samples(2, 1, 2, vec![0, 200]).unwrap();
        let bounds = NormalizedBounds {
            translation: Vector2F::zero(),
            size: Vector2I::new(3, 2),
        };
        let canvas = compose_bitmap(bitmap, &bounds, Color::WHITE, BitmapAlpha::Opaque);
        assert_eq!((canvas.width(), canvas.height()), (3, 2));
        assert_eq!(canvas.pixel(1, 0), Some(Color::gray(200)));
        assert_eq!(canvas.pixel(2, 1), Some(Color::WHITE));
    }
}
