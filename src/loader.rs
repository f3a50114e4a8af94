// glyph-raster/src/loader.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Provides a common interface to the APIs that load, parse, and rasterize fonts.

use log::trace;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::{vec2f, Vector2F};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::bitmap::GlyphBitmap;
use crate::error::{FontLoadingError, GlyphLoadingError};
use crate::handle::Handle;
use crate::metrics::Metrics;
use crate::outline::{OutlineBuilder, OutlineSink};
use crate::raster::CoverageRasterizer;

/// Rows of bitmaps produced by the built-in rasterizer are padded to this many bytes.
pub const BITMAP_ROW_ALIGNMENT: usize = 4;

/// Provides a common interface to the APIs that load, parse, and rasterize fonts.
///
/// Glyph IDs are the font's own; 0 is conventionally `.notdef` and is never returned by
/// `glyph_for_char`.
pub trait Loader: Clone + Sized {
    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file).
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Self, FontLoadingError>;

    /// Loads a font from a `.ttf`/`.otf`/etc. file.
    fn from_file(file: &mut File, font_index: u32) -> Result<Self, FontLoadingError> {
        let mut font_data = vec![];
        file.read_to_end(&mut font_data)?;
        Self::from_bytes(Arc::new(font_data), font_index)
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    fn from_path<P>(path: P, font_index: u32) -> Result<Self, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        Self::from_file(&mut File::open(path)?, font_index)
    }

    /// Loads the font pointed to by a handle.
    fn from_handle(handle: &Handle) -> Result<Self, FontLoadingError> {
        match *handle {
            Handle::Memory {
                ref bytes,
                font_index,
            } => Self::from_bytes((*bytes).clone(), font_index),
            Handle::Path {
                ref path,
                font_index,
            } => Self::from_path(path, font_index),
        }
    }

    /// Returns the name of the font family, if the font names one.
    fn family_name(&self) -> Option<String>;

    /// Returns the number of glyphs in the font.
    ///
    /// Glyph IDs range from 0 inclusive to this value exclusive.
    fn glyph_count(&self) -> u32;

    /// Returns the usual glyph ID for a Unicode character, or `None` if the font has no glyph
    /// for it.
    ///
    /// This is a plain character map lookup, not shaping.
    fn glyph_for_char(&self, character: char) -> Option<u32>;

    /// Sends the vector path for a glyph to a sink, in font units with the y axis pointing up.
    ///
    /// A glyph with no contours (a space, say) sends nothing and succeeds.
    fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink;

    /// Returns the distance from the origin of the glyph with the given ID to the next, in font
    /// units.
    fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError>;

    /// Retrieves various metrics that apply to the entire font.
    fn metrics(&self) -> Metrics;

    /// Renders a glyph into a single-channel coverage bitmap at the given point size and
    /// resolution.
    ///
    /// The bitmap is cropped to the glyph's ink. A glyph without ink yields an empty bitmap.
    ///
    /// The default implementation scales the glyph's outline and fills it with the built-in
    /// coverage rasterizer.
    fn rasterize_glyph(&self,
                       glyph_id: u32,
                       point_size: f32,
                       dpi: f32)
                       -> Result<GlyphBitmap, GlyphLoadingError> {
        let scale = self.metrics().scale(point_size, dpi);
        let mut builder = OutlineBuilder::with_transform(Transform2F::from_scale(vec2f(scale,
                                                                                       -scale)));
        self.outline(glyph_id, &mut builder)?;
        let mut outline = builder.into_outline();

        let bounds = match outline.bounds() {
            Some(bounds) if bounds.width() > 0.0 && bounds.height() > 0.0 &&
                (bounds.width() + bounds.height()).is_finite() => bounds.round_out(),
            _ => {
                trace!("glyph {} has no ink", glyph_id);
                return Ok(GlyphBitmap::new(0, 0, BITMAP_ROW_ALIGNMENT));
            }
        };

        outline.translate(-bounds.origin());
        let mut rasterizer = CoverageRasterizer::new(bounds.size().to_i32());
        outline.copy_to(&mut rasterizer);
        Ok(rasterizer.into_bitmap(BITMAP_ROW_ALIGNMENT))
    }
}
