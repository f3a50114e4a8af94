// glyph-raster/src/rasterizer.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The rendering pipeline: glyph source, bounds, compositing, and export.
//!
//! Both glyph sources, laid-out vector outlines and native glyph bitmaps, go through the same
//! steps: their bounds are normalized into a canvas size, the canvas is filled with the
//! background and the glyph coverage is painted on top, and the result is handed to an
//! `ImageSink`.
//!
//! A missing font or an unrenderable character is not an error. Nothing is written and the
//! outcome says why; only storage failures are reported as errors.

use log::debug;
use std::path::Path;

use crate::bitmap::GlyphBitmap;
use crate::bounds::{self, NormalizedBounds};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::compositor::{self, BitmapAlpha};
use crate::error::ExportError;
use crate::export::{ImageSink, PngFile};
use crate::loader::Loader;
use crate::shaper::{self, ShapedText};

/// Options that apply to every glyph a `Rasterizer` renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// The nominal font size, in points.
    pub point_size: f32,
    /// The output resolution, in dots per inch. At 72 DPI one point is one pixel.
    pub dpi: f32,
    /// The color outline glyphs are painted with.
    pub foreground: Color,
    /// How native glyph bitmap samples become canvas alpha.
    pub bitmap_alpha: BitmapAlpha,
}

impl Default for RasterOptions {
    #[inline]
    fn default() -> RasterOptions {
        RasterOptions {
            point_size: 72.0,
            dpi: 72.0,
            foreground: Color::BLACK,
            bitmap_alpha: BitmapAlpha::Opaque,
        }
    }
}

/// Glyph coverage waiting to be composited.
#[derive(Clone, Debug)]
pub enum GlyphSource {
    /// Laid-out vector outlines, filled with the foreground color.
    Outline(ShapedText),
    /// A single-channel bitmap from the font's own renderer, expanded into gray levels.
    Bitmap(GlyphBitmap),
}

impl GlyphSource {
    /// The canvas size and content translation for this source.
    pub fn bounds(&self) -> NormalizedBounds {
        match *self {
            GlyphSource::Outline(ref shaped) => bounds::normalize(shaped.bounds),
            GlyphSource::Bitmap(ref bitmap) => bounds::normalize_bitmap(bitmap),
        }
    }

    /// Composites this source onto a fresh canvas filled with `background`.
    pub fn compose(self, background: Color, options: &RasterOptions) -> Canvas {
        let bounds = self.bounds();
        match self {
            GlyphSource::Outline(shaped) => {
                compositor::compose_outline(&shaped.outline,
                                            &bounds,
                                            background,
                                            options.foreground)
            }
            GlyphSource::Bitmap(bitmap) => {
                compositor::compose_bitmap(bitmap, &bounds, background, options.bitmap_alpha)
            }
        }
    }
}

/// Why nothing was rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No font was supplied.
    MissingFont,
    /// The font has no renderable glyph for the character.
    MissingGlyph,
}

/// The result of a render request that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// An image of the given size was written.
    Written {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Nothing was written.
    Skipped(SkipReason),
}

impl RenderOutcome {
    /// Returns true if an image was written.
    #[inline]
    pub fn is_written(&self) -> bool {
        matches!(*self, RenderOutcome::Written { .. })
    }
}

/// Renders text and glyphs with fixed options into an image sink.
///
/// A `Rasterizer` holds no per-call state, so one instance may serve any number of calls,
/// including concurrent ones when the sink allows it.
#[derive(Clone, Debug)]
pub struct Rasterizer<S = PngFile> {
    options: RasterOptions,
    sink: S,
}

impl Rasterizer<PngFile> {
    /// Creates a rasterizer that writes PNG files with the default options.
    #[inline]
    pub fn new() -> Rasterizer<PngFile> {
        Rasterizer::with_sink(RasterOptions::default(), PngFile)
    }

    /// Creates a rasterizer that writes PNG files.
    #[inline]
    pub fn with_options(options: RasterOptions) -> Rasterizer<PngFile> {
        Rasterizer::with_sink(options, PngFile)
    }
}

impl Default for Rasterizer<PngFile> {
    #[inline]
    fn default() -> Rasterizer<PngFile> {
        Rasterizer::new()
    }
}

impl<S> Rasterizer<S>
where
    S: ImageSink,
{
    /// Creates a rasterizer that hands finished images to `sink`.
    #[inline]
    pub fn with_sink(options: RasterOptions, sink: S) -> Rasterizer<S> {
        Rasterizer { options, sink }
    }

    /// The options every render uses.
    #[inline]
    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    /// The sink finished images go to.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Lays out `text` and composites its outlines without storing anything.
    ///
    /// Returns `None` only when `font` is `None`. Text with nothing to draw yields a 1×1 canvas
    /// of the background color.
    pub fn rasterize_text<F>(&self,
                             font: Option<&F>,
                             text: &str,
                             background: Option<Color>)
                             -> Option<Canvas>
    where
        F: Loader,
    {
        self.text_source(font, text)
            .ok()
            .map(|source| source.compose(background.unwrap_or_default(), &self.options))
    }

    /// Renders `character` with the font's native glyph renderer and composites the bitmap
    /// without storing anything.
    ///
    /// Returns `None` when `font` is `None` or the character has no renderable glyph.
    pub fn rasterize_glyph_bitmap<F>(&self,
                                     font: Option<&F>,
                                     character: char,
                                     background: Option<Color>)
                                     -> Option<Canvas>
    where
        F: Loader,
    {
        self.glyph_bitmap_source(font, character)
            .ok()
            .map(|source| source.compose(background.unwrap_or_default(), &self.options))
    }

    /// Lays out `text`, composites it, and stores the image at `output_path`.
    pub fn render_text<F, P>(&self,
                             font: Option<&F>,
                             text: &str,
                             output_path: P,
                             background: Option<Color>)
                             -> Result<RenderOutcome, ExportError>
    where
        F: Loader,
        P: AsRef<Path>,
    {
        let source = self.text_source(font, text);
        self.export(source, output_path.as_ref(), background)
    }

    /// Renders `character` with the font's native glyph renderer, composites it, and stores the
    /// image at `output_path`.
    pub fn render_glyph_bitmap<F, P>(&self,
                                     font: Option<&F>,
                                     character: char,
                                     output_path: P,
                                     background: Option<Color>)
                                     -> Result<RenderOutcome, ExportError>
    where
        F: Loader,
        P: AsRef<Path>,
    {
        let source = self.glyph_bitmap_source(font, character);
        self.export(source, output_path.as_ref(), background)
    }

    fn text_source<F>(&self, font: Option<&F>, text: &str) -> Result<GlyphSource, SkipReason>
    where
        F: Loader,
    {
        let font = font.ok_or(SkipReason::MissingFont)?;
        let shaped = shaper::shape_text(font, text, self.options.point_size, self.options.dpi);
        Ok(GlyphSource::Outline(shaped))
    }

    fn glyph_bitmap_source<F>(&self,
                              font: Option<&F>,
                              character: char)
                              -> Result<GlyphSource, SkipReason>
    where
        F: Loader,
    {
        let font = font.ok_or(SkipReason::MissingFont)?;
        produce_glyph_bitmap(font, character, &self.options)
            .map(GlyphSource::Bitmap)
            .ok_or(SkipReason::MissingGlyph)
    }

    fn export(&self,
              source: Result<GlyphSource, SkipReason>,
              output_path: &Path,
              background: Option<Color>)
              -> Result<RenderOutcome, ExportError> {
        let source = match source {
            Ok(source) => source,
            Err(reason) => {
                debug!("not writing {}: {:?}", output_path.display(), reason);
                return Ok(RenderOutcome::Skipped(reason));
            }
        };

        let canvas = source.compose(background.unwrap_or_default(), &self.options);
        self.sink.write_canvas(output_path, &canvas)?;
        Ok(RenderOutcome::Written {
            width: canvas.width(),
            height: canvas.height(),
        })
    }
}

/// Renders `character` into a coverage bitmap with the font's native glyph renderer.
///
/// Returns `None` if the font has no glyph for the character, the glyph fails to render, or the
/// glyph has no ink (a space, say).
pub fn produce_glyph_bitmap<F>(font: &F,
                               character: char,
                               options: &RasterOptions)
                               -> Option<GlyphBitmap>
where
    F: Loader,
{
    let glyph_id = match font.glyph_for_char(character) {
        Some(glyph_id) => glyph_id,
        None => {
            debug!("no glyph for {:?}", character);
            return None;
        }
    };
    let bitmap = match font.rasterize_glyph(glyph_id, options.point_size, options.dpi) {
        Ok(bitmap) => bitmap,
        Err(err) => {
            debug!("failed to rasterize {:?}: {}", character, err);
            return None;
        }
    };
    if bitmap.is_empty() {
        debug!("glyph for {:?} has no ink", character);
        return None;
    }
    Some(bitmap)
}

/// Renders `text` with the default options into a PNG file at `output_path`.
///
/// With no font this writes nothing and returns `RenderOutcome::Skipped`. The background
/// defaults to transparent.
pub fn render_text<F, P>(font: Option<&F>,
                         text: &str,
                         output_path: P,
                         background: Option<Color>)
                         -> Result<RenderOutcome, ExportError>
where
    F: Loader,
    P: AsRef<Path>,
{
    Rasterizer::new().render_text(font, text, output_path, background)
}

/// Renders `character` with the font's native glyph renderer and the default options into a
/// PNG file at `output_path`.
///
/// With no font, or no renderable glyph, this writes nothing and returns
/// `RenderOutcome::Skipped`.
pub fn render_glyph_bitmap<F, P>(font: Option<&F>,
                                 character: char,
                                 output_path: P,
                                 background: Option<Color>)
                                 -> Result<RenderOutcome, ExportError>
where
    F: Loader,
    P: AsRef<Path>,
{
    Rasterizer::new().render_glyph_bitmap(font, character, output_path, background)
}
