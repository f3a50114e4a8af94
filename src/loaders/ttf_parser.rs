// glyph-raster/src/loaders/ttf_parser.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A pure-Rust loader built on `ttf-parser`.
//!
//! Glyph bitmaps come from the crate's own coverage rasterizer, so the loader works the same on
//! every platform and can be shared freely between threads.

use ::ttf_parser::name_id;
use ::ttf_parser::{Face, FaceParsingError, GlyphId};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::vector::{vec2f, Vector2F};
use std::fmt::{self, Debug, Formatter};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::{FontLoadingError, GlyphLoadingError};
use crate::handle::Handle;
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::outline::OutlineSink;

/// A TrueType/OpenType font parsed with `ttf-parser`.
///
/// The face is parsed once, when the font is loaded, and shared between clones.
#[derive(Clone)]
pub struct Font {
    face: Arc<OwnedFace>,
    font_index: u32,
    family_name: Option<String>,
    glyph_count: u32,
    metrics: Metrics,
}

impl Font {
    /// Loads a font from raw font data (the contents of a `.ttf`/`.otf`/etc. file).
    ///
    /// If the data represents a collection (`.ttc`/`.otc`/etc.), `font_index` specifies the index
    /// of the font to load from it. If the data represents a single font, pass 0 for `font_index`.
    pub fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Font, FontLoadingError> {
        let font_data = Arc::try_unwrap(font_data).unwrap_or_else(|shared| (*shared).clone());
        let face = OwnedFace::from_vec(font_data, font_index).map_err(face_parsing_error)?;

        let (family_name, glyph_count, metrics) = {
            let face = face.as_face_ref();
            let family_name = face
                .names()
                .into_iter()
                .filter(|name| name.name_id == name_id::FAMILY)
                .find_map(|name| name.to_string());
            let metrics = Metrics {
                units_per_em: face.units_per_em() as u32,
                ascent: face.ascender() as f32,
                descent: face.descender() as f32,
                line_gap: face.line_gap() as f32,
            };
            (family_name, face.number_of_glyphs() as u32, metrics)
        };

        Ok(Font {
            face: Arc::new(face),
            font_index,
            family_name,
            glyph_count,
            metrics,
        })
    }

    /// Loads a font from a `.ttf`/`.otf`/etc. file.
    #[inline]
    pub fn from_file(file: &mut File, font_index: u32) -> Result<Font, FontLoadingError> {
        <Font as Loader>::from_file(file, font_index)
    }

    /// Loads a font from the path to a `.ttf`/`.otf`/etc. file.
    #[inline]
    pub fn from_path<P>(path: P, font_index: u32) -> Result<Font, FontLoadingError>
    where
        P: AsRef<Path>,
    {
        <Font as Loader>::from_path(path, font_index)
    }

    /// Loads the font pointed to by a handle.
    #[inline]
    pub fn from_handle(handle: &Handle) -> Result<Font, FontLoadingError> {
        <Font as Loader>::from_handle(handle)
    }

    /// Returns a copy of the raw font data.
    ///
    /// If this font is a member of a collection, this is the data for the entire collection.
    #[inline]
    pub fn font_data(&self) -> Arc<Vec<u8>> {
        Arc::new(self.face.as_slice().to_vec())
    }

    #[inline]
    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn glyph_id(&self, glyph_id: u32) -> Result<GlyphId, GlyphLoadingError> {
        if glyph_id >= self.glyph_count {
            return Err(GlyphLoadingError::NoSuchGlyph);
        }
        Ok(GlyphId(glyph_id as u16))
    }
}

impl Loader for Font {
    #[inline]
    fn from_bytes(font_data: Arc<Vec<u8>>, font_index: u32) -> Result<Self, FontLoadingError> {
        Font::from_bytes(font_data, font_index)
    }

    #[inline]
    fn family_name(&self) -> Option<String> {
        self.family_name.clone()
    }

    #[inline]
    fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    fn glyph_for_char(&self, character: char) -> Option<u32> {
        match self.face().glyph_index(character) {
            Some(GlyphId(0)) | None => None,
            Some(GlyphId(glyph_id)) => Some(glyph_id as u32),
        }
    }

    fn outline<S>(&self, glyph_id: u32, sink: &mut S) -> Result<(), GlyphLoadingError>
    where
        S: OutlineSink,
    {
        let glyph_id = self.glyph_id(glyph_id)?;
        // `None` here means the glyph has no contours, which is not an error.
        self.face().outline_glyph(glyph_id, &mut OutlineAdapter { sink });
        Ok(())
    }

    fn advance(&self, glyph_id: u32) -> Result<Vector2F, GlyphLoadingError> {
        let glyph_id = self.glyph_id(glyph_id)?;
        let advance = self.face().glyph_hor_advance(glyph_id).unwrap_or(0);
        Ok(vec2f(advance as f32, 0.0))
    }

    #[inline]
    fn metrics(&self) -> Metrics {
        self.metrics
    }
}

impl Debug for Font {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        fmt.debug_struct("Font")
            .field("family_name", &self.family_name)
            .field("font_index", &self.font_index)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}

fn face_parsing_error(err: FaceParsingError) -> FontLoadingError {
    match err {
        FaceParsingError::UnknownMagic => FontLoadingError::UnknownFormat,
        FaceParsingError::FaceIndexOutOfBounds => FontLoadingError::NoSuchFontInCollection,
        FaceParsingError::MalformedFont |
        FaceParsingError::NoHeadTable |
        FaceParsingError::NoHheaTable |
        FaceParsingError::NoMaxpTable => FontLoadingError::Parse,
    }
}

// Forwards `ttf-parser` path commands to an `OutlineSink`, in font units.
struct OutlineAdapter<'a, S> {
    sink: &'a mut S,
}

impl<'a, S> ::ttf_parser::OutlineBuilder for OutlineAdapter<'a, S>
where
    S: OutlineSink,
{
    fn move_to(&mut self, x: f32, y: f32) {
        self.sink.move_to(vec2f(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.sink.line_to(vec2f(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.sink.quadratic_curve_to(vec2f(x1, y1), vec2f(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.sink.cubic_curve_to(LineSegment2F::new(vec2f(x1, y1), vec2f(x2, y2)), vec2f(x, y));
    }

    fn close(&mut self) {
        self.sink.close();
    }
}
