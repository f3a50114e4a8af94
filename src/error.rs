// glyph-raster/src/error.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various types of errors that `glyph-raster` can return.

use std::io;
use thiserror::Error;

/// Reasons why a loader might fail to load a font.
#[derive(Debug, Error)]
pub enum FontLoadingError {
    /// The data was of a format the loader didn't recognize.
    #[error("unknown format")]
    UnknownFormat,

    /// Attempted to load an invalid index in a TrueType or OpenType font collection.
    ///
    /// For example, if a `.ttc` file has 2 fonts in it, and you ask for the 5th one, you'll get
    /// this error.
    #[error("no such font in the collection")]
    NoSuchFontInCollection,

    /// Attempted to load a malformed or corrupted font.
    #[error("parse error")]
    Parse,

    /// A disk or similar I/O error occurred while attempting to load the font.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Reasons why a font might fail to load a glyph.
#[derive(Clone, Copy, PartialEq, Debug, Error)]
pub enum GlyphLoadingError {
    /// The font didn't contain a glyph with that ID.
    #[error("no such glyph")]
    NoSuchGlyph,

    /// The platform glyph renderer failed or produced something the crate can't use.
    #[error("platform error")]
    PlatformError,
}

/// Reasons why a finished canvas could not be written out.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The destination could not be removed, created, or written.
    #[error("failed to write image: {0}")]
    Io(#[from] io::Error),

    /// The PNG encoder rejected the image.
    #[error("failed to encode image: {0}")]
    Encoding(#[from] png::EncodingError),
}
