// glyph-raster/src/loaders/mod.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The font loaders.
//!
//! `ttf_parser` is always available and is the default. The FreeType loader, which renders glyph
//! bitmaps with FreeType's own rasterizer, is enabled with the `loader-freetype` feature.

pub use self::ttf_parser as default;

pub mod ttf_parser;

#[cfg(feature = "loader-freetype")]
pub mod freetype;
