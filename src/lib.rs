// glyph-raster/src/lib.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![warn(missing_docs)]

//! `glyph-raster` renders single glyphs and short strings from TrueType/OpenType fonts into
//! tightly cropped RGBA images and writes them out as PNG files.
//!
//! There are two ways to get glyph coverage:
//!
//! * Text is laid out left to right from the font's advances and its vector outlines are filled
//!   with the crate's own coverage rasterizer (`render_text`).
//!
//! * A single character is rendered by the loader's native glyph renderer into a coverage bitmap
//!   (`render_glyph_bitmap`). With the `loader-freetype` feature this is FreeType's rasterizer.
//!
//! Either way the canvas is cropped to the glyph bounds (at least 1×1), filled with the
//! background color, painted, and handed to an `ImageSink`.
//!
//! To open a font, use `Handle::load()` or one of the `from_*` constructors on
//! `loaders::default::Font`. A missing font is represented by passing `None`; the render
//! functions then write nothing and report `RenderOutcome::Skipped`.

pub mod batch;
pub mod bitmap;
pub mod bounds;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod error;
pub mod export;
pub mod handle;
pub mod loader;
pub mod loaders;
pub mod metrics;
pub mod outline;
pub mod raster;
pub mod rasterizer;
pub mod shaper;

pub use crate::color::Color;
pub use crate::rasterizer::{render_glyph_bitmap, render_text, RenderOutcome, SkipReason};
