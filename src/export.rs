// glyph-raster/src/export.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Writing finished canvases out as PNG images.

use log::debug;
use png::{BitDepth, ColorType, EncodingError};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::canvas::{Canvas, Format};
use crate::error::ExportError;

/// Somewhere finished images can be stored.
pub trait ImageSink {
    /// Stores a `width × height` image of tightly packed straight-alpha RGBA pixels at `path`.
    fn write_rgba(&self,
                  path: &Path,
                  width: u32,
                  height: u32,
                  rgba: &[u8])
                  -> Result<(), ExportError>;

    /// Stores an `Rgba32` canvas at `path`.
    fn write_canvas(&self, path: &Path, canvas: &Canvas) -> Result<(), ExportError> {
        debug_assert_eq!(canvas.format, Format::Rgba32);
        self.write_rgba(path, canvas.width(), canvas.height(), &canvas.to_packed())
    }
}

/// Writes PNG files to the filesystem.
///
/// An existing file at the destination is deleted first and the image is written to a freshly
/// created file.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngFile;

impl ImageSink for PngFile {
    fn write_rgba(&self,
                  path: &Path,
                  width: u32,
                  height: u32,
                  rgba: &[u8])
                  -> Result<(), ExportError> {
        match fs::remove_file(path) {
            Ok(()) => debug!("replacing {}", path.display()),
            Err(ref err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let mut file = BufWriter::new(File::create(path)?);
        write_png(&mut file, width, height, rgba)?;
        file.flush()?;
        debug!("wrote {}×{} image to {}", width, height, path.display());
        Ok(())
    }
}

/// Encodes an `Rgba32` canvas as a PNG image in memory.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, ExportError> {
    let mut bytes = vec![];
    write_png(&mut bytes, canvas.width(), canvas.height(), &canvas.to_packed())?;
    Ok(bytes)
}

// 8-bit RGBA, channels in buffer order.
fn write_png<W>(output: W, width: u32, height: u32, rgba: &[u8]) -> Result<(), ExportError>
where
    W: Write,
{
    let mut encoder = png::Encoder::new(output, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(encoding_error)?;
    writer.write_image_data(rgba).map_err(encoding_error)?;
    writer.finish().map_err(encoding_error)
}

fn encoding_error(err: EncodingError) -> ExportError {
    match err {
        EncodingError::IoError(err) => ExportError::Io(err),
        err => ExportError::Encoding(err),
    }
}

#[cfg(test)]
mod test {
    use super::encode_png;
    use crate::canvas::{Canvas, Format};
    use crate::color::Color;
    use crate::error::ExportError;
    use pathfinder_geometry::vector::Vector2I;

    #[test]
    fn encodes_rgba8_header() {
        let mut canvas = Canvas::new(Vector2I::new(3, 2), Format::Rgba32);
        canvas.fill(Color::rgba(1, 2, 3, 4));
        let bytes = encode_png(&canvas).unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
        // IHDR: width, height, bit depth 8, color type 6 (RGBA).
        assert_eq!(&bytes[12..16], b"IHDR");
        assert_eq!(&bytes[16..24], &[0, 0, 0, 3, 0, 0, 0, 2]);
        assert_eq!(&bytes[24..26], &[8, 6]);
    }

    #[test]
    fn zero_sized_canvas_is_an_encoding_error() {
        let canvas = Canvas::new(Vector2I::new(0, 0), Format::Rgba32);
        match encode_png(&canvas) {
            Err(ExportError::Encoding(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
