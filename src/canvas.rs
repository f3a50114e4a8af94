// glyph-raster/src/canvas.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An in-memory bitmap surface that rasterized glyphs are composited into.

use pathfinder_geometry::vector::Vector2I;
use std::cmp;

use crate::color::Color;

/// An in-memory bitmap surface for glyph rasterization.
#[derive(Clone, PartialEq, Debug)]
pub struct Canvas {
    /// The raw pixel data.
    pub pixels: Vec<u8>,
    /// The size of the buffer, in pixels.
    pub size: Vector2I,
    /// The number of *bytes* between successive rows.
    pub stride: usize,
    /// The image format of the canvas.
    pub format: Format,
}

impl Canvas {
    /// Creates a new blank canvas with the given pixel size and format.
    ///
    /// Stride is automatically calculated from width. Negative sides are treated as zero.
    ///
    /// The canvas is initialized with transparent black (all values 0).
    #[inline]
    pub fn new(size: Vector2I, format: Format) -> Canvas {
        let width = cmp::max(size.x(), 0) as usize;
        Canvas::with_stride(size, width * format.bytes_per_pixel() as usize, format)
    }

    /// Creates a new blank canvas with the given pixel size, stride (number of bytes between
    /// successive rows), and format.
    ///
    /// The canvas is initialized with transparent black (all values 0).
    pub fn with_stride(size: Vector2I, stride: usize, format: Format) -> Canvas {
        let size = Vector2I::new(cmp::max(size.x(), 0), cmp::max(size.y(), 0));
        Canvas {
            pixels: vec![0; stride * size.y() as usize],
            size,
            stride,
            format,
        }
    }

    /// The width of the canvas in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.x() as u32
    }

    /// The height of the canvas in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.y() as u32
    }

    /// Sets every pixel of the canvas to `color`.
    ///
    /// `A8` canvases receive the alpha channel and `Rgb24` canvases drop it.
    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_bytes();
        let pattern: &[u8] = match self.format {
            Format::Rgba32 => &bytes,
            Format::Rgb24 => &bytes[0..3],
            Format::A8 => &bytes[3..4],
        };
        let row_len = self.size.x() as usize * pattern.len();
        if row_len == 0 {
            return;
        }
        for row in self.pixels.chunks_mut(self.stride) {
            for pixel in row[..row_len].chunks_mut(pattern.len()) {
                pixel.copy_from_slice(pattern);
            }
        }
    }

    /// Returns the color at `(x, y)` of an `Rgba32` canvas, or `None` if the point is outside
    /// the canvas or the canvas has another format.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let start = self.pixel_offset(x, y)?;
        Some(Color::from_bytes(&self.pixels[start..start + 4]))
    }

    /// Writes `color` at `(x, y)` of an `Rgba32` canvas. Points outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(start) = self.pixel_offset(x, y) {
            self.pixels[start..start + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Returns the pixels of row `y` without the stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let len = self.size.x() as usize * self.format.bytes_per_pixel() as usize;
        &self.pixels[start..start + len]
    }

    /// Returns the pixel data packed tightly, with the stride padding removed.
    pub fn to_packed(&self) -> Vec<u8> {
        let row_len = self.size.x() as usize * self.format.bytes_per_pixel() as usize;
        if row_len == self.stride {
            return self.pixels.clone();
        }
        let mut packed = Vec::with_capacity(row_len * self.size.y() as usize);
        for y in 0..self.height() {
            packed.extend_from_slice(self.row(y));
        }
        packed
    }

    fn pixel_offset(&self, x: u32, y: u32) -> Option<usize> {
        if self.format != Format::Rgba32 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(y as usize * self.stride + x as usize * 4)
    }

    /// Copies pixels from another canvas into the top left corner of this one, converting
    /// formats as necessary.
    ///
    /// Converting to `A8` keeps the source alpha; converting from `A8` replicates each sample into
    /// the color channels and writes opaque alpha.
    pub fn blit_from_canvas(&mut self, src: &Canvas) {
        self.blit_from(&src.pixels, src.size, src.stride, src.format)
    }

    /// Copies pixels from `src_bytes` into the top left corner of this canvas, converting formats
    /// as necessary. Rows are read `src_stride` bytes apart; the stride never affects the number
    /// of pixels copied.
    pub(crate) fn blit_from(&mut self,
                            src_bytes: &[u8],
                            src_size: Vector2I,
                            src_stride: usize,
                            src_format: Format) {
        let width = cmp::max(cmp::min(src_size.x(), self.size.x()), 0);
        let height = cmp::max(cmp::min(src_size.y(), self.size.y()), 0);
        let size = Vector2I::new(width, height);

        match (self.format, src_format) {
            (Format::A8, Format::A8) |
            (Format::Rgb24, Format::Rgb24) |
            (Format::Rgba32, Format::Rgba32) => {
                self.blit_from_with::<BlitMemcpy>(src_bytes, size, src_stride, src_format)
            }
            (Format::A8, Format::Rgb24) => {
                self.blit_from_with::<BlitRgb24ToA8>(src_bytes, size, src_stride, src_format)
            }
            (Format::A8, Format::Rgba32) => {
                self.blit_from_with::<BlitRgba32ToA8>(src_bytes, size, src_stride, src_format)
            }
            (Format::Rgb24, Format::A8) => {
                self.blit_from_with::<BlitA8ToRgb24>(src_bytes, size, src_stride, src_format)
            }
            (Format::Rgb24, Format::Rgba32) => {
                self.blit_from_with::<BlitRgba32ToRgb24>(src_bytes, size, src_stride, src_format)
            }
            (Format::Rgba32, Format::A8) => {
                self.blit_from_with::<BlitA8ToRgba32>(src_bytes, size, src_stride, src_format)
            }
            (Format::Rgba32, Format::Rgb24) => {
                self.blit_from_with::<BlitRgb24ToRgba32>(src_bytes, size, src_stride, src_format)
            }
        }
    }

    fn blit_from_with<B>(&mut self,
                         src_bytes: &[u8],
                         size: Vector2I,
                         src_stride: usize,
                         src_format: Format)
                         where B: Blit {
        let src_bytes_per_pixel = src_format.bytes_per_pixel() as usize;
        let dest_bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        let (width, height) = (size.x() as usize, size.y() as usize);

        for y in 0..height {
            let (dest_row_start, src_row_start) = (y * self.stride, y * src_stride);
            let dest_row_end = dest_row_start + width * dest_bytes_per_pixel;
            let src_row_end = src_row_start + width * src_bytes_per_pixel;
            let dest_row_pixels = &mut self.pixels[dest_row_start..dest_row_end];
            let src_row_pixels = &src_bytes[src_row_start..src_row_end];
            B::blit(dest_row_pixels, src_row_pixels)
        }
    }
}

/// The image format for the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Straight-alpha R8G8B8A8, in that byte order.
    Rgba32,
    /// R8G8B8, in that byte order.
    Rgb24,
    /// A8.
    A8,
}

impl Format {
    /// Returns the number of bits per pixel that this image format corresponds to.
    #[inline]
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            Format::Rgba32 => 32,
            Format::Rgb24 => 24,
            Format::A8 => 8,
        }
    }

    /// Returns the number of bytes per pixel that this image format corresponds to.
    #[inline]
    pub fn bytes_per_pixel(self) -> u8 {
        self.bits_per_pixel() / 8
    }
}

trait Blit {
    fn blit(dest: &mut [u8], src: &[u8]);
}

struct BlitMemcpy;

impl Blit for BlitMemcpy {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        dest.clone_from_slice(src)
    }
}

struct BlitRgb24ToA8;

impl Blit for BlitRgb24ToA8 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.iter_mut().zip(src.chunks(3)) {
            *dest = src[1]
        }
    }
}

struct BlitRgba32ToA8;

impl Blit for BlitRgba32ToA8 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.iter_mut().zip(src.chunks(4)) {
            *dest = src[3]
        }
    }
}

struct BlitA8ToRgb24;

impl Blit for BlitA8ToRgb24 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.chunks_mut(3).zip(src.iter()) {
            dest[0] = *src;
            dest[1] = *src;
            dest[2] = *src;
        }
    }
}

// Luminance replication. Alpha is not derived from the sample.
struct BlitA8ToRgba32;

impl Blit for BlitA8ToRgba32 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.chunks_mut(4).zip(src.iter()) {
            dest[0] = *src;
            dest[1] = *src;
            dest[2] = *src;
            dest[3] = 0xff;
        }
    }
}

struct BlitRgba32ToRgb24;

impl Blit for BlitRgba32ToRgb24 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.chunks_mut(3).zip(src.chunks(4)) {
            dest.copy_from_slice(&src[0..3])
        }
    }
}

struct BlitRgb24ToRgba32;

impl Blit for BlitRgb24ToRgba32 {
    #[inline]
    fn blit(dest: &mut [u8], src: &[u8]) {
        for (dest, src) in dest.chunks_mut(4).zip(src.chunks(3)) {
            dest[0..3].copy_from_slice(src);
            dest[3] = 0xff;
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Canvas, Format};
    use crate::color::Color;
    use pathfinder_geometry::vector::Vector2I;

    #[test]
    fn fill_sets_every_pixel() {
        let mut canvas = Canvas::new(Vector2I::new(3, 2), Format::Rgba32);
        let color = Color::rgba(1, 2, 3, 4);
        canvas.fill(color);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(canvas.pixel(x, y), Some(color));
            }
        }
        assert_eq!(canvas.pixel(3, 0), None);
    }

    #[test]
    fn fill_leaves_stride_padding_alone() {
        let mut canvas = Canvas::with_stride(Vector2I::new(1, 2), 8, Format::Rgba32);
        canvas.fill(Color::WHITE);
        assert_eq!(&canvas.pixels[4..8], &[0, 0, 0, 0]);
        assert_eq!(canvas.to_packed(), vec![0xff; 8]);
    }

    #[test]
    fn blit_a8_to_rgba32_replicates_luminance() {
        let mut canvas = Canvas::new(Vector2I::new(2, 2), Format::Rgba32);
        // Two rows of two samples, padded to a stride of 3.
        let src = [10, 20, 99, 30, 40, 99];
        canvas.blit_from(&src, Vector2I::new(2, 2), 3, Format::A8);
        assert_eq!(canvas.pixel(0, 0), Some(Color::gray(10)));
        assert_eq!(canvas.pixel(1, 0), Some(Color::gray(20)));
        assert_eq!(canvas.pixel(0, 1), Some(Color::gray(30)));
        assert_eq!(canvas.pixel(1, 1), Some(Color::gray(40)));
    }

    #[test]
    fn blit_rgba32_to_a8_keeps_alpha() {
        let mut dest = Canvas::new(Vector2I::new(1, 1), Format::A8);
        let mut src = Canvas::new(Vector2I::new(1, 1), Format::Rgba32);
        src.fill(Color::rgba(1, 2, 3, 77));
        dest.blit_from_canvas(&src);
        assert_eq!(dest.pixels, vec![77]);
    }
}
