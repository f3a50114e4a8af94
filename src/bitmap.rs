// glyph-raster/src/bitmap.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Single-channel glyph coverage bitmaps, as produced by a native glyph renderer.

use lazy_static::lazy_static;
use pathfinder_geometry::vector::Vector2I;
use std::cmp;

lazy_static! {
    static ref BITMAP_1BPP_TO_8BPP_LUT: [[u8; 8]; 256] = {
        let mut lut = [[0; 8]; 256];
        for byte in 0..0x100 {
            let mut value = [0; 8];
            for bit in 0..8 {
                if (byte & (0x80 >> bit)) != 0 {
                    value[bit] = 0xff;
                }
            }
            lut[byte] = value
        }
        lut
    };
}

/// A grid of 8-bit coverage samples.
///
/// Rows are `stride` bytes apart, and `stride` may exceed `width`. The samples are owned, so the
/// memory is released whenever the bitmap is dropped or consumed.
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphBitmap {
    width: u32,
    height: u32,
    stride: usize,
    samples: Vec<u8>,
}

impl GlyphBitmap {
    /// Creates a zeroed bitmap with the given size and a stride padded to `row_alignment` bytes.
    pub fn new(width: u32, height: u32, row_alignment: usize) -> GlyphBitmap {
        let row_alignment = cmp::max(row_alignment, 1);
        let stride = (width as usize + row_alignment - 1) / row_alignment * row_alignment;
        GlyphBitmap {
            width,
            height,
            stride,
            samples: vec![0; stride * height as usize],
        }
    }

    /// Wraps existing samples.
    ///
    /// Returns `None` if `stride < width` or `samples` is too short to hold `height` rows.
    pub fn from_samples(width: u32,
                        height: u32,
                        stride: usize,
                        samples: Vec<u8>)
                        -> Option<GlyphBitmap> {
        if stride < width as usize || samples.len() < stride * height as usize {
            return None;
        }
        Some(GlyphBitmap { width, height, stride, samples })
    }

    /// Expands a 1-bit-per-pixel bitmap (most significant bit first, rows `pitch` bytes apart)
    /// into 8-bit samples of 0 or 255.
    pub fn from_mono(src_bytes: &[u8], width: u32, height: u32, pitch: usize) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::new(width, height, 1);
        let src_row_stride = (width as usize + 7) / 8;
        if pitch < src_row_stride {
            return bitmap;
        }

        for y in 0..height as usize {
            let src_row_start = y * pitch;
            let src_row_pixels = match src_bytes.get(src_row_start..src_row_start + src_row_stride) {
                Some(row) => row,
                None => break,
            };
            let dest_row_start = y * bitmap.stride;
            let dest_row_pixels =
                &mut bitmap.samples[dest_row_start..dest_row_start + width as usize];
            for (x, &byte) in src_row_pixels.iter().enumerate() {
                let pattern = &BITMAP_1BPP_TO_8BPP_LUT[byte as usize];
                let dest_start = x * 8;
                let dest_end = cmp::min(dest_start + 8, width as usize);
                dest_row_pixels[dest_start..dest_end]
                    .copy_from_slice(&pattern[0..(dest_end - dest_start)]);
            }
        }
        bitmap
    }

    /// The width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The size in pixels.
    #[inline]
    pub fn size(&self) -> Vector2I {
        Vector2I::new(self.width as i32, self.height as i32)
    }

    /// The number of bytes between successive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True if the bitmap has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The raw samples, including any padding at the end of each row.
    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// The raw samples, mutably.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Returns the sample at `(x, y)`, or `None` outside the bitmap.
    pub fn sample(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.samples[y as usize * self.stride + x as usize])
    }

    /// Returns the `width` samples of row `y`, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.samples[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod test {
    use super::GlyphBitmap;

    #[test]
    fn new_pads_stride_to_alignment() {
        let bitmap = GlyphBitmap::new(5, 3, 4);
        assert_eq!(bitmap.stride(), 8);
        assert_eq!(bitmap.samples().len(), 24);
        assert_eq!(bitmap.row(2).len(), 5);
    }

    #[test]
    fn from_samples_rejects_short_buffers() {
        assert!(GlyphBitmap::from_samples(4, 2, 3, vec![0; 8]).is_none());
        assert!(GlyphBitmap::from_samples(4, 2, 4, vec![0; 7]).is_none());
        assert!(GlyphBitmap::from_samples(4, 2, 6, vec![0; 12]).is_some());
    }

    #[test]
    fn from_mono_expands_bits() {
        // 10 pixels wide: two bytes per row, padded to a pitch of 4.
        let src = [0b1010_0000, 0b1100_0000, 0, 0, 0b0000_0001, 0b0100_0000, 0, 0];
        let bitmap = GlyphBitmap::from_mono(&src, 10, 2, 4);
        assert_eq!(bitmap.row(0), &[0xff, 0, 0xff, 0, 0, 0, 0, 0, 0xff, 0xff]);
        assert_eq!(bitmap.row(1), &[0, 0, 0, 0, 0, 0, 0, 0xff, 0, 0xff]);
    }
}
