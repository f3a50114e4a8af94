// glyph-raster/src/color.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Straight-alpha RGBA colors.

/// An 8-bit-per-channel color with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha. 0 is fully transparent and 255 is fully opaque.
    pub a: u8,
}

impl Color {
    /// Transparent black. This is the default background.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Opaque black. This is the default foreground.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 0xff);
    /// Opaque white.
    pub const WHITE: Color = Color::rgba(0xff, 0xff, 0xff, 0xff);

    /// Creates a color from its four channels.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color::rgba(r, g, b, 0xff)
    }

    /// Creates an opaque gray with all three color channels set to `luminance`.
    #[inline]
    pub const fn gray(luminance: u8) -> Color {
        Color::rgb(luminance, luminance, luminance)
    }

    /// Returns the channels in R, G, B, A byte order.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Reads a color from the first four bytes of `bytes` in R, G, B, A order.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Color {
        Color::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Composites `self` over `dest` with the given coverage (0-255), "source over".
    ///
    /// Coverage 0 returns `dest` unchanged and coverage 255 with an opaque source returns `self`
    /// unchanged.
    pub fn over(self, dest: Color, coverage: u8) -> Color {
        let src_alpha = mul_u8(self.a, coverage) as u32;
        if src_alpha == 0 {
            return dest;
        }
        if src_alpha == 0xff {
            return self;
        }

        let dest_alpha = mul_u8(dest.a, (0xff - src_alpha) as u8) as u32;
        let out_alpha = src_alpha + dest_alpha;
        let blend = |src: u8, dest: u8| -> u8 {
            let value = src as u32 * src_alpha + dest as u32 * dest_alpha;
            ((value + out_alpha / 2) / out_alpha) as u8
        };
        Color::rgba(blend(self.r, dest.r),
                    blend(self.g, dest.g),
                    blend(self.b, dest.b),
                    out_alpha as u8)
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Color {
        Color::TRANSPARENT
    }
}

// Rounded `a * b / 255`.
#[inline]
fn mul_u8(a: u8, b: u8) -> u8 {
    let product = a as u32 * b as u32 + 0x80;
    ((product + (product >> 8)) >> 8) as u8
}
