// glyph-raster/src/metrics.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various metrics that apply to the entire font.

/// Various metrics that apply to the entire font.
///
/// All values other than `units_per_em` are in font units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// The number of font units per em.
    ///
    /// Font sizes are usually expressed in pixels per em; e.g. `12px` means 12 pixels per em.
    pub units_per_em: u32,

    /// The maximum amount the font rises above the baseline, in font units.
    pub ascent: f32,

    /// The maximum amount the font descends below the baseline, in font units.
    ///
    /// NB: This is typically a negative value to match the definition of `sTypoDescender` in the
    /// `OS/2` table in the OpenType specification.
    pub descent: f32,

    /// Distance between baselines, in font units.
    pub line_gap: f32,
}

impl Metrics {
    /// Device pixels per font unit at `point_size` and `dpi`.
    ///
    /// Returns zero for a font that reports no units per em.
    #[inline]
    pub fn scale(&self, point_size: f32, dpi: f32) -> f32 {
        if self.units_per_em == 0 {
            return 0.0;
        }
        point_size * dpi / 72.0 / self.units_per_em as f32
    }
}

#[cfg(test)]
mod test {
    use super::Metrics;

    #[test]
    fn scale_accounts_for_dpi() {
        let metrics = Metrics { units_per_em: 1024, ascent: 0.0, descent: 0.0, line_gap: 0.0 };
        assert_eq!(metrics.scale(64.0, 72.0), 1.0 / 16.0);
        assert_eq!(metrics.scale(64.0, 144.0), 1.0 / 8.0);
        assert_eq!(Metrics { units_per_em: 0, ..metrics }.scale(12.0, 72.0), 0.0);
    }
}
