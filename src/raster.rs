// glyph-raster/src/raster.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A scanline coverage rasterizer for outlines.
//!
//! Each line segment deposits its signed area into an accumulation buffer; a running sum along
//! each row then yields the winding-weighted coverage of every pixel. The absolute value of the
//! sum is clamped to 1, which resolves overlapping contours with the nonzero rule and cancels
//! counter-wound holes.

use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::vector::{vec2f, Vector2F, Vector2I};
use std::cmp;

use crate::bitmap::GlyphBitmap;
use crate::outline::OutlineSink;

const EPSILON: f32 = 1.0 / 4096.0;

// Squared curve deviation, in pixels, below which a curve is drawn as a single line.
const FLATNESS: f32 = 0.333;
const SUBDIVISION_TOLERANCE: f32 = 3.0;
const MAX_SUBDIVISIONS: usize = 256;

/// Accumulates outline coverage for a canvas of a fixed size.
///
/// Points are in device pixels with the origin at the top left. Content outside the canvas is
/// clipped.
#[derive(Clone, Debug)]
pub struct CoverageRasterizer {
    width: usize,
    height: usize,
    accumulation: Vec<f32>,
    current_point: Vector2F,
    contour_start: Vector2F,
}

impl CoverageRasterizer {
    /// Creates a rasterizer for a canvas of `size` pixels. Negative sides are treated as zero.
    pub fn new(size: Vector2I) -> CoverageRasterizer {
        let width = cmp::max(size.x(), 0) as usize;
        let height = cmp::max(size.y(), 0) as usize;
        CoverageRasterizer {
            width,
            height,
            // Edges touching the right side spill one cell past the end of their row.
            accumulation: vec![0.0; width * height + 4],
            current_point: Vector2F::zero(),
            contour_start: Vector2F::zero(),
        }
    }

    /// The canvas size.
    #[inline]
    pub fn size(&self) -> Vector2I {
        Vector2I::new(self.width as i32, self.height as i32)
    }

    /// Deposits the signed area of one line segment.
    pub fn draw_line(&mut self, line: LineSegment2F) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let max_x = self.width as f32;
        let clamp_x = |point: Vector2F| vec2f(point.x().max(0.0).min(max_x), point.y());
        let (from, to) = (clamp_x(line.from()), clamp_x(line.to()));
        if (from.y() - to.y()).abs() <= EPSILON || !(from.y().is_finite() && to.y().is_finite()) {
            return;
        }

        let (direction, p0, p1) = if from.y() < to.y() {
            (1.0, from, to)
        } else {
            (-1.0, to, from)
        };
        let dxdy = (p1.x() - p0.x()) / (p1.y() - p0.y());
        let mut x = p0.x();
        if p0.y() < 0.0 {
            x = (x - p0.y() * dxdy).max(0.0).min(max_x);
        }

        let row_start = p0.y().max(0.0) as usize;
        let row_end = cmp::min(self.height, p1.y().ceil().max(0.0) as usize);
        for y in row_start..row_end {
            let line_start = y * self.width;
            let dy = ((y + 1) as f32).min(p1.y()) - (y as f32).max(p0.y());
            let x_next = (x + dxdy * dy).max(0.0).min(max_x);
            let d = dy * direction;
            let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
            let x0_floor = x0.floor();
            let x0i = x0_floor as usize;
            let x1_ceil = x1.ceil();
            let x1i = x1_ceil as usize;

            if x1i <= x0i + 1 {
                // The segment stays within one pixel column on this row.
                let xmf = 0.5 * (x + x_next) - x0_floor;
                self.accumulation[line_start + x0i] += d - d * xmf;
                self.accumulation[line_start + x0i + 1] += d * xmf;
            } else {
                let s = (x1 - x0).recip();
                let x0f = x0 - x0_floor;
                let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
                let x1f = x1 - x1_ceil + 1.0;
                let am = 0.5 * s * x1f * x1f;
                self.accumulation[line_start + x0i] += d * a0;
                if x1i == x0i + 2 {
                    self.accumulation[line_start + x0i + 1] += d * (1.0 - a0 - am);
                } else {
                    let a1 = s * (1.5 - x0f);
                    self.accumulation[line_start + x0i + 1] += d * (a1 - a0);
                    for xi in (x0i + 2)..(x1i - 1) {
                        self.accumulation[line_start + xi] += d * s;
                    }
                    let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                    self.accumulation[line_start + x1i - 1] += d * (1.0 - a2 - am);
                }
                self.accumulation[line_start + x1i] += d * am;
            }
            x = x_next;
        }
    }

    /// Flattens a quadratic Bézier curve into lines.
    pub fn draw_quadratic(&mut self, from: Vector2F, ctrl: Vector2F, to: Vector2F) {
        let deviation = from - ctrl * 2.0 + to;
        let deviation_squared = deviation.square_length();
        if deviation_squared < FLATNESS {
            self.draw_line(LineSegment2F::new(from, to));
            return;
        }

        let count = subdivision_count(deviation_squared);
        let mut previous = from;
        for index in 1..count {
            let t = index as f32 / count as f32;
            let point = from.lerp(ctrl, t).lerp(ctrl.lerp(to, t), t);
            self.draw_line(LineSegment2F::new(previous, point));
            previous = point;
        }
        self.draw_line(LineSegment2F::new(previous, to));
    }

    /// Flattens a cubic Bézier curve into lines.
    pub fn draw_cubic(&mut self, from: Vector2F, ctrl: LineSegment2F, to: Vector2F) {
        let (ctrl0, ctrl1) = (ctrl.from(), ctrl.to());
        let deviation_squared = (from - ctrl0 * 2.0 + ctrl1)
            .square_length()
            .max((ctrl0 - ctrl1 * 2.0 + to).square_length());
        if deviation_squared < FLATNESS {
            self.draw_line(LineSegment2F::new(from, to));
            return;
        }

        let count = subdivision_count(deviation_squared);
        let mut previous = from;
        for index in 1..count {
            let t = index as f32 / count as f32;
            let (a, b, c) = (from.lerp(ctrl0, t), ctrl0.lerp(ctrl1, t), ctrl1.lerp(to, t));
            let point = a.lerp(b, t).lerp(b.lerp(c, t), t);
            self.draw_line(LineSegment2F::new(previous, point));
            previous = point;
        }
        self.draw_line(LineSegment2F::new(previous, to));
    }

    /// Resolves the accumulated area into per-pixel coverage and calls `f(x, y, coverage)` for
    /// every pixel in row-major order.
    pub fn for_each_pixel<F>(&self, mut f: F) where F: FnMut(u32, u32, u8) {
        let mut sum = 0.0;
        for y in 0..self.height {
            for x in 0..self.width {
                sum += self.accumulation[y * self.width + x];
                f(x as u32, y as u32, coverage_to_u8(sum));
            }
        }
    }

    /// Resolves the accumulated area into a coverage bitmap whose rows are padded to
    /// `row_alignment` bytes.
    pub fn into_bitmap(self, row_alignment: usize) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::new(self.width as u32, self.height as u32, row_alignment);
        let stride = bitmap.stride();
        let samples = bitmap.samples_mut();
        self.for_each_pixel(|x, y, coverage| {
            samples[y as usize * stride + x as usize] = coverage;
        });
        bitmap
    }
}

impl OutlineSink for CoverageRasterizer {
    #[inline]
    fn move_to(&mut self, to: Vector2F) {
        // An open contour is closed implicitly, as the nonzero rule requires.
        self.close();
        self.current_point = to;
        self.contour_start = to;
    }

    #[inline]
    fn line_to(&mut self, to: Vector2F) {
        self.draw_line(LineSegment2F::new(self.current_point, to));
        self.current_point = to;
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F) {
        self.draw_quadratic(self.current_point, ctrl, to);
        self.current_point = to;
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F) {
        self.draw_cubic(self.current_point, ctrl, to);
        self.current_point = to;
    }

    #[inline]
    fn close(&mut self) {
        if self.current_point != self.contour_start {
            self.draw_line(LineSegment2F::new(self.current_point, self.contour_start));
        }
        self.current_point = self.contour_start;
    }
}

fn subdivision_count(deviation_squared: f32) -> usize {
    let count = 1 + (SUBDIVISION_TOLERANCE * deviation_squared).sqrt().sqrt().floor() as usize;
    cmp::min(count, MAX_SUBDIVISIONS)
}

#[inline]
fn coverage_to_u8(area: f32) -> u8 {
    (area.abs().min(1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod test {
    use super::CoverageRasterizer;
    use crate::outline::OutlineSink;
    use pathfinder_geometry::vector::{vec2f, Vector2F, Vector2I};

    fn rect(rasterizer: &mut CoverageRasterizer,
            origin: Vector2F,
            lower_right: Vector2F,
            clockwise: bool) {
        let (ox, oy, lx, ly) = (origin.x(), origin.y(), lower_right.x(), lower_right.y());
        rasterizer.move_to(origin);
        if clockwise {
            rasterizer.line_to(vec2f(lx, oy));
            rasterizer.line_to(lower_right);
            rasterizer.line_to(vec2f(ox, ly));
        } else {
            rasterizer.line_to(vec2f(ox, ly));
            rasterizer.line_to(lower_right);
            rasterizer.line_to(vec2f(lx, oy));
        }
        rasterizer.close();
    }

    fn coverage(rasterizer: &CoverageRasterizer) -> Vec<u8> {
        let mut result = vec![];
        rasterizer.for_each_pixel(|_, _, coverage| result.push(coverage));
        result
    }

    #[test]
    fn pixel_aligned_square_is_fully_covered() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(4, 4));
        rect(&mut rasterizer, vec2f(1.0, 1.0), vec2f(3.0, 3.0), true);
        assert_eq!(coverage(&rasterizer), vec![
            0, 0, 0, 0,
            0, 255, 255, 0,
            0, 255, 255, 0,
            0, 0, 0, 0,
        ]);
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let mut clockwise = CoverageRasterizer::new(Vector2I::new(4, 4));
        rect(&mut clockwise, vec2f(0.0, 0.0), vec2f(4.0, 2.0), true);
        let mut counter_clockwise = CoverageRasterizer::new(Vector2I::new(4, 4));
        rect(&mut counter_clockwise, vec2f(0.0, 0.0), vec2f(4.0, 2.0), false);
        assert_eq!(coverage(&clockwise), coverage(&counter_clockwise));
    }

    #[test]
    fn counter_wound_inner_contour_is_a_hole() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(5, 5));
        rect(&mut rasterizer, vec2f(0.0, 0.0), vec2f(5.0, 5.0), true);
        rect(&mut rasterizer, vec2f(1.0, 1.0), vec2f(4.0, 4.0), false);
        let coverage = coverage(&rasterizer);
        assert_eq!(coverage[0], 255);
        assert_eq!(coverage[2 * 5 + 2], 0);
        assert_eq!(coverage[4 * 5 + 4], 255);
    }

    #[test]
    fn overlapping_contours_use_nonzero_rule() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(3, 1));
        rect(&mut rasterizer, vec2f(0.0, 0.0), vec2f(2.0, 1.0), true);
        rect(&mut rasterizer, vec2f(1.0, 0.0), vec2f(3.0, 1.0), true);
        assert_eq!(coverage(&rasterizer), vec![255, 255, 255]);
    }

    #[test]
    fn half_pixel_edge_gives_half_coverage() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(2, 1));
        rect(&mut rasterizer, vec2f(0.0, 0.0), vec2f(1.5, 1.0), true);
        assert_eq!(coverage(&rasterizer), vec![255, 128]);
    }

    #[test]
    fn quadratic_curve_stays_inside_its_hull() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(8, 8));
        rasterizer.move_to(vec2f(0.0, 8.0));
        rasterizer.quadratic_curve_to(vec2f(4.0, -8.0), vec2f(8.0, 8.0));
        rasterizer.close();
        let bitmap = rasterizer.into_bitmap(1);
        // The apex of the curve is at y = 0, so the top corners stay empty.
        assert_eq!(bitmap.sample(0, 0), Some(0));
        assert_eq!(bitmap.sample(7, 0), Some(0));
        assert_eq!(bitmap.sample(4, 6), Some(255));
    }

    #[test]
    fn empty_canvas_ignores_lines() {
        let mut rasterizer = CoverageRasterizer::new(Vector2I::new(0, 0));
        rect(&mut rasterizer, vec2f(0.0, 0.0), vec2f(2.0, 2.0), true);
        assert!(rasterizer.into_bitmap(4).is_empty());
    }
}
