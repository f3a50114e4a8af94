// glyph-raster/src/outline.rs
//
// Copyright © 2020 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bézier paths.

use bitflags::bitflags;
use pathfinder_geometry::line_segment::LineSegment2F;
use pathfinder_geometry::rect::RectF;
use pathfinder_geometry::transform2d::Transform2F;
use pathfinder_geometry::vector::Vector2F;
use std::mem;

/// Receives Bézier path rendering commands.
pub trait OutlineSink {
    /// Moves the pen to a point.
    fn move_to(&mut self, to: Vector2F);
    /// Draws a line to a point.
    fn line_to(&mut self, to: Vector2F);
    /// Draws a quadratic Bézier curve to a point.
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F);
    /// Draws a cubic Bézier curve to a point.
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F);
    /// Closes the path, returning to the first point in it.
    fn close(&mut self);
}

/// A glyph vector outline or path.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Outline {
    /// The individual subpaths that make up this outline.
    pub contours: Vec<Contour>,
}

/// A single curve or subpath within a glyph outline.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Contour {
    /// Positions of each point.
    ///
    /// This must have the same length as the `flags` field.
    pub positions: Vec<Vector2F>,
    /// Flags that specify what type of point the corresponding position represents.
    ///
    /// This must have the same length as the `positions` field.
    pub flags: Vec<PointFlags>,
}

bitflags! {
    /// Flags that specify what type of point the corresponding position represents.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PointFlags: u8 {
        /// This point is the control point of a quadratic Bézier curve or the first control point
        /// of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_1`.
        const CONTROL_POINT_0 = 0x01;
        /// This point is the second control point of a cubic Bézier curve.
        ///
        /// This flag is mutually exclusive with `CONTROL_POINT_0`.
        const CONTROL_POINT_1 = 0x02;
    }
}

impl Outline {
    /// Creates a new empty outline.
    #[inline]
    pub fn new() -> Outline {
        Outline { contours: vec![] }
    }

    /// Returns true if the outline has no points at all.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|contour| contour.positions.is_empty())
    }

    /// Returns the smallest rectangle enclosing every point of the outline, control points
    /// included, or `None` if the outline has no points.
    pub fn bounds(&self) -> Option<RectF> {
        let mut points = self.contours.iter().flat_map(|contour| contour.positions.iter());
        let first = *points.next()?;
        Some(points.fold(RectF::from_points(first, first), |bounds, &point| {
            bounds.union_point(point)
        }))
    }

    /// Applies `transform` to every point in place.
    pub fn transform(&mut self, transform: &Transform2F) {
        for contour in &mut self.contours {
            for position in &mut contour.positions {
                *position = *transform * *position;
            }
        }
    }

    /// Moves every point by `vector`.
    #[inline]
    pub fn translate(&mut self, vector: Vector2F) {
        self.transform(&Transform2F::from_translation(vector))
    }

    /// Sends this outline to an `OutlineSink`.
    pub fn copy_to<S>(&self, sink: &mut S)
    where
        S: OutlineSink,
    {
        for contour in &self.contours {
            contour.copy_to(sink);
        }
    }
}

impl Contour {
    /// Creates a new empty contour.
    #[inline]
    pub fn new() -> Contour {
        Contour {
            positions: vec![],
            flags: vec![],
        }
    }

    /// Adds a new point with the given flags to the contour.
    #[inline]
    pub fn push(&mut self, position: Vector2F, flags: PointFlags) {
        self.positions.push(position);
        self.flags.push(flags);
    }

    /// Sends this contour to an `OutlineSink`.
    ///
    /// A trailing control point without an end point terminates the contour early.
    pub fn copy_to<S>(&self, sink: &mut S)
    where
        S: OutlineSink,
    {
        debug_assert_eq!(self.positions.len(), self.flags.len());
        let first = match self.positions.first() {
            Some(&first) => first,
            None => return,
        };
        sink.move_to(first);

        let mut index = 1;
        while index < self.positions.len() {
            let positions = &self.positions[index..];
            let step = match (self.flags[index], positions) {
                (flags, &[to, ..]) if flags.is_empty() => {
                    sink.line_to(to);
                    1
                }
                (_, &[ctrl, to, ..]) if self.flags[index + 1].is_empty() => {
                    sink.quadratic_curve_to(ctrl, to);
                    2
                }
                (_, &[ctrl_0, ctrl_1, to, ..]) => {
                    debug_assert!(self.flags[index + 2].is_empty());
                    sink.cubic_curve_to(LineSegment2F::new(ctrl_0, ctrl_1), to);
                    3
                }
                _ => break,
            };
            index += step;
        }

        sink.close();
    }
}

/// Accumulates Bézier path rendering commands into an `Outline` structure.
///
/// Every incoming point is mapped through the builder's transform first, so a loader emitting
/// font units can be turned straight into device space.
#[derive(Clone, Debug)]
pub struct OutlineBuilder {
    outline: Outline,
    current_contour: Contour,
    transform: Transform2F,
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineBuilder {
    /// Creates a new empty `OutlineBuilder` with the identity transform.
    #[inline]
    pub fn new() -> OutlineBuilder {
        OutlineBuilder::with_transform(Transform2F::default())
    }

    /// Creates a new empty `OutlineBuilder` that maps every point through `transform`.
    #[inline]
    pub fn with_transform(transform: Transform2F) -> OutlineBuilder {
        OutlineBuilder {
            outline: Outline::new(),
            current_contour: Contour::new(),
            transform,
        }
    }

    /// Replaces the transform applied to points received from now on.
    #[inline]
    pub fn set_transform(&mut self, transform: Transform2F) {
        self.transform = transform;
    }

    /// Consumes this outline builder and returns the resulting outline.
    ///
    /// A contour that was never closed is kept.
    #[inline]
    pub fn into_outline(mut self) -> Outline {
        if !self.current_contour.positions.is_empty() {
            self.close();
        }
        self.outline
    }

    #[inline]
    fn push(&mut self, point: Vector2F, flags: PointFlags) {
        self.current_contour.push(self.transform * point, flags);
    }
}

impl OutlineSink for OutlineBuilder {
    #[inline]
    fn move_to(&mut self, to: Vector2F) {
        if !self.current_contour.positions.is_empty() {
            self.close();
        }
        self.push(to, PointFlags::empty());
    }

    #[inline]
    fn line_to(&mut self, to: Vector2F) {
        self.push(to, PointFlags::empty());
    }

    #[inline]
    fn quadratic_curve_to(&mut self, ctrl: Vector2F, to: Vector2F) {
        self.push(ctrl, PointFlags::CONTROL_POINT_0);
        self.push(to, PointFlags::empty());
    }

    #[inline]
    fn cubic_curve_to(&mut self, ctrl: LineSegment2F, to: Vector2F) {
        self.push(ctrl.from(), PointFlags::CONTROL_POINT_0);
        self.push(ctrl.to(), PointFlags::CONTROL_POINT_1);
        self.push(to, PointFlags::empty());
    }

    #[inline]
    fn close(&mut self) {
        self.outline
            .contours
            .push(mem::replace(&mut self.current_contour, Contour::new()));
    }
}
