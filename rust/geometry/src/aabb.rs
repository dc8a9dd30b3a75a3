// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes
//!
//! Clip boxes and per-instance bounds share this type. Intersection is
//! boundary-inclusive: boxes that merely touch on a face still intersect.

use nalgebra::{Matrix4, Point3};

/// Axis-aligned box in 3D, stored as min and max corners.
///
/// The empty box uses the inverted sentinel (`min > max`) so that expanding
/// it by the first point yields a degenerate box at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Create an empty box
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Point3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Create a box from min and max corners
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Set both corners
    #[inline]
    pub fn set(&mut self, min: Point3<f32>, max: Point3<f32>) {
        self.min = min;
        self.max = max;
    }

    /// Reset to the empty sentinel
    #[inline]
    pub fn make_empty(&mut self) {
        self.min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        self.max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    }

    /// Whether the box contains no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Grow the box to contain `point`
    #[inline]
    pub fn expand_by_point(&mut self, point: &Point3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow the box to contain `other`
    #[inline]
    pub fn union(&mut self, other: &Aabb) {
        self.expand_by_point(&other.min);
        self.expand_by_point(&other.max);
    }

    /// Boundary-inclusive intersection test: touching faces count
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Replace the box with the AABB of its 8 corners transformed by `matrix`
    pub fn apply_matrix4(&mut self, matrix: &Matrix4<f32>) {
        if self.is_empty() {
            return;
        }

        let (min, max) = (self.min, self.max);
        self.make_empty();
        for corner in [
            Point3::new(min.x, min.y, min.z),
            Point3::new(min.x, min.y, max.z),
            Point3::new(min.x, max.y, min.z),
            Point3::new(min.x, max.y, max.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, min.y, max.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(max.x, max.y, max.z),
        ] {
            self.expand_by_point(&matrix.transform_point(&corner));
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
