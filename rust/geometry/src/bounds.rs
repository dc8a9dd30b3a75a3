// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conservative per-instance bounding-box formulas.
//!
//! Each function reads one instance's attribute values from a float view of
//! the packed buffer and writes an axis-aligned box into the caller's `out`
//! box. Offsets are byte offsets within the instance; the instance stride
//! and all f32 offsets must be 4-byte aligned.
//!
//! Reusable scratch state lives in [`BoundsScratch`], owned by the caller.
//! One scratch per concurrent filter invocation; the formulas themselves
//! hold no state.

use crate::aabb::Aabb;
use nalgebra::{Matrix4, Point3};

/// Reusable scratch state for the bounding-box formulas.
///
/// Not safe to share across concurrent filter invocations; allocate one per
/// call or per worker thread.
#[derive(Debug, Default)]
pub struct BoundsScratch {
    base_box: Aabb,
}

#[inline]
fn float_base(index: usize, byte_stride: usize) -> usize {
    debug_assert_eq!(byte_stride % 4, 0);
    index * byte_stride / 4
}

#[inline]
fn read_point(floats: &[f32], float_index: usize) -> Point3<f32> {
    Point3::new(
        floats[float_index],
        floats[float_index + 1],
        floats[float_index + 2],
    )
}

/// Bounding box of a primitive described by two centers and two radii
/// (cones, eccentric cones, general cylinders).
///
/// Conservative: the union of the bounding boxes of the two end spheres,
/// ignoring end-cap orientation.
pub fn bbox_from_center_and_radius_attributes(
    floats: &[f32],
    center_a_byte_offset: usize,
    center_b_byte_offset: usize,
    radius_a_byte_offset: usize,
    radius_b_byte_offset: usize,
    byte_stride: usize,
    index: usize,
    out: &mut Aabb,
) {
    let base = float_base(index, byte_stride);
    let center_a = read_point(floats, base + center_a_byte_offset / 4);
    let center_b = read_point(floats, base + center_b_byte_offset / 4);
    let radius_a = floats[base + radius_a_byte_offset / 4];
    let radius_b = floats[base + radius_b_byte_offset / 4];

    out.set(
        Point3::new(
            center_a.x - radius_a,
            center_a.y - radius_a,
            center_a.z - radius_a,
        ),
        Point3::new(
            center_a.x + radius_a,
            center_a.y + radius_a,
            center_a.z + radius_a,
        ),
    );
    out.expand_by_point(&Point3::new(
        center_b.x - radius_b,
        center_b.y - radius_b,
        center_b.z - radius_b,
    ));
    out.expand_by_point(&Point3::new(
        center_b.x + radius_b,
        center_b.y + radius_b,
        center_b.z + radius_b,
    ));
}

/// Minimal bounding box of four vertices (trapeziums)
#[allow(clippy::too_many_arguments)]
pub fn bbox_from_vertex_attributes(
    vertex1_byte_offset: usize,
    vertex2_byte_offset: usize,
    vertex3_byte_offset: usize,
    vertex4_byte_offset: usize,
    floats: &[f32],
    byte_stride: usize,
    index: usize,
    out: &mut Aabb,
) {
    let base = float_base(index, byte_stride);
    out.make_empty();
    for byte_offset in [
        vertex1_byte_offset,
        vertex2_byte_offset,
        vertex3_byte_offset,
        vertex4_byte_offset,
    ] {
        out.expand_by_point(&read_point(floats, base + byte_offset / 4));
    }
}

/// Bounding box of a canonical base box transformed by the instance matrix
/// (boxes, circles, general rings, quads, nuts).
///
/// The matrix is stored column-major as 16 consecutive floats.
pub fn bbox_from_instance_matrix_attributes(
    floats: &[f32],
    matrix_byte_offset: usize,
    byte_stride: usize,
    index: usize,
    base_box: &Aabb,
    out: &mut Aabb,
) {
    let m = float_base(index, byte_stride) + matrix_byte_offset / 4;
    let matrix = Matrix4::from_column_slice(&floats[m..m + 16]);

    *out = *base_box;
    out.apply_matrix4(&matrix);
}

/// Bounding box of a torus segment: the full torus extent in the local
/// plane, transformed by the instance matrix.
#[allow(clippy::too_many_arguments)]
pub fn bbox_from_torus_attributes(
    floats: &[f32],
    matrix_byte_offset: usize,
    radius_byte_offset: usize,
    tube_radius_byte_offset: usize,
    byte_stride: usize,
    index: usize,
    scratch: &mut BoundsScratch,
    out: &mut Aabb,
) {
    let base = float_base(index, byte_stride);
    let radius = floats[base + radius_byte_offset / 4];
    let tube_radius = floats[base + tube_radius_byte_offset / 4];

    scratch.base_box.set(
        Point3::new(-radius - tube_radius, -radius - tube_radius, -tube_radius),
        Point3::new(radius + tube_radius, radius + tube_radius, tube_radius),
    );

    bbox_from_instance_matrix_attributes(
        floats,
        matrix_byte_offset,
        byte_stride,
        index,
        &scratch.base_box,
        out,
    );
}

/// Bounding box of an ellipsoid segment.
///
/// Conservative: a cube centered at `center` with half-extent
/// `max(horizontal_radius, vertical_radius, height)`, not the tight
/// ellipsoid bound.
pub fn bbox_from_ellipsoid_values(
    horizontal_radius: f32,
    vertical_radius: f32,
    height: f32,
    center: &Point3<f32>,
    out: &mut Aabb,
) {
    let half = horizontal_radius.max(vertical_radius).max(height);
    out.set(
        Point3::new(center.x - half, center.y - half, center.z - half),
        Point3::new(center.x + half, center.y + half, center.z + half),
    );
}
