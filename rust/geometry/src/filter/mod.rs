// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip-box filtering per primitive collection type.
//!
//! One compaction algorithm, two call conventions: [`raw`] consumes a bare
//! byte buffer plus a name→offset attribute map, [`geometry`] consumes
//! attribute handles already bound to a [`GeometryBuffer`]. Both resolve
//! the same per-type bounding-box formula and delegate to
//! [`crate::compact::filter_instances_outside_clip_box`].
//!
//! [`filter_sector_geometry`] is the entry point the sector loading
//! pipeline calls once per collection.

pub mod raw;

mod geometry;

use crate::aabb::Aabb;
use crate::attribute::GeometryBuffer;
use crate::bounds::{self, BoundsScratch};
use crate::compact::filter_instances_outside_clip_box;
use crate::error::Result;
use nalgebra::Point3;
use sector_clip_core::{PackedBuffer, PrimitiveType};
use tracing::{debug, trace};

const EPSILON: f32 = 1e-4;

fn unit_bounding_box() -> Aabb {
    Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5))
}

fn quad_bounding_box() -> Aabb {
    Aabb::new(
        Point3::new(-0.5, -0.5, -EPSILON),
        Point3::new(0.5, 0.5, EPSILON),
    )
}

/// Which bounding-box formula a collection type uses
pub(crate) enum FormulaKind {
    InstanceMatrix {
        base_box: Aabb,
    },
    CenterAndRadius {
        radius_a: &'static str,
        radius_b: &'static str,
    },
    Ellipsoid,
    Torus,
    Vertices,
}

/// Formula for an instanced collection type; `None` for the mesh types,
/// which are handled whole-object by the dispatcher.
pub(crate) fn formula_for(collection_type: PrimitiveType) -> Option<FormulaKind> {
    match collection_type {
        PrimitiveType::Box | PrimitiveType::Nut => Some(FormulaKind::InstanceMatrix {
            base_box: unit_bounding_box(),
        }),
        PrimitiveType::Circle | PrimitiveType::GeneralRing | PrimitiveType::Quad => {
            Some(FormulaKind::InstanceMatrix {
                base_box: quad_bounding_box(),
            })
        }
        PrimitiveType::Cone | PrimitiveType::EccentricCone => Some(FormulaKind::CenterAndRadius {
            radius_a: "a_radiusA",
            radius_b: "a_radiusB",
        }),
        PrimitiveType::GeneralCylinder => Some(FormulaKind::CenterAndRadius {
            radius_a: "a_radius",
            radius_b: "a_radius",
        }),
        PrimitiveType::Ellipsoid => Some(FormulaKind::Ellipsoid),
        PrimitiveType::TorusSegment => Some(FormulaKind::Torus),
        PrimitiveType::Trapezium => Some(FormulaKind::Vertices),
        PrimitiveType::InstanceMesh
        | PrimitiveType::TriangleMesh
        | PrimitiveType::TexturedTriangleMesh => None,
    }
}

/// Resolve the formula's attribute offsets through `offset_of`, then run
/// the compactor. Shared by both call conventions; offsets are resolved
/// once, outside the per-instance loop.
pub(crate) fn compact_collection<L>(
    bytes: &[u8],
    byte_stride: usize,
    kind: &FormulaKind,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
    offset_of: L,
) -> Result<PackedBuffer>
where
    L: Fn(&str) -> Result<usize>,
{
    match kind {
        FormulaKind::InstanceMatrix { base_box } => {
            let matrix = offset_of("a_instanceMatrix")?;
            filter_instances_outside_clip_box(
                bytes,
                byte_stride,
                clip_box,
                |index, stride, floats, out| {
                    bounds::bbox_from_instance_matrix_attributes(
                        floats, matrix, stride, index, base_box, out,
                    );
                },
            )
        }
        FormulaKind::CenterAndRadius { radius_a, radius_b } => {
            let center_a = offset_of("a_centerA")?;
            let center_b = offset_of("a_centerB")?;
            let radius_a = offset_of(radius_a)?;
            let radius_b = offset_of(radius_b)?;
            filter_instances_outside_clip_box(
                bytes,
                byte_stride,
                clip_box,
                |index, stride, floats, out| {
                    bounds::bbox_from_center_and_radius_attributes(
                        floats, center_a, center_b, radius_a, radius_b, stride, index, out,
                    );
                },
            )
        }
        FormulaKind::Ellipsoid => {
            let horizontal_radius = offset_of("a_horizontalRadius")?;
            let vertical_radius = offset_of("a_verticalRadius")?;
            let height = offset_of("a_height")?;
            let center = offset_of("a_center")?;
            filter_instances_outside_clip_box(
                bytes,
                byte_stride,
                clip_box,
                |index, stride, floats, out| {
                    let base = index * stride / 4;
                    let center = Point3::new(
                        floats[base + center / 4],
                        floats[base + center / 4 + 1],
                        floats[base + center / 4 + 2],
                    );
                    bounds::bbox_from_ellipsoid_values(
                        floats[base + horizontal_radius / 4],
                        floats[base + vertical_radius / 4],
                        floats[base + height / 4],
                        &center,
                        out,
                    );
                },
            )
        }
        FormulaKind::Torus => {
            let matrix = offset_of("a_instanceMatrix")?;
            let radius = offset_of("a_radius")?;
            let tube_radius = offset_of("a_tubeRadius")?;
            filter_instances_outside_clip_box(
                bytes,
                byte_stride,
                clip_box,
                |index, stride, floats, out| {
                    bounds::bbox_from_torus_attributes(
                        floats,
                        matrix,
                        radius,
                        tube_radius,
                        stride,
                        index,
                        scratch,
                        out,
                    );
                },
            )
        }
        FormulaKind::Vertices => {
            let vertex1 = offset_of("a_vertex1")?;
            let vertex2 = offset_of("a_vertex2")?;
            let vertex3 = offset_of("a_vertex3")?;
            let vertex4 = offset_of("a_vertex4")?;
            filter_instances_outside_clip_box(
                bytes,
                byte_stride,
                clip_box,
                |index, stride, floats, out| {
                    bounds::bbox_from_vertex_attributes(
                        vertex1, vertex2, vertex3, vertex4, floats, stride, index, out,
                    );
                },
            )
        }
    }
}

/// Filter one sector collection against an optional clip box.
///
/// - No clip box: the geometry is returned unchanged (zero-copy identity).
/// - Mesh types: whole-object decision on the geometry's precomputed
///   [`GeometryBuffer::bounding_box`]; rejected geometry becomes `Ok(None)`.
/// - Instanced types: per-instance compaction. Zero survivors become
///   `Ok(None)`, which callers must treat as "nothing to render" rather
///   than constructing an empty draw call.
pub fn filter_sector_geometry(
    geometry: GeometryBuffer,
    collection_type: PrimitiveType,
    clip_box: Option<&Aabb>,
) -> Result<Option<GeometryBuffer>> {
    let Some(clip_box) = clip_box else {
        trace!(%collection_type, "no clip box, passing geometry through");
        return Ok(Some(geometry));
    };

    if collection_type.is_mesh() {
        let accept = geometry
            .bounding_box
            .map_or(true, |bounds| bounds.intersects(clip_box));
        debug!(%collection_type, accept, "whole-mesh clip decision");
        return Ok(accept.then_some(geometry));
    }

    let mut scratch = BoundsScratch::default();
    let compacted =
        geometry::filter_instanced_geometry(&geometry, collection_type, clip_box, &mut scratch)?;

    // The filter above guarantees an interleaved attribute exists
    let byte_stride = geometry
        .first_interleaved()
        .map(|attr| attr.block().byte_stride())
        .unwrap_or(0);
    let total = geometry
        .first_interleaved()
        .map(|attr| attr.block().instance_count())
        .unwrap_or(0);
    let survivors = if byte_stride == 0 {
        0
    } else {
        compacted.byte_len() / byte_stride
    };
    debug!(%collection_type, survivors, total, "filtered collection against clip box");

    if compacted.is_empty() {
        return Ok(None);
    }

    Ok(Some(geometry::rebuild_filtered_geometry(
        &geometry, compacted,
    )))
}
