// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw byte-view call convention.
//!
//! Used when the caller holds a bare instance buffer not yet bound to a
//! geometry object: attribute locations come from a name→(offset, size)
//! map, and the instance stride is the largest `byte_offset + byte_size`
//! in the map (which allows trailing padding).
//!
//! For identical data and clip box, this convention selects the same
//! survivors in the same order as the bound-attribute convention and
//! produces byte-identical output.

use super::{compact_collection, formula_for};
use crate::aabb::Aabb;
use crate::bounds::BoundsScratch;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use sector_clip_core::{AttributeLayout, PackedBuffer, PrimitiveType};

/// Byte location of one attribute within an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub byte_offset: usize,
    pub byte_size: usize,
}

/// Name→location map describing one instance's attributes
pub type AttributeMap = FxHashMap<String, AttributeSpec>;

/// Build the attribute map matching a static instance layout
pub fn attribute_map_from_layout(layout: &AttributeLayout) -> AttributeMap {
    layout
        .attributes()
        .iter()
        .map(|descriptor| {
            (
                descriptor.name.to_string(),
                AttributeSpec {
                    byte_offset: descriptor.byte_offset,
                    byte_size: descriptor.byte_size(),
                },
            )
        })
        .collect()
}

fn map_stride(attributes: &AttributeMap) -> usize {
    attributes
        .values()
        .map(|spec| spec.byte_offset + spec.byte_size)
        .max()
        .unwrap_or(0)
}

/// Filter a bare instance buffer of any instanced collection type.
///
/// Mesh types have no per-instance layout and fail with
/// [`Error::NotAnInstancedCollection`].
pub fn filter_primitive_collection(
    collection_type: PrimitiveType,
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    let kind = formula_for(collection_type)
        .ok_or(Error::NotAnInstancedCollection(collection_type))?;

    let offset_of = |name: &str| -> Result<usize> {
        attributes
            .get(name)
            .map(|spec| spec.byte_offset)
            .ok_or_else(|| sector_clip_core::Error::UnknownAttribute(name.to_string()).into())
    };

    compact_collection(
        bytes,
        map_stride(attributes),
        &kind,
        clip_box,
        scratch,
        offset_of,
    )
}

/// Filter a box collection buffer
pub fn filter_box_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Box, bytes, attributes, clip_box, scratch)
}

/// Filter a circle collection buffer
pub fn filter_circle_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Circle, bytes, attributes, clip_box, scratch)
}

/// Filter a cone collection buffer
pub fn filter_cone_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Cone, bytes, attributes, clip_box, scratch)
}

/// Filter an eccentric cone collection buffer
pub fn filter_eccentric_cone_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(
        PrimitiveType::EccentricCone,
        bytes,
        attributes,
        clip_box,
        scratch,
    )
}

/// Filter an ellipsoid segment collection buffer
pub fn filter_ellipsoid_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Ellipsoid, bytes, attributes, clip_box, scratch)
}

/// Filter a general cylinder collection buffer
pub fn filter_general_cylinder_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(
        PrimitiveType::GeneralCylinder,
        bytes,
        attributes,
        clip_box,
        scratch,
    )
}

/// Filter a general ring collection buffer
pub fn filter_general_ring_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(
        PrimitiveType::GeneralRing,
        bytes,
        attributes,
        clip_box,
        scratch,
    )
}

/// Filter a quad collection buffer
pub fn filter_quad_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Quad, bytes, attributes, clip_box, scratch)
}

/// Filter a torus segment collection buffer
pub fn filter_torus_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(
        PrimitiveType::TorusSegment,
        bytes,
        attributes,
        clip_box,
        scratch,
    )
}

/// Filter a trapezium collection buffer
pub fn filter_trapezium_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Trapezium, bytes, attributes, clip_box, scratch)
}

/// Filter a nut collection buffer
pub fn filter_nut_collection(
    bytes: &[u8],
    attributes: &AttributeMap,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    filter_primitive_collection(PrimitiveType::Nut, bytes, attributes, clip_box, scratch)
}
