// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bound-attribute call convention.
//!
//! Attribute locations come from handles already bound to a caller-owned
//! [`GeometryBuffer`]; the instance stride and memory come from the shared
//! interleaved block. After compaction a new geometry object is built:
//! plain attributes and the index buffer are carried over by reference,
//! interleaved attributes are rebuilt against the compacted block with
//! their original component type, item size, intra-instance offset, and
//! normalization flag.

use super::{compact_collection, formula_for};
use crate::aabb::Aabb;
use crate::attribute::{
    GeometryAttribute, GeometryBuffer, InterleavedAttribute, InterleavedBlock,
};
use crate::bounds::BoundsScratch;
use crate::error::{Error, Result};
use sector_clip_core::{PackedBuffer, PrimitiveType};
use std::sync::Arc;

/// Compact the geometry's interleaved block against the clip box
pub(crate) fn filter_instanced_geometry(
    geometry: &GeometryBuffer,
    collection_type: PrimitiveType,
    clip_box: &Aabb,
    scratch: &mut BoundsScratch,
) -> Result<PackedBuffer> {
    let kind = formula_for(collection_type)
        .ok_or(Error::NotAnInstancedCollection(collection_type))?;

    let first = geometry
        .first_interleaved()
        .ok_or(Error::NoInterleavedAttributes)?;
    let block = first.block().clone();

    let offset_of = |name: &str| -> Result<usize> {
        geometry
            .interleaved_attribute(name)
            .map(|attr| attr.byte_offset())
            .ok_or_else(|| sector_clip_core::Error::UnknownAttribute(name.to_string()).into())
    };

    compact_collection(
        block.bytes(),
        block.byte_stride(),
        &kind,
        clip_box,
        scratch,
        offset_of,
    )
}

/// Build the filtered geometry around the compacted block
pub(crate) fn rebuild_filtered_geometry(
    geometry: &GeometryBuffer,
    compacted: PackedBuffer,
) -> GeometryBuffer {
    let byte_stride = geometry
        .first_interleaved()
        .map(|attr| attr.block().byte_stride())
        .unwrap_or(0);
    let block = Arc::new(InterleavedBlock::new(compacted, byte_stride));

    let mut filtered = GeometryBuffer::new();
    for (name, attribute) in geometry.attributes() {
        match attribute {
            GeometryAttribute::Plain(plain) => {
                filtered.set_attribute(name, GeometryAttribute::Plain(plain.clone()));
            }
            GeometryAttribute::Interleaved(attr) => {
                filtered.set_attribute(
                    name,
                    GeometryAttribute::Interleaved(InterleavedAttribute::new(
                        block.clone(),
                        attr.component(),
                        attr.item_size(),
                        attr.byte_offset(),
                        attr.normalized(),
                    )),
                );
            }
        }
    }
    filtered.set_index(geometry.index().cloned());
    filtered
}
