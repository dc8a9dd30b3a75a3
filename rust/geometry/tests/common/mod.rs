// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test fixtures: pack primitive values into interleaved buffers through
//! the static layouts and read them back.

#![allow(dead_code)]

use sector_clip_core::{PackedBuffer, PrimitiveType};
use sector_clip_geometry::{
    GeometryAttribute, GeometryBuffer, InterleavedAttribute, InterleavedBlock,
};
use std::sync::Arc;

/// One primitive as (attribute name, float values) pairs; attributes not
/// named stay zeroed, and `a_treeIndex` defaults to the instance's input
/// position so tests can track survivors.
pub type Instance = Vec<(&'static str, Vec<f32>)>;

fn write_f32(buffer: &mut PackedBuffer, byte_offset: usize, value: f32) {
    buffer.as_bytes_mut()[byte_offset..byte_offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Pack instances back-to-back at the collection's stride
pub fn pack_instances(collection_type: PrimitiveType, instances: &[Instance]) -> PackedBuffer {
    let layout = collection_type
        .instance_layout()
        .expect("instanced collection");
    let stride = layout.stride();

    let mut buffer = PackedBuffer::zeroed(stride * instances.len());
    for (index, instance) in instances.iter().enumerate() {
        let base = index * stride;
        write_f32(&mut buffer, base, index as f32);

        for (name, values) in instance {
            let descriptor = layout
                .attribute(name)
                .unwrap_or_else(|| panic!("unknown attribute {name}"));
            assert_eq!(descriptor.item_count, values.len(), "{name}");
            for (component, value) in values.iter().enumerate() {
                write_f32(
                    &mut buffer,
                    base + descriptor.byte_offset + 4 * component,
                    *value,
                );
            }
        }
    }
    buffer
}

/// Bind every layout attribute of the collection to `block`
pub fn attach_geometry(
    collection_type: PrimitiveType,
    block: Arc<InterleavedBlock>,
) -> GeometryBuffer {
    let layout = collection_type
        .instance_layout()
        .expect("instanced collection");

    let mut geometry = GeometryBuffer::new();
    for descriptor in layout.attributes() {
        geometry.set_attribute(
            descriptor.name,
            GeometryAttribute::Interleaved(InterleavedAttribute::new(
                block.clone(),
                descriptor.component,
                descriptor.item_count,
                descriptor.byte_offset,
                descriptor.normalized,
            )),
        );
    }
    geometry
}

/// Pack instances and bind them to a fresh geometry object
pub fn build_geometry(collection_type: PrimitiveType, instances: &[Instance]) -> GeometryBuffer {
    let stride = collection_type.instance_layout().unwrap().stride();
    let packed = pack_instances(collection_type, instances);
    attach_geometry(
        collection_type,
        Arc::new(InterleavedBlock::new(packed, stride)),
    )
}

/// Pack several collections into one shared buffer, each geometry viewing
/// its own region of the same memory
pub fn build_geometries_sharing_buffer(
    specs: &[(PrimitiveType, &[Instance])],
) -> Vec<GeometryBuffer> {
    let packed: Vec<PackedBuffer> = specs
        .iter()
        .map(|(collection_type, instances)| pack_instances(*collection_type, instances))
        .collect();

    let total = packed.iter().map(|p| p.byte_len()).sum();
    let mut all = PackedBuffer::zeroed(total);
    let mut offset = 0;
    for part in &packed {
        all.as_bytes_mut()[offset..offset + part.byte_len()].copy_from_slice(part.as_bytes());
        offset += part.byte_len();
    }

    let shared = Arc::new(all);
    let mut geometries = Vec::new();
    let mut offset = 0;
    for ((collection_type, _), part) in specs.iter().zip(&packed) {
        let stride = collection_type.instance_layout().unwrap().stride();
        let block = InterleavedBlock::with_range(shared.clone(), offset, part.byte_len(), stride)
            .expect("aligned region");
        geometries.push(attach_geometry(*collection_type, Arc::new(block)));
        offset += part.byte_len();
    }
    geometries
}

/// Number of instances behind the geometry's interleaved block
pub fn instance_count(geometry: &GeometryBuffer) -> usize {
    geometry
        .first_interleaved()
        .map(|attr| attr.block().instance_count())
        .unwrap_or(0)
}

/// Read all float components of one attribute of one instance
pub fn read_attribute(geometry: &GeometryBuffer, name: &str, index: usize) -> Vec<f32> {
    let attr = geometry
        .interleaved_attribute(name)
        .unwrap_or_else(|| panic!("missing attribute {name}"));
    let block = attr.block();
    let base = (index * block.byte_stride() + attr.byte_offset()) / 4;
    block.floats()[base..base + attr.item_size()].to_vec()
}
