// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry buffers with bound attribute handles.
//!
//! This is the object handed to the mesh-construction layer: named
//! attributes over shared memory blocks, an optional index buffer, and
//! optional precomputed bounds. Interleaved attributes of one collection
//! share a single [`InterleavedBlock`]; non-interleaved attributes keep
//! their own buffer and are copied by reference across filtering.

use crate::aabb::Aabb;
use crate::error::{Error, Result};
use sector_clip_core::{ComponentType, PackedBuffer};
use std::sync::Arc;

/// A shared interleaved memory block: one region of a packed buffer holding
/// back-to-back instances at a fixed byte stride.
///
/// Several collections may view disjoint regions of one underlying buffer,
/// so the block carries its own byte range.
#[derive(Debug)]
pub struct InterleavedBlock {
    data: Arc<PackedBuffer>,
    byte_offset: usize,
    byte_len: usize,
    byte_stride: usize,
}

impl InterleavedBlock {
    /// Block covering a whole buffer
    pub fn new(data: PackedBuffer, byte_stride: usize) -> Self {
        let byte_len = data.byte_len();
        Self {
            data: Arc::new(data),
            byte_offset: 0,
            byte_len,
            byte_stride,
        }
    }

    /// Block covering `byte_offset..byte_offset + byte_len` of a shared
    /// buffer. The region start must be 4-byte aligned so float reads stay
    /// aligned.
    pub fn with_range(
        data: Arc<PackedBuffer>,
        byte_offset: usize,
        byte_len: usize,
        byte_stride: usize,
    ) -> Result<Self> {
        if byte_offset % 4 != 0 || byte_offset + byte_len > data.byte_len() {
            return Err(Error::CoreError(sector_clip_core::Error::MisalignedFloatView(
                format!(
                    "block range {byte_offset}..{} is not 4-byte aligned within the buffer",
                    byte_offset + byte_len
                ),
            )));
        }
        Ok(Self {
            data,
            byte_offset,
            byte_len,
            byte_stride,
        })
    }

    /// The underlying shared buffer
    #[inline]
    pub fn data(&self) -> &Arc<PackedBuffer> {
        &self.data
    }

    /// Byte view of this block's region
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data.as_bytes()[self.byte_offset..self.byte_offset + self.byte_len]
    }

    /// Float view of this block's region (whole 4-byte words only)
    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.data.as_f32s()[self.byte_offset / 4..(self.byte_offset + self.byte_len) / 4]
    }

    /// Byte distance between consecutive instances
    #[inline]
    pub fn byte_stride(&self) -> usize {
        self.byte_stride
    }

    /// Number of instances in the block
    #[inline]
    pub fn instance_count(&self) -> usize {
        if self.byte_stride == 0 {
            0
        } else {
            self.byte_len / self.byte_stride
        }
    }
}

/// A named attribute bound to a shared interleaved block
#[derive(Debug, Clone)]
pub struct InterleavedAttribute {
    block: Arc<InterleavedBlock>,
    component: ComponentType,
    item_size: usize,
    byte_offset: usize,
    normalized: bool,
}

impl InterleavedAttribute {
    pub fn new(
        block: Arc<InterleavedBlock>,
        component: ComponentType,
        item_size: usize,
        byte_offset: usize,
        normalized: bool,
    ) -> Self {
        Self {
            block,
            component,
            item_size,
            byte_offset,
            normalized,
        }
    }

    #[inline]
    pub fn block(&self) -> &Arc<InterleavedBlock> {
        &self.block
    }

    #[inline]
    pub fn component(&self) -> ComponentType {
        self.component
    }

    /// Number of components per instance
    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Byte offset within each instance
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    #[inline]
    pub fn normalized(&self) -> bool {
        self.normalized
    }

    #[inline]
    fn float_component(&self, index: usize, component: usize) -> f32 {
        debug_assert_eq!(self.component, ComponentType::F32);
        debug_assert!(component < self.item_size);
        let float_index = (index * self.block.byte_stride() + self.byte_offset) / 4 + component;
        self.block.floats()[float_index]
    }

    /// First float component of instance `index`
    #[inline]
    pub fn float_x(&self, index: usize) -> f32 {
        self.float_component(index, 0)
    }

    /// Second float component of instance `index`
    #[inline]
    pub fn float_y(&self, index: usize) -> f32 {
        self.float_component(index, 1)
    }

    /// Third float component of instance `index`
    #[inline]
    pub fn float_z(&self, index: usize) -> f32 {
        self.float_component(index, 2)
    }
}

/// A non-interleaved attribute owning its buffer
#[derive(Debug, Clone)]
pub struct PlainAttribute {
    pub data: Arc<PackedBuffer>,
    pub component: ComponentType,
    pub item_size: usize,
    pub normalized: bool,
}

/// Either kind of named geometry attribute
#[derive(Debug, Clone)]
pub enum GeometryAttribute {
    Plain(PlainAttribute),
    Interleaved(InterleavedAttribute),
}

/// A geometry object: insertion-ordered named attributes, an optional index
/// buffer, and optional precomputed bounds.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuffer {
    attributes: Vec<(String, GeometryAttribute)>,
    index: Option<Arc<Vec<u32>>>,
    /// Precomputed object bounds, used for whole-mesh accept/reject
    pub bounding_box: Option<Aabb>,
}

impl GeometryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a named attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: GeometryAttribute) {
        let name = name.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = attribute;
        } else {
            self.attributes.push((name, attribute));
        }
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&GeometryAttribute> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a)
    }

    /// All attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &GeometryAttribute)> {
        self.attributes.iter().map(|(n, a)| (n.as_str(), a))
    }

    /// Look up an interleaved attribute by name
    pub fn interleaved_attribute(&self, name: &str) -> Option<&InterleavedAttribute> {
        match self.attribute(name) {
            Some(GeometryAttribute::Interleaved(attr)) => Some(attr),
            _ => None,
        }
    }

    /// The first interleaved attribute, whose block all interleaved
    /// attributes of an instanced collection share
    pub fn first_interleaved(&self) -> Option<&InterleavedAttribute> {
        self.attributes.iter().find_map(|(_, a)| match a {
            GeometryAttribute::Interleaved(attr) => Some(attr),
            GeometryAttribute::Plain(_) => None,
        })
    }

    pub fn set_index(&mut self, index: Option<Arc<Vec<u32>>>) {
        self.index = index;
    }

    pub fn index(&self) -> Option<&Arc<Vec<u32>>> {
        self.index.as_ref()
    }
}
