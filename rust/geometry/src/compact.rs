// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic clip-box compaction over a packed instance buffer.
//!
//! The single compaction algorithm both call conventions share: walk the
//! instances at a fixed stride, ask the callback for each instance's
//! bounding box, and copy survivors contiguously into a fresh buffer,
//! preserving their relative order. The input buffer is never mutated.

use crate::aabb::Aabb;
use crate::error::Result;
use sector_clip_core::{float_view, Error as CoreError, PackedBuffer};

/// Filter instances whose bounding box does not intersect `clip_box`.
///
/// `compute_bounds` receives `(index, byte_stride, floats, out)` and must
/// write the instance's conservative bounding box into `out`. Intersection
/// is boundary-inclusive, so instances touching a clip-box face survive.
///
/// Returns a new buffer truncated to `survivors * byte_stride`; zero
/// survivors yield a zero-length buffer. The buffer length must be a
/// multiple of `byte_stride` and viewable as f32s.
pub fn filter_instances_outside_clip_box<F>(
    bytes: &[u8],
    byte_stride: usize,
    clip_box: &Aabb,
    mut compute_bounds: F,
) -> Result<PackedBuffer>
where
    F: FnMut(usize, usize, &[f32], &mut Aabb),
{
    if byte_stride == 0 || bytes.len() % byte_stride != 0 {
        return Err(CoreError::UnevenBufferLength {
            len: bytes.len(),
            stride: byte_stride,
        }
        .into());
    }

    let floats = float_view(bytes)?;
    let instance_count = bytes.len() / byte_stride;

    // Worst case nothing is filtered out
    let mut compacted = PackedBuffer::zeroed(bytes.len());
    let mut bounds = Aabb::empty();
    let mut used = 0;

    for index in 0..instance_count {
        bounds.make_empty();
        compute_bounds(index, byte_stride, floats, &mut bounds);

        if clip_box.intersects(&bounds) {
            let start = index * byte_stride;
            compacted.as_bytes_mut()[used..used + byte_stride]
                .copy_from_slice(&bytes[start..start + byte_stride]);
            used += byte_stride;
        }
    }

    compacted.truncate(used);
    Ok(compacted)
}
