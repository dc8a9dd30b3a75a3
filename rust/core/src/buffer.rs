// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owned instance buffers with shared byte and float views.
//!
//! Instance buffers are read both as raw bytes (verbatim instance copies)
//! and as 32-bit floats (attribute values), aliasing the same memory.
//! [`PackedBuffer`] guarantees the 4-byte alignment the float view needs
//! by construction; [`float_view`] is the checked cast for borrowed byte
//! slices whose alignment is the caller's problem.

use crate::error::{Error, Result};

/// An owned byte buffer with guaranteed 4-byte alignment.
///
/// Storage is a `Vec<u32>`, so a float view over the contents is always
/// valid. The byte length is tracked separately from the word capacity and
/// need not be a multiple of 4; [`PackedBuffer::as_f32s`] only covers whole
/// words.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    words: Vec<u32>,
    byte_len: usize,
}

impl PackedBuffer {
    /// Create a zero-filled buffer of `byte_len` bytes
    pub fn zeroed(byte_len: usize) -> Self {
        Self {
            words: vec![0; byte_len.div_ceil(4)],
            byte_len,
        }
    }

    /// Create a buffer holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buffer = Self::zeroed(bytes.len());
        buffer.as_bytes_mut().copy_from_slice(bytes);
        buffer
    }

    /// Length in bytes
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Whether the buffer holds no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }

    /// Byte view of the contents
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.byte_len]
    }

    /// Mutable byte view of the contents
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.byte_len]
    }

    /// Float view of the contents, covering whole 4-byte words only
    #[inline]
    pub fn as_f32s(&self) -> &[f32] {
        &bytemuck::cast_slice(&self.words)[..self.byte_len / 4]
    }

    /// Shorten the buffer to `byte_len` bytes.
    ///
    /// Has no effect if `byte_len` is not smaller than the current length.
    pub fn truncate(&mut self, byte_len: usize) {
        if byte_len < self.byte_len {
            self.byte_len = byte_len;
            self.words.truncate(byte_len.div_ceil(4));
        }
    }
}

/// View a borrowed byte slice as 32-bit floats.
///
/// A non-empty slice must start at a 4-byte aligned address and its length
/// must be a multiple of 4; anything else is a contract violation between
/// decoder and filter and fails with [`Error::MisalignedFloatView`]. An
/// empty slice yields an empty view regardless of its address.
pub fn float_view(bytes: &[u8]) -> Result<&[f32]> {
    // An empty slice may carry a 1-aligned dangling pointer, which the cast
    // would reject even though there is nothing to view
    if bytes.is_empty() {
        return Ok(&[]);
    }
    bytemuck::try_cast_slice(bytes).map_err(|e| Error::MisalignedFloatView(e.to_string()))
}
