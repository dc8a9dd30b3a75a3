// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # sector-clip Core
//!
//! Data model for packed CAD primitive collections as produced by the
//! sector decoder and consumed by the clip-box filtering engine.
//!
//! ## Overview
//!
//! A decoded sector holds, per primitive collection type, one contiguous
//! byte buffer of back-to-back instances at a fixed stride. This crate
//! provides:
//!
//! - **Primitive types**: the closed [`PrimitiveType`] enumeration of
//!   every collection a sector can contain
//! - **Attribute layouts**: static per-type tables describing the named
//!   attributes inside one instance (byte offset, component type, count)
//! - **Packed buffers**: [`PackedBuffer`], an owned byte buffer with
//!   guaranteed 4-byte alignment so the same memory can be read both as
//!   raw bytes and as 32-bit floats
//!
//! ## Quick Start
//!
//! ```rust
//! use sector_clip_core::{PrimitiveType, PackedBuffer};
//!
//! let layout = PrimitiveType::Ellipsoid.instance_layout().unwrap();
//! let stride = layout.stride();
//!
//! // One zeroed ellipsoid instance
//! let buffer = PackedBuffer::zeroed(stride);
//! assert_eq!(buffer.byte_len() % stride, 0);
//! assert_eq!(buffer.as_f32s().len(), stride / 4);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization support for [`PrimitiveType`]

pub mod buffer;
pub mod error;
pub mod primitive;

pub use buffer::{float_view, PackedBuffer};
pub use error::{Error, Result};
pub use primitive::{AttributeDescriptor, AttributeLayout, ComponentType, PrimitiveType};
