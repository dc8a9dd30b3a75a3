// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # sector-clip Geometry
//!
//! Clip-box filtering for packed CAD sector primitives using nalgebra for
//! the bounding-box math.
//!
//! Given a decoded collection buffer and an optional clip box, the engine
//! computes a conservative axis-aligned bounding box per instance, keeps
//! the instances whose box intersects the clip volume (boundary-inclusive),
//! and compacts the survivors into a new buffer that is byte-for-byte
//! compatible with the original layout. Whole-mesh collections are accepted
//! or rejected as a unit on their precomputed bounds.
//!
//! The typical call is one [`filter_sector_geometry`] per collection per
//! sector load:
//!
//! ```rust,ignore
//! use sector_clip_geometry::{filter_sector_geometry, Aabb, Point3};
//! use sector_clip_core::PrimitiveType;
//!
//! let clip_box = Aabb::new(Point3::new(8.0, -12.0, -2.0), Point3::new(12.0, -8.0, 2.0));
//! match filter_sector_geometry(geometry, PrimitiveType::Ellipsoid, Some(&clip_box))? {
//!     Some(filtered) => upload(filtered),
//!     None => {} // nothing to render for this collection
//! }
//! ```

pub mod aabb;
pub mod attribute;
pub mod bounds;
pub mod compact;
pub mod error;
pub mod filter;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use aabb::Aabb;
pub use attribute::{
    GeometryAttribute, GeometryBuffer, InterleavedAttribute, InterleavedBlock, PlainAttribute,
};
pub use bounds::BoundsScratch;
pub use compact::filter_instances_outside_clip_box;
pub use error::{Error, Result};
pub use filter::filter_sector_geometry;
pub use filter::raw::{attribute_map_from_layout, AttributeMap, AttributeSpec};
