// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive collection types and their static attribute layouts.
//!
//! The set of collection types a sector can contain is closed; dispatch on
//! [`PrimitiveType`] is always an exhaustive `match` so an unhandled type
//! is a compile error, never a runtime branch.

use std::fmt;

/// Component type of one attribute element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 32-bit float, must sit at a 4-byte aligned offset
    F32,
    /// Unsigned byte (colors)
    U8,
}

impl ComponentType {
    /// Size of one component in bytes
    #[inline]
    pub const fn byte_size(&self) -> usize {
        match self {
            ComponentType::F32 => 4,
            ComponentType::U8 => 1,
        }
    }
}

/// One named attribute inside an instance: where it lives and what it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    /// Byte offset from the start of the instance
    pub byte_offset: usize,
    pub component: ComponentType,
    /// Number of components (e.g. 3 for a vec3, 16 for a mat4)
    pub item_count: usize,
    /// Whether integer values are normalized to [0, 1] on the GPU
    pub normalized: bool,
}

impl AttributeDescriptor {
    /// Total byte extent of the attribute within one instance
    #[inline]
    pub const fn byte_size(&self) -> usize {
        self.component.byte_size() * self.item_count
    }
}

const fn f32_attr(name: &'static str, byte_offset: usize, item_count: usize) -> AttributeDescriptor {
    AttributeDescriptor {
        name,
        byte_offset,
        component: ComponentType::F32,
        item_count,
        normalized: false,
    }
}

const fn tree_index_attr() -> AttributeDescriptor {
    f32_attr("a_treeIndex", 0, 1)
}

const fn color_attr() -> AttributeDescriptor {
    AttributeDescriptor {
        name: "a_color",
        byte_offset: 4,
        component: ComponentType::U8,
        item_count: 4,
        normalized: true,
    }
}

/// Ordered attribute set of one instanced collection type.
///
/// The instance stride is fixed per type for the lifetime of any buffer of
/// that type: `max(byte_offset + byte_size)` over all attributes, which
/// allows trailing padding.
#[derive(Debug)]
pub struct AttributeLayout {
    descriptors: &'static [AttributeDescriptor],
}

impl AttributeLayout {
    /// All attributes in declaration order
    #[inline]
    pub fn attributes(&self) -> &'static [AttributeDescriptor] {
        self.descriptors
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Byte distance between the start of consecutive instances
    pub fn stride(&self) -> usize {
        self.descriptors
            .iter()
            .map(|d| d.byte_offset + d.byte_size())
            .max()
            .unwrap_or(0)
    }
}

static BOX_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_instanceMatrix", 8, 16),
    ],
};

static CIRCLE_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_instanceMatrix", 8, 16),
        f32_attr("a_normal", 72, 3),
    ],
};

static CONE_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_angle", 8, 1),
        f32_attr("a_arcAngle", 12, 1),
        f32_attr("a_centerA", 16, 3),
        f32_attr("a_centerB", 28, 3),
        f32_attr("a_localXAxis", 40, 3),
        f32_attr("a_radiusA", 52, 1),
        f32_attr("a_radiusB", 56, 1),
    ],
};

static ECCENTRIC_CONE_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_centerA", 8, 3),
        f32_attr("a_centerB", 20, 3),
        f32_attr("a_normal", 32, 3),
        f32_attr("a_radiusA", 44, 1),
        f32_attr("a_radiusB", 48, 1),
    ],
};

static ELLIPSOID_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_horizontalRadius", 8, 1),
        f32_attr("a_verticalRadius", 12, 1),
        f32_attr("a_height", 16, 1),
        f32_attr("a_center", 20, 3),
    ],
};

static GENERAL_CYLINDER_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_angle", 8, 1),
        f32_attr("a_arcAngle", 12, 1),
        f32_attr("a_centerA", 16, 3),
        f32_attr("a_centerB", 28, 3),
        f32_attr("a_localXAxis", 40, 3),
        f32_attr("a_planeA", 52, 4),
        f32_attr("a_planeB", 68, 4),
        f32_attr("a_radius", 84, 1),
    ],
};

static GENERAL_RING_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_angle", 8, 1),
        f32_attr("a_arcAngle", 12, 1),
        f32_attr("a_instanceMatrix", 16, 16),
        f32_attr("a_normal", 80, 3),
        f32_attr("a_thickness", 92, 1),
    ],
};

static QUAD_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_instanceMatrix", 8, 16),
    ],
};

static TORUS_SEGMENT_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_arcAngle", 8, 1),
        f32_attr("a_instanceMatrix", 12, 16),
        f32_attr("a_radius", 76, 1),
        f32_attr("a_tubeRadius", 80, 1),
    ],
};

static TRAPEZIUM_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_vertex1", 8, 3),
        f32_attr("a_vertex2", 20, 3),
        f32_attr("a_vertex3", 32, 3),
        f32_attr("a_vertex4", 44, 3),
    ],
};

static NUT_LAYOUT: AttributeLayout = AttributeLayout {
    descriptors: &[
        tree_index_attr(),
        color_attr(),
        f32_attr("a_instanceMatrix", 8, 16),
    ],
};

/// Every collection type a decoded sector can contain.
///
/// Instanced types carry many fixed-stride instances in one packed buffer;
/// the three mesh types are whole objects with their own vertex data and
/// are never filtered per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveType {
    Box,
    Circle,
    Cone,
    EccentricCone,
    Ellipsoid,
    GeneralCylinder,
    GeneralRing,
    Quad,
    TorusSegment,
    Trapezium,
    Nut,
    InstanceMesh,
    TriangleMesh,
    TexturedTriangleMesh,
}

impl PrimitiveType {
    /// All collection types, in tag order
    pub const ALL: [PrimitiveType; 14] = [
        PrimitiveType::Box,
        PrimitiveType::Circle,
        PrimitiveType::Cone,
        PrimitiveType::EccentricCone,
        PrimitiveType::Ellipsoid,
        PrimitiveType::GeneralCylinder,
        PrimitiveType::GeneralRing,
        PrimitiveType::Quad,
        PrimitiveType::TorusSegment,
        PrimitiveType::Trapezium,
        PrimitiveType::Nut,
        PrimitiveType::InstanceMesh,
        PrimitiveType::TriangleMesh,
        PrimitiveType::TexturedTriangleMesh,
    ];

    /// Whether this is a whole-mesh type rather than an instanced collection
    #[inline]
    pub const fn is_mesh(&self) -> bool {
        matches!(
            self,
            PrimitiveType::InstanceMesh
                | PrimitiveType::TriangleMesh
                | PrimitiveType::TexturedTriangleMesh
        )
    }

    /// The static attribute layout of an instanced collection.
    ///
    /// Returns `None` for the mesh types, which have no per-instance layout.
    pub fn instance_layout(&self) -> Option<&'static AttributeLayout> {
        match self {
            PrimitiveType::Box => Some(&BOX_LAYOUT),
            PrimitiveType::Circle => Some(&CIRCLE_LAYOUT),
            PrimitiveType::Cone => Some(&CONE_LAYOUT),
            PrimitiveType::EccentricCone => Some(&ECCENTRIC_CONE_LAYOUT),
            PrimitiveType::Ellipsoid => Some(&ELLIPSOID_LAYOUT),
            PrimitiveType::GeneralCylinder => Some(&GENERAL_CYLINDER_LAYOUT),
            PrimitiveType::GeneralRing => Some(&GENERAL_RING_LAYOUT),
            PrimitiveType::Quad => Some(&QUAD_LAYOUT),
            PrimitiveType::TorusSegment => Some(&TORUS_SEGMENT_LAYOUT),
            PrimitiveType::Trapezium => Some(&TRAPEZIUM_LAYOUT),
            PrimitiveType::Nut => Some(&NUT_LAYOUT),
            PrimitiveType::InstanceMesh
            | PrimitiveType::TriangleMesh
            | PrimitiveType::TexturedTriangleMesh => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Box => "Box",
            PrimitiveType::Circle => "Circle",
            PrimitiveType::Cone => "Cone",
            PrimitiveType::EccentricCone => "EccentricCone",
            PrimitiveType::Ellipsoid => "Ellipsoid",
            PrimitiveType::GeneralCylinder => "GeneralCylinder",
            PrimitiveType::GeneralRing => "GeneralRing",
            PrimitiveType::Quad => "Quad",
            PrimitiveType::TorusSegment => "TorusSegment",
            PrimitiveType::Trapezium => "Trapezium",
            PrimitiveType::Nut => "Nut",
            PrimitiveType::InstanceMesh => "InstanceMesh",
            PrimitiveType::TriangleMesh => "TriangleMesh",
            PrimitiveType::TexturedTriangleMesh => "TexturedTriangleMesh",
        };
        f.write_str(name)
    }
}
