// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clip-box filtering through the bound-attribute convention and the
//! sector dispatcher.

mod common;

use approx::assert_relative_eq;
use common::*;
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use sector_clip_core::PrimitiveType;
use sector_clip_geometry::{filter_sector_geometry, Aabb, GeometryBuffer};
use std::f32::consts::PI;
use std::sync::Arc;

fn clip_box_around_x10_yneg10_z0() -> Aabb {
    Aabb::new(Point3::new(8.0, -12.0, -2.0), Point3::new(12.0, -8.0, 2.0))
}

/// Column-major instance matrix: translation times a fixed rotation
fn rotated_instance_matrix(x: f32, y: f32, z: f32) -> Vec<f32> {
    let matrix = Matrix4::new_translation(&Vector3::new(x, y, z))
        * Rotation3::from_euler_angles(0.0, 1.0, 2.0).to_homogeneous();
    matrix.as_slice().to_vec()
}

/// Filter a two-instance collection where only the first lies inside the
/// clip box around (10, -10, 0); assert the survivor decodes to the first
/// instance's exact attribute values.
fn assert_second_filtered_away(collection_type: PrimitiveType, instances: [Instance; 2]) {
    let geometry = build_geometry(collection_type, &instances);
    let input_len = geometry
        .first_interleaved()
        .unwrap()
        .block()
        .bytes()
        .len();
    let stride = collection_type.instance_layout().unwrap().stride();

    let filtered =
        filter_sector_geometry(geometry, collection_type, Some(&clip_box_around_x10_yneg10_z0()))
            .unwrap()
            .expect("first instance should survive");

    assert_eq!(instance_count(&filtered), 1, "{collection_type}");
    let output_len = filtered.first_interleaved().unwrap().block().bytes().len();
    assert_eq!(output_len % stride, 0);
    assert!(output_len <= input_len);

    // The survivor is instance 0, copied byte-for-byte
    assert_eq!(read_attribute(&filtered, "a_treeIndex", 0), vec![0.0]);
    for (name, expected) in &instances[0] {
        let got = read_attribute(&filtered, name, 0);
        assert_eq!(got.len(), expected.len(), "{collection_type}.{name}");
        for (g, e) in got.iter().zip(expected) {
            assert_relative_eq!(*g, *e, epsilon = 1e-6);
        }
    }
}

#[test]
fn no_clip_box_returns_original_geometry() {
    let geometry = build_geometry(
        PrimitiveType::Ellipsoid,
        &[vec![
            ("a_horizontalRadius", vec![10.0]),
            ("a_verticalRadius", vec![10.0]),
            ("a_height", vec![10.0]),
            ("a_center", vec![0.0, 0.0, 0.0]),
        ]],
    );
    let data = geometry.first_interleaved().unwrap().block().data().clone();

    let passed = filter_sector_geometry(geometry, PrimitiveType::Ellipsoid, None)
        .unwrap()
        .expect("identity pass-through");

    // Same memory, not a copy
    assert!(Arc::ptr_eq(
        &data,
        passed.first_interleaved().unwrap().block().data()
    ));
}

#[test]
fn returns_none_when_nothing_intersects() {
    let ellipsoids: Vec<Instance> = vec![
        vec![
            ("a_horizontalRadius", vec![10.0]),
            ("a_verticalRadius", vec![10.0]),
            ("a_height", vec![10.0]),
            ("a_center", vec![0.0, 0.0, 0.0]),
        ],
        vec![
            ("a_horizontalRadius", vec![10.0]),
            ("a_verticalRadius", vec![10.0]),
            ("a_height", vec![10.0]),
            ("a_center", vec![20.0, 20.0, 0.0]),
        ],
    ];
    let geometry = build_geometry(PrimitiveType::Ellipsoid, &ellipsoids);

    let clip_box = Aabb::new(Point3::new(-30.0, -30.0, -30.0), Point3::new(-20.0, -20.0, -20.0));
    let filtered = filter_sector_geometry(geometry, PrimitiveType::Ellipsoid, Some(&clip_box))
        .unwrap();

    assert!(filtered.is_none());
}

#[test]
fn two_boxes_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Box,
        [
            vec![("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0))],
            vec![("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0))],
        ],
    );
}

#[test]
fn two_circles_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Circle,
        [
            vec![
                ("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0)),
                ("a_normal", vec![0.0, 1.0, 0.0]),
            ],
            vec![
                ("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0)),
                ("a_normal", vec![0.0, 1.0, 0.0]),
            ],
        ],
    );
}

#[test]
fn two_cones_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Cone,
        [
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_centerA", vec![10.0, -10.0, -0.5]),
                ("a_centerB", vec![10.0, -10.0, 0.5]),
                ("a_localXAxis", vec![1.0, 0.0, 0.0]),
                ("a_radiusA", vec![0.5]),
                ("a_radiusB", vec![0.3]),
            ],
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_centerA", vec![-10.0, 5.0, 9.0]),
                ("a_centerB", vec![-10.0, 5.0, 11.0]),
                ("a_localXAxis", vec![1.0, 0.0, 0.0]),
                ("a_radiusA", vec![0.5]),
                ("a_radiusB", vec![0.3]),
            ],
        ],
    );
}

#[test]
fn two_eccentric_cones_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::EccentricCone,
        [
            vec![
                ("a_centerA", vec![10.0, -10.0, -0.5]),
                ("a_centerB", vec![10.0, -10.0, 0.5]),
                ("a_normal", vec![0.0, 0.0, 1.0]),
                ("a_radiusA", vec![0.5]),
                ("a_radiusB", vec![0.3]),
            ],
            vec![
                ("a_centerA", vec![-10.0, 5.0, -2.0]),
                ("a_centerB", vec![-10.0, 5.0, 2.0]),
                ("a_normal", vec![0.0, 0.0, 1.0]),
                ("a_radiusA", vec![0.5]),
                ("a_radiusB", vec![0.3]),
            ],
        ],
    );
}

#[test]
fn two_ellipsoids_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Ellipsoid,
        [
            vec![
                ("a_horizontalRadius", vec![1.0]),
                ("a_verticalRadius", vec![1.0]),
                ("a_height", vec![1.0]),
                ("a_center", vec![10.0, -10.0, 0.0]),
            ],
            vec![
                ("a_horizontalRadius", vec![1.0]),
                ("a_verticalRadius", vec![1.0]),
                ("a_height", vec![1.0]),
                ("a_center", vec![10.0, 10.0, 10.0]),
            ],
        ],
    );
}

#[test]
fn two_general_cylinders_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::GeneralCylinder,
        [
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_centerA", vec![10.0, -10.0, -0.5]),
                ("a_centerB", vec![10.0, -10.0, 0.5]),
                ("a_localXAxis", vec![1.0, 0.0, 0.0]),
                ("a_planeA", vec![0.0, 1.0, 0.0, 1.0]),
                ("a_planeB", vec![0.0, -1.0, 0.0, 1.0]),
                ("a_radius", vec![0.5]),
            ],
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_centerA", vec![-10.0, 5.0, -0.5]),
                ("a_centerB", vec![-10.0, 5.0, 0.5]),
                ("a_localXAxis", vec![1.0, 0.0, 0.0]),
                ("a_planeA", vec![0.0, 1.0, 0.0, 1.0]),
                ("a_planeB", vec![0.0, -1.0, 0.0, 1.0]),
                ("a_radius", vec![0.5]),
            ],
        ],
    );
}

#[test]
fn two_general_rings_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::GeneralRing,
        [
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0)),
                ("a_normal", vec![0.0, 1.0, 0.0]),
                ("a_thickness", vec![0.5]),
            ],
            vec![
                ("a_angle", vec![0.0]),
                ("a_arcAngle", vec![PI]),
                ("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0)),
                ("a_normal", vec![0.0, 1.0, 0.0]),
                ("a_thickness", vec![0.5]),
            ],
        ],
    );
}

#[test]
fn two_quads_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Quad,
        [
            vec![("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0))],
            vec![("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0))],
        ],
    );
}

#[test]
fn two_tori_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::TorusSegment,
        [
            vec![
                ("a_arcAngle", vec![PI]),
                ("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0)),
                ("a_radius", vec![0.5]),
                ("a_tubeRadius", vec![0.1]),
            ],
            vec![
                ("a_arcAngle", vec![PI]),
                ("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0)),
                ("a_radius", vec![0.5]),
                ("a_tubeRadius", vec![0.1]),
            ],
        ],
    );
}

#[test]
fn two_trapeziums_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Trapezium,
        [
            vec![
                ("a_vertex1", vec![9.5, -10.0, -0.5]),
                ("a_vertex2", vec![9.5, -10.0, 0.5]),
                ("a_vertex3", vec![10.5, -10.0, -0.5]),
                ("a_vertex4", vec![10.5, -10.0, 0.5]),
            ],
            vec![
                ("a_vertex1", vec![-10.5, 5.0, 9.5]),
                ("a_vertex2", vec![-10.5, 5.0, 10.5]),
                ("a_vertex3", vec![-9.5, 5.0, 9.5]),
                ("a_vertex4", vec![-9.5, 5.0, 10.5]),
            ],
        ],
    );
}

#[test]
fn two_nuts_one_accepted_one_rejected() {
    assert_second_filtered_away(
        PrimitiveType::Nut,
        [
            vec![("a_instanceMatrix", rotated_instance_matrix(10.0, -10.0, 0.0))],
            vec![("a_instanceMatrix", rotated_instance_matrix(-10.0, 5.0, 10.0))],
        ],
    );
}

#[test]
fn survivors_keep_their_relative_order() {
    fn ellipsoid_at(x: f32, y: f32, z: f32) -> Instance {
        vec![
            ("a_horizontalRadius", vec![1.0]),
            ("a_verticalRadius", vec![1.0]),
            ("a_height", vec![1.0]),
            ("a_center", vec![x, y, z]),
        ]
    }

    // survive, reject, survive, reject
    let geometry = build_geometry(
        PrimitiveType::Ellipsoid,
        &[
            ellipsoid_at(10.0, -10.0, 0.0),
            ellipsoid_at(10.0, 10.0, 10.0),
            ellipsoid_at(11.0, -11.0, 1.0),
            ellipsoid_at(-20.0, 0.0, 0.0),
        ],
    );

    let filtered = filter_sector_geometry(
        geometry,
        PrimitiveType::Ellipsoid,
        Some(&clip_box_around_x10_yneg10_z0()),
    )
    .unwrap()
    .expect("two instances should survive");

    assert_eq!(instance_count(&filtered), 2);
    assert_eq!(read_attribute(&filtered, "a_treeIndex", 0), vec![0.0]);
    assert_eq!(read_attribute(&filtered, "a_treeIndex", 1), vec![2.0]);
    assert_eq!(read_attribute(&filtered, "a_center", 1), vec![11.0, -11.0, 1.0]);
}

#[test]
fn filtering_an_already_filtered_buffer_is_stable() {
    let instances: Vec<Instance> = vec![
        vec![
            ("a_horizontalRadius", vec![1.0]),
            ("a_verticalRadius", vec![1.0]),
            ("a_height", vec![1.0]),
            ("a_center", vec![10.0, -10.0, 0.0]),
        ],
        vec![
            ("a_horizontalRadius", vec![1.0]),
            ("a_verticalRadius", vec![1.0]),
            ("a_height", vec![1.0]),
            ("a_center", vec![10.0, 10.0, 10.0]),
        ],
    ];
    let clip_box = clip_box_around_x10_yneg10_z0();

    let once = filter_sector_geometry(
        build_geometry(PrimitiveType::Ellipsoid, &instances),
        PrimitiveType::Ellipsoid,
        Some(&clip_box),
    )
    .unwrap()
    .unwrap();

    let twice = filter_sector_geometry(once.clone(), PrimitiveType::Ellipsoid, Some(&clip_box))
        .unwrap()
        .unwrap();

    assert_eq!(
        once.first_interleaved().unwrap().block().bytes(),
        twice.first_interleaved().unwrap().block().bytes()
    );
}

#[test]
fn instance_touching_the_clip_box_face_is_retained() {
    // Bounds [12, 16] on x, exactly touching the clip box's max x
    let geometry = build_geometry(
        PrimitiveType::Ellipsoid,
        &[vec![
            ("a_horizontalRadius", vec![2.0]),
            ("a_verticalRadius", vec![2.0]),
            ("a_height", vec![2.0]),
            ("a_center", vec![14.0, -10.0, 0.0]),
        ]],
    );

    let filtered = filter_sector_geometry(
        geometry,
        PrimitiveType::Ellipsoid,
        Some(&clip_box_around_x10_yneg10_z0()),
    )
    .unwrap();

    assert!(filtered.is_some());
    assert_eq!(instance_count(&filtered.unwrap()), 1);
}

#[test]
fn two_collections_sharing_one_buffer_filter_independently() {
    let ellipsoids: Vec<Instance> = vec![
        vec![
            ("a_horizontalRadius", vec![1.0]),
            ("a_verticalRadius", vec![1.0]),
            ("a_height", vec![1.0]),
            ("a_center", vec![10.0, -10.0, 0.0]),
        ],
        vec![
            ("a_horizontalRadius", vec![1.0]),
            ("a_verticalRadius", vec![1.0]),
            ("a_height", vec![1.0]),
            ("a_center", vec![10.0, 10.0, 10.0]),
        ],
    ];
    let cylinders: Vec<Instance> = vec![
        vec![
            ("a_centerA", vec![10.0, -10.0, -0.5]),
            ("a_centerB", vec![10.0, -10.0, 0.5]),
            ("a_radius", vec![0.5]),
        ],
        vec![
            ("a_centerA", vec![-10.0, 5.0, -0.5]),
            ("a_centerB", vec![-10.0, 5.0, 0.5]),
            ("a_radius", vec![0.5]),
        ],
    ];

    let geometries = build_geometries_sharing_buffer(&[
        (PrimitiveType::Ellipsoid, &ellipsoids),
        (PrimitiveType::GeneralCylinder, &cylinders),
    ]);
    let clip_box = clip_box_around_x10_yneg10_z0();

    for (geometry, collection_type) in geometries
        .into_iter()
        .zip([PrimitiveType::Ellipsoid, PrimitiveType::GeneralCylinder])
    {
        let filtered = filter_sector_geometry(geometry, collection_type, Some(&clip_box))
            .unwrap()
            .expect("one instance should survive");

        assert_eq!(instance_count(&filtered), 1, "{collection_type}");
        assert_eq!(read_attribute(&filtered, "a_treeIndex", 0), vec![0.0]);
    }
}

fn mesh_geometry(bounding_box: Option<Aabb>) -> GeometryBuffer {
    let mut geometry = GeometryBuffer::new();
    geometry.set_index(Some(Arc::new(vec![0, 1, 2])));
    geometry.bounding_box = bounding_box;
    geometry
}

#[test]
fn whole_mesh_outside_clip_box_yields_no_geometry() {
    for mesh_type in [
        PrimitiveType::TriangleMesh,
        PrimitiveType::InstanceMesh,
        PrimitiveType::TexturedTriangleMesh,
    ] {
        let far_away = Aabb::new(Point3::new(100.0, 100.0, 100.0), Point3::new(101.0, 101.0, 101.0));
        let filtered = filter_sector_geometry(
            mesh_geometry(Some(far_away)),
            mesh_type,
            Some(&clip_box_around_x10_yneg10_z0()),
        )
        .unwrap();

        assert!(filtered.is_none(), "{mesh_type}");
    }
}

#[test]
fn whole_mesh_intersecting_clip_box_passes_through() {
    let near = Aabb::new(Point3::new(9.0, -11.0, -1.0), Point3::new(11.0, -9.0, 1.0));
    let index = Arc::new(vec![0u32, 1, 2]);
    let mut geometry = mesh_geometry(Some(near));
    geometry.set_index(Some(index.clone()));

    let filtered = filter_sector_geometry(
        geometry,
        PrimitiveType::TriangleMesh,
        Some(&clip_box_around_x10_yneg10_z0()),
    )
    .unwrap()
    .expect("intersecting mesh passes through");

    assert!(Arc::ptr_eq(filtered.index().unwrap(), &index));
}

#[test]
fn whole_mesh_without_precomputed_bounds_passes_through() {
    let filtered = filter_sector_geometry(
        mesh_geometry(None),
        PrimitiveType::TriangleMesh,
        Some(&clip_box_around_x10_yneg10_z0()),
    )
    .unwrap();

    assert!(filtered.is_some());
}
