// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Convex domains (astrocytic microdomains) as seen by the connectivity code.

Connectivity only needs read access to four properties of a domain, captured by
[`ConvexDomain`]. [`Microdomain`] is the owned implementation used by the rest of
the crate and by tests.
*/

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::aabb::BoundingBox;
use super::collision::sphere_inside_convex_shape;

/// Read-only view of a convex polyhedral region
pub trait ConvexDomain {
    /// One point on each face plane
    fn face_points(&self) -> &[DVec3];

    /// Outward unit normal of each face, parallel to `face_points`
    fn face_normals(&self) -> &[DVec3];

    fn bounding_box(&self) -> BoundingBox;

    fn centroid(&self) -> DVec3;

    /// Closed containment test for a sphere, see [`sphere_inside_convex_shape`]
    fn contains_sphere(&self, center: DVec3, radius: f64) -> bool {
        sphere_inside_convex_shape(self.face_points(), self.face_normals(), center, radius)
    }
}

/// Convex polytope owned by a single cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Microdomain {
    face_points: Vec<DVec3>,
    face_normals: Vec<DVec3>,
    vertices: Vec<DVec3>,
    bounding_box: BoundingBox,
    centroid: DVec3,
}

impl Microdomain {
    /// Build a domain from its face planes and its vertices.
    ///
    /// The bounding box and the centroid (vertex average) are derived from `vertices`.
    pub fn new(face_points: Vec<DVec3>, face_normals: Vec<DVec3>, vertices: Vec<DVec3>) -> Self {
        assert_eq!(
            face_points.len(),
            face_normals.len(),
            "microdomain has {} face points but {} face normals",
            face_points.len(),
            face_normals.len()
        );
        let bounding_box = BoundingBox::from_points(&vertices)
            .unwrap_or_else(|| panic!("microdomain needs at least one vertex"));
        let centroid = vertices.iter().copied().sum::<DVec3>() / vertices.len() as f64;

        Self {
            face_points,
            face_normals: face_normals.iter().map(|n| n.normalize_or_zero()).collect(),
            vertices,
            bounding_box,
            centroid,
        }
    }

    /// Build a domain from a closed triangulated convex hull.
    ///
    /// Each triangle becomes one face; its normal is oriented away from the centroid
    /// so the winding of `triangles` does not matter.
    pub fn from_triangles(vertices: Vec<DVec3>, triangles: &[[usize; 3]]) -> Self {
        assert!(!vertices.is_empty(), "microdomain needs at least one vertex");
        let centroid = vertices.iter().copied().sum::<DVec3>() / vertices.len() as f64;

        let mut face_points = Vec::with_capacity(triangles.len());
        let mut face_normals = Vec::with_capacity(triangles.len());
        for &[a, b, c] in triangles {
            let (pa, pb, pc) = (vertices[a], vertices[b], vertices[c]);
            let mut normal = (pb - pa).cross(pc - pa).normalize_or_zero();
            if normal.dot(pa - centroid) < 0.0 {
                normal = -normal;
            }
            face_points.push(pa);
            face_normals.push(normal);
        }

        Self::new(face_points, face_normals, vertices)
    }

    /// Axis-aligned cuboid `[min, max]`
    pub fn from_box(min: DVec3, max: DVec3) -> Self {
        let bbox = BoundingBox::new(min, max);
        let vertices = (0..8)
            .map(|corner| {
                DVec3::new(
                    if corner & 1 == 0 { bbox.min.x } else { bbox.max.x },
                    if corner & 2 == 0 { bbox.min.y } else { bbox.max.y },
                    if corner & 4 == 0 { bbox.min.z } else { bbox.max.z },
                )
            })
            .collect();

        Self::new(
            vec![min, min, min, max, max, max],
            vec![
                DVec3::NEG_X,
                DVec3::NEG_Y,
                DVec3::NEG_Z,
                DVec3::X,
                DVec3::Y,
                DVec3::Z,
            ],
            vertices,
        )
    }

    /// Copy scaled about the centroid by `factor` (overlapping microdomains use `factor > 1`)
    pub fn scaled(&self, factor: f64) -> Self {
        assert!(
            factor.is_finite() && factor > 0.0,
            "scale factor must be positive, got {}",
            factor
        );
        let c = self.centroid;
        let scale = |p: &DVec3| c + (*p - c) * factor;

        Self::new(
            self.face_points.iter().map(scale).collect(),
            self.face_normals.clone(),
            self.vertices.iter().map(scale).collect(),
        )
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn n_faces(&self) -> usize {
        self.face_points.len()
    }
}

impl ConvexDomain for Microdomain {
    fn face_points(&self) -> &[DVec3] {
        &self.face_points
    }

    fn face_normals(&self) -> &[DVec3] {
        &self.face_normals
    }

    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn centroid(&self) -> DVec3 {
        self.centroid
    }
}
