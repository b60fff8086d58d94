// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Collision predicates between spheres and convex polytopes.

A convex polytope is given as one point and one outward normal per face. A sphere
belongs to the polytope when, for every face, the signed distance of its center to
the face plane is at most its radius. With a zero radius this is the closed
point-in-polytope test.
*/

use glam::DVec3;

/// Signed distance of `point` to the plane through `face_point` with outward `face_normal`
#[inline]
pub fn signed_distance_to_plane(point: DVec3, face_point: DVec3, face_normal: DVec3) -> f64 {
    (point - face_point).dot(face_normal)
}

/// True if the sphere `(center, radius)` satisfies every face constraint
pub fn sphere_inside_convex_shape(
    face_points: &[DVec3],
    face_normals: &[DVec3],
    center: DVec3,
    radius: f64,
) -> bool {
    assert_eq!(
        face_points.len(),
        face_normals.len(),
        "convex shape has {} face points but {} face normals",
        face_points.len(),
        face_normals.len()
    );
    face_points
        .iter()
        .zip(face_normals)
        .all(|(p, n)| signed_distance_to_plane(center, *p, *n) <= radius)
}

/// Containment mask of many spheres against one convex shape
pub fn convex_shape_with_spheres(
    face_points: &[DVec3],
    face_normals: &[DVec3],
    centers: &[DVec3],
    radii: &[f64],
) -> Vec<bool> {
    assert_eq!(
        centers.len(),
        radii.len(),
        "{} sphere centers but {} radii",
        centers.len(),
        radii.len()
    );
    centers
        .iter()
        .zip(radii)
        .map(|(c, r)| sphere_inside_convex_shape(face_points, face_normals, *c, *r))
        .collect()
}

/// True if two spheres overlap or touch
#[inline]
pub fn spheres_intersect(c1: DVec3, r1: f64, c2: DVec3, r2: f64) -> bool {
    c1.distance_squared(c2) <= (r1 + r2) * (r1 + r2)
}
