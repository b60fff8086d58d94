// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Geometry primitives: linear algebra helpers, bounding boxes, convex domains and
the sphere/polytope collision predicates built on them.
*/

pub mod aabb;
pub mod collision;
pub mod domain;
pub mod linear_algebra;

pub use aabb::BoundingBox;
pub use collision::{convex_shape_with_spheres, sphere_inside_convex_shape, spheres_intersect};
pub use domain::{ConvexDomain, Microdomain};
pub use linear_algebra::{principal_directions, PrincipalAxes};
