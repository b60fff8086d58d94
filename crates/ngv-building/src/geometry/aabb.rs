// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Axis-aligned bounding boxes used as the coarse filter of every spatial query.
*/

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Closed axis-aligned box `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        assert!(
            min.cmple(max).all(),
            "bounding box min {:?} exceeds max {:?}",
            min,
            max
        );
        Self { min, max }
    }

    /// Tightest box around `points`, `None` when empty
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Box enclosing a sphere
    pub fn around_sphere(center: DVec3, radius: f64) -> Self {
        let r = DVec3::splat(radius);
        Self {
            min: center - r,
            max: center + r,
        }
    }

    /// True if the boxes share at least one point (touching counts)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// Box grown by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        let m = DVec3::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e.x * e.y * e.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(&[
            DVec3::new(1.0, -1.0, 3.0),
            DVec3::new(-2.0, 4.0, 0.0),
            DVec3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, DVec3::new(-2.0, -1.0, 0.0));
        assert_eq!(bbox.max, DVec3::new(1.0, 4.0, 5.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_intersection_is_closed() {
        let a = BoundingBox::new(DVec3::ZERO, DVec3::ONE);
        let touching = BoundingBox::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        let apart = BoundingBox::new(DVec3::new(1.1, 0.0, 0.0), DVec3::new(2.0, 1.0, 1.0));
        assert!(a.intersects(&touching));
        assert!(touching.intersects(&a));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_sphere_box_and_volume() {
        let bbox = BoundingBox::around_sphere(DVec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(bbox.extent(), DVec3::ONE);
        assert_eq!(bbox.center(), DVec3::new(1.0, 2.0, 3.0));
        assert!((bbox.volume() - 1.0).abs() < 1e-12);
        assert!(bbox.contains_point(DVec3::new(1.5, 2.5, 3.5)));
        assert!(!bbox.expanded(-0.1).contains_point(DVec3::new(1.5, 2.5, 3.5)));
    }

    #[test]
    #[should_panic(expected = "exceeds max")]
    fn test_inverted_box_panics() {
        BoundingBox::new(DVec3::ONE, DVec3::ZERO);
    }
}
