// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Append-only pattern of placed spheres.

`SpherePattern` owns pre-allocated coordinate and radius buffers plus a
[`SpatialIndex`] that always mirrors exactly the spheres added so far. It is
the acceptance oracle of the placement loop: a candidate is rejected when it
intersects any accepted sphere.
*/

use glam::DVec3;

use crate::spatial::{SpatialIndex, DEFAULT_CELL_SIZE};

/// Fixed-capacity, append-only set of spheres with an incremental spatial index
#[derive(Debug, Clone)]
pub struct SpherePattern {
    coordinates: Vec<DVec3>,
    radii: Vec<f64>,
    max_spheres: usize,
    index: SpatialIndex,
}

impl SpherePattern {
    /// Empty pattern that can hold up to `max_spheres` spheres
    pub fn new(max_spheres: usize) -> Self {
        Self::with_cell_size(max_spheres, DEFAULT_CELL_SIZE)
    }

    /// Same as [`SpherePattern::new`] with an explicit index cell size
    pub fn with_cell_size(max_spheres: usize, cell_size: f64) -> Self {
        Self {
            coordinates: Vec::with_capacity(max_spheres),
            radii: Vec::with_capacity(max_spheres),
            max_spheres,
            index: SpatialIndex::with_capacity(cell_size, max_spheres),
        }
    }

    /// `(coordinate, radius)` of the sphere added at `position`
    pub fn get(&self, position: usize) -> (DVec3, f64) {
        assert!(
            position < self.len(),
            "sphere position {} out of range for pattern of length {}",
            position,
            self.len()
        );
        (self.coordinates[position], self.radii[position])
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_spheres
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.max_spheres
    }

    /// Centers of the added spheres, in insertion order
    pub fn coordinates(&self) -> &[DVec3] {
        &self.coordinates
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DVec3, f64)> + '_ {
        self.coordinates.iter().copied().zip(self.radii.iter().copied())
    }

    /// Append a sphere; its id is its insertion position.
    ///
    /// Panics when the pattern is already at capacity.
    pub fn add(&mut self, position: DVec3, radius: f64) {
        let id = self.len();
        assert!(
            id < self.max_spheres,
            "sphere pattern is full ({} spheres)",
            self.max_spheres
        );
        self.coordinates.push(position);
        self.radii.push(radius);
        self.index.insert(id, position, radius);
    }

    /// True if the sphere `(new_position, new_radius)` overlaps or touches an added sphere
    pub fn is_intersecting(&self, new_position: DVec3, new_radius: f64) -> bool {
        self.index.intersects_sphere(new_position, new_radius)
    }

    /// Distance from `trial_position` to the closest added center within `max_distance`.
    ///
    /// Radii play no part. Returns `f64::INFINITY` when no center is in range.
    pub fn distance_to_nearest_neighbor(&self, trial_position: DVec3, max_distance: f64) -> f64 {
        self.index
            .nearest_within(trial_position, max_distance)
            .map_or(f64::INFINITY, |(_, distance)| distance)
    }

    /// Underlying index, read-only
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }
}
