// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Dynamic uniform-grid spatial index over spheres.

Entries are bucketed by the Morton code of the grid cell holding their center.
A Roaring bitmap tracks which cells are occupied so that large query boxes can
walk the occupied cells instead of every cell they cover. Insertions are visible
to the very next query; nothing is batched.
*/

use std::ops::ControlFlow;

use ahash::AHashMap;
use glam::DVec3;
use roaring::RoaringTreemap;
use serde::Serialize;

use super::morton::{bias_cell_coordinate, morton_decode_3d, morton_encode_3d};
use crate::geometry::collision::spheres_intersect;
use crate::geometry::BoundingBox;

/// Grid cell edge length used when none is configured (um)
pub const DEFAULT_CELL_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
struct Entry {
    center: DVec3,
    radius: f64,
    id: usize,
}

/// Inclusive range of biased cell coordinates
#[derive(Debug, Clone, Copy)]
struct CellRange {
    min: (u32, u32, u32),
    max: (u32, u32, u32),
}

impl CellRange {
    fn is_empty(&self) -> bool {
        self.min.0 > self.max.0 || self.min.1 > self.max.1 || self.min.2 > self.max.2
    }

    fn n_cells(&self) -> u64 {
        (self.max.0 - self.min.0 + 1) as u64
            * (self.max.1 - self.min.1 + 1) as u64
            * (self.max.2 - self.min.2 + 1) as u64
    }

    fn contains(&self, (x, y, z): (u32, u32, u32)) -> bool {
        (self.min.0..=self.max.0).contains(&x)
            && (self.min.1..=self.max.1).contains(&y)
            && (self.min.2..=self.max.2).contains(&z)
    }
}

/// Spatial index of `(center, radius, id)` spheres with dynamic insertion
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    entries: Vec<Entry>,
    /// Morton code -> positions in `entries`
    cells: AHashMap<u64, Vec<u32>>,
    occupied: RoaringTreemap,
    max_radius: f64,
}

impl SpatialIndex {
    /// Create an empty index with grid cells of edge `cell_size`
    pub fn new(cell_size: f64) -> Self {
        Self::with_capacity(cell_size, 0)
    }

    pub fn with_capacity(cell_size: f64, capacity: usize) -> Self {
        assert!(
            cell_size.is_finite() && cell_size > 0.0,
            "spatial index cell size must be finite and positive, got {}",
            cell_size
        );
        Self {
            cell_size,
            entries: Vec::with_capacity(capacity),
            cells: AHashMap::new(),
            occupied: RoaringTreemap::new(),
            max_radius: 0.0,
        }
    }

    /// Bulk-build an index whose ids are the row positions of `centers`
    pub fn from_points(centers: &[DVec3], radii: &[f64], cell_size: f64) -> Self {
        assert_eq!(
            centers.len(),
            radii.len(),
            "{} centers but {} radii",
            centers.len(),
            radii.len()
        );
        let mut index = Self::with_capacity(cell_size, centers.len());
        for (id, (center, radius)) in centers.iter().zip(radii).enumerate() {
            index.insert(id, *center, *radius);
        }
        index
    }

    /// Insert a sphere. It takes part in every query issued afterwards.
    pub fn insert(&mut self, id: usize, center: DVec3, radius: f64) {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "sphere radius must be finite and non-negative, got {}",
            radius
        );
        let slot = u32::try_from(self.entries.len())
            .unwrap_or_else(|_| panic!("spatial index is limited to {} entries", u32::MAX));

        let code = self.cell_code(center);
        self.cells.entry(code).or_default().push(slot);
        self.occupied.insert(code);
        self.max_radius = self.max_radius.max(radius);
        self.entries.push(Entry { center, radius, id });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Largest radius inserted so far
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// True if any indexed sphere overlaps or touches the query sphere
    pub fn intersects_sphere(&self, center: DVec3, radius: f64) -> bool {
        if self.is_empty() {
            return false;
        }
        let search = BoundingBox::around_sphere(center, radius + self.max_radius);
        self.visit_candidates(&search, |entry| {
            if spheres_intersect(center, radius, entry.center, entry.radius) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// Ids of spheres whose own bounding box intersects `bbox`, ascending
    pub fn query_box(&self, bbox: &BoundingBox) -> Vec<usize> {
        let mut ids = Vec::new();
        let search = bbox.expanded(self.max_radius);
        let _ = self.visit_candidates(&search, |entry| {
            if BoundingBox::around_sphere(entry.center, entry.radius).intersects(bbox) {
                ids.push(entry.id);
            }
            ControlFlow::Continue(())
        });
        ids.sort_unstable();
        ids
    }

    /// `(id, distance)` of every center within `max_distance` of `point`, by ascending id.
    ///
    /// Only centers count here; radii are ignored.
    pub fn within_distance(&self, point: DVec3, max_distance: f64) -> Vec<(usize, f64)> {
        let mut hits = Vec::new();
        let search = BoundingBox::around_sphere(point, max_distance);
        let _ = self.visit_candidates(&search, |entry| {
            let distance = entry.center.distance(point);
            if distance <= max_distance {
                hits.push((entry.id, distance));
            }
            ControlFlow::Continue(())
        });
        hits.sort_unstable_by_key(|&(id, _)| id);
        hits
    }

    /// Closest center within `max_distance` of `point` (lowest id on ties)
    pub fn nearest_within(&self, point: DVec3, max_distance: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        let search = BoundingBox::around_sphere(point, max_distance);
        let _ = self.visit_candidates(&search, |entry| {
            let distance = entry.center.distance(point);
            if distance <= max_distance {
                let better = match best {
                    None => true,
                    Some((best_id, best_distance)) => {
                        distance < best_distance || (distance == best_distance && entry.id < best_id)
                    }
                };
                if better {
                    best = Some((entry.id, distance));
                }
            }
            ControlFlow::Continue(())
        });
        best
    }

    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            total_entries: self.entries.len(),
            occupied_cells: self.occupied.len(),
            max_radius: self.max_radius,
            cell_size: self.cell_size,
        }
    }

    #[inline]
    fn cell_coordinates(&self, p: DVec3) -> (u32, u32, u32) {
        let discretize = |v: f64| bias_cell_coordinate((v / self.cell_size).floor() as i64);
        (discretize(p.x), discretize(p.y), discretize(p.z))
    }

    #[inline]
    fn cell_code(&self, p: DVec3) -> u64 {
        let (x, y, z) = self.cell_coordinates(p);
        morton_encode_3d(x, y, z)
    }

    /// Visit every entry whose center cell lies in the cells covered by `bbox`.
    ///
    /// Stops early when `visit` breaks.
    fn visit_candidates<F>(&self, bbox: &BoundingBox, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&Entry) -> ControlFlow<()>,
    {
        if self.is_empty() {
            return ControlFlow::Continue(());
        }

        let range = CellRange {
            min: self.cell_coordinates(bbox.min),
            max: self.cell_coordinates(bbox.max),
        };
        if range.is_empty() {
            return ControlFlow::Continue(());
        }

        let mut visit_cell = |code: u64| -> ControlFlow<()> {
            if let Some(slots) = self.cells.get(&code) {
                for &slot in slots {
                    visit(&self.entries[slot as usize])?;
                }
            }
            ControlFlow::Continue(())
        };

        if range.n_cells() <= self.occupied.len() {
            for z in range.min.2..=range.max.2 {
                for y in range.min.1..=range.max.1 {
                    for x in range.min.0..=range.max.0 {
                        visit_cell(morton_encode_3d(x, y, z))?;
                    }
                }
            }
        } else {
            for code in self.occupied.iter() {
                if range.contains(morton_decode_3d(code)) {
                    visit_cell(code)?;
                }
            }
        }

        ControlFlow::Continue(())
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

/// Statistics about the spatial index
#[derive(Debug, Clone, Serialize)]
pub struct SpatialIndexStats {
    pub total_entries: usize,
    pub occupied_cells: u64,
    pub max_radius: f64,
    pub cell_size: f64,
}
