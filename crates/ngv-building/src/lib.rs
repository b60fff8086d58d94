/*!
# NGV Building

Spatial cell placement, geometric collision and domain-to-target connectivity
for neuro-glia-vascular circuit building:
- Geometry primitives and sphere/convex-polytope collision predicates
- An incremental grid spatial index and the append-only sphere pattern built on it
- Best-candidate sphere placement inside convex domains
- Gliovascular and neuroglial connectivity with pluggable reachout strategies
- Grouping of labelled vertices and vertex-to-triangle consensus

## Architecture

- `geometry`: linear algebra, bounding boxes, convex domains, collision
- `spatial`: Morton-coded uniform grid index with dynamic insertion
- `cell_placement`: `SpherePattern` and `place_spheres`
- `statistics`: truncated normal sampling of per-cell counts
- `connectivity`: `domains_to_vasculature`, `astrocyte_neuroglial_connectivity`
- `grouping`: `group_elements`, `vertex_to_triangle_groups`

## Determinism

All randomness comes from seeded ChaCha generators. The per-cell connectivity
loops run on rayon when the `parallel` feature is enabled and produce the same
output as the sequential build.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

pub mod cell_placement;
pub mod connectivity;
pub mod geometry;
pub mod grouping;
mod rng;
pub mod spatial;
pub mod statistics;
pub mod types;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cell_placement::{place_spheres, PlacementParams, SpherePattern};

pub use connectivity::{
    astrocyte_neuroglial_connectivity, domains_to_vasculature, spheres_inside_domain,
    GliovascularParams, NeuroglialEdge, NeuroglialParams, ReachoutStrategy, ReachoutStrategyKind,
    TargetCandidate, TargetPopulation,
};

pub use geometry::{
    convex_shape_with_spheres, sphere_inside_convex_shape, spheres_intersect, BoundingBox,
    ConvexDomain, Microdomain,
};

pub use grouping::{group_elements, vertex_to_triangle_groups, GroupedElements, UNASSIGNED_GROUP};

pub use spatial::{SpatialIndex, SpatialIndexStats, DEFAULT_CELL_SIZE};

pub use statistics::TruncatedNormal;

pub use types::{BuildingError, BuildingResult, CellId, Edge, TargetId};

pub use rng::{cell_rng, seeded_rng};

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_pipeline_smoke() {
        // Place somata, then connect their box domains to a regular target lattice
        let region = Microdomain::from_box(DVec3::ZERO, DVec3::splat(40.0));
        let mut rng = seeded_rng(0);
        let pattern = place_spheres(&region, 8, |_| 2.0, &PlacementParams::default(), &mut rng);
        assert_eq!(pattern.len(), 8);

        let domains: Vec<Microdomain> = pattern
            .coordinates()
            .iter()
            .map(|c| Microdomain::from_box(*c - DVec3::splat(6.0), *c + DVec3::splat(6.0)))
            .collect();
        let lattice: Vec<DVec3> = (0..9)
            .flat_map(|x| (0..9).flat_map(move |y| (0..9).map(move |z| DVec3::new(x as f64, y as f64, z as f64) * 5.0)))
            .collect();
        let targets = TargetPopulation::from_points(lattice);
        let params = GliovascularParams::new(TruncatedNormal::new(3.0, 1.0, 1.0, 5.0).unwrap(), 0);
        let cell_ids: Vec<CellId> = (0..domains.len()).collect();

        let edges = domains_to_vasculature(&cell_ids, &ReachoutStrategyKind::MaximumReachout, &targets, &domains, &params);
        assert!(!edges.is_empty());
        assert!(edges.iter().all(|(cell, target)| domains[*cell].contains_sphere(targets.positions()[*target], 0.0)));
    }
}
