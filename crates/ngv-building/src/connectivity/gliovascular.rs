// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Gliovascular connectivity: astrocyte endfeet reaching the vasculature.

For every cell a target count is drawn from the endfeet distribution. The
vasculature points inside the cell's microdomain are its candidates; when there
are more candidates than the count, the injected [`ReachoutStrategy`] picks which
ones the cell reaches.

Counts are drawn in cell order from one seeded generator, and each cell's
strategy gets its own stream of the same seed, so the edge list is identical
whether the per-cell loop runs on one thread or many.
*/

use glam::DVec3;
use ngv_config::NgvConfig;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::neuroglial::spheres_with_radii_inside_domain;
use super::reachout::{ReachoutStrategy, TargetCandidate};
use crate::geometry::ConvexDomain;
use crate::rng::{cell_rng, seeded_rng};
use crate::spatial::{SpatialIndex, DEFAULT_CELL_SIZE};
use crate::statistics::TruncatedNormal;
use crate::types::{BuildingError, BuildingResult, CellId, Edge};

/// Target points (e.g. vasculature surface samples) with their radii
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPopulation {
    positions: Vec<DVec3>,
    radii: Vec<f64>,
}

impl TargetPopulation {
    pub fn new(positions: Vec<DVec3>, radii: Vec<f64>) -> Self {
        assert_eq!(
            positions.len(),
            radii.len(),
            "target population has {} positions but {} radii",
            positions.len(),
            radii.len()
        );
        Self { positions, radii }
    }

    /// Point-like targets
    pub fn from_points(positions: Vec<DVec3>) -> Self {
        let radii = vec![0.0; positions.len()];
        Self { positions, radii }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn candidate(&self, id: usize) -> TargetCandidate {
        TargetCandidate {
            id,
            position: self.positions[id],
            radius: self.radii[id],
        }
    }
}

/// Parameters of [`domains_to_vasculature`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GliovascularParams {
    /// Distribution of the number of endfeet per cell
    pub endfeet_distribution: TruncatedNormal,
    pub seed: u64,
    /// Grid cell size of the target index
    pub cell_size: f64,
}

impl GliovascularParams {
    pub fn new(endfeet_distribution: TruncatedNormal, seed: u64) -> Self {
        Self {
            endfeet_distribution,
            seed,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl TryFrom<&NgvConfig> for GliovascularParams {
    type Error = BuildingError;

    fn try_from(config: &NgvConfig) -> BuildingResult<Self> {
        let cell_size = config.spatial_index.cell_size;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(BuildingError::InvalidParameter(format!(
                "cell_size must be finite and positive, got {}",
                cell_size
            )));
        }
        Ok(Self {
            endfeet_distribution: TruncatedNormal::from_parameters(
                config.gliovascular_connectivity.endfeet_distribution,
            )?,
            seed: config.system.seed,
            cell_size,
        })
    }
}

/// Connect cells to the targets inside their microdomains.
///
/// `domains` is indexed by cell id. Returns `(cell_id, target_id)` edges grouped
/// by cell in `cell_ids` order.
pub fn domains_to_vasculature<S, D>(
    cell_ids: &[CellId],
    strategy: &S,
    targets: &TargetPopulation,
    domains: &[D],
    params: &GliovascularParams,
) -> Vec<Edge>
where
    S: ReachoutStrategy + ?Sized,
    D: ConvexDomain + Sync,
{
    let index = SpatialIndex::from_points(targets.positions(), targets.radii(), params.cell_size);
    let counts = params
        .endfeet_distribution
        .sample_counts(cell_ids.len(), &mut seeded_rng(params.seed));

    let connect = |(&cell_id, &quota): (&CellId, &usize)| -> Vec<Edge> {
        if quota == 0 {
            return Vec::new();
        }
        assert!(
            cell_id < domains.len(),
            "cell {} has no microdomain ({} domains)",
            cell_id,
            domains.len()
        );
        let domain = &domains[cell_id];

        let inside =
            spheres_with_radii_inside_domain(&index, targets.positions(), targets.radii(), domain);
        let selected = if inside.len() <= quota {
            inside
        } else {
            let candidates: Vec<TargetCandidate> =
                inside.iter().map(|&id| targets.candidate(id)).collect();
            let mut rng = cell_rng(params.seed, cell_id);
            let chosen = strategy.select(domain.centroid(), &candidates, quota, &mut rng);
            debug_assert_eq!(chosen.len(), quota, "reachout strategy returned a wrong count");
            chosen
        };

        debug!(target: "ngv-building", "Cell {} reaches {} of its targets (quota {})",
            cell_id, selected.len(), quota);
        selected.into_iter().map(|target| (cell_id, target)).collect()
    };

    #[cfg(feature = "parallel")]
    let per_cell: Vec<Vec<Edge>> = cell_ids.par_iter().zip(counts.par_iter()).map(connect).collect();

    #[cfg(not(feature = "parallel"))]
    let per_cell: Vec<Vec<Edge>> = cell_ids.iter().zip(counts.iter()).map(connect).collect();

    let edges: Vec<Edge> = per_cell.into_iter().flatten().collect();
    info!(target: "ngv-building",
        "Gliovascular connectivity: {} cells, {} targets, {} edges",
        cell_ids.len(), targets.len(), edges.len());
    edges
}
