// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Neuroglial connectivity: which synapses fall inside each astrocyte's microdomain.

The box-query-then-exact-containment filter defined here is also the candidate
filter of the gliovascular generator.
*/

use glam::DVec3;
use ngv_config::NgvConfig;
use serde::Serialize;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::geometry::collision::sphere_inside_convex_shape;
use crate::geometry::ConvexDomain;
use crate::spatial::{SpatialIndex, DEFAULT_CELL_SIZE};
use crate::types::{BuildingError, BuildingResult, CellId};

/// One astrocyte-synapse contact and the neuron owning the synapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NeuroglialEdge {
    pub astrocyte: CellId,
    pub synapse: usize,
    pub neuron: usize,
}

/// Parameters of [`astrocyte_neuroglial_connectivity`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeuroglialParams {
    /// When false no edges are generated
    pub enabled: bool,
    /// Grid cell size of the synapse index
    pub cell_size: f64,
}

impl Default for NeuroglialParams {
    fn default() -> Self {
        Self {
            enabled: true,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl TryFrom<&NgvConfig> for NeuroglialParams {
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
            enabled: config.neuroglial_connectivity.enabled,
            cell_size,
        })
    }
}

/// Box query on `index`, then the exact face test on each hit
fn filter_inside_domain<D, F>(index: &SpatialIndex, domain: &D, sphere: F) -> Vec<usize>
where
    D: ConvexDomain + ?Sized,
    F: Fn(usize) -> (DVec3, f64),
{
    let face_points = domain.face_points();
    let face_normals = domain.face_normals();
    let mut ids = index.query_box(&domain.bounding_box());
    ids.retain(|&id| {
        let (center, radius) = sphere(id);
        sphere_inside_convex_shape(face_points, face_normals, center, radius)
    });
    ids
}

/// Ids of indexed spheres entirely inside `domain`, ascending.
///
/// `coordinates` and `radii` are indexed by the ids stored in `index`.
pub fn spheres_with_radii_inside_domain<D>(
    index: &SpatialIndex,
    coordinates: &[DVec3],
    radii: &[f64],
    domain: &D,
) -> Vec<usize>
where
    D: ConvexDomain + ?Sized,
{
    filter_inside_domain(index, domain, |id| (coordinates[id], radii[id]))
}

/// Ids of indexed points inside `domain` (zero radius), ascending
pub fn spheres_inside_domain<D>(index: &SpatialIndex, coordinates: &[DVec3], domain: &D) -> Vec<usize>
where
    D: ConvexDomain + ?Sized,
{
    filter_inside_domain(index, domain, |id| (coordinates[id], 0.0))
}

/// Connect each astrocyte to the synapses inside its microdomain.
///
/// `domains` is indexed by astrocyte id. Edges come in astrocyte order, then by
/// ascending synapse id.
pub fn astrocyte_neuroglial_connectivity<D>(
    astrocyte_ids: &[CellId],
    domains: &[D],
    synapse_positions: &[DVec3],
    synapse_to_neuron: &[usize],
    params: &NeuroglialParams,
) -> Vec<NeuroglialEdge>
where
    D: ConvexDomain + Sync,
{
    assert_eq!(
        synapse_positions.len(),
        synapse_to_neuron.len(),
        "{} synapse positions but {} synapse-to-neuron entries",
        synapse_positions.len(),
        synapse_to_neuron.len()
    );

    if !params.enabled {
        info!(target: "ngv-building", "Neuroglial connectivity disabled, skipping {} astrocytes", astrocyte_ids.len());
        return Vec::new();
    }

    let mut index = SpatialIndex::with_capacity(params.cell_size, synapse_positions.len());
    for (id, position) in synapse_positions.iter().enumerate() {
        index.insert(id, *position, 0.0);
    }

    let connect = |&astrocyte: &CellId| -> Vec<NeuroglialEdge> {
        assert!(
            astrocyte < domains.len(),
            "astrocyte {} has no microdomain ({} domains)",
            astrocyte,
            domains.len()
        );
        let synapses = spheres_inside_domain(&index, synapse_positions, &domains[astrocyte]);
        debug!(target: "ngv-building", "Astrocyte {} covers {} synapses", astrocyte, synapses.len());
        synapses
            .into_iter()
            .map(|synapse| NeuroglialEdge {
                astrocyte,
                synapse,
                neuron: synapse_to_neuron[synapse],
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let per_cell: Vec<Vec<NeuroglialEdge>> = astrocyte_ids.par_iter().map(connect).collect();

    #[cfg(not(feature = "parallel"))]
    let per_cell: Vec<Vec<NeuroglialEdge>> = astrocyte_ids.iter().map(connect).collect();

    let edges: Vec<NeuroglialEdge> = per_cell.into_iter().flatten().collect();
    info!(target: "ngv-building",
        "Neuroglial connectivity: {} astrocytes, {} synapses, {} edges",
        astrocyte_ids.len(), synapse_positions.len(), edges.len());
    edges
}
