// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Sequential best-candidate placement of non-overlapping spheres in a convex domain.

Each new sphere draws candidate centers uniformly inside the domain, discards the
ones that would overlap an accepted sphere and keeps the candidate farthest from
its nearest accepted neighbor. Every acceptance depends on all previous ones, so
this loop never runs in parallel.
*/

use glam::DVec3;
use ngv_config::NgvConfig;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::pattern::SpherePattern;
use crate::geometry::ConvexDomain;
use crate::spatial::DEFAULT_CELL_SIZE;
use crate::types::{BuildingError, BuildingResult};

/// Knobs of the placement loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementParams {
    /// Candidate draws allowed per sphere before giving up
    pub max_trials: usize,
    /// Non-overlapping candidates compared per sphere (1 = plain rejection sampling)
    pub candidates_per_sphere: usize,
    /// Extra clearance required between sphere surfaces
    pub minimum_gap: f64,
    /// Grid cell size of the pattern's spatial index
    pub cell_size: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            max_trials: 1000,
            candidates_per_sphere: 1,
            minimum_gap: 0.0,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl PlacementParams {
    pub fn validate(&self) -> BuildingResult<()> {
        if self.max_trials == 0 {
            return Err(BuildingError::InvalidParameter(
                "max_trials must be at least 1".to_string(),
            ));
        }
        if self.candidates_per_sphere == 0 {
            return Err(BuildingError::InvalidParameter(
                "candidates_per_sphere must be at least 1".to_string(),
            ));
        }
        if !self.minimum_gap.is_finite() || self.minimum_gap < 0.0 {
            return Err(BuildingError::InvalidParameter(format!(
                "minimum_gap must be finite and non-negative, got {}",
                self.minimum_gap
            )));
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(BuildingError::InvalidParameter(format!(
                "cell_size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

impl TryFrom<&NgvConfig> for PlacementParams {
    type Error = BuildingError;

    fn try_from(config: &NgvConfig) -> BuildingResult<Self> {
        let params = Self {
            max_trials: config.cell_placement.max_trials,
            candidates_per_sphere: config.cell_placement.candidates_per_sphere,
            minimum_gap: config.cell_placement.minimum_gap,
            cell_size: config.spatial_index.cell_size,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Uniform point of the domain's bounding box, kept only if it lies in the domain
fn sample_point_in_domain<D, R>(domain: &D, rng: &mut R) -> Option<DVec3>
where
    D: ConvexDomain + ?Sized,
    R: Rng + ?Sized,
{
    let bbox = domain.bounding_box();
    let point = bbox.min + bbox.extent() * DVec3::new(rng.gen(), rng.gen(), rng.gen());
    domain.contains_sphere(point, 0.0).then_some(point)
}

/// Place up to `count` spheres with centers inside `domain`.
///
/// `radius_sampler` is called once per sphere. If no valid center is found for a
/// sphere within `max_trials` draws, placement stops and the pattern holds the
/// spheres placed so far.
pub fn place_spheres<D, S, R>(
    domain: &D,
    count: usize,
    mut radius_sampler: S,
    params: &PlacementParams,
    rng: &mut R,
) -> SpherePattern
where
    D: ConvexDomain + ?Sized,
    S: FnMut(&mut R) -> f64,
    R: Rng + ?Sized,
{
    assert!(
        params.max_trials > 0 && params.candidates_per_sphere > 0,
        "placement needs at least one trial and one candidate per sphere"
    );

    let mut pattern = SpherePattern::with_cell_size(count, params.cell_size);
    let search_radius = domain.bounding_box().extent().length();

    for sphere in 0..count {
        let radius = radius_sampler(rng);
        let mut best: Option<(DVec3, f64)> = None;
        let mut accepted = 0;
        let mut trials = 0;

        while accepted < params.candidates_per_sphere && trials < params.max_trials {
            trials += 1;
            let Some(candidate) = sample_point_in_domain(domain, rng) else {
                continue;
            };
            if pattern.is_intersecting(candidate, radius + params.minimum_gap) {
                continue;
            }
            accepted += 1;

            let clearance = pattern.distance_to_nearest_neighbor(candidate, search_radius);
            if best.map_or(true, |(_, best_clearance)| clearance > best_clearance) {
                best = Some((candidate, clearance));
            }
        }

        match best {
            Some((center, _)) => {
                debug!(target: "ngv-building", "Placed sphere {} after {} trials", sphere, trials);
                pattern.add(center, radius);
            }
            None => {
                warn!(target: "ngv-building",
                    "No free position for sphere {} after {} trials, stopping at {} of {} spheres",
                    sphere, trials, pattern.len(), count);
                break;
            }
        }
    }

    info!(target: "ngv-building", "✅ Cell placement complete: {} of {} spheres placed", pattern.len(), count);
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Microdomain;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params() -> PlacementParams {
        PlacementParams {
            max_trials: 500,
            candidates_per_sphere: 3,
            minimum_gap: 0.0,
            cell_size: 2.0,
        }
    }

    #[test]
    fn test_placed_spheres_do_not_overlap() {
        let domain = Microdomain::from_box(DVec3::ZERO, DVec3::splat(20.0));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let pattern = place_spheres(&domain, 50, |_| 1.0, &params(), &mut rng);

        assert_eq!(pattern.len(), 50);
        for i in 0..pattern.len() {
            let (ci, ri) = pattern.get(i);
            assert!(domain.contains_sphere(ci, 0.0));
            for j in (i + 1)..pattern.len() {
                let (cj, rj) = pattern.get(j);
                assert!(ci.distance(cj) > ri + rj, "spheres {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn test_crowded_domain_stops_early() {
        let domain = Microdomain::from_box(DVec3::ZERO, DVec3::splat(2.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pattern = place_spheres(&domain, 10, |_| 1.5, &params(), &mut rng);

        // At most two centers of the box can be more than 3.0 apart
        assert!(pattern.len() <= 2);
        assert!(pattern.len() >= 1);
        assert_eq!(pattern.capacity(), 10);
    }

    #[test]
    fn test_placement_is_reproducible() {
        let domain = Microdomain::from_box(DVec3::splat(-5.0), DVec3::splat(5.0));
        let place = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            place_spheres(&domain, 20, |rng: &mut ChaCha8Rng| rng.gen_range(0.2..0.6), &params(), &mut rng)
        };
        assert_eq!(place(9).coordinates(), place(9).coordinates());
        assert_ne!(place(9).coordinates(), place(10).coordinates());
    }

    #[test]
    fn test_minimum_gap_is_respected() {
        let domain = Microdomain::from_box(DVec3::ZERO, DVec3::splat(30.0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let gap_params = PlacementParams {
            minimum_gap: 1.0,
            ..params()
        };
        let pattern = place_spheres(&domain, 30, |_| 1.0, &gap_params, &mut rng);
        for i in 0..pattern.len() {
            for j in (i + 1)..pattern.len() {
                assert!(pattern.coordinates()[i].distance(pattern.coordinates()[j]) > 3.0);
            }
        }
    }

    #[test]
    fn test_params_from_config() {
        let mut config = NgvConfig::default();
        config.cell_placement.candidates_per_sphere = 4;
        config.spatial_index.cell_size = 5.0;
        let params = PlacementParams::try_from(&config).unwrap();
        assert_eq!(params.candidates_per_sphere, 4);
        assert_eq!(params.cell_size, 5.0);

        config.cell_placement.max_trials = 0;
        assert!(matches!(
            PlacementParams::try_from(&config),
            Err(BuildingError::InvalidParameter(_))
        ));
    }
}
