// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Reachout strategies: which candidate targets a cell connects to when it has more
candidates than its quota.

The connectivity generators take any [`ReachoutStrategy`]. Plain closures with the
signature `Fn(centroid, candidates, quota) -> ids` qualify, and
[`ReachoutStrategyKind`] provides the named built-ins selectable from configuration.
*/

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use ngv_config::NgvConfig;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::types::{BuildingError, TargetId};

/// A target that passed the containment filter of one domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetCandidate {
    /// Row of the target in its population
    pub id: TargetId,
    pub position: DVec3,
    pub radius: f64,
}

/// Selection policy for over-quota candidate sets.
///
/// `select` must return `quota` distinct ids taken from `candidates`. It is only
/// called with `candidates.len() > quota`. `rng` is a stream private to the cell
/// being processed.
pub trait ReachoutStrategy: Sync {
    fn select(
        &self,
        centroid: DVec3,
        candidates: &[TargetCandidate],
        quota: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<TargetId>;
}

impl<F> ReachoutStrategy for F
where
    F: Fn(DVec3, &[TargetCandidate], usize) -> Vec<TargetId> + Sync,
{
    fn select(
        &self,
        centroid: DVec3,
        candidates: &[TargetCandidate],
        quota: usize,
        _rng: &mut dyn RngCore,
    ) -> Vec<TargetId> {
        self(centroid, candidates, quota)
    }
}

/// Built-in reachout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReachoutStrategyKind {
    /// Spread selections out: start nearest the centroid, then repeatedly take the
    /// candidate farthest from everything already taken
    #[default]
    MaximumReachout,
    Closest,
    Farthest,
    Random,
}

impl ReachoutStrategyKind {
    pub const ALL: [ReachoutStrategyKind; 4] = [
        ReachoutStrategyKind::MaximumReachout,
        ReachoutStrategyKind::Closest,
        ReachoutStrategyKind::Farthest,
        ReachoutStrategyKind::Random,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReachoutStrategyKind::MaximumReachout => "maximum_reachout",
            ReachoutStrategyKind::Closest => "closest",
            ReachoutStrategyKind::Farthest => "farthest",
            ReachoutStrategyKind::Random => "random",
        }
    }
}

impl fmt::Display for ReachoutStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReachoutStrategyKind {
    type Err = BuildingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BuildingError::UnknownReachoutStrategy(s.to_string()))
    }
}

impl TryFrom<&NgvConfig> for ReachoutStrategyKind {
    type Error = BuildingError;

    fn try_from(config: &NgvConfig) -> Result<Self, Self::Error> {
        config.gliovascular_connectivity.reachout_strategy.parse()
    }
}

impl ReachoutStrategy for ReachoutStrategyKind {
    fn select(
        &self,
        centroid: DVec3,
        candidates: &[TargetCandidate],
        quota: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<TargetId> {
        if quota >= candidates.len() {
            return candidates.iter().map(|c| c.id).collect();
        }
        match self {
            ReachoutStrategyKind::Closest => by_distance(centroid, candidates, quota, false),
            ReachoutStrategyKind::Farthest => by_distance(centroid, candidates, quota, true),
            ReachoutStrategyKind::Random => {
                rand::seq::index::sample(rng, candidates.len(), quota)
                    .into_iter()
                    .map(|i| candidates[i].id)
                    .collect()
            }
            ReachoutStrategyKind::MaximumReachout => maximum_reachout(centroid, candidates, quota),
        }
    }
}

/// `quota` candidates ordered by distance to `centroid`, ties by id
fn by_distance(centroid: DVec3, candidates: &[TargetCandidate], quota: usize, farthest: bool) -> Vec<TargetId> {
    let mut ranked: Vec<(f64, TargetId)> = candidates
        .iter()
        .map(|c| (c.position.distance_squared(centroid), c.id))
        .collect();
    ranked.sort_by(|a, b| {
        let by_distance = if farthest { b.0.total_cmp(&a.0) } else { a.0.total_cmp(&b.0) };
        by_distance.then(a.1.cmp(&b.1))
    });
    ranked.truncate(quota);
    ranked.into_iter().map(|(_, id)| id).collect()
}

/// Greedy farthest-point selection seeded with the candidate closest to `centroid`
fn maximum_reachout(centroid: DVec3, candidates: &[TargetCandidate], quota: usize) -> Vec<TargetId> {
    if quota == 0 {
        return Vec::new();
    }

    let first = candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.position
                .distance_squared(centroid)
                .total_cmp(&b.position.distance_squared(centroid))
                .then(a.id.cmp(&b.id))
        })
        .map(|(i, _)| i)
        .unwrap_or_default();

    // Squared distance of each candidate to the selected set
    let mut gap: Vec<f64> = candidates
        .iter()
        .map(|c| c.position.distance_squared(candidates[first].position))
        .collect();
    let mut taken = vec![false; candidates.len()];
    taken[first] = true;
    let mut selected = Vec::with_capacity(quota);
    selected.push(candidates[first].id);

    while selected.len() < quota {
        let mut next: Option<usize> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            if taken[i] {
                continue;
            }
            next = match next {
                Some(j) if gap[j] > gap[i] || (gap[j] == gap[i] && candidates[j].id < candidate.id) => Some(j),
                _ => Some(i),
            };
        }
        let Some(next) = next else { break };

        taken[next] = true;
        selected.push(candidates[next].id);
        let anchor = candidates[next].position;
        for (i, candidate) in candidates.iter().enumerate() {
            gap[i] = gap[i].min(candidate.position.distance_squared(anchor));
        }
    }

    selected
}
