// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Domain-to-target connectivity.

- `gliovascular`: cells to vasculature targets, quota-limited by a reachout strategy
- `neuroglial`: astrocytes to the synapses inside their microdomains
- `reachout`: selection policies for over-quota candidate sets
*/

pub mod gliovascular;
pub mod neuroglial;
pub mod reachout;

pub use gliovascular::{domains_to_vasculature, GliovascularParams, TargetPopulation};
pub use neuroglial::{
    astrocyte_neuroglial_connectivity, spheres_inside_domain, spheres_with_radii_inside_domain,
    NeuroglialEdge, NeuroglialParams,
};
pub use reachout::{ReachoutStrategy, ReachoutStrategyKind, TargetCandidate};
