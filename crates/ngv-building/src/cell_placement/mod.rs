// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Cell placement: the incremental sphere pattern and the sampler that fills it.
*/

pub mod pattern;
pub mod placement;

pub use pattern::SpherePattern;
pub use placement::{place_spheres, PlacementParams};
