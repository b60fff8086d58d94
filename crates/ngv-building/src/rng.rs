// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Seeded random number generation.

Every stochastic step draws from a `ChaCha8Rng` derived from the configured seed so
that runs are reproducible. Per-cell work gets its own stream of the same seed,
which keeps results independent of iteration order and thread count.
*/

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator for the sequential parts of a run
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator dedicated to one cell; streams never overlap between cells
pub fn cell_rng(seed: u64, cell_id: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(cell_id as u64 + 1);
    rng
}
