// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Truncated normal distribution used to draw per-cell target counts.
*/

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use crate::types::{BuildingError, BuildingResult};

/// Rejection attempts before falling back to clamping a single draw
const MAX_REJECTION_ATTEMPTS: usize = 1000;

/// Normal distribution `N(mean, std)` restricted to `[low, high]`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TruncatedNormal {
    mean: f64,
    std: f64,
    low: f64,
    high: f64,
    #[serde(skip)]
    normal: Normal<f64>,
}

impl TruncatedNormal {
    pub fn new(mean: f64, std: f64, low: f64, high: f64) -> BuildingResult<Self> {
        if ![mean, std, low, high].iter().all(|v| v.is_finite()) {
            return Err(BuildingError::InvalidDistribution(format!(
                "parameters must be finite, got mean={} std={} low={} high={}",
                mean, std, low, high
            )));
        }
        if std < 0.0 {
            return Err(BuildingError::InvalidDistribution(format!(
                "standard deviation must be non-negative, got {}",
                std
            )));
        }
        if low > high {
            return Err(BuildingError::InvalidDistribution(format!(
                "lower bound {} exceeds upper bound {}",
                low, high
            )));
        }
        let normal = Normal::new(mean, std)
            .map_err(|e| BuildingError::InvalidDistribution(e.to_string()))?;

        Ok(Self {
            mean,
            std,
            low,
            high,
            normal,
        })
    }

    /// Build from the `[mean, std, low, high]` layout used in configuration files
    pub fn from_parameters(parameters: [f64; 4]) -> BuildingResult<Self> {
        let [mean, std, low, high] = parameters;
        Self::new(mean, std, low, high)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// One draw inside `[low, high]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.std == 0.0 {
            return self.mean.clamp(self.low, self.high);
        }
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let value = self.normal.sample(rng);
            if (self.low..=self.high).contains(&value) {
                return value;
            }
        }
        // Bounds far in the tail
        self.normal.sample(rng).clamp(self.low, self.high)
    }

    /// `n` draws rounded to non-negative integer counts
    pub fn sample_counts<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        (0..n).map(|_| round_count(self.sample(rng))).collect()
    }
}

impl PartialEq for TruncatedNormal {
    fn eq(&self, other: &Self) -> bool {
        (self.mean, self.std, self.low, self.high) == (other.mean, other.std, other.low, other.high)
    }
}

/// Round half to even, then clamp negatives to zero
#[inline]
pub fn round_count(value: f64) -> usize {
    let rounded = value.round_ties_even();
    if rounded > 0.0 {
        rounded as usize
    } else {
        0
    }
}
