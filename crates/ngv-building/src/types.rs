// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for building operations.
*/

/// Index of a cell (astrocyte) in its population
pub type CellId = usize;

/// Row index of a target (vasculature point, synapse) in its population
pub type TargetId = usize;

/// One `(cell, target)` connectivity edge
pub type Edge = (CellId, TargetId);

/// Result type for building operations
pub type BuildingResult<T> = Result<T, BuildingError>;

/// Recoverable errors raised while turning configuration into building parameters.
///
/// Caller misuse (capacity overflow, out-of-range ids, mismatched arrays) is not
/// represented here; those are precondition violations and panic.
#[derive(Debug, thiserror::Error)]
pub enum BuildingError {
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("Unknown reachout strategy: {0}")]
    UnknownReachoutStrategy(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ngv_config::ConfigError> for BuildingError {
    fn from(err: ngv_config::ConfigError) -> Self {
        BuildingError::Config(err.to_string())
    }
}
