// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `ngv_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reachout strategy names understood by the connectivity generator
pub const KNOWN_REACHOUT_STRATEGIES: &[&str] = &["maximum_reachout", "closest", "farthest", "random"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NgvConfig {
    pub system: SystemConfig,
    pub spatial_index: SpatialIndexConfig,
    pub cell_placement: CellPlacementConfig,
    pub gliovascular_connectivity: GliovascularConnectivityConfig,
    pub neuroglial_connectivity: NeuroglialConnectivityConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Pseudo-random generator seed shared by every stochastic step
    pub seed: u64,
    pub log_level: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            log_level: "info".to_string(),
        }
    }
}

/// Uniform grid spatial index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpatialIndexConfig {
    /// Edge length of a grid cell, in the same unit as the coordinates (um)
    pub cell_size: f64,
}

impl Default for SpatialIndexConfig {
    fn default() -> Self {
        Self { cell_size: 10.0 }
    }
}

/// Sphere placement configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CellPlacementConfig {
    /// Rejected candidates tolerated per sphere before placement stops
    pub max_trials: usize,
    /// Candidates drawn per sphere; the one farthest from its neighbors wins
    pub candidates_per_sphere: usize,
    /// Extra clearance added to every radius during the overlap test
    pub minimum_gap: f64,
}

impl Default for CellPlacementConfig {
    fn default() -> Self {
        Self {
            max_trials: 1000,
            candidates_per_sphere: 1,
            minimum_gap: 0.0,
        }
    }
}

/// Astrocyte to vasculature connectivity configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GliovascularConnectivityConfig {
    /// Truncated normal parameters: [mean, std, min, max]
    pub endfeet_distribution: [f64; 4],
    pub reachout_strategy: String,
}

impl Default for GliovascularConnectivityConfig {
    fn default() -> Self {
        Self {
            endfeet_distribution: [2.0, 2.0, 0.0, 15.0],
            reachout_strategy: "maximum_reachout".to_string(),
        }
    }
}

/// Astrocyte to synapse connectivity configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuroglialConnectivityConfig {
    pub enabled: bool,
}

impl Default for NeuroglialConnectivityConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
            file_logging: false,
        }
    }
}
