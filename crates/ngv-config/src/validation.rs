// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent and within valid ranges before they reach the building pipeline.

use crate::{ConfigError, ConfigResult, NgvConfig, KNOWN_REACHOUT_STRATEGIES};

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    InvalidRange { field: String, value: f64, reason: String },
    UnknownName { field: String, value: String, known: Vec<String> },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { field, value, reason } => {
                write!(f, "{} = {} is out of range: {}", field, value, reason)
            }
            Self::UnknownName { field, value, known } => {
                write!(
                    f,
                    "{} = '{}' is unknown (expected one of: {})",
                    field,
                    value,
                    known.join(", ")
                )
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Spatial index cell size (finite, positive)
/// - Placement trial counts
/// - Endfeet distribution parameters
/// - Known reachout strategy and log level names
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &NgvConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_spatial_index(config, &mut errors);
    validate_cell_placement(config, &mut errors);
    validate_gliovascular(config, &mut errors);
    validate_system(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_spatial_index(config: &NgvConfig, errors: &mut Vec<ConfigValidationError>) {
    let cell_size = config.spatial_index.cell_size;
    if !cell_size.is_finite() || cell_size <= 0.0 {
        errors.push(ConfigValidationError::InvalidRange {
            field: "spatial_index.cell_size".to_string(),
            value: cell_size,
            reason: "must be a finite positive number".to_string(),
        });
    }
}

fn validate_cell_placement(config: &NgvConfig, errors: &mut Vec<ConfigValidationError>) {
    let placement = &config.cell_placement;
    if placement.max_trials == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "cell_placement.max_trials".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if placement.candidates_per_sphere == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "cell_placement.candidates_per_sphere".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if !placement.minimum_gap.is_finite() || placement.minimum_gap < 0.0 {
        errors.push(ConfigValidationError::InvalidRange {
            field: "cell_placement.minimum_gap".to_string(),
            value: placement.minimum_gap,
            reason: "must be finite and non-negative".to_string(),
        });
    }
}

fn validate_gliovascular(config: &NgvConfig, errors: &mut Vec<ConfigValidationError>) {
    let gv = &config.gliovascular_connectivity;
    let [_, std, low, high] = gv.endfeet_distribution;

    if gv.endfeet_distribution.iter().any(|v| !v.is_finite()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "gliovascular_connectivity.endfeet_distribution".to_string(),
            reason: "all of [mean, std, min, max] must be finite".to_string(),
        });
    } else {
        if std < 0.0 {
            errors.push(ConfigValidationError::InvalidRange {
                field: "gliovascular_connectivity.endfeet_distribution[1]".to_string(),
                value: std,
                reason: "standard deviation must be non-negative".to_string(),
            });
        }
        if low > high {
            errors.push(ConfigValidationError::InvalidValue {
                field: "gliovascular_connectivity.endfeet_distribution".to_string(),
                reason: format!("min ({}) is greater than max ({})", low, high),
            });
        }
        if high < 0.0 {
            errors.push(ConfigValidationError::InvalidRange {
                field: "gliovascular_connectivity.endfeet_distribution[3]".to_string(),
                value: high,
                reason: "an endfeet count can never be negative".to_string(),
            });
        }
    }

    if !KNOWN_REACHOUT_STRATEGIES.contains(&gv.reachout_strategy.as_str()) {
        errors.push(ConfigValidationError::UnknownName {
            field: "gliovascular_connectivity.reachout_strategy".to_string(),
            value: gv.reachout_strategy.clone(),
            known: KNOWN_REACHOUT_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        });
    }
}

fn validate_system(config: &NgvConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.system.log_level.to_lowercase();
    if !KNOWN_LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::UnknownName {
            field: "system.log_level".to_string(),
            value: config.system.log_level.clone(),
            known: KNOWN_LOG_LEVELS.iter().map(|s| s.to_string()).collect(),
        });
    }
}
