// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NgvConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the NGV configuration file
///
/// Search order:
/// 1. `NGV_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ngv_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NGV_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by NGV_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "NGV configuration file '{}' not found in any of these locations:\n{}\n\nSet NGV_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NgvConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NgvConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NGV_SEED` -> `system.seed`
/// - `NGV_LOG_LEVEL` -> `system.log_level`
/// - `NGV_CELL_SIZE` -> `spatial_index.cell_size`
/// - `NGV_MAX_TRIALS` -> `cell_placement.max_trials`
/// - `NGV_REACHOUT_STRATEGY` -> `gliovascular_connectivity.reachout_strategy`
pub fn apply_environment_overrides(config: &mut NgvConfig) {
    if let Ok(value) = env::var("NGV_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.system.seed = seed;
        }
    }
    if let Ok(value) = env::var("NGV_LOG_LEVEL") {
        config.system.log_level = value;
    }
    if let Ok(value) = env::var("NGV_CELL_SIZE") {
        if let Ok(cell_size) = value.parse::<f64>() {
            config.spatial_index.cell_size = cell_size;
        }
    }
    if let Ok(value) = env::var("NGV_MAX_TRIALS") {
        if let Ok(trials) = value.parse::<usize>() {
            config.cell_placement.max_trials = trials;
        }
    }
    if let Ok(value) = env::var("NGV_REACHOUT_STRATEGY") {
        config.gliovascular_connectivity.reachout_strategy = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"seed": "42", "reachout_strategy": "closest"}`)
pub fn apply_cli_overrides(config: &mut NgvConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.system.seed = seed;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }
    if let Some(value) = cli_args.get("cell_size") {
        if let Ok(cell_size) = value.parse::<f64>() {
            config.spatial_index.cell_size = cell_size;
        }
    }
    if let Some(value) = cli_args.get("reachout_strategy") {
        config.gliovascular_connectivity.reachout_strategy = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("NGV_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("NGV_CONFIG_PATH");

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("does_not_exist.toml");

        env::set_var("NGV_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("NGV_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("NGV_SEED");
        env::remove_var("NGV_CELL_SIZE");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[system]").unwrap();
        writeln!(file, "seed = 4").unwrap();
        writeln!(file, "[spatial_index]").unwrap();
        writeln!(file, "cell_size = 25.0").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.system.seed, 4);
        assert_eq!(config.spatial_index.cell_size, 25.0);
        assert_eq!(config.cell_placement.max_trials, 1000);
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = NgvConfig::default();

        env::set_var("NGV_SEED", "1234");
        env::set_var("NGV_REACHOUT_STRATEGY", "random");
        env::set_var("NGV_CELL_SIZE", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("NGV_SEED");
        env::remove_var("NGV_REACHOUT_STRATEGY");
        env::remove_var("NGV_CELL_SIZE");

        assert_eq!(config.system.seed, 1234);
        assert_eq!(config.gliovascular_connectivity.reachout_strategy, "random");
        // Unparseable values leave the previous setting untouched
        assert_eq!(config.spatial_index.cell_size, 10.0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = NgvConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("seed".to_string(), "77".to_string());
        cli_args.insert("cell_size".to_string(), "5.5".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.system.seed, 77);
        assert_eq!(config.spatial_index.cell_size, 5.5);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[system]").unwrap();
        writeln!(file, "seed = 1").unwrap();
        writeln!(file, "log_level = \"warn\"").unwrap();

        env::set_var("NGV_SEED", "2");
        env::set_var("NGV_LOG_LEVEL", "debug");

        let mut cli_args = HashMap::new();
        cli_args.insert("seed".to_string(), "3".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("NGV_SEED");
        env::remove_var("NGV_LOG_LEVEL");

        // CLI wins for seed, env wins for log level (no CLI override)
        assert_eq!(config.system.seed, 3);
        assert_eq!(config.system.log_level, "debug");
    }
}
