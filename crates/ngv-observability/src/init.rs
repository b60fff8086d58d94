// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for NGV building
//!
//! Console logging is always available. With the `file-logging` feature, each run
//! also writes JSON logs into its own timestamped folder with retention cleanup.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use ngv_config::NgvConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

#[cfg(feature = "file-logging")]
use anyhow::Context;
#[cfg(feature = "file-logging")]
use chrono::{DateTime, NaiveDateTime, Utc};
#[cfg(feature = "file-logging")]
use tracing_appender::rolling;

/// Map configuration spellings onto level names `EnvFilter` understands
pub fn normalize_level(level: &str) -> String {
    match level.to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

fn build_filter(debug_flags: &CrateDebugFlags, default_level: &str) -> EnvFilter {
    EnvFilter::new(debug_flags.to_filter_string_with_default(&normalize_level(default_level)))
}

/// Initialize console-only logging
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_console_logging(debug_flags: &CrateDebugFlags, default_level: &str) -> Result<()> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(build_filter(debug_flags, default_level));

    Registry::default()
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logging subscriber: {}", e))
}

/// Logging initialization result
#[cfg(feature = "file-logging")]
pub struct LoggingGuard {
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: PathBuf,
}

#[cfg(feature = "file-logging")]
impl LoggingGuard {
    /// Get the log directory path of this run
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Initialize logging with file output and console output
///
/// Creates a timestamped folder structure:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       ├── ngv-building.log
///       ├── ngv-config.log
///       └── ngv.log (combined)
/// ```
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags for filtering
/// * `default_level` - Level applied to crates without a debug flag
/// * `log_dir` - Base directory for logs (default: `./logs`)
/// * `retention_days` - Keep logs for N days (default: 30)
/// * `retention_runs` - Keep N most recent runs (default: 10)
#[cfg(feature = "file-logging")]
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<PathBuf>,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(&base_log_dir, retention_days, retention_runs)?;

    let env_filter = build_filter(debug_flags, default_level);

    let mut layers = Vec::new();
    let mut file_guards = Vec::new();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter.clone());
    layers.push(console_layer.boxed());

    for crate_name in crate::KNOWN_CRATES {
        let file_appender = rolling::daily(&run_folder, format!("{}.log", crate_name));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guards.push(guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(EnvFilter::new(format!("{}=debug,off", crate_name)))
            .boxed();

        layers.push(file_layer);
    }

    let combined_appender = rolling::daily(&run_folder, "ngv.log");
    let (combined_non_blocking, combined_guard) = tracing_appender::non_blocking(combined_appender);

    let combined_layer = tracing_subscriber::fmt::layer()
        .with_writer(combined_non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(env_filter)
        .boxed();

    layers.push(combined_layer);
    file_guards.push(combined_guard);

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logging subscriber: {}", e))?;

    Ok(LoggingGuard {
        _file_guards: file_guards,
        log_dir: run_folder,
    })
}

/// Clean up old run folders based on retention policy
#[cfg(feature = "file-logging")]
fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: Option<u64>,
    retention_runs: Option<usize>,
) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let retention_days = retention_days.unwrap_or(30);
    let retention_runs = retention_runs.unwrap_or(10);
    let cutoff_date = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(timestamp_str) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
        else {
            continue;
        };
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp_str, "%Y%m%d_%H%M%S") {
            runs.push((path, dt.and_utc()));
        }
    }

    // Oldest first
    runs.sort_by_key(|(_, dt)| *dt);

    let (expired, recent): (Vec<_>, Vec<_>) =
        runs.into_iter().partition(|(_, dt)| *dt < cutoff_date);

    let excess = recent.len().saturating_sub(retention_runs);
    let to_remove = expired.iter().chain(recent.iter().take(excess));

    for (path, _) in to_remove {
        if let Err(e) = std::fs::remove_dir_all(path) {
            tracing::warn!(
                target: "ngv-observability",
                "Failed to remove old log directory {}: {}",
                path.display(),
                e
            );
        }
    }

    Ok(())
}

/// Initialize file and console logging with default settings
#[cfg(feature = "file-logging")]
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, "info", None, None, None)
}

/// Logging setup selected by the `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingPlan {
    Console,
    Files {
        log_dir: PathBuf,
        retention_days: u64,
        retention_runs: usize,
    },
}

pub fn logging_plan(config: &NgvConfig) -> LoggingPlan {
    let logging = &config.logging;
    if logging.file_logging {
        LoggingPlan::Files {
            log_dir: logging.log_dir.clone(),
            retention_days: logging.retention_days,
            retention_runs: logging.retention_runs,
        }
    } else {
        LoggingPlan::Console
    }
}

/// Keeps file writers alive for the rest of the run. Drop it last.
pub struct LoggingHandle {
    #[cfg(feature = "file-logging")]
    guard: Option<LoggingGuard>,
}

impl LoggingHandle {
    fn console() -> Self {
        Self {
            #[cfg(feature = "file-logging")]
            guard: None,
        }
    }

    /// Run folder of the file logs, if any
    #[cfg(feature = "file-logging")]
    pub fn log_dir(&self) -> Option<&Path> {
        self.guard.as_ref().map(LoggingGuard::log_dir)
    }

    #[cfg(not(feature = "file-logging"))]
    pub fn log_dir(&self) -> Option<&Path> {
        None
    }
}

/// Initialize logging from `[system] log_level` and the `[logging]` section
///
/// # Errors
///
/// Fails if a global subscriber has already been installed or the log folder
/// cannot be created.
pub fn init_logging_from_config(config: &NgvConfig, debug_flags: &CrateDebugFlags) -> Result<LoggingHandle> {
    let level = config.system.log_level.as_str();
    match logging_plan(config) {
        LoggingPlan::Console => {
            init_console_logging(debug_flags, level)?;
            Ok(LoggingHandle::console())
        }
        #[cfg(feature = "file-logging")]
        LoggingPlan::Files {
            log_dir,
            retention_days,
            retention_runs,
        } => {
            let guard = init_logging(
                debug_flags,
                level,
                Some(log_dir),
                Some(retention_days),
                Some(retention_runs),
            )?;
            Ok(LoggingHandle { guard: Some(guard) })
        }
        #[cfg(not(feature = "file-logging"))]
        LoggingPlan::Files { log_dir, .. } => {
            init_console_logging(debug_flags, level)?;
            tracing::warn!(
                target: "ngv-observability",
                "File logging to {} requested but built without file-logging; console only",
                log_dir.display()
            );
            Ok(LoggingHandle::console())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("WARNING"), "warn");
        assert_eq!(normalize_level("Debug"), "debug");
    }

    #[test]
    fn test_second_init_fails() {
        let flags = CrateDebugFlags::default();
        // Whichever test installs first wins; the second call must report an error
        let _ = init_console_logging(&flags, "info");
        assert!(init_console_logging(&flags, "info").is_err());
    }

    #[test]
    fn test_logging_plan_follows_config() {
        let mut config = NgvConfig::default();
        assert_eq!(logging_plan(&config), LoggingPlan::Console);

        config.logging.file_logging = true;
        config.logging.log_dir = PathBuf::from("/tmp/ngv-run-logs");
        config.logging.retention_days = 7;
        config.logging.retention_runs = 3;
        assert_eq!(
            logging_plan(&config),
            LoggingPlan::Files {
                log_dir: PathBuf::from("/tmp/ngv-run-logs"),
                retention_days: 7,
                retention_runs: 3,
            }
        );
    }

    #[test]
    fn test_console_handle_has_no_log_dir() {
        assert!(LoggingHandle::console().log_dir().is_none());
    }

    #[cfg(feature = "file-logging")]
    #[test]
    fn test_cleanup_keeps_most_recent_runs() {
        let dir = std::env::temp_dir().join(format!("ngv-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let now = Utc::now();
        for days_ago in 0..4 {
            let stamp = (now - chrono::Duration::days(days_ago)).format("%Y%m%d_%H%M%S");
            std::fs::create_dir_all(dir.join(format!("run_{}", stamp))).unwrap();
        }
        std::fs::create_dir_all(dir.join("not_a_run")).unwrap();

        cleanup_old_logs(&dir, Some(30), Some(2)).unwrap();

        let remaining: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("run_"))
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(dir.join("not_a_run").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
