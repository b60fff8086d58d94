// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ngv-observability
//!
//! Logging infrastructure for the NGV building crates.
//!
//! Provides consistent logging setup across all NGV crates with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: File-based log rotation with per-run folders (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known NGV crate names for debug flags (also used as `tracing` targets)
pub const KNOWN_CRATES: &[&str] = &["ngv-building", "ngv-config", "ngv-observability"];
