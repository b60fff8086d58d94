//! # NGV - Neuro-Glia-Vasculature circuit building
//!
//! Spatial cell placement and domain-to-target connectivity for building
//! neuro-glia-vascular circuits. This crate re-exports the workspace members
//! behind feature flags.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! ngv = "0.3"  # Default: parallel + observability
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): per-cell connectivity on rayon
//! - **`observability`** (default): logging initialization and per-crate debug flags
//! - **`file-logging`**: rotating JSON log files per run (desktop only)
//!
//! ## Usage Examples
//!
//! ### Placing cells and connecting them to the vasculature
//!
//! ```rust,no_run
//! use ngv::prelude::*;
//! use glam::DVec3;
//!
//! let config = ngv::config::load_config(None, None)?;
//! let mut rng = ngv::building::seeded_rng(config.system.seed);
//!
//! let region = Microdomain::from_box(DVec3::ZERO, DVec3::splat(200.0));
//! let params = PlacementParams::try_from(&config)?;
//! let somata = place_spheres(&region, 100, |_| 5.0, &params, &mut rng);
//!
//! let domains: Vec<Microdomain> = somata
//!     .coordinates()
//!     .iter()
//!     .map(|c| Microdomain::from_box(*c - DVec3::splat(25.0), *c + DVec3::splat(25.0)))
//!     .collect();
//! let vasculature = TargetPopulation::from_points(vec![DVec3::splat(100.0)]);
//! let strategy = ReachoutStrategyKind::try_from(&config)?;
//! let cell_ids: Vec<usize> = (0..domains.len()).collect();
//!
//! let edges = domains_to_vasculature(
//!     &cell_ids,
//!     &strategy,
//!     &vasculature,
//!     &domains,
//!     &GliovascularParams::try_from(&config)?,
//! );
//! println!("{} endfeet", edges.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: ngv-config                                 │
//! │  (TOML configuration, env/CLI overrides, validation)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: ngv-observability                      │
//! │  (tracing subscribers, per-crate debug flags)           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: ngv-building                               │
//! │  (geometry, spatial index, placement, connectivity)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use ngv_config as config;

// Re-export infrastructure
#[cfg(feature = "observability")]
pub use ngv_observability as observability;

// Re-export algorithms
pub use ngv_building as building;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::building::cell_placement::{place_spheres, PlacementParams, SpherePattern};
    pub use crate::building::connectivity::{
        astrocyte_neuroglial_connectivity, domains_to_vasculature, spheres_inside_domain,
        GliovascularParams, NeuroglialEdge, NeuroglialParams, ReachoutStrategy, ReachoutStrategyKind,
        TargetCandidate, TargetPopulation,
    };
    pub use crate::building::geometry::{BoundingBox, ConvexDomain, Microdomain};
    pub use crate::building::grouping::{
        group_elements, vertex_to_triangle_groups, GroupedElements, UNASSIGNED_GROUP,
    };
    pub use crate::building::spatial::SpatialIndex;
    pub use crate::building::statistics::TruncatedNormal;
    pub use crate::building::types::{BuildingError, BuildingResult};

    pub use crate::config::{NgvConfig, ConfigError, ConfigResult};

    #[cfg(feature = "observability")]
    pub use crate::observability::{
        init_console_logging, init_logging_from_config, parse_debug_flags, CrateDebugFlags,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        // Just test that re-exports work
        use crate::prelude::*;
        let grouped = group_elements(&[1, 0, -1]);
        assert_eq!(grouped.groups, vec![0, 1, UNASSIGNED_GROUP]);
        let _config = NgvConfig::default();
    }
}
