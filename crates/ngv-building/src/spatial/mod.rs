// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Spatial indexing for placed spheres and target populations.

Uses Morton-coded grid cells with Roaring bitmaps for occupancy.
*/

pub mod index;
pub mod morton;

pub use index::{SpatialIndex, SpatialIndexStats, DEFAULT_CELL_SIZE};
pub use morton::{morton_decode_3d, morton_decode_cell, morton_encode_3d, morton_encode_cell};
