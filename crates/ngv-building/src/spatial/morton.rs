// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Morton encoding utilities for 3D spatial hashing.

Implements Z-order curve encoding to preserve spatial locality. Grid cells have
signed coordinates; they are biased into the unsigned 21-bit range before encoding
and clamped onto the outermost cell when they fall outside it.
*/

/// Bits per axis (63 bits total)
pub const MORTON_BITS: u32 = 21;

/// Largest encodable unsigned coordinate
pub const MORTON_MAX: u32 = (1 << MORTON_BITS) - 1;

/// Signed cell coordinate mapped to unsigned zero
const CELL_BIAS: i64 = 1 << (MORTON_BITS - 1);

/// Spread the low 21 bits of `v` so that two zero bits follow each bit
#[inline]
fn split_by_3(v: u32) -> u64 {
    let mut x = (v & MORTON_MAX) as u64;
    x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

/// Inverse of [`split_by_3`]
#[inline]
fn compact_by_3(code: u64) -> u32 {
    let mut x = code & 0x1249_2492_4924_9249;
    x = (x | (x >> 2)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x >> 4)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x >> 8)) & 0x001f_0000_ff00_00ff;
    x = (x | (x >> 16)) & 0x001f_0000_0000_ffff;
    x = (x | (x >> 32)) & MORTON_MAX as u64;
    x as u32
}

/// Morton encode 3D coordinates into a single u64.
///
/// Interleaves bits of x, y, z coordinates: `...z1y1x1z0y0x0`.
/// Each dimension limited to 21 bits (0-2,097,151).
#[inline]
pub fn morton_encode_3d(x: u32, y: u32, z: u32) -> u64 {
    debug_assert!(x <= MORTON_MAX, "x coordinate exceeds 21-bit limit");
    debug_assert!(y <= MORTON_MAX, "y coordinate exceeds 21-bit limit");
    debug_assert!(z <= MORTON_MAX, "z coordinate exceeds 21-bit limit");

    split_by_3(x) | (split_by_3(y) << 1) | (split_by_3(z) << 2)
}

/// Morton decode a u64 back to 3D coordinates.
#[inline]
pub fn morton_decode_3d(morton_code: u64) -> (u32, u32, u32) {
    (
        compact_by_3(morton_code),
        compact_by_3(morton_code >> 1),
        compact_by_3(morton_code >> 2),
    )
}

/// Bias a signed cell coordinate into the encodable range, clamping at the edges
#[inline]
pub fn bias_cell_coordinate(c: i64) -> u32 {
    c.saturating_add(CELL_BIAS).clamp(0, MORTON_MAX as i64) as u32
}

/// Inverse of [`bias_cell_coordinate`] for in-range values
#[inline]
pub fn unbias_cell_coordinate(c: u32) -> i64 {
    c as i64 - CELL_BIAS
}

/// Morton code of a signed grid cell
#[inline]
pub fn morton_encode_cell(cell: (i64, i64, i64)) -> u64 {
    morton_encode_3d(
        bias_cell_coordinate(cell.0),
        bias_cell_coordinate(cell.1),
        bias_cell_coordinate(cell.2),
    )
}

/// Signed grid cell of a Morton code produced by [`morton_encode_cell`]
#[inline]
pub fn morton_decode_cell(morton_code: u64) -> (i64, i64, i64) {
    let (x, y, z) = morton_decode_3d(morton_code);
    (
        unbias_cell_coordinate(x),
        unbias_cell_coordinate(y),
        unbias_cell_coordinate(z),
    )
}
