// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coverage lists handed to the triangle kernel.
//!
//! The coverage generator walks the triangle edges on an 8×8 block grid. Blocks that are fully
//! inside are merged into horizontal [`CoverageSpan`]s; blocks crossed by an edge become
//! [`CoverageBlock`]s carrying one bit per pixel.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// The width and height of a coverage block, in pixels.
pub const BLOCK_SIZE: u16 = 8;

/// The number of rows described by one of the two masks of a [`CoverageBlock`].
pub const MASK_ROWS: u16 = 4;

/// A horizontal run of fully covered 8×8 blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct CoverageSpan {
    /// The x coordinate of the first pixel.
    pub x: u16,
    /// The y coordinate of the top row. Always a multiple of [`BLOCK_SIZE`].
    pub y: u16,
    /// The number of blocks, i.e. the width of the span divided by [`BLOCK_SIZE`].
    pub length: u32,
}

const_assert_eq!(size_of::<CoverageSpan>(), 8);

impl CoverageSpan {
    /// Create a new span.
    pub fn new(x: u16, y: u16, length: u32) -> Self {
        Self { x, y, length }
    }

    /// The width of the span in pixels.
    pub fn width(&self) -> u32 {
        self.length * u32::from(BLOCK_SIZE)
    }
}

/// A partially covered 8×8 block.
///
/// `mask0` covers rows 0 to 3 and `mask1` rows 4 to 7. Within a mask, the most significant bit
/// is the top-left pixel and bits proceed left to right, then top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct CoverageBlock {
    /// The x coordinate of the top-left pixel.
    pub x: u16,
    /// The y coordinate of the top-left pixel. Always a multiple of [`BLOCK_SIZE`].
    pub y: u16,
    /// Coverage of the upper four rows.
    pub mask0: u32,
    /// Coverage of the lower four rows.
    pub mask1: u32,
}

const_assert_eq!(size_of::<CoverageBlock>(), 12);

impl CoverageBlock {
    /// Create a new block from its two masks.
    pub fn new(x: u16, y: u16, mask0: u32, mask1: u32) -> Self {
        Self { x, y, mask0, mask1 }
    }

    /// Build a block by evaluating `covered(px, py)` for every pixel, with `px` and `py`
    /// relative to the top-left corner of the block.
    pub fn from_fn(x: u16, y: u16, mut covered: impl FnMut(u16, u16) -> bool) -> Self {
        let mut masks = [0_u32; 2];

        for py in 0..BLOCK_SIZE {
            for px in 0..BLOCK_SIZE {
                if covered(px, py) {
                    masks[usize::from(py / MASK_ROWS)] |= bit(px, py % MASK_ROWS);
                }
            }
        }

        Self::new(x, y, masks[0], masks[1])
    }

    /// Whether pixel `(px, py)` of the block is covered.
    pub fn is_covered(&self, px: u16, py: u16) -> bool {
        let mask = if py < MASK_ROWS { self.mask0 } else { self.mask1 };
        mask & bit(px, py % MASK_ROWS) != 0
    }

    /// The number of covered pixels.
    pub fn covered_count(&self) -> u32 {
        self.mask0.count_ones() + self.mask1.count_ones()
    }
}

#[inline(always)]
fn bit(px: u16, row: u16) -> u32 {
    1 << (31 - row * BLOCK_SIZE - px)
}

/// Reinterpret a flat `u32` buffer written by an external coverage generator as spans.
///
/// Each span occupies two words. Returns `None` if the buffer length or alignment does not fit.
pub fn spans_from_words(words: &[u32]) -> Option<&[CoverageSpan]> {
    bytemuck::try_cast_slice(words).ok()
}

/// Reinterpret a flat `u32` buffer written by an external coverage generator as blocks.
///
/// Each block occupies three words. Returns `None` if the buffer length or alignment does not fit.
pub fn blocks_from_words(words: &[u32]) -> Option<&[CoverageBlock]> {
    bytemuck::try_cast_slice(words).ok()
}
