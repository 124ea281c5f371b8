// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions shared across different tests.

use std::sync::LazyLock;

use softpoly_common::coverage::{CoverageSpan, BLOCK_SIZE};
use softpoly_common::gradient::Vertex;
use softpoly_common::light::NUM_COLORMAPS;
use softpoly_common::texture::{Colormap, Palette, RGB_LUT_SIZE};
use softpoly_common::uniforms::{DrawFlags, Uniforms};
use softpoly_cpu::{RenderContext, RenderSettings};

/// A palette of 256 grays whose lookup table maps every color to its average gray.
pub(crate) static GRAY_PALETTE: LazyLock<Palette> = LazyLock::new(|| {
    let colors = core::array::from_fn(|i| {
        let i = i as u32;
        (i << 16) | (i << 8) | i
    });
    let lut = (0..RGB_LUT_SIZE)
        .map(|i| {
            let r = (i >> 12) & 63;
            let g = (i >> 6) & 63;
            let b = i & 63;
            (((r + g + b) * 4 + 6) / 3).min(255) as u8
        })
        .collect();
    Palette::new(colors, lut).unwrap()
});

/// A colormap where every index of light level `n` maps to `n`.
pub(crate) static LEVEL_COLORMAP: LazyLock<Colormap> = LazyLock::new(|| {
    Colormap::new((0..NUM_COLORMAPS * 256).map(|i| (i / 256) as u8).collect()).unwrap()
});

/// A colormap that keeps every index at every light level.
pub(crate) static IDENTITY_COLORMAP: LazyLock<Colormap> = LazyLock::new(|| {
    Colormap::new((0..NUM_COLORMAPS * 256).map(|i| (i % 256) as u8).collect()).unwrap()
});

pub(crate) fn get_ctx(num_threads: u16) -> RenderContext {
    RenderContext::new(RenderSettings { num_threads }).unwrap()
}

/// Uniforms of a fully lit truecolor draw with nearest filtering.
pub(crate) fn truecolor_uniforms() -> Uniforms {
    Uniforms {
        flags: DrawFlags::TRUECOLOR
            | DrawFlags::SIMPLE_SHADE
            | DrawFlags::NEAREST_FILTER
            | DrawFlags::FIXED_LIGHT,
        ..Default::default()
    }
}

/// Uniforms of a fully lit 8-bit draw.
pub(crate) fn indexed_uniforms() -> Uniforms {
    Uniforms {
        flags: DrawFlags::SIMPLE_SHADE | DrawFlags::NEAREST_FILTER | DrawFlags::FIXED_LIGHT,
        ..Default::default()
    }
}

/// Vertices mapping the texture once onto a `width` × `height` rectangle at depth `w`, with
/// pixel corners landing on texel corners.
pub(crate) fn quad(width: f32, height: f32, w: f32) -> [Vertex; 3] {
    quad_offset(width, height, w, 0.0)
}

/// Like [`quad`], with the texture coordinates shifted by `offset` in both directions.
pub(crate) fn quad_offset(width: f32, height: f32, w: f32, offset: f32) -> [Vertex; 3] {
    [
        Vertex::new(0.0, 0.0, w, [offset, offset]),
        Vertex::new(width, 0.0, w, [1.0 + offset, offset]),
        Vertex::new(0.0, height, w, [offset, 1.0 + offset]),
    ]
}

/// Spans covering a `width` × `height` rectangle at the origin. Both must be multiples of the
/// block size.
pub(crate) fn full_cover(width: u16, height: u16) -> Vec<CoverageSpan> {
    (0..height)
        .step_by(usize::from(BLOCK_SIZE))
        .map(|y| CoverageSpan::new(0, y, u32::from(width / BLOCK_SIZE)))
        .collect()
}

/// A truecolor gray with opaque alpha.
pub(crate) fn gray(c: u32) -> u32 {
    0xff00_0000 | (c << 16) | (c << 8) | c
}
