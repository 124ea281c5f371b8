// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The light attenuation curve.
//!
//! Light is expressed as a "light fraction" in 16.16 fixed point, where [`FRACUNIT`] is full
//! brightness. The curve blends between the sector light level and a distance-scaled falloff,
//! and it is tuned by eye, so every constant below has to be reproduced exactly.

/// Fixed-point one.
pub const FRACUNIT: i32 = 1 << 16;

/// The number of light levels in a colormap.
pub const NUM_COLORMAPS: usize = 32;

/// Per-draw attenuation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    shade: f32,
    global_visibility: f32,
    /// The light fraction to use for every pixel, if the draw is self-illuminated.
    fixed: Option<i32>,
}

impl Attenuation {
    /// Create the attenuation parameters for a draw call.
    ///
    /// `light` is the sector light level in `0..=255`, `global_visibility` the per-triangle
    /// visibility scalar. With `fixed_light` set, depth is ignored and every pixel gets the
    /// base light level.
    pub fn new(light: u32, global_visibility: f32, fixed_light: bool) -> Self {
        let light = light.min(255);
        let shade = (64.0 - ((light * 255 / 256) as f32 + 12.0) * 32.0 / 128.0) / 32.0;
        let fixed = fixed_light.then(|| {
            // The fixed multiplier is on a 0..=256 scale, so the brightest level must be 256.
            let light = light + (light >> 7);
            (light << 8) as i32
        });

        Self {
            shade,
            global_visibility: global_visibility * (1.0 / 32.0),
            fixed,
        }
    }

    /// Whether the light fraction is independent of depth.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// The light fraction for a pixel with the interpolated depth `w`.
    #[inline(always)]
    pub fn light_fraction(&self, w: f32) -> i32 {
        if let Some(fixed) = self.fixed {
            return fixed;
        }

        let falloff = (self.shade - (24.0 / 32.0_f32).min(self.global_visibility * w))
            .clamp(0.0, 31.0 / 32.0);
        FRACUNIT - (falloff * FRACUNIT as f32) as i32
    }

    /// The per-pixel increment between two light fractions eight pixels apart.
    #[inline(always)]
    pub fn step(from: i32, to: i32) -> i32 {
        (to - from) / 8
    }
}

/// The 0..=256 multiplier corresponding to a light fraction.
#[inline(always)]
pub fn light_multiplier(light_fraction: i32) -> u32 {
    (light_fraction >> 8).clamp(0, 256) as u32
}

/// Quantize a light fraction to one of the [`NUM_COLORMAPS`] colormap levels.
///
/// Level 0 is full brightness.
#[inline(always)]
pub fn colormap_index(light_fraction: i32) -> usize {
    let light = light_multiplier(light_fraction);
    (((256 - light) * NUM_COLORMAPS as u32 / 256) as usize).min(NUM_COLORMAPS - 1)
}

/// Convert a software renderer shade value (16.16, zero being full brightness) into a light
/// fraction.
pub fn light_fraction_from_shade(shade: i32) -> i32 {
    (FRACUNIT - shade).clamp(0, FRACUNIT)
}
