// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Truecolor shading modes.

use softpoly_common::light::{light_multiplier, FRACUNIT};
use softpoly_common::uniforms::ShadeConstants;

use crate::util::scalar::{Channels, B, G, R};

/// How a texel color is modulated by the light fraction.
///
/// The mode is chosen once per draw call, so it is a type parameter of the kernels rather than
/// a per-pixel branch.
pub(crate) trait ShadeMode: Send + Sync + 'static {
    fn shade(c: Channels, light_fraction: i32, constants: &ShadeConstants) -> Channels;
}

/// Scale the color channels by the light fraction.
#[derive(Debug)]
pub(crate) struct Simple;

impl ShadeMode for Simple {
    #[inline(always)]
    fn shade(mut c: Channels, light_fraction: i32, _: &ShadeConstants) -> Channels {
        let light = light_fraction.clamp(0, FRACUNIT) as u32;
        for channel in &mut c[..3] {
            *channel = (*channel * light) >> 16;
        }
        c
    }
}

/// Desaturate, fade towards the fog color and tint with the light color.
#[derive(Debug)]
pub(crate) struct Advanced;

impl ShadeMode for Advanced {
    #[inline(always)]
    fn shade(mut c: Channels, light_fraction: i32, k: &ShadeConstants) -> Channels {
        let light = light_multiplier(light_fraction);
        let desaturate = u32::from(k.desaturate.min(256));

        let intensity = ((c[R] * 77 + c[G] * 143 + c[B] * 37) >> 8) * desaturate;
        for i in [B, G, R] {
            let desaturated = (c[i] * (256 - desaturate) + intensity) >> 8;
            let faded = (u32::from(k.fade[i]) * (256 - light) + desaturated * light) >> 8;
            c[i] = (faded * u32::from(k.light[i])) >> 8;
        }
        c
    }
}
