// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer blend equations on unpacked BGRA channels.
//!
//! Alphas are on a 0..=256 scale. All products are divided by 256 with the `+127` bias and,
//! except for the opaque copy, the destination alpha channel is always written as 255.

use crate::util::scalar::{div_256, div_256_signed, widen_alpha, Channels, A};

/// The foreground and background weights of the additive and subtractive operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Weights {
    pub(crate) fg: u32,
    pub(crate) bg: u32,
}

impl Weights {
    /// Modulate the source and destination alpha constants by the sample alpha `alpha`
    /// (0..=256).
    ///
    /// Where the sample is transparent, the background is kept at full weight.
    #[inline(always)]
    pub(crate) fn modulated(alpha: u32, src_alpha: u32, dest_alpha: u32) -> Self {
        let fg = (src_alpha * alpha + 128) >> 8;
        let bg = (dest_alpha * alpha + ((256 - alpha) << 8) + 128) >> 8;
        Self { fg, bg }
    }

    /// The source and destination alpha constants, ignoring the sample alpha.
    #[inline(always)]
    pub(crate) fn constant(src_alpha: u32, dest_alpha: u32) -> Self {
        Self {
            fg: src_alpha,
            bg: dest_alpha,
        }
    }

    /// Like [`Weights::modulated`], taking the alpha from the foreground color.
    #[inline(always)]
    pub(crate) fn of(fg: &Channels, src_alpha: u32, dest_alpha: u32) -> Self {
        Self::modulated(widen_alpha(fg[A]), src_alpha, dest_alpha)
    }
}

#[inline(always)]
fn opaque(mut c: Channels) -> Channels {
    c[A] = 255;
    c
}

/// Interpolate between `fg` and `bg` with a 0..=256 weight.
#[inline(always)]
fn lerp(fg: &Channels, bg: &Channels, alpha: u32) -> Channels {
    let inv = 256 - alpha;
    core::array::from_fn(|i| div_256(fg[i] * alpha + bg[i] * inv))
}

/// Classic "over" with the foreground's own alpha.
#[inline(always)]
pub(crate) fn alpha_blend(fg: &Channels, bg: &Channels) -> Channels {
    opaque(lerp(fg, bg, widen_alpha(fg[A])))
}

/// `fg * w.fg + bg * w.bg`, clamped to 255.
#[inline(always)]
pub(crate) fn add(fg: &Channels, bg: &Channels, w: Weights) -> Channels {
    opaque(core::array::from_fn(|i| {
        div_256(fg[i] * w.fg + bg[i] * w.bg).min(255)
    }))
}

/// `bg * w.bg - fg * w.fg`, clamped to 0.
#[inline(always)]
pub(crate) fn sub(fg: &Channels, bg: &Channels, w: Weights) -> Channels {
    opaque(core::array::from_fn(|i| {
        div_256_signed((bg[i] * w.bg) as i32 - (fg[i] * w.fg) as i32)
    }))
}

/// `fg * w.fg - bg * w.bg`, clamped to 0.
#[inline(always)]
pub(crate) fn rev_sub(fg: &Channels, bg: &Channels, w: Weights) -> Channels {
    opaque(core::array::from_fn(|i| {
        div_256_signed((fg[i] * w.fg) as i32 - (bg[i] * w.bg) as i32)
    }))
}

/// Paint the solid `color` additively through a coverage `alpha` (0..=256).
#[inline(always)]
pub(crate) fn stencil(
    color: &Channels,
    alpha: u32,
    bg: &Channels,
    src_alpha: u32,
    dest_alpha: u32,
) -> Channels {
    add(color, bg, Weights::modulated(alpha, src_alpha, dest_alpha))
}

/// Use each foreground channel as its own opacity.
#[inline(always)]
pub(crate) fn add_src_color(fg: &Channels, bg: &Channels) -> Channels {
    opaque(core::array::from_fn(|i| {
        let src = widen_alpha(fg[i]);
        div_256(fg[i] * src + bg[i] * (256 - src))
    }))
}

/// Fade the texel towards `color` near the top and bottom edges of a sky cap.
///
/// `v` is the vertical texture coordinate in 8.24 fixed point; the cap spans two texture
/// heights.
#[inline(always)]
pub(crate) fn fade_out(texel: &Channels, color: &Channels, v: i32) -> Channels {
    let alpha_top = (v >> 14).clamp(0, 256);
    let alpha_bottom = ((2_i32 << 24).wrapping_sub(v) >> 14).clamp(0, 256);
    let alpha = alpha_top.min(alpha_bottom) as u32;
    opaque(lerp(texel, color, alpha))
}
