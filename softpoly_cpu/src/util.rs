// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub(crate) mod scalar {
    /// Channels of one pixel in BGRA order, widened for arithmetic.
    pub(crate) type Channels = [u32; 4];

    pub(crate) const B: usize = 0;
    pub(crate) const G: usize = 1;
    pub(crate) const R: usize = 2;
    pub(crate) const A: usize = 3;

    /// Split a packed `0xAARRGGBB` color into its channels.
    #[inline(always)]
    pub(crate) const fn unpack(c: u32) -> Channels {
        [c & 0xff, (c >> 8) & 0xff, (c >> 16) & 0xff, c >> 24]
    }

    /// Pack channels into a `0xAARRGGBB` color, saturating each channel at 255.
    #[inline(always)]
    pub(crate) fn pack(c: Channels) -> u32 {
        let [b, g, r, a] = c.map(|c| c.min(255));
        (a << 24) | (r << 16) | (g << 8) | b
    }

    /// Rescale an 8-bit alpha so that 255 maps to 256.
    #[inline(always)]
    pub(crate) const fn widen_alpha(a: u32) -> u32 {
        a + (a >> 7)
    }

    /// Divide a product of two 0..=256 scaled values by 256, rounding with the `+127` bias.
    #[inline(always)]
    pub(crate) const fn div_256(val: u32) -> u32 {
        (val + 127) >> 8
    }

    /// The signed variant of [`div_256`], clamped to 0..=255.
    #[inline(always)]
    pub(crate) fn div_256_signed(val: i32) -> u32 {
        ((val + 127) >> 8).clamp(0, 255) as u32
    }

}
