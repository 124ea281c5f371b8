// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-draw constants.

use bitflags::bitflags;

use crate::light::Attenuation;

bitflags! {
    /// Flag bits of a draw call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DrawFlags: u32 {
        /// The destination is a 32-bit BGRA framebuffer rather than an 8-bit indexed one.
        const TRUECOLOR = 1 << 0;
        /// Scale colors by the light level only, skipping desaturation and fade colors.
        const SIMPLE_SHADE = 1 << 1;
        /// Sample textures with nearest filtering rather than bilinear filtering.
        const NEAREST_FILTER = 1 << 2;
        /// Ignore depth and light every pixel with the base light level.
        const FIXED_LIGHT = 1 << 3;
    }
}

/// Constants of the advanced shading mode.
///
/// All channels are in BGRA order and on a 0..=256 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShadeConstants {
    /// The light color the shaded result is multiplied with.
    pub light: [u16; 4],
    /// The fade (fog) color dark pixels blend towards.
    pub fade: [u16; 4],
    /// How much to desaturate towards the intensity-weighted gray, 0..=256.
    pub desaturate: u16,
}

impl Default for ShadeConstants {
    fn default() -> Self {
        Self {
            light: [256; 4],
            fade: [0; 4],
            desaturate: 0,
        }
    }
}

/// The uniform block of a draw call.
///
/// This is an immutable snapshot shared read-only by every worker processing the draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    /// The light level, 0..=255.
    pub light: u32,
    /// The global visibility scalar that controls how fast light falls off with distance.
    pub global_visibility: f32,
    /// The source alpha of the blend operators that need one, 0..=256.
    pub src_alpha: u32,
    /// The destination alpha of the blend operators that need one, 0..=256.
    pub dest_alpha: u32,
    /// The solid fill color, packed as `0xAARRGGBB`. In 8-bit mode the low byte is a palette index.
    pub color: u32,
    /// Constants of the advanced shading mode.
    pub shade_constants: ShadeConstants,
    /// Flag bits.
    pub flags: DrawFlags,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            light: 255,
            global_visibility: 1706.0,
            src_alpha: 256,
            dest_alpha: 0,
            color: 0xff00_0000,
            shade_constants: ShadeConstants::default(),
            flags: DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE | DrawFlags::NEAREST_FILTER,
        }
    }
}

impl Uniforms {
    /// Whether the draw targets a truecolor framebuffer.
    pub fn is_truecolor(&self) -> bool {
        self.flags.contains(DrawFlags::TRUECOLOR)
    }

    /// Whether the simple shading mode is selected.
    pub fn is_simple_shade(&self) -> bool {
        self.flags.contains(DrawFlags::SIMPLE_SHADE)
    }

    /// Whether nearest filtering is selected.
    pub fn is_nearest_filter(&self) -> bool {
        self.flags.contains(DrawFlags::NEAREST_FILTER)
    }

    /// Whether the light level is fixed.
    pub fn is_fixed_light(&self) -> bool {
        self.flags.contains(DrawFlags::FIXED_LIGHT)
    }

    /// The attenuation parameters of this draw.
    pub fn attenuation(&self) -> Attenuation {
        Attenuation::new(self.light, self.global_visibility, self.is_fixed_light())
    }
}

#[cfg(test)]
mod tests {
    use crate::uniforms::{DrawFlags, Uniforms};

    #[test]
    fn flags() {
        let flags = DrawFlags::TRUECOLOR | DrawFlags::FIXED_LIGHT;
        assert!(flags.contains(DrawFlags::TRUECOLOR));
        assert!(!flags.contains(DrawFlags::SIMPLE_SHADE));
        assert!(flags.contains(DrawFlags::empty()));
        assert_eq!(DrawFlags::from_bits_truncate(0xff), DrawFlags::all());
        assert_eq!(DrawFlags::from_bits(0x10), None);
    }

    #[test]
    fn fixed_light_uniform() {
        let uniforms = Uniforms {
            flags: DrawFlags::TRUECOLOR | DrawFlags::FIXED_LIGHT,
            ..Default::default()
        };
        assert!(uniforms.is_fixed_light());
        assert!(uniforms.attenuation().is_fixed());
        assert!(!uniforms.is_simple_shade());
    }
}
