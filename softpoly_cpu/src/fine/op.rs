// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The blend operator catalogue.
//!
//! Every operator turns a raw texel (a packed color, or a palette index for the indexed and
//! translated sources) and the destination pixel into the new destination pixel. The 8-bit
//! variants go through the palette: the texel is remapped by the colormap of the current light
//! level, converted to BGRA, blended, and mapped back to the closest palette index.

use softpoly_common::texture::{Colormap, Palette};
use softpoly_common::uniforms::{ShadeConstants, Uniforms};

use crate::fine::blend::{self, Weights};
use crate::fine::shade::ShadeMode;
use crate::util::scalar::{pack, unpack, widen_alpha, Channels, B, G, R};

/// The per-draw constants used by the operators.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Constants {
    pub(crate) color: u32,
    pub(crate) src_alpha: u32,
    pub(crate) dest_alpha: u32,
    pub(crate) shade: ShadeConstants,
}

impl From<&Uniforms> for Constants {
    fn from(u: &Uniforms) -> Self {
        Self {
            color: u.color,
            src_alpha: u.src_alpha.min(256),
            dest_alpha: u.dest_alpha.min(256),
            shade: u.shade_constants,
        }
    }
}

/// The palette resources of an 8-bit draw.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PaletteTables<'a> {
    pub(crate) palette: &'a Palette,
    pub(crate) colormap: &'a Colormap,
}

impl PaletteTables<'_> {
    #[inline(always)]
    fn bgra(&self, index: u8) -> Channels {
        unpack(self.palette.to_bgra(index))
    }

    #[inline(always)]
    fn index(&self, c: Channels) -> u8 {
        self.palette.to_index(c[R] as i32, c[G] as i32, c[B] as i32)
    }
}

/// The per-pixel inputs of an operator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    /// The raw texel.
    pub(crate) texel: u32,
    /// The vertical texture coordinate, needed by the sky fade.
    pub(crate) v: i32,
    /// The 16.16 light fraction.
    pub(crate) light: i32,
}

pub(crate) trait BlendOp: Send + Sync + 'static {
    /// Whether the truecolor variant samples palette indices instead of colors.
    const INDEXED_TEXELS: bool = false;

    fn truecolor<H: ShadeMode>(f: Fragment, bg: u32, k: &Constants) -> u32;

    /// `cmap` is the colormap level of `f.light`. With `translated` set, index 0 is transparent
    /// for every operator.
    fn indexed(
        f: Fragment,
        bg: u8,
        cmap: &[u8],
        translated: bool,
        k: &Constants,
        tables: &PaletteTables<'_>,
    ) -> u8;
}

#[inline(always)]
fn shaded<H: ShadeMode>(c: u32, f: &Fragment, k: &Constants) -> Channels {
    H::shade(unpack(c), f.light, &k.shade)
}

/// Opaque copy. Alpha is written through unchanged.
#[derive(Debug)]
pub(crate) struct Opaque;

impl BlendOp for Opaque {
    #[inline(always)]
    fn truecolor<H: ShadeMode>(f: Fragment, _: u32, k: &Constants) -> u32 {
        pack(shaded::<H>(f.texel, &f, k))
    }

    #[inline(always)]
    fn indexed(
        f: Fragment,
        bg: u8,
        cmap: &[u8],
        translated: bool,
        _: &Constants,
        _: &PaletteTables<'_>,
    ) -> u8 {
        if translated && f.texel == 0 {
            bg
        } else {
            cmap[f.texel as usize & 0xff]
        }
    }
}

/// "Over", weighted by the texel's own alpha.
#[derive(Debug)]
pub(crate) struct Masked;

impl BlendOp for Masked {
    #[inline(always)]
    fn truecolor<H: ShadeMode>(f: Fragment, bg: u32, k: &Constants) -> u32 {
        pack(blend::alpha_blend(&shaded::<H>(f.texel, &f, k), &unpack(bg)))
    }

    #[inline(always)]
    fn indexed(
        f: Fragment,
        bg: u8,
        cmap: &[u8],
        _: bool,
        _: &Constants,
        _: &PaletteTables<'_>,
    ) -> u8 {
        if f.texel == 0 {
            bg
        } else {
            cmap[f.texel as usize & 0xff]
        }
    }
}

macro_rules! palette_op {
    ($(#[$attr:meta])* $name:ident, |$fg:ident, $bg:ident, $k:ident| $truecolor:expr) => {
        $(#[$attr])*
        #[derive(Debug)]
        pub(crate) struct $name;

        impl $name {
            #[inline(always)]
            fn blend($fg: &Channels, $bg: &Channels, $k: &Constants) -> Channels {
                $truecolor
            }
        }

        impl BlendOp for $name {
            #[inline(always)]
            fn truecolor<H: ShadeMode>(f: Fragment, bg: u32, k: &Constants) -> u32 {
                pack(Self::blend(&shaded::<H>(f.texel, &f, k), &unpack(bg), k))
            }

            #[inline(always)]
            fn indexed(
                f: Fragment,
                bg: u8,
                cmap: &[u8],
                _: bool,
                k: &Constants,
                tables: &PaletteTables<'_>,
            ) -> u8 {
                if f.texel == 0 {
                    return bg;
                }
                let fg = tables.bgra(cmap[f.texel as usize & 0xff]);
                tables.index(Self::blend(&fg, &tables.bgra(bg), k))
            }
        }
    };
}

palette_op!(
    /// Additive blending with the constant weights alone.
    AddSolid,
    |fg, bg, k| blend::add(fg, bg, Weights::constant(k.src_alpha, k.dest_alpha))
);
palette_op!(
    /// Additive blending with alpha-modulated weights.
    Add,
    |fg, bg, k| blend::add(fg, bg, Weights::of(fg, k.src_alpha, k.dest_alpha))
);
palette_op!(
    /// Background minus foreground.
    Sub,
    |fg, bg, k| blend::sub(fg, bg, Weights::of(fg, k.src_alpha, k.dest_alpha))
);
palette_op!(
    /// Foreground minus background.
    RevSub,
    |fg, bg, k| blend::rev_sub(fg, bg, Weights::of(fg, k.src_alpha, k.dest_alpha))
);
palette_op!(
    /// Each foreground channel is its own opacity.
    AddSrcColor,
    |fg, bg, _k| blend::add_src_color(fg, bg)
);

/// The uniform color painted through the texel's alpha channel.
#[derive(Debug)]
pub(crate) struct Stencil;

impl BlendOp for Stencil {
    #[inline(always)]
    fn truecolor<H: ShadeMode>(f: Fragment, bg: u32, k: &Constants) -> u32 {
        let alpha = widen_alpha(f.texel >> 24);
        let color = shaded::<H>(k.color, &f, k);
        pack(blend::stencil(&color, alpha, &unpack(bg), k.src_alpha, k.dest_alpha))
    }

    #[inline(always)]
    fn indexed(
        f: Fragment,
        bg: u8,
        cmap: &[u8],
        _: bool,
        k: &Constants,
        tables: &PaletteTables<'_>,
    ) -> u8 {
        let alpha = if f.texel == 0 { 0 } else { 256 };
        let color = tables.bgra(cmap[k.color as usize & 0xff]);
        let out = blend::stencil(&color, alpha, &tables.bgra(bg), k.src_alpha, k.dest_alpha);
        tables.index(out)
    }
}

/// The uniform color painted through an alpha taken from the texel's palette index.
///
/// The sample is used as is: index 255 is full coverage.
#[derive(Debug)]
pub(crate) struct Shaded;

impl BlendOp for Shaded {
    const INDEXED_TEXELS: bool = true;

    #[inline(always)]
    fn truecolor<H: ShadeMode>(f: Fragment, bg: u32, k: &Constants) -> u32 {
        let alpha = widen_alpha(f.texel & 0xff);
        let color = shaded::<H>(k.color, &f, k);
        pack(blend::stencil(&color, alpha, &unpack(bg), k.src_alpha, k.dest_alpha))
    }

    #[inline(always)]
    fn indexed(
        f: Fragment,
        bg: u8,
        cmap: &[u8],
        _: bool,
        k: &Constants,
        tables: &PaletteTables<'_>,
    ) -> u8 {
        let alpha = widen_alpha(f.texel & 0xff);
        let color = tables.bgra(cmap[k.color as usize & 0xff]);
        let out = blend::stencil(&color, alpha, &tables.bgra(bg), k.src_alpha, k.dest_alpha);
        tables.index(out)
    }
}

/// The texel faded towards the uniform color at the top and bottom of the sky. Unlit.
#[derive(Debug)]
pub(crate) struct Skycap;

impl BlendOp for Skycap {
    #[inline(always)]
    fn truecolor<H: ShadeMode>(f: Fragment, _: u32, k: &Constants) -> u32 {
        pack(blend::fade_out(&unpack(f.texel), &unpack(k.color), f.v))
    }

    #[inline(always)]
    fn indexed(
        f: Fragment,
        _: u8,
        _: &[u8],
        _: bool,
        k: &Constants,
        tables: &PaletteTables<'_>,
    ) -> u8 {
        let texel = tables.bgra(f.texel as u8);
        let color = tables.bgra(k.color as u8);
        tables.index(blend::fade_out(&texel, &color, f.v))
    }
}
