// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texel sources.
//!
//! Triangle sources are addressed with 8.24 fixed-point `(u, v)` coordinates that wrap around
//! the texture. Column sources only use `v`, a 0.32 fraction of the texture height.

use softpoly_common::texture::{Texel, Texture};

/// Something that produces the raw texel of a pixel: a packed color or a palette index.
pub(crate) trait Source: Sync {
    /// Whether texels are remapped through a translation table. Index 0 of a translated
    /// source is transparent.
    const TRANSLATED: bool = false;

    fn fetch(&self, u: i32, v: i32) -> u32;
}

/// Map a wrapping 8.24 texture coordinate to a texel index.
#[inline(always)]
pub(crate) fn texel_coord(frac: i32, size: u32) -> u32 {
    ((((frac as u32) << 8) >> 16) * size) >> 16
}

/// The 0.32 fixed-point distance between two texel centers, rounded up.
#[inline(always)]
pub(crate) fn texel_step(size: u32) -> u32 {
    (0x8000_0000_u32.wrapping_add(size - 1) / size)
        .wrapping_mul(2)
        .wrapping_add(1)
}

/// The 1..=16 weight of the left/top sample of a bilinear pair, and its complement.
#[inline(always)]
fn weights(frac_far: u32) -> (u32, u32) {
    let inv = (frac_far >> 12) & 15;
    (16 - inv, inv)
}

/// Bilinear mix of four packed colors. `x0y0` is weighted by `a_y * a_x`.
#[inline(always)]
fn mix(p: [u32; 4], (a_y, inv_y): (u32, u32), (a_x, inv_x): (u32, u32)) -> u32 {
    let [p00, p01, p10, p11] = p;
    let w00 = a_y * a_x;
    let w01 = inv_y * a_x;
    let w10 = a_y * inv_x;
    let w11 = inv_y * inv_x;

    let mut out = 0;
    for shift in [0, 8, 16, 24] {
        let c = |p: u32| (p >> shift) & 0xff;
        let v = (c(p00) * w00 + c(p01) * w01 + c(p10) * w10 + c(p11) * w11 + 127) >> 8;
        out |= v.min(255) << shift;
    }
    out
}

/// A uniform color.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Solid(pub(crate) u32);

impl Source for Solid {
    #[inline(always)]
    fn fetch(&self, _: i32, _: i32) -> u32 {
        self.0
    }
}

/// Nearest texel of a wrapping texture.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Nearest<'a, T>(pub(crate) Texture<'a, T>);

impl<T: Texel> Source for Nearest<'_, T> {
    #[inline(always)]
    fn fetch(&self, u: i32, v: i32) -> u32 {
        let x = texel_coord(u, self.0.width());
        let y = texel_coord(v, self.0.height());
        self.0.texel(x, y).to_u32()
    }
}

/// Bilinear filtering of a wrapping truecolor texture.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bilinear<'a> {
    texture: Texture<'a, u32>,
    one_u: u32,
    one_v: u32,
}

impl<'a> Bilinear<'a> {
    pub(crate) fn new(texture: Texture<'a, u32>) -> Self {
        Self {
            one_u: texel_step(texture.width()),
            one_v: texel_step(texture.height()),
            texture,
        }
    }
}

impl Source for Bilinear<'_> {
    #[inline(always)]
    fn fetch(&self, u: i32, v: i32) -> u32 {
        let w = self.texture.width();
        let h = self.texture.height();

        // Sample positions are texel centers, so move half a texel back.
        let u = ((u as u32) << 8).wrapping_sub(self.one_u >> 1);
        let v = ((v as u32) << 8).wrapping_sub(self.one_v >> 1);

        let frac_x0 = (u >> 16) * w;
        let frac_x1 = (u.wrapping_add(self.one_u) >> 16) * w;
        let frac_y0 = (v >> 16) * h;
        let frac_y1 = (v.wrapping_add(self.one_v) >> 16) * h;

        let x0 = frac_x0 >> 16;
        let x1 = frac_x1 >> 16;
        let y0 = frac_y0 >> 16;
        let y1 = frac_y1 >> 16;

        let t = &self.texture;
        mix(
            [t.texel(x0, y0), t.texel(x0, y1), t.texel(x1, y0), t.texel(x1, y1)],
            weights(frac_y1),
            weights(frac_x1),
        )
    }
}

/// Nearest palette index of a wrapping texture, remapped through a translation table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Translated<'a, T> {
    pub(crate) texture: Texture<'a, u8>,
    pub(crate) table: &'a [T; 256],
}

impl<T: Texel> Source for Translated<'_, T> {
    const TRANSLATED: bool = true;

    #[inline(always)]
    fn fetch(&self, u: i32, v: i32) -> u32 {
        let x = texel_coord(u, self.texture.width());
        let y = texel_coord(v, self.texture.height());
        self.table[usize::from(self.texture.texel(x, y))].to_u32()
    }
}

/// Nearest texel of one texture column.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnNearest<'a, T> {
    pub(crate) column: &'a [T],
    pub(crate) height: u32,
}

impl<T: Texel> Source for ColumnNearest<'_, T> {
    #[inline(always)]
    fn fetch(&self, _: i32, v: i32) -> u32 {
        let y = (((v as u32) >> 16) * self.height) >> 16;
        self.column[y as usize].to_u32()
    }
}

/// Bilinear filtering between two adjacent truecolor columns.
///
/// Unlike triangle textures, columns clamp to their edges instead of wrapping.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnBilinear<'a> {
    column: &'a [u32],
    next: &'a [u32],
    height: u32,
    one: u32,
    /// Weights of `column` and `next`.
    horizontal: (u32, u32),
}

impl<'a> ColumnBilinear<'a> {
    /// `u_weight` is the 0..=15 share of `next`.
    pub(crate) fn new(column: &'a [u32], next: &'a [u32], height: u32, u_weight: u32) -> Self {
        let inv = u_weight & 15;
        Self {
            column,
            next,
            height,
            one: texel_step(height),
            horizontal: (16 - inv, inv),
        }
    }

    /// Move a start position half a texel back so that sample positions are texel centers.
    pub(crate) fn start_frac(&self, frac: u32) -> u32 {
        frac.saturating_sub(self.one / 2)
    }
}

impl Source for ColumnBilinear<'_> {
    #[inline(always)]
    fn fetch(&self, _: i32, v: i32) -> u32 {
        let frac = v as u32;
        let h = u64::from(self.height);
        let last = self.height - 1;

        let y0 = ((((frac >> 16) * self.height) >> 16).min(last)) as usize;
        let frac_y1 = ((u64::from(frac) + u64::from(self.one)) >> 16) * h;
        let y1 = ((frac_y1 >> 16).min(u64::from(last))) as usize;

        mix(
            [self.column[y0], self.column[y1], self.next[y0], self.next[y1]],
            // Only the low bits select the weight.
            weights(frac_y1 as u32),
            self.horizontal,
        )
    }
}

/// One column of palette indices, remapped through a translation table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnTranslated<'a, T> {
    pub(crate) column: &'a [u8],
    pub(crate) height: u32,
    pub(crate) table: &'a [T; 256],
}

impl<T: Texel> Source for ColumnTranslated<'_, T> {
    const TRANSLATED: bool = true;

    #[inline(always)]
    fn fetch(&self, _: i32, v: i32) -> u32 {
        let y = (((v as u32) >> 16) * self.height) >> 16;
        self.table[usize::from(self.column[y as usize])].to_u32()
    }
}
