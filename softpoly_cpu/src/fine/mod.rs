// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pixel programs.
//!
//! A program is one combination of texel source, blend operator and (for truecolor) shading
//! mode. Programs are generic over those parts, so each combination compiles to its own
//! straight-line pixel function and nothing is decided per pixel.

pub(crate) mod blend;
pub(crate) mod op;
pub(crate) mod sample;
pub(crate) mod shade;

use core::marker::PhantomData;

use softpoly_common::light::colormap_index;

use crate::fine::op::{BlendOp, Constants, Fragment, PaletteTables};
use crate::fine::sample::Source;
use crate::fine::shade::ShadeMode;

pub(crate) trait PixelProgram: Sync {
    type Pixel: Copy + Default + Send;

    /// Compute the new value of the destination pixel `bg`, at texture coordinate `(u, v)`
    /// with light fraction `light`.
    fn pixel(&self, bg: Self::Pixel, u: i32, v: i32, light: i32) -> Self::Pixel;

    /// Process a group of pixels sharing one light fraction.
    #[inline(always)]
    fn lanes<const N: usize>(
        &self,
        bg: [Self::Pixel; N],
        v: [i32; N],
        light: i32,
    ) -> [Self::Pixel; N] {
        core::array::from_fn(|i| self.pixel(bg[i], 0, v[i], light))
    }
}

/// A program writing packed BGRA colors.
#[derive(Debug)]
pub(crate) struct Truecolor<O, S, H> {
    source: S,
    constants: Constants,
    _marker: PhantomData<fn() -> (O, H)>,
}

impl<O, S, H> Truecolor<O, S, H> {
    pub(crate) fn new(source: S, constants: Constants) -> Self {
        Self {
            source,
            constants,
            _marker: PhantomData,
        }
    }
}

impl<O: BlendOp, S: Source, H: ShadeMode> PixelProgram for Truecolor<O, S, H> {
    type Pixel = u32;

    #[inline(always)]
    fn pixel(&self, bg: u32, u: i32, v: i32, light: i32) -> u32 {
        let texel = self.source.fetch(u, v);
        O::truecolor::<H>(Fragment { texel, v, light }, bg, &self.constants)
    }
}

/// A program writing 8-bit palette indices. Light selects a colormap level per pixel.
#[derive(Debug)]
pub(crate) struct Indexed<'a, O, S> {
    source: S,
    constants: Constants,
    tables: PaletteTables<'a>,
    _marker: PhantomData<fn() -> O>,
}

impl<'a, O, S> Indexed<'a, O, S> {
    pub(crate) fn new(source: S, constants: Constants, tables: PaletteTables<'a>) -> Self {
        Self {
            source,
            constants,
            tables,
            _marker: PhantomData,
        }
    }
}

impl<O: BlendOp, S: Source> PixelProgram for Indexed<'_, O, S> {
    type Pixel = u8;

    #[inline(always)]
    fn pixel(&self, bg: u8, u: i32, v: i32, light: i32) -> u8 {
        let texel = self.source.fetch(u, v);
        let cmap = self.tables.colormap.level(colormap_index(light));
        O::indexed(
            Fragment { texel, v, light },
            bg,
            cmap,
            S::TRANSLATED,
            &self.constants,
            &self.tables,
        )
    }
}
