// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch table.
//!
//! Every combination of pixel format, blend operator and sampling mode is a separate
//! instantiation of the generic kernels. The table holds a plain function pointer to each of
//! them, built once on first use and only read afterwards.

use core::fmt;
use std::sync::LazyLock;

use crate::column::{self, ColumnBlend, ColumnDrawArgs, ColumnSampler};
use crate::fine::op;
use crate::region::Region;
use crate::triangle::{self, TriBlendMode, TriangleDrawArgs};

/// A triangle kernel writing pixels of type `P`.
pub type TriangleKernel<P> = fn(&TriangleDrawArgs<'_>, &mut Region<'_, P>);

/// A column kernel writing pixels of type `P`.
pub type ColumnKernel<P> = fn(&ColumnDrawArgs<'_>, &mut Region<'_, P>);

static TABLE: LazyLock<DispatchTable> = LazyLock::new(DispatchTable::build);

/// The kernels of every pixel format, blend operator and sampling mode.
pub struct DispatchTable {
    triangle32: [[TriangleKernel<u32>; 2]; TriBlendMode::COUNT],
    triangle8: [[TriangleKernel<u8>; 2]; TriBlendMode::COUNT],
    column32: [[ColumnKernel<u32>; ColumnSampler::COUNT]; ColumnBlend::COUNT],
    column8: [[ColumnKernel<u8>; ColumnSampler::COUNT]; ColumnBlend::COUNT],
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable").finish_non_exhaustive()
    }
}

/// Pick the fill or textured instantiation of a triangle kernel.
macro_rules! fill_or_texture {
    ($($func:ident)::+, $op:ty, $fill:expr, $translated:literal) => {
        if $fill {
            $($func)::+::<$op, true, $translated>
        } else {
            $($func)::+::<$op, false, $translated>
        }
    };
}

/// Map a triangle blend mode to its operator and translation flag.
macro_rules! triangle_kernel {
    ($($func:ident)::+, $mode:expr, $fill:expr) => {
        match $mode {
            TriBlendMode::Copy => fill_or_texture!($($func)::+, op::Opaque, $fill, false),
            TriBlendMode::AlphaBlend => fill_or_texture!($($func)::+, op::Masked, $fill, false),
            TriBlendMode::AddSolid => fill_or_texture!($($func)::+, op::AddSolid, $fill, false),
            TriBlendMode::Add => fill_or_texture!($($func)::+, op::Add, $fill, false),
            TriBlendMode::Sub => fill_or_texture!($($func)::+, op::Sub, $fill, false),
            TriBlendMode::RevSub => fill_or_texture!($($func)::+, op::RevSub, $fill, false),
            TriBlendMode::Stencil => fill_or_texture!($($func)::+, op::Stencil, $fill, false),
            TriBlendMode::Shaded => fill_or_texture!($($func)::+, op::Shaded, $fill, false),
            TriBlendMode::TranslateCopy => {
                fill_or_texture!($($func)::+, op::Opaque, $fill, true)
            }
            TriBlendMode::TranslateAlphaBlend => {
                fill_or_texture!($($func)::+, op::Masked, $fill, true)
            }
            TriBlendMode::TranslateAdd => fill_or_texture!($($func)::+, op::Add, $fill, true),
            TriBlendMode::TranslateSub => fill_or_texture!($($func)::+, op::Sub, $fill, true),
            TriBlendMode::TranslateRevSub => {
                fill_or_texture!($($func)::+, op::RevSub, $fill, true)
            }
            TriBlendMode::AddSrcColorOneMinusSrcColor => {
                fill_or_texture!($($func)::+, op::AddSrcColor, $fill, false)
            }
            TriBlendMode::Skycap => fill_or_texture!($($func)::+, op::Skycap, $fill, false),
        }
    };
}

/// Pick the instantiation of a column kernel for a sampler.
macro_rules! sampler {
    ($($func:ident)::+, $op:ty, $sampler:expr) => {
        match $sampler {
            ColumnSampler::Texture => $($func)::+::<$op, false, false>,
            ColumnSampler::Fill => $($func)::+::<$op, true, false>,
            ColumnSampler::Translated => $($func)::+::<$op, false, true>,
        }
    };
}

/// Map a column blend operator to its operator type.
macro_rules! column_kernel {
    ($($func:ident)::+, $blend:expr, $sampler:expr) => {
        match $blend {
            ColumnBlend::Copy => sampler!($($func)::+, op::Opaque, $sampler),
            ColumnBlend::Masked => sampler!($($func)::+, op::Masked, $sampler),
            ColumnBlend::AddClamp => sampler!($($func)::+, op::Add, $sampler),
            ColumnBlend::SubClamp => sampler!($($func)::+, op::Sub, $sampler),
            ColumnBlend::RevSubClamp => sampler!($($func)::+, op::RevSub, $sampler),
            ColumnBlend::Shaded => sampler!($($func)::+, op::Shaded, $sampler),
        }
    };
}

fn triangle32_kernel(mode: TriBlendMode, fill: bool) -> TriangleKernel<u32> {
    triangle_kernel!(triangle::draw_truecolor, mode, fill)
}

fn triangle8_kernel(mode: TriBlendMode, fill: bool) -> TriangleKernel<u8> {
    triangle_kernel!(triangle::draw_indexed, mode, fill)
}

fn column32_kernel(blend: ColumnBlend, sampler: ColumnSampler) -> ColumnKernel<u32> {
    column_kernel!(column::draw_truecolor, blend, sampler)
}

fn column8_kernel(blend: ColumnBlend, sampler: ColumnSampler) -> ColumnKernel<u8> {
    column_kernel!(column::draw_indexed, blend, sampler)
}

impl DispatchTable {
    /// The process-wide table.
    pub fn get() -> &'static Self {
        &TABLE
    }

    fn build() -> Self {
        log::debug!(
            "building kernel dispatch table ({} triangle modes, {} column operators)",
            TriBlendMode::COUNT,
            ColumnBlend::COUNT
        );

        Self {
            triangle32: TriBlendMode::ALL
                .map(|mode| [triangle32_kernel(mode, false), triangle32_kernel(mode, true)]),
            triangle8: TriBlendMode::ALL
                .map(|mode| [triangle8_kernel(mode, false), triangle8_kernel(mode, true)]),
            column32: ColumnBlend::ALL
                .map(|blend| ColumnSampler::ALL.map(|sampler| column32_kernel(blend, sampler))),
            column8: ColumnBlend::ALL
                .map(|blend| ColumnSampler::ALL.map(|sampler| column8_kernel(blend, sampler))),
        }
    }

    /// The truecolor triangle kernel of `mode`, in fill or texture mode.
    pub fn triangle32(&self, mode: TriBlendMode, fill: bool) -> TriangleKernel<u32> {
        self.triangle32[mode as usize][usize::from(fill)]
    }

    /// The 8-bit triangle kernel of `mode`, in fill or texture mode.
    pub fn triangle8(&self, mode: TriBlendMode, fill: bool) -> TriangleKernel<u8> {
        self.triangle8[mode as usize][usize::from(fill)]
    }

    /// The truecolor column kernel of `blend` and `sampler`.
    pub fn column32(&self, blend: ColumnBlend, sampler: ColumnSampler) -> ColumnKernel<u32> {
        self.column32[blend as usize][sampler as usize]
    }

    /// The 8-bit column kernel of `blend` and `sampler`.
    pub fn column8(&self, blend: ColumnBlend, sampler: ColumnSampler) -> ColumnKernel<u8> {
        self.column8[blend as usize][sampler as usize]
    }
}
