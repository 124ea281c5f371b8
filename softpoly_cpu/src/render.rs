// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic render operations.

use softpoly_common::error::Error;
use softpoly_common::framebuffer::Framebuffer;
use softpoly_common::texture::Texel;

use crate::column::{ColumnBlend, ColumnDrawArgs, ColumnSampler};
#[cfg(feature = "multithreading")]
use crate::dispatch::multi_threaded::MultiThreadedDispatcher;
use crate::dispatch::single_threaded::SingleThreadedDispatcher;
use crate::dispatch::{ColumnKernel, DispatchTable, Dispatcher, TriangleKernel};
use crate::region::{Interleave, Region, Regions};
use crate::triangle::{TriBlendMode, TriangleDrawArgs};

/// Settings of a [`RenderContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSettings {
    /// The number of worker threads. `0` renders on the calling thread.
    ///
    /// Without the `multithreading` feature the framebuffer is still split into this many
    /// row partitions, but they all run on the calling thread.
    pub num_threads: u16,
}

/// A destination pixel format.
pub trait Pixel: Texel + Default {
    /// Whether draws into this format must have the truecolor flag set.
    const TRUECOLOR: bool;

    /// The triangle kernel of `mode` for this format.
    fn triangle_kernel(
        table: &DispatchTable,
        mode: TriBlendMode,
        fill: bool,
    ) -> TriangleKernel<Self>;

    /// The column kernel of `blend` and `sampler` for this format.
    fn column_kernel(
        table: &DispatchTable,
        blend: ColumnBlend,
        sampler: ColumnSampler,
    ) -> ColumnKernel<Self>;
}

impl Pixel for u32 {
    const TRUECOLOR: bool = true;

    fn triangle_kernel(
        table: &DispatchTable,
        mode: TriBlendMode,
        fill: bool,
    ) -> TriangleKernel<Self> {
        table.triangle32(mode, fill)
    }

    fn column_kernel(
        table: &DispatchTable,
        blend: ColumnBlend,
        sampler: ColumnSampler,
    ) -> ColumnKernel<Self> {
        table.column32(blend, sampler)
    }
}

impl Pixel for u8 {
    const TRUECOLOR: bool = false;

    fn triangle_kernel(
        table: &DispatchTable,
        mode: TriBlendMode,
        fill: bool,
    ) -> TriangleKernel<Self> {
        table.triangle8(mode, fill)
    }

    fn column_kernel(
        table: &DispatchTable,
        blend: ColumnBlend,
        sampler: ColumnSampler,
    ) -> ColumnKernel<Self> {
        table.column8(blend, sampler)
    }
}

#[derive(Debug)]
enum Workers {
    Single(SingleThreadedDispatcher),
    #[cfg(feature = "multithreading")]
    Multi(MultiThreadedDispatcher),
}

impl Workers {
    fn num_workers(&self) -> u16 {
        match self {
            Self::Single(d) => d.num_workers(),
            #[cfg(feature = "multithreading")]
            Self::Multi(d) => d.num_workers(),
        }
    }

    fn dispatch<P: Send>(
        &self,
        regions: &mut Regions<'_, P>,
        kernel: &(dyn Fn(&mut Region<'_, P>) + Sync),
    ) {
        match self {
            Self::Single(d) => d.dispatch(regions, kernel),
            #[cfg(feature = "multithreading")]
            Self::Multi(d) => d.dispatch(regions, kernel),
        }
    }
}

/// A render context.
///
/// The context owns the worker threads. Every draw selects its kernel from the
/// [`DispatchTable`], splits the framebuffer into one row partition per worker and runs the
/// kernel on all partitions before returning.
#[derive(Debug)]
pub struct RenderContext {
    settings: RenderSettings,
    workers: Workers,
}

impl RenderContext {
    /// Create a new render context.
    pub fn new(settings: RenderSettings) -> Result<Self, Error> {
        let workers = Self::workers(settings)?;
        log::debug!(
            "created render context with {} row partition(s)",
            workers.num_workers()
        );

        Ok(Self { settings, workers })
    }

    #[cfg(feature = "multithreading")]
    fn workers(settings: RenderSettings) -> Result<Workers, Error> {
        Ok(match settings.num_threads {
            0 => Workers::Single(SingleThreadedDispatcher::new(1)),
            n => Workers::Multi(MultiThreadedDispatcher::new(n)?),
        })
    }

    #[cfg(not(feature = "multithreading"))]
    fn workers(settings: RenderSettings) -> Result<Workers, Error> {
        if settings.num_threads > 0 {
            log::debug!(
                "multithreading is disabled, running {} partitions on the calling thread",
                settings.num_threads
            );
        }
        Ok(Workers::Single(SingleThreadedDispatcher::new(
            settings.num_threads,
        )))
    }

    /// The settings the context was created with.
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// The number of row partitions each draw is split into.
    pub fn num_workers(&self) -> u16 {
        self.workers.num_workers()
    }

    /// Draw the coverage of one triangle.
    ///
    /// `fill` selects the solid color of the uniforms instead of the bound texture.
    pub fn draw_triangle<P: Pixel>(
        &self,
        framebuffer: &mut Framebuffer<P>,
        mode: TriBlendMode,
        fill: bool,
        args: &TriangleDrawArgs<'_>,
    ) -> Result<(), Error> {
        check_format::<P>(args.uniforms.is_truecolor())?;
        args.validate(mode, fill)?;

        log::trace!(
            "triangle {mode:?} (fill: {fill}): {} spans, {} blocks, {} partition(s)",
            args.spans.len(),
            args.blocks.len(),
            self.num_workers()
        );

        if args.spans.is_empty() && args.blocks.is_empty() {
            return Ok(());
        }

        let kernel = P::triangle_kernel(DispatchTable::get(), mode, fill);
        let mut regions =
            Regions::from_framebuffer(framebuffer, self.num_workers(), Interleave::BlockRows);
        self.workers
            .dispatch(&mut regions, &|region: &mut Region<'_, P>| kernel(args, region));

        Ok(())
    }

    /// Draw one sprite column.
    pub fn draw_column<P: Pixel>(
        &self,
        framebuffer: &mut Framebuffer<P>,
        blend: ColumnBlend,
        sampler: ColumnSampler,
        args: &ColumnDrawArgs<'_>,
    ) -> Result<(), Error> {
        check_format::<P>(args.uniforms.is_truecolor())?;
        args.validate(blend, sampler)?;

        log::trace!(
            "column {blend:?} ({sampler:?}) at ({}, {}): {} pixels, {} partition(s)",
            args.dest_x,
            args.dest_y,
            args.count,
            self.num_workers()
        );

        if args.count == 0 || args.dest_x >= framebuffer.width() {
            return Ok(());
        }

        let kernel = P::column_kernel(DispatchTable::get(), blend, sampler);
        let mut regions =
            Regions::from_framebuffer(framebuffer, self.num_workers(), Interleave::Rows);
        self.workers
            .dispatch(&mut regions, &|region: &mut Region<'_, P>| kernel(args, region));

        Ok(())
    }
}

fn check_format<P: Pixel>(truecolor: bool) -> Result<(), Error> {
    if truecolor == P::TRUECOLOR {
        return Ok(());
    }

    Err(Error::PixelFormatMismatch {
        expected: if truecolor { "truecolor" } else { "8-bit" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use softpoly_common::uniforms::{DrawFlags, Uniforms};

    #[test]
    fn default_settings_are_single_threaded() {
        let ctx = RenderContext::new(RenderSettings::default()).unwrap();
        assert_eq!(ctx.num_workers(), 1);
        assert_eq!(ctx.settings().num_threads, 0);
    }

    #[test]
    fn partitions_follow_thread_count() {
        let ctx = RenderContext::new(RenderSettings { num_threads: 3 }).unwrap();
        assert_eq!(ctx.num_workers(), 3);
    }

    #[test]
    fn format_mismatch() {
        assert!(check_format::<u32>(true).is_ok());
        assert!(check_format::<u8>(false).is_ok());
        assert_eq!(
            check_format::<u8>(true).unwrap_err(),
            Error::PixelFormatMismatch {
                expected: "truecolor"
            }
        );

        let ctx = RenderContext::new(RenderSettings::default()).unwrap();
        let mut fb = Framebuffer::<u32>::new(4, 4);
        let uniforms = Uniforms {
            flags: DrawFlags::empty(),
            ..Default::default()
        };
        let args = ColumnDrawArgs::new(uniforms, 0, 0, 4);
        assert_eq!(
            ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Fill, &args)
                .unwrap_err(),
            Error::PixelFormatMismatch { expected: "8-bit" }
        );
    }
}
