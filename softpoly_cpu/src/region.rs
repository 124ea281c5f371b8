// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a single mutable framebuffer into per-worker regions that can be accessed
//! concurrently.
//!
//! Rows are dealt out round-robin in groups: worker `core` of `num_cores` owns every row `y`
//! with `(y / group_height) % num_cores == core`. Triangles use groups of one block row so that
//! every coverage span and block belongs to exactly one worker; columns use single rows.

use softpoly_common::coverage::BLOCK_SIZE;
use softpoly_common::framebuffer::Framebuffer;
use softpoly_common::texture::Texel;

/// How rows are interleaved between workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interleave {
    /// Groups of [`BLOCK_SIZE`] rows, for triangles.
    BlockRows,
    /// Single rows, for columns.
    Rows,
}

impl Interleave {
    fn group_height(self) -> u16 {
        match self {
            Self::BlockRows => BLOCK_SIZE,
            Self::Rows => 1,
        }
    }
}

#[derive(Debug)]
pub struct Regions<'a, P> {
    regions: Vec<Region<'a, P>>,
}

impl<'a, P> Regions<'a, P> {
    /// Split `buffer` (rows of `pitch` pixels, `width` of them visible) between `num_cores`
    /// workers.
    pub fn new(
        buffer: &'a mut [P],
        width: u16,
        height: u16,
        pitch: u32,
        num_cores: u16,
        interleave: Interleave,
    ) -> Self {
        let num_cores = num_cores.max(1);
        let group_height = interleave.group_height();
        let width = usize::from(width);

        let mut regions: Vec<_> = (0..num_cores)
            .map(|core| Region {
                core,
                num_cores,
                group_height,
                rows: Vec::with_capacity(usize::from(height) / usize::from(num_cores) + 1),
            })
            .collect();

        for (y, row) in buffer
            .chunks_mut((pitch as usize).max(1))
            .take(usize::from(height))
            .enumerate()
        {
            let core = (y / usize::from(group_height)) % usize::from(num_cores);
            let visible = width.min(row.len());
            regions[core].rows.push(&mut row[..visible]);
        }

        Self { regions }
    }

    /// The number of regions, one per worker.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether there are no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Apply the given function to each region. The functions will be applied
    /// in parallel in the current threadpool.
    #[cfg(feature = "multithreading")]
    pub fn update_regions_par(&mut self, func: impl Fn(&mut Region<'_, P>) + Send + Sync)
    where
        P: Send,
    {
        use rayon::iter::ParallelIterator;
        use rayon::prelude::IntoParallelRefMutIterator;

        self.regions.par_iter_mut().for_each(func);
    }

    /// Apply the given function to each region.
    pub fn update_regions(&mut self, func: impl FnMut(&mut Region<'_, P>)) {
        self.regions.iter_mut().for_each(func);
    }
}

impl<'a, P: Texel + Default> Regions<'a, P> {
    /// Split the visible area of a framebuffer.
    pub fn from_framebuffer(
        framebuffer: &'a mut Framebuffer<P>,
        num_cores: u16,
        interleave: Interleave,
    ) -> Self {
        let (width, height) = (framebuffer.width(), framebuffer.height());
        let pitch = framebuffer.pitch();
        Self::new(framebuffer.data_mut(), width, height, pitch, num_cores, interleave)
    }
}

/// The rows of the framebuffer owned by one worker.
#[derive(Debug)]
pub struct Region<'a, P> {
    core: u16,
    num_cores: u16,
    group_height: u16,
    rows: Vec<&'a mut [P]>,
}

impl<P> Region<'_, P> {
    /// The index of the worker owning this region.
    pub fn core(&self) -> u16 {
        self.core
    }

    /// The total number of workers.
    pub fn num_cores(&self) -> u16 {
        self.num_cores
    }

    /// Whether row `y` belongs to this region.
    #[inline(always)]
    pub fn owns_row(&self, y: u16) -> bool {
        (y / self.group_height) % self.num_cores == self.core
    }

    /// The visible pixels of row `y`, if it belongs to this region and is inside the
    /// framebuffer.
    #[inline(always)]
    pub fn row_mut(&mut self, y: u16) -> Option<&mut [P]> {
        if !self.owns_row(y) {
            return None;
        }

        let group = y / self.group_height;
        let local = usize::from(group / self.num_cores) * usize::from(self.group_height)
            + usize::from(y % self.group_height);
        self.rows.get_mut(local).map(|row| &mut **row)
    }

    /// The number of rows before the first row of this region, counting from `first`.
    ///
    /// Only meaningful for single-row interleaving.
    #[inline]
    pub fn skipped_by_thread(&self, first: u32) -> u32 {
        let n = u32::from(self.num_cores);
        (u32::from(self.core) + n - first % n) % n
    }

    /// The number of rows of `first..first + count` that belong to this region.
    ///
    /// Only meaningful for single-row interleaving.
    #[inline]
    pub fn count_for_thread(&self, first: u32, count: u32) -> u32 {
        let n = u32::from(self.num_cores);
        let skipped = self.skipped_by_thread(first);
        (count.saturating_sub(skipped) + n - 1) / n
    }
}
