// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel selection and the drivers that run a kernel over every worker region.

#[cfg(feature = "multithreading")]
pub(crate) mod multi_threaded;
pub(crate) mod single_threaded;
mod table;

pub use table::{ColumnKernel, DispatchTable, TriangleKernel};

use core::fmt::Debug;

use crate::region::{Region, Regions};

pub(crate) trait Dispatcher: Debug + Send + Sync {
    /// The number of row partitions a draw is split into.
    fn num_workers(&self) -> u16;

    /// Run `kernel` once per region.
    fn dispatch<P: Send>(
        &self,
        regions: &mut Regions<'_, P>,
        kernel: &(dyn Fn(&mut Region<'_, P>) + Sync),
    );
}
