// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::dispatch::Dispatcher;
use crate::region::{Region, Regions};

/// Runs every region on the calling thread, one after the other.
///
/// The framebuffer can still be partitioned into several regions, which produces the same
/// output as running those regions on separate threads.
#[derive(Debug)]
pub(crate) struct SingleThreadedDispatcher {
    num_workers: u16,
}

impl SingleThreadedDispatcher {
    pub(crate) fn new(num_workers: u16) -> Self {
        Self {
            num_workers: num_workers.max(1),
        }
    }
}

impl Dispatcher for SingleThreadedDispatcher {
    fn num_workers(&self) -> u16 {
        self.num_workers
    }

    fn dispatch<P: Send>(
        &self,
        regions: &mut Regions<'_, P>,
        kernel: &(dyn Fn(&mut Region<'_, P>) + Sync),
    ) {
        regions.update_regions(kernel);
    }
}
