// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use rayon::{ThreadPool, ThreadPoolBuilder};
use softpoly_common::Error;

use crate::dispatch::Dispatcher;
use crate::region::{Region, Regions};

/// Runs the regions of a draw in parallel on a dedicated thread pool, one region per thread.
#[derive(Debug)]
pub(crate) struct MultiThreadedDispatcher {
    thread_pool: ThreadPool,
    num_threads: u16,
}

impl MultiThreadedDispatcher {
    pub(crate) fn new(num_threads: u16) -> Result<Self, Error> {
        let num_threads = num_threads.max(1);
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(usize::from(num_threads))
            .thread_name(|i| format!("softpoly-worker-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;

        Ok(Self {
            thread_pool,
            num_threads,
        })
    }
}

impl Dispatcher for MultiThreadedDispatcher {
    fn num_workers(&self) -> u16 {
        self.num_threads
    }

    fn dispatch<P: Send>(
        &self,
        regions: &mut Regions<'_, P>,
        kernel: &(dyn Fn(&mut Region<'_, P>) + Sync),
    ) {
        self.thread_pool
            .install(|| regions.update_regions_par(kernel));
    }
}
