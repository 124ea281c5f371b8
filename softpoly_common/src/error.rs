// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported while building draw resources.
//!
//! The kernels themselves never fail. Everything that could make a draw invalid is checked
//! here, once, before a kernel is selected.

use thiserror::Error;

/// Errors that can occur while constructing textures, tables, framebuffers or draw arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A texture, or the texture of a sprite column, has a width or height of zero.
    #[error("Zero-sized texture ({width}x{height})")]
    ZeroSized {
        /// The requested width.
        width: u32,
        /// The requested height.
        height: u32,
    },
    /// The pixel data does not match the declared dimensions.
    #[error("Expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// The number of elements implied by the dimensions.
        expected: usize,
        /// The number of elements that were supplied.
        actual: usize,
    },
    /// The row pitch of a framebuffer is smaller than its width.
    #[error("Pitch {pitch} is smaller than width {width}")]
    InvalidPitch {
        /// The requested pitch, in pixels.
        pitch: u32,
        /// The framebuffer width, in pixels.
        width: u32,
    },
    /// The truecolor flag of a draw does not match the pixel format of the framebuffer.
    #[error("Draw targets a {expected} framebuffer")]
    PixelFormatMismatch {
        /// The pixel format the draw's flags select.
        expected: &'static str,
    },
    /// The worker thread pool could not be started.
    #[error("Failed to start worker threads: {0}")]
    ThreadPool(String),
    /// A resource required by the selected drawing mode was not supplied.
    #[error("Missing {0} for the selected drawing mode")]
    MissingResource(&'static str),
}
