// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate implements the pixel kernels of a CPU software rasterizer: textured, lit and
//! blended triangles, and sprite columns, written to an 8-bit indexed or a 32-bit BGRA
//! framebuffer.
//!
//! Triangle setup, clipping and coverage generation happen elsewhere. A triangle arrives here
//! as its three projected vertices plus a list of fully covered 8×8 spans and partially
//! covered blocks, each with two 32-bit coverage masks of four rows. A sprite column arrives
//! as a texture column, a start position, a step and a pixel count.
//!
//! Every combination of pixel format, blend operator and sampling mode is its own
//! monomorphized kernel, registered in the [`DispatchTable`](dispatch::DispatchTable) so that
//! nothing is decided per pixel. A [`RenderContext`] validates a draw, looks up its kernel and
//! runs it on every worker's row partition of the framebuffer.
//!
//! # Example
//!
//! ```
//! use softpoly_common::coverage::CoverageSpan;
//! use softpoly_common::framebuffer::Framebuffer;
//! use softpoly_common::gradient::Vertex;
//! use softpoly_common::uniforms::Uniforms;
//! use softpoly_cpu::triangle::{TriBlendMode, TriangleDrawArgs};
//! use softpoly_cpu::{RenderContext, RenderSettings};
//!
//! let ctx = RenderContext::new(RenderSettings::default()).unwrap();
//! let mut framebuffer = Framebuffer::<u32>::new(16, 8);
//!
//! let vertices = [
//!     Vertex::new(0.0, 0.0, 1.0, [0.0, 0.0]),
//!     Vertex::new(16.0, 0.0, 1.0, [1.0, 0.0]),
//!     Vertex::new(0.0, 8.0, 1.0, [0.0, 1.0]),
//! ];
//! let spans = [CoverageSpan::new(0, 0, 2)];
//! let uniforms = Uniforms {
//!     color: 0xff20_4060,
//!     ..Default::default()
//! };
//! let args = TriangleDrawArgs::new(uniforms, &vertices, &spans, &[]);
//!
//! ctx.draw_triangle(&mut framebuffer, TriBlendMode::Copy, true, &args)
//!     .unwrap();
//! assert_eq!(framebuffer.sample(15, 7), 0xff20_4060);
//! ```
//!
//! # Features
//!
//! - `multithreading`: run the row partitions of a draw on a `rayon` thread pool.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![expect(
    clippy::cast_possible_truncation,
    reason = "Fixed-point math narrows on purpose, and pixel coordinates always fit into u16."
)]

mod render;
mod util;

pub mod column;
pub mod dispatch;
pub(crate) mod fine;
pub mod region;
pub mod triangle;

pub use render::{Pixel, RenderContext, RenderSettings};
pub use softpoly_common::framebuffer::Framebuffer;
