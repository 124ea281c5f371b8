// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate includes the data model shared by the softpoly kernels: projected vertices and the
//! gradient solver, the light attenuation curve, coverage spans and blocks, per-draw uniforms,
//! texture and palette views, and the destination framebuffer.
//!
//! # Usage
//!
//! This crate should not be used on its own, and you should instead use [`softpoly_cpu`][softpoly_cpu],
//! which contains the rasterization kernels that consume these types.
//!
//! # Contents
//!
//! - [`gradient`]: screen-space gradients of `1/w` and the perspective-divided varyings.
//! - [`light`]: the light falloff curve shared by the triangle and sprite column kernels.
//! - [`coverage`]: full 8×8 spans and partially covered blocks.
//! - [`uniforms`]: per-draw constants and flag bits.
//! - [`texture`]: column-major textures, palettes, colormaps and translation tables.
//! - [`framebuffer`]: the 8-bit or 32-bit destination buffer.
//!
//! [softpoly_cpu]: https://crates.io/crates/softpoly_cpu
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
    reason = "Fixed-point conversions truncate on purpose, and pixel coordinates always fit into u16."
)]

pub mod coverage;
pub mod error;
pub mod framebuffer;
pub mod gradient;
pub mod light;
pub mod texture;
pub mod uniforms;

pub use error::Error;
