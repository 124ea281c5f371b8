// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-space gradients for perspective-correct interpolation.
//!
//! A triangle's `1/w` and each of its varyings (pre-multiplied by `1/w`) are affine functions of
//! the screen position. The [`GradientSet`] captures the plane of each of them as a value at a
//! reference pixel plus a per-axis rate of change, which is all the kernels ever need.

use core::ops::{Add, AddAssign, Mul};

/// The number of varyings carried by a vertex: texture U and texture V.
pub const NUM_VARYING: usize = 2;

/// A projected vertex, as produced by the triangle setup stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex<const N: usize = NUM_VARYING> {
    /// Screen-space x coordinate.
    pub x: f32,
    /// Screen-space y coordinate.
    pub y: f32,
    /// The perspective depth reciprocal. This is the value that is interpolated linearly.
    pub w: f32,
    /// The varyings, not yet multiplied by `w`.
    pub varying: [f32; N],
}

impl<const N: usize> Vertex<N> {
    /// Create a new vertex.
    pub fn new(x: f32, y: f32, w: f32, varying: [f32; N]) -> Self {
        Self { x, y, w, varying }
    }
}

/// The interpolated state at one point: `1/w` and the varyings multiplied by `1/w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step<const N: usize = NUM_VARYING> {
    /// The interpolated `1/w`.
    pub w: f32,
    /// The interpolated `varying * (1/w)` values.
    pub varying: [f32; N],
}

impl<const N: usize> Step<N> {
    /// The perspective-divided state of a vertex.
    pub fn of_vertex(v: &Vertex<N>) -> Self {
        Self {
            w: v.w,
            varying: v.varying.map(|c| c * v.w),
        }
    }
}

impl<const N: usize> Add for Step<N> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            w: self.w + rhs.w,
            varying: core::array::from_fn(|i| self.varying[i] + rhs.varying[i]),
        }
    }
}

impl<const N: usize> AddAssign for Step<N> {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const N: usize> Mul<f32> for Step<N> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        Self {
            w: self.w * rhs,
            varying: self.varying.map(|c| c * rhs),
        }
    }
}

/// The gradients of a triangle, plus the interpolated state at its reference pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientSet<const N: usize = NUM_VARYING> {
    /// The x coordinate of the reference pixel.
    pub start_x: i32,
    /// The y coordinate of the reference pixel.
    pub start_y: i32,
    /// The interpolated state at the reference pixel.
    pub start: Step<N>,
    /// The change of the state per pixel in x direction.
    pub grad_x: Step<N>,
    /// The change of the state per pixel in y direction.
    pub grad_y: Step<N>,
}

impl<const N: usize> GradientSet<N> {
    /// Solve the gradients for a triangle, using `(start_x, start_y)` as the reference pixel.
    ///
    /// The triangle must not be degenerate. No validation happens here: collinear vertices
    /// yield infinite or NaN gradients, which is a contract violation of the caller.
    pub fn new(vertices: &[Vertex<N>; 3], start_x: i32, start_y: i32) -> Self {
        let [v0, v1, v2] = vertices;

        if cfg!(debug_assertions) {
            let area = (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y);
            if area == 0.0 || !area.is_finite() {
                log::warn!("gradient solver invoked on a degenerate triangle");
            }
        }

        let c = vertices.map(|v| Step::of_vertex(&v));

        let grad_x = Step {
            w: gradient_x(v0, v1, v2, c[0].w, c[1].w, c[2].w),
            varying: core::array::from_fn(|i| {
                gradient_x(v0, v1, v2, c[0].varying[i], c[1].varying[i], c[2].varying[i])
            }),
        };
        let grad_y = Step {
            w: gradient_y(v0, v1, v2, c[0].w, c[1].w, c[2].w),
            varying: core::array::from_fn(|i| {
                gradient_y(v0, v1, v2, c[0].varying[i], c[1].varying[i], c[2].varying[i])
            }),
        };

        let dx = start_x as f32 - v0.x;
        let dy = start_y as f32 - v0.y;
        let start = c[0] + grad_x * dx + grad_y * dy;

        Self {
            start_x,
            start_y,
            start,
            grad_x,
            grad_y,
        }
    }

    /// Evaluate the interpolated state at pixel `(x, y)`.
    #[inline(always)]
    pub fn at(&self, x: i32, y: i32) -> Step<N> {
        self.start
            + self.grad_x * (x - self.start_x) as f32
            + self.grad_y * (y - self.start_y) as f32
    }

    /// Evaluate the interpolated state at a fractional position.
    pub fn at_point(&self, x: f32, y: f32) -> Step<N> {
        self.start
            + self.grad_x * (x - self.start_x as f32)
            + self.grad_y * (y - self.start_y as f32)
    }
}

#[inline(always)]
fn gradient_x<const N: usize>(
    v0: &Vertex<N>,
    v1: &Vertex<N>,
    v2: &Vertex<N>,
    c0: f32,
    c1: f32,
    c2: f32,
) -> f32 {
    let top = (c1 - c2) * (v0.y - v2.y) - (c0 - c2) * (v1.y - v2.y);
    let bottom = (v1.x - v2.x) * (v0.y - v2.y) - (v0.x - v2.x) * (v1.y - v2.y);
    top / bottom
}

#[inline(always)]
fn gradient_y<const N: usize>(
    v0: &Vertex<N>,
    v1: &Vertex<N>,
    v2: &Vertex<N>,
    c0: f32,
    c1: f32,
    c2: f32,
) -> f32 {
    let top = (c1 - c2) * (v0.x - v2.x) - (c0 - c2) * (v1.x - v2.x);
    let bottom = (v0.x - v2.x) * (v1.y - v2.y) - (v1.x - v2.x) * (v0.y - v2.y);
    top / bottom
}
