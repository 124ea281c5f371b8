// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simple framebuffer type.

use crate::error::Error;
use crate::texture::Texel;

/// A destination buffer of 8-bit palette indices (`Framebuffer<u8>`) or packed `0xAARRGGBB`
/// colors (`Framebuffer<u32>`).
///
/// Rows are `pitch` pixels apart; only the first `width` pixels of each row are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer<P> {
    /// Width of the framebuffer in pixels.
    width: u16,
    /// Height of the framebuffer in pixels.
    height: u16,
    /// Distance between two rows, in pixels.
    pitch: u32,
    /// Buffer of the framebuffer, row-major.
    buf: Vec<P>,
}

impl<P: Texel + Default> Framebuffer<P> {
    /// Create a new framebuffer with the given width and height in pixels.
    ///
    /// All pixels are initialized to zero, i.e. transparent black or palette index 0.
    pub fn new(width: u16, height: u16) -> Self {
        let buf = vec![P::default(); usize::from(width) * usize::from(height)];
        Self {
            width,
            height,
            pitch: u32::from(width),
            buf,
        }
    }

    /// Create a new framebuffer with the given data.
    ///
    /// The `data` vector must hold `pitch * height` pixels, with `pitch >= width`.
    pub fn from_parts(data: Vec<P>, width: u16, height: u16, pitch: u32) -> Result<Self, Error> {
        if pitch < u32::from(width) {
            return Err(Error::InvalidPitch {
                pitch,
                width: u32::from(width),
            });
        }

        let expected = pitch as usize * usize::from(height);
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pitch,
            buf: data,
        })
    }

    /// Return the width of the framebuffer.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Return the height of the framebuffer.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Return the row pitch of the framebuffer, in pixels.
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Fill every pixel with `value`.
    pub fn fill(&mut self, value: P) {
        self.buf.fill(value);
    }

    /// Returns a reference to the underlying data.
    pub fn data(&self) -> &[P] {
        &self.buf
    }

    /// Returns a mutable reference to the underlying data.
    pub fn data_mut(&mut self) -> &mut [P] {
        &mut self.buf
    }

    /// Returns the underlying data as bytes.
    pub fn data_as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buf)
    }

    /// Returns the visible part of row `y`.
    pub fn row(&self, y: u16) -> &[P] {
        let start = usize::from(y) * self.pitch as usize;
        &self.buf[start..][..usize::from(self.width)]
    }

    /// Sample a pixel from the framebuffer.
    #[inline(always)]
    pub fn sample(&self, x: u16, y: u16) -> P {
        self.row(y)[usize::from(x)]
    }

    /// Set a single pixel.
    pub fn set_pixel(&mut self, x: u16, y: u16, value: P) {
        let idx = usize::from(y) * self.pitch as usize + usize::from(x);
        self.buf[idx] = value;
    }

    /// Consume the framebuffer, returning its pixels.
    pub fn take(self) -> Vec<P> {
        self.buf
    }
}
