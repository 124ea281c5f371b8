// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only sampling resources: textures, palettes, colormaps.
//!
//! Textures are stored column-major (`x * height + y`), which is how the software renderer
//! lays out wall and sprite patches so that vertical columns are contiguous.

use crate::error::Error;
use crate::light::NUM_COLORMAPS;

/// The number of entries of the RGB to palette index lookup table (64 levels per channel).
pub const RGB_LUT_SIZE: usize = 64 * 64 * 64;

/// A texel type: a packed `0xAARRGGBB` color or an 8-bit palette index.
pub trait Texel: bytemuck::Pod + Send + Sync + 'static {
    /// Zero-extend the texel to 32 bits.
    fn to_u32(self) -> u32;
}

impl Texel for u8 {
    #[inline(always)]
    fn to_u32(self) -> u32 {
        u32::from(self)
    }
}

impl Texel for u32 {
    #[inline(always)]
    fn to_u32(self) -> u32 {
        self
    }
}

/// A borrowed, column-major texture.
#[derive(Debug, Clone, Copy)]
pub struct Texture<'a, T> {
    pixels: &'a [T],
    width: u32,
    height: u32,
}

impl<'a, T: Texel> Texture<'a, T> {
    /// Create a texture view over column-major `pixels`.
    pub fn new(pixels: &'a [T], width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroSized { width, height });
        }

        let expected = width as usize * height as usize;
        if pixels.len() < expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            pixels: &pixels[..expected],
            width,
            height,
        })
    }

    /// The width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All texels, column-major.
    pub fn pixels(&self) -> &'a [T] {
        self.pixels
    }

    /// The texel at `(x, y)`.
    #[inline(always)]
    pub fn texel(&self, x: u32, y: u32) -> T {
        debug_assert!(x < self.width && y < self.height, "texel out of bounds");
        self.pixels[x as usize * self.height as usize + y as usize]
    }

    /// Column `x` of the texture.
    pub fn column(&self, x: u32) -> &'a [T] {
        let h = self.height as usize;
        &self.pixels[x as usize * h..][..h]
    }
}

/// The texture bound to a draw call.
#[derive(Debug, Clone, Copy)]
pub enum TextureRef<'a> {
    /// Packed `0xAARRGGBB` texels.
    Bgra(Texture<'a, u32>),
    /// Palette indices, or alpha values for the shaded blend.
    Indexed(Texture<'a, u8>),
}

impl<'a> TextureRef<'a> {
    /// The truecolor texture, if that is what is bound.
    pub fn bgra(self) -> Option<Texture<'a, u32>> {
        match self {
            Self::Bgra(t) => Some(t),
            Self::Indexed(_) => None,
        }
    }

    /// The indexed texture, if that is what is bound.
    pub fn indexed(self) -> Option<Texture<'a, u8>> {
        match self {
            Self::Indexed(t) => Some(t),
            Self::Bgra(_) => None,
        }
    }
}

/// A translation table remapping palette indices, to a color or to another index.
#[derive(Debug, Clone, Copy)]
pub enum Translation<'a> {
    /// Remap indices to packed `0xAARRGGBB` colors.
    Bgra(&'a [u32; 256]),
    /// Remap indices to other indices.
    Indexed(&'a [u8; 256]),
}

impl<'a> Translation<'a> {
    /// The truecolor table, if that is what is bound.
    pub fn bgra(self) -> Option<&'a [u32; 256]> {
        match self {
            Self::Bgra(t) => Some(t),
            Self::Indexed(_) => None,
        }
    }

    /// The indexed table, if that is what is bound.
    pub fn indexed(self) -> Option<&'a [u8; 256]> {
        match self {
            Self::Indexed(t) => Some(t),
            Self::Bgra(_) => None,
        }
    }
}

/// An 8-bit palette: the base color of each index, and the reverse lookup from a color back
/// to the closest index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    base_colors: Box<[u32; 256]>,
    rgb_lut: Vec<u8>,
}

impl Palette {
    /// Create a palette from its base colors (`0xAARRGGBB`, alpha ignored) and a lookup table of
    /// [`RGB_LUT_SIZE`] entries indexed by `((r >> 2) * 64 + (g >> 2)) * 64 + (b >> 2)`.
    pub fn new(base_colors: [u32; 256], rgb_lut: Vec<u8>) -> Result<Self, Error> {
        if rgb_lut.len() != RGB_LUT_SIZE {
            return Err(Error::LengthMismatch {
                expected: RGB_LUT_SIZE,
                actual: rgb_lut.len(),
            });
        }

        Ok(Self {
            base_colors: Box::new(base_colors),
            rgb_lut,
        })
    }

    /// Create a palette, computing the reverse lookup table by nearest color search.
    ///
    /// This visits every entry of the table for every palette color, so it belongs in
    /// asset loading rather than anywhere near a frame.
    pub fn from_base_colors(base_colors: [u32; 256]) -> Self {
        let channels = base_colors.map(|c| {
            [
                ((c >> 16) & 0xff) as i32,
                ((c >> 8) & 0xff) as i32,
                (c & 0xff) as i32,
            ]
        });

        let mut rgb_lut = vec![0_u8; RGB_LUT_SIZE];
        for (i, entry) in rgb_lut.iter_mut().enumerate() {
            // Center of the 4×4×4 cell.
            let r = ((i >> 12) & 63) as i32 * 4 + 2;
            let g = ((i >> 6) & 63) as i32 * 4 + 2;
            let b = (i & 63) as i32 * 4 + 2;

            let mut best = 0;
            let mut best_dist = i32::MAX;
            for (index, [pr, pg, pb]) in channels.iter().enumerate() {
                let dist = (pr - r).pow(2) + (pg - g).pow(2) + (pb - b).pow(2);
                if dist < best_dist {
                    best = index;
                    best_dist = dist;
                }
            }
            *entry = best as u8;
        }

        Self {
            base_colors: Box::new(base_colors),
            rgb_lut,
        }
    }

    /// The base colors.
    pub fn base_colors(&self) -> &[u32; 256] {
        &self.base_colors
    }

    /// The color of a palette index, with alpha forced to 255.
    #[inline(always)]
    pub fn to_bgra(&self, index: u8) -> u32 {
        self.base_colors[usize::from(index)] | 0xff00_0000
    }

    /// The palette index closest to a color. Channels are clamped to 0..=255.
    #[inline(always)]
    pub fn to_index(&self, r: i32, g: i32, b: i32) -> u8 {
        let r = r.clamp(0, 255) as usize >> 2;
        let g = g.clamp(0, 255) as usize >> 2;
        let b = b.clamp(0, 255) as usize >> 2;
        self.rgb_lut[(r * 64 + g) * 64 + b]
    }
}

/// Light-level indexed remapping tables for 8-bit rendering.
///
/// Level 0 is full brightness, level [`NUM_COLORMAPS`]` - 1` the darkest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colormap {
    data: Vec<u8>,
}

impl Colormap {
    /// Create a colormap from `NUM_COLORMAPS * 256` entries. Extra trailing maps (e.g. an
    /// invulnerability map) are kept but never selected by light.
    pub fn new(data: Vec<u8>) -> Result<Self, Error> {
        let expected = NUM_COLORMAPS * 256;
        if data.len() < expected || data.len() % 256 != 0 {
            return Err(Error::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self { data })
    }

    /// Build a colormap that fades every palette color towards black.
    pub fn from_palette(palette: &Palette) -> Self {
        let mut data = Vec::with_capacity(NUM_COLORMAPS * 256);

        for level in 0..NUM_COLORMAPS as i32 {
            let scale = NUM_COLORMAPS as i32 - level;
            for index in 0..=255 {
                let c = palette.to_bgra(index);
                let r = ((c >> 16) & 0xff) as i32 * scale / NUM_COLORMAPS as i32;
                let g = ((c >> 8) & 0xff) as i32 * scale / NUM_COLORMAPS as i32;
                let b = (c & 0xff) as i32 * scale / NUM_COLORMAPS as i32;
                data.push(palette.to_index(r, g, b));
            }
        }

        Self { data }
    }

    /// The remapping table of a light level.
    #[inline(always)]
    pub fn level(&self, index: usize) -> &[u8] {
        &self.data[index * 256..][..256]
    }
}
