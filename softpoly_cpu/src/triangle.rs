// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The triangle pixel kernel.
//!
//! The kernel first walks the fully covered spans, then the partially covered blocks. Both are
//! processed row by row in groups of eight pixels: `1/w` is divided out once per group at the
//! group's right edge, and the texture coordinates and light fraction in between are linearly
//! interpolated from the previous group's end.

use core::array;

use softpoly_common::coverage::{CoverageBlock, CoverageSpan, BLOCK_SIZE, MASK_ROWS};
use softpoly_common::gradient::{GradientSet, Step, Vertex, NUM_VARYING};
use softpoly_common::light::Attenuation;
use softpoly_common::texture::{Colormap, Palette, TextureRef, Translation};
use softpoly_common::uniforms::Uniforms;
use softpoly_common::Error;

use crate::fine::op::{BlendOp, Constants, PaletteTables};
use crate::fine::sample::{Bilinear, Nearest, Solid, Source, Translated};
use crate::fine::shade::{Advanced, Simple};
use crate::fine::{Indexed, PixelProgram, Truecolor};
use crate::region::Region;

/// Scale of the divided varyings: texture coordinates are 8.24 fixed point.
const RCP_SCALE: f32 = 16_777_216.0;

/// The number of pixels sharing one division.
const GROUP: usize = 8;

/// The blend modes of triangle draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriBlendMode {
    /// Opaque copy.
    Copy,
    /// "Over" with the texel's alpha.
    AlphaBlend,
    /// "Over" with the source alpha constant.
    AddSolid,
    /// Additive blending.
    Add,
    /// Background minus foreground.
    Sub,
    /// Foreground minus background.
    RevSub,
    /// The fill color painted through the texel's alpha.
    Stencil,
    /// The fill color painted through an alpha read from an indexed texture.
    Shaded,
    /// [`TriBlendMode::Copy`] through a translation table.
    TranslateCopy,
    /// [`TriBlendMode::AlphaBlend`] through a translation table.
    TranslateAlphaBlend,
    /// [`TriBlendMode::Add`] through a translation table.
    TranslateAdd,
    /// [`TriBlendMode::Sub`] through a translation table.
    TranslateSub,
    /// [`TriBlendMode::RevSub`] through a translation table.
    TranslateRevSub,
    /// Each channel weighted by its own value.
    AddSrcColorOneMinusSrcColor,
    /// Sky texture faded towards the fill color at its top and bottom.
    Skycap,
}

impl TriBlendMode {
    /// The number of blend modes.
    pub const COUNT: usize = 15;

    /// All blend modes, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Copy,
        Self::AlphaBlend,
        Self::AddSolid,
        Self::Add,
        Self::Sub,
        Self::RevSub,
        Self::Stencil,
        Self::Shaded,
        Self::TranslateCopy,
        Self::TranslateAlphaBlend,
        Self::TranslateAdd,
        Self::TranslateSub,
        Self::TranslateRevSub,
        Self::AddSrcColorOneMinusSrcColor,
        Self::Skycap,
    ];

    /// Whether texels are remapped through a translation table.
    pub fn is_translated(self) -> bool {
        matches!(
            self,
            Self::TranslateCopy
                | Self::TranslateAlphaBlend
                | Self::TranslateAdd
                | Self::TranslateSub
                | Self::TranslateRevSub
        )
    }

    /// Whether a truecolor draw of this mode reads an indexed texture.
    pub fn reads_indexed_texture(self) -> bool {
        self.is_translated() || self == Self::Shaded
    }
}

/// Everything a triangle draw reads.
#[derive(Debug, Clone, Copy)]
pub struct TriangleDrawArgs<'a> {
    /// The per-draw constants.
    pub uniforms: Uniforms,
    /// The gradients of the triangle.
    pub gradients: GradientSet,
    /// The fully covered spans.
    pub spans: &'a [CoverageSpan],
    /// The partially covered blocks.
    pub blocks: &'a [CoverageBlock],
    /// The texture. Not needed in fill mode.
    pub texture: Option<TextureRef<'a>>,
    /// The translation table of the translated modes.
    pub translation: Option<Translation<'a>>,
    /// The palette of 8-bit draws.
    pub palette: Option<&'a Palette>,
    /// The colormap of 8-bit draws.
    pub colormap: Option<&'a Colormap>,
}

impl<'a> TriangleDrawArgs<'a> {
    /// Create the arguments of an untextured draw, solving the gradients of `vertices`.
    pub fn new(
        uniforms: Uniforms,
        vertices: &[Vertex; 3],
        spans: &'a [CoverageSpan],
        blocks: &'a [CoverageBlock],
    ) -> Self {
        Self {
            uniforms,
            gradients: GradientSet::new(vertices, 0, 0),
            spans,
            blocks,
            texture: None,
            translation: None,
            palette: None,
            colormap: None,
        }
    }

    /// Bind a texture.
    pub fn with_texture(mut self, texture: TextureRef<'a>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Bind a translation table.
    pub fn with_translation(mut self, translation: Translation<'a>) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Bind the palette tables of an 8-bit draw.
    pub fn with_palette(mut self, palette: &'a Palette, colormap: &'a Colormap) -> Self {
        self.palette = Some(palette);
        self.colormap = Some(colormap);
        self
    }

    /// Check that the bound resources fit the kernel selected by `mode` and `fill`.
    pub fn validate(&self, mode: TriBlendMode, fill: bool) -> Result<(), Error> {
        let truecolor = self.uniforms.is_truecolor();

        if !truecolor {
            self.palette.ok_or(Error::MissingResource("palette"))?;
            self.colormap.ok_or(Error::MissingResource("colormap"))?;
        }

        if fill {
            return Ok(());
        }

        let texture = self.texture.ok_or(Error::MissingResource("texture"))?;
        if truecolor && !mode.reads_indexed_texture() {
            texture
                .bgra()
                .ok_or(Error::MissingResource("truecolor texture"))?;
        } else {
            texture
                .indexed()
                .ok_or(Error::MissingResource("indexed texture"))?;
        }

        if mode.is_translated() {
            let translation = self
                .translation
                .ok_or(Error::MissingResource("translation table"))?;
            let matches = if truecolor {
                translation.bgra().is_some()
            } else {
                translation.indexed().is_some()
            };
            if !matches {
                return Err(Error::MissingResource("translation table"));
            }
        }

        Ok(())
    }
}

fn rejected(what: &str) {
    log::warn!("skipping triangle draw: no {what} bound for the selected kernel");
}

/// The truecolor kernel entry point of blend operator `O`.
pub(crate) fn draw_truecolor<O: BlendOp, const FILL: bool, const TRANSLATED: bool>(
    args: &TriangleDrawArgs<'_>,
    region: &mut Region<'_, u32>,
) {
    let constants = Constants::from(&args.uniforms);

    if FILL {
        return shade_truecolor::<O, _>(Solid(args.uniforms.color), constants, args, region);
    }

    let Some(texture) = args.texture else {
        return rejected("texture");
    };

    if TRANSLATED {
        let (Some(texture), Some(table)) = (
            texture.indexed(),
            args.translation.and_then(Translation::bgra),
        ) else {
            return rejected("indexed texture and truecolor translation table");
        };
        shade_truecolor::<O, _>(Translated { texture, table }, constants, args, region);
    } else if O::INDEXED_TEXELS {
        let Some(texture) = texture.indexed() else {
            return rejected("indexed texture");
        };
        shade_truecolor::<O, _>(Nearest(texture), constants, args, region);
    } else {
        let Some(texture) = texture.bgra() else {
            return rejected("truecolor texture");
        };
        if args.uniforms.is_nearest_filter() {
            shade_truecolor::<O, _>(Nearest(texture), constants, args, region);
        } else {
            shade_truecolor::<O, _>(Bilinear::new(texture), constants, args, region);
        }
    }
}

fn shade_truecolor<O: BlendOp, S: Source>(
    source: S,
    constants: Constants,
    args: &TriangleDrawArgs<'_>,
    region: &mut Region<'_, u32>,
) {
    if args.uniforms.is_simple_shade() {
        rasterize(&Truecolor::<O, S, Simple>::new(source, constants), args, region);
    } else {
        rasterize(&Truecolor::<O, S, Advanced>::new(source, constants), args, region);
    }
}

/// The 8-bit kernel entry point of blend operator `O`.
pub(crate) fn draw_indexed<O: BlendOp, const FILL: bool, const TRANSLATED: bool>(
    args: &TriangleDrawArgs<'_>,
    region: &mut Region<'_, u8>,
) {
    let (Some(palette), Some(colormap)) = (args.palette, args.colormap) else {
        return rejected("palette and colormap");
    };
    let tables = PaletteTables { palette, colormap };
    let constants = Constants::from(&args.uniforms);

    if FILL {
        let source = Solid(args.uniforms.color & 0xff);
        return rasterize(&Indexed::<O, _>::new(source, constants, tables), args, region);
    }

    let Some(texture) = args.texture.and_then(TextureRef::indexed) else {
        return rejected("indexed texture");
    };

    if TRANSLATED {
        let Some(table) = args.translation.and_then(Translation::indexed) else {
            return rejected("indexed translation table");
        };
        let source = Translated { texture, table };
        rasterize(&Indexed::<O, _>::new(source, constants, tables), args, region);
    } else {
        let source = Nearest(texture);
        rasterize(&Indexed::<O, _>::new(source, constants, tables), args, region);
    }
}

/// Run `program` over every covered pixel of `region`.
pub(crate) fn rasterize<K: PixelProgram>(
    program: &K,
    args: &TriangleDrawArgs<'_>,
    region: &mut Region<'_, K::Pixel>,
) {
    let attenuation = args.uniforms.attenuation();
    full_spans(program, &args.gradients, &attenuation, args.spans, region);
    partial_blocks(program, &args.gradients, &attenuation, args.blocks, region);
}

/// The pixels `x..x + width` of a row, cut at the row's end.
#[inline(always)]
fn clip<P>(line: &mut [P], x: usize, width: usize) -> &mut [P] {
    let end = (x + width).min(line.len());
    &mut line[x.min(end)..end]
}

fn full_spans<K: PixelProgram>(
    program: &K,
    gradients: &GradientSet,
    attenuation: &Attenuation,
    spans: &[CoverageSpan],
    region: &mut Region<'_, K::Pixel>,
) {
    for span in spans {
        if !region.owns_row(span.y) {
            continue;
        }

        let x = usize::from(span.x);
        let width = span.width() as usize;
        let mut pos_y = gradients.at(i32::from(span.x), i32::from(span.y));

        for y in span.y..span.y.saturating_add(BLOCK_SIZE) {
            let Some(line) = region.row_mut(y) else {
                break;
            };

            debug_assert!(x + width <= line.len(), "span exceeds the framebuffer");
            let mut walker = RowWalker::new(gradients, attenuation, pos_y);
            for group in clip(line, x, width).chunks_mut(GROUP) {
                walker.group::<K, false>(program, group, u32::MAX);
            }

            pos_y += gradients.grad_y;
        }
    }
}

fn partial_blocks<K: PixelProgram>(
    program: &K,
    gradients: &GradientSet,
    attenuation: &Attenuation,
    blocks: &[CoverageBlock],
    region: &mut Region<'_, K::Pixel>,
) {
    for block in blocks {
        if !region.owns_row(block.y) {
            continue;
        }

        let x = usize::from(block.x);
        let mut pos_y = gradients.at(i32::from(block.x), i32::from(block.y));
        let mut y = block.y;

        for mask in [block.mask0, block.mask1] {
            for row in 0..MASK_ROWS {
                let row_mask = mask << (row * BLOCK_SIZE);

                if row_mask & 0xff00_0000 != 0 {
                    if let Some(line) = region.row_mut(y) {
                        let mut walker = RowWalker::new(gradients, attenuation, pos_y);
                        walker.group::<K, true>(program, clip(line, x, GROUP), row_mask);
                    }
                }

                pos_y += gradients.grad_y;
                y = y.saturating_add(1);
            }
        }
    }
}

/// The interpolation state along one row.
struct RowWalker<'a> {
    gradients: &'a GradientSet,
    attenuation: &'a Attenuation,
    /// The undivided state at the end of the last group.
    pos: Step,
    varying: [i32; NUM_VARYING],
    light: i32,
}

impl<'a> RowWalker<'a> {
    #[inline(always)]
    fn new(gradients: &'a GradientSet, attenuation: &'a Attenuation, pos: Step) -> Self {
        let (varying, light) = divide(&pos, attenuation);
        Self {
            gradients,
            attenuation,
            pos,
            varying,
            light,
        }
    }

    /// Shade up to eight pixels. With `MASKED`, only the pixels whose bit is set in `mask`
    /// (most significant bit first) are written.
    #[inline(always)]
    fn group<K: PixelProgram, const MASKED: bool>(
        &mut self,
        program: &K,
        pixels: &mut [K::Pixel],
        mut mask: u32,
    ) {
        self.pos += self.gradients.grad_x * GROUP as f32;
        let (next, next_light) = divide(&self.pos, self.attenuation);
        let step: [i32; NUM_VARYING] =
            array::from_fn(|i| next[i].wrapping_sub(self.varying[i]) / GROUP as i32);
        let light_step = Attenuation::step(self.light, next_light);

        for pixel in pixels.iter_mut().take(GROUP) {
            if !MASKED || mask & 0x8000_0000 != 0 {
                let [u, v] = self.varying;
                *pixel = program.pixel(*pixel, u, v, self.light);
            }
            mask <<= 1;

            for (c, s) in self.varying.iter_mut().zip(step) {
                *c = c.wrapping_add(s);
            }
            self.light += light_step;
        }
    }
}

/// Divide `1/w` out of the varyings and evaluate the light curve.
#[inline(always)]
fn divide(pos: &Step, attenuation: &Attenuation) -> ([i32; NUM_VARYING], i32) {
    let rcp = RCP_SCALE / pos.w;
    let varying = pos.varying.map(|c| (c * rcp) as i32);
    (varying, attenuation.light_fraction(pos.w))
}
