// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sprite column kernel.
//!
//! A column is drawn top to bottom with a constant texture step per row, so there is no
//! perspective division and the light fraction is the same for every pixel. Each worker takes
//! every `num_cores`-th row, and rows are processed in pairs.

use core::array;

use softpoly_common::light::light_fraction_from_shade;
use softpoly_common::texture::{Colormap, Palette, Translation};
use softpoly_common::uniforms::Uniforms;
use softpoly_common::Error;

use crate::fine::op::{BlendOp, Constants, PaletteTables};
use crate::fine::sample::{ColumnBilinear, ColumnNearest, ColumnTranslated, Solid, Source};
use crate::fine::shade::{Advanced, Simple};
use crate::fine::{Indexed, PixelProgram, Truecolor};
use crate::region::Region;

/// The number of rows processed together.
const LANES: usize = 2;

/// The blend operators of column draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnBlend {
    /// Opaque copy.
    Copy,
    /// "Over" with the texel's alpha.
    Masked,
    /// Additive blending.
    AddClamp,
    /// Background minus foreground.
    SubClamp,
    /// Foreground minus background.
    RevSubClamp,
    /// The fill color painted through an alpha read from an indexed column.
    Shaded,
}

impl ColumnBlend {
    /// The number of blend operators.
    pub const COUNT: usize = 6;

    /// All blend operators, in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Copy,
        Self::Masked,
        Self::AddClamp,
        Self::SubClamp,
        Self::RevSubClamp,
        Self::Shaded,
    ];
}

/// Where the texels of a column draw come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnSampler {
    /// The bound column.
    Texture,
    /// The uniform fill color.
    Fill,
    /// The bound indexed column, remapped through a translation table.
    Translated,
}

impl ColumnSampler {
    /// The number of samplers.
    pub const COUNT: usize = 3;

    /// All samplers, in table order.
    pub const ALL: [Self; Self::COUNT] = [Self::Texture, Self::Fill, Self::Translated];
}

/// The texels of a column draw.
#[derive(Debug, Clone, Copy)]
pub enum ColumnSource<'a> {
    /// Packed `0xAARRGGBB` texels. `next` is the neighbouring column for bilinear filtering.
    Bgra {
        /// The column being drawn.
        column: &'a [u32],
        /// The column to the right, if horizontal filtering is wanted.
        next: Option<&'a [u32]>,
    },
    /// Palette indices, or alpha values for the shaded blend.
    Indexed(&'a [u8]),
}

/// How the light fraction of a column is obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnLight {
    /// Evaluate the attenuation curve of the uniforms at this `1/w`.
    Depth(f32),
    /// A software renderer shade value, 16.16 with zero being full brightness.
    Shade(i32),
}

/// Everything a column draw reads.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDrawArgs<'a> {
    /// The per-draw constants.
    pub uniforms: Uniforms,
    /// The texels. Not needed in fill mode.
    pub source: Option<ColumnSource<'a>>,
    /// The height of the texture column, in texels.
    pub texture_height: u32,
    /// The texture position of the first row, as a 0.32 fraction of the texture height.
    pub texture_frac: u32,
    /// The texture position increment per row.
    pub texture_step: u32,
    /// The 0..=15 weight of the neighbouring column in bilinear filtering.
    pub texture_u: u32,
    /// The number of rows to draw.
    pub count: u32,
    /// The destination column.
    pub dest_x: u16,
    /// The first destination row.
    pub dest_y: u16,
    /// The light of the column.
    pub light: ColumnLight,
    /// The translation table of the translated sampler.
    pub translation: Option<Translation<'a>>,
    /// The palette of 8-bit draws.
    pub palette: Option<&'a Palette>,
    /// The colormap of 8-bit draws.
    pub colormap: Option<&'a Colormap>,
}

impl<'a> ColumnDrawArgs<'a> {
    /// Create the arguments of an untextured draw of `count` rows starting at
    /// `(dest_x, dest_y)`.
    pub fn new(uniforms: Uniforms, dest_x: u16, dest_y: u16, count: u32) -> Self {
        Self {
            uniforms,
            source: None,
            texture_height: 1,
            texture_frac: 0,
            texture_step: 0,
            texture_u: 0,
            count,
            dest_x,
            dest_y,
            light: ColumnLight::Depth(1.0),
            translation: None,
            palette: None,
            colormap: None,
        }
    }

    /// Bind the texels, with the height of the texture and the texture position of the first
    /// row and its increment per row.
    pub fn with_source(
        mut self,
        source: ColumnSource<'a>,
        height: u32,
        frac: u32,
        step: u32,
    ) -> Self {
        self.source = Some(source);
        self.texture_height = height;
        self.texture_frac = frac;
        self.texture_step = step;
        self
    }

    /// Set the light of the column.
    pub fn with_light(mut self, light: ColumnLight) -> Self {
        self.light = light;
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

    /// The light fraction of every pixel of the column.
    pub fn light_fraction(&self) -> i32 {
        match self.light {
            ColumnLight::Depth(w) => self.uniforms.attenuation().light_fraction(w),
            ColumnLight::Shade(shade) => light_fraction_from_shade(shade),
        }
    }

    /// Check that the bound resources fit the kernel selected by `blend` and `sampler`.
    pub fn validate(&self, blend: ColumnBlend, sampler: ColumnSampler) -> Result<(), Error> {
        let truecolor = self.uniforms.is_truecolor();

        if !truecolor {
            self.palette.ok_or(Error::MissingResource("palette"))?;
            self.colormap.ok_or(Error::MissingResource("colormap"))?;
        }

        if sampler == ColumnSampler::Fill {
            return Ok(());
        }

        let height = self.texture_height;
        if height == 0 {
            return Err(Error::ZeroSized { width: 1, height });
        }
        let check_len = |len: usize| {
            if len < height as usize {
                Err(Error::LengthMismatch {
                    expected: height as usize,
                    actual: len,
                })
            } else {
                Ok(())
            }
        };

        let needs_indexed =
            !truecolor || sampler == ColumnSampler::Translated || blend == ColumnBlend::Shaded;
        match self.source.ok_or(Error::MissingResource("column"))? {
            ColumnSource::Indexed(column) if needs_indexed => check_len(column.len())?,
            ColumnSource::Bgra { column, next } if !needs_indexed => {
                check_len(column.len())?;
                if let Some(next) = next {
                    check_len(next.len())?;
                }
            }
            _ if needs_indexed => return Err(Error::MissingResource("indexed column")),
            _ => return Err(Error::MissingResource("truecolor column")),
        }

        if sampler == ColumnSampler::Translated {
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
    log::warn!("skipping column draw: no {what} bound for the selected kernel");
}

/// Whether every bound column holds at least `texture_height` texels.
fn covers_texture_height(args: &ColumnDrawArgs<'_>) -> bool {
    let height = args.texture_height as usize;
    let covers = |len: usize| height > 0 && len >= height;
    match args.source {
        Some(ColumnSource::Indexed(column)) => covers(column.len()),
        Some(ColumnSource::Bgra { column, next }) => {
            covers(column.len()) && next.map_or(true, |next| covers(next.len()))
        }
        None => true,
    }
}

/// The truecolor kernel entry point of blend operator `O`.
pub(crate) fn draw_truecolor<O: BlendOp, const FILL: bool, const TRANSLATED: bool>(
    args: &ColumnDrawArgs<'_>,
    region: &mut Region<'_, u32>,
) {
    let constants = Constants::from(&args.uniforms);
    let height = args.texture_height;
    let frac = args.texture_frac;

    if FILL {
        let source = Solid(args.uniforms.color);
        return shade_truecolor::<O, _>(source, frac, constants, args, region);
    }

    if !covers_texture_height(args) {
        return rejected("column covering the texture height");
    }

    match args.source {
        Some(ColumnSource::Indexed(column)) if TRANSLATED => {
            let Some(table) = args.translation.and_then(Translation::bgra) else {
                return rejected("truecolor translation table");
            };
            let source = ColumnTranslated {
                column,
                height,
                table,
            };
            shade_truecolor::<O, _>(source, frac, constants, args, region);
        }
        Some(ColumnSource::Indexed(column)) if O::INDEXED_TEXELS => {
            let source = ColumnNearest { column, height };
            shade_truecolor::<O, _>(source, frac, constants, args, region);
        }
        Some(ColumnSource::Bgra { column, next }) if !TRANSLATED && !O::INDEXED_TEXELS => {
            match next {
                Some(next) if !args.uniforms.is_nearest_filter() => {
                    let source = ColumnBilinear::new(column, next, height, args.texture_u);
                    let frac = source.start_frac(frac);
                    shade_truecolor::<O, _>(source, frac, constants, args, region);
                }
                _ => {
                    let source = ColumnNearest { column, height };
                    shade_truecolor::<O, _>(source, frac, constants, args, region);
                }
            }
        }
        _ => rejected("matching column"),
    }
}

fn shade_truecolor<O: BlendOp, S: Source>(
    source: S,
    frac: u32,
    constants: Constants,
    args: &ColumnDrawArgs<'_>,
    region: &mut Region<'_, u32>,
) {
    if args.uniforms.is_simple_shade() {
        let program = Truecolor::<O, S, Simple>::new(source, constants);
        run(&program, args, frac, region);
    } else {
        let program = Truecolor::<O, S, Advanced>::new(source, constants);
        run(&program, args, frac, region);
    }
}

/// The 8-bit kernel entry point of blend operator `O`.
pub(crate) fn draw_indexed<O: BlendOp, const FILL: bool, const TRANSLATED: bool>(
    args: &ColumnDrawArgs<'_>,
    region: &mut Region<'_, u8>,
) {
    let (Some(palette), Some(colormap)) = (args.palette, args.colormap) else {
        return rejected("palette and colormap");
    };
    let tables = PaletteTables { palette, colormap };
    let constants = Constants::from(&args.uniforms);
    let height = args.texture_height;
    let frac = args.texture_frac;

    if FILL {
        let source = Solid(args.uniforms.color & 0xff);
        let program = Indexed::<O, _>::new(source, constants, tables);
        return run(&program, args, frac, region);
    }

    let Some(ColumnSource::Indexed(column)) = args.source else {
        return rejected("indexed column");
    };
    if !covers_texture_height(args) {
        return rejected("column covering the texture height");
    }

    if TRANSLATED {
        let Some(table) = args.translation.and_then(Translation::indexed) else {
            return rejected("indexed translation table");
        };
        let source = ColumnTranslated {
            column,
            height,
            table,
        };
        run(&Indexed::<O, _>::new(source, constants, tables), args, frac, region);
    } else {
        let source = ColumnNearest { column, height };
        run(&Indexed::<O, _>::new(source, constants, tables), args, frac, region);
    }
}

/// Run `program` over the rows of the column owned by `region`, starting at texture position
/// `frac`.
///
/// Rows outside the framebuffer end the column.
pub(crate) fn run<K: PixelProgram>(
    program: &K,
    args: &ColumnDrawArgs<'_>,
    frac: u32,
    region: &mut Region<'_, K::Pixel>,
) {
    let first = u32::from(args.dest_y);
    let mut remaining = region.count_for_thread(first, args.count);
    if remaining == 0 {
        return;
    }

    let skipped = region.skipped_by_thread(first);
    let stride = u32::from(region.num_cores());
    let step = args.texture_step.wrapping_mul(stride);
    let mut frac = frac.wrapping_add(args.texture_step.wrapping_mul(skipped));
    let mut y = first + skipped;
    let x = usize::from(args.dest_x);
    let light = args.light_fraction();

    while remaining > 0 {
        let wanted = (remaining as usize).min(LANES);
        let ys: [u32; LANES] = array::from_fn(|i| y + i as u32 * stride);
        let fracs: [i32; LANES] =
            array::from_fn(|i| frac.wrapping_add(step.wrapping_mul(i as u32)) as i32);

        let mut bg = [K::Pixel::default(); LANES];
        let mut lanes = 0;
        for (b, &y) in bg.iter_mut().zip(&ys).take(wanted) {
            let Some(p) = pixel_mut(region, y, x) else {
                break;
            };
            *b = *p;
            lanes += 1;
        }

        let out = program.lanes(bg, fracs, light);

        for (o, &y) in out.iter().zip(&ys).take(lanes) {
            if let Some(p) = pixel_mut(region, y, x) {
                *p = *o;
            }
        }

        if lanes < wanted {
            return;
        }
        remaining -= lanes as u32;
        y += lanes as u32 * stride;
        frac = frac.wrapping_add(step.wrapping_mul(lanes as u32));
    }
}

#[inline(always)]
fn pixel_mut<'r, P>(region: &'r mut Region<'_, P>, y: u32, x: usize) -> Option<&'r mut P> {
    let y = u16::try_from(y).ok()?;
    region.row_mut(y)?.get_mut(x)
}
