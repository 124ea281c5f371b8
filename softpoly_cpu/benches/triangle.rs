// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::Criterion;
use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};
use softpoly_common::coverage::{CoverageBlock, CoverageSpan, BLOCK_SIZE};
use softpoly_common::gradient::Vertex;
use softpoly_common::light::NUM_COLORMAPS;
use softpoly_common::texture::{Colormap, Palette, Texture, TextureRef, RGB_LUT_SIZE};
use softpoly_common::uniforms::{DrawFlags, Uniforms};
use softpoly_cpu::triangle::{TriBlendMode, TriangleDrawArgs};
use softpoly_cpu::{Framebuffer, RenderContext, RenderSettings};

const WIDTH: u16 = 320;
const HEIGHT: u16 = 200;
const SEED: [u8; 32] = [0; 32];

pub fn triangle(c: &mut Criterion) {
    let mut g = c.benchmark_group("triangle");
    let mut rng = StdRng::from_seed(SEED);

    let ctx = RenderContext::new(RenderSettings::default()).unwrap();
    let texels: Vec<u32> = (0..64 * 64).map(|_| rng.random()).collect();
    let indices: Vec<u8> = (0..64 * 64).map(|_| rng.random()).collect();
    let spans: Vec<_> = (0..HEIGHT - BLOCK_SIZE)
        .step_by(usize::from(BLOCK_SIZE))
        .map(|y| CoverageSpan::new(0, y, u32::from(WIDTH / BLOCK_SIZE)))
        .collect();
    let blocks: Vec<_> = (0..WIDTH)
        .step_by(usize::from(BLOCK_SIZE))
        .map(|x| CoverageBlock::new(x, HEIGHT - BLOCK_SIZE, rng.random(), rng.random()))
        .collect();
    let vertices = [
        Vertex::new(0.0, 0.0, 0.02, [0.0, 0.0]),
        Vertex::new(f32::from(WIDTH), 0.0, 0.01, [8.0, 0.0]),
        Vertex::new(0.0, f32::from(HEIGHT), 0.015, [0.0, 6.0]),
    ];

    macro_rules! truecolor {
        ($name:ident, $mode:expr, $fill:expr, $flags:expr) => {
            let uniforms = Uniforms {
                light: 192,
                src_alpha: 160,
                dest_alpha: 96,
                flags: $flags,
                ..Default::default()
            };
            let texture = TextureRef::Bgra(Texture::new(&texels, 64, 64).unwrap());
            let args = TriangleDrawArgs::new(uniforms, &vertices, &spans, &blocks)
                .with_texture(texture);
            let mut fb = Framebuffer::<u32>::new(WIDTH, HEIGHT);

            g.bench_function(stringify!($name), |b| {
                b.iter(|| ctx.draw_triangle(&mut fb, $mode, $fill, &args).unwrap())
            });
        };
    }

    let simple = DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE;
    truecolor!(fill_copy, TriBlendMode::Copy, true, simple);
    truecolor!(
        copy_nearest,
        TriBlendMode::Copy,
        false,
        simple | DrawFlags::NEAREST_FILTER
    );
    truecolor!(copy_bilinear, TriBlendMode::Copy, false, simple);
    truecolor!(add_bilinear, TriBlendMode::Add, false, simple);
    truecolor!(alpha_blend_advanced, TriBlendMode::AlphaBlend, false, DrawFlags::TRUECOLOR);

    let palette = gray_palette();
    let colormap = Colormap::new(
        (0..NUM_COLORMAPS * 256)
            .map(|i| ((i % 256) * (NUM_COLORMAPS - i / 256) / NUM_COLORMAPS) as u8)
            .collect(),
    )
    .unwrap();

    macro_rules! indexed {
        ($name:ident, $mode:expr) => {
            let uniforms = Uniforms {
                light: 192,
                src_alpha: 160,
                dest_alpha: 96,
                flags: DrawFlags::SIMPLE_SHADE | DrawFlags::NEAREST_FILTER,
                ..Default::default()
            };
            let texture = TextureRef::Indexed(Texture::new(&indices, 64, 64).unwrap());
            let args = TriangleDrawArgs::new(uniforms, &vertices, &spans, &blocks)
                .with_texture(texture)
                .with_palette(&palette, &colormap);
            let mut fb = Framebuffer::<u8>::new(WIDTH, HEIGHT);

            g.bench_function(stringify!($name), |b| {
                b.iter(|| ctx.draw_triangle(&mut fb, $mode, false, &args).unwrap())
            });
        };
    }

    indexed!(indexed_copy, TriBlendMode::Copy);
    indexed!(indexed_add, TriBlendMode::Add);
}

/// 256 grays, with a lookup table mapping every color to its average gray.
pub(crate) fn gray_palette() -> Palette {
    let colors = core::array::from_fn(|i| {
        let i = i as u32;
        (i << 16) | (i << 8) | i
    });
    let lut = (0..RGB_LUT_SIZE)
        .map(|i| {
            let sum = ((i >> 12) & 63) + ((i >> 6) & 63) + (i & 63);
            ((sum * 4 + 6) / 3).min(255) as u8
        })
        .collect();
    Palette::new(colors, lut).unwrap()
}
