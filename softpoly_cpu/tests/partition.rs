// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests that splitting a draw between workers does not change its result.

use crate::util::{get_ctx, indexed_uniforms, GRAY_PALETTE, LEVEL_COLORMAP};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use softpoly_common::coverage::{CoverageBlock, CoverageSpan, BLOCK_SIZE};
use softpoly_common::framebuffer::Framebuffer;
use softpoly_common::gradient::Vertex;
use softpoly_common::texture::{Texture, TextureRef};
use softpoly_common::uniforms::{DrawFlags, Uniforms};
use softpoly_cpu::column::{
    ColumnBlend, ColumnDrawArgs, ColumnLight, ColumnSampler, ColumnSource,
};
use softpoly_cpu::triangle::{TriBlendMode, TriangleDrawArgs};

const WIDTH: u16 = 64;
const HEIGHT: u16 = 48;
const THREAD_COUNTS: [u16; 4] = [1, 2, 3, 5];

fn random_coverage(rng: &mut StdRng) -> (Vec<CoverageSpan>, Vec<CoverageBlock>) {
    let blocks_x = WIDTH / BLOCK_SIZE;
    let blocks_y = HEIGHT / BLOCK_SIZE;

    let spans = (0..10)
        .map(|_| {
            let x = rng.random_range(0..blocks_x);
            let y = rng.random_range(0..blocks_y);
            let length = rng.random_range(1..=blocks_x - x);
            CoverageSpan::new(x * BLOCK_SIZE, y * BLOCK_SIZE, u32::from(length))
        })
        .collect();
    let blocks = (0..20)
        .map(|_| {
            let x = rng.random_range(0..blocks_x);
            let y = rng.random_range(0..blocks_y);
            CoverageBlock::new(x * BLOCK_SIZE, y * BLOCK_SIZE, rng.random(), rng.random())
        })
        .collect();
    (spans, blocks)
}

/// A triangle with perspective: the depth varies across the framebuffer.
fn perspective_vertices() -> [Vertex; 3] {
    [
        Vertex::new(0.0, 0.0, 0.02, [0.0, 0.0]),
        Vertex::new(f32::from(WIDTH), 0.0, 0.01, [4.0, 0.0]),
        Vertex::new(0.0, f32::from(HEIGHT), 0.005, [0.0, 3.0]),
    ]
}

#[test]
fn triangles_match_across_thread_counts() {
    let mut rng = StdRng::seed_from_u64(42);
    let texels: Vec<u32> = (0..256).map(|_| rng.random()).collect();
    let texture = TextureRef::Bgra(Texture::new(&texels, 16, 16).unwrap());
    let vertices = perspective_vertices();
    let mut background = Framebuffer::<u32>::new(WIDTH, HEIGHT);
    for pixel in background.data_mut() {
        *pixel = rng.random();
    }

    for (mode, flags) in [
        (TriBlendMode::Copy, DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE),
        (TriBlendMode::AlphaBlend, DrawFlags::TRUECOLOR),
        (
            TriBlendMode::Add,
            DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE | DrawFlags::NEAREST_FILTER,
        ),
    ] {
        let (spans, blocks) = random_coverage(&mut rng);
        let uniforms = Uniforms {
            light: 160,
            src_alpha: 200,
            dest_alpha: 100,
            flags,
            ..Default::default()
        };
        let args =
            TriangleDrawArgs::new(uniforms, &vertices, &spans, &blocks).with_texture(texture);

        let mut expected = background.clone();
        get_ctx(0)
            .draw_triangle(&mut expected, mode, false, &args)
            .unwrap();
        assert_ne!(expected, background, "{mode:?} drew nothing");

        for num_threads in THREAD_COUNTS {
            let mut fb = background.clone();
            get_ctx(num_threads)
                .draw_triangle(&mut fb, mode, false, &args)
                .unwrap();
            assert_eq!(fb, expected, "{mode:?} with {num_threads} threads");
        }
    }
}

#[test]
fn indexed_triangles_match_across_thread_counts() {
    let mut rng = StdRng::seed_from_u64(7);
    let indices: Vec<u8> = (0..64).map(|_| rng.random()).collect();
    let texture = TextureRef::Indexed(Texture::new(&indices, 8, 8).unwrap());
    let (spans, blocks) = random_coverage(&mut rng);
    let uniforms = Uniforms {
        light: 96,
        flags: DrawFlags::SIMPLE_SHADE | DrawFlags::NEAREST_FILTER,
        ..indexed_uniforms()
    };
    let vertices = perspective_vertices();
    let args = TriangleDrawArgs::new(uniforms, &vertices, &spans, &blocks)
        .with_texture(texture)
        .with_palette(&GRAY_PALETTE, &LEVEL_COLORMAP);

    let mut expected = Framebuffer::<u8>::new(WIDTH, HEIGHT);
    get_ctx(0)
        .draw_triangle(&mut expected, TriBlendMode::AlphaBlend, false, &args)
        .unwrap();

    for num_threads in THREAD_COUNTS {
        let mut fb = Framebuffer::<u8>::new(WIDTH, HEIGHT);
        get_ctx(num_threads)
            .draw_triangle(&mut fb, TriBlendMode::AlphaBlend, false, &args)
            .unwrap();
        assert_eq!(fb, expected, "{num_threads} threads");
    }
}

#[test]
fn columns_match_across_thread_counts() {
    let mut rng = StdRng::seed_from_u64(1234);
    let texels: Vec<u32> = (0..32).map(|_| rng.random()).collect();
    let next: Vec<u32> = (0..32).map(|_| rng.random()).collect();
    let source = ColumnSource::Bgra {
        column: &texels,
        next: Some(&next[..]),
    };

    for _ in 0..8 {
        let uniforms = Uniforms {
            src_alpha: 256,
            dest_alpha: rng.random_range(0..=256),
            flags: DrawFlags::TRUECOLOR,
            ..Default::default()
        };
        let mut args = ColumnDrawArgs::new(
            uniforms,
            rng.random_range(0..8),
            rng.random_range(0..16),
            rng.random_range(1..64),
        )
        .with_source(source, 32, rng.random(), rng.random_range(1 << 24..1 << 29))
        .with_light(ColumnLight::Depth(rng.random_range(0.001..0.1)));
        args.texture_u = rng.random_range(0..16);

        let mut expected = Framebuffer::<u32>::new(8, HEIGHT);
        expected.fill(0xff20_2020);
        let mut actual = expected.clone();
        get_ctx(0)
            .draw_column(
                &mut expected,
                ColumnBlend::AddClamp,
                ColumnSampler::Texture,
                &args,
            )
            .unwrap();

        for num_threads in THREAD_COUNTS {
            actual.fill(0xff20_2020);
            get_ctx(num_threads)
                .draw_column(
                    &mut actual,
                    ColumnBlend::AddClamp,
                    ColumnSampler::Texture,
                    &args,
                )
                .unwrap();
            assert_eq!(actual, expected, "{args:?} with {num_threads} threads");
        }
    }
}
