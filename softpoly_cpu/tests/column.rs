// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for sprite column draws.

use crate::util::{
    get_ctx, gray, indexed_uniforms, truecolor_uniforms, GRAY_PALETTE, IDENTITY_COLORMAP,
};
use softpoly_common::framebuffer::Framebuffer;
use softpoly_common::light::{Attenuation, FRACUNIT};
use softpoly_common::texture::Translation;
use softpoly_common::uniforms::{DrawFlags, Uniforms};
use softpoly_common::Error;
use softpoly_cpu::column::{
    ColumnBlend, ColumnDrawArgs, ColumnLight, ColumnSampler, ColumnSource,
};

const BACKGROUND: u32 = 0xff0a_0b0c;

fn column_of(fb: &Framebuffer<u32>, x: u16) -> Vec<u32> {
    (0..fb.height()).map(|y| fb.sample(x, y)).collect()
}

#[test]
fn copy_steps_one_texel_per_row() {
    let ctx = get_ctx(0);
    let texels: Vec<u32> = (0..8).map(|i| 0xff00_0000 | (i * 0x10)).collect();
    let mut fb = Framebuffer::<u32>::new(4, 8);
    fb.fill(BACKGROUND);

    let source = ColumnSource::Bgra {
        column: &texels,
        next: None,
    };
    // 1/8 of the texture height per row.
    let args =
        ColumnDrawArgs::new(truecolor_uniforms(), 2, 1, 5).with_source(source, 8, 0, 1 << 29);
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Texture, &args)
        .unwrap();

    let column = column_of(&fb, 2);
    assert_eq!(column[0], BACKGROUND);
    assert_eq!(column[1..6], texels[..5]);
    assert_eq!(column[6..], [BACKGROUND, BACKGROUND]);
    for x in [0, 1, 3] {
        assert!(column_of(&fb, x).iter().all(|&p| p == BACKGROUND));
    }
}

#[test]
fn magnified_column_repeats_texels() {
    let ctx = get_ctx(0);
    let texels = [0xff11_1111_u32, 0xff22_2222];
    let mut fb = Framebuffer::<u32>::new(1, 8);

    let source = ColumnSource::Bgra {
        column: &texels,
        next: None,
    };
    // A quarter texel per row.
    let args =
        ColumnDrawArgs::new(truecolor_uniforms(), 0, 0, 8).with_source(source, 2, 0, 1 << 29);
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Texture, &args)
        .unwrap();

    assert_eq!(
        fb.data(),
        &[
            0xff11_1111,
            0xff11_1111,
            0xff11_1111,
            0xff11_1111,
            0xff22_2222,
            0xff22_2222,
            0xff22_2222,
            0xff22_2222
        ]
    );
}

#[test]
fn rows_below_the_framebuffer_are_dropped() {
    let ctx = get_ctx(0);
    let mut fb = Framebuffer::<u32>::new(2, 8);
    fb.fill(BACKGROUND);

    let uniforms = Uniforms {
        color: 0xff12_3456,
        ..truecolor_uniforms()
    };
    let args = ColumnDrawArgs::new(uniforms, 1, 6, 100);
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Fill, &args)
        .unwrap();

    let column = column_of(&fb, 1);
    assert!(column[..6].iter().all(|&p| p == BACKGROUND));
    assert_eq!(column[6..], [0xff12_3456, 0xff12_3456]);

    // A column right of the framebuffer draws nothing.
    let args = ColumnDrawArgs::new(uniforms, 2, 0, 8);
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Fill, &args)
        .unwrap();
    assert_eq!(column_of(&fb, 1), column);
}

#[test]
fn depth_light_follows_the_curve() {
    let ctx = get_ctx(0);

    for (light, w) in [(128, 0.05), (40, 0.001), (255, 0.5)] {
        let light_fraction = Attenuation::new(light, 1706.0, false).light_fraction(w);
        let uniforms = Uniforms {
            light,
            color: 0xffff_ffff,
            flags: DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE,
            ..Default::default()
        };
        let mut fb = Framebuffer::<u32>::new(1, 4);
        let args = ColumnDrawArgs::new(uniforms, 0, 0, 4).with_light(ColumnLight::Depth(w));
        ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Fill, &args)
            .unwrap();

        let c = (255 * light_fraction.clamp(0, FRACUNIT) as u32) >> 16;
        assert!(fb.data().iter().all(|&p| p == gray(c)), "light {light}");
    }
}

#[test]
fn shade_light_darkens() {
    let ctx = get_ctx(0);
    let uniforms = Uniforms {
        color: 0xffff_ffff,
        ..truecolor_uniforms()
    };
    let mut fb = Framebuffer::<u32>::new(1, 2);
    let args =
        ColumnDrawArgs::new(uniforms, 0, 0, 2).with_light(ColumnLight::Shade(FRACUNIT / 2));
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Fill, &args)
        .unwrap();

    assert_eq!(fb.data(), &[gray(127), gray(127)]);
}

#[test]
fn bilinear_mixes_neighbouring_columns() {
    let ctx = get_ctx(0);
    let black = [0xff00_0000_u32; 8];
    let white = [0xffff_ffff_u32; 8];
    let source = ColumnSource::Bgra {
        column: &black,
        next: Some(&white[..]),
    };
    let uniforms = Uniforms {
        flags: DrawFlags::TRUECOLOR | DrawFlags::SIMPLE_SHADE | DrawFlags::FIXED_LIGHT,
        ..Default::default()
    };

    for (weight, expected) in [(0, 0xff00_0000), (8, gray(127))] {
        let mut fb = Framebuffer::<u32>::new(1, 8);
        let mut args =
            ColumnDrawArgs::new(uniforms, 0, 0, 8).with_source(source, 8, 0, 1 << 29);
        args.texture_u = weight;
        ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Texture, &args)
            .unwrap();

        assert!(fb.data().iter().all(|&p| p == expected), "weight {weight}");
    }
}

#[test]
fn shaded_column_reads_alpha_from_indices() {
    let ctx = get_ctx(0);
    let alphas = [0_u8, 128, 255, 0];
    let uniforms = Uniforms {
        color: 0xffff_ffff,
        src_alpha: 256,
        dest_alpha: 0,
        ..truecolor_uniforms()
    };
    let mut fb = Framebuffer::<u32>::new(1, 4);
    fb.fill(0xff00_0000);

    let args = ColumnDrawArgs::new(uniforms, 0, 0, 4).with_source(
        ColumnSource::Indexed(&alphas),
        4,
        0,
        1 << 30,
    );
    ctx.draw_column(&mut fb, ColumnBlend::Shaded, ColumnSampler::Texture, &args)
        .unwrap();

    assert_eq!(fb.data(), &[0xff00_0000, gray(128), 0xffff_ffff, 0xff00_0000]);
}

#[test]
fn add_clamp_saturates() {
    let ctx = get_ctx(0);
    let uniforms = Uniforms {
        color: 0xffc0_c0c0,
        src_alpha: 256,
        dest_alpha: 256,
        ..truecolor_uniforms()
    };
    let mut fb = Framebuffer::<u32>::new(1, 3);
    fb.fill(0xff80_8080);

    let args = ColumnDrawArgs::new(uniforms, 0, 0, 3);
    ctx.draw_column(&mut fb, ColumnBlend::AddClamp, ColumnSampler::Fill, &args)
        .unwrap();

    assert!(fb.data().iter().all(|&p| p == 0xffff_ffff));
}

#[test]
fn translated_column_in_8_bit() {
    let ctx = get_ctx(0);
    let indices = [0_u8, 1, 2, 3];
    let mut table = [0_u8; 256];
    table[2] = 20;
    table[3] = 30;
    let mut fb = Framebuffer::<u8>::new(1, 4);
    fb.fill(99);

    let args = ColumnDrawArgs::new(indexed_uniforms(), 0, 0, 4)
        .with_source(ColumnSource::Indexed(&indices), 4, 0, 1 << 30)
        .with_translation(Translation::Indexed(&table))
        .with_palette(&GRAY_PALETTE, &IDENTITY_COLORMAP);
    ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Translated, &args)
        .unwrap();

    assert_eq!(fb.data(), &[99, 99, 20, 30]);
}

#[test]
fn masked_column_skips_index_zero_in_8_bit() {
    let ctx = get_ctx(0);
    let indices = [0_u8, 7, 0, 9];
    let mut fb = Framebuffer::<u8>::new(1, 4);
    fb.fill(99);

    let args = ColumnDrawArgs::new(indexed_uniforms(), 0, 0, 4)
        .with_source(ColumnSource::Indexed(&indices), 4, 0, 1 << 30)
        .with_palette(&GRAY_PALETTE, &IDENTITY_COLORMAP);
    ctx.draw_column(&mut fb, ColumnBlend::Masked, ColumnSampler::Texture, &args)
        .unwrap();

    assert_eq!(fb.data(), &[99, 7, 99, 9]);
}

#[test]
fn rejects_mismatched_resources() {
    let ctx = get_ctx(0);
    let texels = [0_u32; 4];
    let mut fb = Framebuffer::<u32>::new(1, 4);

    let args = ColumnDrawArgs::new(truecolor_uniforms(), 0, 0, 4).with_source(
        ColumnSource::Bgra {
            column: &texels,
            next: None,
        },
        4,
        0,
        1 << 30,
    );
    assert_eq!(
        ctx.draw_column(&mut fb, ColumnBlend::Shaded, ColumnSampler::Texture, &args),
        Err(Error::MissingResource("indexed column"))
    );
    assert_eq!(
        ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Translated, &args),
        Err(Error::MissingResource("indexed column"))
    );

    let args = ColumnDrawArgs {
        texture_height: 8,
        ..args
    };
    assert_eq!(
        ctx.draw_column(&mut fb, ColumnBlend::Copy, ColumnSampler::Texture, &args),
        Err(Error::LengthMismatch {
            expected: 8,
            actual: 4
        })
    );
}
