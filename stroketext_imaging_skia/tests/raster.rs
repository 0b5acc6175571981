// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel checks for outline strokes, fills and group opacity.

use kurbo::{Rect, Shape};
use peniko::Color;
use skia_safe::image::CachingHint;
use skia_safe::{AlphaType, ColorType, ImageInfo, surfaces};
use stroketext_imaging::{
    DrawOp, ImagingBackend, LayerOp, PaintDesc, PathDesc, RectF, ResourceBackend, StateOp,
    StrokeStyle,
};
use stroketext_imaging_skia::SkiaImagingBackend;

const SIZE: i32 = 16;

/// Render with `build` and return unpremultiplied RGBA pixels.
fn render(build: impl FnOnce(&mut dyn ImagingBackend)) -> Vec<[u8; 4]> {
    let mut surface = surfaces::raster_n32_premul((SIZE, SIZE)).expect("raster surface");
    {
        let mut backend = SkiaImagingBackend::new(surface.canvas());
        build(&mut backend);
    }

    let image = surface.image_snapshot();
    let info = ImageInfo::new((SIZE, SIZE), ColorType::RGBA8888, AlphaType::Unpremul, None);
    let mut bytes = vec![0_u8; (SIZE * SIZE * 4) as usize];
    let ok = image.read_pixels(
        &info,
        bytes.as_mut_slice(),
        (4 * SIZE) as usize,
        (0, 0),
        CachingHint::Disallow,
    );
    assert!(ok, "read_pixels should succeed");
    bytes
        .chunks_exact(4)
        .map(|p| [p[0], p[1], p[2], p[3]])
        .collect()
}

fn at(pixels: &[[u8; 4]], x: usize, y: usize) -> [u8; 4] {
    pixels[y * SIZE as usize + x]
}

fn square() -> PathDesc {
    PathDesc::from_bez_path(&Rect::new(4.0, 4.0, 12.0, 12.0).to_path(0.1))
}

#[test]
fn fill_over_stroke_leaves_the_outer_half_visible() {
    let pixels = render(|b| {
        let path = b.create_path(square());
        let black = b.create_paint(PaintDesc::solid(Color::BLACK));
        let white = b.create_paint(PaintDesc::solid(Color::WHITE));
        b.state(StateOp::SetPaint(black));
        b.state(StateOp::SetStroke(StrokeStyle::new(2.0)));
        b.draw(DrawOp::StrokePath(path));
        b.state(StateOp::SetPaint(white));
        b.draw(DrawOp::FillPath(path));
    });
    assert_eq!(at(&pixels, 3, 8), [0, 0, 0, 255]);
    assert_eq!(at(&pixels, 8, 8), [255, 255, 255, 255]);
    assert_eq!(at(&pixels, 1, 8)[3], 0);
}

#[test]
fn opacity_layer_fades_its_contents() {
    let pixels = render(|b| {
        let black = b.create_paint(PaintDesc::solid(Color::BLACK));
        b.state(StateOp::PushLayer(LayerOp::opacity(0.5)));
        b.state(StateOp::SetPaint(black));
        b.draw(DrawOp::fill_rect(RectF::new(0.0, 0.0, 16.0, 16.0)));
        b.state(StateOp::PopLayer);
    });
    let alpha = at(&pixels, 8, 8)[3];
    assert!((126..=129).contains(&alpha), "alpha {alpha}");
}

#[test]
fn full_opacity_layer_draws_directly() {
    let pixels = render(|b| {
        let black = b.create_paint(PaintDesc::solid(Color::BLACK));
        b.state(StateOp::PushLayer(LayerOp::opacity(1.0)));
        b.state(StateOp::SetPaint(black));
        b.draw(DrawOp::fill_rect(RectF::new(0.0, 0.0, 8.0, 16.0)));
        b.state(StateOp::PopLayer);
        // An unmatched pop is ignored.
        b.state(StateOp::PopLayer);
    });
    assert_eq!(at(&pixels, 4, 4), [0, 0, 0, 255]);
    assert_eq!(at(&pixels, 12, 4)[3], 0);
}
