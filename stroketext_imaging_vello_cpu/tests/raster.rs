// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel checks for outline strokes, fills and group opacity.

use kurbo::{Affine, Join, Rect, Shape};
use peniko::Color;
use stroketext_imaging::{
    DrawOp, ImagingBackend, LayerOp, PaintDesc, PathDesc, RectF, ResourceBackend, StateOp,
    StrokeStyle,
};
use stroketext_imaging_vello_cpu::VelloCpuImagingBackend;
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

const SIZE: u16 = 16;

/// Render with `build` and return unpremultiplied RGBA pixels.
fn render(build: impl FnOnce(&mut dyn ImagingBackend)) -> Vec<[u8; 4]> {
    let settings = RenderSettings {
        render_mode: RenderMode::OptimizeSpeed,
        ..RenderSettings::default()
    };
    let mut ctx = RenderContext::new_with(SIZE, SIZE, settings);
    let mut backend = VelloCpuImagingBackend::new(&mut ctx);
    build(&mut backend);

    let mut pixmap = Pixmap::new(SIZE, SIZE);
    backend.ctx.flush();
    backend.ctx.render_to_pixmap(&mut pixmap);
    pixmap
        .take_unpremultiplied()
        .into_iter()
        .map(|p| [p.r, p.g, p.b, p.a])
        .collect()
}

fn at(pixels: &[[u8; 4]], x: usize, y: usize) -> [u8; 4] {
    pixels[y * usize::from(SIZE) + x]
}

fn square() -> PathDesc {
    PathDesc::from_bez_path(&Rect::new(4.0, 4.0, 12.0, 12.0).to_path(0.1))
}

#[test]
fn fill_rect_follows_the_transform() {
    let pixels = render(|b| {
        let red = b.create_paint(PaintDesc::solid(Color::from_rgba8(255, 0, 0, 255)));
        b.state(StateOp::SetPaint(red));
        b.state(StateOp::SetTransform(Affine::translate((4.0, 0.0))));
        b.draw(DrawOp::fill_rect(RectF::new(0.0, 2.0, 4.0, 6.0)));
    });
    assert_eq!(at(&pixels, 5, 3), [255, 0, 0, 255]);
    assert_eq!(at(&pixels, 1, 3)[3], 0);
}

#[test]
fn stroke_covers_the_outline_but_not_the_interior() {
    let pixels = render(|b| {
        let path = b.create_path(square());
        let black = b.create_paint(PaintDesc::solid(Color::BLACK));
        b.state(StateOp::SetPaint(black));
        b.state(StateOp::SetStroke(StrokeStyle::new(2.0).with_join(Join::Round)));
        b.draw(DrawOp::StrokePath(path));
    });
    assert_eq!(at(&pixels, 4, 8)[3], 255);
    assert_eq!(at(&pixels, 8, 8)[3], 0);
}

#[test]
fn fill_drawn_after_stroke_covers_its_inner_half() {
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
    // Outer half of the stroke stays black, the inner half is under the fill.
    assert_eq!(at(&pixels, 3, 8), [0, 0, 0, 255]);
    assert_eq!(at(&pixels, 4, 8), [255, 255, 255, 255]);
    assert_eq!(at(&pixels, 8, 8), [255, 255, 255, 255]);
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
