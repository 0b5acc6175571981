// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skia backend for the stroketext imaging IR.
//!
//! [`SkiaImagingBackend`] forwards state and draw operations to a borrowed
//! `skia_safe::Canvas`. Glyph paths are stroked natively with round joins,
//! so stroked text uses the true stroke pass here. Layout on this backend
//! follows the integer pixel grid; see [`CAPABILITIES`].

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Cap, Join};
use peniko::Brush;
use skia_safe as sk;
use stroketext_imaging::{
    DrawOp, FillRule, ImagingBackend, LayerOp, PaintDesc, PaintId, PathCmd, PathDesc, PathId,
    ResourceBackend, StateOp, StrokeStyle,
};
use stroketext_style::{BackendCapabilities, InsetRounding};

/// What this backend can do: true outline strokes, integer-floored insets
/// and whole-pixel glyph positions.
pub const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    outline_stroke: true,
    inset_rounding: InsetRounding::Floor,
    subpixel_text: false,
};

/// Skia-backed implementation of the imaging backend.
pub struct SkiaImagingBackend<'a> {
    canvas: &'a sk::Canvas,

    paths: Vec<Option<sk::Path>>,
    paints: Vec<Option<PaintDesc>>,

    current_brush: Brush,
    current_stroke: Option<StrokeStyle>,
    current_fill_rule: FillRule,
    stack: Vec<StackEntry>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StackEntry {
    Noop,
    /// A `save_layer` to restore.
    Restore,
}

impl fmt::Debug for SkiaImagingBackend<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkiaImagingBackend")
            .field("live_paths", &self.paths.iter().flatten().count())
            .field("live_paints", &self.paints.iter().flatten().count())
            .field("current_stroke", &self.current_stroke)
            .field("current_fill_rule", &self.current_fill_rule)
            .field("layers", &self.stack.len())
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Skia consumes f32 geometry"
)]
fn f64_to_f32(v: f64) -> f32 {
    v as f32
}

fn affine_to_matrix(xf: Affine) -> sk::Matrix {
    // kurbo stores [a, b, c, d, e, f] for
    // [a c e]
    // [b d f]
    let a = xf.as_coeffs();
    sk::Matrix::new_all(
        f64_to_f32(a[0]),
        f64_to_f32(a[2]),
        f64_to_f32(a[4]),
        f64_to_f32(a[1]),
        f64_to_f32(a[3]),
        f64_to_f32(a[5]),
        0.0,
        0.0,
        1.0,
    )
}

fn color_to_sk_color(color: peniko::Color) -> sk::Color {
    let rgba = color.to_rgba8();
    sk::Color::from_argb(rgba.a, rgba.r, rgba.g, rgba.b)
}

fn brush_to_paint(brush: &Brush) -> sk::Paint {
    let mut paint = sk::Paint::default();
    paint.set_anti_alias(true);
    match brush {
        Brush::Solid(color) => {
            paint.set_color(color_to_sk_color(*color));
        }
        Brush::Gradient(grad) => {
            // Text paints are solid; a gradient degrades to its last stop.
            let color = grad.stops.last().map_or(peniko::Color::TRANSPARENT, |stop| {
                stop.color.to_alpha_color::<peniko::color::Srgb>()
            });
            paint.set_color(color_to_sk_color(color));
        }
        Brush::Image(_) => {
            paint.set_color(sk::Color::BLACK);
        }
    }
    paint
}

fn path_with_fill_rule(path: &sk::Path, rule: FillRule) -> sk::Path {
    let fill = match rule {
        FillRule::NonZero => sk::PathFillType::Winding,
        FillRule::EvenOdd => sk::PathFillType::EvenOdd,
    };
    if path.fill_type() == fill {
        path.clone()
    } else {
        path.with_fill_type(fill)
    }
}

fn apply_stroke_style(paint: &mut sk::Paint, style: &StrokeStyle) {
    paint.set_style(sk::PaintStyle::Stroke);
    paint.set_stroke_width(f64_to_f32(style.width));
    paint.set_stroke_miter(f64_to_f32(style.miter_limit));
    paint.set_stroke_join(match style.join {
        Join::Bevel => sk::PaintJoin::Bevel,
        Join::Miter => sk::PaintJoin::Miter,
        Join::Round => sk::PaintJoin::Round,
    });
    paint.set_stroke_cap(match style.start_cap {
        Cap::Butt => sk::PaintCap::Butt,
        Cap::Square => sk::PaintCap::Square,
        Cap::Round => sk::PaintCap::Round,
    });
}

impl<'a> SkiaImagingBackend<'a> {
    /// Create a new backend that renders into the given canvas.
    pub fn new(canvas: &'a sk::Canvas) -> Self {
        Self {
            canvas,
            paths: Vec::new(),
            paints: Vec::new(),
            current_brush: Brush::Solid(peniko::Color::BLACK),
            current_stroke: None,
            current_fill_rule: FillRule::NonZero,
            stack: Vec::new(),
        }
    }

    fn push_layer(&mut self, layer: LayerOp) {
        if layer.is_noop() {
            self.stack.push(StackEntry::Noop);
            return;
        }
        let mut paint = sk::Paint::default();
        paint.set_alpha_f(layer.alpha());
        let rec = sk::canvas::SaveLayerRec::default().paint(&paint);
        self.canvas.save_layer(&rec);
        self.stack.push(StackEntry::Restore);
    }
}

impl ResourceBackend for SkiaImagingBackend<'_> {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let mut path = sk::Path::new();
        for cmd in desc.commands.iter() {
            match *cmd {
                PathCmd::MoveTo { x, y } => {
                    path.move_to((x, y));
                }
                PathCmd::LineTo { x, y } => {
                    path.line_to((x, y));
                }
                PathCmd::QuadTo { x1, y1, x, y } => {
                    path.quad_to((x1, y1), (x, y));
                }
                PathCmd::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    path.cubic_to((x1, y1), (x2, y2), (x, y));
                }
                PathCmd::Close => {
                    path.close();
                }
            }
        }
        let id = u32::try_from(self.paths.len())
            .expect("SkiaImagingBackend: too many paths for u32 PathId");
        self.paths.push(Some(path));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        if let Some(slot) = self.paths.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = u32::try_from(self.paints.len())
            .expect("SkiaImagingBackend: too many paints for u32 PaintId");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for SkiaImagingBackend<'_> {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(xf) => {
                self.canvas.reset_matrix();
                self.canvas.concat(&affine_to_matrix(xf));
            }
            StateOp::PushLayer(layer) => self.push_layer(layer),
            StateOp::PopLayer => match self.stack.pop() {
                Some(StackEntry::Noop) => {}
                Some(StackEntry::Restore) => {
                    self.canvas.restore();
                }
                None => log::warn!("PopLayer with no pushed layer ignored"),
            },
            StateOp::SetPaint(id) => {
                if let Some(Some(desc)) = self.paints.get(id.0 as usize) {
                    self.current_brush = desc.brush.clone();
                }
            }
            StateOp::SetStroke(style) => self.current_stroke = Some(style),
            StateOp::SetFillRule(rule) => self.current_fill_rule = rule,
        }
    }

    fn draw(&mut self, op: DrawOp) {
        match op {
            DrawOp::FillPath(id) => {
                if let Some(Some(path)) = self.paths.get(id.0 as usize) {
                    let path = path_with_fill_rule(path, self.current_fill_rule);
                    let mut paint = brush_to_paint(&self.current_brush);
                    paint.set_style(sk::PaintStyle::Fill);
                    self.canvas.draw_path(&path, &paint);
                }
            }
            DrawOp::StrokePath(id) => {
                if let (Some(Some(path)), Some(stroke)) =
                    (self.paths.get(id.0 as usize), self.current_stroke.as_ref())
                {
                    let mut paint = brush_to_paint(&self.current_brush);
                    apply_stroke_style(&mut paint, stroke);
                    self.canvas.draw_path(path, &paint);
                }
            }
            DrawOp::FillRect { x0, y0, x1, y1 } => {
                let mut paint = brush_to_paint(&self.current_brush);
                paint.set_style(sk::PaintStyle::Fill);
                self.canvas.draw_rect(sk::Rect::new(x0, y0, x1, y1), &paint);
            }
        }
    }
}
