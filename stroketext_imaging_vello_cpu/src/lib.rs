// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU backend for the stroketext imaging IR.
//!
//! [`VelloCpuImagingBackend`] draws into a borrowed [`vello_cpu::RenderContext`].
//! Glyph outlines are stroked as true paths, so stroked text nodes use the
//! native stroke pass on this backend; see [`CAPABILITIES`].
//!
//! ```ignore
//! let mut ctx = vello_cpu::RenderContext::new(256, 64);
//! let mut backend = VelloCpuImagingBackend::new(&mut ctx);
//! node.draw(&mut backend, kurbo::Point::ORIGIN);
//! backend.ctx.flush();
//! ```

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Affine, Cap, Join};
use peniko::{Brush, Fill};
use stroketext_imaging::{
    DrawOp, FillRule, ImagingBackend, LayerOp, PaintDesc, PaintId, PathCmd, PathDesc, PathId,
    ResourceBackend, StateOp, StrokeStyle,
};
use stroketext_style::{BackendCapabilities, InsetRounding};
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath, Cap as CpuCap, Join as CpuJoin, Rect, Stroke,
};
use vello_cpu::{Image as CpuImage, ImageSource, RenderContext};

/// What this backend can do: true outline strokes at fractional positions.
pub const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    outline_stroke: true,
    inset_rounding: InsetRounding::Exact,
    subpixel_text: true,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StackEntry {
    Noop,
    Pushed,
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn fill_to_cpu(rule: FillRule) -> Fill {
    match rule {
        FillRule::NonZero => Fill::NonZero,
        FillRule::EvenOdd => Fill::EvenOdd,
    }
}

fn cap_to_cpu(cap: Cap) -> CpuCap {
    match cap {
        Cap::Butt => CpuCap::Butt,
        Cap::Round => CpuCap::Round,
        Cap::Square => CpuCap::Square,
    }
}

fn stroke_to_cpu(style: &StrokeStyle) -> Stroke {
    let mut stroke = Stroke::new(style.width);
    stroke.miter_limit = style.miter_limit;
    stroke.join = match style.join {
        Join::Bevel => CpuJoin::Bevel,
        Join::Miter => CpuJoin::Miter,
        Join::Round => CpuJoin::Round,
    };
    stroke.start_cap = cap_to_cpu(style.start_cap);
    stroke.end_cap = cap_to_cpu(style.end_cap);
    stroke
}

fn desc_to_bez(desc: &PathDesc) -> BezPath {
    let mut p = BezPath::new();
    for cmd in desc.commands.iter() {
        match *cmd {
            PathCmd::MoveTo { x, y } => p.move_to((f64::from(x), f64::from(y))),
            PathCmd::LineTo { x, y } => p.line_to((f64::from(x), f64::from(y))),
            PathCmd::QuadTo { x1, y1, x, y } => {
                p.quad_to((f64::from(x1), f64::from(y1)), (f64::from(x), f64::from(y)));
            }
            PathCmd::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => p.curve_to(
                (f64::from(x1), f64::from(y1)),
                (f64::from(x2), f64::from(y2)),
                (f64::from(x), f64::from(y)),
            ),
            PathCmd::Close => p.close_path(),
        }
    }
    p
}

/// CPU-backed implementation of the imaging backend using `vello_cpu`.
pub struct VelloCpuImagingBackend<'ctx> {
    /// Underlying Vello CPU render context to draw into.
    pub ctx: &'ctx mut RenderContext,
    paths: Vec<Option<BezPath>>,
    paints: Vec<Option<PaintDesc>>,

    stack: Vec<StackEntry>,
    current_paint: Option<PaintId>,
}

impl fmt::Debug for VelloCpuImagingBackend<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelloCpuImagingBackend")
            .field("live_paths", &self.paths.iter().flatten().count())
            .field("live_paints", &self.paints.iter().flatten().count())
            .field("layers", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<'ctx> VelloCpuImagingBackend<'ctx> {
    /// Create a new backend that renders into the given CPU render context.
    pub fn new(ctx: &'ctx mut RenderContext) -> Self {
        Self {
            ctx,
            paths: Vec::new(),
            paints: Vec::new(),
            stack: Vec::new(),
            current_paint: None,
        }
    }

    /// Number of layers pushed and not yet popped.
    pub fn layer_depth(&self) -> usize {
        self.stack.len()
    }

    fn apply_current_paint(&mut self) {
        let Some(id) = self.current_paint else {
            return;
        };
        let Some(Some(PaintDesc { brush })) = self.paints.get(id.0 as usize) else {
            return;
        };
        match brush.clone() {
            Brush::Solid(color) => self.ctx.set_paint(color),
            Brush::Gradient(gradient) => self.ctx.set_paint(gradient),
            Brush::Image(image_brush) => {
                let image = CpuImage {
                    image: ImageSource::from_peniko_image_data(&image_brush.image),
                    sampler: image_brush.sampler,
                };
                self.ctx.set_paint(image);
            }
        }
    }

    fn push_layer(&mut self, layer: LayerOp) {
        if layer.is_noop() {
            self.stack.push(StackEntry::Noop);
            return;
        }
        self.ctx
            .push_layer(None, None, Some(layer.alpha()), None, None);
        self.stack.push(StackEntry::Pushed);
    }
}

impl ResourceBackend for VelloCpuImagingBackend<'_> {
    fn create_path(&mut self, desc: PathDesc) -> PathId {
        let id = u32::try_from(self.paths.len())
            .expect("VelloCpuImagingBackend: too many paths for u32 PathId");
        self.paths.push(Some(desc_to_bez(&desc)));
        PathId(id)
    }

    fn destroy_path(&mut self, id: PathId) {
        if let Some(slot) = self.paths.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
        let id = u32::try_from(self.paints.len())
            .expect("VelloCpuImagingBackend: too many paints for u32 PaintId");
        self.paints.push(Some(desc));
        PaintId(id)
    }

    fn destroy_paint(&mut self, id: PaintId) {
        if let Some(slot) = self.paints.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl ImagingBackend for VelloCpuImagingBackend<'_> {
    fn state(&mut self, op: StateOp) {
        match op {
            StateOp::SetTransform(xf) => self.ctx.set_transform(affine_to_cpu(xf)),
            StateOp::PushLayer(layer) => self.push_layer(layer),
            StateOp::PopLayer => match self.stack.pop() {
                Some(StackEntry::Noop) => {}
                Some(StackEntry::Pushed) => self.ctx.pop_layer(),
                None => log::warn!("PopLayer with no pushed layer ignored"),
            },
            StateOp::SetPaint(id) => {
                self.current_paint = Some(id);
                self.apply_current_paint();
            }
            StateOp::SetStroke(style) => self.ctx.set_stroke(stroke_to_cpu(&style)),
            StateOp::SetFillRule(rule) => self.ctx.set_fill_rule(fill_to_cpu(rule)),
        }
    }

    fn draw(&mut self, op: DrawOp) {
        match op {
            DrawOp::FillPath(id) => {
                if let Some(Some(path)) = self.paths.get(id.0 as usize) {
                    self.ctx.fill_path(path);
                }
            }
            DrawOp::StrokePath(id) => {
                if let Some(Some(path)) = self.paths.get(id.0 as usize) {
                    self.ctx.stroke_path(path);
                }
            }
            DrawOp::FillRect { x0, y0, x1, y1 } => {
                let rect = Rect::new(
                    f64::from(x0),
                    f64::from(y0),
                    f64::from(x1),
                    f64::from(y1),
                );
                self.ctx.fill_rect(&rect);
            }
        }
    }
}
