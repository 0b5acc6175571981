// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backends for stroked text.
//!
//! Two routes to the page:
//!
//! - `WebCanvasImagingBackend` (`wasm32` only) implements [`ImagingBackend`]
//!   on a `CanvasRenderingContext2d`. Canvas 2D strokes paths natively, so
//!   stroked text takes the true stroke pass; see [`CAPABILITIES`].
//! - The [`dom`] module describes the same node as three styled DOM elements
//!   for pages that lay text out with the browser's own text engine. It is
//!   plain data and works on every target.
//!
//! Prefer `WebCanvasImagingBackend::new_html_canvas` when you have the
//! canvas element: group opacity then renders through a scratch canvas, so a
//! translucent node's stroke does not show through its fill. With only a
//! context, opacity is applied per draw.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn make_backend(
//!     canvas: web_sys::HtmlCanvasElement,
//! ) -> Result<stroketext_imaging_web_canvas::WebCanvasImagingBackend, wasm_bindgen::JsValue> {
//!     stroketext_imaging_web_canvas::WebCanvasImagingBackend::new_html_canvas(canvas)
//! }
//! ```

#![no_std]

extern crate alloc;

pub mod dom;

use stroketext_style::{BackendCapabilities, InsetRounding};

#[cfg(target_arch = "wasm32")]
pub use canvas::WebCanvasImagingBackend;

/// What the canvas backend can do: true outline strokes at fractional
/// positions.
pub const CAPABILITIES: BackendCapabilities = BackendCapabilities {
    outline_stroke: true,
    inset_rounding: InsetRounding::Exact,
    subpixel_text: true,
};

/// Capabilities of a node drawn with [`dom::DomOutline::TextShadow`]: the
/// outline is eight fill copies rather than a stroke.
pub const SHADOW_CAPABILITIES: BackendCapabilities = BackendCapabilities {
    outline_stroke: false,
    ..CAPABILITIES
};

#[cfg(target_arch = "wasm32")]
mod canvas {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;
    use core::fmt;

    use kurbo::{Affine, Cap, Join};
    use peniko::Brush;
    use stroketext_imaging::{
        DrawOp, FillRule, ImagingBackend, LayerOp, PaintDesc, PaintId, PathCmd, PathDesc, PathId,
        ResourceBackend, StateOp, StrokeStyle,
    };
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement};

    fn color_to_css(color: peniko::Color) -> String {
        // `Rgba8` formats as a CSS `rgb(...)`/`rgba(...)` string.
        color.to_rgba8().to_string()
    }

    fn brush_to_css(brush: &Brush) -> String {
        match brush {
            Brush::Solid(color) => color_to_css(*color),
            Brush::Gradient(grad) => grad.stops.last().map_or_else(
                || String::from("transparent"),
                |stop| color_to_css(stop.color.to_alpha_color::<peniko::color::Srgb>()),
            ),
            Brush::Image(_) => String::from("#ff00ff"),
        }
    }

    fn fill_rule_to_canvas(rule: FillRule) -> CanvasWindingRule {
        match rule {
            FillRule::NonZero => CanvasWindingRule::Nonzero,
            FillRule::EvenOdd => CanvasWindingRule::Evenodd,
        }
    }

    fn apply_stroke_style(ctx: &CanvasRenderingContext2d, style: &StrokeStyle) {
        ctx.set_line_width(style.width);
        ctx.set_miter_limit(style.miter_limit);
        ctx.set_line_cap(match style.start_cap {
            Cap::Butt => "butt",
            Cap::Round => "round",
            Cap::Square => "square",
        });
        ctx.set_line_join(match style.join {
            Join::Bevel => "bevel",
            Join::Miter => "miter",
            Join::Round => "round",
        });
    }

    fn begin_path_from_desc(ctx: &CanvasRenderingContext2d, desc: &PathDesc) {
        ctx.begin_path();
        for cmd in desc.commands.iter() {
            match *cmd {
                PathCmd::MoveTo { x, y } => ctx.move_to(f64::from(x), f64::from(y)),
                PathCmd::LineTo { x, y } => ctx.line_to(f64::from(x), f64::from(y)),
                PathCmd::QuadTo { x1, y1, x, y } => ctx.quadratic_curve_to(
                    f64::from(x1),
                    f64::from(y1),
                    f64::from(x),
                    f64::from(y),
                ),
                PathCmd::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => ctx.bezier_curve_to(
                    f64::from(x1),
                    f64::from(y1),
                    f64::from(x2),
                    f64::from(y2),
                    f64::from(x),
                    f64::from(y),
                ),
                PathCmd::Close => ctx.close_path(),
            }
        }
    }

    fn scratch_context(
        root: &HtmlCanvasElement,
    ) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
        let doc = web_sys::window()
            .and_then(|w| w.document())
            .or_else(|| root.owner_document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = doc
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(root.width());
        canvas.set_height(root.height());
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("missing 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok((canvas, ctx))
    }

    #[derive(Clone, Debug)]
    enum LayerEntry {
        Noop,
        Direct,
        Isolated {
            parent_ctx: CanvasRenderingContext2d,
            scratch_canvas: HtmlCanvasElement,
            opacity: f32,
        },
    }

    /// Canvas 2D backend (only available on `wasm32`).
    pub struct WebCanvasImagingBackend {
        ctx: CanvasRenderingContext2d,
        root_canvas: Option<HtmlCanvasElement>,
        paths: Vec<Option<PathDesc>>,
        paints: Vec<Option<PaintDesc>>,
        layer_stack: Vec<LayerEntry>,
        current_transform: Affine,
        current_brush: Brush,
        current_stroke: Option<StrokeStyle>,
        current_fill_rule: FillRule,
    }

    impl fmt::Debug for WebCanvasImagingBackend {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("WebCanvasImagingBackend")
                .field("isolated_layers", &self.root_canvas.is_some())
                .field("layers", &self.layer_stack.len())
                .finish_non_exhaustive()
        }
    }

    impl WebCanvasImagingBackend {
        /// Create a backend that draws into the given canvas 2D context.
        ///
        /// Layer opacity is approximated with `globalAlpha` per draw.
        pub fn new(ctx: CanvasRenderingContext2d) -> Self {
            Self {
                ctx,
                root_canvas: None,
                paths: Vec::new(),
                paints: Vec::new(),
                layer_stack: Vec::new(),
                current_transform: Affine::IDENTITY,
                current_brush: Brush::Solid(peniko::Color::BLACK),
                current_stroke: None,
                current_fill_rule: FillRule::NonZero,
            }
        }

        /// Create a backend for a DOM canvas element, with isolated layer
        /// opacity.
        pub fn new_html_canvas(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
            let ctx = canvas
                .get_context("2d")?
                .ok_or_else(|| JsValue::from_str("missing 2d context"))?
                .dyn_into::<CanvasRenderingContext2d>()?;
            Ok(Self {
                root_canvas: Some(canvas),
                ..Self::new(ctx)
            })
        }

        fn apply_transform(&self) {
            let [a, b, c, d, e, f] = self.current_transform.as_coeffs();
            let _ = self.ctx.set_transform(a, b, c, d, e, f);
        }

        fn push_layer(&mut self, layer: LayerOp) {
            if layer.is_noop() {
                self.layer_stack.push(LayerEntry::Noop);
                return;
            }
            if let Some(root) = self.root_canvas.as_ref() {
                match scratch_context(root) {
                    Ok((scratch_canvas, scratch_ctx)) => {
                        scratch_ctx.save();
                        let [a, b, c, d, e, f] = self.current_transform.as_coeffs();
                        let _ = scratch_ctx.set_transform(a, b, c, d, e, f);
                        if let Some(style) = self.current_stroke.as_ref() {
                            apply_stroke_style(&scratch_ctx, style);
                        }
                        let parent_ctx = core::mem::replace(&mut self.ctx, scratch_ctx);
                        self.layer_stack.push(LayerEntry::Isolated {
                            parent_ctx,
                            scratch_canvas,
                            opacity: layer.alpha(),
                        });
                        return;
                    }
                    Err(err) => {
                        log::debug!("scratch canvas unavailable, using direct layer: {err:?}");
                    }
                }
            }

            self.ctx.save();
            let parent_alpha = self.ctx.global_alpha();
            self.ctx
                .set_global_alpha(parent_alpha * f64::from(layer.alpha()));
            self.layer_stack.push(LayerEntry::Direct);
        }

        fn pop_layer(&mut self) {
            match self.layer_stack.pop() {
                Some(LayerEntry::Noop) => {}
                Some(LayerEntry::Direct) => self.ctx.restore(),
                Some(LayerEntry::Isolated {
                    parent_ctx,
                    scratch_canvas,
                    opacity,
                }) => {
                    self.ctx.restore();
                    self.ctx = parent_ctx;
                    self.ctx.save();
                    let _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
                    let parent_alpha = self.ctx.global_alpha();
                    self.ctx.set_global_alpha(parent_alpha * f64::from(opacity));
                    let _ = self
                        .ctx
                        .draw_image_with_html_canvas_element(&scratch_canvas, 0.0, 0.0);
                    self.ctx.restore();
                    self.apply_transform();
                    if let Some(style) = self.current_stroke.as_ref() {
                        apply_stroke_style(&self.ctx, style);
                    }
                }
                None => log::warn!("PopLayer with no pushed layer ignored"),
            }
        }
    }

    impl ResourceBackend for WebCanvasImagingBackend {
        fn create_path(&mut self, desc: PathDesc) -> PathId {
            let id = u32::try_from(self.paths.len())
                .expect("WebCanvasImagingBackend: too many paths for u32 PathId");
            self.paths.push(Some(desc));
            PathId(id)
        }

        fn destroy_path(&mut self, id: PathId) {
            if let Some(slot) = self.paths.get_mut(id.0 as usize) {
                *slot = None;
            }
        }

        fn create_paint(&mut self, desc: PaintDesc) -> PaintId {
            let id = u32::try_from(self.paints.len())
                .expect("WebCanvasImagingBackend: too many paints for u32 PaintId");
            self.paints.push(Some(desc));
            PaintId(id)
        }

        fn destroy_paint(&mut self, id: PaintId) {
            if let Some(slot) = self.paints.get_mut(id.0 as usize) {
                *slot = None;
            }
        }
    }

    impl ImagingBackend for WebCanvasImagingBackend {
        fn state(&mut self, op: StateOp) {
            match op {
                StateOp::SetTransform(xf) => {
                    self.current_transform = xf;
                    self.apply_transform();
                }
                StateOp::PushLayer(layer) => self.push_layer(layer),
                StateOp::PopLayer => self.pop_layer(),
                StateOp::SetPaint(id) => {
                    if let Some(Some(desc)) = self.paints.get(id.0 as usize) {
                        self.current_brush = desc.brush.clone();
                    }
                }
                StateOp::SetStroke(style) => {
                    apply_stroke_style(&self.ctx, &style);
                    self.current_stroke = Some(style);
                }
                StateOp::SetFillRule(rule) => self.current_fill_rule = rule,
            }
        }

        fn draw(&mut self, op: DrawOp) {
            match op {
                DrawOp::FillPath(id) => {
                    if let Some(Some(desc)) = self.paths.get(id.0 as usize) {
                        begin_path_from_desc(&self.ctx, desc);
                        self.ctx.set_fill_style_str(&brush_to_css(&self.current_brush));
                        self.ctx
                            .fill_with_canvas_winding_rule(fill_rule_to_canvas(
                                self.current_fill_rule,
                            ));
                    }
                }
                DrawOp::StrokePath(id) => {
                    if self.current_stroke.is_none() {
                        return;
                    }
                    if let Some(Some(desc)) = self.paths.get(id.0 as usize) {
                        begin_path_from_desc(&self.ctx, desc);
                        self.ctx
                            .set_stroke_style_str(&brush_to_css(&self.current_brush));
                        self.ctx.stroke();
                    }
                }
                DrawOp::FillRect { x0, y0, x1, y1 } => {
                    self.ctx.set_fill_style_str(&brush_to_css(&self.current_brush));
                    self.ctx.fill_rect(
                        f64::from(x0),
                        f64::from(y0),
                        f64::from(x1 - x0),
                        f64::from(y1 - y0),
                    );
                }
            }
        }
    }
}
