// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Cap, Join, Point, Size, Vec2};
use stroketext_imaging::{FillRule, ImagingBackend, LayerOp, PaintDesc, StateOp, StrokeStyle};
use stroketext_layout::{
    LayoutCache, LayoutParams, StrokeFillLayouts, TextMeasurer, outline_shadow_offsets,
    shadow_extent,
};
use stroketext_style::{
    HostConfig, ResolvedStrokeText, StrokeTextProps, StrokeTextStyle, reconcile, resolve,
};
use stroketext_text_imaging::{
    GlyphOutlineSource, GlyphPass, GlyphPaths, draw_decorations, draw_glyph_run,
};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::measurement::ShadowLayout;

/// Size limits offered by the host, in pixels. `None` is unbounded.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Constraints {
    /// Maximum width.
    pub max_width: Option<f64>,
    /// Maximum height.
    pub max_height: Option<f64>,
}

impl Constraints {
    /// No limits.
    pub const UNBOUNDED: Self = Self {
        max_width: None,
        max_height: None,
    };

    /// Limit only the width.
    pub const fn width(max_width: f64) -> Self {
        Self {
            max_width: Some(max_width),
            max_height: None,
        }
    }
}

/// The interface every host drives a stroked text node through.
pub trait StrokeTextView {
    /// Apply one batch of style changes.
    fn configure(&mut self, style: StrokeTextStyle);

    /// Size of the node, insets included, within `constraints`.
    fn measure(&mut self, constraints: Constraints) -> Size;

    /// Draw the node with its top-left corner at `origin`.
    fn draw(&mut self, backend: &mut dyn ImagingBackend, origin: Point);

    /// Drop cached layouts so the next measure or draw rebuilds them.
    fn invalidate(&mut self);
}

/// A stroked text node.
///
/// The node owns its style, the [`HostConfig`] it was resolved against, and
/// a [`LayoutCache`] holding the paired stroke and fill layouts.
#[derive(Clone, Debug)]
pub struct StrokeTextNode<F> {
    fonts: F,
    host: HostConfig,
    style: StrokeTextStyle,
    resolved: ResolvedStrokeText,
    size: Option<Size>,
    scroll: Vec2,
    cache: LayoutCache,
}

impl<F: TextMeasurer + GlyphOutlineSource> StrokeTextNode<F> {
    /// A node with the default style.
    pub fn new(fonts: F, host: HostConfig) -> Self {
        let style = StrokeTextStyle::default();
        let resolved = resolve(&style, &host);
        Self {
            fonts,
            host,
            style,
            resolved,
            size: None,
            scroll: Vec2::ZERO,
            cache: LayoutCache::new(),
        }
    }

    /// Reconcile `props` and apply the result.
    pub fn set_props(&mut self, props: &StrokeTextProps) {
        let style = reconcile(props, self.host.defaults.named_colors);
        self.configure(style);
    }

    /// Replace the host configuration and re-resolve the style.
    pub fn set_host(&mut self, host: HostConfig) {
        if self.host == host {
            return;
        }
        self.host = host;
        self.resolved = resolve(&self.style, &self.host);
        self.cache.invalidate();
    }

    /// Size assigned by the host; its width bounds line breaking in `draw`.
    pub fn set_size(&mut self, size: Size) {
        self.size = Some(size);
    }

    /// Content scroll offset, subtracted from the draw origin.
    pub fn set_scroll_offset(&mut self, offset: Vec2) {
        self.scroll = offset;
    }

    /// The font source.
    #[must_use]
    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    /// The host configuration.
    #[must_use]
    pub fn host(&self) -> &HostConfig {
        &self.host
    }

    /// The current style.
    #[must_use]
    pub fn style(&self) -> &StrokeTextStyle {
        &self.style
    }

    /// The style in device pixels.
    #[must_use]
    pub fn resolved(&self) -> &ResolvedStrokeText {
        &self.resolved
    }

    /// Description of the measurement node and overlay for
    /// [`HostLayoutStrategy::ShadowNode`](crate::HostLayoutStrategy::ShadowNode).
    #[must_use]
    pub fn shadow_layout(&self) -> ShadowLayout {
        ShadowLayout::from_resolved(&self.resolved)
    }

    /// Number of times the layouts were built.
    #[must_use]
    pub fn layout_builds(&self) -> u64 {
        self.cache.rebuilds()
    }

    /// The paired layouts for a container `box_width` pixels wide.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "layout works in f32 pixels"
    )]
    pub fn layouts(&mut self, box_width: Option<f64>) -> &StrokeFillLayouts {
        let insets = self.resolved.insets.total;
        let available = box_width.map(|w| (w as f32 - insets.horizontal()).max(0.0));
        let params = LayoutParams::from_resolved(
            &self.resolved,
            available,
            !self.host.capabilities.subpixel_text,
        );
        self.cache
            .get_or_build(&self.resolved.text, &params, &self.fonts)
    }
}

impl<F: TextMeasurer + GlyphOutlineSource> StrokeTextView for StrokeTextNode<F> {
    fn configure(&mut self, style: StrokeTextStyle) {
        self.resolved = resolve(&style, &self.host);
        self.style = style;
        self.cache.invalidate();
    }

    fn measure(&mut self, constraints: Constraints) -> Size {
        let insets = self.resolved.insets.total;
        let text = self.layouts(constraints.max_width).size();
        let width = text.width.ceil() + f64::from(insets.horizontal());
        let height = text.height.ceil() + f64::from(insets.vertical());
        Size::new(
            constraints.max_width.map_or(width, |max| width.min(max)),
            constraints.max_height.map_or(height, |max| height.min(max)),
        )
    }

    fn draw(&mut self, backend: &mut dyn ImagingBackend, origin: Point) {
        let box_width = self.size.map(|s| s.width);
        self.layouts(box_width);
        let Some(layouts) = self.cache.cached() else {
            return;
        };
        let resolved = &self.resolved;
        let Some(selection) = layouts.fill.selection else {
            return;
        };
        if resolved.opacity <= 0.0 || layouts.fill.is_empty() {
            return;
        }

        let insets = resolved.insets.total;
        let offset = Vec2::new(f64::from(insets.left), f64::from(insets.top)) - self.scroll;
        let transform = Affine::translate(origin.to_vec2() + offset);

        let layer = resolved.opacity < 1.0;
        if layer {
            backend.state(StateOp::PushLayer(LayerOp::opacity(resolved.opacity)));
        }
        backend.state(StateOp::SetFillRule(FillRule::NonZero));

        let mut paths =
            GlyphPaths::new(selection.face, layouts.fill.font_size, selection.synthetic_italic);

        if resolved.draws_stroke() {
            let paint = backend.create_paint(PaintDesc::solid(resolved.stroke.to_color()));
            if self.host.capabilities.outline_stroke {
                log::trace!("stroke pass, width {}", resolved.stroke_width_px);
                let style = StrokeStyle::new(f64::from(resolved.stroke_width_px))
                    .with_join(Join::Round)
                    .with_caps(Cap::Round);
                draw_glyph_run(
                    backend,
                    &self.fonts,
                    &mut paths,
                    &layouts.stroke.glyphs,
                    paint,
                    &GlyphPass::Stroke(style),
                    transform,
                );
            } else {
                log::trace!("shadow outline pass, width {}", resolved.stroke_width_px);
                for shift in outline_shadow_offsets(shadow_extent(resolved.stroke_width_px)) {
                    draw_glyph_run(
                        backend,
                        &self.fonts,
                        &mut paths,
                        &layouts.stroke.glyphs,
                        paint,
                        &GlyphPass::Fill,
                        transform * Affine::translate(shift),
                    );
                }
            }
            backend.destroy_paint(paint);
        }

        let paint = backend.create_paint(PaintDesc::solid(resolved.fill.to_color()));
        draw_glyph_run(
            backend,
            &self.fonts,
            &mut paths,
            &layouts.fill.glyphs,
            paint,
            &GlyphPass::Fill,
            transform,
        );
        draw_decorations(backend, &layouts.fill.decorations, paint, transform);
        backend.destroy_paint(paint);
        paths.release(backend);

        if layer {
            backend.state(StateOp::PopLayer);
        }
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
