// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering laid out glyphs and decorations into imaging operations.

use alloc::collections::BTreeMap;

use kurbo::{Affine, Rect};
use stroketext_imaging::{
    DrawOp, ImagingBackend, PaintId, PathId, RectF, ResourceBackend, StateOp, StrokeStyle,
};
use stroketext_layout::{FaceId, PositionedGlyph, SYNTHETIC_ITALIC_SKEW};

use crate::outline::GlyphOutlineSource;

/// How a glyph run is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphPass {
    /// Fill the outlines with the current paint.
    Fill,
    /// Stroke the outlines.
    Stroke(StrokeStyle),
}

/// Glyph path resources for one face and size, shared by the passes of a
/// frame.
///
/// Paths are created on first use. Call [`GlyphPaths::release`] when the
/// frame is done.
#[derive(Clone, Debug)]
pub struct GlyphPaths {
    face: FaceId,
    font_size: f32,
    synthetic_italic: bool,
    paths: BTreeMap<u32, Option<PathId>>,
}

impl GlyphPaths {
    /// Paths for glyphs of `face` at `font_size` pixels, sheared when the
    /// face stands in for a missing italic.
    pub fn new(face: FaceId, font_size: f32, synthetic_italic: bool) -> Self {
        Self {
            face,
            font_size,
            synthetic_italic,
            paths: BTreeMap::new(),
        }
    }

    /// The path for `glyph`, created if needed; `None` for glyphs without ink.
    pub fn path<B, S>(&mut self, backend: &mut B, source: &S, glyph: u32) -> Option<PathId>
    where
        B: ResourceBackend + ?Sized,
        S: GlyphOutlineSource + ?Sized,
    {
        *self.paths.entry(glyph).or_insert_with(|| {
            let outline = source.glyph_outline(self.face, glyph, self.font_size)?;
            let outline = if self.synthetic_italic {
                outline.transformed(Affine::skew(SYNTHETIC_ITALIC_SKEW, 0.0))
            } else {
                outline
            };
            Some(backend.create_path(outline))
        })
    }

    /// Number of live path resources.
    pub fn len(&self) -> usize {
        self.paths.values().flatten().count()
    }

    /// Whether no path resource is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroy every path resource.
    pub fn release<B: ResourceBackend + ?Sized>(self, backend: &mut B) {
        for id in self.paths.into_values().flatten() {
            backend.destroy_path(id);
        }
    }
}

/// Draw `glyphs` with `paint`.
///
/// Each glyph is drawn under `transform * translate(glyph origin)`. The paint,
/// and for stroke passes the stroke style, are set once for the run.
pub fn draw_glyph_run<B, S>(
    backend: &mut B,
    source: &S,
    paths: &mut GlyphPaths,
    glyphs: &[PositionedGlyph],
    paint: PaintId,
    pass: &GlyphPass,
    transform: Affine,
) where
    B: ImagingBackend + ?Sized,
    S: GlyphOutlineSource + ?Sized,
{
    log::trace!("drawing {} glyphs, {pass:?}", glyphs.len());
    backend.state(StateOp::SetPaint(paint));
    if let GlyphPass::Stroke(style) = pass {
        backend.state(StateOp::SetStroke(style.clone()));
    }
    for glyph in glyphs {
        let Some(path) = paths.path(backend, source, glyph.id) else {
            continue;
        };
        let origin = Affine::translate((f64::from(glyph.x), f64::from(glyph.y)));
        backend.state(StateOp::SetTransform(transform * origin));
        backend.draw(match pass {
            GlyphPass::Fill => DrawOp::FillPath(path),
            GlyphPass::Stroke(_) => DrawOp::StrokePath(path),
        });
    }
}

/// Fill decoration rectangles with `paint`.
pub fn draw_decorations<B: ImagingBackend + ?Sized>(
    backend: &mut B,
    rects: &[Rect],
    paint: PaintId,
    transform: Affine,
) {
    if rects.is_empty() {
        return;
    }
    backend.state(StateOp::SetPaint(paint));
    backend.state(StateOp::SetTransform(transform));
    for rect in rects {
        backend.draw(DrawOp::fill_rect(RectF::from_kurbo(*rect)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use stroketext_imaging::{PathCmd, PathDesc};
    use stroketext_imaging_ref::RefBackend;

    /// A unit square for every glyph except 32.
    struct Squares;

    impl GlyphOutlineSource for Squares {
        fn glyph_outline(&self, _face: FaceId, glyph: u32, size: f32) -> Option<PathDesc> {
            (glyph != 32).then(|| PathDesc {
                commands: vec![
                    PathCmd::MoveTo { x: 0.0, y: -size },
                    PathCmd::LineTo { x: size, y: -size },
                    PathCmd::LineTo { x: size, y: 0.0 },
                    PathCmd::LineTo { x: 0.0, y: 0.0 },
                    PathCmd::Close,
                ]
                .into_boxed_slice(),
            })
        }
    }

    fn glyphs(ids: &[u32]) -> Vec<PositionedGlyph> {
        ids.iter()
            .zip(0_u8..)
            .map(|(&id, i)| PositionedGlyph {
                id,
                x: f32::from(i) * 10.0,
                y: 8.0,
            })
            .collect()
    }

    #[test]
    fn repeated_glyphs_share_a_path() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(stroketext_imaging::PaintDesc::solid(peniko::Color::BLACK));
        let mut paths = GlyphPaths::new(FaceId(0), 10.0, false);
        let run = glyphs(&[65, 32, 65, 66]);
        draw_glyph_run(
            &mut backend,
            &Squares,
            &mut paths,
            &run,
            paint,
            &GlyphPass::Fill,
            Affine::IDENTITY,
        );
        assert_eq!(paths.len(), 2);
        let draws: Vec<_> = backend.draws().collect();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].0, draws[1].0);
        assert_eq!(
            draws[1].1.transform,
            Affine::translate((20.0, 8.0))
        );

        paths.release(&mut backend);
        assert_eq!(backend.live_paths(), 0);
    }

    #[test]
    fn stroke_pass_sets_style_once() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(stroketext_imaging::PaintDesc::solid(peniko::Color::WHITE));
        let mut paths = GlyphPaths::new(FaceId(0), 10.0, false);
        let style = StrokeStyle::new(4.0);
        draw_glyph_run(
            &mut backend,
            &Squares,
            &mut paths,
            &glyphs(&[65, 66]),
            paint,
            &GlyphPass::Stroke(style.clone()),
            Affine::translate((2.0, 2.0)),
        );
        let strokes = backend
            .events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    stroketext_imaging_ref::Event::State {
                        op: StateOp::SetStroke(_),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(strokes, 1);
        assert!(
            backend
                .draws()
                .all(|(op, state)| matches!(op, DrawOp::StrokePath(_))
                    && state.stroke.as_ref() == Some(&style))
        );
    }

    #[test]
    fn synthetic_italic_shears_outlines() {
        let mut backend = RefBackend::default();
        let mut paths = GlyphPaths::new(FaceId(0), 10.0, true);
        let id = paths.path(&mut backend, &Squares, 65).unwrap();
        let path = backend.path(id).unwrap();
        // The top-left corner at y = -10 leans right by 2.5.
        assert_eq!(path.commands[0], PathCmd::MoveTo { x: 2.5, y: -10.0 });
    }

    #[test]
    fn decorations_are_filled_rects() {
        let mut backend = RefBackend::default();
        let paint = backend.create_paint(stroketext_imaging::PaintDesc::solid(peniko::Color::BLACK));
        draw_decorations(
            &mut backend,
            &[Rect::new(0.0, 9.0, 20.0, 10.0)],
            paint,
            Affine::IDENTITY,
        );
        let draws: Vec<_> = backend.draws().map(|(op, _)| op.clone()).collect();
        assert_eq!(
            draws,
            [DrawOp::FillRect {
                x0: 0.0,
                y0: 9.0,
                x1: 20.0,
                y1: 10.0
            }]
        );
    }
}
