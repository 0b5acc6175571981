// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroketext Imaging: backend-agnostic imaging IR and backend traits.
//!
//! Stroked text is drawn as plain vector operations: glyph outlines become
//! path resources, fill and outline colors become paint resources, and a
//! node's draw pass becomes a short sequence of [`StateOp`]s and
//! [`DrawOp`]s. Every backend (CPU rasterizer, Skia canvas, browser canvas,
//! recording backend for tests) consumes the same sequence, so the geometry
//! computed by layout reaches every backend unchanged.
//!
//! # Core concepts
//!
//! - **Resources**: small, opaque handles ([`PathId`], [`PaintId`]) whose
//!   lifetimes are managed via [`ResourceBackend`].
//! - **Imaging operations**: [`StateOp`] (mutate state) and [`DrawOp`]
//!   (produce pixels).
//! - **Layers**: [`LayerOp`] composites a group with one opacity. Layers
//!   must be well-nested.
//! - **Backends**: [`ImagingBackend`] accepts imaging ops.
//!
//! # Example
//!
//! ```ignore
//! # use stroketext_imaging::*;
//! # use peniko::Color;
//! let mut backend = MyBackend::new();
//!
//! let outline = backend.create_paint(PaintDesc::solid(Color::BLACK));
//! let glyph = backend.create_path(PathDesc::from_bez_path(&glyph_outline));
//!
//! backend.state(StateOp::SetPaint(outline));
//! backend.state(StateOp::SetStroke(StrokeStyle::new(4.0)));
//! backend.draw(DrawOp::StrokePath(glyph));
//! ```

#![no_std]

extern crate alloc;

use alloc::{boxed::Box, vec::Vec};
use kurbo::{BezPath, PathEl, Point};
use peniko::{Brush, Color};
pub use peniko::Fill as FillRule;

/// Identifier for a path resource.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// resource. Glyph paths are expected to be reused across the stroke and fill
/// passes of a frame.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathId(pub u32);

/// Identifier for a paint resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaintId(pub u32);

/// Affine transform type used by the imaging IR.
pub type Affine = kurbo::Affine;

/// A simple axis-aligned rectangle in f32 coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectF {
    /// Minimum X coordinate.
    pub x0: f32,
    /// Minimum Y coordinate.
    pub y0: f32,
    /// Maximum X coordinate.
    pub x1: f32,
    /// Maximum Y coordinate.
    pub y1: f32,
}

impl RectF {
    /// Create a new rectangle from min/max corners.
    #[inline]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Convert from kurbo's rectangle type.
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "imaging geometry is f32 by design of the IR"
    )]
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        Self::new(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        )
    }
}

/// A group composited into its parent with one opacity.
///
/// Stroke and fill overlap inside the layer, so group opacity keeps the
/// stroke from showing through a translucent fill.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerOp {
    /// Opacity applied when compositing this layer into its parent.
    pub opacity: f32,
}

impl LayerOp {
    /// A layer that fades its contents.
    #[inline]
    pub fn opacity(opacity: f32) -> Self {
        Self { opacity }
    }

    /// Opacity clamped to `[0, 1]`; NaN is treated as opaque.
    #[inline]
    pub fn alpha(self) -> f32 {
        if self.opacity.is_nan() {
            1.0
        } else {
            self.opacity.clamp(0.0, 1.0)
        }
    }

    /// Returns true if compositing this layer changes nothing.
    ///
    /// Backends may use this to elide pushing the layer; the matching pop is
    /// still issued and must be tolerated.
    #[inline]
    pub fn is_noop(self) -> bool {
        self.alpha() >= 1.0
    }
}

/// Stroke style used by `StateOp::SetStroke`.
///
/// This is a re-export of [`kurbo::Stroke`], which captures width, joins,
/// caps, and related stroke parameters.
pub type StrokeStyle = kurbo::Stroke;

/// State operations that mutate the current imaging state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current transform matrix.
    SetTransform(Affine),
    /// Push a new layer onto the layer stack.
    ///
    /// Every `PushLayer` must eventually be matched by a [`StateOp::PopLayer`].
    PushLayer(LayerOp),
    /// Pop the most recently pushed layer.
    PopLayer,
    /// Set the current paint resource.
    SetPaint(PaintId),
    /// Set the current stroke style.
    SetStroke(StrokeStyle),
    /// Set the current fill rule used for filling paths.
    ///
    /// The default fill rule is [`FillRule::NonZero`].
    SetFillRule(FillRule),
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the given path with the current paint.
    FillPath(PathId),
    /// Stroke the given path with the current stroke and paint.
    StrokePath(PathId),
    /// Fill an axis-aligned rectangle with the current paint.
    FillRect {
        /// Minimum X coordinate.
        x0: f32,
        /// Minimum Y coordinate.
        y0: f32,
        /// Maximum X coordinate.
        x1: f32,
        /// Maximum Y coordinate.
        y1: f32,
    },
}

impl DrawOp {
    /// A [`DrawOp::FillRect`] covering `rect`.
    #[inline]
    pub fn fill_rect(rect: RectF) -> Self {
        Self::FillRect {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
        }
    }
}

/// Description of a path resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDesc {
    /// Command buffer describing the path geometry.
    pub commands: Box<[PathCmd]>,
}

/// Simple path command enumeration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Move the current point without drawing.
    MoveTo {
        /// X coordinate of the new point.
        x: f32,
        /// Y coordinate of the new point.
        y: f32,
    },
    /// Draw a line from the current point to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f32,
        /// Y coordinate of the line end.
        y: f32,
    },
    /// Draw a quadratic Bézier curve from the current point to the given
    /// point, using a single control point.
    QuadTo {
        /// X coordinate of the control point.
        x1: f32,
        /// Y coordinate of the control point.
        y1: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Draw a cubic Bézier curve from the current point to the given point,
    /// using two control points.
    CurveTo {
        /// X coordinate of the first control point.
        x1: f32,
        /// Y coordinate of the first control point.
        y1: f32,
        /// X coordinate of the second control point.
        x2: f32,
        /// Y coordinate of the second control point.
        y2: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Close the current subpath.
    Close,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "imaging geometry is f32 by design of the IR"
)]
fn xy(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

fn pt(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

impl PathDesc {
    /// Returns `true` if the path has no commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Convert a kurbo path into a path description.
    pub fn from_bez_path(path: &BezPath) -> Self {
        let commands: Vec<PathCmd> = path
            .elements()
            .iter()
            .map(|el| match *el {
                PathEl::MoveTo(p) => {
                    let (x, y) = xy(p);
                    PathCmd::MoveTo { x, y }
                }
                PathEl::LineTo(p) => {
                    let (x, y) = xy(p);
                    PathCmd::LineTo { x, y }
                }
                PathEl::QuadTo(c, p) => {
                    let (x1, y1) = xy(c);
                    let (x, y) = xy(p);
                    PathCmd::QuadTo { x1, y1, x, y }
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let (x1, y1) = xy(c1);
                    let (x2, y2) = xy(c2);
                    let (x, y) = xy(p);
                    PathCmd::CurveTo {
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    }
                }
                PathEl::ClosePath => PathCmd::Close,
            })
            .collect();
        Self {
            commands: commands.into_boxed_slice(),
        }
    }

    /// Convert this description into a kurbo path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut p = BezPath::new();
        for cmd in self.commands.iter() {
            match *cmd {
                PathCmd::MoveTo { x, y } => p.move_to(pt(x, y)),
                PathCmd::LineTo { x, y } => p.line_to(pt(x, y)),
                PathCmd::QuadTo { x1, y1, x, y } => p.quad_to(pt(x1, y1), pt(x, y)),
                PathCmd::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => p.curve_to(pt(x1, y1), pt(x2, y2), pt(x, y)),
                PathCmd::Close => p.close_path(),
            }
        }
        p
    }

    /// Return a copy of this path with `xf` applied to every point.
    pub fn transformed(&self, xf: Affine) -> Self {
        let mut p = self.to_bez_path();
        p.apply_affine(xf);
        Self::from_bez_path(&p)
    }
}

/// Description of a paint resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintDesc {
    /// Brush used when rendering.
    ///
    /// This is a [`peniko::Brush`], so backends can directly map it onto their
    /// native paint representation.
    pub brush: Brush,
}

impl PaintDesc {
    /// A solid color paint.
    #[inline]
    pub fn solid(color: Color) -> Self {
        Self {
            brush: Brush::Solid(color),
        }
    }
}

/// Resource lifetime interface.
///
/// Backends implement this to manage their own resource storage. IDs must
/// remain valid and refer to the same logical resource until the
/// corresponding `destroy_*` function is called.
pub trait ResourceBackend {
    /// Create a path resource.
    fn create_path(&mut self, desc: PathDesc) -> PathId;
    /// Destroy a previously created path.
    fn destroy_path(&mut self, id: PathId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Destroy a previously created paint.
    fn destroy_paint(&mut self, id: PaintId);
}

/// Minimal imaging backend trait.
///
/// This trait is object safe; stroked text nodes draw through
/// `&mut dyn ImagingBackend`.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);
}
