// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padding resolution and stroke-compensation insets.
//!
//! Padding follows a "most specific wins" chain per edge: edge, then axis,
//! then the shorthand for all edges, then zero. The stroke inset
//! (`ceil(stroke_width) / 2`) is added to every edge so that the outward half
//! of the stroke always stays inside the view bounds.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::units::{DeviceMetrics, dp_to_px};

/// Padding values in logical units, any of which may be absent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PaddingSpec {
    /// Shorthand for all four edges.
    pub all: Option<f32>,
    /// Top and bottom.
    pub vertical: Option<f32>,
    /// Left and right.
    pub horizontal: Option<f32>,
    /// Top edge.
    pub top: Option<f32>,
    /// Right edge.
    pub right: Option<f32>,
    /// Bottom edge.
    pub bottom: Option<f32>,
    /// Left edge.
    pub left: Option<f32>,
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

impl PaddingSpec {
    /// Padding with every edge equal.
    pub const fn all(value: f32) -> Self {
        Self {
            all: Some(value),
            vertical: None,
            horizontal: None,
            top: None,
            right: None,
            bottom: None,
            left: None,
        }
    }

    /// Layer `self` over `fallback`, field by field.
    ///
    /// Resolving the layered spec yields the chain
    /// `self.edge > fallback.edge > self.axis > fallback.axis > self.all > fallback.all`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            all: finite(self.all).or(finite(fallback.all)),
            vertical: finite(self.vertical).or(finite(fallback.vertical)),
            horizontal: finite(self.horizontal).or(finite(fallback.horizontal)),
            top: finite(self.top).or(finite(fallback.top)),
            right: finite(self.right).or(finite(fallback.right)),
            bottom: finite(self.bottom).or(finite(fallback.bottom)),
            left: finite(self.left).or(finite(fallback.left)),
        }
    }

    /// Resolve each edge. Non-finite values are skipped and negative results
    /// clamp to zero.
    pub fn resolve(&self) -> EdgeInsets {
        let pick = |edge: Option<f32>, axis: Option<f32>| {
            finite(edge)
                .or(finite(axis))
                .or(finite(self.all))
                .unwrap_or(0.0)
                .max(0.0)
        };
        EdgeInsets {
            top: pick(self.top, self.vertical),
            right: pick(self.right, self.horizontal),
            bottom: pick(self.bottom, self.vertical),
            left: pick(self.left, self.horizontal),
        }
    }
}

/// Four resolved edge values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Left edge.
    pub left: f32,
}

impl EdgeInsets {
    /// All edges zero.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Every edge equal to `value`.
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Sum of left and right.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Apply `f` to every edge.
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }

    /// The smallest edge.
    pub fn min_edge(&self) -> f32 {
        self.top.min(self.right).min(self.bottom).min(self.left)
    }
}

/// Whether final insets keep fractions or are floored to whole pixels.
///
/// Hosts that floor padding when applying it to native views need the
/// stroke node to floor identically, otherwise the invisible measurement
/// node and the visible node disagree on reserved space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InsetRounding {
    /// Keep fractional pixels.
    #[default]
    Exact,
    /// Floor every edge to an integer.
    ///
    /// A floored edge may fall short of padding plus stroke inset by less
    /// than one pixel.
    Floor,
}

/// Clamp a stroke width to a finite, non-negative value.
pub fn sanitize_stroke_width(width: f32) -> f32 {
    if width.is_finite() && width > 0.0 {
        width
    } else {
        0.0
    }
}

/// The per-edge inset, in logical units, reserved for a stroke.
///
/// Every resolved edge is at least padding plus this inset, except under
/// [`InsetRounding::Floor`], where the edge is the floor of that sum.
pub fn stroke_inset(stroke_width: f32) -> f32 {
    sanitize_stroke_width(stroke_width).ceil() / 2.0
}

/// Device-pixel insets for a stroked text node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedInsets {
    /// Base padding without stroke compensation.
    pub padding: EdgeInsets,
    /// Stroke compensation added to every edge.
    pub stroke_inset: f32,
    /// Final insets handed to layout: padding plus stroke inset, rounded.
    pub total: EdgeInsets,
}

/// Resolve padding and stroke compensation into device pixels.
///
/// With [`InsetRounding::Exact`] each `total` edge is `padding + stroke_inset`.
/// With [`InsetRounding::Floor`] each edge is `floor(padding + stroke_inset)`,
/// which may be below the stroke inset by less than one pixel.
pub fn resolve_insets(
    padding: &PaddingSpec,
    stroke_width: f32,
    metrics: &DeviceMetrics,
    rounding: InsetRounding,
) -> ResolvedInsets {
    let base = padding.resolve().map(|v| dp_to_px(v, metrics));
    let inset = dp_to_px(stroke_inset(stroke_width), metrics);
    let total = base.map(|v| {
        let v = v + inset;
        match rounding {
            InsetRounding::Exact => v,
            InsetRounding::Floor => v.floor(),
        }
    });
    ResolvedInsets {
        padding: base,
        stroke_inset: inset,
        total,
    }
}
