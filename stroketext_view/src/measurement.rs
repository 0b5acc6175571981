// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dual-node measurement for hosts that lay text out themselves.
//!
//! Some hosts cannot call [`StrokeTextView::measure`](crate::StrokeTextView)
//! during layout; they only size nodes through their own text component. For
//! those, the stroked text is split in two:
//!
//! - an invisible **measurement node** carrying the plain text with the same
//!   font, base padding, line limit and ellipsizing, which the host measures
//!   and positions like any text;
//! - a visible **overlay** placed over it, grown by the stroke inset on every
//!   side, whose padding grows by the same amount so its glyphs land exactly
//!   on the measurement node's glyphs.

use alloc::string::String;

use kurbo::Rect;
use stroketext_style::{
    EdgeInsets, EllipsizeMode, FontStyle, FontWeight, ResolvedStrokeText, TextAlign,
};

/// How a host obtains the size of a stroked text node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HostLayoutStrategy {
    /// The host calls `measure` directly.
    #[default]
    CustomMeasure,
    /// The host measures an invisible sibling and overlays the stroke.
    ShadowNode,
}

/// The invisible text node the host measures.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementNode {
    /// Transformed text.
    pub text: String,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Line height override in pixels.
    pub line_height_px: Option<f32>,
    /// Letter spacing in pixels.
    pub letter_spacing_px: f32,
    /// Font family.
    pub font_family: Option<String>,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Font slant.
    pub font_style: FontStyle,
    /// Alignment.
    pub align: TextAlign,
    /// Line limit.
    pub max_lines: Option<u32>,
    /// Ellipsizing of the last line.
    pub ellipsize: Option<EllipsizeMode>,
    /// Font padding flag.
    pub include_font_padding: bool,
    /// Base padding, without stroke compensation.
    pub padding: EdgeInsets,
    /// Always zero; the node takes space but is never seen.
    pub opacity: f32,
}

impl MeasurementNode {
    /// Describe the measurement node for `resolved`.
    pub fn from_resolved(resolved: &ResolvedStrokeText) -> Self {
        Self {
            text: resolved.text.clone(),
            font_size_px: resolved.font_size_px,
            line_height_px: resolved.line_height_px,
            letter_spacing_px: resolved.letter_spacing_px,
            font_family: resolved.font_family.clone(),
            font_weight: resolved.font_weight,
            font_style: resolved.font_style,
            align: resolved.align,
            max_lines: resolved.max_lines,
            ellipsize: resolved.ellipsize,
            include_font_padding: resolved.include_font_padding,
            padding: resolved.insets.padding,
            opacity: 0.0,
        }
    }
}

/// Placement of the visible overlay relative to the measurement node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverlayFrame {
    /// How far the overlay extends past the measurement node on every side.
    pub outset: f32,
    /// Padding of the overlay: base padding plus the outset.
    pub padding: EdgeInsets,
}

impl OverlayFrame {
    /// Describe the overlay for `resolved`.
    pub fn from_resolved(resolved: &ResolvedStrokeText) -> Self {
        let outset = resolved.insets.stroke_inset;
        Self {
            outset,
            padding: resolved.insets.padding.map(|v| v + outset),
        }
    }

    /// Overlay bounds for a measurement node laid out at `measured`.
    pub fn frame(&self, measured: Rect) -> Rect {
        let outset = f64::from(self.outset);
        measured.inflate(outset, outset)
    }
}

/// Both halves of the dual-node arrangement.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowLayout {
    /// The invisible node the host measures.
    pub measurement: MeasurementNode,
    /// The visible stroked overlay.
    pub overlay: OverlayFrame,
}

impl ShadowLayout {
    /// Describe both nodes for `resolved`.
    pub fn from_resolved(resolved: &ResolvedStrokeText) -> Self {
        Self {
            measurement: MeasurementNode::from_resolved(resolved),
            overlay: OverlayFrame::from_resolved(resolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroketext_style::{HostConfig, PaddingSpec, StrokeTextStyle, resolve};

    #[test]
    fn overlay_outgrows_the_measured_box_by_the_inset() {
        let style = StrokeTextStyle {
            text: "Hi".into(),
            stroke_width: 3.0,
            padding: PaddingSpec::all(4.0),
            number_of_lines: 2,
            ..StrokeTextStyle::default()
        };
        let resolved = resolve(&style, &HostConfig::default());
        let shadow = ShadowLayout::from_resolved(&resolved);

        assert_eq!(shadow.measurement.padding, EdgeInsets::uniform(4.0));
        assert_eq!(shadow.measurement.opacity, 0.0);
        assert_eq!(shadow.measurement.max_lines, Some(2));

        // ceil(3) / 2 = 1.5 on every side.
        assert_eq!(shadow.overlay.outset, 1.5);
        assert_eq!(shadow.overlay.padding, EdgeInsets::uniform(5.5));
        assert_eq!(
            shadow.overlay.frame(Rect::new(10.0, 10.0, 50.0, 30.0)),
            Rect::new(8.5, 8.5, 51.5, 31.5)
        );
    }
}
