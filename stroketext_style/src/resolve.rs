// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of a [`StrokeTextStyle`] into device pixels.

use alloc::string::String;

use crate::color::Rgba;
use crate::config::HostConfig;
use crate::padding::{ResolvedInsets, resolve_insets, sanitize_stroke_width};
use crate::style::{
    EllipsizeMode, FontStyle, FontWeight, StrokeTextStyle, TextAlign, TextDecorationLine,
};
use crate::transform::apply_text_transform;
use crate::units::{dp_to_px, to_device_pixels};

/// A style resolved for one host, ready for layout and drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStrokeText {
    /// Text after the case transform.
    pub text: String,
    /// Fill paint.
    pub fill: Rgba,
    /// Outline paint.
    pub stroke: Rgba,
    /// Full outline width in device pixels, never negative.
    pub stroke_width_px: f32,
    /// Font size in device pixels, at least 1.
    pub font_size_px: f32,
    /// Fixed line height in device pixels.
    pub line_height_px: Option<f32>,
    /// Extra advance after every grapheme cluster.
    pub letter_spacing_px: f32,
    /// Requested family.
    pub font_family: Option<String>,
    /// Requested weight.
    pub font_weight: FontWeight,
    /// Requested slant.
    pub font_style: FontStyle,
    /// Line alignment.
    pub align: TextAlign,
    /// Fill-pass decorations.
    pub decoration: TextDecorationLine,
    /// Line limit, if any.
    pub max_lines: Option<u32>,
    /// Ellipsis placement; `None` when there is no line limit or the mode is
    /// clip.
    pub ellipsize: Option<EllipsizeMode>,
    /// Extend the outer lines to the font's top and bottom.
    pub include_font_padding: bool,
    /// Node opacity in `[0, 1]`.
    pub opacity: f32,
    /// Padding plus stroke compensation.
    pub insets: ResolvedInsets,
}

impl ResolvedStrokeText {
    /// Whether a stroke pass is drawn at all.
    pub fn draws_stroke(&self) -> bool {
        self.stroke_width_px > 0.0 && !self.stroke.is_transparent()
    }
}

/// Resolve `style` against `host`.
pub fn resolve(style: &StrokeTextStyle, host: &HostConfig) -> ResolvedStrokeText {
    let device = &host.device;
    let scale = |v: f32| {
        to_device_pixels(
            v,
            style.allow_font_scaling,
            style.max_font_size_multiplier,
            device,
        )
    };

    let font_size = if style.font_size.is_finite() && style.font_size > 0.0 {
        style.font_size
    } else {
        StrokeTextStyle::default().font_size
    };
    let line_height_px = style
        .line_height
        .filter(|h| h.is_finite() && *h > 0.0)
        .map(scale);
    let letter_spacing_px = style
        .letter_spacing
        .filter(|s| s.is_finite())
        .map_or(0.0, scale);

    let stroke_width = sanitize_stroke_width(style.stroke_width);
    let max_lines = (style.number_of_lines > 0).then_some(style.number_of_lines);
    let ellipsize = max_lines
        .map(|_| style.ellipsize_mode)
        .filter(|mode| *mode != EllipsizeMode::Clip);

    ResolvedStrokeText {
        text: apply_text_transform(&style.text, style.text_transform).into_owned(),
        fill: style.fill_color.unwrap_or(host.defaults.text_color),
        stroke: style.stroke_color,
        stroke_width_px: dp_to_px(stroke_width, device),
        font_size_px: scale(font_size).max(1.0),
        line_height_px,
        letter_spacing_px,
        font_family: style.font_family.clone(),
        font_weight: style.font_weight,
        font_style: style.font_style,
        align: style.text_align,
        decoration: style.text_decoration_line,
        max_lines,
        ellipsize,
        include_font_padding: style.include_font_padding,
        opacity: if style.opacity.is_finite() {
            style.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        },
        insets: resolve_insets(
            &style.padding,
            stroke_width,
            device,
            host.capabilities.inset_rounding,
        ),
    }
}
