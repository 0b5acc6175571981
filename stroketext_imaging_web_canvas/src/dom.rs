// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroked text as plain DOM elements styled with CSS.
//!
//! Used when a page renders text through the browser's own text engine
//! rather than a canvas. Three elements make up one node:
//!
//! - a **container** that shrink-wraps its content and pulls its margins in
//!   by the stroke inset, so the outline may spill past the laid out box
//!   without moving neighbours;
//! - an invisible **measurement** text that gives the container its size;
//! - an absolutely positioned **overlay** text carrying the fill and the
//!   outline.
//!
//! Both texts are padded by the base padding plus the stroke inset and use
//! `content-box` sizing, so the padding never eats into the width the text
//! wraps at.
//!
//! The outline is drawn either with `-webkit-text-stroke` painted under the
//! fill ([`DomOutline::TextStroke`]) or approximated with eight hard text
//! shadows ([`DomOutline::TextShadow`]).

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use stroketext_layout::{outline_shadow_offsets, shadow_extent};
use stroketext_style::{
    EdgeInsets, EllipsizeMode, FontStyle, ResolvedStrokeText, Rgba, TextAlign, TextDecorationLine,
};

/// How the overlay draws the outline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DomOutline {
    /// `-webkit-text-stroke` with `paint-order: stroke fill`.
    #[default]
    TextStroke,
    /// Eight offset `text-shadow` copies in the stroke color.
    TextShadow,
}

/// One CSS property and its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, e.g. `padding-top`.
    pub property: &'static str,
    /// Property value, e.g. `3px`.
    pub value: String,
}

/// An ordered list of declarations for one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleDecls {
    decls: Vec<Declaration>,
}

impl StyleDecls {
    fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.decls.iter_mut().find(|d| d.property == property) {
            Some(decl) => decl.value = value,
            None => self.decls.push(Declaration { property, value }),
        }
    }

    /// Value of `property`, if declared.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> + '_ {
        self.decls.iter()
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Inline style text, `property: value;` pairs separated by spaces.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, d) in self.decls.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}: {};", d.property, d.value);
        }
        out
    }
}

/// Margins the host set on the node, in CSS pixels.
///
/// Edges resolve most specific first: the edge itself, then the logical
/// start or end edge, then the axis, then `all`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Margins {
    /// `margin`.
    pub all: Option<f32>,
    /// `marginVertical`.
    pub vertical: Option<f32>,
    /// `marginHorizontal`.
    pub horizontal: Option<f32>,
    /// `marginTop`.
    pub top: Option<f32>,
    /// `marginRight`.
    pub right: Option<f32>,
    /// `marginBottom`.
    pub bottom: Option<f32>,
    /// `marginLeft`.
    pub left: Option<f32>,
    /// `marginStart`: left in left-to-right layouts, right otherwise.
    pub start: Option<f32>,
    /// `marginEnd`: right in left-to-right layouts, left otherwise.
    pub end: Option<f32>,
}

fn first(values: &[Option<f32>]) -> f32 {
    values
        .iter()
        .flatten()
        .copied()
        .find(|v| v.is_finite())
        .unwrap_or(0.0)
}

impl Margins {
    /// Physical margins for the given writing direction.
    pub fn resolve(&self, rtl: bool) -> EdgeInsets {
        let (right_logical, left_logical) = if rtl {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        EdgeInsets {
            top: first(&[self.top, self.vertical, self.all]),
            right: first(&[self.right, right_logical, self.horizontal, self.all]),
            bottom: first(&[self.bottom, self.vertical, self.all]),
            left: first(&[self.left, left_logical, self.horizontal, self.all]),
        }
    }
}

/// A color as CSS: `#rrggbb` when opaque, `rgba()` otherwise.
pub fn css_color(color: Rgba) -> String {
    if color.a == 255 {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    } else {
        let milli = (u32::from(color.a) * 1000 + 127) / 255;
        let mut alpha = format!("{}.{:03}", milli / 1000, milli % 1000);
        let trimmed = alpha.trim_end_matches('0').trim_end_matches('.').len();
        alpha.truncate(trimmed);
        format!("rgba({}, {}, {}, {alpha})", color.r, color.g, color.b)
    }
}

/// A `text-shadow` list outlining text `stroke_width` pixels wide.
///
/// Each shadow is a hard copy (no blur) offset by half the stroke width.
pub fn text_shadow_css(stroke_width: f32, color: Rgba) -> String {
    let color = css_color(color);
    let mut out = String::new();
    for (i, offset) in outline_shadow_offsets(shadow_extent(stroke_width))
        .iter()
        .enumerate()
    {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}px {}px 0 {color}", offset.x, offset.y);
    }
    out
}

fn px(value: f32) -> String {
    format!("{value}px")
}

/// Styles for the three elements of a DOM stroked text node.
#[derive(Clone, Debug, PartialEq)]
pub struct DomStrokeText {
    /// Transformed text for both text elements.
    pub text: String,
    /// The wrapping element.
    pub container: StyleDecls,
    /// The invisible text that sizes the container.
    pub measurement: StyleDecls,
    /// The visible text drawn over it.
    pub overlay: StyleDecls,
}

impl DomStrokeText {
    /// Build the element styles for `resolved`.
    pub fn build(
        resolved: &ResolvedStrokeText,
        margins: &Margins,
        rtl: bool,
        outline: DomOutline,
    ) -> Self {
        let inset = resolved.insets.stroke_inset;

        let mut container = StyleDecls::default();
        container.set("position", "relative");
        container.set("align-self", "flex-start");
        if inset != 0.0 {
            let base = margins.resolve(rtl);
            container.set("margin-top", px(base.top - inset));
            container.set("margin-right", px(base.right - inset));
            container.set("margin-bottom", px(base.bottom - inset));
            container.set("margin-left", px(base.left - inset));
            if let Some(start) = margins.start.filter(|v| v.is_finite()) {
                container.set("margin-inline-start", px(start - inset));
            }
            if let Some(end) = margins.end.filter(|v| v.is_finite()) {
                container.set("margin-inline-end", px(end - inset));
            }
        }

        let text_base = text_decls(resolved);

        let mut measurement = text_base.clone();
        measurement.set("opacity", "0");

        let mut overlay = text_base;
        overlay.set("position", "absolute");
        overlay.set("top", "0");
        overlay.set("right", "0");
        overlay.set("bottom", "0");
        overlay.set("left", "0");
        overlay.set("color", css_color(resolved.fill));
        if resolved.opacity < 1.0 {
            overlay.set("opacity", format!("{}", resolved.opacity));
        }
        if resolved.draws_stroke() {
            let width = resolved.stroke_width_px;
            match outline {
                DomOutline::TextStroke => {
                    let stroke = css_color(resolved.stroke);
                    overlay.set("-webkit-text-stroke-width", px(width));
                    overlay.set("-webkit-text-stroke-color", stroke);
                    overlay.set("-webkit-text-fill-color", css_color(resolved.fill));
                    overlay.set("paint-order", "stroke fill");
                }
                DomOutline::TextShadow => {
                    overlay.set("text-shadow", text_shadow_css(width, resolved.stroke));
                }
            }
        }

        Self {
            text: resolved.text.clone(),
            container,
            measurement,
            overlay,
        }
    }
}

/// Declarations shared by the measurement and overlay texts.
fn text_decls(resolved: &ResolvedStrokeText) -> StyleDecls {
    let mut decls = StyleDecls::default();
    decls.set("pointer-events", "none");
    decls.set("font-size", px(resolved.font_size_px));
    decls.set("font-weight", format!("{}", resolved.font_weight.0));
    if let Some(family) = &resolved.font_family {
        decls.set("font-family", family.clone());
    }
    decls.set(
        "font-style",
        match resolved.font_style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        },
    );
    if let Some(line_height) = resolved.line_height_px {
        decls.set("line-height", px(line_height));
    }
    if resolved.letter_spacing_px != 0.0 {
        decls.set("letter-spacing", px(resolved.letter_spacing_px));
    }
    decls.set(
        "text-align",
        match resolved.align {
            TextAlign::Auto => "start",
            TextAlign::Left => "left",
            TextAlign::Right => "right",
            TextAlign::Center => "center",
            TextAlign::Justify => "justify",
        },
    );
    let decoration = match resolved.decoration {
        TextDecorationLine::None => None,
        TextDecorationLine::Underline => Some("underline"),
        TextDecorationLine::LineThrough => Some("line-through"),
        TextDecorationLine::UnderlineLineThrough => Some("underline line-through"),
    };
    if let Some(decoration) = decoration {
        decls.set("text-decoration-line", decoration);
    }

    let padding = resolved
        .insets
        .padding
        .map(|v| v + resolved.insets.stroke_inset);
    decls.set("padding-top", px(padding.top));
    decls.set("padding-right", px(padding.right));
    decls.set("padding-bottom", px(padding.bottom));
    decls.set("padding-left", px(padding.left));
    if resolved.insets.stroke_inset != 0.0 {
        decls.set("max-width", "none");
        decls.set("box-sizing", "content-box");
    }

    match resolved.max_lines {
        None => decls.set("white-space", "pre-wrap"),
        Some(1) => {
            decls.set("white-space", "pre");
            decls.set("overflow", "hidden");
        }
        Some(lines) => {
            decls.set("white-space", "pre-wrap");
            decls.set("overflow", "hidden");
            decls.set("display", "-webkit-box");
            decls.set("-webkit-box-orient", "vertical");
            decls.set("-webkit-line-clamp", format!("{lines}"));
        }
    }
    if resolved.max_lines.is_some() {
        // CSS only ellipsizes at the end of the text.
        let overflow = match resolved.ellipsize {
            Some(EllipsizeMode::Head | EllipsizeMode::Middle | EllipsizeMode::Tail) => "ellipsis",
            Some(EllipsizeMode::Clip) | None => "clip",
        };
        decls.set("text-overflow", overflow);
    }
    decls
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroketext_style::{HostConfig, PaddingSpec, StrokeTextStyle, resolve};

    fn resolved(stroke_width: f32) -> ResolvedStrokeText {
        let style = StrokeTextStyle {
            text: "Hi".into(),
            stroke_width,
            stroke_color: Rgba::opaque(255, 0, 0),
            padding: PaddingSpec::all(2.0),
            ..StrokeTextStyle::default()
        };
        resolve(&style, &HostConfig::default())
    }

    #[test]
    fn shadows_surround_the_glyphs() {
        assert_eq!(
            text_shadow_css(4.0, Rgba::BLACK),
            "2px 0px 0 #000000, -2px 0px 0 #000000, 0px 2px 0 #000000, 0px -2px 0 #000000, \
             2px 2px 0 #000000, -2px 2px 0 #000000, 2px -2px 0 #000000, -2px -2px 0 #000000"
        );
    }

    #[test]
    fn translucent_colors_use_rgba() {
        assert_eq!(css_color(Rgba::new(1, 2, 3, 255)), "#010203");
        assert_eq!(css_color(Rgba::new(1, 2, 3, 0)), "rgba(1, 2, 3, 0)");
        assert_eq!(css_color(Rgba::new(1, 2, 3, 51)), "rgba(1, 2, 3, 0.2)");
    }

    #[test]
    fn margins_follow_writing_direction() {
        let margins = Margins {
            all: Some(1.0),
            start: Some(5.0),
            top: Some(3.0),
            ..Margins::default()
        };
        let ltr = margins.resolve(false);
        assert_eq!((ltr.left, ltr.right, ltr.top, ltr.bottom), (5.0, 1.0, 3.0, 1.0));
        let rtl = margins.resolve(true);
        assert_eq!((rtl.left, rtl.right), (1.0, 5.0));
    }

    #[test]
    fn container_margins_absorb_the_inset() {
        let margins = Margins {
            all: Some(4.0),
            end: Some(6.0),
            ..Margins::default()
        };
        let dom = DomStrokeText::build(&resolved(3.0), &margins, true, DomOutline::TextStroke);
        // ceil(3) / 2 = 1.5
        assert_eq!(dom.container.get("margin-top"), Some("2.5px"));
        assert_eq!(dom.container.get("margin-left"), Some("4.5px"));
        assert_eq!(dom.container.get("margin-right"), Some("2.5px"));
        assert_eq!(dom.container.get("margin-inline-end"), Some("4.5px"));
        assert_eq!(dom.container.get("margin-inline-start"), None);

        for text in [&dom.measurement, &dom.overlay] {
            assert_eq!(text.get("padding-left"), Some("3.5px"));
            assert_eq!(text.get("box-sizing"), Some("content-box"));
        }
        assert_eq!(dom.measurement.get("opacity"), Some("0"));
    }

    #[test]
    fn zero_stroke_leaves_margins_alone() {
        let dom = DomStrokeText::build(
            &resolved(0.0),
            &Margins::default(),
            false,
            DomOutline::TextStroke,
        );
        assert_eq!(dom.container.get("margin-top"), None);
        assert_eq!(dom.overlay.get("-webkit-text-stroke-width"), None);
        assert_eq!(dom.overlay.get("box-sizing"), None);
        assert_eq!(dom.overlay.get("color"), Some("#000000"));
    }

    #[test]
    fn outline_strategies() {
        let r = resolved(4.0);
        let stroke = DomStrokeText::build(&r, &Margins::default(), false, DomOutline::TextStroke);
        assert_eq!(stroke.overlay.get("-webkit-text-stroke-width"), Some("4px"));
        assert_eq!(stroke.overlay.get("-webkit-text-stroke-color"), Some("#ff0000"));
        assert_eq!(stroke.overlay.get("paint-order"), Some("stroke fill"));
        assert_eq!(stroke.overlay.get("text-shadow"), None);

        let shadow = DomStrokeText::build(&r, &Margins::default(), false, DomOutline::TextShadow);
        assert!(
            shadow
                .overlay
                .get("text-shadow")
                .is_some_and(|s| s.starts_with("2px 0px 0 #ff0000, "))
        );
        assert_eq!(shadow.overlay.get("paint-order"), None);
    }

    #[test]
    fn inline_css_keeps_declaration_order() {
        let mut decls = StyleDecls::default();
        decls.set("opacity", "0");
        decls.set("color", "#000000");
        decls.set("opacity", "1");
        assert_eq!(decls.to_css(), "opacity: 1; color: #000000;");
        assert_eq!(decls.len(), 2);
    }
}
