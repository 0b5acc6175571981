// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw host properties and their reconciliation into a [`StrokeTextStyle`].
//!
//! Hosts hand over two sources: explicit properties and an inherited style
//! object. Explicit properties win over the same-named style field. Style
//! values are loosely typed, so a style field of the wrong type is simply
//! absent rather than an error.
//!
//! With the `serde` feature both structs deserialize from camelCase JSON:
//!
//! ```ignore
//! let props: StrokeTextProps = serde_json::from_str(r#"{
//!     "text": "Hi",
//!     "strokeWidth": 4,
//!     "style": { "fontSize": 20, "fontWeight": 700 }
//! }"#)?;
//! let style = reconcile(&props, NamedColorPolicy::Builtin);
//! ```

use alloc::format;
use alloc::string::{String, ToString};

use crate::color::{ColorValue, NamedColorPolicy, Rgba, parse_color};
use crate::padding::PaddingSpec;
use crate::style::{
    EllipsizeMode, FontStyle, FontWeight, StrokeTextStyle, TextAlign, TextDecorationLine,
};
use crate::transform::TextTransform;

/// A loosely typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// Any number.
    Number(f64),
    /// A string.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// Null, arrays, objects, and anything else.
    Other,
}

impl PropValue {
    /// The value as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// The value as a finite `f32`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "style dimensions are consumed as f32"
    )]
    pub fn as_f32(&self) -> Option<f32> {
        self.as_number().map(|n| n as f32).filter(|n| n.is_finite())
    }

    /// The value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a color input: strings and packed numbers.
    pub fn to_color_value(&self) -> Option<ColorValue> {
        match self {
            Self::Number(n) => Some(ColorValue::Packed(*n)),
            Self::Text(s) => Some(ColorValue::Text(s.clone())),
            _ => None,
        }
    }

    /// Font weights accept names and numbers; numbers are stringified.
    pub fn to_weight_string(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format!("{n}")),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PropValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(PropValueVisitor)
    }
}

#[cfg(feature = "serde")]
struct PropValueVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for PropValueVisitor {
    type Value = PropValue;

    fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("a style value")
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<PropValue, E> {
        Ok(PropValue::Bool(v))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<PropValue, E> {
        Ok(PropValue::Number(v as f64))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<PropValue, E> {
        Ok(PropValue::Number(v as f64))
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<PropValue, E> {
        Ok(PropValue::Number(v))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PropValue, E> {
        Ok(PropValue::Text(v.to_string()))
    }

    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<PropValue, E> {
        Ok(PropValue::Text(v))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<PropValue, E> {
        Ok(PropValue::Other)
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<PropValue, E> {
        Ok(PropValue::Other)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<PropValue, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<PropValue, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        while seq.next_element::<serde::de::IgnoredAny>()?.is_some() {}
        Ok(PropValue::Other)
    }

    fn visit_map<A>(self, mut map: A) -> Result<PropValue, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        while map
            .next_entry::<serde::de::IgnoredAny, serde::de::IgnoredAny>()?
            .is_some()
        {}
        Ok(PropValue::Other)
    }
}

/// The inherited style object. Only text-related fields are read.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
#[expect(missing_docs, reason = "fields mirror the host style object")]
pub struct TextStyle {
    pub color: Option<PropValue>,
    pub font_size: Option<PropValue>,
    pub font_weight: Option<PropValue>,
    pub font_family: Option<PropValue>,
    pub font_style: Option<PropValue>,
    pub line_height: Option<PropValue>,
    pub letter_spacing: Option<PropValue>,
    pub text_align: Option<PropValue>,
    pub text_decoration_line: Option<PropValue>,
    pub text_transform: Option<PropValue>,
    pub opacity: Option<PropValue>,
    pub include_font_padding: Option<PropValue>,
    pub padding: Option<PropValue>,
    pub padding_vertical: Option<PropValue>,
    pub padding_horizontal: Option<PropValue>,
    pub padding_top: Option<PropValue>,
    pub padding_right: Option<PropValue>,
    pub padding_bottom: Option<PropValue>,
    pub padding_left: Option<PropValue>,
}

impl TextStyle {
    fn padding(&self) -> PaddingSpec {
        let num = |v: &Option<PropValue>| v.as_ref().and_then(PropValue::as_f32);
        PaddingSpec {
            all: num(&self.padding),
            vertical: num(&self.padding_vertical),
            horizontal: num(&self.padding_horizontal),
            top: num(&self.padding_top),
            right: num(&self.padding_right),
            bottom: num(&self.padding_bottom),
            left: num(&self.padding_left),
        }
    }

    fn keyword(value: &Option<PropValue>) -> Option<&str> {
        value.as_ref().and_then(PropValue::as_str)
    }
}

/// Explicit properties of a stroked text node.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
#[expect(missing_docs, reason = "fields mirror the host property names")]
pub struct StrokeTextProps {
    pub text: Option<PropValue>,
    pub children: Option<PropValue>,
    pub color: Option<ColorValue>,
    pub stroke_color: Option<ColorValue>,
    pub stroke_width: Option<f32>,
    pub font_size: Option<f32>,
    pub font_weight: Option<PropValue>,
    pub font_family: Option<String>,
    pub font_style: Option<FontStyle>,
    pub line_height: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub text_decoration_line: Option<TextDecorationLine>,
    pub text_transform: Option<TextTransform>,
    pub opacity: Option<f32>,
    pub allow_font_scaling: Option<bool>,
    pub max_font_size_multiplier: Option<f32>,
    pub include_font_padding: Option<bool>,
    pub number_of_lines: Option<f64>,
    pub ellipsize_mode: Option<EllipsizeMode>,
    /// Truncation flag of simplified hosts; `false` means clip.
    pub ellipsis: Option<bool>,
    pub padding: Option<f32>,
    pub padding_vertical: Option<f32>,
    pub padding_horizontal: Option<f32>,
    pub padding_top: Option<f32>,
    pub padding_right: Option<f32>,
    pub padding_bottom: Option<f32>,
    pub padding_left: Option<f32>,
    pub style: TextStyle,
}

impl StrokeTextProps {
    /// Props with just a text string.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(PropValue::from(text)),
            ..Self::default()
        }
    }

    fn padding(&self) -> PaddingSpec {
        PaddingSpec {
            all: self.padding,
            vertical: self.padding_vertical,
            horizontal: self.padding_horizontal,
            top: self.padding_top,
            right: self.padding_right,
            bottom: self.padding_bottom,
            left: self.padding_left,
        }
    }

    /// The text to render: `text` if it is a string, else `children` if it is
    /// a string, else empty.
    pub fn resolved_text(&self) -> &str {
        self.text
            .as_ref()
            .and_then(PropValue::as_str)
            .or_else(|| self.children.as_ref().and_then(PropValue::as_str))
            .unwrap_or("")
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "line counts saturate at u32::MAX"
)]
fn line_limit(value: Option<f64>) -> u32 {
    match value {
        Some(n) if n.is_finite() && n >= 1.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Merge explicit properties over the inherited style.
pub fn reconcile(props: &StrokeTextProps, policy: NamedColorPolicy) -> StrokeTextStyle {
    let style = &props.style;
    if props.children.as_ref().is_some_and(|c| c.as_str().is_none()) {
        log::warn!("stroke text children must be a string; use the `text` prop instead");
    }

    let fill_color = props
        .color
        .clone()
        .or_else(|| style.color.as_ref().and_then(PropValue::to_color_value))
        .and_then(|c| parse_color(&c, policy));
    let stroke_color = props
        .stroke_color
        .as_ref()
        .and_then(|c| parse_color(c, policy))
        .unwrap_or(Rgba::TRANSPARENT);

    let num = |v: &Option<PropValue>| v.as_ref().and_then(PropValue::as_f32);
    let finite = |v: Option<f32>| v.filter(|n| n.is_finite());

    let font_weight = props
        .font_weight
        .as_ref()
        .or(style.font_weight.as_ref())
        .and_then(PropValue::to_weight_string)
        .map(|w| FontWeight::parse(&w))
        .unwrap_or_default();

    let font_family = props
        .font_family
        .as_deref()
        .or_else(|| TextStyle::keyword(&style.font_family))
        .and_then(non_blank);

    let ellipsize_mode = match (props.ellipsize_mode, props.ellipsis) {
        (Some(mode), _) => mode,
        (None, Some(false)) => EllipsizeMode::Clip,
        (None, _) => EllipsizeMode::Tail,
    };

    let defaults = StrokeTextStyle::default();
    StrokeTextStyle {
        text: props.resolved_text().to_string(),
        fill_color,
        stroke_color,
        stroke_width: finite(props.stroke_width).unwrap_or(0.0),
        font_size: finite(props.font_size)
            .or_else(|| num(&style.font_size))
            .unwrap_or(defaults.font_size),
        line_height: finite(props.line_height).or_else(|| num(&style.line_height)),
        letter_spacing: finite(props.letter_spacing).or_else(|| num(&style.letter_spacing)),
        font_weight,
        font_family,
        font_style: props
            .font_style
            .or_else(|| TextStyle::keyword(&style.font_style).and_then(FontStyle::from_keyword))
            .unwrap_or_default(),
        text_align: props
            .text_align
            .or_else(|| TextStyle::keyword(&style.text_align).and_then(TextAlign::from_keyword))
            .unwrap_or_default(),
        text_decoration_line: props
            .text_decoration_line
            .or_else(|| {
                TextStyle::keyword(&style.text_decoration_line)
                    .and_then(TextDecorationLine::from_keyword)
            })
            .unwrap_or_default(),
        text_transform: props
            .text_transform
            .or_else(|| {
                TextStyle::keyword(&style.text_transform).and_then(TextTransform::from_keyword)
            })
            .unwrap_or_default(),
        number_of_lines: line_limit(props.number_of_lines),
        ellipsize_mode,
        allow_font_scaling: props.allow_font_scaling.unwrap_or(true),
        max_font_size_multiplier: props.max_font_size_multiplier,
        include_font_padding: props
            .include_font_padding
            .or_else(|| style.include_font_padding.as_ref().and_then(PropValue::as_bool))
            .unwrap_or(false),
        opacity: finite(props.opacity)
            .or_else(|| num(&style.opacity))
            .unwrap_or(1.0),
        padding: props.padding().or(style.padding()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prefers_text_prop() {
        let props = StrokeTextProps {
            text: Some("a".into()),
            children: Some("b".into()),
            ..StrokeTextProps::default()
        };
        assert_eq!(props.resolved_text(), "a");
    }

    #[test]
    fn text_falls_back_to_children_then_empty() {
        let props = StrokeTextProps {
            text: Some(PropValue::Number(3.0)),
            children: Some("b".into()),
            ..StrokeTextProps::default()
        };
        assert_eq!(props.resolved_text(), "b");

        let props = StrokeTextProps {
            children: Some(PropValue::Other),
            ..StrokeTextProps::default()
        };
        assert_eq!(reconcile(&props, NamedColorPolicy::Builtin).text, "");
    }

    #[test]
    fn explicit_beats_style() {
        let props = StrokeTextProps {
            font_size: Some(20.0),
            style: TextStyle {
                font_size: Some(PropValue::Number(30.0)),
                line_height: Some(PropValue::Number(40.0)),
                ..TextStyle::default()
            },
            ..StrokeTextProps::with_text("x")
        };
        let s = reconcile(&props, NamedColorPolicy::Builtin);
        assert_eq!(s.font_size, 20.0);
        assert_eq!(s.line_height, Some(40.0));
    }

    #[test]
    fn wrong_style_types_are_absent() {
        let props = StrokeTextProps {
            style: TextStyle {
                font_size: Some("big".into()),
                text_align: Some(PropValue::Number(1.0)),
                ..TextStyle::default()
            },
            ..StrokeTextProps::default()
        };
        let s = reconcile(&props, NamedColorPolicy::Builtin);
        assert_eq!(s.font_size, 14.0);
        assert_eq!(s.text_align, TextAlign::Auto);
    }

    #[test]
    fn numeric_style_weight_is_stringified() {
        let props = StrokeTextProps {
            style: TextStyle {
                font_weight: Some(PropValue::Number(700.0)),
                ..TextStyle::default()
            },
            ..StrokeTextProps::default()
        };
        assert_eq!(
            reconcile(&props, NamedColorPolicy::Builtin).font_weight,
            FontWeight::BOLD
        );
    }

    #[test]
    fn style_color_may_be_packed() {
        let props = StrokeTextProps {
            style: TextStyle {
                color: Some(PropValue::Number(f64::from(0xFF00_FF00_u32))),
                ..TextStyle::default()
            },
            ..StrokeTextProps::default()
        };
        assert_eq!(
            reconcile(&props, NamedColorPolicy::Builtin).fill_color,
            Some(Rgba::opaque(0, 255, 0))
        );
    }

    #[test]
    fn unparseable_colors_fall_back() {
        let props = StrokeTextProps {
            color: Some("nope".into()),
            stroke_color: Some("nope".into()),
            ..StrokeTextProps::default()
        };
        let s = reconcile(&props, NamedColorPolicy::Builtin);
        assert_eq!(s.fill_color, None);
        assert_eq!(s.stroke_color, Rgba::TRANSPARENT);
    }

    #[test]
    fn ellipsize_policy() {
        let mut props = StrokeTextProps::default();
        let mode = |p: &StrokeTextProps| reconcile(p, NamedColorPolicy::Builtin).ellipsize_mode;
        assert_eq!(mode(&props), EllipsizeMode::Tail);
        props.ellipsis = Some(false);
        assert_eq!(mode(&props), EllipsizeMode::Clip);
        props.ellipsis = Some(true);
        assert_eq!(mode(&props), EllipsizeMode::Tail);
        props.ellipsize_mode = Some(EllipsizeMode::Head);
        props.ellipsis = Some(false);
        assert_eq!(mode(&props), EllipsizeMode::Head);
    }

    #[test]
    fn number_of_lines_truncates() {
        assert_eq!(line_limit(Some(2.9)), 2);
        assert_eq!(line_limit(Some(0.5)), 0);
        assert_eq!(line_limit(Some(-3.0)), 0);
        assert_eq!(line_limit(Some(f64::NAN)), 0);
        assert_eq!(line_limit(None), 0);
    }

    #[test]
    fn padding_chain_mixes_sources() {
        let props = StrokeTextProps {
            padding: Some(1.0),
            padding_vertical: Some(2.0),
            style: TextStyle {
                padding_top: Some(PropValue::Number(5.0)),
                padding: Some(PropValue::Number(9.0)),
                ..TextStyle::default()
            },
            ..StrokeTextProps::default()
        };
        let edges = reconcile(&props, NamedColorPolicy::Builtin)
            .padding
            .resolve();
        assert_eq!(edges.top, 5.0);
        assert_eq!(edges.bottom, 2.0);
        assert_eq!(edges.left, 1.0);
    }

    #[test]
    fn blank_family_is_system() {
        let props = StrokeTextProps {
            font_family: Some("   ".into()),
            ..StrokeTextProps::default()
        };
        assert_eq!(reconcile(&props, NamedColorPolicy::Builtin).font_family, None);
    }
}
