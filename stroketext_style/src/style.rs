// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The typed style value a stroked text node renders from.

use alloc::string::String;

use crate::color::Rgba;
use crate::padding::PaddingSpec;
use crate::transform::TextTransform;

/// Horizontal alignment of lines within the layout box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TextAlign {
    /// Start-aligned.
    #[default]
    Auto,
    /// Left-aligned.
    Left,
    /// Right-aligned.
    Right,
    /// Centered.
    Center,
    /// Inter-word justification on every line but a paragraph's last.
    Justify,
}

impl TextAlign {
    /// Parse a `textAlign` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "auto" => Self::Auto,
            "left" => Self::Left,
            "right" => Self::Right,
            "center" => Self::Center,
            "justify" => Self::Justify,
            _ => return None,
        })
    }
}

/// Decorations drawn by the fill pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TextDecorationLine {
    /// No decoration.
    #[default]
    None,
    /// Underline.
    Underline,
    /// Strike-through.
    LineThrough,
    /// Underline and strike-through.
    #[cfg_attr(feature = "serde", serde(rename = "underline line-through"))]
    UnderlineLineThrough,
}

impl TextDecorationLine {
    /// Parse a `textDecorationLine` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "none" => Self::None,
            "underline" => Self::Underline,
            "line-through" => Self::LineThrough,
            "underline line-through" => Self::UnderlineLineThrough,
            _ => return None,
        })
    }

    /// Whether an underline is drawn.
    pub fn has_underline(self) -> bool {
        matches!(self, Self::Underline | Self::UnderlineLineThrough)
    }

    /// Whether a strike-through is drawn.
    pub fn has_line_through(self) -> bool {
        matches!(self, Self::LineThrough | Self::UnderlineLineThrough)
    }
}

/// Upright or italic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic, synthesized with a skew when no italic face exists.
    Italic,
}

impl FontStyle {
    /// Parse a `fontStyle` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "normal" => Some(Self::Normal),
            "italic" => Some(Self::Italic),
            _ => None,
        }
    }
}

/// Where the ellipsis goes when text is truncated to a line limit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EllipsizeMode {
    /// "…" followed by the end of the text.
    Head,
    /// Start and end of the text around "…".
    Middle,
    /// Start of the text followed by "…".
    #[default]
    Tail,
    /// Cut without an ellipsis.
    Clip,
}

impl EllipsizeMode {
    /// Parse an `ellipsizeMode` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "head" => Self::Head,
            "middle" => Self::Middle,
            "tail" => Self::Tail,
            "clip" => Self::Clip,
            _ => return None,
        })
    }
}

/// A numeric font weight in the 100..=900 range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl FontWeight {
    /// 400.
    pub const NORMAL: Self = Self(400);
    /// 700.
    pub const BOLD: Self = Self(700);

    /// Parse a weight name or number.
    ///
    /// Numbers snap to the nearest hundred, rounding halves down
    /// (`150 -> 100`, `151 -> 200`), within 100..=900. Anything unparseable
    /// is the normal weight.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "bucket index is clamped to 1..=9 before the cast"
    )]
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let named = match value.to_ascii_lowercase().as_str() {
            "ultralight" => Some(100),
            "thin" => Some(200),
            "light" => Some(300),
            "normal" | "regular" => Some(400),
            "medium" => Some(500),
            "semibold" => Some(600),
            "bold" => Some(700),
            "heavy" => Some(800),
            "black" => Some(900),
            _ => None,
        };
        if let Some(weight) = named {
            return Self(weight);
        }
        match value.parse::<f32>() {
            Ok(n) if n.is_finite() => {
                let bucket = ((n - 50.0) / 100.0).ceil().clamp(1.0, 9.0);
                Self(bucket as u16 * 100)
            }
            _ => Self::NORMAL,
        }
    }
}

/// Everything a stroked text node renders from, in logical units.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeTextStyle {
    /// Text before transforms.
    pub text: String,
    /// Fill color; `None` uses the platform default text color.
    pub fill_color: Option<Rgba>,
    /// Outline color.
    pub stroke_color: Rgba,
    /// Full outline width in logical units. Negative values draw no stroke.
    pub stroke_width: f32,
    /// Font size in logical units.
    pub font_size: f32,
    /// Fixed line height in logical units.
    pub line_height: Option<f32>,
    /// Extra advance after every grapheme cluster, in logical units.
    pub letter_spacing: Option<f32>,
    /// Requested weight.
    pub font_weight: FontWeight,
    /// Requested family; `None` is the system family.
    pub font_family: Option<String>,
    /// Requested slant.
    pub font_style: FontStyle,
    /// Line alignment.
    pub text_align: TextAlign,
    /// Fill-pass decorations.
    pub text_decoration_line: TextDecorationLine,
    /// Case transform.
    pub text_transform: TextTransform,
    /// Line limit; 0 is unlimited.
    pub number_of_lines: u32,
    /// Truncation mode, used only with a line limit.
    pub ellipsize_mode: EllipsizeMode,
    /// Whether the system font scale applies.
    pub allow_font_scaling: bool,
    /// Upper bound on the system font scale.
    pub max_font_size_multiplier: Option<f32>,
    /// Extend the first and last lines to the font's top and bottom.
    pub include_font_padding: bool,
    /// Whole-node opacity.
    pub opacity: f32,
    /// Base padding before stroke compensation.
    pub padding: PaddingSpec,
}

impl Default for StrokeTextStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            fill_color: None,
            stroke_color: Rgba::TRANSPARENT,
            stroke_width: 0.0,
            font_size: 14.0,
            line_height: None,
            letter_spacing: None,
            font_weight: FontWeight::NORMAL,
            font_family: None,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Auto,
            text_decoration_line: TextDecorationLine::None,
            text_transform: TextTransform::None,
            number_of_lines: 0,
            ellipsize_mode: EllipsizeMode::Tail,
            allow_font_scaling: true,
            max_font_size_multiplier: None,
            include_font_padding: false,
            opacity: 1.0,
            padding: PaddingSpec::default(),
        }
    }
}
