// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color parsing.
//!
//! Colors arrive either as CSS-like strings (`#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`, `rgb()`, `rgba()`, named keywords) or as packed 32-bit ARGB
//! numbers. Every parser here is total: malformed input yields `None` and the
//! caller picks the fallback.

use alloc::string::String;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use peniko::Color;

/// An 8-bit-per-channel, straight-alpha color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Create a color from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Decompose a packed ARGB value (most significant byte is alpha).
    #[inline]
    pub const fn from_argb32(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Pack into an ARGB value (most significant byte is alpha).
    #[inline]
    pub const fn to_argb32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Returns true when the alpha channel is zero.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Convert to a `peniko` color for painting.
    #[inline]
    pub const fn to_color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl From<Rgba> for Color {
    #[inline]
    fn from(value: Rgba) -> Self {
        value.to_color()
    }
}

/// A color as supplied by a property or style value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ColorValue {
    /// A packed ARGB number, converted with JavaScript `>>> 0` semantics.
    Packed(f64),
    /// A CSS-like color string.
    Text(String),
}

impl From<&str> for ColorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<u32> for ColorValue {
    fn from(value: u32) -> Self {
        Self::Packed(f64::from(value))
    }
}

/// How keywords that are not hex or functional notation are resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NamedColorPolicy {
    /// A small fixed keyword table matching the native label backend.
    #[default]
    Builtin,
    /// The full CSS named-color set.
    Css,
}

/// Parse a [`ColorValue`].
pub fn parse_color(value: &ColorValue, policy: NamedColorPolicy) -> Option<Rgba> {
    match value {
        ColorValue::Packed(n) => unpack_argb(*n),
        ColorValue::Text(s) => parse_color_str(s, policy),
    }
}

/// Decompose a packed ARGB number.
///
/// Finite values are truncated toward zero and wrapped modulo 2^32, like
/// JavaScript's `value >>> 0`. Non-finite values yield `None`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is reduced into [0, 2^32) before casting"
)]
pub fn unpack_argb(value: f64) -> Option<Rgba> {
    if !value.is_finite() {
        return None;
    }
    const MODULUS: f64 = 4_294_967_296.0;
    let t = value.trunc();
    let wrapped = t - (t / MODULUS).floor() * MODULUS;
    Some(Rgba::from_argb32(wrapped as u32))
}

/// Parse a CSS-like color string.
pub fn parse_color_str(input: &str, policy: NamedColorPolicy) -> Option<Rgba> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex.trim());
    }
    if let Some(inner) = strip_prefix_ignore_case(trimmed, "rgba(") {
        return parse_functional(inner, true);
    }
    if let Some(inner) = strip_prefix_ignore_case(trimmed, "rgb(") {
        return parse_functional(inner, false);
    }
    match policy {
        NamedColorPolicy::Builtin => builtin_keyword(trimmed),
        NamedColorPolicy::Css => css_keyword(trimmed),
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let bytes = hex.as_bytes();
    if !matches!(bytes.len(), 3 | 4 | 6 | 8) {
        return None;
    }
    let mut n = [0_u8; 8];
    for (slot, b) in n.iter_mut().zip(bytes) {
        *slot = hex_nibble(*b)?;
    }
    // Short forms double every digit, so 0xF becomes 0xFF.
    let short = |i: usize| n[i] * 17;
    let long = |i: usize| (n[2 * i] << 4) | n[2 * i + 1];
    Some(match bytes.len() {
        3 => Rgba::opaque(short(0), short(1), short(2)),
        4 => Rgba::new(short(0), short(1), short(2), short(3)),
        6 => Rgba::opaque(long(0), long(1), long(2)),
        _ => Rgba::new(long(0), long(1), long(2), long(3)),
    })
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "channels are clamped to [0, 255] before casting"
)]
fn channel(part: &str) -> Option<u8> {
    let v: f64 = part.parse().ok()?;
    v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "alpha is clamped to [0, 255] before casting"
)]
fn alpha_channel(part: &str) -> Option<u8> {
    let a: f64 = part.parse().ok()?;
    a.is_finite()
        .then(|| (a * 255.0).round().clamp(0.0, 255.0) as u8)
}

fn parse_functional(inner: &str, with_alpha: bool) -> Option<Rgba> {
    let inner = inner.trim_end().strip_suffix(')')?;
    let mut parts = inner.split(',').map(str::trim);
    let r = channel(parts.next()?)?;
    let g = channel(parts.next()?)?;
    let b = channel(parts.next()?)?;
    let a = if with_alpha {
        alpha_channel(parts.next()?)?
    } else {
        255
    };
    if parts.next().is_some() {
        return None;
    }
    Some(Rgba::new(r, g, b, a))
}

fn builtin_keyword(name: &str) -> Option<Rgba> {
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        "transparent" | "clear" => Rgba::TRANSPARENT,
        "black" => Rgba::BLACK,
        "white" => Rgba::WHITE,
        "red" => Rgba::opaque(255, 0, 0),
        "green" => Rgba::opaque(0, 255, 0),
        "blue" => Rgba::opaque(0, 0, 255),
        "cyan" | "aqua" => Rgba::opaque(0, 255, 255),
        "magenta" | "fuchsia" => Rgba::opaque(255, 0, 255),
        "yellow" => Rgba::opaque(255, 255, 0),
        // Native grays are white levels 1/2, 2/3 and 1/3.
        "gray" | "grey" => Rgba::opaque(128, 128, 128),
        "lightgray" | "lightgrey" => Rgba::opaque(170, 170, 170),
        "darkgray" | "darkgrey" => Rgba::opaque(85, 85, 85),
        _ => return None,
    })
}

fn css_keyword(name: &str) -> Option<Rgba> {
    let parsed = peniko::color::parse_color(name).ok()?;
    let rgba = parsed
        .to_alpha_color::<peniko::color::Srgb>()
        .to_rgba8();
    Some(Rgba::new(rgba.r, rgba.g, rgba.b, rgba.a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<Rgba> {
        parse_color_str(s, NamedColorPolicy::Builtin)
    }

    #[test]
    fn hex_forms_expand() {
        assert_eq!(parse("#abc"), Some(Rgba::opaque(0xaa, 0xbb, 0xcc)));
        assert_eq!(parse("#abcd"), Some(Rgba::new(0xaa, 0xbb, 0xcc, 0xdd)));
        assert_eq!(parse("#aabbcc"), Some(Rgba::opaque(0xaa, 0xbb, 0xcc)));
        assert_eq!(parse("#aabbccdd"), Some(Rgba::new(0xaa, 0xbb, 0xcc, 0xdd)));
        assert_eq!(parse("  #FFF "), Some(Rgba::WHITE));
    }

    #[test]
    fn hex_rejects_bad_lengths_and_digits() {
        assert_eq!(parse("#"), None);
        assert_eq!(parse("#ab"), None);
        assert_eq!(parse("#abcde"), None);
        assert_eq!(parse("#gggggg"), None);
        assert_eq!(parse("#ééé"), None);
    }

    #[test]
    fn functional_notation() {
        assert_eq!(parse("rgb(1,2,3)"), Some(Rgba::opaque(1, 2, 3)));
        assert_eq!(parse("RGB( 1 , 2 , 3 )"), Some(Rgba::opaque(1, 2, 3)));
        assert_eq!(parse("rgba(1,2,3,0.5)"), Some(Rgba::new(1, 2, 3, 128)));
        assert_eq!(parse("rgb(300,-4,3)"), Some(Rgba::opaque(255, 0, 3)));
        assert_eq!(parse("rgba(0,0,0,2)"), Some(Rgba::new(0, 0, 0, 255)));
    }

    #[test]
    fn functional_rejects_wrong_arity() {
        assert_eq!(parse("rgb(1,2)"), None);
        assert_eq!(parse("rgb(1,2,3,4)"), None);
        assert_eq!(parse("rgba(1,2,3)"), None);
        assert_eq!(parse("rgb(a,b,c)"), None);
        assert_eq!(parse("rgb(1,2,3"), None);
    }

    #[test]
    fn builtin_keywords() {
        assert_eq!(parse("transparent"), Some(Rgba::TRANSPARENT));
        assert_eq!(parse("Clear"), Some(Rgba::TRANSPARENT));
        assert_eq!(parse("GREY"), Some(Rgba::opaque(128, 128, 128)));
        assert_eq!(parse("fuchsia"), Some(Rgba::opaque(255, 0, 255)));
        assert_eq!(parse("rebeccapurple"), None);
        assert_eq!(parse("not-a-color"), None);
    }

    #[test]
    fn css_keywords_defer_to_css_table() {
        let purple = parse_color_str("rebeccapurple", NamedColorPolicy::Css);
        assert_eq!(purple, Some(Rgba::opaque(0x66, 0x33, 0x99)));
        assert_eq!(parse_color_str("not-a-color", NamedColorPolicy::Css), None);
    }

    #[test]
    fn empty_input_is_absent() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn packed_numbers_follow_unsigned_shift_semantics() {
        assert_eq!(unpack_argb(f64::from(0xff00_80ff_u32)), Some(Rgba::opaque(0, 0x80, 0xff)));
        // -1 >>> 0 == 0xffffffff
        assert_eq!(unpack_argb(-1.0), Some(Rgba::WHITE));
        assert_eq!(unpack_argb(f64::NAN), None);
        assert_eq!(unpack_argb(f64::INFINITY), None);
        let value = ColorValue::from(0x8000_0000_u32);
        assert_eq!(
            parse_color(&value, NamedColorPolicy::Builtin),
            Some(Rgba::new(0, 0, 0, 0x80))
        );
    }

    #[test]
    fn argb_packing_is_symmetric() {
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!(c.to_argb32(), 0x0401_0203);
        assert_eq!(Rgba::from_argb32(c.to_argb32()), c);
    }
}
