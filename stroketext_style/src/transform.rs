// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case transforms applied to text before layout.
//!
//! All mappings are locale-invariant Unicode default case mappings.

use alloc::borrow::Cow;
use alloc::string::String;

/// Case transform applied once, before layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TextTransform {
    /// Identity.
    #[default]
    None,
    /// Full uppercase mapping.
    Uppercase,
    /// Full lowercase mapping.
    Lowercase,
    /// Title-case the first character of each whitespace-delimited word.
    Capitalize,
}

impl TextTransform {
    /// Parse a CSS `text-transform` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "none" => Self::None,
            "uppercase" => Self::Uppercase,
            "lowercase" => Self::Lowercase,
            "capitalize" => Self::Capitalize,
            _ => return None,
        })
    }
}

/// Apply `transform` to `text`.
pub fn apply_text_transform(text: &str, transform: TextTransform) -> Cow<'_, str> {
    match transform {
        TextTransform::None => Cow::Borrowed(text),
        TextTransform::Uppercase => Cow::Owned(text.to_uppercase()),
        TextTransform::Lowercase => Cow::Owned(text.to_lowercase()),
        TextTransform::Capitalize => Cow::Owned(capitalize_words(text)),
    }
}

fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else {
            out.push(if at_word_start { titlecase(c) } else { c });
            at_word_start = false;
        }
    }
    out
}

/// Single-character title case.
///
/// Characters whose uppercase form expands to several characters (such as
/// `ß`) are left unchanged.
fn titlecase(c: char) -> char {
    match c {
        // Latin digraphs have a dedicated titlecase form.
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}',
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}',
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}',
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}
