// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptors, best-match selection, and per-size metrics.

use alloc::string::String;

use stroketext_style::{FontStyle, FontWeight, ResolvedStrokeText};

/// Index of a face in a [`TextMeasurer`](crate::TextMeasurer)'s face list.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Attributes of one font face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceInfo {
    /// Family name.
    pub family: String,
    /// Weight in 1..=1000.
    pub weight: u16,
    /// Whether the face is italic or oblique.
    pub italic: bool,
}

/// What a text node asks for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontQuery {
    /// Family name; `None` asks for the system family.
    pub family: Option<String>,
    /// Desired weight.
    pub weight: FontWeight,
    /// Desired slant.
    pub style: FontStyle,
}

impl FontQuery {
    /// The query described by a resolved style.
    pub fn from_resolved(resolved: &ResolvedStrokeText) -> Self {
        Self {
            family: resolved.font_family.clone(),
            weight: resolved.font_weight,
            style: resolved.font_style,
        }
    }
}

/// The face chosen for a query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FontSelection {
    /// Chosen face.
    pub face: FaceId,
    /// Italic was requested but the face is upright; draw with a skew.
    pub synthetic_italic: bool,
}

/// Horizontal shear applied to upright glyphs drawn as synthetic italic.
///
/// Glyph space is y-down, so a negative x-skew leans glyph tops to the right.
pub const SYNTHETIC_ITALIC_SKEW: f64 = -0.25;

fn score(face: &FaceInfo, query: &FontQuery) -> u32 {
    let wants_italic = query.style == FontStyle::Italic;
    let slant = if face.italic == wants_italic { 0 } else { 1000 };
    slant + u32::from(face.weight.abs_diff(query.weight.0))
}

/// Pick the best face for `query`.
///
/// Candidates are the faces of the requested family (case-insensitive), else
/// the faces of `default_family`, else every face. Among candidates the face
/// with the lowest `italic_mismatch * 1000 + |weight - wanted|` wins; ties go
/// to the earlier face. Returns `None` only when `faces` is empty.
pub fn select_face(
    faces: &[FaceInfo],
    default_family: Option<&str>,
    query: &FontQuery,
) -> Option<FontSelection> {
    let in_family = |family: &str| {
        faces
            .iter()
            .any(|f| f.family.eq_ignore_ascii_case(family))
            .then(|| String::from(family))
    };
    let family = query
        .family
        .as_deref()
        .and_then(in_family)
        .or_else(|| {
            if let Some(requested) = &query.family {
                log::debug!("font family {requested:?} not found, using system family");
            }
            default_family.and_then(in_family)
        });

    let (index, face) = faces
        .iter()
        .enumerate()
        .filter(|(_, f)| {
            family
                .as_deref()
                .is_none_or(|family| f.family.eq_ignore_ascii_case(family))
        })
        .min_by_key(|(i, f)| (score(f, query), *i))?;

    // Faces past `u32::MAX` have no id.
    let id = FaceId(u32::try_from(index).ok()?);
    Some(FontSelection {
        face: id,
        synthetic_italic: query.style == FontStyle::Italic && !face.italic,
    })
}

/// Vertical metrics of a face at one size, in pixels.
///
/// Extents are positive distances from the baseline: `ascent` and `top`
/// upward, `descent` and `bottom` downward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Typographic ascent.
    pub ascent: f32,
    /// Typographic descent.
    pub descent: f32,
    /// Recommended extra space between lines.
    pub leading: f32,
    /// Highest extent of any glyph; at least `ascent`.
    pub top: f32,
    /// Lowest extent of any glyph; at least `descent`.
    pub bottom: f32,
    /// Distance from the baseline down to the top of the underline.
    pub underline_offset: f32,
    /// Underline thickness.
    pub underline_thickness: f32,
    /// Distance from the baseline up to the top of the strike-through.
    pub strikeout_offset: f32,
    /// Strike-through thickness.
    pub strikeout_thickness: f32,
}
