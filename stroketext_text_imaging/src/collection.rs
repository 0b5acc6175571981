// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registered font faces and their metrics.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use peniko::Blob;
use skrifa::attribute::Style;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::Metrics;
use skrifa::raw::ReadError;
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use stroketext_layout::{FaceId, FaceInfo, FontMetrics, TextMeasurer};

/// Errors from [`FontCollection::register`].
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The data is not a font, or has no face at the index.
    #[error("failed to read font face {index}: {error}")]
    Read {
        /// Face index within the font data.
        index: u32,
        /// Parser error.
        error: ReadError,
    },
    /// The face has no usable family name, so it could never be selected.
    #[error("font face {index} has no family name")]
    MissingFamily {
        /// Face index within the font data.
        index: u32,
    },
    /// The collection already holds `u32::MAX` faces.
    #[error("too many font faces for a u32 face id")]
    TooManyFaces,
}

#[derive(Clone, Debug)]
struct Face {
    data: Blob<u8>,
    index: u32,
    tables: FaceTables,
}

/// Size-independent measurement data, read once when a face is registered.
#[derive(Clone, Debug, Default)]
struct FaceTables {
    units_per_em: f32,
    /// Extents in font units.
    extents: Extents,
    /// `(code point, glyph)` sorted by code point; `.notdef` is left out.
    charmap: Vec<(u32, u32)>,
    /// Advance widths in font units, indexed by glyph id.
    advances: Vec<f32>,
}

impl FaceTables {
    fn read(font: &FontRef<'_>) -> Self {
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        let mut charmap: Vec<(u32, u32)> = font
            .charmap()
            .mappings()
            .map(|(ch, glyph)| (ch, glyph.to_u32()))
            .filter(|&(_, glyph)| glyph != 0)
            .collect();
        charmap.sort_by_key(|&(ch, _)| ch);
        charmap.dedup_by_key(|&mut (ch, _)| ch);
        let glyph_metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let advances = (0..glyph_metrics.glyph_count())
            .map(|glyph| {
                glyph_metrics
                    .advance_width(GlyphId::new(glyph))
                    .unwrap_or(0.0)
            })
            .collect();
        Self {
            units_per_em: f32::from(metrics.units_per_em),
            extents: Extents::from_metrics(&metrics),
            charmap,
            advances,
        }
    }

    fn scale(&self, size: f32) -> f32 {
        if self.units_per_em > 0.0 {
            size / self.units_per_em
        } else {
            0.0
        }
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        let ch = u32::from(ch);
        self.charmap
            .binary_search_by_key(&ch, |&(c, _)| c)
            .ok()
            .map(|i| self.charmap[i].1)
    }

    fn advance(&self, glyph: u32, size: f32) -> f32 {
        usize::try_from(glyph)
            .ok()
            .and_then(|i| self.advances.get(i))
            .map_or(0.0, |advance| advance * self.scale(size))
    }

    fn metrics(&self, size: f32) -> FontMetrics {
        self.extents
            .scaled(self.scale(size))
            .to_font_metrics(size)
    }
}

/// Font faces available to stroked text nodes.
///
/// Font data is shared, not copied; registering the faces of one collection
/// file several times keeps a single buffer alive.
#[derive(Clone, Debug, Default)]
pub struct FontCollection {
    faces: Vec<Face>,
    infos: Vec<FaceInfo>,
    default_family: Option<String>,
}

impl FontCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register face `index` of `data`.
    pub fn register(&mut self, data: Blob<u8>, index: u32) -> Result<FaceId, FontError> {
        let id = FaceId(u32::try_from(self.faces.len()).map_err(|_| FontError::TooManyFaces)?);
        let (info, tables) = {
            let font = FontRef::from_index(data.as_ref(), index)
                .map_err(|error| FontError::Read { index, error })?;
            let family = family_name(&font).ok_or(FontError::MissingFamily { index })?;
            let attributes = font.attributes();
            let info = FaceInfo {
                family,
                weight: weight_class(attributes.weight.value()),
                italic: !matches!(attributes.style, Style::Normal),
            };
            (info, FaceTables::read(&font))
        };
        log::debug!(
            "registered face {} {} {}{}",
            id.0,
            info.family,
            info.weight,
            if info.italic { " italic" } else { "" }
        );
        self.faces.push(Face {
            data,
            index,
            tables,
        });
        self.infos.push(info);
        Ok(id)
    }

    /// Family used for nodes that name no family or an unknown one.
    ///
    /// Defaults to the family of the first registered face.
    pub fn set_default_family(&mut self, family: impl Into<String>) {
        self.default_family = Some(family.into());
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Whether no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Parsed font for `face`.
    ///
    /// Measurement goes through tables read at registration; this is for
    /// glyph outlines.
    pub fn font(&self, face: FaceId) -> Option<FontRef<'_>> {
        let face = self.face(face)?;
        FontRef::from_index(face.data.as_ref(), face.index).ok()
    }

    fn face(&self, face: FaceId) -> Option<&Face> {
        self.faces.get(usize::try_from(face.0).ok()?)
    }
}

fn family_name(font: &FontRef<'_>) -> Option<String> {
    [StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]
        .into_iter()
        .find_map(|id| {
            let name = font.localized_strings(id).english_or_first()?.to_string();
            (!name.trim().is_empty()).then_some(name)
        })
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "weight is clamped to 1..=1000 before the cast"
)]
fn weight_class(value: f32) -> u16 {
    if value.is_finite() {
        value.round().clamp(1.0, 1000.0) as u16
    } else {
        400
    }
}

/// Vertical extents in pixels, y-up like the font tables.
#[derive(Copy, Clone, Debug, Default)]
struct Extents {
    ascent: f32,
    descent: f32,
    leading: f32,
    y_min: Option<f32>,
    y_max: Option<f32>,
    underline: Option<(f32, f32)>,
    strikeout: Option<(f32, f32)>,
}

impl Extents {
    fn from_metrics(m: &Metrics) -> Self {
        Self {
            ascent: m.ascent,
            descent: m.descent,
            leading: m.leading,
            y_min: m.bounds.map(|b| b.y_min),
            y_max: m.bounds.map(|b| b.y_max),
            underline: m.underline.map(|d| (d.offset, d.thickness)),
            strikeout: m.strikeout.map(|d| (d.offset, d.thickness)),
        }
    }

    fn scaled(self, scale: f32) -> Self {
        let pair = |(offset, thickness): (f32, f32)| (offset * scale, thickness * scale);
        Self {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            leading: self.leading * scale,
            y_min: self.y_min.map(|y| y * scale),
            y_max: self.y_max.map(|y| y * scale),
            underline: self.underline.map(pair),
            strikeout: self.strikeout.map(pair),
        }
    }

    /// Convert to the y-down, positive-extent form layout works with.
    ///
    /// Missing decoration metrics fall back to a thickness of 1/14 em, an
    /// underline half way into the descent, and a strike-through centered a
    /// quarter em above the baseline.
    fn to_font_metrics(self, size: f32) -> FontMetrics {
        let ascent = self.ascent.max(0.0);
        let descent = self.descent.abs();
        let fallback_thickness = size / 14.0;
        let (underline_offset, underline_thickness) = self
            .underline
            .map_or((descent / 2.0, fallback_thickness), |(offset, thickness)| {
                (-offset, thickness)
            });
        let (strikeout_offset, strikeout_thickness) = self
            .strikeout
            .unwrap_or((size / 4.0 + fallback_thickness / 2.0, fallback_thickness));
        FontMetrics {
            ascent,
            descent,
            leading: self.leading.max(0.0),
            top: self.y_max.map_or(ascent, |y| y.max(ascent)),
            bottom: self.y_min.map_or(descent, |y| (-y).max(descent)),
            underline_offset,
            underline_thickness,
            strikeout_offset,
            strikeout_thickness,
        }
    }
}

impl TextMeasurer for FontCollection {
    fn faces(&self) -> &[FaceInfo] {
        &self.infos
    }

    fn default_family(&self) -> Option<&str> {
        self.default_family
            .as_deref()
            .or_else(|| self.infos.first().map(|f| f.family.as_str()))
    }

    fn metrics(&self, face: FaceId, size: f32) -> FontMetrics {
        self.face(face)
            .map_or_else(FontMetrics::default, |face| face.tables.metrics(size))
    }

    fn glyph_id(&self, face: FaceId, ch: char) -> Option<u32> {
        self.face(face)?.tables.glyph_id(ch)
    }

    fn advance(&self, face: FaceId, glyph: u32, size: f32) -> f32 {
        self.face(face)
            .map_or(0.0, |face| face.tables.advance(glyph, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn garbage_is_rejected() {
        let mut fonts = FontCollection::new();
        let err = fonts.register(Blob::from(vec![0_u8; 16]), 0).unwrap_err();
        assert!(matches!(err, FontError::Read { index: 0, .. }));
        assert!(fonts.is_empty());
        assert_eq!(fonts.default_family(), None);
    }

    #[test]
    fn unknown_faces_measure_as_nothing() {
        let fonts = FontCollection::new();
        assert_eq!(fonts.glyph_id(FaceId(0), 'a'), None);
        assert_eq!(fonts.advance(FaceId(0), 1, 12.0), 0.0);
        assert_eq!(fonts.metrics(FaceId(0), 12.0), FontMetrics::default());
    }

    #[test]
    fn extents_flip_to_positive_distances() {
        let extents = Extents {
            ascent: 9.0,
            descent: -3.0,
            leading: 1.0,
            y_min: Some(-4.0),
            y_max: Some(8.0),
            underline: Some((-1.5, 0.5)),
            strikeout: Some((3.0, 0.75)),
        };
        let m = extents.to_font_metrics(12.0);
        assert_eq!((m.ascent, m.descent, m.leading), (9.0, 3.0, 1.0));
        assert_eq!((m.top, m.bottom), (9.0, 4.0));
        assert_eq!((m.underline_offset, m.underline_thickness), (1.5, 0.5));
        assert_eq!((m.strikeout_offset, m.strikeout_thickness), (3.0, 0.75));
    }

    #[test]
    fn missing_decorations_fall_back() {
        let extents = Extents {
            ascent: 10.0,
            descent: -4.0,
            ..Extents::default()
        };
        let m = extents.to_font_metrics(14.0);
        assert_eq!((m.underline_offset, m.underline_thickness), (2.0, 1.0));
        assert_eq!((m.strikeout_offset, m.strikeout_thickness), (4.0, 1.0));
        assert_eq!((m.top, m.bottom), (10.0, 4.0));
    }

    fn tables() -> FaceTables {
        FaceTables {
            units_per_em: 1024.0,
            extents: Extents {
                ascent: 768.0,
                descent: -256.0,
                underline: Some((-128.0, 64.0)),
                ..Extents::default()
            },
            charmap: vec![(u32::from('a'), 3), (u32::from('b'), 4), (0x2026, 9)],
            advances: vec![512.0, 0.0, 0.0, 640.0, 576.0],
        }
    }

    #[test]
    fn cached_tables_scale_to_the_requested_size() {
        let t = tables();
        assert_eq!(t.glyph_id('a'), Some(3));
        assert_eq!(t.glyph_id('\u{2026}'), Some(9));
        assert_eq!(t.glyph_id('c'), None);
        assert_eq!(t.advance(3, 16.0), 10.0);
        assert_eq!(t.advance(4, 32.0), 18.0);
        // Glyph 9 is mapped but past the advance table.
        assert_eq!(t.advance(9, 16.0), 0.0);

        let m = t.metrics(16.0);
        assert_eq!((m.ascent, m.descent), (12.0, 4.0));
        assert_eq!((m.underline_offset, m.underline_thickness), (2.0, 1.0));
        assert_eq!(t.metrics(16.0), m);
    }

    #[test]
    fn tables_without_units_per_em_measure_as_nothing() {
        let t = FaceTables {
            units_per_em: 0.0,
            ..tables()
        };
        assert_eq!(t.advance(3, 16.0), 0.0);
        assert_eq!(t.metrics(16.0).ascent, 0.0);
    }

    #[test]
    fn too_many_faces_is_an_error() {
        assert_eq!(
            FontError::TooManyFaces.to_string(),
            "too many font faces for a u32 face id"
        );
    }

    #[test]
    fn weight_classes_round_and_clamp() {
        assert_eq!(weight_class(399.6), 400);
        assert_eq!(weight_class(0.0), 1);
        assert_eq!(weight_class(5000.0), 1000);
        assert_eq!(weight_class(f32::NAN), 400);
    }
}
