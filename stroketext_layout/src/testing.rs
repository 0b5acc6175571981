// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fixed-pitch measurer for unit tests.

use alloc::vec;
use alloc::vec::Vec;

use crate::font::{FaceId, FaceInfo, FontMetrics};
use crate::measure::TextMeasurer;

/// Every glyph advances by the font size; combining marks advance by zero.
///
/// At size 10 the metrics are ascent 8, descent 2, top 9, bottom 3.
#[derive(Clone, Debug)]
pub(crate) struct Mono {
    pub(crate) faces: Vec<FaceInfo>,
    /// Whether the face maps U+2026 HORIZONTAL ELLIPSIS.
    pub(crate) has_ellipsis: bool,
}

impl Default for Mono {
    fn default() -> Self {
        Self {
            faces: vec![
                FaceInfo {
                    family: "Mono".into(),
                    weight: 400,
                    italic: false,
                },
                FaceInfo {
                    family: "Mono".into(),
                    weight: 700,
                    italic: false,
                },
            ],
            has_ellipsis: true,
        }
    }
}

impl TextMeasurer for Mono {
    fn faces(&self) -> &[FaceInfo] {
        &self.faces
    }

    fn default_family(&self) -> Option<&str> {
        Some("Mono")
    }

    fn metrics(&self, _face: FaceId, size: f32) -> FontMetrics {
        FontMetrics {
            ascent: size * 8.0 / 10.0,
            descent: size * 2.0 / 10.0,
            leading: 0.0,
            top: size * 9.0 / 10.0,
            bottom: size * 3.0 / 10.0,
            underline_offset: size / 10.0,
            underline_thickness: size / 20.0,
            strikeout_offset: size * 3.0 / 10.0,
            strikeout_thickness: size / 20.0,
        }
    }

    fn glyph_id(&self, _face: FaceId, ch: char) -> Option<u32> {
        if ch == '\u{2026}' && !self.has_ellipsis {
            return None;
        }
        Some(ch as u32)
    }

    fn advance(&self, _face: FaceId, glyph: u32, size: f32) -> f32 {
        if (0x300..0x370).contains(&glyph) {
            0.0
        } else {
            size
        }
    }
}
