// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::font::{FaceId, FaceInfo, FontMetrics};

/// The font services layout needs from a backend.
///
/// Every backend measures through the same implementation, so the stroke and
/// fill layouts of a node always agree on advances and metrics.
pub trait TextMeasurer {
    /// All available faces; a [`FaceId`] indexes this slice.
    fn faces(&self) -> &[FaceInfo];

    /// Family used when a query names no family or an unknown one.
    fn default_family(&self) -> Option<&str>;

    /// Vertical metrics of `face` at `size` pixels.
    fn metrics(&self, face: FaceId, size: f32) -> FontMetrics;

    /// Nominal glyph for `ch`, or `None` if the face has no mapping.
    fn glyph_id(&self, face: FaceId, ch: char) -> Option<u32>;

    /// Horizontal advance of `glyph` at `size` pixels.
    fn advance(&self, face: FaceId, glyph: u32, size: f32) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn faces(&self) -> &[FaceInfo] {
        (**self).faces()
    }

    fn default_family(&self) -> Option<&str> {
        (**self).default_family()
    }

    fn metrics(&self, face: FaceId, size: f32) -> FontMetrics {
        (**self).metrics(face, size)
    }

    fn glyph_id(&self, face: FaceId, ch: char) -> Option<u32> {
        (**self).glyph_id(face, ch)
    }

    fn advance(&self, face: FaceId, glyph: u32, size: f32) -> f32 {
        (**self).advance(face, glyph, size)
    }
}
