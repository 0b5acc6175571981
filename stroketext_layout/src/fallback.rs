// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outline emulation for backends without stroked text.

use kurbo::Vec2;

/// How far the emulated outline reaches past the glyph edge: half the
/// stroke width, matching the outward half of a centered stroke.
pub fn shadow_extent(stroke_width_px: f32) -> f64 {
    if stroke_width_px.is_finite() {
        f64::from(stroke_width_px.max(0.0)) / 2.0
    } else {
        0.0
    }
}

/// Offsets of the eight stroke-colored copies drawn under the fill.
///
/// Horizontal and vertical neighbors come first, then the diagonals.
pub fn outline_shadow_offsets(extent: f64) -> [Vec2; 8] {
    let w = extent;
    [
        Vec2::new(w, 0.0),
        Vec2::new(-w, 0.0),
        Vec2::new(0.0, w),
        Vec2::new(0.0, -w),
        Vec2::new(w, w),
        Vec2::new(-w, w),
        Vec2::new(w, -w),
        Vec2::new(-w, -w),
    ]
}
