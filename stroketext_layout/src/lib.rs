// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroketext Layout: one line layout shared by the stroke and fill passes.
//!
//! A stroked text node paints its text twice, the outline first and the fill
//! on top. The two passes only line up if they break lines at the same
//! offsets and place every glyph at the same origin. This crate computes
//! both layouts from one set of [`LayoutParams`] through the
//! [`TextMeasurer`] seam, which every rendering backend implements the same
//! way.
//!
//! - [`select_face`]: best-match font selection with synthetic italic.
//! - [`TextLayout::build`]: UAX #14 line breaking with grapheme fallback,
//!   line-height adjustment, ellipsizing, alignment, and decorations.
//! - [`StrokeFillLayouts`]: the paired layouts of one node.
//! - [`LayoutCache`]: memoization keyed on text and parameters.
//! - [`outline_shadow_offsets`]: the eight-copy outline used when a backend
//!   cannot stroke text.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std`.
//! - `libm`: float math for `no_std` targets.

#![no_std]

extern crate alloc;

mod breaking;
mod cache;
mod fallback;
mod font;
mod layout;
mod measure;
mod pair;

#[cfg(test)]
mod testing;

pub use cache::LayoutCache;
pub use fallback::{outline_shadow_offsets, shadow_extent};
pub use font::{
    FaceId, FaceInfo, FontMetrics, FontQuery, FontSelection, SYNTHETIC_ITALIC_SKEW, select_face,
};
pub use layout::{LayoutParams, Line, PositionedGlyph, TextLayout};
pub use measure::TextMeasurer;
pub use pair::StrokeFillLayouts;
