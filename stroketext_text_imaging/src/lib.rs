// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroketext Text Imaging: fonts for stroked text, lowered into the imaging IR.
//!
//! - [`FontCollection`] registers font faces (via Skrifa), reads their
//!   family, weight and slant, and implements
//!   [`TextMeasurer`](stroketext_layout::TextMeasurer) so layout can select
//!   faces and measure glyphs.
//! - [`GlyphOutlineSource`] turns glyphs into y-down [`PathDesc`]s.
//! - [`draw_glyph_run`] draws positioned glyphs as filled or stroked paths;
//!   [`GlyphPaths`] lets the stroke and fill passes share one set of path
//!   resources.
//! - [`draw_decorations`] fills underline and strike-through rectangles.
//!
//! Shaping is per character through the font's character map; there is no
//! complex-script shaping.
//!
//! [`PathDesc`]: stroketext_imaging::PathDesc

#![no_std]

extern crate alloc;

mod collection;
mod outline;
mod run;

pub use collection::{FontCollection, FontError};
pub use outline::GlyphOutlineSource;
pub use run::{GlyphPass, GlyphPaths, draw_decorations, draw_glyph_run};
