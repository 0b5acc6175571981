// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroketext Style: property reconciliation and unit resolution for stroked text.
//!
//! This crate turns the loosely typed properties a host hands to a stroked
//! text node into device-pixel values every rendering backend agrees on.
//!
//! # Pipeline
//!
//! - [`reconcile`] merges explicit [`StrokeTextProps`] over the inherited
//!   [`TextStyle`] into a typed [`StrokeTextStyle`].
//! - [`resolve`] converts that style into a [`ResolvedStrokeText`] for one
//!   [`HostConfig`]: colors fall back to platform defaults, dimensions are
//!   scaled to device pixels, the case transform runs, and padding gains the
//!   stroke inset.
//!
//! The pieces are usable on their own:
//!
//! - [`parse_color`] / [`parse_color_str`]: hex, `rgb()`/`rgba()`, packed ARGB
//!   numbers, and named colors.
//! - [`to_device_pixels`] / [`dp_to_px`]: font-scale aware unit conversion.
//! - [`PaddingSpec::resolve`] and [`resolve_insets`]: the padding chain and
//!   stroke compensation.
//! - [`apply_text_transform`]: case transforms.
//!
//! # Stroke compensation
//!
//! A stroke of width `w` is centered on the glyph outline, so half of it
//! extends outward. Every edge of the node reserves `ceil(w) / 2` logical
//! units on top of the requested padding; the stroke can never be clipped by
//! the node bounds.
//!
//! ```
//! use stroketext_style::{DeviceMetrics, InsetRounding, PaddingSpec, resolve_insets};
//!
//! let insets = resolve_insets(
//!     &PaddingSpec::all(4.0),
//!     3.0,
//!     &DeviceMetrics::new(2.0, 1.0),
//!     InsetRounding::Exact,
//! );
//! assert_eq!(insets.total.top, 11.0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo/std` and `peniko/std`.
//! - `libm`: float math for `no_std` targets.
//! - `serde`: deserialize props from camelCase JSON.

#![no_std]

extern crate alloc;

mod color;
mod config;
mod padding;
mod props;
mod resolve;
mod style;
mod transform;
mod units;

pub use color::{
    ColorValue, NamedColorPolicy, Rgba, parse_color, parse_color_str, unpack_argb,
};
pub use config::{BackendCapabilities, HostConfig, PlatformDefaults};
pub use padding::{
    EdgeInsets, InsetRounding, PaddingSpec, ResolvedInsets, resolve_insets,
    sanitize_stroke_width, stroke_inset,
};
pub use props::{PropValue, StrokeTextProps, TextStyle, reconcile};
pub use resolve::{ResolvedStrokeText, resolve};
pub use style::{
    EllipsizeMode, FontStyle, FontWeight, StrokeTextStyle, TextAlign, TextDecorationLine,
};
pub use transform::{TextTransform, apply_text_transform};
pub use units::{
    DeviceMetrics, dp_to_px, effective_font_scale, sanitize_max_multiplier, to_device_pixels,
};
