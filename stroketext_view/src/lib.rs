// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroketext View: a text node drawn with a fill and an independent outline.
//!
//! [`StrokeTextNode`] ties the pipeline together behind the
//! [`StrokeTextView`] interface:
//!
//! 1. `configure` takes a [`StrokeTextStyle`](stroketext_style::StrokeTextStyle)
//!    (or raw props via [`StrokeTextNode::set_props`]) and resolves it to
//!    device pixels for the node's [`HostConfig`](stroketext_style::HostConfig).
//! 2. `measure` lays the text out in the offered width minus the insets and
//!    returns the text size plus insets, rounded up.
//! 3. `draw` translates by the left and top insets, draws the stroke layout
//!    with a round-joined stroke (or, on backends without outline stroking,
//!    eight offset fill copies), then the fill layout and its decorations in
//!    the same space, inside an opacity layer when needed.
//!
//! Layouts are cached and rebuilt only when the text, a layout input, or the
//! available width changes, or after `invalidate`.
//!
//! Hosts that cannot call `measure` use the dual-node arrangement described
//! by [`ShadowLayout`].

#![no_std]

extern crate alloc;

mod measurement;
mod node;

pub use measurement::{HostLayoutStrategy, MeasurementNode, OverlayFrame, ShadowLayout};
pub use node::{Constraints, StrokeTextNode, StrokeTextView};
