// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host configuration passed explicitly at configuration time.

use crate::color::{NamedColorPolicy, Rgba};
use crate::padding::InsetRounding;
use crate::units::DeviceMetrics;

/// What a rendering backend can do natively.
///
/// Backend crates export a `CAPABILITIES` constant of this type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// Text outlines can be stroked as true paths. When false, the outline is
    /// approximated with offset copies of the fill.
    pub outline_stroke: bool,
    /// How final insets are rounded before they reach layout.
    pub inset_rounding: InsetRounding,
    /// Glyphs may be placed at fractional pixel positions.
    pub subpixel_text: bool,
}

impl Default for BackendCapabilities {
    fn default() -> Self {
        Self {
            outline_stroke: true,
            inset_rounding: InsetRounding::Exact,
            subpixel_text: true,
        }
    }
}

/// Platform fallbacks for values the properties leave unset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlatformDefaults {
    /// Fill color when none is given or it fails to parse.
    pub text_color: Rgba,
    /// How named colors are resolved.
    pub named_colors: NamedColorPolicy,
}

impl Default for PlatformDefaults {
    fn default() -> Self {
        Self {
            text_color: Rgba::BLACK,
            named_colors: NamedColorPolicy::Builtin,
        }
    }
}

/// Everything a stroked text node needs to know about its host.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HostConfig {
    /// Display density and font scale.
    pub device: DeviceMetrics,
    /// Fallback values.
    pub defaults: PlatformDefaults,
    /// Rendering backend capabilities.
    pub capabilities: BackendCapabilities,
}

impl HostConfig {
    /// A configuration for `capabilities` with default metrics and fallbacks.
    pub fn for_backend(capabilities: BackendCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Replace the device metrics.
    pub fn with_device(mut self, device: DeviceMetrics) -> Self {
        self.device = device;
        self
    }
}
