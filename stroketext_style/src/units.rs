// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical-unit to device-pixel conversion.

/// Display density information supplied by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceMetrics {
    /// Device pixels per logical unit.
    pub density: f32,
    /// Device pixels per scale-independent unit (density times font scale).
    pub scaled_density: f32,
}

impl Default for DeviceMetrics {
    fn default() -> Self {
        Self {
            density: 1.0,
            scaled_density: 1.0,
        }
    }
}

impl DeviceMetrics {
    /// Metrics from a density and a system font scale.
    pub fn new(density: f32, font_scale: f32) -> Self {
        Self {
            density,
            scaled_density: density * font_scale,
        }
    }

    /// The system font scale, or 1 when the density is degenerate.
    pub fn font_scale(&self) -> f32 {
        if self.density == 0.0 || !self.density.is_finite() {
            1.0
        } else {
            self.scaled_density / self.density
        }
    }
}

/// Drop multipliers that must not clamp.
///
/// Absent, non-finite, and sub-unity multipliers are all treated as "no clamp".
pub fn sanitize_max_multiplier(max_multiplier: Option<f32>) -> Option<f32> {
    max_multiplier.filter(|m| m.is_finite() && *m >= 1.0)
}

/// The font scale after applying an optional clamping multiplier.
pub fn effective_font_scale(metrics: &DeviceMetrics, max_multiplier: Option<f32>) -> f32 {
    let scale = metrics.font_scale();
    match sanitize_max_multiplier(max_multiplier) {
        Some(max) => scale.min(max),
        None => scale,
    }
}

/// Convert a logical text dimension (font size, line height, letter spacing)
/// to device pixels.
pub fn to_device_pixels(
    value: f32,
    allow_scaling: bool,
    max_multiplier: Option<f32>,
    metrics: &DeviceMetrics,
) -> f32 {
    if !allow_scaling || metrics.density == 0.0 {
        return dp_to_px(value, metrics);
    }
    value * metrics.density * effective_font_scale(metrics, max_multiplier)
}

/// Pure density conversion for stroke widths and padding.
#[inline]
pub fn dp_to_px(value: f32, metrics: &DeviceMetrics) -> f32 {
    value * metrics.density
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_disabled_is_density_only() {
        let m = DeviceMetrics::new(2.0, 1.5);
        assert_eq!(to_device_pixels(10.0, false, None, &m), 20.0);
    }

    #[test]
    fn scaling_applies_font_scale() {
        let m = DeviceMetrics::new(2.0, 1.5);
        assert_eq!(to_device_pixels(10.0, true, None, &m), 30.0);
    }

    #[test]
    fn multiplier_clamps_font_scale() {
        let m = DeviceMetrics::new(2.0, 2.0);
        assert_eq!(to_device_pixels(10.0, true, Some(1.25), &m), 25.0);
        // A multiplier above the scale has no effect.
        assert_eq!(to_device_pixels(10.0, true, Some(3.0), &m), 40.0);
    }

    #[test]
    fn invalid_multipliers_are_ignored() {
        let m = DeviceMetrics::new(1.0, 2.0);
        for bad in [0.5, 0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert_eq!(
                to_device_pixels(10.0, true, Some(bad), &m),
                20.0,
                "multiplier {bad} should be ignored"
            );
        }
    }

    #[test]
    fn zero_density_does_not_divide() {
        let m = DeviceMetrics {
            density: 0.0,
            scaled_density: 3.0,
        };
        assert_eq!(m.font_scale(), 1.0);
        assert_eq!(to_device_pixels(10.0, true, None, &m), 0.0);
    }

    #[test]
    fn dp_conversion_ignores_font_scale() {
        let m = DeviceMetrics::new(3.0, 2.0);
        assert_eq!(dp_to_px(4.0, &m), 12.0);
    }
}
