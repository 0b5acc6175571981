// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::layout::LayoutParams;
use crate::measure::TextMeasurer;
use crate::pair::StrokeFillLayouts;

/// Memoized [`StrokeFillLayouts`] for one node.
///
/// The layouts are rebuilt when the node is invalidated or when the text or
/// any layout parameter (including the available width) differs from the
/// previous build.
#[derive(Clone, Debug, Default)]
pub struct LayoutCache {
    key: Option<(String, LayoutParams)>,
    layouts: Option<StrokeFillLayouts>,
    dirty: bool,
    rebuilds: u64,
}

impl LayoutCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the next access to rebuild.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next access rebuilds regardless of its inputs.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.layouts.is_none()
    }

    /// The layouts from the last build, if any.
    pub fn cached(&self) -> Option<&StrokeFillLayouts> {
        self.layouts.as_ref()
    }

    /// Number of times the layouts were built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Layouts for `text` and `params`, rebuilt only if stale.
    pub fn get_or_build<M: TextMeasurer + ?Sized>(
        &mut self,
        text: &str,
        params: &LayoutParams,
        measurer: &M,
    ) -> &StrokeFillLayouts {
        let stale = self.dirty
            || self
                .key
                .as_ref()
                .is_none_or(|(t, p)| t != text || p != params);
        if stale {
            log::debug!(
                "rebuilding stroke text layouts ({} bytes, width {:?})",
                text.len(),
                params.max_width
            );
            self.key = Some((text.into(), params.clone()));
            self.layouts = None;
            self.dirty = false;
            self.rebuilds += 1;
        }
        self.layouts
            .get_or_insert_with(|| StrokeFillLayouts::build(text, params, measurer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontQuery;
    use crate::testing::Mono;
    use stroketext_style::{EllipsizeMode, TextAlign, TextDecorationLine};

    fn params(max_width: Option<f32>) -> LayoutParams {
        LayoutParams {
            query: FontQuery::default(),
            font_size: 10.0,
            line_height: None,
            letter_spacing: 0.0,
            align: TextAlign::Auto,
            max_width,
            max_lines: None,
            ellipsize: Some(EllipsizeMode::Tail),
            include_font_padding: false,
            decoration: TextDecorationLine::None,
            pixel_snap: false,
        }
    }

    #[test]
    fn rebuilds_only_on_change() {
        let m = Mono::default();
        let mut cache = LayoutCache::new();
        assert!(cache.is_dirty());

        cache.get_or_build("ab cd", &params(None), &m);
        cache.get_or_build("ab cd", &params(None), &m);
        assert_eq!(cache.rebuilds(), 1);

        let lines = cache.get_or_build("ab cd", &params(Some(30.0)), &m).fill.lines.len();
        assert_eq!(lines, 2);
        assert_eq!(cache.rebuilds(), 2);

        cache.get_or_build("ab ce", &params(Some(30.0)), &m);
        assert_eq!(cache.rebuilds(), 3);
    }

    #[test]
    fn invalidate_forces_rebuild() {
        let m = Mono::default();
        let mut cache = LayoutCache::new();
        cache.get_or_build("x", &params(None), &m);
        cache.invalidate();
        assert!(cache.is_dirty());
        cache.get_or_build("x", &params(None), &m);
        assert_eq!(cache.rebuilds(), 2);
        assert!(!cache.is_dirty());
        assert!(cache.cached().is_some());
    }
}
