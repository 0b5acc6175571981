// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use stroketext_style::TextDecorationLine;

use crate::layout::{LayoutParams, TextLayout};
use crate::measure::TextMeasurer;

/// The two layouts of a stroked text node.
///
/// Both are built from one string with one set of breaking parameters, so
/// every stroke glyph sits exactly under its fill glyph. Only the fill layout
/// carries decorations.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeFillLayouts {
    /// Layout drawn first with the stroke paint.
    pub stroke: TextLayout,
    /// Layout drawn on top with the fill paint.
    pub fill: TextLayout,
}

impl StrokeFillLayouts {
    /// Build both layouts for `text`.
    pub fn build<M: TextMeasurer + ?Sized>(
        text: &str,
        params: &LayoutParams,
        measurer: &M,
    ) -> Self {
        let stroke_params = LayoutParams {
            decoration: TextDecorationLine::None,
            ..params.clone()
        };
        let stroke = TextLayout::build(text, &stroke_params, measurer);
        let fill = TextLayout::build(text, params, measurer);
        debug_assert_eq!(
            stroke.line_breaks(),
            fill.line_breaks(),
            "stroke and fill layouts broke lines differently"
        );
        Self { stroke, fill }
    }

    /// Size of the text block.
    pub fn size(&self) -> Size {
        self.fill.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontQuery;
    use crate::testing::Mono;
    use stroketext_style::{EllipsizeMode, TextAlign};

    #[test]
    fn only_fill_is_decorated() {
        let params = LayoutParams {
            query: FontQuery::default(),
            font_size: 10.0,
            line_height: None,
            letter_spacing: 0.0,
            align: TextAlign::Auto,
            max_width: Some(30.0),
            max_lines: None,
            ellipsize: Some(EllipsizeMode::Tail),
            include_font_padding: false,
            decoration: TextDecorationLine::Underline,
            pixel_snap: false,
        };
        let pair = StrokeFillLayouts::build("ab cd", &params, &Mono::default());
        assert!(pair.stroke.decorations.is_empty());
        assert_eq!(pair.fill.decorations.len(), 2);
        assert_eq!(pair.stroke.glyphs, pair.fill.glyphs);
        assert_eq!(pair.size(), Size::new(20.0, 20.0));
    }
}
