// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned lines and glyphs for one paint pass.

use alloc::vec::Vec;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size};
use stroketext_style::{EllipsizeMode, ResolvedStrokeText, TextAlign, TextDecorationLine};

use crate::breaking::{Cluster, ClusterKind, EPSILON, LineSpan, Shaper, break_lines};
use crate::font::{FontMetrics, FontQuery, FontSelection, select_face};
use crate::measure::TextMeasurer;

/// Everything that influences line breaking and positioning.
///
/// Two layouts built from equal parameters and the same text break at the
/// same offsets. Only `decoration` may differ between the stroke and fill
/// layouts of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Font to select.
    pub query: FontQuery,
    /// Font size in pixels.
    pub font_size: f32,
    /// Line height override in pixels.
    pub line_height: Option<f32>,
    /// Extra advance after every grapheme cluster, in pixels.
    pub letter_spacing: f32,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Wrapping width in pixels; `None` disables wrapping.
    pub max_width: Option<f32>,
    /// Maximum number of lines; `None` is unlimited.
    pub max_lines: Option<u32>,
    /// How the last visible line is shortened when lines are cut; `None` clips.
    pub ellipsize: Option<EllipsizeMode>,
    /// Extend the first and last lines to the font's top and bottom extents.
    pub include_font_padding: bool,
    /// Decoration lines to generate.
    pub decoration: TextDecorationLine,
    /// Round vertical metrics up and glyph origins to whole pixels.
    pub pixel_snap: bool,
}

impl LayoutParams {
    /// Parameters for a resolved style laid out in `max_width` pixels.
    ///
    /// A negative width is treated as zero; a non-finite width as unconstrained.
    pub fn from_resolved(
        resolved: &ResolvedStrokeText,
        max_width: Option<f32>,
        pixel_snap: bool,
    ) -> Self {
        Self {
            query: FontQuery::from_resolved(resolved),
            font_size: resolved.font_size_px,
            line_height: resolved.line_height_px,
            letter_spacing: resolved.letter_spacing_px,
            align: resolved.align,
            max_width: max_width.filter(|w| w.is_finite()).map(|w| w.max(0.0)),
            max_lines: resolved.max_lines,
            ellipsize: resolved.ellipsize,
            include_font_padding: resolved.include_font_padding,
            decoration: resolved.decoration,
            pixel_snap,
        }
    }
}

/// A glyph with its origin on the baseline, in layout space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the selected face.
    pub id: u32,
    /// X of the glyph origin.
    pub x: f32,
    /// Y of the baseline.
    pub y: f32,
}

/// One laid out line.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Source bytes the line consumes, including hanging whitespace and the
    /// line terminator. The last line of a truncated layout extends to the
    /// end of the text.
    pub text_range: Range<usize>,
    /// Range into [`TextLayout::glyphs`].
    pub glyph_range: Range<usize>,
    /// Left edge of the line content after alignment.
    pub x: f32,
    /// Content width, including any justification space.
    pub width: f32,
    /// Top of the line box.
    pub top: f32,
    /// Baseline position.
    pub baseline: f32,
    /// Height of the line box.
    pub height: f32,
    /// The line ends in an ellipsis.
    pub ellipsized: bool,
}

/// A line of clusters ready to be positioned.
struct Row {
    clusters: Vec<Cluster>,
    text_range: Range<usize>,
    paragraph_end: bool,
    ellipsized: bool,
}

/// Text laid out into lines of positioned glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Face the glyphs belong to; `None` when no face was available.
    pub selection: Option<FontSelection>,
    /// Font size the glyphs are positioned for.
    pub font_size: f32,
    /// Lines, top to bottom.
    pub lines: Vec<Line>,
    /// All glyphs of all lines.
    pub glyphs: Vec<PositionedGlyph>,
    /// Underline and strike-through rectangles.
    pub decorations: Vec<Rect>,
    /// Widest line.
    pub width: f32,
    /// Sum of line heights.
    pub height: f32,
}

impl TextLayout {
    fn empty(font_size: f32) -> Self {
        Self {
            selection: None,
            font_size,
            lines: Vec::new(),
            glyphs: Vec::new(),
            decorations: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Lay out `text`.
    pub fn build<M: TextMeasurer + ?Sized>(
        text: &str,
        params: &LayoutParams,
        measurer: &M,
    ) -> Self {
        let Some(selection) =
            select_face(measurer.faces(), measurer.default_family(), &params.query)
        else {
            log::debug!("no font faces available, text is not laid out");
            return Self::empty(params.font_size);
        };
        let shaper = Shaper {
            measurer,
            face: selection.face,
            size: params.font_size,
            letter_spacing: params.letter_spacing,
        };
        let clusters = shaper.clusters(text);
        let mut spans = break_lines(&clusters, params.max_width);

        let mut tail_source = None;
        let limit = params
            .max_lines
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n > 0 && spans.len() > n);
        if let Some(limit) = limit {
            let cut_content = spans[limit..].iter().any(|s| s.visible_end > s.start);
            if cut_content && let Some(mode) = params.ellipsize {
                let last = limit - 1;
                let paragraph = spans[last..]
                    .iter()
                    .position(|s| s.paragraph_end)
                    .map_or(spans.len() - 1, |i| last + i);
                let cut = if paragraph > last {
                    Cut::WithinParagraph
                } else {
                    Cut::AfterParagraph
                };
                tail_source = Some((spans[last].start..spans[paragraph].visible_end, mode, cut));
            }
            spans.truncate(limit);
        }

        let mut rows: Vec<Row> = spans
            .iter()
            .map(|span| row(text, &clusters, span))
            .collect();
        if let Some((source, mode, cut)) = tail_source {
            let row = ellipsize(&shaper, text, &clusters[source], mode, cut, params.max_width);
            if let Some(last) = rows.last_mut() {
                *last = row;
            }
        }

        let metrics = measurer.metrics(selection.face, params.font_size);
        let mut layout = position(&rows, params, &metrics);
        layout.selection = Some(selection);
        layout
    }

    /// Byte offset where each line ends.
    pub fn line_breaks(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.text_range.end).collect()
    }

    /// Width and height of the layout.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Whether the layout has no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyphs of one line.
    pub fn line_glyphs(&self, line: &Line) -> &[PositionedGlyph] {
        &self.glyphs[line.glyph_range.clone()]
    }
}

fn row(text: &str, clusters: &[Cluster], span: &LineSpan) -> Row {
    let start = clusters.get(span.start).map_or(text.len(), |c| c.range.start);
    let end = if span.end > span.start {
        clusters[span.end - 1].range.end
    } else {
        start
    };
    Row {
        clusters: clusters[span.start..span.visible_end].to_vec(),
        text_range: start..end,
        paragraph_end: span.paragraph_end,
        ellipsized: false,
    }
}

fn prefix_fitting(items: &[Cluster], budget: f32) -> usize {
    let mut x = 0.0;
    items
        .iter()
        .take_while(|c| {
            x += c.advance;
            x <= budget + EPSILON
        })
        .count()
}

fn suffix_fitting(items: &[Cluster], budget: f32) -> usize {
    let mut x = 0.0;
    items
        .iter()
        .rev()
        .take_while(|c| {
            x += c.advance;
            x <= budget + EPSILON
        })
        .count()
}

fn is_space(c: &Cluster) -> bool {
    c.kind != ClusterKind::Ink
}

/// Where a line limit removed text relative to the last visible line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Cut {
    /// Later lines of the same paragraph were dropped.
    WithinParagraph,
    /// The paragraph is whole; only later paragraphs were dropped.
    AfterParagraph,
}

/// Rebuild the last visible line from the rest of its paragraph with an
/// ellipsis.
///
/// `source` runs from the start of the last visible line to the end of its
/// paragraph. When only later paragraphs were dropped the ellipsis follows
/// the kept text whatever the mode. The ellipsis is U+2026 when the face
/// maps it, else three periods.
fn ellipsize<M: TextMeasurer + ?Sized>(
    shaper: &Shaper<'_, M>,
    text: &str,
    source: &[Cluster],
    mode: EllipsizeMode,
    cut: Cut,
    max_width: Option<f32>,
) -> Row {
    let mark = if shaper.measurer.glyph_id(shaper.face, '\u{2026}').is_some() {
        "\u{2026}"
    } else {
        "..."
    };
    let ellipsis = shaper.run(mark);
    let ellipsis_width: f32 = ellipsis.iter().map(|c| c.advance).sum();

    let mut items: Vec<Cluster> = source
        .iter()
        .filter(|c| c.kind != ClusterKind::Newline)
        .cloned()
        .collect();
    while items.last().is_some_and(is_space) {
        items.pop();
    }

    let mode = match cut {
        Cut::WithinParagraph => mode,
        Cut::AfterParagraph => EllipsizeMode::Tail,
    };
    let budget = max_width.map_or(f32::INFINITY, |w| w - ellipsis_width);
    let (mut head, mut tail_start) = match mode {
        EllipsizeMode::Head => (0, items.len() - suffix_fitting(&items, budget)),
        EllipsizeMode::Middle => {
            let head = prefix_fitting(&items, budget / 2.0);
            let used: f32 = items[..head].iter().map(|c| c.advance).sum();
            (head, items.len() - suffix_fitting(&items[head..], budget - used))
        }
        EllipsizeMode::Tail | EllipsizeMode::Clip => {
            (prefix_fitting(&items, budget), items.len())
        }
    };
    let text_range = source.first().map_or(text.len(), |c| c.range.start)..text.len();
    if cut == Cut::WithinParagraph && head == tail_start {
        // The paragraph fits on one line after all; nothing is hidden.
        return Row {
            clusters: items,
            text_range,
            paragraph_end: true,
            ellipsized: false,
        };
    }
    while head > 0 && is_space(&items[head - 1]) {
        head -= 1;
    }
    while tail_start < items.len() && is_space(&items[tail_start]) {
        tail_start += 1;
    }

    let mut clusters = Vec::with_capacity(head + ellipsis.len() + items.len() - tail_start);
    clusters.extend_from_slice(&items[..head]);
    clusters.extend(ellipsis);
    clusters.extend_from_slice(&items[tail_start..]);
    Row {
        clusters,
        text_range,
        paragraph_end: true,
        ellipsized: true,
    }
}

/// Vertical extents of each line box as `(ascent, descent)`.
fn line_extents(
    index: usize,
    count: usize,
    params: &LayoutParams,
    metrics: &FontMetrics,
) -> (f32, f32) {
    let snap = |v: f32| if params.pixel_snap { v.ceil() } else { v };
    let ascent = snap(metrics.ascent);
    let descent = snap(metrics.descent);
    let override_height = params
        .line_height
        .filter(|h| h.is_finite() && *h > 0.0)
        .map(|h| h.ceil());
    if let Some(height) = override_height {
        let leading = height - (ascent + descent);
        let ascent = ascent + (leading / 2.0).ceil();
        return (ascent, height - ascent);
    }
    let mut extents = (ascent, descent);
    if params.include_font_padding {
        if index == 0 {
            extents.0 = extents.0.max(snap(metrics.top));
        }
        if index + 1 == count {
            extents.1 = extents.1.max(snap(metrics.bottom));
        }
    }
    extents
}

fn position(rows: &[Row], params: &LayoutParams, metrics: &FontMetrics) -> TextLayout {
    let widths: Vec<f32> = rows
        .iter()
        .map(|r| r.clusters.iter().map(|c| c.advance).sum())
        .collect();
    let align_width = params
        .max_width
        .unwrap_or_else(|| widths.iter().copied().fold(0.0, f32::max));

    let mut layout = TextLayout::empty(params.font_size);
    let mut top = 0.0;
    for (index, (row, &width)) in rows.iter().zip(&widths).enumerate() {
        let (ascent, descent) = line_extents(index, rows.len(), params, metrics);
        let baseline = top + ascent;
        let free = (align_width - width).max(0.0);
        let spaces = row
            .clusters
            .iter()
            .filter(|c| c.kind == ClusterKind::Space)
            .count();
        let (x, gap) = match params.align {
            TextAlign::Right => (free, 0.0),
            TextAlign::Center => (free / 2.0, 0.0),
            TextAlign::Justify if !row.paragraph_end && !row.ellipsized && spaces > 0 => {
                (0.0, free / spaces as f32)
            }
            _ => (0.0, 0.0),
        };

        let glyph_start = layout.glyphs.len();
        let mut pen = x;
        for cluster in &row.clusters {
            for &(id, dx) in &cluster.glyphs {
                let gx = pen + dx;
                layout.glyphs.push(PositionedGlyph {
                    id,
                    x: if params.pixel_snap { gx.round() } else { gx },
                    y: baseline,
                });
            }
            pen += cluster.advance;
            if cluster.kind == ClusterKind::Space {
                pen += gap;
            }
        }
        let line_width = pen - x;

        if row.clusters.iter().any(|c| c.kind == ClusterKind::Ink) {
            let x0 = f64::from(x);
            let x1 = f64::from(pen);
            let mut bar = |y0: f32, thickness: f32| {
                let y0 = f64::from(y0);
                layout
                    .decorations
                    .push(Rect::new(x0, y0, x1, y0 + f64::from(thickness)));
            };
            if params.decoration.has_underline() {
                bar(baseline + metrics.underline_offset, metrics.underline_thickness);
            }
            if params.decoration.has_line_through() {
                bar(baseline - metrics.strikeout_offset, metrics.strikeout_thickness);
            }
        }

        layout.lines.push(Line {
            text_range: row.text_range.clone(),
            glyph_range: glyph_start..layout.glyphs.len(),
            x,
            width: line_width,
            top,
            baseline,
            height: ascent + descent,
            ellipsized: row.ellipsized,
        });
        layout.width = layout.width.max(line_width);
        top += ascent + descent;
    }
    layout.height = top;
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Mono;
    use alloc::string::String;
    use alloc::vec;

    fn params() -> LayoutParams {
        LayoutParams {
            query: FontQuery::default(),
            font_size: 10.0,
            line_height: None,
            letter_spacing: 0.0,
            align: TextAlign::Auto,
            max_width: None,
            max_lines: None,
            ellipsize: Some(EllipsizeMode::Tail),
            include_font_padding: false,
            decoration: TextDecorationLine::None,
            pixel_snap: false,
        }
    }

    fn glyph_text(layout: &TextLayout, line: usize) -> String {
        layout
            .line_glyphs(&layout.lines[line])
            .iter()
            .filter_map(|g| char::from_u32(g.id))
            .collect()
    }

    fn truncated(text: &str, mode: EllipsizeMode, m: &Mono) -> TextLayout {
        let p = LayoutParams {
            max_width: Some(50.0),
            max_lines: Some(1),
            ellipsize: Some(mode),
            ..params()
        };
        TextLayout::build(text, &p, m)
    }

    #[test]
    fn single_line_geometry() {
        let layout = TextLayout::build("Hi", &params(), &Mono::default());
        assert_eq!(layout.lines.len(), 1);
        let line = &layout.lines[0];
        assert_eq!((line.top, line.baseline, line.height), (0.0, 8.0, 10.0));
        assert_eq!(layout.size(), Size::new(20.0, 10.0));
        let xs: Vec<f32> = layout.glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, [0.0, 10.0]);
    }

    #[test]
    fn line_height_override_pins_each_line() {
        let p = LayoutParams {
            line_height: Some(14.2),
            ..params()
        };
        let layout = TextLayout::build("a\nb", &p, &Mono::default());
        // ceil(14.2) = 15; leading 5 puts 3 above and 2 below.
        let baselines: Vec<f32> = layout.lines.iter().map(|l| l.baseline).collect();
        assert_eq!(baselines, [11.0, 26.0]);
        assert_eq!(layout.height, 30.0);
    }

    #[test]
    fn font_padding_extends_outer_lines() {
        let p = LayoutParams {
            include_font_padding: true,
            ..params()
        };
        let layout = TextLayout::build("a\nb\nc", &p, &Mono::default());
        let heights: Vec<f32> = layout.lines.iter().map(|l| l.height).collect();
        assert_eq!(heights, [11.0, 10.0, 11.0]);
        assert_eq!(layout.lines[0].baseline, 9.0);
    }

    #[test]
    fn tail_head_and_middle_ellipsis() {
        let m = Mono::default();
        let tail = truncated("abcdefgh", EllipsizeMode::Tail, &m);
        assert_eq!(glyph_text(&tail, 0), "abcd\u{2026}");
        assert!(tail.lines[0].ellipsized);
        assert_eq!(tail.line_breaks(), [8]);
        assert_eq!(glyph_text(&truncated("abcdefgh", EllipsizeMode::Head, &m), 0), "\u{2026}efgh");
        assert_eq!(glyph_text(&truncated("abcdefgh", EllipsizeMode::Middle, &m), 0), "ab\u{2026}gh");
    }

    #[test]
    fn ellipsis_falls_back_to_periods() {
        let m = Mono {
            has_ellipsis: false,
            ..Mono::default()
        };
        assert_eq!(glyph_text(&truncated("abcdefgh", EllipsizeMode::Tail, &m), 0), "ab...");
    }

    #[test]
    fn ellipsis_trims_trailing_spaces() {
        let m = Mono::default();
        let layout = truncated("abc defgh", EllipsizeMode::Tail, &m);
        // "abc " fits the 40 px budget; the space before the ellipsis is dropped.
        assert_eq!(glyph_text(&layout, 0), "abc\u{2026}");
    }

    #[test]
    fn dropped_paragraphs_are_marked_after_the_kept_text() {
        let m = Mono::default();
        for mode in [EllipsizeMode::Tail, EllipsizeMode::Head, EllipsizeMode::Middle] {
            for max_width in [None, Some(100.0)] {
                let p = LayoutParams {
                    max_width,
                    max_lines: Some(1),
                    ellipsize: Some(mode),
                    ..params()
                };
                let layout = TextLayout::build("ab\ncd", &p, &m);
                assert_eq!(layout.lines.len(), 1);
                assert_eq!(glyph_text(&layout, 0), "ab\u{2026}", "{mode:?} {max_width:?}");
                assert!(layout.lines[0].ellipsized);
                assert_eq!(layout.line_breaks(), [5]);
            }
        }
    }

    #[test]
    fn narrow_paragraph_is_shortened_before_the_mark() {
        let p = LayoutParams {
            max_width: Some(30.0),
            max_lines: Some(1),
            ..params()
        };
        let layout = TextLayout::build("abcd\nef", &p, &Mono::default());
        assert_eq!(glyph_text(&layout, 0), "ab\u{2026}");
    }

    #[test]
    fn later_lines_of_a_paragraph_keep_the_mode() {
        let p = LayoutParams {
            max_width: Some(50.0),
            max_lines: Some(2),
            ellipsize: Some(EllipsizeMode::Head),
            ..params()
        };
        let layout = TextLayout::build("ab\ncdefghij", &p, &Mono::default());
        assert_eq!(layout.lines.len(), 2);
        assert_eq!(glyph_text(&layout, 0), "ab");
        assert!(!layout.lines[0].ellipsized);
        assert_eq!(glyph_text(&layout, 1), "\u{2026}ghij");
    }

    #[test]
    fn clip_cuts_without_ellipsis() {
        let p = LayoutParams {
            max_width: Some(20.0),
            max_lines: Some(1),
            ellipsize: None,
            ..params()
        };
        let layout = TextLayout::build("aa bb", &p, &Mono::default());
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(glyph_text(&layout, 0), "aa");
        assert!(!layout.lines[0].ellipsized);
    }

    #[test]
    fn cutting_only_a_trailing_newline_adds_no_ellipsis() {
        let p = LayoutParams {
            max_lines: Some(1),
            ..params()
        };
        let layout = TextLayout::build("a\n", &p, &Mono::default());
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(glyph_text(&layout, 0), "a");
    }

    #[test]
    fn alignment_offsets() {
        let m = Mono::default();
        let at = |align| {
            let p = LayoutParams {
                align,
                max_width: Some(50.0),
                ..params()
            };
            TextLayout::build("a", &p, &m).lines[0].x
        };
        assert_eq!(at(TextAlign::Left), 0.0);
        assert_eq!(at(TextAlign::Right), 40.0);
        assert_eq!(at(TextAlign::Center), 20.0);
    }

    #[test]
    fn justify_spreads_inner_spaces_except_last_line() {
        let p = LayoutParams {
            align: TextAlign::Justify,
            max_width: Some(70.0),
            ..params()
        };
        let layout = TextLayout::build("aa bb cc", &p, &Mono::default());
        assert_eq!(layout.lines.len(), 2);
        let xs: Vec<f32> = layout.line_glyphs(&layout.lines[0]).iter().map(|g| g.x).collect();
        assert_eq!(xs, [0.0, 10.0, 50.0, 60.0]);
        assert_eq!(layout.lines[0].width, 70.0);
        assert_eq!(layout.lines[1].width, 20.0);
    }

    #[test]
    fn decorations_follow_font_metrics() {
        let p = LayoutParams {
            decoration: TextDecorationLine::UnderlineLineThrough,
            ..params()
        };
        let layout = TextLayout::build("ab", &p, &Mono::default());
        assert_eq!(
            layout.decorations,
            vec![Rect::new(0.0, 9.0, 20.0, 9.5), Rect::new(0.0, 5.0, 20.0, 5.5)]
        );
    }

    #[test]
    fn pixel_snap_rounds_origins() {
        let p = LayoutParams {
            letter_spacing: 0.5,
            pixel_snap: true,
            ..params()
        };
        let layout = TextLayout::build("ab", &p, &Mono::default());
        let xs: Vec<f32> = layout.glyphs.iter().map(|g| g.x).collect();
        assert_eq!(xs, [0.0, 11.0]);
    }

    #[test]
    fn no_faces_lays_out_nothing() {
        let m = Mono {
            faces: Vec::new(),
            ..Mono::default()
        };
        let layout = TextLayout::build("Hi", &params(), &m);
        assert!(layout.selection.is_none());
        assert!(layout.is_empty());
        assert_eq!(layout.size(), Size::ZERO);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let layout = TextLayout::build("", &params(), &Mono::default());
        assert!(layout.lines.is_empty());
        assert_eq!(layout.height, 0.0);
    }
}
