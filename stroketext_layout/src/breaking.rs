// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grapheme clusters and greedy line breaking.

use alloc::vec::Vec;
use core::ops::Range;

use unicode_linebreak::linebreaks;
use unicode_segmentation::UnicodeSegmentation;

use crate::font::FaceId;
use crate::measure::TextMeasurer;

/// Overflow tolerance, so advances that sum to exactly the width still fit.
pub(crate) const EPSILON: f32 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ClusterKind {
    Ink,
    Space,
    Newline,
}

/// One grapheme cluster with its glyphs.
#[derive(Clone, Debug)]
pub(crate) struct Cluster {
    /// Byte range in the source text.
    pub(crate) range: Range<usize>,
    /// Glyph ids with their x offset inside the cluster.
    pub(crate) glyphs: Vec<(u32, f32)>,
    /// Advance including letter spacing.
    pub(crate) advance: f32,
    pub(crate) kind: ClusterKind,
    /// A soft break opportunity follows this cluster.
    pub(crate) break_after: bool,
}

fn is_hard_break(grapheme: &str) -> bool {
    matches!(
        grapheme,
        "\n" | "\r" | "\r\n" | "\u{0B}" | "\u{0C}" | "\u{85}" | "\u{2028}" | "\u{2029}"
    )
}

/// The face, size, and spacing clusters are measured with.
pub(crate) struct Shaper<'m, M: ?Sized> {
    pub(crate) measurer: &'m M,
    pub(crate) face: FaceId,
    pub(crate) size: f32,
    pub(crate) letter_spacing: f32,
}

impl<M: TextMeasurer + ?Sized> Shaper<'_, M> {
    fn cluster(&self, grapheme: &str, range: Range<usize>, break_after: bool) -> Cluster {
        if is_hard_break(grapheme) {
            return Cluster {
                range,
                glyphs: Vec::new(),
                advance: 0.0,
                kind: ClusterKind::Newline,
                break_after: false,
            };
        }
        let mut x = 0.0;
        let mut glyphs = Vec::new();
        for ch in grapheme.chars() {
            let id = self.measurer.glyph_id(self.face, ch).unwrap_or(0);
            glyphs.push((id, x));
            x += self.measurer.advance(self.face, id, self.size);
        }
        let kind = if grapheme.chars().all(char::is_whitespace) {
            glyphs.clear();
            ClusterKind::Space
        } else {
            ClusterKind::Ink
        };
        Cluster {
            range,
            glyphs,
            advance: x + self.letter_spacing,
            kind,
            break_after,
        }
    }

    /// Split `text` into measured clusters, flagging UAX #14 break opportunities.
    pub(crate) fn clusters(&self, text: &str) -> Vec<Cluster> {
        let mut breaks = linebreaks(text).map(|(offset, _)| offset).peekable();
        text.grapheme_indices(true)
            .map(|(start, grapheme)| {
                let end = start + grapheme.len();
                while breaks.next_if(|offset| *offset < end).is_some() {}
                let break_after = breaks.peek() == Some(&end);
                self.cluster(grapheme, start..end, break_after)
            })
            .collect()
    }

    /// Measure `text` as one unbreakable run (used for the ellipsis).
    pub(crate) fn run(&self, text: &str) -> Vec<Cluster> {
        text.grapheme_indices(true)
            .map(|(start, g)| self.cluster(g, start..start + g.len(), false))
            .collect()
    }
}

/// A line as a range of cluster indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct LineSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// End of the last ink cluster; trailing whitespace hangs past it.
    pub(crate) visible_end: usize,
    /// The line ends a paragraph.
    pub(crate) paragraph_end: bool,
}

impl LineSpan {
    fn new(clusters: &[Cluster], start: usize, end: usize, paragraph_end: bool) -> Self {
        let mut visible_end = end;
        while visible_end > start && clusters[visible_end - 1].kind != ClusterKind::Ink {
            visible_end -= 1;
        }
        Self {
            start,
            end,
            visible_end,
            paragraph_end,
        }
    }
}

/// Greedy line breaking.
///
/// Lines end after hard breaks; otherwise at the last soft opportunity before
/// the content overflows `max_width`. Whitespace never causes overflow. A
/// word with no opportunity that fits is broken between grapheme clusters,
/// and a single cluster wider than the line sits alone on its line.
pub(crate) fn break_lines(clusters: &[Cluster], max_width: Option<f32>) -> Vec<LineSpan> {
    let n = clusters.len();
    let mut lines = Vec::new();
    let mut start = 0;
    while start < n {
        let mut x = 0.0;
        let mut last_break = None;
        let mut end = n;
        let mut hard = false;
        for (k, c) in clusters.iter().enumerate().skip(start) {
            match c.kind {
                ClusterKind::Newline => {
                    end = k + 1;
                    hard = true;
                    break;
                }
                ClusterKind::Space => x += c.advance,
                ClusterKind::Ink => {
                    if let Some(max) = max_width {
                        if k > start && x + c.advance > max + EPSILON {
                            end = last_break.unwrap_or(k);
                            break;
                        }
                    }
                    x += c.advance;
                }
            }
            if c.break_after {
                last_break = Some(k + 1);
            }
        }
        lines.push(LineSpan::new(clusters, start, end, hard || end == n));
        start = end;
    }
    if clusters.last().is_some_and(|c| c.kind == ClusterKind::Newline) {
        lines.push(LineSpan {
            start: n,
            end: n,
            visible_end: n,
            paragraph_end: true,
        });
    }
    lines
}
