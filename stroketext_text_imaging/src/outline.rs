// Copyright 2025 the Stroketext Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use skrifa::instance::Size;
use skrifa::outline::OutlinePen;
use skrifa::{GlyphId, MetadataProvider};
use stroketext_imaging::{PathCmd, PathDesc};
use stroketext_layout::FaceId;

use crate::collection::FontCollection;

/// Glyph outlines as imaging paths.
pub trait GlyphOutlineSource {
    /// Outline of `glyph` at `size` pixels, y-down with the origin on the
    /// baseline. `None` for glyphs without ink such as spaces.
    fn glyph_outline(&self, face: FaceId, glyph: u32, size: f32) -> Option<PathDesc>;
}

impl<T: GlyphOutlineSource + ?Sized> GlyphOutlineSource for &T {
    fn glyph_outline(&self, face: FaceId, glyph: u32, size: f32) -> Option<PathDesc> {
        (**self).glyph_outline(face, glyph, size)
    }
}

/// Records outline commands, flipping font y-up into screen y-down.
struct FlipPen {
    cmds: Vec<PathCmd>,
}

impl OutlinePen for FlipPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.cmds.push(PathCmd::MoveTo { x, y: -y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.cmds.push(PathCmd::LineTo { x, y: -y });
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.cmds.push(PathCmd::QuadTo {
            x1,
            y1: -y1,
            x,
            y: -y,
        });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.cmds.push(PathCmd::CurveTo {
            x1,
            y1: -y1,
            x2,
            y2: -y2,
            x,
            y: -y,
        });
    }

    fn close(&mut self) {
        self.cmds.push(PathCmd::Close);
    }
}

impl GlyphOutlineSource for FontCollection {
    fn glyph_outline(&self, face: FaceId, glyph: u32, size: f32) -> Option<PathDesc> {
        let font = self.font(face)?;
        let outlines = font.outline_glyphs();
        let outline = outlines.get(GlyphId::new(glyph))?;
        let mut pen = FlipPen { cmds: Vec::new() };
        outline.draw(Size::new(size), &mut pen).ok()?;
        if pen.cmds.is_empty() {
            None
        } else {
            Some(PathDesc {
                commands: pen.cmds.into_boxed_slice(),
            })
        }
    }
}
