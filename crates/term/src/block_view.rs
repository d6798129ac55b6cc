//! BlockView: paints the engine's layer lists into character cells.
//!
//! The visible screen is 40 columns (one per byte) by 10 rows: row 0 is the bottom
//! row of the screen above, and each block row below it is 3 terminal rows tall.
//! Two buffers are kept. `scene` is what is shown; `under` holds everything except
//! characters and overlays, and is what a peel restores.
//!
//! This module is pure (no I/O) and does not allocate after construction.

use crate::core::compositor::LayerRenderer;
use crate::core::image_list::{LayerImage, MidImage, MidKind, Peel, WipeRect};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::glyphs::{character_cells, glyph_for, Glyph, CHARACTER_STYLE};
use crate::types::{
    ImageTable, Opacity, BLOCK_ROWS, BLOCK_WIDTH, SCREEN_WIDTH,
};

/// Columns of the visible screen.
pub const VIEW_COLS: u16 = SCREEN_WIDTH as u16;

/// Rows of the visible screen including the top strip.
pub const VIEW_ROWS: u16 = 1 + 3 * BLOCK_ROWS as u16;

/// Terminal rows per block.
pub const ROWS_PER_BLOCK: i32 = 3;

const LINES_PER_ROW: i32 = 21;

/// Terminal row of scan line `y` (row 0 is the top strip).
pub fn row_of(y: i16) -> i32 {
    1 + (y as i32 + 7).div_euclid(LINES_PER_ROW)
}

/// Terminal column of byte `x`.
pub fn col_of(x: i16) -> i32 {
    x as i32
}

const WIPE: Cell = CellStyle::fg(Rgb::new(0, 0, 0)).cell(' ');

/// Cells painted per layer during the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintStats {
    pub peeled: usize,
    pub wiped: usize,
    pub back: usize,
    pub mid: usize,
    pub fore: usize,
    pub message: usize,
}

pub struct BlockView {
    scene: FrameBuffer,
    under: FrameBuffer,
    stats: PaintStats,
}

impl Default for BlockView {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockView {
    pub fn new() -> Self {
        Self {
            scene: FrameBuffer::new(VIEW_COLS, VIEW_ROWS),
            under: FrameBuffer::new(VIEW_COLS, VIEW_ROWS),
            stats: PaintStats::default(),
        }
    }

    pub fn scene(&self) -> &FrameBuffer {
        &self.scene
    }

    pub fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Reset per-frame paint counters.
    pub fn begin_frame(&mut self) {
        self.stats = PaintStats::default();
    }

    /// Clear both buffers (e.g. before a full redraw of a new screen).
    pub fn clear(&mut self) {
        self.scene.clear(WIPE);
        self.under.clear(WIPE);
    }

    /// Copy the scene into `fb` with its top-left cell at `(x, y)`.
    pub fn blit_into(&self, fb: &mut FrameBuffer, x: i32, y: i32) {
        for row in 0..VIEW_ROWS as i32 {
            for col in 0..VIEW_COLS as i32 {
                if let Some(cell) = self.scene.get(col, row) {
                    fb.set(x + col, y + row, cell);
                }
            }
        }
    }

    /// Row span `(top, bottom)` of an image whose bottom line is `y`.
    fn rows_for(y: i16) -> (i32, i32) {
        let bottom = row_of(y);
        (bottom - (ROWS_PER_BLOCK - 1), bottom)
    }

    /// Paint a glyph into the chosen buffers. Returns the number of cells written.
    fn paint(
        &mut self,
        glyph: &Glyph,
        x: i16,
        y: i16,
        opacity: Opacity,
        cutoff: Option<i16>,
        target: Target,
    ) -> usize {
        let (top, _) = Self::rows_for(y);
        let limit = cutoff.map(row_of);
        let mut written = 0;
        for (dy, line) in glyph.rows.iter().enumerate() {
            let row = top + dy as i32;
            if limit.is_some_and(|l| row > l) {
                continue;
            }
            for (dx, ch) in line.chars().enumerate() {
                if ch == ' ' && opacity != Opacity::Store {
                    continue;
                }
                let cell = glyph.style.cell(ch);
                let col = col_of(x) + dx as i32;
                if target.under {
                    self.under.set(col, row, cell);
                }
                self.scene.set(col, row, cell);
                written += 1;
            }
        }
        written
    }

    /// Stored images first clear the whole block they cover.
    fn store_clear(&mut self, x: i16, y: i16) {
        let (top, _) = Self::rows_for(y);
        let w = BLOCK_WIDTH as i32;
        self.under.fill_rect(col_of(x), top, w, ROWS_PER_BLOCK, WIPE);
        self.scene.fill_rect(col_of(x), top, w, ROWS_PER_BLOCK, WIPE);
    }

    fn paint_layer(&mut self, images: &[LayerImage], target: Target) -> usize {
        let mut n = 0;
        for img in images {
            if img.opacity == Opacity::Store {
                self.store_clear(img.x, img.y);
            }
            if let Some(glyph) = glyph_for(img.image) {
                n += self.paint(&glyph, img.x, img.y, img.opacity, None, target);
            }
        }
        n
    }

    fn paint_character(&mut self, img: &MidImage) -> usize {
        let ImageTable::Character(identity) = img.image.table else {
            return 0;
        };
        let base_row = row_of(img.y);
        let limit = img.cutoff.map(row_of);
        let mut n = 0;
        for (dx, dy, ch) in character_cells(identity.letter(), img.face) {
            let row = base_row + dy;
            if limit.is_some_and(|l| row > l) {
                continue;
            }
            self.scene.put_char(col_of(img.x) + dx, row, ch, CHARACTER_STYLE);
            n += 1;
        }
        n
    }
}

#[derive(Debug, Clone, Copy)]
struct Target {
    under: bool,
}

const SCENE_AND_UNDER: Target = Target { under: true };
const SCENE_ONLY: Target = Target { under: false };

impl LayerRenderer for BlockView {
    fn draw_general(&mut self, peels: &[Peel]) {
        for p in peels {
            let (top, bottom) = Self::rows_for(p.y);
            let rows = (bottom - top + 1).min(ROWS_PER_BLOCK);
            self.scene
                .copy_rect_from(&self.under, col_of(p.x), top, p.width as i32, rows);
            self.stats.peeled += 1;
        }
    }

    fn draw_wipe(&mut self, rects: &[WipeRect]) {
        for r in rects {
            let (top, _) = Self::rows_for(r.y);
            self.under
                .fill_rect(col_of(r.x), top, r.width as i32, ROWS_PER_BLOCK, WIPE);
            self.scene
                .fill_rect(col_of(r.x), top, r.width as i32, ROWS_PER_BLOCK, WIPE);
            self.stats.wiped += 1;
        }
    }

    fn draw_back(&mut self, images: &[LayerImage]) {
        self.stats.back += self.paint_layer(images, SCENE_AND_UNDER);
    }

    fn draw_mid(&mut self, images: &[MidImage]) {
        for img in images {
            let n = match img.kind {
                MidKind::Character => self.paint_character(img),
                MidKind::Section | MidKind::StaticObject => match glyph_for(img.image) {
                    // Static objects belong to the block; falling sections do not.
                    Some(glyph) => {
                        let target = if img.kind == MidKind::StaticObject {
                            SCENE_AND_UNDER
                        } else {
                            SCENE_ONLY
                        };
                        self.paint(&glyph, img.x, img.y, img.opacity, img.cutoff, target)
                    }
                    None => 0,
                },
            };
            self.stats.mid += n;
        }
    }

    fn draw_fore(&mut self, images: &[LayerImage]) {
        self.stats.fore += self.paint_layer(images, SCENE_AND_UNDER);
    }

    fn draw_message(&mut self, images: &[LayerImage]) {
        self.stats.message += self.paint_layer(images, SCENE_ONLY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_to_row_mapping() {
        assert_eq!(row_of(-8), 0);
        assert_eq!(row_of(55), 3);
        assert_eq!(row_of(118), 6);
        assert_eq!(row_of(181), 9);
        assert_eq!(VIEW_ROWS, 10);
    }

    #[test]
    fn rows_for_block_cover_three_rows() {
        assert_eq!(BlockView::rows_for(55), (1, 3));
        assert_eq!(BlockView::rows_for(-8), (-2, 0));
    }
}
