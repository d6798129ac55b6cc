//! PalaceView: lays the block view and a status panel out on the terminal.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::block_view::{row_of, BlockView, ROWS_PER_BLOCK, VIEW_COLS, VIEW_ROWS};
use crate::core::Engine;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{BlockAddr, BLOCK_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// What the runner knows that the engine does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunnerStatus {
    pub cursor: Option<BlockAddr>,
    pub paused: bool,
    /// Triggers rejected since start.
    pub rejected: u32,
    /// Images dropped by full draw lists since start.
    pub dropped: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

pub struct PalaceView {
    anchor_y: AnchorY,
}

impl Default for PalaceView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

const LABEL: CellStyle = CellStyle::fg(Rgb::new(220, 220, 220)).bold();
const VALUE: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const BORDER: CellStyle = CellStyle::fg(Rgb::new(200, 200, 200));
const CURSOR: CellStyle = CellStyle::fg(Rgb::new(80, 255, 120)).bold();

impl PalaceView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Lay out the view into an existing framebuffer.
    ///
    /// Allocation-free unless the viewport changed size.
    pub fn render_into(
        &self,
        view: &BlockView,
        engine: &Engine,
        status: &RunnerStatus,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame_w = VIEW_COLS as i32 + 2;
        let frame_h = VIEW_ROWS as i32 + 2;
        let start_x = (viewport.width as i32 - frame_w).max(0) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => (viewport.height as i32 - frame_h).max(0) / 2,
            AnchorY::Top => 0,
        };

        fb.draw_border(start_x, start_y, frame_w, frame_h, BORDER);
        view.blit_into(fb, start_x + 1, start_y + 1);

        if let Some(cursor) = status.cursor {
            if cursor.screen() == engine.visible_screen().screen {
                draw_cursor(fb, start_x + 1, start_y + 1, cursor);
            }
        }

        self.draw_side_panel(fb, engine, status, viewport, start_x + frame_w + 2, start_y);

        if status.paused {
            let text = "PAUSED";
            let x = start_x + (frame_w - text.len() as i32) / 2;
            fb.put_str(x, start_y + frame_h / 2, text, LABEL);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        engine: &Engine,
        status: &RunnerStatus,
        viewport: Viewport,
        panel_x: i32,
        start_y: i32,
    ) {
        if viewport.width as i32 - panel_x < 12 {
            return;
        }

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCREEN", LABEL);
        fb.put_u32(panel_x + 7, y, engine.visible_screen().screen as u32, VALUE);
        y += 1;
        fb.put_str(panel_x, y, "CYCLE", LABEL);
        fb.put_u32(panel_x + 7, y, engine.cycle() as u32, VALUE);
        y += 2;

        fb.put_str(panel_x, y, "TROBS", LABEL);
        let x = fb.put_u32(panel_x + 7, y, engine.trans().len() as u32, VALUE);
        let x = fb.put_str(x, y, "/", VALUE);
        fb.put_u32(x, y, engine.trans().capacity() as u32, VALUE);
        y += 1;
        fb.put_str(panel_x, y, "MOBS", LABEL);
        let x = fb.put_u32(panel_x + 7, y, engine.mobs().len() as u32, VALUE);
        let x = fb.put_str(x, y, "/", VALUE);
        fb.put_u32(x, y, engine.mobs().capacity() as u32, VALUE);
        y += 2;

        fb.put_str(panel_x, y, "CURSOR", LABEL);
        match status.cursor {
            Some(c) => {
                fb.put_u32(panel_x + 7, y, c.block() as u32, VALUE);
                let dim = CellStyle { dim: true, ..VALUE };
                let name = engine.blueprint().object(c);
                fb.put_str(panel_x, y + 1, object_name(name), dim);
            }
            None => {
                fb.put_str(panel_x + 7, y, "-", VALUE);
            }
        }
        y += 3;

        if status.rejected > 0 || status.dropped > 0 {
            let warn = CellStyle::fg(Rgb::new(230, 120, 60));
            fb.put_str(panel_x, y, "REJ", warn);
            fb.put_u32(panel_x + 4, y, status.rejected, warn);
            fb.put_str(panel_x + 10, y, "DROP", warn);
            fb.put_u32(panel_x + 15, y, status.dropped, warn);
        }
    }
}

/// Bracket the cursor block with corner marks.
fn draw_cursor(fb: &mut FrameBuffer, origin_x: i32, origin_y: i32, cursor: BlockAddr) {
    let bottom = origin_y + row_of(cursor.y());
    let top = bottom - (ROWS_PER_BLOCK - 1);
    let left = origin_x + cursor.x() as i32;
    let right = left + BLOCK_WIDTH as i32 - 1;
    fb.put_char(left, top, '▗', CURSOR);
    fb.put_char(right, top, '▖', CURSOR);
    fb.put_char(left, bottom, '▝', CURSOR);
    fb.put_char(right, bottom, '▘', CURSOR);
}

fn object_name(id: crate::types::ObjectId) -> &'static str {
    use crate::types::ObjectId::*;
    match id {
        Space => "space",
        Floor => "floor",
        Spikes => "spikes",
        Pillar => "pillar",
        Gate => "gate",
        StuckPlate => "stuck plate",
        PressPlate => "plate",
        UpPressPlate => "up plate",
        LooseFloor => "loose floor",
        Slicer => "slicer",
        Rubble => "rubble",
        Torch => "torch",
        Bones => "bones",
        Flask => "flask",
        Sword => "sword",
        Mirror => "mirror",
        Exit | Exit2 => "exit",
        Block => "block",
        Window | Window2 => "window",
        _ => "wall",
    }
}
