//! TerminalRenderer: presents a framebuffer on a real terminal.
//!
//! Frames are diffed against the last presented frame and only changed runs of cells
//! are written. Output is generic over `Write` so encoding can be tested without a tty.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: FrameBuffer,
    /// `false` until the first frame, and after `invalidate`.
    synced: bool,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: FrameBuffer::new(0, 0),
            synced: false,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch to raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.write_buf()?;
        log::debug!("terminal: raw mode on, alternate screen");
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.write_buf()?;
        terminal::disable_raw_mode().context("disabling raw mode")?;
        log::debug!("terminal: restored");
        Ok(())
    }

    /// Force the next frame to be written in full (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.synced = false;
    }

    /// Write the cells of `fb` that differ from the previously presented frame.
    pub fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        let same_size = self.last.width() == fb.width() && self.last.height() == fb.height();
        if self.synced && !same_size {
            log::debug!("terminal: size changed to {}x{}, full redraw", fb.width(), fb.height());
        }
        if self.synced && same_size {
            encode_diff_into(&self.last, fb, &mut self.buf)?;
        } else {
            encode_full_into(fb, &mut self.buf)?;
        }
        self.write_buf()?;

        self.last.copy_from(fb);
        self.synced = true;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf).context("writing to terminal")?;
        self.out.flush().context("flushing terminal")?;
        Ok(())
    }
}

/// Encode a full redraw of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut style = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            put_cell(out, cell_at(fb, x, y), &mut style)?;
        }
    }
    finish(out)
}

/// Encode only the runs of cells that changed between `prev` and `next`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut style = None;
    let mut wrote = false;
    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            put_cell(out, cell_at(next, x + dx, y), &mut style)?;
        }
        wrote = true;
        Ok(())
    })?;
    if wrote {
        finish(out)?;
    }
    Ok(())
}

fn cell_at(fb: &FrameBuffer, x: u16, y: u16) -> Cell {
    fb.get(x as i32, y as i32).unwrap_or_default()
}

fn put_cell(out: &mut Vec<u8>, cell: Cell, current: &mut Option<CellStyle>) -> Result<()> {
    if *current != Some(cell.style) {
        apply_style_into(out, cell.style)?;
        *current = Some(cell.style);
    }
    out.queue(Print(cell.ch))?;
    Ok(())
}

fn finish(out: &mut Vec<u8>) -> Result<()> {
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style_into(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, len)` for each horizontal run of cells that differ.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    let w = next.width();
    for y in 0..next.height() {
        let mut x = 0;
        while x < w {
            if cell_at(prev, x, y) == cell_at(next, x, y) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && cell_at(prev, x, y) != cell_at(next, x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_runs_are_coalesced() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 2);
        let mut b = FrameBuffer::new(6, 2);
        for x in 1..=3 {
            b.put_char(x, 0, '#', style);
        }
        b.put_char(5, 1, '#', style);

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3), (5, 1, 1)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn present_writes_full_then_diff() {
        let mut r = TerminalRenderer::new(Vec::new());
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_char(0, 0, 'A', CellStyle::default());
        r.present(&fb).unwrap();
        r.present(&fb).unwrap();
        let out = r.into_inner();
        assert_eq!(out.iter().filter(|&&b| b == b'A').count(), 1);
    }
}
