use std::io::Write;

use crate::present::{draw_overlay_popup, Frame, Presenter};

const UPPER_HALF: char = '\u{2580}';

type Layout = (u16, u16, usize, usize);

/// Two canvas pixels per cell: the top one as foreground of `▀`, the bottom
/// one as background.
#[derive(Default)]
pub struct HalfBlockPresenter {
    last_fg: Option<[u8; 3]>,
    last_bg: Option<[u8; 3]>,
    last_layout: Option<Layout>,
}

impl HalfBlockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_fg(&mut self, out: &mut dyn Write, c: [u8; 3]) -> std::io::Result<()> {
        if self.last_fg != Some(c) {
            write!(out, "\x1b[38;2;{};{};{}m", c[0], c[1], c[2])?;
            self.last_fg = Some(c);
        }
        Ok(())
    }

    fn set_bg(&mut self, out: &mut dyn Write, c: [u8; 3]) -> std::io::Result<()> {
        if self.last_bg != Some(c) {
            write!(out, "\x1b[48;2;{};{};{}m", c[0], c[1], c[2])?;
            self.last_bg = Some(c);
        }
        Ok(())
    }
}

fn rgb_at(pixels: &[u8], w: usize, h: usize, x: usize, y: usize) -> [u8; 3] {
    if y >= h {
        return [0, 0, 0];
    }
    let i = (y * w + x) * 4;
    [pixels[i], pixels[i + 1], pixels[i + 2]]
}

impl Presenter for HalfBlockPresenter {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn present(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let (w, h) = (frame.pixel_width, frame.pixel_height);
        if cols == 0 || visual_rows == 0 {
            return Ok(());
        }
        if w > cols || h > visual_rows * 2 || frame.pixels.len() < w * h * 4 {
            log::debug!("presenter skipped mismatched frame {w}x{h} for {cols}x{visual_rows}");
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        let layout = (frame.term_cols, frame.term_rows, w, h);
        if self.last_layout != Some(layout) {
            out.write_all(b"\x1b[0m\x1b[2J")?;
            self.last_layout = Some(layout);
        }
        out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        let canvas_rows = h.div_ceil(2);
        for row in 0..canvas_rows {
            for x in 0..w {
                let top = rgb_at(frame.pixels, w, h, x, row * 2);
                let bottom = rgb_at(frame.pixels, w, h, x, row * 2 + 1);
                self.set_fg(out, top)?;
                self.set_bg(out, bottom)?;
                write!(out, "{UPPER_HALF}")?;
            }
            out.write_all(b"\x1b[0m\x1b[K\r\n")?;
            self.last_fg = None;
            self.last_bg = None;
        }
        for row in canvas_rows..visual_rows {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", row + 1)?;
        }

        let mut hud_lines = frame.hud.lines();
        for i in 0..frame.hud_rows as usize {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
            if let Some(line) = hud_lines.next() {
                let clipped: String = line.chars().take(cols).collect();
                write!(out, "{clipped}")?;
            }
        }

        if let Some(text) = frame.overlay {
            draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
            // Force a full repaint once the popup closes.
            self.last_layout = None;
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
