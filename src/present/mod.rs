//! Terminal output of a rendered canvas.

mod halfblock;

pub use halfblock::HalfBlockPresenter;

use std::io::Write;

/// One canvas plus the text chrome around it.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    /// Rows reserved for the canvas; the HUD sits below them.
    pub visual_rows: u16,
    pub pixel_width: usize,
    /// May be shorter than `visual_rows * 2`; the rest is blanked.
    pub pixel_height: usize,
    /// Premultiplied RGBA, read as composited over black.
    pub pixels: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Presenter {
    fn name(&self) -> &'static str;
    fn present(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Word-agnostic hard wrap of `text` to `width` columns.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    lines
}

/// Centered box over a dimmed backdrop. The first line is drawn as a title.
pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    let (cols, rows) = (term_cols as usize, term_rows as usize);
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let lines = wrap_lines(text, cols.saturating_sub(6));
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(1)
        .clamp(1, cols.saturating_sub(6).max(1));
    let box_w = inner_w + 4;
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = body_h + 2;

    let left = (cols.saturating_sub(box_w)) / 2 + 1;
    let top = (rows.saturating_sub(box_h)) / 2 + 1;
    let edge = format!("+{}+", "-".repeat(box_w - 2));

    out.write_all(b"\x1b[0m\x1b[38;2;220;228;242m\x1b[48;2;4;4;12m")?;
    for row in 1..=rows {
        write!(out, "\x1b[{row};1H\x1b[2K")?;
    }
    out.write_all(b"\x1b[48;2;14;16;30m")?;
    write!(out, "\x1b[{top};{left}H{edge}")?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = top + 1 + i;
        write!(out, "\x1b[{row};{left}H| {line:<inner_w$} |")?;
        if i == 0 {
            write!(out, "\x1b[{row};{}H\x1b[1m\x1b[38;2;255;230;150m{line}\x1b[22m\x1b[38;2;220;228;242m", left + 2)?;
        }
    }
    write!(out, "\x1b[{};{left}H{edge}", top + box_h - 1)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
