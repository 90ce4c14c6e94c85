use crate::audio::{AudioSystem, SpectrumTap};
use crate::config::Config;
use crate::present::{wrap_lines, Frame, HalfBlockPresenter, Presenter};
use crate::presets;
use crate::scheduler::{CanvasSizing, FrameHost, FrameScheduler, TickOutcome};
use crate::settings::{ConfigCell, RenderConfig};
use crate::surface::PixelCanvas;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, QueueableCommand};
use std::io::{stdout, BufWriter, Stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

const SENSITIVITY_STEP: f32 = 0.1;
const MAX_HUD_ROWS: u16 = 3;
/// Smallest terminal that fits one canvas row under a HUD row.
const MIN_TERMINAL: (u16, u16) = (4, 2);
/// Leaves synchronized output and restores autowrap and colours the presenter changes.
const RESTORE_MODES: &[u8] = b"\x1b[?2026l\x1b[?7h\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    /// Clear stars, particles and spectrum history.
    ResetVisuals,
    Quit,
}

/// Interactive state behind the tick loop: the live config, canvas sizing and
/// the latest spectrum. Also the scheduler's [`FrameHost`].
pub struct Session {
    tap: Arc<SpectrumTap>,
    config: Arc<ConfigCell>,
    sizing: CanvasSizing,
    cols: u16,
    visual_rows: u16,
    preset_cursor: Option<usize>,
    show_help: bool,
}

impl Session {
    pub fn new(tap: Arc<SpectrumTap>, config: Arc<ConfigCell>, sizing: CanvasSizing) -> Self {
        Self {
            tap,
            config,
            sizing,
            cols: 0,
            visual_rows: 0,
            preset_cursor: None,
            show_help: false,
        }
    }

    /// Marks `key` as the active preset without touching the config.
    pub fn select_preset(&mut self, key: &str) {
        self.preset_cursor = presets::index_of(key);
    }

    pub fn active_preset(&self) -> Option<&'static presets::Preset> {
        self.preset_cursor.and_then(|i| presets::all().get(i))
    }

    /// Terminal cells available to the canvas.
    pub fn set_layout(&mut self, cols: u16, visual_rows: u16) {
        self.cols = cols;
        self.visual_rows = visual_rows;
    }

    pub fn sizing(&self) -> CanvasSizing {
        self.sizing
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn config(&self) -> Arc<RenderConfig> {
        self.config.snapshot()
    }

    pub fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers) -> KeyAction {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return KeyAction::Quit;
        }
        // Any key closes the help popup; quit keys still quit.
        if self.show_help && !matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.show_help = false;
            return KeyAction::Continue;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => return KeyAction::ResetVisuals,
            KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Char('f') | KeyCode::Char('F') => self.sizing.toggle_fullscreen(),
            KeyCode::Char(']') | KeyCode::Right => self.step_preset(true),
            KeyCode::Char('[') | KeyCode::Left => self.step_preset(false),
            KeyCode::Char('v') => self.edit(|c| c.visualization = c.visualization.next()),
            KeyCode::Char('V') => self.edit(|c| c.visualization = c.visualization.prev()),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.edit(|c| c.color_theme = c.color_theme.next())
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.edit(|c| c.background_style = c.background_style.next())
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.edit(|c| c.background_theme = c.background_theme.next())
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.edit(|c| c.bar_style = c.bar_style.next())
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.edit(|c| c.glow_effects = !c.glow_effects)
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.edit(|c| c.motion_effects = !c.motion_effects)
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.edit(|c| c.show_fps = !c.show_fps),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.edit(|c| c.step_sensitivity(SENSITIVITY_STEP))
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => {
                self.edit(|c| c.step_sensitivity(-SENSITIVITY_STEP))
            }
            _ => {}
        }
        KeyAction::Continue
    }

    fn edit(&mut self, change: impl FnOnce(&mut RenderConfig)) {
        self.config.update(change);
    }

    fn step_preset(&mut self, forward: bool) {
        let n = presets::all().len();
        let next = match (self.preset_cursor, forward) {
            (None, true) => 0,
            (None, false) => n - 1,
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
        };
        self.preset_cursor = Some(next);
        let preset = &presets::all()[next];
        self.config.update(|c| preset.apply(c));
        log::info!("preset {} ({})", preset.name, preset.group.label());
    }

    /// Status lines shown under the canvas.
    pub fn hud_text(&self, fps: f64, source: &str) -> String {
        let c = self.config.snapshot();
        let preset = self.active_preset().map_or("custom", |p| p.name);
        let on = |b: bool| if b { "on" } else { "off" };
        let bg = format!(
            "{} ({})",
            c.background_style.label(),
            c.background_theme.label()
        );
        let age = self.tap.age_ms();
        let audio = if age.is_finite() {
            format!("{age:.0} ms old")
        } else {
            "waiting".to_string()
        };
        format!(
            "Preset: {preset} | Viz: {} | Theme: {} | Bars: {} | Bg: {bg} | Sens: {:.1} | Glow: {} | Motion: {} | FPS: {fps:>4.1}\n\
             Source: {source} ({audio}) | Canvas: {} | Keys: v/c/b/t/s cycle  g/m/p toggle  +/- sensitivity  [/] preset  f fullscreen  r reset  h help  q quit",
            c.visualization.label(),
            c.color_theme.label(),
            c.bar_style.label(),
            c.sensitivity,
            on(c.glow_effects),
            on(c.motion_effects),
            if self.sizing.fullscreen { "fullscreen" } else { "fixed" },
        )
    }
}

impl FrameHost for Session {
    fn sample_frequencies(&mut self, out: &mut Vec<u8>) {
        self.tap.copy_into(out);
    }

    /// Two pixels per text row; the fixed height is capped by the viewport.
    fn container_size(&self) -> (u32, u32) {
        let viewport = u32::from(self.visual_rows) * 2;
        let (w, h) = self.sizing.resolve(u32::from(self.cols), viewport);
        let h = h.min(viewport);
        (w, h - h % 2)
    }

    fn current_config(&self) -> Arc<RenderConfig> {
        self.config.snapshot()
    }
}

pub fn help_popup_text() -> String {
    let mut text = String::from(
        "Sonic Visualizer Hotkeys\n\
v / V  next / previous visualization\n\
c  cycle color theme\n\
b  cycle background style\n\
t  cycle background theme\n\
s  cycle bar style\n\
g  toggle glow\n\
m  toggle motion effects\n\
p  toggle FPS counter\n\
+ / -  sensitivity up / down\n\
[ / ]  previous / next preset\n\
f  toggle fullscreen canvas\n\
r  reset stars, particles and spectrum\n\
h or ?  toggle this help\n\
q or esc  quit\n\
Presets:",
    );
    for group in presets::PresetGroup::all() {
        let names: Vec<&str> = presets::group(group).map(|p| p.name).collect();
        text.push_str(&format!("\n  {}: {}", group.label(), names.join(", ")));
    }
    text
}

fn hud_lines(hud: &str, cols: u16, term_rows: u16) -> (String, u16) {
    let lines = wrap_lines(hud, cols as usize);
    let rows = (lines.len() as u16)
        .min(MAX_HUD_ROWS)
        .min(term_rows.saturating_sub(1));
    (lines[..rows as usize].join("\n"), rows)
}

/// Raw-mode alternate screen the presenter writes into; restored on drop.
struct Screen {
    out: BufWriter<Stdout>,
}

impl Screen {
    fn open() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        // From here on, Drop undoes whatever was set up.
        let mut screen = Self {
            out: BufWriter::new(stdout()),
        };
        screen
            .out
            .queue(terminal::EnterAlternateScreen)?
            .queue(terminal::Clear(ClearType::All))?
            .queue(cursor::Hide)?;
        screen.out.flush().context("enter alternate screen")?;

        let (cols, rows) = terminal::size().context("get terminal size")?;
        if cols < MIN_TERMINAL.0 || rows < MIN_TERMINAL.1 {
            anyhow::bail!(
                "terminal too small (need at least {}x{}, got {cols}x{rows})",
                MIN_TERMINAL.0,
                MIN_TERMINAL.1
            );
        }
        log::debug!("alternate screen open at {cols}x{rows}");
        Ok(screen)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = self.out.write_all(RESTORE_MODES);
        let _ = self.out.queue(cursor::Show);
        let _ = self.out.queue(terminal::LeaveAlternateScreen);
        let _ = self.out.flush();
    }
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let render_config = cfg.render_config().context("resolve preset")?;
    let audio = AudioSystem::new(cfg.source, cfg.device.as_deref(), cfg.analyser_settings())
        .with_context(|| format!("start audio (source={:?})", cfg.source))?;

    let cell = Arc::new(ConfigCell::new(render_config));
    let mut session = Session::new(audio.tap(), Arc::clone(&cell), cfg.canvas_sizing());
    if let Some(name) = cfg.preset.as_deref() {
        if let Ok(p) = presets::find(name) {
            session.select_preset(p.key);
        }
    }

    let mut screen = Screen::open()?;
    let mut presenter = HalfBlockPresenter::new();
    let mut canvas = PixelCanvas::new();
    let mut scheduler = FrameScheduler::new();
    scheduler.start();

    log::info!("{} presenter, {} Hz audio", presenter.name(), audio.sample_rate_hz);

    let source_label = format!("{:?}", cfg.source);
    let target = Duration::from_secs_f64(1.0 / f64::from(cfg.fps.max(1)));
    let start = Instant::now();

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Release {
                    continue;
                }
                match session.handle_key(k.code, k.modifiers) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::ResetVisuals => scheduler.reset(),
                    KeyAction::Continue => {}
                }
            }
        }

        // Polled every frame; some terminals drop resize events.
        let (term_cols, term_rows) = terminal::size()?;
        let hud_source = session.hud_text(scheduler.fps(), &source_label);
        let (hud, hud_rows) = hud_lines(&hud_source, term_cols, term_rows);
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        session.set_layout(term_cols, visual_rows);

        let now = start.elapsed().as_secs_f64() * 1000.0;
        match scheduler.tick(now, &mut session, &mut canvas) {
            Ok(TickOutcome::Rendered { width, height }) => {
                let help = session.show_help().then(help_popup_text);
                let frame = Frame {
                    term_cols,
                    term_rows,
                    visual_rows,
                    pixel_width: width as usize,
                    pixel_height: height as usize,
                    pixels: canvas.data(),
                    hud: &hud,
                    hud_rows,
                    overlay: help.as_deref(),
                    sync_updates: cfg.sync_updates,
                };
                presenter.present(&frame, &mut screen.out)?;
            }
            Ok(TickOutcome::Idle | TickOutcome::Skipped) => {}
            // Already logged by the scheduler; try again next frame.
            Err(_) => {}
        }

        let elapsed = frame_start.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}
