use clap::{Parser, ValueEnum};

use crate::analyzer::{AnalyserSettings, DEFAULT_FFT_SIZE};
use crate::presets::{self, PresetError};
use crate::scheduler::{CanvasSizing, DEFAULT_CANVAS_HEIGHT};
use crate::settings::{
    BackgroundStyle, BackgroundTheme, BarStyle, ColorTheme, RenderConfig, VisualizationType,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sonic-visualizer",
    version,
    about = "Audio-reactive spectrum visualizer rendered in the terminal"
)]
pub struct Config {
    #[arg(long, value_enum, default_value_t = AudioSource::Synth)]
    pub source: AudioSource,

    /// Substring of the input device name (mic source only).
    #[arg(long)]
    pub device: Option<String>,

    #[arg(long, default_value_t = false)]
    pub list_devices: bool,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    pub fft_size: usize,

    #[arg(long, default_value_t = false)]
    pub fullscreen: bool,

    /// Canvas height in pixels outside fullscreen (two pixels per text row).
    #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub canvas_height: u32,

    /// Preset key or name, e.g. `club` or "Live Concert".
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long, default_value_t = false)]
    pub list_presets: bool,

    #[arg(long, value_enum)]
    pub visualization: Option<VisualizationType>,

    #[arg(long, value_enum)]
    pub theme: Option<ColorTheme>,

    #[arg(long)]
    pub sensitivity: Option<f32>,

    #[arg(long, value_enum)]
    pub bar_style: Option<BarStyle>,

    #[arg(long, value_enum)]
    pub background: Option<BackgroundStyle>,

    #[arg(long, value_enum)]
    pub background_theme: Option<BackgroundTheme>,

    /// CSS colour used by `--background custom`.
    #[arg(long)]
    pub custom_bg: Option<String>,

    #[arg(long, action = clap::ArgAction::Set)]
    pub glow: Option<bool>,

    #[arg(long, default_value_t = false)]
    pub show_fps: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudioSource {
    /// Built-in beat and sweep test signal.
    Synth,
    /// Microphone / line input (needs the `capture` feature).
    Mic,
}

impl Config {
    /// Starting render settings: defaults, then the preset, then explicit flags.
    pub fn render_config(&self) -> Result<RenderConfig, PresetError> {
        let mut rc = presets::default_settings();
        if let Some(name) = self.preset.as_deref() {
            presets::find(name)?.apply(&mut rc);
        }
        if let Some(v) = self.visualization {
            rc.visualization = v;
        }
        if let Some(t) = self.theme {
            rc.color_theme = t;
        }
        if let Some(k) = self.sensitivity {
            rc.sensitivity = k;
        }
        if let Some(s) = self.bar_style {
            rc.bar_style = s;
        }
        if let Some(b) = self.background {
            rc.background_style = b;
        }
        if let Some(t) = self.background_theme {
            rc.background_theme = t;
        }
        if let Some(c) = self.custom_bg.as_ref() {
            rc.custom_bg_color = c.clone();
        }
        if let Some(g) = self.glow {
            rc.glow_effects = g;
        }
        rc.show_fps = self.show_fps;
        Ok(rc)
    }

    pub fn analyser_settings(&self) -> AnalyserSettings {
        AnalyserSettings {
            fft_size: self.fft_size,
            ..AnalyserSettings::default()
        }
    }

    pub fn canvas_sizing(&self) -> CanvasSizing {
        CanvasSizing {
            fixed_height: self.canvas_height,
            fullscreen: self.fullscreen,
        }
    }
}
