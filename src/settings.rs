use std::sync::Arc;

use arc_swap::ArcSwap;
use clap::ValueEnum;

pub const DEFAULT_SENSITIVITY: f32 = 1.5;
/// Range offered by the sensitivity slider. The renderer itself never clamps.
pub const SENSITIVITY_RANGE: (f32, f32) = (0.5, 3.0);
pub const DEFAULT_CUSTOM_BG: &str = "#121212";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum VisualizationType {
    #[default]
    Bars,
    Wave,
    Circle,
    Terrain,
    Particles,
    Spiral,
    Spectrum,
    #[value(alias = "radialBars", alias = "radial_bars")]
    RadialBars,
}

impl VisualizationType {
    pub const fn all() -> [Self; 8] {
        [
            Self::Bars,
            Self::Wave,
            Self::Circle,
            Self::Terrain,
            Self::Particles,
            Self::Spiral,
            Self::Spectrum,
            Self::RadialBars,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bars => "Bars",
            Self::Wave => "Wave",
            Self::Circle => "Circle",
            Self::Terrain => "Terrain",
            Self::Particles => "Particles",
            Self::Spiral => "Spiral",
            Self::Spectrum => "Spectrum",
            Self::RadialBars => "Radial Bars",
        }
    }

    /// Unknown names resolve to [`VisualizationType::Bars`].
    pub fn from_name(name: &str) -> Self {
        resolve_or_default(name, "visualization type")
    }

    pub fn next(self) -> Self {
        cycle(&Self::all(), self, 1)
    }

    pub fn prev(self) -> Self {
        cycle(&Self::all(), self, Self::all().len() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum ColorTheme {
    #[default]
    Neon,
    Fire,
    Cyberpunk,
    Pastel,
    #[value(alias = "greyscale")]
    Grayscale,
}

impl ColorTheme {
    pub const fn all() -> [Self; 5] {
        [
            Self::Neon,
            Self::Fire,
            Self::Cyberpunk,
            Self::Pastel,
            Self::Grayscale,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Neon => "Neon",
            Self::Fire => "Fire",
            Self::Cyberpunk => "Cyberpunk",
            Self::Pastel => "Pastel",
            Self::Grayscale => "Grayscale",
        }
    }

    /// Unknown names resolve to [`ColorTheme::Neon`].
    pub fn from_name(name: &str) -> Self {
        resolve_or_default(name, "colour theme")
    }

    pub fn next(self) -> Self {
        cycle(&Self::all(), self, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum BarStyle {
    #[default]
    Normal,
    Blocks,
    Curve,
}

impl BarStyle {
    pub const fn all() -> [Self; 3] {
        [Self::Normal, Self::Blocks, Self::Curve]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Blocks => "Blocks",
            Self::Curve => "Curve",
        }
    }

    /// Unknown names resolve to [`BarStyle::Normal`].
    pub fn from_name(name: &str) -> Self {
        resolve_or_default(name, "bar style")
    }

    pub fn next(self) -> Self {
        cycle(&Self::all(), self, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum BackgroundStyle {
    #[default]
    Gradient,
    Starfield,
    Solid,
    Custom,
}

impl BackgroundStyle {
    pub const fn all() -> [Self; 4] {
        [Self::Gradient, Self::Starfield, Self::Solid, Self::Custom]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gradient => "Gradient",
            Self::Starfield => "Starfield",
            Self::Solid => "Solid",
            Self::Custom => "Custom",
        }
    }

    /// Unknown names resolve to [`BackgroundStyle::Gradient`].
    pub fn from_name(name: &str) -> Self {
        resolve_or_default(name, "background style")
    }

    pub fn next(self) -> Self {
        cycle(&Self::all(), self, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum BackgroundTheme {
    #[default]
    Dark,
    Light,
    Night,
    Sunset,
    Ocean,
    Forest,
}

impl BackgroundTheme {
    pub const fn all() -> [Self; 6] {
        [
            Self::Dark,
            Self::Light,
            Self::Night,
            Self::Sunset,
            Self::Ocean,
            Self::Forest,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
            Self::Night => "Night",
            Self::Sunset => "Sunset",
            Self::Ocean => "Ocean",
            Self::Forest => "Forest",
        }
    }

    /// Unknown names resolve to [`BackgroundTheme::Dark`].
    pub fn from_name(name: &str) -> Self {
        resolve_or_default(name, "background theme")
    }

    pub fn next(self) -> Self {
        cycle(&Self::all(), self, 1)
    }
}

/// Snapshot of everything the renderer reads during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub visualization: VisualizationType,
    pub color_theme: ColorTheme,
    pub sensitivity: f32,
    pub bar_style: BarStyle,
    pub background_style: BackgroundStyle,
    pub background_theme: BackgroundTheme,
    /// Only read when `background_style` is [`BackgroundStyle::Custom`].
    pub custom_bg_color: String,
    pub glow_effects: bool,
    /// Reserved; no routine reads it yet.
    pub motion_effects: bool,
    pub show_fps: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            visualization: VisualizationType::Bars,
            color_theme: ColorTheme::Neon,
            sensitivity: DEFAULT_SENSITIVITY,
            bar_style: BarStyle::Normal,
            background_style: BackgroundStyle::Gradient,
            background_theme: BackgroundTheme::Dark,
            custom_bg_color: DEFAULT_CUSTOM_BG.to_string(),
            glow_effects: true,
            motion_effects: true,
            show_fps: false,
        }
    }
}

impl RenderConfig {
    /// Nudges sensitivity the way the slider does: clamped to [`SENSITIVITY_RANGE`].
    pub fn step_sensitivity(&mut self, delta: f32) {
        let (lo, hi) = SENSITIVITY_RANGE;
        let stepped = ((self.sensitivity + delta) * 10.0).round() / 10.0;
        self.sensitivity = stepped.clamp(lo, hi);
    }
}

/// Single-writer hand-off of [`RenderConfig`] snapshots between the UI actor and
/// the tick loop. Readers always observe a complete config.
pub struct ConfigCell {
    inner: ArcSwap<RenderConfig>,
}

impl ConfigCell {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            inner: ArcSwap::from_pointee(config),
        }
    }

    pub fn snapshot(&self) -> Arc<RenderConfig> {
        self.inner.load_full()
    }

    pub fn publish(&self, config: RenderConfig) {
        self.inner.store(Arc::new(config));
    }

    pub fn update(&self, edit: impl FnOnce(&mut RenderConfig)) {
        let mut next = RenderConfig::clone(&self.inner.load());
        edit(&mut next);
        self.inner.store(Arc::new(next));
    }
}

impl Default for ConfigCell {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

fn resolve_or_default<T: ValueEnum + Default>(name: &str, what: &str) -> T {
    match <T as ValueEnum>::from_str(name.trim(), true) {
        Ok(v) => v,
        Err(_) => {
            log::debug!("unknown {what} {name:?}; using default");
            T::default()
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: usize) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}
