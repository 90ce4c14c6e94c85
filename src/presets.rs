//! Named visualization presets for DJ sets, events and venues.

use thiserror::Error;

use crate::settings::{
    BackgroundStyle, BackgroundTheme, BarStyle, ColorTheme, RenderConfig, VisualizationType,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("unknown preset: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetGroup {
    Dj,
    Events,
    Venues,
}

impl PresetGroup {
    pub const fn all() -> [Self; 3] {
        [Self::Dj, Self::Events, Self::Venues]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dj => "DJ",
            Self::Events => "Events",
            Self::Venues => "Venues",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub key: &'static str,
    pub name: &'static str,
    pub group: PresetGroup,
    pub visualization: VisualizationType,
    pub color_theme: ColorTheme,
    pub background_style: BackgroundStyle,
    pub background_theme: BackgroundTheme,
    /// `None` keeps the current bar style.
    pub bar_style: Option<BarStyle>,
    pub sensitivity: f32,
    pub glow_effects: bool,
    pub motion_effects: bool,
    pub description: &'static str,
}

impl Preset {
    /// Copies the preset's fields into `config`. FPS display, the custom
    /// colour and (when the preset has none) the bar style are left alone.
    pub fn apply(&self, config: &mut RenderConfig) {
        config.visualization = self.visualization;
        config.color_theme = self.color_theme;
        config.background_style = self.background_style;
        config.background_theme = self.background_theme;
        if let Some(style) = self.bar_style {
            config.bar_style = style;
        }
        config.sensitivity = self.sensitivity;
        config.glow_effects = self.glow_effects;
        config.motion_effects = self.motion_effects;
        log::debug!("applied preset {}", self.key);
    }
}

#[allow(clippy::too_many_arguments)]
const fn preset(
    key: &'static str,
    name: &'static str,
    group: PresetGroup,
    visualization: VisualizationType,
    color_theme: ColorTheme,
    background_style: BackgroundStyle,
    background_theme: BackgroundTheme,
    bar_style: Option<BarStyle>,
    sensitivity: f32,
    glow_effects: bool,
    description: &'static str,
) -> Preset {
    Preset {
        key,
        name,
        group,
        visualization,
        color_theme,
        background_style,
        background_theme,
        bar_style,
        sensitivity,
        glow_effects,
        motion_effects: true,
        description,
    }
}

use BackgroundStyle as Bg;
use BackgroundTheme as Tone;
use ColorTheme as Theme;
use PresetGroup::{Dj, Events, Venues};
use VisualizationType as Vis;

static CATALOG: [Preset; 12] = [
    preset(
        "club",
        "Club DJ",
        Dj,
        Vis::Bars,
        Theme::Neon,
        Bg::Starfield,
        Tone::Night,
        Some(BarStyle::Normal),
        1.8,
        true,
        "High energy visualization perfect for club environments with vibrant neon colors and responsive bars",
    ),
    preset(
        "edm",
        "EDM Festival",
        Dj,
        Vis::RadialBars,
        Theme::Cyberpunk,
        Bg::Gradient,
        Tone::Night,
        None,
        2.0,
        true,
        "Circular visualization with intense colors ideal for electronic dance music and festival environments",
    ),
    preset(
        "lounge",
        "Lounge/Ambient",
        Dj,
        Vis::Wave,
        Theme::Pastel,
        Bg::Gradient,
        Tone::Sunset,
        None,
        1.5,
        true,
        "Smooth flowing waves with subtle pastel colors, perfect for lounge or chill-out areas",
    ),
    preset(
        "hiphop",
        "Hip-Hop",
        Dj,
        Vis::Spectrum,
        Theme::Fire,
        Bg::Solid,
        Tone::Dark,
        None,
        1.8,
        true,
        "Responsive spectrum analyzer with warm colors to complement hip-hop and R&B music",
    ),
    preset(
        "corporate",
        "Corporate Event",
        Events,
        Vis::Wave,
        Theme::Grayscale,
        Bg::Gradient,
        Tone::Dark,
        None,
        1.2,
        true,
        "Professional, understated visuals suitable for corporate events and formal gatherings",
    ),
    preset(
        "wedding",
        "Wedding",
        Events,
        Vis::Particles,
        Theme::Pastel,
        Bg::Starfield,
        Tone::Night,
        None,
        1.5,
        true,
        "Elegant particle effects with soft colors, ideal for wedding receptions and celebrations",
    ),
    preset(
        "concert",
        "Live Concert",
        Events,
        Vis::Terrain,
        Theme::Cyberpunk,
        Bg::Gradient,
        Tone::Sunset,
        None,
        1.7,
        true,
        "Dynamic landscape visualization that complements live music performances",
    ),
    preset(
        "productLaunch",
        "Product Launch",
        Events,
        Vis::Spiral,
        Theme::Neon,
        Bg::Gradient,
        Tone::Ocean,
        None,
        1.6,
        true,
        "Eye-catching spiral effects to draw attention during product launches or presentations",
    ),
    preset(
        "nightclub",
        "Nightclub",
        Venues,
        Vis::Particles,
        Theme::Cyberpunk,
        Bg::Starfield,
        Tone::Night,
        None,
        2.0,
        true,
        "High-energy particle system with intense colors that responds dramatically to beats",
    ),
    preset(
        "bar",
        "Bar/Pub",
        Venues,
        Vis::Bars,
        Theme::Fire,
        Bg::Solid,
        Tone::Dark,
        Some(BarStyle::Blocks),
        1.5,
        true,
        "Classic bar visualization with warm colors, not too distracting but visually appealing",
    ),
    preset(
        "restaurant",
        "Restaurant",
        Venues,
        Vis::Circle,
        Theme::Pastel,
        Bg::Gradient,
        Tone::Forest,
        None,
        1.2,
        true,
        "Subtle circular visualization that provides ambient visual interest without being distracting",
    ),
    preset(
        "artGallery",
        "Art Gallery/Exhibition",
        Venues,
        Vis::Spiral,
        Theme::Grayscale,
        Bg::Solid,
        Tone::Light,
        None,
        1.4,
        false,
        "Minimalist visualization suitable for artistic venues and exhibitions",
    ),
];

pub fn all() -> &'static [Preset] {
    &CATALOG
}

pub fn group(group: PresetGroup) -> impl Iterator<Item = &'static Preset> {
    CATALOG.iter().filter(move |p| p.group == group)
}

/// Looks a preset up by key or display name, ignoring case and punctuation,
/// so `productLaunch`, `product-launch` and `Product Launch` all match.
pub fn find(name: &str) -> Result<&'static Preset, PresetError> {
    let wanted = normalize(name);
    CATALOG
        .iter()
        .find(|p| normalize(p.key) == wanted || normalize(p.name) == wanted)
        .ok_or_else(|| PresetError::Unknown(name.trim().to_string()))
}

/// Position of `key` in [`all`], for cycling.
pub fn index_of(key: &str) -> Option<usize> {
    CATALOG.iter().position(|p| p.key == key)
}

/// Settings used before any preset is chosen.
pub fn default_settings() -> RenderConfig {
    RenderConfig::default()
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
