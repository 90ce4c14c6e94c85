//! Colour theme and background palette lookup tables.

use crate::color::Color;
use crate::settings::{BackgroundTheme, ColorTheme};
use crate::surface::{GradientStop, Paint};

const NEON: [(f32, Color); 2] = [(0.0, Color::rgb8(0x00, 0xc6, 0xff)), (1.0, Color::rgb8(0x00, 0x72, 0xff))];
const FIRE: [(f32, Color); 2] = [(0.0, Color::rgb8(0xff, 0x41, 0x6c)), (1.0, Color::rgb8(0xff, 0x4b, 0x2b))];
const CYBERPUNK: [(f32, Color); 3] = [
    (0.0, Color::rgb8(0xf9, 0x53, 0xc6)),
    (0.5, Color::rgb8(0xff, 0x7e, 0x5f)),
    (1.0, Color::rgb8(0xb9, 0x67, 0xff)),
];
const PASTEL: [(f32, Color); 2] = [(0.0, Color::rgb8(0xa1, 0x8c, 0xd1)), (1.0, Color::rgb8(0xfb, 0xc2, 0xeb))];
const GRAYSCALE: [(f32, Color); 2] = [(0.0, Color::rgb8(0xff, 0xff, 0xff)), (1.0, Color::rgb8(0x5a, 0x5a, 0x5a))];

/// Ordered gradient stops of a colour theme, top (offset 0) to bottom (offset 1).
pub fn theme_stops(theme: ColorTheme) -> Vec<GradientStop> {
    let table: &[(f32, Color)] = match theme {
        ColorTheme::Neon => &NEON,
        ColorTheme::Fire => &FIRE,
        ColorTheme::Cyberpunk => &CYBERPUNK,
        ColorTheme::Pastel => &PASTEL,
        ColorTheme::Grayscale => &GRAYSCALE,
    };
    table
        .iter()
        .map(|&(offset, color)| GradientStop::new(offset, color))
        .collect()
}

/// Same as [`theme_stops`] for a raw theme name; unknown names get the neon stops.
pub fn theme_stops_by_name(name: &str) -> Vec<GradientStop> {
    theme_stops(ColorTheme::from_name(name))
}

/// Vertical gradient spanning the full canvas height.
pub fn theme_gradient(theme: ColorTheme, height: f32) -> Paint {
    Paint::vertical(height, theme_stops(theme))
}

pub fn background_gradient_pair(theme: BackgroundTheme) -> (Color, Color) {
    match theme {
        BackgroundTheme::Dark => (Color::rgb8(15, 15, 20), Color::rgb8(30, 30, 40)),
        BackgroundTheme::Light => (Color::rgb8(240, 240, 245), Color::rgb8(220, 220, 230)),
        BackgroundTheme::Night => (Color::rgb8(5, 5, 20), Color::rgb8(10, 10, 35)),
        BackgroundTheme::Sunset => (Color::rgb8(35, 10, 20), Color::rgb8(80, 20, 40)),
        BackgroundTheme::Ocean => (Color::rgb8(5, 30, 50), Color::rgb8(10, 50, 80)),
        BackgroundTheme::Forest => (Color::rgb8(10, 40, 20), Color::rgb8(20, 60, 30)),
    }
}

pub fn starfield_base(theme: BackgroundTheme) -> Color {
    match theme {
        BackgroundTheme::Dark | BackgroundTheme::Night => Color::rgb8(0x00, 0x00, 0x18),
        BackgroundTheme::Sunset => Color::rgb8(0x18, 0x00, 0x08),
        BackgroundTheme::Ocean => Color::rgb8(0x00, 0x10, 0x18),
        BackgroundTheme::Forest => Color::rgb8(0x00, 0x18, 0x00),
        BackgroundTheme::Light => Color::rgb8(0xe0, 0xe0, 0xe8),
    }
}

/// Opaque star colour; the per-star twinkle becomes the alpha.
pub fn star_tint(theme: BackgroundTheme) -> Color {
    match theme {
        BackgroundTheme::Sunset => Color::rgb8(255, 220, 180),
        BackgroundTheme::Ocean => Color::rgb8(180, 220, 255),
        BackgroundTheme::Forest => Color::rgb8(220, 255, 220),
        BackgroundTheme::Light => Color::rgb8(80, 80, 120),
        BackgroundTheme::Dark | BackgroundTheme::Night => Color::WHITE,
    }
}

pub fn solid_fill(theme: BackgroundTheme) -> Color {
    match theme {
        BackgroundTheme::Dark => Color::rgb8(0x12, 0x12, 0x12),
        BackgroundTheme::Light => Color::rgb8(0xf0, 0xf0, 0xf0),
        BackgroundTheme::Night => Color::rgb8(0x05, 0x05, 0x10),
        BackgroundTheme::Sunset => Color::rgb8(0x20, 0x10, 0x20),
        BackgroundTheme::Ocean => Color::rgb8(0x0a, 0x20, 0x30),
        BackgroundTheme::Forest => Color::rgb8(0x0a, 0x20, 0x10),
    }
}
