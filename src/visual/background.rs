use std::f32::consts::TAU;

use crate::color::Color;
use crate::settings::{BackgroundStyle, DEFAULT_CUSTOM_BG};
use crate::surface::{GradientStop, Paint, Path, Surface};
use crate::theme::{background_gradient_pair, solid_fill, star_tint, starfield_base};
use crate::visual::RenderCtx;

pub const STAR_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
}

/// Stars are placed once against the canvas size of the first starfield tick
/// and are not moved when the canvas is resized later.
#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Populates the field if it is still empty. Returns true when it did.
    pub fn ensure_initialized(&mut self, width: f32, height: f32, rng: &mut fastrand::Rng) -> bool {
        if !self.stars.is_empty() {
            return false;
        }
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.f32() * width,
                y: rng.f32() * height,
                size: rng.f32() * 2.0 + 0.5,
                brightness: rng.f32() * 0.5 + 0.5,
            })
            .collect();
        log::debug!("starfield initialised at {width}x{height}");
        true
    }

    pub fn reset(&mut self) {
        self.stars.clear();
    }
}

/// Rendered brightness of star `index` at `now` milliseconds.
pub fn twinkle(brightness: f32, index: usize, now: f64) -> f32 {
    brightness * (0.8 + 0.2 * (now / 500.0 + index as f64).sin() as f32)
}

#[derive(Debug, Default)]
pub struct BackgroundCompositor {
    stars: StarField,
    last_rejected: Option<String>,
}

impl BackgroundCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn reset(&mut self) {
        self.stars.reset();
    }

    pub fn paint(&mut self, surface: &mut dyn Surface, ctx: &RenderCtx, rng: &mut fastrand::Rng) {
        let (w, h) = (ctx.w, ctx.h);
        let theme = ctx.config.background_theme;
        match ctx.config.background_style {
            BackgroundStyle::Gradient => {
                let (top, bottom) = background_gradient_pair(theme);
                let paint = Paint::vertical(
                    h,
                    vec![GradientStop::new(0.0, top), GradientStop::new(1.0, bottom)],
                );
                surface.fill_rect(0.0, 0.0, w, h, &paint);
            }
            BackgroundStyle::Starfield => {
                surface.fill_rect(0.0, 0.0, w, h, &Paint::Solid(starfield_base(theme)));
                self.stars.ensure_initialized(w, h, rng);
                let tint = star_tint(theme);
                for (i, star) in self.stars.stars().iter().enumerate() {
                    let mut dot = Path::new();
                    dot.arc(star.x, star.y, star.size, 0.0, TAU, false);
                    let alpha = twinkle(star.brightness, i, ctx.now);
                    surface.fill_path(&dot, &Paint::Solid(tint.with_alpha(alpha)));
                }
            }
            BackgroundStyle::Solid => {
                surface.fill_rect(0.0, 0.0, w, h, &Paint::Solid(solid_fill(theme)));
            }
            BackgroundStyle::Custom => {
                let color = self.custom_color(&ctx.config.custom_bg_color);
                surface.fill_rect(0.0, 0.0, w, h, &Paint::Solid(color));
            }
        }
    }

    /// Parses the user colour, falling back to the default dark grey. A bad
    /// value is reported when it first replaces the previous one.
    fn custom_color(&mut self, raw: &str) -> Color {
        match Color::parse(raw) {
            Ok(c) => c,
            Err(err) => {
                if self.last_rejected.as_deref() != Some(raw) {
                    log::warn!("custom background colour {raw:?} rejected ({err}); using {DEFAULT_CUSTOM_BG}");
                    self.last_rejected = Some(raw.to_string());
                }
                fallback_custom()
            }
        }
    }
}

fn fallback_custom() -> Color {
    Color::rgb8(0x12, 0x12, 0x12)
}
