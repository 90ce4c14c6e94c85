pub mod algorithms;
pub mod background;
pub mod particles;
pub mod spectrum;

use crate::color::Color;
use crate::settings::{RenderConfig, VisualizationType};
use crate::surface::Surface;
use crate::theme::theme_gradient;

pub use background::{BackgroundCompositor, Star, StarField, STAR_COUNT};
pub use particles::{Particle, ParticleSystem, PARTICLE_COUNT};
pub use spectrum::SpectrumSmoother;

pub const FPS_TEXT_POS: (f32, f32) = (10.0, 20.0);
pub const FPS_TEXT_SIZE: f32 = 12.0;

/// Inputs of one render step.
pub struct RenderCtx<'a> {
    pub frame: &'a [u8],
    pub w: f32,
    pub h: f32,
    /// Milliseconds on the scheduler clock.
    pub now: f64,
    pub config: &'a RenderConfig,
    pub fps: f64,
}

/// Animation state that outlives a single frame. Nothing here is cleared by a
/// configuration change; only [`RenderState::reset`] does that.
pub struct RenderState {
    background: BackgroundCompositor,
    particles: ParticleSystem,
    spectrum: SpectrumSmoother,
    rng: fastrand::Rng,
}

impl RenderState {
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            background: BackgroundCompositor::new(),
            particles: ParticleSystem::new(),
            spectrum: SpectrumSmoother::new(),
            rng,
        }
    }

    pub fn stars(&self) -> &StarField {
        self.background.stars()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn spectrum(&self) -> &SpectrumSmoother {
        &self.spectrum
    }

    pub fn reset(&mut self) {
        self.background.reset();
        self.particles.reset();
        self.spectrum.reset();
        log::debug!("render state cleared");
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the surface, then paints background, visualization and the FPS
/// text in that order. Degenerate canvas sizes draw nothing.
pub fn render(surface: &mut dyn Surface, ctx: &RenderCtx, state: &mut RenderState) {
    if !(ctx.w > 0.0 && ctx.h > 0.0) {
        return;
    }
    surface.clear();
    state.background.paint(surface, ctx, &mut state.rng);

    match ctx.config.visualization {
        VisualizationType::Bars => {
            let gradient = theme_gradient(ctx.config.color_theme, ctx.h);
            algorithms::bars(surface, ctx, &gradient);
        }
        VisualizationType::Wave => algorithms::wave(surface, ctx),
        VisualizationType::Circle => algorithms::circle(surface, ctx),
        VisualizationType::Terrain => algorithms::terrain(surface, ctx),
        VisualizationType::Particles => {
            algorithms::particles(surface, ctx, &mut state.particles, &mut state.rng);
        }
        VisualizationType::Spiral => algorithms::spiral(surface, ctx),
        VisualizationType::Spectrum => algorithms::spectrum(surface, ctx, &mut state.spectrum),
        VisualizationType::RadialBars => algorithms::radial_bars(surface, ctx),
    }

    if ctx.config.show_fps {
        draw_fps(surface, ctx.fps);
    }
    surface.flush();
}

pub fn fps_label(fps: f64) -> String {
    format!("FPS: {:.0}", fps.round())
}

fn draw_fps(surface: &mut dyn Surface, fps: f64) {
    let (x, y) = FPS_TEXT_POS;
    surface.fill_text(&fps_label(fps), x, y, FPS_TEXT_SIZE, Color::WHITE);
}
