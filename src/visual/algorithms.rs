//! The eight visualization routines.
//!
//! Every routine draws nothing audio-reactive for an empty frame. Sample
//! heights scale linearly with sensitivity and are never clamped to the canvas.

use std::f32::consts::{PI, TAU};

use crate::color::Color;
use crate::settings::BarStyle;
use crate::surface::{GradientStop, Paint, Path, Shadow, Surface};
use crate::visual::particles::{intensity, particle_hue, ParticleSystem};
use crate::visual::spectrum::SpectrumSmoother;
use crate::visual::RenderCtx;

pub const BLOCK_HEIGHT: f32 = 5.0;
pub const WAVE_DOTS: usize = 20;
pub const CIRCLE_SPOKES: usize = 120;
pub const RADIAL_BARS: usize = 180;

pub enum Shape<'p> {
    Fill(&'p Path),
    Stroke(&'p Path, f32),
}

/// Crisp draw followed, when `glow` is set, by the same draw under a blurred
/// shadow. The shadow is switched off again afterwards.
pub fn draw_with_glow(surface: &mut dyn Surface, shape: Shape<'_>, paint: &Paint, glow: Option<Shadow>) {
    draw_shape(surface, &shape, paint);
    if let Some(shadow) = glow {
        surface.set_shadow(Some(shadow));
        draw_shape(surface, &shape, paint);
        surface.set_shadow(None);
    }
}

fn draw_shape(surface: &mut dyn Surface, shape: &Shape<'_>, paint: &Paint) {
    match *shape {
        Shape::Fill(path) => surface.fill_path(path, paint),
        Shape::Stroke(path, width) => surface.stroke_path(path, paint, width),
    }
}

fn glow(ctx: &RenderCtx, blur: f32, color: Color) -> Option<Shadow> {
    ctx.config.glow_effects.then(|| Shadow::new(blur, color))
}

pub fn bar_height(sample: u8, sensitivity: f32, height: f32) -> f32 {
    f32::from(sample) * (sensitivity / 255.0) * height
}

fn mean(frame: &[u8]) -> f32 {
    let sum: u64 = frame.iter().map(|&s| u64::from(s)).sum();
    sum as f32 / frame.len().max(1) as f32
}

fn sample_at(frame: &[u8], idx: usize) -> u8 {
    frame.get(idx.min(frame.len().saturating_sub(1))).copied().unwrap_or(0)
}

pub fn bars(surface: &mut dyn Surface, ctx: &RenderCtx, gradient: &Paint) {
    let columns = ctx.frame.len() / 4;
    if columns == 0 {
        return;
    }
    let (w, h) = (ctx.w, ctx.h);
    let bar_w = w / columns as f32;
    let k = ctx.config.sensitivity;

    for (i, &s) in ctx.frame[..columns].iter().enumerate() {
        let x = i as f32 * bar_w;
        let bh = bar_height(s, k, h);
        match ctx.config.bar_style {
            BarStyle::Normal => surface.fill_rect(x, h - bh, bar_w - 1.0, bh, gradient),
            BarStyle::Blocks => {
                let blocks = (bh / BLOCK_HEIGHT).floor().max(0.0) as usize;
                for j in 0..blocks {
                    let y = h - (j + 1) as f32 * BLOCK_HEIGHT;
                    surface.fill_rect(x, y, bar_w - 1.0, BLOCK_HEIGHT - 1.0, gradient);
                }
            }
            BarStyle::Curve => {
                let mut path = Path::new();
                path.move_to(x, h)
                    .line_to(x, h - bh)
                    .arc(x + bar_w / 2.0, h - bh, bar_w / 2.0, PI, 0.0, true)
                    .line_to(x + bar_w, h);
                surface.fill_path(&path, gradient);
            }
        }
    }
}

pub fn wave(surface: &mut dyn Surface, ctx: &RenderCtx) {
    let len = ctx.frame.len();
    if len == 0 {
        return;
    }
    let (w, h) = (ctx.w, ctx.h);
    let k = ctx.config.sensitivity;
    let centre = h / 2.0;
    let amplitude = h / 4.0 * k;
    let half = len / 2;
    let oscillation = ((ctx.now / 2000.0).sin() * 10.0) as f32;
    let hue1 = (ctx.now / 50.0).rem_euclid(360.0) as f32;
    let hue2 = (hue1 + 180.0) % 360.0;

    if half > 0 {
        let slice = w / half as f32;
        for (n, (direction, hue)) in [(-1.0f32, hue1), (1.0, hue2)].into_iter().enumerate() {
            let samples = &ctx.frame[n * half..(n + 1) * half];
            let y_of = |s: u8| centre + direction * (f32::from(s) / 255.0) * amplitude + oscillation;

            let mut path = Path::new();
            for (i, &s) in samples.iter().enumerate() {
                let x = i as f32 * slice;
                let y = y_of(s);
                if i == 0 {
                    path.move_to(x, y);
                } else {
                    let px = x - slice;
                    let py = y_of(samples[i - 1]);
                    path.quad_to((px + x) / 2.0, (py + y) / 2.0, x, y);
                }
            }
            draw_with_glow(
                surface,
                Shape::Stroke(&path, 3.0),
                &Paint::Solid(Color::hsla(hue, 100.0, 60.0, 0.7)),
                glow(ctx, 10.0, Color::hsla(hue, 100.0, 70.0, 0.5)),
            );
        }
    }

    let dot_paint = Paint::Solid(Color::rgba8(255, 255, 255, 0.7));
    let spacing = w / WAVE_DOTS as f32;
    for i in 0..WAVE_DOTS {
        let x = i as f32 * spacing;
        let idx = (i as f32 / WAVE_DOTS as f32 * (len as f32 / 2.0)).floor() as usize;
        let amp = f32::from(sample_at(ctx.frame, idx)) / 255.0;
        let size = 1.0 + amp * 4.0 * k;
        let y = centre + ((ctx.now / 500.0 + i as f64 * 0.3).sin() * 2.0) as f32;
        draw_with_glow(
            surface,
            Shape::Fill(&Path::circle(x, y, size)),
            &dot_paint,
            glow(ctx, 8.0, Color::rgba8(255, 255, 255, 0.6)),
        );
    }
}

pub fn circle(surface: &mut dyn Surface, ctx: &RenderCtx) {
    let len = ctx.frame.len();
    if len == 0 {
        return;
    }
    let (cx, cy) = (ctx.w / 2.0, ctx.h / 2.0);
    let k = ctx.config.sensitivity;
    let base = ctx.w.min(ctx.h) / 3.0;
    let avg = mean(ctx.frame) * k;
    let pulse = base * (0.9 + 0.2 * (avg / 255.0));
    let rotation = ctx.now / 3000.0;

    for i in 0..3 {
        let fi = i as f32;
        let guide = Path::circle(cx, cy, pulse * (0.7 + fi * 0.15));
        let paint = Paint::Solid(Color::rgba8(255, 255, 255, 0.03 + fi * 0.03));
        surface.stroke_path(&guide, &paint, 1.0 + fi);
    }

    let step = std::f64::consts::TAU / CIRCLE_SPOKES as f64;
    let quarter = len as f32 / 4.0;
    for i in 0..CIRCLE_SPOKES {
        let t = i as f32 / CIRCLE_SPOKES as f32;
        let idx = (t.powf(1.5) * quarter).floor() as usize;
        let amp = f32::from(sample_at(ctx.frame, idx)) / 255.0 * k;
        let length = pulse * amp * 0.5;
        let angle = rotation + i as f64 * step;
        let (sin, cos) = (angle.sin() as f32, angle.cos() as f32);

        let spoke = Path::segment(
            cx + cos * pulse,
            cy + sin * pulse,
            cx + cos * (pulse + length),
            cy + sin * (pulse + length),
        );
        let hue = t * 360.0;
        draw_with_glow(
            surface,
            Shape::Stroke(&spoke, 2.0),
            &Paint::Solid(Color::hsla(hue, 100.0, 60.0, 0.8)),
            glow(ctx, 10.0, Color::hsla(hue, 100.0, 70.0, 0.6)),
        );
    }

    let inner = pulse * 0.2 * (0.8 + 0.4 * (avg / 255.0));
    let hue = (ctx.now / 50.0).rem_euclid(360.0) as f32;
    let paint = Paint::Radial {
        cx,
        cy,
        radius: inner,
        stops: vec![
            GradientStop::new(0.0, Color::hsla(hue, 100.0, 70.0, 0.8)),
            GradientStop::new(1.0, Color::hsla(hue, 100.0, 50.0, 0.0)),
        ],
    };
    surface.fill_path(&Path::circle(cx, cy, inner), &paint);
}

pub fn terrain(surface: &mut dyn Surface, ctx: &RenderCtx) {
    let half = ctx.frame.len() / 2;
    if half == 0 {
        return;
    }
    let (w, h) = (ctx.w, ctx.h);
    let k = ctx.config.sensitivity;
    let step = w / half as f32;

    let mut path = Path::new();
    path.move_to(0.0, h);
    for (i, &s) in ctx.frame[..half].iter().enumerate() {
        path.line_to(i as f32 * step, h - bar_height(s, k, h));
    }
    path.line_to(w, h).close();

    let paint = Paint::vertical(
        h,
        vec![
            GradientStop::new(0.0, Color::rgba8(100, 100, 255, 0.8)),
            GradientStop::new(0.5, Color::rgba8(80, 80, 200, 0.6)),
            GradientStop::new(1.0, Color::rgba8(50, 50, 150, 0.4)),
        ],
    );
    surface.fill_path(&path, &paint);
}

pub fn particles(
    surface: &mut dyn Surface,
    ctx: &RenderCtx,
    system: &mut ParticleSystem,
    rng: &mut fastrand::Rng,
) {
    if ctx.frame.is_empty() {
        return;
    }
    system.ensure_initialized(ctx.w, ctx.h, rng);
    let level = intensity(ctx.frame, ctx.config.sensitivity);
    system.step(level, ctx.w, ctx.h);

    for p in system.particles() {
        let size = p.size * (0.5 + level * 1.5);
        let hue = particle_hue(p.hue_seed, ctx.now);
        draw_with_glow(
            surface,
            Shape::Fill(&Path::circle(p.x, p.y, size)),
            &Paint::Solid(Color::hsla(hue, 100.0, 60.0, 0.5 + level * 0.5)),
            glow(ctx, 10.0, Color::hsla(hue, 100.0, 70.0, 0.7)),
        );
    }
}

pub fn spiral(surface: &mut dyn Surface, ctx: &RenderCtx) {
    let len = ctx.frame.len();
    if len == 0 {
        return;
    }
    let (cx, cy) = (ctx.w / 2.0, ctx.h / 2.0);
    let max_radius = ctx.w.min(ctx.h) / 2.0 * 0.8;
    let k = ctx.config.sensitivity;

    for i in (0..len).step_by(2) {
        let t = i as f32 / len as f32;
        let radius = t * max_radius;
        let angle = f64::from(t) * std::f64::consts::PI * 20.0 + ctx.now / 2000.0;
        let x = cx + angle.cos() as f32 * radius;
        let y = cy + angle.sin() as f32 * radius;
        let size = f32::from(ctx.frame[i]) / 255.0 * 10.0 * k;
        let hue = t * 360.0;
        draw_with_glow(
            surface,
            Shape::Fill(&Path::circle(x, y, size)),
            &Paint::Solid(Color::hsla(hue, 100.0, 60.0, 0.7)),
            glow(ctx, 10.0, Color::hsla(hue, 100.0, 70.0, 0.5)),
        );
    }
}

pub fn spectrum(surface: &mut dyn Surface, ctx: &RenderCtx, smoother: &mut SpectrumSmoother) {
    let bins = ctx.frame.len() / 8;
    smoother.ensure_len(bins);
    if bins == 0 {
        return;
    }
    let h = ctx.h;
    let bar_w = ctx.w / bins as f32;
    let k = ctx.config.sensitivity;

    let history = smoother.update(&ctx.frame[..bins]);
    for (i, &smoothed) in history.iter().enumerate() {
        let x = i as f32 * bar_w;
        let top = h - smoothed * (k / 255.0) * h;
        let mut path = Path::new();
        path.move_to(x, h)
            .line_to(x, top)
            .line_to(x + bar_w - 1.0, top)
            .line_to(x + bar_w - 1.0, h);
        let hue = i as f32 / bins as f32 * 270.0;
        draw_with_glow(
            surface,
            Shape::Fill(&path),
            &Paint::Solid(Color::hsla(hue, 100.0, 50.0, 0.8)),
            glow(ctx, 15.0, Color::hsla(hue, 100.0, 50.0, 0.5)),
        );
    }
}

pub fn radial_bars(surface: &mut dyn Surface, ctx: &RenderCtx) {
    let (cx, cy) = (ctx.w / 2.0, ctx.h / 2.0);
    let max_radius = ctx.w.min(ctx.h) / 2.0 * 0.8;
    let inner = max_radius / 4.0;
    surface.stroke_path(
        &Path::circle(cx, cy, inner),
        &Paint::Solid(Color::rgba8(255, 255, 255, 0.1)),
        2.0,
    );

    let len = ctx.frame.len();
    if len == 0 {
        return;
    }
    let k = ctx.config.sensitivity;
    let half = len as f32 / 2.0;
    for i in 0..RADIAL_BARS {
        let t = i as f32 / RADIAL_BARS as f32;
        let idx = (t * half).floor() as usize;
        let length = f32::from(sample_at(ctx.frame, idx)) * (k / 255.0) * max_radius * 0.7;
        let angle = t * TAU;
        let (sin, cos) = angle.sin_cos();
        let bar = Path::segment(
            cx + cos * inner,
            cy + sin * inner,
            cx + cos * (inner + length),
            cy + sin * (inner + length),
        );
        let hue = t * 360.0;
        draw_with_glow(
            surface,
            Shape::Stroke(&bar, 2.0),
            &Paint::Solid(Color::hsla(hue, 100.0, 50.0, 0.8)),
            glow(ctx, 8.0, Color::hsla(hue, 100.0, 70.0, 0.6)),
        );
    }
}
