use std::f32::consts::{PI, TAU};

pub const PARTICLE_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed: f32,
    /// Heading in radians.
    pub angle: f32,
    pub hue_seed: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn ensure_initialized(&mut self, width: f32, height: f32, rng: &mut fastrand::Rng) -> bool {
        if !self.particles.is_empty() {
            return false;
        }
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.f32() * width,
                y: rng.f32() * height,
                size: rng.f32() * 5.0 + 2.0,
                speed: rng.f32() * 2.0 + 1.0,
                angle: rng.f32() * TAU,
                hue_seed: rng.u32(0..360),
            })
            .collect();
        log::debug!("particle system initialised at {width}x{height}");
        true
    }

    /// Advances every particle and reflects it off the canvas edges.
    /// Positions stay within `[0, width] x [0, height]`.
    pub fn step(&mut self, intensity: f32, width: f32, height: f32) {
        for p in &mut self.particles {
            p.x += p.angle.cos() * p.speed * intensity * 3.0;
            p.y += p.angle.sin() * p.speed * intensity * 3.0;

            if p.x < 0.0 || p.x > width {
                p.angle = PI - p.angle;
                p.x = p.x.clamp(0.0, width.max(0.0));
            }
            if p.y < 0.0 || p.y > height {
                p.angle = -p.angle;
                p.y = p.y.clamp(0.0, height.max(0.0));
            }
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
    }
}

/// Mean sample scaled by sensitivity, normalised to `[0, 1]`.
pub fn intensity(frame: &[u8], sensitivity: f32) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: u64 = frame.iter().map(|&s| u64::from(s)).sum();
    let avg = sum as f32 / frame.len() as f32 * sensitivity;
    (avg / 255.0).clamp(0.0, 1.0)
}

/// Hue in degrees for a particle at `now` milliseconds.
pub fn particle_hue(hue_seed: u32, now: f64) -> f32 {
    ((f64::from(hue_seed) + (now / 50.0).floor()).rem_euclid(360.0)) as f32
}
