//! Frame scheduler: FPS measurement, surface sizing and the per-tick render.
//!
//! The host owns the clock and calls [`FrameScheduler::tick`] once per
//! animation frame. Persistent visual state lives here and survives
//! `stop`/`start` cycles; only [`FrameScheduler::reset`] clears it.

use std::sync::Arc;

use thiserror::Error;

use crate::settings::RenderConfig;
use crate::surface::{Surface, SurfaceError};
use crate::visual::{self, RenderCtx, RenderState};

/// Lower bound on the elapsed time used for the FPS estimate.
pub const FPS_EPSILON_MS: f64 = 1e-3;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing surface fault: {0}")]
    Surface(#[from] SurfaceError),
}

/// Collaborators polled by the scheduler each tick.
pub trait FrameHost {
    /// Overwrites `out` with the latest frequency frame.
    fn sample_frequencies(&mut self, out: &mut Vec<u8>);
    /// Drawing size in pixels, already resolved for fullscreen.
    fn container_size(&self) -> (u32, u32);
    fn current_config(&self) -> Arc<RenderConfig>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scheduler is stopped.
    Idle,
    /// Zero-sized canvas; nothing was drawn.
    Skipped,
    Rendered { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTiming {
    pub last_frame_ms: f64,
    pub fps: f64,
}

impl FrameTiming {
    pub fn record(&mut self, now: f64) -> f64 {
        let elapsed = (now - self.last_frame_ms).max(FPS_EPSILON_MS);
        self.fps = 1000.0 / elapsed;
        self.last_frame_ms = now;
        self.fps
    }
}

/// Canvas height policy: a fixed height, or the whole viewport in fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSizing {
    pub fixed_height: u32,
    pub fullscreen: bool,
}

impl Default for CanvasSizing {
    fn default() -> Self {
        Self {
            fixed_height: DEFAULT_CANVAS_HEIGHT,
            fullscreen: false,
        }
    }
}

impl CanvasSizing {
    pub fn resolve(&self, container_width: u32, viewport_height: u32) -> (u32, u32) {
        let height = if self.fullscreen {
            viewport_height
        } else {
            self.fixed_height
        };
        (container_width, height)
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }
}

pub struct FrameScheduler {
    running: bool,
    timing: FrameTiming,
    state: RenderState,
    frame: Vec<u8>,
    fault_reported: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::with_state(RenderState::new())
    }

    /// Deterministic star and particle placement.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_state(RenderState::with_seed(seed))
    }

    fn with_state(state: RenderState) -> Self {
        Self {
            running: false,
            timing: FrameTiming::default(),
            state,
            frame: Vec::new(),
            fault_reported: false,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("frame scheduler started");
        }
    }

    /// No draw happens after this returns until `start` is called again.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("frame scheduler stopped");
        }
    }

    /// Tears down and restarts the loop, keeping all visual state.
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Clears stars, particles and spectrum history.
    pub fn reset(&mut self) {
        self.state.reset();
        log::info!("visual state reset");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> f64 {
        self.timing.fps
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Runs one frame at `now` milliseconds.
    pub fn tick<H, S>(&mut self, now: f64, host: &mut H, surface: &mut S) -> Result<TickOutcome, RenderError>
    where
        H: FrameHost + ?Sized,
        S: Surface,
    {
        if !self.running {
            return Ok(TickOutcome::Idle);
        }
        let fps = self.timing.record(now);
        let config = host.current_config();

        let (width, height) = host.container_size();
        if width == 0 || height == 0 {
            return Ok(TickOutcome::Skipped);
        }
        if let Err(err) = surface.resize(width, height) {
            if !self.fault_reported {
                log::error!("{err}; frame dropped");
                self.fault_reported = true;
            }
            return Err(err.into());
        }
        self.fault_reported = false;

        host.sample_frequencies(&mut self.frame);
        let ctx = RenderCtx {
            frame: &self.frame,
            w: width as f32,
            h: height as f32,
            now,
            config: &config,
            fps,
        };
        visual::render(surface, &ctx, &mut self.state);
        Ok(TickOutcome::Rendered { width, height })
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
