//! Drawing-surface abstraction the visualizations paint into.
//!
//! The vocabulary follows the HTML canvas 2D context closely enough that every
//! routine can be expressed as fills and strokes of paths with solid or
//! gradient paint, plus an optional blurred shadow for glow passes.

mod canvas;
mod recorder;

pub use canvas::PixelCanvas;
pub use recorder::{DrawOp, RecordingSurface};

use std::f32::consts::TAU;

use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("drawing surface unavailable at {width}x{height}")]
    Unavailable { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stops: Vec<GradientStop>,
    },
    /// Circle gradient centred on `(cx, cy)` from radius 0 to `radius`.
    Radial {
        cx: f32,
        cy: f32,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Paint {
    /// Top-to-bottom linear gradient over `0..height`.
    pub fn vertical(height: f32, stops: Vec<GradientStop>) -> Self {
        Self::Linear {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: height,
            stops,
        }
    }

    /// Overall opacity used when this paint casts a shadow.
    pub fn shadow_alpha(&self) -> f32 {
        match self {
            Self::Solid(c) => c.a,
            Self::Linear { .. } | Self::Radial { .. } => 1.0,
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Self::Solid(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    pub fn new(blur: f32, color: Color) -> Self {
        Self { blur, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCmd {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    QuadTo {
        cx: f32,
        cy: f32,
        x: f32,
        y: f32,
    },
    /// Canvas `arc()`: joins the current point to the arc start with a line.
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        let mut p = Self::new();
        p.arc(cx, cy, radius, 0.0, TAU, false);
        p
    }

    pub fn segment(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        let mut p = Self::new();
        p.move_to(x1, y1).line_to(x2, y2);
        p
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.cmds.push(PathCmd::MoveTo { x, y });
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.cmds.push(PathCmd::LineTo { x, y });
        self
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.cmds.push(PathCmd::QuadTo { cx, cy, x, y });
        self
    }

    pub fn arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    ) -> &mut Self {
        self.cmds.push(PathCmd::Arc {
            cx,
            cy,
            radius,
            start,
            end,
            anticlockwise,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    pub fn commands(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }
}

pub trait Surface {
    /// Resizes (and implicitly clears) the backing store.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32);
    /// `None` turns shadows off again.
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    /// Composites any deferred drawing. Surfaces that draw immediately have nothing to do.
    fn flush(&mut self) {}
    /// `y` is the text baseline, `size` the nominal font height in pixels.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color);
}

/// Signed sweep of a canvas arc, following the HTML canvas rules.
pub(crate) fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if !anticlockwise {
        if end - start >= TAU {
            TAU
        } else {
            (end - start).rem_euclid(TAU)
        }
    } else if start - end >= TAU {
        -TAU
    } else {
        -(start - end).rem_euclid(TAU)
    }
}

/// Polyline approximation of an arc, first point at `start`.
pub(crate) fn flatten_arc(
    cx: f32,
    cy: f32,
    radius: f32,
    start: f32,
    end: f32,
    anticlockwise: bool,
) -> Vec<(f32, f32)> {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let sweep = arc_sweep(start, end, anticlockwise);
    let segments = ((sweep.abs() * radius.max(1.0) / 3.0).ceil() as usize).clamp(6, 128);
    (0..=segments)
        .map(|i| {
            let a = start + sweep * (i as f32 / segments as f32);
            (cx + a.cos() * radius, cy + a.sin() * radius)
        })
        .collect()
}
