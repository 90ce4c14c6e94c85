use crate::color::Color;
use crate::surface::{Paint, Path, Shadow, Surface, SurfaceError};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Resize {
        width: u32,
        height: u32,
    },
    Clear,
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
    },
    FillPath {
        path: Path,
        paint: Paint,
    },
    StrokePath {
        path: Path,
        paint: Paint,
        width: f32,
    },
    SetShadow(Option<Shadow>),
    FillText {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
    },
}

/// Surface that keeps an ordered log of every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    unavailable: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose backing store can never be allocated.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if self.unavailable {
            return Err(SurfaceError::Unavailable { width, height });
        }
        self.width = width;
        self.height = height;
        self.ops.push(DrawOp::Resize { width, height });
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            paint: paint.clone(),
        });
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(DrawOp::FillPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32) {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            paint: paint.clone(),
            width,
        });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.ops.push(DrawOp::SetShadow(shadow));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}
