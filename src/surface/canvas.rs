use tiny_skia::{
    FillRule, FilterQuality, IntRect, LinearGradient, PathBuilder, Pixmap, PixmapPaint, Point,
    RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

use crate::color::Color;
use crate::surface::{flatten_arc, Paint, Path, PathCmd, Shadow, Surface, SurfaceError};

const SHADOW_PASSES: usize = 3;

/// Shadow layers with a box radius at least this large are blurred at half resolution.
const DOWNSAMPLE_MIN_RADIUS: usize = 4;

#[derive(Clone, Copy)]
enum Mode {
    Fill,
    Stroke(f32),
}

/// Off-screen layers a glow batch draws into until it is composited.
struct GlowLayers {
    shadow: Pixmap,
    content: Pixmap,
}

impl GlowLayers {
    fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            shadow: Pixmap::new(width, height)?,
            content: Pixmap::new(width, height)?,
        })
    }

    fn matches(&self, width: u32, height: u32) -> bool {
        self.shadow.width() == width && self.shadow.height() == height
    }

    fn reset(&mut self) {
        self.shadow.fill(tiny_skia::Color::TRANSPARENT);
        self.content.fill(tiny_skia::Color::TRANSPARENT);
    }
}

/// Shadowed draws sharing one blur radius. Silhouettes accumulate in the
/// shadow layer and shapes in the content layer; both are composited at once.
#[derive(Clone, Copy)]
struct GlowBatch {
    radius: usize,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl GlowBatch {
    fn include(&mut self, left: i32, top: i32, right: i32, bottom: i32) {
        self.left = self.left.min(left);
        self.top = self.top.min(top);
        self.right = self.right.max(right);
        self.bottom = self.bottom.max(bottom);
    }
}

/// Software raster surface backed by a `tiny_skia::Pixmap`.
///
/// Shadowed draws are deferred. Silhouettes sharing a blur radius are blurred
/// together once and composited under their shapes on `Surface::flush`, before
/// text, or when the radius changes.
#[derive(Default)]
pub struct PixelCanvas {
    pixmap: Option<Pixmap>,
    shadow: Option<Shadow>,
    layers: Option<GlowLayers>,
    batch: Option<GlowBatch>,
    blurred_layers: usize,
}

impl PixelCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::width)
    }

    pub fn height(&self) -> u32 {
        self.pixmap.as_ref().map_or(0, Pixmap::height)
    }

    /// Premultiplied RGBA bytes, which read as the image composited over black.
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map_or(&[], Pixmap::data)
    }

    /// Colour of one pixel composited over black, or `None` outside the canvas.
    pub fn pixel_rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let pixmap = self.pixmap.as_ref()?;
        let p = pixmap.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue()])
    }

    pub fn pixel_alpha(&self, x: u32, y: u32) -> Option<u8> {
        Some(self.pixmap.as_ref()?.pixel(x, y)?.alpha())
    }

    /// Shadow layers blurred since the last clear or resize.
    pub fn blurred_layers(&self) -> usize {
        self.blurred_layers
    }

    fn draw(&mut self, path: &tiny_skia::Path, paint: &Paint, mode: Mode) {
        if self.pixmap.is_none() {
            return;
        }
        if let Some(shadow) = self.shadow.filter(|s| s.blur > 0.0 && s.color.a > 0.0) {
            self.cast_shadow(path, paint.shadow_alpha(), shadow, mode);
        }
        let Some(skia_paint) = to_skia_paint(paint) else {
            return;
        };
        let target = if self.batch.is_some() {
            self.layers.as_mut().map(|l| &mut l.content)
        } else {
            self.pixmap.as_mut()
        };
        if let Some(target) = target {
            paint_path(target, path, &skia_paint, mode);
        }
    }

    fn cast_shadow(&mut self, path: &tiny_skia::Path, alpha: f32, shadow: Shadow, mode: Mode) {
        let radius = box_radius(shadow.blur / 2.0);
        if self.batch.is_some_and(|b| b.radius != radius) {
            self.flush_glow();
        }
        let (width, height) = (self.width(), self.height());
        if !self.layers.as_ref().is_some_and(|l| l.matches(width, height)) {
            self.layers = GlowLayers::new(width, height);
        }
        let Some(layers) = self.layers.as_mut() else {
            return;
        };

        let stroke_pad = match mode {
            Mode::Fill => 0.0,
            Mode::Stroke(w) => w / 2.0,
        };
        let pad = (radius * SHADOW_PASSES) as f32 + stroke_pad + 1.0;
        let bounds = path.bounds();
        let left = ((bounds.left() - pad).floor() as i32).max(0);
        let top = ((bounds.top() - pad).floor() as i32).max(0);
        let right = ((bounds.right() + pad).ceil() as i32).min(width as i32);
        let bottom = ((bounds.bottom() + pad).ceil() as i32).min(height as i32);
        if right <= left || bottom <= top {
            return;
        }
        self.batch
            .get_or_insert(GlowBatch {
                radius,
                left,
                top,
                right,
                bottom,
            })
            .include(left, top, right, bottom);

        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia_color(shadow.color.with_alpha(shadow.color.a * alpha)));
        paint.anti_alias = true;
        paint_path(&mut layers.shadow, path, &paint, mode);
    }

    /// Blurs the pending shadow layer once and composites it, then the shapes
    /// drawn while it was open.
    fn flush_glow(&mut self) {
        let Some(batch) = self.batch.take() else {
            return;
        };
        let (Some(target), Some(layers)) = (self.pixmap.as_mut(), self.layers.as_mut()) else {
            return;
        };
        let region = IntRect::from_ltrb(batch.left, batch.top, batch.right, batch.bottom)
            .and_then(|rect| layers.shadow.clone_rect(rect));
        if let Some(region) = region {
            composite_blurred(target, region, batch.left, batch.top, batch.radius);
            self.blurred_layers += 1;
        }
        target.draw_pixmap(
            0,
            0,
            layers.content.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        layers.reset();
    }

    /// Drops an open batch without compositing it.
    fn discard_glow(&mut self) {
        if self.batch.take().is_some() {
            if let Some(layers) = self.layers.as_mut() {
                layers.reset();
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if self.width() == width && self.height() == height && self.pixmap.is_some() {
            self.clear();
            return Ok(());
        }
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::Unavailable { width, height })?;
        self.pixmap = Some(pixmap);
        self.layers = None;
        self.batch = None;
        self.blurred_layers = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.discard_glow();
        self.blurred_layers = 0;
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: &Paint) {
        // Negative extents flip around the origin like canvas fillRect.
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 { (y + height, -height) } else { (y, height) };
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        self.draw(&path, paint, Mode::Fill);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        if let Some(path) = to_skia_path(path) {
            self.draw(&path, paint, Mode::Fill);
        }
    }

    fn stroke_path(&mut self, path: &Path, paint: &Paint, width: f32) {
        if !(width > 0.0) {
            return;
        }
        if let Some(path) = to_skia_path(path) {
            self.draw(&path, paint, Mode::Stroke(width));
        }
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.shadow = shadow;
    }

    fn flush(&mut self) {
        self.flush_glow();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        self.flush_glow();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(to_skia_color(color));
        paint.anti_alias = false;

        let scale = (size / 6.0).round().max(1.0);
        let top = y - 5.0 * scale;
        let mut cursor = x;
        for ch in text.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..3u8 {
                    if bits & (0b100 >> col) == 0 {
                        continue;
                    }
                    let px = cursor + f32::from(col) * scale;
                    let py = top + row as f32 * scale;
                    if let Some(rect) = Rect::from_xywh(px, py, scale, scale) {
                        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                    }
                }
            }
            cursor += 4.0 * scale;
        }
    }
}

fn to_skia_color(c: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn to_skia_stops(stops: &[crate::surface::GradientStop]) -> Vec<tiny_skia::GradientStop> {
    stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset, to_skia_color(s.color)))
        .collect()
}

fn to_skia_paint(paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
    let shader = match paint {
        Paint::Solid(c) => Shader::SolidColor(to_skia_color(*c)),
        Paint::Linear {
            x0,
            y0,
            x1,
            y1,
            stops,
        } => LinearGradient::new(
            Point::from_xy(*x0, *y0),
            Point::from_xy(*x1, *y1),
            to_skia_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        )?,
        Paint::Radial {
            cx,
            cy,
            radius,
            stops,
        } => RadialGradient::new(
            Point::from_xy(*cx, *cy),
            Point::from_xy(*cx, *cy),
            *radius,
            to_skia_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        )?,
    };
    Some(tiny_skia::Paint {
        shader,
        anti_alias: true,
        ..tiny_skia::Paint::default()
    })
}

fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    let mut has_current = false;
    for cmd in path.commands() {
        match *cmd {
            PathCmd::MoveTo { x, y } => {
                pb.move_to(x, y);
                has_current = true;
            }
            PathCmd::LineTo { x, y } => {
                if has_current {
                    pb.line_to(x, y);
                } else {
                    pb.move_to(x, y);
                    has_current = true;
                }
            }
            PathCmd::QuadTo { cx, cy, x, y } => {
                if !has_current {
                    pb.move_to(cx, cy);
                    has_current = true;
                }
                pb.quad_to(cx, cy, x, y);
            }
            PathCmd::Arc {
                cx,
                cy,
                radius,
                start,
                end,
                anticlockwise,
            } => {
                for (i, (px, py)) in flatten_arc(cx, cy, radius, start, end, anticlockwise)
                    .into_iter()
                    .enumerate()
                {
                    if i == 0 && !has_current {
                        pb.move_to(px, py);
                    } else {
                        pb.line_to(px, py);
                    }
                }
                has_current = true;
            }
            PathCmd::Close => pb.close(),
        }
    }
    pb.finish()
}

/// Box radius whose three-pass repetition approximates a gaussian of `sigma`.
fn box_radius(sigma: f32) -> usize {
    let ideal = (12.0 * sigma * sigma / SHADOW_PASSES as f32 + 1.0).sqrt();
    ((ideal - 1.0) / 2.0).round().max(1.0) as usize
}

fn paint_path(target: &mut Pixmap, path: &tiny_skia::Path, paint: &tiny_skia::Paint, mode: Mode) {
    match mode {
        Mode::Fill => {
            target.fill_path(path, paint, FillRule::Winding, Transform::identity(), None);
        }
        Mode::Stroke(width) => {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            target.stroke_path(path, paint, &stroke, Transform::identity(), None);
        }
    }
}

/// Blurs `layer` and draws it onto `target` with its top-left at `(left, top)`.
/// Wide radii are blurred on a half-size copy and scaled back up.
fn composite_blurred(target: &mut Pixmap, mut layer: Pixmap, left: i32, top: i32, radius: usize) {
    let bilinear = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    if radius >= DOWNSAMPLE_MIN_RADIUS {
        let Some(mut half) = Pixmap::new(layer.width().div_ceil(2), layer.height().div_ceil(2)) else {
            return;
        };
        half.draw_pixmap(0, 0, layer.as_ref(), &bilinear, Transform::from_scale(0.5, 0.5), None);
        let (w, h) = (half.width() as usize, half.height() as usize);
        box_blur(half.data_mut(), w, h, radius.div_ceil(2));
        let place = Transform::from_scale(2.0, 2.0).post_translate(left as f32, top as f32);
        target.draw_pixmap(0, 0, half.as_ref(), &bilinear, place, None);
    } else {
        let (w, h) = (layer.width() as usize, layer.height() as usize);
        box_blur(layer.data_mut(), w, h, radius);
        target.draw_pixmap(left, top, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
}

/// Repeated separable box blur over premultiplied RGBA; outside pixels count as transparent.
fn box_blur(data: &mut [u8], w: usize, h: usize, radius: usize) {
    let mut scratch = vec![0u8; data.len()];
    for _ in 0..SHADOW_PASSES {
        blur_pass(data, &mut scratch, w, h, radius, true);
        blur_pass(&scratch, data, w, h, radius, false);
    }
}

fn blur_pass(src: &[u8], dst: &mut [u8], w: usize, h: usize, radius: usize, horizontal: bool) {
    let (lines, len) = if horizontal { (h, w) } else { (w, h) };
    if len == 0 {
        return;
    }
    let at = |line: usize, i: usize| {
        if horizontal {
            (line * w + i) * 4
        } else {
            (i * w + line) * 4
        }
    };
    let window = (2 * radius + 1) as u32;
    for line in 0..lines {
        for ch in 0..4 {
            let mut acc: u32 = (0..=radius.min(len - 1))
                .map(|i| u32::from(src[at(line, i) + ch]))
                .sum();
            for i in 0..len {
                dst[at(line, i) + ch] = (acc / window) as u8;
                let incoming = i + radius + 1;
                if incoming < len {
                    acc += u32::from(src[at(line, incoming) + ch]);
                }
                if i >= radius {
                    acc -= u32::from(src[at(line, i - radius) + ch]);
                }
            }
        }
    }
}

fn glyph(ch: char) -> [u8; 5] {
    match ch.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ' ' => [0b000; 5],
        _ => [0b111, 0b101, 0b101, 0b101, 0b111],
    }
}
