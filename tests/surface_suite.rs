use sonic_visualizer::color::{Color, ColorParseError};
use sonic_visualizer::surface::{
    GradientStop, Paint, Path, PathCmd, PixelCanvas, Shadow, Surface, SurfaceError,
};

fn canvas(w: u32, h: u32) -> PixelCanvas {
    let mut c = PixelCanvas::new();
    c.resize(w, h).unwrap();
    c
}

fn lit(c: &PixelCanvas, x: u32, y: u32) -> bool {
    c.pixel_rgb(x, y).is_some_and(|p| p.iter().any(|&v| v > 0))
}

// ── Colour parsing ──────────────────────────────────────────────────────────

#[test]
fn parses_picker_formats() {
    assert_eq!(Color::parse("#f00").unwrap(), Color::rgb8(255, 0, 0));
    assert_eq!(Color::parse(" #00FF00 ").unwrap(), Color::rgb8(0, 255, 0));
    assert_eq!(Color::parse("rgb(0, 0, 255)").unwrap(), Color::rgb8(0, 0, 255));
    assert_eq!(Color::parse("rgba(0 0 255 / 50%)").unwrap().a, 0.5);
    assert_eq!(
        Color::parse("hsl(0, 100%, 50%)").unwrap().to_rgba8(),
        [255, 0, 0, 255]
    );
    assert_eq!(Color::parse("Teal").unwrap(), Color::rgb8(0, 128, 128));
    assert_eq!("#80808080".parse::<Color>().unwrap().to_rgba8()[3], 128);
}

#[test]
fn rejects_garbage() {
    assert_eq!(Color::parse("   "), Err(ColorParseError::Empty));
    assert!(matches!(Color::parse("#12"), Err(ColorParseError::InvalidHex(_))));
    assert!(matches!(Color::parse("#gggggg"), Err(ColorParseError::InvalidHex(_))));
    assert!(matches!(
        Color::parse("rgb(1, 2)"),
        Err(ColorParseError::MalformedFunction(_))
    ));
    assert!(matches!(
        Color::parse("hsl(10, 20, 30)"),
        Err(ColorParseError::MalformedFunction(_))
    ));
    assert!(matches!(Color::parse("blurple"), Err(ColorParseError::UnknownName(_))));
}

// ── Paths ───────────────────────────────────────────────────────────────────

#[test]
fn path_builder_records_commands_in_order() {
    let mut p = Path::new();
    assert!(p.is_empty());
    p.move_to(0.0, 0.0).line_to(10.0, 0.0).quad_to(5.0, 5.0, 0.0, 10.0).close();
    assert_eq!(p.commands().len(), 4);
    assert!(matches!(p.commands()[0], PathCmd::MoveTo { .. }));
    assert!(matches!(p.commands()[3], PathCmd::Close));
}

#[test]
fn gradient_stop_offsets_are_clamped() {
    assert_eq!(GradientStop::new(-1.0, Color::BLACK).offset, 0.0);
    assert_eq!(GradientStop::new(2.0, Color::BLACK).offset, 1.0);
}

// ── Raster ──────────────────────────────────────────────────────────────────

#[test]
fn zero_sized_resize_is_a_fault() {
    let mut c = PixelCanvas::new();
    assert_eq!(
        c.resize(0, 10),
        Err(SurfaceError::Unavailable { width: 0, height: 10 })
    );
    // Drawing on a surface that never allocated is a no-op.
    c.fill_rect(0.0, 0.0, 5.0, 5.0, &Paint::Solid(Color::WHITE));
    assert!(c.data().is_empty());
}

#[test]
fn resize_to_same_size_clears() {
    let mut c = canvas(8, 8);
    c.fill_rect(0.0, 0.0, 8.0, 8.0, &Paint::Solid(Color::WHITE));
    assert!(lit(&c, 4, 4));
    c.resize(8, 8).unwrap();
    assert_eq!(c.pixel_alpha(4, 4), Some(0));
}

#[test]
fn solid_rect_covers_its_area() {
    let mut c = canvas(20, 20);
    c.fill_rect(5.0, 5.0, 10.0, 10.0, &Paint::Solid(Color::rgb8(255, 0, 0)));
    assert_eq!(c.pixel_rgb(10, 10), Some([255, 0, 0]));
    assert_eq!(c.pixel_alpha(1, 1), Some(0));
    assert_eq!(c.pixel_rgb(40, 40), None);
}

#[test]
fn negative_rect_extent_flips() {
    let mut c = canvas(20, 20);
    c.fill_rect(15.0, 20.0, -10.0, -10.0, &Paint::Solid(Color::WHITE));
    assert!(lit(&c, 10, 15));
    assert!(!lit(&c, 10, 5));
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let mut c = canvas(4, 100);
    let paint = Paint::vertical(
        100.0,
        vec![
            GradientStop::new(0.0, Color::rgb8(255, 0, 0)),
            GradientStop::new(1.0, Color::rgb8(0, 0, 255)),
        ],
    );
    c.fill_rect(0.0, 0.0, 4.0, 100.0, &paint);
    let top = c.pixel_rgb(2, 1).unwrap();
    let bottom = c.pixel_rgb(2, 98).unwrap();
    assert!(top[0] > 200 && top[2] < 50);
    assert!(bottom[2] > 200 && bottom[0] < 50);
}

#[test]
fn circle_fill_stays_round() {
    let mut c = canvas(40, 40);
    c.fill_path(&Path::circle(20.0, 20.0, 10.0), &Paint::Solid(Color::WHITE));
    assert!(lit(&c, 20, 20));
    assert!(lit(&c, 20, 12));
    assert!(!lit(&c, 11, 11));
    assert!(!lit(&c, 2, 2));
}

#[test]
fn zero_width_stroke_is_skipped() {
    let mut c = canvas(10, 10);
    c.stroke_path(&Path::segment(0.0, 5.0, 10.0, 5.0), &Paint::Solid(Color::WHITE), 0.0);
    assert!(c.data().iter().all(|&b| b == 0));
    c.stroke_path(&Path::segment(0.0, 5.0, 10.0, 5.0), &Paint::Solid(Color::WHITE), 2.0);
    assert!(lit(&c, 5, 5));
}

#[test]
fn shadow_spreads_beyond_the_shape() {
    let shape = Path::circle(30.0, 30.0, 4.0);
    let paint = Paint::Solid(Color::WHITE);

    let mut plain = canvas(60, 60);
    plain.fill_path(&shape, &paint);

    let mut glowing = canvas(60, 60);
    glowing.set_shadow(Some(Shadow::new(12.0, Color::rgb8(0, 255, 0))));
    glowing.fill_path(&shape, &paint);
    glowing.flush();

    assert!(!lit(&plain, 30, 38));
    assert!(lit(&glowing, 30, 38));
    // The crisp shape is still drawn on top.
    assert_eq!(glowing.pixel_rgb(30, 30), Some([255, 255, 255]));

    glowing.set_shadow(None);
    glowing.resize(60, 60).unwrap();
    glowing.fill_path(&shape, &paint);
    assert!(!lit(&glowing, 30, 38));
}

#[test]
fn fps_text_lands_near_its_baseline() {
    let mut c = canvas(80, 30);
    c.fill_text("FPS: 60", 10.0, 20.0, 12.0, Color::WHITE);
    let mut lit_rows = (0..30).filter(|&y| (0..80).any(|x| lit(&c, x, y)));
    let first = lit_rows.next().unwrap();
    assert!(first >= 8 && first < 20, "first lit row {first}");
    assert!(!lit(&c, 5, 15));
}

#[test]
fn shadowed_draws_share_one_blur() {
    let mut c = canvas(200, 200);
    let glow = Shadow::new(10.0, Color::rgb8(255, 0, 255));
    for i in 0..180 {
        let x = 5.0 + i as f32;
        c.stroke_path(&Path::segment(x, 10.0, x, 190.0), &Paint::Solid(Color::WHITE), 1.0);
        c.set_shadow(Some(glow));
        c.stroke_path(&Path::segment(x, 10.0, x, 190.0), &Paint::Solid(Color::WHITE), 1.0);
        c.set_shadow(None);
    }
    assert_eq!(c.blurred_layers(), 0);
    c.flush();
    assert_eq!(c.blurred_layers(), 1);
    assert!(lit(&c, 100, 100));

    // A different radius starts a second batch.
    c.set_shadow(Some(glow));
    c.fill_path(&Path::circle(50.0, 50.0, 5.0), &Paint::Solid(Color::WHITE));
    c.set_shadow(Some(Shadow::new(20.0, Color::WHITE)));
    c.fill_path(&Path::circle(150.0, 150.0, 5.0), &Paint::Solid(Color::WHITE));
    c.flush();
    assert_eq!(c.blurred_layers(), 3);

    c.clear();
    assert_eq!(c.blurred_layers(), 0);
}

#[test]
fn shapes_drawn_during_a_glow_batch_stay_on_top() {
    let mut c = canvas(60, 60);
    c.set_shadow(Some(Shadow::new(16.0, Color::rgb8(0, 0, 255))));
    c.fill_rect(10.0, 10.0, 10.0, 10.0, &Paint::Solid(Color::rgb8(255, 0, 0)));
    c.set_shadow(None);
    c.fill_rect(22.0, 10.0, 10.0, 10.0, &Paint::Solid(Color::rgb8(0, 255, 0)));
    c.flush();
    assert_eq!(c.pixel_rgb(15, 15), Some([255, 0, 0]));
    assert_eq!(c.pixel_rgb(27, 15), Some([0, 255, 0]));
}

#[test]
fn text_composites_pending_glow_first() {
    let mut c = canvas(80, 30);
    c.set_shadow(Some(Shadow::new(10.0, Color::WHITE)));
    c.fill_rect(40.0, 5.0, 10.0, 10.0, &Paint::Solid(Color::WHITE));
    c.fill_text("FPS: 60", 10.0, 20.0, 12.0, Color::WHITE);
    assert_eq!(c.blurred_layers(), 1);
    assert!(lit(&c, 45, 10));
}

