use sonic_visualizer::color::Color;
use sonic_visualizer::settings::{
    BackgroundStyle, BackgroundTheme, BarStyle, ColorTheme, RenderConfig, VisualizationType,
};
use sonic_visualizer::surface::{DrawOp, Paint, PixelCanvas, RecordingSurface, Surface};
use sonic_visualizer::theme::{theme_gradient, theme_stops, theme_stops_by_name};
use sonic_visualizer::visual::algorithms::{bar_height, BLOCK_HEIGHT};
use sonic_visualizer::visual::{self, fps_label, RenderCtx, RenderState, STAR_COUNT};

fn config(visualization: VisualizationType) -> RenderConfig {
    RenderConfig {
        visualization,
        ..RenderConfig::default()
    }
}

fn draw(
    surface: &mut dyn Surface,
    state: &mut RenderState,
    frame: &[u8],
    (w, h): (f32, f32),
    now: f64,
    config: &RenderConfig,
) {
    let ctx = RenderCtx {
        frame,
        w,
        h,
        now,
        config,
        fps: 60.0,
    };
    visual::render(surface, &ctx, state);
}

fn record(frame: &[u8], size: (f32, f32), now: f64, config: &RenderConfig) -> Vec<DrawOp> {
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(7);
    draw(&mut surface, &mut state, frame, size, now, config);
    surface.take_ops()
}

fn shadow_toggles(ops: &[DrawOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, DrawOp::SetShadow(_)))
        .count()
}

// ── Draw order ──────────────────────────────────────────────────────────────

#[test]
fn clear_background_visualization_then_fps() {
    let cfg = RenderConfig {
        show_fps: true,
        ..config(VisualizationType::Bars)
    };
    let ops = record(&[128; 64], (320.0, 200.0), 0.0, &cfg);

    assert_eq!(ops[0], DrawOp::Clear);
    match &ops[1] {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            ..
        } => assert_eq!((*x, *y, *width, *height), (0.0, 0.0, 320.0, 200.0)),
        other => panic!("expected background fill, got {other:?}"),
    }
    match ops.last() {
        Some(DrawOp::FillText { text, x, y, .. }) => {
            assert_eq!(text, "FPS: 60");
            assert_eq!((*x, *y), (10.0, 20.0));
        }
        other => panic!("expected fps text last, got {other:?}"),
    }
    // 16 columns of bars between background and text.
    assert_eq!(ops.len(), 2 + 16 + 1);
}

#[test]
fn fps_hidden_by_default() {
    let ops = record(&[128; 64], (320.0, 200.0), 0.0, &config(VisualizationType::Wave));
    assert!(!ops.iter().any(|op| matches!(op, DrawOp::FillText { .. })));
}

#[test]
fn fps_label_rounds() {
    assert_eq!(fps_label(59.6), "FPS: 60");
    assert_eq!(fps_label(0.0), "FPS: 0");
}

#[test]
fn degenerate_size_draws_nothing() {
    assert!(record(&[255; 32], (0.0, 100.0), 0.0, &RenderConfig::default()).is_empty());
    assert!(record(&[255; 32], (100.0, 0.0), 0.0, &RenderConfig::default()).is_empty());
}

#[test]
fn loud_bars_overshoot_the_canvas() {
    let cfg = RenderConfig {
        sensitivity: 1.5,
        ..config(VisualizationType::Bars)
    };
    let ops = record(&[200; 1024], (800.0, 500.0), 0.0, &cfg);
    let bars: Vec<(f32, f32)> = ops[2..]
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { y, height, .. } => Some((*y, *height)),
            _ => None,
        })
        .collect();
    assert_eq!(bars.len(), 256);
    for (y, height) in bars {
        assert!((height - 588.235).abs() < 1e-2, "height {height}");
        assert!((y - (500.0 - height)).abs() < 1e-3);
    }
}

// ── Robustness ──────────────────────────────────────────────────────────────

#[test]
fn every_combination_renders_on_both_surfaces() {
    let frames: [Vec<u8>; 3] = [Vec::new(), vec![200], (0..1024).map(|i| (i % 256) as u8).collect()];
    for viz in VisualizationType::all() {
        for bg in BackgroundStyle::all() {
            for frame in &frames {
                let cfg = RenderConfig {
                    visualization: viz,
                    background_style: bg,
                    show_fps: true,
                    ..RenderConfig::default()
                };

                let mut rec = RecordingSurface::new();
                let mut state = RenderState::with_seed(1);
                draw(&mut rec, &mut state, frame, (96.0, 64.0), 1234.0, &cfg);
                assert_eq!(rec.ops()[0], DrawOp::Clear, "{viz:?}/{bg:?}/{}", frame.len());

                let mut canvas = PixelCanvas::new();
                canvas.resize(96, 64).unwrap();
                let mut state = RenderState::with_seed(1);
                draw(&mut canvas, &mut state, frame, (96.0, 64.0), 1234.0, &cfg);
            }
        }
    }
}

#[test]
fn empty_frame_draws_background_only() {
    for viz in VisualizationType::all() {
        let ops = record(&[], (100.0, 100.0), 0.0, &config(viz));
        let expected = if viz == VisualizationType::RadialBars { 3 } else { 2 };
        assert_eq!(ops.len(), expected, "{viz:?}");
    }
}

// ── Bars ────────────────────────────────────────────────────────────────────

#[test]
fn bar_height_is_linear_in_sensitivity() {
    assert_eq!(bar_height(0, 1.5, 500.0), 0.0);
    assert!((bar_height(255, 1.0, 500.0) - 500.0).abs() < 1e-3);
    // Overshoots the canvas; heights are never clamped.
    assert!((bar_height(200, 1.5, 500.0) - 588.235).abs() < 0.01);
}

#[test]
fn normal_bars_use_theme_gradient() {
    let cfg = RenderConfig {
        sensitivity: 1.0,
        color_theme: ColorTheme::Fire,
        ..config(VisualizationType::Bars)
    };
    let ops = record(&[255; 8], (100.0, 100.0), 0.0, &cfg);
    let bars: Vec<_> = ops[2..].to_vec();
    assert_eq!(bars.len(), 2);
    for (i, op) in bars.iter().enumerate() {
        match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                paint,
            } => {
                assert!((*x - i as f32 * 50.0).abs() < 1e-4);
                assert!(y.abs() < 1e-3);
                assert_eq!(*width, 49.0);
                assert!((*height - 100.0).abs() < 1e-3);
                assert_eq!(*paint, theme_gradient(ColorTheme::Fire, 100.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn block_bars_stack_fixed_cells() {
    let cfg = RenderConfig {
        sensitivity: 1.0,
        bar_style: BarStyle::Blocks,
        ..config(VisualizationType::Bars)
    };
    let ops = record(&[255; 4], (40.0, 100.0), 0.0, &cfg);
    let blocks = (bar_height(255, 1.0, 100.0) / BLOCK_HEIGHT).floor() as usize;
    assert!(blocks >= 19);
    assert_eq!(ops.len() - 2, blocks);
    assert!(ops[2..].iter().all(|op| matches!(
        op,
        DrawOp::FillRect { height, .. } if *height == BLOCK_HEIGHT - 1.0
    )));
}

#[test]
fn curve_bars_are_paths() {
    let cfg = RenderConfig {
        bar_style: BarStyle::Curve,
        ..config(VisualizationType::Bars)
    };
    let ops = record(&[90; 16], (40.0, 100.0), 0.0, &cfg);
    assert_eq!(ops.len(), 2 + 4);
    assert!(ops[2..].iter().all(|op| matches!(op, DrawOp::FillPath { .. })));
}

// ── Glow ────────────────────────────────────────────────────────────────────

#[test]
fn glow_adds_a_shadowed_second_pass() {
    let frame = vec![180u8; 64];
    let on = record(&frame, (200.0, 100.0), 0.0, &config(VisualizationType::Spiral));
    let off = record(
        &frame,
        (200.0, 100.0),
        0.0,
        &RenderConfig {
            glow_effects: false,
            ..config(VisualizationType::Spiral)
        },
    );
    // 32 dots: crisp + shadowed draw each, shadow set and cleared around the second.
    assert_eq!(off.len(), 2 + 32);
    assert_eq!(shadow_toggles(&off), 0);
    assert_eq!(on.len(), 2 + 32 * 4);
    assert_eq!(shadow_toggles(&on), 64);
    assert_eq!(on.last(), Some(&DrawOp::SetShadow(None)));
}

#[test]
fn circle_guides_and_core_never_glow() {
    let frame = vec![100u8; 64];
    let ops = record(&frame, (200.0, 200.0), 0.0, &config(VisualizationType::Circle));
    let strokes_without_shadow = ops[2..5]
        .iter()
        .all(|op| matches!(op, DrawOp::StrokePath { .. }));
    assert!(strokes_without_shadow);
    assert!(matches!(
        ops.last(),
        Some(DrawOp::FillPath {
            paint: Paint::Radial { .. },
            ..
        })
    ));
}

// ── Background ──────────────────────────────────────────────────────────────

#[test]
fn starfield_places_one_hundred_stars_once() {
    let cfg = RenderConfig {
        background_style: BackgroundStyle::Starfield,
        ..config(VisualizationType::Terrain)
    };
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(3);
    draw(&mut surface, &mut state, &[], (100.0, 80.0), 0.0, &cfg);
    assert_eq!(state.stars().len(), STAR_COUNT);

    let ops = surface.take_ops();
    let stars = ops
        .iter()
        .filter(|op| matches!(op, DrawOp::FillPath { .. }))
        .count();
    assert_eq!(stars, STAR_COUNT);

    let before = state.stars().stars().to_vec();
    draw(&mut surface, &mut state, &[], (100.0, 80.0), 500.0, &cfg);
    assert_eq!(state.stars().stars(), &before[..]);
}

#[test]
fn stars_keep_their_positions_after_resize() {
    let cfg = RenderConfig {
        background_style: BackgroundStyle::Starfield,
        ..RenderConfig::default()
    };
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(11);
    draw(&mut surface, &mut state, &[], (100.0, 100.0), 0.0, &cfg);
    draw(&mut surface, &mut state, &[], (1000.0, 1000.0), 16.0, &cfg);
    assert!(state
        .stars()
        .stars()
        .iter()
        .all(|s| s.x <= 100.0 && s.y <= 100.0));
}

#[test]
fn star_attributes_stay_in_range() {
    let cfg = RenderConfig {
        background_style: BackgroundStyle::Starfield,
        ..RenderConfig::default()
    };
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(5);
    draw(&mut surface, &mut state, &[], (640.0, 480.0), 0.0, &cfg);
    for s in state.stars().stars() {
        assert!((0.5..2.5).contains(&s.size));
        assert!((0.5..1.0).contains(&s.brightness));
    }
}

#[test]
fn invalid_custom_colour_falls_back_to_dark_grey() {
    let bad = RenderConfig {
        background_style: BackgroundStyle::Custom,
        custom_bg_color: "definitely-not-a-colour".into(),
        ..RenderConfig::default()
    };
    let ops = record(&[], (10.0, 10.0), 0.0, &bad);
    assert!(matches!(
        &ops[1],
        DrawOp::FillRect { paint: Paint::Solid(c), .. } if *c == Color::rgb8(0x12, 0x12, 0x12)
    ));

    let good = RenderConfig {
        custom_bg_color: "#ff0000".into(),
        ..bad
    };
    let ops = record(&[], (10.0, 10.0), 0.0, &good);
    assert!(matches!(
        &ops[1],
        DrawOp::FillRect { paint: Paint::Solid(c), .. } if *c == Color::rgb8(255, 0, 0)
    ));
}

#[test]
fn solid_background_follows_theme() {
    let cfg = RenderConfig {
        background_style: BackgroundStyle::Solid,
        background_theme: BackgroundTheme::Light,
        ..RenderConfig::default()
    };
    let ops = record(&[], (10.0, 10.0), 0.0, &cfg);
    assert!(matches!(
        &ops[1],
        DrawOp::FillRect { paint: Paint::Solid(c), .. } if *c == Color::rgb8(0xf0, 0xf0, 0xf0)
    ));
}

// ── Themes and enum fallbacks ───────────────────────────────────────────────

#[test]
fn unknown_theme_name_gets_neon_stops() {
    assert_eq!(theme_stops_by_name("plaid"), theme_stops(ColorTheme::Neon));
    assert_eq!(theme_stops_by_name("FIRE"), theme_stops(ColorTheme::Fire));
    assert_eq!(theme_stops(ColorTheme::Cyberpunk).len(), 3);
}

#[test]
fn unknown_enum_names_fall_back_to_defaults() {
    assert_eq!(VisualizationType::from_name("hologram"), VisualizationType::Bars);
    assert_eq!(VisualizationType::from_name("radialBars"), VisualizationType::RadialBars);
    assert_eq!(BarStyle::from_name("zigzag"), BarStyle::Normal);
    assert_eq!(BackgroundStyle::from_name(""), BackgroundStyle::Gradient);
    assert_eq!(BackgroundTheme::from_name("mauve"), BackgroundTheme::Dark);
}

// ── Determinism ─────────────────────────────────────────────────────────────

#[test]
fn stateless_routines_are_repeatable() {
    let frame: Vec<u8> = (0..256).map(|i| (i * 7 % 256) as u8).collect();
    for viz in [
        VisualizationType::Bars,
        VisualizationType::Wave,
        VisualizationType::Circle,
        VisualizationType::Terrain,
        VisualizationType::Spiral,
        VisualizationType::RadialBars,
    ] {
        let cfg = config(viz);
        let a = record(&frame, (300.0, 200.0), 4321.0, &cfg);
        let b = record(&frame, (300.0, 200.0), 4321.0, &cfg);
        assert_eq!(a, b, "{viz:?}");
    }
}

#[test]
fn particles_move_between_ticks() {
    let cfg = config(VisualizationType::Particles);
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(9);
    draw(&mut surface, &mut state, &[200; 64], (300.0, 200.0), 0.0, &cfg);
    let first = state.particles().particles().to_vec();
    draw(&mut surface, &mut state, &[200; 64], (300.0, 200.0), 16.0, &cfg);
    assert_ne!(state.particles().particles(), &first[..]);
}

#[test]
fn spectrum_repeats_diverge_as_history_builds() {
    let cfg = config(VisualizationType::Spectrum);
    let frame = vec![180u8; 256];
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(3);
    draw(&mut surface, &mut state, &frame, (300.0, 200.0), 500.0, &cfg);
    let first = surface.take_ops();
    draw(&mut surface, &mut state, &frame, (300.0, 200.0), 500.0, &cfg);
    let second = surface.take_ops();
    assert_eq!(first.len(), second.len());
    assert_ne!(first, second);
}

#[test]
fn particles_resume_after_a_detour() {
    let frame = vec![200u8; 64];
    let size = (300.0, 200.0);
    let particles = config(VisualizationType::Particles);

    let mut direct = RenderState::with_seed(11);
    let mut surface = RecordingSurface::new();
    draw(&mut surface, &mut direct, &frame, size, 0.0, &particles);
    draw(&mut surface, &mut direct, &frame, size, 32.0, &particles);

    let mut detour = RenderState::with_seed(11);
    draw(&mut surface, &mut detour, &frame, size, 0.0, &particles);
    draw(&mut surface, &mut detour, &frame, size, 16.0, &config(VisualizationType::Bars));
    draw(&mut surface, &mut detour, &frame, size, 32.0, &particles);

    assert_eq!(detour.particles().particles(), direct.particles().particles());
}

#[test]
fn spectrum_history_survives_visualization_switch() {
    let mut surface = RecordingSurface::new();
    let mut state = RenderState::with_seed(2);
    let frame = vec![255u8; 64];
    draw(&mut surface, &mut state, &frame, (100.0, 100.0), 0.0, &config(VisualizationType::Spectrum));
    let smoothed = state.spectrum().history().to_vec();
    assert_eq!(smoothed.len(), 8);

    draw(&mut surface, &mut state, &frame, (100.0, 100.0), 16.0, &config(VisualizationType::Bars));
    assert_eq!(state.spectrum().history(), &smoothed[..]);

    state.reset();
    assert!(state.spectrum().is_empty());
    assert!(state.stars().is_empty());
    assert!(state.particles().is_empty());
}
