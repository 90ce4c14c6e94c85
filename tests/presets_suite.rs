use std::collections::HashSet;

use clap::Parser;
use sonic_visualizer::config::{AudioSource, Config};
use sonic_visualizer::presets::{self, PresetError, PresetGroup};
use sonic_visualizer::settings::{
    BackgroundStyle, BackgroundTheme, BarStyle, ColorTheme, RenderConfig, VisualizationType,
    SENSITIVITY_RANGE,
};

fn parse(args: &[&str]) -> Config {
    let mut argv = vec!["sonic-visualizer"];
    argv.extend_from_slice(args);
    Config::try_parse_from(argv).expect("valid args")
}

// ── Catalog ─────────────────────────────────────────────────────────────────

#[test]
fn catalog_has_four_presets_per_group() {
    assert_eq!(presets::all().len(), 12);
    for group in PresetGroup::all() {
        assert_eq!(presets::group(group).count(), 4, "{}", group.label());
    }
}

#[test]
fn keys_and_names_are_unique() {
    let keys: HashSet<_> = presets::all().iter().map(|p| p.key).collect();
    let names: HashSet<_> = presets::all().iter().map(|p| p.name).collect();
    assert_eq!(keys.len(), 12);
    assert_eq!(names.len(), 12);
}

#[test]
fn sensitivities_fit_the_slider() {
    let (lo, hi) = SENSITIVITY_RANGE;
    for p in presets::all() {
        assert!((lo..=hi).contains(&p.sensitivity), "{}", p.key);
        assert!(!p.description.is_empty());
    }
}

#[test]
fn only_art_gallery_disables_glow() {
    let dimmed: Vec<_> = presets::all()
        .iter()
        .filter(|p| !p.glow_effects)
        .map(|p| p.key)
        .collect();
    assert_eq!(dimmed, ["artGallery"]);
}

// ── Lookup ──────────────────────────────────────────────────────────────────

#[test]
fn find_accepts_keys_names_and_loose_spelling() {
    assert_eq!(presets::find("club").unwrap().name, "Club DJ");
    assert_eq!(presets::find("Live Concert").unwrap().key, "concert");
    assert_eq!(presets::find("product-launch").unwrap().key, "productLaunch");
    assert_eq!(presets::find("  EDM festival ").unwrap().key, "edm");
    assert_eq!(presets::find("Bar/Pub").unwrap().key, "bar");
}

#[test]
fn find_rejects_unknown_names() {
    assert_eq!(
        presets::find("rave cave"),
        Err(PresetError::Unknown("rave cave".into()))
    );
}

#[test]
fn index_of_matches_catalog_order() {
    assert_eq!(presets::index_of("club"), Some(0));
    assert_eq!(presets::index_of("artGallery"), Some(11));
    assert_eq!(presets::index_of("Club DJ"), None);
}

// ── Apply ───────────────────────────────────────────────────────────────────

#[test]
fn apply_copies_every_preset_field() {
    let mut cfg = RenderConfig::default();
    presets::find("hiphop").unwrap().apply(&mut cfg);
    assert_eq!(cfg.visualization, VisualizationType::Spectrum);
    assert_eq!(cfg.color_theme, ColorTheme::Fire);
    assert_eq!(cfg.background_style, BackgroundStyle::Solid);
    assert_eq!(cfg.background_theme, BackgroundTheme::Dark);
    assert_eq!(cfg.sensitivity, 1.8);
    assert!(cfg.glow_effects);
}

#[test]
fn apply_leaves_bar_style_fps_and_custom_colour_alone() {
    let mut cfg = RenderConfig {
        bar_style: BarStyle::Curve,
        show_fps: true,
        custom_bg_color: "#336699".into(),
        ..RenderConfig::default()
    };
    presets::find("edm").unwrap().apply(&mut cfg);
    assert_eq!(cfg.bar_style, BarStyle::Curve);
    assert!(cfg.show_fps);
    assert_eq!(cfg.custom_bg_color, "#336699");

    presets::find("bar").unwrap().apply(&mut cfg);
    assert_eq!(cfg.bar_style, BarStyle::Blocks);
}

#[test]
fn default_settings_match_the_initial_state() {
    let cfg = presets::default_settings();
    assert_eq!(cfg.visualization, VisualizationType::Bars);
    assert_eq!(cfg.color_theme, ColorTheme::Neon);
    assert_eq!(cfg.sensitivity, 1.5);
    assert_eq!(cfg.background_style, BackgroundStyle::Gradient);
    assert_eq!(cfg.custom_bg_color, "#121212");
    assert!(cfg.glow_effects);
    assert!(!cfg.show_fps);
}

// ── Command line ────────────────────────────────────────────────────────────

#[test]
fn flags_override_the_preset() {
    let cfg = parse(&["--preset", "club", "--theme", "fire", "--glow", "false"]);
    let rc = cfg.render_config().unwrap();
    assert_eq!(rc.visualization, VisualizationType::Bars);
    assert_eq!(rc.background_style, BackgroundStyle::Starfield);
    assert_eq!(rc.color_theme, ColorTheme::Fire);
    assert!(!rc.glow_effects);
}

#[test]
fn unknown_preset_is_an_error() {
    let cfg = parse(&["--preset", "polka"]);
    assert!(matches!(cfg.render_config(), Err(PresetError::Unknown(_))));
}

#[test]
fn defaults_without_flags() {
    let cfg = parse(&[]);
    assert_eq!(cfg.source, AudioSource::Synth);
    assert_eq!(cfg.fps, 60);
    assert_eq!(cfg.render_config().unwrap(), RenderConfig::default());
    let sizing = cfg.canvas_sizing();
    assert_eq!(sizing.fixed_height, 500);
    assert!(!sizing.fullscreen);
}

#[test]
fn enum_flags_accept_kebab_case() {
    let cfg = parse(&[
        "--visualization",
        "radial-bars",
        "--background",
        "custom",
        "--custom-bg",
        "rgb(10, 20, 30)",
        "--show-fps",
    ]);
    let rc = cfg.render_config().unwrap();
    assert_eq!(rc.visualization, VisualizationType::RadialBars);
    assert_eq!(rc.background_style, BackgroundStyle::Custom);
    assert_eq!(rc.custom_bg_color, "rgb(10, 20, 30)");
    assert!(rc.show_fps);
}

#[test]
fn fft_size_flag_reaches_the_analyser() {
    let cfg = parse(&["--fft-size", "512"]);
    assert_eq!(cfg.analyser_settings().fft_size, 512);
}
