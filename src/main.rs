use anyhow::{Context, Result};
use clap::Parser;
use sonic_visualizer::{audio, config::Config, presets};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = Config::parse();
    if cfg.list_devices {
        for name in audio::list_input_devices().context("list input devices")? {
            println!("{name}");
        }
        return Ok(());
    }
    if cfg.list_presets {
        for group in presets::PresetGroup::all() {
            println!("{}:", group.label());
            for p in presets::group(group) {
                println!("  {:<16} {:<16} {}", p.key, p.name, p.description);
            }
        }
        return Ok(());
    }

    sonic_visualizer::app::run(cfg)
}
