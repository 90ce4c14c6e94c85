pub mod analyzer;
pub mod app;
pub mod audio;
pub mod color;
pub mod config;
pub mod present;
pub mod presets;
pub mod scheduler;
pub mod settings;
pub mod surface;
pub mod theme;
pub mod visual;
