pub mod config;

pub use config::{AtlasGenConfig, Backend, ConfigOverrides, RenderConfig, CONFIG_ENV};
