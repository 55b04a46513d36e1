//! Glyphart - render images as glyph-tile art
//!
//! Command-line front end for the `glyph-match` engine: configuration,
//! PNG and color adapters, atlas generation and render sessions.
//! This library exposes modules for integration testing.

pub mod error;
pub mod imaging;
pub mod models;
pub mod services;
