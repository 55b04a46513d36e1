//! Rendering: per-pixel matching and canvas composition.

mod cpu;
mod glyph_art;

pub use cpu::CpuRenderer;
pub use glyph_art::{GlyphArt, PixelMatch};
