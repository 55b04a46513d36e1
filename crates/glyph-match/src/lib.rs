#![allow(clippy::module_inception)]

//! glyph-match: perceptual color matching for glyph-tile rendering
//!
//! This library turns a grid of color samples into glyph art. For every
//! sample it finds the two palette colors nearest to it, picks a glyph whose
//! density reflects how far the sample sits between them, and copies the
//! matching tile out of a pre-rendered atlas.
//!
//! # Quick Start
//!
//! The [`GlyphRenderer`] builder is the primary entry point:
//!
//! ```
//! use glyph_match::{Atlas, GlyphRamp, GlyphRenderer, Lab, Palette, Raster};
//!
//! let palette = Palette::new(vec![
//!     Lab::new(0.0, 0.0, 0.0),   // black
//!     Lab::new(100.0, 0.0, 0.0), // white
//! ]).unwrap();
//! let ramp = GlyphRamp::new(" #").unwrap();
//!
//! // 2 glyphs x 4 color pairs of 8x16 cells
//! let atlas = Atlas::new(Raster::new(16, 64), &ramp, &palette).unwrap();
//!
//! let renderer = GlyphRenderer::new(palette, ramp, atlas).unwrap();
//! let samples = vec![Lab::new(25.0, 0.0, 0.0); 4];
//! let art = renderer.render(&samples, 2, 2).unwrap();
//!
//! assert_eq!(art.canvas().width(), 2 * 8);
//! assert_eq!(art.canvas().height(), 2 * 16);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! sample ─► distance metric ─► nearest pair ─► glyph index ─► atlas cell ─► canvas
//! ```
//!
//! - [`Palette::nearest_pair`]: closest and second-closest entries with their
//!   distances. The closest becomes the tile background, the second the
//!   foreground.
//! - [`glyph_index`]: `floor(d1 / d2 * (M - 1))`, clamped to the ramp.
//! - [`Atlas::lookup_cell`]: column = glyph, row = `bg * N + fg`.
//!
//! # Distance Metrics
//!
//! Two metrics over CIE L\*a\*b\* are available via [`DistanceMetric`]:
//!
//! - CIE76: plain Euclidean distance (default)
//! - CIE94: graphic-arts weighting that discounts chroma and hue differences
//!   for saturated colors
//!
//! Per-pixel code is generic over the zero-sized [`Cie76`] and [`Cie94`]
//! types; the enum is matched once per render.
//!
//! # Color Input
//!
//! The crate does not convert color spaces. Callers scale raw channel values
//! with [`normalize`] and convert sRGB to L\*a\*b\* with a color library
//! before building [`Lab`] samples.

pub mod api;
pub mod atlas;
pub mod color;
pub mod glyph;
pub mod metric;
pub mod palette;
pub mod render;


pub use api::{check_sample_count, GlyphRenderer, MatchError};
pub use atlas::{Atlas, AtlasError, CellRect, Raster, RasterError};
pub use color::{normalize, Lab};
pub use glyph::{glyph_index, GlyphRamp, RampError, DEFAULT_RAMP};
pub use metric::{Cie76, Cie94, DistanceMetric, Metric, ParseMetricError, CIE94_K1, CIE94_K2};
pub use palette::{NearestPair, Palette, PaletteError};
pub use render::{CpuRenderer, GlyphArt, PixelMatch};
