//! GPU backend for glyph-match using wgpu compute shaders.
//!
//! [`GpuRenderer`] runs the same pipeline as the CPU renderer with one
//! invocation per source pixel, plus a normalization kernel for scaling raw
//! channel values before color conversion.
//!
//! ```no_run
//! use glyph_match_gpu::{GpuAvailability, GpuContext, GpuRenderer};
//! # fn session() -> glyph_match::GlyphRenderer { unimplemented!() }
//!
//! pollster::block_on(async {
//!     let GpuAvailability::Available(ctx) = GpuContext::try_init().await else {
//!         return;
//!     };
//!     let renderer = GpuRenderer::new(ctx, &session()).await.unwrap();
//!     let mut channels = vec![0.0, 127.5, 255.0];
//!     renderer.normalize(&mut channels, 255.0).await.unwrap();
//! });
//! ```

mod buffers;
mod device;
mod error;
mod pipeline;
mod renderer;

pub use buffers::{GpuPixelMatch, MatchBuffer, MatchUniforms, NormalizeUniforms};
pub use device::{GpuAvailability, GpuContext};
pub use error::GpuError;
pub use pipeline::{MatchPipeline, NormalizePipeline};
pub use renderer::GpuRenderer;
