//! Unified error type for the glyph-match public API.
//!
//! [`MatchError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use crate::atlas::{AtlasError, RasterError};
use crate::glyph::RampError;
use crate::palette::PaletteError;
use std::fmt;

/// Unified error type for the glyph-match public API.
///
/// # Example
///
/// ```
/// use glyph_match::{GlyphRamp, Lab, MatchError, Palette};
///
/// fn setup() -> Result<(Palette, GlyphRamp), MatchError> {
///     let palette = Palette::new(vec![Lab::new(0.0, 0.0, 0.0), Lab::new(100.0, 0.0, 0.0)])?;
///     let ramp = GlyphRamp::new(" .#")?;
///     Ok((palette, ramp))
/// }
/// # setup().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    /// Palette validation error
    Palette(PaletteError),
    /// Glyph ramp validation error
    Ramp(RampError),
    /// Atlas geometry or layout error
    Atlas(AtlasError),
    /// Raster construction error
    Raster(RasterError),
    /// Sample buffer does not hold `width * height` colors
    SampleCount { expected: usize, actual: usize },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Palette(err) => write!(f, "palette error: {}", err),
            MatchError::Ramp(err) => write!(f, "glyph ramp error: {}", err),
            MatchError::Atlas(err) => write!(f, "atlas error: {}", err),
            MatchError::Raster(err) => write!(f, "raster error: {}", err),
            MatchError::SampleCount { expected, actual } => write!(
                f,
                "got {} samples, expected {} (width * height)",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Palette(err) => Some(err),
            MatchError::Ramp(err) => Some(err),
            MatchError::Atlas(err) => Some(err),
            MatchError::Raster(err) => Some(err),
            MatchError::SampleCount { .. } => None,
        }
    }
}

impl From<PaletteError> for MatchError {
    fn from(err: PaletteError) -> Self {
        MatchError::Palette(err)
    }
}

impl From<RampError> for MatchError {
    fn from(err: RampError) -> Self {
        MatchError::Ramp(err)
    }
}

impl From<AtlasError> for MatchError {
    fn from(err: AtlasError) -> Self {
        MatchError::Atlas(err)
    }
}

impl From<RasterError> for MatchError {
    fn from(err: RasterError) -> Self {
        MatchError::Raster(err)
    }
}

/// Check that a sample buffer covers a `width` x `height` grid.
pub fn check_sample_count(actual: usize, width: usize, height: usize) -> Result<(), MatchError> {
    let expected = width * height;
    if actual != expected {
        return Err(MatchError::SampleCount { expected, actual });
    }
    Ok(())
}
