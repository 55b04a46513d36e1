//! Error types for atlas and raster construction.

use std::fmt;

/// Error type for raster construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Pixel buffer length does not match `width * height`
    PixelCount {
        /// `width * height`
        expected: usize,
        /// Length of the supplied buffer
        actual: usize,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::PixelCount { expected, actual } => {
                write!(
                    f,
                    "pixel buffer has {} pixels, expected {}",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for RasterError {}

/// Error type for atlas validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Atlas size cannot be split into `columns` x `rows` equal, non-empty cells
    Geometry {
        /// Atlas width in pixels
        width: usize,
        /// Atlas height in pixels
        height: usize,
        /// Required cell columns (glyph count)
        columns: usize,
        /// Required cell rows (palette size squared)
        rows: usize,
    },
    /// Atlas was laid out for a different ramp or palette
    Mismatch {
        /// Glyph columns in the atlas
        atlas_glyphs: usize,
        /// Palette size the atlas rows were built for
        atlas_colors: usize,
        /// Glyphs in the ramp in use
        glyphs: usize,
        /// Colors in the palette in use
        colors: usize,
    },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtlasError::Geometry {
                width,
                height,
                columns,
                rows,
            } => write!(
                f,
                "atlas of {}x{} pixels cannot be split into {} columns x {} rows of equal cells",
                width, height, columns, rows
            ),
            AtlasError::Mismatch {
                atlas_glyphs,
                atlas_colors,
                glyphs,
                colors,
            } => write!(
                f,
                "atlas holds {} glyphs x {} colors, but ramp has {} glyphs and palette {} colors",
                atlas_glyphs, atlas_colors, glyphs, colors
            ),
        }
    }
}

impl std::error::Error for AtlasError {}
