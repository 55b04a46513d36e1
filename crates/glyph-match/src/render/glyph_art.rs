//! GlyphArt: the result of a render.
//!
//! [`GlyphArt`] keeps the per-pixel match results alongside the composed
//! canvas, so callers can write the image, print a text rendering, or compare
//! two backends.

use crate::atlas::Raster;
use crate::glyph::GlyphRamp;

/// Per-pixel outcome of nearest-pair search and glyph selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelMatch {
    /// Nearest palette entry (tile background)
    pub closest: usize,
    /// Second-nearest palette entry (tile foreground)
    pub second: usize,
    /// Position on the glyph ramp
    pub glyph: usize,
    /// Distance to `closest`
    pub d1: f32,
    /// Distance to `second`
    pub d2: f32,
}

/// The canonical output of the matching pipeline.
///
/// Stores one [`PixelMatch`] per source pixel in row-major order and the
/// output canvas of `width * cell_width` by `height * cell_height` pixels.
///
/// # Example
///
/// ```
/// use glyph_match::{GlyphArt, GlyphRamp, PixelMatch, Raster};
///
/// let matches = vec![
///     PixelMatch { glyph: 0, ..Default::default() },
///     PixelMatch { glyph: 1, ..Default::default() },
/// ];
/// let art = GlyphArt::new(2, 1, 1, 1, matches, Raster::new(2, 1));
///
/// let ramp = GlyphRamp::new(" #").unwrap();
/// assert_eq!(art.to_text(&ramp), " #\n");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphArt {
    width: usize,
    height: usize,
    cell_width: usize,
    cell_height: usize,
    matches: Vec<PixelMatch>,
    canvas: Raster,
}

impl GlyphArt {
    /// Assemble a result from its parts.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that there is one match per pixel and that the canvas
    /// covers every cell.
    pub fn new(
        width: usize,
        height: usize,
        cell_width: usize,
        cell_height: usize,
        matches: Vec<PixelMatch>,
        canvas: Raster,
    ) -> Self {
        debug_assert_eq!(
            matches.len(),
            width * height,
            "matches length ({}) must match width * height ({}x{})",
            matches.len(),
            width,
            height,
        );
        debug_assert_eq!(
            (canvas.width(), canvas.height()),
            (width * cell_width, height * cell_height),
            "canvas size must be the source size times the cell size"
        );
        Self {
            width,
            height,
            cell_width,
            cell_height,
            matches,
            canvas,
        }
    }

    /// Source width in pixels (columns of cells).
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Source height in pixels (rows of cells).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    #[inline]
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// Per-pixel results, row-major.
    #[inline]
    pub fn matches(&self) -> &[PixelMatch] {
        &self.matches
    }

    /// The composed output image.
    #[inline]
    pub fn canvas(&self) -> &Raster {
        &self.canvas
    }

    /// Render as text: one line per source row, one ramp symbol per pixel.
    ///
    /// # Panics
    ///
    /// Panics if a glyph index is outside `ramp`.
    pub fn to_text(&self, ramp: &GlyphRamp) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        if self.width == 0 {
            return text;
        }
        for row in self.matches.chunks(self.width) {
            text.extend(row.iter().map(|m| ramp.symbol(m.glyph)));
            text.push('\n');
        }
        text
    }
}
