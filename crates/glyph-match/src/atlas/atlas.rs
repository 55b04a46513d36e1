//! Glyph atlas geometry and cell lookup.

use super::error::AtlasError;
use super::raster::Raster;
use crate::glyph::GlyphRamp;
use crate::palette::Palette;

/// A rectangular cell inside the atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// A pre-rendered grid of every (glyph, background, foreground) tile.
///
/// The atlas has one column per ramp glyph and one row per ordered pair of
/// palette colors:
///
/// ```text
///            glyph 0   glyph 1   ...   glyph M-1
/// bg 0 fg 0  [cell]    [cell]          [cell]
/// bg 0 fg 1  [cell]    [cell]          [cell]
/// ...
/// bg N-1 fg N-1
/// ```
///
/// Cell `(g, b * N + f)` shows glyph `g` in color `f` on color `b`. Cell size
/// is derived from the atlas size, which must divide evenly.
///
/// # Example
///
/// ```
/// use glyph_match::{Atlas, GlyphRamp, Lab, Palette, Raster};
///
/// let palette = Palette::new(vec![Lab::new(0.0, 0.0, 0.0), Lab::new(100.0, 0.0, 0.0)]).unwrap();
/// let ramp = GlyphRamp::new(" #").unwrap();
///
/// // 2 glyph columns of 4 px, 4 color-pair rows of 6 px
/// let atlas = Atlas::new(Raster::new(8, 24), &ramp, &palette).unwrap();
/// assert_eq!((atlas.cell_width(), atlas.cell_height()), (4, 6));
///
/// let cell = atlas.lookup_cell(1, 1, 0);
/// assert_eq!((cell.x, cell.y), (4, 12));
/// ```
#[derive(Debug, Clone)]
pub struct Atlas {
    raster: Raster,
    glyphs: usize,
    colors: usize,
    cell_width: usize,
    cell_height: usize,
}

impl Atlas {
    /// Validate atlas geometry against a ramp and palette.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Geometry`] if the width is not a multiple of the
    /// glyph count, the height is not a multiple of the palette size squared,
    /// or either cell dimension would be zero.
    pub fn new(raster: Raster, ramp: &GlyphRamp, palette: &Palette) -> Result<Self, AtlasError> {
        let glyphs = ramp.len();
        let colors = palette.len();
        let columns = glyphs;
        let rows = colors * colors;
        let (width, height) = (raster.width(), raster.height());

        let geometry_err = AtlasError::Geometry {
            width,
            height,
            columns,
            rows,
        };
        if columns == 0 || rows == 0 || width % columns != 0 || height % rows != 0 {
            return Err(geometry_err);
        }

        let cell_width = width / columns;
        let cell_height = height / rows;
        if cell_width == 0 || cell_height == 0 {
            return Err(geometry_err);
        }

        Ok(Self {
            raster,
            glyphs,
            colors,
            cell_width,
            cell_height,
        })
    }

    #[inline]
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    #[inline]
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// Number of glyph columns (M).
    #[inline]
    pub fn glyphs(&self) -> usize {
        self.glyphs
    }

    /// Number of palette colors (N).
    #[inline]
    pub fn colors(&self) -> usize {
        self.colors
    }

    /// Check that this atlas was laid out for `ramp` and `palette`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Mismatch`] if the glyph or color count differs.
    pub fn check_layout(&self, ramp: &GlyphRamp, palette: &Palette) -> Result<(), AtlasError> {
        if self.glyphs != ramp.len() || self.colors != palette.len() {
            return Err(AtlasError::Mismatch {
                atlas_glyphs: self.glyphs,
                atlas_colors: self.colors,
                glyphs: ramp.len(),
                colors: palette.len(),
            });
        }
        Ok(())
    }

    /// The underlying atlas image.
    #[inline]
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Locate the cell for a glyph on a background/foreground color pair.
    ///
    /// # Panics
    ///
    /// Panics if `glyph >= M` or either color index is `>= N`. Indices come
    /// from the nearest-pair search and glyph calculator, so an out-of-range
    /// value is a bug, not an input error.
    #[inline]
    pub fn lookup_cell(&self, glyph: usize, bg: usize, fg: usize) -> CellRect {
        assert!(
            glyph < self.glyphs && bg < self.colors && fg < self.colors,
            "atlas lookup out of range: glyph {} of {}, bg {} / fg {} of {}",
            glyph,
            self.glyphs,
            bg,
            fg,
            self.colors
        );
        CellRect {
            x: glyph * self.cell_width,
            y: (bg * self.colors + fg) * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Read-only pixel rows of a cell, top to bottom.
    #[inline]
    pub fn cell_rows(&self, cell: CellRect) -> impl Iterator<Item = &[[u8; 4]]> + '_ {
        (cell.y..cell.y + cell.height)
            .map(move |y| &self.raster.row(y)[cell.x..cell.x + cell.width])
    }
}
