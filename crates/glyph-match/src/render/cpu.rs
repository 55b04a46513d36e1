//! Per-pixel CPU renderer.
//!
//! Composes nearest-pair search, glyph selection and atlas lookup, copying
//! one atlas cell into the canvas per source pixel. Each source row owns a
//! disjoint block-row of the canvas, which is what lets the parallel path
//! hand out `&mut` chunks to rayon without synchronization.

use std::marker::PhantomData;

use rayon::prelude::*;

use crate::atlas::{Atlas, Raster};
use crate::color::Lab;
use crate::glyph::glyph_index;
use crate::metric::Metric;
use crate::palette::Palette;

use super::glyph_art::PixelMatch;

/// CPU renderer, monomorphized over the distance metric.
///
/// The atlas must have been laid out for `palette`
/// (see [`Atlas::check_layout`]); the glyph count is taken from the atlas.
///
/// # Example
///
/// ```
/// use glyph_match::{Atlas, Cie76, CpuRenderer, GlyphRamp, Lab, Palette, Raster};
///
/// let palette = Palette::new(vec![Lab::new(0.0, 0.0, 0.0), Lab::new(100.0, 0.0, 0.0)]).unwrap();
/// let ramp = GlyphRamp::new(" #").unwrap();
/// let atlas = Atlas::new(Raster::new(2, 4), &ramp, &palette).unwrap();
///
/// let renderer = CpuRenderer::<Cie76>::new(&palette, &atlas);
/// let m = renderer.match_pixel(Lab::new(75.0, 0.0, 0.0));
/// assert_eq!((m.closest, m.second, m.glyph), (1, 0, 0));
/// ```
pub struct CpuRenderer<'a, M: Metric> {
    palette: &'a Palette,
    atlas: &'a Atlas,
    _metric: PhantomData<M>,
}

impl<'a, M: Metric> CpuRenderer<'a, M> {
    pub fn new(palette: &'a Palette, atlas: &'a Atlas) -> Self {
        debug_assert_eq!(palette.len(), atlas.colors());
        Self {
            palette,
            atlas,
            _metric: PhantomData,
        }
    }

    /// Run nearest-pair search and glyph selection for one sample.
    #[inline]
    pub fn match_pixel(&self, goal: Lab) -> PixelMatch {
        let pair = self.palette.nearest_pair::<M>(goal);
        PixelMatch {
            closest: pair.closest,
            second: pair.second,
            glyph: glyph_index(pair.d1, pair.d2, self.atlas.glyphs()),
            d1: pair.d1,
            d2: pair.d2,
        }
    }

    /// Render a `width` x `height` grid of samples, row by row.
    ///
    /// # Panics
    ///
    /// Panics if `samples.len() != width * height`.
    pub fn render_sequential(
        &self,
        samples: &[Lab],
        width: usize,
        height: usize,
    ) -> (Vec<PixelMatch>, Raster) {
        let (mut matches, mut canvas) = self.allocate(samples, width, height);
        if width == 0 || height == 0 {
            return (matches, canvas);
        }

        let block = self.block_len(width);
        for ((row, row_matches), block_row) in samples
            .chunks(width)
            .zip(matches.chunks_mut(width))
            .zip(canvas.pixels_mut().chunks_mut(block))
        {
            self.render_row(row, row_matches, block_row);
        }

        (matches, canvas)
    }

    /// Render with rows distributed over the rayon thread pool.
    ///
    /// Produces exactly the same matches and canvas as
    /// [`render_sequential`](Self::render_sequential).
    ///
    /// # Panics
    ///
    /// Panics if `samples.len() != width * height`.
    pub fn render_parallel(
        &self,
        samples: &[Lab],
        width: usize,
        height: usize,
    ) -> (Vec<PixelMatch>, Raster) {
        let (mut matches, mut canvas) = self.allocate(samples, width, height);
        if width == 0 || height == 0 {
            return (matches, canvas);
        }

        let block = self.block_len(width);
        samples
            .par_chunks(width)
            .zip(matches.par_chunks_mut(width))
            .zip(canvas.pixels_mut().par_chunks_mut(block))
            .for_each(|((row, row_matches), block_row)| {
                self.render_row(row, row_matches, block_row);
            });

        (matches, canvas)
    }

    fn allocate(&self, samples: &[Lab], width: usize, height: usize) -> (Vec<PixelMatch>, Raster) {
        assert_eq!(
            samples.len(),
            width * height,
            "sample count must equal width * height"
        );
        let canvas = Raster::new(
            width * self.atlas.cell_width(),
            height * self.atlas.cell_height(),
        );
        (vec![PixelMatch::default(); samples.len()], canvas)
    }

    /// Canvas pixels covered by one source row.
    fn block_len(&self, width: usize) -> usize {
        width * self.atlas.cell_width() * self.atlas.cell_height()
    }

    fn render_row(&self, row: &[Lab], row_matches: &mut [PixelMatch], block_row: &mut [[u8; 4]]) {
        let cell_w = self.atlas.cell_width();
        let stride = row.len() * cell_w;

        for (x, (&goal, slot)) in row.iter().zip(row_matches.iter_mut()).enumerate() {
            let m = self.match_pixel(goal);
            let cell = self.atlas.lookup_cell(m.glyph, m.closest, m.second);
            for (dy, src) in self.atlas.cell_rows(cell).enumerate() {
                let start = dy * stride + x * cell_w;
                block_row[start..start + cell_w].copy_from_slice(src);
            }
            *slot = m;
        }
    }
}
