//! GlyphRenderer builder, the primary entry point for the crate.
//!
//! [`GlyphRenderer`] owns the session inputs (palette, ramp, atlas), checks
//! that they fit together, and dispatches the distance metric once per render
//! to the matching monomorphized [`CpuRenderer`].

use super::error::{check_sample_count, MatchError};
use crate::atlas::Atlas;
use crate::color::Lab;
use crate::glyph::GlyphRamp;
use crate::metric::{Cie76, Cie94, DistanceMetric, Metric};
use crate::palette::Palette;
use crate::render::{CpuRenderer, GlyphArt};

/// High-level renderer for glyph art.
///
/// # Design
///
/// - Constructor validates that the atlas was laid out for the palette and
///   ramp, so a built renderer cannot index outside its atlas
/// - Configuration methods consume and return `self`
/// - [`render()`](Self::render) takes `&self` so the renderer is reusable
///   across images
///
/// # Example
///
/// ```
/// use glyph_match::{Atlas, DistanceMetric, GlyphRamp, GlyphRenderer, Lab, Palette, Raster};
///
/// let palette = Palette::new(vec![Lab::new(0.0, 0.0, 0.0), Lab::new(100.0, 0.0, 0.0)]).unwrap();
/// let ramp = GlyphRamp::new(" #").unwrap();
/// let atlas = Atlas::new(Raster::new(8, 32), &ramp, &palette).unwrap();
///
/// let renderer = GlyphRenderer::new(palette, ramp, atlas)
///     .unwrap()
///     .metric(DistanceMetric::Cie94);
///
/// let samples = vec![Lab::new(25.0, 0.0, 0.0); 6];
/// let art = renderer.render(&samples, 3, 2).unwrap();
///
/// assert_eq!(art.matches().len(), 6);
/// assert_eq!(art.canvas().width(), 3 * 4);
/// assert_eq!(art.canvas().height(), 2 * 8);
/// ```
#[derive(Debug, Clone)]
pub struct GlyphRenderer {
    palette: Palette,
    ramp: GlyphRamp,
    atlas: Atlas,
    metric: DistanceMetric,
    parallel: bool,
}

impl GlyphRenderer {
    /// Create a renderer. Defaults: CIE76, parallel.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Atlas`] if the atlas was built for a different
    /// glyph or color count.
    pub fn new(palette: Palette, ramp: GlyphRamp, atlas: Atlas) -> Result<Self, MatchError> {
        atlas.check_layout(&ramp, &palette)?;
        Ok(Self {
            palette,
            ramp,
            atlas,
            metric: DistanceMetric::default(),
            parallel: true,
        })
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Enable or disable rayon parallelism. Output is identical either way.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    #[inline]
    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Render a row-major grid of Lab samples.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::SampleCount`] if `samples.len() != width * height`.
    pub fn render(&self, samples: &[Lab], width: usize, height: usize) -> Result<GlyphArt, MatchError> {
        check_sample_count(samples.len(), width, height)?;
        let art = match self.metric {
            DistanceMetric::Cie76 => self.render_with::<Cie76>(samples, width, height),
            DistanceMetric::Cie94 => self.render_with::<Cie94>(samples, width, height),
        };
        Ok(art)
    }

    fn render_with<M: Metric>(&self, samples: &[Lab], width: usize, height: usize) -> GlyphArt {
        let renderer = CpuRenderer::<M>::new(&self.palette, &self.atlas);
        let (matches, canvas) = if self.parallel {
            renderer.render_parallel(samples, width, height)
        } else {
            renderer.render_sequential(samples, width, height)
        };
        GlyphArt::new(
            width,
            height,
            self.atlas.cell_width(),
            self.atlas.cell_height(),
            matches,
            canvas,
        )
    }
}
