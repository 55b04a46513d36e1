use std::path::Path;

use glyph_match::{Atlas, GlyphRamp, MatchError};

use crate::error::AppError;
use crate::imaging::{encode_png, write_atomic, AtlasGenerator, AtlasSpec};
use crate::models::RenderConfig;
use crate::services::render_session::{load_swatches, palette_from_swatches};

/// Size of a generated atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasOutcome {
    pub width: usize,
    pub height: usize,
    pub glyphs: usize,
    pub colors: usize,
}

/// Render an atlas for the configured palette and ramp and write it to `output`.
///
/// The palette is validated first, so an atlas is only produced for a
/// palette the renderer will accept.
pub fn build_atlas(config: &RenderConfig, output: &Path) -> Result<AtlasOutcome, AppError> {
    config.validate()?;

    let swatches = load_swatches(config)?;
    let palette = palette_from_swatches(&swatches)?;
    let ramp = GlyphRamp::new(&config.ramp).map_err(MatchError::from)?;

    let settings = &config.atlas_gen;
    let spec = AtlasSpec {
        cell_width: settings.cell_width,
        cell_height: settings.cell_height,
        font_family: settings.font_family.clone(),
        font_size: settings.effective_font_size(),
    };

    let generator = AtlasGenerator::new(settings.font_file.as_deref())?;
    let raster = generator.render(&ramp, &swatches, &spec)?;
    let atlas = Atlas::new(raster, &ramp, &palette).map_err(MatchError::from)?;

    let bytes = encode_png(atlas.raster(), false)?;
    write_atomic(output, &bytes)?;

    tracing::info!(
        output = %output.display(),
        width = atlas.raster().width(),
        height = atlas.raster().height(),
        "Wrote atlas"
    );

    Ok(AtlasOutcome {
        width: atlas.raster().width(),
        height: atlas.raster().height(),
        glyphs: atlas.glyphs(),
        colors: atlas.colors(),
    })
}
