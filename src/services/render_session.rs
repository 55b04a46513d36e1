use std::path::{Path, PathBuf};

use glyph_match::{normalize, Atlas, GlyphArt, GlyphRamp, GlyphRenderer, MatchError, Palette, Raster};
use glyph_match_gpu::{GpuAvailability, GpuContext, GpuRenderer};

use crate::error::{AppError, ConfigError};
use crate::imaging::{
    channels_to_lab, encode_png, flatten_alpha, load_png, parse_hex_list, raw_channels, resize,
    rgb8_to_lab, swatches_from_raster, target_size, write_all_atomic, CHANNEL_MAX,
};
use crate::models::{Backend, RenderConfig};

/// Files touched by one `render` invocation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Optional plain-text rendering, one line per source row
    pub text: Option<PathBuf>,
}

/// What a finished render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Source size after scaling, in pixels (= glyph cells)
    pub columns: usize,
    pub rows: usize,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub backend: Backend,
}

enum Engine {
    Cpu,
    Gpu(Box<GpuRenderer>),
}

/// A configured renderer: palette, ramp and atlas loaded once, backend chosen.
pub struct RenderSession {
    renderer: GlyphRenderer,
    engine: Engine,
    atlas_alpha: bool,
    columns: Option<u32>,
    aspect_correction: bool,
}

impl RenderSession {
    /// Load palette, ramp and atlas from `config` and set up the backend.
    pub fn from_config(config: &RenderConfig) -> Result<Self, AppError> {
        config.validate()?;

        let palette = load_palette(config)?;
        let ramp = GlyphRamp::new(&config.ramp).map_err(MatchError::from)?;

        let atlas_path = config.atlas.as_deref().ok_or(ConfigError::MissingAtlas)?;
        let atlas_png = load_png(atlas_path)?;
        let atlas = Atlas::new(atlas_png.raster, &ramp, &palette).map_err(MatchError::from)?;

        tracing::info!(
            colors = palette.len(),
            glyphs = ramp.len(),
            cell_width = atlas.cell_width(),
            cell_height = atlas.cell_height(),
            "Loaded atlas"
        );

        let renderer = GlyphRenderer::new(palette, ramp, atlas)?
            .metric(config.distance_metric()?)
            .parallel(config.parallel);
        let engine = select_engine(config.backend()?, &renderer)?;

        Ok(Self {
            renderer,
            engine,
            atlas_alpha: atlas_png.has_alpha,
            columns: config.columns,
            aspect_correction: config.aspect_correction,
        })
    }

    /// Backend actually in use (`Auto` is resolved at construction).
    pub fn backend(&self) -> Backend {
        match self.engine {
            Engine::Cpu => Backend::Cpu,
            Engine::Gpu(_) => Backend::Gpu,
        }
    }

    /// Scale, convert and match an in-memory source image.
    pub fn render_raster(&self, source: &Raster) -> Result<GlyphArt, AppError> {
        let atlas = self.renderer.atlas();
        let cell = self
            .aspect_correction
            .then_some((atlas.cell_width() as u32, atlas.cell_height() as u32));
        let (width, height) = target_size(
            source.width() as u32,
            source.height() as u32,
            self.columns,
            cell,
        );
        let scaled = resize(&flatten_alpha(source), width, height)?;
        let (width, height) = (width as usize, height as usize);

        let mut channels = raw_channels(&scaled);
        let art = match &self.engine {
            Engine::Cpu => {
                normalize(&mut channels, CHANNEL_MAX);
                let samples = channels_to_lab(&channels);
                self.renderer.render(&samples, width, height)?
            }
            Engine::Gpu(gpu) => {
                pollster::block_on(gpu.normalize(&mut channels, CHANNEL_MAX))?;
                let samples = channels_to_lab(&channels);
                pollster::block_on(gpu.render(&samples, width, height))?
            }
        };
        Ok(art)
    }

    /// Render `request.source` and write the outputs.
    ///
    /// Nothing is written until the whole render succeeded, and neither
    /// output replaces its target unless both were written.
    pub fn run(&self, request: &RenderRequest) -> Result<RenderOutcome, AppError> {
        let source = load_png(&request.source)?;
        let art = self.render_raster(&source.raster)?;

        let png_bytes = encode_png(art.canvas(), self.atlas_alpha)?;
        let text = request
            .text
            .as_deref()
            .map(|path| (path, art.to_text(self.renderer.ramp())));

        let mut files: Vec<(&Path, &[u8])> = vec![(request.output.as_path(), png_bytes.as_slice())];
        if let Some((path, text)) = &text {
            files.push((*path, text.as_bytes()));
        }
        write_all_atomic(&files)?;

        let outcome = RenderOutcome {
            columns: art.width(),
            rows: art.height(),
            canvas_width: art.canvas().width(),
            canvas_height: art.canvas().height(),
            backend: self.backend(),
        };
        tracing::info!(
            output = %request.output.display(),
            columns = outcome.columns,
            rows = outcome.rows,
            canvas_width = outcome.canvas_width,
            canvas_height = outcome.canvas_height,
            backend = ?outcome.backend,
            "Rendered glyph art"
        );
        Ok(outcome)
    }
}

/// Palette swatches as 8-bit sRGB: from the palette image if set, else the hex list.
pub fn load_swatches(config: &RenderConfig) -> Result<Vec<[u8; 3]>, AppError> {
    if let Some(path) = config.palette_image.as_deref() {
        let image = load_png(path)?;
        return Ok(swatches_from_raster(&image.raster));
    }
    if config.colors.is_empty() {
        return Err(ConfigError::MissingPalette.into());
    }
    Ok(parse_hex_list(&config.colors)?)
}

/// The configured palette, converted to Lab and validated.
pub fn load_palette(config: &RenderConfig) -> Result<Palette, AppError> {
    palette_from_swatches(&load_swatches(config)?)
}

/// Convert 8-bit swatches to a validated Lab palette.
pub fn palette_from_swatches(swatches: &[[u8; 3]]) -> Result<Palette, AppError> {
    let colors = swatches.iter().copied().map(rgb8_to_lab).collect();
    Ok(Palette::new(colors).map_err(MatchError::from)?)
}

fn select_engine(backend: Backend, renderer: &GlyphRenderer) -> Result<Engine, AppError> {
    match backend {
        Backend::Cpu => Ok(Engine::Cpu),
        Backend::Gpu => {
            let context = pollster::block_on(GpuContext::init())?;
            let gpu = pollster::block_on(GpuRenderer::new(context, renderer))?;
            Ok(Engine::Gpu(Box::new(gpu)))
        }
        Backend::Auto => match pollster::block_on(GpuContext::try_init()) {
            GpuAvailability::Available(context) => {
                match pollster::block_on(GpuRenderer::new(context, renderer)) {
                    Ok(gpu) => Ok(Engine::Gpu(Box::new(gpu))),
                    Err(e) => {
                        tracing::warn!(error = %e, "GPU setup failed, rendering on CPU");
                        Ok(Engine::Cpu)
                    }
                }
            }
            GpuAvailability::Unavailable(reason) => {
                tracing::info!(%reason, "No GPU available, rendering on CPU");
                Ok(Engine::Cpu)
            }
        },
    }
}

/// Set up a session from `config` and run one request.
pub fn render_file(config: &RenderConfig, request: &RenderRequest) -> Result<RenderOutcome, AppError> {
    RenderSession::from_config(config)?.run(request)
}

