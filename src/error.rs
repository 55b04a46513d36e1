use glyph_match::MatchError;
use glyph_match_gpu::GpuError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Matching error: {0}")]
    Match(#[from] MatchError),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid color '{0}': expected #rrggbb or #rgb")]
    InvalidColor(String),

    #[error("Unknown distance metric '{0}': expected cie76 or cie94")]
    UnknownMetric(String),

    #[error("Unknown backend '{0}': expected cpu, gpu or auto")]
    UnknownBackend(String),

    #[error("No palette configured: set colors or a palette image")]
    MissingPalette,

    #[error("No atlas configured: set an atlas image")]
    MissingAtlas,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported PNG format: {color_type:?} at {bit_depth:?}")]
    Unsupported {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    #[error("Failed to allocate pixmap of {width}x{height}")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Font load error on {path}: {source}")]
    Font {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ImageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImageError::Io {
            path: path.into(),
            source,
        }
    }
}
