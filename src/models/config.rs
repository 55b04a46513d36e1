use crate::error::ConfigError;
use glyph_match::{DistanceMetric, DEFAULT_RAMP};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "GLYPHART_CONFIG";

/// Render configuration loaded from a YAML file, then overridden by CLI flags.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Pre-rendered glyph atlas (PNG)
    #[serde(default)]
    pub atlas: Option<PathBuf>,

    /// Palette image; every pixel is one swatch, row-major
    #[serde(default)]
    pub palette_image: Option<PathBuf>,

    /// Palette as hex colors; used when no palette image is set
    #[serde(default)]
    pub colors: Vec<String>,

    /// Glyph ramp, sparse to dense
    #[serde(default = "default_ramp")]
    pub ramp: String,

    /// Distance metric name: cie76/simple/euclidean or cie94/weighted
    #[serde(default = "default_metric")]
    pub metric: String,

    /// cpu, gpu, or auto (gpu when an adapter is available)
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Maximum source width in pixels after scaling
    #[serde(default)]
    pub columns: Option<u32>,

    /// Stretch the source so glyph cells keep its proportions
    #[serde(default = "default_true")]
    pub aspect_correction: bool,

    /// Spread CPU rendering over all cores
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Settings for `glyphart atlas`
    #[serde(default)]
    pub atlas_gen: AtlasGenConfig,
}

/// Settings for generating an atlas from a font.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AtlasGenConfig {
    #[serde(default = "default_cell_width")]
    pub cell_width: u32,

    #[serde(default = "default_cell_height")]
    pub cell_height: u32,

    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font size in pixels; defaults to 80% of the cell height
    #[serde(default)]
    pub font_size: Option<f32>,

    /// Extra font file to load before system fonts
    #[serde(default)]
    pub font_file: Option<PathBuf>,
}

fn default_ramp() -> String {
    DEFAULT_RAMP.to_string()
}

fn default_metric() -> String {
    "cie76".to_string()
}

fn default_backend() -> String {
    "auto".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cell_width() -> u32 {
    8
}

fn default_cell_height() -> u32 {
    16
}

fn default_font_family() -> String {
    "monospace".to_string()
}

/// Which renderer a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Gpu,
    /// GPU if an adapter is found, CPU otherwise
    Auto,
}

impl std::str::FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Backend::Cpu),
            "gpu" => Ok(Backend::Gpu),
            "auto" => Ok(Backend::Auto),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Values given on the command line; `Some` replaces the file value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub atlas: Option<PathBuf>,
    pub palette_image: Option<PathBuf>,
    pub colors: Option<Vec<String>>,
    pub ramp: Option<String>,
    pub metric: Option<String>,
    pub backend: Option<String>,
    pub columns: Option<u32>,
    pub no_aspect: bool,
    pub sequential: bool,
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_file: Option<PathBuf>,
}

impl RenderConfig {
    /// Load from `path`, or from `$GLYPHART_CONFIG`, or fall back to defaults.
    ///
    /// A path that is given but cannot be read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            colors = config.colors.len(),
            metric = %config.metric,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply command-line overrides.
    ///
    /// A palette given on the command line replaces the file's palette of
    /// either kind. With both kinds given, the image wins.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(atlas) = overrides.atlas {
            self.atlas = Some(atlas);
        }
        let colors_given = overrides.colors.is_some();
        if let Some(colors) = overrides.colors {
            self.colors = colors;
            self.palette_image = None;
        }
        if let Some(palette_image) = overrides.palette_image {
            self.palette_image = Some(palette_image);
            if !colors_given {
                self.colors.clear();
            }
        }
        if let Some(ramp) = overrides.ramp {
            self.ramp = ramp;
        }
        if let Some(metric) = overrides.metric {
            self.metric = metric;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(columns) = overrides.columns {
            self.columns = Some(columns);
        }
        if overrides.no_aspect {
            self.aspect_correction = false;
        }
        if overrides.sequential {
            self.parallel = false;
        }

        let atlas_gen = &mut self.atlas_gen;
        if let Some(w) = overrides.cell_width {
            atlas_gen.cell_width = w;
        }
        if let Some(h) = overrides.cell_height {
            atlas_gen.cell_height = h;
        }
        if let Some(family) = overrides.font_family {
            atlas_gen.font_family = family;
        }
        if let Some(size) = overrides.font_size {
            atlas_gen.font_size = Some(size);
        }
        if let Some(file) = overrides.font_file {
            atlas_gen.font_file = Some(file);
        }
    }

    pub fn distance_metric(&self) -> Result<DistanceMetric, ConfigError> {
        self.metric
            .parse()
            .map_err(|_| ConfigError::UnknownMetric(self.metric.clone()))
    }

    pub fn backend(&self) -> Result<Backend, ConfigError> {
        self.backend.parse()
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.distance_metric()?;
        self.backend()?;
        if self.columns == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "columns",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.atlas_gen.cell_width == 0 || self.atlas_gen.cell_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "atlas_gen",
                reason: "cell size must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            atlas: None,
            palette_image: None,
            colors: Vec::new(),
            ramp: default_ramp(),
            metric: default_metric(),
            backend: default_backend(),
            columns: None,
            aspect_correction: true,
            parallel: true,
            atlas_gen: AtlasGenConfig::default(),
        }
    }
}

impl Default for AtlasGenConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            font_family: default_font_family(),
            font_size: None,
            font_file: None,
        }
    }
}

impl AtlasGenConfig {
    /// Font size in pixels, falling back to 80% of the cell height.
    pub fn effective_font_size(&self) -> f32 {
        self.font_size
            .unwrap_or(self.cell_height as f32 * 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();

        assert_eq!(config.ramp, DEFAULT_RAMP);
        assert_eq!(config.distance_metric().unwrap(), DistanceMetric::Cie76);
        assert_eq!(config.backend().unwrap(), Backend::Auto);
        assert!(config.aspect_correction);
        assert!(config.parallel);
        assert!(config.colors.is_empty());
        assert_eq!(config.atlas_gen.cell_width, 8);
        assert_eq!(config.atlas_gen.cell_height, 16);
    }

    #[test]
    fn test_parse_minimal_yaml_fills_defaults() {
        let config: RenderConfig = serde_yaml::from_str("colors: ['#000000', '#ffffff']").unwrap();
        assert_eq!(config.colors, vec!["#000000", "#ffffff"]);
        assert_eq!(config.ramp, DEFAULT_RAMP);
        assert_eq!(config.atlas_gen, AtlasGenConfig::default());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r##"
atlas: atlas.png
palette_image: palette.png
ramp: " .#"
metric: weighted
backend: cpu
columns: 120
aspect_correction: false
parallel: false
atlas_gen:
  cell_width: 6
  cell_height: 12
  font_family: DejaVu Sans Mono
  font_size: 10.5
"##;
        let config: RenderConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.atlas, Some(PathBuf::from("atlas.png")));
        assert_eq!(config.palette_image, Some(PathBuf::from("palette.png")));
        assert_eq!(config.ramp, " .#");
        assert_eq!(config.distance_metric().unwrap(), DistanceMetric::Cie94);
        assert_eq!(config.backend().unwrap(), Backend::Cpu);
        assert_eq!(config.columns, Some(120));
        assert!(!config.aspect_correction);
        assert!(!config.parallel);
        assert_eq!(config.atlas_gen.font_family, "DejaVu Sans Mono");
        assert_eq!(config.atlas_gen.effective_font_size(), 10.5);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<RenderConfig, _> = serde_yaml::from_str("colours: []");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = RenderConfig::default();
        config.apply(ConfigOverrides {
            colors: Some(vec!["#fff".to_string(), "#000".to_string()]),
            metric: Some("cie94".to_string()),
            no_aspect: true,
            sequential: true,
            cell_height: Some(20),
            ..Default::default()
        });
        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.distance_metric().unwrap(), DistanceMetric::Cie94);
        assert!(!config.aspect_correction);
        assert!(!config.parallel);
        assert_eq!(config.atlas_gen.cell_height, 20);
        assert_eq!(config.atlas_gen.effective_font_size(), 16.0);
    }

    #[test]
    fn test_colors_override_replaces_palette_image() {
        let mut config = RenderConfig {
            palette_image: Some(PathBuf::from("palette.png")),
            ..Default::default()
        };
        config.apply(ConfigOverrides {
            colors: Some(vec!["#000".to_string(), "#fff".to_string()]),
            ..Default::default()
        });
        assert_eq!(config.palette_image, None);
        assert_eq!(config.colors, vec!["#000".to_string(), "#fff".to_string()]);
    }

    #[test]
    fn test_palette_image_override_replaces_colors() {
        let mut config = RenderConfig {
            colors: vec!["#000".to_string(), "#fff".to_string()],
            ..Default::default()
        };
        config.apply(ConfigOverrides {
            palette_image: Some(PathBuf::from("palette.png")),
            ..Default::default()
        });
        assert_eq!(config.palette_image, Some(PathBuf::from("palette.png")));
        assert!(config.colors.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RenderConfig {
            metric: "cie2000".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::UnknownMetric(_))));

        config.metric = "cie76".to_string();
        config.backend = "tpu".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::UnknownBackend(_))));

        config.backend = "cpu".to_string();
        config.columns = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { field: "columns", .. })));
    }

    #[test]
    fn test_from_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RenderConfig::from_file(&dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_from_file_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "ramp: [unterminated").unwrap();
        assert!(matches!(
            RenderConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_file_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphart.yaml");
        std::fs::write(&path, "metric: cie94\ncolumns: 40\n").unwrap();
        let config = RenderConfig::from_file(&path).unwrap();
        assert_eq!(config.columns, Some(40));
        assert_eq!(config.distance_metric().unwrap(), DistanceMetric::Cie94);
    }
}
