use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glyphart::models::{ConfigOverrides, RenderConfig, CONFIG_ENV};
use glyphart::services::{build_atlas, RenderRequest, RenderSession};

#[derive(Parser)]
#[command(name = "glyphart")]
#[command(about = "Render images as glyph-tile art with perceptual color matching")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YAML configuration file (falls back to $GLYPHART_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Palette and ramp options shared by all subcommands
#[derive(Args)]
struct PaletteArgs {
    /// Palette image; every pixel is one color
    #[arg(long)]
    palette_image: Option<PathBuf>,

    /// Palette as comma-separated hex colors (e.g. "#000000,#ffffff,#ff0000")
    #[arg(long)]
    colors: Option<String>,

    /// Glyph ramp, sparse to dense
    #[arg(long)]
    ramp: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an image to a glyph-art PNG
    Render {
        /// Source PNG
        #[arg(short, long)]
        source: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Glyph atlas PNG
        #[arg(short, long)]
        atlas: Option<PathBuf>,

        #[command(flatten)]
        palette: PaletteArgs,

        /// Distance metric: cie76 (simple) or cie94 (weighted)
        #[arg(short, long)]
        metric: Option<String>,

        /// Renderer: cpu, gpu or auto
        #[arg(short, long)]
        backend: Option<String>,

        /// Maximum width in glyph columns
        #[arg(long)]
        columns: Option<u32>,

        /// Do not correct for the glyph cell aspect ratio
        #[arg(long)]
        no_aspect: bool,

        /// Render on a single CPU thread
        #[arg(long)]
        sequential: bool,

        /// Also write a plain-text rendering to this path
        #[arg(long)]
        text: Option<PathBuf>,
    },
    /// Generate a glyph atlas from a font
    Atlas {
        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        palette: PaletteArgs,

        /// Cell width in pixels
        #[arg(long)]
        cell_width: Option<u32>,

        /// Cell height in pixels
        #[arg(long)]
        cell_height: Option<u32>,

        /// Font family name
        #[arg(long)]
        font_family: Option<String>,

        /// Font size in pixels
        #[arg(long)]
        font_size: Option<f32>,

        /// Font file to load in addition to system fonts
        #[arg(long)]
        font_file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glyphart=info,glyph_match_gpu=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let mut config = RenderConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Render {
            source,
            output,
            atlas,
            palette,
            metric,
            backend,
            columns,
            no_aspect,
            sequential,
            text,
        }) => {
            config.apply(ConfigOverrides {
                atlas,
                metric,
                backend,
                columns,
                no_aspect,
                sequential,
                ..palette.into_overrides()
            });
            let session = RenderSession::from_config(&config)?;
            let outcome = session.run(&RenderRequest {
                source,
                output: output.clone(),
                text,
            })?;
            println!(
                "Rendered {}x{} glyphs to {} ({}x{} px, {:?})",
                outcome.columns,
                outcome.rows,
                output.display(),
                outcome.canvas_width,
                outcome.canvas_height,
                outcome.backend
            );
            Ok(())
        }
        Some(Commands::Atlas {
            output,
            palette,
            cell_width,
            cell_height,
            font_family,
            font_size,
            font_file,
        }) => {
            config.apply(ConfigOverrides {
                cell_width,
                cell_height,
                font_family,
                font_size,
                font_file,
                ..palette.into_overrides()
            });
            let outcome = build_atlas(&config, &output)?;
            println!(
                "Wrote {}x{} atlas ({} glyphs, {} colors) to {}",
                outcome.width,
                outcome.height,
                outcome.glyphs,
                outcome.colors,
                output.display()
            );
            Ok(())
        }
        None => {
            run_status_command(&config, cli.config.as_ref());
            Ok(())
        }
    }
}

impl PaletteArgs {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            palette_image: self.palette_image,
            colors: self.colors.map(|list| {
                list.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            }),
            ramp: self.ramp,
            ..Default::default()
        }
    }
}

/// Print version, config source and the effective configuration.
fn run_status_command(config: &RenderConfig, config_arg: Option<&PathBuf>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_env = std::env::var(CONFIG_ENV).ok();

    println!("Glyphart v{VERSION}");
    println!("Glyph-tile art with perceptual color matching\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        config_env.as_deref().unwrap_or("(not set)")
    );

    let source = match (config_arg, config_env) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) => path,
        (None, None) => "defaults".to_string(),
    };
    println!("\nConfiguration ({source}):");

    fn show<T: std::fmt::Display>(value: Option<T>) -> String {
        value.map_or_else(|| "(not set)".to_string(), |v| v.to_string())
    }

    println!("  atlas         = {}", show(config.atlas.as_ref().map(|p| p.display())));
    println!(
        "  palette_image = {}",
        show(config.palette_image.as_ref().map(|p| p.display()))
    );
    let colors = (!config.colors.is_empty()).then(|| config.colors.join(", "));
    println!("  colors        = {}", show(colors));
    println!("  ramp          = {:?}", config.ramp);
    println!("  metric        = {}", config.metric);
    println!("  backend       = {}", config.backend);
    println!("  columns       = {}", show(config.columns));
    println!("  aspect        = {}", config.aspect_correction);
    println!("  parallel      = {}", config.parallel);
    println!(
        "  atlas cells   = {}x{} px, font \"{}\" at {} px",
        config.atlas_gen.cell_width,
        config.atlas_gen.cell_height,
        config.atlas_gen.font_family,
        config.atlas_gen.effective_font_size()
    );

    println!("\nRun 'glyphart render --help' or 'glyphart atlas --help' to get started.");
}
