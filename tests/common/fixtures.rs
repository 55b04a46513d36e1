//! Test fixtures: a scratch directory with a small palette, atlas and source.
//!
//! The fixture atlas is synthetic: every cell is filled with one color that
//! encodes its position, `[glyph * 100, bg * 100, fg * 100]`, so a rendered
//! canvas can be decoded back into the cells it was built from.

use std::path::{Path, PathBuf};

use glyph_match::Raster;
use glyphart::imaging::encode_png;
use glyphart::models::RenderConfig;
use tempfile::TempDir;

pub const BLACK: &str = "#000000";
pub const WHITE: &str = "#ffffff";

/// Glyph ramp used by the fixture atlas
pub const RAMP: &str = " #";

pub const CELL_WIDTH: usize = 2;
pub const CELL_HEIGHT: usize = 4;

/// Color of the fixture atlas cell for (glyph, bg, fg).
pub fn cell_color(glyph: usize, bg: usize, fg: usize) -> [u8; 4] {
    [(glyph * 100) as u8, (bg * 100) as u8, (fg * 100) as u8, 255]
}

/// Fixture atlas for `RAMP` over a two-color palette.
pub fn fixture_atlas() -> Raster {
    let glyphs = RAMP.chars().count();
    let colors = 2;
    let width = glyphs * CELL_WIDTH;
    let height = colors * colors * CELL_HEIGHT;
    let mut raster = Raster::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let glyph = x / CELL_WIDTH;
            let row = y / CELL_HEIGHT;
            raster.pixels_mut()[y * width + x] = cell_color(glyph, row / colors, row % colors);
        }
    }
    raster
}

/// 4x4 source: left half black, right half white.
pub fn split_source() -> Raster {
    let pixels = (0..16)
        .map(|i| if i % 4 < 2 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
        .collect();
    Raster::from_pixels(4, 4, pixels).unwrap()
}

/// 16x8 horizontal grey gradient.
pub fn gradient_source() -> Raster {
    let pixels = (0..16 * 8)
        .map(|i| {
            let v = ((i % 16) * 17) as u8;
            [v, v, v, 255]
        })
        .collect();
    Raster::from_pixels(16, 8, pixels).unwrap()
}

/// A scratch directory holding fixture files.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let workspace = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        workspace.write_png("atlas.png", &fixture_atlas(), false);
        workspace.write_png("split.png", &split_source(), false);
        workspace.write_png("gradient.png", &gradient_source(), false);
        workspace
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_png(&self, name: &str, raster: &Raster, with_alpha: bool) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, encode_png(raster, with_alpha).unwrap()).unwrap();
        path
    }

    /// CPU config for the fixture atlas, without aspect correction.
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            atlas: Some(self.path("atlas.png")),
            colors: vec![BLACK.to_string(), WHITE.to_string()],
            ramp: RAMP.to_string(),
            backend: "cpu".to_string(),
            aspect_correction: false,
            ..Default::default()
        }
    }

    /// Names of all files in the workspace, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
