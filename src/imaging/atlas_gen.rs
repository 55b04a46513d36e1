//! Glyph atlas generation.
//!
//! The atlas is described as an SVG grid (one background rectangle and one
//! centered glyph per cell) and rasterized with resvg. Cell `(g, b·N + f)`
//! shows glyph `g` in color `f` on background `b`, which is the layout
//! [`glyph_match::Atlas`] expects.

use crate::error::ImageError;
use crate::imaging::color::to_hex;
use glyph_match::{GlyphRamp, Raster};
use resvg::usvg::{self, fontdb, Transform};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Geometry and font settings for one atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasSpec {
    pub cell_width: u32,
    pub cell_height: u32,
    pub font_family: String,
    pub font_size: f32,
}

/// Renders glyph atlases with a shared font database.
pub struct AtlasGenerator {
    fontdb: Arc<fontdb::Database>,
}

impl AtlasGenerator {
    /// Load system fonts, plus `font_file` first when given.
    pub fn new(font_file: Option<&Path>) -> Result<Self, ImageError> {
        let mut db = fontdb::Database::new();

        if let Some(path) = font_file {
            db.load_font_file(path).map_err(|source| ImageError::Font {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(font = %path.display(), "Loaded font");
        }

        db.load_system_fonts();
        tracing::info!(font_count = db.len(), "Loaded fonts for atlas rendering");

        Ok(Self {
            fontdb: Arc::new(db),
        })
    }

    /// Rasterize an atlas for `ramp` over every ordered pair of `colors`.
    pub fn render(
        &self,
        ramp: &GlyphRamp,
        colors: &[[u8; 3]],
        spec: &AtlasSpec,
    ) -> Result<Raster, ImageError> {
        let svg = atlas_svg(ramp, colors, spec);
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree =
            usvg::Tree::from_data(svg.as_bytes(), &options).map_err(|e| ImageError::SvgParse(e.to_string()))?;

        let width = ramp.len() as u32 * spec.cell_width;
        let height = (colors.len() * colors.len()) as u32 * spec.cell_height;
        let mut pixmap = Pixmap::new(width, height).ok_or(ImageError::PixmapAllocation { width, height })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        tracing::info!(
            width,
            height,
            glyphs = ramp.len(),
            colors = colors.len(),
            "Rendered glyph atlas"
        );

        // Fully covered by opaque rectangles, so premultiplication is a no-op.
        let pixels = pixmap
            .data()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], 255])
            .collect();
        Raster::from_pixels(width as usize, height as usize, pixels)
            .map_err(|_| ImageError::PixmapAllocation { width, height })
    }
}

/// SVG document for an atlas.
pub fn atlas_svg(ramp: &GlyphRamp, colors: &[[u8; 3]], spec: &AtlasSpec) -> String {
    let (cw, ch) = (spec.cell_width, spec.cell_height);
    let width = ramp.len() as u32 * cw;
    let height = (colors.len() * colors.len()) as u32 * ch;
    // Approximate vertical centering: baseline a third of the em below center.
    let baseline = ch as f32 / 2.0 + spec.font_size * 0.35;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<g font-family="{}" font-size="{}" text-anchor="middle">"#,
        escape_xml(&spec.font_family),
        spec.font_size
    );

    for (bg_idx, &bg) in colors.iter().enumerate() {
        for (fg_idx, &fg) in colors.iter().enumerate() {
            let y = (bg_idx * colors.len() + fg_idx) as u32 * ch;
            let fill = to_hex(fg);
            let _ = write!(
                svg,
                r#"<rect x="0" y="{y}" width="{width}" height="{ch}" fill="{}" shape-rendering="crispEdges"/>"#,
                to_hex(bg)
            );
            for (glyph_idx, &symbol) in ramp.symbols().iter().enumerate() {
                if symbol.is_whitespace() {
                    continue;
                }
                let x = glyph_idx as u32 * cw;
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{fill}">{}</text>"#,
                    x as f32 + cw as f32 / 2.0,
                    y as f32 + baseline,
                    escape_xml(&symbol.to_string())
                );
            }
        }
    }

    svg.push_str("</g></svg>");
    svg
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_match::{Atlas, Palette};

    fn spec() -> AtlasSpec {
        AtlasSpec {
            cell_width: 6,
            cell_height: 10,
            font_family: "monospace".to_string(),
            font_size: 8.0,
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<&>\"'a"), "&lt;&amp;&gt;&quot;&apos;a");
    }

    #[test]
    fn test_svg_skips_whitespace_glyphs() {
        let ramp = GlyphRamp::new(" #").unwrap();
        let svg = atlas_svg(&ramp, &[[0, 0, 0], [255, 255, 255]], &spec());
        assert_eq!(svg.matches("<rect").count(), 4);
        assert_eq!(svg.matches("<text").count(), 4);
        assert!(svg.contains(r##"fill="#ffffff">#</text>"##));
    }

    #[test]
    fn test_svg_escapes_markup_glyphs() {
        let ramp = GlyphRamp::new("<&").unwrap();
        let svg = atlas_svg(&ramp, &[[0, 0, 0], [255, 255, 255]], &spec());
        assert!(svg.contains(">&lt;</text>"));
        assert!(svg.contains(">&amp;</text>"));
    }

    #[test]
    fn test_rendered_atlas_layout() {
        let ramp = GlyphRamp::new(" #").unwrap();
        let colors = [[0, 0, 0], [255, 0, 0], [0, 0, 255]];
        let generator = AtlasGenerator::new(None).unwrap();
        let raster = generator.render(&ramp, &colors, &spec()).unwrap();

        assert_eq!(raster.width(), 2 * 6);
        assert_eq!(raster.height(), 9 * 10);

        // The space column is pure background.
        for (bg_idx, &bg) in colors.iter().enumerate() {
            for fg_idx in 0..colors.len() {
                let y0 = (bg_idx * colors.len() + fg_idx) * 10;
                for y in y0..y0 + 10 {
                    for x in 0..6 {
                        assert_eq!(raster.pixel(x, y), [bg[0], bg[1], bg[2], 255], "({x}, {y})");
                    }
                }
            }
        }

        let palette = Palette::new(colors.iter().map(|&c| crate::imaging::color::rgb8_to_lab(c)).collect()).unwrap();
        assert!(Atlas::new(raster, &ramp, &palette).is_ok());
    }

    #[test]
    fn test_missing_font_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AtlasGenerator::new(Some(&dir.path().join("nope.ttf")));
        assert!(matches!(result, Err(ImageError::Font { .. })));
    }
}
