//! Adapters between 8-bit sRGB pixels and the matcher's Lab samples.
//!
//! Conversion is done by the `palette` crate (sRGB, D65). Alpha is
//! composited over white before conversion.

use crate::error::ConfigError;
use glyph_match::{Lab, Raster};
use palette::{FromColor, Srgb};

/// Scale of raw 8-bit channel values.
pub const CHANNEL_MAX: f32 = 255.0;

/// Composite one RGBA8 pixel over white.
pub fn over_white([r, g, b, a]: [u8; 4]) -> [u8; 3] {
    match a {
        255 => [r, g, b],
        0 => [255, 255, 255],
        _ => {
            let a = a as u16;
            let blend = |c: u8| ((c as u16 * a + 255 * (255 - a)) / 255) as u8;
            [blend(r), blend(g), blend(b)]
        }
    }
}

/// Copy of `raster` with every pixel composited over white and made opaque.
pub fn flatten_alpha(raster: &Raster) -> Raster {
    let mut flat = raster.clone();
    for pixel in flat.pixels_mut() {
        let [r, g, b] = over_white(*pixel);
        *pixel = [r, g, b, 255];
    }
    flat
}

/// Raw RGB channel values (0..=255 as `f32`), three per pixel, alpha composited.
pub fn raw_channels(raster: &Raster) -> Vec<f32> {
    raster
        .pixels()
        .iter()
        .flat_map(|&p| over_white(p).map(f32::from))
        .collect()
}

/// Convert normalized (0..=1) RGB triples to Lab.
pub fn channels_to_lab(channels: &[f32]) -> Vec<Lab> {
    channels
        .chunks_exact(3)
        .map(|c| srgb_to_lab(Srgb::new(c[0], c[1], c[2])))
        .collect()
}

/// Convert an 8-bit sRGB color to Lab.
pub fn rgb8_to_lab([r, g, b]: [u8; 3]) -> Lab {
    srgb_to_lab(Srgb::new(r, g, b).into_format())
}

fn srgb_to_lab(color: Srgb<f32>) -> Lab {
    let lab: palette::Lab = palette::Lab::from_color(color);
    Lab::new(lab.l, lab.a, lab.b)
}

/// Parse a `#rrggbb` or `#rgb` hex color.
pub fn parse_hex(color: &str) -> Result<[u8; 3], ConfigError> {
    let trimmed = color.trim();
    if !trimmed.starts_with('#') {
        return Err(ConfigError::InvalidColor(color.to_string()));
    }
    let rgb: Srgb<u8> = trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidColor(color.to_string()))?;
    Ok([rgb.red, rgb.green, rgb.blue])
}

/// Parse a list of hex colors.
pub fn parse_hex_list<S: AsRef<str>>(colors: &[S]) -> Result<Vec<[u8; 3]>, ConfigError> {
    colors.iter().map(|c| parse_hex(c.as_ref())).collect()
}

/// Palette swatches from an image: every pixel, row-major, alpha composited.
pub fn swatches_from_raster(raster: &Raster) -> Vec<[u8; 3]> {
    raster.pixels().iter().map(|&p| over_white(p)).collect()
}

/// Format an 8-bit color as `#rrggbb`.
pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}
