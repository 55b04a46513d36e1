//! Source scaling before matching: column limit and cell aspect correction.

use crate::error::ImageError;
use glyph_match::Raster;
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

/// Size the source is scaled to before matching.
///
/// `columns` caps the width (keeping proportions); `cell` then stretches the
/// height by `cell_width / cell_height` so that tall glyph cells do not
/// elongate the picture. Dimensions never drop below 1.
pub fn target_size(
    width: u32,
    height: u32,
    columns: Option<u32>,
    cell: Option<(u32, u32)>,
) -> (u32, u32) {
    let (mut w, mut h) = (width as f64, height as f64);
    if let Some(columns) = columns {
        if width > columns {
            h *= columns as f64 / w;
            w = columns as f64;
        }
    }
    if let Some((cell_width, cell_height)) = cell {
        if cell_width > 0 && cell_height > 0 {
            h *= cell_width as f64 / cell_height as f64;
        }
    }
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Bilinear resize of an opaque raster.
pub fn resize(raster: &Raster, width: u32, height: u32) -> Result<Raster, ImageError> {
    if raster.width() == width as usize && raster.height() == height as usize {
        return Ok(raster.clone());
    }

    let src_width = raster.width() as u32;
    let src_height = raster.height() as u32;
    let src_size = IntSize::from_wh(src_width, src_height).ok_or(ImageError::PixmapAllocation {
        width: src_width,
        height: src_height,
    })?;
    let data: Vec<u8> = raster.pixels().iter().flatten().copied().collect();
    let src = Pixmap::from_vec(data, src_size).ok_or(ImageError::PixmapAllocation {
        width: src_width,
        height: src_height,
    })?;

    let mut dst = Pixmap::new(width, height).ok_or(ImageError::PixmapAllocation { width, height })?;
    dst.fill(tiny_skia::Color::WHITE);

    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    let transform = Transform::from_scale(
        width as f32 / src_width as f32,
        height as f32 / src_height as f32,
    );
    dst.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);

    let pixels = dst
        .data()
        .chunks_exact(4)
        .map(|p| [p[0], p[1], p[2], 255])
        .collect();
    Raster::from_pixels(width as usize, height as usize, pixels).map_err(|_| {
        ImageError::PixmapAllocation { width, height }
    })
}
