//! Assertion helpers for tests.

use std::path::Path;

use glyph_match::Raster;
use glyphart::imaging::{load_png, LoadedPng};
use pretty_assertions::assert_eq;

/// Decode the PNG at `path`, failing the test with context if it is not one.
pub fn read_png(path: &Path) -> LoadedPng {
    load_png(path).unwrap_or_else(|e| panic!("{} is not a readable PNG: {e}", path.display()))
}

/// Assert the PNG at `path` has the given pixel size.
pub fn assert_png_size(path: &Path, width: usize, height: usize) -> Raster {
    let png = read_png(path);
    assert_eq!(
        (png.raster.width(), png.raster.height()),
        (width, height),
        "unexpected size for {}",
        path.display()
    );
    png.raster
}

/// Assert that the canvas block for cell (x, y) is filled with `color`.
pub fn assert_block(canvas: &Raster, cell: (usize, usize), size: (usize, usize), color: [u8; 4]) {
    let (cw, ch) = size;
    for y in cell.1 * ch..(cell.1 + 1) * ch {
        for x in cell.0 * cw..(cell.0 + 1) * cw {
            assert_eq!(canvas.pixel(x, y), color, "pixel ({x}, {y}) of cell {cell:?}");
        }
    }
}
