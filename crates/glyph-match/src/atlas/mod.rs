//! Glyph atlas and pixel grids.

mod atlas;
mod error;
mod raster;

pub use atlas::{Atlas, CellRect};
pub use error::{AtlasError, RasterError};
pub use raster::Raster;
