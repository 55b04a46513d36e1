//! Image adapters around the matching engine: PNG I/O, sRGB to Lab,
//! resizing and atlas rasterization.

pub mod atlas_gen;
pub mod color;
pub mod png_io;
pub mod resize;

pub use atlas_gen::{atlas_svg, AtlasGenerator, AtlasSpec};
pub use color::{
    channels_to_lab, flatten_alpha, parse_hex, parse_hex_list, raw_channels, rgb8_to_lab,
    swatches_from_raster, CHANNEL_MAX,
};
pub use png_io::{decode_png, encode_png, load_png, write_all_atomic, write_atomic, LoadedPng};
pub use resize::{resize, target_size};
