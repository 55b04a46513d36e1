pub mod atlas_builder;
pub mod render_session;

pub use atlas_builder::{build_atlas, AtlasOutcome};
pub use render_session::{
    load_palette, load_swatches, palette_from_swatches, render_file, RenderOutcome, RenderRequest, RenderSession,
};
