//! Public builder API and unified error type.

mod builder;
mod error;

pub use builder::GlyphRenderer;
pub use error::{check_sample_count, MatchError};
