//! Palette types and nearest-pair search
//!
//! This module provides the [`Palette`] type, the [`NearestPair`] result of
//! matching a sample against it, and palette validation errors.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{NearestPair, Palette};
