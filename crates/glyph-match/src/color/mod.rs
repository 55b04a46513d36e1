//! Color samples and channel scaling
//!
//! The core only ever sees [`Lab`] samples. Producing them from image bytes is
//! the caller's job: scale raw channels with [`normalize`], then hand the
//! normalized RGB values to a color library for the L*a*b* conversion.
//!
//! # Example
//!
//! ```
//! use glyph_match::normalize;
//!
//! let mut channels = vec![0.0, 127.5, 255.0];
//! normalize(&mut channels, 255.0);
//! assert_eq!(channels, vec![0.0, 0.5, 1.0]);
//! ```

mod lab;

pub use lab::Lab;

/// Divide every value by `divisor` in place.
///
/// Host-side twin of the GPU normalization kernel. Both divide rather than
/// multiply by a reciprocal.
pub fn normalize(values: &mut [f32], divisor: f32) {
    for value in values.iter_mut() {
        *value /= divisor;
    }
}
