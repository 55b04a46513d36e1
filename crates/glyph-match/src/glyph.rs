//! Glyph ramp and glyph index calculation.
//!
//! A ramp lists symbols from sparsest to densest. The glyph for a pixel is
//! picked by how close the sample sits to its second-nearest palette color
//! relative to its nearest one:
//!
//! ```text
//! index = M - 1                          if d2 == 0
//! index = clamp(floor(d1 / d2 * (M - 1)), 0, M - 1)   otherwise
//! ```
//!
//! A sample right on its nearest color (`d1 = 0`) gets the sparsest glyph,
//! showing mostly background; a sample halfway between the two colors
//! (`d1 ≈ d2`) gets the densest.

use std::fmt;

/// Default ramp, sparse to dense.
pub const DEFAULT_RAMP: &str = " .:-=+*#%@";

/// Error type for glyph ramp construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RampError {
    /// The ramp has no symbols
    Empty,
}

impl fmt::Display for RampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RampError::Empty => write!(f, "glyph ramp cannot be empty"),
        }
    }
}

impl std::error::Error for RampError {}

/// Ordered symbols of increasing visual density.
///
/// # Example
///
/// ```
/// use glyph_match::GlyphRamp;
///
/// let ramp = GlyphRamp::new(" .:#").unwrap();
/// assert_eq!(ramp.len(), 4);
/// assert_eq!(ramp.symbol(3), '#');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    symbols: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string, one symbol per `char`.
    ///
    /// # Errors
    ///
    /// Returns [`RampError::Empty`] for an empty string.
    pub fn new(symbols: &str) -> Result<Self, RampError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(RampError::Empty);
        }
        Ok(Self { symbols })
    }

    /// Number of symbols (M).
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; empty ramps are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol at ramp position `idx`.
    #[inline]
    pub fn symbol(&self, idx: usize) -> char {
        self.symbols[idx]
    }

    /// All symbols in ramp order.
    #[inline]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_RAMP.chars().collect(),
        }
    }
}

impl fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Map the distances to the two nearest colors onto a ramp of `glyphs` symbols.
///
/// `d1` is the distance to the nearest color and `d2` to the second nearest.
/// The result always lies in `0..glyphs`: ratios above one (which a correct
/// nearest-pair search never produces) clamp to the densest glyph, and NaN
/// maps to zero.
///
/// # Panics
///
/// Panics if `glyphs` is zero.
///
/// # Example
///
/// ```
/// use glyph_match::glyph_index;
///
/// assert_eq!(glyph_index(25.0, 75.0, 2), 0);
/// assert_eq!(glyph_index(0.0, 0.0, 10), 9);
/// assert_eq!(glyph_index(1.0, 2.0, 10), 4);
/// ```
#[inline]
pub fn glyph_index(d1: f32, d2: f32, glyphs: usize) -> usize {
    assert!(glyphs > 0, "glyph ramp must not be empty");
    let last = glyphs - 1;
    if d2 == 0.0 {
        return last;
    }
    // `as usize` saturates: negatives and NaN become 0.
    let raw = (d1 / d2 * last as f32).floor();
    (raw as usize).min(last)
}
