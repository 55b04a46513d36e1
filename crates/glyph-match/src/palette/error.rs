//! Error types for palette construction.

use std::fmt;

/// Error type for palette validation.
///
/// Returned when a palette cannot support nearest-pair matching: too few
/// entries or entries that are not finite numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// Fewer than two colors
    TooFewColors {
        /// Number of colors supplied
        count: usize,
    },
    /// A component of the color at the specified index is NaN or infinite
    NonFiniteColor {
        /// Index of the offending color
        index: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::TooFewColors { count } => {
                write!(f, "palette needs at least 2 colors, got {}", count)
            }
            PaletteError::NonFiniteColor { index } => {
                write!(f, "color at index {} has a non-finite component", index)
            }
        }
    }
}

impl std::error::Error for PaletteError {}
