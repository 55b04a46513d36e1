//! CIE L*a*b* color samples
//!
//! All matching in this crate happens in CIE L*a*b* (D65), where Euclidean
//! distance approximates perceived color difference. Conversion from RGB is
//! not part of this crate; callers supply samples produced by a color library.
//!
//! # References
//!
//! CIE 15:2004, "Colorimetry", 3rd edition.

/// A color in CIE L*a*b* space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 100.0 = diffuse white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
///
/// Values are not clamped. Samples converted from out-of-gamut or HDR inputs
/// may fall outside the usual ranges and are matched as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness: 0.0 (black) to 100.0 (white)
    pub l: f32,
    /// Green-red axis: typically -128.0 to 127.0
    pub a: f32,
    /// Blue-yellow axis: typically -128.0 to 127.0
    pub b: f32,
}

impl Lab {
    /// Create a new Lab color.
    ///
    /// # Example
    ///
    /// ```
    /// use glyph_match::Lab;
    ///
    /// // Mid-grey, no chroma
    /// let grey = Lab::new(50.0, 0.0, 0.0);
    /// assert_eq!(grey.chroma(), 0.0);
    /// ```
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    /// Returns true if every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }
}

impl From<[f32; 3]> for Lab {
    fn from([l, a, b]: [f32; 3]) -> Self {
        Self { l, a, b }
    }
}

impl From<Lab> for [f32; 3] {
    fn from(lab: Lab) -> Self {
        [lab.l, lab.a, lab.b]
    }
}
