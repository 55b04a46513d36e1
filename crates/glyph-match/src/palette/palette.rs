//! Palette struct with nearest-pair matching.
//!
//! This module provides the core `Palette` type: an immutable, ordered list
//! of reference colors and the search that finds the two entries closest to
//! a sample.

use super::error::PaletteError;
use crate::color::Lab;
use crate::metric::{DistanceMetric, Metric};

/// Result of a nearest-pair search.
///
/// `closest` is the background color of the selected tile and `second` the
/// foreground color. Invariants (guaranteed by [`Palette::nearest_pair`]):
///
/// - `d1 <= d2`, and no entry other than `closest` is nearer than `d2`
/// - `closest == second` only when entry 0 is nearest; both slots then hold 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPair {
    /// Index of the nearest palette entry
    pub closest: usize,
    /// Index of the second-nearest palette entry
    pub second: usize,
    /// Distance from the sample to `closest`
    pub d1: f32,
    /// Distance from the sample to `second`
    pub d2: f32,
}

/// An ordered set of reference colors in CIE L*a*b*.
///
/// A palette holds at least two finite colors; repeats are allowed. Its order is
/// significant: atlas rows are laid out by palette index, and ties in the
/// nearest-pair search resolve to the lower index.
///
/// # Example
///
/// ```
/// use glyph_match::{Lab, Palette};
///
/// let palette = Palette::new(vec![
///     Lab::new(0.0, 0.0, 0.0),
///     Lab::new(100.0, 0.0, 0.0),
/// ]).unwrap();
///
/// assert_eq!(palette.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Lab>,
}

impl Palette {
    /// Create a palette from Lab colors.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - fewer than two colors are given ([`PaletteError::TooFewColors`])
    /// - a color has a NaN or infinite component ([`PaletteError::NonFiniteColor`])
    pub fn new(colors: Vec<Lab>) -> Result<Self, PaletteError> {
        if colors.len() < 2 {
            return Err(PaletteError::TooFewColors {
                count: colors.len(),
            });
        }

        if let Some(index) = colors.iter().position(|c| !c.is_finite()) {
            return Err(PaletteError::NonFiniteColor { index });
        }

        Ok(Self { colors })
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes hold at least two colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    #[inline]
    pub fn color(&self, idx: usize) -> Lab {
        self.colors[idx]
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Lab] {
        &self.colors
    }

    /// Find the nearest and second-nearest palette colors to `goal`.
    ///
    /// Both slots start at entry 0, then one linear pass over the rest keeps
    /// the two smallest distances. Comparisons are strict, so an entry never
    /// displaces an earlier one at equal distance. When entry 0 stays nearest
    /// it also stays in the second slot, giving `closest == second == 0` and
    /// `d1 == d2`.
    ///
    /// # Example
    ///
    /// ```
    /// use glyph_match::{Cie76, Lab, Palette};
    ///
    /// let palette = Palette::new(vec![
    ///     Lab::new(0.0, 0.0, 0.0),
    ///     Lab::new(100.0, 0.0, 0.0),
    /// ]).unwrap();
    ///
    /// let pair = palette.nearest_pair::<Cie76>(Lab::new(25.0, 0.0, 0.0));
    /// assert_eq!((pair.closest, pair.second), (0, 1));
    /// assert_eq!((pair.d1, pair.d2), (25.0, 75.0));
    ///
    /// let pair = palette.nearest_pair::<Cie76>(Lab::new(10.0, 0.0, 0.0));
    /// assert_eq!((pair.closest, pair.second), (0, 0));
    /// ```
    #[inline]
    pub fn nearest_pair<M: Metric>(&self, goal: Lab) -> NearestPair {
        let d0 = M::distance(goal, self.colors[0]);
        let mut best = NearestPair {
            closest: 0,
            second: 0,
            d1: d0,
            d2: d0,
        };

        for (i, &color) in self.colors.iter().enumerate().skip(1) {
            let delta = M::distance(goal, color);
            if delta < best.d1 {
                best.d2 = best.d1;
                best.second = best.closest;
                best.d1 = delta;
                best.closest = i;
            } else if delta < best.d2 {
                best.d2 = delta;
                best.second = i;
            }
        }

        best
    }

    /// [`nearest_pair`](Self::nearest_pair) with a runtime metric selector.
    ///
    /// Dispatches on every call; per-pixel loops should use the generic form.
    pub fn nearest_pair_with(&self, goal: Lab, metric: DistanceMetric) -> NearestPair {
        match metric {
            DistanceMetric::Cie76 => self.nearest_pair::<crate::metric::Cie76>(goal),
            DistanceMetric::Cie94 => self.nearest_pair::<crate::metric::Cie94>(goal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{Cie76, Cie94};

    fn grey(l: f32) -> Lab {
        Lab::new(l, 0.0, 0.0)
    }

    fn black_white() -> Palette {
        Palette::new(vec![grey(0.0), grey(100.0)]).unwrap()
    }

    // Construction tests
    #[test]
    fn test_palette_basic_construction() {
        let palette = Palette::new(vec![grey(0.0), grey(50.0), grey(100.0)]).unwrap();
        assert_eq!(palette.len(), 3);
        assert!(!palette.is_empty());
        assert_eq!(palette.color(1), grey(50.0));
    }

    #[test]
    fn test_palette_empty_error() {
        let result = Palette::new(vec![]);
        assert_eq!(result.unwrap_err(), PaletteError::TooFewColors { count: 0 });
    }

    #[test]
    fn test_palette_single_color_error() {
        let result = Palette::new(vec![grey(50.0)]);
        assert_eq!(result.unwrap_err(), PaletteError::TooFewColors { count: 1 });
    }

    #[test]
    fn test_palette_accepts_repeated_colors() {
        let palette = Palette::new(vec![grey(0.0), grey(50.0), grey(0.0)]).unwrap();
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_palette_non_finite_error() {
        let result = Palette::new(vec![grey(0.0), Lab::new(50.0, f32::NAN, 0.0)]);
        assert_eq!(result.unwrap_err(), PaletteError::NonFiniteColor { index: 1 });
    }

    // nearest_pair tests
    #[test]
    fn test_nearest_pair_black_white_scenario() {
        // Entry 0 is nearest, so it fills both slots.
        let pair = black_white().nearest_pair::<Cie76>(grey(25.0));
        assert_eq!(pair.closest, 0);
        assert_eq!(pair.second, 0);
        assert_eq!(pair.d1, 25.0);
        assert_eq!(pair.d2, 25.0);
    }

    #[test]
    fn test_nearest_pair_exact_match_on_first_entry() {
        let pair = black_white().nearest_pair::<Cie76>(grey(0.0));
        assert_eq!(
            pair,
            NearestPair {
                closest: 0,
                second: 0,
                d1: 0.0,
                d2: 0.0
            }
        );
    }

    #[test]
    fn test_nearest_pair_exact_match_on_second_entry() {
        let pair = black_white().nearest_pair::<Cie76>(grey(100.0));
        assert_eq!(pair.closest, 1);
        assert_eq!(pair.second, 0);
        assert_eq!(pair.d1, 0.0);
        assert_eq!(pair.d2, 100.0);
    }

    #[test]
    fn test_nearest_pair_two_entries() {
        let palette = black_white();
        for l in [0.0, 10.0, 49.0, 50.0] {
            let pair = palette.nearest_pair::<Cie76>(grey(l));
            assert_eq!((pair.closest, pair.second), (0, 0), "L={}", l);
        }
        for l in [51.0, 90.0, 100.0] {
            let pair = palette.nearest_pair::<Cie76>(grey(l));
            assert_eq!((pair.closest, pair.second), (1, 0), "L={}", l);
        }
    }

    #[test]
    fn test_nearest_pair_first_entry_fills_both_slots() {
        // Later entries never beat d0, so none of them reaches the second slot.
        let palette = Palette::new(vec![grey(10.0), grey(90.0), grey(30.0), grey(60.0)]).unwrap();
        let pair = palette.nearest_pair::<Cie76>(grey(12.0));
        assert_eq!((pair.closest, pair.second), (0, 0));
        assert_eq!((pair.d1, pair.d2), (2.0, 2.0));
    }

    #[test]
    fn test_nearest_pair_tie_with_first_entry_keeps_it_in_both_slots() {
        // Sample at L=50 is equidistant from both entries.
        let pair = black_white().nearest_pair::<Cie76>(grey(50.0));
        assert_eq!(pair.closest, 0);
        assert_eq!(pair.second, 0);
        assert_eq!(pair.d1, pair.d2);
    }

    #[test]
    fn test_nearest_pair_repeated_color_keeps_earlier_index() {
        let palette = Palette::new(vec![grey(100.0), grey(40.0), grey(40.0)]).unwrap();
        let pair = palette.nearest_pair::<Cie76>(grey(42.0));
        assert_eq!((pair.closest, pair.second), (1, 2));
        assert_eq!((pair.d1, pair.d2), (2.0, 2.0));
    }

    #[test]
    fn test_nearest_pair_tie_later_in_scan() {
        // Entries 1 and 2 tie and both beat entry 0.
        let palette = Palette::new(vec![grey(100.0), grey(40.0), grey(60.0)]).unwrap();
        let pair = palette.nearest_pair::<Cie76>(grey(50.0));
        assert_eq!(pair.closest, 1);
        assert_eq!(pair.second, 2);
    }

    #[test]
    fn test_nearest_pair_promotes_previous_best() {
        let palette = Palette::new(vec![grey(0.0), grey(100.0), grey(70.0), grey(80.0)]).unwrap();
        let pair = palette.nearest_pair::<Cie76>(grey(78.0));
        assert_eq!(pair.closest, 3);
        assert_eq!(pair.second, 2);
    }

    #[test]
    fn test_nearest_pair_cie94_shrinks_chroma_distance() {
        // Same hue at different chroma: CIE94 scales the chroma gap down.
        let palette = Palette::new(vec![
            Lab::new(50.0, 0.0, 0.0),
            Lab::new(50.0, 70.0, 0.0),
            Lab::new(0.0, 0.0, 0.0),
        ])
        .unwrap();
        let goal = Lab::new(50.0, 40.0, 0.0);
        let p76 = palette.nearest_pair::<Cie76>(goal);
        let p94 = palette.nearest_pair::<Cie94>(goal);
        assert_eq!(p76.closest, 1);
        assert_eq!(p94.closest, 1);
        assert!(p94.d1 < p76.d1);
    }

    #[test]
    fn test_nearest_pair_with_matches_generic() {
        let palette = Palette::new(vec![
            Lab::new(30.0, 20.0, -10.0),
            Lab::new(70.0, -15.0, 40.0),
            Lab::new(55.0, 5.0, 5.0),
        ])
        .unwrap();
        let goal = Lab::new(60.0, 0.0, 20.0);
        assert_eq!(
            palette.nearest_pair_with(goal, DistanceMetric::Cie76),
            palette.nearest_pair::<Cie76>(goal)
        );
        assert_eq!(
            palette.nearest_pair_with(goal, DistanceMetric::Cie94),
            palette.nearest_pair::<Cie94>(goal)
        );
    }
}
