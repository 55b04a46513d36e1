//! Perceptual distance metrics.
//!
//! Two metrics are available, both operating on CIE L*a*b* samples:
//!
//! | Metric | Formula | Name aliases |
//! |--------|---------|--------------|
//! | [`Cie76`] | `sqrt(dL² + da² + db²)` | `cie76`, `simple`, `euclidean` |
//! | [`Cie94`] | graphic-arts CIE94, symmetric chroma reference | `cie94`, `weighted` |
//!
//! The metric is chosen once per render. Hot loops are generic over the
//! zero-sized [`Metric`] types so every distance call is inlined; the runtime
//! [`DistanceMetric`] enum is matched once to pick the monomorphized loop.
//!
//! ## CIE94 constants
//!
//! ```text
//! kL = kC = kH = 1, K1 = 0.045, K2 = 0.015
//! SL = 1, SC = 1 + K1 * C, SH = 1 + K2 * C, C = sqrt(C1 * C2)
//! dH² = max(da² + db² - dC², 0)
//! dE94 = sqrt(dL² + (dC / SC)² + dH² / SH²)
//! ```
//!
//! Published CIE94 uses the chroma of a reference color for `SC` and `SH`,
//! which makes it asymmetric. The geometric mean of both chromas keeps
//! `distance(a, b) == distance(b, a)`. The GPU shader uses the same constants.

use std::fmt;
use std::str::FromStr;

use crate::color::Lab;

/// CIE94 chroma weighting constant (graphic arts).
pub const CIE94_K1: f32 = 0.045;
/// CIE94 hue weighting constant (graphic arts).
pub const CIE94_K2: f32 = 0.015;

/// A distance function between two Lab samples, selected at compile time.
pub trait Metric: Copy + Send + Sync + 'static {
    /// Which runtime selector this metric corresponds to.
    const KIND: DistanceMetric;

    /// Non-negative, symmetric distance between `a` and `b`.
    fn distance(a: Lab, b: Lab) -> f32;
}

/// CIE76: Euclidean distance in L*a*b*.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cie76;

/// CIE94 (graphic arts weights) with a symmetric chroma reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cie94;

impl Metric for Cie76 {
    const KIND: DistanceMetric = DistanceMetric::Cie76;

    #[inline]
    fn distance(a: Lab, b: Lab) -> f32 {
        let dl = a.l - b.l;
        let da = a.a - b.a;
        let db = a.b - b.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl Metric for Cie94 {
    const KIND: DistanceMetric = DistanceMetric::Cie94;

    #[inline]
    fn distance(a: Lab, b: Lab) -> f32 {
        let dl = a.l - b.l;
        let c1 = a.chroma();
        let c2 = b.chroma();
        let dc = c1 - c2;
        let da = a.a - b.a;
        let db = a.b - b.b;
        let dh_sq = (da * da + db * db - dc * dc).max(0.0);

        let c = (c1 * c2).sqrt();
        let sc = 1.0 + CIE94_K1 * c;
        let sh = 1.0 + CIE94_K2 * c;

        let tc = dc / sc;
        (dl * dl + tc * tc + dh_sq / (sh * sh)).sqrt()
    }
}

/// Runtime selector for the distance metric of a render session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceMetric {
    /// Plain Euclidean distance ([`Cie76`]).
    #[default]
    Cie76,
    /// Perceptually weighted distance ([`Cie94`]).
    Cie94,
}

impl DistanceMetric {
    /// Evaluate the selected metric once.
    ///
    /// Convenience for callers outside hot loops; loops should be generic
    /// over [`Metric`] instead.
    pub fn distance(self, a: Lab, b: Lab) -> f32 {
        match self {
            DistanceMetric::Cie76 => Cie76::distance(a, b),
            DistanceMetric::Cie94 => Cie94::distance(a, b),
        }
    }

    /// Canonical lowercase name (`"cie76"` or `"cie94"`).
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Cie76 => "cie76",
            DistanceMetric::Cie94 => "cie94",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a metric name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetricError(pub String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown distance metric '{}' (expected cie76, simple, cie94 or weighted)",
            self.0
        )
    }
}

impl std::error::Error for ParseMetricError {}

impl FromStr for DistanceMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cie76" | "simple" | "euclidean" => Ok(DistanceMetric::Cie76),
            "cie94" | "weighted" => Ok(DistanceMetric::Cie94),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Lab = Lab {
        l: 0.0,
        a: 0.0,
        b: 0.0,
    };
    const WHITE: Lab = Lab {
        l: 100.0,
        a: 0.0,
        b: 0.0,
    };

    #[test]
    fn test_cie76_lightness_only() {
        let sample = Lab::new(25.0, 0.0, 0.0);
        assert_eq!(Cie76::distance(sample, BLACK), 25.0);
        assert_eq!(Cie76::distance(sample, WHITE), 75.0);
    }

    #[test]
    fn test_cie76_pythagorean() {
        let a = Lab::new(50.0, 3.0, 4.0);
        let b = Lab::new(50.0, 0.0, 0.0);
        assert!((Cie76::distance(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_cie94_matches_cie76_for_greys() {
        // With zero chroma, SC and SH are 1 and dH is 0.
        let a = Lab::new(20.0, 0.0, 0.0);
        let b = Lab::new(70.0, 0.0, 0.0);
        assert_eq!(Cie94::distance(a, b), Cie76::distance(a, b));
    }

    #[test]
    fn test_cie94_discounts_chroma_differences() {
        // Same hue, different chroma: CIE94 shrinks the difference by SC.
        let a = Lab::new(50.0, 40.0, 0.0);
        let b = Lab::new(50.0, 60.0, 0.0);
        let d76 = Cie76::distance(a, b);
        let d94 = Cie94::distance(a, b);
        assert!(d94 < d76, "expected {} < {}", d94, d76);

        let c = (40.0f32 * 60.0).sqrt();
        let expected = 20.0 / (1.0 + CIE94_K1 * c);
        assert!((d94 - expected).abs() < 1e-4);
    }

    #[test]
    fn test_metrics_are_symmetric() {
        let samples = [
            Lab::new(12.0, 30.0, -20.0),
            Lab::new(88.0, -5.0, 60.0),
            Lab::new(50.0, 0.0, 0.0),
        ];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(Cie76::distance(a, b), Cie76::distance(b, a));
                assert_eq!(Cie94::distance(a, b), Cie94::distance(b, a));
            }
        }
    }

    #[test]
    fn test_zero_distance_to_self() {
        let c = Lab::new(42.0, 17.0, -33.0);
        assert_eq!(Cie76::distance(c, c), 0.0);
        assert_eq!(Cie94::distance(c, c), 0.0);
    }

    #[test]
    fn test_runtime_selector_matches_static() {
        let a = Lab::new(42.0, 17.0, -33.0);
        let b = Lab::new(60.0, -10.0, 5.0);
        assert_eq!(DistanceMetric::Cie76.distance(a, b), Cie76::distance(a, b));
        assert_eq!(DistanceMetric::Cie94.distance(a, b), Cie94::distance(a, b));
        assert_eq!(Cie76::KIND, DistanceMetric::Cie76);
        assert_eq!(Cie94::KIND, DistanceMetric::Cie94);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("cie76".parse(), Ok(DistanceMetric::Cie76));
        assert_eq!("Simple".parse(), Ok(DistanceMetric::Cie76));
        assert_eq!("euclidean".parse(), Ok(DistanceMetric::Cie76));
        assert_eq!("CIE94".parse(), Ok(DistanceMetric::Cie94));
        assert_eq!(" weighted ".parse(), Ok(DistanceMetric::Cie94));
        assert!("ciede2000".parse::<DistanceMetric>().is_err());
    }

    #[test]
    fn test_display_round_trips_name() {
        for metric in [DistanceMetric::Cie76, DistanceMetric::Cie94] {
            assert_eq!(metric.to_string().parse(), Ok(metric));
        }
    }
}
