//! Constraint priority algebra.
//!
//! Every constraint carries a strength that ranks it against the others when
//! the whole system cannot be satisfied. Strengths are encoded as a single
//! `f64` packing three priority bands, one thousand apart, so that any amount
//! of violation in a lower band is always preferred over the smallest
//! violation in a higher band.

use std::fmt;

/// Largest weight accepted by the band factories, just below 1000 so a fully
/// weighted band never collides with the next band up.
const MAX_WEIGHT: f64 = 999.999_999_999_999_9;

/// The priority of a constraint.
///
/// Strengths order naturally as numbers. [`Strength::REQUIRED`] is special:
/// a required constraint must hold exactly, while every weaker constraint is
/// satisfied as well as the required ones allow, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Strength(f64);

impl Strength {
    /// No preference at all.
    pub const OPTIONAL: Strength = Strength(0.0);
    /// The weak band: `weak(1)`.
    pub const WEAK: Strength = Strength(1.0);
    /// The medium band: `medium(1)`.
    pub const MEDIUM: Strength = Strength(1_000.0);
    /// The strong band: `strong(1)`.
    pub const STRONG: Strength = Strength(1_000_000.0);
    /// The strength of a mandatory constraint.
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);

    /// Build a weak strength with a weight clamped to `[1, 1000)`.
    #[must_use]
    pub fn weak(weight: f64) -> Strength {
        Strength(weight.clamp(1.0, MAX_WEIGHT))
    }

    /// Build a medium strength with a weight clamped to `[1, 1000)`.
    #[must_use]
    pub fn medium(weight: f64) -> Strength {
        Strength(1_000.0 * weight.clamp(1.0, MAX_WEIGHT))
    }

    /// Build a strong strength with a weight clamped to `[1, 1000)`.
    #[must_use]
    pub fn strong(weight: f64) -> Strength {
        Strength(1_000_000.0 * weight.clamp(1.0, MAX_WEIGHT))
    }

    /// Combine independent weights for the strong, medium, and weak bands
    /// into one strength. Each band contribution is scaled by `weight` and
    /// clamped to `[0, 1000]` before packing, so a band can never spill into
    /// the one above it.
    #[must_use]
    pub fn create(strong: f64, medium: f64, weak: f64, weight: f64) -> Strength {
        let mut value = (strong * weight).clamp(0.0, 1000.0) * 1_000_000.0;
        value += (medium * weight).clamp(0.0, 1000.0) * 1_000.0;
        value += (weak * weight).clamp(0.0, 1000.0);
        Strength(value)
    }

    /// Wrap a raw numeric strength.
    #[must_use]
    pub fn from_value(value: f64) -> Strength {
        Strength(value)
    }

    /// The raw numeric value of this strength.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Clamp this strength into `[OPTIONAL, REQUIRED]`.
    #[must_use]
    pub fn clip(self) -> Strength {
        Strength(self.0.clamp(Self::OPTIONAL.0, Self::REQUIRED.0))
    }

    /// Whether this is exactly the required strength.
    #[must_use]
    pub fn is_required(self) -> bool {
        self == Self::REQUIRED
    }

    /// The unweighted level of the band this strength falls in, or the
    /// strength itself when it lies outside every weighted band.
    #[must_use]
    pub fn base(self) -> Strength {
        if Self::weak(1.0) <= self && self <= Self::weak(1000.0) {
            Self::WEAK
        } else if Self::medium(1.0) <= self && self <= Self::medium(1000.0) {
            Self::MEDIUM
        } else if Self::strong(1.0) <= self && self <= Self::strong(1000.0) {
            Self::STRONG
        } else {
            self
        }
    }

    /// Re-weight this strength within its band. Strengths outside every
    /// weighted band are returned unchanged.
    #[must_use]
    pub fn with_weight(self, weight: f64) -> Strength {
        let base = self.base();
        if base == Self::WEAK {
            Self::weak(weight)
        } else if base == Self::MEDIUM {
            Self::medium(weight)
        } else if base == Self::STRONG {
            Self::strong(weight)
        } else {
            self
        }
    }
}

impl From<f64> for Strength {
    fn from(value: f64) -> Strength {
        Strength(value)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::OPTIONAL {
            return f.write_str("OPTIONAL");
        }
        if *self == Self::WEAK {
            return f.write_str("WEAK");
        }
        if *self == Self::MEDIUM {
            return f.write_str("MEDIUM");
        }
        if *self == Self::STRONG {
            return f.write_str("STRONG");
        }
        if *self == Self::REQUIRED {
            return f.write_str("REQUIRED");
        }
        let base = self.base();
        if base == Self::WEAK {
            write!(f, "weak({})", self.0)
        } else if base == Self::MEDIUM {
            write!(f, "medium({})", self.0 / 1_000.0)
        } else if base == Self::STRONG {
            write!(f, "strong({})", self.0 / 1_000_000.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_levels() {
        assert_eq!(Strength::OPTIONAL.value(), 0.0);
        assert_eq!(Strength::WEAK.value(), 1.0);
        assert_eq!(Strength::MEDIUM.value(), 1_000.0);
        assert_eq!(Strength::STRONG.value(), 1_000_000.0);
        assert_eq!(Strength::REQUIRED.value(), 1_001_001_000.0);
    }

    #[test]
    fn weighted_factories() {
        assert_eq!(Strength::weak(1.0).value(), 1.0);
        assert_eq!(Strength::weak(321.0).value(), 321.0);
        assert_eq!(Strength::medium(1.0).value(), 1_000.0);
        assert_eq!(Strength::medium(321.0).value(), 321_000.0);
        assert_eq!(Strength::strong(1.0).value(), 1_000_000.0);
        assert_eq!(Strength::strong(321.0).value(), 321_000_000.0);
    }

    #[test]
    fn weights_are_clamped_to_their_band() {
        assert_eq!(Strength::weak(0.0).value(), 1.0);
        assert!(Strength::weak(5_000.0) < Strength::MEDIUM);
        assert!(Strength::medium(5_000.0) < Strength::STRONG);
        assert!(Strength::strong(5_000.0) < Strength::REQUIRED);
    }

    #[test]
    fn band_encoding() {
        assert_eq!(
            Strength::create(1000.0, 1000.0, 1000.0, 1.0),
            Strength::REQUIRED
        );
        assert_eq!(Strength::create(1.0, 0.0, 0.0, 1.0), Strength::STRONG);
        assert_eq!(Strength::create(0.0, 1.0, 0.0, 1.0), Strength::MEDIUM);
        assert_eq!(Strength::create(0.0, 0.0, 1.0, 1.0), Strength::WEAK);
        assert_eq!(Strength::create(0.0, 0.0, 0.0, 1.0), Strength::OPTIONAL);
    }

    #[test]
    fn bands_dominate_lower_bands() {
        assert!(Strength::REQUIRED > Strength::strong(1000.0));
        assert!(Strength::strong(1.0) > Strength::medium(1000.0));
        assert!(Strength::medium(1.0) > Strength::weak(1000.0));
        assert!(Strength::weak(1.0) > Strength::OPTIONAL);
    }

    #[test]
    fn clip_bounds() {
        assert_eq!(Strength::from_value(-5.0).clip(), Strength::OPTIONAL);
        assert_eq!(Strength::from_value(2.0e9).clip(), Strength::REQUIRED);
        assert_eq!(Strength::medium(3.0).clip(), Strength::medium(3.0));
    }

    #[test]
    fn base_and_reweight() {
        assert_eq!(Strength::weak(321.0).base(), Strength::WEAK);
        assert_eq!(Strength::medium(2.0).base(), Strength::MEDIUM);
        assert_eq!(Strength::strong(999.0).base(), Strength::STRONG);
        assert_eq!(Strength::REQUIRED.base(), Strength::REQUIRED);
        assert_eq!(Strength::weak(2.0).with_weight(7.0), Strength::weak(7.0));
        assert_eq!(
            Strength::strong(2.0).with_weight(3.0),
            Strength::strong(3.0)
        );
        assert_eq!(Strength::REQUIRED.with_weight(3.0), Strength::REQUIRED);
    }

    #[test]
    fn display_names() {
        assert_eq!(Strength::REQUIRED.to_string(), "REQUIRED");
        assert_eq!(Strength::WEAK.to_string(), "WEAK");
        assert_eq!(Strength::weak(321.0).to_string(), "weak(321)");
        assert_eq!(Strength::medium(321.0).to_string(), "medium(321)");
    }
}
