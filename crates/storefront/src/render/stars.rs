//! Five-star rating glyphs.

/// Glyph class for a full star.
pub const FULL_STAR: &str = "fas fa-star";
/// Glyph class for a half star.
pub const HALF_STAR: &str = "fas fa-star-half-alt";
/// Glyph class for an empty star.
pub const EMPTY_STAR: &str = "far fa-star";

/// How many full, half and empty stars represent a rating.
///
/// `full = floor(rate)`, one half star when the fractional part is at least
/// one half, and empty stars fill the rest up to five. Rates outside 0..=5
/// are clamped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarRating {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    pub fn from_rate(rate: f64) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.0, 5.0) } else { 0.0 };
        let full = rate.floor() as u8;
        let half = u8::from(rate.fract() >= 0.5);
        Self {
            full,
            half,
            empty: 5 - full - half,
        }
    }

    /// Glyph classes in display order: full, then half, then empty.
    #[must_use]
    pub fn glyphs(&self) -> Vec<&'static str> {
        std::iter::repeat_n(FULL_STAR, usize::from(self.full))
            .chain(std::iter::repeat_n(HALF_STAR, usize::from(self.half)))
            .chain(std::iter::repeat_n(EMPTY_STAR, usize::from(self.empty)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(rate: f64) -> (u8, u8, u8) {
        let stars = StarRating::from_rate(rate);
        (stars.full, stars.half, stars.empty)
    }

    #[test]
    fn test_star_counts() {
        assert_eq!(counts(4.7), (4, 1, 0));
        assert_eq!(counts(3.2), (3, 0, 2));
        assert_eq!(counts(0.0), (0, 0, 5));
        assert_eq!(counts(5.0), (5, 0, 0));
        assert_eq!(counts(2.5), (2, 1, 2));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(counts(-1.0), (0, 0, 5));
        assert_eq!(counts(7.3), (5, 0, 0));
        assert_eq!(counts(f64::NAN), (0, 0, 5));
    }

    #[test]
    fn test_glyph_order() {
        assert_eq!(
            StarRating::from_rate(1.5).glyphs(),
            vec![FULL_STAR, HALF_STAR, EMPTY_STAR, EMPTY_STAR, EMPTY_STAR]
        );
    }

    #[test]
    fn test_always_five_glyphs() {
        for tenths in 0..=50 {
            let rate = f64::from(tenths) / 10.0;
            assert_eq!(StarRating::from_rate(rate).glyphs().len(), 5, "rate {rate}");
        }
    }
}
