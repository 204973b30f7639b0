//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Percentage in the `[0, 100]` range.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{_0}%")]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred [`Percent`].
    pub const FULL: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a new [`Percent`] by checking the provided value is within
    /// the `[0, 100]` range.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Creates a new [`Percent`] clamping the provided value into the
    /// `[0, 100]` range.
    #[must_use]
    pub fn saturating(val: Decimal) -> Self {
        Self(val.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Calculates the whole [`Percent`] the `part` takes out of the `total`,
    /// rounding half away from zero.
    ///
    /// Zero `total` results in [`Percent::ZERO`]. A `part` greater than the
    /// `total` saturates to [`Percent::FULL`].
    #[must_use]
    pub fn ratio(part: u64, total: u64) -> Self {
        Self::rounded_ratio(Decimal::from(part.min(total)), Decimal::from(total))
    }

    /// Calculates the whole [`Percent`] the `part` takes out of the `part`
    /// and the `rest` together, rounding half away from zero.
    ///
    /// Both being zero results in [`Percent::ZERO`].
    #[must_use]
    pub fn share(part: u64, rest: u64) -> Self {
        Self::rounded_ratio(
            Decimal::from(part),
            Decimal::from(part) + Decimal::from(rest),
        )
    }

    /// Divides the `part` by the non-negative `total`, where `part <= total`.
    fn rounded_ratio(part: Decimal, total: Decimal) -> Self {
        if total.is_zero() {
            return Self::ZERO;
        }
        let val = part * Decimal::ONE_HUNDRED / total;
        Self(val.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Returns the underlying [`Decimal`] value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Rounds this [`Percent`] to the provided number of decimal places,
    /// rounding half away from zero.
    #[must_use]
    pub fn round_dp(self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = &'static str;

    fn try_from(val: Decimal) -> Result<Self, Self::Error> {
        Self::new(val).ok_or("percent value out of `[0, 100]` range")
    }
}

impl From<Percent> for Decimal {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim().trim_end_matches('%'))
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn percent(s: &str) -> Percent {
        s.parse().unwrap()
    }

    #[test]
    fn validates_range() {
        assert!(Percent::new(Decimal::ZERO).is_some());
        assert!(Percent::new(Decimal::ONE_HUNDRED).is_some());
        assert!(Percent::new(Decimal::NEGATIVE_ONE).is_none());
        assert!(Percent::new(Decimal::from(101)).is_none());
        assert!("100.5".parse::<Percent>().is_err());
    }

    #[test]
    fn ratio_guards_division_by_zero() {
        assert_eq!(Percent::ratio(0, 0), Percent::ZERO);
    }

    #[test]
    fn ratio_rounds_half_away_from_zero() {
        assert_eq!(Percent::ratio(1, 3), percent("33"));
        assert_eq!(Percent::ratio(2, 3), percent("67"));
        assert_eq!(Percent::ratio(1, 8), percent("13"));
        assert_eq!(Percent::ratio(7, 7), Percent::FULL);
    }

    #[test]
    fn ratio_stays_within_range() {
        for total in 0..50_u64 {
            for part in 0..=total + 1 {
                let p = Percent::ratio(part, total);
                assert!(p >= Percent::ZERO && p <= Percent::FULL);
            }
        }
    }

    #[test]
    fn shares_counts_of_any_size() {
        assert_eq!(Percent::share(0, 0), Percent::ZERO);
        assert_eq!(Percent::share(1, 7), percent("13"));
        assert_eq!(Percent::share(u64::MAX, 0), Percent::FULL);
        assert_eq!(Percent::share(u64::MAX, u64::MAX), percent("50"));
        assert_eq!(Percent::share(0, u64::MAX), Percent::ZERO);
    }

    #[test]
    fn displays_with_sign() {
        assert_eq!(percent("87").to_string(), "87%");
        assert_eq!(percent("12.5%").to_string(), "12.5%");
    }

    #[test]
    fn deserialization_validates_range() {
        assert_eq!(
            serde_json::from_str::<Percent>(r#""42""#).unwrap(),
            percent("42"),
        );
        assert!(serde_json::from_str::<Percent>(r#""142""#).is_err());
    }
}
