//! The module contains the representation of an amount of money.
//!
//! Amounts are stored as whole euro cents in an `i64`, so sums over a
//! project are exact integer arithmetic and never drift with the order the
//! lines are added in. The only rounding happens in [`MoneyCents::times`],
//! once per line, half away from zero.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::quantity::Quantity;
use crate::util::parse_fixed2;

/// An amount of money in euro cents.
///
/// ```
/// use engine::MoneyCents;
///
/// let price: MoneyCents = "85,50".parse().unwrap();
/// assert_eq!(price, MoneyCents::new(85, 50));
/// assert_eq!(price.to_string(), "85.50€");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Builds an amount from whole euros and cents.
    pub const fn new(euros: i64, cents: i64) -> Self {
        MoneyCents(euros * 100 + cents)
    }

    /// Builds an amount directly from cents.
    pub const fn cents(cents: i64) -> Self {
        MoneyCents(cents)
    }

    pub const fn as_cents(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit amount by a quantity, rounding the result to the
    /// cent, half away from zero.
    ///
    /// ```
    /// use engine::{MoneyCents, Quantity};
    ///
    /// let edge_band = MoneyCents::new(0, 45);
    /// let metres: Quantity = "2.5".parse().unwrap();
    /// assert_eq!(edge_band.times(metres).to_string(), "1.13€");
    /// ```
    pub fn times(self, quantity: Quantity) -> MoneyCents {
        let product = i128::from(self.0) * i128::from(quantity.as_hundredths());
        let quotient = product / 100;
        let remainder = product % 100;
        let rounded = if remainder.abs() >= 50 {
            quotient + product.signum()
        } else {
            quotient
        };
        // A product outside i64 saturates rather than wrapping.
        MoneyCents(rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}{}.{:02}€", cents / 100, cents % 100)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_fixed2(s) {
            Ok(cents) => Ok(MoneyCents(cents)),
            Err(reason) => Err(EngineError::InvalidAmount(format!("\"{s}\": {reason}"))),
        }
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> MoneyCents {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> MoneyCents {
        MoneyCents(-self.0)
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> MoneyCents {
        iter.fold(MoneyCents::ZERO, |acc, amount| acc + amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_eur() {
        assert_eq!(MoneyCents::new(85, 50).to_string(), "85.50€");
        assert_eq!(MoneyCents::cents(5).to_string(), "0.05€");
        assert_eq!(MoneyCents::cents(-1350).to_string(), "-13.50€");
        assert_eq!(MoneyCents::ZERO.to_string(), "0.00€");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("45.00".parse::<MoneyCents>().unwrap(), MoneyCents::new(45, 0));
        assert_eq!("4,20".parse::<MoneyCents>().unwrap(), MoneyCents::cents(420));
        assert_eq!("-1,5".parse::<MoneyCents>().unwrap(), MoneyCents::cents(-150));
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("1.234".parse::<MoneyCents>().is_err());
        assert!("".parse::<MoneyCents>().is_err());
        assert!("12€".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn times_rounds_half_away_from_zero() {
        let qty = |s: &str| s.parse::<Quantity>().unwrap();

        // 0.45€ * 2.5 = 1.125€, rounds up to 1.13€.
        assert_eq!(MoneyCents::cents(45).times(qty("2.5")), MoneyCents::cents(113));
        // Whole quantities stay exact.
        assert_eq!(MoneyCents::new(85, 50).times(qty("2")), MoneyCents::new(171, 0));
        assert_eq!(MoneyCents::new(4, 20).times(qty("10")), MoneyCents::new(42, 0));
        // Negative unit amounts mirror the positive rounding.
        assert_eq!(MoneyCents::cents(-45).times(qty("2.5")), MoneyCents::cents(-113));
        assert_eq!(MoneyCents::cents(33).times(qty("0.1")), MoneyCents::cents(3));
    }

    #[test]
    fn times_saturates_on_absurd_products() {
        let huge = Quantity::from_hundredths(i64::MAX);
        assert_eq!(MoneyCents::cents(i64::MAX).times(huge), MoneyCents::cents(i64::MAX));
        assert_eq!(MoneyCents::cents(i64::MIN).times(huge), MoneyCents::cents(i64::MIN));
    }

    #[test]
    fn arithmetic_is_exact() {
        let sale = MoneyCents::new(213, 0);
        let cost = MoneyCents::new(108, 0);
        assert_eq!(sale - cost, MoneyCents::new(105, 0));
        assert_eq!(-(sale - cost), MoneyCents::cents(-10500));

        let total: MoneyCents = [MoneyCents::cents(1), MoneyCents::cents(2)]
            .into_iter()
            .sum();
        assert_eq!(total, MoneyCents::cents(3));
    }
}
