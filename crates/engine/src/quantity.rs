//! The module contains the representation of a quantity of material.
//!
//! Quantities are fixed-point with two decimals, stored as hundredths of a
//! unit in an `i64`. Parts are counted in whatever unit the catalog gives
//! them (pieces, pairs, metres), so fractional quantities are ordinary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::util::parse_fixed2;

/// A quantity of a part, in hundredths of its unit.
///
/// ```
/// use engine::Quantity;
///
/// let metres: Quantity = "2,5".parse().unwrap();
/// assert_eq!(metres.to_string(), "2.5");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);
    pub const ONE: Quantity = Quantity(100);

    /// The smallest quantity a saved project line may carry (0.1).
    pub const MIN: Quantity = Quantity(10);

    /// Builds a quantity directly from hundredths of a unit.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Quantity(hundredths)
    }

    pub const fn as_hundredths(self) -> i64 {
        self.0
    }

    /// Raises the quantity to [`Quantity::MIN`] when it is below it.
    ///
    /// Saved project lines go through this, so a line never multiplies a
    /// price by zero; values loaded from tampered files are left as they
    /// are and simply flow through the arithmetic.
    pub fn clamp_min(self) -> Quantity {
        if self.0 < Self::MIN.0 { Self::MIN } else { self }
    }

    /// Converts a plain number, as found in assistant replies, rounding to
    /// the nearest hundredth.
    pub fn try_from_f64(value: f64) -> Result<Quantity, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidQuantity(format!("\"{value}\"")));
        }
        let hundredths = (value * 100.0).round();
        if hundredths.abs() > i64::MAX as f64 {
            return Err(EngineError::InvalidQuantity(format!("\"{value}\"")));
        }
        Ok(Quantity(hundredths as i64))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let hundredths = self.0.abs();
        let whole = hundredths / 100;
        let frac = hundredths % 100;
        if frac == 0 {
            write!(f, "{sign}{whole}")
        } else if frac % 10 == 0 {
            write!(f, "{sign}{whole}.{}", frac / 10)
        } else {
            write!(f, "{sign}{whole}.{frac:02}")
        }
    }
}

impl FromStr for Quantity {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_fixed2(s) {
            Ok(hundredths) => Ok(Quantity(hundredths)),
            Err(reason) => Err(EngineError::InvalidQuantity(format!("\"{s}\": {reason}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Quantity::from_hundredths(200).to_string(), "2");
        assert_eq!(Quantity::from_hundredths(250).to_string(), "2.5");
        assert_eq!(Quantity::from_hundredths(225).to_string(), "2.25");
        assert_eq!(Quantity::from_hundredths(5).to_string(), "0.05");
        assert_eq!(Quantity::from_hundredths(-10).to_string(), "-0.1");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Quantity>().unwrap(), Quantity::from_hundredths(1000));
        assert_eq!("0,1".parse::<Quantity>().unwrap(), Quantity::MIN);
        assert!("0,125".parse::<Quantity>().is_err());
    }

    #[test]
    fn clamp_raises_only_low_values() {
        assert_eq!(Quantity::ZERO.clamp_min(), Quantity::MIN);
        assert_eq!(Quantity::from_hundredths(-300).clamp_min(), Quantity::MIN);
        assert_eq!(Quantity::MIN.clamp_min(), Quantity::MIN);
        assert_eq!(Quantity::ONE.clamp_min(), Quantity::ONE);
    }

    #[test]
    fn from_f64_rounds_to_hundredths() {
        assert_eq!(Quantity::try_from_f64(2.0).unwrap(), Quantity::from_hundredths(200));
        assert_eq!(Quantity::try_from_f64(0.1).unwrap(), Quantity::MIN);
        assert_eq!(Quantity::try_from_f64(2.34).unwrap(), Quantity::from_hundredths(234));
        assert_eq!(Quantity::try_from_f64(0.333).unwrap(), Quantity::from_hundredths(33));
        assert!(Quantity::try_from_f64(f64::NAN).is_err());
        assert!(Quantity::try_from_f64(f64::INFINITY).is_err());
    }
}
