//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input could not be parsed as a decimal number.
    #[error("price must be a number, got {0:?}")]
    Invalid(String),
    /// The amount is below the smallest sellable price.
    #[error("price must be at least {min}")]
    TooLow {
        /// Minimum allowed amount.
        min: Decimal,
    },
    /// The amount is above the largest sellable price.
    #[error("price must be at most {max}")]
    TooHigh {
        /// Maximum allowed amount.
        max: Decimal,
    },
}

/// A unit price in dollars, held at two decimal places.
///
/// ## Constraints
///
/// - Amount is at least `0.01` and at most `1000000.00`
/// - Amount is rounded to cents (midpoint away from zero) on construction
///
/// ## Examples
///
/// ```
/// use market_eaze_core::Price;
///
/// assert_eq!(Price::parse("2.5").map(|p| p.to_string()), Ok("$2.50".to_string()));
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Smallest sellable price (one cent).
    pub const MIN: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

    /// Largest sellable price. Keeps cart totals far from `Decimal` overflow.
    pub const MAX: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 2);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLow`] if the rounded amount is below `0.01`
    /// and [`PriceError::TooHigh`] if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let amount = round_cents(amount);
        if amount < Self::MIN {
            return Err(PriceError::TooLow { min: Self::MIN });
        }
        if amount > Self::MAX {
            return Err(PriceError::TooHigh { max: Self::MAX });
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLow`] if `cents` is zero and
    /// [`PriceError::TooHigh`] above [`Price::MAX`].
    pub fn from_cents(cents: u32) -> Result<Self, PriceError> {
        Self::new(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a price from user input such as `"2.50"` or `"3"`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] for non-numeric input, otherwise the
    /// range errors of [`Price::new`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;
        Self::new(amount)
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Round a monetary amount to cents.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a monetary amount for display, e.g. `$12.30`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}
