use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **whole won**.
///
/// KRW has no minor units, so the stored integer is the display amount. Use
/// this type for **all** monetary values in the engine (costs, shares,
/// balances, transfers) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = owed to the member / spent
/// - negative = owed by the member
///
/// # Examples
///
/// ```rust
/// use engine::MoneyWon;
///
/// let amount = MoneyWon::new(12_500);
/// assert_eq!(amount.won(), 12500);
/// assert_eq!(amount.to_string(), "12500₩");
/// ```
///
/// Parsing from user input ignores comma group separators:
///
/// ```rust
/// use engine::MoneyWon;
///
/// assert_eq!("12,500".parse::<MoneyWon>().unwrap().won(), 12500);
/// assert!("12.50".parse::<MoneyWon>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyWon(i64);

impl MoneyWon {
    pub const ZERO: MoneyWon = MoneyWon(0);

    /// Creates a new amount from whole won.
    #[must_use]
    pub const fn new(won: i64) -> Self {
        Self(won)
    }

    /// Returns the raw value in won.
    #[must_use]
    pub const fn won(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> MoneyWon {
        MoneyWon(self.0.abs())
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyWon) -> Option<MoneyWon> {
        self.0.checked_add(rhs.0).map(MoneyWon)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyWon) -> Option<MoneyWon> {
        self.0.checked_sub(rhs.0).map(MoneyWon)
    }
}

impl fmt::Display for MoneyWon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}₩", self.0)
    }
}

impl From<i64> for MoneyWon {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyWon> for i64 {
    fn from(value: MoneyWon) -> Self {
        value.0
    }
}

impl Add for MoneyWon {
    type Output = MoneyWon;

    fn add(self, rhs: MoneyWon) -> Self::Output {
        MoneyWon(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyWon {
    fn add_assign(&mut self, rhs: MoneyWon) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyWon {
    type Output = MoneyWon;

    fn sub(self, rhs: MoneyWon) -> Self::Output {
        MoneyWon(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyWon {
    fn sub_assign(&mut self, rhs: MoneyWon) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyWon {
    type Output = MoneyWon;

    fn neg(self) -> Self::Output {
        MoneyWon(-self.0)
    }
}

impl FromStr for MoneyWon {
    type Err = LedgerError;

    /// Parses a whole-won string.
    ///
    /// Accepts an optional leading `+`/`-` and comma group separators
    /// (`12,500`). Rejects decimals, empty strings and anything non-numeric.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || LedgerError::Validation("empty amount".to_string());
        let invalid = || LedgerError::Validation("invalid amount".to_string());
        let overflow = || LedgerError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let digits = rest.replace(',', "");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: i64 = digits.parse().map_err(|_| overflow())?;
        let signed = if negative {
            value.checked_neg().ok_or_else(overflow)?
        } else {
            value
        };

        Ok(MoneyWon(signed))
    }
}
