//! Fixed-point price and integral quantity types
//!
//! Prices use rust_decimal for deterministic arithmetic (no floating-point
//! keys in the book, no ordering surprises). Every `Price` is normalized to
//! five fractional digits on construction, so two textually identical
//! prices are representationally identical and sort onto the same book
//! level. Quantities are whole shares in the 16-bit range.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Number of fractional digits every price carries (the ".5" of 7.5 format).
pub const PRICE_SCALE: u32 = 5;

/// Exclusive upper bound on the integer part (the "7." of 7.5 format).
const PRICE_INT_LIMIT: u32 = 10_000_000;

/// Price in 7.5 fixed-point format
///
/// Strictly positive, at most seven integer digits, at most five fractional
/// digits. Stored at scale 5 so equality, ordering, and hashing are exact
/// and `Display` always renders exactly five fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price from a Decimal
    ///
    /// # Panics
    /// Panics if the value does not fit the 7.5 format
    pub fn new(value: Decimal) -> Self {
        Self::try_new(value).expect("Price must be positive and fit 7.5 format")
    }

    /// Try to create a Price, returning None if the value is non-positive,
    /// has more than seven integer digits, or more than five fractional
    /// digits.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value <= Decimal::ZERO || value >= Decimal::from(PRICE_INT_LIMIT) {
            return None;
        }
        let mut normalized = value.normalize();
        if normalized.scale() > PRICE_SCALE {
            return None;
        }
        normalized.rescale(PRICE_SCALE);
        Some(Self(normalized))
    }

    /// Parse from wire text (e.g. `100.00000`)
    pub fn from_str(s: &str) -> Option<Self> {
        Decimal::from_str(s).ok().and_then(Self::try_new)
    }

    /// Create from integer (for tests/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Get the inner decimal value (always at scale 5)
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

// Serialized as string to prevent JSON number precision loss
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal)
            .ok_or_else(|| serde::de::Error::custom("Price must be positive and fit 7.5 format"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Scale is fixed at 5, so Display renders exactly five fractional digits.
        write!(f, "{}", self.0)
    }
}

/// Order quantity in whole shares
///
/// Fits the unsigned 16-bit range. Zero is representable because open
/// quantities reach zero as fills consume an order; orders themselves are
/// only ever created with positive quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Quantity(u16);

impl Quantity {
    /// Create a new Quantity
    ///
    /// # Panics
    /// Panics if the quantity is zero
    pub fn new(value: u16) -> Self {
        assert!(value > 0, "Quantity must be positive");
        Self(value)
    }

    /// Try to create a Quantity, returning None if zero
    pub fn try_new(value: u16) -> Option<Self> {
        if value > 0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Zero quantity (an exhausted order)
    pub fn zero() -> Self {
        Self(0)
    }

    /// Get the raw share count
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Smaller of two quantities (the executable size of a match)
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Check if the quantity is exhausted
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would result in negative");
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
