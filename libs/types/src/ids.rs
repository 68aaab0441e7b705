//! Wire identifier types for orders and symbols
//!
//! Identifiers are client-assigned and arrive on the wire: orders carry a
//! positive 32-bit integer id that must be unique for the lifetime of the
//! process, and instruments are named by short alphanumeric symbols.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum symbol length in characters.
pub const MAX_SYMBOL_LEN: usize = 8;

/// Unique identifier for an order
///
/// Client-assigned, strictly positive 32-bit integer. Uniqueness is
/// enforced by the engine across the entire process lifetime, including
/// ids whose orders have since been filled or cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u32);

impl OrderId {
    /// Create a new OrderId
    ///
    /// # Panics
    /// Panics if the id is zero
    pub fn new(id: u32) -> Self {
        assert!(id > 0, "OrderId must be positive");
        Self(id)
    }

    /// Try to create an OrderId, returning None if invalid
    pub fn try_new(id: u32) -> Option<Self> {
        if id > 0 {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Get the raw 32-bit value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instrument symbol
///
/// Non-empty ASCII alphanumeric string of at most eight characters.
/// Orders for different symbols never cross.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol
    ///
    /// # Panics
    /// Panics if the symbol is empty, too long, or not alphanumeric
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::try_new(symbol).expect("invalid symbol")
    }

    /// Try to create a Symbol, returning None if invalid
    pub fn try_new(symbol: impl Into<String>) -> Option<Self> {
        let s = symbol.into();
        if s.is_empty() || s.len() > MAX_SYMBOL_LEN {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(s))
    }

    /// Get the symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
