//! Error types for the matching engine
//!
//! The `Display` text of each variant is the canonical wire message that
//! follows the order id on an `E` result line.

use crate::ids::OrderId;
use thiserror::Error;

/// Errors the engine reports for well-formed but unservable actions
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The identifier was already used by an order at some point in the
    /// process lifetime, including orders since filled or cancelled.
    #[error("Duplicate order id")]
    DuplicateOrderId(OrderId),

    /// No resting order carries this identifier. Never-accepted, fully
    /// filled, and already-cancelled ids are indistinguishable.
    #[error("Order ID not on book")]
    NotOnBook(OrderId),
}

impl EngineError {
    /// The order id the failed action referred to
    pub fn order_id(&self) -> OrderId {
        match self {
            EngineError::DuplicateOrderId(oid) | EngineError::NotOnBook(oid) => *oid,
        }
    }
}
