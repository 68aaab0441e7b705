//! Event structures for the matching engine
//!
//! Outcome records produced by engine operations. The dispatcher renders
//! these into wire result lines; tests use them to reconstruct history.

use serde::{Deserialize, Serialize};
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// A single crossing event between an incoming (taker) order and a resting
/// (maker) order
///
/// The price is always the maker's price. One `Execution` fans out into two
/// fill lines on the wire: the taker's first, then the maker's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Engine-wide monotonic sequence number
    pub sequence: u64,
    pub symbol: Symbol,
    pub taker_order_id: OrderId,
    pub maker_order_id: OrderId,
    pub quantity: Quantity,
    pub price: Price,
}

/// A resting order removed from the book on request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCanceled {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    /// Shares still open at the moment of cancellation
    pub open_quantity: Quantity,
    pub price: Price,
}

/// One resting order as rendered in a book snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub open_quantity: Quantity,
    pub price: Price,
}
