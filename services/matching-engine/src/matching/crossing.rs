//! Crossing detection logic
//!
//! Determines when a bid and ask are marketable against each other.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at the given prices
///
/// A buy crosses a sell when the bid price is at or above the ask price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against a resting order
///
/// Returns true if the incoming order's limit crosses the resting price.
/// The fill itself always happens at the resting order's price.
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => incoming_price >= resting_price,
        Side::SELL => incoming_price <= resting_price,
    }
}
