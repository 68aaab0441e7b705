//! Order types
//!
//! A plain limit order: it rests on the book until cancelled or fully
//! filled by opposite-side orders at an equal or better price.

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    /// Wire character: `B` for buy, `S` for sell
    pub fn as_char(&self) -> char {
        match self {
            Side::BUY => 'B',
            Side::SELL => 'S',
        }
    }

    /// Parse the wire character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(Side::BUY),
            'S' => Some(Side::SELL),
            _ => None,
        }
    }
}

/// A limit order
///
/// `quantity` is the original size and never changes; `open_quantity`
/// tracks the unfilled remainder and decreases as fills consume the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub open_quantity: Quantity,
}

impl Order {
    /// Create a new, unfilled order
    pub fn new(order_id: OrderId, symbol: Symbol, side: Side, quantity: Quantity, price: Price) -> Self {
        Self {
            order_id,
            symbol,
            side,
            price,
            quantity,
            open_quantity: quantity,
        }
    }

    /// Check the quantity invariant: open never exceeds original
    pub fn check_invariant(&self) -> bool {
        self.open_quantity <= self.quantity
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.open_quantity.is_zero()
    }

    /// Shares filled so far
    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.open_quantity
    }

    /// Consume open quantity with a fill
    ///
    /// # Panics
    /// Panics if the fill exceeds the open quantity
    pub fn fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.open_quantity,
            "Fill would exceed open quantity"
        );
        self.open_quantity = self.open_quantity - fill_quantity;

        assert!(self.check_invariant(), "Invariant violated after fill");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order(qty: u16) -> Order {
        Order::new(
            OrderId::new(10000),
            Symbol::new("IBM"),
            Side::BUY,
            Quantity::new(qty),
            Price::from_str("100.00000").unwrap(),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_side_wire_chars() {
        assert_eq!(Side::from_char('B'), Some(Side::BUY));
        assert_eq!(Side::from_char('S'), Some(Side::SELL));
        assert_eq!(Side::from_char('X'), None);
        assert_eq!(Side::BUY.as_char(), 'B');
        assert_eq!(Side::SELL.as_char(), 'S');
    }

    #[test]
    fn test_order_starts_fully_open() {
        let order = test_order(10);
        assert_eq!(order.open_quantity, order.quantity);
        assert!(!order.is_filled());
        assert!(order.check_invariant());
    }

    #[test]
    fn test_order_partial_then_full_fill() {
        let mut order = test_order(10);

        order.fill(Quantity::new(4));
        assert_eq!(order.open_quantity.as_u16(), 6);
        assert_eq!(order.filled_quantity().as_u16(), 4);
        assert!(!order.is_filled());

        order.fill(Quantity::new(6));
        assert!(order.is_filled());
        assert_eq!(order.filled_quantity().as_u16(), 10);
        assert!(order.check_invariant());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed open quantity")]
    fn test_order_overfill_panics() {
        let mut order = test_order(5);
        order.fill(Quantity::new(6));
    }

    #[test]
    fn test_order_serialization() {
        let order = test_order(10);
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(order, deserialized);
    }
}
