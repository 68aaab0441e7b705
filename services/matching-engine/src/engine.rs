//! Matching engine core
//!
//! Main coordinator for the per-symbol books and matching logic. Owns all
//! book state exclusively; every mutation happens inside an engine method
//! and no references into book interiors escape.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::{Order, Side};

use crate::book::{AskBook, BidBook};
use crate::events::{BookEntry, Execution, OrderCanceled};
use crate::matching::{crossing, executor::MatchExecutor};

/// Main matching engine
///
/// State invariants, maintained across every completed operation:
/// - every entry in `index` locates exactly one resting order, and every
///   resting order is reachable through `index`
/// - no price level is empty, no resting order has zero open quantity
/// - no symbol's book holds a crossable bid/ask pair
/// - `seen` contains every identifier ever accepted and never shrinks
pub struct MatchingEngine {
    /// Order books per symbol, keyed ascending for deterministic snapshots
    books: BTreeMap<Symbol, OrderBook>,
    /// Location of every resting order, for O(log P) cancels
    index: HashMap<OrderId, OrderLocation>,
    /// Every identifier ever accepted, including filled and cancelled ones
    seen: HashSet<OrderId>,
    /// Execution-record generator with monotonic sequencing
    executor: MatchExecutor,
}

/// Order book for a single symbol
#[derive(Default)]
struct OrderBook {
    bids: BidBook,
    asks: AskBook,
}

/// Where a resting order lives
#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderLocation {
    symbol: Symbol,
    side: Side,
    price: Price,
}

/// Result of submitting an order
#[derive(Debug)]
pub enum SubmitResult {
    /// Order was added to the book without matching
    Resting,
    /// Order matched partially and the remainder was added to the book
    PartiallyFilled { executions: Vec<Execution> },
    /// Order was completely filled by the cross
    Filled { executions: Vec<Execution> },
}

impl SubmitResult {
    /// Executions produced by the cross phase (empty when resting)
    pub fn executions(&self) -> &[Execution] {
        match self {
            SubmitResult::Resting => &[],
            SubmitResult::PartiallyFilled { executions } | SubmitResult::Filled { executions } => {
                executions
            }
        }
    }
}

impl MatchingEngine {
    /// Create a new, empty matching engine
    pub fn new() -> Self {
        Self {
            books: BTreeMap::new(),
            index: HashMap::new(),
            seen: HashSet::new(),
            executor: MatchExecutor::new(),
        }
    }

    /// Submit an order to the matching engine
    ///
    /// The order is matched against the opposite side of its symbol's book
    /// in price-time priority; any unfilled remainder rests. A duplicate
    /// identifier is rejected before any state changes, even if its prior
    /// owner has long since left the book.
    pub fn submit(&mut self, mut order: Order) -> Result<SubmitResult, EngineError> {
        if self.seen.contains(&order.order_id) {
            return Err(EngineError::DuplicateOrderId(order.order_id));
        }
        self.seen.insert(order.order_id);

        let book = self.books.entry(order.symbol.clone()).or_default();

        // Split borrows: book, index, and executor are disjoint fields.
        let executions = match order.side {
            Side::BUY => Self::cross_buy(book, &mut self.index, &mut self.executor, &mut order),
            Side::SELL => Self::cross_sell(book, &mut self.index, &mut self.executor, &mut order),
        };

        if !order.is_filled() {
            match order.side {
                Side::BUY => book.bids.insert(order.order_id, order.price, order.open_quantity),
                Side::SELL => book.asks.insert(order.order_id, order.price, order.open_quantity),
            }
            self.index.insert(
                order.order_id,
                OrderLocation {
                    symbol: order.symbol.clone(),
                    side: order.side,
                    price: order.price,
                },
            );
        }

        debug!(
            order_id = %order.order_id,
            symbol = %order.symbol,
            matches = executions.len(),
            open = %order.open_quantity,
            "order submitted"
        );

        if order.is_filled() {
            Ok(SubmitResult::Filled { executions })
        } else if !executions.is_empty() {
            Ok(SubmitResult::PartiallyFilled { executions })
        } else {
            Ok(SubmitResult::Resting)
        }
    }

    /// Match an incoming buy against the ask side, best (lowest) price first
    fn cross_buy(
        book: &mut OrderBook,
        index: &mut HashMap<OrderId, OrderLocation>,
        executor: &mut MatchExecutor,
        order: &mut Order,
    ) -> Vec<Execution> {
        let mut executions = Vec::new();

        while !order.is_filled() {
            let Some((ask_price, level)) = book.asks.best_ask_level_mut() else {
                break;
            };
            if !crossing::can_match(order.price, ask_price) {
                break;
            }

            // Consume makers in FIFO order at this level.
            while !order.is_filled() {
                let Some(maker) = level.peek_front() else {
                    break;
                };
                let match_qty = order.open_quantity.min(maker.open_quantity);

                executions.push(executor.execute(
                    order.symbol.clone(),
                    order.order_id,
                    maker.order_id,
                    match_qty,
                    ask_price,
                ));

                order.fill(match_qty);
                let maker_remaining = maker.open_quantity - match_qty;
                if maker_remaining.is_zero() {
                    level.pop_front();
                    index.remove(&maker.order_id);
                } else {
                    level.update_front_quantity(maker_remaining);
                }
            }

            if level.is_empty() {
                book.asks.remove_level(ask_price);
            }
        }

        executions
    }

    /// Match an incoming sell against the bid side, best (highest) price first
    fn cross_sell(
        book: &mut OrderBook,
        index: &mut HashMap<OrderId, OrderLocation>,
        executor: &mut MatchExecutor,
        order: &mut Order,
    ) -> Vec<Execution> {
        let mut executions = Vec::new();

        while !order.is_filled() {
            let Some((bid_price, level)) = book.bids.best_bid_level_mut() else {
                break;
            };
            if !crossing::can_match(bid_price, order.price) {
                break;
            }

            while !order.is_filled() {
                let Some(maker) = level.peek_front() else {
                    break;
                };
                let match_qty = order.open_quantity.min(maker.open_quantity);

                executions.push(executor.execute(
                    order.symbol.clone(),
                    order.order_id,
                    maker.order_id,
                    match_qty,
                    bid_price,
                ));

                order.fill(match_qty);
                let maker_remaining = maker.open_quantity - match_qty;
                if maker_remaining.is_zero() {
                    level.pop_front();
                    index.remove(&maker.order_id);
                } else {
                    level.update_front_quantity(maker_remaining);
                }
            }

            if level.is_empty() {
                book.bids.remove_level(bid_price);
            }
        }

        executions
    }

    /// Cancel a resting order by identifier
    ///
    /// Unknown identifiers — never accepted, already filled, or already
    /// cancelled — are all reported the same way.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<OrderCanceled, EngineError> {
        let location = self
            .index
            .remove(&order_id)
            .ok_or(EngineError::NotOnBook(order_id))?;

        let book = self
            .books
            .get_mut(&location.symbol)
            .expect("indexed order without a book");
        let removed = match location.side {
            Side::BUY => book.bids.remove(order_id, location.price),
            Side::SELL => book.asks.remove(order_id, location.price),
        };
        let open_quantity = removed.expect("indexed order missing from its level");

        debug!(order_id = %order_id, symbol = %location.symbol, "order cancelled");

        Ok(OrderCanceled {
            order_id,
            symbol: location.symbol,
            side: location.side,
            open_quantity,
            price: location.price,
        })
    }

    /// Render every resting order, in deterministic book order
    ///
    /// Symbols ascend lexicographically. Within a symbol, asks come first
    /// from the highest price down, then bids from the highest price down,
    /// so prices are monotonically non-increasing top to bottom. Within an
    /// ask level the most recent arrival is listed first; within a bid
    /// level, arrival order.
    pub fn snapshot(&self) -> Vec<BookEntry> {
        let mut entries = Vec::new();

        for (symbol, book) in &self.books {
            for (price, level) in book.asks.iter_highest_first() {
                for entry in level.iter_newest_first() {
                    entries.push(BookEntry {
                        order_id: entry.order_id,
                        symbol: symbol.clone(),
                        side: Side::SELL,
                        open_quantity: entry.open_quantity,
                        price: *price,
                    });
                }
            }
            for (price, level) in book.bids.iter_best_first() {
                for entry in level.iter() {
                    entries.push(BookEntry {
                        order_id: entry.order_id,
                        symbol: symbol.clone(),
                        side: Side::BUY,
                        open_quantity: entry.open_quantity,
                        price: *price,
                    });
                }
            }
        }

        entries
    }

    /// Best bid (price, total quantity) for a symbol
    pub fn best_bid(&self, symbol: &Symbol) -> Option<(Price, u32)> {
        self.books.get(symbol).and_then(|book| book.bids.best_bid())
    }

    /// Best ask (price, total quantity) for a symbol
    pub fn best_ask(&self, symbol: &Symbol) -> Option<(Price, u32)> {
        self.books.get(symbol).and_then(|book| book.asks.best_ask())
    }

    /// Aggregate depth for a symbol: (bids, asks), best first, top N levels
    pub fn depth(&self, symbol: &Symbol, levels: usize) -> (Vec<(Price, u32)>, Vec<(Price, u32)>) {
        match self.books.get(symbol) {
            Some(book) => (
                book.bids.depth_snapshot(levels),
                book.asks.depth_snapshot(levels),
            ),
            None => (Vec::new(), Vec::new()),
        }
    }

    /// Number of orders currently resting across all symbols
    pub fn resting_order_count(&self) -> usize {
        self.index.len()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
