//! Action dispatcher
//!
//! `SimpleCross` wraps the matching engine behind the line protocol: one
//! action line in, all of its result lines out. The function is total —
//! every failure becomes a single `E` line and processing continues.

use matching_engine::MatchingEngine;
use types::ids::OrderId;
use types::order::Order;

use crate::protocol::{self, Command};

/// The SimpleCross order book driver
#[derive(Default)]
pub struct SimpleCross {
    engine: MatchingEngine,
}

impl SimpleCross {
    /// Create a new driver with an empty book
    pub fn new() -> Self {
        Self {
            engine: MatchingEngine::new(),
        }
    }

    /// Process one action line and return its result lines
    ///
    /// Results are complete when this returns; nothing is buffered across
    /// calls and result order across calls follows input order.
    pub fn action(&mut self, line: &str) -> Vec<String> {
        match protocol::parse_action(line) {
            Ok(Command::Place(order)) => self.place(order),
            Ok(Command::Cancel(order_id)) => self.cancel(order_id),
            Ok(Command::Print) => self.print_book(),
            Err(error) => vec![protocol::format_protocol_error(&error)],
        }
    }

    fn place(&mut self, order: Order) -> Vec<String> {
        match self.engine.submit(order) {
            Ok(result) => result
                .executions()
                .iter()
                .flat_map(protocol::format_fills)
                .collect(),
            Err(error) => vec![protocol::format_engine_error(&error)],
        }
    }

    fn cancel(&mut self, order_id: OrderId) -> Vec<String> {
        match self.engine.cancel(order_id) {
            Ok(canceled) => vec![protocol::format_cancel_ack(&canceled)],
            Err(error) => vec![protocol::format_engine_error(&error)],
        }
    }

    fn print_book(&self) -> Vec<String> {
        self.engine
            .snapshot()
            .iter()
            .map(protocol::format_book_entry)
            .collect()
    }
}
