//! Wire protocol for action and result lines
//!
//! One module owns both directions of the line grammar:
//!
//! ```text
//! actions:  O OID SYMBOL SIDE QTY PX | X OID | P
//! results:  F OID SYMBOL QTY PX | X OID | P OID SYMBOL SIDE QTY PX | E OID <msg>
//! ```
//!
//! Prices are always rendered with exactly five fractional digits.

use matching_engine::events::{BookEntry, Execution, OrderCanceled};
use thiserror::Error;
use types::errors::EngineError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

/// A parsed action line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `O` — place a limit order
    Place(Order),
    /// `X` — cancel a resting order
    Cancel(OrderId),
    /// `P` — print the sorted book
    Print,
}

/// Protocol-level failures
///
/// The `Display` text is the wire message that follows the order id on an
/// `E` result line; [`ProtocolError::order_id`] supplies the id (zero when
/// the failure happened before an id could be parsed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty action")]
    EmptyAction,

    #[error("Unknown action '{action}'")]
    UnknownAction { action: String },

    #[error("Malformed place action")]
    MalformedPlace { order_id: Option<OrderId> },

    #[error("Malformed cancel action")]
    MalformedCancel,

    #[error("Malformed print action")]
    MalformedPrint,

    #[error("Invalid order id")]
    InvalidOrderId,

    #[error("Invalid symbol")]
    InvalidSymbol { order_id: OrderId },

    #[error("Invalid side")]
    InvalidSide { order_id: OrderId },

    #[error("Invalid quantity")]
    InvalidQuantity { order_id: OrderId },

    #[error("Invalid price")]
    InvalidPrice { order_id: OrderId },
}

impl ProtocolError {
    /// The order id to report on the `E` line, zero if none was parsed
    pub fn order_id(&self) -> u32 {
        match self {
            ProtocolError::MalformedPlace {
                order_id: Some(oid),
            } => oid.as_u32(),
            ProtocolError::InvalidSymbol { order_id }
            | ProtocolError::InvalidSide { order_id }
            | ProtocolError::InvalidQuantity { order_id }
            | ProtocolError::InvalidPrice { order_id } => order_id.as_u32(),
            _ => 0,
        }
    }
}

/// Parse one raw action line into a typed command
///
/// Tokens are separated by exactly one ASCII space. A doubled space, a
/// tab, or a stray leading/trailing space breaks the grammar and the line
/// is rejected like any other malformed action.
pub fn parse_action(line: &str) -> Result<Command, ProtocolError> {
    let tokens: Vec<&str> = line.split(' ').collect();
    let (action, fields) = match tokens.split_first() {
        Some((&action, fields)) if !action.is_empty() => (action, fields),
        _ => return Err(ProtocolError::EmptyAction),
    };

    match action {
        "O" => parse_place(fields),
        "X" => parse_cancel(fields),
        "P" => {
            if fields.is_empty() {
                Ok(Command::Print)
            } else {
                Err(ProtocolError::MalformedPrint)
            }
        }
        other => Err(ProtocolError::UnknownAction {
            action: other.to_string(),
        }),
    }
}

fn parse_place(fields: &[&str]) -> Result<Command, ProtocolError> {
    if fields.len() != 5 {
        // Salvage the id for the error line if the first field parses.
        return Err(ProtocolError::MalformedPlace {
            order_id: fields.first().and_then(|t| parse_order_id(t)),
        });
    }

    let order_id = parse_order_id(fields[0]).ok_or(ProtocolError::InvalidOrderId)?;
    let symbol =
        Symbol::try_new(fields[1]).ok_or(ProtocolError::InvalidSymbol { order_id })?;
    let side = single_char(fields[2])
        .and_then(Side::from_char)
        .ok_or(ProtocolError::InvalidSide { order_id })?;
    let quantity = fields[3]
        .parse::<u16>()
        .ok()
        .and_then(Quantity::try_new)
        .ok_or(ProtocolError::InvalidQuantity { order_id })?;
    let price =
        Price::from_str(fields[4]).ok_or(ProtocolError::InvalidPrice { order_id })?;

    Ok(Command::Place(Order::new(
        order_id, symbol, side, quantity, price,
    )))
}

fn parse_cancel(fields: &[&str]) -> Result<Command, ProtocolError> {
    if fields.len() != 1 {
        return Err(ProtocolError::MalformedCancel);
    }
    let order_id = parse_order_id(fields[0]).ok_or(ProtocolError::InvalidOrderId)?;
    Ok(Command::Cancel(order_id))
}

fn parse_order_id(token: &str) -> Option<OrderId> {
    token.parse::<u32>().ok().and_then(OrderId::try_new)
}

fn single_char(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Render one execution as its two fill lines, aggressor (taker) first
pub fn format_fills(execution: &Execution) -> [String; 2] {
    [
        format!(
            "F {} {} {} {}",
            execution.taker_order_id, execution.symbol, execution.quantity, execution.price
        ),
        format!(
            "F {} {} {} {}",
            execution.maker_order_id, execution.symbol, execution.quantity, execution.price
        ),
    ]
}

/// Render a cancel acknowledgment
pub fn format_cancel_ack(canceled: &OrderCanceled) -> String {
    format!("X {}", canceled.order_id)
}

/// Render one book snapshot entry
pub fn format_book_entry(entry: &BookEntry) -> String {
    format!(
        "P {} {} {} {} {}",
        entry.order_id,
        entry.symbol,
        entry.side.as_char(),
        entry.open_quantity,
        entry.price
    )
}

/// Render an engine rejection as an `E` line
pub fn format_engine_error(error: &EngineError) -> String {
    format!("E {} {}", error.order_id(), error)
}

/// Render a parse failure as an `E` line
pub fn format_protocol_error(error: &ProtocolError) -> String {
    format!("E {} {}", error.order_id(), error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_place() {
        let command = parse_action("O 10000 IBM B 10 100.00000").unwrap();
        let Command::Place(order) = command else {
            panic!("expected Place");
        };
        assert_eq!(order.order_id, OrderId::new(10000));
        assert_eq!(order.symbol, Symbol::new("IBM"));
        assert_eq!(order.side, Side::BUY);
        assert_eq!(order.quantity, Quantity::new(10));
        assert_eq!(order.open_quantity, Quantity::new(10));
        assert_eq!(order.price, Price::from_str("100.00000").unwrap());
    }

    #[test]
    fn test_parse_cancel_and_print() {
        assert_eq!(
            parse_action("X 10002").unwrap(),
            Command::Cancel(OrderId::new(10002))
        );
        assert_eq!(parse_action("P").unwrap(), Command::Print);
    }

    #[test]
    fn test_empty_line_rejected() {
        assert_eq!(parse_action("").unwrap_err(), ProtocolError::EmptyAction);
        assert_eq!(parse_action("   ").unwrap_err(), ProtocolError::EmptyAction);
    }

    #[test]
    fn test_single_space_separation_enforced() {
        // A doubled space yields an empty token, so the token count is off.
        let err = parse_action("O 1  IBM B 10 100.00000").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedPlace {
                order_id: Some(OrderId::new(1))
            }
        );
        assert_eq!(format_protocol_error(&err), "E 1 Malformed place action");

        // Tabs are not separators; they stick to the adjacent token.
        assert_eq!(
            parse_action("O\t1 IBM B 10 100.00000").unwrap_err(),
            ProtocolError::UnknownAction {
                action: "O\t1".to_string()
            }
        );

        // Stray trailing or leading spaces break the grammar too.
        assert_eq!(
            parse_action("X 10002 ").unwrap_err(),
            ProtocolError::MalformedCancel
        );
        assert_eq!(parse_action("P ").unwrap_err(), ProtocolError::MalformedPrint);
        assert_eq!(parse_action(" P").unwrap_err(), ProtocolError::EmptyAction);
    }

    #[test]
    fn test_unknown_action() {
        let err = parse_action("Q 1 IBM B 1 1.00000").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::UnknownAction {
                action: "Q".to_string()
            }
        );
        assert_eq!(err.order_id(), 0);
        assert_eq!(format_protocol_error(&err), "E 0 Unknown action 'Q'");
    }

    #[test]
    fn test_wrong_token_counts() {
        // Missing price; the id still makes it onto the error line.
        let err = parse_action("O 10000 IBM B 10").unwrap_err();
        assert_eq!(err.order_id(), 10000);
        assert_eq!(format_protocol_error(&err), "E 10000 Malformed place action");

        assert_eq!(
            parse_action("X").unwrap_err(),
            ProtocolError::MalformedCancel
        );
        assert_eq!(
            parse_action("X 1 2").unwrap_err(),
            ProtocolError::MalformedCancel
        );
        assert_eq!(
            parse_action("P extra").unwrap_err(),
            ProtocolError::MalformedPrint
        );
    }

    #[test]
    fn test_invalid_order_id() {
        for line in ["O 0 IBM B 10 100.00000", "O -5 IBM B 10 100.00000", "O x IBM B 10 100.00000", "O 4294967296 IBM B 10 100.00000", "X abc"] {
            let err = parse_action(line).unwrap_err();
            assert_eq!(err, ProtocolError::InvalidOrderId, "line: {line}");
            assert_eq!(err.order_id(), 0);
        }
    }

    #[test]
    fn test_invalid_symbol() {
        let err = parse_action("O 7 TOOLONGSYM B 10 100.00000").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidSymbol {
                order_id: OrderId::new(7)
            }
        );
        assert_eq!(format_protocol_error(&err), "E 7 Invalid symbol");

        assert!(parse_action("O 8 BRK.B B 10 100.00000").is_err());
    }

    #[test]
    fn test_invalid_side() {
        for side in ["X", "BS", "b"] {
            let line = format!("O 7 IBM {side} 10 100.00000");
            let err = parse_action(&line).unwrap_err();
            assert_eq!(
                err,
                ProtocolError::InvalidSide {
                    order_id: OrderId::new(7)
                }
            );
        }
    }

    #[test]
    fn test_invalid_quantity() {
        for qty in ["0", "65536", "-1", "1.5", "ten"] {
            let line = format!("O 7 IBM B {qty} 100.00000");
            let err = parse_action(&line).unwrap_err();
            assert_eq!(
                err,
                ProtocolError::InvalidQuantity {
                    order_id: OrderId::new(7)
                },
                "qty: {qty}"
            );
        }
        // Boundary quantities parse.
        assert!(parse_action("O 7 IBM B 1 100.00000").is_ok());
        assert!(parse_action("O 8 IBM B 65535 100.00000").is_ok());
    }

    #[test]
    fn test_invalid_price() {
        for px in ["0.00000", "-1.00000", "10000000.00000", "1.000001", "px"] {
            let line = format!("O 7 IBM B 10 {px}");
            let err = parse_action(&line).unwrap_err();
            assert_eq!(
                err,
                ProtocolError::InvalidPrice {
                    order_id: OrderId::new(7)
                },
                "px: {px}"
            );
        }
        // The smallest positive tick is a valid price.
        assert!(parse_action("O 7 IBM B 10 0.00001").is_ok());
    }

    #[test]
    fn test_format_fills_taker_first() {
        let execution = Execution {
            sequence: 0,
            symbol: Symbol::new("IBM"),
            taker_order_id: OrderId::new(10003),
            maker_order_id: OrderId::new(10000),
            quantity: Quantity::new(5),
            price: Price::from_str("100.00000").unwrap(),
        };

        let [taker_line, maker_line] = format_fills(&execution);
        assert_eq!(taker_line, "F 10003 IBM 5 100.00000");
        assert_eq!(maker_line, "F 10000 IBM 5 100.00000");
    }

    #[test]
    fn test_format_book_entry_and_cancel() {
        let entry = BookEntry {
            order_id: OrderId::new(10009),
            symbol: Symbol::new("IBM"),
            side: Side::SELL,
            open_quantity: Quantity::new(10),
            price: Price::from_str("102.00000").unwrap(),
        };
        assert_eq!(format_book_entry(&entry), "P 10009 IBM S 10 102.00000");

        let canceled = OrderCanceled {
            order_id: OrderId::new(10002),
            symbol: Symbol::new("IBM"),
            side: Side::SELL,
            open_quantity: Quantity::new(5),
            price: Price::from_str("101.00000").unwrap(),
        };
        assert_eq!(format_cancel_ack(&canceled), "X 10002");
    }

    #[test]
    fn test_format_engine_errors() {
        assert_eq!(
            format_engine_error(&EngineError::DuplicateOrderId(OrderId::new(10008))),
            "E 10008 Duplicate order id"
        );
        assert_eq!(
            format_engine_error(&EngineError::NotOnBook(OrderId::new(99999))),
            "E 99999 Order ID not on book"
        );
    }

    #[test]
    fn test_price_renders_five_fractional_digits() {
        let command = parse_action("O 7 IBM B 10 99.5").unwrap();
        let Command::Place(order) = command else {
            panic!("expected Place");
        };
        assert_eq!(order.price.to_string(), "99.50000");
    }
}
