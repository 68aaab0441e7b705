//! SimpleCross protocol surface
//!
//! Parses textual action lines, dispatches them to the matching engine,
//! and formats the outcomes as textual result lines. The binary in
//! `main.rs` is a thin driver over [`SimpleCross::action`].

pub mod dispatcher;
pub mod protocol;

pub use dispatcher::SimpleCross;
