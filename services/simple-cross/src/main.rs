//! SimpleCross binary driver
//!
//! Streams action lines from `actions.txt` (or a path given as the sole
//! argument, `-` for stdin) through the dispatcher and prints result lines
//! to stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::Context;
use simple_cross::SimpleCross;
use tracing_subscriber::EnvFilter;

const DEFAULT_ACTIONS_PATH: &str = "actions.txt";

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only protocol result lines.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ACTIONS_PATH.to_string());

    let reader: Box<dyn BufRead> = if path == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file =
            File::open(&path).with_context(|| format!("failed to open actions file '{path}'"))?;
        Box::new(BufReader::new(file))
    };

    tracing::info!(input = %path, "starting SimpleCross");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut cross = SimpleCross::new();

    for line in reader.lines() {
        let line = line.context("failed to read action line")?;
        for result in cross.action(&line) {
            writeln!(out, "{result}")?;
        }
    }

    Ok(())
}
