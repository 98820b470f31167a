//! JSON lines output for perft results.
//!
//! Each result is written as one JSON object per line so that suite runs can
//! be piped into other tools.

use serde::Serialize;
use std::io::Write;

/// One perft measurement.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PerftRecord<'a> {
    /// Suite entry name, or "cli" for a single run.
    pub name: &'a str,
    /// SFEN of the root position.
    pub sfen: String,
    pub depth: u32,
    pub nodes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<u64>,
    /// Whether `nodes` matched `expected`; absent when nothing was expected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    pub millis: u128,
    /// Nodes per second, 0 when the run took under a millisecond.
    pub nps: u64,
}

impl<'a> PerftRecord<'a> {
    pub fn new(
        name: &'a str,
        sfen: String,
        depth: u32,
        nodes: u64,
        expected: Option<u64>,
        millis: u128,
    ) -> Self {
        let nps = if millis == 0 {
            0
        } else {
            u64::try_from(u128::from(nodes) * 1000 / millis).unwrap_or(u64::MAX)
        };
        PerftRecord {
            name,
            sfen,
            depth,
            nodes,
            expected,
            passed: expected.map(|e| e == nodes),
            millis,
            nps,
        }
    }
}

/// Writes `record` as a single JSON line.
pub fn write_line<W: Write>(mut out: W, record: &PerftRecord<'_>) -> std::io::Result<()> {
    serde_json::to_writer(&mut out, record)?;
    out.write_all(b"\n")
}
