//! # Record reader
//!
//! The agent's response body is a sequence of two-line records:
//!
//! ```text
//! event: message.delta
//! data: {"delta": {"content": [...]}}
//! ```
//!
//! [`RecordReader`] walks the lines and yields one [`EventRecord`] per
//! well-formed pair. Resynchronization rules:
//! - Lines are trimmed; blank lines and lines that are not `event:` are skipped
//! - An `event:` line not immediately followed by a `data:` line is dropped,
//!   and reading resumes at the line after it
//! - A `data:` line without a preceding `event:` line is skipped
//!
//! Payloads are not decoded here; the sentinel payload is yielded as-is and
//! recognized with [`EventRecord::is_sentinel`].

use std::str::Lines;

/// Termination sentinel carried in a `data:` line.
pub const SENTINEL: &str = "[DONE]";

/// One `event:` / `data:` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord<'a> {
    /// Event label, verbatim.
    pub label: &'a str,
    /// Raw payload text.
    pub payload: &'a str,
}

impl EventRecord<'_> {
    /// Whether the payload is the termination sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.payload == SENTINEL
    }
}

/// Iterator over the records of a response body.
#[derive(Debug)]
pub struct RecordReader<'a> {
    lines: std::iter::Peekable<Lines<'a>>,
}

impl<'a> RecordReader<'a> {
    /// Read records from a complete response body.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().peekable(),
        }
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = EventRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(line) = self.lines.next() {
            let Some(label) = field(line, "event") else {
                continue;
            };
            let Some(payload) = self.lines.peek().and_then(|next| field(next, "data")) else {
                tracing::debug!(label, "event line without data line, skipping");
                continue;
            };
            let _ = self.lines.next();
            return Some(EventRecord { label, payload });
        }
        None
    }
}

/// Value of a `name:` line, with or without a space after the colon.
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    line.trim()
        .strip_prefix(name)?
        .strip_prefix(':')
        .map(str::trim)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
