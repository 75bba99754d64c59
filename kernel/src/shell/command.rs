//! Command line parsing
//!
//! A line is upper-cased as a whole, leading spaces are dropped, and it is split
//! once at the first space or `/`. The verb is everything before the separator,
//! the arguments are the rest, left unparsed. `SET/HALT` and `SET HALT` are the
//! same command.

use super::line::LineBuffer;
use crate::config::LINE_CAPACITY;

/// A parsed, upper-cased command line
#[derive(Debug, Clone, Copy)]
pub struct CommandLine {
    text: LineBuffer<LINE_CAPACITY>,
    verb: (usize, usize),
    args: usize,
}

fn is_separator(c: u8) -> bool {
    c == b' ' || c == b'/'
}

impl CommandLine {
    /// Parse `line`; anything past the line capacity or outside printable
    /// ASCII is dropped
    pub fn parse(line: &str) -> Self {
        let mut text = LineBuffer::new();
        for c in line.bytes() {
            text.push(c);
        }
        text.make_ascii_uppercase();

        let bytes = text.as_bytes();
        let start = bytes.iter().position(|&c| c != b' ').unwrap_or(bytes.len());
        let (end, args) = match bytes[start..].iter().position(|&c| is_separator(c)) {
            Some(offset) => (start + offset, start + offset + 1),
            None => (bytes.len(), bytes.len()),
        };

        Self {
            text,
            verb: (start, end),
            args,
        }
    }

    pub fn verb(&self) -> &str {
        let (start, end) = self.verb;
        &self.text.as_str()[start..end]
    }

    pub fn args(&self) -> &str {
        &self.text.as_str()[self.args..]
    }

    pub fn is_empty(&self) -> bool {
        self.verb().is_empty()
    }
}
