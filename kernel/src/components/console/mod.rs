//! Console component traits
//!
//! A [`Console`] is anything that accepts characters: the PL011 serial line,
//! the framebuffer text surface, or nothing at all. Input only ever comes from
//! the serial line, through [`SerialInput`].
//!
//! Terminal code never writes to a single console directly; it goes through
//! [`FanOut`], which keeps the serial line and the display in lockstep.

use core::fmt;

/// Output sink for terminal and debug text
///
/// Implementations are polled devices: `putc` blocks until the hardware can
/// take the character.
pub trait Console: Send + Sync {
    /// Write a single character, untranslated
    fn putc(&self, c: u8);

    /// Write a string
    ///
    /// Default implementation writes character by character and expands `\n`
    /// to CRLF for serial terminals. Sinks with their own line handling
    /// override it.
    fn puts(&self, s: &str) {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.putc(b'\r'); // CRLF for terminals
            }
            self.putc(byte);
        }
    }
}

/// Character source for the interactive terminal
pub trait SerialInput: Send + Sync {
    /// Non-blocking check for a pending character
    fn has_input(&self) -> bool;

    /// Read one character, waiting until one arrives
    fn read_byte(&self) -> u8;
}

/// Wrapper for using Console with core::fmt::Write
pub struct ConsoleWriter<C: Console + ?Sized + 'static> {
    console: &'static C,
}

impl<C: Console + ?Sized + 'static> ConsoleWriter<C> {
    pub const fn new(console: &'static C) -> Self {
        Self { console }
    }
}

impl<C: Console + ?Sized + 'static> fmt::Write for ConsoleWriter<C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.console.puts(s);
        Ok(())
    }
}

// Component implementations
pub mod fanout;
pub mod null;
pub mod pl011;

pub use fanout::FanOut;
