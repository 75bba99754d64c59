//! Null console component (no output)
//!
//! Stands in for the display when the board has none, or when the image is
//! built with `display-null`. Everything written to it is discarded, so the
//! serial line stays the only interactive channel.

use super::Console;

/// Null console configuration (empty - no configuration needed)
#[derive(Clone, Copy)]
pub struct NullConfig;

/// Null console component (no output)
pub struct NullConsole;

impl NullConsole {
    pub const fn new(_config: NullConfig) -> Self {
        Self
    }
}

impl Console for NullConsole {
    #[inline(always)]
    fn putc(&self, _c: u8) {}

    #[inline(always)]
    fn puts(&self, _s: &str) {}
}
