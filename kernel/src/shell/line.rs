//! Keystroke classification and bounded line buffers

/// What a received byte means to a line editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// CR or LF
    Terminator,
    /// DEL (0x7F) or BS (0x08)
    Backspace,
    /// 0x20..=0x7E
    Printable(u8),
    Ignored,
}

impl Key {
    pub const fn classify(c: u8) -> Self {
        match c {
            b'\r' | b'\n' => Key::Terminator,
            0x7F | 0x08 => Key::Backspace,
            b' '..=b'~' => Key::Printable(c),
            _ => Key::Ignored,
        }
    }
}

/// Fixed-capacity line of printable ASCII
///
/// Holds at most `N - 1` characters; the last slot is the terminator room the
/// serial protocol reserves. Pushing into a full buffer drops the character.
#[derive(Clone, Copy)]
pub struct LineBuffer<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
        }
    }

    /// Usable characters (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity()
    }

    /// Append a printable character; returns false if it was dropped
    pub fn push(&mut self, c: u8) -> bool {
        if self.is_full() || !matches!(Key::classify(c), Key::Printable(_)) {
            return false;
        }
        self.bytes[self.len] = c;
        self.len += 1;
        true
    }

    /// Remove the last character; returns false on an empty buffer
    pub fn pop(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        self.bytes[self.len] = 0;
        true
    }

    pub fn clear(&mut self) {
        self.bytes = [0; N];
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn as_str(&self) -> &str {
        // Only printable ASCII is ever stored
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Freeze the current contents and leave the buffer empty
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }

    pub fn make_ascii_uppercase(&mut self) {
        self.bytes[..self.len].make_ascii_uppercase();
    }

    /// Case-insensitive comparison against `other`
    pub fn eq_ignore_ascii_case(&self, other: &str) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("LineBuffer").field(&self.as_str()).finish()
    }
}
