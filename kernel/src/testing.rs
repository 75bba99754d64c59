//! Host test doubles for the device traits

use std::collections::VecDeque;
use std::string::String;
use std::vec;
use std::vec::Vec;

use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use spin::Mutex;

use crate::components::console::{Console, SerialInput};
use crate::components::display::PixelSurface;
use crate::components::timer::Clock;

/// Console that keeps everything written to it
pub struct RecordingConsole {
    bytes: Mutex<Vec<u8>>,
    crlf: bool,
}

impl RecordingConsole {
    /// Behaves like the UART: `puts` expands `\n` to CRLF
    pub fn serial() -> Self {
        Self {
            bytes: Mutex::new(Vec::new()),
            crlf: true,
        }
    }

    /// Behaves like the framebuffer: text is stored as written
    pub fn display() -> Self {
        Self {
            bytes: Mutex::new(Vec::new()),
            crlf: false,
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl Console for RecordingConsole {
    fn putc(&self, c: u8) {
        self.bytes.lock().push(c);
    }

    fn puts(&self, s: &str) {
        let mut bytes = self.bytes.lock();
        for c in s.bytes() {
            if self.crlf && c == b'\n' {
                bytes.push(b'\r');
            }
            bytes.push(c);
        }
    }
}

/// Serial input fed from a fixed script
pub struct ScriptedInput {
    script: Mutex<VecDeque<u8>>,
    idle_polls: AtomicUsize,
}

impl ScriptedInput {
    pub fn new(script: &[u8]) -> Self {
        Self::delayed(0, script)
    }

    /// Report no input for the first `idle_polls` checks
    pub fn delayed(idle_polls: usize, script: &[u8]) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            idle_polls: AtomicUsize::new(idle_polls),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl SerialInput for ScriptedInput {
    fn has_input(&self) -> bool {
        let idle = self
            .idle_polls
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok();
        !idle && !self.script.lock().is_empty()
    }

    fn read_byte(&self) -> u8 {
        self.script
            .lock()
            .pop_front()
            .expect("read past the end of the input script")
    }
}

/// Idle polls allowed before a test is considered hung
pub const FAKE_CLOCK_POLL_LIMIT: usize = 100_000;

/// Clock that only moves when something waits on it
///
/// Every delay advances time by exactly the requested amount. After
/// [`FAKE_CLOCK_POLL_LIMIT`] delays it panics, which turns an exhausted input
/// script into a test failure instead of a hang.
pub struct FakeClock {
    now: AtomicU64,
    delays: AtomicUsize,
}

impl FakeClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
            delays: AtomicUsize::new(0),
        }
    }

    pub fn delays(&self) -> usize {
        self.delays.load(Ordering::Relaxed)
    }
}

impl Clock for FakeClock {
    fn ticks_now(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }

    fn delay_us(&self, us: u64) {
        let delays = self.delays.fetch_add(1, Ordering::Relaxed) + 1;
        assert!(
            delays <= FAKE_CLOCK_POLL_LIMIT,
            "clock polled {} times; input script exhausted?",
            delays
        );
        self.now.fetch_add(us, Ordering::Relaxed);
    }
}

/// Pixel surface backed by a vector
pub struct MemorySurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl MemorySurface {
    pub fn new(width: u32, height: u32, fill: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }
}

impl PixelSurface for MemorySurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.pixels[(row * self.width + col) as usize] = color;
            }
        }
    }

    fn scroll_up(&mut self, rows: u32, fill: u32) {
        let rows = rows.min(self.height);
        let shift = (rows * self.width) as usize;
        self.pixels.copy_within(shift.., 0);

        let width = self.width;
        let height = self.height;
        self.fill_rect(0, height - rows, width, rows, fill);
    }
}
