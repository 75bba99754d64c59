//! BCM2837 system timer component
//!
//! The system timer is a free-running 64-bit counter clocked at 1 MHz, split
//! across two 32-bit registers (CLO/CHI). All kernel delays are busy-waits on
//! this counter; nothing here uses interrupts.

use core::ptr;

/// System timer register offsets
const TIMER_CLO: usize = 0x04; // Counter lower 32 bits
const TIMER_CHI: usize = 0x08; // Counter upper 32 bits

/// Counter ticks per second
pub const TICKS_PER_SECOND: u64 = 1_000_000;

/// Monotonic microsecond clock
pub trait Clock: Send + Sync {
    /// Current counter value in microseconds
    fn ticks_now(&self) -> u64;

    /// Busy-wait for at least `us` microseconds
    ///
    /// Elapsed time is measured with wrapping subtraction so a counter
    /// rollover mid-wait does not stall forever.
    fn delay_us(&self, us: u64) {
        let start = self.ticks_now();
        while self.ticks_now().wrapping_sub(start) < us {
            core::hint::spin_loop();
        }
    }

    fn delay_ms(&self, ms: u64) {
        self.delay_us(ms.saturating_mul(1_000));
    }

    fn delay_s(&self, s: u64) {
        self.delay_us(s.saturating_mul(TICKS_PER_SECOND));
    }

    /// Whole seconds since the counter started
    fn uptime_secs(&self) -> u64 {
        self.ticks_now() / TICKS_PER_SECOND
    }
}

/// Combine the two counter halves
///
/// `read_hi` is sampled before and after the low word; if it changed, the low
/// word rolled over in between and is sampled again.
fn read_split_counter(mut read_hi: impl FnMut() -> u32, mut read_lo: impl FnMut() -> u32) -> u64 {
    let mut hi = read_hi();
    let mut lo = read_lo();
    let hi_again = read_hi();
    if hi != hi_again {
        hi = hi_again;
        lo = read_lo();
    }
    ((hi as u64) << 32) | lo as u64
}

/// BCM2837 system timer
///
/// # Safety
/// Reads MMIO registers at the configured base; the timer must be present.
pub struct SystemTimer {
    base: usize,
}

impl SystemTimer {
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// The counter runs from reset; there is nothing to program
    pub fn init(&self) {
        log::debug!("system timer at {:#x}, counter {}", self.base, self.ticks_now());
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }
}

impl Clock for SystemTimer {
    fn ticks_now(&self) -> u64 {
        read_split_counter(|| self.read_reg(TIMER_CHI), || self.read_reg(TIMER_CLO))
    }
}
