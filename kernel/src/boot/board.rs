//! Board abstraction
//!
//! The boot sequence only talks to devices through [`Board`], so it can be run
//! against the Raspberry Pi 3 or against scripted fakes.

use crate::components::console::{Console, SerialInput};
use crate::components::timer::Clock;
use crate::config;
use crate::memory;

/// Devices and memory layout of one machine
///
/// # Safety
/// `heap_bounds` must describe memory that nothing else uses for the lifetime
/// of the kernel; the boot sequence hands it to the heap allocator as-is.
pub unsafe trait Board {
    fn init_serial(&self);

    /// Negotiate the display; `false` leaves the display sink as a no-op
    fn init_display(&self) -> bool;

    fn init_timer(&self);

    fn serial(&self) -> &dyn Console;
    fn input(&self) -> &dyn SerialInput;
    fn display(&self) -> &dyn Console;
    fn clock(&self) -> &dyn Clock;

    /// Heap region `[start, limit)`
    fn heap_bounds(&self) -> (usize, usize);
}

/// Raspberry Pi 3 (BCM2837) wired from the `config` statics
pub struct RaspberryPi3;

unsafe impl Board for RaspberryPi3 {
    fn init_serial(&self) {
        config::SERIAL.init();
    }

    #[cfg(feature = "display-null")]
    fn init_display(&self) -> bool {
        false
    }

    #[cfg(not(feature = "display-null"))]
    fn init_display(&self) -> bool {
        config::DISPLAY.init().is_ok()
    }

    fn init_timer(&self) {
        config::TIMER.init();
    }

    fn serial(&self) -> &dyn Console {
        &config::SERIAL
    }

    fn input(&self) -> &dyn SerialInput {
        &config::SERIAL
    }

    fn display(&self) -> &dyn Console {
        &config::DISPLAY
    }

    fn clock(&self) -> &dyn Clock {
        &config::TIMER
    }

    fn heap_bounds(&self) -> (usize, usize) {
        memory::heap_region()
    }
}
