//! Kernel configuration and component composition
//!
//! This module holds every compile-time constant the kernel consumes (there is
//! no configuration file on this system) and composes the board's device
//! components from cargo features:
//! - `display-framebuffer`: mailbox-negotiated framebuffer display (default)
//! - `display-null`: no display output, the serial line is the only terminal
//! - `log-*`: maximum level for kernel diagnostics

use static_assertions::const_assert;

use crate::components::console::pl011::{Pl011Config, Pl011Console};
use crate::components::display::Phosphor;
use crate::components::timer::SystemTimer;

// ============================================================================
// System identity
// ============================================================================

pub const OS_NAME: &str = "UNIFIED OPERATING SYSTEM (UOS)";
pub const VERSION: &str = "v7.0.2.8";
pub const KERNEL_VERSION: &str = "UOSKRNL.303";
pub const COPYRIGHT: &str = "2075-2077 RobCo Ind.";
pub const BUILD_DATE: &str = "2077-10-23";
pub const TARGET_PLATFORM: &str = "ARM Cortex-A Series";

// ============================================================================
// BCM2837 peripherals
// ============================================================================

pub const PERIPHERAL_BASE: usize = 0x3F00_0000;
pub const GPIO_BASE: usize = PERIPHERAL_BASE + 0x20_0000;
pub const UART0_BASE: usize = PERIPHERAL_BASE + 0x20_1000;
pub const SYSTEM_TIMER_BASE: usize = PERIPHERAL_BASE + 0x3000;
pub const MAILBOX_BASE: usize = PERIPHERAL_BASE + 0xB880;

/// UART reference clock as configured by the firmware
pub const UART_CLOCK_HZ: u32 = 3_000_000;
pub const UART_BAUD: u32 = 115_200;

// ============================================================================
// Display
// ============================================================================

pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 480;
pub const DISPLAY_DEPTH: u32 = 32;
pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 16;
pub const DISPLAY_PHOSPHOR: Phosphor = Phosphor::Green;

// ============================================================================
// Memory
// ============================================================================

pub const USER_SIZE: usize = 0x00D0_0000;
pub const APP_BASE: usize = 0x0100_0000;

/// Heap size, measured from the `__heap_start` linker symbol
pub const HEAP_SIZE: usize = USER_SIZE + APP_BASE;

// ============================================================================
// Terminal
// ============================================================================

/// Command line buffer size, including the terminator slot
pub const LINE_CAPACITY: usize = 256;
/// Username / password buffer size, including the terminator slot
pub const LOGIN_FIELD_CAPACITY: usize = 32;
pub const PROMPT: &str = "UOS> ";
pub const PASSWORD_MASK: u8 = b'*';
/// Column at which HELP starts the description text
pub const HELP_COLUMN_WIDTH: usize = 15;

// ============================================================================
// Timing (all cosmetic)
// ============================================================================

pub const BOOT_LINE_DELAY_MS: u64 = 150;
pub const SUBSYSTEM_DELAY_MS: u64 = 100;
pub const LOGIN_SCREEN_DELAY_MS: u64 = 500;
pub const INPUT_POLL_INTERVAL_US: u64 = 100;

const_assert!(LINE_CAPACITY >= 2);
const_assert!(LOGIN_FIELD_CAPACITY >= 2);
const_assert!(DISPLAY_WIDTH % GLYPH_WIDTH == 0);
const_assert!(DISPLAY_HEIGHT % GLYPH_HEIGHT == 0);
const_assert!(HEAP_SIZE % uos_allocator::ALLOCATION_GRANULE == 0);

/// Maximum log level selected by the `log-*` features (most verbose wins)
pub const LOG_LEVEL: log::LevelFilter = if cfg!(feature = "log-trace") {
    log::LevelFilter::Trace
} else if cfg!(feature = "log-debug") {
    log::LevelFilter::Debug
} else if cfg!(feature = "log-info") {
    log::LevelFilter::Info
} else if cfg!(feature = "log-warn") {
    log::LevelFilter::Warn
} else if cfg!(feature = "log-error") {
    log::LevelFilter::Error
} else {
    log::LevelFilter::Off
};

// ============================================================================
// Board components (compile-time composition)
// ============================================================================

/// Serial console on PL011 UART0
pub static SERIAL: Pl011Console = Pl011Console::new(Pl011Config {
    mmio_base: UART0_BASE,
    gpio_base: GPIO_BASE,
    clock_hz: UART_CLOCK_HZ,
    baud: UART_BAUD,
});

/// Free-running 1 MHz system timer
pub static TIMER: SystemTimer = SystemTimer::new(SYSTEM_TIMER_BASE);

cfg_if::cfg_if! {
    if #[cfg(feature = "display-null")] {
        use crate::components::console::null::{NullConfig, NullConsole};

        /// Display sink (disabled at compile time)
        pub static DISPLAY: NullConsole = NullConsole::new(NullConfig);
    } else {
        use crate::components::display::framebuffer::{FramebufferConfig, FramebufferConsole};

        /// Display sink on the mailbox framebuffer
        pub static DISPLAY: FramebufferConsole = FramebufferConsole::new(FramebufferConfig {
            mailbox_base: MAILBOX_BASE,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            depth: DISPLAY_DEPTH,
            phosphor: DISPLAY_PHOSPHOR,
        });
    }
}
