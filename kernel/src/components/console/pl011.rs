//! PL011 UART console component (BCM2837 UART0)
//!
//! Polled serial console: 115200 8N1, FIFOs on, no interrupts, no flow control.
//! Transmit waits for room in the TX FIFO, receive waits for the RX FIFO to
//! fill. GPIO 14/15 are switched to ALT0 during `init` so the UART reaches the
//! header pins.

use bitflags::bitflags;
use core::ptr;

use super::{Console, SerialInput};
use crate::arch;

/// PL011 register offsets
const UARTDR: usize = 0x00; // Data register
const UARTFR: usize = 0x18; // Flag register
const UARTIBRD: usize = 0x24; // Integer baud rate divisor
const UARTFBRD: usize = 0x28; // Fractional baud rate divisor
const UARTLCR_H: usize = 0x2C; // Line control
const UARTCR: usize = 0x30; // Control
const UARTICR: usize = 0x44; // Interrupt clear

/// GPIO register offsets
const GPFSEL1: usize = 0x04;
const GPPUD: usize = 0x94;
const GPPUDCLK0: usize = 0x98;

/// GPIO function select for pins 14 and 15 (3 bits each in GPFSEL1)
const GPFSEL1_PIN14_SHIFT: u32 = 12;
const GPFSEL1_PIN15_SHIFT: u32 = 15;
const GPIO_FUNCTION_MASK: u32 = 0b111;
const GPIO_FUNCTION_ALT0: u32 = 0b100;

/// Cycles to hold the pull-up/down clock, per the BCM2835 peripheral manual
const GPIO_PULL_SETTLE_CYCLES: u32 = 150;

const ALL_INTERRUPTS: u32 = 0x7FF;

bitflags! {
    /// UARTFR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u32 {
        const BUSY = 1 << 3;
        const RXFE = 1 << 4;
        const TXFF = 1 << 5;
    }

    /// UARTLCR_H bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineControl: u32 {
        const FEN = 1 << 4;
        const WLEN_8 = 0b11 << 5;
    }

    /// UARTCR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control: u32 {
        const UARTEN = 1 << 0;
        const TXE = 1 << 8;
        const RXE = 1 << 9;
    }
}

/// PL011 console component configuration
#[derive(Clone, Copy)]
pub struct Pl011Config {
    /// Physical MMIO base of the UART
    pub mmio_base: usize,
    /// Physical MMIO base of the GPIO block
    pub gpio_base: usize,
    /// UART reference clock in Hz
    pub clock_hz: u32,
    pub baud: u32,
}

/// Integer and fractional baud rate divisors for the PL011
///
/// The divisor is `clock / (16 * baud)`; the fractional part is kept in 64ths.
pub const fn baud_divisors(clock_hz: u32, baud: u32) -> (u32, u32) {
    let divisor_64ths = (clock_hz as u64 * 4) / baud as u64;
    ((divisor_64ths >> 6) as u32, (divisor_64ths & 0x3F) as u32)
}

/// PL011 polled serial console
///
/// # Safety
/// This component directly accesses MMIO registers. Nothing else may drive
/// UART0 or GPIO 14/15 while it is in use.
pub struct Pl011Console {
    config: Pl011Config,
}

impl Pl011Console {
    pub const fn new(config: Pl011Config) -> Self {
        Self { config }
    }

    /// Bring up UART0 at the configured baud rate, 8N1, FIFOs enabled
    pub fn init(&self) {
        let (ibrd, fbrd) = baud_divisors(self.config.clock_hz, self.config.baud);

        unsafe {
            // Disable while reconfiguring
            self.write_reg(UARTCR, 0);
            while self.flags().contains(Flags::BUSY) {
                core::hint::spin_loop();
            }

            self.route_gpio_pins();

            self.write_reg(UARTICR, ALL_INTERRUPTS);
            self.write_reg(UARTIBRD, ibrd);
            self.write_reg(UARTFBRD, fbrd);
            self.write_reg(UARTLCR_H, (LineControl::FEN | LineControl::WLEN_8).bits());
            self.write_reg(
                UARTCR,
                (Control::UARTEN | Control::TXE | Control::RXE).bits(),
            );
        }
    }

    /// Switch GPIO 14/15 to ALT0 (TXD0/RXD0) with pulls disabled
    unsafe fn route_gpio_pins(&self) {
        let gpio = self.config.gpio_base;

        let mut fsel = ptr::read_volatile((gpio + GPFSEL1) as *const u32);
        fsel &= !((GPIO_FUNCTION_MASK << GPFSEL1_PIN14_SHIFT)
            | (GPIO_FUNCTION_MASK << GPFSEL1_PIN15_SHIFT));
        fsel |= (GPIO_FUNCTION_ALT0 << GPFSEL1_PIN14_SHIFT)
            | (GPIO_FUNCTION_ALT0 << GPFSEL1_PIN15_SHIFT);
        ptr::write_volatile((gpio + GPFSEL1) as *mut u32, fsel);

        ptr::write_volatile((gpio + GPPUD) as *mut u32, 0);
        arch::spin_cycles(GPIO_PULL_SETTLE_CYCLES);
        ptr::write_volatile((gpio + GPPUDCLK0) as *mut u32, (1 << 14) | (1 << 15));
        arch::spin_cycles(GPIO_PULL_SETTLE_CYCLES);
        ptr::write_volatile((gpio + GPPUDCLK0) as *mut u32, 0);
    }

    #[inline]
    fn flags(&self) -> Flags {
        Flags::from_bits_truncate(unsafe { self.read_reg(UARTFR) })
    }

    #[inline]
    unsafe fn read_reg(&self, offset: usize) -> u32 {
        ptr::read_volatile((self.config.mmio_base + offset) as *const u32)
    }

    #[inline]
    unsafe fn write_reg(&self, offset: usize, value: u32) {
        ptr::write_volatile((self.config.mmio_base + offset) as *mut u32, value);
    }
}

impl Console for Pl011Console {
    fn putc(&self, c: u8) {
        // Wait until TX FIFO not full
        while self.flags().contains(Flags::TXFF) {
            core::hint::spin_loop();
        }

        unsafe { self.write_reg(UARTDR, c as u32) };
    }
}

impl SerialInput for Pl011Console {
    fn has_input(&self) -> bool {
        !self.flags().contains(Flags::RXFE)
    }

    fn read_byte(&self) -> u8 {
        while !self.has_input() {
            core::hint::spin_loop();
        }

        (unsafe { self.read_reg(UARTDR) } & 0xFF) as u8
    }
}
