//! VideoCore mailbox (property-less framebuffer channel)
//!
//! The framebuffer is requested by handing the GPU the bus address of a
//! 16-byte-aligned [`FramebufferRequest`] on channel 1. The GPU fills in the
//! pitch, pointer and size and answers on the same channel.

use bitflags::bitflags;
use core::ptr;

use crate::arch;

const MAILBOX_READ: usize = 0x00;
const MAILBOX_STATUS: usize = 0x18;
const MAILBOX_WRITE: usize = 0x20;

/// Framebuffer channel
pub const CHANNEL_FRAMEBUFFER: u8 = 1;

/// Bus alias the GPU uses for uncached ARM memory
pub const GPU_MEMORY_ALIAS: u32 = 0x4000_0000;
/// Strips the bus alias from a GPU-returned address
pub const BUS_ADDRESS_MASK: u32 = 0x3FFF_FFFF;

const CHANNEL_MASK: u32 = 0xF;

bitflags! {
    /// Mailbox status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        const EMPTY = 1 << 30;
        const FULL = 1 << 31;
    }
}

/// Framebuffer request block shared with the GPU
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramebufferRequest {
    pub width: u32,
    pub height: u32,
    pub virtual_width: u32,
    pub virtual_height: u32,
    /// Filled by the GPU
    pub pitch: u32,
    pub depth: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    /// Filled by the GPU
    pub pointer: u32,
    /// Filled by the GPU
    pub size: u32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<FramebufferRequest>(), 48);
static_assertions::const_assert_eq!(core::mem::align_of::<FramebufferRequest>(), 16);

impl FramebufferRequest {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            virtual_width: width,
            virtual_height: height,
            pitch: 0,
            depth,
            x_offset: 0,
            y_offset: 0,
            pointer: 0,
            size: 0,
        }
    }

    /// ARM physical address of the granted framebuffer, if any
    pub fn framebuffer_address(&self) -> Option<usize> {
        match self.pointer & BUS_ADDRESS_MASK {
            0 => None,
            addr => Some(addr as usize),
        }
    }
}

/// Encode a message word: 28-bit payload address plus channel
pub const fn compose(data: u32, channel: u8) -> u32 {
    (data & !CHANNEL_MASK) | (channel as u32 & CHANNEL_MASK)
}

/// Mailbox 0 on the BCM2837
pub struct Mailbox {
    base: usize,
}

impl Mailbox {
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// Post `data` (16-byte aligned) on `channel`
    ///
    /// # Safety
    /// `data` must be the bus address of memory that stays valid until the
    /// GPU has answered.
    pub unsafe fn write(&self, channel: u8, data: u32) {
        while self.status().contains(Status::FULL) {
            core::hint::spin_loop();
        }
        arch::data_barrier();
        ptr::write_volatile((self.base + MAILBOX_WRITE) as *mut u32, compose(data, channel));
    }

    /// Wait for the next reply on `channel`, discarding replies for others
    pub fn read(&self, channel: u8) -> u32 {
        loop {
            while self.status().contains(Status::EMPTY) {
                core::hint::spin_loop();
            }

            let word = unsafe { ptr::read_volatile((self.base + MAILBOX_READ) as *const u32) };
            if word & CHANNEL_MASK == channel as u32 {
                arch::data_barrier();
                return word & !CHANNEL_MASK;
            }
        }
    }

    /// Write a request and wait for its reply
    ///
    /// # Safety
    /// Same contract as [`Mailbox::write`].
    pub unsafe fn call(&self, channel: u8, data: u32) -> u32 {
        self.write(channel, data);
        self.read(channel)
    }

    fn status(&self) -> Status {
        Status::from_bits_truncate(unsafe {
            ptr::read_volatile((self.base + MAILBOX_STATUS) as *const u32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_keeps_channel_in_low_nibble() {
        assert_eq!(compose(0x0010_0000, CHANNEL_FRAMEBUFFER), 0x0010_0001);
        assert_eq!(compose(0x0010_000F, 8), 0x0010_0008);
    }

    #[test]
    fn test_request_defaults_virtual_size() {
        let req = FramebufferRequest::new(640, 480, 32);
        assert_eq!(req.virtual_width, 640);
        assert_eq!(req.virtual_height, 480);
        assert_eq!(req.pointer, 0);
        assert_eq!(req.framebuffer_address(), None);
    }

    #[test]
    fn test_framebuffer_address_strips_bus_alias() {
        let mut req = FramebufferRequest::new(640, 480, 32);
        req.pointer = 0xC3E0_0000;
        assert_eq!(req.framebuffer_address(), Some(0x03E0_0000));
    }
}
