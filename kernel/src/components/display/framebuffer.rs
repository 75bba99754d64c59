//! Mailbox framebuffer console component
//!
//! Negotiates a 32-bit linear framebuffer with the GPU and exposes it as a
//! [`Console`]. Until `init` succeeds the console stays detached and drops
//! everything written to it.

use core::ptr;
use spin::Mutex;

use super::mailbox::{FramebufferRequest, Mailbox, CHANNEL_FRAMEBUFFER, GPU_MEMORY_ALIAS};
use super::{Phosphor, PixelSurface, TextConsole};
use crate::components::console::Console;
use crate::error::{KernelError, Result};

/// Framebuffer console configuration
#[derive(Clone, Copy)]
pub struct FramebufferConfig {
    pub mailbox_base: usize,
    pub width: u32,
    pub height: u32,
    /// Bits per pixel; only 32 is drawn correctly
    pub depth: u32,
    pub phosphor: Phosphor,
}

/// What the GPU granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    pub address: usize,
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
}

/// 32bpp pixel memory accessed with volatile stores
pub struct MmioSurface {
    base: usize,
    width: u32,
    height: u32,
    /// Bytes per row
    pitch: u32,
}

impl MmioSurface {
    /// # Safety
    /// `base` must point to at least `pitch * height` bytes of writable pixel
    /// memory owned by this surface.
    pub unsafe fn new(base: usize, width: u32, height: u32, pitch: u32) -> Self {
        Self {
            base,
            width,
            height,
            pitch,
        }
    }

    #[inline]
    fn row(&self, y: u32) -> *mut u32 {
        (self.base + (y as usize) * (self.pitch as usize)) as *mut u32
    }
}

impl PixelSurface for MmioSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);

        for row_y in y..y_end {
            let row = self.row(row_y);
            for col in x..x_end {
                unsafe { ptr::write_volatile(row.add(col as usize), color) };
            }
        }
    }

    fn scroll_up(&mut self, rows: u32, fill: u32) {
        let rows = rows.min(self.height);
        for y in 0..self.height - rows {
            let (dst, src) = (self.row(y), self.row(y + rows));
            for col in 0..self.width as usize {
                unsafe {
                    let pixel = ptr::read_volatile(src.add(col));
                    ptr::write_volatile(dst.add(col), pixel);
                }
            }
        }

        let width = self.width;
        self.fill_rect(0, self.height - rows, width, rows, fill);
    }
}

/// Text console drawn on the GPU framebuffer
pub struct FramebufferConsole {
    config: FramebufferConfig,
    mailbox: Mailbox,
    request: Mutex<FramebufferRequest>,
    text: Mutex<TextConsole<MmioSurface>>,
}

impl FramebufferConsole {
    pub const fn new(config: FramebufferConfig) -> Self {
        Self {
            mailbox: Mailbox::new(config.mailbox_base),
            request: Mutex::new(FramebufferRequest::new(config.width, config.height, config.depth)),
            text: Mutex::new(TextConsole::detached(config.phosphor.palette())),
            config,
        }
    }

    /// Ask the GPU for a framebuffer and attach the text layer to it
    ///
    /// Fails with [`KernelError::DisplayUnavailable`] when the GPU does not
    /// grant a buffer; the console then keeps discarding output.
    pub fn init(&self) -> Result<SurfaceInfo> {
        let mut request = self.request.lock();
        *request = FramebufferRequest::new(self.config.width, self.config.height, self.config.depth);

        let addr = &*request as *const FramebufferRequest as usize;
        let bus_addr = u32::try_from(addr).map_err(|_| KernelError::DisplayUnavailable)?;

        unsafe {
            self.mailbox
                .call(CHANNEL_FRAMEBUFFER, bus_addr | GPU_MEMORY_ALIAS);
        }

        // Written by the GPU behind the compiler's back
        let granted = unsafe { ptr::read_volatile(&*request) };
        let Some(address) = granted.framebuffer_address() else {
            log::warn!("framebuffer request refused");
            return Err(KernelError::DisplayUnavailable);
        };

        let info = SurfaceInfo {
            address,
            width: granted.width,
            height: granted.height,
            pitch: granted.pitch,
        };
        log::info!(
            "framebuffer {}x{} pitch {} at {:#x}",
            info.width,
            info.height,
            info.pitch,
            info.address
        );

        let surface = unsafe { MmioSurface::new(address, info.width, info.height, info.pitch) };
        self.text.lock().attach(surface);
        Ok(info)
    }

    pub fn is_attached(&self) -> bool {
        self.text.lock().is_attached()
    }

    pub fn clear(&self) {
        self.text.lock().clear();
    }

    pub fn scroll_up_one_line(&self) {
        self.text.lock().scroll_up_one_line();
    }
}

impl Console for FramebufferConsole {
    fn putc(&self, c: u8) {
        self.text.lock().write_char(c);
    }

    // The text layer handles '\n' itself; no CRLF expansion here
    fn puts(&self, s: &str) {
        let mut text = self.text.lock();
        for byte in s.bytes() {
            text.write_char(byte);
        }
    }
}
