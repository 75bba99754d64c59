//! Display component
//!
//! The display is a linear 32-bit framebuffer negotiated with the VideoCore
//! firmware over the mailbox. Text is painted one fixed-size cell at a time:
//! printable characters become a solid foreground cell (there is no font), the
//! cursor wraps at the right edge and the surface scrolls up one text line when
//! the cursor would leave the bottom.
//!
//! The painting logic in [`TextConsole`] works on any [`PixelSurface`], which
//! keeps it independent of the MMIO framebuffer.

pub mod framebuffer;
pub mod mailbox;

use crate::config::{GLYPH_HEIGHT, GLYPH_WIDTH};

/// Terminal colour schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phosphor {
    Green,
    Amber,
    Blue,
    WhiteOnBlack,
}

/// Foreground/background pair in 0x00RRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: u32,
    pub background: u32,
}

impl Phosphor {
    pub const fn palette(self) -> Palette {
        let foreground = match self {
            Phosphor::Green => 0x0033_FF33,
            Phosphor::Amber => 0x00FF_B000,
            Phosphor::Blue => 0x0033_99FF,
            Phosphor::WhiteOnBlack => 0x00FF_FFFF,
        };

        Palette {
            foreground,
            background: 0x0000_0000,
        }
    }
}

/// Pixel-addressed drawing target
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill a rectangle; callers keep it inside the surface
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: u32);

    /// Move every pixel row up by `rows` and fill the exposed rows
    fn scroll_up(&mut self, rows: u32, fill: u32);
}

/// Text cursor position, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub x: u32,
    pub y: u32,
}

/// Text layer over an optional surface
///
/// Without a surface every operation is a no-op, which is how the kernel runs
/// when display negotiation fails.
pub struct TextConsole<S> {
    surface: Option<S>,
    cursor: CursorPosition,
    palette: Palette,
}

impl<S: PixelSurface> TextConsole<S> {
    pub const fn detached(palette: Palette) -> Self {
        Self {
            surface: None,
            cursor: CursorPosition { x: 0, y: 0 },
            palette,
        }
    }

    /// Take ownership of a surface and clear it
    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
        self.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn cursor(&self) -> CursorPosition {
        self.cursor
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Paint the whole surface with the background and home the cursor
    pub fn clear(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let (w, h) = (surface.width(), surface.height());
        surface.fill_rect(0, 0, w, h, self.palette.background);
        self.cursor = CursorPosition::default();
    }

    pub fn scroll_up_one_line(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.scroll_up(GLYPH_HEIGHT, self.palette.background);
        }
    }

    /// Paint one character at the cursor and advance it
    pub fn write_char(&mut self, c: u8) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let (width, height) = (surface.width(), surface.height());

        match c {
            b'\n' => {
                self.cursor.x = 0;
                self.cursor.y += GLYPH_HEIGHT;
            }
            b'\r' => self.cursor.x = 0,
            b' '..=b'~' => {
                let color = if c == b' ' {
                    self.palette.background
                } else {
                    self.palette.foreground
                };
                self.paint_cell(color);

                self.cursor.x += GLYPH_WIDTH;
                if self.cursor.x + GLYPH_WIDTH > width {
                    self.cursor.x = 0;
                    self.cursor.y += GLYPH_HEIGHT;
                }
            }
            _ => {}
        }

        if self.cursor.y + GLYPH_HEIGHT > height {
            self.scroll_up_one_line();
            self.cursor.y = height.saturating_sub(GLYPH_HEIGHT);
        }
    }

    fn paint_cell(&mut self, color: u32) {
        let CursorPosition { x, y } = self.cursor;
        if let Some(surface) = self.surface.as_mut() {
            if x + GLYPH_WIDTH <= surface.width() && y + GLYPH_HEIGHT <= surface.height() {
                surface.fill_rect(x, y, GLYPH_WIDTH, GLYPH_HEIGHT, color);
            }
        }
    }
}
