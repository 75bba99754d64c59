//! Kernel components
//!
//! Minimal device components built into the kernel. Each one does only what
//! the boot sequence and the terminal need: there are no interrupts, no DMA and
//! no buffering anywhere in here, every wait is a poll.
//!
//! - **console**: character sinks (`Console`), serial input (`SerialInput`) and
//!   the `FanOut` that mirrors terminal output to every sink
//! - **display**: mailbox framebuffer with a text cursor on top
//! - **timer**: free-running system timer and busy-wait delays (`Clock`)
//!
//! # Component Composition (Compile-Time)
//!
//! Components are selected with cargo features and instantiated as statics in
//! [`crate::config`]:
//!
//! ```ignore
//! #[cfg(feature = "display-null")]
//! pub static DISPLAY: NullConsole = NullConsole::new(NullConfig);
//! ```

pub mod console;
pub mod display;
pub mod timer;
