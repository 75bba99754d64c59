//! UOS kernel
//!
//! A bare-metal terminal kernel for the Raspberry Pi 3 (ARM64). It brings up
//! the serial line, the framebuffer and the system timer, initialises a bump
//! heap, and runs a RobCo-style login followed by a line-oriented command shell.
//!
//! # Architecture
//!
//! The kernel is organized into the following modules:
//! - `boot`: Boot sequence and the [`Board`](boot::Board) abstraction
//! - `components`: Device components (PL011 console, framebuffer, system timer)
//! - `shell`: Login state machine, line editing, command registry and dispatch
//! - `memory`: Kernel heap on top of `uos-allocator`
//! - `arch`: Architecture-specific code (ARM64)
//! - `debug`: `kprint!` macros and the `log` backend
//! - `config`: Compile-time constants and board component composition
//!
//! Everything above `components` works on traits (`Console`, `SerialInput`,
//! `Clock`, `Board`), so the whole boot-to-shell path runs on the host under
//! `cargo test` with scripted devices.

#![no_std]

#[cfg(test)]
extern crate std;

// Module declarations
pub mod arch;
pub mod boot;
pub mod components;
pub mod config;
pub mod debug;
pub mod error;
pub mod memory;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{KernelError, Result};
