//! Memory management
//!
//! The kernel owns a single heap region that starts at the linker-provided
//! `__heap_start` symbol and spans [`HEAP_SIZE`](crate::config::HEAP_SIZE)
//! bytes. It is managed by the bump allocator in `uos-allocator`; there is no
//! paging and no frame allocator.

pub mod heap;

pub use heap::{heap_region, HEAP};
