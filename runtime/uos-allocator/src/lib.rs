//! Bump allocator for the UOS kernel heap
//!
//! The kernel owns a single flat heap region for its whole lifetime. This crate
//! hands out memory from that region by advancing a cursor and never gives any
//! of it back.
//!
//! # Design
//! - [`BumpAllocator`] is the plain allocator state: `heap_start <= cursor <= limit`,
//!   the cursor only moves forward, and no two live allocations overlap.
//! - Every request is rounded up to a 4-byte granule.
//! - [`BumpAllocator::release`] is accepted and ignored. Reclamation is not
//!   supported; a kernel that needs it must replace this crate, not patch it.
//! - [`LockedBumpAllocator`] wraps the state in a `spin::Mutex` so it can sit in a
//!   `static` and serve as the `#[global_allocator]`.

#![no_std]

#[cfg(test)]
extern crate std;

mod bump;
mod locked;

pub use bump::{BumpAllocator, HeapStats, ALLOCATION_GRANULE};
pub use locked::LockedBumpAllocator;

use thiserror::Error;

/// Errors reported by the heap allocator
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("out of heap memory (requested: {requested} bytes, available: {available} bytes)")]
    OutOfMemory { requested: usize, available: usize },

    #[error("invalid heap bounds: {start:#x}..{limit:#x}")]
    InvalidBounds { start: usize, limit: usize },
}

pub type Result<T> = core::result::Result<T, AllocError>;
