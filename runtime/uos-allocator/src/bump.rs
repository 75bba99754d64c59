//! Bump-pointer allocator state

use core::ptr::{self, NonNull};

use static_assertions::const_assert;

use crate::{AllocError, Result};

/// Every allocation is rounded up to a multiple of this many bytes.
pub const ALLOCATION_GRANULE: usize = 4;

const_assert!(ALLOCATION_GRANULE.is_power_of_two());

/// Heap usage snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Size of the whole heap region (`limit - heap_start`)
    pub total: usize,
    /// Bytes handed out so far, including granule rounding
    pub used: usize,
    /// Bytes left between the cursor and the limit
    pub free: usize,
}

/// Flat bump allocator
///
/// Allocations are carved from `[heap_start, limit)` in increasing address
/// order. Nothing is ever reclaimed, so a returned block stays valid for the
/// lifetime of the allocator.
#[derive(Debug)]
pub struct BumpAllocator {
    heap_start: usize,
    cursor: usize,
    limit: usize,
    bytes_allocated: usize,
}

impl BumpAllocator {
    /// An allocator with an empty region. Every non-zero request fails.
    pub const fn empty() -> Self {
        Self {
            heap_start: 0,
            cursor: 0,
            limit: 0,
            bytes_allocated: 0,
        }
    }

    /// Create an allocator over `[heap_start, heap_limit)`
    ///
    /// Fails with [`AllocError::InvalidBounds`] if the bounds are inverted or a
    /// non-empty region starts at address zero.
    ///
    /// # Safety
    /// The region must be valid, writable memory that nothing else uses for as
    /// long as the allocator or any block it returned is alive.
    pub unsafe fn new(heap_start: usize, heap_limit: usize) -> Result<Self> {
        if heap_start > heap_limit || (heap_start == 0 && heap_limit != 0) {
            return Err(AllocError::InvalidBounds {
                start: heap_start,
                limit: heap_limit,
            });
        }

        log::debug!("heap: {:#x}..{:#x}", heap_start, heap_limit);

        Ok(Self {
            heap_start,
            cursor: heap_start,
            limit: heap_limit,
            bytes_allocated: 0,
        })
    }

    /// Allocate `size` bytes
    ///
    /// Returns `Ok(None)` for a zero-sized request. Otherwise the size is
    /// rounded up to [`ALLOCATION_GRANULE`] and the block starts at the old
    /// cursor. On exhaustion the cursor is left untouched.
    pub fn allocate(&mut self, size: usize) -> Result<Option<NonNull<u8>>> {
        if size == 0 {
            return Ok(None);
        }

        let aligned = align_up(size, ALLOCATION_GRANULE).ok_or(self.out_of_memory(size))?;
        self.bump(0, aligned, size).map(Some)
    }

    /// Allocate `size` bytes and fill them with zeroes
    pub fn allocate_zeroed(&mut self, size: usize) -> Result<Option<NonNull<u8>>> {
        let block = self.allocate(size)?;

        if let Some(ptr) = block {
            // SAFETY: the block lies inside the region handed to `new`, which the
            // caller guaranteed to be writable, and nobody else owns it yet.
            unsafe { ptr::write_bytes(ptr.as_ptr(), 0, size) };
        }

        Ok(block)
    }

    /// Allocate `size` bytes at an address aligned to `align`
    ///
    /// Used by the `GlobalAlloc` front end. Alignments below the granule are
    /// raised to it; padding skipped to reach the alignment counts as used.
    pub fn allocate_aligned(&mut self, size: usize, align: usize) -> Result<Option<NonNull<u8>>> {
        if size == 0 {
            return Ok(None);
        }

        let align = align.max(ALLOCATION_GRANULE);
        let start = align_up(self.cursor, align).ok_or(self.out_of_memory(size))?;
        let aligned = align_up(size, ALLOCATION_GRANULE).ok_or(self.out_of_memory(size))?;

        self.bump(start - self.cursor, aligned, size).map(Some)
    }

    /// Give a block back
    ///
    /// This allocator never reclaims memory; the call only exists so callers
    /// can be written against a conventional interface.
    pub fn release(&mut self, ptr: NonNull<u8>) {
        log::trace!("heap: release of {:p} ignored", ptr);
    }

    /// Current usage
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            total: self.limit - self.heap_start,
            used: self.bytes_allocated,
            free: self.limit - self.cursor,
        }
    }

    pub fn heap_start(&self) -> usize {
        self.heap_start
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn bump(&mut self, padding: usize, aligned: usize, requested: usize) -> Result<NonNull<u8>> {
        let consumed = padding
            .checked_add(aligned)
            .ok_or(self.out_of_memory(requested))?;
        let end = self
            .cursor
            .checked_add(consumed)
            .filter(|&end| end <= self.limit)
            .ok_or(self.out_of_memory(requested))?;

        let block = self.cursor + padding;
        let ptr = NonNull::new(block as *mut u8).ok_or(self.out_of_memory(requested))?;

        self.cursor = end;
        self.bytes_allocated += consumed;

        Ok(ptr)
    }

    fn out_of_memory(&self, requested: usize) -> AllocError {
        AllocError::OutOfMemory {
            requested,
            available: self.limit - self.cursor,
        }
    }
}

impl Default for BumpAllocator {
    fn default() -> Self {
        Self::empty()
    }
}

/// Round `value` up to a multiple of `align` (a power of two)
#[inline]
fn align_up(value: usize, align: usize) -> Option<usize> {
    value
        .checked_add(align - 1)
        .map(|v| v & !(align - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;
    use std::vec::Vec;

    const BASE: usize = 0x10_0000;

    fn allocator(size: usize) -> BumpAllocator {
        // Addresses are never dereferenced by `allocate`, so a synthetic region works.
        unsafe { BumpAllocator::new(BASE, BASE + size).unwrap() }
    }

    fn addr(block: Option<NonNull<u8>>) -> usize {
        block.unwrap().as_ptr() as usize
    }

    #[test]
    fn test_zero_size_is_empty_result() {
        let mut heap = allocator(64);
        assert_eq!(heap.allocate(0), Ok(None));
        assert_eq!(heap.cursor(), BASE);
        assert_eq!(heap.stats().used, 0);
    }

    #[test]
    fn test_sizes_round_up_to_granule() {
        let mut heap = allocator(64);
        let a = addr(heap.allocate(1).unwrap());
        let b = addr(heap.allocate(5).unwrap());
        let c = addr(heap.allocate(8).unwrap());

        assert_eq!(a, BASE);
        assert_eq!(b, BASE + 4);
        assert_eq!(c, BASE + 12);
        assert_eq!(heap.stats().used, 4 + 8 + 8);
    }

    #[test]
    fn test_allocations_are_monotonic_and_disjoint() {
        let mut heap = allocator(4096);
        let sizes = [3usize, 17, 1, 64, 9, 12, 100, 2];
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        let mut expected_used = 0;

        for &size in &sizes {
            let start = addr(heap.allocate(size).unwrap());
            let aligned = (size + 3) & !3;

            if let Some(&(prev_start, _)) = blocks.last() {
                assert!(start >= prev_start);
            }
            for &(other, other_len) in &blocks {
                assert!(start >= other + other_len || start + aligned <= other);
            }

            blocks.push((start, aligned));
            expected_used += aligned;
            assert_eq!(heap.stats().used, expected_used);
        }
    }

    #[test]
    fn test_exhaustion_leaves_cursor_unchanged() {
        let mut heap = allocator(16);
        heap.allocate(12).unwrap();
        let cursor = heap.cursor();

        let err = heap.allocate(5).unwrap_err();
        assert_eq!(
            err,
            AllocError::OutOfMemory {
                requested: 5,
                available: 4
            }
        );
        assert_eq!(heap.cursor(), cursor);

        // The last granule is still usable.
        assert_eq!(addr(heap.allocate(4).unwrap()), BASE + 12);
        assert!(heap.allocate(1).is_err());
    }

    #[test]
    fn test_huge_request_does_not_overflow() {
        let mut heap = allocator(16);
        assert!(heap.allocate(usize::MAX).is_err());
        assert!(heap.allocate(usize::MAX - 2).is_err());
        assert_eq!(heap.cursor(), BASE);
    }

    #[test]
    fn test_stats() {
        let mut heap = allocator(100);
        heap.allocate(10).unwrap();

        let stats = heap.stats();
        assert_eq!(stats.total, 100);
        assert_eq!(stats.used, 12);
        assert_eq!(stats.free, 88);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = unsafe { BumpAllocator::new(0x2000, 0x1000) }.unwrap_err();
        assert_eq!(
            err,
            AllocError::InvalidBounds {
                start: 0x2000,
                limit: 0x1000
            }
        );
    }

    #[test]
    fn test_empty_region_is_valid_but_full() {
        let mut heap = unsafe { BumpAllocator::new(BASE, BASE).unwrap() };
        assert!(heap.allocate(1).is_err());
        assert_eq!(heap.stats(), HeapStats::default());

        let mut empty = BumpAllocator::empty();
        assert!(empty.allocate(4).is_err());
    }

    #[test]
    fn test_release_is_a_no_op() {
        let mut heap = allocator(32);
        let block = heap.allocate(8).unwrap().unwrap();
        heap.release(block);

        assert_eq!(heap.stats().used, 8);
        assert_eq!(addr(heap.allocate(8).unwrap()), BASE + 8);
    }

    #[test]
    fn test_allocate_zeroed_clears_memory() {
        let mut backing = vec![0xAAu8; 64];
        let start = backing.as_mut_ptr() as usize;
        let mut heap = unsafe { BumpAllocator::new(start, start + backing.len()).unwrap() };

        let block = heap.allocate_zeroed(6).unwrap().unwrap();
        assert_eq!(block.as_ptr() as usize, start);
        assert!(backing[..6].iter().all(|&b| b == 0));
        assert_eq!(backing[6], 0xAA);
    }

    #[test]
    fn test_allocate_zeroed_propagates_failure() {
        let mut heap = allocator(4);
        assert_eq!(heap.allocate_zeroed(0), Ok(None));
        assert!(heap.allocate_zeroed(8).is_err());
        assert_eq!(heap.cursor(), BASE);
    }

    #[test]
    fn test_allocate_aligned_counts_padding() {
        let mut heap = allocator(128);
        heap.allocate(4).unwrap();

        let block = addr(heap.allocate_aligned(8, 16).unwrap());
        assert_eq!(block % 16, 0);
        assert_eq!(block, BASE + 16);
        assert_eq!(heap.stats().used, 4 + 12 + 8);
    }
}
