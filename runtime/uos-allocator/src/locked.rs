//! Spin-locked allocator for use in a `static`

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{null_mut, NonNull};

use spin::{Mutex, MutexGuard};

use crate::{BumpAllocator, HeapStats, Result};

/// [`BumpAllocator`] behind a `spin::Mutex`
///
/// Starts out empty; [`LockedBumpAllocator::init`] attaches the heap region
/// during boot. Also implements `GlobalAlloc`, so the kernel binary can register
/// it as `#[global_allocator]`.
pub struct LockedBumpAllocator {
    inner: Mutex<BumpAllocator>,
}

impl LockedBumpAllocator {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(BumpAllocator::empty()),
        }
    }

    /// Attach the heap region `[heap_start, heap_limit)`
    ///
    /// # Safety
    /// Same contract as [`BumpAllocator::new`]. Must be called once, before the
    /// first allocation; blocks handed out earlier would alias the new region.
    pub unsafe fn init(&self, heap_start: usize, heap_limit: usize) -> Result<HeapStats> {
        let heap = BumpAllocator::new(heap_start, heap_limit)?;
        let stats = heap.stats();
        *self.inner.lock() = heap;
        Ok(stats)
    }

    pub fn allocate(&self, size: usize) -> Result<Option<NonNull<u8>>> {
        let result = self.inner.lock().allocate(size);
        if let Err(err) = &result {
            log::warn!("heap: {}", err);
        }
        result
    }

    pub fn allocate_zeroed(&self, size: usize) -> Result<Option<NonNull<u8>>> {
        let result = self.inner.lock().allocate_zeroed(size);
        if let Err(err) = &result {
            log::warn!("heap: {}", err);
        }
        result
    }

    pub fn release(&self, ptr: NonNull<u8>) {
        self.inner.lock().release(ptr)
    }

    pub fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }

    /// Direct access to the allocator state
    pub fn lock(&self) -> MutexGuard<'_, BumpAllocator> {
        self.inner.lock()
    }
}

impl Default for LockedBumpAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for LockedBumpAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        match self.inner.lock().allocate_aligned(layout.size(), layout.align()) {
            Ok(Some(ptr)) => ptr.as_ptr(),
            Ok(None) | Err(_) => null_mut(),
        }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        if let Some(ptr) = NonNull::new(ptr) {
            self.inner.lock().release(ptr);
        }
    }
}
