//! Kernel heap
//!
//! [`HEAP`] is the global allocator on the bare-metal target, so `alloc`
//! collections work once [`LockedBumpAllocator::init`] has run. Memory is never
//! returned: deallocation is a no-op.

use uos_allocator::LockedBumpAllocator;

/// Kernel heap allocator instance
#[cfg_attr(target_os = "none", global_allocator)]
pub static HEAP: LockedBumpAllocator = LockedBumpAllocator::new();

cfg_if::cfg_if! {
    if #[cfg(target_os = "none")] {
        use crate::config::HEAP_SIZE;

        extern "C" {
            /// First byte after the kernel image (see linker.ld)
            static __heap_start: u8;
        }

        fn heap_start() -> usize {
            unsafe { core::ptr::addr_of!(__heap_start) as usize }
        }

        /// Heap bounds `[start, limit)` for this image
        pub fn heap_region() -> (usize, usize) {
            let start = heap_start();
            (start, start + HEAP_SIZE)
        }
    } else {
        /// Hosted builds have no linker-provided heap; report an empty region
        pub fn heap_region() -> (usize, usize) {
            (0, 0)
        }
    }
}
