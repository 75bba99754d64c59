//! Host stand-ins for the architecture hooks

use core::sync::atomic::{fence, Ordering};

pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[inline]
pub fn spin_cycles(cycles: u32) {
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}

#[inline(always)]
pub fn data_barrier() {
    fence(Ordering::SeqCst);
}
