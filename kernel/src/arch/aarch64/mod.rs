//! ARM64 (AArch64) architecture-specific code

use aarch64_cpu::asm;
use aarch64_cpu::asm::barrier;

/// Park the core forever
///
/// `wfe` keeps the core in a low-power state; the loop covers spurious wakeups.
pub fn halt() -> ! {
    loop {
        asm::wfe();
    }
}

/// Burn roughly `cycles` CPU cycles
#[inline]
pub fn spin_cycles(cycles: u32) {
    for _ in 0..cycles {
        asm::nop();
    }
}

/// Full-system data synchronisation barrier
///
/// Orders memory writes against device accesses (mailbox handoff).
#[inline(always)]
pub fn data_barrier() {
    barrier::dsb(barrier::SY);
}
