//! UOS kernel image
//!
//! Bare-metal entry for `aarch64-unknown-none`. On any hosted target this is a
//! stub; the kernel itself lives in the `uos_kernel` library and is tested
//! there.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod entry {
    use core::arch::global_asm;
    use core::panic::PanicInfo;
    use core::sync::atomic::{AtomicBool, Ordering};

    // Firmware entry at the load address, every core at once.
    //
    // Secondary cores park in wfe. Core 0 puts its stack just below the image,
    // zeroes .bss and calls kernel_entry, which never returns.
    global_asm!(
        ".section .text._start",
        ".global _start",
        ".type _start, @function",
        "_start:",
        "    mrs  x1, mpidr_el1",
        "    and  x1, x1, #3",
        "    cbz  x1, 2f",
        "1:  wfe",
        "    b    1b",
        "2:  ldr  x1, =_start",
        "    mov  sp, x1",
        "    ldr  x1, =__bss_start",
        "    ldr  x2, =__bss_end",
        "3:  cmp  x1, x2",
        "    b.hs 4f",
        "    str  xzr, [x1], #8",
        "    b    3b",
        "4:  bl   {entry}",
        "    b    1b",
        entry = sym uos_kernel::boot::kernel_entry,
    );

    static PANICKING: AtomicBool = AtomicBool::new(false);

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        // A panic while printing the panic must not recurse
        if !PANICKING.swap(true, Ordering::SeqCst) {
            uos_kernel::kprintln!();
            uos_kernel::kprintln!("*** KERNEL PANIC ***");
            uos_kernel::kprintln!("{}", info);
            uos_kernel::kprintln!("System halted.");
        }
        uos_kernel::arch::halt()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("uos-kernel is a bare-metal image; build it for aarch64-unknown-none");
}
