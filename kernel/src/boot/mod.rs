//! Boot sequence
//!
//! Runs once, start to finish, on the boot core:
//! 1. Serial and display bring-up
//! 2. Banner and the scripted boot log
//! 3. Heap and timer initialisation, with the subsystem checklist
//! 4. Login
//! 5. The command shell, until a command ends the session
//!
//! [`run`] returns why the machine stopped; [`kernel_entry`] then halts the core.
//! All delays on the way are cosmetic.

pub mod board;

use uos_allocator::LockedBumpAllocator;

pub use board::{Board, RaspberryPi3};

use crate::components::console::{Console, FanOut};
use crate::components::timer::Clock;
use crate::config::{
    BOOT_LINE_DELAY_MS, COPYRIGHT, KERNEL_VERSION, LOGIN_SCREEN_DELAY_MS, OS_NAME,
    SUBSYSTEM_DELAY_MS, VERSION,
};
use crate::error::KernelError;
use crate::shell::{Environment, Session, Shell};

const BANNER_RULE: &str =
    "================================================================================";
const LOGIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Scripted boot log, one line per step
pub const BOOT_MESSAGES: [&str; 5] = [
    "RETROS-BIOS v4.2.0.1 - Basic system initialization complete",
    "MFBootAgent v2.3.0 - Boot device scan successful",
    "Loading UOS kernel from SD card...",
    "Kernel image verified",
    "Transferring control to operating system...",
];

/// Services without a real driver; reported as up regardless
const PLACEHOLDER_SERVICES: [&str; 3] = ["File System Service", "Network Service", "Security Service"];

/// Why the kernel stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// Boot could not complete
    Configuration(KernelError),
    /// Wrong credentials at the login prompt
    LoginRejected,
    /// LOGOUT or EXIT
    SessionEnded,
}

fn print_banner(out: &FanOut<'_>) {
    out.newline();
    out.write_line(BANNER_RULE);
    let _ = write!(out, "         {} {}\n", OS_NAME, VERSION);
    let _ = write!(out, "         KERNEL VERSION: {}\n", KERNEL_VERSION);
    let _ = write!(out, "         COPYRIGHT {}\n", COPYRIGHT);
    out.write_line("         ROBCO INDUSTRIES TERMINAL OPERATING SYSTEM");
    out.write_line(BANNER_RULE);
    out.newline();
}

fn print_boot_log(out: &FanOut<'_>, clock: &dyn Clock) {
    for message in BOOT_MESSAGES {
        out.write_line(message);
        clock.delay_ms(BOOT_LINE_DELAY_MS);
    }
}

fn report(out: &FanOut<'_>, ok: bool, name: &str) {
    let status = if ok { "OK" } else { "FAIL" };
    let _ = write!(out, "  [{}] {}\n", status, name);
}

/// Bring up the heap and timer and print the subsystem checklist
fn init_subsystems(
    board: &dyn Board,
    heap: &LockedBumpAllocator,
    out: &FanOut<'_>,
    clock: &dyn Clock,
) -> Result<(), KernelError> {
    out.write_line("Initializing subsystems:");

    let (start, limit) = board.heap_bounds();
    // SAFETY: `Board` guarantees the region is ours alone
    match unsafe { heap.init(start, limit) } {
        Ok(stats) => {
            log::debug!("heap {:#x}..{:#x} ({} bytes)", start, limit, stats.total);
            report(out, true, "Memory Manager");
        }
        Err(err) => {
            log::error!("heap: {}", err);
            report(out, false, "Memory Manager");
            return Err(KernelError::Configuration("invalid heap bounds"));
        }
    }
    clock.delay_ms(SUBSYSTEM_DELAY_MS);

    board.init_timer();
    report(out, true, "System Timer");
    clock.delay_ms(SUBSYSTEM_DELAY_MS);

    for service in PLACEHOLDER_SERVICES {
        report(out, true, service);
        clock.delay_ms(SUBSYSTEM_DELAY_MS);
    }

    out.newline();
    Ok(())
}

fn print_login_screen(out: &FanOut<'_>, clock: &dyn Clock) {
    clock.delay_ms(LOGIN_SCREEN_DELAY_MS);
    out.newline();
    out.write_line(LOGIN_RULE);
    out.write_line("                      ROBCO INDUSTRIES UNIFIED OPERATING SYSTEM");
    out.write_line("                                COPYRIGHT 2075-2077");
    out.write_line(LOGIN_RULE);
    out.newline();
}

/// Boot the board through to the end of the shell session
///
/// Returns only when the machine should halt.
pub fn run(board: &dyn Board, heap: &LockedBumpAllocator) -> HaltReason {
    board.init_serial();
    if !board.init_display() {
        log::warn!("no display, serial console only");
    }

    let mirrors: [&dyn Console; 1] = [board.display()];
    let out = FanOut::new(board.serial(), &mirrors);
    let clock = board.clock();

    print_banner(&out);
    print_boot_log(&out, clock);

    if let Err(err) = init_subsystems(board, heap, &out, clock) {
        log::error!("boot aborted: {}", err);
        return HaltReason::Configuration(err);
    }

    out.newline();
    out.write_line("Terminal service initialized");

    print_login_screen(&out, clock);

    let mut session = Session::new();
    let user = match session.run(board.input(), clock, &out) {
        Ok(user) => user,
        Err(_) => {
            out.write_line("Login failed. System halted.");
            return HaltReason::LoginRejected;
        }
    };

    let env = Environment { out, clock, heap };
    let mut shell = Shell::new(user);
    out.newline();
    shell.prompt(&env);
    shell.run(board.input(), &env);

    HaltReason::SessionEnded
}

/// Kernel entry point (branched to from `_start` with a stack and a clean BSS)
#[no_mangle]
pub extern "C" fn kernel_entry() -> ! {
    crate::debug::init_logger(&crate::config::SERIAL);

    let reason = run(&RaspberryPi3, &crate::memory::HEAP);
    log::info!("system halted: {:?}", reason);

    crate::arch::halt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::console::SerialInput;
    use crate::testing::{FakeClock, RecordingConsole, ScriptedInput};
    use std::boxed::Box;
    use std::vec;

    struct FakeBoard {
        serial: RecordingConsole,
        display: RecordingConsole,
        input: ScriptedInput,
        clock: FakeClock,
        display_ok: bool,
        heap: (usize, usize),
    }

    impl FakeBoard {
        fn new(script: &[u8]) -> Self {
            // Leaked so the region outlives the allocator that points into it
            let region = Box::leak(vec![0u8; 4096].into_boxed_slice());
            let start = region.as_mut_ptr() as usize;
            Self {
                serial: RecordingConsole::serial(),
                display: RecordingConsole::display(),
                input: ScriptedInput::new(script),
                clock: FakeClock::new(0),
                display_ok: true,
                heap: (start, start + region.len()),
            }
        }
    }

    unsafe impl Board for FakeBoard {
        fn init_serial(&self) {}

        fn init_display(&self) -> bool {
            self.display_ok
        }

        fn init_timer(&self) {}

        fn serial(&self) -> &dyn Console {
            &self.serial
        }

        fn input(&self) -> &dyn SerialInput {
            &self.input
        }

        fn display(&self) -> &dyn Console {
            &self.display
        }

        fn clock(&self) -> &dyn Clock {
            &self.clock
        }

        fn heap_bounds(&self) -> (usize, usize) {
            self.heap
        }
    }

    #[test]
    fn test_boot_sequence_order() {
        let board = FakeBoard::new(b"admin\radmin\rlogout\r");
        let heap = LockedBumpAllocator::new();

        assert_eq!(run(&board, &heap), HaltReason::SessionEnded);

        let text = board.display.text();
        let order = [
            "UNIFIED OPERATING SYSTEM (UOS) v7.0.2.8",
            "KERNEL VERSION: UOSKRNL.303",
            "RETROS-BIOS v4.2.0.1",
            "Transferring control to operating system...",
            "Initializing subsystems:",
            "  [OK] Memory Manager",
            "  [OK] System Timer",
            "  [OK] File System Service",
            "  [OK] Network Service",
            "  [OK] Security Service",
            "Terminal service initialized",
            "ROBCO INDUSTRIES UNIFIED OPERATING SYSTEM",
            "Username: admin",
            "Login successful. Welcome, ADMIN!",
            "UOS> logout",
            "System halted. Please reset.",
        ];

        let mut from = 0;
        for needle in order {
            let at = text[from..]
                .find(needle)
                .unwrap_or_else(|| panic!("{:?} missing or out of order", needle));
            from += at + needle.len();
        }
        assert_eq!(heap.stats().total, 4096);
    }

    #[test]
    fn test_serial_mirrors_display() {
        let board = FakeBoard::new(b"guest\rguest\rhelp\rexit\r");
        let heap = LockedBumpAllocator::new();
        run(&board, &heap);

        let serial = board.serial.text();
        assert!(serial.contains("  [OK] Security Service\r\n"));
        assert!(serial.contains("  HELP           Display command help\r\n"));
        assert!(board.display.text().contains("  HELP           Display command help\n"));
    }

    #[test]
    fn test_rejected_login_halts() {
        let board = FakeBoard::new(b"root\rtoor\rhelp\r");
        let heap = LockedBumpAllocator::new();

        assert_eq!(run(&board, &heap), HaltReason::LoginRejected);
        assert!(board
            .display
            .text()
            .ends_with("Access denied. Invalid credentials.\nLogin failed. System halted.\n"));
        assert_eq!(board.input.remaining(), 5, "no input read after rejection");
    }

    #[test]
    fn test_inverted_heap_stops_before_login() {
        let mut board = FakeBoard::new(b"admin\radmin\r");
        board.heap = (0x2000, 0x1000);
        let heap = LockedBumpAllocator::new();

        assert_eq!(
            run(&board, &heap),
            HaltReason::Configuration(KernelError::Configuration("invalid heap bounds"))
        );
        let text = board.display.text();
        assert!(text.contains("  [FAIL] Memory Manager\n"));
        assert!(!text.contains("Username:"));
    }

    #[test]
    fn test_missing_display_is_tolerated() {
        let mut board = FakeBoard::new(b"maint\rmaint\rexit\r");
        board.display_ok = false;
        let heap = LockedBumpAllocator::new();

        assert_eq!(run(&board, &heap), HaltReason::SessionEnded);
        assert!(board.serial.text().contains("Welcome, MAINT!"));
    }

    #[test]
    fn test_boot_delays_are_cosmetic_only() {
        let board = FakeBoard::new(b"admin\radmin\rexit\r");
        let heap = LockedBumpAllocator::new();
        run(&board, &heap);

        let expected_ms = BOOT_LINE_DELAY_MS * BOOT_MESSAGES.len() as u64
            + SUBSYSTEM_DELAY_MS * 5
            + LOGIN_SCREEN_DELAY_MS;
        assert_eq!(board.clock.ticks_now(), expected_ms * 1_000);
    }
}
