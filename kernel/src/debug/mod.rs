//! Debug output and logging
//!
//! Kernel diagnostics go to the serial console only; the display is reserved
//! for terminal text. `kprint!`/`kprintln!` write unconditionally, the `log`
//! macros are filtered by the level chosen with the `log-*` features.

use spin::Once;

use crate::components::console::{Console, ConsoleWriter};

/// Print macro for kernel
#[macro_export]
macro_rules! kprint {
    ($($arg:tt)*) => ({
        use core::fmt::Write;
        let _ = write!(
            $crate::components::console::ConsoleWriter::new(&$crate::config::SERIAL),
            $($arg)*
        );
    });
}

/// Print with newline macro for kernel
#[macro_export]
macro_rules! kprintln {
    () => ($crate::kprint!("\n"));
    ($($arg:tt)*) => ({
        use core::fmt::Write;
        let _ = writeln!(
            $crate::components::console::ConsoleWriter::new(&$crate::config::SERIAL),
            $($arg)*
        );
    });
}

/// `log` backend writing `[LEVEL] target: message` lines to a console
pub struct ConsoleLogger {
    console: Once<&'static dyn Console>,
}

impl ConsoleLogger {
    pub const fn new() -> Self {
        Self {
            console: Once::new(),
        }
    }

    /// Bind the output console; later calls keep the first binding
    pub fn bind(&self, console: &'static dyn Console) {
        self.console.call_once(|| console);
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(console) = self.console.get() {
            use core::fmt::Write;
            let mut writer = ConsoleWriter::new(*console);
            let _ = writeln!(
                writer,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger::new();

/// Route the `log` facade to `console`
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logger(console: &'static dyn Console) {
    LOGGER.bind(console);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(crate::config::LOG_LEVEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingConsole;
    use log::Log;
    use std::boxed::Box;

    #[test]
    fn test_logger_formats_level_and_target() {
        let console: &'static RecordingConsole = Box::leak(Box::new(RecordingConsole::serial()));
        let logger = ConsoleLogger::new();
        logger.bind(console);

        log::set_max_level(log::LevelFilter::Trace);
        logger.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("uos::boot")
                .args(format_args!("heap {} bytes", 64))
                .build(),
        );

        assert_eq!(console.text(), "[WARN] uos::boot: heap 64 bytes\r\n");
    }

    #[test]
    fn test_unbound_logger_drops_records() {
        let logger = ConsoleLogger::new();
        log::set_max_level(log::LevelFilter::Trace);
        logger.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .args(format_args!("lost"))
                .build(),
        );
        assert!(logger.console.get().is_none());
    }
}
