//! Terminal output fan-out
//!
//! Every piece of terminal text goes to the serial line and to each mirror
//! sink (the display) as one logical write. Keystroke echo and the backspace
//! erase sequence are the only serial-only writes, and they live here too so no
//! caller has to address a sink directly.

use core::fmt;

use super::Console;

/// Serial erase sequence: back, blank, back
const ERASE: &str = "\x08 \x08";

/// Writes one logical stream to the serial console and every mirror
#[derive(Clone, Copy)]
pub struct FanOut<'a> {
    serial: &'a dyn Console,
    mirrors: &'a [&'a dyn Console],
}

impl<'a> FanOut<'a> {
    pub const fn new(serial: &'a dyn Console, mirrors: &'a [&'a dyn Console]) -> Self {
        Self { serial, mirrors }
    }

    pub fn write_str(&self, s: &str) {
        self.serial.puts(s);
        for sink in self.mirrors {
            sink.puts(s);
        }
    }

    pub fn write_byte(&self, c: u8) {
        self.serial.putc(c);
        for sink in self.mirrors {
            sink.putc(c);
        }
    }

    pub fn write_line(&self, s: &str) {
        self.write_str(s);
        self.newline();
    }

    pub fn newline(&self) {
        self.write_str("\n");
    }

    /// Write `count` spaces
    pub fn pad(&self, count: usize) {
        for _ in 0..count {
            self.write_byte(b' ');
        }
    }

    /// Echo a received character back on the serial line only, untranslated
    pub fn echo(&self, c: u8) {
        self.serial.putc(c);
    }

    /// Echo a received character to the mirrors only
    pub fn mirror(&self, c: u8) {
        for sink in self.mirrors {
            sink.putc(c);
        }
    }

    /// Rub out the last character on the serial terminal
    pub fn erase(&self) {
        self.serial.puts(ERASE);
    }

    /// Formatted write to every sink; lets `write!` target a `&FanOut`
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::write(&mut Adapter(self), args)
    }
}

struct Adapter<'a, 'b>(&'b FanOut<'a>);

impl fmt::Write for Adapter<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingConsole;
    use core::fmt::Write as _;

    #[test]
    fn test_text_reaches_every_sink() {
        let serial = RecordingConsole::serial();
        let display = RecordingConsole::display();
        let mirrors: [&dyn Console; 1] = [&display];
        let out = FanOut::new(&serial, &mirrors);

        out.write_line("READY");
        assert_eq!(serial.text(), "READY\r\n");
        assert_eq!(display.text(), "READY\n");
    }

    #[test]
    fn test_echo_and_erase_are_serial_only() {
        let serial = RecordingConsole::serial();
        let display = RecordingConsole::display();
        let mirrors: [&dyn Console; 1] = [&display];
        let out = FanOut::new(&serial, &mirrors);

        out.echo(b'\r');
        out.erase();
        assert_eq!(serial.text(), "\r\x08 \x08");
        assert_eq!(display.text(), "");

        out.mirror(b'x');
        assert_eq!(display.text(), "x");
    }

    #[test]
    fn test_formatted_write() {
        let serial = RecordingConsole::serial();
        let display = RecordingConsole::display();
        let mirrors: [&dyn Console; 1] = [&display];
        let out = FanOut::new(&serial, &mirrors);

        write!(out, "{} of {}", 3, 4).unwrap();
        out.pad(2);
        assert_eq!(display.text(), "3 of 4  ");
        assert_eq!(serial.text(), "3 of 4  ");

        let mut writer = Adapter(&out);
        writer.write_str("!").unwrap();
        assert_eq!(display.text(), "3 of 4  !");
    }

    #[test]
    fn test_serial_only_fanout() {
        let serial = RecordingConsole::serial();
        let out = FanOut::new(&serial, &[]);
        out.write_str("A\nB");
        assert_eq!(serial.text(), "A\r\nB");
    }
}
