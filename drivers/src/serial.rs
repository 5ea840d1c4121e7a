//! User-facing console on the I/O UART.
//!
//! Session progress and the boot banner go here through `console_print!` /
//! `console_println!`; diagnostics go through `klog`. Output written before a
//! line is attached is dropped.

use core::fmt::{self, Write};

use hmacgate_abi::SerialLine;
use spin::Once;

pub type ConsoleLine = dyn SerialLine + Sync;

static CONSOLE: Once<&'static ConsoleLine> = Once::new();

/// Routes console output to `line`. Only the first attachment takes effect.
pub fn console_attach(line: &'static ConsoleLine) {
    CONSOLE.call_once(|| line);
}

/// `fmt::Write` adapter over a serial line, translating `\n` to `\r\n`.
pub struct LineWriter<'a, S: SerialLine + ?Sized>(pub &'a S);

impl<S: SerialLine + ?Sized> Write for LineWriter<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            if b == b'\n' {
                self.0.send_byte(b'\r');
            }
            self.0.send_byte(b);
        }
        Ok(())
    }
}

pub fn print_args(args: fmt::Arguments<'_>) {
    if let Some(line) = CONSOLE.get() {
        let _ = LineWriter(*line).write_fmt(args);
    }
}

pub fn write_line(s: &str) {
    if let Some(line) = CONSOLE.get() {
        let mut w = LineWriter(*line);
        let _ = w.write_str(s);
        let _ = w.write_str("\n");
    }
}

#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {{
        $crate::serial::print_args(core::format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! console_println {
    () => {{
        $crate::serial::write_line("");
    }};
    ($fmt:expr) => {{
        $crate::serial::write_line($fmt);
    }};
    ($fmt:expr, $($arg:tt)*) => {{
        $crate::serial::print_args(core::format_args!(concat!($fmt, "\n"), $($arg)*));
    }};
}
