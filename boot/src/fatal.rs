//! Unrecoverable-error path.
//!
//! There is no restart: the error is reported on the console and the CPU
//! parks with IRQs masked.

use core::panic::PanicInfo;

use hmacgate_abi::FirmwareError;
use hmacgate_drivers::console_println;
use hmacgate_lib::{cpu, klog_error};

/// Console line for an unrecoverable error.
pub fn panic_code(err: FirmwareError) -> i32 {
    err.as_code().wrapping_neg()
}

pub fn fatal(err: FirmwareError) -> ! {
    klog_error!("FATAL: {}", err);
    console_println!("### PANIC ({})!! ###", panic_code(err));
    cpu::halt_loop()
}

/// Body of the `#[panic_handler]`.
pub fn panic_halt(info: &PanicInfo<'_>) -> ! {
    klog_error!("FATAL: {}", info.message());
    match info.location() {
        Some(loc) => console_println!("### PANIC ({}:{})!! ###", loc.file(), loc.line()),
        None => console_println!("### PANIC (unknown)!! ###"),
    }
    cpu::halt_loop()
}
