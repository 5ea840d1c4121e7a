#![no_std]

#[cfg(test)]
extern crate std;

/// ARM926EJ-S processor primitives.
///
/// On the firmware target these touch the CPSR I/F bits and the CP15
/// wait-for-interrupt operation.
pub mod cpu {
    #[cfg(target_arch = "arm")]
    use core::arch::asm;

    /// CPSR IRQ mask bit.
    pub const CPSR_IRQ_DISABLE: u32 = 1 << 7;
    /// CPSR FIQ mask bit.
    pub const CPSR_FIQ_DISABLE: u32 = 1 << 6;

    #[cfg(target_arch = "arm")]
    #[inline(always)]
    pub fn enable_interrupts() {
        unsafe {
            asm!(
                "mrs {tmp}, cpsr",
                "bic {tmp}, {tmp}, #0xC0",
                "msr cpsr_c, {tmp}",
                tmp = out(reg) _,
                options(nostack)
            );
        }
    }

    #[cfg(target_arch = "arm")]
    #[inline(always)]
    pub fn disable_interrupts() {
        unsafe {
            asm!(
                "mrs {tmp}, cpsr",
                "orr {tmp}, {tmp}, #0xC0",
                "msr cpsr_c, {tmp}",
                tmp = out(reg) _,
                options(nostack)
            );
        }
    }

    /// Masks IRQ and FIQ, returning the previous CPSR for `restore_interrupts`.
    #[cfg(target_arch = "arm")]
    #[inline(always)]
    pub fn save_and_disable_interrupts() -> u32 {
        let saved: u32;
        unsafe {
            asm!(
                "mrs {saved}, cpsr",
                "orr {tmp}, {saved}, #0xC0",
                "msr cpsr_c, {tmp}",
                saved = out(reg) saved,
                tmp = out(reg) _,
                options(nostack)
            );
        }
        saved
    }

    #[cfg(target_arch = "arm")]
    #[inline(always)]
    pub fn restore_interrupts(saved: u32) {
        unsafe {
            asm!("msr cpsr_c, {saved}", saved = in(reg) saved, options(nostack));
        }
    }

    /// CP15 wait-for-interrupt (ARMv5 has no `wfi` mnemonic).
    #[cfg(target_arch = "arm")]
    #[inline(always)]
    pub fn wait_for_interrupt() {
        unsafe {
            asm!("mcr p15, 0, {zero}, c7, c0, 4", zero = in(reg) 0u32, options(nomem, nostack));
        }
    }

    // Host builds (tests, tooling) have no interrupt mask to touch.

    #[cfg(not(target_arch = "arm"))]
    #[inline(always)]
    pub fn enable_interrupts() {}

    #[cfg(not(target_arch = "arm"))]
    #[inline(always)]
    pub fn disable_interrupts() {}

    #[cfg(not(target_arch = "arm"))]
    #[inline(always)]
    pub fn save_and_disable_interrupts() -> u32 {
        CPSR_IRQ_DISABLE | CPSR_FIQ_DISABLE
    }

    #[cfg(not(target_arch = "arm"))]
    #[inline(always)]
    pub fn restore_interrupts(_saved: u32) {}

    #[cfg(not(target_arch = "arm"))]
    #[inline(always)]
    pub fn wait_for_interrupt() {
        core::hint::spin_loop();
    }

    #[inline(always)]
    pub fn halt_loop() -> ! {
        disable_interrupts();
        loop {
            wait_for_interrupt();
        }
    }
}

pub mod init_flag;
pub mod klog;
pub mod mmio;
pub mod regfile;
pub mod ring_buffer;
pub mod sync;
pub mod ticks;

pub use init_flag::InitFlag;
pub use klog::{
    klog_attach_console, klog_get_level, klog_init, klog_is_enabled, klog_set_level, KlogLevel,
    KlogSink,
};
pub use mmio::MmioRegion;
pub use regfile::RegisterFile;
pub use ring_buffer::{QueueError, RingBuffer};
pub use sync::{IrqMutex, IrqMutexGuard};
pub use ticks::TickCounter;
