//! Memory map and interrupt routing of the ARM926EJ-S Versatile board.

// =============================================================================
// Interrupt controllers
// =============================================================================

/// Primary interrupt controller (PL190 VIC).
pub const PIC_BASE: usize = 0x1014_0000;

/// Interrupt lines routed through the primary controller.
pub const NR_IRQ_LINES: u32 = 32;

// =============================================================================
// Peripherals
// =============================================================================

pub const TIMER_BASES: [usize; 2] = [0x101E_2000, 0x101E_3000];
pub const TIMER_IRQS: [u32; 2] = [4, 5];
/// Each SP804 block carries two independent down-counters.
pub const COUNTERS_PER_TIMER: usize = 2;

pub const RTC_BASE: usize = 0x101E_8000;

pub const UART_BASES: [usize; 3] = [0x101F_1000, 0x101F_2000, 0x101F_3000];
pub const UART_IRQS: [u32; 3] = [12, 13, 14];

/// Environment verifier exposed by the emulator.
pub const VERIFIER_BASE: usize = 0x101F_6000;

// =============================================================================
// Clocking
// =============================================================================

/// Reference clock feeding the SP804 counters.
pub const CPU_CLOCK_HZ: u32 = 1_000_000;
pub const TICK_RATE_HZ: u32 = 1000;
/// The tick timer is loaded so one tick spans this many base periods.
pub const TICKS_PER_HUND: u32 = 100;
