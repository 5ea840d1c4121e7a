//! ARM SP804 dual timer definitions.

use bitflags::bitflags;

// ============================================================================
// Per-counter Register Offsets
// ============================================================================

pub const TIMER_LOAD: usize = 0x00;
pub const TIMER_VALUE: usize = 0x04;
pub const TIMER_CONTROL: usize = 0x08;
/// Any write clears the counter's interrupt
pub const TIMER_INTCLR: usize = 0x0C;
pub const TIMER_RIS: usize = 0x10;
pub const TIMER_MIS: usize = 0x14;
pub const TIMER_BGLOAD: usize = 0x18;

/// Distance between the two counters of one block.
pub const COUNTER_STRIDE: usize = 0x20;
pub const COUNTER_WINDOW: usize = 0x20;

bitflags! {
    /// TIMER_CONTROL bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerControl: u32 {
        const ONESHOT = 1 << 0;
        /// 32-bit counter (clear for 16-bit)
        const SIZE_32 = 1 << 1;
        const PRESCALE_16 = 1 << 2;
        const PRESCALE_256 = 1 << 3;
        const INTR_ENABLE = 1 << 5;
        /// Periodic (set) or free-running (clear)
        const PERIODIC = 1 << 6;
        const ENABLE = 1 << 7;
    }
}

pub const INTCLR_ALL: u32 = 0xFFFF_FFFF;
