use hmacgate_abi::TickSource;
use portable_atomic::{AtomicU32, Ordering};

/// Periodic-interrupt tick count.
///
/// The timer handler is the only writer; the main loop reads it to measure
/// elapsed time. The count wraps at `u32::MAX`, and callers compare with
/// `wrapping_sub` so a wrap inside a wait is harmless.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(value: u32) -> Self {
        Self {
            ticks: AtomicU32::new(value),
        }
    }

    /// Called once per timer interrupt.
    #[inline]
    pub fn tick(&self) {
        self.ticks.fetch_add(1, Ordering::Release);
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for TickCounter {
    #[inline]
    fn ticks(&self) -> u32 {
        self.count()
    }
}
