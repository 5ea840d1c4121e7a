//! One-shot initialization flags.
//!
//! ```ignore
//! static BRINGUP: InitFlag = InitFlag::new();
//!
//! pub fn bring_up() {
//!     if !BRINGUP.init_once() {
//!         return; // Already done
//!     }
//!     // ... perform initialization ...
//! }
//! ```
//!
//! `init_once()` swaps with `SeqCst`; `mark_set()` publishes with `Release`
//! and `is_set()` observes with `Acquire`.

use portable_atomic::{AtomicBool, Ordering};

#[repr(transparent)]
pub struct InitFlag {
    flag: AtomicBool,
}

impl InitFlag {
    #[inline]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    /// Returns `true` for the caller that flipped the flag, `false` afterwards.
    #[inline]
    pub fn init_once(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn mark_set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}
