//! Plain-memory register file.
//!
//! `RegisterFile<N>` is `N` 32-bit words that behave like a register window
//! without side effects. The firmware places the integrity-marker bank in
//! one, and tests stand one in for every device so driver logic can be checked
//! against what it wrote.

use hmacgate_abi::RegisterPort;
use portable_atomic::{AtomicU32, Ordering};

pub struct RegisterFile<const N: usize> {
    words: [AtomicU32; N],
}

impl<const N: usize> RegisterFile<N> {
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU32::new(0) }; N],
        }
    }

    /// Window size in bytes.
    pub const fn size(&self) -> usize {
        N * 4
    }

    pub fn reset(&self) {
        for word in &self.words {
            word.store(0, Ordering::SeqCst);
        }
    }

    #[inline]
    fn word(&self, offset: usize) -> Option<&AtomicU32> {
        debug_assert!(offset % 4 == 0, "unaligned register offset {offset:#x}");
        self.words.get(offset / 4)
    }
}

impl<const N: usize> Default for RegisterFile<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RegisterPort for RegisterFile<N> {
    /// Offsets past the end read as zero.
    fn read(&self, offset: usize) -> u32 {
        self.word(offset)
            .map(|w| w.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Offsets past the end are ignored.
    fn write(&self, offset: usize, value: u32) {
        if let Some(w) = self.word(offset) {
            w.store(value, Ordering::SeqCst);
        }
    }
}
