//! MMIO window - volatile device register access.
//!
//! Memory-mapped registers have side effects on read and write, so every
//! access goes through `read_volatile`/`write_volatile` and is never cached or
//! reordered by the compiler. The board runs with the MMU off, so the physical
//! address from the memory map is used as is.
//!
//! ```ignore
//! use hmacgate_lib::MmioRegion;
//!
//! let vic = MmioRegion::new(PIC_BASE, 0x1000);
//! let status: u32 = vic.read(0x00);
//! vic.write(0x30, 0xFFFF_FFFF);
//! ```

use core::ptr::{read_volatile, write_volatile};

use hmacgate_abi::RegisterPort;

/// A device register window providing volatile 32-bit access.
///
/// Bounds and alignment are checked in debug builds.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MmioRegion {
    base: usize,
    size: usize,
}

impl MmioRegion {
    /// Describe the register window at `base`.
    ///
    /// Constructing a window is harmless; only accesses touch hardware, and
    /// the caller is responsible for `base` naming a real device.
    #[inline]
    pub const fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    #[inline]
    fn checked_addr(&self, offset: usize) -> usize {
        debug_assert!(offset + 4 <= self.size, "MMIO access out of bounds");
        debug_assert!(offset % 4 == 0, "unaligned MMIO access");
        self.base + offset
    }
}

impl RegisterPort for MmioRegion {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        let addr = self.checked_addr(offset);
        // SAFETY: the window covers a device described by the board memory
        // map, and the access is aligned and in bounds.
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        let addr = self.checked_addr(offset);
        // SAFETY: see `read`.
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}
