//! ARM PL190 vectored interrupt controller definitions.

// ============================================================================
// Register Offsets
// ============================================================================

/// IRQ status after masking
pub const VICIRQSTATUS: usize = 0x000;
/// FIQ status after masking
pub const VICFIQSTATUS: usize = 0x004;
/// Raw interrupt status before masking
pub const VICRAWINTR: usize = 0x008;
/// Per-line IRQ (0) / FIQ (1) selection
pub const VICINTSELECT: usize = 0x00C;
/// Interrupt enable (reads back the enabled set)
pub const VICINTENABLE: usize = 0x010;
/// Write 1 to disable a line
pub const VICINTENCLEAR: usize = 0x014;
/// Software interrupt raise
pub const VICSOFTINT: usize = 0x018;
/// Software interrupt clear
pub const VICSOFTINTCLEAR: usize = 0x01C;
/// Privileged-access-only control
pub const VICPROTECTION: usize = 0x020;
/// Address of the currently active vector; write to acknowledge
pub const VICVECTADDR: usize = 0x030;
/// Address used when no vectored slot matches
pub const VICDEFVECTADDR: usize = 0x034;
/// First of 16 vector address registers
pub const VICVECTADDR0: usize = 0x100;
/// First of 16 vector control registers
pub const VICVECTCNTL0: usize = 0x200;

/// Bytes covered by the register window.
pub const VIC_WINDOW: usize = 0x1000;

#[inline]
pub const fn vect_addr_reg(slot: usize) -> usize {
    VICVECTADDR0 + slot * 4
}

#[inline]
pub const fn vect_cntl_reg(slot: usize) -> usize {
    VICVECTCNTL0 + slot * 4
}

// ============================================================================
// Vector Control Bits
// ============================================================================

/// Slot is live
pub const VECTCNTL_ENABLE: u32 = 0x20;
/// Interrupt source bits
pub const VECTCNTL_SOURCE_MASK: u32 = 0x1F;

/// Value written to VICVECTADDR to signal end of service.
pub const VECTADDR_ACK: u32 = 0xFFFF_FFFF;

// ============================================================================
// Vector Tags
// ============================================================================
//
// Handlers are trait objects, which do not fit a 32-bit address register, so
// each vector address register holds a tag naming its slot instead. The
// controller hands the tag of the winning slot back through VICVECTADDR.

/// Number of hardware vector slots
pub const NR_VECTORS: usize = 16;

/// Highest accepted priority; larger requests are clamped.
pub const MAX_PRIORITY: u8 = 127;

pub const VECTOR_TAG_BASE: u32 = 0xC0DE_0000;
pub const VECTOR_TAG_SLOT_MASK: u32 = 0x0000_000F;
/// Programmed into empty slots.
pub const VECTOR_TAG_DUMMY: u32 = 0xC0DE_DEAD;
/// Programmed into VICDEFVECTADDR.
pub const VECTOR_TAG_DEFAULT: u32 = 0xC0DE_DEF0;

#[inline]
pub const fn vector_tag(slot: usize) -> u32 {
    VECTOR_TAG_BASE | (slot as u32 & VECTOR_TAG_SLOT_MASK)
}

/// Slot index named by a tag, if it is a slot tag at all.
#[inline]
pub const fn slot_from_tag(tag: u32) -> Option<usize> {
    if tag & !VECTOR_TAG_SLOT_MASK == VECTOR_TAG_BASE {
        Some((tag & VECTOR_TAG_SLOT_MASK) as usize)
    } else {
        None
    }
}
