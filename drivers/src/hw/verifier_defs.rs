//! Environment verifier and RTC definitions.

// ============================================================================
// Verifier
// ============================================================================

/// Seed chosen by the emulator
pub const VERIFIER_SEED: usize = 0x00;
/// CRC-32C of the seed, as computed by the emulator
pub const VERIFIER_READY: usize = 0x04;
/// First of eight words receiving SHA-256(seed)
pub const VERIFIER_HASH0: usize = 0x08;
pub const VERIFIER_HASH_WORDS: usize = 8;

pub const VERIFIER_WINDOW: usize = 0x1000;

// ============================================================================
// PL031 RTC
// ============================================================================

/// Current count, in seconds
pub const RTC_DR: usize = 0x00;

pub const RTC_WINDOW: usize = 0x1000;
