//! Integrity marker bank.
//!
//! Driver initializers stamp their pattern here; the integrity gate reads it
//! back. Patterns are stored little-endian, four bytes per word.

use hmacgate_abi::{
    expected_marker, marker_word_offset, Component, RegisterPort, MARKER_LEN, MARKER_WORDS,
};

pub struct MarkerBank<P: RegisterPort> {
    regs: P,
}

impl<P: RegisterPort> MarkerBank<P> {
    pub const fn new(regs: P) -> Self {
        Self { regs }
    }

    /// Writes `component`'s expected pattern into its slot.
    pub fn stamp(&self, component: Component) {
        if let (Some(base), Some(pattern)) =
            (marker_word_offset(component), expected_marker(component))
        {
            for (i, chunk) in pattern.chunks_exact(4).enumerate() {
                let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                self.regs.write((base + i) * 4, word);
            }
        }
    }

    /// Current contents of `component`'s slot.
    pub fn read(&self, component: Component) -> Option<[u8; MARKER_LEN]> {
        let base = marker_word_offset(component)?;
        let mut bytes = [0u8; MARKER_LEN];
        for i in 0..MARKER_WORDS {
            let word = self.regs.read((base + i) * 4);
            bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
        Some(bytes)
    }

    /// Whether `component`'s slot holds exactly its expected pattern.
    pub fn matches(&self, component: Component) -> bool {
        match (self.read(component), expected_marker(component)) {
            (Some(found), Some(expected)) => found == *expected,
            _ => false,
        }
    }
}
