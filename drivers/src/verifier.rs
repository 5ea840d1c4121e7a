//! Emulator-provided environment verifier.
//!
//! The device publishes a random seed and the CRC-32C of that seed, and
//! expects the firmware to answer with SHA-256(seed) in its hash registers.

use crc::{Crc, CRC_32_ISCSI};
use hmacgate_abi::{RegisterPort, SHA256_LEN};

use crate::hw::verifier_defs::*;

/// CRC-32C (Castagnoli).
pub const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

pub fn crc32c(data: &[u8]) -> u32 {
    CASTAGNOLI.checksum(data)
}

pub struct Verifier<P: RegisterPort> {
    regs: P,
}

impl<P: RegisterPort> Verifier<P> {
    pub const fn new(regs: P) -> Self {
        Self { regs }
    }

    pub fn seed(&self) -> u32 {
        self.regs.read(VERIFIER_SEED)
    }

    pub fn ready(&self) -> u32 {
        self.regs.read(VERIFIER_READY)
    }

    /// Writes the digest as eight native-order words.
    pub fn write_hash(&self, hash: &[u8; SHA256_LEN]) {
        for (i, chunk) in hash.chunks_exact(4).enumerate() {
            let word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            self.regs.write(VERIFIER_HASH0 + i * 4, word);
        }
    }

    pub fn read_hash(&self) -> [u8; SHA256_LEN] {
        let mut hash = [0u8; SHA256_LEN];
        for i in 0..VERIFIER_HASH_WORDS {
            let word = self.regs.read(VERIFIER_HASH0 + i * 4);
            hash[i * 4..i * 4 + 4].copy_from_slice(&word.to_ne_bytes());
        }
        hash
    }
}
