//! PL031 real-time clock, used as the entropy source for the nonce generator.

use hmacgate_abi::{CryptoError, EntropySource, RegisterPort};
use sha2::{Digest, Sha512};

use crate::hw::verifier_defs::RTC_DR;

pub struct Rtc<P: RegisterPort> {
    regs: P,
}

impl<P: RegisterPort> Rtc<P> {
    pub const fn new(regs: P) -> Self {
        Self { regs }
    }

    /// Seconds counted by the RTC.
    pub fn now(&self) -> u32 {
        self.regs.read(RTC_DR)
    }
}

impl<P: RegisterPort> EntropySource for Rtc<P> {
    /// SHA-512 of the current RTC reading, repeated as needed.
    fn fill_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        let digest = Sha512::digest(self.now().to_ne_bytes());
        for chunk in out.chunks_mut(digest.len()) {
            chunk.copy_from_slice(&digest[..chunk.len()]);
        }
        Ok(())
    }
}
