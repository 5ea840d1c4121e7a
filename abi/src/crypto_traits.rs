//! Crypto collaborator traits.
//!
//! The firmware consumes hashing, keyed hashing and secure randomness as a
//! trusted service; the software implementation lives in `drivers`.

use crate::error::FirmwareError;
use crate::protocol::{HMAC_LEN, SHA256_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Key or message rejected by the primitive
    InvalidInput,
    /// The entropy source could not be read
    EntropyUnavailable,
    /// The generator refused to produce output
    GeneratorFailure,
}

impl From<CryptoError> for FirmwareError {
    fn from(_: CryptoError) -> Self {
        FirmwareError::CryptoFailure
    }
}

pub trait CryptoService {
    /// Fills `out` with cryptographically secure random bytes.
    fn secure_random(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError>;

    fn sha256(&self, data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError>;
}

impl<C: CryptoService + ?Sized> CryptoService for &mut C {
    fn secure_random(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        (**self).secure_random(out)
    }

    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
        (**self).hmac_sha256(key, message)
    }

    fn sha256(&self, data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError> {
        (**self).sha256(data)
    }
}

/// Raw entropy for seeding a generator.
pub trait EntropySource {
    fn fill_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError>;
}

impl<E: EntropySource + ?Sized> EntropySource for &E {
    fn fill_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill_entropy(out)
    }
}
