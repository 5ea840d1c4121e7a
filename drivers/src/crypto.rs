//! Software implementation of the firmware's crypto service.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use hmacgate_abi::{CryptoError, CryptoService, EntropySource, HMAC_LEN, SHA256_LEN};
use hmacgate_lib::klog_debug;

use crate::random::HmacDrbg;

/// Personalization string mixed into the generator at instantiation.
pub const DRBG_PERSONALIZATION: &[u8] = b"RANDOM_GEN";

/// SHA-256, HMAC-SHA256 and an HMAC-DRBG seeded from `E`.
///
/// The generator is instantiated on first use and reused afterwards. Each
/// request also mixes a fresh entropy reading in as additional input, so two
/// requests within one RTC second still diverge.
pub struct SoftCrypto<E: EntropySource> {
    entropy: E,
    drbg: Option<HmacDrbg>,
}

impl<E: EntropySource> SoftCrypto<E> {
    pub const fn new(entropy: E) -> Self {
        Self {
            entropy,
            drbg: None,
        }
    }

    fn generator(&mut self) -> Result<&mut HmacDrbg, CryptoError> {
        if self.drbg.as_ref().is_none_or(HmacDrbg::needs_reseed) {
            self.drbg = Some(HmacDrbg::from_entropy(&self.entropy, DRBG_PERSONALIZATION)?);
            klog_debug!("CRYPTO: generator instantiated");
        }
        self.drbg.as_mut().ok_or(CryptoError::GeneratorFailure)
    }
}

impl<E: EntropySource> CryptoService for SoftCrypto<E> {
    fn secure_random(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let mut additional = [0u8; 32];
        self.entropy.fill_entropy(&mut additional)?;
        self.generator()?.generate(out, &additional)
    }

    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
        if key.is_empty() || message.is_empty() {
            return Err(CryptoError::InvalidInput);
        }
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).map_err(|_| CryptoError::InvalidInput)?;
        mac.update(message);
        let mut tag = [0u8; HMAC_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Ok(tag)
    }

    fn sha256(&self, data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError> {
        let mut digest = [0u8; SHA256_LEN];
        digest.copy_from_slice(&Sha256::digest(data));
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    struct Counting(Cell<u32>);

    impl EntropySource for Counting {
        fn fill_entropy(&self, out: &mut [u8]) -> Result<(), CryptoError> {
            let n = self.0.get();
            self.0.set(n + 1);
            out.fill(n as u8);
            Ok(())
        }
    }

    struct Broken;

    impl EntropySource for Broken {
        fn fill_entropy(&self, _out: &mut [u8]) -> Result<(), CryptoError> {
            Err(CryptoError::EntropyUnavailable)
        }
    }

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let crypto = SoftCrypto::new(Counting(Cell::new(0)));
        let tag = crypto.hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            tag,
            [
                0x5b, 0xdc, 0xc1, 0x46, 0xbf, 0x60, 0x75, 0x4e, 0x6a, 0x04, 0x24, 0x26, 0x08, 0x95,
                0x75, 0xc7, 0x5a, 0x00, 0x3f, 0x08, 0x9d, 0x27, 0x39, 0x83, 0x9d, 0xec, 0x58, 0xb9,
                0x64, 0xec, 0x38, 0x43,
            ]
        );
    }

    #[test]
    fn hmac_rejects_empty_inputs() {
        let crypto = SoftCrypto::new(Counting(Cell::new(0)));
        assert_eq!(crypto.hmac_sha256(b"", b"msg"), Err(CryptoError::InvalidInput));
        assert_eq!(crypto.hmac_sha256(b"key", b""), Err(CryptoError::InvalidInput));
    }

    #[test]
    fn sha256_of_abc() {
        let crypto = SoftCrypto::new(Counting(Cell::new(0)));
        let digest = crypto.sha256(b"abc").unwrap();
        assert_eq!(&digest[..4], &[0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(&digest[28..], &[0xf2, 0x00, 0x15, 0xad]);
    }

    #[test]
    fn random_requests_differ() {
        let mut crypto = SoftCrypto::new(Counting(Cell::new(0)));
        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        crypto.secure_random(&mut a).unwrap();
        crypto.secure_random(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn entropy_failure_surfaces() {
        let mut crypto = SoftCrypto::new(Broken);
        let mut out = [0u8; 4];
        assert_eq!(crypto.secure_random(&mut out), Err(CryptoError::EntropyUnavailable));
    }
}
