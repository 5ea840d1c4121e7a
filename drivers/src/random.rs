//! HMAC-DRBG over SHA-256 (NIST SP 800-90A, without prediction resistance).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use hmacgate_abi::{CryptoError, EntropySource};

type HmacSha256 = Hmac<Sha256>;

const OUTLEN: usize = 32;
/// Entropy requested when instantiating.
pub const SEED_LEN: usize = 48;
/// Requests between mandatory reseeds.
pub const RESEED_INTERVAL: u64 = 1 << 48;
/// Bytes per `generate` request.
pub const MAX_REQUEST: usize = 1 << 16;

pub struct HmacDrbg {
    key: [u8; OUTLEN],
    v: [u8; OUTLEN],
    reseed_counter: u64,
}

fn mac(key: &[u8], parts: &[&[u8]]) -> Result<[u8; OUTLEN], CryptoError> {
    let mut m = HmacSha256::new_from_slice(key).map_err(|_| CryptoError::GeneratorFailure)?;
    for part in parts {
        m.update(part);
    }
    let mut out = [0u8; OUTLEN];
    out.copy_from_slice(&m.finalize().into_bytes());
    Ok(out)
}

impl HmacDrbg {
    pub fn new(entropy: &[u8], nonce: &[u8], personalization: &[u8]) -> Result<Self, CryptoError> {
        let mut drbg = Self {
            key: [0x00; OUTLEN],
            v: [0x01; OUTLEN],
            reseed_counter: 1,
        };
        drbg.update(&[entropy, nonce, personalization])?;
        Ok(drbg)
    }

    /// Instantiates from `source` with the given personalization string.
    pub fn from_entropy<E: EntropySource + ?Sized>(
        source: &E,
        personalization: &[u8],
    ) -> Result<Self, CryptoError> {
        let mut seed = [0u8; SEED_LEN];
        source.fill_entropy(&mut seed)?;
        Self::new(&seed, &[], personalization)
    }

    fn update(&mut self, provided: &[&[u8]]) -> Result<(), CryptoError> {
        let has_data = provided.iter().any(|p| !p.is_empty());

        let mut parts: [&[u8]; 5] = [&[]; 5];
        parts[0] = &self.v;
        parts[1] = &[0x00];
        for (slot, p) in parts[2..].iter_mut().zip(provided) {
            *slot = *p;
        }
        self.key = mac(&self.key, &parts)?;
        self.v = mac(&self.key, &[&self.v])?;

        if has_data {
            let mut parts: [&[u8]; 5] = [&[]; 5];
            parts[0] = &self.v;
            parts[1] = &[0x01];
            for (slot, p) in parts[2..].iter_mut().zip(provided) {
                *slot = *p;
            }
            self.key = mac(&self.key, &parts)?;
            self.v = mac(&self.key, &[&self.v])?;
        }
        Ok(())
    }

    pub fn needs_reseed(&self) -> bool {
        self.reseed_counter > RESEED_INTERVAL
    }

    pub fn generate(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoError> {
        if out.len() > MAX_REQUEST || self.needs_reseed() {
            return Err(CryptoError::GeneratorFailure);
        }
        if !additional.is_empty() {
            self.update(&[additional])?;
        }
        for chunk in out.chunks_mut(OUTLEN) {
            self.v = mac(&self.key, &[&self.v])?;
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }
        self.update(&[additional])?;
        self.reseed_counter += 1;
        Ok(())
    }
}
