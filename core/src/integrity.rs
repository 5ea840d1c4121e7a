//! Boot-time integrity gate.
//!
//! Two checks run once, before interrupts are enabled: every driver must have
//! stamped its marker, and the emulator's verifier must accept our hash of its
//! seed. Either failing stops the boot.

use hmacgate_abi::{
    Component, CryptoService, FirmwareError, FirmwareResult, IntegrityFault, RegisterPort,
    MARKED_COMPONENTS,
};
use hmacgate_drivers::{crc32c, MarkerBank, Verifier};
use hmacgate_lib::{klog_error, klog_info};

/// Per-component marker verdicts, in check order.
pub fn marker_report<P: RegisterPort>(
    markers: &MarkerBank<P>,
) -> [(Component, bool); MARKED_COMPONENTS.len()] {
    MARKED_COMPONENTS.map(|c| (c, markers.matches(c)))
}

/// Fails on the first component whose marker does not match.
pub fn check_driver_markers<P: RegisterPort>(markers: &MarkerBank<P>) -> Result<(), IntegrityFault> {
    for (component, ok) in marker_report(markers) {
        if !ok {
            klog_error!("INTEGRITY: {} marker mismatch", component.name());
            return Err(IntegrityFault { component });
        }
    }
    klog_info!("INTEGRITY: driver markers verified");
    Ok(())
}

/// Answers the verifier's challenge and checks its CRC.
///
/// SHA-256 of the seed goes into the hash registers; the ready register must
/// then hold CRC-32C of the same seed bytes.
pub fn check_hardware_environment<P: RegisterPort, C: CryptoService + ?Sized>(
    verifier: &Verifier<P>,
    crypto: &C,
) -> FirmwareResult<()> {
    let seed = verifier.seed().to_ne_bytes();
    let hash = crypto.sha256(&seed)?;
    verifier.write_hash(&hash);

    if verifier.ready() != crc32c(&seed) {
        klog_error!(
            "INTEGRITY: {} check failed",
            Component::HardwareEnvironment.name()
        );
        return Err(IntegrityFault {
            component: Component::HardwareEnvironment,
        }
        .into());
    }
    klog_info!("INTEGRITY: hardware environment verified");
    Ok(())
}

/// Both checks, markers first.
pub fn run_integrity_gate<M, V, C>(
    markers: &MarkerBank<M>,
    verifier: &Verifier<V>,
    crypto: &C,
) -> FirmwareResult<()>
where
    M: RegisterPort,
    V: RegisterPort,
    C: CryptoService + ?Sized,
{
    check_driver_markers(markers).map_err(FirmwareError::from)?;
    check_hardware_environment(verifier, crypto)
}

#[cfg(test)]
mod tests {
    use hmacgate_abi::{CryptoError, MARKER_BANK_WORDS, HMAC_LEN, SHA256_LEN};
    use hmacgate_lib::RegisterFile;
    use sha2::{Digest, Sha256};

    use super::*;

    struct HashOnly;

    impl CryptoService for HashOnly {
        fn secure_random(&mut self, _out: &mut [u8]) -> Result<(), CryptoError> {
            Err(CryptoError::GeneratorFailure)
        }

        fn hmac_sha256(&self, _key: &[u8], _msg: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
            Err(CryptoError::InvalidInput)
        }

        fn sha256(&self, data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError> {
            let mut out = [0u8; SHA256_LEN];
            out.copy_from_slice(&Sha256::digest(data));
            Ok(out)
        }
    }

    struct NoHash;

    impl CryptoService for NoHash {
        fn secure_random(&mut self, _out: &mut [u8]) -> Result<(), CryptoError> {
            Err(CryptoError::GeneratorFailure)
        }

        fn hmac_sha256(&self, _key: &[u8], _msg: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
            Err(CryptoError::InvalidInput)
        }

        fn sha256(&self, _data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError> {
            Err(CryptoError::InvalidInput)
        }
    }

    fn stamped() -> RegisterFile<MARKER_BANK_WORDS> {
        let ram = RegisterFile::new();
        let bank = MarkerBank::new(&ram);
        for c in MARKED_COMPONENTS {
            bank.stamp(c);
        }
        ram
    }

    #[test]
    fn all_markers_present_passes() {
        let ram = stamped();
        assert_eq!(check_driver_markers(&MarkerBank::new(&ram)), Ok(()));
    }

    #[test]
    fn missing_marker_names_its_component() {
        let ram = RegisterFile::<MARKER_BANK_WORDS>::new();
        let bank = MarkerBank::new(&ram);
        bank.stamp(Component::InterruptController);
        bank.stamp(Component::Timer);
        assert_eq!(
            check_driver_markers(&bank),
            Err(IntegrityFault { component: Component::Serial })
        );
    }

    #[test]
    fn corrupting_one_byte_flags_exactly_that_component() {
        for target in MARKED_COMPONENTS {
            for byte in 0..hmacgate_abi::MARKER_LEN {
                let ram = stamped();
                let base = hmacgate_abi::marker_word_offset(target).unwrap();
                let offset = (base + byte / 4) * 4;
                ram.write(offset, ram.read(offset) ^ (0x01 << ((byte % 4) * 8)));

                let bank = MarkerBank::new(&ram);
                for (component, ok) in marker_report(&bank) {
                    assert_eq!(ok, component != target, "{target:?} byte {byte}");
                }
                assert_eq!(
                    check_driver_markers(&bank),
                    Err(IntegrityFault { component: target })
                );
            }
        }
    }

    fn verifier_with(seed: u32, ready: u32) -> RegisterFile<16> {
        let regs = RegisterFile::new();
        regs.write(0x0, seed);
        regs.write(0x4, ready);
        regs
    }

    #[test]
    fn hardware_check_accepts_matching_crc_and_publishes_hash() {
        let seed = 0x1234_5678u32;
        let regs = verifier_with(seed, crc32c(&seed.to_ne_bytes()));
        let verifier = Verifier::new(&regs);

        assert_eq!(check_hardware_environment(&verifier, &HashOnly), Ok(()));
        let expected = Sha256::digest(seed.to_ne_bytes());
        assert_eq!(&verifier.read_hash()[..], &expected[..]);
    }

    #[test]
    fn hardware_check_rejects_wrong_crc() {
        let seed = 0x1234_5678u32;
        let regs = verifier_with(seed, crc32c(&seed.to_ne_bytes()) ^ 1);
        let verifier = Verifier::new(&regs);
        assert_eq!(
            check_hardware_environment(&verifier, &HashOnly),
            Err(FirmwareError::IntegrityFailure)
        );
    }

    #[test]
    fn hash_failure_is_a_crypto_failure() {
        let regs = verifier_with(1, crc32c(&1u32.to_ne_bytes()));
        let verifier = Verifier::new(&regs);
        assert_eq!(
            check_hardware_environment(&verifier, &NoHash),
            Err(FirmwareError::CryptoFailure)
        );
    }

    #[test]
    fn gate_runs_markers_first() {
        let empty = RegisterFile::<MARKER_BANK_WORDS>::new();
        let regs = verifier_with(1, crc32c(&1u32.to_ne_bytes()));
        let verifier = Verifier::new(&regs);
        assert_eq!(
            run_integrity_gate(&MarkerBank::new(&empty), &verifier, &HashOnly),
            Err(FirmwareError::IntegrityFailure)
        );
        // The verifier was never answered.
        assert_eq!(verifier.read_hash(), [0u8; SHA256_LEN]);

        let ram = stamped();
        assert_eq!(run_integrity_gate(&MarkerBank::new(&ram), &verifier, &HashOnly), Ok(()));
    }
}
