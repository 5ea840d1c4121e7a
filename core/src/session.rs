//! HELLO / NONCE / HMAC / disclosure handshake.
//!
//! ```text
//!   host                         device
//!   0xAA  ───────────────────▶   Ready
//!         ◀───────────────────   nonce (4 bytes, big-endian)
//!   HMAC-SHA256(secret, nonce) ▶ AwaitingHmac
//!         ◀───────────────────   payload, '\n'       (Finished)
//! ```
//!
//! Every read has a fixed length, so a bad byte never desynchronizes the
//! stream. Timeouts and mismatches are absorbed here; only crypto failures
//! and broken preconditions escape to the caller, which treats them as fatal.

use hmacgate_abi::{
    nonce_hmac_message, nonce_to_wire, CryptoService, FirmwareError, FirmwareResult, SerialLine,
    TickSource, HANDSHAKE_TIMEOUT_MS, HELLO_OPCODE, HMAC_LEN, NONCE_LEN, PAYLOAD_TERMINATOR,
};
use hmacgate_drivers::{console_print, console_println};
use hmacgate_lib::{klog_debug, klog_warn};

use crate::transport::{RxQueue, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    AwaitingHmac,
    Finished,
}

/// What one `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// HELLO received; this nonce went out.
    NonceSent(u32),
    /// A byte other than HELLO arrived.
    InvalidOpcode(u8),
    /// No opcode within the timeout.
    OpcodeTimeout,
    /// The peer proved knowledge of the secret.
    HmacAccepted,
    /// The peer's HMAC did not match.
    InvalidHmac,
    /// No complete HMAC within the timeout; the nonce is kept.
    HmacTimeout,
    /// Payload written (bytes, terminator excluded).
    PayloadSent(usize),
}

impl StepOutcome {
    /// The recoverable error this outcome stands for, if any.
    pub fn error(self) -> Option<FirmwareError> {
        match self {
            Self::OpcodeTimeout | Self::HmacTimeout => Some(FirmwareError::Timeout),
            Self::InvalidOpcode(_) | Self::InvalidHmac => Some(FirmwareError::ProtocolMismatch),
            Self::NonceSent(_) | Self::HmacAccepted | Self::PayloadSent(_) => None,
        }
    }
}

/// Byte comparison whose running time does not depend on where the inputs
/// differ.
fn tags_equal(a: &[u8; HMAC_LEN], b: &[u8; HMAC_LEN]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Dots that right-align an unpadded 32-bit hex value in an 8-column field.
fn hex_dot_padding(value: u32) -> usize {
    let digits = (32 - value.leading_zeros()).div_ceil(4).max(1);
    8 - digits as usize
}

pub struct Session<'a> {
    state: SessionState,
    nonce: u32,
    secret: &'a [u8],
    payload: &'a [u8],
    timeout_ms: u32,
}

impl<'a> Session<'a> {
    /// Both `secret` and `payload` must be non-empty.
    pub fn new(secret: &'a [u8], payload: &'a [u8]) -> FirmwareResult<Self> {
        Self::with_timeout(secret, payload, HANDSHAKE_TIMEOUT_MS)
    }

    pub fn with_timeout(secret: &'a [u8], payload: &'a [u8], timeout_ms: u32) -> FirmwareResult<Self> {
        if secret.is_empty() || payload.is_empty() {
            return Err(FirmwareError::InvalidArgument);
        }
        Ok(Self {
            state: SessionState::Ready,
            nonce: 0,
            secret,
            payload,
            timeout_ms,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Nonce of the handshake in progress (stale outside `AwaitingHmac`).
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    /// Advances the handshake by one state.
    pub fn step<Q, L, T, C>(
        &mut self,
        transport: &mut Transport<'_, Q, L, T>,
        crypto: &mut C,
    ) -> FirmwareResult<StepOutcome>
    where
        Q: RxQueue + ?Sized,
        L: SerialLine,
        T: TickSource,
        C: CryptoService + ?Sized,
    {
        let outcome = match self.state {
            SessionState::Ready => self.await_hello(transport, crypto)?,
            SessionState::AwaitingHmac => self.await_hmac(transport, crypto)?,
            SessionState::Finished => self.disclose(transport)?,
        };
        if let Some(err) = outcome.error() {
            klog_debug!("SESSION: {:?} ({})", outcome, err);
        }
        Ok(outcome)
    }

    fn await_hello<Q, L, T, C>(
        &mut self,
        transport: &mut Transport<'_, Q, L, T>,
        crypto: &mut C,
    ) -> FirmwareResult<StepOutcome>
    where
        Q: RxQueue + ?Sized,
        L: SerialLine,
        T: TickSource,
        C: CryptoService + ?Sized,
    {
        console_print!("> Waiting for `HELLO` opcode ... ");
        let mut opcode = [0u8; 1];
        if transport.receive(&mut opcode, self.timeout_ms)? == 0 {
            console_println!("[TIMEOUT]");
            return Ok(StepOutcome::OpcodeTimeout);
        }
        if opcode[0] != HELLO_OPCODE {
            console_println!("[RECEIVED INVALID OPCODE ({:#04x})]", opcode[0]);
            return Ok(StepOutcome::InvalidOpcode(opcode[0]));
        }
        console_println!("[RECEIVED]");

        let mut raw = [0u8; NONCE_LEN];
        crypto.secure_random(&mut raw)?;
        self.nonce = u32::from_ne_bytes(raw);

        console_print!(
            "> Sending NONCE (0x{:x}) {:.<pad$}... ",
            self.nonce,
            "",
            pad = hex_dot_padding(self.nonce)
        );
        transport.send(&nonce_to_wire(self.nonce))?;
        console_println!("[SENT]");

        self.state = SessionState::AwaitingHmac;
        Ok(StepOutcome::NonceSent(self.nonce))
    }

    fn await_hmac<Q, L, T, C>(
        &mut self,
        transport: &mut Transport<'_, Q, L, T>,
        crypto: &C,
    ) -> FirmwareResult<StepOutcome>
    where
        Q: RxQueue + ?Sized,
        L: SerialLine,
        T: TickSource,
        C: CryptoService + ?Sized,
    {
        console_print!("> Waiting for HMAC256 .......... ");
        let expected = crypto.hmac_sha256(self.secret, &nonce_hmac_message(self.nonce))?;

        let mut received = [0u8; HMAC_LEN];
        let n = transport.receive(&mut received, self.timeout_ms)?;
        if n < HMAC_LEN {
            // The nonce stays valid; the host may try again.
            console_println!("[TIMEOUT]");
            return Ok(StepOutcome::HmacTimeout);
        }
        if !tags_equal(&received, &expected) {
            console_println!("[RECEIVED INVALID HMAC]");
            klog_warn!("SESSION: HMAC mismatch for nonce {:#010x}", self.nonce);
            self.state = SessionState::Ready;
            return Ok(StepOutcome::InvalidHmac);
        }
        console_println!("[RECEIVED]");
        self.state = SessionState::Finished;
        Ok(StepOutcome::HmacAccepted)
    }

    fn disclose<Q, L, T>(&mut self, transport: &mut Transport<'_, Q, L, T>) -> FirmwareResult<StepOutcome>
    where
        Q: RxQueue + ?Sized,
        L: SerialLine,
        T: TickSource,
    {
        console_print!("> Sending payload ... ");
        let sent = transport.send(self.payload)?;
        transport.send(&[PAYLOAD_TERMINATOR])?;
        console_println!("[SENT]");

        self.state = SessionState::Ready;
        Ok(StepOutcome::PayloadSent(sent))
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use std::vec::Vec;

    use hmac::{Hmac, Mac};
    use hmacgate_abi::{CryptoError, SHA256_LEN};
    use sha2::{Digest, Sha256};

    use super::*;
    use crate::transport::testing::*;

    const SECRET: &[u8] = b"shared secret";
    const PAYLOAD: &[u8] = b"flag{vectored}";

    /// Deterministic crypto: fixed nonce bytes, real HMAC.
    struct FixedCrypto {
        nonce: [u8; NONCE_LEN],
        random_calls: Cell<u32>,
        fail_random: bool,
    }

    impl FixedCrypto {
        fn new(nonce: u32) -> Self {
            Self {
                nonce: nonce.to_ne_bytes(),
                random_calls: Cell::new(0),
                fail_random: false,
            }
        }
    }

    impl CryptoService for FixedCrypto {
        fn secure_random(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
            self.random_calls.set(self.random_calls.get() + 1);
            if self.fail_random {
                return Err(CryptoError::EntropyUnavailable);
            }
            out.copy_from_slice(&self.nonce[..out.len()]);
            Ok(())
        }

        fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
            let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(|_| CryptoError::InvalidInput)?;
            mac.update(message);
            let mut tag = [0u8; HMAC_LEN];
            tag.copy_from_slice(&mac.finalize().into_bytes());
            Ok(tag)
        }

        fn sha256(&self, data: &[u8]) -> Result<[u8; SHA256_LEN], CryptoError> {
            let mut out = [0u8; SHA256_LEN];
            out.copy_from_slice(&Sha256::digest(data));
            Ok(out)
        }
    }

    /// What an honest host sends back for `nonce_on_wire`.
    fn host_answer(secret: &[u8], nonce_on_wire: &[u8]) -> [u8; HMAC_LEN] {
        let nonce = u32::from_be_bytes([
            nonce_on_wire[0],
            nonce_on_wire[1],
            nonce_on_wire[2],
            nonce_on_wire[3],
        ]);
        let mut mac = Hmac::<Sha256>::new_from_slice(secret).unwrap();
        mac.update(&nonce.to_ne_bytes());
        let mut tag = [0u8; HMAC_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        tag
    }

    #[test]
    fn rejects_empty_secret_or_payload() {
        assert_eq!(Session::new(b"", PAYLOAD).err(), Some(FirmwareError::InvalidArgument));
        assert_eq!(Session::new(SECRET, b"").err(), Some(FirmwareError::InvalidArgument));
    }

    #[test]
    fn full_handshake_discloses_payload() {
        let rx = ScriptedRx::with(&[HELLO_OPCODE]);
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(0xCAFE_F00D);
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        assert_eq!(
            session.step(&mut transport, &mut crypto),
            Ok(StepOutcome::NonceSent(0xCAFE_F00D))
        );
        assert_eq!(session.state(), SessionState::AwaitingHmac);
        let wire: Vec<u8> = line.sent.borrow().clone();
        assert_eq!(wire, [0xCA, 0xFE, 0xF0, 0x0D]);

        rx.push(&host_answer(SECRET, &wire));
        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::HmacAccepted));
        assert_eq!(session.state(), SessionState::Finished);

        line.sent.borrow_mut().clear();
        assert_eq!(
            session.step(&mut transport, &mut crypto),
            Ok(StepOutcome::PayloadSent(PAYLOAD.len()))
        );
        let mut expected = PAYLOAD.to_vec();
        expected.push(b'\n');
        assert_eq!(*line.sent.borrow(), expected);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn wrong_hmac_returns_to_ready_without_payload() {
        let rx = ScriptedRx::with(&[HELLO_OPCODE]);
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(7);
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        session.step(&mut transport, &mut crypto).unwrap();
        let wire: Vec<u8> = line.sent.borrow().clone();
        let mut answer = host_answer(b"wrong secret", &wire);
        rx.push(&answer);
        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::InvalidHmac));
        assert_eq!(session.state(), SessionState::Ready);

        // A correct tag with one flipped bit is still rejected.
        rx.push(&[HELLO_OPCODE]);
        session.step(&mut transport, &mut crypto).unwrap();
        answer = host_answer(SECRET, &wire);
        answer[HMAC_LEN - 1] ^= 0x80;
        rx.push(&answer);
        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::InvalidHmac));

        let sent = line.sent.borrow();
        assert!(!sent.windows(PAYLOAD.len()).any(|w| w == PAYLOAD));
    }

    #[test]
    fn opcode_timeout_stays_ready_and_generates_no_nonce() {
        let rx = ScriptedRx::default();
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(1);
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::OpcodeTimeout));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(crypto.random_calls.get(), 0);
        assert!(line.sent.borrow().is_empty());
        // 3000 ms at 100 ms per tick.
        assert!(clock.now.get() >= 30);
    }

    #[test]
    fn invalid_opcode_stays_ready() {
        let rx = ScriptedRx::with(&[0x55]);
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(1);
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        assert_eq!(
            session.step(&mut transport, &mut crypto),
            Ok(StepOutcome::InvalidOpcode(0x55))
        );
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(crypto.random_calls.get(), 0);
    }

    #[test]
    fn hmac_timeout_keeps_nonce_for_retry() {
        let rx = ScriptedRx::with(&[HELLO_OPCODE]);
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(0x0102_0304);
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        session.step(&mut transport, &mut crypto).unwrap();
        let wire: Vec<u8> = line.sent.borrow().clone();
        let answer = host_answer(SECRET, &wire);

        // Only half the tag arrives.
        rx.push(&answer[..16]);
        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::HmacTimeout));
        assert_eq!(session.state(), SessionState::AwaitingHmac);
        assert_eq!(session.nonce(), 0x0102_0304);
        assert_eq!(crypto.random_calls.get(), 1);

        // The retry is answered against the same nonce.
        rx.push(&answer);
        assert_eq!(session.step(&mut transport, &mut crypto), Ok(StepOutcome::HmacAccepted));
        assert_eq!(crypto.random_calls.get(), 1);
    }

    #[test]
    fn random_failure_is_fatal() {
        let rx = ScriptedRx::with(&[HELLO_OPCODE]);
        let line = RecordingLine::default();
        let clock = SteppingClock::new(None);
        let mut transport = Transport::new(&rx, &line, &clock, 100).unwrap();
        let mut crypto = FixedCrypto::new(1);
        crypto.fail_random = true;
        let mut session = Session::new(SECRET, PAYLOAD).unwrap();

        assert_eq!(
            session.step(&mut transport, &mut crypto),
            Err(FirmwareError::CryptoFailure)
        );
        assert!(line.sent.borrow().is_empty());
    }

    #[test]
    fn outcome_errors_follow_taxonomy() {
        assert_eq!(StepOutcome::OpcodeTimeout.error(), Some(FirmwareError::Timeout));
        assert_eq!(StepOutcome::HmacTimeout.error(), Some(FirmwareError::Timeout));
        assert_eq!(StepOutcome::InvalidHmac.error(), Some(FirmwareError::ProtocolMismatch));
        assert_eq!(StepOutcome::InvalidOpcode(1).error(), Some(FirmwareError::ProtocolMismatch));
        assert_eq!(StepOutcome::HmacAccepted.error(), None);
    }

    #[test]
    fn nonce_report_padding() {
        assert_eq!(hex_dot_padding(0), 7);
        assert_eq!(hex_dot_padding(0x1a), 6);
        assert_eq!(hex_dot_padding(0x0100_0000), 1);
        assert_eq!(hex_dot_padding(u32::MAX), 0);
    }

    #[test]
    fn tag_comparison() {
        let a = [3u8; HMAC_LEN];
        let mut b = a;
        assert!(tags_equal(&a, &b));
        b[0] = 4;
        assert!(!tags_equal(&a, &b));
    }
}
