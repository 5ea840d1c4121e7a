//! Wire protocol constants for the challenge/response handshake.

/// Opcode a host sends to open a handshake.
pub const HELLO_OPCODE: u8 = 0xAA;

/// Nonce width on the wire (big-endian).
pub const NONCE_LEN: usize = 4;

/// HMAC-SHA256 tag width.
pub const HMAC_LEN: usize = 32;

/// SHA-256 digest width.
pub const SHA256_LEN: usize = 32;

/// Per-byte inactivity timeout for every handshake read.
pub const HANDSHAKE_TIMEOUT_MS: u32 = 3000;

/// Terminates the disclosed payload on the wire.
pub const PAYLOAD_TERMINATOR: u8 = b'\n';

/// Nonce as it travels from device to host.
#[inline]
pub const fn nonce_to_wire(nonce: u32) -> [u8; NONCE_LEN] {
    nonce.to_be_bytes()
}

/// Message the HMAC is computed over: the nonce's native-order bytes.
#[inline]
pub const fn nonce_hmac_message(nonce: u32) -> [u8; NONCE_LEN] {
    nonce.to_ne_bytes()
}
