#![no_std]

#[cfg(test)]
extern crate std;

pub mod crypto;
pub mod hw;
pub mod markers;
pub mod pic;
pub mod random;
pub mod rtc;
pub mod serial;
pub mod timer;
pub mod uart;
pub mod verifier;

pub use crypto::SoftCrypto;
pub use markers::MarkerBank;
pub use pic::{dispatch, LineClass, SlotInfo, Vic};
pub use random::HmacDrbg;
pub use rtc::Rtc;
pub use timer::Sp804;
pub use uart::Pl011;
pub use verifier::{crc32c, Verifier};
