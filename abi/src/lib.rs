//! hmacgate shared vocabulary
//!
//! This crate holds the definitions every other layer agrees on:
//! - the error taxonomy and its integer codes
//! - the wire protocol constants
//! - the board memory map and interrupt line numbers
//! - the integrity-marker layout and expected patterns
//! - the traits that let drivers, core logic and boot code meet without
//!   depending on each other directly
//!
//! Nothing in here touches hardware.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod crypto_traits;
pub mod error;
pub mod hw_traits;
pub mod integrity;
pub mod protocol;

pub use crypto_traits::*;
pub use error::*;
pub use hw_traits::*;
pub use integrity::*;
pub use protocol::*;
