//! Register layouts and bit definitions for the board's peripherals.

pub mod timer_defs;
pub mod uart_defs;
pub mod verifier_defs;
pub mod vic_defs;
