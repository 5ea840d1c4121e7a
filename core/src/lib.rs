#![no_std]

#[cfg(test)]
extern crate std;

pub mod integrity;
pub mod session;
pub mod transport;

pub use integrity::{
    check_driver_markers, check_hardware_environment, marker_report, run_integrity_gate,
};
pub use session::{Session, SessionState, StepOutcome};
pub use transport::{RxQueue, Transport};
