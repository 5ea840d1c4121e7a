#![no_std]

#[cfg(test)]
extern crate std;

pub mod banner;
pub mod board;
pub mod config;
pub mod fatal;
pub mod isr;

use hmacgate_abi::{CryptoService, SerialLine, TickSource};
use hmacgate_core::{RxQueue, Session, Transport};

pub use banner::print_banner;
pub use board::{bring_up, Board};
pub use config::{BoardConfig, BOARD_CONFIG, HMAC_SECRET, PAYLOAD, RX_QUEUE_CAPACITY};
pub use fatal::{fatal, panic_halt};
pub use isr::{new_rx_queue, TimerTickIsr, UartRxIsr};

/// Runs the handshake forever. Recoverable outcomes are handled inside the
/// session; anything that escapes it is fatal.
pub fn serve<Q, L, T, C>(
    session: &mut Session<'_>,
    transport: &mut Transport<'_, Q, L, T>,
    crypto: &mut C,
) -> !
where
    Q: RxQueue + ?Sized,
    L: SerialLine,
    T: TickSource,
    C: CryptoService + ?Sized,
{
    loop {
        if let Err(err) = session.step(transport, crypto) {
            fatal(err);
        }
    }
}
