//! Timeout-bounded byte transport over the interrupt-fed receive queue.
//!
//! Receiving drains the queue the UART handler fills; sending writes straight
//! to the line. Waits are busy polls against the tick clock; there is no
//! scheduler to yield to.

use hmacgate_abi::{FirmwareError, FirmwareResult, SerialLine, TickSource};
use hmacgate_lib::{IrqMutex, RingBuffer};

/// Consumer side of the receive backlog.
pub trait RxQueue {
    fn pop(&self) -> Option<u8>;
}

impl<const N: usize> RxQueue for IrqMutex<RingBuffer<u8, N>> {
    #[inline]
    fn pop(&self) -> Option<u8> {
        self.lock().try_pop().ok()
    }
}

pub struct Transport<'a, Q: RxQueue + ?Sized, L: SerialLine, T: TickSource> {
    rx: &'a Q,
    tx: L,
    clock: T,
    ms_per_tick: u32,
}

impl<'a, Q: RxQueue + ?Sized, L: SerialLine, T: TickSource> Transport<'a, Q, L, T> {
    /// `ms_per_tick` is the tick clock's period and must be non-zero.
    pub fn new(rx: &'a Q, tx: L, clock: T, ms_per_tick: u32) -> FirmwareResult<Self> {
        if ms_per_tick == 0 {
            return Err(FirmwareError::InvalidArgument);
        }
        Ok(Self {
            rx,
            tx,
            clock,
            ms_per_tick,
        })
    }

    pub fn ms_per_tick(&self) -> u32 {
        self.ms_per_tick
    }

    /// Timeout expressed in whole ticks, rounded down.
    pub fn timeout_ticks(&self, timeout_ms: u32) -> u32 {
        timeout_ms / self.ms_per_tick
    }

    /// Fills `buf` from the receive queue.
    ///
    /// Returns early with the bytes gathered so far once `timeout_ms` passes
    /// without a new byte arriving. The timeout restarts after every byte.
    pub fn receive(&mut self, buf: &mut [u8], timeout_ms: u32) -> FirmwareResult<usize> {
        if buf.is_empty() {
            return Err(FirmwareError::InvalidArgument);
        }
        let timeout = self.timeout_ticks(timeout_ms);
        let mut last_progress = self.clock.ticks();
        let mut received = 0;

        while received < buf.len() {
            if let Some(byte) = self.rx.pop() {
                buf[received] = byte;
                received += 1;
                last_progress = self.clock.ticks();
            } else if self.clock.ticks().wrapping_sub(last_progress) >= timeout {
                break;
            } else {
                core::hint::spin_loop();
            }
        }
        Ok(received)
    }

    /// Writes every byte of `buf`, blocking on the transmitter.
    pub fn send(&mut self, buf: &[u8]) -> FirmwareResult<usize> {
        if buf.is_empty() {
            return Err(FirmwareError::InvalidArgument);
        }
        for &byte in buf {
            self.tx.send_byte(byte);
        }
        Ok(buf.len())
    }
}
