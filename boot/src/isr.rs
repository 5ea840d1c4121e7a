//! Interrupt service routines for the two live interrupt sources.
//!
//! Both run with IRQs masked and to completion; they only touch the receive
//! queue and the tick counter, which the main loop reads.

use hmacgate_abi::{IrqHandler, RegisterPort, SerialLine};
use hmacgate_drivers::{Pl011, Sp804};
use hmacgate_lib::{IrqMutex, RingBuffer, TickCounter};

use crate::config::RX_QUEUE_CAPACITY;

pub type RxQueue = IrqMutex<RingBuffer<u8, RX_QUEUE_CAPACITY>>;

pub const fn new_rx_queue() -> RxQueue {
    IrqMutex::new(RingBuffer::new_with(0))
}

/// Drains the protocol UART into the receive queue.
///
/// When the host outruns the main loop the oldest bytes are dropped.
pub struct UartRxIsr<'a, P: RegisterPort> {
    uart: &'a Pl011<P>,
    queue: &'a RxQueue,
}

impl<'a, P: RegisterPort> UartRxIsr<'a, P> {
    pub const fn new(uart: &'a Pl011<P>, queue: &'a RxQueue) -> Self {
        Self { uart, queue }
    }
}

impl<P: RegisterPort + Sync> IrqHandler for UartRxIsr<'_, P> {
    fn handle(&self) {
        let mut queue = self.queue.lock();
        while let Some(byte) = self.uart.try_receive() {
            queue.push_overwrite(byte);
        }
        self.uart.clear_rx_interrupt();
    }
}

/// Counts one tick per timer period.
pub struct TimerTickIsr<'a, P: RegisterPort> {
    timer: &'a Sp804<P>,
    ticks: &'a TickCounter,
}

impl<'a, P: RegisterPort> TimerTickIsr<'a, P> {
    pub const fn new(timer: &'a Sp804<P>, ticks: &'a TickCounter) -> Self {
        Self { timer, ticks }
    }
}

impl<P: RegisterPort + Sync> IrqHandler for TimerTickIsr<'_, P> {
    fn handle(&self) {
        self.ticks.tick();
        self.timer.clear_interrupt();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::vec::Vec;

    use hmacgate_drivers::hw::timer_defs::{INTCLR_ALL, TIMER_INTCLR};
    use hmacgate_drivers::hw::uart_defs::{FlagBits, InterruptBits, UARTDR, UARTFR, UARTICR};
    use hmacgate_lib::RegisterFile;

    use super::*;

    /// PL011 receive FIFO model: data register pops, flag register tracks
    /// emptiness. Other registers behave like plain RAM.
    #[derive(Default)]
    struct FifoUart {
        fifo: Mutex<VecDeque<u8>>,
        regs: RegisterFile<32>,
    }

    impl RegisterPort for FifoUart {
        fn read(&self, offset: usize) -> u32 {
            let mut fifo = self.fifo.lock().unwrap();
            match offset {
                UARTDR => fifo.pop_front().map_or(0, u32::from),
                UARTFR if fifo.is_empty() => FlagBits::RXFE.bits(),
                UARTFR => 0,
                _ => self.regs.read(offset),
            }
        }

        fn write(&self, offset: usize, value: u32) {
            self.regs.write(offset, value);
        }
    }

    #[test]
    fn timer_isr_counts_and_clears() {
        let regs = RegisterFile::<8>::new();
        let timer = Sp804::new(&regs);
        let ticks = TickCounter::new();
        let isr = TimerTickIsr::new(&timer, &ticks);

        for _ in 0..5 {
            isr.handle();
        }
        assert_eq!(ticks.count(), 5);
        assert_eq!(regs.read(TIMER_INTCLR), INTCLR_ALL);
    }

    #[test]
    fn uart_isr_drains_fifo_in_order() {
        let port = FifoUart::default();
        port.fifo.lock().unwrap().extend([0xAA, 1, 2, 3]);
        let uart = Pl011::new(&port);
        let queue = new_rx_queue();
        let isr = UartRxIsr::new(&uart, &queue);

        isr.handle();
        assert!(port.fifo.lock().unwrap().is_empty());
        let drained: Vec<u8> = core::iter::from_fn(|| queue.lock().try_pop().ok()).collect();
        assert_eq!(drained, [0xAA, 1, 2, 3]);
        assert_eq!(
            port.regs.read(UARTICR),
            (InterruptBits::RX | InterruptBits::RT).bits()
        );
    }

    #[test]
    fn uart_isr_overwrites_oldest_when_backlog_is_full() {
        let port = FifoUart::default();
        let uart = Pl011::new(&port);
        let queue = new_rx_queue();
        let isr = UartRxIsr::new(&uart, &queue);

        port.fifo
            .lock()
            .unwrap()
            .extend((0..RX_QUEUE_CAPACITY + 3).map(|i| i as u8));
        isr.handle();

        let mut q = queue.lock();
        assert_eq!(q.len(), RX_QUEUE_CAPACITY);
        assert_eq!(q.try_pop(), Ok(3));
    }
}
