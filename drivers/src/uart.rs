//! ARM PL011 UART driver.

use hmacgate_abi::{Component, RegisterPort, SerialLine};
use hmacgate_lib::{klog_debug, KlogSink};

use crate::hw::uart_defs::*;
use crate::markers::MarkerBank;

pub struct Pl011<P: RegisterPort> {
    regs: P,
}

impl<P: RegisterPort> Pl011<P> {
    pub const fn new(regs: P) -> Self {
        Self { regs }
    }

    pub fn regs(&self) -> &P {
        &self.regs
    }

    /// Transmit-only, all interrupts masked, FIFOs on.
    pub fn init<M: RegisterPort>(&self, markers: &MarkerBank<M>) {
        self.regs.clear_bits(UARTCR, ControlFlags::UARTEN.bits());

        let cr = ControlFlags::from_bits_retain(self.regs.read(UARTCR));
        let cr = (cr & !ControlFlags::all()) | ControlFlags::TXE;
        self.regs.write(UARTCR, cr.bits());

        self.regs.write(UARTIMSC, 0);
        self.regs.set_bits(UARTLCR_H, LCR_H_FEN);
        self.regs.set_bits(UARTCR, ControlFlags::UARTEN.bits());

        markers.stamp(Component::Serial);
        klog_debug!("UART: initialized");
    }

    /// Control bits may only change while the UART is disabled.
    fn update_control(&self, set: ControlFlags, clear: ControlFlags) {
        let was_enabled = self.regs.bits_set(UARTCR, ControlFlags::UARTEN.bits());
        self.regs.clear_bits(UARTCR, ControlFlags::UARTEN.bits());
        let cr = ControlFlags::from_bits_retain(self.regs.read(UARTCR));
        self.regs.write(UARTCR, ((cr | set) & !clear).bits());
        if was_enabled {
            self.regs.set_bits(UARTCR, ControlFlags::UARTEN.bits());
        }
    }

    pub fn enable_rx(&self) {
        self.update_control(ControlFlags::RXE, ControlFlags::empty());
    }

    pub fn disable_rx(&self) {
        self.update_control(ControlFlags::empty(), ControlFlags::RXE);
    }

    pub fn enable_tx(&self) {
        self.update_control(ControlFlags::TXE, ControlFlags::empty());
    }

    pub fn disable_tx(&self) {
        self.update_control(ControlFlags::empty(), ControlFlags::TXE);
    }

    pub fn enable_rx_interrupt(&self) {
        self.regs.set_bits(UARTIMSC, InterruptBits::RX.bits());
    }

    pub fn disable_rx_interrupt(&self) {
        self.regs.clear_bits(UARTIMSC, InterruptBits::RX.bits());
    }

    pub fn clear_rx_interrupt(&self) {
        self.regs.write(UARTICR, (InterruptBits::RX | InterruptBits::RT).bits());
    }

    fn flags(&self) -> FlagBits {
        FlagBits::from_bits_retain(self.regs.read(UARTFR))
    }

    pub fn write_bytes(&self, bytes: &[u8]) {
        for &b in bytes {
            self.send_byte(b);
        }
    }
}

impl<P: RegisterPort> SerialLine for Pl011<P> {
    fn send_byte(&self, byte: u8) {
        while self.flags().contains(FlagBits::TXFF) {
            core::hint::spin_loop();
        }
        self.regs.write(UARTDR, byte as u32);
    }

    fn try_receive(&self) -> Option<u8> {
        if self.flags().contains(FlagBits::RXFE) {
            None
        } else {
            Some((self.regs.read(UARTDR) & DR_DATA_MASK) as u8)
        }
    }
}

impl<P: RegisterPort + Sync> KlogSink for Pl011<P> {
    fn write_bytes(&self, bytes: &[u8]) {
        Pl011::write_bytes(self, bytes);
    }
}
