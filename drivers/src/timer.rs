//! ARM SP804 dual timer driver.
//!
//! Each SP804 block holds two independent down-counters; `Sp804` drives one
//! counter through a register window that starts at that counter.

use hmacgate_abi::{Component, RegisterPort};
use hmacgate_lib::klog_debug;

use crate::hw::timer_defs::*;
use crate::markers::MarkerBank;

pub struct Sp804<P: RegisterPort> {
    regs: P,
}

impl<P: RegisterPort> Sp804<P> {
    pub const fn new(regs: P) -> Self {
        Self { regs }
    }

    pub fn regs(&self) -> &P {
        &self.regs
    }

    /// Periodic 32-bit mode, stopped, interrupt off, no prescale.
    /// Reserved control bits are preserved.
    pub fn init<M: RegisterPort>(&self, markers: &MarkerBank<M>) {
        self.regs.set_bits(
            TIMER_CONTROL,
            (TimerControl::PERIODIC | TimerControl::SIZE_32).bits(),
        );
        self.regs.clear_bits(
            TIMER_CONTROL,
            (TimerControl::ENABLE
                | TimerControl::INTR_ENABLE
                | TimerControl::PRESCALE_16
                | TimerControl::PRESCALE_256
                | TimerControl::ONESHOT)
                .bits(),
        );

        markers.stamp(Component::Timer);
        klog_debug!("TIMER: counter initialized");
    }

    pub fn start(&self) {
        self.regs.set_bits(TIMER_CONTROL, TimerControl::ENABLE.bits());
    }

    pub fn stop(&self) {
        self.regs.clear_bits(TIMER_CONTROL, TimerControl::ENABLE.bits());
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.bits_set(TIMER_CONTROL, TimerControl::ENABLE.bits())
    }

    pub fn set_load(&self, value: u32) {
        self.regs.write(TIMER_LOAD, value);
    }

    pub fn value(&self) -> u32 {
        self.regs.read(TIMER_VALUE)
    }

    pub fn enable_interrupt(&self) {
        self.regs.set_bits(TIMER_CONTROL, TimerControl::INTR_ENABLE.bits());
    }

    pub fn disable_interrupt(&self) {
        self.regs.clear_bits(TIMER_CONTROL, TimerControl::INTR_ENABLE.bits());
    }

    pub fn clear_interrupt(&self) {
        self.regs.write(TIMER_INTCLR, INTCLR_ALL);
    }

    pub fn control(&self) -> TimerControl {
        TimerControl::from_bits_retain(self.regs.read(TIMER_CONTROL))
    }
}
