//! Board instance and the bring-up sequence.
//!
//! Bring-up runs with IRQs masked: the controller, every timer counter and
//! every UART are put in a known state, the protocol UART and the tick timer
//! are wired into the vector table, and the integrity gate must pass before
//! IRQs are unmasked.

use hmacgate_abi::board::{
    COUNTERS_PER_TIMER, PIC_BASE, RTC_BASE, TIMER_BASES, UART_BASES, VERIFIER_BASE,
};
use hmacgate_abi::{CryptoService, FirmwareError, FirmwareResult, IrqHandler, RegisterPort};
use hmacgate_core::run_integrity_gate;
use hmacgate_drivers::hw::timer_defs::{COUNTER_STRIDE, COUNTER_WINDOW};
use hmacgate_drivers::hw::uart_defs::UART_WINDOW;
use hmacgate_drivers::hw::verifier_defs::{RTC_WINDOW, VERIFIER_WINDOW};
use hmacgate_drivers::hw::vic_defs::VIC_WINDOW;
use hmacgate_drivers::serial::console_attach;
use hmacgate_drivers::{MarkerBank, Pl011, Rtc, Sp804, Verifier, Vic};
use hmacgate_lib::{cpu, klog_attach_console, klog_info, InitFlag, IrqMutex, MmioRegion};

use crate::config::BoardConfig;

pub const NR_UARTS: usize = UART_BASES.len();
pub const NR_TIMERS: usize = TIMER_BASES.len();

pub struct Board<P: RegisterPort, M: RegisterPort> {
    pub vic: IrqMutex<Vic<P>>,
    pub uarts: [Pl011<P>; NR_UARTS],
    pub timers: [[Sp804<P>; COUNTERS_PER_TIMER]; NR_TIMERS],
    pub rtc: Rtc<P>,
    pub verifier: Verifier<P>,
    pub markers: MarkerBank<M>,
    /// Set by the first `bring_up`.
    pub started: InitFlag,
}

const fn uart(index: usize) -> Pl011<MmioRegion> {
    Pl011::new(MmioRegion::new(UART_BASES[index], UART_WINDOW))
}

const fn counter(timer: usize, counter: usize) -> Sp804<MmioRegion> {
    Sp804::new(MmioRegion::new(
        TIMER_BASES[timer] + counter * COUNTER_STRIDE,
        COUNTER_WINDOW,
    ))
}

impl<M: RegisterPort> Board<MmioRegion, M> {
    /// The Versatile/PB memory map, with markers kept in `markers`.
    pub const fn versatile(markers: M) -> Self {
        Self {
            vic: IrqMutex::new(Vic::new(MmioRegion::new(PIC_BASE, VIC_WINDOW))),
            uarts: [uart(0), uart(1), uart(2)],
            timers: [[counter(0, 0), counter(0, 1)], [counter(1, 0), counter(1, 1)]],
            rtc: Rtc::new(MmioRegion::new(RTC_BASE, RTC_WINDOW)),
            verifier: Verifier::new(MmioRegion::new(VERIFIER_BASE, VERIFIER_WINDOW)),
            markers: MarkerBank::new(markers),
            started: InitFlag::new(),
        }
    }
}

impl<P: RegisterPort + Sync, M: RegisterPort> Board<P, M> {
    pub fn console(&self, cfg: &BoardConfig) -> FirmwareResult<&Pl011<P>> {
        self.uarts
            .get(cfg.console_uart)
            .ok_or(FirmwareError::InvalidArgument)
    }

    pub fn protocol_uart(&self, cfg: &BoardConfig) -> FirmwareResult<&Pl011<P>> {
        self.uarts
            .get(cfg.protocol_uart)
            .ok_or(FirmwareError::InvalidArgument)
    }

    pub fn tick_timer(&self, cfg: &BoardConfig) -> FirmwareResult<&Sp804<P>> {
        self.timers
            .get(cfg.tick_timer)
            .and_then(|t| t.get(cfg.tick_counter))
            .ok_or(FirmwareError::InvalidArgument)
    }

    /// Resets the controller and every timer counter and UART.
    pub fn init_devices(&self) {
        self.vic.lock().init(&self.markers);
        for timer in self.timers.iter().flatten() {
            timer.init(&self.markers);
        }
        for uart in &self.uarts {
            uart.init(&self.markers);
        }
    }

    /// Enables the protocol UART both ways and routes its receive interrupt
    /// to `handler`. Returns the vector slot the line landed in.
    pub fn setup_protocol_uart(
        &self,
        cfg: &BoardConfig,
        handler: &'static dyn IrqHandler,
    ) -> FirmwareResult<usize> {
        let uart = self.protocol_uart(cfg)?;
        let irq = cfg.protocol_irq()?;

        uart.enable_rx();
        uart.enable_tx();
        uart.enable_rx_interrupt();

        let mut vic = self.vic.lock();
        let slot = vic.register(irq, Some(handler), cfg.uart_priority)?;
        vic.enable_line(irq)?;
        klog_info!(
            "UART{}: receive interrupt on line {} (slot {})",
            cfg.protocol_uart,
            irq,
            slot
        );
        Ok(slot)
    }

    /// Loads the tick period, routes the timer interrupt to `handler` and
    /// starts counting.
    pub fn setup_tick_timer(
        &self,
        cfg: &BoardConfig,
        handler: &'static dyn IrqHandler,
    ) -> FirmwareResult<usize> {
        let timer = self.tick_timer(cfg)?;
        let irq = cfg.timer_irq()?;

        timer.set_load(cfg.timer_reload());
        timer.enable_interrupt();

        let slot = {
            let mut vic = self.vic.lock();
            let slot = vic.register(irq, Some(handler), cfg.timer_priority)?;
            vic.enable_line(irq)?;
            slot
        };

        timer.start();
        klog_info!(
            "TIMER{}.{}: {} ms tick on line {} (slot {})",
            cfg.tick_timer,
            cfg.tick_counter,
            cfg.ms_per_tick(),
            irq,
            slot
        );
        Ok(slot)
    }
}

impl<P: RegisterPort + Sync + 'static, M: RegisterPort> Board<P, M> {
    /// Routes the console macros and the kernel log to the console UART.
    pub fn attach_console(&'static self, cfg: &BoardConfig) -> FirmwareResult<()> {
        let console = self.console(cfg)?;
        console_attach(console);
        klog_attach_console(console);
        Ok(())
    }
}

/// Brings the board from reset to a state where the handshake can run.
///
/// On success IRQs are unmasked. On failure they stay masked and the caller
/// is expected to halt.
pub fn bring_up<P, M, C>(
    board: &'static Board<P, M>,
    cfg: &BoardConfig,
    uart_isr: &'static dyn IrqHandler,
    timer_isr: &'static dyn IrqHandler,
    crypto: &C,
) -> FirmwareResult<()>
where
    P: RegisterPort + Sync + 'static,
    M: RegisterPort,
    C: CryptoService + ?Sized,
{
    cfg.validate()?;
    if !board.started.init_once() {
        return Err(FirmwareError::InvalidArgument);
    }
    cpu::disable_interrupts();

    board.init_devices();
    board.attach_console(cfg)?;

    board.setup_protocol_uart(cfg, uart_isr)?;
    board.setup_tick_timer(cfg, timer_isr)?;

    run_integrity_gate(&board.markers, &board.verifier, crypto)?;

    cpu::enable_interrupts();
    klog_info!("BOOT: bring-up complete, interrupts enabled");
    Ok(())
}
