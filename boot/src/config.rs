//! Build-time board configuration.

use hmacgate_abi::board::{
    COUNTERS_PER_TIMER, CPU_CLOCK_HZ, TICK_RATE_HZ, TICKS_PER_HUND, TIMER_BASES, TIMER_IRQS,
    UART_BASES, UART_IRQS,
};
use hmacgate_abi::{FirmwareError, FirmwareResult, HANDSHAKE_TIMEOUT_MS};
use hmacgate_lib::KlogLevel;

/// Capacity of the protocol UART receive backlog.
pub const RX_QUEUE_CAPACITY: usize = 1024;

/// Key the host must hold to answer the nonce challenge.
pub const HMAC_SECRET: &str = match option_env!("HMACGATE_SECRET") {
    Some(secret) => secret,
    None => "the last one...",
};

/// Text disclosed after a successful handshake.
pub const PAYLOAD: &str = match option_env!("HMACGATE_PAYLOAD") {
    Some(payload) => payload,
    None => "hmacgate{vectored-and-verified}",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    /// UART used for banner, progress report and logs.
    pub console_uart: usize,
    /// UART carrying the handshake.
    pub protocol_uart: usize,
    pub tick_timer: usize,
    pub tick_counter: usize,
    pub cpu_clock_hz: u32,
    pub tick_rate_hz: u32,
    pub ticks_per_hund: u32,
    pub handshake_timeout_ms: u32,
    pub uart_priority: u8,
    pub timer_priority: u8,
    pub log_level: KlogLevel,
}

impl BoardConfig {
    /// SP804 reload value for one interrupt per tick.
    pub const fn timer_reload(&self) -> u32 {
        (self.cpu_clock_hz / self.tick_rate_hz) * self.ticks_per_hund
    }

    pub const fn ms_per_tick(&self) -> u32 {
        (1000 / self.tick_rate_hz) * self.ticks_per_hund
    }

    pub fn protocol_irq(&self) -> FirmwareResult<u32> {
        UART_IRQS
            .get(self.protocol_uart)
            .copied()
            .ok_or(FirmwareError::InvalidArgument)
    }

    pub fn timer_irq(&self) -> FirmwareResult<u32> {
        TIMER_IRQS
            .get(self.tick_timer)
            .copied()
            .ok_or(FirmwareError::InvalidArgument)
    }

    /// Checks every index against the board map.
    pub fn validate(&self) -> FirmwareResult<()> {
        let uarts_ok = self.console_uart < UART_BASES.len() && self.protocol_uart < UART_BASES.len();
        let timer_ok = self.tick_timer < TIMER_BASES.len() && self.tick_counter < COUNTERS_PER_TIMER;
        if !uarts_ok || !timer_ok || self.console_uart == self.protocol_uart {
            return Err(FirmwareError::InvalidArgument);
        }
        if self.tick_rate_hz == 0 || self.ms_per_tick() == 0 || self.timer_reload() == 0 {
            return Err(FirmwareError::InvalidArgument);
        }
        Ok(())
    }
}

const fn default_log_level() -> KlogLevel {
    if cfg!(feature = "log-debug") {
        KlogLevel::Debug
    } else {
        KlogLevel::Info
    }
}

pub const BOARD_CONFIG: BoardConfig = BoardConfig {
    console_uart: 0,
    protocol_uart: 1,
    tick_timer: 0,
    tick_counter: 0,
    cpu_clock_hz: CPU_CLOCK_HZ,
    tick_rate_hz: TICK_RATE_HZ,
    ticks_per_hund: TICKS_PER_HUND,
    handshake_timeout_ms: HANDSHAKE_TIMEOUT_MS,
    uart_priority: 50,
    timer_priority: 127,
    log_level: default_log_level(),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_configuration() {
        assert_eq!(BOARD_CONFIG.validate(), Ok(()));
        assert_eq!(BOARD_CONFIG.timer_reload(), 100_000);
        assert_eq!(BOARD_CONFIG.ms_per_tick(), 100);
        assert_eq!(BOARD_CONFIG.protocol_irq(), Ok(13));
        assert_eq!(BOARD_CONFIG.timer_irq(), Ok(4));
        assert!(!HMAC_SECRET.is_empty());
        assert!(!PAYLOAD.is_empty());
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let bad_uart = BoardConfig {
            protocol_uart: 3,
            ..BOARD_CONFIG
        };
        assert_eq!(bad_uart.validate(), Err(FirmwareError::InvalidArgument));
        assert_eq!(bad_uart.protocol_irq(), Err(FirmwareError::InvalidArgument));

        let shared = BoardConfig {
            protocol_uart: 0,
            ..BOARD_CONFIG
        };
        assert_eq!(shared.validate(), Err(FirmwareError::InvalidArgument));

        let bad_counter = BoardConfig {
            tick_counter: 2,
            ..BOARD_CONFIG
        };
        assert_eq!(bad_counter.validate(), Err(FirmwareError::InvalidArgument));
    }
}
