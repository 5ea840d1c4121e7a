//! ARM PL011 UART definitions.

use bitflags::bitflags;

// ============================================================================
// Register Offsets
// ============================================================================

/// Data register
pub const UARTDR: usize = 0x00;
/// Receive status / error clear
pub const UARTRSR: usize = 0x04;
/// Flag register
pub const UARTFR: usize = 0x18;
/// IrDA low-power counter
pub const UARTILPR: usize = 0x20;
/// Integer baud rate divisor
pub const UARTIBRD: usize = 0x24;
/// Fractional baud rate divisor
pub const UARTFBRD: usize = 0x28;
/// Line control
pub const UARTLCR_H: usize = 0x2C;
/// Control
pub const UARTCR: usize = 0x30;
/// FIFO level select
pub const UARTIFLS: usize = 0x34;
/// Interrupt mask set/clear
pub const UARTIMSC: usize = 0x38;
/// Raw interrupt status
pub const UARTRIS: usize = 0x3C;
/// Masked interrupt status
pub const UARTMIS: usize = 0x40;
/// Interrupt clear
pub const UARTICR: usize = 0x44;
/// DMA control
pub const UARTDMACR: usize = 0x48;

pub const UART_WINDOW: usize = 0x1000;

/// Received data bits of UARTDR.
pub const DR_DATA_MASK: u32 = 0xFF;

bitflags! {
    /// UARTCR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u32 {
        const UARTEN = 1 << 0;
        const SIREN = 1 << 1;
        const SIRLP = 1 << 2;
        const LBE = 1 << 7;
        const TXE = 1 << 8;
        const RXE = 1 << 9;
        const DTR = 1 << 10;
        const RTS = 1 << 11;
        const OUT1 = 1 << 12;
        const OUT2 = 1 << 13;
        const RTSEN = 1 << 14;
        const CTSEN = 1 << 15;
    }
}

bitflags! {
    /// UARTFR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FlagBits: u32 {
        const CTS = 1 << 0;
        const DSR = 1 << 1;
        const DCD = 1 << 2;
        const BUSY = 1 << 3;
        const RXFE = 1 << 4;
        const TXFF = 1 << 5;
        const RXFF = 1 << 6;
        const TXFE = 1 << 7;
        const RI = 1 << 8;
    }
}

bitflags! {
    /// UARTIMSC / UARTRIS / UARTMIS / UARTICR bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptBits: u32 {
        const RIM = 1 << 0;
        const CTSM = 1 << 1;
        const DCDM = 1 << 2;
        const DSRM = 1 << 3;
        const RX = 1 << 4;
        const TX = 1 << 5;
        const RT = 1 << 6;
        const FE = 1 << 7;
        const PE = 1 << 8;
        const BE = 1 << 9;
        const OE = 1 << 10;
    }
}

/// UARTLCR_H FIFO enable
pub const LCR_H_FEN: u32 = 1 << 4;
