//! Hardware collaborator traits - the seams between drivers, core logic and boot.
//!
//! These traits live in `abi` so that:
//! - `drivers` implement them over memory-mapped registers
//! - `core` consumes them without knowing which board it runs on
//! - tests substitute simulated register files and scripted devices

/// 32-bit register access over a fixed address window.
///
/// Offsets are byte offsets from the start of the window and must be
/// word aligned.
pub trait RegisterPort {
    fn read(&self, offset: usize) -> u32;
    fn write(&self, offset: usize, value: u32);

    #[inline]
    fn set_bits(&self, offset: usize, mask: u32) {
        let value = self.read(offset);
        self.write(offset, value | mask);
    }

    #[inline]
    fn clear_bits(&self, offset: usize, mask: u32) {
        let value = self.read(offset);
        self.write(offset, value & !mask);
    }

    #[inline]
    fn bits_set(&self, offset: usize, mask: u32) -> bool {
        self.read(offset) & mask == mask
    }
}

impl<P: RegisterPort + ?Sized> RegisterPort for &P {
    #[inline]
    fn read(&self, offset: usize) -> u32 {
        (**self).read(offset)
    }

    #[inline]
    fn write(&self, offset: usize, value: u32) {
        (**self).write(offset, value)
    }
}

/// Byte-level serial line.
pub trait SerialLine {
    /// Blocks until the transmitter accepts the byte.
    fn send_byte(&self, byte: u8);

    /// Returns the next received byte, if any.
    fn try_receive(&self) -> Option<u8>;
}

impl<S: SerialLine + ?Sized> SerialLine for &S {
    #[inline]
    fn send_byte(&self, byte: u8) {
        (**self).send_byte(byte)
    }

    #[inline]
    fn try_receive(&self) -> Option<u8> {
        (**self).try_receive()
    }
}

/// Monotonic tick clock, advanced by the periodic timer interrupt.
pub trait TickSource {
    fn ticks(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    #[inline]
    fn ticks(&self) -> u32 {
        (**self).ticks()
    }
}

/// Interrupt service routine stored in a vector slot.
///
/// Handlers run in interrupt context, take no arguments and return nothing.
pub trait IrqHandler: Sync {
    fn handle(&self);
}

impl<F: Fn() + Sync> IrqHandler for F {
    #[inline]
    fn handle(&self) {
        self()
    }
}
