//! PL190 vectored interrupt controller and the priority-sorted vector table.
//!
//! The sixteen hardware vector slots are mirrored by `Vic::slots`. Slots are
//! kept in descending priority order, equal priorities keep registration
//! order, and empty slots sit at the end. Every mutation rewrites the vector
//! address and control registers of each slot it touches, so the controller
//! always arbitrates over exactly the table held in memory.
//!
//! Table mutations must happen with interrupts masked. Wrapping the `Vic` in
//! an [`IrqMutex`] (as boot does) guarantees that.

use hmacgate_abi::board::NR_IRQ_LINES;
use hmacgate_abi::{Component, FirmwareError, FirmwareResult, IrqHandler, RegisterPort};
use hmacgate_lib::{klog_debug, klog_info, klog_trace, IrqMutex};

use crate::hw::vic_defs::*;
use crate::markers::MarkerBank;

/// Handler for empty slots and unmatched vectors.
struct NoopHandler;

impl IrqHandler for NoopHandler {
    fn handle(&self) {}
}

#[derive(Clone, Copy)]
struct VectorSlot {
    line: Option<u32>,
    handler: &'static dyn IrqHandler,
    priority: Option<u8>,
}

const EMPTY_SLOT: VectorSlot = VectorSlot {
    line: None,
    handler: &NoopHandler,
    priority: None,
};

/// Public view of one occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    pub line: u32,
    pub priority: u8,
}

/// Whether a line raises IRQ or FIQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Irq,
    Fiq,
}

pub struct Vic<P: RegisterPort> {
    regs: P,
    slots: [VectorSlot; NR_VECTORS],
}

/// Accepts every line the controller routes, 0 through 31 inclusive. Line 31
/// is a valid VIC source, so the upper bound is exclusive of 32, not 31.
#[inline]
fn check_line(line: u32) -> FirmwareResult<u32> {
    if line < NR_IRQ_LINES {
        Ok(line)
    } else {
        Err(FirmwareError::InvalidArgument)
    }
}

impl<P: RegisterPort> Vic<P> {
    pub const fn new(regs: P) -> Self {
        Self {
            regs,
            slots: [EMPTY_SLOT; NR_VECTORS],
        }
    }

    /// Puts the controller in a known state: every line routed to IRQ and
    /// disabled, soft interrupts cleared, default vector programmed and the
    /// vector table emptied.
    pub fn init<M: RegisterPort>(&mut self, markers: &MarkerBank<M>) {
        self.regs.write(VICINTSELECT, 0);
        self.regs.write(VICINTENCLEAR, u32::MAX);
        self.regs.write(VICSOFTINTCLEAR, u32::MAX);
        self.regs.write(VICDEFVECTADDR, VECTOR_TAG_DEFAULT);
        self.unregister_all();

        markers.stamp(Component::InterruptController);
        klog_info!("VIC: initialized with {} vector slots", NR_VECTORS);
    }

    pub fn regs(&self) -> &P {
        &self.regs
    }

    // =========================================================================
    // Line control
    // =========================================================================

    pub fn enable_line(&self, line: u32) -> FirmwareResult<()> {
        let line = check_line(line)?;
        self.regs.set_bits(VICINTENABLE, 1 << line);
        Ok(())
    }

    pub fn disable_line(&self, line: u32) -> FirmwareResult<()> {
        let line = check_line(line)?;
        self.regs.write(VICINTENCLEAR, 1 << line);
        Ok(())
    }

    pub fn disable_all(&self) {
        self.regs.write(VICINTENCLEAR, u32::MAX);
    }

    pub fn is_line_enabled(&self, line: u32) -> FirmwareResult<bool> {
        let line = check_line(line)?;
        Ok(self.regs.bits_set(VICINTENABLE, 1 << line))
    }

    pub fn set_line_class(&self, line: u32, class: LineClass) -> FirmwareResult<()> {
        let line = check_line(line)?;
        match class {
            LineClass::Irq => self.regs.clear_bits(VICINTSELECT, 1 << line),
            LineClass::Fiq => self.regs.set_bits(VICINTSELECT, 1 << line),
        }
        Ok(())
    }

    pub fn line_class(&self, line: u32) -> FirmwareResult<LineClass> {
        let line = check_line(line)?;
        if self.regs.bits_set(VICINTSELECT, 1 << line) {
            Ok(LineClass::Fiq)
        } else {
            Ok(LineClass::Irq)
        }
    }

    // =========================================================================
    // Vector table
    // =========================================================================

    /// Rewrites slot `index`'s vector registers from memory.
    fn program_slot(&self, index: usize) {
        let slot = &self.slots[index];
        match slot.line {
            Some(line) => {
                self.regs
                    .write(vect_cntl_reg(index), (line & VECTCNTL_SOURCE_MASK) | VECTCNTL_ENABLE);
                self.regs.write(vect_addr_reg(index), vector_tag(index));
            }
            None => {
                self.regs.write(vect_cntl_reg(index), 0);
                self.regs.write(vect_addr_reg(index), VECTOR_TAG_DUMMY);
            }
        }
    }

    /// Installs `handler` for `line` and returns the slot it landed in.
    ///
    /// Priorities above [`MAX_PRIORITY`] are clamped. Registering a line that
    /// is already present moves it instead of duplicating it, and it then
    /// ranks after any existing entries of the same priority.
    pub fn register(
        &mut self,
        line: u32,
        handler: Option<&'static dyn IrqHandler>,
        priority: u8,
    ) -> FirmwareResult<usize> {
        let line = check_line(line)?;
        let handler = handler.ok_or(FirmwareError::InvalidArgument)?;
        let priority = priority.min(MAX_PRIORITY);

        let insert_pos = self
            .slots
            .iter()
            .position(|s| s.line.is_none() || s.line == Some(line))
            .ok_or(FirmwareError::ResourceExhausted)?;

        let mut target_pos = self
            .slots
            .iter()
            .position(|s| s.priority.is_none_or(|p| p < priority))
            .unwrap_or(NR_VECTORS);

        if insert_pos > target_pos {
            // Make room at target_pos by pushing the block down.
            for i in (target_pos + 1..=insert_pos).rev() {
                self.slots[i] = self.slots[i - 1];
                self.program_slot(i);
            }
        } else if target_pos > insert_pos {
            // The moved line leaves a hole; pull the block up over it.
            target_pos -= 1;
            for i in insert_pos..target_pos {
                self.slots[i] = self.slots[i + 1];
                self.program_slot(i);
            }
        }

        self.slots[target_pos] = VectorSlot {
            line: Some(line),
            handler,
            priority: Some(priority),
        };
        self.program_slot(target_pos);

        klog_debug!(
            "VIC: line {} registered in slot {} (priority {})",
            line,
            target_pos,
            priority
        );
        Ok(target_pos)
    }

    /// Removes `line` from the table. Unknown or out-of-range lines are ignored.
    pub fn unregister(&mut self, line: u32) {
        if check_line(line).is_err() {
            return;
        }
        let Some(pos) = self.slots.iter().position(|s| s.line == Some(line)) else {
            return;
        };

        for i in pos..NR_VECTORS - 1 {
            self.slots[i] = self.slots[i + 1];
            self.program_slot(i);
        }
        self.slots[NR_VECTORS - 1] = EMPTY_SLOT;
        self.program_slot(NR_VECTORS - 1);

        klog_debug!("VIC: line {} unregistered from slot {}", line, pos);
    }

    pub fn unregister_all(&mut self) {
        for i in 0..NR_VECTORS {
            self.slots[i] = EMPTY_SLOT;
            self.program_slot(i);
        }
    }

    pub fn slot(&self, index: usize) -> Option<SlotInfo> {
        let slot = self.slots.get(index)?;
        match (slot.line, slot.priority) {
            (Some(line), Some(priority)) => Some(SlotInfo { line, priority }),
            _ => None,
        }
    }

    /// Slot currently holding `line`.
    pub fn slot_of(&self, line: u32) -> Option<usize> {
        self.slots.iter().position(|s| s.line == Some(line))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.line.is_some()).count()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Reads the controller's pick and maps it back to a handler.
    ///
    /// Reading VICVECTADDR marks the interrupt as in service; it must be
    /// followed by [`Vic::acknowledge`].
    pub fn resolve(&self) -> &'static dyn IrqHandler {
        let tag = self.regs.read(VICVECTADDR);
        match slot_from_tag(tag).map(|i| &self.slots[i]) {
            Some(slot) if slot.line.is_some() => slot.handler,
            _ => {
                klog_trace!("VIC: unvectored interrupt (tag {:#010x})", tag);
                &NoopHandler
            }
        }
    }

    /// Signals end of service to the controller.
    pub fn acknowledge(&self) {
        self.regs.write(VICVECTADDR, VECTADDR_ACK);
    }
}

/// IRQ exception body: run the handler the controller selected, then
/// acknowledge it.
///
/// The lock is not held while the handler runs, so handlers may take other
/// `IrqMutex`es.
pub fn dispatch<P: RegisterPort>(vic: &IrqMutex<Vic<P>>) {
    let handler = vic.lock().resolve();
    handler.handle();
    vic.lock().acknowledge();
}
