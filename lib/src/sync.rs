use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use crate::cpu;

/// Mutex that masks IRQ and FIQ while held.
///
/// Data shared between an interrupt handler and the main loop lives behind
/// one of these. Interrupt handlers do not nest on this board, so taking the
/// lock from a handler never spins; on the main loop the mask keeps the
/// handler out for the duration of the critical section.
pub struct IrqMutex<T> {
    inner: spin::Mutex<T>,
}

pub struct IrqMutexGuard<'a, T> {
    inner: ManuallyDrop<spin::MutexGuard<'a, T>>,
    saved_cpsr: u32,
}

impl<T> IrqMutex<T> {
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            inner: spin::Mutex::new(data),
        }
    }

    #[inline]
    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let saved_cpsr = cpu::save_and_disable_interrupts();
        let inner = ManuallyDrop::new(self.inner.lock());
        IrqMutexGuard { inner, saved_cpsr }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<IrqMutexGuard<'_, T>> {
        let saved_cpsr = cpu::save_and_disable_interrupts();
        match self.inner.try_lock() {
            Some(inner) => Some(IrqMutexGuard {
                inner: ManuallyDrop::new(inner),
                saved_cpsr,
            }),
            None => {
                cpu::restore_interrupts(saved_cpsr);
                None
            }
        }
    }

    /// Runs `f` with exclusive access.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

impl<T> Deref for IrqMutexGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for IrqMutexGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T> Drop for IrqMutexGuard<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // Release before unmasking, or a handler could spin on a held lock.
        // SAFETY: `inner` is dropped exactly once, here, and never used again.
        unsafe { ManuallyDrop::drop(&mut self.inner) };
        cpu::restore_interrupts(self.saved_cpsr);
    }
}
