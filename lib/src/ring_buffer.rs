//! Fixed-capacity circular queue.
//!
//! Storage is an inline `[T; N]`, so the owner decides where it lives (a
//! static for the UART receive backlog). The queue tracks `head` (next write),
//! `tail` (oldest element) and an explicit `full` flag, which lets all `N`
//! slots hold data.
//!
//! In the firmware the receive ISR is the only producer and the main loop the
//! only consumer; the two are serialized by wrapping the queue in an
//! [`IrqMutex`](crate::sync::IrqMutex).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// `try_push` on a full queue
    Full,
    /// Removal or peek on an empty queue
    Empty,
    /// `peek_into` asked for more elements than are queued
    Underflow,
}

pub struct RingBuffer<T: Copy, const N: usize> {
    buf: [T; N],
    head: usize,
    tail: usize,
    full: bool,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Empty queue with every slot pre-filled with `fill`.
    pub const fn new_with(fill: T) -> Self {
        Self {
            buf: [fill; N],
            head: 0,
            tail: 0,
            full: false,
        }
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        if index + 1 == N { 0 } else { index + 1 }
    }

    /// Drops every queued element. Storage contents are left as they are.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.full = false;
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        if self.full {
            N
        } else if self.head >= self.tail {
            self.head - self.tail
        } else {
            N + self.head - self.tail
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.head == self.tail
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Appends `value`, discarding the oldest element when the queue is full.
    pub fn push_overwrite(&mut self, value: T) {
        if N == 0 {
            return;
        }
        self.buf[self.head] = value;
        if self.full {
            self.tail = Self::advance(self.tail);
        }
        self.head = Self::advance(self.head);
        self.full = self.head == self.tail;
    }

    /// Appends `value` unless the queue is full, in which case nothing changes.
    pub fn try_push(&mut self, value: T) -> Result<(), QueueError> {
        if self.full || N == 0 {
            return Err(QueueError::Full);
        }
        self.push_overwrite(value);
        Ok(())
    }

    /// Removes and returns the oldest element.
    pub fn try_pop(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let value = self.buf[self.tail];
        self.full = false;
        self.tail = Self::advance(self.tail);
        Ok(value)
    }

    /// Copies the `out.len()` oldest elements into `out` without removing them.
    pub fn peek_into(&self, out: &mut [T]) -> Result<(), QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        if out.len() > self.len() {
            return Err(QueueError::Underflow);
        }
        let mut index = self.tail;
        for slot in out.iter_mut() {
            *slot = self.buf[index];
            index = Self::advance(index);
        }
        Ok(())
    }
}

impl<T: Copy + Default, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new_with(T::default())
    }
}
