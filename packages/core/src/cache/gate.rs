//! First-reader/last-reader admission control
//!
//! `Gate` lets any number of readers share the protected value while a single
//! writer holds it exclusively. Only the first reader to arrive takes the writer
//! lock, on behalf of the whole reader group, and only the last reader to leave
//! gives it back. Writers take the same lock for the full duration of their
//! mutation, so they exclude each other and the reader group.
//!
//! The writer lock is a binary semaphore rather than a `Mutex` guard because it
//! is released by whichever reader leaves last, not necessarily the thread that
//! acquired it.

use std::ops::{Deref, DerefMut};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Binary semaphore that may be released by a thread other than its holder
#[derive(Debug, Default)]
struct WriterLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl WriterLock {
    fn acquire(&self) {
        let mut held = lock(&self.held);
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *held = true;
    }

    fn release(&self) {
        *lock(&self.held) = false;
        self.released.notify_one();
    }
}

/// Reader/writer admission over a shared value
#[derive(Debug, Default)]
pub struct Gate<T> {
    active_readers: Mutex<usize>,
    writer: WriterLock,
    // Never contended: the protocol above already keeps writers apart from
    // readers. The lock only hands out the matching `&T` / `&mut T`.
    value: RwLock<T>,
}

impl<T> Gate<T> {
    pub fn new(value: T) -> Self {
        Self {
            active_readers: Mutex::new(0),
            writer: WriterLock::default(),
            value: RwLock::new(value),
        }
    }

    /// Register as a reader; blocks only while a writer is mid-mutation.
    pub fn read(&self) -> ReadGuard<'_, T> {
        {
            let mut readers = lock(&self.active_readers);
            *readers += 1;
            if *readers == 1 {
                // First in: hold the writer lock for the reader group. Later
                // readers queue on `active_readers` until this returns.
                self.writer.acquire();
            }
        }

        ReadGuard {
            gate: self,
            value: Some(self.value.read().unwrap_or_else(PoisonError::into_inner)),
        }
    }

    /// Take exclusive access; waits for the reader group to drain.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.writer.acquire();
        WriteGuard {
            gate: self,
            value: Some(self.value.write().unwrap_or_else(PoisonError::into_inner)),
        }
    }

    /// Number of readers currently admitted
    pub fn active_readers(&self) -> usize {
        *lock(&self.active_readers)
    }

    fn leave_read(&self) {
        let mut readers = lock(&self.active_readers);
        *readers -= 1;
        if *readers == 0 {
            // Last out
            self.writer.release();
        }
    }
}

/// Shared access held by one member of the reader group
pub struct ReadGuard<'a, T> {
    gate: &'a Gate<T>,
    value: Option<RwLockReadGuard<'a, T>>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.value {
            Some(ref value) => value,
            None => unreachable!("read guard used after release"),
        }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.value.take();
        self.gate.leave_read();
    }
}

/// Exclusive access held by the single active writer
pub struct WriteGuard<'a, T> {
    gate: &'a Gate<T>,
    value: Option<RwLockWriteGuard<'a, T>>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.value {
            Some(ref value) => value,
            None => unreachable!("write guard used after release"),
        }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self.value {
            Some(ref mut value) => value,
            None => unreachable!("write guard used after release"),
        }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.value.take();
        self.gate.writer.release();
    }
}
