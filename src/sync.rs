//! # Synchronization Primitives
//!
//! Interrupt-safe shared state for the scheduler.
//! State touched both by the tick handler and by normal-context control calls
//! lives in a [`Shared`] cell and is only reachable inside a critical section,
//! so the tick handler never observes a half-updated slot.
//!
//! On target the critical section masks interrupts (`cortex-m`'s single-core
//! implementation); host tests use the `critical-section/std` implementation.

use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};

/// Execute a closure within a critical section (interrupts disabled).
///
/// Keep critical sections as short as possible to minimize interrupt latency.
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}

/// A value shared between interrupt and normal context.
pub struct Shared<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> Shared<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access to the value.
    ///
    /// # Panics
    /// If called re-entrantly from inside another `lock` on the same value.
    pub fn lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }
}
