//! ISR-safe registry wrapper using critical sections.
//!
//! Session state is shared between application context (transfer initiators,
//! [`Session::pop`](crate::Session::pop)) and the interrupt handler. The bare
//! types take no locks and so never perturb interrupt timing; this module
//! provides the opt-in hardening: every access through [`SharedRegistry`]
//! runs inside `critical_section::with()`, so the consumer can never observe
//! a half-updated ring.
//!
//! Only available with the `critical-section` feature. The critical-section
//! implementation itself comes from the HAL or RTOS crate in use.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::error::Result;
use crate::driver::registry::{PeripheralId, SessionRegistry};
use crate::driver::session::{Session, SessionEvents};
use crate::hal::I2cRegisters;

// =============================================================================
// Critical Section Cell
// =============================================================================

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&mut T) -> U,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<U, F>(&self, f: F) -> Option<U>
    where
        F: FnOnce(&mut T) -> U,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }
}

// SAFETY: CriticalSectionCell uses critical sections to protect all access.
unsafe impl<T> Sync for CriticalSectionCell<T> {}

// =============================================================================
// Shared Registry
// =============================================================================

/// ISR-safe session registry for static allocation.
///
/// # Example
///
/// ```ignore
/// static I2C: SharedRegistry<BoardRegs, Handler, 64, 32> = SharedRegistry::new();
///
/// // Interrupt handler
/// fn i2c1_ev_irq() {
///     let _ = I2C.on_interrupt(PeripheralId::I2c1);
/// }
///
/// // Application context
/// while let Some(byte) = I2C.pop(PeripheralId::I2c1) {
///     // ...
/// }
/// ```
pub struct SharedRegistry<R, E, const RING: usize, const XFER: usize>
where
    R: I2cRegisters,
    E: SessionEvents,
{
    inner: CriticalSectionCell<SessionRegistry<R, E, RING, XFER>>,
}

impl<R, E, const RING: usize, const XFER: usize> SharedRegistry<R, E, RING, XFER>
where
    R: I2cRegisters,
    E: SessionEvents,
{
    /// Create an empty shared registry (const, suitable for statics).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(SessionRegistry::new()),
        }
    }

    /// Execute a closure with exclusive access to the registry.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<U, F>(&self, f: F) -> U
    where
        F: FnOnce(&mut SessionRegistry<R, E, RING, XFER>) -> U,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<U, F>(&self, f: F) -> Option<U>
    where
        F: FnOnce(&mut SessionRegistry<R, E, RING, XFER>) -> U,
    {
        self.inner.try_with(f)
    }

    /// Service one hardware event for `id`.
    ///
    /// Intended to be the entire body of the instance's interrupt handler.
    /// Returns `None` when no session is live for `id`.
    #[inline]
    pub fn on_interrupt(&self, id: PeripheralId) -> Option<Result<()>> {
        self.with(|registry| registry.get_mut(id).map(Session::on_interrupt))
    }

    /// Pop the oldest slave-received byte for `id` under the critical
    /// section, `None` when drained or no session is live.
    #[inline]
    pub fn pop(&self, id: PeripheralId) -> Option<u8> {
        self.with(|registry| registry.get_mut(id).and_then(Session::pop))
    }
}

impl<R, E, const RING: usize, const XFER: usize> Default for SharedRegistry<R, E, RING, XFER>
where
    R: I2cRegisters,
    E: SessionEvents,
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
