//! Session registry: physical instance identity and slot management.
//!
//! One process-wide [`SessionRegistry`] replaces per-peripheral global
//! pointers: it owns an `Option<Session>` slot per physical I2C instance and
//! has defined initialization (`const fn new`) and teardown (`destroy`). The
//! set of valid instances is decided by the compiled device family feature,
//! mirroring how the supported parts differ in hardware.

use crate::driver::error::{ConfigError, Result};
use crate::driver::session::{Session, SessionEvents};
use crate::hal::I2cRegisters;

/// Number of registry slots; the largest supported family has three
/// I2C instances.
pub const MAX_SESSIONS: usize = 3;

// =============================================================================
// Peripheral Identity
// =============================================================================

/// Identity of a physical I2C instance.
///
/// Which identifiers are valid depends on the compiled device family:
///
/// | Family | Instances |
/// |---|---|
/// | `stm32f0` | I2C1 |
/// | `stm32f1` | I2C1, I2C2 |
/// | `stm32f4` | I2C1, I2C2, I2C3 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralId {
    /// I2C1, present on every supported family
    I2c1,
    /// I2C2, present on F1 and F4 parts
    I2c2,
    /// I2C3, present on F4 parts only
    I2c3,
}

impl PeripheralId {
    /// All identifiers, valid or not for the compiled family.
    pub const ALL: [PeripheralId; MAX_SESSIONS] =
        [PeripheralId::I2c1, PeripheralId::I2c2, PeripheralId::I2c3];

    /// Registry slot index for this instance.
    #[inline(always)]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PeripheralId::I2c1 => 0,
            PeripheralId::I2c2 => 1,
            PeripheralId::I2c3 => 2,
        }
    }

    /// Check whether this instance exists on the compiled device family.
    #[must_use]
    pub const fn is_available(self) -> bool {
        match self {
            PeripheralId::I2c1 => true,
            PeripheralId::I2c2 => cfg!(any(feature = "stm32f1", feature = "stm32f4")),
            PeripheralId::I2c3 => cfg!(feature = "stm32f4"),
        }
    }
}

// =============================================================================
// Session Registry
// =============================================================================

/// Maps physical I2C instances to their sessions.
///
/// The registry owns nothing it did not allocate: it starts empty, installs
/// sessions lazily on [`create`](SessionRegistry::create) and releases them
/// on [`destroy`](SessionRegistry::destroy). Typically held in a `static`,
/// either directly (single-context use) or wrapped in
/// [`crate::sync::SharedRegistry`] when interrupt and application context
/// both touch it.
pub struct SessionRegistry<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
{
    slots: [Option<Session<R, E, RING, XFER>>; MAX_SESSIONS],
}

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
    SessionRegistry<R, E, RING, XFER>
{
    /// Create an empty registry.
    ///
    /// This is a const function suitable for static initialization.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; MAX_SESSIONS],
        }
    }

    /// Create a session for `id`, binding it to the given register
    /// capability and callbacks.
    ///
    /// The new session starts idle with clock stretching enabled, ACK armed
    /// and a freshly zeroed ring (see [`Session::new`]).
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidPeripheral`] - `id` does not exist on the
    ///   compiled device family
    /// * [`ConfigError::AlreadyInUse`] - a session for `id` is already live
    pub fn create(
        &mut self,
        id: PeripheralId,
        regs: R,
        events: E,
    ) -> Result<&mut Session<R, E, RING, XFER>> {
        if !id.is_available() {
            return Err(ConfigError::InvalidPeripheral.into());
        }
        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            return Err(ConfigError::AlreadyInUse.into());
        }
        Ok(slot.insert(Session::new(regs, events)))
    }

    /// Tear down the session for `id`.
    ///
    /// Disables the peripheral and frees the slot for a future
    /// [`create`](SessionRegistry::create).
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidPeripheral`] - `id` does not exist on the
    ///   compiled device family
    /// * [`ConfigError::NotCreated`] - no session is live for `id`
    pub fn destroy(&mut self, id: PeripheralId) -> Result<()> {
        if !id.is_available() {
            return Err(ConfigError::InvalidPeripheral.into());
        }
        match self.slots[id.index()].take() {
            Some(mut session) => {
                session.shutdown();
                Ok(())
            }
            None => Err(ConfigError::NotCreated.into()),
        }
    }

    /// Get the session for `id`, if one is live.
    #[inline]
    pub fn get(&self, id: PeripheralId) -> Option<&Session<R, E, RING, XFER>> {
        self.slots[id.index()].as_ref()
    }

    /// Get the session for `id` mutably, if one is live.
    #[inline]
    pub fn get_mut(&mut self, id: PeripheralId) -> Option<&mut Session<R, E, RING, XFER>> {
        self.slots[id.index()].as_mut()
    }

    /// Check whether a session is live for `id`.
    #[inline]
    pub fn is_active(&self, id: PeripheralId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Number of live sessions.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize> Default
    for SessionRegistry<R, E, RING, XFER>
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
