//! Polled blocking adapter implementing `embedded_hal::i2c::I2c`.
//!
//! The session driver is interrupt-first, but plenty of code (device
//! drivers, init sequences) speaks the blocking `embedded-hal` traits. This
//! adapter bridges the two without requiring a live interrupt vector: it
//! starts a master transfer on the wrapped session and then pumps
//! [`Session::on_interrupt`] itself until the session returns to idle,
//! consuming the hardware flags in the same priority order the real
//! interrupt handler would.
//!
//! Limitations: each operation is its own start..stop transaction (no
//! repeated start between a write and the following read), and zero-length
//! operations are silently skipped, matching the session's contract.

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::driver::error::{BusError, Error, Result};
use crate::driver::session::{Session, SessionEvents};
use crate::hal::I2cRegisters;

/// Iteration cap for one polled transfer.
///
/// Each iteration services at most one hardware event, so this bounds whole
/// transfers rather than single flags.
pub const POLL_SPIN_LIMIT: u32 = 1_000_000;

/// Blocking facade over a [`Session`].
///
/// Borrows the session for the adapter's lifetime; interrupt-driven use can
/// resume once the adapter is dropped.
///
/// # Example
///
/// ```ignore
/// let mut bus = BlockingI2c::new(&mut session);
/// let mut id = [0u8; 2];
/// bus.write_read(0x68, &[WHO_AM_I], &mut id)?;
/// ```
pub struct BlockingI2c<'a, R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
{
    session: &'a mut Session<R, E, RING, XFER>,
}

impl<'a, R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
    BlockingI2c<'a, R, E, RING, XFER>
{
    /// Wrap a session for blocking use.
    pub fn new(session: &'a mut Session<R, E, RING, XFER>) -> Self {
        Self { session }
    }

    /// Service events until the session returns to idle.
    fn pump_until_idle(&mut self) -> Result<()> {
        for _ in 0..POLL_SPIN_LIMIT {
            if self.session.is_idle() {
                return Ok(());
            }
            self.session.on_interrupt()?;
        }
        Err(BusError::StuckBus.into())
    }
}

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize> ErrorType
    for BlockingI2c<'_, R, E, RING, XFER>
{
    type Error = Error;
}

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
    I2c<SevenBitAddress> for BlockingI2c<'_, R, E, RING, XFER>
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<()> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.session.master_transmit(address, bytes)?;
                    self.pump_until_idle()?;
                    if self.session.transmitted() < bytes.len() {
                        return Err(BusError::NoAcknowledge.into());
                    }
                }
                Operation::Read(buffer) => {
                    self.session.master_receive(address, buffer.len())?;
                    self.pump_until_idle()?;
                    let received = self.session.received();
                    if received.len() < buffer.len() {
                        return Err(BusError::NoAcknowledge.into());
                    }
                    buffer.copy_from_slice(received);
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
