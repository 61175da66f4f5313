//! Per-peripheral session state and transfer initiators.
//!
//! A [`Session`] binds one physical I2C instance to its transfer state: the
//! current role, the slave-receive ring, the master transmit/receive buffers
//! and counters, and the application's completion callbacks. Transfers are
//! started from application context here; every subsequent byte is moved by
//! the interrupt engine in [`super::engine`].

use crate::driver::error::{Result, TransferError};
use crate::hal::I2cRegisters;
use crate::ring::ByteRing;

// =============================================================================
// Completion Callbacks
// =============================================================================

/// Completion callbacks invoked by the interrupt engine.
///
/// All methods default to no-ops, so an implementor only overrides the
/// cycles it cares about. The methods run synchronously in interrupt context
/// and must return quickly without blocking.
///
/// A NACKed master transfer still fires its completion method; compare
/// [`Session::transmitted`] against the requested length to detect the
/// truncation.
pub trait SessionEvents {
    /// A slave-receive cycle ended (stop condition seen).
    fn on_slave_receive(&mut self) {}

    /// A master-transmit transfer finished or was NACKed.
    fn on_master_transmit_done(&mut self) {}

    /// A slave-transmit cycle ended (the master stopped reading).
    fn on_slave_transmit_done(&mut self) {}

    /// A master-receive transfer finished.
    fn on_master_receive_done(&mut self) {}
}

/// Callback-free sessions, for polled use or tests.
impl SessionEvents for () {}

// =============================================================================
// Session Status
// =============================================================================

/// Role and phase of the session's current transfer.
///
/// `Idle` is both the initial and the terminal state; exactly one role is
/// active at any time. Master transfers walk through their start and address
/// phases before reaching the byte-moving state; slave roles are entered
/// directly from `Idle` on an address match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// No transfer active; the peripheral is waiting for a start condition
    #[default]
    Idle,
    /// Master transmitter, waiting for the start condition to go out
    MtxStartSent,
    /// Master transmitter, waiting for the target to acknowledge the address
    MtxAddrAcked,
    /// Master transmitter, moving data bytes
    Mtx,
    /// Slave receiver, accepting bytes into the ring
    Srx,
    /// Master receiver, waiting for the start condition to go out
    MrxStartSent,
    /// Master receiver, waiting for the target to acknowledge the address
    MrxAddrAcked,
    /// Master receiver, moving data bytes
    Mrx,
    /// Slave transmitter, serving bytes to the remote master
    Stx,
}

// =============================================================================
// Session
// =============================================================================

/// Transfer state for one physical I2C instance.
///
/// # Type Parameters
/// * `R` - register capability implementation for the bound instance
/// * `E` - completion callback handler
/// * `RING` - slave-receive ring capacity in bytes
/// * `XFER` - master transmit/receive and slave response buffer capacity
///
/// Buffers are owned inline and zero-filled at creation; starting a new
/// transfer reuses them without reallocation. The session is driven from two
/// contexts: the initiators and [`Session::pop`] run in application context,
/// while [`Session::on_interrupt`](Session::on_interrupt) runs in the
/// instance's interrupt handler. No locking is done here; wrap the registry
/// in [`crate::sync::SharedRegistry`] when both contexts are live.
#[derive(Debug)]
pub struct Session<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize> {
    /// Register capability for the bound instance
    pub(super) regs: R,
    /// Completion callbacks
    pub(super) events: E,
    /// Current role and phase
    pub(super) status: Status,
    /// Address byte on the wire: 7-bit target address << 1 | direction.
    /// Zero while idle.
    pub(super) slave_addr: u8,
    /// Cached bus clock period in core cycles, set at creation
    pub(super) period_cycles: u32,
    /// Slave-receive ring
    pub(super) srx: ByteRing<RING>,
    /// Master-transmit staging buffer
    pub(super) mtx_buf: [u8; XFER],
    /// Number of bytes staged for master transmit
    pub(super) mtx_len: usize,
    /// Master-transmit progress
    pub(super) mtx_pos: usize,
    /// Master-receive destination buffer
    pub(super) mrx_buf: [u8; XFER],
    /// Number of bytes expected by the current master receive
    pub(super) mrx_len: usize,
    /// Master-receive progress
    pub(super) mrx_pos: usize,
    /// Slave-transmit response buffer
    pub(super) stx_buf: [u8; XFER],
    /// Number of response bytes prepared (0 = unset, filler bytes served)
    pub(super) stx_len: usize,
    /// Slave-transmit cursor
    pub(super) stx_pos: usize,
}

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
    Session<R, E, RING, XFER>
{
    /// Create a session bound to one peripheral instance.
    ///
    /// Unmasks the instance's event interrupts, enables clock stretching and
    /// arms ACK, so an otherwise unconfigured slave acknowledges matched
    /// addresses predictably. The bus period is read once and cached.
    pub fn new(mut regs: R, events: E) -> Self {
        regs.enable();
        regs.enable_clock_stretch();
        regs.ack_next();
        let period_cycles = regs.bus_period_cycles();
        Self {
            regs,
            events,
            status: Status::Idle,
            slave_addr: 0,
            period_cycles,
            srx: ByteRing::new(),
            mtx_buf: [0; XFER],
            mtx_len: 0,
            mtx_pos: 0,
            mrx_buf: [0; XFER],
            mrx_len: 0,
            mrx_pos: 0,
            stx_buf: [0; XFER],
            stx_len: 0,
            stx_pos: 0,
        }
    }

    /// Get the current transfer status.
    #[inline(always)]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Check whether a transfer is in flight.
    #[inline(always)]
    pub fn is_idle(&self) -> bool {
        self.status == Status::Idle
    }

    // =========================================================================
    // Master Transfer Initiators
    // =========================================================================

    /// Start a master-transmit transfer to `addr` (7-bit).
    ///
    /// The bytes are copied into the session's staging buffer; the interrupt
    /// engine clocks them out and fires
    /// [`SessionEvents::on_master_transmit_done`] when the transfer completes
    /// or is NACKed. An empty slice is accepted and silently does nothing.
    pub fn master_transmit(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if self.status != Status::Idle {
            return Err(TransferError::Busy.into());
        }
        if bytes.len() > XFER {
            return Err(TransferError::TooLong.into());
        }

        self.regs.disable_clock_stretch();

        self.mtx_buf[..bytes.len()].copy_from_slice(bytes);
        self.mtx_len = bytes.len();
        self.mtx_pos = 0;
        self.slave_addr = addr << 1;
        self.status = Status::MtxStartSent;

        self.regs.issue_start();
        Ok(())
    }

    /// Start a master-receive transfer of `len` bytes from `addr` (7-bit).
    ///
    /// Received data lands in the session buffer and is available through
    /// [`Session::received`] once
    /// [`SessionEvents::on_master_receive_done`] has fired. A length of zero
    /// is accepted and silently does nothing.
    ///
    /// A single-byte receive arms NACK here, before the start condition:
    /// the hardware pipelines the acknowledge slot, so waiting for the byte
    /// event would be one byte too late.
    pub fn master_receive(&mut self, addr: u8, len: usize) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        if self.status != Status::Idle {
            return Err(TransferError::Busy.into());
        }
        if len > XFER {
            return Err(TransferError::TooLong.into());
        }

        self.regs.disable_clock_stretch();

        self.mrx_len = len;
        self.mrx_pos = 0;
        self.slave_addr = (addr << 1) | 1;
        self.status = Status::MrxStartSent;

        if len == 1 {
            self.regs.nack_next();
        }

        self.regs.issue_start();
        Ok(())
    }

    // =========================================================================
    // Slave Data Access
    // =========================================================================

    /// Pop the oldest unread slave-received byte, `None` when drained.
    ///
    /// Unsynchronized against the producing interrupt by design; use
    /// [`crate::sync::SharedRegistry::pop`] for a critical-section variant.
    #[inline]
    pub fn pop(&mut self) -> Option<u8> {
        self.srx.pop()
    }

    /// Number of unread slave-received bytes.
    #[inline]
    pub fn pending_bytes(&self) -> usize {
        self.srx.len()
    }

    /// Prepare the response served on the next slave-transmit cycle.
    ///
    /// Without a prepared response (or once it is exhausted mid-cycle) the
    /// engine serves `0x00` filler bytes. The cursor rewinds after every
    /// completed cycle, so the same response is served until replaced.
    pub fn set_slave_response(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > XFER {
            return Err(TransferError::TooLong.into());
        }
        self.stx_buf[..bytes.len()].copy_from_slice(bytes);
        self.stx_len = bytes.len();
        self.stx_pos = 0;
        Ok(())
    }

    /// Drop the prepared slave response; filler bytes are served again.
    pub fn clear_slave_response(&mut self) {
        self.stx_len = 0;
        self.stx_pos = 0;
    }

    // =========================================================================
    // Transfer Results
    // =========================================================================

    /// Bytes captured by the most recent master-receive transfer.
    #[inline]
    pub fn received(&self) -> &[u8] {
        &self.mrx_buf[..self.mrx_pos]
    }

    /// Bytes clocked out by the most recent master-transmit transfer.
    ///
    /// Less than the requested length exactly when the target NACKed early.
    #[inline]
    pub fn transmitted(&self) -> usize {
        self.mtx_pos
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Disable the peripheral and drop back to idle.
    ///
    /// The registry calls this on destroy; buffers are released when the
    /// session itself is dropped.
    pub fn shutdown(&mut self) {
        self.regs.disable();
        self.reset_idle();
    }

    /// Return to the idle state, clearing the wire address.
    #[inline]
    pub(super) fn reset_idle(&mut self) {
        self.status = Status::Idle;
        self.slave_addr = 0;
    }
}

// =============================================================================
// Capacity Aliases
// =============================================================================

/// Default session configuration (64-byte ring, 32-byte transfers).
pub type SessionDefault<R, E> = Session<R, E, 64, 32>;

/// Small session for memory-constrained parts (16-byte ring and transfers).
pub type SessionSmall<R, E> = Session<R, E, 16, 16>;

/// Large session for bulk transfers (256-byte ring, 64-byte transfers).
pub type SessionLarge<R, E> = Session<R, E, 256, 64>;

// =============================================================================
// Unit Tests
// =============================================================================
