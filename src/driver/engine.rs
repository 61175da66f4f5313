//! Interrupt-driven protocol engine.
//!
//! [`Session::on_interrupt`] is the single entry point the platform's
//! interrupt dispatcher calls, once per hardware event. One snapshot of the
//! event flags is taken and dispatched in fixed priority order; the first
//! matching event wins. The ordering mirrors the hardware's own priority and
//! must not be rearranged, or simultaneous flags get misrouted (a NACK
//! arriving together with TXE must terminate the transfer, not feed it
//! another byte).
//!
//! The only waits in here are bounded spins on flags that resolve within a
//! few bus clock cycles. A spin that expires reports
//! [`BusError::StuckBus`](crate::BusError::StuckBus) instead of hanging.

use crate::driver::error::{BusError, Result};
use crate::driver::session::{Session, SessionEvents, Status};
use crate::hal::{Direction, EventStatus, I2cRegisters};

/// Iteration cap for bounded flag waits.
///
/// Generous compared to the handful of bus clock cycles a healthy flag
/// needs, small enough that a wedged bus surfaces as an error rather than a
/// system freeze.
pub const FLAG_SPIN_LIMIT: u32 = 100_000;

impl<R: I2cRegisters, E: SessionEvents, const RING: usize, const XFER: usize>
    Session<R, E, RING, XFER>
{
    /// Service one hardware event.
    ///
    /// Call from the instance's event interrupt handler. Events are checked
    /// in priority order: NACK, received byte, start sent, address match,
    /// transmit-register empty, stop. The first pending event is handled and
    /// the call returns.
    ///
    /// # Errors
    ///
    /// [`BusError::StuckBus`](crate::BusError::StuckBus) when a bounded flag
    /// wait expires mid-event. The session stays in its current state; the
    /// caller decides whether to reset the bus.
    pub fn on_interrupt(&mut self) -> Result<()> {
        let ev = self.regs.events();

        if ev.nack {
            self.handle_nack()
        } else if ev.rx_ready {
            self.handle_rx_ready();
            Ok(())
        } else if ev.start_sent {
            self.handle_start_sent();
            Ok(())
        } else if ev.addr_match {
            self.handle_addr_match();
            Ok(())
        } else if ev.tx_empty {
            self.handle_tx_empty()
        } else if ev.stop {
            self.handle_stop();
            Ok(())
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// The remote end refused a byte, or stopped reading from us.
    fn handle_nack(&mut self) -> Result<()> {
        self.regs.clear_nack();

        match self.status {
            Status::Stx => {
                // The controller keeps clocking one final acknowledge slot;
                // feed it a terminal byte so the shift register is never empty.
                self.write_slave_byte();
                self.events.on_slave_transmit_done();
                self.stx_pos = 0;
                self.status = Status::Idle;
                Ok(())
            }
            Status::Mtx | Status::MtxStartSent | Status::MtxAddrAcked => {
                // Transfer truncated mid-flight. The completion callback still
                // fires; `transmitted()` exposes how far the transfer got.
                self.regs.issue_stop();
                self.regs.enable_clock_stretch();
                self.events.on_master_transmit_done();
                self.reset_idle();
                Ok(())
            }
            Status::Mrx | Status::MrxStartSent | Status::MrxAddrAcked => {
                // Address phase refused before any data arrived.
                self.regs.issue_stop();
                self.regs.enable_clock_stretch();
                self.regs.ack_next();
                self.events.on_master_receive_done();
                self.reset_idle();
                Ok(())
            }
            Status::Idle | Status::Srx => Ok(()),
        }
    }

    /// A byte arrived in the data register.
    fn handle_rx_ready(&mut self) {
        match self.status {
            Status::Mrx => self.master_rx_byte(),
            Status::Srx => {
                let byte = self.regs.read_data();
                self.srx.push(byte);
            }
            _ => {
                // Not receiving; drain the register so the flag clears.
                let _ = self.regs.read_data();
            }
        }
    }

    fn master_rx_byte(&mut self) {
        let byte = self.regs.read_data();
        self.mrx_buf[self.mrx_pos] = byte;
        self.mrx_pos += 1;

        if self.mrx_pos == self.mrx_len {
            self.reset_idle();
            self.regs.issue_stop();
            self.regs.enable_clock_stretch();
            // Re-arm ACK so slave mode and future receives acknowledge again
            self.regs.ack_next();
            self.events.on_master_receive_done();
        } else if self.mrx_pos == self.mrx_len - 1 {
            // NACK must be armed while the final byte is still being clocked
            // in; the acknowledge slot is pipelined one byte ahead.
            self.regs.nack_next();
        }
    }

    /// Our start condition went out; send the address byte.
    fn handle_start_sent(&mut self) {
        match self.status {
            Status::MtxStartSent => self.status = Status::MtxAddrAcked,
            Status::MrxStartSent => self.status = Status::MrxAddrAcked,
            _ => return,
        }
        self.regs.write_data(self.slave_addr);
    }

    /// Address phase completed: either we were addressed as a slave, or the
    /// target acknowledged our address as master.
    fn handle_addr_match(&mut self) {
        match self.status {
            Status::Idle => {
                self.status = match self.regs.transfer_direction() {
                    Direction::Write => Status::Srx,
                    Direction::Read => Status::Stx,
                };
            }
            Status::MtxAddrAcked => self.status = Status::Mtx,
            Status::MrxAddrAcked => {
                if self.mrx_len == 1 {
                    self.regs.nack_next();
                }
                self.status = Status::Mrx;
            }
            _ => {}
        }
        self.regs.clear_addr_match();
    }

    /// The data register wants the next byte.
    fn handle_tx_empty(&mut self) -> Result<()> {
        match self.status {
            Status::Mtx => self.master_tx_byte(),
            Status::Stx => self.slave_tx_byte(),
            _ => Ok(()),
        }
    }

    fn master_tx_byte(&mut self) -> Result<()> {
        self.regs.write_data(self.mtx_buf[self.mtx_pos]);
        self.mtx_pos += 1;

        if self.mtx_pos == self.mtx_len {
            // The last byte is still in the shift register; the stop
            // condition may only go out once it has fully left.
            self.wait_for(|ev| ev.transfer_complete)?;
            self.reset_idle();
            self.regs.issue_stop();
            self.regs.enable_clock_stretch();
            self.events.on_master_transmit_done();
        }
        Ok(())
    }

    fn slave_tx_byte(&mut self) -> Result<()> {
        self.write_slave_byte();

        // Hold until the byte clears the data register. A NACK in this
        // window means the controller is done reading.
        for _ in 0..FLAG_SPIN_LIMIT {
            let ev = self.regs.events();
            if ev.nack {
                return self.handle_nack();
            }
            if ev.tx_empty {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(BusError::StuckBus.into())
    }

    /// A stop condition ended a slave-receive cycle.
    fn handle_stop(&mut self) {
        self.regs.clear_stop();
        if self.status == Status::Srx {
            self.events.on_slave_receive();
            self.status = Status::Idle;
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Serve the next response byte, or `0x00` filler past the prepared end.
    fn write_slave_byte(&mut self) {
        let byte = if self.stx_pos < self.stx_len {
            let b = self.stx_buf[self.stx_pos];
            self.stx_pos += 1;
            b
        } else {
            0
        };
        self.regs.write_data(byte);
        self.settle(1);
    }

    /// Bounded spin until `ready` matches a flag snapshot.
    fn wait_for<F: Fn(EventStatus) -> bool>(&mut self, ready: F) -> Result<()> {
        for _ in 0..FLAG_SPIN_LIMIT {
            if ready(self.regs.events()) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(BusError::StuckBus.into())
    }

    /// Busy-wait for the given number of bus clock periods.
    fn settle(&self, periods: u32) {
        for _ in 0..self.period_cycles.saturating_mul(periods) {
            core::hint::spin_loop();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
