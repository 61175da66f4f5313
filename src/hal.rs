//! Hardware Abstraction Layer
//!
//! This module defines the register capability interface the protocol engine
//! drives. The engine never touches raw registers; every start/stop, ACK/NACK,
//! data and flag operation goes through [`I2cRegisters`], so the state machine
//! has exactly one implementation regardless of the target device family.
//!
//! Board or family support code implements the trait for a concrete I2C
//! instance. Implementations absorb the register-level quirks of their
//! family: on F1/F4 parts clearing the address-match flag is an SR1/SR2 read
//! sequence, on F0 parts it is an ICR write; the NACK flag is `SR1.AF` on one
//! and `ISR.NACKF` on the other; and so on. From the engine's point of view
//! all of that is just [`EventStatus`] and the clear operations below.

// =============================================================================
// Event Status
// =============================================================================

/// Event flags parsed from the peripheral's status registers.
///
/// One snapshot is taken per interrupt invocation and dispatched in fixed
/// priority order by the engine. Implementations map their family's status
/// bits onto these fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventStatus {
    /// A NACK was received (`AF` / `NACKF`)
    pub nack: bool,
    /// The data register holds a received byte (`RXNE`)
    pub rx_ready: bool,
    /// A start condition has been sent on the bus (`SB`, master only)
    pub start_sent: bool,
    /// Address phase completed: own address matched in slave mode, or the
    /// target acknowledged the address in master mode (`ADDR`)
    pub addr_match: bool,
    /// The data register is empty and ready for the next byte (`TXE` / `TXIS`)
    pub tx_empty: bool,
    /// A stop condition was detected (`STOPF`)
    pub stop: bool,
    /// The last byte has fully left the shift register (`BTF` / `TC`)
    pub transfer_complete: bool,
}

impl EventStatus {
    /// Check if any event the engine dispatches on is pending.
    #[inline]
    pub fn any(&self) -> bool {
        self.nack
            || self.rx_ready
            || self.start_sent
            || self.addr_match
            || self.tx_empty
            || self.stop
    }
}

// =============================================================================
// Transfer Direction
// =============================================================================

/// Direction requested by the remote master when this peripheral is
/// addressed as a slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// The master writes; we receive (slave receiver)
    Write,
    /// The master reads; we transmit (slave transmitter)
    Read,
}

// =============================================================================
// Register Capability Trait
// =============================================================================

/// Register-level operations of one physical I2C instance.
///
/// All methods are single-shot register accesses; any readback confirmation
/// a family needs (for example the F0's peripheral-disable dance around the
/// `NOSTRETCH` bit) belongs inside the implementation. The bounded waits for
/// protocol-level flags live in the engine, not here.
pub trait I2cRegisters {
    /// Take one snapshot of the pending event flags.
    fn events(&self) -> EventStatus;

    /// Write a byte into the data register.
    fn write_data(&mut self, byte: u8);

    /// Read the data register, consuming the received byte.
    fn read_data(&mut self) -> u8;

    /// Generate a start condition.
    fn issue_start(&mut self);

    /// Generate a stop condition.
    fn issue_stop(&mut self);

    /// Configure the peripheral to ACK the next received byte.
    fn ack_next(&mut self);

    /// Configure the peripheral to NACK the next received byte.
    fn nack_next(&mut self);

    /// Allow the peripheral to hold SCL low while it is not ready.
    fn enable_clock_stretch(&mut self);

    /// Forbid the peripheral from holding SCL low.
    fn disable_clock_stretch(&mut self);

    /// Clear the address-match flag (family-specific sequence).
    fn clear_addr_match(&mut self);

    /// Clear the NACK flag.
    fn clear_nack(&mut self);

    /// Clear the stop-detected flag.
    fn clear_stop(&mut self);

    /// Direction of the transfer the remote master just started.
    ///
    /// Only meaningful while the address-match flag is set in slave mode.
    fn transfer_direction(&self) -> Direction;

    /// Length of one bus clock period in core cycles.
    ///
    /// Derived from the peripheral's clock configuration; the session caches
    /// this at creation to bound short settle delays between slave-transmit
    /// bytes.
    fn bus_period_cycles(&self) -> u32;

    /// Unmask the event and buffer interrupts for this instance.
    fn enable(&mut self);

    /// Mask interrupts and disable the peripheral.
    fn disable(&mut self);
}

// =============================================================================
// Unit Tests
// =============================================================================
