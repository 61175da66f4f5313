//! Testing utilities and mock implementations
//!
//! This module provides a mock register capability and a recording callback
//! handler for testing the session driver on the host without hardware.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::driver::session::SessionEvents;
use crate::hal::{Direction, EventStatus, I2cRegisters};

// =============================================================================
// Bus Operation Log
// =============================================================================

/// One operation driven onto the mock bus, in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Enable,
    Disable,
    StretchOn,
    StretchOff,
    AckNext,
    NackNext,
    Start,
    Stop,
    Write(u8),
}

// =============================================================================
// Mock State
// =============================================================================

/// Wire phase tracked by the autopilot (see [`MockState::autopilot`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockPhase {
    #[default]
    Quiet,
    StartPending,
    AddrPending,
    Data,
}

/// Shared state behind a [`MockRegs`] handle.
///
/// Tests keep a clone of the `Rc` (via [`state_of`]) to inject events and
/// inspect the operation log while the session owns the `MockRegs` itself.
#[derive(Debug)]
pub struct MockState {
    /// Flags returned verbatim by `events()` in manual mode
    pub events: EventStatus,
    /// Every operation driven through the capability trait, in order
    pub ops: Vec<BusOp>,
    /// Bytes the "remote end" has ready for us to read
    pub rx_data: VecDeque<u8>,
    /// Direction reported on a slave address match
    pub direction: Direction,
    /// Whether the peripheral would currently ACK the next byte
    pub ack_armed: bool,
    /// Value reported by `bus_period_cycles()`
    pub period_cycles: u32,
    /// Manual mode: raise NACK (and drop TXE) as soon as a byte is written,
    /// emulating a controller that stops reading mid-byte
    pub nack_on_write: bool,
    /// Autopilot mode: raise NACK after this many data-byte writes
    pub nack_after_writes: Option<usize>,
    /// Synthesize event flags from the wire phase instead of `events`,
    /// emulating a well-behaved remote target for polled transfers
    pub autopilot: bool,
    /// Current autopilot wire phase
    pub phase: MockPhase,
    /// Direction bit of the last address byte seen by the autopilot
    pub master_read: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            events: EventStatus::default(),
            ops: Vec::new(),
            rx_data: VecDeque::new(),
            direction: Direction::Write,
            ack_armed: false,
            period_cycles: 1,
            nack_on_write: false,
            nack_after_writes: None,
            autopilot: false,
            phase: MockPhase::Quiet,
            master_read: false,
        }
    }
}

// =============================================================================
// Mock Register Capability
// =============================================================================

/// Mock register interface for driving the engine without hardware.
///
/// Two modes:
/// - **manual** (default): `events()` returns [`MockState::events`]
///   verbatim; the test raises and lowers flags around each `on_interrupt`
///   call.
/// - **autopilot**: `events()` is synthesized from the wire phase, acting as
///   a cooperative remote target so whole polled transfers run unattended.
///
/// # Example
///
/// ```ignore
/// let regs = MockRegs::new();
/// let state = state_of(&regs);
/// let mut session: Session<_, (), 8, 8> = Session::new(regs, ());
///
/// state.borrow_mut().events.start_sent = true;
/// session.on_interrupt().unwrap();
/// ```
#[derive(Debug)]
pub struct MockRegs {
    state: Rc<RefCell<MockState>>,
}

impl MockRegs {
    /// Create a mock with fresh default state.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::default())),
        }
    }
}

impl Default for MockRegs {
    fn default() -> Self {
        Self::new()
    }
}

/// Get a handle to a mock's shared state.
pub fn state_of(regs: &MockRegs) -> Rc<RefCell<MockState>> {
    Rc::clone(&regs.state)
}

impl I2cRegisters for MockRegs {
    fn events(&self) -> EventStatus {
        let state = self.state.borrow();
        if !state.autopilot {
            return state.events;
        }

        let mut ev = EventStatus::default();
        match state.phase {
            MockPhase::Quiet => {}
            MockPhase::StartPending => ev.start_sent = true,
            MockPhase::AddrPending => ev.addr_match = true,
            MockPhase::Data => {
                if state.master_read {
                    ev.rx_ready = !state.rx_data.is_empty();
                } else {
                    ev.tx_empty = true;
                    ev.transfer_complete = true;
                }
            }
        }
        // Injected flags ride on top of the synthesized phase
        ev.nack = state.events.nack;
        ev.stop = state.events.stop;
        ev
    }

    fn write_data(&mut self, byte: u8) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::Write(byte));

        if state.autopilot && state.phase == MockPhase::StartPending {
            // Address byte: latch the direction bit, move to the address phase
            state.master_read = byte & 1 == 1;
            state.phase = MockPhase::AddrPending;
            return;
        }

        let mut raise_nack = false;
        if let Some(remaining) = state.nack_after_writes.as_mut() {
            *remaining = remaining.saturating_sub(1);
            raise_nack = *remaining == 0;
        }
        if raise_nack {
            state.events.nack = true;
        }

        if state.nack_on_write {
            state.events.nack = true;
            state.events.tx_empty = false;
        }
    }

    fn read_data(&mut self) -> u8 {
        self.state.borrow_mut().rx_data.pop_front().unwrap_or(0)
    }

    fn issue_start(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::Start);
        if state.autopilot {
            state.phase = MockPhase::StartPending;
        }
    }

    fn issue_stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::Stop);
        if state.autopilot {
            state.phase = MockPhase::Quiet;
        }
    }

    fn ack_next(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::AckNext);
        state.ack_armed = true;
    }

    fn nack_next(&mut self) {
        let mut state = self.state.borrow_mut();
        state.ops.push(BusOp::NackNext);
        state.ack_armed = false;
    }

    fn enable_clock_stretch(&mut self) {
        self.state.borrow_mut().ops.push(BusOp::StretchOn);
    }

    fn disable_clock_stretch(&mut self) {
        self.state.borrow_mut().ops.push(BusOp::StretchOff);
    }

    fn clear_addr_match(&mut self) {
        let mut state = self.state.borrow_mut();
        state.events.addr_match = false;
        if state.autopilot && state.phase == MockPhase::AddrPending {
            state.phase = MockPhase::Data;
        }
    }

    fn clear_nack(&mut self) {
        self.state.borrow_mut().events.nack = false;
    }

    fn clear_stop(&mut self) {
        self.state.borrow_mut().events.stop = false;
    }

    fn transfer_direction(&self) -> Direction {
        self.state.borrow().direction
    }

    fn bus_period_cycles(&self) -> u32 {
        self.state.borrow().period_cycles
    }

    fn enable(&mut self) {
        self.state.borrow_mut().ops.push(BusOp::Enable);
    }

    fn disable(&mut self) {
        self.state.borrow_mut().ops.push(BusOp::Disable);
    }
}

// =============================================================================
// Recording Callbacks
// =============================================================================

/// Invocation counters for the four completion callbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounters {
    pub slave_receive: usize,
    pub master_transmit_done: usize,
    pub slave_transmit_done: usize,
    pub master_receive_done: usize,
}

/// Callback handler that counts invocations for test assertions.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    counters: Rc<RefCell<EventCounters>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Get a handle to a recording handler's counters.
pub fn counters_of(events: &RecordingEvents) -> Rc<RefCell<EventCounters>> {
    Rc::clone(&events.counters)
}

impl SessionEvents for RecordingEvents {
    fn on_slave_receive(&mut self) {
        self.counters.borrow_mut().slave_receive += 1;
    }

    fn on_master_transmit_done(&mut self) {
        self.counters.borrow_mut().master_transmit_done += 1;
    }

    fn on_slave_transmit_done(&mut self) {
        self.counters.borrow_mut().slave_transmit_done += 1;
    }

    fn on_master_receive_done(&mut self) {
        self.counters.borrow_mut().master_receive_done += 1;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_logs_operations_in_order() {
        let mut regs = MockRegs::new();
        regs.enable();
        regs.issue_start();
        regs.write_data(0x42);
        regs.issue_stop();

        let state = state_of(&regs);
        assert_eq!(
            state.borrow().ops,
            [BusOp::Enable, BusOp::Start, BusOp::Write(0x42), BusOp::Stop]
        );
    }

    #[test]
    fn mock_tracks_ack_arming() {
        let mut regs = MockRegs::new();
        regs.ack_next();
        assert!(state_of(&regs).borrow().ack_armed);
        regs.nack_next();
        assert!(!state_of(&regs).borrow().ack_armed);
    }

    #[test]
    fn mock_read_data_drains_supply() {
        let mut regs = MockRegs::new();
        state_of(&regs).borrow_mut().rx_data.push_back(0x11);
        assert_eq!(regs.read_data(), 0x11);
        assert_eq!(regs.read_data(), 0, "empty supply reads as zero");
    }

    #[test]
    fn mock_clears_reset_flags() {
        let mut regs = MockRegs::new();
        {
            let state = state_of(&regs);
            let mut s = state.borrow_mut();
            s.events.nack = true;
            s.events.stop = true;
            s.events.addr_match = true;
        }
        regs.clear_nack();
        regs.clear_stop();
        regs.clear_addr_match();
        assert_eq!(regs.events(), EventStatus::default());
    }

    #[test]
    fn autopilot_walks_master_write_phases() {
        let mut regs = MockRegs::new();
        state_of(&regs).borrow_mut().autopilot = true;

        regs.issue_start();
        assert!(regs.events().start_sent);

        regs.write_data(0x40); // address, write direction
        assert!(regs.events().addr_match);

        regs.clear_addr_match();
        let ev = regs.events();
        assert!(ev.tx_empty && ev.transfer_complete);

        regs.issue_stop();
        assert!(!regs.events().any());
    }

    #[test]
    fn autopilot_read_phase_tracks_supply() {
        let mut regs = MockRegs::new();
        {
            let state = state_of(&regs);
            state.borrow_mut().autopilot = true;
            state.borrow_mut().rx_data.push_back(0x99);
        }

        regs.issue_start();
        regs.write_data(0x41); // address, read direction
        regs.clear_addr_match();

        assert!(regs.events().rx_ready);
        assert_eq!(regs.read_data(), 0x99);
        assert!(!regs.events().rx_ready, "supply drained");
    }

    #[test]
    fn recording_events_count_invocations() {
        let mut events = RecordingEvents::new();
        let counters = counters_of(&events);

        events.on_master_transmit_done();
        events.on_master_transmit_done();
        events.on_slave_receive();

        let c = counters.borrow();
        assert_eq!(c.master_transmit_done, 2);
        assert_eq!(c.slave_receive, 1);
        assert_eq!(c.slave_transmit_done, 0);
        assert_eq!(c.master_receive_done, 0);
    }
}
