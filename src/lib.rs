//! STM32 I2C Session Driver
//!
//! A `no_std`, `no_alloc` interrupt-driven multi-role I2C driver for STM32
//! microcontrollers.
//!
//! The driver runs entirely from interrupt context: the application starts a
//! transfer (or passively waits to be addressed as a slave), and the
//! interrupt dispatcher feeds hardware events into an explicit state machine
//! one event at a time. There are no blocking calls; the only waits are
//! bounded busy-spins on flags that resolve within a few bus clock cycles.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Session Layer** ([`driver::session`], [`driver::engine`]): per-peripheral
//!    transfer state and the event-driven protocol engine
//! 2. **Registry Layer** ([`driver::registry`]): maps physical I2C instances to
//!    sessions with defined init/teardown
//! 3. **HAL Layer** ([`hal`]): the [`I2cRegisters`] capability trait that hides
//!    device-family register differences
//!
//! All four bus roles are handled by one state machine: master transmitter,
//! master receiver, slave transmitter, and slave receiver. Family-specific
//! register semantics (F0's ICR write-to-clear flags versus F1/F4's SR1/SR2
//! read sequences, and so on) live entirely inside the [`I2cRegisters`]
//! implementation supplied by board code.
//!
//! # Features
//!
//! - `stm32f1` (default): target the STM32F1 family (I2C1, I2C2)
//! - `stm32f0`: target the STM32F0 family (I2C1)
//! - `stm32f4`: target the STM32F4 family (I2C1, I2C2, I2C3)
//! - `defmt`: enable defmt formatting for status and error types
//! - `critical-section`: enable the ISR-safe [`SharedRegistry`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_i2c::{PeripheralId, SessionEvents, SharedRegistry};
//!
//! struct Handler;
//! impl SessionEvents for Handler {
//!     fn on_master_transmit_done(&mut self) {
//!         // transfer finished or was NACKed; inspect counters from app context
//!     }
//! }
//!
//! // Process-wide state with defined initialization, one slot per instance.
//! static I2C: SharedRegistry<BoardRegs, Handler, 64, 32> = SharedRegistry::new();
//!
//! // Application context
//! I2C.with(|reg| {
//!     let session = reg.create(PeripheralId::I2c1, BoardRegs::new(1), Handler)?;
//!     session.master_transmit(0x20, &[0x01, 0x02, 0x03])
//! })?;
//!
//! // In the I2C1 event interrupt handler
//! fn i2c1_ev_irq() {
//!     let _ = I2C.on_interrupt(PeripheralId::I2c1);
//! }
//!
//! // Drain slave-receive data from app context
//! while let Some(byte) = I2C.pop(PeripheralId::I2c1) {
//!     // ...
//! }
//! ```
//!
//! # Memory Requirements
//!
//! A `Session<R, E, 64, 32>` owns its ring and transfer buffers inline:
//! 64 + 3 × 32 bytes of payload plus bookkeeping, no heap.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::module_name_repetitions,
    clippy::wildcard_imports
)]

#[cfg(any(
    all(feature = "stm32f0", feature = "stm32f1"),
    all(feature = "stm32f0", feature = "stm32f4"),
    all(feature = "stm32f1", feature = "stm32f4")
))]
compile_error!("Features 'stm32f0', 'stm32f1' and 'stm32f4' are mutually exclusive.");

#[cfg(not(any(feature = "stm32f0", feature = "stm32f1", feature = "stm32f4")))]
compile_error!(
    "One device family feature ('stm32f0', 'stm32f1' or 'stm32f4') must be enabled. \
     The default is 'stm32f1'."
);

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod ring;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::blocking::BlockingI2c;
pub use driver::error::{
    BusError, BusResult, ConfigError, ConfigResult, Error, Result, TransferError, TransferResult,
};
pub use driver::registry::{MAX_SESSIONS, PeripheralId, SessionRegistry};
pub use driver::session::{
    Session, SessionDefault, SessionEvents, SessionLarge, SessionSmall, Status,
};
pub use hal::{Direction, EventStatus, I2cRegisters};
pub use ring::ByteRing;

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedRegistry};
