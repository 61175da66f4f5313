//! Core driver components for the I2C session machine.
//!
//! This module contains the building blocks for running multi-role I2C
//! transfers from interrupt context:
//!
//! - [`error`] - Error types and result aliases
//! - [`session`] - Per-peripheral transfer state and initiators
//! - [`engine`] - The interrupt-driven protocol engine
//! - [`registry`] - Instance identity and session slot management
//! - [`blocking`] - Polled `embedded-hal` adapter
//!
//! # Example
//!
//! ```ignore
//! use ph_stm32_i2c::driver::{PeripheralId, SessionRegistry};
//!
//! let mut registry: SessionRegistry<BoardRegs, Handler, 64, 32> = SessionRegistry::new();
//! let session = registry.create(PeripheralId::I2c1, regs, handler)?;
//! session.master_transmit(0x20, &[0x01])?;
//! ```

// Submodules
pub mod blocking;
pub mod engine;
pub mod error;
pub mod registry;
pub mod session;

// Re-exports for convenience
pub use blocking::{BlockingI2c, POLL_SPIN_LIMIT};
pub use engine::FLAG_SPIN_LIMIT;
pub use error::{
    BusError, BusResult, ConfigError, ConfigResult, Error, Result, TransferError, TransferResult,
};
pub use registry::{MAX_SESSIONS, PeripheralId, SessionRegistry};
pub use session::{Session, SessionDefault, SessionEvents, SessionLarge, SessionSmall, Status};
