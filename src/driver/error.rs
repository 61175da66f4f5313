//! Error types for the I2C session driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: session creation and registry failures
//! - [`TransferError`]: transfer initiation failures
//! - [`BusError`]: runtime bus failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned by most
//! driver methods. A NACK that truncates a running transfer is deliberately
//! *not* an error: the completion callback still fires and the transfer
//! counters expose the truncation, so the interrupt path never has to route
//! a `Result` anywhere.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Session creation and registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The peripheral instance does not exist on the compiled device family
    InvalidPeripheral,
    /// A session already exists for this peripheral instance
    AlreadyInUse,
    /// No session exists for this peripheral instance
    NotCreated,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidPeripheral => "invalid peripheral instance",
            ConfigError::AlreadyInUse => "session already exists",
            ConfigError::NotCreated => "no session for this peripheral",
        }
    }
}

// =============================================================================
// Transfer Errors
// =============================================================================

/// Transfer initiation errors
///
/// Returned by `master_transmit`, `master_receive` and `set_slave_response`
/// before anything is driven onto the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// A transfer is already in flight on this session
    Busy,
    /// The requested length exceeds the session's transfer buffer capacity
    TooLong,
}

impl core::fmt::Display for TransferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransferError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransferError::Busy => "transfer already in flight",
            TransferError::TooLong => "transfer exceeds buffer capacity",
        }
    }
}

// =============================================================================
// Bus Errors
// =============================================================================

/// Runtime bus failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// A flag the engine was waiting on never set within the spin limit.
    ///
    /// A wedged bus would otherwise stall this wait forever; the bounded
    /// spin turns it into a reportable error instead.
    StuckBus,
    /// The target did not acknowledge.
    ///
    /// Only surfaced by the blocking adapter; the interrupt core signals
    /// NACK truncation through callbacks and counters instead.
    NoAcknowledge,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::StuckBus => "bus stuck, flag wait expired",
            BusError::NoAcknowledge => "target did not acknowledge",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidPeripheral)) => { /* ... */ }
///     Err(Error::Transfer(TransferError::Busy)) => { /* ... */ }
///     Err(Error::Bus(BusError::StuckBus)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Transfer initiation error
    Transfer(TransferError),
    /// Bus error
    Bus(BusError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Transfer(e) => write!(f, "transfer: {}", e.as_str()),
            Error::Bus(e) => write!(f, "bus: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<TransferError> for Error {
    fn from(e: TransferError) -> Self {
        Error::Transfer(e)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

// embedded-hal error kind mapping for the blocking adapter surface
impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
        match self {
            Error::Bus(BusError::NoAcknowledge) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
            }
            Error::Bus(BusError::StuckBus) => ErrorKind::Bus,
            Error::Config(_) | Error::Transfer(_) => ErrorKind::Other,
        }
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for transfer initiation
pub type TransferResult<T> = core::result::Result<T, TransferError>;

/// Result type alias for bus operations
pub type BusResult<T> = core::result::Result<T, BusError>;

// =============================================================================
// Unit Tests
// =============================================================================
