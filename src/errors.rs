//! Error types of the controllability core.
//!
//! I/O and parse failures are reported through [`std::io::Error`] by the
//! readers and writers; an unsupported format operation wraps
//! [`ControllabilityError::NotSupported`] in such an error.

use thiserror::Error;

/// Errors raised by the controllability solvers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllabilityError {
    /// A result accessor or dependent computation was invoked before
    /// `calculate()` has produced a result.
    #[error("no result available; call calculate() first")]
    InvalidState,

    /// The requested operation is not defined for the chosen model or
    /// format configuration, e.g. reading GraphML input.
    #[error("this operation is not supported: {0}")]
    NotSupported(&'static str),
}

/// Shorthand for results of the controllability core.
pub type Result<T> = std::result::Result<T, ControllabilityError>;
