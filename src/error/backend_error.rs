use thiserror::Error;

/// Failures raised inside the computer-algebra backend.
///
/// These carry no knowledge of the host operator that triggered them; the
/// statistic operators attach that context through
/// [`RuntimeError::backend`](crate::error::RuntimeError::backend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// A distribution parameter is decidably outside its domain.
    #[error("invalid parameter {parameter} of {distribution}: {details}")]
    InvalidParameter {
        /// The distribution head.
        distribution: &'static str,
        /// The parameter name.
        parameter:    &'static str,
        /// Why the value was rejected.
        details:      String,
    },
    /// The quantity cannot be computed for these arguments.
    #[error("{details}")]
    Unsupported {
        /// What could not be computed.
        details: String,
    },
    /// A division by an exact or inexact zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Exact arithmetic overflowed.
    #[error("integer overflow")]
    Overflow,
}

/// Failures of the conversion bridge between host expressions and backend
/// terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The expression has no backend counterpart.
    #[error("{found} has no backend representation")]
    NotConvertible {
        /// The expression that failed to convert.
        found: String,
    },
    /// Building the backend term failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
