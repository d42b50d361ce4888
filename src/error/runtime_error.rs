use thiserror::Error;

use crate::error::{BackendError, ConversionError};

/// Represents all failures a builtin can report during evaluation.
///
/// A failure never aborts evaluation: the evaluator records it as a message
/// tagged with [`RuntimeError::tag`] and leaves the offending call
/// unevaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// The argument is neither a list nor a recognized distribution.
    #[error("{operator}: a list or a distribution is expected, but {found} was given.")]
    ExpectedListOrDistribution {
        /// The operator that received the argument.
        operator: &'static str,
        /// The offending argument.
        found:    String,
    },
    /// The argument is not a recognized distribution.
    #[error("{operator}: {found} is not a recognized distribution.")]
    ExpectedDistribution {
        /// The operator that received the argument.
        operator: &'static str,
        /// The offending argument.
        found:    String,
    },
    /// The argument is not a list.
    #[error("{operator}: a list is expected, but {found} was given.")]
    ExpectedList {
        /// The operator that received the argument.
        operator: &'static str,
        /// The offending argument.
        found:    String,
    },
    /// A value could not be handed to the backend.
    #[error("{operator}: {found} cannot be converted to a backend value.")]
    NotConvertible {
        /// The operator that tried the conversion.
        operator: &'static str,
        /// The value that failed to convert.
        found:    String,
    },
    /// A distribution parameter lies outside its domain.
    #[error("{distribution}: invalid parameter {parameter}: {details}.")]
    InvalidParameter {
        /// The distribution head.
        distribution: &'static str,
        /// The parameter name.
        parameter:    &'static str,
        /// Why the value was rejected.
        details:      String,
    },
    /// The sample count of `RandomVariate` is not a positive integer within
    /// the supported limit.
    #[error("RandomVariate: the sample count {found} is not a positive integer of at most {limit}.")]
    InvalidSampleCount {
        /// The offending count.
        found: String,
        /// The largest count accepted.
        limit: usize,
    },
    /// A seed was not a non-negative machine integer.
    #[error("{operator}: {found} is not a valid seed.")]
    InvalidSeed {
        /// The operator that received the seed.
        operator: &'static str,
        /// The offending seed.
        found:    String,
    },
    /// Two lists that must pair up element by element differ in length.
    #[error("{operator}: the lists have lengths {left} and {right}, which differ.")]
    LengthMismatch {
        /// The operator that received the lists.
        operator: &'static str,
        /// Length of the first list.
        left:     usize,
        /// Length of the second list.
        right:    usize,
    },
    /// Attempted division by zero.
    #[error("{operator}: division by zero.")]
    DivisionByZero {
        /// The operator whose computation divided by zero.
        operator: &'static str,
    },
    /// Exact arithmetic overflowed.
    #[error("{operator}: integer overflow while trying to compute the result.")]
    Overflow {
        /// The operator whose computation overflowed.
        operator: &'static str,
    },
    /// The backend cannot compute the requested quantity.
    #[error("{operator}: {details}.")]
    Unsupported {
        /// The operator that was requested.
        operator: &'static str,
        /// What the backend could not do.
        details:  String,
    },
    /// The wrong number of arguments was supplied.
    #[error("{operator} called with {found} arguments; {expected} expected.")]
    ArgumentCount {
        /// The head that was called.
        operator: String,
        /// A description of the accepted counts.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
    },
}

impl RuntimeError {
    /// The short message tag under which the evaluator records this failure.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::ExpectedListOrDistribution { .. } => "rectn",
            Self::ExpectedDistribution { .. } => "dist",
            Self::ExpectedList { .. } => "vector",
            Self::NotConvertible { .. } => "conv",
            Self::InvalidParameter { .. } => "par",
            Self::InvalidSampleCount { .. } => "array",
            Self::InvalidSeed { .. } => "seed",
            Self::LengthMismatch { .. } => "vctmat",
            Self::DivisionByZero { .. } => "infy",
            Self::Overflow { .. } => "ovfl",
            Self::Unsupported { .. } => "unsup",
            Self::ArgumentCount { .. } => "argx",
        }
    }

    /// Attaches the operator name to a backend failure.
    #[must_use]
    pub fn backend(operator: &'static str, error: BackendError) -> Self {
        match error {
            BackendError::InvalidParameter { distribution,
                                             parameter,
                                             details, } => Self::InvalidParameter { distribution,
                                                                                    parameter,
                                                                                    details },
            BackendError::Unsupported { details } => Self::Unsupported { operator, details },
            BackendError::DivisionByZero => Self::DivisionByZero { operator },
            BackendError::Overflow => Self::Overflow { operator },
        }
    }

    /// Attaches the operator name to a conversion failure.
    #[must_use]
    pub fn conversion(operator: &'static str, error: ConversionError) -> Self {
        match error {
            ConversionError::NotConvertible { found } => Self::NotConvertible { operator, found },
            ConversionError::Backend(inner) => Self::backend(operator, inner),
        }
    }
}
