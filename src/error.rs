/// Backend and conversion errors.
///
/// Defines the failures raised inside the computer-algebra backend and by the
/// conversion bridge. They know nothing about host operators.
pub mod backend_error;
/// Runtime errors.
///
/// Contains all error types a builtin can report during evaluation, such as
/// type mismatches, invalid distribution parameters, invalid sample counts,
/// division by zero or unsupported computations.
pub mod runtime_error;

pub use backend_error::{BackendError, ConversionError};
pub use runtime_error::RuntimeError;
