use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if conversion is not lossless.
///
/// ## Example
/// ```
/// use symstat::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// // Works for safe values
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// // Fails for values outside safe range
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts a collection length into an exact integer for the numeric tower.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` naming `operator` if the length does not
/// fit into an `i64`.
///
/// ## Example
/// ```
/// use symstat::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(3, "Mean").unwrap(), 3);
/// ```
pub fn usize_to_i64_checked(value: usize, operator: &'static str) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::Overflow { operator })
}

/// Converts a non-negative `i64` into a `usize`.
///
/// ## Errors
/// Returns `Err(error)` for negative values or values exceeding `usize`.
///
/// ## Example
/// ```
/// use symstat::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(42, ()).unwrap(), 42);
/// assert!(i64_to_usize_checked(-1, ()).is_err());
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}
