/// Numeric conversion helpers.
///
/// Safe conversions between `i64`, `usize` and `f64` that never lose data
/// silently. Every function returns a `Result` carrying the caller's error.
pub mod num;
/// Fresh identifiers for backend random variables.
///
/// Each evaluation context owns one allocator, so identifiers are unique
/// within a context without any process-wide state.
pub mod names;
