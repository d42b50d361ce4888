/// Complex number support.
///
/// Defines the `ComplexNumber` type used for inexact complex arithmetic, with
/// conjugation, powers and conversion back to `Number`.
pub mod complex;

/// The `Number` enum and its arithmetic.
pub mod core;
