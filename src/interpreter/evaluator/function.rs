/// The builtin table and dispatch.
///
/// Maps heads to builtin handlers with their accepted argument counts and
/// applies them to evaluated arguments.
pub mod core;

/// Host arithmetic: `Plus`, `Times`, `Power`, `Sqrt` and `Conjugate`.
///
/// Calls are rebuilt through the backend so results are canonical and exact
/// where the inputs are exact.
pub mod arith;

/// The distribution families and their conversion to backend random
/// variables.
pub mod distribution;

/// Sample moments of lists: mean, variance and covariance.
pub mod moments;

/// The statistic operators `PDF`, `CDF`, `Mean`, `Variance`,
/// `StandardDeviation`, `Covariance`, `RandomVariate` and `SeedRandom`.
pub mod statistic;
