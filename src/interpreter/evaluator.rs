/// Core evaluation logic and context management.
///
/// Contains the evaluation context, its configuration, recorded messages and
/// the bottom-up evaluation of expressions.
pub mod core;

/// Utility functions for evaluation.
///
/// Argument checks and conversions shared by the builtins.
pub mod utils;

/// Builtin functions.
///
/// The builtin table, host arithmetic, the distribution families and the
/// statistic operators.
pub mod function;
